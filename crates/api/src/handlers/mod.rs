pub mod admin_users;
pub mod auth;
pub mod dashboard;
pub mod me;
pub mod note_access;
pub mod notes;
pub mod projects;
pub mod tasks;
