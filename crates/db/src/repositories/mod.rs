//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod dashboard_repo;
pub mod note_edit_request_repo;
pub mod note_repo;
pub mod profile_repo;
pub mod project_repo;
pub mod session_repo;
pub mod task_comment_repo;
pub mod task_log_repo;
pub mod task_repo;

pub use dashboard_repo::DashboardRepo;
pub use note_edit_request_repo::NoteEditRequestRepo;
pub use note_repo::NoteRepo;
pub use profile_repo::ProfileRepo;
pub use project_repo::ProjectRepo;
pub use session_repo::SessionRepo;
pub use task_comment_repo::TaskCommentRepo;
pub use task_log_repo::TaskLogRepo;
pub use task_repo::TaskRepo;
