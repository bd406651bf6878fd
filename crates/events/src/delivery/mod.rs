//! Concrete email transports used by [`Mailer`](crate::Mailer).

pub mod api;
pub mod smtp;

pub use api::ProviderApiDelivery;
pub use smtp::SmtpDelivery;
