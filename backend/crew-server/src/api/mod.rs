pub mod error;
pub mod notifications;
