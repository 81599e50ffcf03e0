pub mod error;
pub mod models;

pub use error::{CoreError, Result};
pub use models::notification::Notification;
pub use models::user_id::UserId;
