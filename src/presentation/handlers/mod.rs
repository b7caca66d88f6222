mod access;
mod admin;
mod chat;
mod error;
mod health;
pub mod messages;
mod session;

pub use access::unlock_handler;
pub use admin::issue_license_handler;
pub use chat::{send_message_handler, transcript_handler};
pub use error::{ApiError, ErrorResponse};
pub use health::health_handler;
pub use session::{SESSION_ID_HEADER, create_session_handler, logout_handler};
