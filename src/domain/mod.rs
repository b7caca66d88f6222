mod chat_turn;
mod conversation;
mod license_code;
mod message_role;
mod session;
mod session_id;

pub use chat_turn::ChatTurn;
pub use conversation::ConversationHistory;
pub use license_code::{LICENSE_SUFFIX_LEN, LicenseCode};
pub use message_role::MessageRole;
pub use session::Session;
pub use session_id::SessionId;
