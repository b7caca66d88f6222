mod clock;
mod llm_client;
mod session_store;
mod session_store_error;

pub use clock::Clock;
pub use llm_client::{LlmClient, LlmClientError, LlmTokenStream};
pub use session_store::{SessionStore, SessionUpdate};
pub use session_store_error::SessionStoreError;
