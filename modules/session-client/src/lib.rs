pub mod address;
pub mod error;
pub mod exchange;
pub mod session;
pub mod store;

pub use address::{normalize_main_app_url, take_transfer_token, DEFAULT_MAIN_APP_URL};
pub use error::{Result, SessionError};
pub use exchange::{ExchangeEndpoint, ExchangeResponse, ExchangeUser, HttpEndpoint};
pub use session::{Session, SessionState, User};
pub use store::{FileStore, MemoryStore, SessionStore, AUTH_TOKEN_KEY, USER_KEY};
