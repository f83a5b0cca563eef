pub mod store;

pub use store::{DEFAULT_KEY_PREFIX, SessionTokenStore, TOKEN_SLOT};
