//! Sessions and third-party sign-in.

pub mod session;
pub mod sso;

pub use session::{RedisSessionStore, Session, SessionStore};
pub use sso::GoogleSso;
