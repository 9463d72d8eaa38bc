pub mod schema;
pub mod session_store;

pub use schema::{PlayingState, SessionBlob, SessionMeta};
pub use session_store::SessionStore;
