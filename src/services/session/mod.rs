pub mod cookie;
pub mod store;

pub use cookie::session_id_from_headers;
pub use store::{SessionStore, SessionUser};
