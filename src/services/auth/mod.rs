pub mod authorized_client;
pub mod classifier;
pub mod factory;
pub mod introspection;
pub mod login;

pub use factory::{build_introspector, build_login_handler};
pub use introspection::{TokenIntrospector, TokenVerdict};
