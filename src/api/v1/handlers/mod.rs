pub mod health;
pub mod me;
pub mod session_user;
