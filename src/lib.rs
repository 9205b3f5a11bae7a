pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
