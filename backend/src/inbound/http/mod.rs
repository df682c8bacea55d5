//! HTTP inbound adapter exposing the REST endpoints.

pub mod documents;
pub mod error;
pub mod esports;
pub mod health;
pub mod points;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod social;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
