pub mod config;
pub mod error;
pub mod model;
pub mod recommend;
pub mod server;

pub use error::{Error, Result, report};
