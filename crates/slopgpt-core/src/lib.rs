pub mod config;
pub mod error;
pub mod types;

pub use config::SlopConfig;
pub use error::{Result, SlopError};
pub use types::*;
