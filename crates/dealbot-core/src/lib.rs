pub mod config;
pub mod error;
pub mod types;

pub use config::DealbotConfig;
pub use error::{DealbotError, Result};
pub use types::*;
