pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::KeteConfig;
pub use error::{KeteError, Result};
pub use events::SessionEvent;
pub use types::*;
