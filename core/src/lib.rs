pub mod agent;
pub mod config;
pub mod error;
pub mod providers;
pub mod tools;
pub mod traits;
pub mod transcript;

pub use agent::{SupportSession, ToolRegistry};
pub use config::*;
pub use error::{AgentError, Result};
pub use providers::*;
pub use tools::*;
pub use traits::*;
pub use transcript::Transcript;
