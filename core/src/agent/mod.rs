pub mod registry;
pub mod session;
pub mod state;

pub use registry::ToolRegistry;
pub use session::SupportSession;
pub use state::{Action, LoopState, transition};
