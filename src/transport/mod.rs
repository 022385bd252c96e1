//! Transport layer for communicating with agent processes
//!
//! - [`line`] frames requests and responses as JSON lines over any async
//!   reader/writer pair
//! - [`subprocess`] launches the agent binary and owns its process group

pub mod line;
pub mod subprocess;

pub use line::LineTransport;
pub use subprocess::{AgentProcess, CommandBuilder, find_cli};
