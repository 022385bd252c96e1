//! Agent orchestration
//!
//! Provides `AgentManager` for spawning, forking, querying and killing
//! multiple named agent processes, plus the asynchronous request queue and
//! the relay/broadcast router built on top of it.
//!
//! # Module Structure
//!
//! - `agent_manager` - Core `AgentManager` with public API
//! - `commands` - Command protocol between callers and agent workers
//! - `background` - Per-agent worker task
//! - `responses` - Response table for asynchronous requests
//! - `helpers` - Pure helper functions

mod agent_manager;
mod background;
mod commands;
mod helpers;
mod responses;

pub use agent_manager::AgentManager;
pub(crate) use commands::AskCommand;
pub use responses::ResponseTable;
