//! Agent manager implementation
//!
//! This module is organized into logical submodules:
//! - `core`: Core struct, constructors, and shutdown
//! - `spawn`: Fresh spawns, resumed spawns and forks
//! - `interaction`: Synchronous requests and termination
//! - `list`: Registry queries and lineage
//! - `requests`: Asynchronous request queue
//! - `router`: Relay and broadcast

// Module declarations
mod core;
mod interaction;
mod list;
mod requests;
mod router;
mod spawn;

// Re-export public API
pub use core::AgentManager;
