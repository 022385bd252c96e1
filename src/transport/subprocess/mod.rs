//! Subprocess transport for the Claude Code CLI
//!
//! Spawns the CLI in stream-json mode as a child in its own process group and
//! talks to it over stdin/stdout.

mod command;
mod config;
mod lifecycle;
mod process;

pub use command::CommandBuilder;
pub use config::{BASE_ARGS, DANGEROUS_ENV_VARS};
pub use process::{AgentProcess, find_cli};
