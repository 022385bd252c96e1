//! Agent listing functionality
//!
//! Registry snapshots, point lookups and fork lineage.

use crate::error::Result;
use crate::types::agent::{AgentInfo, Lineage};
use crate::types::identifiers::SessionId;

use super::core::AgentManager;

impl AgentManager {
    /// Snapshot of every registered agent, oldest first
    #[must_use]
    pub fn list(&self) -> Vec<AgentInfo> {
        self.registry.snapshot()
    }

    /// Whether an agent named `name` is registered
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Metadata for one agent
    ///
    /// # Errors
    /// `NotFound` if `name` is not registered
    pub fn agent_info(&self, name: &str) -> Result<AgentInfo> {
        Ok(self.registry.get(name)?.info())
    }

    /// Fork ancestry of one agent
    ///
    /// # Errors
    /// `NotFound` if `name` is not registered
    pub fn get_lineage(&self, name: &str) -> Result<Lineage> {
        Ok(self.registry.get(name)?.lineage())
    }

    /// Every registered agent resumed from `session_id`
    #[must_use]
    pub fn list_forks(&self, session_id: &SessionId) -> Vec<AgentInfo> {
        self.registry
            .snapshot()
            .into_iter()
            .filter(|info| info.forked_from.as_ref() == Some(session_id))
            .collect()
    }
}
