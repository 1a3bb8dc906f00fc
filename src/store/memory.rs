use super::{rank_states, MachineStore, SimilarState, StoreError};
use crate::checkpoint::Checkpoint;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Process-local store, mostly for tests and short-lived agents.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    machines: RwLock<HashMap<String, Checkpoint>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.machines.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.read().is_empty()
    }
}

impl MachineStore for InMemoryStore {
    fn save(&self, checkpoint: &Checkpoint) -> Result<(), StoreError> {
        debug!(machine = %checkpoint.name, "saving checkpoint in memory");
        self.machines
            .write()
            .insert(checkpoint.name.clone(), checkpoint.clone());
        Ok(())
    }

    fn load(&self, machine: &str) -> Result<Option<Checkpoint>, StoreError> {
        Ok(self.machines.read().get(machine).cloned())
    }

    fn search_similar(
        &self,
        query: &[f32],
        top_k: usize,
    ) -> Result<Vec<SimilarState>, StoreError> {
        let machines = self.machines.read();
        Ok(rank_states(machines.values(), query, top_k))
    }
}
