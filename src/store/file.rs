use super::{rank_states, MachineStore, SimilarState, StoreError};
use crate::checkpoint::Checkpoint;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One pretty-printed JSON file per machine, named `<machine>.json`.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write never leaves a torn checkpoint behind.
/// Similarity search skips `.json` files that are not checkpoints.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, machine: &str) -> Result<PathBuf, StoreError> {
        let valid = !machine.is_empty()
            && machine != "."
            && machine != ".."
            && !machine.contains(['/', '\\']);
        if !valid {
            return Err(StoreError::InvalidName(machine.to_string()));
        }
        Ok(self.dir.join(format!("{machine}.json")))
    }
}

impl MachineStore for JsonFileStore {
    fn save(&self, checkpoint: &Checkpoint) -> Result<(), StoreError> {
        let path = self.path_for(&checkpoint.name)?;
        let json = checkpoint.to_json()?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;

        debug!(machine = %checkpoint.name, path = %path.display(), "checkpoint written");
        Ok(())
    }

    fn load(&self, machine: &str) -> Result<Option<Checkpoint>, StoreError> {
        let path = self.path_for(machine)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(Checkpoint::from_json(&json)?))
    }

    fn search_similar(
        &self,
        query: &[f32],
        top_k: usize,
    ) -> Result<Vec<SimilarState>, StoreError> {
        let mut checkpoints = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            let json = fs::read_to_string(&path)?;
            match Checkpoint::from_json(&json) {
                Ok(checkpoint) => checkpoints.push(checkpoint),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable checkpoint");
                }
            }
        }
        Ok(rank_states(&checkpoints, query, top_k))
    }
}
