//! Persistence backends for checkpoints.
//!
//! A [`MachineStore`] keeps one [`Checkpoint`] per machine name and can rank
//! saved states by embedding similarity.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::InMemoryStore;

use crate::checkpoint::{Checkpoint, CheckpointError};
use crate::core::StateId;
use std::cmp::Ordering;
use thiserror::Error;

/// Errors raised by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error("Invalid machine name '{0}'")]
    InvalidName(String),
}

/// One similarity hit.
#[derive(Clone, Debug, PartialEq)]
pub struct SimilarState {
    pub state_id: StateId,
    pub machine: String,
    pub state_name: String,
    /// Cosine similarity in `[-1, 1]`
    pub score: f32,
}

/// Where checkpoints live.
pub trait MachineStore: Send + Sync {
    /// Save, replacing any checkpoint stored under the same machine name.
    fn save(&self, checkpoint: &Checkpoint) -> Result<(), StoreError>;

    /// Load the checkpoint saved under `machine`, if any.
    fn load(&self, machine: &str) -> Result<Option<Checkpoint>, StoreError>;

    /// Saved states closest to `query`, best first. States without an
    /// embedding, or with one of a different length, are skipped.
    fn search_similar(&self, query: &[f32], top_k: usize)
        -> Result<Vec<SimilarState>, StoreError>;
}

/// Cosine similarity, or `None` when lengths differ or a vector is zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a * norm_b))
}

/// Score every embedded state in `checkpoints` and keep the best `top_k`.
pub(crate) fn rank_states<'a, I>(checkpoints: I, query: &[f32], top_k: usize) -> Vec<SimilarState>
where
    I: IntoIterator<Item = &'a Checkpoint>,
{
    let mut hits: Vec<SimilarState> = checkpoints
        .into_iter()
        .flat_map(|checkpoint| {
            checkpoint.states.iter().filter_map(move |state| {
                let embedding = state.metadata().embedding.as_deref()?;
                let score = cosine_similarity(query, embedding)?;
                Some(SimilarState {
                    state_id: state.id(),
                    machine: checkpoint.name.clone(),
                    state_name: state.name().to_string(),
                    score,
                })
            })
        })
        .collect();

    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    hits.truncate(top_k);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let score = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();

        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        let score = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();

        assert!(score.abs() < 1e-6);
    }

    #[test]
    fn cosine_rejects_mismatched_or_zero_vectors() {
        assert!(cosine_similarity(&[1.0], &[1.0, 0.0]).is_none());
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).is_none());
        assert!(cosine_similarity(&[], &[]).is_none());
    }
}
