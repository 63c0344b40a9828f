//! k-NN classification over caller-supplied labeled references.

use crate::rank::Scored;
use crate::{check_dimension, EngineError, Result};
use std::collections::BTreeMap;
use vecgate_fixed::{cosine_similarity, ratio, Metric, I256};
use vecgate_registry::{BlockHeight, GlobalId, Registry};

/// A reference vector and its label. Call-scoped, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabeledReference {
    pub global_id: GlobalId,
    pub label: u32,
}

impl LabeledReference {
    pub fn new(global_id: GlobalId, label: u32) -> Self {
        Self { global_id, label }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Majority label among the top set.
    pub label: u32,
    /// Winner's vote share at scale 1e18.
    pub confidence: I256,
    /// Size of the top set that voted.
    pub considered: usize,
}

/// Classify `query` by majority vote among its `k` most similar references.
///
/// Missing or expired references are skipped; the call fails only if none
/// remain. Vote ties go to the lowest label.
pub fn classify(
    registry: &Registry,
    query: &[i128],
    refs: &[LabeledReference],
    k: usize,
    block: BlockHeight,
) -> Result<Classification> {
    if k == 0 {
        return Err(EngineError::InvalidParameter("k must be > 0".to_string()));
    }
    registry.validate_vector(query)?;

    let mut scored: Vec<(Scored, u32)> = Vec::with_capacity(refs.len());
    for r in refs {
        let Some(record) = registry.lookup(r.global_id, block) else {
            continue;
        };
        check_dimension(query.len(), record.components.len())?;
        let similarity = cosine_similarity(query, &record.components)?;
        scored.push((Scored::new(r.global_id, similarity), r.label));
    }

    if scored.is_empty() {
        return Err(EngineError::InsufficientReferences);
    }

    // Stable: duplicate references of one id keep their input order
    scored.sort_by(|(a, _), (b, _)| a.cmp_by(b, Metric::Cosine));
    let top = &scored[..k.min(scored.len())];

    let mut votes: BTreeMap<u32, u64> = BTreeMap::new();
    for (_, label) in top {
        *votes.entry(*label).or_default() += 1;
    }

    // Ascending label order; only a strictly larger count displaces the leader
    let mut winner = (0u32, 0u64);
    for (&label, &count) in &votes {
        if count > winner.1 {
            winner = (label, count);
        }
    }

    let confidence = ratio(winner.1, top.len() as u64)?;
    tracing::trace!(
        label = winner.0,
        votes = winner.1,
        considered = top.len(),
        "classified query"
    );

    Ok(Classification {
        label: winner.0,
        confidence,
        considered: top.len(),
    })
}
