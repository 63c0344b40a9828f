//! Deterministic ranking of scored candidates.
//!
//! Scores alone can tie, so every comparison falls back to the lowest global
//! id. This gives a strict total order and identical output on every node.

use std::cmp::Ordering;
use vecgate_fixed::{Metric, I256};
use vecgate_registry::GlobalId;

/// A candidate scored against a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scored {
    /// The vector's global id.
    pub id: GlobalId,
    /// Similarity or distance, depending on the metric.
    pub score: I256,
}

impl Scored {
    pub fn new(id: GlobalId, score: I256) -> Self {
        Self { id, score }
    }

    /// Better candidates sort first: best score, then lowest id.
    pub fn cmp_by(&self, other: &Self, metric: Metric) -> Ordering {
        metric
            .rank(&self.score, &other.score)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Bounded buffer of the best `k` candidates seen so far, best first.
///
/// Grows with the candidates actually pushed, never with `k`, and holds at
/// most `k` entries.
#[derive(Debug, Clone)]
pub struct TopK {
    metric: Metric,
    k: usize,
    best: Vec<Scored>,
}

impl TopK {
    pub fn new(metric: Metric, k: usize) -> Self {
        Self {
            metric,
            k,
            best: Vec::new(),
        }
    }

    pub fn push(&mut self, c: Scored) {
        if self.k == 0 {
            return;
        }
        if self.best.len() == self.k {
            match self.best.last() {
                Some(worst) if c.cmp_by(worst, self.metric) != Ordering::Less => return,
                _ => {}
            }
            self.best.pop();
        }
        let pos = self
            .best
            .partition_point(|x| x.cmp_by(&c, self.metric) == Ordering::Less);
        self.best.insert(pos, c);
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    pub fn into_vec(self) -> Vec<Scored> {
        self.best
    }
}

/// Keep the best `k` of `candidates`, best first.
pub fn top_k(
    metric: Metric,
    candidates: impl IntoIterator<Item = Scored>,
    k: usize,
) -> Vec<Scored> {
    let mut best = TopK::new(metric, k);
    for c in candidates {
        best.push(c);
    }
    best.into_vec()
}
