//! Cross-domain nearest-neighbor search.
//!
//! Each domain is scanned for its own top-k by cosine similarity, then the
//! per-domain lists are merged through a heap holding one head per domain.
//! Only records with the query's dimension take part.

use crate::rank::{Scored, TopK};
use crate::{EngineError, Result};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use vecgate_fixed::{cosine_similarity, Metric, I256};
use vecgate_registry::{BlockHeight, Domain, GlobalId, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    pub global_id: GlobalId,
    /// Cosine similarity at scale 1e18.
    pub score: I256,
    pub domain: Domain,
}

/// Head of one domain's ranked list inside the merge heap.
#[derive(Debug, PartialEq, Eq)]
struct Head {
    hit: Scored,
    lane: usize,
    pos: usize,
}

impl Ord for Head {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the greatest; the better hit must compare greater
        other.hit.cmp_by(&self.hit, Metric::Cosine)
    }
}

impl PartialOrd for Head {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best top-k of one domain. Reads only; expired records are filtered.
fn scan_domain(
    registry: &Registry,
    domain: Domain,
    query: &[i128],
    k: usize,
    block: BlockHeight,
) -> Result<Vec<Scored>> {
    let mut best = TopK::new(Metric::Cosine, k);
    registry
        .live_in_domain(domain, block)
        .filter(|r| r.components.len() == query.len())
        .try_for_each(|record| -> Result<()> {
            let similarity = cosine_similarity(query, &record.components)?;
            best.push(Scored::new(record.global_id, similarity));
            Ok(())
        })?;
    Ok(best.into_vec())
}

/// Search every domain for the `k` vectors most similar to `query`.
///
/// Results are ordered by similarity descending, ties by lowest global id.
pub fn global_search(
    registry: &Registry,
    query: &[i128],
    k: usize,
    block: BlockHeight,
) -> Result<Vec<SearchHit>> {
    if k == 0 {
        return Err(EngineError::InvalidParameter("k must be > 0".to_string()));
    }
    registry.validate_vector(query)?;

    let lanes: Vec<(Domain, Vec<Scored>)> = Domain::ALL
        .iter()
        .map(|&d| scan_domain(registry, d, query, k, block).map(|hits| (d, hits)))
        .collect::<Result<_>>()?;

    let mut heap = BinaryHeap::with_capacity(lanes.len());
    for (lane, (_, hits)) in lanes.iter().enumerate() {
        if let Some(&hit) = hits.first() {
            heap.push(Head { hit, lane, pos: 0 });
        }
    }

    let available: usize = lanes.iter().map(|(_, hits)| hits.len()).sum();
    let mut merged = Vec::with_capacity(k.min(available));
    while merged.len() < k {
        let Some(head) = heap.pop() else {
            break;
        };
        let (domain, hits) = &lanes[head.lane];
        merged.push(SearchHit {
            global_id: head.hit.id,
            score: head.hit.score,
            domain: *domain,
        });
        if let Some(&next) = hits.get(head.pos + 1) {
            heap.push(Head {
                hit: next,
                lane: head.lane,
                pos: head.pos + 1,
            });
        }
    }

    tracing::trace!(k, returned = merged.len(), "global search");
    Ok(merged)
}
