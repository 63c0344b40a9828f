//! Nearest-centroid assignment.

use crate::rank::Scored;
use crate::{check_dimension, EngineError, Result};
use std::cmp::Ordering;
use vecgate_fixed::{euclidean_distance, Metric, I256};
use vecgate_registry::{BlockHeight, GlobalId, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub centroid_id: GlobalId,
    /// Euclidean distance at scale 1e18.
    pub distance: I256,
}

/// Assign `query` to the nearest resolvable centroid.
///
/// Missing or expired centroids are skipped. Equal distances go to the
/// lowest centroid id.
pub fn cluster_assign(
    registry: &Registry,
    query: &[i128],
    centroid_ids: &[GlobalId],
    block: BlockHeight,
) -> Result<Assignment> {
    registry.validate_vector(query)?;

    let mut best: Option<Scored> = None;
    for &id in centroid_ids {
        let Some(centroid) = registry.lookup(id, block) else {
            continue;
        };
        check_dimension(query.len(), centroid.components.len())?;
        let candidate = Scored::new(id, euclidean_distance(query, &centroid.components)?);

        best = match best {
            Some(b) if b.cmp_by(&candidate, Metric::Euclidean) != Ordering::Greater => Some(b),
            _ => Some(candidate),
        };
    }

    let best = best.ok_or(EngineError::NoCentroidsAvailable)?;
    Ok(Assignment {
        centroid_id: best.id,
        distance: best.score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecgate_fixed::SCALE;
    use vecgate_registry::{Domain, RegistryConfig};
    use vecgate_testkit::{identity, vector};

    fn registry() -> Registry {
        let mut reg = Registry::new(RegistryConfig::default()).unwrap();
        let centroids: [(&[f64], u64); 4] = [
            (&[0.0, 0.0], 0),
            (&[10.0, 0.0], 0),
            (&[0.0, 10.0], 3),
            (&[10.0, 0.0], 0),
        ];
        for (v, ttl) in centroids {
            reg.register(identity(2), Domain::General, vector(v), vec![], ttl, 0)
                .unwrap();
        }
        reg
    }

    #[test]
    fn test_nearest_centroid() {
        let reg = registry();
        let a = cluster_assign(&reg, &vector(&[1.0, 9.0]), &[1, 2, 3], 0).unwrap();
        assert_eq!(a.centroid_id, 3);
        assert_eq!(a.distance, I256::new(1_414_213_562_373_095_048));

        let a = cluster_assign(&reg, &vector(&[3.0, 4.0]), &[2, 1], 0).unwrap();
        assert_eq!(a.centroid_id, 1);
        assert_eq!(a.distance, I256::new(5 * SCALE));
    }

    #[test]
    fn test_tie_goes_to_lowest_id() {
        let reg = registry();
        let a = cluster_assign(&reg, &vector(&[9.0, 0.0]), &[4, 2], 0).unwrap();
        assert_eq!(a.centroid_id, 2);
    }

    #[test]
    fn test_expired_centroid_skipped() {
        let reg = registry();
        let a = cluster_assign(&reg, &vector(&[1.0, 9.0]), &[1, 3], 3).unwrap();
        assert_eq!(a.centroid_id, 1);
    }

    #[test]
    fn test_no_centroids() {
        let reg = registry();
        assert_eq!(
            cluster_assign(&reg, &vector(&[1.0, 1.0]), &[3, 42], 10),
            Err(EngineError::NoCentroidsAvailable)
        );
        assert_eq!(
            cluster_assign(&reg, &vector(&[1.0, 1.0]), &[], 0),
            Err(EngineError::NoCentroidsAvailable)
        );
        assert!(matches!(
            cluster_assign(&reg, &vector(&[1.0]), &[1], 0),
            Err(EngineError::InvalidDimension { .. })
        ));
    }
}
