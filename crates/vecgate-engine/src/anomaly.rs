//! Anomaly scoring against a domain's calibrated statistic.
//!
//! The score is the root-mean-square z-score of the query over all
//! components, in fixed point. Scoring only reads the statistic; it is
//! updated through `Registry::calibrate` and `Registry::recalibrate`.

use crate::{check_dimension, EngineError, Result};
use vecgate_fixed::{isqrt, FixedError, I256, ONE, SCALE};
use vecgate_registry::{Domain, Registry};

/// Scores above three standard deviations are anomalous.
pub const ANOMALY_THRESHOLD: I256 = I256::new(3 * SCALE);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnomalyScore {
    /// RMS z-score at scale 1e18.
    pub score: I256,
    /// `score > ANOMALY_THRESHOLD`
    pub is_anomaly: bool,
}

pub fn anomaly_score(registry: &Registry, domain: Domain, query: &[i128]) -> Result<AnomalyScore> {
    registry.validate_vector(query)?;

    let stat = registry
        .statistic(domain)
        .filter(|s| s.count() > 0)
        .ok_or(EngineError::NotCalibrated(domain))?;
    check_dimension(stat.dimension() as usize, query.len())?;

    let moments = stat.moments(registry.anomaly_variance_floor());
    let mut acc = I256::ZERO;
    for (&q, m) in query.iter().zip(&moments) {
        let d = I256::from(q) - m.mean;
        // d² at 1e36, times 1e18, over variance at 1e36 → z² at 1e18
        let z2 = d
            .checked_mul(d)
            .and_then(|sq| sq.checked_mul(ONE))
            .ok_or(FixedError::Overflow)?
            / m.variance;
        acc = acc.checked_add(z2).ok_or(FixedError::Overflow)?;
    }

    let mean_z2 = acc / I256::from(query.len() as u64);
    let score = isqrt(mean_z2.checked_mul(ONE).ok_or(FixedError::Overflow)?)?;

    Ok(AnomalyScore {
        score,
        is_anomaly: score > ANOMALY_THRESHOLD,
    })
}
