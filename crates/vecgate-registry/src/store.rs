//! The registry: the single store shared by every engine.
//!
//! Readers take `&Registry` and filter expired records on the fly. Only
//! [`Registry::register`], [`Registry::sweep`] and the calibration calls take
//! `&mut Registry`, so a read path cannot evict or otherwise mutate.

use crate::arena::VectorArena;
use crate::config::RegistryConfig;
use crate::index::DomainIndex;
use crate::quota::{QuotaEntry, QuotaLedger};
use crate::stats::AnomalyStatistic;
use crate::types::{BlockHeight, Domain, GlobalId, Identity, Tag, VectorRecord};
use crate::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use vecgate_fixed::I256;

/// Result of a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub global_id: GlobalId,
    /// Quota debited for this record.
    pub cost: u128,
    /// Registrant's quota left after the debit.
    pub remaining_quota: u128,
}

/// Result of a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub removed: u32,
    /// Total quota credited back to owners.
    pub credited: u128,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    config: RegistryConfig,
    arena: VectorArena,
    index: DomainIndex,
    quota: QuotaLedger,
    stats: BTreeMap<Domain, AnomalyStatistic>,
}

impl Registry {
    pub fn new(config: RegistryConfig) -> Result<Self> {
        config.validate()?;
        let quota = QuotaLedger::new(config.default_quota as u128);
        Ok(Self {
            config,
            arena: VectorArena::new(),
            index: DomainIndex::new(),
            quota,
            stats: BTreeMap::new(),
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn arena(&self) -> &VectorArena {
        &self.arena
    }

    pub fn index(&self) -> &DomainIndex {
        &self.index
    }

    pub fn quota(&self) -> &QuotaLedger {
        &self.quota
    }

    pub fn statistic(&self, domain: Domain) -> Option<&AnomalyStatistic> {
        self.stats.get(&domain)
    }

    /// Check a vector's dimension and component bounds.
    pub fn validate_vector(&self, components: &[i128]) -> Result<()> {
        let dimension = components.len();
        if dimension == 0 || dimension > self.config.max_dim {
            return Err(Error::InvalidDimension {
                dimension,
                max: self.config.max_dim,
            });
        }

        let bound = self.config.max_abs_component();
        if let Some(index) = components.iter().position(|c| c.unsigned_abs() > bound as u128) {
            return Err(Error::ComponentOutOfRange { index });
        }
        Ok(())
    }

    /// Quota charged for a vector of `dimension` with `tags` distinct tags.
    pub fn registration_cost(&self, dimension: usize, tags: usize) -> u128 {
        let c = &self.config;
        c.quota_base_cost as u128
            + c.quota_cost_per_dimension as u128 * dimension as u128
            + c.quota_cost_per_tag as u128 * tags as u128
    }

    /// Register a vector.
    ///
    /// Validation and the quota check run before anything is written, so a
    /// failed registration leaves the registry untouched.
    pub fn register(
        &mut self,
        owner: Identity,
        domain: Domain,
        components: Vec<i128>,
        tags: Vec<Tag>,
        ttl_blocks: u64,
        block: BlockHeight,
    ) -> Result<Registration> {
        self.validate_vector(&components)?;
        if tags.len() > self.config.max_tags {
            return Err(Error::TooManyTags {
                count: tags.len(),
                max: self.config.max_tags,
            });
        }

        let tags: BTreeSet<Tag> = tags.into_iter().collect();
        let cost = self.registration_cost(components.len(), tags.len());
        self.quota.check(&owner, cost)?;

        let global_id = self.arena.next_id();
        let record = VectorRecord {
            global_id,
            domain,
            owner,
            components,
            tags,
            registered_at: block,
            ttl_blocks,
            quota_cost: cost,
        };
        let expires_at = record.expires_at();
        let dimension = record.dimension();

        let remaining_quota = self.quota.debit(owner, cost)?;
        let slot = self.arena.push(record);
        self.index.insert(domain, global_id, slot, expires_at);

        tracing::debug!(
            global_id,
            %domain,
            %owner,
            dimension,
            cost = %cost,
            "registered vector"
        );

        Ok(Registration {
            global_id,
            cost,
            remaining_quota,
        })
    }

    /// Look up a record as readers at `block` see it.
    ///
    /// Expired records are reported absent even if a sweep has not yet
    /// reclaimed them.
    pub fn lookup(&self, id: GlobalId, block: BlockHeight) -> Option<&VectorRecord> {
        self.arena.get(id).filter(|r| r.is_live_at(block))
    }

    /// Live records of a domain in ascending id order.
    pub fn live_in_domain(
        &self,
        domain: Domain,
        block: BlockHeight,
    ) -> impl Iterator<Item = &VectorRecord> + '_ {
        self.index
            .members(domain)
            .filter_map(move |(_, slot)| self.arena.slot(slot))
            .filter(move |r| r.is_live_at(block))
    }

    /// Physically remove up to `max_count` records of `domain` expired at
    /// `block`, crediting each owner with the record's original cost.
    pub fn sweep(
        &mut self,
        domain: Domain,
        max_count: u32,
        block: BlockHeight,
    ) -> Result<SweepReport> {
        if max_count == 0 {
            return Err(Error::InvalidParameter(
                "max_count must be > 0".to_string(),
            ));
        }

        let due: Vec<GlobalId> = self
            .index
            .due(domain, block)
            .take(max_count as usize)
            .collect();

        let mut report = SweepReport::default();
        for id in due {
            let Some(record) = self.arena.reclaim(id) else {
                continue;
            };
            self.index.remove(domain, id, record.expires_at());
            self.quota.credit(record.owner, record.quota_cost);
            report.removed += 1;
            report.credited += record.quota_cost;
        }

        tracing::info!(
            %domain,
            block,
            removed = report.removed,
            credited = %report.credited,
            "swept expired vectors"
        );
        Ok(report)
    }

    /// Fold one observation into a domain's anomaly statistic.
    ///
    /// The first observation fixes the statistic's dimension.
    pub fn calibrate(&mut self, domain: Domain, components: &[i128]) -> Result<u64> {
        self.validate_vector(components)?;
        let stat = self
            .stats
            .entry(domain)
            .or_insert_with(|| AnomalyStatistic::new(components.len() as u32));
        let observed = stat.observe(components);
        if stat.count() == 0 {
            self.stats.remove(&domain);
        }
        observed
    }

    /// Rebuild a domain's statistic from its live records.
    ///
    /// Keeps the current statistic's dimension, or adopts the dimension of the
    /// first live record. Records of any other dimension are ignored. Returns
    /// the number of observations in the rebuilt statistic.
    pub fn recalibrate(&mut self, domain: Domain, block: BlockHeight) -> Result<u64> {
        let dimension = match self.stats.get(&domain) {
            Some(stat) => Some(stat.dimension()),
            None => self.live_in_domain(domain, block).next().map(|r| r.dimension()),
        };
        let Some(dimension) = dimension else {
            return Ok(0);
        };

        let mut rebuilt = AnomalyStatistic::new(dimension);
        for record in self.live_in_domain(domain, block) {
            if record.dimension() == dimension {
                rebuilt.observe(&record.components)?;
            }
        }

        let count = rebuilt.count();
        if count == 0 {
            self.stats.remove(&domain);
        } else {
            self.stats.insert(domain, rebuilt);
        }
        tracing::info!(%domain, block, dimension, count, "recalibrated anomaly statistic");
        Ok(count)
    }

    /// Provision a registrant's quota limit.
    pub fn set_quota_limit(&mut self, who: Identity, limit: u128) -> QuotaEntry {
        self.quota.set_limit(who, limit)
    }

    /// Variance floor used by anomaly scoring, scale 1e36.
    pub fn anomaly_variance_floor(&self) -> I256 {
        self.config.anomaly_variance_floor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecgate_fixed::SCALE;

    fn alice() -> Identity {
        Identity::new([0xa1; 20])
    }

    fn bob() -> Identity {
        Identity::new([0xb0; 20])
    }

    fn registry() -> Registry {
        Registry::new(RegistryConfig::default().with_max_dim(8).with_max_tags(2)).unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut reg = registry();
        let v = vec![SCALE, -SCALE, 0];
        let r = reg
            .register(alice(), Domain::General, v.clone(), vec![], 0, 10)
            .unwrap();
        assert_eq!(r.global_id, 1);
        assert_eq!(r.cost, 3);
        assert_eq!(r.remaining_quota, 1_000_000 - 3);

        let record = reg.lookup(1, 10).unwrap();
        assert_eq!(record.components, v);
        assert_eq!(record.owner, alice());
        assert!(reg.lookup(2, 10).is_none());
    }

    #[test]
    fn test_ids_are_strictly_increasing() {
        let mut reg = registry();
        let mut last = 0;
        for i in 0..5 {
            let r = reg
                .register(alice(), Domain::ALL[i % 3], vec![SCALE], vec![], 1, 0)
                .unwrap();
            assert!(r.global_id > last);
            last = r.global_id;
        }
    }

    #[test]
    fn test_validation_failures_leave_state_untouched() {
        let mut reg = registry();
        let before = reg.clone();

        assert!(matches!(
            reg.register(alice(), Domain::General, vec![], vec![], 0, 0),
            Err(Error::InvalidDimension { dimension: 0, .. })
        ));
        assert!(matches!(
            reg.register(alice(), Domain::General, vec![0; 9], vec![], 0, 0),
            Err(Error::InvalidDimension { dimension: 9, .. })
        ));
        assert!(matches!(
            reg.register(alice(), Domain::General, vec![0], vec![Tag([1; 32]); 3], 0, 0),
            Err(Error::TooManyTags { count: 3, max: 2 })
        ));
        assert!(matches!(
            reg.register(alice(), Domain::General, vec![0, i128::MAX], vec![], 0, 0),
            Err(Error::ComponentOutOfRange { index: 1 })
        ));

        reg.set_quota_limit(bob(), 2);
        let before_quota = reg.clone();
        assert!(matches!(
            reg.register(bob(), Domain::General, vec![0; 3], vec![], 0, 0),
            Err(Error::QuotaExceeded { required: 3, remaining: 2 })
        ));

        assert_eq!(reg, before_quota);
        assert_eq!(reg.arena().allocated(), before.arena().allocated());
    }

    #[test]
    fn test_duplicate_tags_charged_once() {
        let mut reg = registry();
        let t = Tag([7; 32]);
        let r = reg
            .register(alice(), Domain::Social, vec![SCALE], vec![t, t], 0, 0)
            .unwrap();
        assert_eq!(r.cost, 1 + 8);
        assert_eq!(reg.lookup(r.global_id, 0).unwrap().tags.len(), 1);
    }

    #[test]
    fn test_expired_records_hidden_from_reads() {
        let mut reg = registry();
        reg.register(alice(), Domain::Gaming, vec![SCALE], vec![], 5, 100)
            .unwrap();
        reg.register(alice(), Domain::Gaming, vec![SCALE], vec![], 0, 100)
            .unwrap();

        assert!(reg.lookup(1, 104).is_some());
        assert!(reg.lookup(1, 105).is_none());
        assert_eq!(reg.live_in_domain(Domain::Gaming, 104).count(), 2);
        assert_eq!(reg.live_in_domain(Domain::Gaming, 105).count(), 1);
        // Still physically present until swept
        assert!(reg.arena().get(1).is_some());
    }

    #[test]
    fn test_sweep_credits_quota() {
        let mut reg = registry();
        let r1 = reg
            .register(alice(), Domain::Finance, vec![SCALE; 4], vec![], 10, 0)
            .unwrap();
        let r2 = reg
            .register(bob(), Domain::Finance, vec![SCALE; 2], vec![], 20, 0)
            .unwrap();
        reg.register(alice(), Domain::Finance, vec![SCALE], vec![], 0, 0)
            .unwrap();
        assert_eq!(reg.quota().used(&alice()), r1.cost + 1);

        // Nothing due yet
        let report = reg.sweep(Domain::Finance, 10, 9).unwrap();
        assert_eq!(report, SweepReport::default());

        let report = reg.sweep(Domain::Finance, 10, 15).unwrap();
        assert_eq!(report.removed, 1);
        assert_eq!(report.credited, r1.cost);
        assert_eq!(reg.quota().used(&alice()), 1);
        assert!(reg.arena().get(r1.global_id).is_none());
        assert_eq!(reg.index().len(Domain::Finance), 2);

        let report = reg.sweep(Domain::Finance, 10, 100).unwrap();
        assert_eq!(report.removed, 1);
        assert_eq!(reg.quota().used(&bob()), 0);
        assert!(reg.arena().get(r2.global_id).is_none());
    }

    #[test]
    fn test_sweep_respects_max_count_and_domain() {
        let mut reg = registry();
        for _ in 0..5 {
            reg.register(alice(), Domain::Content, vec![SCALE], vec![], 1, 0)
                .unwrap();
        }
        reg.register(alice(), Domain::Training, vec![SCALE], vec![], 1, 0)
            .unwrap();

        assert_eq!(reg.sweep(Domain::Content, 2, 50).unwrap().removed, 2);
        assert_eq!(reg.sweep(Domain::Content, 10, 50).unwrap().removed, 3);
        assert_eq!(reg.index().len(Domain::Training), 1);
        assert!(matches!(
            reg.sweep(Domain::Content, 0, 50),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_calibrate_fixes_dimension() {
        let mut reg = registry();
        assert_eq!(reg.calibrate(Domain::General, &[SCALE, 0]).unwrap(), 1);
        assert_eq!(reg.calibrate(Domain::General, &[0, SCALE]).unwrap(), 2);
        assert!(matches!(
            reg.calibrate(Domain::General, &[SCALE]),
            Err(Error::DimensionMismatch { expected: 2, actual: 1 })
        ));
        assert_eq!(reg.statistic(Domain::General).unwrap().count(), 2);
        assert!(reg.statistic(Domain::Social).is_none());
    }

    #[test]
    fn test_recalibrate_from_live_records() {
        let mut reg = registry();
        reg.register(alice(), Domain::Social, vec![SCALE, 0], vec![], 0, 0)
            .unwrap();
        reg.register(alice(), Domain::Social, vec![0, SCALE], vec![], 5, 0)
            .unwrap();
        reg.register(alice(), Domain::Social, vec![SCALE], vec![], 0, 0)
            .unwrap();

        assert_eq!(reg.recalibrate(Domain::Social, 1).unwrap(), 2);
        assert_eq!(reg.statistic(Domain::Social).unwrap().dimension(), 2);
        // Second record has expired
        assert_eq!(reg.recalibrate(Domain::Social, 10).unwrap(), 1);
        assert_eq!(reg.recalibrate(Domain::Finance, 10).unwrap(), 0);
        assert!(reg.statistic(Domain::Finance).is_none());
    }

    proptest::proptest! {
        #[test]
        fn prop_quota_conservation(
            dims in proptest::collection::vec(1usize..8, 1..20),
            sweep_at in 0u64..40,
        ) {
            let mut reg = registry();
            let mut costs = Vec::new();
            for (i, d) in dims.iter().enumerate() {
                let ttl = (i as u64 % 4) * 10;
                let r = reg
                    .register(alice(), Domain::General, vec![SCALE; *d], vec![], ttl, 0)
                    .unwrap();
                costs.push((r.cost, ttl));
            }
            let total: u128 = costs.iter().map(|(c, _)| c).sum();
            proptest::prop_assert_eq!(reg.quota().used(&alice()), total);

            let report = reg.sweep(Domain::General, u32::MAX, sweep_at).unwrap();
            let reclaimed: u128 = costs
                .iter()
                .filter(|(_, ttl)| *ttl != 0 && *ttl <= sweep_at)
                .map(|(c, _)| c)
                .sum();
            proptest::prop_assert_eq!(report.credited, reclaimed);
            proptest::prop_assert_eq!(reg.quota().used(&alice()), total - reclaimed);
        }
    }
}
