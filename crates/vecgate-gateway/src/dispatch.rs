//! Call dispatch.
//!
//! One call runs: selector lookup, payload decode, cost quote, budget check,
//! execution, response encode. Everything before execution is free of side
//! effects, so a rejected call leaves the registry exactly as it was.

use crate::config::GatewayConfig;
use crate::cost::CostSchedule;
use crate::error::{GatewayError, Result};
use crate::request::{Request, Response};
use crate::selector::Selector;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, warn};
use vecgate_engine::{anomaly_score, classify, cluster_assign, global_search, similarity_gate};
use vecgate_observe::{
    obs_count, obs_gauge, obs_hist, GatewayEvt, GatewayKind, Meter, NoopMeter, RegistryEvt,
    RegistryKind, VizEvent,
};
use vecgate_registry::{BlockHeight, Identity, Registry};

/// Host-supplied context for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Identity,
    pub block_height: BlockHeight,
    /// Maximum cost the caller has pre-funded.
    pub budget: u64,
}

impl CallContext {
    pub fn new(caller: Identity, block_height: BlockHeight, budget: u64) -> Self {
        Self {
            caller,
            block_height,
            budget,
        }
    }
}

/// Encoded response plus the cost charged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    pub output: Bytes,
    pub cost: u64,
}

/// Dispatch boundary in front of one [`Registry`].
pub struct Gateway {
    registry: Registry,
    costs: CostSchedule,
    max_search_k: usize,
    meter: Arc<dyn Meter>,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Self::with_meter(config, Arc::new(NoopMeter))
    }

    pub fn with_meter(config: GatewayConfig, meter: Arc<dyn Meter>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry: Registry::new(config.registry)?,
            costs: config.costs,
            max_search_k: config.max_search_k,
            meter,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Host-side maintenance (quota provisioning, recalibration). Not reachable
    /// through any selector.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn costs(&self) -> &CostSchedule {
        &self.costs
    }

    /// Cost of a call without running it.
    pub fn quote(&self, selector: u32, payload: &[u8]) -> Result<u64> {
        let selector = Selector::try_from(selector)?;
        let request = Request::decode(selector, payload)?;
        Ok(self.costs.required(&request))
    }

    /// Run one encoded call.
    pub fn dispatch(
        &mut self,
        ctx: &CallContext,
        selector: u32,
        payload: &[u8],
    ) -> Result<CallOutcome> {
        let selector = Selector::try_from(selector)?;
        let request = Request::decode(selector, payload)?;
        let (response, cost) = self.execute(ctx, request)?;
        Ok(CallOutcome {
            output: response.encode(),
            cost,
        })
    }

    /// Run one typed call. Returns the response and the cost charged.
    pub fn execute(&mut self, ctx: &CallContext, request: Request) -> Result<(Response, u64)> {
        let selector = request.selector();
        let required = self.costs.required(&request);

        if ctx.budget < required {
            warn!(
                op = selector.name(),
                required,
                budget = ctx.budget,
                caller = %ctx.caller,
                "call rejected: insufficient budget"
            );
            obs_count!(self.meter, "vecgate_rejections_total", selector.labels(), 1);
            self.emit(selector, ctx, GatewayKind::Rejected {
                required,
                budget: ctx.budget,
            });
            return Err(GatewayError::InsufficientBudget {
                required,
                budget: ctx.budget,
            });
        }

        let result = if selector.is_mutating() {
            self.apply(ctx, request)
        } else {
            self.query(ctx, &request)
        };

        match result {
            Ok(response) => {
                debug!(
                    op = selector.name(),
                    cost = required,
                    block = ctx.block_height,
                    "dispatched"
                );
                obs_count!(self.meter, "vecgate_calls_total", selector.labels(), 1);
                obs_count!(self.meter, "vecgate_cost_total", selector.labels(), required);
                obs_hist!(self.meter, "vecgate_call_cost", selector.labels(), required);
                self.emit(selector, ctx, GatewayKind::Dispatched { cost: required });
                Ok((response, required))
            }
            Err(e) => {
                let code = e.code().as_u8();
                debug!(op = selector.name(), code, error = %e, "call failed");
                obs_count!(self.meter, "vecgate_failures_total", selector.labels(), 1);
                self.emit(selector, ctx, GatewayKind::Failed { code });
                Err(e)
            }
        }
    }

    /// Read-only operations. Never touches registry state.
    pub fn query(&self, ctx: &CallContext, request: &Request) -> Result<Response> {
        let block = ctx.block_height;
        let response = match request {
            Request::Lookup { global_id } => match self.registry.lookup(*global_id, block) {
                Some(record) => Response::Lookup {
                    exists: true,
                    vector: record.components.clone(),
                },
                None => Response::Lookup {
                    exists: false,
                    vector: Vec::new(),
                },
            },
            Request::Classify { query, refs, k } => {
                let c = classify(&self.registry, query, refs, *k as usize, block)?;
                Response::Classify {
                    label: c.label,
                    confidence: c.confidence,
                }
            }
            Request::ClusterAssign { query, centroids } => {
                let a = cluster_assign(&self.registry, query, centroids, block)?;
                Response::ClusterAssign {
                    centroid_id: a.centroid_id,
                    distance: a.distance,
                }
            }
            Request::AnomalyScore { domain, query } => {
                let s = anomaly_score(&self.registry, *domain, query)?;
                Response::AnomalyScore {
                    score: s.score,
                    is_anomaly: s.is_anomaly,
                }
            }
            Request::SimilarityGate { a, b, threshold } => {
                let g = similarity_gate(&self.registry, a, b, *threshold)?;
                Response::SimilarityGate {
                    passed: g.passed,
                    similarity: g.similarity,
                }
            }
            Request::GlobalSearch { query, k } => {
                let k = *k as usize;
                if k > self.max_search_k {
                    return Err(GatewayError::InvalidParameter(format!(
                        "k {} exceeds max_search_k {}",
                        k, self.max_search_k
                    )));
                }
                Response::GlobalSearch {
                    hits: global_search(&self.registry, query, k, block)?,
                }
            }
            Request::Register { .. } | Request::Sweep { .. } | Request::Calibrate { .. } => {
                return Err(GatewayError::InvalidParameter(format!(
                    "{} writes state and cannot run as a query",
                    request.selector()
                )));
            }
        };
        Ok(response)
    }

    fn apply(&mut self, ctx: &CallContext, request: Request) -> Result<Response> {
        let block = ctx.block_height;
        match request {
            Request::Register {
                domain,
                vector,
                tags,
                ttl_blocks,
            } => {
                let dimension = vector.len() as u32;
                let reg = self
                    .registry
                    .register(ctx.caller, domain, vector, tags, ttl_blocks, block)?;
                self.meter.emit(VizEvent::Registry(RegistryEvt {
                    domain: domain.as_u8(),
                    kind: RegistryKind::Registered {
                        global_id: reg.global_id,
                        dimension,
                    },
                }));
                self.publish_arena_size();
                Ok(Response::Register {
                    global_id: reg.global_id,
                    remaining_quota: reg.remaining_quota,
                })
            }
            Request::Sweep { domain, max_count } => {
                let report = self.registry.sweep(domain, max_count, block)?;
                self.meter.emit(VizEvent::Registry(RegistryEvt {
                    domain: domain.as_u8(),
                    kind: RegistryKind::Swept {
                        removed: report.removed,
                        credited: report.credited,
                    },
                }));
                self.publish_arena_size();
                Ok(Response::Sweep {
                    removed: report.removed,
                    credited: report.credited,
                })
            }
            Request::Calibrate { domain, vector } => {
                let observations = self.registry.calibrate(domain, &vector)?;
                self.meter.emit(VizEvent::Registry(RegistryEvt {
                    domain: domain.as_u8(),
                    kind: RegistryKind::Calibrated { observations },
                }));
                Ok(Response::Calibrate { observations })
            }
            read => self.query(ctx, &read),
        }
    }

    fn publish_arena_size(&self) {
        obs_gauge!(self.meter, "vecgate_arena_records", &[], self.registry.arena().len());
    }

    fn emit(&self, selector: Selector, ctx: &CallContext, kind: GatewayKind) {
        self.meter.emit(VizEvent::Gateway(GatewayEvt {
            selector: selector.name(),
            block: ctx.block_height,
            kind,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecgate_registry::Domain;
    use vecgate_testkit::{identity, vector};

    fn ctx(budget: u64) -> CallContext {
        CallContext::new(identity(1), 10, budget)
    }

    #[test]
    fn test_query_refuses_mutation() {
        let gw = Gateway::new(GatewayConfig::default()).unwrap();
        let req = Request::Sweep {
            domain: Domain::General,
            max_count: 1,
        };
        assert!(matches!(
            gw.query(&ctx(u64::MAX), &req),
            Err(GatewayError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_exact_budget_suffices() {
        let mut gw = Gateway::new(GatewayConfig::default()).unwrap();
        let (resp, cost) = gw
            .execute(&ctx(20_000), Request::Lookup { global_id: 1 })
            .unwrap();
        assert_eq!(cost, 20_000);
        assert_eq!(
            resp,
            Response::Lookup {
                exists: false,
                vector: vec![]
            }
        );

        assert_eq!(
            gw.execute(&ctx(19_999), Request::Lookup { global_id: 1 }),
            Err(GatewayError::InsufficientBudget {
                required: 20_000,
                budget: 19_999
            })
        );
    }

    #[test]
    fn test_search_k_capped() {
        let mut gw = Gateway::new(GatewayConfig::default().with_max_search_k(2)).unwrap();
        let err = gw
            .execute(
                &ctx(u64::MAX),
                Request::GlobalSearch {
                    query: vector(&[1.0]),
                    k: 3,
                },
            )
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidParameter(_)));

        let mut gw = Gateway::new(
            GatewayConfig::default().with_max_search_k(crate::config::HARD_MAX_SEARCH_K),
        )
        .unwrap();
        let err = gw
            .execute(
                &ctx(u64::MAX),
                Request::GlobalSearch {
                    query: vector(&[1.0]),
                    k: u32::MAX,
                },
            )
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidParameter(_)));
    }

    #[test]
    fn test_quote_matches_charge() {
        let mut gw = Gateway::new(GatewayConfig::default()).unwrap();
        let req = Request::Calibrate {
            domain: Domain::Content,
            vector: vector(&[1.0, 2.0, 3.0]),
        };
        let quoted = gw
            .quote(Selector::Calibrate.as_u32(), &req.encode())
            .unwrap();
        let out = gw
            .dispatch(&ctx(u64::MAX), Selector::Calibrate.as_u32(), &req.encode())
            .unwrap();
        assert_eq!(quoted, 30_150);
        assert_eq!(out.cost, quoted);
    }
}
