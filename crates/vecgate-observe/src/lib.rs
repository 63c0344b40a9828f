//! vecgate-observe: vendor-neutral observability ABI.
//!
//! The gateway depends only on these traits and event types. Backends live elsewhere.

pub trait Counter: Send + Sync {
    fn inc(&self, v: u64);
}
pub trait Gauge: Send + Sync {
    fn set(&self, v: i64);
}
pub trait Histogram: Send + Sync {
    fn observe(&self, v: f64);
}

pub type Labels = &'static [(&'static str, &'static str)];

pub trait Meter: Send + Sync + 'static {
    fn counter(&self, name: &'static str, labels: Labels) -> Box<dyn Counter>;
    fn gauge(&self, name: &'static str, labels: Labels) -> Box<dyn Gauge>;
    fn histo(
        &self,
        name: &'static str,
        _buckets: &'static [f64],
        labels: Labels,
    ) -> Box<dyn Histogram>;
    fn emit(&self, evt: VizEvent);
}

/// A do-nothing meter for tests and hosts that don't care about telemetry.
#[derive(Clone, Default)]
pub struct NoopMeter;
struct NoopC;
impl Counter for NoopC {
    fn inc(&self, _v: u64) {}
}
struct NoopG;
impl Gauge for NoopG {
    fn set(&self, _v: i64) {}
}
struct NoopH;
impl Histogram for NoopH {
    fn observe(&self, _v: f64) {}
}
impl Meter for NoopMeter {
    fn counter(&self, _n: &'static str, _l: Labels) -> Box<dyn Counter> {
        Box::new(NoopC)
    }
    fn gauge(&self, _n: &'static str, _l: Labels) -> Box<dyn Gauge> {
        Box::new(NoopG)
    }
    fn histo(&self, _n: &'static str, _b: &'static [f64], _l: Labels) -> Box<dyn Histogram> {
        Box::new(NoopH)
    }
    fn emit(&self, _e: VizEvent) {}
}

/// Typed events for live visualization (vector contents never included).
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VizEvent {
    Gateway(GatewayEvt),
    Registry(RegistryEvt),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayEvt {
    pub selector: &'static str,
    pub block: u64,
    pub kind: GatewayKind,
}
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayKind {
    /// Call ran to completion and was charged `cost`
    Dispatched { cost: u64 },
    /// Pre-flight budget check failed; nothing executed
    Rejected { required: u64, budget: u64 },
    /// Call was paid for but the operation returned an error
    Failed { code: u8 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryEvt {
    pub domain: u8,
    pub kind: RegistryKind,
}
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryKind {
    Registered { global_id: u64, dimension: u32 },
    Swept { removed: u32, credited: u128 },
    Calibrated { observations: u64 },
}

/// Macros (simple versions). Can be feature-gated if desired.
#[macro_export]
macro_rules! obs_count {
    ($m:expr, $name:expr, $labels:expr, $v:expr) => {{
        $m.counter($name, $labels).inc($v as u64);
    }};
}
#[macro_export]
macro_rules! obs_gauge {
    ($m:expr, $name:expr, $labels:expr, $v:expr) => {{
        $m.gauge($name, $labels).set($v as i64);
    }};
}
#[macro_export]
macro_rules! obs_hist {
    ($m:expr, $name:expr, $labels:expr, $v:expr) => {{
        $m.histo($name, &[], $labels).observe($v as f64);
    }};
}
