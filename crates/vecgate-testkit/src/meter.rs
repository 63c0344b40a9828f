//! A meter that records events, counter totals, gauge values and histogram
//! samples for assertions.
//!
//! Metric keys are formatted as `name{k=v,...}`.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use vecgate_observe::{Counter, Gauge, Histogram, Labels, Meter, VizEvent};

#[derive(Clone, Default)]
pub struct RecordingMeter {
    events: Arc<Mutex<Vec<VizEvent>>>,
    counters: Arc<Mutex<BTreeMap<String, u64>>>,
    gauges: Arc<Mutex<BTreeMap<String, i64>>>,
    histograms: Arc<Mutex<BTreeMap<String, Vec<f64>>>>,
}

impl RecordingMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events emitted so far, in order.
    pub fn events(&self) -> Vec<VizEvent> {
        self.events.lock().clone()
    }

    pub fn counter_total(&self, key: &str) -> u64 {
        self.counters.lock().get(key).copied().unwrap_or(0)
    }

    /// Last value set on a gauge, if it was ever set.
    pub fn gauge_value(&self, key: &str) -> Option<i64> {
        self.gauges.lock().get(key).copied()
    }

    /// Every sample observed by a histogram, in order.
    pub fn histogram_samples(&self, key: &str) -> Vec<f64> {
        self.histograms.lock().get(key).cloned().unwrap_or_default()
    }
}

fn key(name: &str, labels: Labels) -> String {
    let labels: Vec<String> = labels.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    format!("{}{{{}}}", name, labels.join(","))
}

struct RecordingCounter {
    key: String,
    totals: Arc<Mutex<BTreeMap<String, u64>>>,
}

impl Counter for RecordingCounter {
    fn inc(&self, v: u64) {
        *self.totals.lock().entry(self.key.clone()).or_default() += v;
    }
}

struct RecordingGauge {
    key: String,
    values: Arc<Mutex<BTreeMap<String, i64>>>,
}

impl Gauge for RecordingGauge {
    fn set(&self, v: i64) {
        self.values.lock().insert(self.key.clone(), v);
    }
}

struct RecordingHistogram {
    key: String,
    samples: Arc<Mutex<BTreeMap<String, Vec<f64>>>>,
}

impl Histogram for RecordingHistogram {
    fn observe(&self, v: f64) {
        self.samples.lock().entry(self.key.clone()).or_default().push(v);
    }
}

impl Meter for RecordingMeter {
    fn counter(&self, name: &'static str, labels: Labels) -> Box<dyn Counter> {
        Box::new(RecordingCounter {
            key: key(name, labels),
            totals: Arc::clone(&self.counters),
        })
    }
    fn gauge(&self, name: &'static str, labels: Labels) -> Box<dyn Gauge> {
        Box::new(RecordingGauge {
            key: key(name, labels),
            values: Arc::clone(&self.gauges),
        })
    }
    fn histo(&self, name: &'static str, _b: &'static [f64], labels: Labels) -> Box<dyn Histogram> {
        Box::new(RecordingHistogram {
            key: key(name, labels),
            samples: Arc::clone(&self.histograms),
        })
    }
    fn emit(&self, evt: VizEvent) {
        self.events.lock().push(evt);
    }
}
