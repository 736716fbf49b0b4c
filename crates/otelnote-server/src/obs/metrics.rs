//! Metrics registry for the note service.
//!
//! One monotonic counter per CRUD verb, plus error and latency series keyed
//! by labels in a `DashMap`. Labels are flattened into sorted key vectors to
//! keep rendering order stable. Histogram buckets are fixed in microseconds
//! to avoid floating point math.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &[(String, String)]) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// The four instrumented operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub const ALL: [Verb; 4] = [Verb::Get, Verb::Post, Verb::Put, Verb::Delete];

    /// Exported instrument name.
    pub fn counter_name(self) -> &'static str {
        match self {
            Verb::Get => "get_counter",
            Verb::Post => "post_counter",
            Verb::Put => "put_counter",
            Verb::Delete => "delete_counter",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Verb::Get => "counts get requests",
            Verb::Post => "counts post requests",
            Verb::Put => "counts put requests",
            Verb::Delete => "counts delete requests",
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

/// Monotonic counter. There is no decrement or reset.
#[derive(Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        let counter = self.map.entry(label_key(labels)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Current value for an exact label set (0 if never seen).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str(r.key()), val);
        }
    }
}

// 100us, 500us, 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s
const BUCKETS_MICROS: [u64; 9] = [100, 500, 1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000];

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; 9],
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<Vec<(String, String)>, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration into cumulative buckets (microsecond scale).
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self.map.entry(label_key(labels)).or_default();
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(micros, Ordering::Relaxed);
        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} histogram", name);
        for r in self.map.iter() {
            let hist = r.value();
            let labels = label_str(r.key());
            let prefix = if labels.is_empty() { String::new() } else { format!("{},", labels) };

            for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, count);
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);
            let _ = writeln!(out, "{}_sum{{{}}} {}", name, labels, hist.sum.load(Ordering::Relaxed));
            let _ = writeln!(out, "{}_count{{{}}} {}", name, labels, count);
        }
    }
}

/// Process registry, shared through `AppState` as an `Arc`.
#[derive(Default)]
pub struct NoteMetrics {
    get: Counter,
    post: Counter,
    put: Counter,
    delete: Counter,
    pub request_errors: CounterVec,
    pub request_duration: HistogramVec, // microseconds
}

impl NoteMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, verb: Verb) -> &Counter {
        match verb {
            Verb::Get => &self.get,
            Verb::Post => &self.post,
            Verb::Put => &self.put,
            Verb::Delete => &self.delete,
        }
    }

    /// Count one successful operation.
    pub fn record(&self, verb: Verb) {
        self.counter(verb).inc();
    }

    pub fn value(&self, verb: Verb) -> u64 {
        self.counter(verb).get()
    }

    /// All four verb counters, in `Verb::ALL` order.
    pub fn snapshot(&self) -> [(Verb, u64); 4] {
        Verb::ALL.map(|v| (v, self.value(v)))
    }

    pub fn record_error(&self, verb: Verb, code: &str) {
        self.request_errors.inc(&[("method", verb.method()), ("code", code)]);
    }

    pub fn observe_duration(&self, verb: Verb, status: u16, d: Duration) {
        let status = status.to_string();
        self.request_duration
            .observe(&[("method", verb.method()), ("status", status.as_str())], d);
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (verb, val) in self.snapshot() {
            let name = format!("otelnote_{}_total", verb.counter_name());
            let _ = writeln!(out, "# HELP {} {}", name, verb.description());
            let _ = writeln!(out, "# TYPE {} counter\n{} {}", name, name, val);
        }
        self.request_errors.render("otelnote_request_errors_total", &mut out);
        self.request_duration.render("otelnote_request_duration_micros", &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_touches_only_its_verb() {
        let m = NoteMetrics::new();
        m.record(Verb::Put);
        m.record(Verb::Put);
        assert_eq!(m.value(Verb::Put), 2);
        assert_eq!(m.value(Verb::Get), 0);
        assert_eq!(m.value(Verb::Post), 0);
        assert_eq!(m.value(Verb::Delete), 0);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let m = std::sync::Arc::new(NoteMetrics::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let m = std::sync::Arc::clone(&m);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        m.record(Verb::Get);
                    }
                })
            })
            .collect();
        for h in handles {
            let _ = h.join();
        }
        assert_eq!(m.value(Verb::Get), 8000);
    }

    #[test]
    fn render_lists_all_verbs_and_labels() {
        let m = NoteMetrics::new();
        m.record(Verb::Post);
        m.record_error(Verb::Get, "NOT_FOUND");
        m.observe_duration(Verb::Post, 201, Duration::from_micros(300));

        let out = m.render();
        assert!(out.contains("otelnote_post_counter_total 1"));
        assert!(out.contains("otelnote_delete_counter_total 0"));
        assert!(out.contains(r#"otelnote_request_errors_total{code="NOT_FOUND",method="GET"} 1"#));
        assert!(out.contains(r#"otelnote_request_duration_micros_bucket{method="POST",status="201",le="500"} 1"#));
        assert!(out.contains(r#"otelnote_request_duration_micros_bucket{method="POST",status="201",le="100"} 0"#));
    }
}
