// ============================================================
// Serving Metrics
// ============================================================
// Counters and a latency histogram for the prediction API,
// rendered in the Prometheus text exposition format:
//
//   request_count_total{endpoint,method}       counter
//   request_latency_seconds{endpoint}          histogram
//   request_errors_total{error_type}           counter
//
// Series are kept in BTreeMaps so the output order is stable.

use std::{collections::BTreeMap, fmt::Write, sync::Mutex};

/// Prometheus client default buckets, in seconds.
pub const LATENCY_BUCKETS: [f64; 14] = [
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Debug, Clone, Default)]
struct Histogram {
    /// Cumulative counts, one per LATENCY_BUCKETS entry
    buckets: [u64; LATENCY_BUCKETS.len()],
    count:   u64,
    sum:     f64,
}

impl Histogram {
    fn observe(&mut self, value: f64) {
        for (bucket, le) in self.buckets.iter_mut().zip(LATENCY_BUCKETS) {
            if value <= le {
                *bucket += 1;
            }
        }
        self.count += 1;
        self.sum   += value;
    }
}

#[derive(Debug, Default)]
struct MetricsInner {
    requests: BTreeMap<(String, String), u64>,
    latency:  BTreeMap<String, Histogram>,
    errors:   BTreeMap<String, u64>,
}

#[derive(Debug, Default)]
pub struct ServingMetrics {
    inner: Mutex<MetricsInner>,
}

impl ServingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_inner<T>(&self, f: impl FnOnce(&mut MetricsInner) -> T) -> T {
        // A panic while holding the lock can't leave counters half-updated
        let mut guard = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    pub fn record_request(&self, endpoint: &str, method: &str) {
        self.with_inner(|m| {
            *m.requests.entry((endpoint.to_string(), method.to_string())).or_default() += 1;
        });
    }

    pub fn observe_latency(&self, endpoint: &str, seconds: f64) {
        self.with_inner(|m| m.latency.entry(endpoint.to_string()).or_default().observe(seconds));
    }

    pub fn record_error(&self, error_type: &str) {
        self.with_inner(|m| *m.errors.entry(error_type.to_string()).or_default() += 1);
    }

    pub fn request_count(&self, endpoint: &str, method: &str) -> u64 {
        self.with_inner(|m| {
            m.requests
                .get(&(endpoint.to_string(), method.to_string()))
                .copied()
                .unwrap_or(0)
        })
    }

    pub fn error_count(&self, error_type: &str) -> u64 {
        self.with_inner(|m| m.errors.get(error_type).copied().unwrap_or(0))
    }

    /// Export as Prometheus format
    pub fn render(&self) -> String {
        self.with_inner(|m| {
            let mut out = String::new();

            out.push_str("# HELP request_count_total Total number of requests\n");
            out.push_str("# TYPE request_count_total counter\n");
            for ((endpoint, method), count) in &m.requests {
                let _ = writeln!(
                    out,
                    "request_count_total{{endpoint=\"{}\",method=\"{}\"}} {}",
                    escape(endpoint), escape(method), count
                );
            }

            out.push_str("# HELP request_latency_seconds Request latency\n");
            out.push_str("# TYPE request_latency_seconds histogram\n");
            for (endpoint, hist) in &m.latency {
                let endpoint = escape(endpoint);
                for (le, count) in LATENCY_BUCKETS.iter().zip(hist.buckets) {
                    let _ = writeln!(
                        out,
                        "request_latency_seconds_bucket{{endpoint=\"{endpoint}\",le=\"{le}\"}} {count}"
                    );
                }
                let _ = writeln!(
                    out,
                    "request_latency_seconds_bucket{{endpoint=\"{endpoint}\",le=\"+Inf\"}} {}",
                    hist.count
                );
                let _ = writeln!(out, "request_latency_seconds_count{{endpoint=\"{endpoint}\"}} {}", hist.count);
                let _ = writeln!(out, "request_latency_seconds_sum{{endpoint=\"{endpoint}\"}} {}", hist.sum);
            }

            out.push_str("# HELP request_errors_total Total request errors\n");
            out.push_str("# TYPE request_errors_total counter\n");
            for (error_type, count) in &m.errors {
                let _ = writeln!(
                    out,
                    "request_errors_total{{error_type=\"{}\"}} {}",
                    escape(error_type), count
                );
            }

            out
        })
    }
}

/// Escape a label value per the exposition format.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let m = ServingMetrics::new();
        m.record_request("/predict", "POST");
        m.record_request("/predict", "POST");
        m.record_error("invalid_id");

        assert_eq!(m.request_count("/predict", "POST"), 2);
        assert_eq!(m.request_count("/predict", "GET"),  0);
        assert_eq!(m.error_count("invalid_id"), 1);
        assert_eq!(m.error_count("server_error"), 0);
    }

    #[test]
    fn test_histogram_buckets_are_cumulative() {
        let m = ServingMetrics::new();
        m.observe_latency("/predict", 0.003);
        m.observe_latency("/predict", 0.2);
        m.observe_latency("/predict", 30.0);

        let text = m.render();
        assert!(text.contains("request_latency_seconds_bucket{endpoint=\"/predict\",le=\"0.005\"} 1\n"));
        assert!(text.contains("request_latency_seconds_bucket{endpoint=\"/predict\",le=\"0.25\"} 2\n"));
        assert!(text.contains("request_latency_seconds_bucket{endpoint=\"/predict\",le=\"10\"} 2\n"));
        assert!(text.contains("request_latency_seconds_bucket{endpoint=\"/predict\",le=\"+Inf\"} 3\n"));
        assert!(text.contains("request_latency_seconds_count{endpoint=\"/predict\"} 3\n"));
    }

    #[test]
    fn test_render_has_type_lines_and_labels() {
        let m = ServingMetrics::new();
        m.record_request("/predict", "POST");
        m.record_error("invalid_input");

        let text = m.render();
        assert!(text.contains("# TYPE request_count_total counter"));
        assert!(text.contains("# TYPE request_latency_seconds histogram"));
        assert!(text.contains("request_count_total{endpoint=\"/predict\",method=\"POST\"} 1"));
        assert!(text.contains("request_errors_total{error_type=\"invalid_input\"} 1"));
    }

    #[test]
    fn test_label_escaping() {
        assert_eq!(escape(r#"a"b\c"#), r#"a\"b\\c"#);
    }
}
