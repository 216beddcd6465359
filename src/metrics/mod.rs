//! Metrics collection for evaluation runs

use prometheus::{
    CounterVec, HistogramVec, Opts, Registry,
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
};
use std::sync::Arc;
use once_cell::sync::Lazy;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Provider call metrics
    pub provider_requests: CounterVec,
    pub provider_request_duration: HistogramVec,
    pub provider_cost_usd: CounterVec,

    // Scoring metrics
    pub answers_scored: CounterVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let provider_requests = register_counter_vec_with_registry!(
            Opts::new("provider_requests_total", "Total provider calls"),
            &["provider", "status"],
            registry
        )?;

        let provider_request_duration = register_histogram_vec_with_registry!(
            "provider_request_duration_seconds",
            "Provider call duration in seconds",
            &["provider"],
            registry
        )?;

        let provider_cost_usd = register_counter_vec_with_registry!(
            Opts::new("provider_cost_usd_total", "Estimated provider spend in USD"),
            &["provider"],
            registry
        )?;

        let answers_scored = register_counter_vec_with_registry!(
            Opts::new("answers_scored_total", "Scored answers by outcome"),
            &["suite", "outcome"],
            registry
        )?;

        Ok(Self {
            registry,
            provider_requests,
            provider_request_duration,
            provider_cost_usd,
            answers_scored,
        })
    }

    /// Record a provider call
    pub fn record_provider_call(&self, provider: &str, success: bool, seconds: f64) {
        let status = if success { "success" } else { "error" };
        self.provider_requests.with_label_values(&[provider, status]).inc();
        self.provider_request_duration
            .with_label_values(&[provider])
            .observe(seconds);
    }

    /// Record the estimated cost of a provider call
    pub fn record_cost(&self, provider: &str, usd: f64) {
        self.provider_cost_usd.with_label_values(&[provider]).inc_by(usd);
    }

    /// Record a scored answer
    pub fn record_answer(&self, suite: &str, matched: bool) {
        let outcome = if matched { "matched" } else { "missed" };
        self.answers_scored.with_label_values(&[suite, outcome]).inc();
    }

    /// Estimated spend for one provider so far
    pub fn cost_for(&self, provider: &str) -> f64 {
        self.provider_cost_usd.with_label_values(&[provider]).get()
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();
        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initialization() {
        let metrics = Metrics::new();
        assert!(metrics.is_ok());
    }

    #[test]
    fn test_record_cost_accumulates() {
        let metrics = Metrics::new().unwrap();
        metrics.record_cost("openai", 0.01);
        metrics.record_cost("openai", 0.02);
        assert!((metrics.cost_for("openai") - 0.03).abs() < 1e-9);
        assert_eq!(metrics.cost_for("google"), 0.0);
    }

    #[test]
    fn test_export_contains_recorded_series() {
        let metrics = Metrics::new().unwrap();
        metrics.record_provider_call("textract", true, 1.5);
        metrics.record_answer("Paystub Tests", true);

        let text = metrics.export_prometheus();
        assert!(text.contains("provider_requests_total"));
        assert!(text.contains("answers_scored_total"));
    }
}
