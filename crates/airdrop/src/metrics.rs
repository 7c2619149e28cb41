//! Prometheus metrics for the airdrop service

use prometheus::{
    histogram_opts, opts, Encoder, Histogram, IntCounter, IntCounterVec, Registry, TextEncoder,
};

#[derive(Debug, Clone)]
pub struct AirdropMetrics {
    registry: Registry,
    pub requests_total: IntCounter,
    pub dispatches_total: IntCounter,
    pub failures_total: IntCounterVec,
    pub mint_duration: Histogram,
}

impl AirdropMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = IntCounter::with_opts(opts!(
            "rusd_airdrop_requests_total",
            "Airdrop requests received"
        ))?;

        let dispatches_total = IntCounter::with_opts(opts!(
            "rusd_airdrop_dispatches_total",
            "Airdrops confirmed with a transaction signature"
        ))?;

        let failures_total = IntCounterVec::new(
            opts!("rusd_airdrop_failures_total", "Airdrop requests that did not dispatch"),
            &["kind"],
        )?;

        let mint_duration = Histogram::with_opts(
            histogram_opts!(
                "rusd_airdrop_mint_duration_seconds",
                "Time spent in the mint command"
            )
            .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 45.0, 60.0]),
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(dispatches_total.clone()))?;
        registry.register(Box::new(failures_total.clone()))?;
        registry.register(Box::new(mint_duration.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            dispatches_total,
            failures_total,
            mint_duration,
        })
    }

    pub fn record_failure(&self, kind: &str) {
        self.failures_total.with_label_values(&[kind]).inc();
    }

    /// Render all metrics in the text exposition format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_contains_registered_series() {
        let metrics = AirdropMetrics::new().unwrap();
        metrics.requests_total.inc();
        metrics.record_failure("COOLDOWN_ACTIVE");

        let text = metrics.gather().unwrap();
        assert!(text.contains("rusd_airdrop_requests_total 1"));
        assert!(text.contains("rusd_airdrop_failures_total{kind=\"COOLDOWN_ACTIVE\"} 1"));
    }
}
