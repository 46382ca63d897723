//! Prometheus metrics for pipeline runs, served at `/metrics`.
use outreach_core::StageProof;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    runs: IntCounterVec,
    stage_latency: HistogramVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let runs = IntCounterVec::new(
            Opts::new("outreach_runs_total", "Pipeline runs by outcome"),
            &["outcome"],
        )?;
        let stage_latency = HistogramVec::new(
            HistogramOpts::new("outreach_stage_seconds", "Stage latency in seconds")
                .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 40.0, 80.0, 160.0]),
            &["stage"],
        )?;

        registry.register(Box::new(runs.clone()))?;
        registry.register(Box::new(stage_latency.clone()))?;

        Ok(Self {
            registry,
            runs,
            stage_latency,
        })
    }

    pub fn record_success(&self, proofs: &[StageProof]) {
        self.runs.with_label_values(&["ok"]).inc();
        for proof in proofs {
            self.stage_latency
                .with_label_values(&[proof.stage.as_str()])
                .observe(proof.latency_ms as f64 / 1000.0);
        }
    }

    pub fn record_failure(&self) {
        self.runs.with_label_values(&["error"]).inc();
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
