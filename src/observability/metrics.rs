use prometheus::{
    Encoder, GaugeVec, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub dispatch_total: IntCounterVec,
    pub notifications_in_queue: IntGauge,
    pub dispatch_latency_seconds: HistogramVec,
    pub courier_rating: GaugeVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let dispatch_total = IntCounterVec::new(
            Opts::new("dispatch_total", "Offer acceptances by outcome"),
            &["outcome"],
        )
        .expect("valid dispatch_total metric");

        let notifications_in_queue = IntGauge::new(
            "notifications_in_queue",
            "Current number of queued notifications",
        )
        .expect("valid notifications_in_queue metric");

        let dispatch_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "dispatch_latency_seconds",
                "Latency of offer acceptance in seconds",
            ),
            &["outcome"],
        )
        .expect("valid dispatch_latency_seconds metric");

        let courier_rating = GaugeVec::new(
            Opts::new("courier_rating", "Running average rating per courier [0..5]"),
            &["courier_id"],
        )
        .expect("valid courier_rating metric");

        registry
            .register(Box::new(dispatch_total.clone()))
            .expect("register dispatch_total");
        registry
            .register(Box::new(notifications_in_queue.clone()))
            .expect("register notifications_in_queue");
        registry
            .register(Box::new(dispatch_latency_seconds.clone()))
            .expect("register dispatch_latency_seconds");
        registry
            .register(Box::new(courier_rating.clone()))
            .expect("register courier_rating");

        Self {
            registry,
            dispatch_total,
            notifications_in_queue,
            dispatch_latency_seconds,
            courier_rating,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
