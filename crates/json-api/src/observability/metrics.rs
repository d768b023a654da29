//! Prometheus metrics and the `/metrics` exposition endpoint.
//!
//! HTTP traffic is recorded by the request middleware. Order and cart handlers
//! record business events through the `record_*` functions.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder, core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

const LATENCY_BUCKETS: [f64; 13] = [
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug)]
struct Metrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    orders_placed_total: IntCounter,
    order_revenue_total: IntCounter,
    order_status_changes_total: IntCounterVec,
    cart_mutations_total: IntCounterVec,
}

static METRICS: OnceLock<Option<Metrics>> = OnceLock::new();

/// Cart operations counted by `feast_json_cart_mutations_total`.
#[derive(Debug, Clone, Copy)]
pub(crate) enum CartMutation {
    Add,
    Update,
    Remove,
    Clear,
}

impl CartMutation {
    fn as_label(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Remove => "remove",
            Self::Clear => "clear",
        }
    }
}

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let tracked = metrics().is_some_and(|metrics| {
            metrics.requests_in_flight.inc();
            true
        });

        Self { tracked }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_code_label = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[
            method,
            route,
            status_class(status_code),
            status_code_label.as_str(),
        ])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count a completed checkout and add its total to the revenue counter.
pub(crate) fn record_order_placed(total_price: u64) {
    if let Some(metrics) = metrics() {
        metrics.orders_placed_total.inc();
        metrics.order_revenue_total.inc_by(total_price);
    }
}

pub(crate) fn record_order_status_change(status: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .order_status_changes_total
            .with_label_values(&[status])
            .inc();
    }
}

pub(crate) fn record_cart_mutation(mutation: CartMutation) {
    if let Some(metrics) = metrics() {
        metrics
            .cart_mutations_total
            .with_label_values(&[mutation.as_label()])
            .inc();
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    match HeaderValue::from_str(encoder.format_type()) {
        Ok(content_type) => {
            res.headers_mut().insert(CONTENT_TYPE, content_type);
            res.render(String::from_utf8_lossy(&encoded).into_owned());
        }
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

fn metrics() -> Option<&'static Metrics> {
    METRICS
        .get_or_init(|| match build_metrics() {
            Ok(metrics) => Some(metrics),
            Err(source) => {
                error!("failed to build metrics registry: {source}");
                None
            }
        })
        .as_ref()
}

fn build_metrics() -> Result<Metrics, prometheus::Error> {
    let registry = Registry::new();

    let requests_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "feast_json_http_requests_total",
                "HTTP requests by method, route, status class, and status code.",
            ),
            &["method", "route", "status_class", "status_code"],
        )?,
    )?;

    let request_duration_seconds = register(
        &registry,
        HistogramVec::new(
            HistogramOpts::new(
                "feast_json_http_request_duration_seconds",
                "HTTP request duration in seconds by method and route.",
            )
            .buckets(LATENCY_BUCKETS.to_vec()),
            &["method", "route"],
        )?,
    )?;

    let requests_in_flight = register(
        &registry,
        IntGauge::with_opts(Opts::new(
            "feast_json_http_requests_in_flight",
            "HTTP requests currently being served.",
        ))?,
    )?;

    let orders_placed_total = register(
        &registry,
        IntCounter::with_opts(Opts::new(
            "feast_json_orders_placed_total",
            "Orders created by checkout.",
        ))?,
    )?;

    let order_revenue_total = register(
        &registry,
        IntCounter::with_opts(Opts::new(
            "feast_json_order_revenue_total",
            "Sum of order totals at checkout, in whole currency units.",
        ))?,
    )?;

    let order_status_changes_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "feast_json_order_status_changes_total",
                "Order status updates by new status.",
            ),
            &["status"],
        )?,
    )?;

    let cart_mutations_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                "feast_json_cart_mutations_total",
                "Cart changes by operation.",
            ),
            &["operation"],
        )?,
    )?;

    Ok(Metrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        orders_placed_total,
        order_revenue_total,
        order_status_changes_total,
        cart_mutations_total,
    })
}

fn register<M>(registry: &Registry, metric: M) -> Result<M, prometheus::Error>
where
    M: Collector + Clone + 'static,
{
    registry.register(Box::new(metric.clone()))?;

    Ok(metric)
}

pub(super) fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}
