use shared::metrics_defs::{MetricDef, MetricType};

pub const ALERTS_RECEIVED: MetricDef = MetricDef {
    name: "alerts.received",
    metric_type: MetricType::Counter,
    description: "Alert submissions accepted for formatting and delivery",
};

pub const ALERTS_REJECTED: MetricDef = MetricDef {
    name: "alerts.rejected",
    metric_type: MetricType::Counter,
    description: "Alert submissions rejected for a pre-shared key mismatch",
};

pub const DELIVERY_FAILURES: MetricDef = MetricDef {
    name: "alerts.delivery_failures",
    metric_type: MetricType::Counter,
    description: "Alerts that could not be delivered to the webhook target",
};

pub const ALL_METRICS: &[MetricDef] = &[ALERTS_RECEIVED, ALERTS_REJECTED, DELIVERY_FAILURES];
