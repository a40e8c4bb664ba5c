pub mod health;
pub mod metrics;
pub mod service_hours_handler;

pub use health::health_check;
pub use self::metrics::{metrics_handler, setup_metrics_recorder, MetricsState};
