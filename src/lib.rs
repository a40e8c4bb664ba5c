pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod schedule;
pub mod startup;

use std::sync::Arc;

pub use config::AppConfig;
pub use db::PgScheduleRepository;
pub use error::{AppError, AppResult};
pub use handlers::MetricsState;

#[derive(Clone)]
pub struct AppState {
    pub schedules: PgScheduleRepository,
    pub config: AppConfig,
    pub metrics: Arc<MetricsState>,
}
