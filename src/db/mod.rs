pub mod pool;
pub mod service_hours_repo;

pub use pool::{create_pool, run_migrations};
pub use service_hours_repo::PgScheduleRepository;
