pub mod service_hours_client;

pub use service_hours_client::HttpScheduleClient;
