pub mod api_key;
pub mod metrics;
pub mod request_id;

pub use api_key::require_api_key;
pub use self::metrics::metrics_middleware;
pub use request_id::{request_id_middleware, RequestId};
