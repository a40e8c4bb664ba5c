use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub api_key: String,
    pub bind_addr: String,
    /// Display label for the schedule; times are not converted
    pub timezone: String,
    pub cors_origin: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let api_key = env::var("SERVICE_HOURS_API_KEY")
            .map_err(|_| "SERVICE_HOURS_API_KEY must be set".to_string())?;

        if api_key.trim().is_empty() {
            return Err("SERVICE_HOURS_API_KEY must not be empty".to_string());
        }

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let timezone = env::var("SCHEDULE_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        let cors_origin = env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            database_url,
            api_key,
            bind_addr,
            timezone,
            cors_origin,
        })
    }
}
