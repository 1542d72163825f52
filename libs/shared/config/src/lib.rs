use std::env;
use tracing::warn;

pub const DEFAULT_DOCTORS_API_URL: &str =
    "https://srijandubey.github.io/campus-api-mock/SRM-C1-25.json";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub doctors_api_url: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            doctors_api_url: env::var("DOCTORS_API_URL")
                .unwrap_or_else(|_| {
                    warn!("DOCTORS_API_URL not set, using default");
                    DEFAULT_DOCTORS_API_URL.to_string()
                }),
            port: match env::var("PORT") {
                Ok(raw) => raw.parse().unwrap_or_else(|_| {
                    warn!("PORT is not a valid port number ({}), using {}", raw, DEFAULT_PORT);
                    DEFAULT_PORT
                }),
                Err(_) => DEFAULT_PORT,
            },
        };

        if !config.is_configured() {
            warn!("Application not fully configured - doctor source URL is empty");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.doctors_api_url.trim().is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            doctors_api_url: DEFAULT_DOCTORS_API_URL.to_string(),
            port: DEFAULT_PORT,
        }
    }
}
