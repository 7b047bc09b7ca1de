use std::{env, path::PathBuf, time::Duration};
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DIST_DIR: &str = "dist";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default)]
pub struct WebhookUrls {
    pub goals_read: Option<String>,
    pub goals_write: Option<String>,
    pub sales: Option<String>,
    pub appointments: Option<String>,
    pub evaluations: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub dist_dir: PathBuf,
    pub webhooks: WebhookUrls,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: parse_var("PORT").unwrap_or(DEFAULT_PORT),
            dist_dir: env::var("DASHBOARD_DIST_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DIST_DIR)),
            webhooks: WebhookUrls {
                goals_read: url_var("GOALS_READ_URL"),
                goals_write: url_var("GOALS_WRITE_URL"),
                sales: url_var("SALES_URL"),
                appointments: url_var("APPOINTMENTS_URL"),
                evaluations: url_var("EVALUATIONS_URL"),
            },
            request_timeout: Duration::from_secs(
                parse_var("WEBHOOK_TIMEOUT_SECS").unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }
}

fn url_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = env::var(name).ok()?;
    match value.trim().parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("ignoring invalid {name}={value:?}, using default");
            None
        }
    }
}
