pub mod app;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod goals;
pub mod handlers;
pub mod models;
pub mod progress;
pub mod state;
pub mod static_files;
pub mod ui;
pub mod webhooks;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use webhooks::WebhookClient;
