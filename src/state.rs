use crate::webhooks::WebhookClient;
use std::{path::PathBuf, sync::Arc};

#[derive(Clone)]
pub struct AppState {
    pub webhooks: Arc<WebhookClient>,
    pub dist_dir: PathBuf,
}

impl AppState {
    pub fn new(webhooks: WebhookClient, dist_dir: PathBuf) -> Self {
        Self {
            webhooks: Arc::new(webhooks),
            dist_dir,
        }
    }
}
