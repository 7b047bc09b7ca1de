use crate::config::{Config, WebhookUrls};
use crate::models::{
    ActualsSnapshot, GoalRecord, OneOrMany, RemoteAppointmentsRow, RemoteEvaluationsRow,
    RemoteGoalRecord, RemoteSalesRow, whole,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("{0} webhook is not configured")]
    NotConfigured(&'static str),
    #[error("{source_name} webhook unreachable: {error}")]
    Transport {
        source_name: &'static str,
        error: reqwest::Error,
    },
    #[error("{source_name} webhook answered with status {status}")]
    Status {
        source_name: &'static str,
        status: u16,
    },
    #[error("{source_name} webhook sent an unreadable body: {error}")]
    Body {
        source_name: &'static str,
        error: reqwest::Error,
    },
}

/// HTTP client for the automation webhooks that own goals and actuals.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: Client,
    urls: WebhookUrls,
}

impl WebhookClient {
    pub fn new(http: Client, urls: WebhookUrls) -> Self {
        Self { http, urls }
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::new(http, config.webhooks.clone()))
    }

    /// Goal rows stored for `year`, already mapped to [`GoalRecord`]. Rows that cannot name
    /// a calendar month are dropped.
    pub async fn fetch_goals(&self, year: i32) -> Result<Vec<GoalRecord>, WebhookError> {
        let url = configured("goals", &self.urls.goals_read)?;
        let rows: Vec<RemoteGoalRecord> = self
            .get_rows("goals", url, &[("ano", year.to_string())])
            .await?;
        Ok(rows.into_iter().filter_map(RemoteGoalRecord::into_goal).collect())
    }

    /// Sends the whole table for `year` in one request.
    pub async fn save_goals(&self, year: i32, table: &[GoalRecord]) -> Result<(), WebhookError> {
        const SOURCE: &str = "goals";
        let url = configured(SOURCE, &self.urls.goals_write)?;
        let payload: Vec<RemoteGoalRecord> = table.iter().map(RemoteGoalRecord::from).collect();
        debug!(year, rows = payload.len(), "saving goal table");

        let response = self
            .http
            .post(url)
            .query(&[("ano", year.to_string())])
            .json(&payload)
            .send()
            .await
            .map_err(|error| WebhookError::Transport {
                source_name: SOURCE,
                error,
            })?;
        check_status(SOURCE, &response)?;
        Ok(())
    }

    /// Sales count and revenue for the month. Only the first row is used.
    pub async fn fetch_sales(&self, year: i32, month: u32) -> Result<(u64, f64), WebhookError> {
        let url = configured("sales", &self.urls.sales)?;
        let rows: Vec<RemoteSalesRow> = self.get_rows("sales", url, &period(year, month)).await?;
        let row = rows.into_iter().next().unwrap_or_default();
        Ok((whole(row.count_id_north), row.sum_valor_venda.max(0.0)))
    }

    pub async fn fetch_appointments(&self, year: i32, month: u32) -> Result<u64, WebhookError> {
        let url = configured("appointments", &self.urls.appointments)?;
        let rows: Vec<RemoteAppointmentsRow> = self
            .get_rows("appointments", url, &period(year, month))
            .await?;
        Ok(rows
            .into_iter()
            .next()
            .map(|row| whole(row.count_id_agendamento))
            .unwrap_or(0))
    }

    pub async fn fetch_evaluations(&self, year: i32, month: u32) -> Result<u64, WebhookError> {
        let url = configured("evaluations", &self.urls.evaluations)?;
        let rows: Vec<RemoteEvaluationsRow> = self
            .get_rows("evaluations", url, &period(year, month))
            .await?;
        Ok(rows
            .into_iter()
            .next()
            .map(|row| whole(row.count_id_avaliacao))
            .unwrap_or(0))
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        source_name: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, WebhookError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|error| WebhookError::Transport { source_name, error })?;
        check_status(source_name, &response)?;

        let rows: OneOrMany<T> = response
            .json()
            .await
            .map_err(|error| WebhookError::Body { source_name, error })?;
        Ok(rows.into_vec())
    }
}

/// Combines the three actuals sources; a missing source counts as zero.
pub fn actuals_from_parts(
    sales: Option<(u64, f64)>,
    appointments: Option<u64>,
    evaluations: Option<u64>,
) -> ActualsSnapshot {
    let (sales_closed, revenue) = sales.unwrap_or((0, 0.0));
    ActualsSnapshot {
        sales_closed,
        revenue,
        appointments_made: appointments.unwrap_or(0),
        evaluations_generated: evaluations.unwrap_or(0),
    }
}

fn configured<'a>(
    source_name: &'static str,
    url: &'a Option<String>,
) -> Result<&'a str, WebhookError> {
    url.as_deref().ok_or(WebhookError::NotConfigured(source_name))
}

fn check_status(source_name: &'static str, response: &reqwest::Response) -> Result<(), WebhookError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(WebhookError::Status {
            source_name,
            status: status.as_u16(),
        })
    }
}

fn period(year: i32, month: u32) -> [(&'static str, String); 2] {
    [("ano", year.to_string()), ("mes", month.to_string())]
}
