use crate::calendar::{MonthRef, remaining_business_days};
use crate::goals::{ambiguous_months, merge_remote};
use crate::models::{ActualsSnapshot, GoalRecord};
use crate::progress::ProgressReport;
use crate::webhooks::{WebhookClient, WebhookError, actuals_from_parts};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A year's goal table plus anything the operator should be told about how it was loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalTableView {
    pub year: i32,
    pub goals: Vec<GoalRecord>,
    pub notices: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub remaining_business_days: u32,
    pub actuals: ActualsSnapshot,
    pub average_ticket: f64,
    pub goal: GoalRecord,
    pub progress: ProgressReport,
    pub notices: Vec<String>,
}

pub async fn load_goal_table(client: &WebhookClient, year: i32) -> GoalTableView {
    let mut notices = Vec::new();
    let goals = reconcile(year, client.fetch_goals(year).await, &mut notices);
    GoalTableView {
        year,
        goals,
        notices,
    }
}

/// Fetches goals and actuals for `month` concurrently and combines them. A failing
/// source becomes a notice and contributes zeros.
pub async fn load_dashboard(
    client: &WebhookClient,
    month: MonthRef,
    today: NaiveDate,
) -> DashboardView {
    let (goals, sales, appointments, evaluations) = tokio::join!(
        client.fetch_goals(month.year),
        client.fetch_sales(month.year, month.month),
        client.fetch_appointments(month.year, month.month),
        client.fetch_evaluations(month.year, month.month),
    );

    let mut notices = Vec::new();
    let table = reconcile(month.year, goals, &mut notices);
    let goal = table
        .get(month.month as usize)
        .copied()
        .unwrap_or_else(|| GoalRecord::zeroed(month.year, month.month));

    let actuals = actuals_from_parts(
        keep_ok(sales, &mut notices),
        keep_ok(appointments, &mut notices),
        keep_ok(evaluations, &mut notices),
    );

    DashboardView {
        year: month.year,
        month: month.month,
        label: month.label(),
        remaining_business_days: remaining_business_days(month, today),
        average_ticket: actuals.average_ticket(),
        progress: ProgressReport::compute(&actuals, &goal),
        actuals,
        goal,
        notices,
    }
}

fn reconcile(
    year: i32,
    fetched: Result<Vec<GoalRecord>, WebhookError>,
    notices: &mut Vec<String>,
) -> Vec<GoalRecord> {
    let remote = keep_ok(fetched, notices).unwrap_or_default();
    let duplicated = ambiguous_months(year, &remote);
    if !duplicated.is_empty() {
        warn!(year, months = ?duplicated, "duplicate goal rows ignored");
    }
    merge_remote(year, &remote)
}

fn keep_ok<T>(result: Result<T, WebhookError>, notices: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(WebhookError::NotConfigured(source_name)) => {
            warn!("{source_name} webhook not configured, using zeros");
            None
        }
        Err(err) => {
            warn!("webhook request failed: {err}");
            notices.push(err.to_string());
            None
        }
    }
}
