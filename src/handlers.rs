use crate::calendar::{MAX_YEAR, MIN_YEAR, MonthRef};
use crate::dashboard::{DashboardView, GoalTableView, load_dashboard, load_goal_table};
use crate::errors::AppError;
use crate::goals::{apply_edit, build_default_table, merge_remote};
use crate::models::{EditRequest, GoalField, GoalRecord, PeriodQuery, SaveGoalsResponse};
use crate::state::AppState;
use crate::ui::{render_dashboard, render_settings};
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct SettingsQuery {
    pub year: Option<i32>,
    #[serde(default)]
    pub saved: bool,
}

pub async fn dashboard_page(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Html<String>, AppError> {
    let today = today();
    let month = resolve_month(&query, today)?;
    let view = load_dashboard(&state.webhooks, month, today).await;
    Ok(Html(render_dashboard(&view)))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<DashboardView>, AppError> {
    let today = today();
    let month = resolve_month(&query, today)?;
    Ok(Json(load_dashboard(&state.webhooks, month, today).await))
}

pub async fn get_goals(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<GoalTableView>, AppError> {
    let year = resolve_year(query.year)?;
    Ok(Json(load_goal_table(&state.webhooks, year).await))
}

/// Replaces the stored table for `year`. The body is normalized to twelve rows first.
pub async fn put_goals(
    State(state): State<AppState>,
    Path(year): Path<i32>,
    Json(goals): Json<Vec<GoalRecord>>,
) -> Result<Json<SaveGoalsResponse>, AppError> {
    let year = resolve_year(Some(year))?;
    let table = merge_remote(year, &goals);
    state.webhooks.save_goals(year, &table).await?;
    info!(year, "goal table saved");
    Ok(Json(SaveGoalsResponse { year, goals: table }))
}

/// Applies one field edit and returns the reconciled twelve-row table for the request year.
pub async fn edit_goals(
    Json(request): Json<EditRequest>,
) -> Result<Json<Vec<GoalRecord>>, AppError> {
    let year = resolve_year(Some(request.year))?;
    if request.month >= 12 {
        return Err(AppError::bad_request("month must be between 0 and 11"));
    }
    Ok(Json(apply_edit(
        &request.goals,
        year,
        request.month,
        request.field,
        &request.value,
    )))
}

pub async fn settings_page(
    State(state): State<AppState>,
    Query(query): Query<SettingsQuery>,
) -> Result<Html<String>, AppError> {
    let year = resolve_year(query.year)?;
    let view = load_goal_table(&state.webhooks, year).await;
    Ok(Html(render_settings(&view, query.saved)))
}

pub async fn save_settings(
    State(state): State<AppState>,
    Query(query): Query<SettingsQuery>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let year = resolve_year(query.year)?;
    let table = table_from_form(year, &form);

    match state.webhooks.save_goals(year, &table).await {
        Ok(()) => {
            info!(year, "goal table saved from settings page");
            Ok(Redirect::to(&format!("/settings?year={year}&saved=true")).into_response())
        }
        Err(err) => {
            warn!("saving goals failed: {err}");
            let view = GoalTableView {
                year,
                goals: table,
                notices: vec![err.to_string()],
            };
            Ok((StatusCode::BAD_GATEWAY, Html(render_settings(&view, false))).into_response())
        }
    }
}

/// Builds the full table from `goal-{month}-{field}` inputs. Unknown keys are ignored.
fn table_from_form(year: i32, form: &HashMap<String, String>) -> Vec<GoalRecord> {
    form.iter()
        .filter_map(|(key, value)| {
            let (month, field) = key.strip_prefix("goal-")?.split_once('-')?;
            let month = month.parse::<u32>().ok()?;
            let field = field.parse::<GoalField>().ok()?;
            Some((month, field, value))
        })
        .fold(build_default_table(year), |table, (month, field, value)| {
            apply_edit(&table, year, month, field, value)
        })
}

fn resolve_month(query: &PeriodQuery, today: NaiveDate) -> Result<MonthRef, AppError> {
    let current = MonthRef::containing(today);
    let year = query.year.unwrap_or(current.year);
    let month = query.month.unwrap_or(current.month);
    MonthRef::new(year, month).ok_or_else(|| {
        AppError::bad_request(format!(
            "month must be between 0 and 11 and year between {MIN_YEAR} and {MAX_YEAR}"
        ))
    })
}

fn resolve_year(year: Option<i32>) -> Result<i32, AppError> {
    let year = year.unwrap_or_else(|| MonthRef::containing(today()).year);
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(AppError::bad_request(format!(
            "year must be between {MIN_YEAR} and {MAX_YEAR}"
        )))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
