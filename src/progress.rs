use crate::models::{ActualsSnapshot, GoalRecord};
use serde::{Deserialize, Serialize};

/// Percentage of `goal` reached by `actual`, unrounded.
///
/// Returns `None` when there is no usable goal, which is not the same as 0%.
pub fn compute_progress(actual: f64, goal: f64) -> Option<f64> {
    if goal > 0.0 {
        Some(actual / goal * 100.0)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub revenue: Option<f64>,
    pub sales: Option<f64>,
    pub appointments: Option<f64>,
    pub evaluations: Option<f64>,
    pub average_ticket: Option<f64>,
}

impl ProgressReport {
    pub fn compute(actuals: &ActualsSnapshot, goal: &GoalRecord) -> Self {
        Self {
            revenue: compute_progress(actuals.revenue, goal.monthly_revenue_goal),
            sales: compute_progress(actuals.sales_closed as f64, goal.sales_goal as f64),
            appointments: compute_progress(
                actuals.appointments_made as f64,
                goal.appointments_goal as f64,
            ),
            evaluations: compute_progress(
                actuals.evaluations_generated as f64,
                goal.evaluations_goal as f64,
            ),
            average_ticket: compute_progress(actuals.average_ticket(), goal.average_ticket_goal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_edge_cases() {
        assert_eq!(compute_progress(50.0, 0.0), None);
        assert_eq!(compute_progress(50.0, -10.0), None);
        assert_eq!(compute_progress(50.0, f64::NAN), None);
        assert_eq!(compute_progress(0.0, 100.0), Some(0.0));
        assert_eq!(compute_progress(150.0, 100.0), Some(150.0));
    }

    #[test]
    fn report_combines_each_metric_pair() {
        let actuals = ActualsSnapshot {
            revenue: 7500.0,
            sales_closed: 15,
            appointments_made: 0,
            evaluations_generated: 3,
        };
        let goal = GoalRecord {
            monthly_revenue_goal: 10000.0,
            sales_goal: 20,
            average_ticket_goal: 500.0,
            appointments_goal: 40,
            ..GoalRecord::zeroed(2024, 2)
        };

        let report = ProgressReport::compute(&actuals, &goal);
        assert_eq!(report.revenue, Some(75.0));
        assert_eq!(report.sales, Some(75.0));
        assert_eq!(report.average_ticket, Some(100.0));
        assert_eq!(report.appointments, Some(0.0));
        assert_eq!(report.evaluations, None);
    }

    #[test]
    fn undefined_progress_serializes_as_null() {
        let report = ProgressReport::compute(
            &ActualsSnapshot::default(),
            &GoalRecord::zeroed(2024, 0),
        );
        let json = serde_json::to_value(report).unwrap();
        assert!(json["revenue"].is_null());
        assert!(json["averageTicket"].is_null());
    }
}
