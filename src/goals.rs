//! Reconciles remote goal records against a complete twelve-month table.
//!
//! Every function here is pure: the output is always a well-formed table with one row per
//! calendar month, whatever the remote side sent.

use crate::models::{GoalField, GoalRecord, non_negative, whole};

pub const MONTHS_PER_YEAR: u32 = 12;

pub fn build_default_table(year: i32) -> Vec<GoalRecord> {
    (0..MONTHS_PER_YEAR)
        .map(|month| GoalRecord::zeroed(year, month))
        .collect()
}

/// Overlays remote rows onto the zeroed table for `year`.
///
/// A month takes the remote values only when exactly one remote row matches its
/// `(year, month)`. Months with no match or with duplicates keep the zeroed default.
/// Negative or non-finite amounts become 0.
pub fn merge_remote(year: i32, remote: &[GoalRecord]) -> Vec<GoalRecord> {
    build_default_table(year)
        .into_iter()
        .map(|default| {
            let mut matches = remote
                .iter()
                .filter(|record| record.year == year && record.month == default.month);
            match (matches.next(), matches.next()) {
                (Some(record), None) => GoalRecord {
                    month: default.month,
                    year,
                    monthly_revenue_goal: non_negative(record.monthly_revenue_goal),
                    average_ticket_goal: non_negative(record.average_ticket_goal),
                    ..*record
                },
                _ => default,
            }
        })
        .collect()
}

/// Months of `year` that the remote side reported more than once.
pub fn ambiguous_months(year: i32, remote: &[GoalRecord]) -> Vec<u32> {
    (0..MONTHS_PER_YEAR)
        .filter(|month| {
            remote
                .iter()
                .filter(|record| record.year == year && record.month == *month)
                .count()
                > 1
        })
        .collect()
}

/// Returns the twelve-row table for `year` with one field of one month replaced by `raw`.
///
/// `table` is first reconciled with [`merge_remote`], so missing or duplicated months come
/// back zeroed. Input that is empty or not a finite number becomes 0, negative numbers
/// become 0, and integer fields drop the fractional part. A month index outside 0..11
/// edits nothing.
pub fn apply_edit(
    table: &[GoalRecord],
    year: i32,
    month: u32,
    field: GoalField,
    raw: &str,
) -> Vec<GoalRecord> {
    let value = parse_goal_input(raw);
    let mut table = merge_remote(year, table);
    if let Some(edited) = table.get_mut(month as usize) {
        match field {
            GoalField::MonthlyRevenue => edited.monthly_revenue_goal = value,
            GoalField::AverageTicket => edited.average_ticket_goal = value,
            GoalField::Appointments => edited.appointments_goal = whole(value),
            GoalField::Evaluations => edited.evaluations_goal = whole(value),
            GoalField::Sales => edited.sales_goal = whole(value),
        }
    }
    table
}

pub fn parse_goal_input(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    non_negative(trimmed.parse::<f64>().unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(year: i32, month: u32, revenue: f64) -> GoalRecord {
        GoalRecord {
            monthly_revenue_goal: revenue,
            ..GoalRecord::zeroed(year, month)
        }
    }

    #[test]
    fn default_table_covers_every_month_once() {
        let table = build_default_table(2031);
        assert_eq!(table.len(), 12);
        for (index, record) in table.iter().enumerate() {
            assert_eq!(record.month, index as u32);
            assert_eq!(*record, GoalRecord::zeroed(2031, index as u32));
        }
    }

    #[test]
    fn merge_fills_single_remote_month() {
        let record = GoalRecord {
            month: 2,
            year: 2024,
            monthly_revenue_goal: 10000.0,
            average_ticket_goal: 500.0,
            appointments_goal: 40,
            evaluations_goal: 10,
            sales_goal: 20,
        };
        let table = merge_remote(2024, &[record]);

        assert_eq!(table.len(), 12);
        assert_eq!(table[2], record);
        for (index, row) in table.iter().enumerate().filter(|(index, _)| *index != 2) {
            assert_eq!(*row, GoalRecord::zeroed(2024, index as u32));
        }
    }

    #[test]
    fn merge_ignores_other_years() {
        let table = merge_remote(2024, &[remote(2023, 4, 900.0)]);
        assert!(table.iter().all(|row| row.year == 2024));
        assert_eq!(table[4].monthly_revenue_goal, 0.0);
    }

    #[test]
    fn merge_keeps_default_for_duplicates() {
        let rows = [remote(2024, 5, 100.0), remote(2024, 5, 200.0), remote(2024, 6, 300.0)];
        let table = merge_remote(2024, &rows);

        assert_eq!(table[5], GoalRecord::zeroed(2024, 5));
        assert_eq!(table[6].monthly_revenue_goal, 300.0);
        assert_eq!(ambiguous_months(2024, &rows), vec![5]);
    }

    #[test]
    fn merge_handles_oversized_input() {
        let rows: Vec<GoalRecord> = (0..40)
            .map(|index| remote(2024, index % 12, f64::from(index)))
            .collect();
        let table = merge_remote(2024, &rows);
        assert_eq!(table.len(), 12);
        assert!(table.iter().all(|row| row.monthly_revenue_goal == 0.0));
    }

    #[test]
    fn edit_replaces_only_target_field() {
        let table = build_default_table(2024);
        let edited = apply_edit(&table, 2024, 3, GoalField::MonthlyRevenue, " 1500.75 ");

        assert_eq!(edited[3].monthly_revenue_goal, 1500.75);
        assert_eq!(edited[3].sales_goal, 0);
        assert_eq!(&edited[..3], &table[..3]);
        assert_eq!(&edited[4..], &table[4..]);
    }

    #[test]
    fn edit_degrades_invalid_input_to_zero() {
        let table = apply_edit(&build_default_table(2024), 2024, 0, GoalField::Sales, "12");
        assert_eq!(table[0].sales_goal, 12);

        for raw in ["", "   ", "abc", "12abc", "NaN", "inf", "-7"] {
            let edited = apply_edit(&table, 2024, 0, GoalField::Sales, raw);
            assert_eq!(edited[0].sales_goal, 0, "input {raw:?}");
        }
    }

    #[test]
    fn edit_truncates_integer_fields() {
        let table = build_default_table(2024);
        let table = apply_edit(&table, 2024, 7, GoalField::Appointments, "40.9");
        assert_eq!(table[7].appointments_goal, 40);

        let table = apply_edit(&table, 2024, 7, GoalField::AverageTicket, "99.9");
        assert_eq!(table[7].average_ticket_goal, 99.9);
    }

    #[test]
    fn edit_out_of_range_month_is_noop() {
        let table = build_default_table(2024);
        assert_eq!(apply_edit(&table, 2024, 12, GoalField::Sales, "5"), table);
    }

    #[test]
    fn merge_clamps_negative_amounts() {
        let row = GoalRecord {
            monthly_revenue_goal: -3000.0,
            average_ticket_goal: -1.0,
            sales_goal: 4,
            ..GoalRecord::zeroed(2025, 4)
        };
        let table = merge_remote(2025, &[row]);
        assert_eq!(table[4].monthly_revenue_goal, 0.0);
        assert_eq!(table[4].average_ticket_goal, 0.0);
        assert_eq!(table[4].sales_goal, 4);
    }

    #[test]
    fn edit_on_empty_input_yields_full_table() {
        let edited = apply_edit(&[], 2024, 3, GoalField::Sales, "5");
        assert_eq!(edited.len(), 12);
        assert!(edited.iter().all(|row| row.year == 2024));
        assert_eq!(edited[3].sales_goal, 5);
        assert_eq!(edited.iter().filter(|row| row.sales_goal != 0).count(), 1);
    }

    #[test]
    fn edit_on_duplicate_months_edits_one_row() {
        let rows = [
            GoalRecord::zeroed(2024, 3),
            GoalRecord::zeroed(2024, 3),
            remote(2023, 1, 50.0),
        ];
        let edited = apply_edit(&rows, 2024, 3, GoalField::Sales, "5");

        assert_eq!(edited.len(), 12);
        for (index, row) in edited.iter().enumerate() {
            assert_eq!(row.month, index as u32);
            assert_eq!(row.year, 2024);
        }
        assert_eq!(edited[3].sales_goal, 5);
        assert_eq!(edited[1].monthly_revenue_goal, 0.0);
    }
}
