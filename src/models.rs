use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Targets for one calendar month. `month` is zero-based (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecord {
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub monthly_revenue_goal: f64,
    #[serde(default)]
    pub average_ticket_goal: f64,
    #[serde(default)]
    pub appointments_goal: u64,
    #[serde(default)]
    pub evaluations_goal: u64,
    #[serde(default)]
    pub sales_goal: u64,
}

impl GoalRecord {
    pub fn zeroed(year: i32, month: u32) -> Self {
        Self {
            month,
            year,
            monthly_revenue_goal: 0.0,
            average_ticket_goal: 0.0,
            appointments_goal: 0,
            evaluations_goal: 0,
            sales_goal: 0,
        }
    }

    pub fn value(&self, field: GoalField) -> f64 {
        match field {
            GoalField::MonthlyRevenue => self.monthly_revenue_goal,
            GoalField::AverageTicket => self.average_ticket_goal,
            GoalField::Appointments => self.appointments_goal as f64,
            GoalField::Evaluations => self.evaluations_goal as f64,
            GoalField::Sales => self.sales_goal as f64,
        }
    }
}

/// The editable numeric fields of a [`GoalRecord`], named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalField {
    #[serde(rename = "monthlyRevenueGoal")]
    MonthlyRevenue,
    #[serde(rename = "averageTicketGoal")]
    AverageTicket,
    #[serde(rename = "appointmentsGoal")]
    Appointments,
    #[serde(rename = "evaluationsGoal")]
    Evaluations,
    #[serde(rename = "salesGoal")]
    Sales,
}

impl GoalField {
    pub const ALL: [GoalField; 5] = [
        GoalField::MonthlyRevenue,
        GoalField::AverageTicket,
        GoalField::Appointments,
        GoalField::Evaluations,
        GoalField::Sales,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GoalField::MonthlyRevenue => "monthlyRevenueGoal",
            GoalField::AverageTicket => "averageTicketGoal",
            GoalField::Appointments => "appointmentsGoal",
            GoalField::Evaluations => "evaluationsGoal",
            GoalField::Sales => "salesGoal",
        }
    }

    /// Integer-valued fields drop any fractional part of an edit.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            GoalField::Appointments | GoalField::Evaluations | GoalField::Sales
        )
    }
}

impl fmt::Display for GoalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        GoalField::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| format!("unknown goal field '{value}'"))
    }
}

/// Measured values for one month, as reported by the actuals webhooks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualsSnapshot {
    pub sales_closed: u64,
    pub revenue: f64,
    pub appointments_made: u64,
    pub evaluations_generated: u64,
}

impl ActualsSnapshot {
    pub fn average_ticket(&self) -> f64 {
        if self.sales_closed > 0 {
            self.revenue / self.sales_closed as f64
        } else {
            0.0
        }
    }
}

/// Goal row as stored by the remote goals webhook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteGoalRecord {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub mes: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub ano: i64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub meta_mensal: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub meta_ticket: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub meta_agendamentos: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub meta_avaliacoes: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub meta_quantidade_vendas: f64,
}

impl RemoteGoalRecord {
    /// Maps the remote row onto a [`GoalRecord`]. Rows whose month or year cannot name a
    /// calendar month are dropped; negative amounts become zero.
    pub fn into_goal(self) -> Option<GoalRecord> {
        let month = u32::try_from(self.mes).ok().filter(|month| *month < 12)?;
        let year = i32::try_from(self.ano).ok()?;
        Some(GoalRecord {
            month,
            year,
            monthly_revenue_goal: non_negative(self.meta_mensal),
            average_ticket_goal: non_negative(self.meta_ticket),
            appointments_goal: whole(self.meta_agendamentos),
            evaluations_goal: whole(self.meta_avaliacoes),
            sales_goal: whole(self.meta_quantidade_vendas),
        })
    }
}

impl From<&GoalRecord> for RemoteGoalRecord {
    fn from(goal: &GoalRecord) -> Self {
        Self {
            mes: i64::from(goal.month),
            ano: i64::from(goal.year),
            meta_mensal: goal.monthly_revenue_goal,
            meta_ticket: goal.average_ticket_goal,
            meta_agendamentos: goal.appointments_goal as f64,
            meta_avaliacoes: goal.evaluations_goal as f64,
            meta_quantidade_vendas: goal.sales_goal as f64,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteSalesRow {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub count_id_north: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sum_valor_venda: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteAppointmentsRow {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub count_id_agendamento: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteEvaluationsRow {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub count_id_avaliacao: f64,
}

/// Webhooks answer with a bare object when there is a single row.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

pub(crate) fn whole(value: f64) -> u64 {
    non_negative(value).trunc() as u64
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl LooseNumber {
    fn to_f64(&self) -> f64 {
        match self {
            LooseNumber::Number(value) => *value,
            LooseNumber::Text(text) => text.trim().parse::<f64>().unwrap_or(0.0),
            LooseNumber::Other(_) => 0.0,
        }
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = LooseNumber::deserialize(deserializer)?.to_f64();
    Ok(if value.is_finite() { value } else { 0.0 })
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_f64(deserializer)?;
    if value.fract() != 0.0 {
        // A fractional month or year cannot match any row.
        return Ok(-1);
    }
    Ok(value as i64)
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub year: i32,
    #[serde(default)]
    pub goals: Vec<GoalRecord>,
    pub month: u32,
    pub field: GoalField,
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveGoalsResponse {
    pub year: i32,
    pub goals: Vec<GoalRecord>,
}
