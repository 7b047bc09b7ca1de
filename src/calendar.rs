use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

pub const MIN_YEAR: i32 = 1970;
pub const MAX_YEAR: i32 = 9999;

/// A calendar month with a zero-based `month` index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

impl MonthRef {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if month < 12 && (MIN_YEAR..=MAX_YEAR).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn previous(self) -> Self {
        if self.month == 0 {
            Self {
                year: self.year - 1,
                month: 11,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 11 {
            Self {
                year: self.year + 1,
                month: 0,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1).unwrap_or_default()
    }

    pub fn last_day(self) -> NaiveDate {
        self.next().first_day() - Duration::days(1)
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[self.month as usize % 12]
    }

    pub fn label(self) -> String {
        format!("{} {}", self.name(), self.year)
    }
}

/// Working days (Monday to Saturday) left in `month`, counting `today`.
pub fn remaining_business_days(month: MonthRef, today: NaiveDate) -> u32 {
    let last = month.last_day();
    if today > last {
        return 0;
    }
    let mut day = today.max(month.first_day());
    let mut count = 0;
    while day <= last {
        if day.weekday() != Weekday::Sun {
            count += 1;
        }
        day += Duration::days(1);
    }
    count
}
