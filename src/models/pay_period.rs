//! Pay period models.
//!
//! This module contains the [`PeriodType`] and [`PayPeriod`] types used to
//! define the calculation window of a payroll, plus the period generation
//! for a whole year.

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Upper-case Spanish month names used in period labels.
const MONTH_NAMES: [&str; 12] = [
    "ENERO",
    "FEBRERO",
    "MARZO",
    "ABRIL",
    "MAYO",
    "JUNIO",
    "JULIO",
    "AGOSTO",
    "SEPTIEMBRE",
    "OCTUBRE",
    "NOVIEMBRE",
    "DICIEMBRE",
];

/// How often an employee is paid.
///
/// # Example
///
/// ```
/// use nomina_engine::models::PeriodType;
///
/// let json = serde_json::to_string(&PeriodType::Quincenal).unwrap();
/// assert_eq!(json, "\"QUINCENAL\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PeriodType {
    /// Weekly, Monday to Sunday.
    Semanal,
    /// Bi-weekly, days 1-15 or 16 to the end of the month.
    Quincenal,
    /// Full calendar month.
    Mensual,
}

impl PeriodType {
    /// All period types, in ascending length.
    pub const ALL: [PeriodType; 3] = [PeriodType::Semanal, PeriodType::Quincenal, PeriodType::Mensual];

    /// Name of the ISR tariff table for this period type.
    pub fn isr_table_name(self) -> &'static str {
        match self {
            PeriodType::Semanal => "isr_semanal",
            PeriodType::Quincenal => "isr_quincenal",
            PeriodType::Mensual => "isr_mensual",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PeriodType::Semanal => "SEMANAL",
            PeriodType::Quincenal => "QUINCENAL",
            PeriodType::Mensual => "MENSUAL",
        };
        f.write_str(s)
    }
}

/// Returns the upper-case Spanish name of a month (1-12).
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month.clamp(1, 12) - 1) as usize]
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date) + Months::new(1) - Days::new(1)
}

fn first_of_year(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.ordinal0()))
}

/// A pay period with its date range, type and labels.
///
/// Periods are immutable once built. Use the `*_containing` constructors to
/// derive the period around a reference date, or [`generate_periods`] for a
/// full year.
///
/// # Example
///
/// ```
/// use nomina_engine::models::{PayPeriod, PeriodType};
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::containing(
///     PeriodType::Quincenal,
///     NaiveDate::from_ymd_opt(2025, 8, 7).unwrap(),
/// );
///
/// assert_eq!(period.label, "AGOSTO/01");
/// assert_eq!(period.total_days, 15);
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 8, 15).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// Stable identifier (e.g. `2025-Q1-08`, `2025-S-32`, `2025-M-08`).
    pub id: String,
    /// The period type.
    pub period_type: PeriodType,
    /// The start date of the period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the period (inclusive).
    pub end_date: NaiveDate,
    /// Calendar days in the period.
    pub total_days: u32,
    /// Human label (e.g. `AGOSTO/01`, `SEMANA 32`, `AGOSTO`).
    pub label: String,
    /// Month-relative label for weekly periods (e.g. `AGOSTO/02`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nominal_label: Option<String>,
    /// Month of the start date.
    pub month: u32,
    /// Year of the start date.
    pub year: i32,
}

impl PayPeriod {
    /// Builds a period of `period_type` over an explicit date range.
    ///
    /// Id and labels are derived from the start date. Fails with
    /// [`EngineError::PeriodConsistency`] when `start_date` is after
    /// `end_date`.
    pub fn new(
        period_type: PeriodType,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> EngineResult<Self> {
        if start_date > end_date {
            return Err(EngineError::PeriodConsistency {
                message: format!(
                    "period start {} is after period end {}",
                    start_date, end_date
                ),
            });
        }

        Ok(Self::build(period_type, start_date, end_date))
    }

    fn build(period_type: PeriodType, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        let month = start_date.month();
        let year = start_date.year();
        let (id, label, nominal_label) = match period_type {
            PeriodType::Semanal => {
                let week = (start_date - first_of_year(start_date)).num_days() / 7 + 1;
                let week_of_month = start_date.day0() / 7 + 1;
                (
                    format!("{}-S-{:02}", year, week),
                    format!("SEMANA {}", week),
                    Some(format!("{}/{:02}", month_name(month), week_of_month)),
                )
            }
            PeriodType::Quincenal => {
                let half = if start_date.day() <= 15 { 1 } else { 2 };
                (
                    format!("{}-Q{}-{:02}", year, half, month),
                    format!("{}/{:02}", month_name(month), half),
                    None,
                )
            }
            PeriodType::Mensual => (
                format!("{}-M-{:02}", year, month),
                month_name(month).to_string(),
                None,
            ),
        };

        Self {
            id,
            period_type,
            start_date,
            end_date,
            total_days: ((end_date - start_date).num_days() + 1) as u32,
            label,
            nominal_label,
            month,
            year,
        }
    }

    /// The Monday-to-Sunday week containing `date`.
    pub fn weekly_containing(date: NaiveDate) -> Self {
        let start = date - Days::new(u64::from(date.weekday().num_days_from_monday()));
        Self::build(PeriodType::Semanal, start, start + Days::new(6))
    }

    /// The quincena (1-15 or 16-end of month) containing `date`.
    pub fn biweekly_containing(date: NaiveDate) -> Self {
        let first = first_of_month(date);
        let (start, end) = if date.day() <= 15 {
            (first, first + Days::new(14))
        } else {
            (first + Days::new(15), last_of_month(date))
        };
        Self::build(PeriodType::Quincenal, start, end)
    }

    /// The calendar month containing `date`.
    pub fn monthly_containing(date: NaiveDate) -> Self {
        Self::build(PeriodType::Mensual, first_of_month(date), last_of_month(date))
    }

    /// The period of `period_type` containing `date`.
    pub fn containing(period_type: PeriodType, date: NaiveDate) -> Self {
        match period_type {
            PeriodType::Semanal => Self::weekly_containing(date),
            PeriodType::Quincenal => Self::biweekly_containing(date),
            PeriodType::Mensual => Self::monthly_containing(date),
        }
    }

    /// Checks if a given date falls within this pay period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Iterates over every date of the period in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |d| *d <= self.end_date)
    }
}

/// Generates every pay period of `period_type` in `year`.
///
/// - Weekly: consecutive Monday-to-Sunday weeks starting at the first Monday
///   on or after January 1st, while the week starts inside the year.
/// - Bi-weekly: 24 quincenas.
/// - Monthly: 12 months.
///
/// Fails with [`EngineError::InvalidInput`] when `year` is outside the
/// supported calendar range.
pub fn generate_periods(period_type: PeriodType, year: i32) -> EngineResult<Vec<PayPeriod>> {
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| EngineError::invalid_input("year", format!("{} is out of range", year)))?;

    let periods = match period_type {
        PeriodType::Semanal => {
            let offset = (7 - jan_first.weekday().num_days_from_monday()) % 7;
            let first_monday = jan_first + Days::new(u64::from(offset));
            (0u64..)
                .map(|week| first_monday + Days::new(week * 7))
                .take_while(|start| start.year() == year)
                .map(PayPeriod::weekly_containing)
                .collect()
        }
        PeriodType::Quincenal => (0u32..12)
            .flat_map(|m| {
                let first = jan_first + Months::new(m);
                [first, first + Days::new(15)]
            })
            .map(PayPeriod::biweekly_containing)
            .collect(),
        PeriodType::Mensual => (0u32..12)
            .map(|m| PayPeriod::monthly_containing(jan_first + Months::new(m)))
            .collect(),
    };

    Ok(periods)
}
