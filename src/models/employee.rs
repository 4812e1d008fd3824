//! Employee snapshot model and related types.
//!
//! [`Employee`] is the read-only view of a worker that every calculator
//! borrows. It is normally built from an [`EmployeeRecord`], the loosely
//! typed shape the persistence layer hands over, through `TryFrom`.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{parse_amount, round_cents};
use crate::config::constants::MONTHLY_SALARY_DAYS;
use crate::error::{EngineError, EngineResult};

use super::PeriodType;

/// Sunday as a rest-day index (0 = Monday).
pub const SUNDAY: u8 = 6;

/// Minimum wage zone the employee works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalaryZone {
    /// General zone.
    General,
    /// Northern border free zone.
    Frontera,
}

/// How the employee's pay is expressed.
///
/// Monthly-paid employees carry a monthly salary; weekly and bi-weekly
/// employees carry a daily wage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "amount")]
pub enum WageBasis {
    /// Daily wage (salario diario).
    Daily(Decimal),
    /// Monthly salary (sueldo mensual).
    Monthly(Decimal),
}

impl WageBasis {
    /// Returns the daily wage rounded to cents: the amount itself for a daily
    /// basis, or the monthly salary over 30 days.
    ///
    /// # Example
    ///
    /// ```
    /// use nomina_engine::models::WageBasis;
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(WageBasis::Daily(dec!(300.50)).daily_wage(), dec!(300.50));
    /// assert_eq!(WageBasis::Daily(dec!(300.504)).daily_wage(), dec!(300.50));
    /// assert_eq!(WageBasis::Monthly(dec!(10000)).daily_wage(), dec!(333.33));
    /// ```
    pub fn daily_wage(&self) -> Decimal {
        match self {
            WageBasis::Daily(amount) => round_cents(*amount),
            WageBasis::Monthly(amount) => round_cents(*amount / MONTHLY_SALARY_DAYS),
        }
    }

    /// Returns the raw amount regardless of basis.
    pub fn amount(&self) -> Decimal {
        match self {
            WageBasis::Daily(amount) | WageBasis::Monthly(amount) => *amount,
        }
    }

    /// Returns `true` if the basis is the one `period_type` requires.
    pub fn matches(&self, period_type: PeriodType) -> bool {
        matches!(
            (self, period_type),
            (WageBasis::Monthly(_), PeriodType::Mensual)
                | (WageBasis::Daily(_), PeriodType::Semanal | PeriodType::Quincenal)
        )
    }
}

/// An employee snapshot as seen by the payroll calculators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Daily wage or monthly salary.
    pub wage: WageBasis,
    /// Date the employee joined (fecha de ingreso).
    pub hire_date: NaiveDate,
    /// Weekly rest days, 0 = Monday through 6 = Sunday.
    pub rest_days: BTreeSet<u8>,
    /// Minimum wage zone.
    pub salary_zone: SalaryZone,
    /// How often the employee is paid.
    pub period_type: PeriodType,
    /// Unjustified absence dates as recorded (`YYYY-MM-DD`).
    #[serde(default)]
    pub unjustified_absences: Vec<String>,
    /// Justified absence dates as recorded (`YYYY-MM-DD`).
    #[serde(default)]
    pub justified_absences: Vec<String>,
}

impl Employee {
    /// Returns the daily wage used by every calculator.
    pub fn daily_wage(&self) -> Decimal {
        self.wage.daily_wage()
    }

    /// Returns `true` if `date` falls on one of the employee's rest days.
    pub fn is_rest_day(&self, date: NaiveDate) -> bool {
        self.rest_days
            .contains(&(date.weekday().num_days_from_monday() as u8))
    }

    /// Returns `true` if Sunday is one of the employee's rest days.
    pub fn rests_on_sunday(&self) -> bool {
        self.rest_days.contains(&SUNDAY)
    }

    /// Checks the snapshot invariants.
    ///
    /// - The wage basis matches the period type ([`EngineError::MissingField`]).
    /// - The wage is positive ([`EngineError::InvalidInput`]).
    /// - Rest days are in 0..=6 ([`EngineError::InvalidInput`]).
    pub fn validate(&self) -> EngineResult<()> {
        if !self.wage.matches(self.period_type) {
            return Err(EngineError::MissingField {
                field: wage_field(self.period_type).to_string(),
                period_type: self.period_type,
            });
        }

        if self.wage.amount() <= Decimal::ZERO {
            return Err(EngineError::invalid_input(
                wage_field(self.period_type),
                format!("must be positive, got {}", self.wage.amount()),
            ));
        }

        if let Some(day) = self.rest_days.iter().find(|d| **d > SUNDAY) {
            return Err(EngineError::invalid_input(
                "dias_descanso",
                format!("{} is not a weekday index (0-6)", day),
            ));
        }

        Ok(())
    }
}

fn wage_field(period_type: PeriodType) -> &'static str {
    match period_type {
        PeriodType::Mensual => "sueldo_mensual",
        PeriodType::Semanal | PeriodType::Quincenal => "salario_diario",
    }
}

/// An employee as stored by the persistence layer.
///
/// Amounts arrive as optional canonical decimal strings. Only the one
/// matching `periodo_nominal` may be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Unique identifier for the employee.
    pub id: String,
    /// Given name.
    #[serde(rename = "nombre")]
    pub first_name: String,
    /// Paternal surname.
    #[serde(rename = "apellido_paterno")]
    pub paternal_surname: String,
    /// Maternal surname.
    #[serde(rename = "apellido_materno", default)]
    pub maternal_surname: Option<String>,
    /// Daily wage, required for weekly and bi-weekly payrolls.
    #[serde(rename = "salario_diario", default)]
    pub daily_wage: Option<String>,
    /// Monthly salary, required for monthly payrolls.
    #[serde(rename = "sueldo_mensual", default)]
    pub monthly_salary: Option<String>,
    /// Hire date.
    #[serde(rename = "fecha_ingreso")]
    pub hire_date: Option<NaiveDate>,
    /// Pay period type.
    #[serde(rename = "periodo_nominal")]
    pub period_type: PeriodType,
    /// Rest days, 0 = Monday.
    #[serde(rename = "dias_descanso", default)]
    pub rest_days: Vec<u8>,
    /// Minimum wage zone.
    #[serde(rename = "zona_salarial")]
    pub salary_zone: SalaryZone,
    /// Unjustified absence dates.
    #[serde(rename = "fechas_faltas_injustificadas", default)]
    pub unjustified_absences: Vec<String>,
    /// Justified absence dates.
    #[serde(rename = "fechas_faltas_justificadas", default)]
    pub justified_absences: Vec<String>,
}

impl TryFrom<EmployeeRecord> for Employee {
    type Error = EngineError;

    fn try_from(record: EmployeeRecord) -> EngineResult<Self> {
        let period_type = record.period_type;
        let missing = |field: &str| EngineError::MissingField {
            field: field.to_string(),
            period_type,
        };
        let must_be_empty = |field: &str| {
            EngineError::invalid_input(field, format!("must be empty for {} payroll", period_type))
        };

        let wage = match period_type {
            PeriodType::Mensual => {
                if record.daily_wage.is_some() {
                    return Err(must_be_empty("salario_diario"));
                }
                let raw = record
                    .monthly_salary
                    .as_deref()
                    .ok_or_else(|| missing("sueldo_mensual"))?;
                WageBasis::Monthly(parse_amount(raw)?)
            }
            PeriodType::Semanal | PeriodType::Quincenal => {
                if record.monthly_salary.is_some() {
                    return Err(must_be_empty("sueldo_mensual"));
                }
                let raw = record
                    .daily_wage
                    .as_deref()
                    .ok_or_else(|| missing("salario_diario"))?;
                WageBasis::Daily(parse_amount(raw)?)
            }
        };

        let hire_date = record.hire_date.ok_or_else(|| missing("fecha_ingreso"))?;

        let name = [
            Some(record.first_name.as_str()),
            Some(record.paternal_surname.as_str()),
            record.maternal_surname.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        let employee = Employee {
            id: record.id,
            name,
            wage,
            hire_date,
            rest_days: record.rest_days.into_iter().collect(),
            salary_zone: record.salary_zone,
            period_type,
            unjustified_absences: record.unjustified_absences,
            justified_absences: record.justified_absences,
        };
        employee.validate()?;

        Ok(employee)
    }
}
