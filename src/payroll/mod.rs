//! Period payroll orchestrators.
//!
//! Each orchestrator turns an [`Employee`] snapshot, a period and the rate
//! tables into a fully itemized [`PayrollResult`]. They share period
//! resolution, attendance, IMSS, extra pay and ISR steps, and differ in how
//! gross pay, the ISR base and the summary are assembled for their period
//! type.
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use nomina_engine::config::ConfigLoader;
//! use nomina_engine::models::{Employee, PeriodType, SalaryZone, WageBasis};
//! use nomina_engine::payroll::{PayrollOptions, calculate_payroll};
//! use rust_decimal_macros::dec;
//!
//! let loader = ConfigLoader::load("./config/mx2025").unwrap();
//! let employee = Employee {
//!     id: "emp_001".to_string(),
//!     name: "Juan Pérez".to_string(),
//!     wage: WageBasis::Daily(dec!(500.00)),
//!     hire_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     rest_days: [6].into_iter().collect(),
//!     salary_zone: SalaryZone::General,
//!     period_type: PeriodType::Quincenal,
//!     unjustified_absences: vec![],
//!     justified_absences: vec![],
//! };
//! let options = PayrollOptions::for_date(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
//! let result = calculate_payroll(&employee, &options, loader.tables()).unwrap();
//! println!("Net pay: {}", result.summary.net_pay);
//! ```

mod biweekly;
mod common;
mod monthly;
mod weekly;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::RateTables;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, PayPeriod, PayrollResult, PeriodType};

pub use biweekly::calculate_biweekly_payroll;
pub use monthly::calculate_monthly_payroll;
pub use weekly::calculate_weekly_payroll;

/// Inputs that select the period and override derived values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollOptions {
    /// Date the period is derived from when no explicit period is given.
    pub reference_date: NaiveDate,
    /// Explicit period; must match the employee's period type.
    pub period: Option<PayPeriod>,
    /// Days worked, replacing the count derived from hire date and absences.
    pub days_worked: Option<u32>,
}

impl PayrollOptions {
    /// Options deriving the period from `reference_date`.
    pub fn for_date(reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            period: None,
            days_worked: None,
        }
    }

    /// Uses `period` instead of deriving one.
    pub fn with_period(mut self, period: PayPeriod) -> Self {
        self.reference_date = period.start_date;
        self.period = Some(period);
        self
    }

    /// Overrides the days worked.
    pub fn with_days_worked(mut self, days: u32) -> Self {
        self.days_worked = Some(days);
        self
    }
}

/// Calculates the payroll of `employee` with the orchestrator for their
/// pay-period type.
///
/// # Errors
///
/// - [`EngineError::MissingField`] when the snapshot lacks the wage field
///   its period type requires.
/// - [`EngineError::InvalidInput`] for a non-positive wage or bad rest days.
/// - [`EngineError::Payroll`] wrapping any failure of the period
///   calculation, with the employee id and period.
pub fn calculate_payroll(
    employee: &Employee,
    options: &PayrollOptions,
    tables: &RateTables,
) -> EngineResult<PayrollResult> {
    match employee.period_type {
        PeriodType::Semanal => calculate_weekly_payroll(employee, options, tables),
        PeriodType::Quincenal => calculate_biweekly_payroll(employee, options, tables),
        PeriodType::Mensual => calculate_monthly_payroll(employee, options, tables),
    }
}

/// Runs `calculate` for an employee of `period_type`, validating the
/// snapshot first and wrapping any later failure with context.
fn run_period(
    period_type: PeriodType,
    employee: &Employee,
    options: &PayrollOptions,
    tables: &RateTables,
    calculate: impl FnOnce(&Employee, &PayrollOptions, &RateTables) -> EngineResult<PayrollResult>,
) -> EngineResult<PayrollResult> {
    if employee.period_type != period_type {
        return Err(EngineError::invalid_input(
            "periodo_nominal",
            format!(
                "employee is paid {} but a {} payroll was requested",
                employee.period_type, period_type
            ),
        ));
    }
    employee.validate()?;

    info!(
        employee_id = %employee.id,
        period_type = %period_type,
        reference_date = %options.reference_date,
        "Calculating payroll"
    );

    match calculate(employee, options, tables) {
        Ok(result) => {
            info!(
                employee_id = %employee.id,
                period = %result.period.id,
                net_pay = %result.summary.net_pay,
                steps = result.audit.steps.len(),
                warnings = result.audit.warnings.len(),
                "Payroll calculated"
            );
            Ok(result)
        }
        Err(err) => {
            let period = options
                .period
                .as_ref()
                .map(|p| p.id.clone())
                .unwrap_or_else(|| PayPeriod::containing(period_type, options.reference_date).id);
            warn!(employee_id = %employee.id, period = %period, error = %err, "Payroll failed");
            Err(EngineError::Payroll {
                employee_id: employee.id.clone(),
                period,
                source: Box::new(err),
            })
        }
    }
}
