//! Sunday premium calculation.
//!
//! Employees who work on a Sunday receive a premium of 25% of their daily
//! wage (LFT art. 71). The portion of each Sunday's premium up to one UMA is
//! tax exempt (LISR art. 93 fr. XIV); the rest is taxable.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::constants::{SUNDAY_PREMIUM_RATE, UMA_DAILY};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Employee, PayPeriod};

use super::{AbsencePartition, round_cents};

/// The result of a Sunday premium calculation, including the audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SundayPremiumResult {
    /// `true` when Sunday is a rest day and no premium applies.
    pub rests_on_sunday: bool,
    /// Sundays paid.
    pub sundays_paid: Vec<NaiveDate>,
    /// Sundays with a recorded absence.
    pub sundays_missed: Vec<NaiveDate>,
    /// Premium for one Sunday.
    pub premium_per_sunday: Decimal,
    /// Premium for one Sunday above one UMA.
    pub excess_per_sunday: Decimal,
    /// Total premium.
    pub total: Decimal,
    /// Taxable part of the total.
    pub taxable: Decimal,
    /// Exempt part of the total.
    pub exempt: Decimal,
    /// The audit step recording this calculation.
    #[serde(skip)]
    pub audit_step: AuditStep,
}

impl SundayPremiumResult {
    /// Number of Sundays paid.
    pub fn sundays_worked(&self) -> u32 {
        self.sundays_paid.len() as u32
    }
}

/// Calculates the Sunday premium for a period.
///
/// Every Sunday from the later of the period start and the hire date up to
/// the period end is paid, unless Sunday is one of the employee's rest days
/// or an absence (justified or not) is recorded on it.
///
/// # Returns
///
/// Returns a [`SundayPremiumResult`], or [`EngineError::InvalidInput`] when
/// the daily wage is not positive or the period is inverted.
pub fn calculate_sunday_premium(
    employee: &Employee,
    period: &PayPeriod,
    absences: &AbsencePartition,
) -> EngineResult<SundayPremiumResult> {
    let wage = employee.daily_wage();
    if wage <= Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "salario_diario",
            format!("must be positive, got {}", wage),
        ));
    }
    if period.start_date > period.end_date {
        return Err(EngineError::invalid_input(
            "periodo",
            format!("start {} is after end {}", period.start_date, period.end_date),
        ));
    }

    let premium_per_sunday = round_cents(wage * SUNDAY_PREMIUM_RATE);
    let excess_per_sunday = (premium_per_sunday - UMA_DAILY).max(Decimal::ZERO);
    let rests_on_sunday = employee.rests_on_sunday();

    let mut sundays_paid = Vec::new();
    let mut sundays_missed = Vec::new();

    if !rests_on_sunday {
        let first_day = period.start_date.max(employee.hire_date);
        let sundays = first_day
            .iter_days()
            .take_while(|d| *d <= period.end_date)
            .filter(|d| d.weekday() == Weekday::Sun);

        for sunday in sundays {
            if absences.is_absent(sunday) {
                sundays_missed.push(sunday);
            } else {
                sundays_paid.push(sunday);
            }
        }
    }

    let count = Decimal::from(sundays_paid.len());
    let total = premium_per_sunday * count;
    let taxable = excess_per_sunday * count;
    let exempt = total - taxable;

    let reasoning = if rests_on_sunday {
        "Sunday is a rest day; no premium".to_string()
    } else {
        format!(
            "{} Sunday(s) × ${} = ${}; ${} taxable above 1 UMA (${})",
            sundays_paid.len(),
            premium_per_sunday,
            total,
            taxable,
            UMA_DAILY
        )
    };

    let audit_step = AuditStep::new(
        "sunday_premium",
        "Prima dominical",
        "LFT art. 71; LISR art. 93 fr. XIV",
        serde_json::json!({
            "daily_wage": wage.to_string(),
            "hire_date": employee.hire_date.to_string(),
            "rests_on_sunday": rests_on_sunday,
        }),
        serde_json::json!({
            "sundays_paid": sundays_paid.len(),
            "sundays_missed": sundays_missed.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
            "premium_per_sunday": premium_per_sunday.to_string(),
            "total": total.to_string(),
            "taxable": taxable.to_string(),
            "exempt": exempt.to_string(),
        }),
        reasoning,
    );

    Ok(SundayPremiumResult {
        rests_on_sunday,
        sundays_paid,
        sundays_missed,
        premium_per_sunday,
        excess_per_sunday,
        total,
        taxable,
        exempt,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::partition_absences;
    use crate::models::{PeriodType, SalaryZone, WageBasis};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_employee(wage: Decimal, rest_days: &[u8], hire_date: NaiveDate) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            name: "Ana Torres".to_string(),
            wage: WageBasis::Daily(wage),
            hire_date,
            rest_days: rest_days.iter().copied().collect(),
            salary_zone: SalaryZone::General,
            period_type: PeriodType::Quincenal,
            unjustified_absences: vec![],
            justified_absences: vec![],
        }
    }

    fn august_first_half() -> PayPeriod {
        // 2025-08-03 and 2025-08-10 are Sundays
        PayPeriod::biweekly_containing(date(2025, 8, 1))
    }

    /// SUN-001: premium paid for each Sunday worked, below one UMA fully exempt
    #[test]
    fn test_two_sundays_below_uma() {
        let employee = create_employee(dec!(300.00), &[5], date(2024, 1, 1));
        let period = august_first_half();
        let absences = partition_absences(&employee, period.start_date, period.end_date);

        let result = calculate_sunday_premium(&employee, &period, &absences).unwrap();

        assert_eq!(result.sundays_worked(), 2);
        assert_eq!(result.premium_per_sunday, dec!(75.00));
        assert_eq!(result.total, dec!(150.00));
        assert_eq!(result.taxable, dec!(0));
        assert_eq!(result.exempt, dec!(150.00));
    }

    /// SUN-002: premium above one UMA is taxable per Sunday
    #[test]
    fn test_excess_over_uma_is_taxable() {
        let employee = create_employee(dec!(600.00), &[5], date(2024, 1, 1));
        let period = august_first_half();
        let absences = partition_absences(&employee, period.start_date, period.end_date);

        let result = calculate_sunday_premium(&employee, &period, &absences).unwrap();

        // 150.00 − 113.14 = 36.86 per Sunday
        assert_eq!(result.excess_per_sunday, dec!(36.86));
        assert_eq!(result.total, dec!(300.00));
        assert_eq!(result.taxable, dec!(73.72));
        assert_eq!(result.exempt, dec!(226.28));
    }

    #[test]
    fn test_sunday_rest_day_pays_nothing() {
        let employee = create_employee(dec!(300.00), &[6], date(2024, 1, 1));
        let period = august_first_half();
        let absences = partition_absences(&employee, period.start_date, period.end_date);

        let result = calculate_sunday_premium(&employee, &period, &absences).unwrap();

        assert!(result.rests_on_sunday);
        assert_eq!(result.total, dec!(0));
        assert!(result.sundays_paid.is_empty());
    }

    /// SUN-003: a justified absence on a Sunday also forfeits the premium
    #[test]
    fn test_sunday_with_justified_absence_is_missed() {
        let mut employee = create_employee(dec!(300.00), &[5], date(2024, 1, 1));
        employee.justified_absences = vec!["2025-08-10".to_string()];
        let period = august_first_half();
        let absences = partition_absences(&employee, period.start_date, period.end_date);

        let result = calculate_sunday_premium(&employee, &period, &absences).unwrap();

        assert_eq!(result.sundays_paid, vec![date(2025, 8, 3)]);
        assert_eq!(result.sundays_missed, vec![date(2025, 8, 10)]);
        assert_eq!(result.total, dec!(75.00));
    }

    #[test]
    fn test_sundays_before_hire_are_not_paid() {
        let employee = create_employee(dec!(300.00), &[5], date(2025, 8, 5));
        let period = august_first_half();
        let absences = partition_absences(&employee, period.start_date, period.end_date);

        let result = calculate_sunday_premium(&employee, &period, &absences).unwrap();

        assert_eq!(result.sundays_paid, vec![date(2025, 8, 10)]);
    }

    #[test]
    fn test_hired_after_period_pays_nothing() {
        let employee = create_employee(dec!(300.00), &[5], date(2025, 9, 1));
        let period = august_first_half();
        let absences = partition_absences(&employee, period.start_date, period.end_date);

        let result = calculate_sunday_premium(&employee, &period, &absences).unwrap();

        assert_eq!(result.sundays_worked(), 0);
        assert_eq!(result.total, dec!(0));
    }

    #[test]
    fn test_non_positive_wage_rejected() {
        let employee = create_employee(dec!(0), &[5], date(2024, 1, 1));
        let period = august_first_half();
        let result = calculate_sunday_premium(&employee, &period, &AbsencePartition::default());
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }
}
