//! Weekly (semanal) payroll.

use rust_decimal::Decimal;

use crate::calculation::round_cents;
use crate::config::RateTables;
use crate::config::constants::WEEKLY_SALARY_DAYS;
use crate::error::EngineResult;
use crate::models::{Deductions, Earnings, Employee, PayrollResult, PayrollSummary, PeriodType};

use super::common::{PayrollContext, Settlement, summary_basis, withheld};
use super::{PayrollOptions, run_period};

/// Calculates a weekly payroll.
///
/// Gross pay is seven daily wages. Days before the hire date and the
/// aggregate absence deduction reduce it to the effective salary; the ISR
/// base adds holiday pay and the Sunday premium above one UMA; the weekly
/// subsidy schedule applies.
pub fn calculate_weekly_payroll(
    employee: &Employee,
    options: &PayrollOptions,
    tables: &RateTables,
) -> EngineResult<PayrollResult> {
    run_period(PeriodType::Semanal, employee, options, tables, weekly)
}

fn weekly(
    employee: &Employee,
    options: &PayrollOptions,
    tables: &RateTables,
) -> EngineResult<PayrollResult> {
    let mut ctx = PayrollContext::prepare(employee, options, tables)?;

    let gross = round_cents(ctx.daily_wage() * WEEKLY_SALARY_DAYS);
    let late = ctx.late_hire_deduction(gross);
    let adjusted = gross - late;
    let absences = ctx.absence_detail()?;
    let absence_deduction = ctx.discounted_amount(adjusted);
    let effective = adjusted - absence_deduction;

    let social_security = ctx.imss()?;
    let extra_pay = ctx.extra_pay()?;

    let taxable_base = effective + extra_pay.isr_base_addition();
    let income_tax = ctx.isr(taxable_base)?;
    let (isr, imss) = withheld(&income_tax, &social_security);

    let total_earnings = effective + extra_pay.total();
    let total_deductions = isr + imss;

    let settlement = Settlement {
        earnings: Earnings {
            gross_salary: gross,
            late_hire_deduction: late,
            adjusted_salary: adjusted,
            absence_deduction,
            salary_after_deductions: effective,
            sunday_premium: extra_pay.sunday_premium.total,
            holiday_pay: extra_pay.holiday_pay.total,
        },
        deductions: Deductions {
            isr,
            imss,
            absences: Decimal::ZERO,
            subsidy_credit: Decimal::ZERO,
            total: total_deductions,
        },
        summary: PayrollSummary {
            total_earnings,
            total_deductions,
            net_pay: total_earnings - total_deductions,
            basis: summary_basis(&ctx.attendance),
            salary_shown: true,
            taxable_base,
        },
        absences,
        extra_pay,
        social_security,
        income_tax,
    };

    ctx.finish("weekly_payroll", "Nómina semanal", settlement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::{SalaryZone, WageBasis};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn load_tables() -> RateTables {
        ConfigLoader::load("config/mx2025")
            .expect("Failed to load tables")
            .into_tables()
    }

    fn create_employee(wage: Decimal, rest_days: &[u8]) -> Employee {
        Employee {
            id: "emp_002".to_string(),
            name: "Pedro Sánchez".to_string(),
            wage: WageBasis::Daily(wage),
            hire_date: date(2024, 1, 1),
            rest_days: rest_days.iter().copied().collect(),
            salary_zone: SalaryZone::General,
            period_type: PeriodType::Semanal,
            unjustified_absences: vec![],
            justified_absences: vec![],
        }
    }

    // Week of 2025-08-04 (Monday) to 2025-08-10 (Sunday), no holidays
    fn august_week() -> PayrollOptions {
        PayrollOptions::for_date(date(2025, 8, 6))
    }

    /// PAY-W-001: full week with Sunday as rest day
    #[test]
    fn test_full_week() {
        let tables = load_tables();
        let employee = create_employee(dec!(300.00), &[6]);

        let result = calculate_weekly_payroll(&employee, &august_week(), &tables).unwrap();

        assert_eq!(result.earnings.gross_salary, dec!(2100.00));
        assert_eq!(result.summary.taxable_base, dec!(2100.00));
        assert_eq!(result.deductions.isr, dec!(155.46));
        assert_eq!(result.deductions.imss, dec!(52.33));
        assert_eq!(result.summary.total_earnings, dec!(2100.00));
        assert_eq!(result.summary.net_pay, dec!(1892.21));
    }

    #[test]
    fn test_worked_sunday_adds_premium() {
        let tables = load_tables();
        let employee = create_employee(dec!(300.00), &[5]);

        let result = calculate_weekly_payroll(&employee, &august_week(), &tables).unwrap();

        assert_eq!(result.earnings.sunday_premium, dec!(75.00));
        // Premium below one UMA stays out of the ISR base
        assert_eq!(result.summary.taxable_base, dec!(2100.00));
        assert_eq!(result.summary.total_earnings, dec!(2175.00));
    }

    #[test]
    fn test_two_absences_discount_three_days() {
        let tables = load_tables();
        let mut employee = create_employee(dec!(300.00), &[6]);
        employee.unjustified_absences = vec!["2025-08-05".to_string(), "2025-08-06".to_string()];

        let result = calculate_weekly_payroll(&employee, &august_week(), &tables).unwrap();

        assert_eq!(result.attendance.days_worked, 5);
        assert_eq!(result.earnings.absence_deduction, dec!(900.00));
        assert_eq!(result.earnings.salary_after_deductions, dec!(1200.00));
        assert_eq!(
            result.summary.net_pay,
            result.summary.total_earnings - result.summary.total_deductions
        );
    }

    #[test]
    fn test_audit_steps_in_order() {
        let tables = load_tables();
        let employee = create_employee(dec!(300.00), &[6]);

        let result = calculate_weekly_payroll(&employee, &august_week(), &tables).unwrap();

        let rules: Vec<&str> = result.audit.steps.iter().map(|s| s.rule_id.as_str()).collect();
        assert_eq!(
            rules,
            vec![
                "minimum_wage_exemption",
                "absence_deduction",
                "imss_quotas",
                "sunday_premium",
                "holiday_pay",
                "isr_withholding",
                "weekly_payroll",
            ]
        );
        assert_eq!(result.audit.steps.last().map(|s| s.step_number), Some(7));
    }
}
