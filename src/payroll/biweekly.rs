//! Bi-weekly (quincenal) payroll.

use rust_decimal::Decimal;

use crate::calculation::round_cents;
use crate::config::RateTables;
use crate::error::EngineResult;
use crate::models::{
    Deductions, Earnings, Employee, PayrollResult, PayrollSummary, PeriodType, SummaryBasis,
};

use super::common::{PayrollContext, Settlement, summary_basis, withheld};
use super::{PayrollOptions, run_period};

/// Calculates a bi-weekly payroll.
///
/// Gross pay is the daily wage times the days of the quincena. The summary
/// depends on what reduced it:
///
/// - late hire: salary after deductions plus extra pay;
/// - unjustified absences: the salary line is hidden, earnings are gross
///   less late-hire days plus extra pay, and the absence deduction is listed
///   as a withholding;
/// - otherwise: salary plus extra pay.
///
/// Net pay is the same in every case.
pub fn calculate_biweekly_payroll(
    employee: &Employee,
    options: &PayrollOptions,
    tables: &RateTables,
) -> EngineResult<PayrollResult> {
    run_period(PeriodType::Quincenal, employee, options, tables, biweekly)
}

fn biweekly(
    employee: &Employee,
    options: &PayrollOptions,
    tables: &RateTables,
) -> EngineResult<PayrollResult> {
    let mut ctx = PayrollContext::prepare(employee, options, tables)?;

    let gross = round_cents(ctx.daily_wage() * Decimal::from(ctx.period.total_days));
    let late = ctx.late_hire_deduction(gross);
    let adjusted = gross - late;
    let absences = ctx.absence_detail()?;
    let absence_deduction = ctx.discounted_amount(adjusted);
    let after_deductions = adjusted - absence_deduction;

    let social_security = ctx.imss()?;
    let extra_pay = ctx.extra_pay()?;

    let taxable_base = after_deductions + extra_pay.isr_base_addition();
    let income_tax = ctx.isr(taxable_base)?;
    let (isr, imss) = withheld(&income_tax, &social_security);

    let basis = summary_basis(&ctx.attendance);
    let (total_earnings, listed_absences, salary_shown) = match basis {
        SummaryBasis::UnjustifiedAbsences => {
            (adjusted + extra_pay.total(), absence_deduction, false)
        }
        SummaryBasis::LateHire | SummaryBasis::Normal => {
            (after_deductions + extra_pay.total(), Decimal::ZERO, true)
        }
    };
    let total_deductions = isr + imss + listed_absences;

    let settlement = Settlement {
        earnings: Earnings {
            gross_salary: gross,
            late_hire_deduction: late,
            adjusted_salary: adjusted,
            absence_deduction,
            salary_after_deductions: after_deductions,
            sunday_premium: extra_pay.sunday_premium.total,
            holiday_pay: extra_pay.holiday_pay.total,
        },
        deductions: Deductions {
            isr,
            imss,
            absences: listed_absences,
            subsidy_credit: Decimal::ZERO,
            total: total_deductions,
        },
        summary: PayrollSummary {
            total_earnings,
            total_deductions,
            net_pay: total_earnings - total_deductions,
            basis,
            salary_shown,
            taxable_base,
        },
        absences,
        extra_pay,
        social_security,
        income_tax,
    };

    ctx.finish("biweekly_payroll", "Nómina quincenal", settlement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::SubsidyRule;
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

    fn create_employee(wage: Decimal) -> Employee {
        Employee {
            id: "emp_003".to_string(),
            name: "Laura Gómez".to_string(),
            wage: WageBasis::Daily(wage),
            hire_date: date(2024, 1, 1),
            rest_days: [6].into_iter().collect(),
            salary_zone: SalaryZone::General,
            period_type: PeriodType::Quincenal,
            unjustified_absences: vec![],
            justified_absences: vec![],
        }
    }

    // 2025-08-01..15, no holidays, Sundays 3 and 10
    fn first_half_august() -> PayrollOptions {
        PayrollOptions::for_date(date(2025, 8, 1))
    }

    /// PAY-Q-001: normal quincena with the flat subsidy
    #[test]
    fn test_normal_quincena() {
        let tables = load_tables();
        let employee = create_employee(dec!(300.50));

        let result = calculate_biweekly_payroll(&employee, &first_half_august(), &tables).unwrap();

        assert_eq!(result.earnings.gross_salary, dec!(4507.50));
        assert_eq!(result.summary.basis, SummaryBasis::Normal);
        assert_eq!(result.deductions.isr, dec!(99.74));
        let income_tax = result.income_tax.as_ref().unwrap();
        assert_eq!(income_tax.subsidy_rule, SubsidyRule::BiweeklyFlat);
        assert_eq!(result.sbc.daily, dec!(315.31));
    }

    #[test]
    fn test_absences_hide_salary_line() {
        let tables = load_tables();
        let mut employee = create_employee(dec!(500.00));
        employee.unjustified_absences = vec!["2025-08-05".to_string(), "2025-08-06".to_string()];

        let result = calculate_biweekly_payroll(&employee, &first_half_august(), &tables).unwrap();

        assert_eq!(result.summary.basis, SummaryBasis::UnjustifiedAbsences);
        assert!(!result.summary.salary_shown);
        assert_eq!(result.earnings.absence_deduction, dec!(1500.00));
        assert_eq!(result.deductions.absences, dec!(1500.00));
        assert_eq!(result.summary.total_earnings, dec!(7500.00));
        assert_eq!(result.summary.taxable_base, dec!(6000.00));
        assert_eq!(
            result.summary.net_pay,
            result.earnings.salary_after_deductions - result.deductions.isr - result.deductions.imss
        );
    }

    #[test]
    fn test_late_hire_reduces_salary() {
        let tables = load_tables();
        let mut employee = create_employee(dec!(500.00));
        employee.hire_date = date(2025, 8, 6);

        let result = calculate_biweekly_payroll(&employee, &first_half_august(), &tables).unwrap();

        assert_eq!(result.attendance.late_hire_days, 5);
        assert_eq!(result.attendance.days_worked, 10);
        assert_eq!(result.earnings.late_hire_deduction, dec!(2500.00));
        assert_eq!(result.summary.basis, SummaryBasis::LateHire);
        assert_eq!(result.summary.total_earnings, dec!(5000.00));
        // IMSS still covers the full quincena
        assert_eq!(result.social_security.as_ref().unwrap().days, 15);
    }

    #[test]
    fn test_absences_capped_after_late_hire() {
        let tables = load_tables();
        let mut employee = create_employee(dec!(500.00));
        // Hired on Sunday the 10th, absent Monday to Friday
        employee.hire_date = date(2025, 8, 10);
        employee.unjustified_absences = (11..=15)
            .map(|d| date(2025, 8, d).to_string())
            .collect();

        let result = calculate_biweekly_payroll(&employee, &first_half_august(), &tables).unwrap();

        // 9 late days (4500) leave 3000; 7 discounted days (3500) are capped there
        assert_eq!(result.attendance.late_hire_days, 9);
        assert_eq!(result.attendance.discounted_days, 7);
        assert_eq!(result.earnings.late_hire_deduction, dec!(4500.00));
        assert_eq!(result.earnings.absence_deduction, dec!(3000.00));
        assert_eq!(result.earnings.salary_after_deductions, dec!(0));
        assert_eq!(result.summary.net_pay, result.summary.total_earnings - result.summary.total_deductions);
    }

    #[test]
    fn test_sixteen_day_quincena() {
        let tables = load_tables();
        let employee = create_employee(dec!(300.00));
        let options = PayrollOptions::for_date(date(2025, 8, 20));

        let result = calculate_biweekly_payroll(&employee, &options, &tables).unwrap();

        assert_eq!(result.period.total_days, 16);
        assert_eq!(result.earnings.gross_salary, dec!(4800.00));
    }
}
