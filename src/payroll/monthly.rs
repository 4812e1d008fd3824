//! Monthly (mensual) payroll.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculation::round_cents;
use crate::config::RateTables;
use crate::config::constants::{SUBSIDY_INCOME_CAP, monthly_employment_subsidy};
use crate::error::EngineResult;
use crate::models::{
    AuditStep, Deductions, Earnings, Employee, PayrollResult, PayrollSummary, PeriodType,
};

use super::common::{PayrollContext, Settlement, summary_basis, withheld};
use super::{PayrollOptions, run_period};

/// Calculates a monthly payroll.
///
/// Gross pay is the monthly salary; the daily wage used for late-hire days,
/// absences and IMSS is the salary over 30 days. After the bracket subsidy,
/// a month-keyed subsidy is credited against the ISR when the adjusted
/// salary does not exceed the income cap. The absence deduction is listed as
/// a withholding.
pub fn calculate_monthly_payroll(
    employee: &Employee,
    options: &PayrollOptions,
    tables: &RateTables,
) -> EngineResult<PayrollResult> {
    run_period(PeriodType::Mensual, employee, options, tables, monthly)
}

fn monthly(
    employee: &Employee,
    options: &PayrollOptions,
    tables: &RateTables,
) -> EngineResult<PayrollResult> {
    let mut ctx = PayrollContext::prepare(employee, options, tables)?;

    let gross = round_cents(employee.wage.amount());
    let late = ctx.late_hire_deduction(gross);
    let adjusted = gross - late;
    let absences = ctx.absence_detail()?;
    let absence_deduction = ctx.discounted_amount(adjusted);

    let social_security = ctx.imss()?;
    let extra_pay = ctx.extra_pay()?;

    let taxable_base = gross + extra_pay.isr_base_addition() - absence_deduction - late;
    let income_tax = ctx.isr(taxable_base)?;
    let (bracket_isr, imss) = withheld(&income_tax, &social_security);

    let subsidy_credit = if income_tax.is_some() && adjusted <= SUBSIDY_INCOME_CAP {
        monthly_employment_subsidy(ctx.period.month)
    } else {
        Decimal::ZERO
    };
    let isr = round_cents((bracket_isr - subsidy_credit).max(Decimal::ZERO));
    if income_tax.is_some() {
        debug!(
            employee_id = %employee.id,
            adjusted = %adjusted,
            subsidy_credit = %subsidy_credit,
            "Applied monthly employment subsidy"
        );
        ctx.trace.record(AuditStep::new(
            "monthly_subsidy",
            "Subsidio al empleo mensual",
            "Decreto de subsidio al empleo 2025",
            serde_json::json!({
                "adjusted_salary": adjusted.to_string(),
                "income_cap": SUBSIDY_INCOME_CAP.to_string(),
                "month": ctx.period.month,
            }),
            serde_json::json!({
                "subsidy_credit": subsidy_credit.to_string(),
                "isr": isr.to_string(),
            }),
            if subsidy_credit > Decimal::ZERO {
                format!("${} ≤ ${}: ${} credited", adjusted, SUBSIDY_INCOME_CAP, subsidy_credit)
            } else {
                format!("${} > ${}: no credit", adjusted, SUBSIDY_INCOME_CAP)
            },
        ));
    }

    let total_earnings = adjusted + extra_pay.total();
    let total_deductions = isr + imss + absence_deduction;

    let settlement = Settlement {
        earnings: Earnings {
            gross_salary: gross,
            late_hire_deduction: late,
            adjusted_salary: adjusted,
            absence_deduction,
            salary_after_deductions: adjusted - absence_deduction,
            sunday_premium: extra_pay.sunday_premium.total,
            holiday_pay: extra_pay.holiday_pay.total,
        },
        deductions: Deductions {
            isr,
            imss,
            absences: absence_deduction,
            subsidy_credit,
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

    ctx.finish("monthly_payroll", "Nómina mensual", settlement)
}
