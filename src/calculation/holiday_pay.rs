//! Holiday pay calculation.
//!
//! An employee who works a mandatory rest day (LFT art. 74) is paid double
//! the daily wage for it (LFT art. 75). Part of that pay is tax exempt up to
//! the LISR art. 93 cap.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::RateTables;
use crate::config::constants::{
    HOLIDAY_EXEMPT_SHARE, HOLIDAY_EXEMPT_UMA_PER_WEEK, HOLIDAY_PAY_MULTIPLIER, UMA_DAILY,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Employee, PayPeriod};

use super::{AbsencePartition, round_cents};

/// A holiday that was paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HolidayPayment {
    /// Date of the holiday.
    pub date: NaiveDate,
    /// Name of the holiday.
    pub name: String,
    /// Amount paid.
    pub amount: Decimal,
}

/// Why a holiday inside the period was not paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnpaidReason {
    /// The employee was hired after the holiday.
    BeforeHire,
    /// The holiday falls on one of the employee's rest days.
    RestDay,
    /// An unjustified absence is recorded on the holiday.
    UnjustifiedAbsence,
    /// A justified absence is recorded on the holiday.
    JustifiedAbsence,
}

/// A holiday inside the period that was not paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnpaidHoliday {
    /// Date of the holiday.
    pub date: NaiveDate,
    /// Name of the holiday.
    pub name: String,
    /// Reason it was not paid.
    pub reason: UnpaidReason,
}

/// The result of a holiday pay calculation, including the audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HolidayPayResult {
    /// Holidays paid, in date order.
    pub paid: Vec<HolidayPayment>,
    /// Holidays not paid, in date order.
    pub unpaid: Vec<UnpaidHoliday>,
    /// Holidays withheld because of a justified absence.
    pub justified_absence_holidays: Vec<NaiveDate>,
    /// Total holiday pay.
    pub total: Decimal,
    /// Exemption cap for the period length.
    pub exemption_cap: Decimal,
    /// Exempt part of the total.
    pub exempt: Decimal,
    /// Taxable part of the total.
    pub taxable: Decimal,
    /// The audit step recording this calculation.
    #[serde(skip)]
    pub audit_step: AuditStep,
}

/// Exemption cap for holiday pay over a period of `days` days: five UMA per
/// week, prorated.
pub fn holiday_exemption_cap(days: u32) -> Decimal {
    round_cents(Decimal::from(days) / Decimal::from(7) * HOLIDAY_EXEMPT_UMA_PER_WEEK * UMA_DAILY)
}

fn exemption_split(total: Decimal, cap: Decimal) -> (Decimal, Decimal) {
    let exempt = round_cents((total * HOLIDAY_EXEMPT_SHARE).min(cap));
    (exempt, total - exempt)
}

/// Calculates holiday pay for a period.
///
/// Each holiday inside the period is checked in order: before the hire date,
/// on a rest day, with an unjustified absence, with a justified absence. The
/// first matching condition leaves it unpaid; otherwise it pays two daily
/// wages.
///
/// Fails with [`EngineError::InvalidInput`] when the daily wage is not
/// positive or the period is inverted.
pub fn calculate_holiday_pay(
    employee: &Employee,
    period: &PayPeriod,
    absences: &AbsencePartition,
    tables: &RateTables,
) -> EngineResult<HolidayPayResult> {
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

    let amount = round_cents(wage * HOLIDAY_PAY_MULTIPLIER);
    let mut paid = Vec::new();
    let mut unpaid = Vec::new();
    let mut justified_absence_holidays = Vec::new();

    for holiday in tables.holidays_between(period.start_date, period.end_date) {
        let reason = if holiday.date < employee.hire_date {
            Some(UnpaidReason::BeforeHire)
        } else if employee.is_rest_day(holiday.date) {
            Some(UnpaidReason::RestDay)
        } else if absences.unjustified.contains(&holiday.date) {
            Some(UnpaidReason::UnjustifiedAbsence)
        } else if absences.justified.contains(&holiday.date) {
            justified_absence_holidays.push(holiday.date);
            Some(UnpaidReason::JustifiedAbsence)
        } else {
            None
        };

        match reason {
            Some(reason) => unpaid.push(UnpaidHoliday {
                date: holiday.date,
                name: holiday.name.clone(),
                reason,
            }),
            None => paid.push(HolidayPayment {
                date: holiday.date,
                name: holiday.name.clone(),
                amount,
            }),
        }
    }

    let total: Decimal = paid.iter().map(|p| p.amount).sum();
    let exemption_cap = holiday_exemption_cap(period.total_days);
    let (exempt, taxable) = exemption_split(total, exemption_cap);

    let audit_step = AuditStep::new(
        "holiday_pay",
        "Pago de día festivo",
        "LFT arts. 74, 75; LISR art. 93",
        serde_json::json!({
            "daily_wage": wage.to_string(),
            "period_days": period.total_days,
            "holidays_in_period": paid.len() + unpaid.len(),
        }),
        serde_json::json!({
            "paid": paid.iter().map(|p| p.date.to_string()).collect::<Vec<_>>(),
            "total": total.to_string(),
            "exemption_cap": exemption_cap.to_string(),
            "exempt": exempt.to_string(),
            "taxable": taxable.to_string(),
        }),
        format!(
            "{} holiday(s) paid at 2 × ${} = ${}; exempt ${} (cap ${})",
            paid.len(),
            wage,
            total,
            exempt,
            exemption_cap
        ),
    );

    Ok(HolidayPayResult {
        paid,
        unpaid,
        justified_absence_holidays,
        total,
        exemption_cap,
        exempt,
        taxable,
        audit_step,
    })
}

/// Forces every paid holiday that carries a justified absence to zero pay.
///
/// Affected holidays move from `paid` to `unpaid` and are recorded once in
/// `justified_absence_holidays`; totals and the exemption split are
/// recomputed. Applying the pass twice yields the same result as applying it
/// once.
pub fn apply_justified_holiday_override(
    mut result: HolidayPayResult,
    justified: &BTreeSet<NaiveDate>,
) -> HolidayPayResult {
    let (withheld, kept): (Vec<_>, Vec<_>) = result
        .paid
        .into_iter()
        .partition(|p| justified.contains(&p.date));
    result.paid = kept;

    if withheld.is_empty() {
        return result;
    }

    for payment in withheld {
        if !result.justified_absence_holidays.contains(&payment.date) {
            result.justified_absence_holidays.push(payment.date);
        }
        result.unpaid.push(UnpaidHoliday {
            date: payment.date,
            name: payment.name,
            reason: UnpaidReason::JustifiedAbsence,
        });
    }
    result.justified_absence_holidays.sort();
    result.unpaid.sort_by_key(|u| u.date);

    result.total = result.paid.iter().map(|p| p.amount).sum();
    let (exempt, taxable) = exemption_split(result.total, result.exemption_cap);
    result.exempt = exempt;
    result.taxable = taxable;
    result
}
