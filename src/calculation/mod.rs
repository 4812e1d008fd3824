//! Calculation logic for the payroll engine.
//!
//! This module contains the individual calculators a pay statement is built
//! from: IMSS quotas, ISR withholding with employment subsidy, absence
//! classification, Sunday premium, holiday pay and the minimum-wage
//! exemption check. Each calculator returns a result struct carrying its own
//! audit step.

mod absences;
mod exemption;
mod extra_pay;
mod holiday_pay;
mod imss;
mod isr;
mod money;
mod sunday_premium;

pub use absences::{
    ABSENCE_DATE_FORMAT, AbsenceClass, AbsenceDeductionResult, AbsenceDetail, AbsenceKind,
    AbsencePartition, RejectedDate, calculate_absence_deduction, discounted_days,
    partition_absences,
};
pub use exemption::{MinimumWageExemption, check_minimum_wage_exemption};
pub use extra_pay::{ExtraPayResult, calculate_extra_pay};
pub use holiday_pay::{
    HolidayPayResult, HolidayPayment, UnpaidHoliday, UnpaidReason,
    apply_justified_holiday_override, calculate_holiday_pay, holiday_exemption_cap,
};
pub use imss::{
    ImssCalculator, ImssQuotas, ImssResult, MAX_IMSS_DAYS, calculate_imss, parse_days_worked,
};
pub use isr::{
    IsrResult, SubsidyRule, calculate_isr, employment_subsidy, find_bracket, tax_before_subsidy,
};
pub use money::{parse_amount, round_cents};
pub use sunday_premium::{SundayPremiumResult, calculate_sunday_premium};
