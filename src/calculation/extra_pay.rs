//! Extra pay (percepciones extra): Sunday premium plus holiday pay.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::RateTables;
use crate::error::EngineResult;
use crate::models::{Employee, PayPeriod};

use super::{
    AbsencePartition, HolidayPayResult, SundayPremiumResult, apply_justified_holiday_override,
    calculate_holiday_pay, calculate_sunday_premium,
};

/// Combined Sunday premium and holiday pay for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraPayResult {
    /// Sunday premium breakdown.
    pub sunday_premium: SundayPremiumResult,
    /// Holiday pay breakdown.
    pub holiday_pay: HolidayPayResult,
}

impl ExtraPayResult {
    /// Sunday premium plus holiday pay.
    pub fn total(&self) -> Decimal {
        self.sunday_premium.total + self.holiday_pay.total
    }

    /// Exempt part of the extra pay.
    pub fn exempt(&self) -> Decimal {
        self.sunday_premium.exempt + self.holiday_pay.exempt
    }

    /// Taxable part of the extra pay.
    pub fn taxable(&self) -> Decimal {
        self.sunday_premium.taxable + self.holiday_pay.taxable
    }

    /// Amount the extra pay adds to the ISR base: the full holiday pay and
    /// the Sunday premium above one UMA.
    pub fn isr_base_addition(&self) -> Decimal {
        self.holiday_pay.total + self.sunday_premium.taxable
    }

    /// Holidays withheld because of a justified absence.
    pub fn justified_absence_holidays(&self) -> &[NaiveDate] {
        &self.holiday_pay.justified_absence_holidays
    }

    /// Applies [`apply_justified_holiday_override`] to the holiday pay.
    pub fn with_justified_override(self, justified: &BTreeSet<NaiveDate>) -> Self {
        Self {
            sunday_premium: self.sunday_premium,
            holiday_pay: apply_justified_holiday_override(self.holiday_pay, justified),
        }
    }
}

/// Calculates the Sunday premium and holiday pay for a period.
pub fn calculate_extra_pay(
    employee: &Employee,
    period: &PayPeriod,
    absences: &AbsencePartition,
    tables: &RateTables,
) -> EngineResult<ExtraPayResult> {
    let sunday_premium = calculate_sunday_premium(employee, period, absences)?;
    let holiday_pay = calculate_holiday_pay(employee, period, absences, tables)?;

    Ok(ExtraPayResult {
        sunday_premium,
        holiday_pay,
    })
}
