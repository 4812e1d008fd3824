//! Income tax (ISR) withholding calculation.
//!
//! This module computes the ISR withheld from a taxable base using the
//! tariff of the period type (LISR art. 96) and credits the employment
//! subsidy that applies to that period type.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::constants::{
    AVERAGE_MONTH_DAYS, BIWEEKLY_SUBSIDY_DAYS, EMPLOYMENT_SUBSIDY_RATE, MONTHLY_SUBSIDY_TABLE,
    SUBSIDY_INCOME_CAP, UMA_DAILY,
};
use crate::config::{RateTables, SubsidyRow, TaxBracket};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, PeriodType};

use super::round_cents;

/// Which employment subsidy rule produced the credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubsidyRule {
    /// Weekly subsidy table lookup on the taxable base.
    WeeklyTable,
    /// Monthly subsidy table lookup on the base rounded to cents.
    MonthlyTable,
    /// Flat bi-weekly subsidy, granted below the monthly income cap.
    BiweeklyFlat,
    /// Bi-weekly base above the income cap; no subsidy.
    AboveIncomeCap,
}

/// The result of an ISR calculation, including the audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsrResult {
    /// Taxable base the tariff was applied to.
    pub taxable_base: Decimal,
    /// Period type of the tariff.
    pub period_type: PeriodType,
    /// The matching bracket, if any.
    pub bracket: Option<TaxBracket>,
    /// Base above the bracket's lower bound.
    pub excess_over_lower: Decimal,
    /// Marginal tax on the excess, rounded to cents.
    pub marginal_tax: Decimal,
    /// Fixed fee plus marginal tax, rounded to cents.
    pub determined_tax: Decimal,
    /// Employment subsidy credited, rounded to cents.
    pub subsidy: Decimal,
    /// The subsidy rule that applied.
    pub subsidy_rule: SubsidyRule,
    /// Tax withheld: determined tax minus subsidy, never negative.
    pub withheld: Decimal,
    /// The audit step recording this calculation.
    #[serde(skip)]
    pub audit_step: AuditStep,
}

/// Finds the bracket for `base`: the last one whose lower bound is at or
/// below it.
///
/// Published tariffs leave a one-cent step between a bracket's upper bound
/// and the next lower bound; a sub-cent base inside that step stays in the
/// lower bracket. Brackets must be sorted by lower bound, which the loader
/// enforces.
pub fn find_bracket(base: Decimal, brackets: &[TaxBracket]) -> Option<&TaxBracket> {
    brackets.iter().rev().find(|b| base >= b.lower)
}

/// Tax determined by the tariff before any subsidy, unrounded.
///
/// A base outside every bracket (zero, for instance) determines no tax.
pub fn tax_before_subsidy(base: Decimal, brackets: &[TaxBracket]) -> Decimal {
    find_bracket(base, brackets)
        .map(|b| b.fixed_fee + (base - b.lower) * b.rate_percent / Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO)
}

fn lookup_subsidy(income: Decimal, rows: &[SubsidyRow]) -> Decimal {
    rows.iter()
        .find(|row| row.contains(income))
        .map(|row| row.subsidy)
        .unwrap_or(Decimal::ZERO)
}

/// Employment subsidy for a taxable base of the given period type.
///
/// Returns the unrounded credit and the rule that produced it.
pub fn employment_subsidy(
    base: Decimal,
    period_type: PeriodType,
    tables: &RateTables,
) -> (Decimal, SubsidyRule) {
    match period_type {
        PeriodType::Semanal => (
            lookup_subsidy(base, tables.weekly_subsidy()),
            SubsidyRule::WeeklyTable,
        ),
        PeriodType::Mensual => (
            lookup_subsidy(round_cents(base), &MONTHLY_SUBSIDY_TABLE),
            SubsidyRule::MonthlyTable,
        ),
        PeriodType::Quincenal => {
            let monthly_equivalent = base / BIWEEKLY_SUBSIDY_DAYS * AVERAGE_MONTH_DAYS;
            if monthly_equivalent <= SUBSIDY_INCOME_CAP {
                (
                    UMA_DAILY * EMPLOYMENT_SUBSIDY_RATE * BIWEEKLY_SUBSIDY_DAYS,
                    SubsidyRule::BiweeklyFlat,
                )
            } else {
                (Decimal::ZERO, SubsidyRule::AboveIncomeCap)
            }
        }
    }
}

/// Calculates the ISR withheld for a taxable base.
///
/// # Arguments
///
/// * `taxable_base` - Taxable income for the period (must be non-negative)
/// * `period_type` - Selects the tariff and the subsidy rule
/// * `tables` - Rate tables holding the tariffs
///
/// # Returns
///
/// Returns an [`IsrResult`], or:
/// - [`EngineError::InvalidInput`] if the base is negative
/// - [`EngineError::TableLoad`] if the tariff for the period type is missing
///
/// # Example
///
/// ```no_run
/// use nomina_engine::calculation::calculate_isr;
/// use nomina_engine::config::ConfigLoader;
/// use nomina_engine::models::PeriodType;
/// use rust_decimal_macros::dec;
///
/// let loader = ConfigLoader::load("config/mx2025").unwrap();
/// let result = calculate_isr(dec!(7500.00), PeriodType::Quincenal, loader.tables()).unwrap();
/// assert_eq!(result.withheld, dec!(783.85));
/// ```
pub fn calculate_isr(
    taxable_base: Decimal,
    period_type: PeriodType,
    tables: &RateTables,
) -> EngineResult<IsrResult> {
    if taxable_base < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "base_gravable",
            format!("must not be negative, got {}", taxable_base),
        ));
    }

    let brackets = tables.isr_brackets(period_type)?;
    let bracket = find_bracket(taxable_base, brackets).copied();

    let excess_over_lower = bracket
        .map(|b| taxable_base - b.lower)
        .unwrap_or(Decimal::ZERO);
    let marginal_tax = bracket
        .map(|b| excess_over_lower * b.rate_percent / Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO);
    let determined_tax = bracket.map(|b| b.fixed_fee).unwrap_or(Decimal::ZERO) + marginal_tax;

    let (subsidy, subsidy_rule) = employment_subsidy(taxable_base, period_type, tables);
    let withheld = round_cents((determined_tax - subsidy).max(Decimal::ZERO));

    let audit_step = AuditStep::new(
        "isr_withholding",
        "Retención ISR",
        "LISR art. 96",
        serde_json::json!({
            "taxable_base": taxable_base.to_string(),
            "period_type": period_type,
        }),
        serde_json::json!({
            "lower": bracket.map(|b| b.lower.to_string()),
            "fixed_fee": bracket.map(|b| b.fixed_fee.to_string()),
            "rate_percent": bracket.map(|b| b.rate_percent.to_string()),
            "determined_tax": round_cents(determined_tax).to_string(),
            "subsidy": round_cents(subsidy).to_string(),
            "subsidy_rule": subsidy_rule,
            "withheld": withheld.to_string(),
        }),
        match bracket {
            Some(b) => format!(
                "{} + ({} − {}) × {}% = {}; less subsidy {} = {}",
                b.fixed_fee,
                taxable_base,
                b.lower,
                b.rate_percent,
                round_cents(determined_tax),
                round_cents(subsidy),
                withheld
            ),
            None => format!("Base {} is outside the {} tariff; no tax", taxable_base, period_type),
        },
    );

    Ok(IsrResult {
        taxable_base,
        period_type,
        bracket,
        excess_over_lower,
        marginal_tax: round_cents(marginal_tax),
        determined_tax: round_cents(determined_tax),
        subsidy: round_cents(subsidy),
        subsidy_rule,
        withheld,
        audit_step,
    })
}
