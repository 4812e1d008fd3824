//! Social security (IMSS) contribution calculation.
//!
//! This module computes the contribution base salary (SBC) and the five
//! employee-side IMSS quotas withheld for a number of days (Ley del Seguro
//! Social, arts. 25, 106, 107, 147 and 168).

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::constants::{
    INTEGRATION_FACTOR, RATE_CASH_BENEFITS, RATE_DISABILITY_LIFE, RATE_IN_KIND_BENEFITS,
    RATE_IN_KIND_SURPLUS, RATE_SEVERANCE_OLD_AGE, SURPLUS_UMA_MULTIPLE, UMA_DAILY,
};
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

use super::round_cents;

/// Largest number of days a single IMSS calculation may cover.
pub const MAX_IMSS_DAYS: i64 = 31;

/// The five employee-side IMSS quotas for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImssQuotas {
    /// Enfermedad y maternidad, prestaciones en dinero (0.25%).
    pub cash_benefits: Decimal,
    /// Enfermedad y maternidad, prestaciones en especie (0.375%).
    pub in_kind_benefits: Decimal,
    /// Enfermedad y maternidad, excedente de 3 UMA (0.40%).
    pub in_kind_surplus: Decimal,
    /// Invalidez y vida (0.625%).
    pub disability_life: Decimal,
    /// Cesantía en edad avanzada y vejez (1.125%).
    pub severance_old_age: Decimal,
}

impl ImssQuotas {
    /// Sum of the five quotas.
    pub fn total(&self) -> Decimal {
        self.cash_benefits
            + self.in_kind_benefits
            + self.in_kind_surplus
            + self.disability_life
            + self.severance_old_age
    }
}

/// The result of an IMSS calculation, including the audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImssResult {
    /// Daily wage the SBC was integrated from.
    pub daily_wage: Decimal,
    /// Days covered.
    pub days: u32,
    /// Integration factor applied.
    pub integration_factor: Decimal,
    /// Daily SBC.
    pub sbc_daily: Decimal,
    /// SBC for the whole period.
    pub sbc_period: Decimal,
    /// Three times the daily UMA.
    pub three_uma: Decimal,
    /// Daily SBC above three UMA (zero when below).
    pub surplus_base: Decimal,
    /// Itemized quotas.
    pub quotas: ImssQuotas,
    /// Total withheld.
    pub total: Decimal,
    /// Human-readable formula for the SBC.
    pub formula: String,
    /// The audit step recording this calculation.
    #[serde(skip)]
    pub audit_step: AuditStep,
}

/// Calculates the SBC and quotas for a single daily wage.
///
/// # Example
///
/// ```
/// use nomina_engine::calculation::ImssCalculator;
/// use rust_decimal_macros::dec;
///
/// let calculator = ImssCalculator::new(dec!(300.50)).unwrap();
/// assert_eq!(calculator.sbc(), dec!(315.31));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImssCalculator {
    daily_wage: Decimal,
    sbc: Decimal,
}

impl ImssCalculator {
    /// Creates a calculator for `daily_wage`.
    ///
    /// Fails with [`EngineError::InvalidInput`] when the wage is not positive.
    pub fn new(daily_wage: Decimal) -> EngineResult<Self> {
        if daily_wage <= Decimal::ZERO {
            return Err(EngineError::invalid_input(
                "salario_diario",
                format!("must be positive, got {}", daily_wage),
            ));
        }

        Ok(Self {
            daily_wage,
            sbc: round_cents(daily_wage * INTEGRATION_FACTOR),
        })
    }

    /// The daily wage the calculator was built for.
    pub fn daily_wage(&self) -> Decimal {
        self.daily_wage
    }

    /// Daily SBC: wage times the integration factor, rounded to cents.
    pub fn sbc(&self) -> Decimal {
        self.sbc
    }

    /// Computes the five quotas for `days` days.
    ///
    /// Fails with [`EngineError::InvalidInput`] unless `days` is in 1..=31.
    pub fn quotas(&self, days: i64) -> EngineResult<ImssQuotas> {
        let days = validate_days(days)?;
        let days = Decimal::from(days);
        let sbc_period = self.sbc * days;
        let surplus_base = self.surplus_base();

        Ok(ImssQuotas {
            cash_benefits: round_cents(sbc_period * RATE_CASH_BENEFITS),
            in_kind_benefits: round_cents(sbc_period * RATE_IN_KIND_BENEFITS),
            in_kind_surplus: round_cents(surplus_base * RATE_IN_KIND_SURPLUS * days),
            disability_life: round_cents(sbc_period * RATE_DISABILITY_LIFE),
            severance_old_age: round_cents(sbc_period * RATE_SEVERANCE_OLD_AGE),
        })
    }

    fn surplus_base(&self) -> Decimal {
        (self.sbc - UMA_DAILY * SURPLUS_UMA_MULTIPLE).max(Decimal::ZERO)
    }
}

fn validate_days(days: i64) -> EngineResult<u32> {
    if !(1..=MAX_IMSS_DAYS).contains(&days) {
        return Err(EngineError::invalid_input(
            "dias",
            format!("must be an integer between 1 and {}, got {}", MAX_IMSS_DAYS, days),
        ));
    }
    Ok(days as u32)
}

/// Parses a textual day count such as `"15"`.
///
/// Fails with [`EngineError::InvalidInput`] for anything that is not an
/// integer (e.g. `"quince"` or `"7.5"`). The range is checked later by the
/// calculator.
pub fn parse_days_worked(raw: &str) -> EngineResult<i64> {
    raw.trim().parse::<i64>().map_err(|_| {
        EngineError::invalid_input("dias", format!("'{}' is not an integer day count", raw))
    })
}

/// Calculates the IMSS withholding for `days` days at `daily_wage`.
///
/// # Arguments
///
/// * `daily_wage` - Daily wage (must be positive)
/// * `days` - Days covered, 1 to 31
///
/// # Returns
///
/// Returns an [`ImssResult`] with the SBC, the itemized quotas and their
/// total, or [`EngineError::InvalidInput`] for an invalid wage or day count.
///
/// # Example
///
/// ```
/// use nomina_engine::calculation::calculate_imss;
/// use rust_decimal_macros::dec;
///
/// let result = calculate_imss(dec!(500.00), 15).unwrap();
/// assert_eq!(result.sbc_daily, dec!(524.65));
/// assert_eq!(result.total, dec!(198.01));
/// ```
pub fn calculate_imss(daily_wage: Decimal, days: i64) -> EngineResult<ImssResult> {
    let calculator = ImssCalculator::new(daily_wage)?;
    let quotas = calculator.quotas(days)?;
    let days = validate_days(days)?;

    let sbc_daily = calculator.sbc();
    let sbc_period = round_cents(sbc_daily * Decimal::from(days));
    let three_uma = UMA_DAILY * SURPLUS_UMA_MULTIPLE;
    let surplus_base = calculator.surplus_base();
    let total = quotas.total();
    let formula = format!(
        "{} × {} = {}",
        daily_wage.normalize(),
        INTEGRATION_FACTOR,
        sbc_daily
    );

    let audit_step = AuditStep::new(
        "imss_quotas",
        "Cuotas obrero IMSS",
        "LSS arts. 25, 106, 107, 147, 168",
        serde_json::json!({
            "daily_wage": daily_wage.to_string(),
            "days": days,
        }),
        serde_json::json!({
            "sbc_daily": sbc_daily.to_string(),
            "sbc_period": sbc_period.to_string(),
            "surplus_base": surplus_base.to_string(),
            "cash_benefits": quotas.cash_benefits.to_string(),
            "in_kind_benefits": quotas.in_kind_benefits.to_string(),
            "in_kind_surplus": quotas.in_kind_surplus.to_string(),
            "disability_life": quotas.disability_life.to_string(),
            "severance_old_age": quotas.severance_old_age.to_string(),
            "total": total.to_string(),
        }),
        format!(
            "SBC {} × {} days; five employee quotas total ${}",
            sbc_daily, days, total
        ),
    );

    Ok(ImssResult {
        daily_wage,
        days,
        integration_factor: INTEGRATION_FACTOR,
        sbc_daily,
        sbc_period,
        three_uma,
        surplus_base,
        quotas,
        total,
        formula,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// IMSS-001: SBC integrates the wage with factor 1.0493
    #[test]
    fn test_sbc_for_500() {
        let calculator = ImssCalculator::new(dec!(500.00)).unwrap();
        assert_eq!(calculator.sbc(), dec!(524.65));
    }

    /// IMSS-002: SBC is rounded half-up to cents
    #[test]
    fn test_sbc_for_300_50() {
        // 300.50 × 1.0493 = 315.31465
        let calculator = ImssCalculator::new(dec!(300.50)).unwrap();
        assert_eq!(calculator.sbc(), dec!(315.31));
    }

    #[test]
    fn test_quotas_for_500_over_15_days() {
        let result = calculate_imss(dec!(500.00), 15).unwrap();

        // SBC period = 524.65 × 15 = 7869.75
        assert_eq!(result.sbc_period, dec!(7869.75));
        assert_eq!(result.quotas.cash_benefits, dec!(19.67));
        assert_eq!(result.quotas.in_kind_benefits, dec!(29.51));
        assert_eq!(result.quotas.disability_life, dec!(49.19));
        assert_eq!(result.quotas.severance_old_age, dec!(88.53));
        // (524.65 − 339.42) × 0.004 × 15 = 11.1138
        assert_eq!(result.surplus_base, dec!(185.23));
        assert_eq!(result.quotas.in_kind_surplus, dec!(11.11));
        assert_eq!(result.total, dec!(198.01));
    }

    #[test]
    fn test_no_surplus_below_three_uma() {
        let result = calculate_imss(dec!(300.50), 15).unwrap();

        assert_eq!(result.surplus_base, dec!(0));
        assert_eq!(result.quotas.in_kind_surplus, dec!(0));
        assert_eq!(result.three_uma, dec!(339.42));
    }

    #[test]
    fn test_total_is_sum_of_quotas() {
        let result = calculate_imss(dec!(812.37), 31).unwrap();
        assert_eq!(result.total, result.quotas.total());
    }

    /// IMSS-003: non-integer textual days are rejected
    #[test]
    fn test_textual_days_rejected() {
        let result = parse_days_worked("quince");
        assert!(matches!(result, Err(EngineError::InvalidInput { field, .. }) if field == "dias"));
        assert!(parse_days_worked("7.5").is_err());
        assert_eq!(parse_days_worked(" 15 ").unwrap(), 15);
    }

    /// IMSS-004: negative days are rejected
    #[test]
    fn test_negative_days_rejected() {
        let result = calculate_imss(dec!(300.50), -5);
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_zero_and_excess_days_rejected() {
        assert!(calculate_imss(dec!(300.50), 0).is_err());
        assert!(calculate_imss(dec!(300.50), 32).is_err());
        assert!(calculate_imss(dec!(300.50), 31).is_ok());
        assert!(calculate_imss(dec!(300.50), 1).is_ok());
    }

    #[test]
    fn test_non_positive_wage_rejected() {
        assert!(ImssCalculator::new(dec!(0)).is_err());
        assert!(calculate_imss(dec!(-1), 15).is_err());
    }

    #[test]
    fn test_audit_step_records_rule() {
        let result = calculate_imss(dec!(500.00), 15).unwrap();
        assert_eq!(result.audit_step.rule_id, "imss_quotas");
        assert_eq!(result.audit_step.output["total"], "198.01");
        assert_eq!(result.formula, "500 × 1.0493 = 524.65");
    }
}
