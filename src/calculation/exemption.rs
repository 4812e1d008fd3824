//! Minimum-wage exemption check.
//!
//! Workers earning the minimum wage for their zone have no ISR or IMSS
//! withheld (LFT art. 97; LISR art. 96).

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::constants::minimum_wage;
use crate::models::{AuditStep, SalaryZone};

/// The outcome of the minimum-wage check, including the audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinimumWageExemption {
    /// `true` when ISR and IMSS are waived.
    pub applies: bool,
    /// Daily wage checked.
    pub daily_wage: Decimal,
    /// Minimum wage of the zone.
    pub minimum_wage: Decimal,
    /// Salary zone.
    pub zone: SalaryZone,
    /// The audit step recording this check.
    #[serde(skip)]
    pub audit_step: AuditStep,
}

/// Checks whether `daily_wage` is at or below the minimum wage of `zone`.
///
/// # Example
///
/// ```
/// use nomina_engine::calculation::check_minimum_wage_exemption;
/// use nomina_engine::models::SalaryZone;
/// use rust_decimal_macros::dec;
///
/// assert!(check_minimum_wage_exemption(dec!(278.80), SalaryZone::General).applies);
/// assert!(!check_minimum_wage_exemption(dec!(278.81), SalaryZone::General).applies);
/// assert!(check_minimum_wage_exemption(dec!(400.00), SalaryZone::Frontera).applies);
/// ```
pub fn check_minimum_wage_exemption(daily_wage: Decimal, zone: SalaryZone) -> MinimumWageExemption {
    let minimum = minimum_wage(zone);
    let applies = daily_wage <= minimum;

    let audit_step = AuditStep::new(
        "minimum_wage_exemption",
        "Exención por salario mínimo",
        "LFT art. 97; LISR art. 96",
        serde_json::json!({
            "daily_wage": daily_wage.to_string(),
            "zone": zone,
        }),
        serde_json::json!({
            "minimum_wage": minimum.to_string(),
            "applies": applies,
        }),
        if applies {
            format!("${} ≤ ${}: ISR and IMSS waived", daily_wage, minimum)
        } else {
            format!("${} > ${}: no exemption", daily_wage, minimum)
        },
    );

    MinimumWageExemption {
        applies,
        daily_wage,
        minimum_wage: minimum,
        zone,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_general_zone_threshold() {
        let at = check_minimum_wage_exemption(dec!(278.80), SalaryZone::General);
        assert!(at.applies);
        assert_eq!(at.minimum_wage, dec!(278.80));

        assert!(!check_minimum_wage_exemption(dec!(300.00), SalaryZone::General).applies);
    }

    #[test]
    fn test_border_zone_threshold() {
        assert!(check_minimum_wage_exemption(dec!(419.88), SalaryZone::Frontera).applies);
        assert!(!check_minimum_wage_exemption(dec!(419.89), SalaryZone::Frontera).applies);
    }
}
