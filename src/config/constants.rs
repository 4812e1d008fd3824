//! Statutory constants for the 2025 fiscal year.
//!
//! Values that change by decree but are not distributed as tables (UMA,
//! minimum wages, IMSS rates, the bi-weekly and monthly employment subsidy
//! schedules) live here as compile-time constants. Bracket tables that the
//! tax authority publishes per period are loaded from YAML by
//! [`ConfigLoader`](super::ConfigLoader).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::types::SubsidyRow;
use crate::models::SalaryZone;

/// Daily value of the Unidad de Medida y Actualización.
pub const UMA_DAILY: Decimal = dec!(113.14);

/// Daily minimum wage in the general zone.
pub const MINIMUM_WAGE_GENERAL: Decimal = dec!(278.80);

/// Daily minimum wage in the northern border free zone.
pub const MINIMUM_WAGE_BORDER: Decimal = dec!(419.88);

/// Factor that integrates the legal benefits into the daily wage to obtain
/// the SBC (15 days of aguinaldo plus 25% vacation premium on 12 days).
pub const INTEGRATION_FACTOR: Decimal = dec!(1.0493);

/// IMSS employee share: cash benefits (prestaciones en dinero).
pub const RATE_CASH_BENEFITS: Decimal = dec!(0.0025);

/// IMSS employee share: medical benefits for pensioners (prestaciones en especie).
pub const RATE_IN_KIND_BENEFITS: Decimal = dec!(0.00375);

/// IMSS employee share: disability and life insurance (invalidez y vida).
pub const RATE_DISABILITY_LIFE: Decimal = dec!(0.00625);

/// IMSS employee share: severance and old age (cesantía en edad avanzada y vejez).
pub const RATE_SEVERANCE_OLD_AGE: Decimal = dec!(0.01125);

/// IMSS employee share on the SBC portion above three UMA (excedente).
pub const RATE_IN_KIND_SURPLUS: Decimal = dec!(0.004);

/// Number of UMA above which the surplus quota applies.
pub const SURPLUS_UMA_MULTIPLE: Decimal = dec!(3);

/// Sunday premium as a share of the daily wage.
pub const SUNDAY_PREMIUM_RATE: Decimal = dec!(0.25);

/// Holiday worked pays this many daily wages.
pub const HOLIDAY_PAY_MULTIPLIER: Decimal = dec!(2);

/// An unjustified absence on a holiday costs this many daily wages.
pub const HOLIDAY_ABSENCE_MULTIPLIER: Decimal = dec!(3);

/// Share of holiday pay that is tax exempt before the UMA cap.
pub const HOLIDAY_EXEMPT_SHARE: Decimal = dec!(0.5);

/// UMA per week of period used for the holiday exemption cap.
pub const HOLIDAY_EXEMPT_UMA_PER_WEEK: Decimal = dec!(5);

/// Days paid in a weekly period.
pub const WEEKLY_SALARY_DAYS: Decimal = dec!(7);

/// Days used to derive the daily wage from a monthly salary.
pub const MONTHLY_SALARY_DAYS: Decimal = dec!(30);

/// Average days per month used to project a bi-weekly base to a month.
pub const AVERAGE_MONTH_DAYS: Decimal = dec!(30.4);

/// Days in a bi-weekly period for the flat subsidy.
pub const BIWEEKLY_SUBSIDY_DAYS: Decimal = dec!(15);

/// Share of the UMA granted per day as employment subsidy.
pub const EMPLOYMENT_SUBSIDY_RATE: Decimal = dec!(0.138);

/// Monthly income above which no employment subsidy is granted.
pub const SUBSIDY_INCOME_CAP: Decimal = dec!(10171.00);

/// Monthly employment subsidy for January, when the 2024 UMA still applied.
pub const MONTHLY_SUBSIDY_JANUARY: Decimal = dec!(474.94);

/// Monthly employment subsidy from February onwards.
pub const MONTHLY_SUBSIDY_DEFAULT: Decimal = dec!(474.64);

/// Monthly subsidy schedule looked up by monthly taxable income.
pub const MONTHLY_SUBSIDY_TABLE: [SubsidyRow; 15] = [
    SubsidyRow::new(dec!(0.01), dec!(1947.54), dec!(407.02)),
    SubsidyRow::new(dec!(1947.55), dec!(2460.96), dec!(406.83)),
    SubsidyRow::new(dec!(2460.97), dec!(2619.48), dec!(406.62)),
    SubsidyRow::new(dec!(2619.49), dec!(2953.86), dec!(392.77)),
    SubsidyRow::new(dec!(2953.87), dec!(3460.27), dec!(382.46)),
    SubsidyRow::new(dec!(3460.28), dec!(3957.70), dec!(354.23)),
    SubsidyRow::new(dec!(3957.71), dec!(4688.51), dec!(324.87)),
    SubsidyRow::new(dec!(4688.52), dec!(5234.94), dec!(294.63)),
    SubsidyRow::new(dec!(5234.95), dec!(6054.43), dec!(253.54)),
    SubsidyRow::new(dec!(6054.44), dec!(6617.27), dec!(217.61)),
    SubsidyRow::new(dec!(6617.28), dec!(7382.33), dec!(191.57)),
    SubsidyRow::new(dec!(7382.34), dec!(7756.53), dec!(149.29)),
    SubsidyRow::new(dec!(7756.54), dec!(8332.05), dec!(114.24)),
    SubsidyRow::new(dec!(8332.06), dec!(9245.44), dec!(69.66)),
    SubsidyRow::new(dec!(9245.45), dec!(999999.99), dec!(0.00)),
];

/// Returns the daily minimum wage for a salary zone.
pub fn minimum_wage(zone: SalaryZone) -> Decimal {
    match zone {
        SalaryZone::General => MINIMUM_WAGE_GENERAL,
        SalaryZone::Frontera => MINIMUM_WAGE_BORDER,
    }
}

/// Returns the monthly employment subsidy credited in a calendar month.
pub fn monthly_employment_subsidy(month: u32) -> Decimal {
    match month {
        1 => MONTHLY_SUBSIDY_JANUARY,
        _ => MONTHLY_SUBSIDY_DEFAULT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_uma_threshold() {
        assert_eq!(UMA_DAILY * SURPLUS_UMA_MULTIPLE, dec!(339.42));
    }

    #[test]
    fn test_biweekly_flat_subsidy_value() {
        assert_eq!(
            UMA_DAILY * EMPLOYMENT_SUBSIDY_RATE * BIWEEKLY_SUBSIDY_DAYS,
            dec!(234.1998)
        );
    }

    #[test]
    fn test_minimum_wage_by_zone() {
        assert_eq!(minimum_wage(SalaryZone::General), dec!(278.80));
        assert_eq!(minimum_wage(SalaryZone::Frontera), dec!(419.88));
    }

    #[test]
    fn test_monthly_subsidy_january_differs() {
        assert_eq!(monthly_employment_subsidy(1), dec!(474.94));
        for month in 2..=12 {
            assert_eq!(monthly_employment_subsidy(month), dec!(474.64));
        }
    }

    #[test]
    fn test_monthly_subsidy_table_is_contiguous() {
        for pair in MONTHLY_SUBSIDY_TABLE.windows(2) {
            let prev_upper = pair[0].upper.unwrap();
            assert_eq!(pair[1].lower - prev_upper, dec!(0.01));
        }
    }
}
