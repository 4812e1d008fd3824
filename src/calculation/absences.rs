//! Absence classification and deduction.
//!
//! Absence dates arrive as strings on the employee snapshot. This module
//! parses them into in-period sets, classifies each unjustified absence and
//! applies the aggregate "discounted days" rule (LFT art. 73: every two
//! unjustified absences forfeit the paid rest day).

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::config::RateTables;
use crate::config::constants::HOLIDAY_ABSENCE_MULTIPLIER;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Employee};

use super::round_cents;

/// Format absence dates are recorded in.
pub const ABSENCE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Which absence list a date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceKind {
    /// Falta injustificada.
    Unjustified,
    /// Falta justificada.
    Justified,
}

/// An absence entry that could not be parsed as a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedDate {
    /// The entry as recorded.
    pub raw: String,
    /// The list it came from.
    pub kind: AbsenceKind,
}

/// In-period absence dates, split by kind, plus the entries that were
/// skipped because they are not dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AbsencePartition {
    /// Unjustified absences inside the period.
    pub unjustified: BTreeSet<NaiveDate>,
    /// Justified absences inside the period.
    pub justified: BTreeSet<NaiveDate>,
    /// Malformed entries, in the order they were found.
    pub rejected: Vec<RejectedDate>,
}

impl AbsencePartition {
    /// Returns `true` if any absence, justified or not, is recorded on `date`.
    pub fn is_absent(&self, date: NaiveDate) -> bool {
        self.unjustified.contains(&date) || self.justified.contains(&date)
    }

    /// Number of unjustified absences in the period.
    pub fn unjustified_count(&self) -> u32 {
        self.unjustified.len() as u32
    }
}

/// Parses the employee's absence lists and keeps the dates inside
/// `[start, end]`.
///
/// Dates outside the period are ignored. Entries that are not
/// `YYYY-MM-DD` dates are skipped and listed in
/// [`AbsencePartition::rejected`] so the caller can surface them.
pub fn partition_absences(employee: &Employee, start: NaiveDate, end: NaiveDate) -> AbsencePartition {
    let mut partition = AbsencePartition::default();

    let lists = [
        (AbsenceKind::Unjustified, &employee.unjustified_absences),
        (AbsenceKind::Justified, &employee.justified_absences),
    ];

    for (kind, raw_dates) in lists {
        for raw in raw_dates {
            let date = match NaiveDate::parse_from_str(raw.trim(), ABSENCE_DATE_FORMAT) {
                Ok(date) => date,
                Err(_) => {
                    warn!(employee_id = %employee.id, raw = %raw, ?kind, "Skipping malformed absence date");
                    partition.rejected.push(RejectedDate {
                        raw: raw.clone(),
                        kind,
                    });
                    continue;
                }
            };

            if date < start || date > end {
                continue;
            }

            match kind {
                AbsenceKind::Unjustified => partition.unjustified.insert(date),
                AbsenceKind::Justified => partition.justified.insert(date),
            };
        }
    }

    partition
}

/// Days discounted for `unjustified` absences: each absence plus one
/// forfeited rest day for every two.
///
/// # Example
///
/// ```
/// use nomina_engine::calculation::discounted_days;
///
/// assert_eq!(discounted_days(0), 0);
/// assert_eq!(discounted_days(1), 1);
/// assert_eq!(discounted_days(2), 3);
/// assert_eq!(discounted_days(3), 4);
/// ```
pub fn discounted_days(unjustified: u32) -> u32 {
    unjustified + unjustified / 2
}

/// How a single absence was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceClass {
    /// Unjustified absence on a rest day; no deduction.
    RestDay,
    /// Unjustified absence on a holiday; lost wage plus lost double pay.
    Holiday,
    /// Unjustified absence on a regular working day.
    Workday,
    /// Justified absence; recorded only.
    Justified,
}

/// One classified absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbsenceDetail {
    /// Date of the absence.
    pub date: NaiveDate,
    /// Classification.
    pub class: AbsenceClass,
    /// Amount deducted for the absence.
    pub deduction: Decimal,
}

/// The result of classifying a period's absences, including the audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbsenceDeductionResult {
    /// Every in-period absence, unjustified first, in date order.
    pub details: Vec<AbsenceDetail>,
    /// Number of unjustified absences.
    pub unjustified_count: u32,
    /// Number of justified absences.
    pub justified_count: u32,
    /// Sum of the per-date deductions.
    pub classified_deduction: Decimal,
    /// Days discounted under the aggregate rule.
    pub discounted_days: u32,
    /// The audit step recording this calculation.
    #[serde(skip)]
    pub audit_step: AuditStep,
}

/// Classifies each in-period absence and prices it.
///
/// - Unjustified on a rest day: no deduction.
/// - Unjustified on a holiday that is not a rest day: three daily wages.
/// - Unjustified on any other day: one daily wage.
/// - Justified: listed with no deduction.
///
/// Fails with [`EngineError::InvalidInput`] when the daily wage is not positive.
pub fn calculate_absence_deduction(
    employee: &Employee,
    partition: &AbsencePartition,
    tables: &RateTables,
) -> EngineResult<AbsenceDeductionResult> {
    let wage = employee.daily_wage();
    if wage <= Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "salario_diario",
            format!("must be positive, got {}", wage),
        ));
    }

    let mut details: Vec<AbsenceDetail> = partition
        .unjustified
        .iter()
        .map(|&date| {
            let (class, deduction) = if employee.is_rest_day(date) {
                (AbsenceClass::RestDay, Decimal::ZERO)
            } else if tables.is_holiday(date) {
                (AbsenceClass::Holiday, round_cents(wage * HOLIDAY_ABSENCE_MULTIPLIER))
            } else {
                (AbsenceClass::Workday, wage)
            };
            AbsenceDetail {
                date,
                class,
                deduction,
            }
        })
        .collect();

    details.extend(partition.justified.iter().map(|&date| AbsenceDetail {
        date,
        class: AbsenceClass::Justified,
        deduction: Decimal::ZERO,
    }));

    let classified_deduction: Decimal = details.iter().map(|d| d.deduction).sum();
    let unjustified_count = partition.unjustified_count();
    let justified_count = partition.justified.len() as u32;
    let discounted = discounted_days(unjustified_count);

    let audit_step = AuditStep::new(
        "absence_deduction",
        "Descuento por faltas",
        "LFT arts. 73, 74",
        serde_json::json!({
            "daily_wage": wage.to_string(),
            "unjustified": partition.unjustified.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
            "justified": partition.justified.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
        }),
        serde_json::json!({
            "classified_deduction": classified_deduction.to_string(),
            "discounted_days": discounted,
        }),
        format!(
            "{} unjustified absence(s) discount {} day(s); {} justified absence(s) carry no deduction",
            unjustified_count, discounted, justified_count
        ),
    );

    Ok(AbsenceDeductionResult {
        details,
        unjustified_count,
        justified_count,
        classified_deduction,
        discounted_days: discounted,
        audit_step,
    })
}
