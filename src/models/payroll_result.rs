//! Payroll result models for the payroll engine.
//!
//! This module contains the [`PayrollResult`] type and its associated
//! structures: attendance, earnings, deductions, the summary block and the
//! audit trace recording every calculation step.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{
    AbsenceDeductionResult, ExtraPayResult, ImssResult, IsrResult, MinimumWageExemption,
    RejectedDate,
};

use super::{PayPeriod, PeriodType, SalaryZone};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number, assigned when the step is recorded.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the legal provision for this rule.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

impl AuditStep {
    /// Creates an unnumbered step.
    pub fn new(
        rule_id: &str,
        rule_name: &str,
        clause_ref: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            step_number: 0,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            clause_ref: clause_ref.to_string(),
            input,
            output,
            reasoning: reasoning.into(),
        }
    }
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(code: &str, message: impl Into<String>, severity: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: severity.to_string(),
        }
    }
}

/// The complete audit trace for a payroll calculation.
///
/// # Example
///
/// ```
/// use nomina_engine::models::{AuditStep, AuditTrace};
///
/// let mut trace = AuditTrace::default();
/// trace.record(AuditStep::new("a", "A", "", serde_json::json!({}), serde_json::json!({}), ""));
/// trace.record(AuditStep::new("b", "B", "", serde_json::json!({}), serde_json::json!({}), ""));
/// assert_eq!(trace.steps[1].step_number, 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Appends a step, numbering it after the steps already recorded.
    pub fn record(&mut self, mut step: AuditStep) {
        step.step_number = self.steps.len() as u32 + 1;
        self.steps.push(step);
    }

    /// Appends a warning.
    pub fn warn(&mut self, warning: AuditWarning) {
        self.warnings.push(warning);
    }

    /// Returns the step recorded for `rule_id`, if any.
    pub fn step(&self, rule_id: &str) -> Option<&AuditStep> {
        self.steps.iter().find(|s| s.rule_id == rule_id)
    }
}

/// The employee as echoed on the pay statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeSummary {
    /// Employee identifier.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Daily wage used by the calculators.
    pub daily_wage: Decimal,
    /// Monthly salary, for monthly-paid employees.
    pub monthly_salary: Option<Decimal>,
    /// Pay-period type.
    pub period_type: PeriodType,
    /// Minimum wage zone.
    pub salary_zone: SalaryZone,
    /// Hire date.
    pub hire_date: NaiveDate,
    /// Rest days (0 = Monday).
    pub rest_days: Vec<u8>,
}

/// Day counts for the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attendance {
    /// Calendar days in the period.
    pub total_days: u32,
    /// Days between the period start and the hire date.
    pub late_hire_days: u32,
    /// Days the employee was on the payroll.
    pub days_employed: u32,
    /// Days worked.
    pub days_worked: u32,
    /// Unjustified absences in the period.
    pub unjustified_absences: u32,
    /// Justified absences in the period.
    pub justified_absences: u32,
    /// Days discounted for unjustified absences.
    pub discounted_days: u32,
}

/// Salary and extra pay lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Earnings {
    /// Salary for the full period.
    pub gross_salary: Decimal,
    /// Deduction for days before the hire date.
    pub late_hire_deduction: Decimal,
    /// Gross salary less the late-hire deduction.
    pub adjusted_salary: Decimal,
    /// Deduction for unjustified absences.
    pub absence_deduction: Decimal,
    /// Adjusted salary less the absence deduction.
    pub salary_after_deductions: Decimal,
    /// Sunday premium.
    pub sunday_premium: Decimal,
    /// Holiday pay.
    pub holiday_pay: Decimal,
}

impl Earnings {
    /// Sunday premium plus holiday pay.
    pub fn extra_pay(&self) -> Decimal {
        self.sunday_premium + self.holiday_pay
    }
}

/// Withholding lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deductions {
    /// ISR withheld.
    pub isr: Decimal,
    /// IMSS withheld.
    pub imss: Decimal,
    /// Absence deduction listed as a withholding (zero when it already
    /// reduced the salary line).
    pub absences: Decimal,
    /// Monthly subsidy credited against the ISR.
    pub subsidy_credit: Decimal,
    /// Sum of ISR, IMSS and absences.
    pub total: Decimal,
}

/// Which rule shaped the summary block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryBasis {
    /// The employee joined after the period started.
    LateHire,
    /// Unjustified absences were recorded.
    UnjustifiedAbsences,
    /// Neither of the above.
    Normal,
}

/// Totals of the pay statement.
///
/// `net_pay` always equals `total_earnings − total_deductions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayrollSummary {
    /// Total earnings.
    pub total_earnings: Decimal,
    /// Total deductions.
    pub total_deductions: Decimal,
    /// Net pay.
    pub net_pay: Decimal,
    /// Rule that shaped the summary.
    pub basis: SummaryBasis,
    /// Whether the salary line is shown on the statement.
    pub salary_shown: bool,
    /// ISR taxable base.
    pub taxable_base: Decimal,
}

/// Contribution base salary as reported on the statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SbcSummary {
    /// Daily SBC.
    pub daily: Decimal,
    /// SBC over the period days.
    pub period: Decimal,
    /// Integration factor.
    pub integration_factor: Decimal,
    /// Human-readable formula.
    pub formula: String,
}

/// The complete pay statement for one employee and one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayrollResult {
    /// The employee.
    pub employee: EmployeeSummary,
    /// The period.
    pub period: PayPeriod,
    /// Day counts.
    pub attendance: Attendance,
    /// Salary and extra pay lines.
    pub earnings: Earnings,
    /// Withholding lines.
    pub deductions: Deductions,
    /// Totals.
    pub summary: PayrollSummary,
    /// Sunday premium and holiday pay detail.
    pub extra_pay: ExtraPayResult,
    /// Absence classification detail.
    pub absences: AbsenceDeductionResult,
    /// Minimum-wage exemption check.
    pub exemption: MinimumWageExemption,
    /// Contribution base salary.
    pub sbc: SbcSummary,
    /// IMSS detail; `None` when exempt or not employed during the period.
    pub social_security: Option<ImssResult>,
    /// ISR detail; `None` when exempt.
    pub income_tax: Option<IsrResult>,
    /// Absence entries skipped because they are not dates.
    pub rejected_dates: Vec<RejectedDate>,
    /// Ordered calculation steps and warnings.
    pub audit: AuditTrace,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(rule_id: &str) -> AuditStep {
        AuditStep::new(
            rule_id,
            "Regla",
            "LFT",
            serde_json::json!({}),
            serde_json::json!({}),
            "razón",
        )
    }

    #[test]
    fn test_record_numbers_steps_in_order() {
        let mut trace = AuditTrace::default();
        trace.record(step("first"));
        trace.record(step("second"));
        trace.record(step("third"));

        let numbers: Vec<u32> = trace.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(trace.step("second").map(|s| s.step_number), Some(2));
        assert!(trace.step("missing").is_none());
    }

    #[test]
    fn test_new_step_is_unnumbered() {
        assert_eq!(step("x").step_number, 0);
    }

    #[test]
    fn test_audit_trace_serialization() {
        let mut trace = AuditTrace::default();
        trace.record(step("imss_quotas"));
        trace.warn(AuditWarning::new("MALFORMED_ABSENCE_DATE", "ayer", "medium"));

        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["steps"][0]["rule_id"], "imss_quotas");
        assert_eq!(json["steps"][0]["step_number"], 1);
        assert_eq!(json["warnings"][0]["code"], "MALFORMED_ABSENCE_DATE");
    }

    #[test]
    fn test_summary_basis_serialization() {
        let json = serde_json::to_string(&SummaryBasis::UnjustifiedAbsences).unwrap();
        assert_eq!(json, "\"unjustified_absences\"");
    }

    #[test]
    fn test_extra_pay_sums_lines() {
        let earnings = Earnings {
            gross_salary: Decimal::new(450000, 2),
            late_hire_deduction: Decimal::ZERO,
            adjusted_salary: Decimal::new(450000, 2),
            absence_deduction: Decimal::ZERO,
            salary_after_deductions: Decimal::new(450000, 2),
            sunday_premium: Decimal::new(15000, 2),
            holiday_pay: Decimal::new(60000, 2),
        };
        assert_eq!(earnings.extra_pay(), Decimal::new(75000, 2));
    }
}
