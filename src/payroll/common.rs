//! Steps shared by the weekly, bi-weekly and monthly orchestrators.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculation::{
    AbsenceDeductionResult, AbsencePartition, ExtraPayResult, ImssCalculator, ImssResult,
    IsrResult, MinimumWageExemption, calculate_absence_deduction, calculate_extra_pay,
    calculate_imss, calculate_isr, check_minimum_wage_exemption, discounted_days, partition_absences,
    round_cents,
};
use crate::config::RateTables;
use crate::config::constants::INTEGRATION_FACTOR;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Attendance, AuditStep, AuditTrace, AuditWarning, Deductions, Earnings, Employee,
    EmployeeSummary, PayPeriod, PayrollResult, PayrollSummary, PeriodType, SbcSummary,
    SummaryBasis, WageBasis,
};

use super::PayrollOptions;

/// Picks the explicit period from `options` or derives it from the
/// reference date.
pub(crate) fn resolve_period(
    period_type: PeriodType,
    options: &PayrollOptions,
) -> EngineResult<PayPeriod> {
    match &options.period {
        Some(period) if period.period_type != period_type => {
            Err(EngineError::PeriodConsistency {
                message: format!(
                    "period {} is {} but the employee is paid {}",
                    period.id, period.period_type, period_type
                ),
            })
        }
        Some(period) if period.start_date > period.end_date => {
            Err(EngineError::PeriodConsistency {
                message: format!(
                    "period start {} is after period end {}",
                    period.start_date, period.end_date
                ),
            })
        }
        Some(period) => Ok(period.clone()),
        None => Ok(PayPeriod::containing(period_type, options.reference_date)),
    }
}

/// Days between the period start and the hire date, clamped to the period.
pub(crate) fn late_hire_days(hire_date: NaiveDate, period: &PayPeriod) -> u32 {
    let days = (hire_date - period.start_date).num_days();
    days.clamp(0, i64::from(period.total_days)) as u32
}

/// Days from the later of hire date and period start to the period end.
pub(crate) fn days_employed(hire_date: NaiveDate, period: &PayPeriod) -> u32 {
    if hire_date > period.end_date {
        return 0;
    }
    let first_day = hire_date.max(period.start_date);
    ((period.end_date - first_day).num_days() + 1) as u32
}

/// Builds the attendance block and checks that its counts fit the period.
pub(crate) fn build_attendance(
    employee: &Employee,
    period: &PayPeriod,
    absences: &AbsencePartition,
    days_worked_override: Option<u32>,
) -> EngineResult<Attendance> {
    let total_days = period.total_days;
    let late = late_hire_days(employee.hire_date, period);
    let employed = days_employed(employee.hire_date, period);
    let unjustified = absences.unjustified_count();
    let days_worked = days_worked_override.unwrap_or(employed.saturating_sub(unjustified));

    if days_worked > total_days {
        return Err(EngineError::PeriodConsistency {
            message: format!(
                "{} days worked exceed the {} days of the period",
                days_worked, total_days
            ),
        });
    }
    if unjustified > total_days {
        return Err(EngineError::PeriodConsistency {
            message: format!(
                "{} unjustified absences exceed the {} days of the period",
                unjustified, total_days
            ),
        });
    }
    if days_worked + unjustified + late > total_days {
        return Err(EngineError::PeriodConsistency {
            message: format!(
                "{} days worked + {} absences + {} days before hire exceed the {} days of the period",
                days_worked, unjustified, late, total_days
            ),
        });
    }

    Ok(Attendance {
        total_days,
        late_hire_days: late,
        days_employed: employed,
        days_worked,
        unjustified_absences: unjustified,
        justified_absences: absences.justified.len() as u32,
        discounted_days: discounted_days(unjustified),
    })
}

/// Picks the summary basis: late hire first, then unjustified absences.
pub(crate) fn summary_basis(attendance: &Attendance) -> SummaryBasis {
    if attendance.late_hire_days > 0 {
        SummaryBasis::LateHire
    } else if attendance.unjustified_absences > 0 {
        SummaryBasis::UnjustifiedAbsences
    } else {
        SummaryBasis::Normal
    }
}

/// Totals assembled by an orchestrator before the result is built.
pub(crate) struct Settlement {
    pub earnings: Earnings,
    pub deductions: Deductions,
    pub summary: PayrollSummary,
    pub absences: AbsenceDeductionResult,
    pub extra_pay: ExtraPayResult,
    pub social_security: Option<ImssResult>,
    pub income_tax: Option<IsrResult>,
}

/// Per-employee, per-period state shared by the orchestrator steps.
///
/// Each step records its audit step on the trace in the order it runs.
pub(crate) struct PayrollContext<'a> {
    pub employee: &'a Employee,
    pub tables: &'a RateTables,
    pub period: PayPeriod,
    pub absences: AbsencePartition,
    pub attendance: Attendance,
    pub exemption: MinimumWageExemption,
    pub trace: AuditTrace,
}

impl<'a> PayrollContext<'a> {
    /// Resolves the period, partitions absences, checks attendance and the
    /// minimum-wage exemption.
    pub fn prepare(
        employee: &'a Employee,
        options: &PayrollOptions,
        tables: &'a RateTables,
    ) -> EngineResult<Self> {
        let period = resolve_period(employee.period_type, options)?;
        let absences = partition_absences(employee, period.start_date, period.end_date);

        let mut trace = AuditTrace::default();
        for rejected in &absences.rejected {
            trace.warn(AuditWarning::new(
                "MALFORMED_ABSENCE_DATE",
                format!("Skipped {:?} absence entry '{}'", rejected.kind, rejected.raw),
                "medium",
            ));
        }

        let mut years = vec![period.start_date.year(), period.end_date.year()];
        years.dedup();
        for year in years.into_iter().filter(|y| !tables.covers_year(*y)) {
            warn!(
                employee_id = %employee.id,
                period = %period.id,
                year,
                "No holidays loaded for year; holiday pay not computed"
            );
            trace.warn(AuditWarning::new(
                "NO_HOLIDAY_CALENDAR",
                format!("The holiday calendar has no entries for {}", year),
                "medium",
            ));
        }

        let attendance = build_attendance(employee, &period, &absences, options.days_worked)?;
        debug!(
            employee_id = %employee.id,
            period = %period.id,
            days_worked = attendance.days_worked,
            late_hire_days = attendance.late_hire_days,
            unjustified = attendance.unjustified_absences,
            "Resolved attendance"
        );

        let exemption = check_minimum_wage_exemption(employee.daily_wage(), employee.salary_zone);
        trace.record(exemption.audit_step.clone());

        Ok(Self {
            employee,
            tables,
            period,
            absences,
            attendance,
            exemption,
            trace,
        })
    }

    pub fn daily_wage(&self) -> Decimal {
        self.employee.daily_wage()
    }

    /// Wage for the days before the hire date, capped at `gross`.
    pub fn late_hire_deduction(&self, gross: Decimal) -> Decimal {
        round_cents(self.daily_wage() * Decimal::from(self.attendance.late_hire_days)).min(gross)
    }

    /// Aggregate absence deduction, capped at `cap`.
    pub fn discounted_amount(&self, cap: Decimal) -> Decimal {
        round_cents(self.daily_wage() * Decimal::from(self.attendance.discounted_days)).min(cap)
    }

    pub fn absence_detail(&mut self) -> EngineResult<AbsenceDeductionResult> {
        let result = calculate_absence_deduction(self.employee, &self.absences, self.tables)?;
        self.trace.record(result.audit_step.clone());
        Ok(result)
    }

    pub fn sbc(&self) -> EngineResult<SbcSummary> {
        let calculator = ImssCalculator::new(self.daily_wage())?;
        let daily = calculator.sbc();
        Ok(SbcSummary {
            daily,
            period: round_cents(daily * Decimal::from(self.period.total_days)),
            integration_factor: INTEGRATION_FACTOR,
            formula: format!("{} × {}", self.daily_wage().normalize(), INTEGRATION_FACTOR),
        })
    }

    /// IMSS over the full period days, unless exempt or not employed.
    pub fn imss(&mut self) -> EngineResult<Option<ImssResult>> {
        if self.exemption.applies {
            return Ok(None);
        }
        if self.attendance.days_employed == 0 {
            warn!(
                employee_id = %self.employee.id,
                period = %self.period.id,
                "Employee not employed during period; IMSS skipped"
            );
            self.trace.warn(AuditWarning::new(
                "NOT_EMPLOYED_IN_PERIOD",
                format!(
                    "Hire date {} is after the period end {}",
                    self.employee.hire_date, self.period.end_date
                ),
                "low",
            ));
            return Ok(None);
        }

        let result = calculate_imss(self.daily_wage(), i64::from(self.period.total_days))?;
        self.trace.record(result.audit_step.clone());
        Ok(Some(result))
    }

    /// Sunday premium and holiday pay after the justified-holiday pass.
    pub fn extra_pay(&mut self) -> EngineResult<ExtraPayResult> {
        let result = calculate_extra_pay(self.employee, &self.period, &self.absences, self.tables)?
            .with_justified_override(&self.absences.justified);
        self.trace.record(result.sunday_premium.audit_step.clone());
        self.trace.record(result.holiday_pay.audit_step.clone());
        Ok(result)
    }

    /// ISR for `base`, unless exempt.
    pub fn isr(&mut self, base: Decimal) -> EngineResult<Option<IsrResult>> {
        if self.exemption.applies {
            return Ok(None);
        }
        let result = calculate_isr(base, self.period.period_type, self.tables)?;
        self.trace.record(result.audit_step.clone());
        Ok(Some(result))
    }

    fn employee_summary(&self) -> EmployeeSummary {
        EmployeeSummary {
            id: self.employee.id.clone(),
            name: self.employee.name.clone(),
            daily_wage: self.daily_wage(),
            monthly_salary: match self.employee.wage {
                WageBasis::Monthly(amount) => Some(amount),
                WageBasis::Daily(_) => None,
            },
            period_type: self.employee.period_type,
            salary_zone: self.employee.salary_zone,
            hire_date: self.employee.hire_date,
            rest_days: self.employee.rest_days.iter().copied().collect(),
        }
    }

    /// Records the summary step and assembles the pay statement.
    pub fn finish(
        mut self,
        rule_id: &str,
        rule_name: &str,
        settlement: Settlement,
    ) -> EngineResult<PayrollResult> {
        let sbc = self.sbc()?;
        let summary = &settlement.summary;

        self.trace.record(AuditStep::new(
            rule_id,
            rule_name,
            "LFT arts. 82-89",
            serde_json::json!({
                "period": self.period.id,
                "gross_salary": settlement.earnings.gross_salary.to_string(),
                "days_worked": self.attendance.days_worked,
            }),
            serde_json::json!({
                "total_earnings": summary.total_earnings.to_string(),
                "total_deductions": summary.total_deductions.to_string(),
                "net_pay": summary.net_pay.to_string(),
                "basis": summary.basis,
            }),
            format!(
                "${} earnings − ${} deductions = ${}",
                summary.total_earnings, summary.total_deductions, summary.net_pay
            ),
        ));

        Ok(PayrollResult {
            employee: self.employee_summary(),
            period: self.period,
            attendance: self.attendance,
            earnings: settlement.earnings,
            deductions: settlement.deductions,
            summary: settlement.summary,
            extra_pay: settlement.extra_pay,
            absences: settlement.absences,
            exemption: self.exemption,
            sbc,
            social_security: settlement.social_security,
            income_tax: settlement.income_tax,
            rejected_dates: self.absences.rejected,
            audit: self.trace,
        })
    }
}

/// ISR and IMSS withheld, zero when not computed.
pub(crate) fn withheld(isr: &Option<IsrResult>, imss: &Option<ImssResult>) -> (Decimal, Decimal) {
    (
        isr.as_ref().map(|r| r.withheld).unwrap_or(Decimal::ZERO),
        imss.as_ref().map(|r| r.total).unwrap_or(Decimal::ZERO),
    )
}
