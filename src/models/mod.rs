//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod pay_period;
mod payroll_result;

pub use employee::{Employee, EmployeeRecord, SUNDAY, SalaryZone, WageBasis};
pub use pay_period::{PayPeriod, PeriodType, generate_periods, month_name};
pub use payroll_result::{
    Attendance, AuditStep, AuditTrace, AuditWarning, Deductions, Earnings, EmployeeSummary,
    PayrollResult, PayrollSummary, SbcSummary, SummaryBasis,
};
