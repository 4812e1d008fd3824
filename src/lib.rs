//! Payroll engine for Mexican weekly, bi-weekly and monthly payrolls
//!
//! This crate computes itemized pay statements under Mexican labor and tax
//! rules: gross pay with late-hire proration, unjustified-absence
//! deductions, Sunday premium and holiday pay, IMSS quotas, ISR withholding
//! with employment subsidy and the minimum-wage exemption.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod payroll;
