//! Rate table types for payroll calculation.
//!
//! This module contains the strongly-typed structures that are deserialized
//! from the YAML rate table files, and the immutable [`RateTables`] value the
//! calculators receive.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::models::PeriodType;

/// Metadata describing a set of rate tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TablesMetadata {
    /// Human-readable name of the table set.
    pub name: String,
    /// Fiscal year the tables apply to.
    pub fiscal_year: i32,
    /// Publication the tables were transcribed from.
    pub source: String,
}

/// One row of an ISR tariff (Anexo 8 of the Resolución Miscelánea Fiscal).
///
/// An open `upper` bound means "en adelante".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TaxBracket {
    /// Lower bound of the bracket (límite inferior).
    pub lower: Decimal,
    /// Upper bound of the bracket (límite superior), inclusive.
    pub upper: Option<Decimal>,
    /// Fixed fee for the bracket (cuota fija).
    pub fixed_fee: Decimal,
    /// Marginal rate over the lower bound, in percent.
    pub rate_percent: Decimal,
}

impl TaxBracket {
    /// Returns `true` if `base` falls inside the bracket (both ends inclusive).
    pub fn contains(&self, base: Decimal) -> bool {
        base >= self.lower && self.upper.is_none_or(|upper| base <= upper)
    }
}

/// One row of an employment subsidy schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubsidyRow {
    /// Lower bound of income for the row.
    pub lower: Decimal,
    /// Upper bound of income for the row, inclusive.
    pub upper: Option<Decimal>,
    /// Subsidy credited for incomes in the row.
    pub subsidy: Decimal,
}

impl SubsidyRow {
    /// Creates a closed subsidy row.
    pub const fn new(lower: Decimal, upper: Decimal, subsidy: Decimal) -> Self {
        Self {
            lower,
            upper: Some(upper),
            subsidy,
        }
    }

    /// Returns `true` if `income` falls inside the row (both ends inclusive).
    pub fn contains(&self, income: Decimal) -> bool {
        income >= self.lower && self.upper.is_none_or(|upper| income <= upper)
    }
}

/// A mandatory rest day (LFT art. 74).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Holiday {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday.
    pub name: String,
}

/// ISR tariff file structure (`isr_*.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct IsrTableFile {
    /// Period type the tariff applies to.
    pub period_type: PeriodType,
    /// Brackets in ascending order.
    pub brackets: Vec<TaxBracket>,
}

/// Subsidy schedule file structure (`subsidio_semanal.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct SubsidyTableFile {
    /// Rows in ascending order.
    pub rows: Vec<SubsidyRow>,
}

/// Holiday calendar file structure (`dias_festivos.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayCalendar {
    /// Calendar year of the holidays.
    pub year: i32,
    /// The holidays of the year.
    pub holidays: Vec<Holiday>,
}

/// The complete, immutable set of rate tables used by the calculators.
///
/// A `RateTables` value is built once (normally through
/// [`ConfigLoader`](super::ConfigLoader)) and passed by reference into
/// every calculation.
#[derive(Debug, Clone)]
pub struct RateTables {
    metadata: TablesMetadata,
    isr: HashMap<PeriodType, Vec<TaxBracket>>,
    weekly_subsidy: Vec<SubsidyRow>,
    holidays: Vec<Holiday>,
}

impl RateTables {
    /// Creates a table set from its component parts.
    ///
    /// Holidays are kept sorted by date.
    pub fn new(
        metadata: TablesMetadata,
        isr: HashMap<PeriodType, Vec<TaxBracket>>,
        weekly_subsidy: Vec<SubsidyRow>,
        holidays: Vec<Holiday>,
    ) -> Self {
        let mut sorted_holidays = holidays;
        sorted_holidays.sort_by(|a, b| a.date.cmp(&b.date));
        Self {
            metadata,
            isr,
            weekly_subsidy,
            holidays: sorted_holidays,
        }
    }

    /// Returns the table metadata.
    pub fn metadata(&self) -> &TablesMetadata {
        &self.metadata
    }

    /// Returns the ISR tariff for a period type.
    ///
    /// Fails with [`EngineError::TableLoad`] when no tariff was loaded for
    /// the period type or the tariff has no brackets.
    pub fn isr_brackets(&self, period_type: PeriodType) -> EngineResult<&[TaxBracket]> {
        match self.isr.get(&period_type) {
            Some(brackets) if !brackets.is_empty() => Ok(brackets),
            Some(_) => Err(EngineError::TableLoad {
                table: period_type.isr_table_name().to_string(),
                message: "table has no brackets".to_string(),
            }),
            None => Err(EngineError::TableLoad {
                table: period_type.isr_table_name().to_string(),
                message: "table was not loaded".to_string(),
            }),
        }
    }

    /// Returns the weekly employment subsidy schedule.
    pub fn weekly_subsidy(&self) -> &[SubsidyRow] {
        &self.weekly_subsidy
    }

    /// Returns all holidays, sorted by date.
    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    /// Returns the holidays falling between `start` and `end` inclusive.
    pub fn holidays_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Iterator<Item = &Holiday> {
        self.holidays
            .iter()
            .filter(move |h| h.date >= start && h.date <= end)
    }

    /// Returns `true` if `date` is a holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.iter().any(|h| h.date == date)
    }

    /// Returns `true` if the calendar lists any holiday in `year`.
    pub fn covers_year(&self, year: i32) -> bool {
        self.holidays.iter().any(|h| h.date.year() == year)
    }
}
