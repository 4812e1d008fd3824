//! Rate table loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the payroll
//! rate tables from YAML files.

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::PeriodType;

use super::types::{
    HolidayCalendar, IsrTableFile, RateTables, SubsidyRow, SubsidyTableFile, TablesMetadata,
    TaxBracket,
};

/// Gap expected between the upper bound of a row and the lower bound of the next.
const ROW_GAP: Decimal = dec!(0.01);

/// Loads and provides access to the payroll rate tables.
///
/// # Directory Structure
///
/// ```text
/// config/mx2025/
/// ├── tables.yaml            # Table set metadata
/// ├── isr_semanal.yaml       # Weekly ISR tariff
/// ├── isr_quincenal.yaml     # Bi-weekly ISR tariff
/// ├── isr_mensual.yaml       # Monthly ISR tariff
/// ├── subsidio_semanal.yaml  # Weekly employment subsidy
/// └── dias_festivos.yaml     # Mandatory rest days of the year
/// ```
///
/// # Example
///
/// ```no_run
/// use nomina_engine::config::ConfigLoader;
/// use nomina_engine::models::PeriodType;
///
/// let loader = ConfigLoader::load("./config/mx2025")?;
/// let brackets = loader.tables().isr_brackets(PeriodType::Quincenal)?;
/// println!("{} brackets", brackets.len());
/// # Ok::<(), nomina_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    tables: RateTables,
}

impl ConfigLoader {
    /// Loads the rate tables from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing ([`EngineError::TableNotFound`])
    /// - Any file contains invalid YAML ([`EngineError::TableLoad`])
    /// - A tariff is empty, unsorted, overlapping or has gaps
    ///   ([`EngineError::TableLoad`])
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<TablesMetadata>(&path.join("tables.yaml"))?;

        let mut isr = HashMap::new();
        for period_type in PeriodType::ALL {
            let file_name = format!("{}.yaml", period_type.isr_table_name());
            let table = Self::load_yaml::<IsrTableFile>(&path.join(&file_name))?;

            if table.period_type != period_type {
                return Err(EngineError::TableLoad {
                    table: file_name,
                    message: format!(
                        "declares period type {} but {} was expected",
                        table.period_type, period_type
                    ),
                });
            }
            validate_ranges(
                &file_name,
                &table
                    .brackets
                    .iter()
                    .map(|b: &TaxBracket| (b.lower, b.upper))
                    .collect::<Vec<_>>(),
            )?;

            debug!(table = %file_name, brackets = table.brackets.len(), "Loaded ISR tariff");
            isr.insert(period_type, table.brackets);
        }

        let subsidy = Self::load_yaml::<SubsidyTableFile>(&path.join("subsidio_semanal.yaml"))?;
        validate_ranges(
            "subsidio_semanal.yaml",
            &subsidy
                .rows
                .iter()
                .map(|r: &SubsidyRow| (r.lower, r.upper))
                .collect::<Vec<_>>(),
        )?;

        let calendar = Self::load_yaml::<HolidayCalendar>(&path.join("dias_festivos.yaml"))?;
        if let Some(stray) = calendar
            .holidays
            .iter()
            .find(|h| h.date.year() != calendar.year)
        {
            return Err(EngineError::TableLoad {
                table: "dias_festivos.yaml".to_string(),
                message: format!("{} is outside year {}", stray.date, calendar.year),
            });
        }

        Ok(Self {
            tables: RateTables::new(metadata, isr, subsidy.rows, calendar.holidays),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::TableNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::TableLoad {
            table: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded rate tables.
    pub fn tables(&self) -> &RateTables {
        &self.tables
    }

    /// Consumes the loader and returns the rate tables.
    pub fn into_tables(self) -> RateTables {
        self.tables
    }
}

/// Checks that `(lower, upper)` ranges are non-empty, ascending and
/// contiguous to the cent, and that only the last range is open.
fn validate_ranges(table: &str, ranges: &[(Decimal, Option<Decimal>)]) -> EngineResult<()> {
    let fail = |message: String| EngineError::TableLoad {
        table: table.to_string(),
        message,
    };

    if ranges.is_empty() {
        return Err(fail("table has no rows".to_string()));
    }

    for (i, (lower, upper)) in ranges.iter().enumerate() {
        let is_last = i == ranges.len() - 1;
        match upper {
            Some(upper) if upper < lower => {
                return Err(fail(format!("row {} has upper {} below lower {}", i + 1, upper, lower)));
            }
            None if !is_last => {
                return Err(fail(format!("row {} is open but is not the last row", i + 1)));
            }
            _ => {}
        }

        if let Some((next_lower, _)) = ranges.get(i + 1) {
            let Some(upper) = upper else { continue };
            if *next_lower - *upper != ROW_GAP {
                return Err(fail(format!(
                    "row {} ends at {} but row {} starts at {}",
                    i + 1,
                    upper,
                    i + 2,
                    next_lower
                )));
            }
        }
    }

    Ok(())
}
