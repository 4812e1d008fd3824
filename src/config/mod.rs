//! Rate tables and statutory constants for the payroll engine.
//!
//! ISR tariffs, the weekly employment subsidy and the holiday calendar are
//! loaded from YAML files; the remaining statutory values are constants.
//!
//! # Example
//!
//! ```no_run
//! use nomina_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/mx2025").unwrap();
//! println!("Loaded tables: {}", loader.tables().metadata().name);
//! ```

pub mod constants;
mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    Holiday, HolidayCalendar, IsrTableFile, RateTables, SubsidyRow, SubsidyTableFile,
    TablesMetadata, TaxBracket,
};
