//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while computing a payroll.

use thiserror::Error;

use crate::models::PeriodType;

/// The main error type for the payroll engine.
///
/// Low-level calculators fail with the specific variant describing the
/// offending input. The period orchestrators wrap those failures in
/// [`EngineError::Payroll`] so the caller knows which employee and period
/// triggered them.
///
/// # Example
///
/// ```
/// use nomina_engine::error::EngineError;
///
/// let error = EngineError::TableNotFound {
///     path: "/missing/isr_mensual.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Rate table not found: /missing/isr_mensual.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A numeric or date input was outside its valid domain.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The name of the offending input.
        field: String,
        /// A description of what made the input invalid.
        message: String,
    },

    /// A rate table file was not found at the specified path.
    #[error("Rate table not found: {path}")]
    TableNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A rate table could not be parsed, failed validation or is missing
    /// from the loaded set.
    #[error("Failed to load rate table '{table}': {message}")]
    TableLoad {
        /// The table (or file) that failed.
        table: String,
        /// A description of the failure.
        message: String,
    },

    /// The employee snapshot lacks an attribute the period type requires.
    #[error("Missing field '{field}' required for {period_type} payroll")]
    MissingField {
        /// The missing attribute.
        field: String,
        /// The pay-period type that requires it.
        period_type: PeriodType,
    },

    /// Days worked, absences and late-hire days do not fit in the period.
    #[error("Inconsistent period: {message}")]
    PeriodConsistency {
        /// A description of the inconsistency.
        message: String,
    },

    /// A sub-calculation failed while computing an employee's payroll.
    #[error("Payroll for employee '{employee_id}' in period '{period}' failed: {source}")]
    Payroll {
        /// The employee being processed.
        employee_id: String,
        /// The label of the period being processed.
        period: String,
        /// The underlying failure.
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Creates an [`EngineError::InvalidInput`] from borrowed parts.
    pub fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Returns `true` when the error was caused by the caller's data rather
    /// than by the engine's rate tables.
    ///
    /// Wrapped errors are classified by their innermost cause.
    pub fn is_client_error(&self) -> bool {
        match self {
            EngineError::InvalidInput { .. }
            | EngineError::MissingField { .. }
            | EngineError::PeriodConsistency { .. } => true,
            EngineError::TableNotFound { .. } | EngineError::TableLoad { .. } => false,
            EngineError::Payroll { source, .. } => source.is_client_error(),
        }
    }

    /// Returns the innermost error, unwrapping any payroll context.
    pub fn root_cause(&self) -> &EngineError {
        match self {
            EngineError::Payroll { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_displays_field_and_message() {
        let error = EngineError::invalid_input("dias", "debe estar entre 1 y 31");
        assert_eq!(
            error.to_string(),
            "Invalid input 'dias': debe estar entre 1 y 31"
        );
    }

    #[test]
    fn test_table_load_displays_table_and_message() {
        let error = EngineError::TableLoad {
            table: "isr_quincenal".to_string(),
            message: "table is empty".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to load rate table 'isr_quincenal': table is empty"
        );
    }

    #[test]
    fn test_missing_field_displays_period_type() {
        let error = EngineError::MissingField {
            field: "sueldo_mensual".to_string(),
            period_type: PeriodType::Mensual,
        };
        assert_eq!(
            error.to_string(),
            "Missing field 'sueldo_mensual' required for MENSUAL payroll"
        );
    }

    #[test]
    fn test_payroll_error_wraps_source() {
        let error = EngineError::Payroll {
            employee_id: "emp_001".to_string(),
            period: "AGOSTO/01".to_string(),
            source: Box::new(EngineError::invalid_input("salario_diario", "must be positive")),
        };

        assert!(error.to_string().contains("emp_001"));
        assert!(error.to_string().contains("AGOSTO/01"));
        assert!(std::error::Error::source(&error).is_some());
        assert!(matches!(
            error.root_cause(),
            EngineError::InvalidInput { field, .. } if field == "salario_diario"
        ));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(EngineError::PeriodConsistency {
            message: "x".to_string()
        }
        .is_client_error());
        assert!(!EngineError::TableNotFound {
            path: "x".to_string()
        }
        .is_client_error());

        let wrapped = EngineError::Payroll {
            employee_id: "emp_001".to_string(),
            period: "ENERO".to_string(),
            source: Box::new(EngineError::TableLoad {
                table: "isr_mensual".to_string(),
                message: "missing".to_string(),
            }),
        };
        assert!(!wrapped.is_client_error());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> EngineResult<()> {
            Err(EngineError::TableNotFound {
                path: "/test".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
