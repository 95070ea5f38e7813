//! Error type for booking and scheduling operations.
//!
//! All errors are local and synchronous: every operation in this crate is an
//! in-memory computation that either succeeds or rejects its input.
//!
//! An infeasible sub-interval is never an error. Searches drop it from their
//! result, so an empty result means "nothing fits" while `Err` means the
//! input itself was rejected.

use thiserror::Error;

use crate::models::{LoadUnit, ResourceType, RunId, TimeInterval};
use crate::validation::ValidationError;

/// Crate result alias.
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors returned by resources, locations and runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulerError {
    /// Construction parameters were malformed.
    #[error("validation failed in {caller}: {}", join_messages(.errors))]
    Validation {
        /// Operation that rejected the parameters.
        caller: &'static str,
        /// Every issue found, in field order.
        errors: Vec<ValidationError>,
    },

    /// Booking interval with `start >= end`.
    #[error("invalid duration: time start {start} is not before time end {end}")]
    InvalidDuration { start: i64, end: i64 },

    /// Booking with a non-positive run identifier.
    #[error("invalid run id {id}: must be positive")]
    InvalidId { id: RunId },

    /// The exact interval is already booked on the resource.
    #[error("time interval {interval} already scheduled")]
    AlreadyScheduled { interval: TimeInterval },

    /// No booking for the run exists on the resource.
    #[error("run {run_id} not found in schedule")]
    NotFound { run_id: RunId },

    /// The resource has no cost rate for the run's load unit.
    #[error("resource does not support load unit {load_unit}")]
    UnsupportedLoadUnit { load_unit: LoadUnit },

    /// The location has no resource with this type and ID.
    #[error("resource {resource_id} of type {resource_type} not found in location")]
    ResourceNotFound {
        resource_type: ResourceType,
        resource_id: i64,
    },
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_validation_message_lists_fields() {
        let err = SchedulerError::Validation {
            caller: "ResourceScheduled::new",
            errors: vec![
                ValidationError::new(ValidationErrorKind::MissingField, "name", "name is required"),
                ValidationError::new(
                    ValidationErrorKind::NonPositive,
                    "resource_type",
                    "resource_type must be positive",
                ),
            ],
        };

        let msg = err.to_string();
        assert!(msg.starts_with("validation failed in ResourceScheduled::new"));
        assert!(msg.contains("name is required"));
        assert!(msg.contains("resource_type must be positive"));
    }

    #[test]
    fn test_already_scheduled_message() {
        let err = SchedulerError::AlreadyScheduled {
            interval: TimeInterval::new(10, 20),
        };
        assert_eq!(err.to_string(), "time interval [10-20] already scheduled");
    }
}
