//! Input validation for booking models.
//!
//! Checks construction parameters before resources and locations are built,
//! and the integrity of a built location. Detects:
//! - Missing or non-positive required fields
//! - Negative cost rates
//! - Duplicate resource IDs within a type bucket
//! - Resources that can never satisfy a need (zero served quantity)

use std::collections::HashSet;
use std::fmt;

use crate::models::{Location, ParamsNewLocation, ParamsNewResource};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Offending field.
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required field is empty or absent.
    MissingField,
    /// A field that must be positive (or non-zero) is not.
    NonPositive,
    /// A cost rate is negative or NaN.
    NegativeCost,
    /// Two resources of the same type share an ID.
    DuplicateId,
    /// A resource serves no units of need.
    ZeroServedQuantity,
}

impl ValidationError {
    pub(crate) fn new(
        kind: ValidationErrorKind,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates parameters for a new resource.
///
/// Checks, in field order:
/// 1. `name` is not empty
/// 2. `resource_type` is positive
/// 3. `cost_per_load_unit` is present
/// 4. every cost rate is non-negative
pub fn validate_new_resource(params: &ParamsNewResource) -> ValidationResult {
    let mut errors = Vec::new();

    if params.name.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingField,
            "name",
            "name is required",
        ));
    }

    if params.resource_type == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonPositive,
            "resource_type",
            "resource_type must be positive",
        ));
    }

    match &params.cost_per_load_unit {
        None => errors.push(ValidationError::new(
            ValidationErrorKind::MissingField,
            "cost_per_load_unit",
            "cost_per_load_unit is required",
        )),
        Some(costs) => {
            let mut negative: Vec<_> = costs
                .iter()
                .filter(|(_, cost)| cost.is_nan() || **cost < 0.0)
                .map(|(&unit, _)| unit)
                .collect();
            negative.sort_unstable();

            for unit in negative {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeCost,
                    "cost_per_load_unit",
                    format!("cost for load unit {unit} is negative or not a number"),
                ));
            }
        }
    }

    finish(errors)
}

/// Validates parameters for a new location.
///
/// `name` must not be empty and `id` must be non-zero.
pub fn validate_new_location(params: &ParamsNewLocation) -> ValidationResult {
    let mut errors = Vec::new();

    if params.name.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingField,
            "name",
            "name is required",
        ));
    }

    if params.id == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonPositive,
            "id",
            "id is required",
        ));
    }

    finish(errors)
}

/// Checks the integrity of a built location's inventory.
///
/// [`Location::add_resource`] accepts anything; run this when the inventory
/// comes from an untrusted source.
///
/// Checks:
/// 1. No duplicate resource IDs within a type
/// 2. No resource with a zero served quantity
pub fn validate_location(location: &Location) -> ValidationResult {
    let mut errors = Vec::new();

    for (resource_type, resources) in location.resources().iter() {
        let mut ids = HashSet::new();
        for r in resources {
            if !ids.insert(r.id()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    "id",
                    format!("Duplicate resource ID {} for type {resource_type}", r.id()),
                ));
            }

            if r.served_quantity() == 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ZeroServedQuantity,
                    "served_quantity",
                    format!("Resource {} of type {resource_type} serves nothing", r.id()),
                ));
            }
        }
    }

    finish(errors)
}
