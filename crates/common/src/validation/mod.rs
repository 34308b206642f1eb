// Validation Module - field-level error collection
use std::collections::BTreeMap;
use std::fmt;

mod validators;

pub use validators::{FieldValidator, RangeValidator, StringValidator, UrlValidator};

/// Type alias for validation results
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error with detailed field-level errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Create with a single field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add_field_error(field, message);
        err
    }

    /// Add a field-level error
    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get error count
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Get errors for a specific field
    pub fn field_errors(&self, field: &str) -> Vec<&FieldError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    /// Merge another validation error into this one
    pub fn merge(&mut self, other: ValidationError) {
        self.errors.extend(other.errors);
    }

    /// Group messages by field, keeping the order they were raised in.
    pub fn into_field_map(self) -> BTreeMap<String, Vec<String>> {
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for error in self.errors {
            map.entry(error.field).or_default().push(error.message);
        }
        map
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "Validation error with no specific field errors")?;
        } else if self.errors.len() == 1 {
            write!(f, "Validation failed: {}", self.errors[0].message)?;
        } else {
            write!(f, "Validation failed with {} errors: ", self.errors.len())?;
            for (i, error) in self.errors.iter().enumerate() {
                if i > 0 {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", error.field, error.message)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Individual field error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    /// Create a new field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Collects every failing rule instead of stopping at the first one.
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationError,
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.add_field_error(field, message);
    }

    /// Validate a field with a specific validator.
    ///
    /// Returns `true` when the value passed, so callers can skip dependent
    /// checks on the same field.
    pub fn validate_field<T, V>(&mut self, field: &str, value: &T, validator: &V) -> bool
    where
        V: FieldValidator<T> + ?Sized,
        T: ?Sized,
    {
        match validator.validate(value) {
            Ok(()) => true,
            Err(msg) => {
                self.add_error(field, msg);
                false
            }
        }
    }

    /// Check if validation has errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether a given field already failed a rule
    pub fn has_field_error(&self, field: &str) -> bool {
        self.errors.errors.iter().any(|e| e.field == field)
    }

    /// Get error count
    pub fn error_count(&self) -> usize {
        self.errors.error_count()
    }

    /// Finalize and return result
    pub fn finalize(self) -> ValidationResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    /// Get errors without consuming validator
    pub fn errors(&self) -> &ValidationError {
        &self.errors
    }

    /// Clear all errors
    pub fn clear(&mut self) {
        self.errors = ValidationError::new();
    }
}
