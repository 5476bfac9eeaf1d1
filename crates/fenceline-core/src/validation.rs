//! Field checks for connector input.
//!
//! Problems are collected per field so a form can mark every offending
//! input at once instead of stopping at the first one.

use std::fmt;

/// What is wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// No value was submitted.
    Required,
    /// A value was submitted but has the wrong shape.
    Format,
    /// The value is blank.
    Empty,
}

/// A problem with one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Key of the offending field.
    pub field: String,
    /// Message shown next to the field.
    pub message: String,
    /// Problem category.
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    /// The field was not submitted.
    ///
    /// ```
    /// use fenceline_core::ValidationError;
    ///
    /// let error = ValidationError::required("registry_url");
    /// assert_eq!(error.to_string(), "registry_url: required");
    /// ```
    pub fn required(field: impl Into<String>) -> Self {
        Self::with_kind(field, "required", ValidationErrorKind::Required)
    }

    /// The value does not have the expected shape.
    pub fn format(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_kind(field, message, ValidationErrorKind::Format)
    }

    /// The value is blank.
    pub fn empty(field: impl Into<String>) -> Self {
        Self::with_kind(field, "must not be empty", ValidationErrorKind::Empty)
    }

    fn with_kind(
        field: impl Into<String>,
        message: impl Into<String>,
        kind: ValidationErrorKind,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every problem found in one round of checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Starts an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a problem.
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded problems.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.errors.len()
    }

    /// Recorded problems in the order they were found.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// The first problem recorded for `field`, if any.
    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// `Ok` when nothing was recorded, otherwise the collection itself.
    ///
    /// # Errors
    ///
    /// Returns `self` if at least one problem was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "no invalid fields"),
            [only] => write!(f, "invalid field {only}"),
            errors => {
                write!(f, "{} invalid fields", errors.len())?;
                for error in errors {
                    write!(f, "; {error}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationErrors {}

/// Types whose values can be checked before use.
pub trait Validate {
    /// Checks every field and reports all problems together.
    ///
    /// # Errors
    ///
    /// Returns the collected problems if any field is invalid.
    fn validate(&self) -> Result<(), ValidationErrors>;

    /// Returns true if [`Validate::validate`] finds nothing.
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Records a problem unless `value` is an absolute `http` or `https` URL.
pub fn check_http_url(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty(field));
    } else if !(value.starts_with("https://") || value.starts_with("http://")) {
        errors.add(ValidationError::format(
            field,
            "must start with http:// or https://",
        ));
    }
}
