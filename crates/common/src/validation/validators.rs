// Field Validators - Reusable validation components
use std::fmt::Display;

/// Trait for field validators
pub trait FieldValidator<T: ?Sized> {
    /// Validate a field value
    fn validate(&self, value: &T) -> Result<(), String>;
}

/// Range validator for numeric types
#[derive(Debug, Clone)]
pub struct RangeValidator<T> {
    min: Option<T>,
    max: Option<T>,
    label: Option<String>,
}

impl<T> Default for RangeValidator<T>
where
    T: PartialOrd + Display + Clone,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> RangeValidator<T>
where
    T: PartialOrd + Display + Clone,
{
    /// Create a new range validator with no constraints
    pub fn empty() -> Self {
        Self { min: None, max: None, label: None }
    }

    /// Create a new range validator with min and max values (convenience
    /// constructor)
    pub fn new(min: T, max: T) -> Self {
        Self { min: Some(min), max: Some(max), label: None }
    }

    /// Set minimum value
    pub fn min(mut self, min: T) -> Self {
        self.min = Some(min);
        self
    }

    /// Set maximum value
    pub fn max(mut self, max: T) -> Self {
        self.max = Some(max);
        self
    }

    /// Name used in messages instead of "Value"
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether `value` lies inside the configured bounds
    pub fn contains(&self, value: &T) -> bool {
        self.min.as_ref().map_or(true, |min| value >= min)
            && self.max.as_ref().map_or(true, |max| value <= max)
    }
}

impl<T> FieldValidator<T> for RangeValidator<T>
where
    T: PartialOrd + Display + Clone,
{
    fn validate(&self, value: &T) -> Result<(), String> {
        let label = self.label.as_deref().unwrap_or("Value");

        if let (Some(min), Some(max)) = (&self.min, &self.max) {
            if !self.contains(value) {
                return Err(format!("{label} must be between {min} and {max}"));
            }
            return Ok(());
        }

        if let Some(ref min) = self.min {
            if value < min {
                return Err(format!("{label} must be at least {min}"));
            }
        }

        if let Some(ref max) = self.max {
            if value > max {
                return Err(format!("{label} must not exceed {max}"));
            }
        }

        Ok(())
    }
}

/// String validator with various constraints.
///
/// Each constraint may carry its own message; constraints without one use a
/// generic message.
#[derive(Debug, Clone)]
pub struct StringValidator {
    not_empty: Option<String>,
    max_length: Option<(usize, String)>,
    pattern: Option<(regex::Regex, String)>,
    trim: bool,
}

impl Default for StringValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StringValidator {
    /// Create a new string validator
    pub fn new() -> Self {
        Self { not_empty: None, max_length: None, pattern: None, trim: false }
    }

    /// Require non-empty string
    pub fn not_empty(mut self, message: impl Into<String>) -> Self {
        self.not_empty = Some(message.into());
        self
    }

    /// Set maximum length in characters
    pub fn max_length(mut self, max: usize, message: impl Into<String>) -> Self {
        self.max_length = Some((max, message.into()));
        self
    }

    /// Set pattern to match
    pub fn pattern(mut self, pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        self.pattern = Some((regex::Regex::new(pattern)?, message.into()));
        Ok(self)
    }

    /// Use a pattern compiled elsewhere
    pub fn compiled_pattern(mut self, pattern: regex::Regex, message: impl Into<String>) -> Self {
        self.pattern = Some((pattern, message.into()));
        self
    }

    /// Set whether to trim before validation
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }
}

impl FieldValidator<str> for StringValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let val = if self.trim { value.trim() } else { value };

        if let Some(ref message) = self.not_empty {
            if val.is_empty() {
                return Err(message.clone());
            }
        }

        if let Some((max, ref message)) = self.max_length {
            if val.chars().count() > max {
                return Err(message.clone());
            }
        }

        if let Some((ref pattern, ref message)) = self.pattern {
            if !pattern.is_match(val) {
                return Err(message.clone());
            }
        }

        Ok(())
    }
}

impl FieldValidator<String> for StringValidator {
    fn validate(&self, value: &String) -> Result<(), String> {
        FieldValidator::<str>::validate(self, value.as_str())
    }
}

/// URL validator
#[derive(Debug, Clone)]
pub struct UrlValidator {
    allowed_schemes: Vec<String>,
    require_host: bool,
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlValidator {
    /// Create a new URL validator accepting http and https
    pub fn new() -> Self {
        Self {
            allowed_schemes: vec!["http".to_string(), "https".to_string()],
            require_host: false,
        }
    }

    /// Set allowed schemes
    pub fn allowed_schemes(mut self, schemes: Vec<String>) -> Self {
        self.allowed_schemes = schemes;
        self
    }

    /// Reject URLs without a host component
    pub fn require_host(mut self) -> Self {
        self.require_host = true;
        self
    }
}

impl FieldValidator<str> for UrlValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let Ok(parsed) = url::Url::parse(value) else {
            return Err("Invalid URL format".to_string());
        };

        let scheme = parsed.scheme();
        if !self.allowed_schemes.iter().any(|allowed| allowed == scheme) {
            return Err(format!("URL scheme '{scheme}' is not allowed"));
        }

        if self.require_host && parsed.host_str().map_or(true, str::is_empty) {
            return Err("URL must include a domain name".to_string());
        }

        Ok(())
    }
}

impl FieldValidator<String> for UrlValidator {
    fn validate(&self, value: &String) -> Result<(), String> {
        FieldValidator::<str>::validate(self, value.as_str())
    }
}
