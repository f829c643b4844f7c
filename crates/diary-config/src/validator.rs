//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::DiaryConfig;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn collected errors into a single [`ConfigError::Rejected`],
    /// handing back the warnings when there are none.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        if self.is_valid() {
            return Ok(self.warnings);
        }
        let summary = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        Err(ConfigError::Rejected(summary))
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &DiaryConfig) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_account(config, &mut result);
        Self::validate_diary(config, &mut result);
        Self::validate_site(config, &mut result);
        Self::validate_generator(config, &mut result);
        Self::validate_pacing(config, &mut result);

        Ok(result)
    }

    fn validate_account(config: &DiaryConfig, result: &mut ValidationResult) {
        if config.account.username.trim().is_empty() {
            result.add_error(ValidationError::new(
                "account.username",
                "username is required (set AGRION_USERNAME)",
            ));
        }

        if config.account.password.is_empty() {
            result.add_error(ValidationError::new(
                "account.password",
                "password is required (set AGRION_PASSWORD)",
            ));
        }
    }

    fn validate_diary(config: &DiaryConfig, result: &mut ValidationResult) {
        let diary = &config.diary;

        if diary.interval_days == 0 {
            result.add_error(ValidationError::new(
                "diary.interval_days",
                "interval_days must be at least 1",
            ));
        }

        if diary.start_date > diary.end_date {
            result.add_error(ValidationError::new(
                "diary.start_date",
                format!(
                    "start_date {} is after end_date {}",
                    diary.start_date, diary.end_date
                ),
            ));
        }

        if diary.crop.trim().is_empty() {
            result.add_error(ValidationError::new("diary.crop", "crop cannot be empty"));
        }

        if diary.validation_attempts == 0 {
            result.add_error(ValidationError::new(
                "diary.validation_attempts",
                "validation_attempts must be at least 1",
            ));
        }

        if diary.reuse_selection {
            result.add_warning(ValidationWarning::new(
                "diary.reuse_selection",
                "crop, land and variety are only selected for the first window",
            ));
        }
    }

    fn validate_site(config: &DiaryConfig, result: &mut ValidationResult) {
        let urls = [
            ("site.login_url", &config.site.login_url),
            ("site.main_url", &config.site.main_url),
            ("site.detail_url", &config.site.detail_url),
            ("browser.endpoint", &config.browser.endpoint),
        ];

        for (path, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                result.add_error(ValidationError::new(
                    path,
                    "must start with http:// or https://",
                ));
            }
        }
    }

    fn validate_generator(config: &DiaryConfig, result: &mut ValidationResult) {
        let generator = &config.generator;

        if generator.max_tokens == 0 {
            result.add_error(ValidationError::new(
                "generator.max_tokens",
                "max_tokens must be greater than 0",
            ));
        }

        if !(0.0..=2.0).contains(&generator.temperature) {
            result.add_error(ValidationError::new(
                "generator.temperature",
                "temperature must be between 0.0 and 2.0",
            ));
        }

        if generator.max_chars < 4 {
            result.add_error(ValidationError::new(
                "generator.max_chars",
                "max_chars must leave room for the ellipsis",
            ));
        }

        if generator.enabled && generator.credential().is_none() {
            result.add_warning(ValidationWarning::new(
                "generator.api_key",
                "generator is enabled without an API key, static templates will be used",
            ));
        }
    }

    fn validate_pacing(config: &DiaryConfig, result: &mut ValidationResult) {
        for (path, range) in config.pacing.ranges() {
            if !range.is_ordered() {
                result.add_error(ValidationError::new(
                    path,
                    format!("min_ms {} is greater than max_ms {}", range.min_ms, range.max_ms),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
