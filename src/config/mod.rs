#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::google::GOOGLE_MAPS_BASE_URL;
use crate::core::imagery::LoadPolicy;
use crate::core::ConfigProvider;
use crate::i18n::Language;
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_PHOTO_LOAD_RETRIES: u32 = 5;
pub const DEFAULT_PHOTO_LOAD_TIMEOUT_MS: u64 = 5000;

/// Runtime settings, read from the environment or a TOML file.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub google_maps_api_key: String,
    pub request_timeout_seconds: u64,
    pub photo_load_retries: u32,
    pub photo_load_timeout_ms: u64,
    pub google_maps_base_url: String,
    pub default_language: Language,
    pub session_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source. Blank values count as
    /// missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let google_maps_api_key =
            var("GOOGLE_MAPS_API_KEY").ok_or_else(|| PlannerError::MissingConfigError {
                field: "GOOGLE_MAPS_API_KEY".to_string(),
            })?;

        Ok(Self {
            supabase_url: var("SUPABASE_URL").unwrap_or_default(),
            supabase_anon_key: var("SUPABASE_ANON_KEY").unwrap_or_default(),
            google_maps_api_key,
            request_timeout_seconds: parse_var(
                "REQUEST_TIMEOUT_SECONDS",
                var("REQUEST_TIMEOUT_SECONDS"),
                DEFAULT_REQUEST_TIMEOUT_SECONDS,
            )?,
            photo_load_retries: parse_var(
                "PHOTO_LOAD_RETRIES",
                var("PHOTO_LOAD_RETRIES"),
                DEFAULT_PHOTO_LOAD_RETRIES,
            )?,
            photo_load_timeout_ms: parse_var(
                "PHOTO_LOAD_TIMEOUT_MS",
                var("PHOTO_LOAD_TIMEOUT_MS"),
                DEFAULT_PHOTO_LOAD_TIMEOUT_MS,
            )?,
            google_maps_base_url: var("GOOGLE_MAPS_BASE_URL")
                .unwrap_or_else(|| GOOGLE_MAPS_BASE_URL.to_string()),
            default_language: parse_var("DEFAULT_LANGUAGE", var("DEFAULT_LANGUAGE"), Language::default())?,
            session_file: var("SESSION_FILE").map(PathBuf::from),
        })
    }

    /// Store and auth need the Supabase project; resolving and rendering
    /// static pages do not.
    pub fn require_supabase(&self) -> Result<()> {
        for (field, value) in [
            ("SUPABASE_URL", &self.supabase_url),
            ("SUPABASE_ANON_KEY", &self.supabase_anon_key),
        ] {
            if value.trim().is_empty() {
                return Err(PlannerError::MissingConfigError {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn load_policy(&self) -> LoadPolicy {
        LoadPolicy {
            max_attempts: self.photo_load_retries,
            attempt_timeout: Duration::from_millis(self.photo_load_timeout_ms),
            ..LoadPolicy::default()
        }
    }
}

fn parse_var<T>(field: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| PlannerError::InvalidConfigValueError {
                field: field.to_string(),
                value: value.clone(),
                reason: e.to_string(),
            }),
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("GOOGLE_MAPS_API_KEY", &self.google_maps_api_key)?;
        if !self.supabase_url.is_empty() {
            validate_url("SUPABASE_URL", &self.supabase_url)?;
        }
        validate_url("GOOGLE_MAPS_BASE_URL", &self.google_maps_base_url)?;
        validate_positive_number("REQUEST_TIMEOUT_SECONDS", self.request_timeout_seconds, 1)?;
        validate_range("PHOTO_LOAD_RETRIES", self.photo_load_retries, 1, 20)?;
        validate_positive_number("PHOTO_LOAD_TIMEOUT_MS", self.photo_load_timeout_ms, 1)?;
        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn supabase_url(&self) -> &str {
        &self.supabase_url
    }

    fn supabase_anon_key(&self) -> &str {
        &self.supabase_anon_key
    }

    fn google_maps_api_key(&self) -> &str {
        &self.google_maps_api_key
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.request_timeout_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_missing_maps_key_is_fatal() {
        let err = AppConfig::from_lookup(lookup(&[("SUPABASE_URL", "https://x.supabase.co")])).unwrap_err();
        assert!(matches!(err, PlannerError::MissingConfigError { ref field } if field == "GOOGLE_MAPS_API_KEY"));

        let err = AppConfig::from_lookup(lookup(&[("GOOGLE_MAPS_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(err, PlannerError::MissingConfigError { .. }));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("GOOGLE_MAPS_API_KEY", "KEY")])).unwrap();
        assert_eq!(config.request_timeout_seconds, DEFAULT_REQUEST_TIMEOUT_SECONDS);
        assert_eq!(config.google_maps_base_url, GOOGLE_MAPS_BASE_URL);
        assert_eq!(config.default_language, Language::Fr);
        assert_eq!(config.load_policy(), LoadPolicy::default());
        assert!(config.validate().is_ok());
        assert!(config.require_supabase().is_err());
    }

    #[test]
    fn test_overrides_and_invalid_numbers() {
        let config = AppConfig::from_lookup(lookup(&[
            ("GOOGLE_MAPS_API_KEY", "KEY"),
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("PHOTO_LOAD_RETRIES", "2"),
            ("PHOTO_LOAD_TIMEOUT_MS", "750"),
            ("DEFAULT_LANGUAGE", "ja"),
        ]))
        .unwrap();
        assert!(config.require_supabase().is_ok());
        assert_eq!(config.default_language, Language::Ja);
        assert_eq!(config.load_policy().max_attempts, 2);
        assert_eq!(config.load_policy().attempt_timeout, Duration::from_millis(750));

        let err = AppConfig::from_lookup(lookup(&[
            ("GOOGLE_MAPS_API_KEY", "KEY"),
            ("REQUEST_TIMEOUT_SECONDS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, PlannerError::InvalidConfigValueError { ref field, .. } if field == "REQUEST_TIMEOUT_SECONDS"));
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        let mut config = AppConfig::from_lookup(lookup(&[("GOOGLE_MAPS_API_KEY", "KEY")])).unwrap();
        config.supabase_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }
}
