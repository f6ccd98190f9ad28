use crate::config::AppConfig;
use crate::i18n::Language;
use crate::utils::error::{PlannerError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub supabase: Option<SupabaseSection>,
    pub google_maps: GoogleMapsSection,
    pub app: Option<AppSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseSection {
    pub url: String,
    pub anon_key: String,
    pub request_timeout_seconds: Option<u64>,
    pub session_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleMapsSection {
    pub api_key: String,
    pub base_url: Option<String>,
    pub photo_load_retries: Option<u32>,
    pub photo_load_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSection {
    pub default_language: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses the file after replacing `${VAR}` with the environment value.
    /// Unset variables are left as written.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| PlannerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn into_app_config(self) -> Result<AppConfig> {
        let google_maps_api_key = self.google_maps.api_key.trim().to_string();
        if google_maps_api_key.is_empty() || ENV_VAR.is_match(&google_maps_api_key) {
            return Err(PlannerError::MissingConfigError {
                field: "google_maps.api_key".to_string(),
            });
        }

        let (supabase_url, supabase_anon_key, timeout, session_file) = match self.supabase {
            Some(s) => (s.url, s.anon_key, s.request_timeout_seconds, s.session_file),
            None => (String::new(), String::new(), None, None),
        };

        let default_language = match self.app.and_then(|a| a.default_language) {
            Some(code) => code
                .parse::<Language>()
                .map_err(|reason| PlannerError::InvalidConfigValueError {
                    field: "app.default_language".to_string(),
                    value: code.clone(),
                    reason,
                })?,
            None => Language::default(),
        };

        let defaults = AppConfig::from_lookup(|name| {
            (name == "GOOGLE_MAPS_API_KEY").then(|| google_maps_api_key.clone())
        })?;

        Ok(AppConfig {
            supabase_url,
            supabase_anon_key,
            request_timeout_seconds: timeout.unwrap_or(defaults.request_timeout_seconds),
            photo_load_retries: self
                .google_maps
                .photo_load_retries
                .unwrap_or(defaults.photo_load_retries),
            photo_load_timeout_ms: self
                .google_maps
                .photo_load_timeout_ms
                .unwrap_or(defaults.photo_load_timeout_ms),
            google_maps_base_url: self
                .google_maps
                .base_url
                .unwrap_or(defaults.google_maps_base_url.clone()),
            default_language,
            session_file,
            ..defaults
        })
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        TomlConfig::from_file(path)?.into_app_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[supabase]
url = "https://abc.supabase.co"
anon_key = "anon"
request_timeout_seconds = 10

[google_maps]
api_key = "KEY"
photo_load_retries = 3

[app]
default_language = "en"
"#;

        let config = TomlConfig::from_toml_str(toml_content)
            .unwrap()
            .into_app_config()
            .unwrap();

        assert_eq!(config.supabase_url, "https://abc.supabase.co");
        assert_eq!(config.request_timeout_seconds, 10);
        assert_eq!(config.photo_load_retries, 3);
        assert_eq!(config.default_language, Language::En);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("WEDDING_PLANNER_TEST_ANON_KEY", "from-env");

        let toml_content = r#"
[supabase]
url = "https://abc.supabase.co"
anon_key = "${WEDDING_PLANNER_TEST_ANON_KEY}"

[google_maps]
api_key = "KEY"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.supabase.unwrap().anon_key, "from-env");

        std::env::remove_var("WEDDING_PLANNER_TEST_ANON_KEY");
    }

    #[test]
    fn test_unresolved_api_key_is_missing() {
        let toml_content = r#"
[google_maps]
api_key = "${WEDDING_PLANNER_TEST_UNSET_KEY}"
"#;
        let err = TomlConfig::from_toml_str(toml_content)
            .unwrap()
            .into_app_config()
            .unwrap_err();
        assert!(matches!(err, PlannerError::MissingConfigError { .. }));
    }

    #[test]
    fn test_bad_language_is_rejected() {
        let toml_content = r#"
[google_maps]
api_key = "KEY"

[app]
default_language = "de"
"#;
        let err = TomlConfig::from_toml_str(toml_content)
            .unwrap()
            .into_app_config()
            .unwrap_err();
        assert!(matches!(err, PlannerError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[google_maps]\napi_key = \"KEY\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.google_maps_api_key, "KEY");
        assert!(config.supabase_url.is_empty());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            TomlConfig::from_toml_str("[google_maps\n").unwrap_err(),
            PlannerError::ConfigError { .. }
        ));
    }
}
