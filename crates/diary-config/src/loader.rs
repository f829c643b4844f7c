//! Configuration loader.

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::DiaryConfig;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<DiaryConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<DiaryConfig, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: DiaryConfig = toml::from_str(&expanded)?;
        config.schedule.path = Self::expand_path(&config.schedule.path.to_string_lossy()).into();
        config.logging.dir = Self::expand_path(&config.logging.dir.to_string_lossy()).into();
        Ok(config)
    }

    /// Expand `${VAR}` and `${VAR:-default}`.
    ///
    /// A bare `${VAR}` must be set; the `:-` form falls back to its default
    /// when the variable is unset or empty. Values substituted inside a
    /// double-quoted string are escaped so they parse back unchanged.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]*))?\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        let mut result = String::with_capacity(content.len());
        let mut last = 0;

        for cap in re.captures_iter(content) {
            let Some(whole) = cap.get(0) else { continue };
            let var_name = &cap[1];
            let fallback = cap.get(3).map(|m| m.as_str());

            let value = match (std::env::var(var_name), fallback) {
                (Ok(v), Some(default)) if v.is_empty() => default.to_string(),
                (Ok(v), _) if in_basic_string(content, whole.start()) => escape_basic(&v),
                (Ok(v), _) => v,
                (Err(_), Some(default)) => default.to_string(),
                (Err(_), None) => return Err(ConfigError::EnvVarNotSet(var_name.to_string())),
            };

            result.push_str(&content[last..whole.start()]);
            result.push_str(&value);
            last = whole.end();
        }
        result.push_str(&content[last..]);

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/diary/log`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

/// Whether `pos` sits inside a `"..."` string on its line.
fn in_basic_string(content: &str, pos: usize) -> bool {
    let line_start = content[..pos].rfind('\n').map_or(0, |i| i + 1);
    let mut inside = false;
    let mut escaped = false;
    for c in content[line_start..pos].chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if inside => escaped = true,
            '"' => inside = !inside,
            '#' if !inside => return false,
            _ => {}
        }
    }
    inside
}

/// Escape `value` for a TOML basic string.
fn escape_basic(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.diary.interval_days, 7);
        assert_eq!(config.browser.endpoint, "http://localhost:9222");
    }

    #[test]
    fn test_load_diary_section() {
        let content = r#"
            [diary]
            start_date = "2022-03-07"
            end_date = "2022-06-30"
            interval_days = 14
            crop = "감자"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.diary.start_date.to_string(), "2022-03-07");
        assert_eq!(config.diary.end_date.to_string(), "2022-06-30");
        assert_eq!(config.diary.interval_days, 14);
        assert_eq!(config.diary.crop, "감자");
    }

    #[test]
    fn test_load_pacing_ranges() {
        let content = r#"
            [pacing]
            input = { min_ms = 10, max_ms = 20 }
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.pacing.input.min_ms, 10);
        assert_eq!(config.pacing.input.max_ms, 20);
        assert_eq!(config.pacing.select.min_ms, 500);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[generator]").unwrap();
        writeln!(file, "enabled = false").unwrap();
        writeln!(file, "model = \"gpt-4o\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert!(!config.generator.enabled);
        assert_eq!(config.generator.model, "gpt-4o");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_load_invalid_date() {
        let content = r#"
            [diary]
            start_date = "2021-13-40"
        "#;
        assert!(ConfigLoader::load_str(content).is_err());
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: test-only variable name, not read by any other test
        unsafe {
            std::env::set_var("DIARY_TEST_CONFIG_VAR", "test_value");
        }
        let content = "value = \"${DIARY_TEST_CONFIG_VAR}\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, "value = \"test_value\"");
        unsafe {
            std::env::remove_var("DIARY_TEST_CONFIG_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_DIARY_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(name)) if name == "NONEXISTENT_DIARY_VAR_12345"));
    }

    #[test]
    fn test_expand_env_vars_default() {
        let content = "enabled = ${NONEXISTENT_DIARY_FLAG_12345:-true}\nkey = \"${NONEXISTENT_DIARY_KEY_12345:-}\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, "enabled = true\nkey = \"\"");
    }

    #[test]
    fn test_expand_env_vars_empty_uses_default() {
        // SAFETY: test-only variable name, not read by any other test
        unsafe {
            std::env::set_var("DIARY_TEST_EMPTY_VAR", "");
        }
        let expanded = ConfigLoader::expand_env_vars("crop = \"${DIARY_TEST_EMPTY_VAR:-벼}\"").unwrap();
        assert_eq!(expanded, "crop = \"벼\"");
        unsafe {
            std::env::remove_var("DIARY_TEST_EMPTY_VAR");
        }
    }

    #[test]
    fn test_quoted_password_survives_expansion() {
        let password = "pa\"ss\\wo\trd";
        // SAFETY: test-only variable name, not read by any other test
        unsafe {
            std::env::set_var("DIARY_TEST_QUOTED_PASSWORD", password);
        }
        let content = "[account]\nusername = \"farmer\"\npassword = \"${DIARY_TEST_QUOTED_PASSWORD}\"\n";
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.account.password, password);
        unsafe {
            std::env::remove_var("DIARY_TEST_QUOTED_PASSWORD");
        }
    }

    #[test]
    fn test_unquoted_value_is_not_escaped() {
        // SAFETY: test-only variable name, not read by any other test
        unsafe {
            std::env::set_var("DIARY_TEST_BARE_ARRAY", "[\"a\", \"b\"]");
        }
        let expanded = ConfigLoader::expand_env_vars("tasks = ${DIARY_TEST_BARE_ARRAY}").unwrap();
        assert_eq!(expanded, "tasks = [\"a\", \"b\"]");
        unsafe {
            std::env::remove_var("DIARY_TEST_BARE_ARRAY");
        }
    }

    #[test]
    fn test_in_basic_string() {
        let line = "a = \"x ${V}\" # ${W}";
        assert!(in_basic_string(line, line.find("${V}").unwrap()));
        assert!(!in_basic_string(line, line.find("${W}").unwrap()));
        let escaped = "a = \"q\\\" ${V}\"";
        assert!(in_basic_string(escaped, escaped.find("${V}").unwrap()));
        assert!(!in_basic_string("b = ${V}", 4));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/log");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/log"));
    }
}
