//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SluiceConfig;
use crate::domain::errors::SluiceError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into SluiceConfig
/// 4. Applies environment variable overrides (`SLUICE_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use sluice::config::loader::load_config;
///
/// let config = load_config("sluice.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SluiceConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SluiceError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SluiceError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: SluiceConfig = toml::from_str(&contents)
        .map_err(|e| SluiceError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        SluiceError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SluiceError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `SLUICE_*` prefix
///
/// Environment variables follow the pattern: `SLUICE_<SECTION>_<KEY>`,
/// e.g. `SLUICE_SOURCE_INSTANCE`, `SLUICE_EXPORT_MAX_BATCHES`.
fn apply_env_overrides(config: &mut SluiceConfig) {
    if let Ok(val) = std::env::var("SLUICE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("SLUICE_SOURCE_INSTANCE") {
        config.source.instance = val;
    }
    if let Ok(val) = std::env::var("SLUICE_SOURCE_DATABASE") {
        config.source.database = val;
    }
    if let Ok(val) = std::env::var("SLUICE_SOURCE_ADMIN_API_BASE_URL") {
        config.source.admin_api_base_url = val;
    }

    if let Ok(val) = std::env::var("SLUICE_EXPORT_BUCKET") {
        config.export.bucket = val;
    }
    if let Ok(val) = std::env::var("SLUICE_EXPORT_MAX_EXEC_TIME") {
        if let Ok(seconds) = val.parse() {
            config.export.max_exec_time_seconds = seconds;
        }
    }
    if let Ok(val) = std::env::var("SLUICE_EXPORT_MAX_BATCHES") {
        if let Ok(n) = val.parse() {
            config.export.max_batches = n;
        }
    }
    if let Ok(val) = std::env::var("SLUICE_EXPORT_TABLES_LIST_TOPIC") {
        config.export.tables_list_topic = val;
    }
    if let Ok(val) = std::env::var("SLUICE_EXPORT_SEED_QUERY") {
        config.export.seed_query = val;
    }

    if let Ok(val) = std::env::var("SLUICE_QUEUE_API_BASE_URL") {
        config.queue.api_base_url = val;
    }
    if let Ok(val) = std::env::var("SLUICE_STORAGE_API_BASE_URL") {
        config.storage.api_base_url = val;
    }
    if let Ok(val) = std::env::var("SLUICE_WAREHOUSE_API_BASE_URL") {
        config.warehouse.api_base_url = val;
    }
    if let Ok(val) = std::env::var("SLUICE_WAREHOUSE_DATASET") {
        config.warehouse.dataset = val;
    }
    if let Ok(val) = std::env::var("SLUICE_SECRETS_API_BASE_URL") {
        config.secrets.api_base_url = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_known_var() {
        std::env::set_var("SLUICE_TEST_SUB_VAR", "replaced");
        let out = substitute_env_vars("value = \"${SLUICE_TEST_SUB_VAR}\"").unwrap();
        assert!(out.contains("replaced"));
        std::env::remove_var("SLUICE_TEST_SUB_VAR");
    }

    #[test]
    fn test_substitute_missing_var_fails() {
        let err = substitute_env_vars("value = \"${SLUICE_TEST_DEFINITELY_MISSING}\"").unwrap_err();
        assert!(err
            .to_string()
            .contains("SLUICE_TEST_DEFINITELY_MISSING"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let out = substitute_env_vars("# ${SLUICE_TEST_IN_COMMENT}\nvalue = 1").unwrap();
        assert!(out.contains("${SLUICE_TEST_IN_COMMENT}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, SluiceError::Configuration(_)));
    }
}
