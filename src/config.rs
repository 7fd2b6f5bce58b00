use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CAPACITY: usize = 4096;

/// Largest window the tool will allocate (1 GiB).
pub const MAX_CAPACITY: usize = 1 << 30;

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WindowConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { capacity: DEFAULT_CAPACITY }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Raw,
    Hex,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

/// Checks a window capacity against `1..=MAX_CAPACITY`.
pub fn validate_capacity(capacity: usize) -> Result<(), String> {
    if capacity == 0 || capacity > MAX_CAPACITY {
        return Err(format!(
            "Window capacity {} out of range: must be between 1 and {}",
            capacity, MAX_CAPACITY
        ));
    }
    Ok(())
}

/// Default config location: per-user first, then system-wide.
pub fn default_config_path() -> String {
    if let Ok(home) = std::env::var("HOME") {
        format!("{}/.config/swindow/config.toml", home)
    } else {
        "/etc/swindow/config.toml".to_string()
    }
}

pub fn load_config(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    if !Path::new(path).exists() {
        return Err(format!("Config file not found: {}", path).into());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {}", path, e))?;

    let cfg = parse_config(&content)
        .map_err(|e| format!("Invalid config {}: {}", path, e))?;

    log::info!("Config loaded from: {}", path);
    log::info!("Window capacity: {} bytes", cfg.window.capacity);

    Ok(cfg)
}

/// Parses and validates a TOML document.
pub fn parse_config(content: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let cfg: Config = toml::from_str(content)
        .map_err(|e| format!("Failed to parse TOML: {}", e))?;

    validate_capacity(cfg.window.capacity)?;

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.window.capacity, DEFAULT_CAPACITY);
        assert_eq!(cfg.output.format, OutputFormat::Raw);
    }

    #[test]
    fn test_full_config() {
        let cfg = parse_config(
            r#"
            [window]
            capacity = 16

            [output]
            format = "hex"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.window.capacity, 16);
        assert_eq!(cfg.output.format, OutputFormat::Hex);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = parse_config("[window]\ncapacity = 0\n").unwrap_err();
        assert!(err.to_string().contains("capacity"));
    }

    #[test]
    fn test_capacity_ceiling() {
        let at_max = format!("[window]\ncapacity = {}\n", MAX_CAPACITY);
        assert_eq!(parse_config(&at_max).unwrap().window.capacity, MAX_CAPACITY);

        let over = format!("[window]\ncapacity = {}\n", MAX_CAPACITY + 1);
        let err = parse_config(&over).unwrap_err();
        assert!(err.to_string().contains("out of range"));

        assert!(validate_capacity(usize::MAX).is_err());
        assert!(validate_capacity(1).is_ok());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let err = parse_config("[output]\nformat = \"base64\"\n").unwrap_err();
        assert!(err.to_string().contains("base64"));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(parse_config("[windw]\ncapacity = 16\n").is_err());
        assert!(parse_config("[window]\ncapacty = 16\n").is_err());
        assert!(parse_config("[output]\nformt = \"hex\"\n").is_err());
    }

    #[test]
    fn test_bad_toml_rejected() {
        assert!(parse_config("[window\ncapacity = 1").is_err());
        assert!(parse_config("[window]\ncapacity = -3\n").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("/nonexistent/swindow/config.toml").unwrap_err();
        assert!(err.to_string().starts_with("Config file not found"));
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("swindow-config-{}.toml", std::process::id()));
        fs::write(&path, "[window]\ncapacity = 32\n").unwrap();
        let cfg = load_config(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(cfg.window.capacity, 32);
    }
}
