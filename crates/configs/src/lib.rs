use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How unreadable backing files are treated on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadMode {
    /// Missing, empty or unparsable files read as an empty list.
    #[default]
    Lenient,
    /// Missing or empty files read as empty; unparsable content is an error.
    Strict,
}

/// How the whole list is written back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Overwrite the file directly. A crash mid-write can truncate it.
    #[default]
    InPlace,
    /// Write a sibling `.tmp` file, then rename it over the target.
    Atomic,
}

/// Backing file location and I/O behaviour of the product store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
    #[serde(default)]
    pub read_mode: ReadMode,
    #[serde(default)]
    pub write_mode: WriteMode,
    #[serde(default)]
    pub serialize_writes: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            read_mode: ReadMode::default(),
            write_mode: WriteMode::default(),
            serialize_writes: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `compact` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_store_path() -> String { "data/products.json".into() }
fn default_log_format() -> String { "compact".into() }

pub const LOG_FORMATS: [&str; 2] = ["compact", "json"];

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

pub fn from_toml_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `CONFIG_PATH` (or `config.toml`); a missing file means defaults.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.store.normalize_from_env();
        self.store.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl StoreConfig {
    /// `PRODUCTS_PATH` takes precedence over the file.
    pub fn normalize_from_env(&mut self) {
        if let Ok(path) = std::env::var("PRODUCTS_PATH") {
            if !path.trim().is_empty() {
                self.path = path;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(anyhow!("store.path is empty; set it in config.toml or PRODUCTS_PATH"));
        }
        Ok(())
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<()> {
        if !LOG_FORMATS.contains(&self.format.as_str()) {
            return Err(anyhow!("logging.format must be one of {:?}, got {:?}", LOG_FORMATS, self.format));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = from_toml_str("").unwrap();
        assert_eq!(cfg.store.path, "data/products.json");
        assert_eq!(cfg.store.read_mode, ReadMode::Lenient);
        assert_eq!(cfg.store.write_mode, WriteMode::InPlace);
        assert!(!cfg.store.serialize_writes);
        assert_eq!(cfg.logging.format, "compact");
    }

    #[test]
    fn parses_store_section() {
        let cfg = from_toml_str(
            r#"
            [store]
            path = "/tmp/catalog.json"
            read_mode = "strict"
            write_mode = "atomic"
            serialize_writes = true

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.store.path, "/tmp/catalog.json");
        assert_eq!(cfg.store.read_mode, ReadMode::Strict);
        assert_eq!(cfg.store.write_mode, WriteMode::Atomic);
        assert!(cfg.store.serialize_writes);
        assert!(cfg.store.validate().is_ok());
        assert!(cfg.logging.validate().is_ok());
    }

    #[test]
    fn rejects_unknown_modes_and_empty_path() {
        assert!(from_toml_str("[store]\nwrite_mode = \"journaled\"").is_err());
        assert!(from_toml_str("[store]\nread_mode = \"Strict\"").is_err());

        let store = StoreConfig { path: "  ".into(), ..StoreConfig::default() };
        assert!(store.validate().is_err());

        let logging = LoggingConfig { format: "xml".into() };
        assert!(logging.validate().is_err());
    }
}
