//! Generator configuration

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{FormError, FormResult};

/// Forminator entry meta table, with the default WordPress prefix.
pub const DEFAULT_TABLE_NAME: &str = "wp_frmt_form_entry_meta";

/// Amount written to `calculation-1` when a t-shirt is ordered.
pub const T_SHIRT_FEE: &str = "20";

/// Amount written to `calculation-1` without a t-shirt.
pub const NO_FEE: &str = "0";

/// Status recorded in the `stripe-ocs-1` payment array.
pub const PAYMENT_STATUS: &str = "completed";

/// Currency used when a submission does not name one.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Fixed `date_updated` value for freshly inserted rows.
pub const DATE_UPDATED_SENTINEL: &str = "0000-00-00 00:00:00";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "forminator.toml";

/// Generator settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Target table for the INSERT statements
    pub table_name: String,

    /// Fee literal written to `calculation-1` for t-shirt orders
    pub t_shirt_fee: String,

    /// Status written into the payment array
    pub payment_status: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            t_shirt_fee: T_SHIRT_FEE.to_string(),
            payment_status: PAYMENT_STATUS.to_string(),
        }
    }
}

impl Settings {
    /// Create a new settings builder
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Parse settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml(content: &str) -> FormResult<Self> {
        toml::from_str(content).map_err(|e| FormError::Config(e.to_string()))
    }

    /// Load settings.
    ///
    /// An explicit path must exist. Otherwise `./forminator.toml` and then
    /// `<config dir>/forminator-sql/config.toml` are tried, falling back to
    /// defaults when neither exists.
    pub fn load(explicit: Option<&Path>) -> FormResult<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(FormError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Self::read(path);
        }

        match Self::discover() {
            Some(path) => Self::read(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn read(path: &Path) -> FormResult<Self> {
        tracing::debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| FormError::Config(format!("{}: {}", path.display(), e)))
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("forminator-sql").join("config.toml"))
            .filter(|path| path.exists())
    }
}

/// Builder for Settings
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    /// Set the target table
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.settings.table_name = name.into();
        self
    }

    /// Set the t-shirt fee literal
    pub fn t_shirt_fee(mut self, fee: impl Into<String>) -> Self {
        self.settings.t_shirt_fee = fee.into();
        self
    }

    /// Set the payment status
    pub fn payment_status(mut self, status: impl Into<String>) -> Self {
        self.settings.payment_status = status.into();
        self
    }

    /// Build the settings
    pub fn build(self) -> Settings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.table_name, "wp_frmt_form_entry_meta");
        assert_eq!(settings.t_shirt_fee, "20");
        assert_eq!(settings.payment_status, "completed");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml("table_name = \"wp2_frmt_form_entry_meta\"").unwrap();
        assert_eq!(settings.table_name, "wp2_frmt_form_entry_meta");
        assert_eq!(settings.t_shirt_fee, T_SHIRT_FEE);
    }

    #[test]
    fn test_bad_toml() {
        let err = Settings::from_toml("t_shirt_fee = [").unwrap_err();
        assert!(matches!(err, FormError::Config(_)));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Settings::load(Some(Path::new("/nonexistent/forminator.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn test_builder() {
        let settings = Settings::builder().table("x_meta").t_shirt_fee("25").build();
        assert_eq!(settings.table_name, "x_meta");
        assert_eq!(settings.t_shirt_fee, "25");
        assert_eq!(settings.payment_status, PAYMENT_STATUS);
    }
}
