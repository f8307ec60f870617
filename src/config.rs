//! # Key-value configuration management.

use std::str::FromStr;

use anyhow::{ensure, Result};
use strum::{EnumProperty, IntoEnumIterator};
use strum_macros::{AsRefStr, Display, EnumIter, EnumProperty, EnumString, IntoStaticStr};

use crate::context::Context;

/// The available configuration keys.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    EnumProperty,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Config {
    /// Read keys from the `Inbome` header of unsigned messages.
    #[strum(props(default = "1"))]
    InbomeEnabled,

    /// Read keys from the `OpenPGP` header of unsigned messages.
    ///
    /// The header is only consulted if the message has no `Inbome` header.
    #[strum(props(default = "1"))]
    OpenpgpHeaderEnabled,
}

impl Config {
    /// Returns the default value, if any.
    pub fn get_default(&self) -> Option<&'static str> {
        self.get_str("default")
    }
}

impl Context {
    /// Get a configuration key. Returns `None` if no value is set and no default exists.
    pub fn get_config(&self, key: Config) -> Option<String> {
        self.config
            .read()
            .get(&key)
            .cloned()
            .or_else(|| key.get_default().map(|s| s.to_string()))
    }

    /// Returns 32-bit signed integer configuration value for the given key.
    pub fn get_config_int(&self, key: Config) -> Result<i32> {
        let value = self.get_config(key).unwrap_or_default();
        Ok(i32::from_str(&value).unwrap_or_default())
    }

    /// Returns boolean configuration value for the given key.
    pub fn get_config_bool(&self, key: Config) -> bool {
        self.get_config_int(key).unwrap_or_default() != 0
    }

    /// Set the given config key.
    /// If `None` is passed as a value the value is cleared and set to the default if there is one.
    pub fn set_config(&self, key: Config, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => {
                ensure!(
                    i32::from_str(value).is_ok(),
                    "{key} expects an integer value, got {value:?}"
                );
                self.config.write().insert(key, value.to_string());
            }
            None => {
                self.config.write().remove(&key);
            }
        }
        Ok(())
    }

    /// Sets a configuration key given by its name, as used by embedding applications.
    pub fn set_config_from_str(&self, key: &str, value: Option<&str>) -> Result<()> {
        let key = Config::from_str(key).map_err(|_| anyhow::anyhow!("unknown config key {key:?}"))?;
        self.set_config(key, value)
    }

    /// Convenience function to set a boolean config key.
    pub fn set_config_bool(&self, key: Config, value: bool) -> Result<()> {
        self.set_config(key, Some(if value { "1" } else { "0" }))
    }

    /// Returns the effective value of every configuration key.
    pub(crate) fn get_all_configs(&self) -> Vec<(Config, String)> {
        Config::iter()
            .map(|key| (key, self.get_config(key).unwrap_or_default()))
            .collect()
    }
}
