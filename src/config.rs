//! Configuration for credential and challenge issuance.
//!
//! Only the randomized issuance steps are configurable: the scrypt cost used for
//! new credentials and the sizes of fresh salts and nonces. Proof generation and
//! verification always follow the parameters carried by the challenge.

use serde::{Deserialize, Serialize};

use crate::primitives::ScryptParams;
use crate::protocol::gadgets::{MAX_NONCE_BYTES, MAX_SALT_BYTES, MIN_NONCE_BYTES, MIN_SALT_BYTES};
use crate::{Error, Result};

/// Issuance configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnizkConfig {
    /// scrypt cost for newly issued credentials.
    pub scrypt: ScryptParams,
    /// Salt size in bytes for newly issued credentials.
    pub salt_length: usize,
    /// Nonce size in bytes for new challenges.
    pub nonce_length: usize,
}

impl Default for KnizkConfig {
    fn default() -> Self {
        Self {
            scrypt: ScryptParams::default(),
            salt_length: 32,
            nonce_length: 32,
        }
    }
}

impl KnizkConfig {
    /// Loads configuration from `.env` file, TOML file, and environment variables.
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables with `KNIZK_` prefix; nested keys use `__`
    ///    (e.g., `KNIZK_SCRYPT__N=16384`, `KNIZK_NONCE_LENGTH=48`)
    /// 2. TOML configuration file (if exists)
    /// 3. `.env` file (if exists)
    /// 4. Built-in defaults
    ///
    /// The TOML file path can be set via `KNIZK_CONFIG_PATH`. If not set, defaults
    /// to `./config/knizk.toml`. A missing file is silently skipped.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if the configuration is malformed or
    /// contains invalid values.
    #[cfg(feature = "config")]
    pub fn from_env() -> Result<Self> {
        use figment::Figment;
        use figment::providers::{Env, Format, Serialized, Toml};

        // Attempt to load .env file (silently ignore if it doesn't exist)
        let _ = dotenvy::dotenv();

        let config_path = std::env::var("KNIZK_CONFIG_PATH")
            .unwrap_or_else(|_| "config/knizk.toml".to_string());

        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("KNIZK_").split("__"))
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;

        config.validate()?;
        tracing::debug!(path = %config_path, "loaded knizk configuration");
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] naming the first invalid value.
    pub fn validate(&self) -> Result<()> {
        self.scrypt
            .validate()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;

        if !(MIN_SALT_BYTES..=MAX_SALT_BYTES).contains(&self.salt_length) {
            return Err(Error::InvalidConfig(format!(
                "salt_length must be in [{MIN_SALT_BYTES}, {MAX_SALT_BYTES}], got {}",
                self.salt_length
            )));
        }

        if !(MIN_NONCE_BYTES..=MAX_NONCE_BYTES).contains(&self.nonce_length) {
            return Err(Error::InvalidConfig(format!(
                "nonce_length must be in [{MIN_NONCE_BYTES}, {MAX_NONCE_BYTES}], got {}",
                self.nonce_length
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = KnizkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scrypt.n, 32_768);
        assert_eq!(config.salt_length, 32);
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut config = KnizkConfig::default();
        config.salt_length = 4;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = KnizkConfig::default();
        config.nonce_length = 128;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = KnizkConfig::default();
        config.scrypt.n = 3;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[cfg(feature = "config")]
    #[test]
    fn from_env_merges_file_and_environment() {
        figment::Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/knizk.toml",
                r#"
                    salt_length = 48

                    [scrypt]
                    n = 1024
                "#,
            )?;
            jail.set_env("KNIZK_NONCE_LENGTH", "24");
            jail.set_env("KNIZK_SCRYPT__R", "4");

            let config = KnizkConfig::from_env().map_err(|e| e.to_string())?;
            assert_eq!(config.salt_length, 48);
            assert_eq!(config.nonce_length, 24);
            assert_eq!(config.scrypt.n, 1024);
            assert_eq!(config.scrypt.r, 4);
            assert_eq!(config.scrypt.p, ScryptParams::DEFAULT_P);
            Ok(())
        });
    }

    #[cfg(feature = "config")]
    #[test]
    fn from_env_rejects_invalid_values() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("KNIZK_SALT_LENGTH", "2");
            assert!(matches!(
                KnizkConfig::from_env(),
                Err(Error::InvalidConfig(_))
            ));
            Ok(())
        });
    }
}
