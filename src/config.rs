//! Configuration types.

use std::str::FromStr;

use crate::error::ConfigError;

/// Which auth provider the app runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Null provider: signed in, email verified, no social display name.
    Disabled,
    /// Settable in-process provider for development.
    Simulated,
}

impl Default for AuthMode {
    fn default() -> Self {
        Self::Disabled
    }
}

impl FromStr for AuthMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disabled" => Ok(Self::Disabled),
            "simulated" => Ok(Self::Simulated),
            other => Err(ConfigError::InvalidValue {
                key: "WALLETWISE_AUTH".to_string(),
                message: format!("unknown auth mode {other:?}, expected disabled or simulated"),
            }),
        }
    }
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Disabled => "disabled",
            Self::Simulated => "simulated",
        };
        write!(f, "{s}")
    }
}

/// App configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database path. `":memory:"` selects the in-memory libSQL backend.
    pub db_path: String,
    /// Port the REST surface listens on.
    pub listen_port: u16,
    /// Auth provider selection.
    pub auth_mode: AuthMode,
    /// Remote profile sync endpoint. Unset disables the push entirely.
    pub sync_endpoint: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: "./data/walletwise.db".to_string(),
            listen_port: 8090,
            auth_mode: AuthMode::default(),
            sync_endpoint: None,
        }
    }
}

impl AppConfig {
    /// Read configuration from `WALLETWISE_*` environment variables.
    ///
    /// Unset variables fall back to defaults. Set-but-unparseable values
    /// are errors, not fallbacks: a typo in the auth mode must not launch
    /// the app with a different provider than the operator asked for.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let db_path = std::env::var("WALLETWISE_DB_PATH").unwrap_or(defaults.db_path);

        let listen_port = match std::env::var("WALLETWISE_PORT") {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "WALLETWISE_PORT".to_string(),
                message: format!("{raw:?} is not a port number"),
            })?,
            Err(_) => defaults.listen_port,
        };

        let auth_mode = match std::env::var("WALLETWISE_AUTH") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.auth_mode,
        };

        let sync_endpoint = std::env::var("WALLETWISE_SYNC_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Self {
            db_path,
            listen_port,
            auth_mode,
            sync_endpoint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_mode_parses_known_values() {
        assert_eq!("disabled".parse::<AuthMode>().unwrap(), AuthMode::Disabled);
        assert_eq!(
            " Simulated ".parse::<AuthMode>().unwrap(),
            AuthMode::Simulated
        );
        assert!("firebase".parse::<AuthMode>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for mode in [AuthMode::Disabled, AuthMode::Simulated] {
            assert_eq!(mode.to_string().parse::<AuthMode>().unwrap(), mode);
        }
    }

    #[test]
    fn defaults_describe_a_local_run() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, "./data/walletwise.db");
        assert_eq!(config.listen_port, 8090);
        assert_eq!(config.auth_mode, AuthMode::Disabled);
        assert!(config.sync_endpoint.is_none());
    }
}
