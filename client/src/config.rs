use std::{path::PathBuf, sync::Arc};

use crate::{
    controller::{Controller, Pacing},
    gateway::{GatewayResult, HttpGateway},
    session::FileSessionStore,
};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_SESSION_FILE: &str = "session.json";

/// Where the client finds the gateway and keeps its session flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl ClientConfig {
    /// Read `EMPLOYEE_API_URL` and `EMPLOYEE_SESSION_FILE`, falling back to
    /// the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: std::env::var("EMPLOYEE_API_URL").unwrap_or(defaults.api_url),
            session_file: std::env::var("EMPLOYEE_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
        }
    }

    /// Controller wired to the HTTP gateway and the on-disk session file.
    pub fn controller(&self, pacing: Pacing) -> GatewayResult<Controller> {
        let gateway = HttpGateway::new(&self.api_url)?;
        Ok(Controller::new(
            Arc::new(gateway),
            Arc::new(FileSessionStore::new(&self.session_file)),
            pacing,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_gateway() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.session_file, PathBuf::from("session.json"));
    }

    #[test]
    fn invalid_api_url_is_rejected() {
        let config = ClientConfig {
            api_url: "::nope".into(),
            ..ClientConfig::default()
        };
        assert!(config.controller(Pacing::default()).is_err());
    }
}
