use std::net::{IpAddr, SocketAddr};

/// Stub server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StubConfig {
    /// Bind address (default: `127.0.0.1`).
    pub host: IpAddr,
    /// Bind port (default: `3000`).
    pub port: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum StubConfigError {
    #[error("HOST must be an IP address, got '{0}'")]
    Host(String),
    #[error("PORT must be a valid u16, got '{0}'")]
    Port(String),
}

impl StubConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var | Default     |
    /// |---------|-------------|
    /// | `HOST`  | `127.0.0.1` |
    /// | `PORT`  | `3000`      |
    pub fn from_env() -> Result<Self, StubConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StubConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let host = host.parse().map_err(|_| StubConfigError::Host(host))?;

        let port = lookup("PORT").unwrap_or_else(|| "3000".into());
        let port = port.parse().map_err(|_| StubConfigError::Port(port))?;

        Ok(Self { host, port })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = StubConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn rejects_bad_port() {
        let err = StubConfig::from_lookup(|key| (key == "PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert!(matches!(err, StubConfigError::Port(p) if p == "http"));
    }
}
