//! Server configuration.

use std::env;

use crate::server::error::Error;

/// Environment variable overriding the bind host.
pub const HOST_VAR: &str = "HOST";
/// Environment variable overriding the bind port.
pub const PORT_VAR: &str = "PORT";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host name or IP address to bind to.
    pub host: String,
    /// TCP port to bind to.
    pub port: u16,
    /// The maximum number of concurrent connections.
    pub max_connections: usize,
    /// The read buffer size.
    pub read_buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_connections: 1024,
            read_buffer_size: 8192,
        }
    }
}

impl ServerConfig {
    /// Build a configuration from `HOST` and `PORT`, falling back to
    /// `localhost:8080`.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(host) = read(HOST_VAR) {
            config.host = host.trim().to_string();
        }

        if let Some(port) = read(PORT_VAR) {
            config.port = parse_port(&port)?;
        }

        Ok(config)
    }

    /// The `host:port` string the listener binds to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_port(value: &str) -> Result<u16, Error> {
    let invalid = |reason: &str| Error::InvalidConfig {
        var: PORT_VAR.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    match value.trim().parse::<u16>() {
        Ok(0) => Err(invalid("port must not be 0")),
        Ok(port) => Ok(port),
        Err(_) => Err(invalid("expected an integer between 1 and 65535")),
    }
}
