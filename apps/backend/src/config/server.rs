use crate::error::AppError;

/// Listen address for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `BACKEND_HOST` (default `0.0.0.0`) and `BACKEND_PORT` (default `3001`).
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("BACKEND_PORT") {
            None => 3001,
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::config(format!("BACKEND_PORT must be a valid port number, got '{raw}'")))?,
        };
        Ok(Self { host, port })
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn defaults_apply() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3001);
    }

    #[test]
    fn bad_port_is_rejected() {
        let result = ServerConfig::from_lookup(|name| {
            (name == "BACKEND_PORT").then(|| "70000".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn reads_the_process_environment() {
        std::env::set_var("BACKEND_HOST", "127.0.0.1");
        std::env::set_var("BACKEND_PORT", "8088");
        let config = ServerConfig::from_env();
        std::env::remove_var("BACKEND_HOST");
        std::env::remove_var("BACKEND_PORT");

        let config = config.unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8088);
    }
}
