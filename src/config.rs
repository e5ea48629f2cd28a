use std::env;

use serde::{Deserialize, Serialize};

const DEFAULT_LISTEN: &str = "127.0.0.1:5001";
const DEFAULT_COOKIE_PATH: &str = "/";

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

fn default_cookie_path() -> String {
    DEFAULT_COOKIE_PATH.to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Path cookies are set and removed at.
    #[serde(default = "default_cookie_path")]
    pub cookie_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen: default_listen(),
            cookie_path: default_cookie_path(),
        }
    }
}

impl ServerConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// `SERVER_CONFIG` holds the whole config as JSON. Without it,
    /// `LISTEN_ADDR` and `COOKIE_PATH` are read on their own.
    pub fn from_env() -> anyhow::Result<Self> {
        if let Ok(val) = env::var("SERVER_CONFIG") {
            return Self::from_json(&val);
        }
        Ok(ServerConfig {
            listen: env::var("LISTEN_ADDR").unwrap_or_else(|_| default_listen()),
            cookie_path: env::var("COOKIE_PATH").unwrap_or_else(|_| default_cookie_path()),
        })
    }
}
