use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub space: SpaceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
    /// Directory the published reverse-search images are written to and
    /// served from.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
    /// When set, published images older than this many hours are deleted by
    /// a background sweep. Unset means files are kept forever.
    #[serde(default)]
    pub retention_hours: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceConfig {
    /// Base URL of the hosted IDM-VTON Space.
    #[serde(default = "default_space_url")]
    pub base_url: String,
    /// Auth token for duplicated/private Spaces.
    #[serde(default)]
    pub hf_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
            public_dir: default_public_dir(),
            retention_hours: None,
        }
    }
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            base_url: default_space_url(),
            hf_token: None,
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_public_dir() -> String {
    "public/reverse".to_string()
}

fn default_space_url() -> String {
    "https://yisol-idm-vton.hf.space".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
