use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u16(key: &str, default: u16) -> u16 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub templates: TemplatesConfig,
    pub metrics: MetricsConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            templates: TemplatesConfig::from_env(),
            metrics: MetricsConfig::from_env(),
        }
    }
}

// ── Sections ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: env_or("RULEGEN_HOST", "0.0.0.0"),
            port: env_u16("RULEGEN_PORT", 8080),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Directory holding seed schemas/templates, if seeding is enabled.
    pub seed_dir: Option<PathBuf>,
}

impl TemplatesConfig {
    fn from_env() -> Self {
        Self {
            seed_dir: env_opt("RULEGEN_SEED_DIR").map(PathBuf::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Per-call timeout for datasource queries, in seconds.
    pub timeout_secs: u64,
}

impl MetricsConfig {
    fn from_env() -> Self {
        Self {
            timeout_secs: env_u64("RULEGEN_METRICS_TIMEOUT_SECS", 10),
        }
    }
}
