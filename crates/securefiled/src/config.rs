//! Daemon configuration
//!
//! Layered in order: built-in defaults, an optional TOML file, then
//! command-line flags (each of which may also come from a `SECUREFILE_*`
//! environment variable).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use securefile_core::UploadConfig;
use serde::Deserialize;

/// Default listen port
pub const DEFAULT_PORT: u16 = 5000;

/// Default anti-forgery token lifetime in seconds
pub const DEFAULT_CSRF_TIME_LIMIT_SECS: u64 = 3600;

/// Command-line arguments
#[derive(Debug, Default, Parser)]
#[command(name = "securefiled")]
#[command(author, version, about = "SecureFile server daemon", long_about = None)]
pub struct Args {
    /// Config file (TOML)
    #[arg(short, long, env = "SECUREFILE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "SECUREFILE_HOST")]
    pub host: Option<IpAddr>,

    /// Port to listen on
    #[arg(short, long, env = "SECUREFILE_PORT")]
    pub port: Option<u16>,

    /// Directory uploaded files are written into
    #[arg(long, env = "SECUREFILE_UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Maximum request body size in bytes
    #[arg(long, env = "SECUREFILE_MAX_CONTENT_LENGTH")]
    pub max_content_length: Option<u64>,

    /// Allowed extensions, comma separated (e.g. "txt,pdf,png")
    #[arg(long, env = "SECUREFILE_ALLOWED_EXTENSIONS", value_delimiter = ',')]
    pub allowed_extensions: Option<Vec<String>>,

    /// Secret key used to sign anti-forgery tokens
    #[arg(long, env = "SECUREFILE_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Anti-forgery token lifetime in seconds
    #[arg(long, env = "SECUREFILE_CSRF_TIME_LIMIT")]
    pub csrf_time_limit_secs: Option<u64>,

    /// Mark the session cookie Secure (when served behind TLS)
    #[arg(long, env = "SECUREFILE_SECURE_COOKIES")]
    pub secure_cookies: bool,
}

/// `[server]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

/// `[security]` table
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    pub secret_key: Option<String>,
    pub csrf_time_limit_secs: u64,
    pub secure_cookies: bool,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            secret_key: None,
            csrf_time_limit_secs: DEFAULT_CSRF_TIME_LIMIT_SECS,
            secure_cookies: false,
        }
    }
}

// Keeps the secret out of logs
impl std::fmt::Debug for SecuritySection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecuritySection")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("csrf_time_limit_secs", &self.csrf_time_limit_secs)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

/// Full daemon configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub upload: UploadConfig,
    pub security: SecuritySection,
}

impl ServerConfig {
    /// Parse a TOML document
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Invalid config file")
    }

    /// Read and parse a TOML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to load config file {}", path.display()))
    }

    /// Build the effective configuration from the arguments
    pub fn load(args: &Args) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading config");
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_args(args);
        Ok(config)
    }

    /// Override file values with anything given on the command line or in the environment
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(host) = args.host {
            self.server.host = host;
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(dir) = &args.upload_dir {
            self.upload.upload_dir = dir.clone();
        }
        if let Some(max) = args.max_content_length {
            self.upload.max_content_length = max;
        }
        if let Some(extensions) = &args.allowed_extensions {
            self.upload = std::mem::take(&mut self.upload).with_allowed_extensions(extensions);
        }
        if let Some(secret) = &args.secret_key {
            self.security.secret_key = Some(secret.clone());
        }
        if let Some(secs) = args.csrf_time_limit_secs {
            self.security.csrf_time_limit_secs = secs;
        }
        if args.secure_cookies {
            self.security.secure_cookies = true;
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    pub fn csrf_time_limit(&self) -> Duration {
        Duration::from_secs(self.security.csrf_time_limit_secs)
    }

    /// The configured secret key, or `None` when one must be generated
    pub fn secret_key(&self) -> Option<&str> {
        self.security
            .secret_key
            .as_deref()
            .filter(|key| !key.is_empty())
    }
}

/// A random per-process secret; tokens do not survive a restart
pub fn generate_secret() -> String {
    format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple())
}
