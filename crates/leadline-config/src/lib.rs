use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use leadline_core::chat::{Brand, Catalog, DEFAULT_WHATSAPP_NUMBER};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const APP_DIR: &str = "leadline";
const CONFIG_FILENAME: &str = "config.toml";

pub const API_KEY_ENV: &str = "LEADLINE_API_KEY";
pub const DEFAULT_API_KEY: &str = "emp_lab_secret_2026";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000/api/leads/external";
pub const DEFAULT_TYPING_DELAY_MS: u64 = 1500;
pub const MAX_TYPING_DELAY_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub widget: WidgetConfig,
    /// Configured brands, layered over the built-in catalog.
    pub brands: Vec<Brand>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub endpoint: String,
    pub typing_delay_ms: u64,
    pub whatsapp_number: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
                api_key: DEFAULT_API_KEY.to_string(),
            },
            widget: WidgetConfig {
                endpoint: DEFAULT_ENDPOINT.to_string(),
                typing_delay_ms: DEFAULT_TYPING_DELAY_MS,
                whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            },
            brands: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn catalog(&self) -> Catalog {
        self.brands
            .iter()
            .cloned()
            .fold(Catalog::builtin(), Catalog::with_brand)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid bind address: {0}")]
    InvalidBind(String),
    #[error("api key cannot be empty")]
    EmptyApiKey,
    #[error("invalid widget endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("typing_delay_ms must be at most 10000: {0}")]
    InvalidTypingDelay(u64),
    #[error("whatsapp_number must contain only digits: {0}")]
    InvalidWhatsAppNumber(String),
    #[error("brand key cannot be empty")]
    EmptyBrandKey,
    #[error("duplicate brand key: {0}")]
    DuplicateBrand(String),
    #[error("brand {0} must list at least one product")]
    BrandWithoutProducts(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    server: Option<ServerFile>,
    widget: Option<WidgetFile>,
    #[serde(default)]
    brands: Vec<BrandFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerFile {
    bind: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct WidgetFile {
    endpoint: Option<String>,
    typing_delay_ms: Option<u64>,
    whatsapp_number: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BrandFile {
    key: String,
    name: String,
    #[serde(default)]
    products: Vec<String>,
    ask_interest: Option<String>,
}

/// Loads the config file (if any) and applies the `LEADLINE_API_KEY` override.
pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let config = load_file(config_path)?;
    apply_env_overrides(config, env::var(API_KEY_ENV).ok())
}

fn load_file(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn apply_env_overrides(mut config: AppConfig, api_key: Option<String>) -> Result<AppConfig> {
    if let Some(key) = api_key {
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        config.server.api_key = key.to_string();
    }
    Ok(config)
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(server) = parsed.server {
        if let Some(bind) = server.bind {
            config.server.bind = bind
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidBind(bind.clone()))?;
        }
        if let Some(api_key) = server.api_key {
            let api_key = api_key.trim();
            if api_key.is_empty() {
                return Err(ConfigError::EmptyApiKey);
            }
            config.server.api_key = api_key.to_string();
        }
    }

    if let Some(widget) = parsed.widget {
        if let Some(endpoint) = widget.endpoint {
            let endpoint = endpoint.trim();
            let valid = Url::parse(endpoint).is_ok_and(|url| {
                matches!(url.scheme(), "http" | "https") && url.host_str().is_some()
            });
            if !valid {
                return Err(ConfigError::InvalidEndpoint(endpoint.to_string()));
            }
            config.widget.endpoint = endpoint.to_string();
        }
        if let Some(delay) = widget.typing_delay_ms {
            if delay > MAX_TYPING_DELAY_MS {
                return Err(ConfigError::InvalidTypingDelay(delay));
            }
            config.widget.typing_delay_ms = delay;
        }
        if let Some(number) = widget.whatsapp_number {
            let number = number.trim();
            if number.is_empty() || !number.chars().all(|ch| ch.is_ascii_digit()) {
                return Err(ConfigError::InvalidWhatsAppNumber(number.to_string()));
            }
            config.widget.whatsapp_number = number.to_string();
        }
    }

    for brand in parsed.brands {
        let key = brand.key.trim().to_string();
        if key.is_empty() {
            return Err(ConfigError::EmptyBrandKey);
        }
        if config.brands.iter().any(|existing| existing.key == key) {
            return Err(ConfigError::DuplicateBrand(key));
        }
        let products: Vec<String> = brand
            .products
            .iter()
            .map(|product| product.trim())
            .filter(|product| !product.is_empty())
            .map(str::to_string)
            .collect();
        if products.is_empty() {
            return Err(ConfigError::BrandWithoutProducts(key));
        }
        config.brands.push(Brand {
            key,
            name: brand.name.trim().to_string(),
            products,
            ask_interest: brand
                .ask_interest
                .map(|question| question.trim().to_string())
                .filter(|question| !question.is_empty()),
        });
    }

    Ok(config)
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
