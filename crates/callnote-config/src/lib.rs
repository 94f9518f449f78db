use std::env;
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use callnote_core::PhoneMatch;
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "callnote";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_BASE_URL_TEMPLATE: &str = "https://{site_id}.axiscare.com/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_TOKEN: &str = "AXISCARE_API_TOKEN";
pub const ENV_SITE_ID: &str = "AXISCARE_SITE_ID";
pub const ENV_BASE_URL: &str = "AXISCARE_BASE_URL";
pub const ENV_BIND: &str = "CALLNOTE_BIND";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub axiscare: AxisCareConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Clone)]
pub struct AxisCareConfig {
    pub api_token: String,
    pub site_id: String,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub phone_match: PhoneMatch,
}

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub path: Option<PathBuf>,
}

impl AxisCareConfig {
    /// Explicit base URL if configured, otherwise the hosted URL for the site.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => DEFAULT_BASE_URL_TEMPLATE.replace("{site_id}", &self.site_id),
        }
    }
}

impl fmt::Debug for AxisCareConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisCareConfig")
            .field("api_token", &redacted(&self.api_token))
            .field("site_id", &self.site_id)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("phone_match", &self.phone_match)
            .finish()
    }
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind: DEFAULT_BIND.to_string(),
            },
            axiscare: AxisCareConfig {
                api_token: String::new(),
                site_id: String::new(),
                base_url: None,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                phone_match: PhoneMatch::Exact,
            },
            log: LogConfig::default(),
        }
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
    #[error("invalid timeout_secs value: {0}")]
    InvalidTimeout(u64),
    #[error("invalid bind address: {0}")]
    InvalidBind(String),
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
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
    axiscare: Option<AxisCareFile>,
    log: Option<LogFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerFile {
    bind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AxisCareFile {
    api_token: Option<String>,
    site_id: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    phone_match: Option<PhoneMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LogFile {
    path: Option<PathBuf>,
}

/// Loads the config file (if any) and overlays the process environment.
pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    load_with_env(config_path, |key| env::var(key).ok())
}

pub fn load_with_env<F>(config_path: Option<PathBuf>, lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let required = config_path.is_some();
    let parsed = match resolve_config_path(config_path) {
        Ok(path) => read_at_path(&path, required)?,
        Err(ConfigError::MissingHomeDir) if !required => None,
        Err(ConfigError::InvalidConfigPath(_)) if !required => None,
        Err(err) => return Err(err),
    };
    let mut config = merge_config(parsed.unwrap_or_default())?;
    apply_env(&mut config, lookup);
    validate(&config)?;
    Ok(config)
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

fn read_at_path(path: &Path, required: bool) -> Result<Option<ConfigFile>> {
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
    Ok(Some(parsed))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(server) = parsed.server {
        if let Some(bind) = server.bind {
            config.server.bind = bind;
        }
    }

    if let Some(axiscare) = parsed.axiscare {
        if let Some(token) = axiscare.api_token {
            config.axiscare.api_token = token;
        }
        if let Some(site_id) = axiscare.site_id {
            config.axiscare.site_id = site_id;
        }
        if let Some(base_url) = axiscare.base_url {
            config.axiscare.base_url = Some(base_url);
        }
        if let Some(timeout) = axiscare.timeout_secs {
            if timeout == 0 {
                return Err(ConfigError::InvalidTimeout(timeout));
            }
            config.axiscare.timeout_secs = timeout;
        }
        if let Some(phone_match) = axiscare.phone_match {
            config.axiscare.phone_match = phone_match;
        }
    }

    if let Some(log) = parsed.log {
        config.log.path = log.path;
    }

    Ok(config)
}

fn apply_env<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup(ENV_API_TOKEN) {
        config.axiscare.api_token = token;
    }
    if let Some(site_id) = lookup(ENV_SITE_ID) {
        config.axiscare.site_id = site_id;
    }
    if let Some(base_url) = lookup(ENV_BASE_URL).filter(|value| !value.trim().is_empty()) {
        config.axiscare.base_url = Some(base_url);
    }
    if let Some(bind) = lookup(ENV_BIND).filter(|value| !value.trim().is_empty()) {
        config.server.bind = bind;
    }
}

fn validate(config: &AppConfig) -> Result<()> {
    if config.server.bind.parse::<SocketAddr>().is_err() {
        return Err(ConfigError::InvalidBind(config.server.bind.clone()));
    }
    if let Some(base_url) = &config.axiscare.base_url {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url.clone()));
        }
    }
    Ok(())
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

#[cfg(test)]
mod tests {
    use super::{
        load_with_env, merge_config, AppConfig, AxisCareFile, ConfigError, ConfigFile, ServerFile,
        DEFAULT_BIND,
    };
    use callnote_core::PhoneMatch;
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_base_url_uses_site_id() {
        let mut config = AppConfig::default();
        config.axiscare.site_id = "acme".to_string();
        assert_eq!(config.axiscare.base_url(), "https://acme.axiscare.com/api");
    }

    #[test]
    fn explicit_base_url_drops_trailing_slash() {
        let mut config = AppConfig::default();
        config.axiscare.base_url = Some("http://127.0.0.1:9000/api/".to_string());
        assert_eq!(config.axiscare.base_url(), "http://127.0.0.1:9000/api");
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            server: Some(ServerFile {
                bind: Some("0.0.0.0:9000".to_string()),
            }),
            axiscare: Some(AxisCareFile {
                api_token: Some("file-token".to_string()),
                site_id: Some("acme".to_string()),
                base_url: None,
                timeout_secs: Some(5),
                phone_match: Some(PhoneMatch::Normalized),
            }),
            log: None,
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.server.bind, "0.0.0.0:9000");
        assert_eq!(merged.axiscare.api_token, "file-token");
        assert_eq!(merged.axiscare.timeout_secs, 5);
        assert_eq!(merged.axiscare.phone_match, PhoneMatch::Normalized);
    }

    #[test]
    fn merge_config_rejects_zero_timeout() {
        let parsed = ConfigFile {
            axiscare: Some(AxisCareFile {
                api_token: None,
                site_id: None,
                base_url: None,
                timeout_secs: Some(0),
                phone_match: None,
            }),
            ..ConfigFile::default()
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(0)));
    }

    #[test]
    fn load_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_with_env(Some(missing), env_of(&[])).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn environment_overrides_file() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[axiscare]\napi_token = \"file-token\"\nsite_id = \"file-site\"\nphone_match = \"normalized\"\n[log]\npath = \"/tmp/failures.log\"\n",
        )
        .expect("write config");
        restrict_permissions(&path);

        let config = load_with_env(
            Some(path),
            env_of(&[("AXISCARE_API_TOKEN", "env-token"), ("AXISCARE_SITE_ID", "env-site")]),
        )
        .expect("load");
        assert_eq!(config.axiscare.api_token, "env-token");
        assert_eq!(config.axiscare.site_id, "env-site");
        assert_eq!(config.axiscare.phone_match, PhoneMatch::Normalized);
        assert_eq!(
            config.log.path.as_deref(),
            Some(Path::new("/tmp/failures.log"))
        );
        assert_eq!(config.server.bind, DEFAULT_BIND);
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[axiscare]\nopenphone_api_key = \"x\"\n").expect("write config");
        restrict_permissions(&path);

        let err = load_with_env(Some(path), env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_rejects_invalid_bind_from_env() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "").expect("write config");
        restrict_permissions(&path);

        let err = load_with_env(Some(path), env_of(&[("CALLNOTE_BIND", "not-an-addr")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBind(_)));
    }

    #[cfg(unix)]
    #[test]
    fn load_rejects_world_readable_file() {
        use std::os::unix::fs::PermissionsExt;
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "").expect("write config");
        let mut perms = fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o644);
        fs::set_permissions(&path, perms).expect("chmod");

        let err = load_with_env(Some(path), env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::InsecurePermissions(_)));
    }

    #[test]
    fn debug_output_redacts_token() {
        let mut config = AppConfig::default();
        config.axiscare.api_token = "secret-token".to_string();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
