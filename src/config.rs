use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::ConfigError;
use crate::probe::mask_uri;

pub const DEFAULT_DB_NAME: &str = "ecoreborn";
pub const DEFAULT_APP_ENV: &str = "production";
pub const DEFAULT_APP_URL: &str = "http://localhost:5000";
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Snapshot of the process environment.
///
/// Checks and settings read from a snapshot instead of `std::env` so a whole
/// report run sees one consistent view, and tests can build one by hand.
/// Empty values are treated as unset.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Capture the current process environment.
    #[must_use]
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the value of `name` when it is set and non-empty.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) {
        self.vars.remove(name);
    }
}

/// Load `<root>/.env` into the process environment if the file exists.
///
/// Variables already set in the environment win over the file.
pub fn load_dotenv(root: &Path) -> Option<PathBuf> {
    let path = root.join(".env");
    dotenvy::from_path(&path).ok().map(|()| path)
}

#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .finish()
    }
}

#[derive(Clone)]
pub struct Settings {
    pub secret_key: String,
    pub mongodb_uri: String,
    pub mongodb_db_name: String,
    pub app_env: String,
    pub app_url: Url,
    pub http_port: u16,
    /// Directory holding `templates/` and `static/`.
    pub project_root: PathBuf,
    pub smtp: Option<SmtpSettings>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("secret_key", &"****")
            .field("mongodb_uri", &mask_uri(&self.mongodb_uri))
            .field("mongodb_db_name", &self.mongodb_db_name)
            .field("app_env", &self.app_env)
            .field("app_url", &self.app_url.as_str())
            .field("http_port", &self.http_port)
            .field("project_root", &self.project_root)
            .field("smtp", &self.smtp)
            .finish()
    }
}

impl Settings {
    /// Build settings from an environment snapshot and validate them.
    pub fn from_env(env: &Environment, project_root: &Path) -> Result<Self, ConfigError> {
        let secret_key =
            get_env_or_file(env, "SECRET_KEY")?.ok_or(ConfigError::Missing("SECRET_KEY"))?;
        let mongodb_uri =
            get_env_or_file(env, "MONGODB_URI")?.ok_or(ConfigError::Missing("MONGODB_URI"))?;
        let mongodb_db_name = env
            .get("MONGODB_DB_NAME")
            .unwrap_or(DEFAULT_DB_NAME)
            .to_string();
        let app_env = env.get("APP_ENV").unwrap_or(DEFAULT_APP_ENV).to_string();

        let raw_url = env.get("APP_URL").unwrap_or(DEFAULT_APP_URL);
        let app_url = Url::parse(raw_url).map_err(|e| ConfigError::Invalid {
            name: "APP_URL",
            reason: e.to_string(),
        })?;

        let http_port = parse_port(env, "PORT", DEFAULT_HTTP_PORT)?;

        let smtp = match env.get("SMTP_HOST") {
            Some(host) => Some(SmtpSettings {
                host: host.to_string(),
                port: parse_port(env, "SMTP_PORT", 587)?,
                user: env.get("SMTP_USER").map(str::to_string),
                password: get_env_or_file(env, "SMTP_PASS")?,
            }),
            None => None,
        };

        let settings = Self {
            secret_key,
            mongodb_uri,
            mongodb_db_name,
            app_env,
            app_url,
            http_port,
            project_root: project_root.to_path_buf(),
            smtp,
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "SECRET_KEY",
                reason: "cannot be blank".into(),
            });
        }
        validate_mongodb_uri(&self.mongodb_uri)?;
        validate_db_name(&self.mongodb_db_name)?;
        if self.http_port == 0 {
            return Err(ConfigError::Invalid {
                name: "PORT",
                reason: "Port cannot be 0".into(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn templates_dir(&self) -> PathBuf {
        self.project_root.join("templates")
    }

    #[must_use]
    pub fn static_dir(&self) -> PathBuf {
        self.project_root.join("static")
    }
}

fn validate_mongodb_uri(uri: &str) -> Result<(), ConfigError> {
    if uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            name: "MONGODB_URI",
            reason: "expected a mongodb:// or mongodb+srv:// connection string".into(),
        })
    }
}

/// MongoDB rejects these characters in database names.
fn validate_db_name(name: &str) -> Result<(), ConfigError> {
    if let Some(c) = name.chars().find(|c| r#"/\. "$"#.contains(*c)) {
        return Err(ConfigError::Invalid {
            name: "MONGODB_DB_NAME",
            reason: format!("character {c:?} is not allowed"),
        });
    }
    Ok(())
}

fn parse_port(env: &Environment, name: &'static str, default: u16) -> Result<u16, ConfigError> {
    match env.get(name) {
        Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Read a value from the snapshot, with support for the `_FILE` suffix (Docker secrets).
pub(crate) fn get_env_or_file(env: &Environment, name: &str) -> Result<Option<String>, ConfigError> {
    let file_env = format!("{name}_FILE");
    if let Some(file_path) = env.get(&file_env) {
        return match fs::read_to_string(file_path) {
            Ok(content) => Ok(Some(content.trim().to_string()).filter(|v| !v.is_empty())),
            Err(e) => Err(ConfigError::SecretFile {
                name: file_env,
                reason: e.to_string(),
            }),
        };
    }
    Ok(env.get(name).map(str::to_string))
}
