// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use nova_app::DEFAULT_COLUMN_WIDTH;
use nova_db::{ConnectionSettings, DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_USER};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub database: Database,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            database: Database::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Database {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<i64>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub column_width: Option<i64>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            column_width: Some(DEFAULT_COLUMN_WIDTH as i64),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("NOVA_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set NOVA_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(nova_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version. Add `version = 1` and put values under [database], [ui], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(url) = &self.database.url {
            ConnectionSettings::from_url(url)
                .with_context(|| format!("database.url in {}", path.display()))?;
        }

        if let Some(port) = self.database.port {
            check_port(port).with_context(|| format!("database.port in {}", path.display()))?;
        }

        if let Some(width) = self.ui.column_width
            && width <= 0
        {
            bail!(
                "ui.column_width in {} must be positive, got {}",
                path.display(),
                width
            );
        }

        if let Some(level) = &self.log.level {
            EnvFilter::try_new(level).with_context(|| {
                format!(
                    "log.level in {} is not a valid filter {level:?}; use a level like info or debug",
                    path.display()
                )
            })?;
        }

        Ok(())
    }

    /// Resolves each key from the config file, then `NOVA_DB_*`, then the default.
    /// A URL, from either source, replaces the individual keys.
    pub fn connection_settings(&self) -> Result<ConnectionSettings> {
        let database = &self.database;
        if let Some(url) = database.url.clone().or_else(|| env_value("NOVA_DB_URL")) {
            return ConnectionSettings::from_url(&url);
        }

        let port = match database.port {
            Some(port) => check_port(port)?,
            None => match env_value("NOVA_DB_PORT") {
                Some(raw) => {
                    let port = raw.trim().parse::<i64>().with_context(|| {
                        format!("NOVA_DB_PORT {raw:?} is not a number; use a port like 3306")
                    })?;
                    check_port(port).context("NOVA_DB_PORT")?
                }
                None => DEFAULT_PORT,
            },
        };

        Ok(ConnectionSettings {
            host: pick(&database.host, "NOVA_DB_HOST", DEFAULT_HOST),
            port,
            user: pick(&database.user, "NOVA_DB_USER", DEFAULT_USER),
            password: pick(&database.password, "NOVA_DB_PASSWORD", ""),
            database: pick(&database.name, "NOVA_DB_NAME", DEFAULT_DATABASE),
        })
    }

    pub fn column_width(&self) -> usize {
        self.ui
            .column_width
            .and_then(|width| usize::try_from(width).ok())
            .filter(|width| *width > 0)
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        if let Some(file) = &self.log.file {
            return Ok(PathBuf::from(file));
        }
        let data_root = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [log].file in the config")
        })?;
        Ok(data_root.join(nova_db::APP_NAME).join("nova.log"))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# nova config\n# Place this file at: {}\n\nversion = 1\n\n[database]\n# Either a URL or the individual keys below. Each key falls back to\n# NOVA_DB_URL / NOVA_DB_HOST / NOVA_DB_PORT / NOVA_DB_USER / NOVA_DB_PASSWORD / NOVA_DB_NAME.\n# url = \"mysql://root@localhost:3306/{}\"\nhost = \"{}\"\nport = {}\nuser = \"{}\"\n# password = \"\"\nname = \"{}\"\n\n[ui]\ncolumn_width = {}\n\n[log]\n# Overridden by NOVA_LOG.\nlevel = \"{}\"\n# Default is the platform data dir (for example ~/.local/share/nova/nova.log)\n# file = \"/absolute/path/to/nova.log\"\n",
            path.display(),
            DEFAULT_DATABASE,
            DEFAULT_HOST,
            DEFAULT_PORT,
            DEFAULT_USER,
            DEFAULT_DATABASE,
            DEFAULT_COLUMN_WIDTH,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn check_port(port: i64) -> Result<u16> {
    u16::try_from(port)
        .ok()
        .filter(|port| *port > 0)
        .ok_or_else(|| anyhow!("port {port} is out of range; use 1-65535"))
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn pick(configured: &Option<String>, env_key: &str, default: &str) -> String {
    configured
        .clone()
        .or_else(|| env_value(env_key))
        .unwrap_or_else(|| default.to_owned())
}
