// pgshuttle/src/config/mod.rs
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::errors::AppError;

// Fallbacks for the restore target, so a plain local postgres works out of the box
const DEFAULT_RESTORE_HOST: &str = "localhost";
const DEFAULT_RESTORE_PORT: &str = "5432";
const DEFAULT_RESTORE_USER: &str = "postgres";
const DEFAULT_RESTORE_NAME: &str = "vendmine_dev";
const DEFAULT_RESTORE_PASSWORD: &str = "postgres";

/// Connection parameters handed to the containerised postgres client tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

/// Source side as read from the environment. Nothing here has a default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSettings {
    pub host: Option<String>,
    pub port: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: SourceSettings,
    pub destination: ConnectionParams,
    pub backup_path: Option<String>,
    /// Host directory holding `drop_tables.sql`, mounted into the drop container.
    pub working_dir: PathBuf,
}

impl AppConfig {
    /// Builds the configuration from the process environment (after `.env` was loaded).
    pub fn from_env() -> Result<Self> {
        let working_dir =
            env::current_dir().context("Failed to resolve the current working directory")?;
        Ok(Self::from_lookup(|key| env::var(key).ok(), working_dir))
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F, working_dir: PathBuf) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        AppConfig {
            source: SourceSettings {
                host: get("DB_HOST"),
                port: get("DB_PORT"),
                user: get("DB_USER"),
                password: get("DB_PASSWORD"),
                database: get("DB_NAME"),
            },
            destination: ConnectionParams {
                host: get_or("DB_RESTORE_HOST", DEFAULT_RESTORE_HOST),
                port: get_or("DB_RESTORE_PORT", DEFAULT_RESTORE_PORT),
                user: get_or("DB_RESTORE_USER", DEFAULT_RESTORE_USER),
                password: get_or("DB_RESTORE_PASSWORD", DEFAULT_RESTORE_PASSWORD),
                database: get_or("DB_RESTORE_NAME", DEFAULT_RESTORE_NAME),
            },
            backup_path: get("BACKUP_PATH"),
            working_dir,
        }
    }

    /// Resolves the source connection for a backup. The password may be left unset.
    pub fn source(&self) -> crate::errors::Result<ConnectionParams> {
        let require = |value: &Option<String>, key: &str| {
            value
                .clone()
                .ok_or_else(|| AppError::Config(format!("{} must be set for backup", key)))
        };

        Ok(ConnectionParams {
            host: require(&self.source.host, "DB_HOST")?,
            port: require(&self.source.port, "DB_PORT")?,
            user: require(&self.source.user, "DB_USER")?,
            password: self.source.password.clone().unwrap_or_default(),
            database: require(&self.source.database, "DB_NAME")?,
        })
    }

    pub fn backup_path(&self) -> crate::errors::Result<&str> {
        self.backup_path
            .as_deref()
            .ok_or_else(|| AppError::Config("BACKUP_PATH must be set".to_string()))
    }
}
