//! Runtime settings from `TORQTRACK_*` environment variables, with
//! hardcoded fallback defaults.

use std::env;
use std::path::PathBuf;

use tracing::warn;

use crate::options::BoltDomain;
use crate::store::{BackupPolicy, MissingFilePolicy};

pub const DEFAULT_FILE: &str = "bolt_torquing_tracking.csv";
pub const DEFAULT_BACKUP_DIR: &str = "backups";
pub const DEFAULT_EXPORT_SECRET: &str = "KGP2025";

#[derive(Clone, Debug)]
pub struct Config {
    /// Backing CSV path.
    pub file: PathBuf,
    /// Directory backup snapshots are written under.
    pub backup_dir: PathBuf,
    pub backup: BackupPolicy,
    pub missing_file: MissingFilePolicy,
    pub bolt_domain: BoltDomain,
    /// Secret the export gate compares against.
    pub export_secret: String,
    /// When set, export archives are AES-locked with this passphrase.
    pub archive_passphrase: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            file: PathBuf::from(DEFAULT_FILE),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            backup: BackupPolicy::default(),
            missing_file: MissingFilePolicy::default(),
            bolt_domain: BoltDomain::default(),
            export_secret: DEFAULT_EXPORT_SECRET.to_string(),
            archive_passphrase: None,
        }
    }
}

impl Config {
    /// Read the `TORQTRACK_*` variables. Anything unset keeps its default;
    /// unparseable policy values warn and keep the default too.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(value) = env::var("TORQTRACK_FILE") {
            if !value.trim().is_empty() {
                config.file = PathBuf::from(value.trim());
            }
        }
        if let Ok(value) = env::var("TORQTRACK_BACKUP_DIR") {
            if !value.trim().is_empty() {
                config.backup_dir = PathBuf::from(value.trim());
            }
        }
        if let Ok(value) = env::var("TORQTRACK_BACKUP") {
            match BackupPolicy::from_str(&value) {
                Some(policy) => config.backup = policy,
                None => warn!(
                    value = %value,
                    "unrecognized TORQTRACK_BACKUP, keeping {}",
                    config.backup.as_str()
                ),
            }
        }
        if let Ok(value) = env::var("TORQTRACK_MISSING_FILE") {
            match MissingFilePolicy::from_str(&value) {
                Some(policy) => config.missing_file = policy,
                None => warn!(
                    value = %value,
                    "unrecognized TORQTRACK_MISSING_FILE, keeping {}",
                    config.missing_file.as_str()
                ),
            }
        }
        if let Ok(value) = env::var("TORQTRACK_BOLT_DOMAIN") {
            match BoltDomain::from_str(&value) {
                Some(domain) => config.bolt_domain = domain,
                None => warn!(
                    value = %value,
                    "unrecognized TORQTRACK_BOLT_DOMAIN, keeping {}",
                    config.bolt_domain
                ),
            }
        }
        if let Ok(value) = env::var("TORQTRACK_EXPORT_SECRET") {
            if !value.is_empty() {
                config.export_secret = value;
            }
        }
        config.archive_passphrase = env::var("TORQTRACK_ARCHIVE_PASSPHRASE")
            .ok()
            .filter(|value| !value.is_empty());

        config
    }
}
