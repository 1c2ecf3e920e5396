use std::{env, path::PathBuf, time::Duration};

use log::*;
use login_engine::DirectoryConfig;

const DEFAULT_LOGIN_HOST: &str = "0.0.0.0";
const DEFAULT_LOGIN_PORT: u16 = 8084;
const DEV_USERS_FILE: &str = "./users.json";
const PROD_USERS_FILE: &str = "/config/users.json";
const DEV_DIRECTORY_URL: &str = "http://192.168.99.102:32769";
const PROD_DIRECTORY_URL: &str = "http://accounts";
const DEFAULT_DOWNSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Development mode. Only affects the defaults of other settings; nothing downstream ever sees this flag.
    pub dev: bool,
    /// If true, the default log level is raised to `debug`.
    pub verbose: bool,
    /// The JSON file the credential store is loaded from.
    pub users_file: PathBuf,
    /// The fully resolved location of the accounts service.
    pub directory: DirectoryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_LOGIN_HOST.to_string(),
            port: DEFAULT_LOGIN_PORT,
            dev: false,
            verbose: false,
            users_file: PathBuf::from(PROD_USERS_FILE),
            directory: DirectoryConfig::new(PROD_DIRECTORY_URL, DEFAULT_DOWNSTREAM_TIMEOUT),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("LOGIN_HOST").ok().unwrap_or_else(|| DEFAULT_LOGIN_HOST.into());
        let port = env::var("LOGIN_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for LOGIN_PORT. {e} Using the default, {DEFAULT_LOGIN_PORT}, \
                         instead."
                    );
                    DEFAULT_LOGIN_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_LOGIN_PORT);
        let dev = env_flag("LOGIN_DEV");
        let verbose = env_flag("LOGIN_VERBOSE");
        if dev {
            warn!("🪛️ Running in development mode.");
        }
        let users_file = env::var("LOGIN_USERS_FILE").map(PathBuf::from).unwrap_or_else(|_| {
            let default = if dev { DEV_USERS_FILE } else { PROD_USERS_FILE };
            info!("🪛️ LOGIN_USERS_FILE is not set. Using {default}.");
            PathBuf::from(default)
        });
        let directory = configure_directory(dev);
        Self { host, port, dev, verbose, users_file, directory }
    }
}

fn configure_directory(dev: bool) -> DirectoryConfig {
    let base_url = env::var("LOGIN_DIRECTORY_URL").unwrap_or_else(|_| {
        let default = if dev { DEV_DIRECTORY_URL } else { PROD_DIRECTORY_URL };
        info!("🪛️ LOGIN_DIRECTORY_URL is not set. Using {default}.");
        default.to_string()
    });
    let timeout = env::var("LOGIN_DOWNSTREAM_TIMEOUT")
        .map_err(|_| {
            info!(
                "🪛️ LOGIN_DOWNSTREAM_TIMEOUT is not set. Using the default value of {} s.",
                DEFAULT_DOWNSTREAM_TIMEOUT.as_secs()
            )
        })
        .and_then(|s| {
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| warn!("🪛️ Invalid configuration value for LOGIN_DOWNSTREAM_TIMEOUT. {e}"))
        })
        .ok()
        .unwrap_or(DEFAULT_DOWNSTREAM_TIMEOUT);
    DirectoryConfig::new(base_url, timeout)
}

fn env_flag(name: &str) -> bool {
    env::var(name).map(|s| &s == "1" || &s == "true").unwrap_or(false)
}

/// The log filter to use when `RUST_LOG` is not set. This is read before the logger exists, so it cannot log anything
/// itself.
pub fn default_log_level() -> &'static str {
    if env_flag("LOGIN_DEV") || env_flag("LOGIN_VERBOSE") {
        "debug"
    } else {
        "info"
    }
}
