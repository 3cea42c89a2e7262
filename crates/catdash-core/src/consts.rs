pub const DOT_CATDASH_DIR: &str = "./.catdash";
pub const CONFIGS_DIR: &str = "configs";
pub const LOGS_DIR: &str = "logs";
pub const SETTINGS_CONFIG: &str = "Settings.toml";
pub const STORAGE_FILE: &str = "storage.toml";

/// Key under which the session token is persisted.
pub const TOKEN_KEY: &str = "token";

pub const API_URL_ENV: &str = "CATDASH_API_URL";

pub const CATDASH_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CATDASH_NAME: &str = "Catdash";
