use super::RequestsLoggingLevel;
use crate::insights::{AttentionSettings, MismatchSettings};

pub const DEFAULT_TABLE_LIMIT: usize = 10;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
    /// Row cap applied to ranked tables when a request sets no `limit`.
    pub default_limit: usize,
    pub attention: AttentionSettings,
    pub mismatch: MismatchSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3001,
            content_cache_age_sec: 3600,
            frontend_dir_path: None,
            default_limit: DEFAULT_TABLE_LIMIT,
            attention: AttentionSettings::default(),
            mismatch: MismatchSettings::default(),
        }
    }
}
