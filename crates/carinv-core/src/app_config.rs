use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level settings read from the environment.
///
/// The dealers file (see [`crate::dealers`]) carries per-run settings; values
/// there take precedence over `output_path`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub dealers_path: PathBuf,
    pub output_path: PathBuf,
    /// Upper bound on extraction tasks in flight at once. `0` is treated as `1`.
    pub max_concurrent_tasks: usize,
}
