use thiserror::Error;

#[derive(Debug, Error)]
pub enum BpError {
    #[error(
        "Backend not configured. Set BEATPLAN_URL and BEATPLAN_API_KEY or configure ~/.config/beatplan/config.toml"
    )]
    BackendNotConfigured,

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("--interval is required for custom frequency")]
    MissingInterval,

    #[error("Invalid recurrence rule: {0}")]
    Rule(#[from] beatplan_core::InvalidRuleError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
