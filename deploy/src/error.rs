use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("step `{step}` failed with contract error {code}")]
    Step { step: &'static str, code: u32 },

    #[error("step `{step}` aborted by the host")]
    Aborted { step: &'static str },

    #[error("invalid deployment configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("cannot read networks file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid parameter `{0}`")]
    InvalidParameter(&'static str),

    #[error("`{0}` is not a valid strkey address")]
    Address(String),

    #[error("network `{0}` is not configured")]
    MissingNetwork(String),
}
