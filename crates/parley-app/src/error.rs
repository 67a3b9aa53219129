use parley_client::ClientError;
use parley_config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn is_model_not_found(&self) -> bool {
        matches!(self, Self::Client(e) if e.is_model_not_found())
    }
}
