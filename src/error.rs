use thiserror::Error;

pub type WeaveResult<T> = Result<T, WeaveError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeaveError {
    #[error("Either a template id or a data object must be provided")]
    MissingInput,

    #[error("Template '{id}' does not exist")]
    TemplateNotFound { id: String },

    #[error("Invalid data object: {0}")]
    InvalidData(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("YAML error: {0}")]
    Yaml(String),

    #[error("Template registry error: {0}")]
    Registry(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for WeaveError {
    fn from(err: serde_json::Error) -> Self {
        WeaveError::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for WeaveError {
    fn from(err: serde_yaml::Error) -> Self {
        WeaveError::Yaml(err.to_string())
    }
}

impl From<std::io::Error> for WeaveError {
    fn from(err: std::io::Error) -> Self {
        WeaveError::Io(err.to_string())
    }
}
