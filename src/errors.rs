use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{}", server_message(.status, .detail))]
    Server { status: u16, detail: Option<String> },

    #[error("No se encontraron formatos de video compatibles")]
    NoFormats,

    #[error("{0}")]
    Validation(String),

    #[error("Ya hay una operación de {0} en curso")]
    Busy(&'static str),
}

fn server_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("Error del servidor ({status})"),
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_shows_detail_when_present() {
        let err = AppError::Server {
            status: 400,
            detail: Some("invalid url".to_string()),
        };
        assert_eq!(err.to_string(), "invalid url");
    }

    #[test]
    fn server_error_falls_back_to_status_code() {
        let err = AppError::Server {
            status: 502,
            detail: None,
        };
        assert!(err.to_string().contains("502"));
    }
}
