use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("server responded with {status}{}", describe(.message))]
    Server { status: u16, message: Option<String> },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

fn describe(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::MalformedResponse(e.to_string())
        } else if e.is_builder() {
            Error::Client(e)
        } else {
            Error::Network(e)
        }
    }
}

impl Error {
    /// The user can reasonably try the same action again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Server { .. })
    }

    /// Only transport failures are retried automatically.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Network(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Short text suitable for a status line or toast.
    pub fn user_message(&self) -> String {
        match self {
            Error::Network(e) if e.is_timeout() => {
                "The bot server did not answer in time. Try again.".to_string()
            }
            Error::Network(_) => "Could not reach the bot server. Try again.".to_string(),
            Error::Server {
                message: Some(message),
                ..
            } => message.clone(),
            Error::Server { status, .. } => format!("The bot server rejected the request ({status})"),
            Error::MalformedResponse(_) => "Unexpected response from the bot server".to_string(),
            Error::Cancelled => "Request cancelled".to_string(),
            Error::InvalidBaseUrl(_) | Error::InvalidHeader(_) | Error::Client(_) => {
                self.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_display() {
        let with_message = Error::Server {
            status: 500,
            message: Some("state.json is locked".into()),
        };
        assert_eq!(
            with_message.to_string(),
            "server responded with 500: state.json is locked"
        );
        assert_eq!(with_message.user_message(), "state.json is locked");

        let bare = Error::Server {
            status: 404,
            message: None,
        };
        assert_eq!(bare.to_string(), "server responded with 404");
        assert!(bare.is_recoverable());
        assert!(!bare.is_retryable());
    }

    #[test]
    fn malformed_is_not_recoverable() {
        let err = Error::MalformedResponse("expected value at line 1 column 1".into());
        assert!(!err.is_recoverable());
        assert!(!err.is_retryable());
        assert_eq!(err.user_message(), "Unexpected response from the bot server");
    }
}
