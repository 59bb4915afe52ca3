//! error types
//!
//! one error enum for every layer of the client. callers usually match on
//! [`Error::kind`], which looks through any contextual wrapping.

use std::fmt;

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// error type for the client, executor, and resource clients
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// the http transport could not be configured
    #[error("config error: {0}")]
    Config(String),

    /// a local precondition failed; no request was sent
    #[error("validation error: {0}")]
    Validation(String),

    /// the login call was rejected
    #[error("authentication error: {message}")]
    Authentication {
        /// http status if the rejection came with one
        status: Option<u16>,
        /// server supplied message
        message: String,
    },

    /// network failure or a non-success http status
    #[error("transport error: {message}")]
    Transport {
        /// http status if a response was received
        status: Option<u16>,
        /// underlying error text or the raw response body
        message: String,
    },

    #[error("encoding error: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("decoding error: {0}")]
    Decoding(String),

    /// the server answered with a graphql error list.
    ///
    /// only the first message is kept; later entries are dropped.
    #[error("graphql error: {message}")]
    GraphQl {
        /// first error message of the response
        message: String,
    },

    /// the call succeeded on the wire but the server reported a domain failure
    #[error("operation failed: {0}")]
    OperationFailed(String),

    /// another error with a short description of the attempted operation
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

/// classification of an [`Error`], independent of context wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Validation,
    Authentication,
    Transport,
    Encoding,
    Decoding,
    GraphQl,
    OperationFailed,
}

impl Error {
    /// wrap this error with a description of the attempted operation
    pub fn context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// innermost error, skipping context layers
    pub fn root(&self) -> &Error {
        let mut current = self;
        while let Error::Context { source, .. } = current {
            current = source.as_ref();
        }
        current
    }

    /// classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Authentication { .. } => ErrorKind::Authentication,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::Encoding(_) => ErrorKind::Encoding,
            Error::Decoding(_) => ErrorKind::Decoding,
            Error::GraphQl { .. } => ErrorKind::GraphQl,
            Error::OperationFailed(_) => ErrorKind::OperationFailed,
            Error::Context { source, .. } => source.kind(),
        }
    }

    /// true if the error looks like an auth failure
    pub fn is_auth_error(&self) -> bool {
        matches!(self.root(), Error::Authentication { .. })
            || matches!(self.root(), Error::Transport { status: Some(401 | 403), .. })
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub(crate) fn transport(err: reqwest::Error) -> Self {
        Error::Transport {
            status: err.status().map(|status| status.as_u16()),
            message: err.to_string(),
        }
    }
}

/// attach context to the error side of a result
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|err| err.context(context))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Config => "config",
            ErrorKind::Validation => "validation",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Transport => "transport",
            ErrorKind::Encoding => "encoding",
            ErrorKind::Decoding => "decoding",
            ErrorKind::GraphQl => "graphql",
            ErrorKind::OperationFailed => "operation failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_auth_error() {
        let err = Error::Authentication {
            status: Some(401),
            message: "invalid credentials".to_string(),
        };
        assert!(err.is_auth_error());

        let err = Error::Transport {
            status: Some(403),
            message: "forbidden".to_string(),
        }
        .context("listing environments");
        assert!(err.is_auth_error());

        let err = Error::Transport {
            status: Some(500),
            message: "server error".to_string(),
        };
        assert!(!err.is_auth_error());
    }

    #[test]
    fn test_kind_looks_through_context() {
        let err = Error::GraphQl {
            message: "first".to_string(),
        }
        .context("getting probe")
        .context("outer");

        assert_eq!(err.kind(), ErrorKind::GraphQl);
        assert!(matches!(err.root(), Error::GraphQl { message } if message == "first"));
    }

    #[test]
    fn test_context_display_prefixes_message() {
        let err: Result<()> = Err(Error::validation("project ID cannot be empty"));
        let err = err.context("error in deleting environment").unwrap_err();
        assert_eq!(
            err.to_string(),
            "error in deleting environment: validation error: project ID cannot be empty"
        );
    }
}
