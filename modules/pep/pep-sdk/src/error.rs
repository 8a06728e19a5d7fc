//! Error types for the PEP client.

use thiserror::Error;

/// Boxed cause carried by transport and unexpected errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by [`AuthorizationClient::check_authorization`].
///
/// A denial is not an error: it is expressed via
/// `AuthorizationResponse.decision == false`.
///
/// [`AuthorizationClient::check_authorization`]: crate::AuthorizationClient::check_authorization
#[derive(Debug, Error)]
pub enum PdpClientError {
    /// A property, attribute or context value is outside
    /// {string, number, boolean, null, map, list}.
    #[error("unsupported value type: {type_name}")]
    UnsupportedValueType { type_name: String },

    /// Required request fields are missing after applying client defaults.
    #[error("missing required field(s): {}", fields.join(", "))]
    MissingRequiredField { fields: Vec<String> },

    /// The request is structurally invalid.
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// Unusable endpoint or TLS setup, or a client used from the wrong
    /// runtime context.
    #[error("invalid client configuration: {message}")]
    Configuration { message: String },

    /// The client has been shut down.
    #[error("client is closed")]
    ClientClosed,

    /// The RPC failed (connectivity, deadline, server-side fault).
    #[error("authorization check failed due to transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: BoxError,
    },

    /// Anything else; the underlying cause is kept for diagnostics.
    #[error("unexpected error: {message}")]
    Unexpected {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl PdpClientError {
    #[must_use]
    pub fn unsupported_value_type(type_name: impl Into<String>) -> Self {
        Self::UnsupportedValueType {
            type_name: type_name.into(),
        }
    }

    #[must_use]
    pub fn missing_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingRequiredField {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn transport(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Self::Transport {
            message: source.to_string(),
            source,
        }
    }

    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn unexpected_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Unexpected {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Whether the error was raised before any RPC was attempted.
    #[must_use]
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedValueType { .. }
                | Self::MissingRequiredField { .. }
                | Self::InvalidRequest { .. }
        )
    }
}
