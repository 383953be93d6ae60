use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("session expired, please log in again")]
    Unauthorized,

    #[error("request failed with status {status}")]
    Status { status: u16 },

    #[error("could not read server response: {0}")]
    Decode(String),

    /// The backend answered 2xx but reported `condition: false`.
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    /// A 401 is turned into a sign-out and a single "session expired" toast by the client's
    /// unauthorized hook, so callers should not report it again.
    pub fn reported_globally(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => ApiError::Decode(e.to_string()),
            other => ApiError::Network(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("Fill all required fields")]
    MissingFields,

    #[error("{field} must be a number")]
    InvalidNumber { field: &'static str },

    #[error("{field} cannot be negative")]
    Negative { field: &'static str },

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unauthorized_is_reported_globally() {
        assert!(ApiError::Unauthorized.reported_globally());
        assert!(!ApiError::Status { status: 500 }.reported_globally());
        assert!(!ApiError::Network("offline".into()).reported_globally());
        assert!(!ApiError::Rejected("Duplicate".into()).reported_globally());
    }
}
