use std::fmt;

use thiserror::Error;

/// The operation that was running when an error surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Listing,
    Fetching,
    Adding,
    Updating,
    Deleting,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Listing => "listing products",
            Action::Fetching => "fetching product",
            Action::Adding => "adding product",
            Action::Updating => "updating product",
            Action::Deleting => "deleting product",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("product not found with id: {0}")]
    NotFound(u64),
    #[error("error {action}: {source}")]
    Io {
        action: Action,
        #[source]
        source: std::io::Error,
    },
    #[error("error {action}: backing file is not a valid product list: {source}")]
    Parse {
        action: Action,
        #[source]
        source: serde_json::Error,
    },
    #[error("error {action}: cannot encode products: {source}")]
    Serialize {
        action: Action,
        #[source]
        source: serde_json::Error,
    },
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        assert_eq!(ServiceError::NotFound(9).to_string(), "product not found with id: 9");

        let err = ServiceError::Io {
            action: Action::Adding,
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "error adding product: denied");
        assert!(!err.is_not_found());
    }
}
