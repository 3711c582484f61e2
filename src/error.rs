use async_graphql::ErrorExtensions;
use thiserror::Error;

use crate::store::StoreError;

/// Category of a [`ServiceError`], used by callers to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested aggregate does not exist for this owner.
    NotFound,
    /// The mutation would violate a uniqueness invariant.
    Conflict,
    /// A referenced product is unknown to the catalog or to the cart.
    InvalidReference,
    /// The persistence layer failed.
    Internal,
    /// The cart changed between load and save. Retrying may succeed.
    WriteConflict,
}

impl ErrorKind {
    /// HTTP status code reported for this kind.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict | ErrorKind::InvalidReference => 400,
            ErrorKind::Internal => 500,
            ErrorKind::WriteConflict => 409,
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn is_retryable(self) -> bool {
        self == ErrorKind::WriteConflict
    }

    /// Code exposed in the `code` GraphQL error extension.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::InvalidReference => "INVALID_REFERENCE",
            ErrorKind::Internal => "INTERNAL",
            ErrorKind::WriteConflict => "WRITE_CONFLICT",
        }
    }
}

/// Errors returned by the cart, user and product services.
///
/// Display strings are user facing and must not change.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("User does not have a cart")]
    CartNotFound,

    /// Cart missing on the update path, where the remedy is adding a product first.
    #[error("User does not have a cart. Use POST to create cart and add a product")]
    CartRequired,

    #[error("Product already in cart. Use the cart sidebar to update or remove product from cart")]
    ProductAlreadyInCart,

    #[error("Product doesn't exist in database")]
    ProductNotInDatabase,

    #[error("Product not in cart")]
    ProductNotInCart,

    #[error("Cart Not Created Something Went Wrong!!")]
    CartNotCreated(#[source] StoreError),

    #[error("User not found")]
    UserNotFound,

    #[error("Email already taken")]
    EmailTaken,

    #[error("Cart of user `{owner}` was modified concurrently, retry the request")]
    WriteConflict { owner: String },

    #[error("Store error: {0}")]
    Store(#[source] StoreError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::CartNotFound | ServiceError::CartRequired | ServiceError::UserNotFound => {
                ErrorKind::NotFound
            }
            ServiceError::ProductAlreadyInCart | ServiceError::EmailTaken => ErrorKind::Conflict,
            ServiceError::ProductNotInDatabase | ServiceError::ProductNotInCart => {
                ErrorKind::InvalidReference
            }
            ServiceError::CartNotCreated(_) | ServiceError::Store(_) => ErrorKind::Internal,
            ServiceError::WriteConflict { .. } => ErrorKind::WriteConflict,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

impl From<StoreError> for ServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::WriteConflict { key } => ServiceError::WriteConflict { owner: key },
            other => ServiceError::Store(other),
        }
    }
}

impl ErrorExtensions for ServiceError {
    fn extend(&self) -> async_graphql::Error {
        let kind = self.kind();
        async_graphql::Error::new(self.to_string()).extend_with(|_, extensions| {
            extensions.set("code", kind.as_str());
            extensions.set("status", kind.status_code());
        })
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_status_codes() {
        assert_eq!(ServiceError::CartNotFound.kind().status_code(), 404);
        assert_eq!(ServiceError::CartRequired.kind().status_code(), 404);
        assert_eq!(ServiceError::ProductAlreadyInCart.kind().status_code(), 400);
        assert_eq!(ServiceError::ProductNotInDatabase.kind().status_code(), 400);
        assert_eq!(ServiceError::ProductNotInCart.kind().status_code(), 400);
        let conflict = ServiceError::WriteConflict {
            owner: "a@x.com".to_string(),
        };
        assert_eq!(conflict.kind().status_code(), 409);
        assert!(conflict.is_retryable());
        assert!(!ServiceError::ProductAlreadyInCart.is_retryable());
    }

    #[test]
    fn store_write_conflict_becomes_retryable() {
        let error: ServiceError = StoreError::WriteConflict {
            key: "a@x.com".to_string(),
        }
        .into();
        assert!(matches!(error, ServiceError::WriteConflict { ref owner } if owner == "a@x.com"));

        let error: ServiceError = StoreError::Missing {
            key: "a@x.com".to_string(),
        }
        .into();
        assert_eq!(error.kind(), ErrorKind::Internal);
    }

    #[test]
    fn messages_are_verbatim() {
        assert_eq!(
            ServiceError::CartRequired.to_string(),
            "User does not have a cart. Use POST to create cart and add a product"
        );
        assert_eq!(
            ServiceError::CartNotCreated(StoreError::Missing {
                key: "a@x.com".to_string()
            })
            .to_string(),
            "Cart Not Created Something Went Wrong!!"
        );
    }
}
