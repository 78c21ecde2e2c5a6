//! Error types for the consignment service.
//!
//! [`Error`] captures every failure the service can report to a caller. It
//! implements `From<Error>` for `tonic::Status` so handlers can propagate with
//! `?` and clients receive a matching gRPC status code.
//!
//! ## Error Cases
//! - `Storage`: the store refused to append a consignment. The in-memory store
//!   never produces it; it exists for stores with limits of their own.

use tonic::Status;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the consignment service.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The backing store could not append the consignment.
    #[error("Storage error: {context}")]
    Storage { context: String },
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        match err {
            Error::Storage { .. } => Status::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn storage_error_maps_to_internal() {
        let status: Status = Error::Storage {
            context: "store is full".to_string(),
        }
        .into();

        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), "Storage error: store is full");
    }

    #[test]
    fn status_message_matches_display() {
        let err = Error::Storage {
            context: "capacity reached".to_string(),
        };
        let display = err.to_string();

        let status = Status::from(err);

        assert_eq!(status.message(), display);
    }
}
