//! Domain logic for the Roost booking engine: the room aggregate with its
//! embedded bookings and reviews, the query/ranking engine, and the
//! booking authorization gate. No I/O lives here; persistence goes through
//! [`repository::RoomRepository`].

pub mod booking;
pub mod gate;
pub mod query;
pub mod repository;
pub mod review;
pub mod room;

pub use booking::Booking;
pub use repository::{RoomRepository, StoreError};
pub use review::Review;
pub use room::Room;

#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// Required input missing or malformed, rejected before any store
    /// mutation.
    #[error("{0}")]
    Validation(String),

    /// An externally supplied id is not a well-formed UUID.
    #[error("{0}")]
    InvalidId(String),

    /// A date string that parses neither as RFC 3339 nor as `YYYY-MM-DD`.
    #[error("Invalid date format")]
    InvalidDate,

    /// A required query parameter is absent.
    #[error("{0}")]
    MissingParam(String),

    /// The caller-supplied email claim does not match the verified
    /// principal.
    #[error("forbidden access")]
    Forbidden,

    /// No document (or embedded sub-document) matched the operation's
    /// filter.
    #[error("{0}")]
    NotFound(String),
}

pub type RoomResult<T> = Result<T, RoomError>;
