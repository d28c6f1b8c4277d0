//! Error types for refuge-core.

use crate::shelter::ShelterId;
use thiserror::Error;

/// Result type for refuge-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the capacity model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No spots remain in the shelter.
    #[error("shelter {0} is full")]
    ShelterFull(ShelterId),

    /// The shelter id is not in the tracked collection.
    #[error("shelter {0} not found")]
    ShelterNotFound(ShelterId),

    /// Capacity and occupancy do not satisfy `0 < capacity`, `occupancy <= capacity`.
    #[error("invalid capacity: occupancy {occupancy} with capacity {capacity}")]
    InvalidCapacity { capacity: u32, occupancy: u32 },

    /// Account registration form rejected.
    #[error("invalid registration: {0}")]
    InvalidRegistration(String),
}
