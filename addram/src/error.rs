use common::memlist::MemListError;
use thiserror::Error;

/// Failures that end a run.
///
/// None of them is retried; the first one decides the exit code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddRamError {
    #[error("board {manufacturer}:{product} not found")]
    BoardNotFound { manufacturer: u16, product: u8 },
    #[error("couldn't open {0}")]
    ServiceUnavailable(&'static str),
    #[error("memory block already added")]
    AlreadyPresent,
    #[error("no memory found")]
    NoMemoryDetected,
    #[error("detected {detected:#x} bytes, more than the {max:#x} the bonus region can hold")]
    SizeOutOfBounds { detected: u32, max: u32 },
    #[error("unable to allocate memory")]
    AllocationFailure,
    #[error("bonus RAM overlaps listed region {lower:#08x}-{upper:#08x}")]
    RegionOverlap { lower: u32, upper: u32 },
    #[error("free-memory list rejected the update: {0}")]
    MemList(#[from] MemListError),
}

impl AddRamError {
    /// Process exit code for this failure.
    ///
    /// `5` is a plain failure, `10` means nothing was found and `20`
    /// means the environment or the list is not in a state we can trust.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::BoardNotFound { .. } | Self::AlreadyPresent | Self::AllocationFailure => 5,
            Self::NoMemoryDetected => 10,
            Self::ServiceUnavailable(_)
            | Self::SizeOutOfBounds { .. }
            | Self::RegionOverlap { .. }
            | Self::MemList(_) => 20,
        }
    }
}

pub type Result<T> = core::result::Result<T, AddRamError>;
