//! The `Error` enum: every failure this crate can surface, grouped into
//! four broad categories — input-shape, resource, format, semantic.

use std::fmt;

/// Everything that can go wrong building a [`crate::Params`]/[`crate::Context`],
/// running a hash, or parsing/verifying an encoded string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `t_cost` was zero.
    TimeTooSmall,
    /// `m_cost` was below `max(8 * lanes, 8)` KiB.
    MemoryTooLittle { m_cost: u32, minimum: u32 },
    /// `m_cost` exceeded `2^min(32, ptrbits - 11)` KiB.
    MemoryTooMuch { m_cost: u32, maximum: u32 },
    /// `lanes` was zero.
    LanesTooFew,
    /// `lanes` exceeded `2^24 - 1`.
    LanesTooMany,
    /// `threads` was zero.
    ThreadsTooFew,
    /// `threads` exceeded `2^24 - 1`.
    ThreadsTooMany,
    /// Requested output was shorter than 4 bytes.
    OutputTooShort,
    /// Requested output exceeded `2^32 - 1` bytes.
    OutputTooLong,
    /// Salt was shorter than the mandatory 8 bytes.
    SaltTooShort,
    /// `version` was neither `0x10` nor `0x13`.
    IncorrectVersion,
    /// The type byte/string did not name `d`, `i`, or `id`.
    UnknownVariant,
    /// The global allocator failed, or the requested matrix size overflowed
    /// `memory_blocks * BLOCK_BYTES`.
    MemoryAllocationError,
    /// A lane worker could not be spawned or joined.
    ThreadFail,
    /// An encoded PHC string did not match the grammar in §4.8.
    DecodingFail,
    /// The caller-provided buffer was too small to hold a decoded field.
    DecodingBufferTooSmall,
    /// `verify` recomputed a tag that did not match the encoded one.
    VerifyMismatch,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::TimeTooSmall => write!(f, "time cost (t_cost) must be at least 1"),
            Error::MemoryTooLittle { m_cost, minimum } => write!(
                f,
                "memory cost {} KiB is below the minimum of {} KiB for this lane count",
                m_cost, minimum
            ),
            Error::MemoryTooMuch { m_cost, maximum } => write!(
                f,
                "memory cost {} KiB exceeds the maximum of {} KiB on this platform",
                m_cost, maximum
            ),
            Error::LanesTooFew => write!(f, "lanes must be at least 1"),
            Error::LanesTooMany => write!(f, "lanes must not exceed 2^24 - 1"),
            Error::ThreadsTooFew => write!(f, "threads must be at least 1"),
            Error::ThreadsTooMany => write!(f, "threads must not exceed 2^24 - 1"),
            Error::OutputTooShort => write!(f, "output length must be at least 4 bytes"),
            Error::OutputTooLong => write!(f, "output length must not exceed 2^32 - 1 bytes"),
            Error::SaltTooShort => write!(f, "salt must be at least 8 bytes"),
            Error::IncorrectVersion => write!(f, "version must be 0x10 or 0x13"),
            Error::UnknownVariant => write!(f, "argon2 type must be one of d, i, id"),
            Error::MemoryAllocationError => write!(f, "failed to allocate the working memory matrix"),
            Error::ThreadFail => write!(f, "a lane worker thread failed to start or join"),
            Error::DecodingFail => write!(f, "malformed argon2 encoded string"),
            Error::DecodingBufferTooSmall => {
                write!(f, "decoded field exceeds the caller-provided buffer")
            }
            Error::VerifyMismatch => write!(f, "tag verification failed"),
        }
    }
}

impl std::error::Error for Error {}
