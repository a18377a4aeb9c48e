// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for the persisted-stream half of this crate.

/// Errors surfaced while reading a persisted spatial index stream.
///
/// Producing or consuming a value type `V` whose in-memory representation is
/// not fixed-size and self-contained is refused statically instead: every
/// entry point that touches the on-disk format requires `V: bytemuck::Pod`,
/// which rules out padding, interior pointers, and non-uniform layout at
/// compile time.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The stream did not begin with the `"mapnik-index"` header.
    #[error("not a valid spatial index stream (missing \"mapnik-index\" header)")]
    InvalidFormat,

    /// The stream's item type has a zero-sized in-memory representation,
    /// which makes the serialized skip arithmetic degenerate.
    #[error("spatial index item type must not be zero-sized")]
    ZeroSizedValue,

    /// The underlying stream returned an error, or returned fewer bytes than
    /// the format required (a short read).
    #[error("spatial index stream I/O error")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results returned by [`crate::stream`] operations.
pub type Result<T> = core::result::Result<T, Error>;
