// Copyright 2026 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Error types for `classic` containers.
//!
//! Every engine reports invalid-argument and allocation failures through
//! [`ClassicError`]; duplicate-key-on-insert is not an error (see
//! [`crate::callbacks::InsertOutcome`]) and missing-key-on-select/unlink/delete
//! is a plain `bool`/`Option`, not a `Result`.

use thiserror::Error;

/// Standard result type for operations that can fail.
pub type ClassicResult<T> = Result<T, ClassicError>;

/// Error type for `classic` container operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassicError {
    /// A null/absent key was supplied where a key is required.
    #[error("null key rejected")]
    NullKey,

    /// A caller-suppliable runtime value was invalid at construction time
    /// (e.g. `max_link == 0` for the skip list, or a zero-capacity request
    /// to a hash engine's constructor).
    #[error("invalid argument: {what}")]
    InvalidArgument { what: &'static str },

    /// Bulk growth (hash table resize) failed; the container remains valid
    /// at its previous size.
    #[error("allocation failed during {during}")]
    AllocationFailed { during: &'static str },

    /// Surfaced only by driver code wrapping `foreach` into a `Result`-typed
    /// path (the `Map` facade's dynamic-dispatch surface); ordinary engine
    /// `foreach` calls report abort via the `bool` return of the callback
    /// itself.
    #[error("iteration aborted by callback")]
    IterationAborted,
}
