//! Error types for the evictkit library.
//!
//! The operation paths (`put` / `get`) recognise no recoverable errors:
//! boundary conditions like capacity 0 or a missing key are handled silently.
//! Errors exist only at two edges:
//!
//! - [`ConfigError`]: invalid construction parameters, returned by the
//!   fallible `try_*` constructors and `CacheBuilder::try_build`.
//! - [`InvariantError`]: an internal structural invariant did not hold.
//!   Produced by debug-only checkers; seeing one at runtime is a bug in the
//!   library, not in the caller.

use std::fmt;

/// Invalid cache configuration (zero K, zero aging bound, and so on).
///
/// # Example
///
/// ```
/// use evictkit::policy::lru_k::LruKEngine;
///
/// let bad = LruKEngine::<u64, &str>::try_new(16, 32, 0);
/// assert!(bad.is_err());
/// assert!(bad.unwrap_err().to_string().contains("k"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Violated internal invariant (index and ordering structure disagree,
/// a length counter is out of sync, and similar).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}
