//! Proof that an error diagnostic was emitted.

use std::fmt;

/// Zero-sized token that can only be obtained by emitting an error.
///
/// Parser functions return it to prove they reported their failure, so a
/// caller never has to wonder whether a bare `Err` left the user without a
/// message.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    /// Only the queue hands these out.
    pub(crate) const fn new() -> Self {
        ErrorGuaranteed(())
    }

    /// Obtain a guarantee from an error count, if any errors were emitted.
    pub fn from_error_count(count: usize) -> Option<Self> {
        (count > 0).then(Self::new)
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("error(s) emitted")
    }
}
