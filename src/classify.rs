//! Failure kinds and the set of kinds that trigger a retry.

use std::error;
use std::fmt;
use std::io;

/// A failure that can report which kind of failure it is.
///
/// [`Retry`](crate::Retry) compares the kind against its [`RetryOn`] set to
/// decide between retrying and handing the failure straight back.
pub trait Classify {
    type Kind: PartialEq;

    fn kind(&self) -> Self::Kind;
}

impl Classify for io::Error {
    type Kind = io::ErrorKind;

    fn kind(&self) -> io::ErrorKind {
        io::Error::kind(self)
    }
}

impl<K: Clone + PartialEq> Classify for Failure<K> {
    type Kind = K;

    fn kind(&self) -> K {
        self.kind.clone()
    }
}

/// The failure kinds a [`Retry`](crate::Retry) retries on.
///
/// ```rust
/// use retrying::RetryOn;
/// use std::io::ErrorKind;
///
/// let on = RetryOn::from([ErrorKind::ConnectionRefused, ErrorKind::TimedOut]);
/// assert!(on.matches(&ErrorKind::TimedOut));
/// assert!(!on.matches(&ErrorKind::NotFound));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryOn<K> {
    kinds: Vec<K>,
}

impl<K: PartialEq> RetryOn<K> {
    /// Retry on a single kind.
    pub fn kind(kind: K) -> RetryOn<K> {
        RetryOn { kinds: vec![kind] }
    }

    pub fn matches(&self, kind: &K) -> bool {
        self.kinds.iter().any(|k| k == kind)
    }

    pub fn kinds(&self) -> &[K] {
        &self.kinds
    }
}

impl<K> From<Vec<K>> for RetryOn<K> {
    fn from(kinds: Vec<K>) -> RetryOn<K> {
        RetryOn { kinds }
    }
}

impl<K, const N: usize> From<[K; N]> for RetryOn<K> {
    fn from(kinds: [K; N]) -> RetryOn<K> {
        RetryOn {
            kinds: Vec::from(kinds),
        }
    }
}

impl<K> FromIterator<K> for RetryOn<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> RetryOn<K> {
        RetryOn {
            kinds: iter.into_iter().collect(),
        }
    }
}

/// A failure tagged with its kind and a human-readable detail.
///
/// Handy when an operation has no error type of its own:
///
/// ```rust
/// use retrying::Failure;
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum Kind { Connection, Parse }
///
/// let err = Failure::new(Kind::Connection, "connection reset by peer");
/// assert_eq!(err.to_string(), "connection reset by peer");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure<K> {
    pub kind: K,
    pub detail: String,
}

impl<K> Failure<K> {
    pub fn new(kind: K, detail: impl Into<String>) -> Failure<K> {
        Failure {
            kind,
            detail: detail.into(),
        }
    }
}

impl<K> fmt::Display for Failure<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

impl<K: fmt::Debug> error::Error for Failure<K> {}
