//! The record a settled promise leaves behind.
use std::fmt;

/// Which way a promise went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Status {
    Fulfilled,
    Rejected,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Fulfilled => "fulfilled",
            Status::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a settled promise. Exactly one of `value` or `reason` exists,
/// picked by the variant.
///
/// With the `serde` feature this serializes as
/// `{"status":"fulfilled","value":..}` or `{"status":"rejected","reason":..}`.
///
/// # Examples
///
/// ```
/// use promise_settle::{Outcome, Status};
/// let outcome: Outcome<u32, String> = Ok(42).into();
/// assert_eq!(outcome.status(), Status::Fulfilled);
/// assert_eq!(outcome.value(), Some(&42));
/// assert_eq!(outcome.reason(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "status", rename_all = "lowercase")
)]
#[must_use]
pub enum Outcome<T, E> {
    Fulfilled { value: T },
    Rejected { reason: E },
}

impl<T, E> Outcome<T, E> {
    pub fn status(&self) -> Status {
        match self {
            Outcome::Fulfilled { .. } => Status::Fulfilled,
            Outcome::Rejected { .. } => Status::Rejected,
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Outcome::Fulfilled { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Fulfilled { value } => Some(value),
            Outcome::Rejected { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&E> {
        match self {
            Outcome::Fulfilled { .. } => None,
            Outcome::Rejected { reason } => Some(reason),
        }
    }

    /// Back to a `Result`, for callers that do want `?` after all.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Outcome::Fulfilled { value } => Ok(value),
            Outcome::Rejected { reason } => Err(reason),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Fulfilled { value },
            Err(reason) => Outcome::Rejected { reason },
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        outcome.into_result()
    }
}
