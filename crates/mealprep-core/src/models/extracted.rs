// ABOUTME: Explicit "not extracted" sentinel for loosely structured generation output
// ABOUTME: Distinguishes a field the parser could not identify from a fabricated zero or empty value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Text rendered in place of a value the parser could not identify
pub const UNKNOWN_LABEL: &str = "unknown";

/// A value pulled out of generated text, or an explicit `Unknown` marker
///
/// Serializes as the inner value when known and as `null` otherwise, so API
/// clients never mistake a missing calorie count for `0`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Extracted<T> {
    /// Value confidently identified in the source text
    Known(T),
    /// Field not found in the source text
    #[default]
    Unknown,
}

impl<T> Extracted<T> {
    /// Whether a value was identified
    #[must_use]
    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Whether this is the `Unknown` sentinel
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Borrow the identified value, if any
    #[must_use]
    pub const fn known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unknown => None,
        }
    }

    /// Convert into an `Option`, dropping the sentinel
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unknown => None,
        }
    }

    /// Map the identified value, keeping `Unknown` as is
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Extracted<U> {
        match self {
            Self::Known(value) => Extracted::Known(f(value)),
            Self::Unknown => Extracted::Unknown,
        }
    }

    /// Keep the current value when known, otherwise take `other`
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Known(_) => self,
            Self::Unknown => other,
        }
    }
}

impl Extracted<f64> {
    /// Wrap a numeric reading, rejecting negative and non-finite values
    #[must_use]
    pub fn non_negative(value: f64) -> Self {
        if value.is_finite() && value >= 0.0 {
            Self::Known(value)
        } else {
            Self::Unknown
        }
    }
}

impl<T> Extracted<Vec<T>> {
    /// Wrap a list, treating an empty list as not extracted
    #[must_use]
    pub fn non_empty(items: Vec<T>) -> Self {
        if items.is_empty() {
            Self::Unknown
        } else {
            Self::Known(items)
        }
    }

    /// Borrow the items, or an empty slice when unknown
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Known(items) => items,
            Self::Unknown => &[],
        }
    }
}

impl<T> From<Option<T>> for Extracted<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unknown, Self::Known)
    }
}

impl<T: fmt::Display> fmt::Display for Extracted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(value) => value.fmt(f),
            Self::Unknown => f.write_str(UNKNOWN_LABEL),
        }
    }
}

impl<T: Serialize> Serialize for Extracted<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(value) => serializer.serialize_some(value),
            Self::Unknown => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Extracted<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}
