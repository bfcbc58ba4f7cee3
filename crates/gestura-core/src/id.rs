//! Identity types for recorded gesture examples
//!
//! Example ids are strings so augmented variants can carry their source id
//! with a suffix (`<source>-aug<n>`) and stay traceable.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CaptureTime;

/// Recorded example identity - unique within a dataset
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExampleId(pub String);

impl ExampleId {
    pub fn new(id: impl Into<String>) -> Self {
        ExampleId(id.into())
    }

    /// Create an id from a capture time and a per-dataset sequence number
    /// Format: `<millis>-<seq:06>`
    pub fn from_capture(captured_at: CaptureTime, seq: u64) -> Self {
        ExampleId(format!("{}-{:06}", captured_at.as_millis(), seq))
    }

    /// Id of the `variant`-th augmented copy of this example
    pub fn augmented(&self, variant: usize) -> Self {
        ExampleId(format!("{}-aug{}", self.0, variant))
    }

    /// Was this id derived from another example by augmentation?
    pub fn is_augmented(&self) -> bool {
        self.source().is_some()
    }

    /// Source id of an augmented example
    pub fn source(&self) -> Option<&str> {
        let (source, suffix) = self.0.rsplit_once("-aug")?;
        if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
            Some(source)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ExampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Example({})", self.0)
    }
}

impl fmt::Display for ExampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExampleId {
    fn from(s: &str) -> Self {
        ExampleId(s.to_string())
    }
}

/// Contributing user identity
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_id_from_capture() {
        let id = ExampleId::from_capture(CaptureTime::from_millis(1700), 42);
        assert_eq!(id.as_str(), "1700-000042");
        assert!(!id.is_augmented());
    }

    #[test]
    fn test_augmented_id_traceability() {
        let id = ExampleId::new("1700-000001");
        let aug = id.augmented(2);
        assert_eq!(aug.as_str(), "1700-000001-aug2");
        assert!(aug.is_augmented());
        assert_eq!(aug.source(), Some("1700-000001"));
    }

    #[test]
    fn test_non_numeric_suffix_is_not_augmented() {
        let id = ExampleId::new("custom-augment");
        assert_eq!(id.source(), None);
    }

    proptest::proptest! {
        #[test]
        fn prop_augmented_source_roundtrip(source in "[a-z0-9-]{1,24}", variant in 0usize..16) {
            let id = ExampleId::new(source.clone());
            let aug = id.augmented(variant);
            proptest::prop_assert_eq!(aug.source(), Some(source.as_str()));
        }
    }
}
