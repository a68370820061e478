use serde::{Deserialize, Serialize};

/// Key column shared by the Get and List paths.
pub const RESERVED_INSTANCE_ID: &str = "reserved_instance_id";

/// Exact-match constraint narrowing the remote query to one reservation id.
/// Passed through to the remote call; never applied client-side.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Filter(String);

impl Filter {
    pub fn reserved_instance_id(id: impl Into<String>) -> Self {
        Filter(id.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Equality quals supplied by the caller for one query.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Quals {
    pub reserved_instance_id: Option<String>,
}

impl Quals {
    pub fn with_id(id: impl Into<String>) -> Self {
        Quals {
            reserved_instance_id: Some(id.into()),
        }
    }

    /// The lookup key, when the id qual was supplied. An empty string is
    /// still a supplied key.
    pub fn key(&self) -> Option<&str> {
        self.reserved_instance_id.as_deref()
    }
}

/// Upper bound on rows emitted across one whole query.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RowCeiling(u64);

impl RowCeiling {
    pub fn new(limit: u64) -> Self {
        RowCeiling(limit)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// True once `emitted` rows satisfy the ceiling.
    pub fn reached(self, emitted: u64) -> bool {
        emitted >= self.0
    }
}

impl From<u64> for RowCeiling {
    fn from(value: u64) -> Self {
        RowCeiling(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quals_key_only_when_present() {
        assert_eq!(Quals::default().key(), None);
        assert_eq!(Quals::with_id("ri-123").key(), Some("ri-123"));
        assert_eq!(Quals::with_id("").key(), Some(""));
    }

    #[test]
    fn test_ceiling_reached() {
        let ceiling = RowCeiling::new(3);
        assert!(!ceiling.reached(2));
        assert!(ceiling.reached(3));
        assert!(RowCeiling::new(0).reached(0));
    }
}
