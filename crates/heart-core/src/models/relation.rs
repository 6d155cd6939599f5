//! Relation types and the Relation value object.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::EntityId;

/// Closed set of relation types.
///
/// Input names written by older annotation schemes (`timeOn`, `finish`, ...)
/// are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    #[serde(alias = "timeOn")]
    On,
    #[serde(alias = "timeBefore")]
    Before,
    #[serde(alias = "timeAfter")]
    After,
    #[serde(alias = "timeStart")]
    Start,
    #[serde(alias = "timeEnd", alias = "finish")]
    End,
    Change,
    Compare,
    Feature,
    Region,
    Value,
    Pending,
}

impl RelationType {
    /// Qualitative ordering relations: everything temporal except "on".
    pub const QUALITATIVE: [RelationType; 4] = [
        RelationType::Before,
        RelationType::After,
        RelationType::Start,
        RelationType::End,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::On => "on",
            RelationType::Before => "before",
            RelationType::After => "after",
            RelationType::Start => "start",
            RelationType::End => "end",
            RelationType::Change => "change",
            RelationType::Compare => "compare",
            RelationType::Feature => "feature",
            RelationType::Region => "region",
            RelationType::Value => "value",
            RelationType::Pending => "pending",
        }
    }

    pub fn from_str_name(name: &str) -> Option<RelationType> {
        let rel = match name {
            "on" | "timeOn" => RelationType::On,
            "before" | "timeBefore" => RelationType::Before,
            "after" | "timeAfter" => RelationType::After,
            "start" | "timeStart" => RelationType::Start,
            "end" | "timeEnd" | "finish" => RelationType::End,
            "change" => RelationType::Change,
            "compare" => RelationType::Compare,
            "feature" => RelationType::Feature,
            "region" => RelationType::Region,
            "value" => RelationType::Value,
            "pending" => RelationType::Pending,
            _ => return None,
        };
        Some(rel)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            RelationType::On
                | RelationType::Before
                | RelationType::After
                | RelationType::Start
                | RelationType::End
        )
    }

    pub fn is_qualitative(&self) -> bool {
        self.is_temporal() && *self != RelationType::On
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed directed edge. Equal when type, source and target match,
/// regardless of identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relation {
    pub id: u32,
    #[serde(rename = "type")]
    pub rel_type: RelationType,
    pub source: EntityId,
    pub target: EntityId,
}

impl Relation {
    pub fn new(id: u32, rel_type: RelationType, source: EntityId, target: EntityId) -> Self {
        Self {
            id,
            rel_type,
            source,
            target,
        }
    }

    pub fn key(&self) -> (RelationType, EntityId, EntityId) {
        (self.rel_type, self.source, self.target)
    }
}

impl PartialEq for Relation {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Relation {}

impl Hash for Relation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn relations_compare_by_type_and_endpoints() {
        let a = Relation::new(1, RelationType::On, EntityId(3), EntityId(4));
        let b = Relation::new(9, RelationType::On, EntityId(3), EntityId(4));
        let c = Relation::new(1, RelationType::Before, EntityId(3), EntityId(4));
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Relation> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn legacy_names_are_accepted() {
        let rel: RelationType = serde_json::from_str("\"timeBefore\"").unwrap();
        assert_eq!(rel, RelationType::Before);
        let rel: RelationType = serde_json::from_str("\"finish\"").unwrap();
        assert_eq!(rel, RelationType::End);
        assert_eq!(RelationType::from_str_name("timeOn"), Some(RelationType::On));
        assert_eq!(RelationType::from_str_name("omit"), None);
    }

    #[test]
    fn on_is_temporal_but_not_qualitative() {
        assert!(RelationType::On.is_temporal());
        assert!(!RelationType::On.is_qualitative());
        assert!(RelationType::End.is_qualitative());
        assert!(!RelationType::Region.is_temporal());
    }
}
