//! Closed set of entity tags.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tag {
    Disease,
    Anatomical,
    Feature,
    Change,
    #[serde(rename = "TIMEX3")]
    Timex3,
    TestTest,
    TestKey,
    TestVal,
    MedicineKey,
    MedicineVal,
    ClinicalContext,
    Remedy,
    Pending,
}

impl Tag {
    pub const ALL: [Tag; 13] = [
        Tag::Disease,
        Tag::Anatomical,
        Tag::Feature,
        Tag::Change,
        Tag::Timex3,
        Tag::TestTest,
        Tag::TestKey,
        Tag::TestVal,
        Tag::MedicineKey,
        Tag::MedicineVal,
        Tag::ClinicalContext,
        Tag::Remedy,
        Tag::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Disease => "Disease",
            Tag::Anatomical => "Anatomical",
            Tag::Feature => "Feature",
            Tag::Change => "Change",
            Tag::Timex3 => "TIMEX3",
            Tag::TestTest => "TestTest",
            Tag::TestKey => "TestKey",
            Tag::TestVal => "TestVal",
            Tag::MedicineKey => "MedicineKey",
            Tag::MedicineVal => "MedicineVal",
            Tag::ClinicalContext => "ClinicalContext",
            Tag::Remedy => "Remedy",
            Tag::Pending => "Pending",
        }
    }

    pub fn from_str_name(name: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|tag| tag.as_str() == name)
    }

    pub fn is_timex(&self) -> bool {
        matches!(self, Tag::Timex3)
    }

    /// The "value" variant paired with a "key" variant of the same family.
    pub fn value_partner(&self) -> Option<Tag> {
        match self {
            Tag::TestKey => Some(Tag::TestVal),
            Tag::MedicineKey => Some(Tag::MedicineVal),
            _ => None,
        }
    }

    /// CSS class used by the rendered-text view.
    pub fn html_class(&self) -> &'static str {
        match self {
            Tag::Disease => "disease",
            Tag::Anatomical => "anatomical",
            Tag::Feature => "feature",
            Tag::Change => "change",
            Tag::Timex3 => "TIMEX3",
            Tag::TestTest => "testtest",
            Tag::TestKey => "testkey",
            Tag::TestVal => "testval",
            Tag::MedicineKey => "medkey",
            Tag::MedicineVal => "medval",
            Tag::ClinicalContext => "cc",
            Tag::Remedy => "remedy",
            Tag::Pending => "pending",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_tags_pair_with_their_value_tags() {
        assert_eq!(Tag::TestKey.value_partner(), Some(Tag::TestVal));
        assert_eq!(Tag::MedicineKey.value_partner(), Some(Tag::MedicineVal));
        assert_eq!(Tag::TestVal.value_partner(), None);
        assert_eq!(Tag::Disease.value_partner(), None);
    }

    #[test]
    fn names_round_trip_through_lookup() {
        for tag in Tag::ALL {
            assert_eq!(Tag::from_str_name(tag.as_str()), Some(tag));
        }
        assert_eq!(Tag::from_str_name("timex3"), None);
    }

    #[test]
    fn timex_serializes_with_annotation_name() {
        let json = serde_json::to_string(&Tag::Timex3).unwrap();
        assert_eq!(json, "\"TIMEX3\"");
    }
}
