//! Working table of a document's temporal expressions.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use heart_core::models::{EntityId, Span, TimexType};
use heart_core::AnnotationGraph;

/// One temporal expression as seen by the container passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimexRecord {
    pub id: EntityId,
    pub text: String,
    pub span: Span,
    #[serde(rename = "type")]
    pub timex_type: Option<TimexType>,
    pub value: String,
    /// Synthesized from a duration; not present in the source graph.
    pub derived: bool,
}

/// Per-document copy of every temporal expression's type and value,
/// extended with derived dates as durations get placed on the calendar.
#[derive(Debug, Clone, Default)]
pub struct TimexTable {
    records: BTreeMap<EntityId, TimexRecord>,
    /// Durations already placed on the calendar through a derived date.
    placed: BTreeSet<EntityId>,
    next_id: i64,
}

impl TimexTable {
    pub fn from_graph(graph: &AnnotationGraph) -> Self {
        let records = graph
            .nodes()
            .filter(|n| n.tag().is_timex())
            .map(|n| {
                let record = TimexRecord {
                    id: n.id(),
                    text: n.text().to_string(),
                    span: n.span(),
                    timex_type: n.timex_type(),
                    value: n.value().to_string(),
                    derived: false,
                };
                (n.id(), record)
            })
            .collect();
        Self {
            records,
            placed: BTreeSet::new(),
            next_id: graph.max_entity_id().0.max(0) + 1,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&TimexRecord> {
        self.records.get(&id)
    }

    pub fn records(&self) -> impl Iterator<Item = &TimexRecord> {
        self.records.values()
    }

    /// Normalized value; empty for unknown identities and missing values.
    pub fn value(&self, id: EntityId) -> &str {
        self.records.get(&id).map_or("", |r| r.value.as_str())
    }

    pub fn timex_type(&self, id: EntityId) -> Option<TimexType> {
        self.records.get(&id).and_then(|r| r.timex_type)
    }

    pub fn is_derived(&self, id: EntityId) -> bool {
        self.records.get(&id).is_some_and(|r| r.derived)
    }

    pub fn is_placed(&self, id: EntityId) -> bool {
        self.placed.contains(&id)
    }

    pub(crate) fn mark_placed(&mut self, id: EntityId) {
        self.placed.insert(id);
    }

    pub(crate) fn set_value(&mut self, id: EntityId, value: String) {
        if let Some(record) = self.records.get_mut(&id) {
            record.value = value;
        }
    }

    /// Add a derived DATE whose text is its value. Identities are minted
    /// above every identity in the source document.
    pub(crate) fn mint_derived(&mut self, value: String) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.records.insert(
            id,
            TimexRecord {
                id,
                text: value.clone(),
                span: Span::SENTINEL,
                timex_type: Some(TimexType::Date),
                value,
                derived: true,
            },
        );
        id
    }

    /// Text-order key: source expressions by span start then identity,
    /// derived dates after all of them.
    pub fn order_key(&self, id: EntityId) -> (bool, i64, EntityId) {
        match self.records.get(&id) {
            Some(r) => (r.derived, r.span.start, id),
            None => (true, i64::MAX, id),
        }
    }
}
