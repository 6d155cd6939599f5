//! Document builders shared by the workspace's tests.
//!
//! `DocBuilder` lays entity texts out one after another, separated by a
//! space, so spans always index into the generated source text.

use heart_core::models::{attr, DocumentSnapshot, Entity, EntityId, RelationType, Span, Tag};
use heart_core::AnnotationGraph;

#[derive(Debug, Default)]
pub struct DocBuilder {
    text: String,
    entities: Vec<Entity>,
    attributes: Vec<(EntityId, String, String)>,
    relations: Vec<(RelationType, EntityId, EntityId)>,
}

impl DocBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity whose span covers `text` at the end of the document.
    pub fn entity(mut self, id: i64, tag: Tag, text: &str) -> Self {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        let start = self.text.chars().count() as i64;
        self.text.push_str(text);
        let end = self.text.chars().count() as i64;
        self.entities.push(Entity::new(id, tag, Span::new(start, end), text));
        self
    }

    /// Append a temporal expression with its type and normalized value.
    pub fn timex(self, id: i64, text: &str, timex_type: &str, value: &str) -> Self {
        let mut builder = self.entity(id, Tag::Timex3, text);
        builder.attributes.push((EntityId(id), attr::TIMEX_TYPE.to_string(), timex_type.to_string()));
        if !value.is_empty() {
            builder.attributes.push((EntityId(id), attr::VALUE.to_string(), value.to_string()));
        }
        builder
    }

    pub fn attr(mut self, id: i64, name: &str, value: &str) -> Self {
        self.attributes.push((EntityId(id), name.to_string(), value.to_string()));
        self
    }

    pub fn rel(mut self, rel_type: RelationType, source: i64, target: i64) -> Self {
        self.relations.push((rel_type, EntityId(source), EntityId(target)));
        self
    }

    /// Build the graph in insertion order. Panics on inconsistent input,
    /// which is a bug in the test itself.
    pub fn build(self) -> AnnotationGraph {
        let mut graph = AnnotationGraph::new(format!("{}\n", self.text));
        for entity in self.entities {
            graph.add_entity(entity).expect("duplicate fixture entity");
        }
        for (id, name, value) in self.attributes {
            graph.set_attribute(id, &name, value).expect("fixture attribute target");
        }
        for (rel_type, source, target) in self.relations {
            graph.add_relation(rel_type, source, target).expect("fixture relation endpoint");
        }
        graph
    }

    pub fn snapshot(self) -> DocumentSnapshot {
        self.build().to_snapshot()
    }
}

/// A short admission note: an explicit admission date, a symptom anchored to
/// it, an omitted anchor, a lab key/value pair, a dated follow-up and an
/// undated expression ordered only qualitatively.
///
/// Source text: `2014-03-20 fever cough WBC 12000 two weeks later 2014-04-03 rash recovered`
pub fn admission_note() -> AnnotationGraph {
    DocBuilder::new()
        .timex(1, "2014-03-20", "DATE", "2014-03-20")
        .entity(2, Tag::Disease, "fever")
        .entity(3, Tag::Disease, "cough")
        .entity(4, Tag::TestKey, "WBC")
        .entity(5, Tag::TestVal, "12000")
        .timex(6, "two weeks later", "DURATION", "P2W")
        .timex(7, "2014-04-03", "DATE", "2014-04-03")
        .entity(8, Tag::Disease, "rash")
        .timex(9, "recovered", "DATE", "")
        .attr(2, attr::CERTAINTY, "positive")
        .attr(3, attr::CERTAINTY, "positive")
        .attr(8, attr::CERTAINTY, "negative")
        .rel(RelationType::On, 2, 1)
        .rel(RelationType::On, 8, 7)
        .rel(RelationType::After, 9, 7)
        .build()
}

/// Two explicit dates with anatomy, a change comparison and an orphan entity.
///
/// Source text: `2015-01-10 liver mass increased 2015-06-01 lung nodule ascites cyst`
pub fn imaging_report() -> AnnotationGraph {
    DocBuilder::new()
        .timex(1, "2015-01-10", "DATE", "2015-01-10")
        .entity(2, Tag::Anatomical, "liver")
        .entity(3, Tag::Disease, "mass")
        .entity(4, Tag::Change, "increased")
        .timex(5, "2015-06-01", "DATE", "2015-06-01")
        .entity(6, Tag::Anatomical, "lung")
        .entity(7, Tag::Disease, "nodule")
        .entity(8, Tag::Disease, "ascites")
        .entity(9, Tag::Disease, "cyst")
        .attr(3, attr::CERTAINTY, "positive")
        .attr(7, attr::CERTAINTY, "positive")
        .rel(RelationType::On, 3, 5)
        .rel(RelationType::Region, 2, 3)
        .rel(RelationType::Change, 4, 3)
        .rel(RelationType::Compare, 4, 1)
        .rel(RelationType::On, 7, 5)
        .rel(RelationType::Region, 6, 7)
        .rel(RelationType::On, 9, 1)
        .build()
}

/// Two undated expressions constrained by a before/after cycle.
pub fn circular_note() -> AnnotationGraph {
    DocBuilder::new()
        .timex(1, "then", "DATE", "")
        .timex(2, "later", "DATE", "")
        .entity(3, Tag::Disease, "pain")
        .entity(4, Tag::Disease, "nausea")
        .rel(RelationType::On, 3, 1)
        .rel(RelationType::On, 4, 2)
        .rel(RelationType::Before, 1, 2)
        .rel(RelationType::Before, 2, 1)
        .build()
}

/// Serialize a graph to the JSON snapshot form read by the command line.
pub fn snapshot_json(graph: &AnnotationGraph) -> String {
    graph.to_snapshot().to_json().unwrap_or_default()
}
