//! Containers under construction: member classification, value
//! normalization and head selection.

use std::collections::{BTreeMap, BTreeSet};

use heart_core::errors::TemporalError;
use heart_core::models::{EntityId, RelationType, TimexType};
use heart_core::{AnnotationGraph, HeartResult};

use crate::patterns::{find_date, pad_partial_date, starts_with_date};
use crate::table::TimexTable;

use super::TimeContainer;

#[derive(Debug, Clone, Default)]
pub(crate) struct ContainerDraft {
    pub t_ents: BTreeSet<EntityId>,
    pub b_ents: BTreeSet<EntityId>,
    pub splittable: bool,
}

impl From<&TimeContainer> for ContainerDraft {
    fn from(tc: &TimeContainer) -> Self {
        Self {
            t_ents: tc.t_ents.clone(),
            b_ents: tc.b_ents.clone(),
            splittable: tc.splittable,
        }
    }
}

impl ContainerDraft {
    pub fn contains(&self, id: EntityId) -> bool {
        self.t_ents.contains(&id) || self.b_ents.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.t_ents.is_empty() && self.b_ents.is_empty()
    }

    pub fn members(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.t_ents.iter().chain(self.b_ents.iter()).copied()
    }

    /// Place an entity on the anchor or non-anchor side.
    ///
    /// A temporal expression that is the target of a "value" relation is
    /// an attached value, not an independent anchor.
    pub fn add(&mut self, id: EntityId, graph: &AnnotationGraph, table: &TimexTable) {
        let is_anchor =
            table.is_derived(id) || (table.contains(id) && graph.sources(id, RelationType::Value).next().is_none());
        if is_anchor {
            self.t_ents.insert(id);
        } else {
            self.b_ents.insert(id);
        }
    }

    fn members_of_type(&self, table: &TimexTable, ty: TimexType) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .t_ents
            .iter()
            .copied()
            .filter(|&id| table.timex_type(id) == Some(ty))
            .collect();
        ids.sort_by_key(|&id| table.order_key(id));
        ids
    }

    /// Reconcile the anchor members' values.
    ///
    /// More than one distinct date marks the draft splittable. A single date
    /// is written onto every TIME member, unless a DURATION member not yet
    /// placed on the calendar is present, in which case the draft is
    /// splittable instead.
    pub fn normalize(&mut self, table: &mut TimexTable) {
        let mut dates = BTreeSet::new();
        for id in self.members_of_type(table, TimexType::Date) {
            let value = table.value(id);
            if let Some(date) = find_date(value) {
                dates.insert(date.to_string());
            } else if let Some(padded) = pad_partial_date(value) {
                dates.insert(padded.clone());
                table.set_value(id, padded);
            }
        }

        if dates.len() > 1 {
            self.splittable = true;
            return;
        }
        let Some(date) = dates.pop_first() else {
            return;
        };
        let unplaced = self
            .members_of_type(table, TimexType::Duration)
            .into_iter()
            .any(|id| !table.is_placed(id));
        if unplaced {
            self.splittable = true;
            return;
        }
        for id in self.members_of_type(table, TimexType::Time) {
            let value = table.value(id);
            if value.is_empty() {
                continue;
            }
            let time = value.split_once('T').map_or(value, |(_, t)| t);
            let dated = format!("{date}T{time}");
            table.set_value(id, dated);
        }
    }

    /// Anchor members grouped by the date their value carries. DATE and
    /// TIME members only; undated members are left out.
    pub fn dated_groups(&self, table: &TimexTable) -> BTreeMap<String, Vec<EntityId>> {
        let mut groups: BTreeMap<String, Vec<EntityId>> = BTreeMap::new();
        let mut datetimes: Vec<EntityId> = self
            .t_ents
            .iter()
            .copied()
            .filter(|&id| table.timex_type(id).is_some_and(|t| t.is_calendar()))
            .collect();
        datetimes.sort_by_key(|&id| table.order_key(id));
        for id in datetimes {
            if let Some(date) = find_date(table.value(id)) {
                groups.entry(date.to_string()).or_default().push(id);
            }
        }
        groups
    }

    /// Pick the representative temporal expression.
    ///
    /// In text order: the first DATE/TIME anchor whose value starts with a
    /// date, else the first DATE/TIME anchor, else any anchor, else a
    /// value-attached expression.
    pub fn select_head(&self, table: &TimexTable) -> HeartResult<EntityId> {
        let mut anchors: Vec<EntityId> = self.t_ents.iter().copied().collect();
        anchors.sort_by_key(|&id| table.order_key(id));
        let datetimes: Vec<EntityId> = anchors
            .iter()
            .copied()
            .filter(|&id| table.timex_type(id).is_some_and(|t| t.is_calendar()))
            .collect();

        let head = datetimes
            .iter()
            .find(|&&id| starts_with_date(table.value(id)))
            .or_else(|| datetimes.first())
            .or_else(|| anchors.first())
            .copied()
            .or_else(|| {
                let mut values: Vec<EntityId> =
                    self.b_ents.iter().copied().filter(|&id| table.contains(id)).collect();
                values.sort_by_key(|&id| table.order_key(id));
                values.first().copied()
            });

        head.ok_or_else(|| {
            TemporalError::EmptyContainer {
                members: self.members().collect(),
            }
            .into()
        })
    }

    pub fn finalize(self, table: &TimexTable, head: Option<EntityId>) -> HeartResult<TimeContainer> {
        let head = match head {
            Some(head) => head,
            None => self.select_head(table)?,
        };
        Ok(TimeContainer {
            head,
            t_ents: self.t_ents,
            b_ents: self.b_ents,
            splittable: self.splittable,
        })
    }
}

#[cfg(test)]
mod tests {
    use heart_core::errors::HeartError;
    use heart_core::models::{attr, Entity, Span, Tag};

    use super::*;

    fn timex(graph: &mut AnnotationGraph, id: i64, start: i64, ty: &str, value: &str) {
        graph
            .add_entity(Entity::new(id, Tag::Timex3, Span::new(start, start + 2), format!("t{id}")))
            .unwrap();
        graph.set_attribute(EntityId(id), attr::TIMEX_TYPE, ty).unwrap();
        graph.set_attribute(EntityId(id), attr::VALUE, value).unwrap();
    }

    fn draft_of(graph: &AnnotationGraph, table: &TimexTable, ids: &[i64]) -> ContainerDraft {
        let mut draft = ContainerDraft::default();
        for &id in ids {
            draft.add(EntityId(id), graph, table);
        }
        draft
    }

    #[test]
    fn single_date_is_propagated_onto_times() {
        let mut graph = AnnotationGraph::new("");
        timex(&mut graph, 1, 0, "DATE", "2014-03");
        timex(&mut graph, 2, 5, "TIME", "T10:30");
        timex(&mut graph, 3, 9, "TIME", "XXXX-XX-XXT08:00");
        let mut table = TimexTable::from_graph(&graph);
        let mut draft = draft_of(&graph, &table, &[1, 2, 3]);

        draft.normalize(&mut table);

        assert!(!draft.splittable);
        assert_eq!(table.value(EntityId(1)), "2014-03-01");
        assert_eq!(table.value(EntityId(2)), "2014-03-01T10:30");
        assert_eq!(table.value(EntityId(3)), "2014-03-01T08:00");
    }

    #[test]
    fn two_dates_or_date_with_duration_are_splittable() {
        let mut graph = AnnotationGraph::new("");
        timex(&mut graph, 1, 0, "DATE", "2014-03-20");
        timex(&mut graph, 2, 5, "DATE", "2015");
        timex(&mut graph, 3, 9, "DURATION", "P3D");
        let mut table = TimexTable::from_graph(&graph);

        let mut two_dates = draft_of(&graph, &table, &[1, 2]);
        two_dates.normalize(&mut table);
        assert!(two_dates.splittable);

        let mut with_duration = draft_of(&graph, &table, &[1, 3]);
        with_duration.normalize(&mut table);
        assert!(with_duration.splittable);
    }

    #[test]
    fn placed_duration_no_longer_marks_splittable() {
        let mut graph = AnnotationGraph::new("");
        timex(&mut graph, 1, 0, "DATE", "2014-03-20");
        timex(&mut graph, 2, 5, "DURATION", "PT10M");
        timex(&mut graph, 3, 9, "TIME", "T10:30");
        let mut table = TimexTable::from_graph(&graph);
        table.mark_placed(EntityId(2));

        let mut draft = draft_of(&graph, &table, &[1, 2, 3]);
        draft.normalize(&mut table);

        assert!(!draft.splittable);
        assert_eq!(table.value(EntityId(3)), "2014-03-20T10:30");
    }

    #[test]
    fn value_attached_expression_is_not_an_anchor() {
        let mut graph = AnnotationGraph::new("");
        timex(&mut graph, 1, 0, "DATE", "2014-03-20");
        timex(&mut graph, 2, 5, "DATE", "");
        graph.add_relation(RelationType::Value, EntityId(1), EntityId(2)).unwrap();
        let table = TimexTable::from_graph(&graph);

        let draft = draft_of(&graph, &table, &[1, 2]);

        assert_eq!(draft.t_ents, BTreeSet::from([EntityId(1)]));
        assert_eq!(draft.b_ents, BTreeSet::from([EntityId(2)]));
    }

    #[test]
    fn head_prefers_dated_then_text_order() {
        let mut graph = AnnotationGraph::new("");
        timex(&mut graph, 1, 0, "DURATION", "P1D");
        timex(&mut graph, 2, 5, "DATE", "");
        timex(&mut graph, 3, 9, "DATE", "2014-03-20");
        let table = TimexTable::from_graph(&graph);

        assert_eq!(draft_of(&graph, &table, &[1, 2, 3]).select_head(&table).unwrap(), EntityId(3));
        assert_eq!(draft_of(&graph, &table, &[1, 2]).select_head(&table).unwrap(), EntityId(2));
        assert_eq!(draft_of(&graph, &table, &[1]).select_head(&table).unwrap(), EntityId(1));
    }

    #[test]
    fn container_without_temporal_expression_is_an_error() {
        let mut graph = AnnotationGraph::new("");
        graph
            .add_entity(Entity::new(5, Tag::Disease, Span::new(0, 3), "flu"))
            .unwrap();
        let table = TimexTable::from_graph(&graph);
        let draft = draft_of(&graph, &table, &[5]);

        let err = draft.finalize(&table, None).unwrap_err();
        assert!(matches!(
            err,
            HeartError::TemporalError(TemporalError::EmptyContainer { .. })
        ));
    }
}
