//! Splitting containers whose members disagree on their date.

use std::collections::BTreeSet;

use heart_core::models::{EntityId, RelationType, TimexType};
use heart_core::HeartResult;

use crate::duration::{parse_base, parse_duration_value};
use crate::patterns::find_date;
use crate::table::TimexTable;

use super::builder::ContainerBuilder;
use super::draft::ContainerDraft;
use super::TimeContainer;

impl ContainerBuilder<'_> {
    /// Partition a splittable container.
    ///
    /// Several dates: one container per date, plus one for the anchors
    /// carrying none. Otherwise each duration with a dated partner is placed
    /// on the calendar once, as a derived date heading its own container, and
    /// the rest stays together. Parts are rebuilt from the container's own
    /// members only. When nothing can be split the flag is cleared.
    pub fn split(&self, tc: TimeContainer, table: &mut TimexTable) -> HeartResult<Vec<TimeContainer>> {
        let mut draft = ContainerDraft::from(&tc);
        draft.normalize(table);
        if !draft.splittable {
            return Ok(vec![tc]);
        }

        let groups = draft.dated_groups(table);
        if groups.len() > 1 {
            return self.split_by_date(&tc, groups.into_values().collect(), table);
        }

        let parts = self.split_durations(&tc, table)?;
        if parts.is_empty() {
            tracing::debug!(head = %tc.head, "nothing to split, clearing splittable flag");
            let mut tc = tc;
            tc.splittable = false;
            return Ok(vec![tc]);
        }
        Ok(parts)
    }

    fn split_by_date(
        &self,
        tc: &TimeContainer,
        groups: Vec<Vec<EntityId>>,
        table: &mut TimexTable,
    ) -> HeartResult<Vec<TimeContainer>> {
        let scope: BTreeSet<EntityId> = tc.members().collect();
        let mut claimed: BTreeSet<EntityId> = BTreeSet::new();
        let mut parts = Vec::with_capacity(groups.len() + 1);

        for (i, group) in groups.iter().enumerate() {
            // Other dates' anchors stay out so a rebuilt part cannot re-merge them.
            let mut excluded = claimed.clone();
            for (j, other) in groups.iter().enumerate() {
                if i != j {
                    excluded.extend(other.iter().copied());
                }
            }
            let mut draft = ContainerDraft::default();
            for &id in group {
                self.pull(&mut draft, id, false, &excluded, Some(&scope), table);
            }
            if draft.is_empty() {
                continue;
            }
            claimed.extend(draft.members());
            draft.normalize(table);
            parts.push(draft.finalize(table, None)?);
        }

        parts.extend(self.remainder(tc, &claimed, table)?);
        Ok(parts)
    }

    fn split_durations(&self, tc: &TimeContainer, table: &mut TimexTable) -> HeartResult<Vec<TimeContainer>> {
        let mut durations: Vec<EntityId> = tc
            .t_ents
            .iter()
            .copied()
            .filter(|&id| table.timex_type(id) == Some(TimexType::Duration) && !table.is_placed(id))
            .collect();
        durations.sort_by_key(|&id| table.order_key(id));

        let scope: BTreeSet<EntityId> = tc.members().collect();
        let mut claimed: BTreeSet<EntityId> = BTreeSet::new();
        let mut parts = Vec::new();
        for duration in durations {
            if claimed.contains(&duration) {
                continue;
            }
            let Some((rel_type, base)) = self.dated_partner(duration, tc, table) else {
                continue;
            };
            let value = parse_duration_value(table.value(duration), &base, rel_type == RelationType::End)?;
            let derived = table.mint_derived(value);
            table.mark_placed(duration);

            let mut draft = ContainerDraft::default();
            self.pull(&mut draft, duration, false, &claimed, Some(&scope), table);
            claimed.extend(draft.members());
            draft.add(derived, self.graph, table);
            parts.push(draft.finalize(table, Some(derived))?);
        }

        if parts.is_empty() {
            return Ok(parts);
        }
        parts.extend(self.remainder(tc, &claimed, table)?);
        Ok(parts)
    }

    /// The first relation from `duration` into the container's anchors whose
    /// target carries a date, with the value to compute from.
    fn dated_partner(
        &self,
        duration: EntityId,
        tc: &TimeContainer,
        table: &TimexTable,
    ) -> Option<(RelationType, String)> {
        let adjacency = self.graph.outgoing(duration)?;
        for (&rel_type, targets) in adjacency {
            let mut related: Vec<EntityId> = targets.intersection(&tc.t_ents).copied().collect();
            related.sort_by_key(|&id| table.order_key(id));
            for partner in related {
                let value = table.value(partner);
                let Some(date) = find_date(value) else {
                    continue;
                };
                let base = if parse_base(value).is_some() { value } else { date };
                return Some((rel_type, base.to_string()));
            }
        }
        None
    }

    /// Members left unclaimed by the split parts, kept together when they
    /// still hold a temporal expression.
    fn remainder(
        &self,
        tc: &TimeContainer,
        claimed: &BTreeSet<EntityId>,
        table: &mut TimexTable,
    ) -> HeartResult<Option<TimeContainer>> {
        let mut rest = ContainerDraft::default();
        for id in tc.members().filter(|id| !claimed.contains(id)) {
            rest.add(id, self.graph, table);
        }
        if !rest.members().any(|id| table.contains(id)) {
            if !rest.is_empty() {
                tracing::debug!(
                    head = %tc.head,
                    dropped = rest.members().count(),
                    "split remainder holds no temporal expression"
                );
            }
            return Ok(None);
        }
        rest.normalize(table);
        rest.finalize(table, None).map(Some)
    }
}
