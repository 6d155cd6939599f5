//! Time containers: clusters of temporal expressions (and the entities
//! anchored to them) believed to denote one point in time.

mod builder;
mod draft;
mod split;

use std::collections::BTreeSet;

use serde::Serialize;

use heart_core::models::EntityId;

pub use builder::ContainerBuilder;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeContainer {
    /// Representative temporal expression.
    pub head: EntityId,
    /// Anchor members: temporal expressions that are not attached values.
    pub t_ents: BTreeSet<EntityId>,
    /// Everything else: anchored entities and value-attached expressions.
    pub b_ents: BTreeSet<EntityId>,
    /// Members disagree on their date and must be partitioned.
    pub splittable: bool,
}

impl TimeContainer {
    pub fn contains(&self, id: EntityId) -> bool {
        self.t_ents.contains(&id) || self.b_ents.contains(&id)
    }

    pub fn members(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.t_ents.iter().chain(self.b_ents.iter()).copied()
    }

    pub fn len(&self) -> usize {
        self.t_ents.len() + self.b_ents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
