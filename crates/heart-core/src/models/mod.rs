mod attribute;
mod entity;
mod relation;
mod snapshot;
mod tag;
mod timex;

pub use attribute::{attr, Attribute};
pub use entity::{Entity, EntityId, Span};
pub use relation::{Relation, RelationType};
pub use snapshot::DocumentSnapshot;
pub use tag::Tag;
pub use timex::TimexType;
