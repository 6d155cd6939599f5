//! # heart-temporal
//!
//! Clusters temporal expressions into time containers, reconciles their
//! normalized values and orders the containers chronologically.
//!
//! The source graph is never mutated here. Value fixes and derived dates live
//! in a per-document [`TimexTable`].

pub mod chronology;
pub mod containers;
pub mod duration;
pub mod patterns;
pub mod table;

pub use chronology::{ChronologicalResolver, Resolution};
pub use containers::{ContainerBuilder, TimeContainer};
pub use duration::parse_duration_value;
pub use table::{TimexRecord, TimexTable};
