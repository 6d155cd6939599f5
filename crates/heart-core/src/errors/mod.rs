mod graph_error;
mod heart_error;
mod temporal_error;

pub use graph_error::GraphError;
pub use heart_error::{HeartError, HeartResult};
pub use temporal_error::TemporalError;
