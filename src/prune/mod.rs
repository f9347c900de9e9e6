//! The pruning engine: expression walker, leaf resolvers and results.

mod context;
mod eval;
mod hash;
mod options;
mod range_search;
mod request;
mod result;
mod selectivity;

pub use options::{PruneOptions, PruneOptionsBuilder};
pub use request::PruneRequest;
pub use result::{PartitionFilter, PruneResult};
