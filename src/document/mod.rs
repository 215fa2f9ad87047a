//! Financial document construction, totals computation, and orchestration

pub mod builder;
pub mod pipeline;
pub mod totals;

pub use builder::*;
pub use pipeline::*;
pub use totals::*;
