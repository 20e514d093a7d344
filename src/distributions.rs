//! Table-based implementation of continuous probability distributions.

pub use tracy_widom::{Beta, TailParams, TailSide, TracyWidom, TracyWidomError};

mod tracy_widom;
