mod attribution;
mod chunk;
mod metrics;
mod report;
mod sentence;
mod similarity;
mod verdict;

pub use attribution::*;
pub use chunk::*;
pub use metrics::*;
pub use report::*;
pub use sentence::*;
pub use similarity::*;
pub use verdict::*;
