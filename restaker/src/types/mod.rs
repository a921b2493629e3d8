pub mod constant;
pub mod mode;
pub mod policy;
pub mod result;
pub mod snapshot;
pub mod step;
pub mod units;

pub use mode::Mode;
pub use policy::Policy;
pub use result::{FailureKind, RunResult, RunStatus, StepEstimate, StepFailure};
pub use snapshot::{LockPosition, StakeSnapshot, VestingStatus};
pub use step::TxStep;
