pub mod config;
pub mod error;
pub mod lock;
pub mod pid;
pub mod process;
pub mod supervisor;

pub use config::Config;
pub use error::{Result, SupervisorError};
pub use pid::{PidFile, PidRecord};
pub use process::{LaunchSpec, ProcessControl, SignalError};
pub use supervisor::{StaleReason, Started, Status, StopOutcome, StopWait, Supervisor};
