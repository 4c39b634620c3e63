pub mod config;
pub mod consensus;
pub mod error;
pub mod types;

pub use consensus::{ConsensusParams, PeriodDriver, PeriodState, Round, RoundId};
pub use error::{CoreError, CoreResult};
pub use types::{Address, Payload, PayloadContent};
