pub mod aggregate;
pub mod driver;
pub mod params;
pub mod period_state;
pub mod round;
pub mod rounds;

pub use aggregate::aggregate;
pub use driver::PeriodDriver;
pub use params::ConsensusParams;
pub use period_state::{PeriodState, PeriodStateUpdate};
pub use round::RoundId;
pub use rounds::Round;
