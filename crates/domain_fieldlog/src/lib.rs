//! Field Log Domain
//!
//! Drivers record the work they do for a contact as log entries. Each entry
//! names an action, a billing unit from the action's rate table, and either
//! a quantity (bags, gallons), nothing (trips) or a start and end time
//! (hours, days). The entry's total price is computed when it is written.
//!
//! Time-based entries can be measured with a per-driver timer: starting it
//! stamps the start time and the entry picks up the stop instant as its end
//! time when none was given.

pub mod pricing;
pub mod timer;
pub mod log;
pub mod error;
pub mod ports;
pub mod service;

pub use pricing::{LogDuration, LogPriceEngine, LogPricingInput, parse_quantity};
pub use timer::{TimerService, TimerState, TimerStop};
pub use log::{DriverLog, LogEntryRequest, LogRefs};
pub use error::FieldLogError;
pub use ports::{LogPort, LogQuery};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockLogPort;
pub use service::DriverLogService;
