//! Display modes and refresh-rate cycling.

mod cycle;
mod mode;

pub use cycle::{candidate_rates, cycle_refresh_rate, next_refresh_rate, CycleOutcome};
pub use mode::{DisplayError, DisplayMode, DisplayModes, RefreshRateOption};
