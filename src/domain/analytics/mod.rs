pub mod catalog;
pub mod chart;
pub mod payout;
pub mod period;
pub mod service;
pub mod snapshot;
