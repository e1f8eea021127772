//! Connection rules and pluggable parameter validation.

mod connection;
mod params;

pub use connection::{CapacityLimit, ConnectionRules, can_connect, default_capacity_limits};
pub use params::{CustomCalculationValidator, ParamsValidator, ValidatorRegistry};
