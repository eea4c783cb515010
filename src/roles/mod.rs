//! Capability contracts for the four pipeline stages plus the optional
//! display step
//!
//! Each role is a trait whose methods all have defaults. The `Base*` structs
//! implement a role using only those defaults and stand in for any role a
//! deployment leaves unconfigured.

pub mod data;
pub mod delivery;
pub mod display;
pub mod input;
pub mod output;

pub use data::{BaseData, Data};
pub use delivery::{BaseDelivery, Delivery};
pub use display::{BaseDisplay, Display};
pub use input::{BaseInput, Input};
pub use output::{BaseOutput, Output};
