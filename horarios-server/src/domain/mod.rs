//! Domain types for the schedule proxy.
//!
//! Inbound values are validated here before anything touches the network,
//! so code that receives these types can splice them into upstream URLs and
//! form bodies as-is.

mod network;
mod station;

pub use network::{CommuterNetwork, DEFAULT_NETWORK, InvalidNetwork};
pub use station::{InvalidStation, StationCode};
