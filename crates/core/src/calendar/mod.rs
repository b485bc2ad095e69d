//! Calendar mirroring: event mapping and reconciliation.

pub mod manager;
pub mod mapper;
pub mod ports;
