//! Background workers

pub mod core;
pub mod inbox;
pub mod provisioner;
