pub mod contract;
mod error;
mod integration_tests;
pub mod msg;
pub mod registry;
pub mod state;

pub use crate::error::ContractError;
