//! Contract ABI binding.
//!
//! The voting contract's interface is declared once in Solidity syntax and
//! expanded by `alloy-sol-types` into call and event types with their exact
//! selectors. This crate adds what the client needs around them: conversion
//! into client types, typed event lookup in receipt logs, and revert decoding.
//!
//! Malformed data from a mismatched contract surfaces as an [`AbiError`],
//! never a panic.

pub mod call;
pub mod contract;
pub mod convert;
pub mod error;
pub mod log;

pub use alloy_primitives::U256;
pub use alloy_sol_types::{SolCall, SolEvent, SolValue};

pub use call::{decode_returns, decode_revert_reason};
pub use contract::IVotingSystem;
pub use convert::{from_sol_address, from_sol_addresses, narrow_u64, to_sol_address, uint};
pub use error::AbiError;
pub use log::{find_event, Log};
