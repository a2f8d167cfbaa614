//! Core donation logic: splitting, daily aggregation and the payment contract

pub mod aggregate;
pub mod config;
pub mod error;
pub mod log;
pub mod money;
pub mod payment;
pub mod records;
pub mod split;
