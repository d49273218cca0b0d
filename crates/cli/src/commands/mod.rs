//! CLI Commands

pub mod call;
pub mod config;
pub mod tools;
