//! Core types: the state enumeration, configuration, and errors.

pub mod config;
pub mod errors;
pub mod states;
