//! Cadence CLI - library management from the terminal
//!
//! The binary is a thin shell over [`commands`]; configuration lives in
//! [`config`].

pub mod commands;
pub mod config;
