//! Keluarga Sehat admin back-office for the terminal.
//!
//! Every command drives the same controllers a web view would, against a live
//! API, with the login session kept in a JSON file.

pub mod cli;
pub mod commands;
