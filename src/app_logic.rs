/*
 * This module provides the application logic layer: `DataGeneratorLogic`
 * owns the session state and drives the core, and `shell` exposes it as an
 * interactive command loop. Unit tests for `DataGeneratorLogic` are in
 * `handler_tests.rs`.
 */
pub mod handler;
pub mod shell;


pub use handler::DataGeneratorLogic;
