//! CLI command handlers for copilot-bridge
//!
//! Each handler wires the configuration into the engine (executor, catalog,
//! session store) and owns its output formatting. These handlers carry no
//! control-flow complexity of their own; that lives in the engine modules.

pub mod chat;
pub mod doctor;
pub mod models;
pub mod run;
