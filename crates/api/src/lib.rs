//! Flowboard API - command and query interface for canvas operations.
//!
//! This crate defines the typed command language for driving a [`Canvas`]
//! without a pointer or keyboard. Commands represent user intent and are:
//! - Serializable (for recording, scripting, tests)
//! - Intent-based (what the user did, not how the canvas reacts)
//!
//! # Example
//! ```ignore
//! use api::{Command, NodeRef, execute_command};
//!
//! let cmd = Command::Connect {
//!     source: NodeRef::Label("Webhook".into()),
//!     target: NodeRef::Label("Send Email".into()),
//! };
//! let result = execute_command(&mut canvas, cmd);
//! ```
//!
//! [`Canvas`]: canvas::Canvas

mod command;
mod executor;
mod query;
mod target;

pub use command::*;
pub use executor::{execute_command, execute_query, process_message};
pub use query::*;
pub use target::*;
