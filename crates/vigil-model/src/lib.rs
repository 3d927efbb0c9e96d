//! Wire and domain types shared by every vigil crate.
//!
//! Everything here is plain data: endpoints, job descriptions, launch recipes,
//! the command union exchanged between supervisors and its JSON codec.

mod domain;
pub use domain::*;

pub mod command;
pub use command::{
    CommandEnvelope, CommandType, ErrorKind, ExecutorCommand, ProtocolError, StartTaskCommand,
    TaskCommand, decode_command, encode_command,
};
