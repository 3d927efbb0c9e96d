//! Commands exchanged between supervisors.
//!
//! The union is closed: every variant has its own payload struct and the wire
//! form names the variant through the `commandType` field, which is read before
//! anything else in [`decode_command`].

mod codec;
pub use codec::{DISCRIMINATOR, decode_command, encode_command, read_command_type};

mod envelope;
pub use envelope::{CommandEnvelope, ErrorKind};

mod error;
pub use error::ProtocolError;

mod types;
pub use types::{CommandType, ExecutorCommand, StartTaskCommand, TaskCommand};
