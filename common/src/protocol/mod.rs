mod message;
mod transport;

pub use message::{Message, ProtocolError, decode, encode};
pub use transport::{DEFAULT_MAX_LINE_BYTES, LineReader, write_line, write_message};
