//! Output module
//!
//! Messages go to a `RecordSink`: `SingerWriter` writes them as JSON lines
//! (normally to stdout), `MemorySink` keeps them for inspection.

mod message;
mod writer;

pub use message::Message;
pub use writer::{MemorySink, RecordSink, SingerWriter};
