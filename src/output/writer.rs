//! Message sinks

use super::message::Message;
use crate::error::{Error, Result};
use crate::schema::JsonSchema;
use crate::state::State;
use crate::types::{JsonObject, JsonValue};
use std::io::Write;

/// Destination of emitted messages
pub trait RecordSink: Send {
    /// Emit one message
    fn emit(&mut self, message: Message) -> Result<()>;

    /// Emit a stream schema
    fn emit_schema(
        &mut self,
        stream: &str,
        schema: &JsonSchema,
        key_properties: &[String],
        bookmark_properties: &[String],
    ) -> Result<()> {
        self.emit(Message::Schema {
            stream: stream.to_string(),
            schema: schema.to_json(),
            key_properties: key_properties.to_vec(),
            bookmark_properties: bookmark_properties.to_vec(),
        })
    }

    /// Emit a record
    fn emit_record(
        &mut self,
        stream: &str,
        record: JsonObject,
        time_extracted: Option<&str>,
    ) -> Result<()> {
        self.emit(Message::Record {
            stream: stream.to_string(),
            record,
            time_extracted: time_extracted.map(str::to_string),
        })
    }

    /// Emit the full state
    fn emit_state(&mut self, state: &State) -> Result<()> {
        let value = serde_json::to_value(state)?;
        self.emit(Message::State { value })
    }
}

/// Writes messages as JSON lines
#[derive(Debug)]
pub struct SingerWriter<W: Write> {
    out: W,
}

impl<W: Write> SingerWriter<W> {
    /// Create a writer over `out`
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the writer, returning the underlying output
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl SingerWriter<std::io::Stdout> {
    /// Writer on standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> RecordSink for SingerWriter<W> {
    fn emit(&mut self, message: Message) -> Result<()> {
        let is_state = matches!(message, Message::State { .. });
        serde_json::to_writer(&mut self.out, &message)?;
        self.out.write_all(b"\n")?;
        // State must reach the target before the next record is produced
        if is_state {
            self.out.flush().map_err(|e| Error::output(format!("flush failed: {e}")))?;
        }
        Ok(())
    }
}

/// Collects messages in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    messages: Vec<Message>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in emission order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Records of a stream
    pub fn records(&self, stream: &str) -> Vec<&JsonObject> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::Record {
                    stream: s, record, ..
                } if s == stream => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Every emitted state value
    pub fn states(&self) -> Vec<&JsonValue> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::State { value } => Some(value),
                _ => None,
            })
            .collect()
    }

    /// Last emitted state value
    pub fn last_state(&self) -> Option<&JsonValue> {
        self.states().pop()
    }
}

impl RecordSink for MemorySink {
    fn emit(&mut self, message: Message) -> Result<()> {
        self.messages.push(message);
        Ok(())
    }
}
