//! Message grouping.
//!
//! A connector under test writes a flat stream. For every HTTP exchange it
//! emits a `request:` log, then a `response:` log, then the records that
//! response produced. A `slice:` log opens the next slice. Anything else is a
//! plain diagnostic line.
//!
//! ```text
//! LOG    "request: {...}"     -> opens page 1
//! LOG    "response: {...}"
//! RECORD {...}                -> page 1
//! LOG    "request: {...}"     -> closes page 1, opens page 2
//! LOG    "response: {...}"
//! LOG    "slice: {...}"       -> closes page 2, yields slice 1
//! LOG    "request: {...}"     -> opens page 1 of slice 2
//! ```
//!
//! [`MessageGrouper`] rebuilds that nesting in a single forward pass, looking
//! only at the current message. Plain log lines are yielded as soon as they are
//! seen; slices are yielded when the next one starts and once more at the end.
//! A `slice:` marker with no open page closes nothing and is yielded as a plain
//! line.

use crate::protocol::{LogMessage, Message, RecordMessage};
use crate::read::error::{PageField, ReadError};
use crate::read::http_log::{
    PayloadError, REQUEST_PREFIX, RESPONSE_PREFIX, SLICE_PREFIX, parse_request, parse_response,
    parse_slice_descriptor,
};
use crate::read::types::{
    HttpRequest, HttpResponse, LogLine, SliceDescriptor, StreamReadPage, StreamReadSlice,
};
use crate::schema::SchemaAccumulator;
use serde_json::{Map, Value};
use std::mem;
use tracing::{Span, debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum MessageGroup {
    Log(LogLine),
    Slice(StreamReadSlice),
}

//-----------------------------------------------------------------------------
// Grouping state
//-----------------------------------------------------------------------------

/// What the open page knows about its request or response.
#[derive(Debug)]
enum Exchange<T> {
    /// No marker seen yet.
    Absent,
    /// Marker seen, payload unusable.
    Malformed,
    Parsed(T),
}

impl<T> Default for Exchange<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Exchange<T> {
    fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    fn into_option(self) -> Option<T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Absent | Self::Malformed => None,
        }
    }
}

#[derive(Debug, Default)]
struct GroupingState {
    in_page: bool,
    request: Exchange<HttpRequest>,
    response: Exchange<HttpResponse>,
    page_records: Vec<Map<String, Value>>,
    slice_pages: Vec<StreamReadPage>,
    slice_descriptor: Option<SliceDescriptor>,
    records_count: usize,
}

impl GroupingState {
    fn has_pending_page(&self) -> bool {
        !self.request.is_absent() || !self.response.is_absent() || !self.page_records.is_empty()
    }

    /// Moves the open page into the current slice.
    fn close_page(&mut self) -> Result<(), ReadError> {
        let page = self.slice_pages.len() + 1;
        let request = mem::take(&mut self.request);
        let response = mem::take(&mut self.response);

        if request.is_absent() {
            return Err(ReadError::missing(PageField::Request, page));
        }
        if response.is_absent() {
            return Err(ReadError::missing(PageField::Response, page));
        }

        self.slice_pages.push(StreamReadPage {
            records: mem::take(&mut self.page_records),
            request: request.into_option(),
            response: response.into_option(),
        });
        Ok(())
    }

    fn take_slice(&mut self) -> StreamReadSlice {
        StreamReadSlice {
            pages: mem::take(&mut self.slice_pages),
            slice_descriptor: self.slice_descriptor.take(),
            state: None,
        }
    }
}

//-----------------------------------------------------------------------------
// Grouper
//-----------------------------------------------------------------------------

/// Pull-based grouping over a message stream.
///
/// Yields plain log lines and completed slices in order. Stops once `limit`
/// records have been consumed or the input runs dry, then yields the final
/// slice (possibly empty). After an error, or after the final slice, it only
/// returns `None`.
pub struct MessageGrouper<'a, I, S: ?Sized> {
    messages: I,
    schema: &'a mut S,
    limit: usize,
    state: GroupingState,
    span: Span,
    done: bool,
}

impl<'a, I, S> MessageGrouper<'a, I, S>
where
    I: Iterator<Item = Message>,
    S: SchemaAccumulator + ?Sized,
{
    /// `span` scopes every diagnostic the grouper emits to this read.
    pub fn new(messages: I, schema: &'a mut S, limit: usize, span: Span) -> Self {
        Self {
            messages,
            schema,
            limit,
            state: GroupingState::default(),
            span,
            done: false,
        }
    }

    pub fn records_count(&self) -> usize {
        self.state.records_count
    }

    fn step(&mut self, message: Message) -> Result<Option<MessageGroup>, ReadError> {
        match message {
            Message::Log { log } => self.on_log(log),
            Message::Record { record } => {
                self.on_record(record);
                Ok(None)
            }
            Message::Other => Ok(None),
        }
    }

    fn on_log(&mut self, log: LogMessage) -> Result<Option<MessageGroup>, ReadError> {
        let text = log.message;
        let is_request = text.starts_with(REQUEST_PREFIX);
        let is_slice = text.starts_with(SLICE_PREFIX);

        if self.state.in_page && (is_request || is_slice) {
            self.state.close_page()?;
        }

        if is_slice {
            let descriptor = observe(parse_slice_descriptor(&text)).flatten();

            // No page open, so nothing to close: the marker passes through as
            // a plain line and still describes the slice being filled.
            if !self.state.in_page {
                self.state.slice_descriptor = descriptor;
                return Ok(Some(MessageGroup::Log(LogLine { message: text })));
            }

            let slice = self.state.take_slice();
            self.state.in_page = false;
            self.state.slice_descriptor = descriptor;
            debug!(pages = slice.pages.len(), "slice boundary");
            return Ok(Some(MessageGroup::Slice(slice)));
        }

        if is_request {
            self.state.in_page = true;
            self.state.request =
                observe(parse_request(&text)).map_or(Exchange::Malformed, Exchange::Parsed);
        } else if text.starts_with(RESPONSE_PREFIX) {
            self.state.response =
                observe(parse_response(&text)).map_or(Exchange::Malformed, Exchange::Parsed);
        } else {
            return Ok(Some(MessageGroup::Log(LogLine { message: text })));
        }

        Ok(None)
    }

    fn on_record(&mut self, record: RecordMessage) {
        self.schema.accumulate(&record);
        self.state.page_records.push(record.data);
        self.state.records_count += 1;
    }

    fn finish(&mut self) -> Result<MessageGroup, ReadError> {
        if self.state.has_pending_page() {
            self.state.close_page()?;
        }

        debug!(
            records = self.state.records_count,
            pages = self.state.slice_pages.len(),
            "final slice"
        );
        Ok(MessageGroup::Slice(self.state.take_slice()))
    }
}

impl<I, S> Iterator for MessageGrouper<'_, I, S>
where
    I: Iterator<Item = Message>,
    S: SchemaAccumulator + ?Sized,
{
    type Item = Result<MessageGroup, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let span = self.span.clone();
        let _entered = span.enter();

        while self.state.records_count < self.limit {
            let Some(message) = self.messages.next() else {
                break;
            };

            match self.step(message) {
                Ok(Some(group)) => return Some(Ok(group)),
                Ok(None) => {}
                Err(error) => {
                    self.done = true;
                    return Some(Err(error));
                }
            }
        }

        self.done = true;
        Some(self.finish())
    }
}

/// Logs a payload that failed to parse and carries on without it.
fn observe<T>(parsed: Result<T, PayloadError>) -> Option<T> {
    parsed
        .inspect_err(|error| warn!(%error, "ignoring malformed log payload"))
        .ok()
}
