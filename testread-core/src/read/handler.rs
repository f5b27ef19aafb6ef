use crate::conf::ReaderConfig;
use crate::protocol::Message;
use crate::read::error::ReadError;
use crate::read::grouper::{MessageGroup, MessageGrouper};
use crate::read::limits::{has_reached_limit, resolve_record_limit};
use crate::read::request::StreamReadRequest;
use crate::read::types::StreamRead;
use crate::schema::{SchemaAccumulator, SchemaInferrer};
use tracing::{error, info, info_span};

/// Runs test reads against a fixed set of ceilings.
#[derive(Debug, Clone)]
pub struct StreamReadHandler {
    max_pages_per_slice: usize,
    max_slices: usize,
    max_record_limit: usize,
}

impl StreamReadHandler {
    pub fn new(config: &ReaderConfig) -> Self {
        Self {
            max_pages_per_slice: config.max_pages_per_slice,
            max_slices: config.max_slices,
            max_record_limit: config.max_record_limit,
        }
    }

    pub fn read_stream<I>(
        &self,
        messages: I,
        request: &StreamReadRequest,
    ) -> Result<StreamRead, ReadError>
    where
        I: IntoIterator<Item = Message>,
    {
        let mut inferrer = SchemaInferrer::default();
        self.read_stream_with(messages, request, &mut inferrer)
    }

    /// Same as [`read_stream`](Self::read_stream), with a caller-owned schema
    /// accumulator.
    pub fn read_stream_with<I, S>(
        &self,
        messages: I,
        request: &StreamReadRequest,
        schema: &mut S,
    ) -> Result<StreamRead, ReadError>
    where
        I: IntoIterator<Item = Message>,
        S: SchemaAccumulator + ?Sized,
    {
        let record_limit = resolve_record_limit(request.record_limit, self.max_record_limit)?;
        let span = info_span!("stream_read", stream = %request.stream, record_limit);

        let mut logs = Vec::new();
        let mut slices = Vec::new();

        let grouper =
            MessageGrouper::new(messages.into_iter(), schema, record_limit, span.clone());
        for group in grouper {
            let group = group.inspect_err(|e| {
                span.in_scope(|| error!(error = %e, "aborting stream read"));
            })?;

            match group {
                MessageGroup::Log(line) => logs.push(line),
                MessageGroup::Slice(slice) => slices.push(slice),
            }
        }

        let test_read_limit_reached =
            has_reached_limit(&slices, self.max_slices, self.max_pages_per_slice);

        let read = StreamRead {
            logs,
            slices,
            test_read_limit_reached,
            inferred_schema: schema.stream_schema(&request.stream),
        };

        span.in_scope(|| {
            info!(
                slices = read.slices.len(),
                pages = read.page_count(),
                records = read.record_count(),
                logs = read.logs.len(),
                limit_reached = read.test_read_limit_reached,
                "stream read complete"
            )
        });

        Ok(read)
    }
}

impl Default for StreamReadHandler {
    fn default() -> Self {
        Self::new(&ReaderConfig::default())
    }
}
