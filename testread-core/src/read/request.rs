use crate::read::error::ReadError;
use crate::read::limits::validate_record_limit;

/// Parameters of a single test read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamReadRequest {
    pub stream: String,
    pub record_limit: Option<usize>,
}

impl StreamReadRequest {
    pub fn new(stream: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            record_limit: None,
        }
    }

    pub fn with_record_limit(mut self, record_limit: usize) -> Self {
        self.record_limit = Some(record_limit);
        self
    }

    pub fn validate(&self) -> Result<(), ReadError> {
        if let Some(limit) = self.record_limit {
            validate_record_limit(limit)?;
        }
        Ok(())
    }
}
