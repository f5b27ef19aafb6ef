use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Query parameters in arrival order per key.
pub type QueryParameters = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    /// `scheme://host/path`, query stripped.
    pub url: String,
    pub parameters: Option<QueryParameters>,
    pub body: Option<Value>,
    pub headers: Option<Map<String, Value>>,
    pub http_method: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Option<String>,
    pub headers: Option<Map<String, Value>>,
}

/// One request/response exchange and the records it produced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamReadPage {
    pub records: Vec<Map<String, Value>>,
    pub request: Option<HttpRequest>,
    pub response: Option<HttpResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceDescriptor {
    pub start_datetime: Option<String>,
    pub list_item: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamReadSlice {
    pub pages: Vec<StreamReadPage>,
    pub slice_descriptor: Option<SliceDescriptor>,
    /// Always empty: test reads run without incremental state.
    pub state: Option<Map<String, Value>>,
}

impl StreamReadSlice {
    pub fn record_count(&self) -> usize {
        self.pages.iter().map(|p| p.records.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub message: String,
}

/// Result of a test read, serialized as-is to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamRead {
    pub logs: Vec<LogLine>,
    pub slices: Vec<StreamReadSlice>,
    pub test_read_limit_reached: bool,
    pub inferred_schema: Option<Value>,
}

impl StreamRead {
    pub fn record_count(&self) -> usize {
        self.slices.iter().map(StreamReadSlice::record_count).sum()
    }

    pub fn page_count(&self) -> usize {
        self.slices.iter().map(|s| s.pages.len()).sum()
    }
}
