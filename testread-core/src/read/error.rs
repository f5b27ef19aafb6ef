use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("invalid record limit {limit}: must be between {min} and {max}")]
    InvalidRecordLimit {
        limit: usize,
        min: usize,
        max: usize,
    },

    #[error(
        "page {page} was closed without a {missing}: every message group should have at least one request and response"
    )]
    StructuralOrderingViolation { missing: PageField, page: usize },
}

impl ReadError {
    pub(crate) fn missing(missing: PageField, page: usize) -> Self {
        Self::StructuralOrderingViolation { missing, page }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageField {
    Request,
    Response,
}

impl fmt::Display for PageField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request => f.write_str("request"),
            Self::Response => f.write_str("response"),
        }
    }
}
