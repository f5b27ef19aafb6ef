use crate::read::error::ReadError;
use crate::read::types::StreamReadSlice;

pub const MIN_RECORD_LIMIT: usize = 1;
pub const MAX_RECORD_LIMIT: usize = 1000;

/// Whether the assembled read hit the slice ceiling or any slice hit the page
/// ceiling. Evaluated after the fact; neither ceiling stops the read itself.
pub fn has_reached_limit(
    slices: &[StreamReadSlice],
    max_slices: usize,
    max_pages_per_slice: usize,
) -> bool {
    if slices.len() >= max_slices {
        return true;
    }

    slices
        .iter()
        .any(|slice| slice.pages.len() >= max_pages_per_slice)
}

pub fn validate_record_limit(limit: usize) -> Result<usize, ReadError> {
    if !(MIN_RECORD_LIMIT..=MAX_RECORD_LIMIT).contains(&limit) {
        return Err(ReadError::InvalidRecordLimit {
            limit,
            min: MIN_RECORD_LIMIT,
            max: MAX_RECORD_LIMIT,
        });
    }
    Ok(limit)
}

/// Effective record budget for one read.
///
/// A requested limit is validated, then clamped down to the handler maximum.
/// No request means the handler maximum.
pub fn resolve_record_limit(
    requested: Option<usize>,
    max_record_limit: usize,
) -> Result<usize, ReadError> {
    match requested {
        None => Ok(max_record_limit),
        Some(limit) => Ok(validate_record_limit(limit)?.min(max_record_limit)),
    }
}
