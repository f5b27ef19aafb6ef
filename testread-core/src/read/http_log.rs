//! Payloads carried by the marker log lines a connector writes during a read.
//!
//! `request:` and `response:` lines hold the JSON of one HTTP exchange;
//! `slice:` lines open a slice and may describe it. Fields of the wrong JSON
//! shape are dropped one by one. A payload that is not a JSON object, or a
//! response without a status, is malformed as a whole.

use crate::read::types::{HttpRequest, HttpResponse, QueryParameters, SliceDescriptor};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

pub const REQUEST_PREFIX: &str = "request:";
pub const RESPONSE_PREFIX: &str = "response:";
pub const SLICE_PREFIX: &str = "slice:";

const EMPTY_RESPONSE_BODY: &str = "{}";

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("failed to parse log message into {kind} object with error: {source}")]
    Json {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("response log message has no usable status_code")]
    MissingStatus,
}

impl PayloadError {
    fn json(kind: &'static str, source: serde_json::Error) -> Self {
        Self::Json { kind, source }
    }
}

//-----------------------------------------------------------------------------
// Raw payloads
//-----------------------------------------------------------------------------

#[derive(Deserialize)]
struct RawRequest {
    #[serde(default)]
    url: Option<Value>,
    #[serde(default)]
    http_method: Option<Value>,
    #[serde(default)]
    headers: Option<Value>,
    #[serde(default)]
    body: Option<Value>,
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    status_code: Option<Value>,
    #[serde(default = "default_response_body")]
    body: Option<Value>,
    #[serde(default)]
    headers: Option<Value>,
}

fn default_response_body() -> Option<Value> {
    Some(Value::String(EMPTY_RESPONSE_BODY.to_string()))
}

#[derive(Deserialize)]
struct RawSliceDescriptor {
    #[serde(default, alias = "start_time")]
    start_datetime: Option<Value>,
    #[serde(default)]
    list_item: Option<Value>,
}

//-----------------------------------------------------------------------------
// Parsing
//-----------------------------------------------------------------------------

/// Parses a `request: {json}` log line.
///
/// The URL is split into `scheme://host/path` and its query parameters. Port,
/// credentials and fragment are dropped along with the query. A missing or
/// unparsable URL leaves an empty `url` with no parameters.
pub fn parse_request(text: &str) -> Result<HttpRequest, PayloadError> {
    let raw: RawRequest = parse_object(payload(text, REQUEST_PREFIX), "request")?;

    let (url, parameters) = raw
        .url
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|u| Url::parse(u).ok())
        .map(|u| split_url(&u))
        .unwrap_or_default();

    Ok(HttpRequest {
        url,
        parameters,
        body: raw.body,
        headers: raw.headers.and_then(into_object),
        http_method: raw
            .http_method
            .and_then(|m| m.as_str().map(str::to_owned))
            .unwrap_or_default(),
    })
}

/// Parses a `response: {json}` log line.
///
/// An absent `body` becomes the literal `"{}"`; an explicit `null` stays absent.
pub fn parse_response(text: &str) -> Result<HttpResponse, PayloadError> {
    let raw: RawResponse = parse_object(payload(text, RESPONSE_PREFIX), "response")?;

    let status = raw
        .status_code
        .as_ref()
        .and_then(Value::as_u64)
        .and_then(|code| u16::try_from(code).ok())
        .ok_or(PayloadError::MissingStatus)?;

    Ok(HttpResponse {
        status,
        body: raw.body.map(into_text),
        headers: raw.headers.and_then(into_object),
    })
}

/// Parses the optional payload of a `slice:` marker.
///
/// Returns `Ok(None)` when the marker carries nothing that describes the slice.
pub fn parse_slice_descriptor(text: &str) -> Result<Option<SliceDescriptor>, PayloadError> {
    let raw = payload(text, SLICE_PREFIX).trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let raw: RawSliceDescriptor = parse_object(raw, "slice")?;

    let descriptor = SliceDescriptor {
        start_datetime: raw.start_datetime.map(into_text),
        list_item: raw.list_item.map(into_text),
    };

    if descriptor.start_datetime.is_none() && descriptor.list_item.is_none() {
        return Ok(None);
    }

    Ok(Some(descriptor))
}

/// Parses `text` as a JSON object, then reads `T` out of it.
fn parse_object<T: DeserializeOwned>(text: &str, kind: &'static str) -> Result<T, PayloadError> {
    let object: Map<String, Value> =
        serde_json::from_str(text).map_err(|e| PayloadError::json(kind, e))?;
    T::deserialize(Value::Object(object)).map_err(|e| PayloadError::json(kind, e))
}

/// Everything after the first occurrence of `prefix`, or nothing.
fn payload<'a>(text: &'a str, prefix: &str) -> &'a str {
    text.split_once(prefix).map(|(_, rest)| rest).unwrap_or_default()
}

fn split_url(url: &Url) -> (String, Option<QueryParameters>) {
    let full_path = format!(
        "{}://{}{}",
        url.scheme(),
        url.host_str().unwrap_or_default(),
        url.path()
    );

    let mut parameters = QueryParameters::new();
    for (key, value) in url.query_pairs() {
        // Blank values carry nothing worth showing.
        if value.is_empty() {
            continue;
        }
        parameters
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }

    (full_path, (!parameters.is_empty()).then_some(parameters))
}

fn into_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn into_object(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
