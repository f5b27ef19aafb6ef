use crate::read::{
    PayloadError, SliceDescriptor, parse_request, parse_response, parse_slice_descriptor,
};
use pretty_assertions::assert_eq;
use serde_json::json;

//-----------------------------------------------------------------------------
// Requests
//-----------------------------------------------------------------------------

#[test]
fn request_url_is_split_from_query() {
    let request = parse_request(
        r#"request: {"url":"https://api.example.com:8443/v1/users?page=2&tag=a&tag=b#frag","http_method":"POST"}"#,
    )
    .unwrap();

    assert_eq!(request.url, "https://api.example.com/v1/users");
    assert_eq!(request.http_method, "POST");

    let parameters = request.parameters.unwrap();
    assert_eq!(parameters["page"], vec!["2"]);
    assert_eq!(parameters["tag"], vec!["a", "b"]);
    assert_eq!(parameters.len(), 2);
}

#[test]
fn query_values_are_decoded_and_blanks_dropped() {
    let request =
        parse_request(r#"request: {"url":"http://x/s?q=hello%20world+again&empty=&flag"}"#)
            .unwrap();

    let parameters = request.parameters.unwrap();
    assert_eq!(parameters["q"], vec!["hello world again"]);
    assert!(!parameters.contains_key("empty"));
    assert!(!parameters.contains_key("flag"));
}

#[test]
fn request_without_query_has_no_parameters() {
    let request = parse_request(r#"request: {"url":"http://x/y?"}"#).unwrap();

    assert_eq!(request.url, "http://x/y");
    assert_eq!(request.parameters, None);
}

#[test]
fn request_copies_headers_and_body() {
    let request = parse_request(
        r#"request: {"url":"http://x/y","headers":{"Accept":"application/json"},"body":{"a":[1,2]}}"#,
    )
    .unwrap();

    assert_eq!(
        request.headers,
        json!({"Accept": "application/json"}).as_object().cloned()
    );
    assert_eq!(request.body, Some(json!({"a": [1, 2]})));
}

#[test]
fn request_fields_default_when_missing() {
    let request = parse_request("request: {}").unwrap();

    assert_eq!(request.url, "");
    assert_eq!(request.http_method, "");
    assert_eq!(request.parameters, None);
    assert_eq!(request.headers, None);
    assert_eq!(request.body, None);
}

#[test]
fn request_with_unparsable_url_keeps_other_fields() {
    let request = parse_request(r#"request: {"url":"not a url","http_method":"GET"}"#).unwrap();

    assert_eq!(request.url, "");
    assert_eq!(request.http_method, "GET");
}

#[test]
fn mistyped_request_fields_are_dropped_individually() {
    let request = parse_request(
        r#"request: {"url":"http://x/y?a=1","http_method":5,"headers":"Accept: */*","body":"raw"}"#,
    )
    .unwrap();

    assert_eq!(request.url, "http://x/y");
    assert_eq!(request.parameters.unwrap()["a"], vec!["1"]);
    assert_eq!(request.http_method, "");
    assert_eq!(request.headers, None);
    assert_eq!(request.body, Some(json!("raw")));
}

#[test]
fn non_string_url_leaves_empty_url() {
    let request = parse_request(r#"request: {"url":42,"http_method":"GET"}"#).unwrap();

    assert_eq!(request.url, "");
    assert_eq!(request.http_method, "GET");
}

#[test]
fn malformed_request_is_an_error() {
    let err = parse_request("request: {\"url\":").unwrap_err();

    assert!(matches!(err, PayloadError::Json { kind: "request", .. }));
}

#[test]
fn request_payload_must_be_an_object() {
    assert!(parse_request("request: [1, 2]").is_err());
    assert!(parse_request("request:").is_err());
}

//-----------------------------------------------------------------------------
// Responses
//-----------------------------------------------------------------------------

#[test]
fn response_copies_status_body_and_headers() {
    let response = parse_response(
        r#"response: {"status_code":404,"body":"{\"error\":\"nope\"}","headers":{"x":"1"}}"#,
    )
    .unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(response.body.as_deref(), Some(r#"{"error":"nope"}"#));
    assert_eq!(response.headers, json!({"x": "1"}).as_object().cloned());
}

#[test]
fn missing_response_body_defaults_to_empty_object_text() {
    let response = parse_response(r#"response: {"status_code":200}"#).unwrap();

    assert_eq!(response.body.as_deref(), Some("{}"));
    assert_eq!(response.headers, None);
}

#[test]
fn null_response_body_stays_absent() {
    let response = parse_response(r#"response: {"status_code":204,"body":null}"#).unwrap();

    assert_eq!(response.body, None);
}

#[test]
fn structured_response_body_is_rendered_as_text() {
    let response = parse_response(r#"response: {"status_code":200,"body":{"ok":true}}"#).unwrap();

    assert_eq!(response.body.as_deref(), Some(r#"{"ok":true}"#));
}

#[test]
fn response_without_status_is_an_error() {
    let err = parse_response(r#"response: {"body":"x"}"#).unwrap_err();

    assert!(matches!(err, PayloadError::MissingStatus));
}

#[test]
fn mistyped_response_headers_are_dropped() {
    let response = parse_response(r#"response: {"status_code":200,"headers":["x"]}"#).unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.headers, None);
}

#[test]
fn out_of_range_status_is_an_error() {
    assert!(matches!(
        parse_response(r#"response: {"status_code":70000}"#),
        Err(PayloadError::MissingStatus)
    ));
    assert!(matches!(
        parse_response(r#"response: {"status_code":"200"}"#),
        Err(PayloadError::MissingStatus)
    ));
}

#[test]
fn malformed_response_is_an_error() {
    let err = parse_response("response: <html>").unwrap_err();

    assert!(matches!(err, PayloadError::Json { kind: "response", .. }));
}

//-----------------------------------------------------------------------------
// Slices
//-----------------------------------------------------------------------------

#[test]
fn bare_slice_marker_has_no_descriptor() {
    assert_eq!(parse_slice_descriptor("slice:").unwrap(), None);
    assert_eq!(parse_slice_descriptor("slice:   ").unwrap(), None);
}

#[test]
fn slice_descriptor_fields() {
    let descriptor =
        parse_slice_descriptor(r#"slice:{"start_datetime":"2024-01-01T00:00:00Z","list_item":7}"#)
            .unwrap();

    assert_eq!(
        descriptor,
        Some(SliceDescriptor {
            start_datetime: Some("2024-01-01T00:00:00Z".to_string()),
            list_item: Some("7".to_string()),
        })
    );
}

#[test]
fn slice_payload_without_known_fields_has_no_descriptor() {
    let descriptor = parse_slice_descriptor(r#"slice:{"partition":{"id":1}}"#).unwrap();

    assert_eq!(descriptor, None);
}

#[test]
fn malformed_slice_payload_is_an_error() {
    let err = parse_slice_descriptor("slice: {").unwrap_err();

    assert!(matches!(err, PayloadError::Json { kind: "slice", .. }));
}
