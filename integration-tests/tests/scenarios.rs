use integration_tests::harness::ScriptedConnector;
use pretty_assertions::assert_eq;
use serde_json::json;
use testread_core::conf::ReaderConfig;
use testread_core::read::{StreamRead, StreamReadHandler, StreamReadRequest};

const STREAM: &str = "users";

fn read(connector: &ScriptedConnector, config: ReaderConfig, limit: usize) -> StreamRead {
    StreamReadHandler::new(&config)
        .read_stream(
            connector.messages(),
            &StreamReadRequest::new(STREAM).with_record_limit(limit),
        )
        .unwrap()
}

fn two_exchanges() -> ScriptedConnector {
    ScriptedConnector::new(STREAM)
        .log(r#"request: {"url":"http://x/y?a=1","http_method":"GET"}"#)
        .log(r#"response: {"status_code":200}"#)
        .record(json!({"id": 1}))
        .log(r#"request: {"url":"http://x/z"}"#)
        .log(r#"response: {"status_code":200}"#)
        .record(json!({"id": 2}))
}

#[test]
fn scenario_a_two_pages_in_one_slice() {
    let read = read(&two_exchanges(), ReaderConfig::default(), 10);

    assert_eq!(read.slices.len(), 1);
    let pages = &read.slices[0].pages;
    assert_eq!(pages.len(), 2);
    assert_eq!(
        serde_json::to_value(&pages[0].records).unwrap(),
        json!([{"id": 1}])
    );
    assert_eq!(
        serde_json::to_value(&pages[1].records).unwrap(),
        json!([{"id": 2}])
    );
    assert!(!read.test_read_limit_reached);
}

#[test]
fn scenario_b_record_limit_of_one() {
    let read = read(&two_exchanges(), ReaderConfig::default(), 1);

    assert_eq!(read.slices.len(), 1);
    assert_eq!(read.slices[0].pages.len(), 1);
    assert_eq!(read.record_count(), 1);
    assert_eq!(
        read.slices[0].pages[0].request.as_ref().map(|r| r.url.as_str()),
        Some("http://x/y")
    );
}

#[test]
fn scenario_c_leading_slice_marker_is_logged_not_sliced() {
    let connector = ScriptedConnector::new(STREAM)
        .slice("")
        .exchange("http://x/1", &[1])
        .exchange("http://x/2", &[2]);

    let read = read(&connector, ReaderConfig::default(), 10);

    assert_eq!(read.slices.len(), 1);
    assert_eq!(read.slices[0].pages.len(), 2);
    let logs: Vec<&str> = read.logs.iter().map(|l| l.message.as_str()).collect();
    assert_eq!(logs, vec!["slice:"]);
}

#[test]
fn scenario_d_unparsable_response_is_kept_as_null() {
    let connector = ScriptedConnector::new(STREAM)
        .request("GET", "http://x/1")
        .log("response: {this is not json")
        .record(json!({"id": 1}));

    let read = read(&connector, ReaderConfig::default(), 10);

    let page = &read.slices[0].pages[0];
    assert!(page.request.is_some());
    assert_eq!(page.response, None);
    assert_eq!(page.records.len(), 1);
}

#[test]
fn scenario_e_slice_ceiling() {
    let connector = ScriptedConnector::new(STREAM)
        .slice("")
        .exchange("http://x/1", &[1])
        .slice("")
        .exchange("http://x/2", &[2]);
    let config = ReaderConfig {
        max_slices: 1,
        ..ReaderConfig::default()
    };

    let read = read(&connector, config, 10);

    assert_eq!(read.slices.len(), 2);
    assert!(read.test_read_limit_reached);
}

#[test]
fn paginated_slices_with_interleaved_logs() {
    let connector = ScriptedConnector::new(STREAM)
        .log("starting sync")
        .slice(r#"{"start_datetime":"2024-01-01","list_item":"eu"}"#)
        .exchange("https://api.example.com/items?page=1", &[1, 2])
        .exchange("https://api.example.com/items?page=2", &[3])
        .log("slice done")
        .slice(r#"{"start_datetime":"2024-02-01","list_item":"us"}"#)
        .exchange("https://api.example.com/items?page=1", &[4])
        .log("finished");

    let read = read(&connector, ReaderConfig::default(), 100);

    let logs: Vec<&str> = read.logs.iter().map(|l| l.message.as_str()).collect();
    assert_eq!(
        logs,
        vec![
            "starting sync",
            r#"slice:{"start_datetime":"2024-01-01","list_item":"eu"}"#,
            "slice done",
            "finished",
        ]
    );

    assert_eq!(read.slices.len(), 2);
    assert_eq!(read.slices[0].pages.len(), 2);
    assert_eq!(read.slices[1].pages.len(), 1);
    assert_eq!(read.record_count(), 4);

    let regions: Vec<Option<&str>> = read
        .slices
        .iter()
        .map(|s| s.slice_descriptor.as_ref().and_then(|d| d.list_item.as_deref()))
        .collect();
    assert_eq!(regions, vec![Some("eu"), Some("us")]);

    let second_page = read.slices[0].pages[1].request.as_ref().unwrap();
    assert_eq!(second_page.url, "https://api.example.com/items");
    assert_eq!(
        second_page.parameters.as_ref().unwrap()["page"],
        vec!["2".to_string()]
    );
}

#[test]
fn inferred_schema_covers_consumed_records() {
    let connector = ScriptedConnector::new(STREAM)
        .request("GET", "http://x/1")
        .response(200)
        .record(json!({"id": 1, "email": "a@example.com"}))
        .record(json!({"id": 2, "email": null}));

    let read = read(&connector, ReaderConfig::default(), 10);

    let schema = read.inferred_schema.unwrap();
    assert_eq!(schema["type"], json!("object"));
    assert_eq!(
        schema["properties"]["email"]["type"],
        json!(["null", "string"])
    );
}
