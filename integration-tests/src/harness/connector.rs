use serde_json::{Value, json};
use testread_core::protocol::Message;

/// Builds the message stream a connector would emit during a test read.
#[derive(Debug, Clone)]
pub struct ScriptedConnector {
    stream: String,
    messages: Vec<Message>,
}

impl ScriptedConnector {
    pub fn new(stream: &str) -> Self {
        Self {
            stream: stream.to_string(),
            messages: Vec::new(),
        }
    }

    pub fn log(mut self, text: &str) -> Self {
        self.messages.push(Message::log(text));
        self
    }

    pub fn slice(self, payload: &str) -> Self {
        self.log(&format!("slice:{payload}"))
    }

    pub fn request(self, method: &str, url: &str) -> Self {
        self.log(&format!(
            "request: {}",
            json!({"url": url, "http_method": method, "headers": {}, "body": null})
        ))
    }

    pub fn response(self, status: u16) -> Self {
        self.log(&format!("response: {}", json!({"status_code": status})))
    }

    pub fn record(mut self, data: Value) -> Self {
        let data = data
            .as_object()
            .cloned()
            .expect("records must be JSON objects");
        self.messages.push(Message::record(&self.stream, data));
        self
    }

    /// A GET exchange followed by one `{"id": n}` record per id.
    pub fn exchange(self, url: &str, ids: &[i64]) -> Self {
        let mut this = self.request("GET", url).response(200);
        for id in ids {
            this = this.record(json!({"id": id}));
        }
        this
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.clone()
    }

    /// The stream as newline-delimited protocol JSON.
    pub fn to_jsonl(&self) -> String {
        self.messages
            .iter()
            .map(|m| serde_json::to_string(m).expect("message serializes"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
