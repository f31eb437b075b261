use async_trait::async_trait;
use pqa_client::{AskReply, PresetNames, RpcClient, StatusReply};
use pqa_core::PqaError;
use pqa_core::settings::Settings;
use pqa_core::transport::Transport;
use serde_json::{Map, Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Transport double that replays scripted outcomes and records every call.
#[derive(Default)]
struct ScriptedTransport {
    calls: Mutex<Vec<String>>,
    connect_results: Mutex<VecDeque<Result<(), String>>>,
    replies: Mutex<VecDeque<Result<String, String>>>,
    disconnect_results: Mutex<VecDeque<Result<(), String>>>,
}

impl ScriptedTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn fail_next_connect(&self, message: &str) {
        self.connect_results
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    fn fail_next_disconnect(&self, message: &str) {
        self.disconnect_results
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    fn reply(&self, raw: &str) {
        self.replies.lock().unwrap().push_back(Ok(raw.to_string()));
    }

    fn reply_err(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Params JSON of the most recent request.
    fn last_params(&self) -> Value {
        let calls = self.calls();
        let last = calls
            .iter()
            .rev()
            .find(|c| c.starts_with("send:"))
            .expect("no request was sent");
        let params = last.splitn(3, ':').nth(2).unwrap();
        serde_json::from_str(params).unwrap()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&self) -> Result<(), String> {
        self.calls.lock().unwrap().push("connect".to_string());
        self.connect_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn send_request(&self, method: &str, params: &str) -> Result<String, String> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("send:{}:{}", method, params));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(r#"{"status": "success"}"#.to_string()))
    }

    async fn disconnect(&self) -> Result<(), String> {
        self.calls.lock().unwrap().push("disconnect".to_string());
        self.disconnect_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

fn client_with(transport: &Arc<ScriptedTransport>) -> RpcClient {
    RpcClient::new(transport.clone())
}

#[tokio::test]
async fn test_connect_is_idempotent() {
    let transport = ScriptedTransport::new();
    let client = client_with(&transport);
    assert!(!client.is_connected());

    client.connect().await.unwrap();
    client.connect().await.unwrap();

    assert!(client.is_connected());
    assert_eq!(transport.count("connect"), 1);
}

#[tokio::test]
async fn test_failed_connect_leaves_client_unconnected() {
    let transport = ScriptedTransport::new();
    transport.fail_next_connect("Failed to connect: Connection refused");
    let client = client_with(&transport);

    let err = client.connect().await.unwrap_err();

    assert!(err.is_connection());
    assert!(!client.is_connected());

    // A later attempt goes back to the transport
    client.connect().await.unwrap();
    assert!(client.is_connected());
    assert_eq!(transport.count("connect"), 2);
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let transport = ScriptedTransport::new();
    let client = client_with(&transport);

    // Not connected: no transport call
    client.close().await.unwrap();
    assert_eq!(transport.count("disconnect"), 0);

    client.connect().await.unwrap();
    client.close().await.unwrap();
    client.close().await.unwrap();

    assert!(!client.is_connected());
    assert_eq!(transport.count("disconnect"), 1);
}

#[tokio::test]
async fn test_failed_close_still_clears_flag_and_reports() {
    let transport = ScriptedTransport::new();
    transport.fail_next_disconnect("socket busy");
    let client = client_with(&transport);
    client.connect().await.unwrap();

    let err = client.close().await.unwrap_err();

    assert_eq!(err, PqaError::connection("socket busy"));
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_connect_close_sequences_track_state() {
    let transport = ScriptedTransport::new();
    let client = client_with(&transport);

    for _ in 0..3 {
        client.connect().await.unwrap();
        assert!(client.is_connected());
        client.close().await.unwrap();
        assert!(!client.is_connected());
    }

    assert_eq!(transport.count("connect"), 3);
    assert_eq!(transport.count("disconnect"), 3);
}

#[tokio::test]
async fn test_first_request_connects_exactly_once() {
    let transport = ScriptedTransport::new();
    let client = client_with(&transport);

    client.get_status().await.unwrap();
    client.get_status().await.unwrap();

    assert_eq!(
        transport.calls(),
        vec!["connect", "send:get_status:{}", "send:get_status:{}"]
    );
}

#[tokio::test]
async fn test_request_not_sent_when_connect_fails() {
    let transport = ScriptedTransport::new();
    transport.fail_next_connect("refused");
    let client = client_with(&transport);

    let err = client.ask("anything").await.unwrap_err();

    assert!(err.is_connection());
    assert_eq!(transport.count("send:"), 0);
}

#[tokio::test]
async fn test_non_json_reply_is_decode_error() {
    let transport = ScriptedTransport::new();
    transport.reply("<html>502 Bad Gateway</html>");
    let client = client_with(&transport);

    let err = client.get_status().await.unwrap_err();

    assert!(err.is_decode());
    assert!(matches!(err, PqaError::Decode { ref method, .. } if method == "get_status"));
    // The connection itself is still considered up
    assert!(client.is_connected());
}

#[tokio::test]
async fn test_transport_failure_is_transport_error() {
    let transport = ScriptedTransport::new();
    transport.reply_err("Failed to receive response: Resource temporarily unavailable");
    let client = client_with(&transport);

    let err = client.ask("q").await.unwrap_err();

    assert_eq!(
        err,
        PqaError::transport("ask", "Failed to receive response: Resource temporarily unavailable")
    );
}

#[tokio::test]
async fn test_reply_value_is_returned_as_parsed_json() {
    let transport = ScriptedTransport::new();
    transport.reply(r#"{"status": "success", "presets": ["high_quality", "fast"]}"#);
    let client = client_with(&transport);

    let value = client.get_preset_names().await.unwrap();

    assert_eq!(value["presets"], json!(["high_quality", "fast"]));
}

#[tokio::test]
async fn test_scalar_json_reply_is_accepted() {
    let transport = ScriptedTransport::new();
    transport.reply("42");
    let client = client_with(&transport);

    assert_eq!(client.get_status().await.unwrap(), json!(42));
}

#[tokio::test]
async fn test_initialize_merges_options_over_paper_dir() {
    let transport = ScriptedTransport::new();
    let client = client_with(&transport);

    let mut options = Map::new();
    options.insert("llm".to_string(), json!("gpt-4o"));
    client.initialize("/papers", options).await.unwrap();
    assert_eq!(
        transport.last_params(),
        json!({"paper_dir": "/papers", "llm": "gpt-4o"})
    );

    // A colliding option key wins over the argument
    let mut options = Map::new();
    options.insert("paper_dir".to_string(), json!("/other"));
    client.initialize("/papers", options).await.unwrap();
    assert_eq!(transport.last_params(), json!({"paper_dir": "/other"}));
}

#[tokio::test]
async fn test_initialize_accepts_settings() {
    let transport = ScriptedTransport::new();
    let client = client_with(&transport);
    let settings = Settings::defaults();

    client.initialize("/papers", &settings).await.unwrap();

    let params = transport.last_params();
    // Default paper_dir "" overrides the argument, mirroring the merge order
    assert_eq!(params["paper_dir"], json!(""));
    assert_eq!(params["evidence_k"], json!(10));
    assert_eq!(params["temperature"], json!(0.0));
}

#[tokio::test]
async fn test_method_names_and_params_shapes() {
    let transport = ScriptedTransport::new();
    let client = client_with(&transport);

    client.ask("What is RAG?").await.unwrap();
    assert_eq!(transport.last_params(), json!({"question": "What is RAG?"}));

    let settings: Settings = [("temperature", 0.5)].into_iter().collect();
    client.update_settings(&settings).await.unwrap();
    assert_eq!(transport.last_params(), json!({"temperature": 0.5}));

    client.get_preset_names().await.unwrap();
    client.get_status().await.unwrap();

    let methods: Vec<String> = transport
        .calls()
        .iter()
        .filter_map(|c| c.strip_prefix("send:"))
        .map(|c| c.split(':').next().unwrap().to_string())
        .collect();
    assert_eq!(
        methods,
        vec!["ask", "update_settings", "get_preset_names", "get_status"]
    );
}

#[tokio::test]
async fn test_typed_call_decodes_known_shapes() {
    let transport = ScriptedTransport::new();
    transport.reply(
        r#"{"status": "initialized", "paper_dir": "papers", "llm": "gpt-4o",
            "embedding": "text-embedding-3-small", "preset": "none"}"#,
    );
    transport.reply(r#"{"status": "success", "presets": ["fast", "debug"]}"#);
    transport.reply(
        r#"{"status": "success", "question": "q", "answer": "a",
            "references": "1. One\n2. Two", "contexts": []}"#,
    );
    let client = client_with(&transport);

    let status: StatusReply = client.call("get_status", Map::new()).await.unwrap();
    assert!(status.is_initialized());
    assert_eq!(status.llm.as_deref(), Some("gpt-4o"));

    let presets: PresetNames = client.call("get_preset_names", Map::new()).await.unwrap();
    assert_eq!(presets.presets, vec!["fast", "debug"]);

    let answer: AskReply = client.call("ask", Map::new()).await.unwrap();
    assert_eq!(answer.reference_list(), vec!["1. One", "2. Two"]);
}

#[tokio::test]
async fn test_typed_call_surfaces_remote_and_shape_errors() {
    let transport = ScriptedTransport::new();
    transport.reply(r#"{"status": "error", "message": "Unknown method: nope"}"#);
    transport.reply(r#"{"status": "success"}"#);
    let client = client_with(&transport);

    let err = client.call::<Value>("nope", Map::new()).await.unwrap_err();
    assert_eq!(err, PqaError::remote("nope", "Unknown method: nope"));

    // AskReply requires an answer
    let err = client.call::<AskReply>("ask", Map::new()).await.unwrap_err();
    assert!(err.is_decode());
}
