//! End-to-end tests for the `librarian-host` binary (stdin/stdout JSON bridge).
//!
//! Each test spawns a fresh subprocess of the binary pointed at a mock
//! upstream server through a temporary config file, sends JSON requests
//! over stdin, and reads JSON responses from stdout.

use serde_json::{Value, json};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Test harness
// ---------------------------------------------------------------------------

struct HostBridgeHarness {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    reader: Lines<BufReader<ChildStdout>>,
}

impl HostBridgeHarness {
    async fn spawn(config_path: &Path) -> Self {
        let binary = env!("CARGO_BIN_EXE_librarian-host");

        let mut child = Command::new(binary)
            .arg("--config")
            .arg(config_path)
            .env("LIBRARIAN_E2E_KEY", "test-key")
            .env_remove("MCP_SERVER_URL")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .unwrap_or_else(|e| panic!("failed to spawn librarian-host at {binary}: {e}"));

        let child_stdin = child.stdin.take().expect("no stdin on child process");
        let child_stdout = child.stdout.take().expect("no stdout on child process");

        Self {
            child,
            stdin: BufWriter::new(child_stdin),
            reader: BufReader::new(child_stdout).lines(),
        }
    }

    async fn send_raw(&mut self, line: &str) -> Value {
        self.stdin.write_all(line.as_bytes()).await.unwrap();
        self.stdin.write_all(b"\n").await.unwrap();
        self.stdin.flush().await.unwrap();
        self.read_line().await
    }

    async fn send(&mut self, request: Value) -> Value {
        let json = serde_json::to_string(&request).unwrap();
        self.send_raw(&json).await
    }

    /// Read the next JSON line from stdout (with timeout).
    async fn read_line(&mut self) -> Value {
        let line = tokio::time::timeout(Duration::from_secs(30), self.reader.next_line())
            .await
            .expect("timeout reading from librarian-host")
            .expect("IO error reading from librarian-host")
            .expect("unexpected EOF from librarian-host");
        serde_json::from_str(&line).unwrap_or_else(|e| {
            panic!("invalid JSON from librarian-host: {e}\nraw line: {line}");
        })
    }

    /// Close stdin and wait for a clean exit.
    async fn shutdown(mut self) {
        drop(self.stdin);
        let status = tokio::time::timeout(Duration::from_secs(10), self.child.wait())
            .await
            .expect("timeout waiting for librarian-host to exit")
            .expect("failed to wait for librarian-host");
        assert!(status.success(), "librarian-host exited with {status}");
    }
}

fn write_config(dir: &Path, server: &MockServer) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    let config = format!(
        r#"
[generative]
base_url = "{uri}"
api_key_env = "LIBRARIAN_E2E_KEY"
knowledge_model = "knowledge-model"
search_model = "search-model"

[store]
url = "{uri}"
"#,
        uri = server.uri()
    );
    std::fs::write(&path, config).unwrap();
    path
}

async fn mount_upstreams(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1beta/models/knowledge-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{
                "text": "```json\n{\"tropes\": [{\"name\": \"found family\", \"confidence\": 0.8}]}\n```"
            }]}}]
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/search-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{
                "text": "{\"tropes\": [{\"name\": \"Found Family\", \"confidence\": 0.5}, {\"name\": \"Heist\", \"confidence\": 0.9}]}"
            }]}}]
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn host_answers_requests_until_stdin_closes() {
    let server = MockServer::start().await;
    mount_upstreams(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(dir.path(), &server);

    let mut host = HostBridgeHarness::spawn(&config_path).await;

    let response = host
        .send(json!({"title": "Six of Crows", "author": "Leigh Bardugo"}))
        .await;
    assert_eq!(response["status"], "success");
    let tropes = response["tropes"].as_array().expect("tropes array");
    let names: Vec<&str> = tropes.iter().filter_map(|t| t["name"].as_str()).collect();
    // Found Family: (0.8 + 0.4) / 2 + 0.1 = 0.7; Heist: 0.72.
    assert_eq!(names, vec!["Heist", "Found Family"]);
    assert_eq!(tropes[1]["sources"], json!(["knowledge", "search"]));

    let response = host.send(json!({"title": "Six of Crows"})).await;
    assert_eq!(
        response,
        json!({"status": "error", "message": "Both 'title' and 'author' are required fields"})
    );

    let response = host.send_raw("{broken").await;
    assert_eq!(response["status"], "error");

    host.shutdown().await;
}

#[tokio::test]
async fn host_refuses_to_start_without_api_key() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config_path = write_config(dir.path(), &server);

    let output = Command::new(env!("CARGO_BIN_EXE_librarian-host"))
        .arg("--config")
        .arg(&config_path)
        .env_remove("LIBRARIAN_E2E_KEY")
        .stdin(Stdio::null())
        .output()
        .await
        .expect("failed to run librarian-host");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("LIBRARIAN_E2E_KEY"), "stderr: {stderr}");
}
