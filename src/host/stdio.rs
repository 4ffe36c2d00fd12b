//! Stdin/stdout JSON bridge for the trope agent.
//!
//! Reads newline-delimited JSON requests from stdin, answers each through
//! [`TropeAgent::process_line`], and writes one JSON response per line to
//! stdout. Requests are answered one at a time in arrival order.
//!
//! Stdout is exclusively reserved for the JSON protocol; all diagnostic
//! output (tracing, logs) must be routed to stderr.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

use crate::agent::TropeAgent;
use crate::envelope::Response;
use crate::error::{LibrarianError, Result};

/// Run the bridge on the process's stdin and stdout until stdin closes.
///
/// # Errors
///
/// Returns [`LibrarianError::Protocol`] if stdin cannot be read or stdout
/// cannot be written.
pub async fn run_stdio_bridge(agent: &TropeAgent) -> Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = BufWriter::new(tokio::io::stdout());
    run_bridge(agent, reader, writer).await
}

/// Run the bridge over arbitrary line-oriented I/O until the reader is
/// exhausted. Blank lines are ignored.
///
/// # Errors
///
/// Same as [`run_stdio_bridge`].
pub async fn run_bridge<R, W>(agent: &TropeAgent, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();
    let mut answered = 0usize;

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| LibrarianError::Protocol(format!("failed to read from stdin: {e}")))?;

        // EOF
        if bytes_read == 0 {
            tracing::info!(answered, "stdin closed (EOF); shutting down stdio bridge");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = agent.process_line(trimmed).await;
        let json = encode_response(&response)?;
        write_line(&mut writer, &json).await?;
        answered += 1;
    }

    Ok(())
}

fn encode_response(response: &Response) -> Result<String> {
    serde_json::to_string(response)
        .map_err(|e| LibrarianError::Protocol(format!("failed to serialize response: {e}")))
}

/// Write a single JSON line to the writer and flush.
async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, json: &str) -> Result<()> {
    writer
        .write_all(json.as_bytes())
        .await
        .map_err(|e| LibrarianError::Protocol(format!("failed to write to stdout: {e}")))?;
    writer.write_all(b"\n").await.map_err(|e| {
        LibrarianError::Protocol(format!("failed to write newline to stdout: {e}"))
    })?;
    writer
        .flush()
        .await
        .map_err(|e| LibrarianError::Protocol(format!("failed to flush stdout: {e}")))?;
    Ok(())
}
