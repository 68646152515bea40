//! Line-delimited JSON-RPC over stdin/stdout

use super::rpc::RpcResponse;
use super::server::ToolServer;
use thiserror::Error;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum StdioError {
    #[error("stdin/stdout I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serve the tool over the process's stdin/stdout until stdin closes
pub async fn run(server: ToolServer) -> Result<(), StdioError> {
    info!("Tool server listening on stdio");
    let stdin = BufReader::new(io::stdin());
    let stdout = io::stdout();
    serve(server, stdin, stdout).await
}

/// One request per line in, one response per line out. A line that is not
/// UTF-8 gets a parse error and the session carries on.
pub async fn serve<R, W>(server: ToolServer, mut reader: R, mut writer: W) -> Result<(), StdioError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                server.handle_line(line).await
            }
            Err(e) => {
                warn!(error = %e, "Dropping non UTF-8 frame");
                serde_json::to_string(&RpcResponse::parse_error(format!(
                    "Invalid JSON-RPC message: {e}"
                )))
                .ok()
            }
        };

        if let Some(response) = response {
            writer.write_all(response.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    debug!("stdin closed, stopping tool server");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{BlockingProvider, ProviderChain, SearchProvider};
    use crate::results::SearchOutput;
    use crate::router::FallbackRouter;
    use crate::tools::rpc::PARSE_ERROR;
    use std::sync::Arc;
    use std::time::Duration;

    fn echo_server() -> ToolServer {
        let provider: Arc<dyn SearchProvider> = Arc::new(BlockingProvider::new("stub", |q| {
            Ok(SearchOutput::from(format!("answer for {q}")))
        }));
        let chain = ProviderChain::new().with(provider, Duration::from_secs(1));
        ToolServer::new(Arc::new(FallbackRouter::new(Arc::new(chain))))
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_end_session() {
        let mut input = Vec::new();
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#);
        input.extend_from_slice(b"\n\xff\xfe garbage\n");
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#);
        input.extend_from_slice(b"\n");
        let mut output = Vec::new();

        serve(echo_server(), BufReader::new(input.as_slice()), &mut output)
            .await
            .unwrap();

        let responses: Vec<RpcResponse> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].id, Some(serde_json::json!(1)));
        assert_eq!(responses[1].error.as_ref().unwrap().code, PARSE_ERROR);
        assert_eq!(responses[2].id, Some(serde_json::json!(2)));
        assert_eq!(responses[2].result, Some(serde_json::json!({})));
    }

    #[tokio::test]
    async fn test_serve_session() {
        let server = echo_server();

        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"search","arguments":{"query":"tokio"}}}"#,
            "\n",
        );
        let mut output = Vec::new();

        serve(server, BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();

        let responses: Vec<RpcResponse> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].id, Some(serde_json::json!(1)));
        let result = responses[1].result.as_ref().unwrap();
        assert_eq!(result["content"][0]["text"], "answer for tokio");
    }
}
