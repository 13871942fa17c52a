// apps/server/src/command/stdio.rs
//! stdio 模式 - 每行一个请求，每行一个响应

use super::{Command, load_service};
use crate::config::Config;
use crate::error::Result;
use rpc::{McpServer, is_notification};
use std::borrow::Cow;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;

pub struct StdioCommand {
    config: Config,
    documents_dir: PathBuf,
}

impl StdioCommand {
    pub fn new(config: Config, documents_dir: PathBuf) -> Self {
        Self { config, documents_dir }
    }
}

/// 顺序处理输入直到 EOF
///
/// 空行和通知不产生输出；非 UTF-8 的行按有损解码交给分发器，
/// 单行写入失败只记录日志。只有 EOF 或读取错误会结束循环。
pub async fn serve_lines<R, W>(server: &McpServer, mut reader: R, mut writer: W) -> Result<()>
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

        let decoded = String::from_utf8_lossy(&buf);
        if matches!(decoded, Cow::Owned(_)) {
            tracing::warn!("输入行不是合法的 UTF-8，已按有损解码处理");
        }

        let line = decoded.trim();
        if line.is_empty() {
            continue;
        }
        if is_notification(line) {
            tracing::debug!("忽略通知: {}", line);
            continue;
        }

        let mut response = server.handle_request(line);
        response.push('\n');

        if let Err(e) = write_line(&mut writer, &response).await {
            tracing::error!("写入响应失败: {}", e);
        }
    }

    info!("输入结束，stdio 服务退出");
    Ok(())
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> std::io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}

#[async_trait::async_trait]
impl Command for StdioCommand {
    async fn execute(&self) -> Result<()> {
        let service = load_service(&self.documents_dir, &self.config.store);
        info!(
            "MCP 文档服务 (stdio) 已启动，目录 {:?}，共 {} 个文档",
            self.documents_dir,
            service.document_count()
        );

        let server = McpServer::new(service);
        let stdin = BufReader::new(tokio::io::stdin());
        serve_lines(&server, stdin, tokio::io::stdout()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use search_core::{Document, DocumentService, FileSystemDocumentStore};
    use serde_json::Value;
    use std::sync::Arc;

    fn server() -> McpServer {
        let doc = Document::new(
            "guide",
            "Guide",
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            "getting started",
            "/docs/guide.txt",
        );
        let store = FileSystemDocumentStore::from_documents(vec![doc]);
        McpServer::new(Arc::new(DocumentService::new(&store)))
    }

    async fn run(input: &str) -> Vec<Value> {
        let mut output = Vec::new();
        serve_lines(&server(), input.as_bytes(), &mut output).await.unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_one_response_per_request_line() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#,
            "\n\n   \n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":"two","method":"tools/list"}"#,
            "\n",
        );

        let responses = run(input).await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["id"], "two");
    }

    #[tokio::test]
    async fn test_bad_line_does_not_stop_loop() {
        let input = concat!(
            "{broken\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"list_documents"}}"#,
        );

        let responses = run(input).await;

        assert_eq!(responses.len(), 2);
        assert!(responses[0]["id"].is_null());
        assert!(responses[0]["error"]["message"].is_string());
        assert_eq!(responses[1]["id"], 2);
        assert!(responses[1]["result"]["content"][0]["text"].as_str().unwrap().contains("guide"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_stop_loop() {
        let mut input = br#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#.to_vec();
        input.push(b'\n');
        input.extend_from_slice(&[0xff, 0xfe, b'\n']);
        input.extend_from_slice(br#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#);
        input.push(b'\n');

        let mut output = Vec::new();
        let result = serve_lines(&server(), input.as_slice(), &mut output).await;
        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert!(result.is_ok());
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["id"], 1);
        assert!(responses[1]["id"].is_null());
        assert!(responses[1]["error"]["message"].is_string());
        assert_eq!(responses[2]["id"], 2);
        assert!(responses[2]["result"]["tools"].is_array());
    }

    #[tokio::test]
    async fn test_empty_input_writes_nothing() {
        assert!(run("").await.is_empty());
    }
}
