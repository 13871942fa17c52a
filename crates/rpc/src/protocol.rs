//! MCP 协议类型 - 请求、响应和工具目录

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const JSONRPC_VERSION: &str = "2.0";
pub const PROTOCOL_VERSION: &str = "2025-06-18";
pub const SERVER_NAME: &str = "document-server";
pub const SERVER_VERSION: &str = "1.0.0";

/// 请求 id，原样回显并保留 JSON 类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

/// 请求信封
#[derive(Debug, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub id: Option<RequestId>,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Initialize,
    ToolsList,
    ToolsCall,
    Unknown(String),
}

impl Method {
    pub fn from_name(name: &str) -> Self {
        match name {
            "initialize" => Method::Initialize,
            "tools/list" => Method::ToolsList,
            "tools/call" => Method::ToolsCall,
            other => Method::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolName {
    SearchDocuments,
    GetDocument,
    ListDocuments,
    SummarizeDocument,
    Unknown(String),
}

impl ToolName {
    pub const SEARCH_DOCUMENTS: &'static str = "search_documents";
    pub const GET_DOCUMENT: &'static str = "get_document";
    pub const LIST_DOCUMENTS: &'static str = "list_documents";
    pub const SUMMARIZE_DOCUMENT: &'static str = "summarize_document";

    pub fn from_name(name: &str) -> Self {
        match name {
            Self::SEARCH_DOCUMENTS => ToolName::SearchDocuments,
            Self::GET_DOCUMENT => ToolName::GetDocument,
            Self::LIST_DOCUMENTS => ToolName::ListDocuments,
            Self::SUMMARIZE_DOCUMENT => ToolName::SummarizeDocument,
            other => ToolName::Unknown(other.to_string()),
        }
    }
}

/// `tools/call` 的参数
#[derive(Debug, Default, Deserialize)]
pub struct ToolCallParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchArgs {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentArgs {
    #[serde(default, rename = "documentId")]
    pub document_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: &'static str,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

impl Default for InitializeResult {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            capabilities: ServerCapabilities { tools: ToolsCapability {} },
            server_info: ServerInfo {
                name: SERVER_NAME,
                version: SERVER_VERSION,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    pub tools: ToolsCapability,
}

/// 序列化为空对象
#[derive(Debug, Clone, Serialize)]
pub struct ToolsCapability {}

#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub name: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: InputSchema,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub properties: BTreeMap<&'static str, PropertySchema>,
    pub required: Vec<&'static str>,
}

impl InputSchema {
    fn object(properties: &[(&'static str, &'static str)]) -> Self {
        Self {
            kind: "object",
            properties: properties
                .iter()
                .map(|&(name, description)| {
                    (name, PropertySchema { kind: "string", description })
                })
                .collect(),
            required: properties.iter().map(|&(name, _)| name).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolsListResult {
    pub tools: Vec<ToolDefinition>,
}

/// 固定的工具目录
pub fn tool_catalog() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: ToolName::SEARCH_DOCUMENTS,
            description: "Search through documents for specific keywords or phrases. Returns matching documents with relevant excerpts and file paths.",
            input_schema: InputSchema::object(&[(
                "query",
                "The search query (e.g., 'termination clauses', 'payment terms')",
            )]),
        },
        ToolDefinition {
            name: ToolName::GET_DOCUMENT,
            description: "Retrieve the full content of a specific document by its ID. Returns the document with its file path.",
            input_schema: InputSchema::object(&[(
                "documentId",
                "The unique identifier of the document",
            )]),
        },
        ToolDefinition {
            name: ToolName::LIST_DOCUMENTS,
            description: "List all available documents with their metadata (ID, title, date, file path).",
            input_schema: InputSchema::object(&[]),
        },
        ToolDefinition {
            name: ToolName::SUMMARIZE_DOCUMENT,
            description: "Get a summary of a specific document including key points and file path.",
            input_schema: InputSchema::object(&[(
                "documentId",
                "The unique identifier of the document to summarize",
            )]),
        },
    ]
}

/// 工具输出，总是单个文本项
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallResult {
    pub content: Vec<ContentItem>,
}

impl ToolCallResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem {
                kind: "text",
                text: text.into(),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponseResult {
    Initialize(InitializeResult),
    ToolsList(ToolsListResult),
    ToolCall(ToolCallResult),
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub jsonrpc: &'static str,
    pub id: Option<RequestId>,
    pub result: ResponseResult,
}

impl SuccessResponse {
    pub fn new(id: Option<RequestId>, result: ResponseResult) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
        }
    }
}

/// 错误响应，失败请求的 id 不会被恢复
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub jsonrpc: &'static str,
    pub id: Option<RequestId>,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: None,
            error: ErrorInfo {
                message: message.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
}

/// 通知在 stdio 传输上不回复
pub fn is_notification(line: &str) -> bool {
    let Ok(Value::Object(request)) = serde_json::from_str::<Value>(line) else {
        return false;
    };

    let has_id = request.get("id").is_some_and(|id| !id.is_null());
    let method = request.get("method").and_then(Value::as_str).unwrap_or("");

    !has_id && method.starts_with("notifications/")
}
