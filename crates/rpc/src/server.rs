//! JSON-RPC 分发 - 把一行请求转换为一行响应
//!
//! 通知过滤、分帧等传输层细节由服务端程序处理。

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use search_core::{DocumentService, not_found_message};

use crate::protocol::{
    DocumentArgs, ErrorResponse, InitializeResult, Method, Request, ResponseResult, SearchArgs,
    SuccessResponse, ToolCallParams, ToolCallResult, ToolName, ToolsListResult, tool_catalog,
};

const NO_PARAMETERS: &str = "No parameters provided";

/// 错误响应本身无法序列化时的兜底文本
const FALLBACK_ERROR: &str = r#"{"jsonrpc":"2.0","id":null,"error":{"message":"Internal error"}}"#;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Invalid request: expected a JSON object")]
    NotAnObject,

    #[error("Invalid params: expected a JSON object")]
    ParamsNotAnObject,

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DispatchError>;

pub struct McpServer {
    service: Arc<DocumentService>,
}

impl McpServer {
    pub fn new(service: Arc<DocumentService>) -> Self {
        Self { service }
    }

    /// 处理一行请求并返回序列化后的响应
    ///
    /// 不会失败：任何错误都转换为 id 为 null 的错误响应。
    pub fn handle_request(&self, line: &str) -> String {
        match self.dispatch(line) {
            Ok(response) => render(&response),
            Err(e) => {
                tracing::warn!("请求处理失败: {}", e);
                render(&ErrorResponse::new(e.to_string()))
            }
        }
    }

    fn dispatch(&self, line: &str) -> Result<SuccessResponse> {
        let value: Value = serde_json::from_str(line)?;
        match value {
            Value::Null => return Err(DispatchError::InvalidJson),
            Value::Object(_) => {}
            _ => return Err(DispatchError::NotAnObject),
        }

        let request: Request = serde_json::from_value(value)?;
        let method = Method::from_name(request.method.as_deref().unwrap_or(""));
        tracing::debug!(?method, id = ?request.id, "收到请求");

        let result = match method {
            Method::Initialize => ResponseResult::Initialize(InitializeResult::default()),
            Method::ToolsList => ResponseResult::ToolsList(ToolsListResult {
                tools: tool_catalog(),
            }),
            Method::ToolsCall => ResponseResult::ToolCall(self.call_tool(request.params)?),
            Method::Unknown(name) => {
                ResponseResult::ToolCall(ToolCallResult::text(format!("Unknown method: {}", name)))
            }
        };

        Ok(SuccessResponse::new(request.id, result))
    }

    fn call_tool(&self, params: Option<Value>) -> Result<ToolCallResult> {
        // 派生的反序列化也接受数组，这里只放行对象
        let params = match params {
            None | Some(Value::Null) => return Ok(ToolCallResult::text(NO_PARAMETERS)),
            Some(params @ Value::Object(_)) => serde_json::from_value::<ToolCallParams>(params)?,
            Some(_) => return Err(DispatchError::ParamsNotAnObject),
        };

        let tool = ToolName::from_name(params.name.as_deref().unwrap_or(""));
        let arguments = params.arguments.unwrap_or_default();
        tracing::info!(?tool, "调用工具");

        let text = match tool {
            ToolName::SearchDocuments => {
                let args: SearchArgs = parse_arguments(arguments)?;
                let results = self.service.search_documents(args.query.as_deref().unwrap_or(""));
                to_pretty(&results)?
            }
            ToolName::GetDocument => {
                let args: DocumentArgs = parse_arguments(arguments)?;
                let id = args.document_id.unwrap_or_default();
                match self.service.get_document(&id) {
                    Some(doc) => to_pretty(doc)?,
                    None => not_found_message(&id),
                }
            }
            ToolName::ListDocuments => to_pretty(&self.service.list_documents())?,
            ToolName::SummarizeDocument => {
                let args: DocumentArgs = parse_arguments(arguments)?;
                let id = args.document_id.unwrap_or_default();
                self.service
                    .summarize_document(&id)
                    .unwrap_or_else(|| not_found_message(&id))
            }
            ToolName::Unknown(name) => format!("Unknown tool: {}", name),
        };

        Ok(ToolCallResult::text(text))
    }
}

fn parse_arguments<T: DeserializeOwned>(arguments: Map<String, Value>) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(arguments))?)
}

fn to_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn render<T: Serialize>(response: &T) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        tracing::error!("响应序列化失败: {}", e);
        FALLBACK_ERROR.to_string()
    })
}
