// search-core/src/lib.rs
//! 文档搜索核心库
//!
//! 提供：
//! - 多格式文本提取（纯文本、Word、Excel、PDF）
//! - 启动时一次性加载的文件系统文档存储
//! - 基于关键词计数的相关度排序
//! - 面向协议层的文档服务（列表、获取、搜索、摘要）

pub mod config;
pub mod extract;
pub mod index;
pub mod models;
pub mod service;
pub mod store;

// 重导出核心类型
pub use config::StoreConfig;
pub use extract::{
    DocxExtractor, ExtractorRegistry, PdfExtractor, PlainTextExtractor, TextExtractor,
    XlsxExtractor,
};
pub use index::{tokenize_query, DocumentIndex};
pub use models::{Document, DocumentSummary, SearchResult};
pub use service::{not_found_message, DocumentService};
pub use store::{document_id, DocumentStore, FileSystemDocumentStore};
