// search-core/src/service.rs
//! 文档服务 - 持有启动时加载的文档集合和索引

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::index::DocumentIndex;
use crate::models::{Document, DocumentSummary, SearchResult};
use crate::store::DocumentStore;

/// 摘要中最多列出的要点行数
const MAX_KEY_SECTIONS: usize = 8;

static NUMBERED_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.").expect("valid regex"));

/// 找不到文档时对外返回的文本
pub fn not_found_message(document_id: &str) -> String {
    format!("Document '{}' not found.", document_id)
}

fn is_key_section(line: &str) -> bool {
    NUMBERED_LINE.is_match(line) || line.starts_with('-')
}

/// 文档服务
///
/// 构造后不可变，可以在多个线程间共享只读访问。
pub struct DocumentService {
    documents: Arc<[Document]>,
    index: DocumentIndex,
}

impl DocumentService {
    /// 从存储加载文档并构建索引
    pub fn new(store: &dyn DocumentStore) -> Self {
        let documents: Arc<[Document]> = store.load_documents().into();

        let mut index = DocumentIndex::new();
        index.build(Arc::clone(&documents));

        tracing::info!(documents = documents.len(), "文档服务初始化完成");
        Self { documents, index }
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// 全部文档的列表项，保持集合顺序
    pub fn list_documents(&self) -> Vec<DocumentSummary> {
        self.documents.iter().map(Document::summary).collect()
    }

    /// 按 id 查找文档（忽略大小写，取第一个）
    pub fn get_document(&self, document_id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id_matches(document_id))
    }

    pub fn search_documents(&self, query: &str) -> Vec<SearchResult> {
        tracing::info!("[搜索] 查询: '{}'", query);
        let results = self.index.query(query);
        tracing::info!("[搜索] 找到 {} 个匹配文档", results.len());
        results
    }

    /// 生成固定格式的文档摘要，文档不存在时返回 `None`
    pub fn summarize_document(&self, document_id: &str) -> Option<String> {
        let Some(doc) = self.get_document(document_id) else {
            tracing::info!("文档不存在: {}", document_id);
            return None;
        };

        let key_sections: Vec<&str> = doc
            .content
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| is_key_section(line))
            .take(MAX_KEY_SECTIONS)
            .collect();

        let summary = format!(
            "DOCUMENT SUMMARY\n\
             \n\
             Title: {title}\n\
             Document ID: {id}\n\
             File Path: {path}\n\
             Date: {date}\n\
             \n\
             KEY SECTIONS:\n\
             {sections}\n\
             \n\
             Total Length: {length} characters\n",
            title = doc.title,
            id = doc.id,
            path = doc.file_path,
            date = doc.date.format("%Y-%m-%d"),
            sections = key_sections.join("\n"),
            length = doc.content.chars().count(),
        );

        tracing::debug!("已生成摘要: {}", document_id);
        Some(summary)
    }
}
