// search-core/src/models.rs
//! 数据模型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 一个已加载的文档：提取出的全文加元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    /// 提取出的纯文本，提取失败时为 `[...]` 占位文本
    pub content: String,
    pub file_path: String,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        date: DateTime<Utc>,
        content: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date,
            content: content.into(),
            file_path: file_path.into(),
        }
    }

    /// id 是否匹配（忽略大小写）
    pub fn id_matches(&self, id: &str) -> bool {
        self.id == id || self.id.to_lowercase() == id.to_lowercase()
    }

    /// 不含正文的投影
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            date: self.date,
            file_path: self.file_path.clone(),
        }
    }
}

/// 文档列表项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub file_path: String,
}

/// 搜索结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub document_id: String,
    pub title: String,
    pub file_path: String,
    pub relevance_score: u32,
    /// 最多 3 行，按原文顺序
    pub excerpts: Vec<String>,
    pub match_summary: String,
}
