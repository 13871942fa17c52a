// search-core/src/index.rs
//! 搜索模块 - 关键词计分与排序
//!
//! 计分规则：
//! - 整个查询串（小写）出现在正文中：+20
//! - 每个关键词出现在标题中：+10，出现在正文中：+1
//!
//! 查询中重复的关键词会被重复计分。

use std::sync::Arc;

use crate::models::{Document, SearchResult};

const PHRASE_BONUS: u32 = 20;
const TITLE_BONUS: u32 = 10;
const CONTENT_BONUS: u32 = 1;
const MAX_EXCERPTS: usize = 3;

/// 把查询切分为小写关键词，保留重复项和原始顺序
pub fn tokenize_query(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(String::from)
        .collect()
}

/// 只读的文档索引
///
/// `build` 整体替换快照，查询不会修改索引。
#[derive(Debug, Clone, Default)]
pub struct DocumentIndex {
    documents: Arc<[Document]>,
}

/// 单个文档的匹配情况
struct Matches<'a> {
    title: &'a str,
    content: &'a str,
    phrase: &'a str,
    keywords: &'a [String],
}

impl Matches<'_> {
    fn score(&self) -> u32 {
        let mut score = 0;

        if self.content.contains(self.phrase) {
            score += PHRASE_BONUS;
        }

        for keyword in self.keywords {
            if self.title.contains(keyword.as_str()) {
                score += TITLE_BONUS;
            }
            if self.content.contains(keyword.as_str()) {
                score += CONTENT_BONUS;
            }
        }

        score
    }

    /// 匹配说明，去重后以 `; ` 连接
    fn describe(&self) -> String {
        let mut clauses: Vec<String> = Vec::new();
        let mut push = |clause: String| {
            if !clauses.contains(&clause) {
                clauses.push(clause);
            }
        };

        for keyword in self.keywords {
            if self.title.contains(keyword.as_str()) {
                push(format!("Title contains '{}'", keyword));
            }
            if self.content.contains(keyword.as_str()) {
                push(format!("Content contains '{}'", keyword));
            }
        }

        if self.content.contains(self.phrase) {
            push("Exact phrase match".to_string());
        }

        clauses.join("; ")
    }
}

/// 按行顺序取至多 `max` 行包含任一关键词的文本
fn extract_excerpts(content: &str, keywords: &[String], max: usize) -> Vec<String> {
    content
        .split('\n')
        .filter(|line| !line.is_empty())
        .filter(|line| {
            let lower = line.to_lowercase();
            keywords.iter().any(|keyword| lower.contains(keyword.as_str()))
        })
        .take(max)
        .map(|line| line.trim().to_string())
        .collect()
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用新的文档集合整体替换索引
    pub fn build(&mut self, documents: impl Into<Arc<[Document]>>) {
        self.documents = documents.into();
        tracing::debug!("[索引] 已构建，共 {} 个文档", self.documents.len());
    }

    /// 执行查询，返回按分数降序排列的结果
    ///
    /// 同分结果保持文档集合中的原始顺序。空白查询返回空结果。
    pub fn query(&self, text: &str) -> Vec<SearchResult> {
        let keywords = tokenize_query(text);
        if keywords.is_empty() {
            return Vec::new();
        }

        let phrase = text.to_lowercase();

        let mut results: Vec<SearchResult> = self
            .documents
            .iter()
            .filter_map(|doc| {
                let title = doc.title.to_lowercase();
                let content = doc.content.to_lowercase();
                let matches = Matches {
                    title: &title,
                    content: &content,
                    phrase: &phrase,
                    keywords: &keywords,
                };

                let score = matches.score();
                if score == 0 {
                    return None;
                }

                Some(SearchResult {
                    document_id: doc.id.clone(),
                    title: doc.title.clone(),
                    file_path: doc.file_path.clone(),
                    relevance_score: score,
                    excerpts: extract_excerpts(&doc.content, &keywords, MAX_EXCERPTS),
                    match_summary: matches.describe(),
                })
            })
            .collect();

        // sort_by 是稳定排序
        results.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));

        tracing::debug!("[索引] 查询 '{}' 命中 {} 个文档", text, results.len());
        results
    }
}
