// search-core/src/store.rs
//! 文档存储 - 启动时从目录加载全部文档

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use walkdir::WalkDir;

use crate::config::StoreConfig;
use crate::extract::ExtractorRegistry;
use crate::models::Document;

/// 文档来源
pub trait DocumentStore {
    /// 全部文档，按加载顺序
    fn load_documents(&self) -> Vec<Document>;

    /// 按 id 查找（忽略大小写，取第一个）
    fn get_by_id(&self, id: &str) -> Option<&Document>;
}

/// 由文件名派生文档 id：小写，空格替换为 `-`
pub fn document_id(file_stem: &str) -> String {
    file_stem.to_lowercase().replace(' ', "-")
}

/// 取正文第一行作为标题，过长时截断
fn derive_title(file_stem: &str, content: &str, max_length: usize) -> String {
    if content.trim().is_empty() || content.starts_with('[') {
        return file_stem.to_string();
    }

    let Some(first_line) = content
        .split('\n')
        .find(|line| !line.is_empty())
        .map(str::trim)
    else {
        return file_stem.to_string();
    };

    if first_line.chars().count() > max_length {
        let truncated: String = first_line.chars().take(max_length).collect();
        format!("{truncated}...")
    } else {
        first_line.to_string()
    }
}

/// 基于文件系统的文档存储
pub struct FileSystemDocumentStore {
    documents: Vec<Document>,
}

impl FileSystemDocumentStore {
    /// 扫描 `root` 下的所有文件并提取文本
    ///
    /// 目录不存在时返回空集合，不视为错误。
    pub fn load(root: &Path, registry: &ExtractorRegistry, config: &StoreConfig) -> Self {
        if !root.is_dir() {
            tracing::warn!("文档目录不存在: {:?}，将返回空结果", root);
            return Self { documents: Vec::new() };
        }

        tracing::info!("正在加载文档: {:?}", root);

        let mut walker = WalkDir::new(root)
            .follow_links(config.follow_symlinks)
            .sort_by_file_name();
        if config.max_depth > 0 {
            walker = walker.max_depth(config.max_depth);
        }

        let mut documents = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("遍历目录出错: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            match load_document(entry.path(), registry, config) {
                Ok(doc) => {
                    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
                    tracing::info!("  已加载: {}", relative.display());
                    documents.push(doc);
                }
                Err(e) => {
                    tracing::warn!("  加载失败 {:?}: {:#}", entry.path(), e);
                }
            }
        }

        if documents.is_empty() {
            tracing::warn!("没有加载到任何文档，所有查询都将返回空结果");
        } else {
            tracing::info!("共加载 {} 个文档", documents.len());
        }

        Self { documents }
    }

    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

fn load_document(path: &Path, registry: &ExtractorRegistry, config: &StoreConfig) -> anyhow::Result<Document> {
    let metadata = fs::metadata(path)?;
    let date: DateTime<Utc> = metadata.modified()?.into();

    let file_stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();

    let content = registry.extract_content(path);
    let title = derive_title(&file_stem, &content, config.title_max_length);

    Ok(Document {
        id: document_id(&file_stem),
        title,
        date,
        content,
        file_path: path.to_string_lossy().to_string(),
    })
}

impl DocumentStore for FileSystemDocumentStore {
    fn load_documents(&self) -> Vec<Document> {
        self.documents.clone()
    }

    fn get_by_id(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id_matches(id))
    }
}
