pub mod http;
pub mod stdio;

use std::path::Path;
use std::sync::Arc;

use search_core::{DocumentService, ExtractorRegistry, FileSystemDocumentStore, StoreConfig};

use crate::error::Result;

pub use http::HttpCommand;
pub use stdio::StdioCommand;

#[async_trait::async_trait]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// 加载文档目录并构建只读服务，两种传输方式共用
pub fn load_service(documents_dir: &Path, store_config: &StoreConfig) -> Arc<DocumentService> {
    let registry = ExtractorRegistry::default();
    let store = FileSystemDocumentStore::load(documents_dir, &registry, store_config);
    Arc::new(DocumentService::new(&store))
}
