// apps/server/src/command/http.rs
//! HTTP 模式 - REST 接口

use super::{Command, load_service};
use crate::config::Config;
use crate::error::{Result, WrapErr};
use crate::routes;
use std::path::PathBuf;
use tracing::info;

pub struct HttpCommand {
    config: Config,
    documents_dir: PathBuf,
}

impl HttpCommand {
    pub fn new(config: Config, documents_dir: PathBuf) -> Self {
        Self { config, documents_dir }
    }
}

#[async_trait::async_trait]
impl Command for HttpCommand {
    async fn execute(&self) -> Result<()> {
        let service = load_service(&self.documents_dir, &self.config.store);
        let document_count = service.document_count();
        let app = routes::router(service);

        let addr = self.config.http_addr;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .wrap_err_with(|| format!("Failed to bind {}", addr))?;

        info!("HTTP 文档服务已启动: http://{}，共 {} 个文档", addr, document_count);
        axum::serve(listener, app).await?;

        Ok(())
    }
}
