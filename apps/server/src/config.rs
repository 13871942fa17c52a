use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use config::{create_strategy, server_config_path};
use search_core::StoreConfig;

/// 未指定目录时使用的相对路径
pub const DEFAULT_DOCUMENTS_DIR: &str = "Documents";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// 文档目录，命令行参数优先
    pub documents_dir: Option<PathBuf>,
    /// HTTP 模式的监听地址
    pub http_addr: SocketAddr,
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            documents_dir: None,
            http_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 5000)),
            store: StoreConfig::default(),
        }
    }
}

const EXAMPLE_CONFIG: &str = r#"# document-server 配置文件
#
# 此文件在首次运行时自动创建
# 配置修改后重启服务生效

# 文档目录，命令行位置参数优先；都不提供时使用 ./Documents
# documents-dir = "/Users/yourname/Documents"

# HTTP 模式的监听地址
# http-addr = "127.0.0.1:5000"

[store]
# 是否跟随符号链接
# follow-symlinks = false

# 最大遍历深度，0 表示不限制
# max-depth = 0

# 标题最多保留的字符数
# title-max-length = 100
"#;

impl Config {
    fn load_str(user_config_str: &str) -> Result<Config> {
        let user_config: Config = toml::from_str(user_config_str)?;
        Ok(user_config)
    }

    /// 加载失败时记录警告并退回默认配置
    pub fn load_or_default() -> Config {
        match create_strategy() {
            Ok(strategy) => Self::load_from_or_default(&server_config_path(&strategy)),
            Err(e) => {
                tracing::warn!("无法确定配置目录，使用默认配置: {}", e);
                Config::default()
            }
        }
    }

    pub fn load_from_or_default(config_path: &Path) -> Config {
        Self::load_from(config_path).unwrap_or_else(|e| {
            tracing::warn!("加载配置文件 {:?} 失败，使用默认配置: {:#}", config_path, e);
            Config::default()
        })
    }

    pub fn load_from(config_path: &Path) -> Result<Config> {
        match std::fs::read_to_string(config_path) {
            Ok(user_config_str) => Self::load_str(&user_config_str),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // 配置文件不存在，创建示例配置文件
                if let Err(e) = Self::create_example_config(config_path) {
                    tracing::warn!("无法创建示例配置文件 {:?}: {}", config_path, e);
                }
                Ok(Config::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn create_example_config(config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(config_path, EXAMPLE_CONFIG)?;

        tracing::info!("已创建配置文件: {:?}", config_path);
        Ok(())
    }

    /// 命令行 > 配置文件 > ./Documents
    pub fn documents_dir(&self, cli_path: Option<PathBuf>) -> PathBuf {
        cli_path
            .or_else(|| self.documents_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENTS_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_example_config_parses_to_defaults() {
        assert_eq!(Config::load_str(EXAMPLE_CONFIG).unwrap(), Config::default());
    }

    #[test]
    fn test_missing_file_writes_example() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("server.toml");

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), EXAMPLE_CONFIG);
    }

    #[test]
    fn test_load_user_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(
            &path,
            "documents-dir = \"/srv/docs\"\nhttp-addr = \"0.0.0.0:8080\"\n\n[store]\nmax-depth = 3\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.documents_dir, Some(PathBuf::from("/srv/docs")));
        assert_eq!(config.http_addr.port(), 8080);
        assert_eq!(config.store.max_depth, 3);
        assert_eq!(config.store.title_max_length, 100);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(&path, "http-addr = [not toml").unwrap();

        assert!(Config::load_from(&path).is_err());
        assert_eq!(Config::load_from_or_default(&path), Config::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::load_str("watch-paths = []").is_err());
    }

    #[test]
    fn test_documents_dir_precedence() {
        let config = Config {
            documents_dir: Some(PathBuf::from("/from/config")),
            ..Config::default()
        };

        assert_eq!(config.documents_dir(Some(PathBuf::from("/from/cli"))), PathBuf::from("/from/cli"));
        assert_eq!(config.documents_dir(None), PathBuf::from("/from/config"));
        assert_eq!(Config::default().documents_dir(None), PathBuf::from("Documents"));
    }
}
