pub const TOP_LEVEL_DOMAIN: &str = "org";
pub const AUTHOR: &str = "document-server";
pub const APP_NAME: &str = "document-server";

pub const SERVER_CONFIG_FILE_NAME: &str = "server.toml";

/// 覆盖配置目录的环境变量
pub const CONFIG_DIR_ENV: &str = "DOCUMENT_SERVER_CONFIG_DIR";
