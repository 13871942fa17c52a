// search-core/src/config.rs
//! 配置模块

use serde::{Deserialize, Serialize};

/// 文档加载配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct StoreConfig {
    pub follow_symlinks: bool,
    /// 0 表示不限制深度
    pub max_depth: usize,
    /// 标题最多保留的字符数，超出部分以 `...` 结尾
    pub title_max_length: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            max_depth: 0,
            title_max_length: 100,
        }
    }
}
