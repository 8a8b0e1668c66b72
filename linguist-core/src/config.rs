use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::catalog::LoadOptions;
use crate::error::Result;
use crate::locale::preferred_locales;
use crate::yaml;

fn default_include_unfinished() -> bool {
    true
}

/// 语言加载配置
///
/// ```yaml
/// dir: ${LINGUIST_DIR:./translations}
/// prefix: deepin-image-viewer
/// locale: ${LANGUAGE:zh_HK}
/// include_unfinished: true
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct I18nConfig {
    /// `.ts` 文件目录；为空时使用编译期内嵌的目录
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// 文件名前缀，如 `deepin-image-viewer`
    #[serde(default)]
    pub prefix: String,
    /// 语言偏好，可以是 `LANGUAGE` 风格的列表
    #[serde(default)]
    pub locale: String,
    #[serde(default = "default_include_unfinished")]
    pub include_unfinished: bool,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl I18nConfig {
    pub fn new(prefix: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            dir: None,
            prefix: prefix.into(),
            locale: locale.into(),
            include_unfinished: true,
        }
    }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn include_unfinished(mut self, include: bool) -> Self {
        self.include_unfinished = include;
        self
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(yaml::load_from_file(path)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(yaml::load_from_str(content)?)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            include_unfinished: self.include_unfinished,
        }
    }

    /// 按优先级排列的语言列表
    pub fn locales(&self) -> Vec<String> {
        preferred_locales(&self.locale)
    }
}
