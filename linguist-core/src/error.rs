use std::path::PathBuf;

use thiserror::Error;

use crate::yaml::YamlLoaderError;

/// `.ts` 文档解析错误
///
/// 解析失败对当前语言的加载是致命的，调用方应退回到未翻译模式。
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        position: u64,
        source: quick_xml::Error,
    },
    #[error("input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("document has no <TS> root element")]
    MissingRoot,
    #[error("unexpected end of input inside <{element}>")]
    UnexpectedEof { element: String },
    #[error("<{parent}> ending at byte {position} has no <{child}> element")]
    MissingElement {
        parent: &'static str,
        child: &'static str,
        position: u64,
    },
    #[error("unexpected content at byte {position}: {detail}")]
    Unexpected { position: u64, detail: String },
}

/// 对外暴露的统一错误
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse translation catalog: {0}")]
    Parse(#[from] ParseError),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("config error: {0}")]
    Config(#[from] YamlLoaderError),
    #[error("no catalog found for locale '{locale}' (searched: {})", .searched.join(", "))]
    LocaleNotFound {
        locale: String,
        searched: Vec<String>,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
