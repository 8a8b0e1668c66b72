//! Qt Linguist `.ts` 翻译目录
//!
//! 加载一次、只读共享的 (上下文, 原文) -> 译文 映射，缺失时回退为原文。

pub mod catalog;
pub mod config;
pub mod embedded;
pub mod error;
pub mod locale;
pub mod plural;
pub mod translator;
pub mod ts;
pub mod yaml;

pub use catalog::{
    Catalog, Context, DocumentInfo, LoadOptions, Location, Message, Translation, TranslationKind,
};
pub use config::I18nConfig;
pub use error::{Error, ParseError, Result};
pub use plural::PluralRule;
pub use translator::Translator;

// 重导出给 include_catalogs! 宏使用
pub use ctor;
