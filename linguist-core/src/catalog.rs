//! 翻译目录：上下文、消息与查询
//!
//! 目录在加载时一次性构建，此后只读。查询按 (上下文, 注释, 原文) 三级哈希
//! 进行，找不到译文时原样返回原文。

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{Error, ParseError, Result};
use crate::plural::PluralRule;
use crate::ts;

/// 译文状态，对应 `<translation type="...">`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationKind {
    #[default]
    Finished,
    Unfinished,
    Obsolete,
    Vanished,
}

impl TranslationKind {
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "unfinished" => Some(Self::Unfinished),
            "obsolete" => Some(Self::Obsolete),
            "vanished" => Some(Self::Vanished),
            _ => None,
        }
    }

    pub fn as_attr(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Obsolete => Some("obsolete"),
            Self::Vanished => Some("vanished"),
        }
    }
}

/// 译文内容：普通文本或复数形式列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Text(String),
    Numerus(Vec<String>),
}

impl Default for Translation {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl Translation {
    /// 普通文本，或复数形式中的第一个
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Numerus(forms) => forms.first().map(String::as_str),
        }
    }
}

/// 源码位置引用 `<location filename=".." line=".."/>`
///
/// `line` 可能是 lupdate 生成的相对行号（如 `+3`），因此保留为字符串。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub filename: Option<String>,
    pub line: Option<String>,
}

/// 一条翻译消息
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub id: Option<String>,
    pub source: String,
    pub old_source: Option<String>,
    /// 消歧注释，参与查询键
    pub comment: Option<String>,
    pub old_comment: Option<String>,
    pub extra_comment: Option<String>,
    pub translator_comment: Option<String>,
    pub locations: Vec<Location>,
    pub kind: TranslationKind,
    pub translation: Translation,
}

impl Message {
    pub fn new(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            translation: Translation::Text(translation.into()),
            ..Self::default()
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_kind(mut self, kind: TranslationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_numerus(&self) -> bool {
        matches!(self.translation, Translation::Numerus(_))
    }

    fn key_comment(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }
}

/// 一个上下文（通常对应一个 UI 组件）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Context {
    pub name: String,
    pub comment: Option<String>,
    pub messages: Vec<Message>,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

/// `<TS>` 根元素上的文档属性
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentInfo {
    pub version: Option<String>,
    pub language: Option<String>,
    pub source_language: Option<String>,
}

/// 加载选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// 是否让 `type="unfinished"` 的非空译文参与查询（与 lrelease 默认一致）
    pub include_unfinished: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            include_unfinished: true,
        }
    }
}

// 上下文 -> 注释 -> 原文 -> (上下文下标, 消息下标)
type Index = HashMap<String, HashMap<String, HashMap<String, (usize, usize)>>>;

/// 一个语言的完整翻译目录，构建后只读
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    info: DocumentInfo,
    contexts: Vec<Context>,
    index: Index,
    plural: PluralRule,
    options: LoadOptions,
}

impl Catalog {
    /// 空目录：所有查询都返回原文
    pub fn empty() -> Self {
        Self::default()
    }

    /// 解析 `.ts` 字节流
    pub fn load(bytes: &[u8]) -> Result<Self, ParseError> {
        Self::load_with(bytes, LoadOptions::default())
    }

    pub fn load_with(bytes: &[u8], options: LoadOptions) -> Result<Self, ParseError> {
        let text = std::str::from_utf8(bytes)?;
        let (info, contexts) = ts::reader::parse(text)?;
        Ok(Self::from_parts(info, contexts, options))
    }

    /// 从文件加载，IO 错误与解析错误分开报告
    pub fn load_file(path: impl AsRef<Path>, options: LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::load_with(&bytes, options)?;
        info!(
            "Loaded catalog {} (language: {}, contexts: {}, messages: {})",
            path.display(),
            catalog.language().unwrap_or("-"),
            catalog.contexts.len(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// 由已解析的上下文构建目录并建立索引
    ///
    /// 同一上下文内 (原文, 注释) 重复时保留第一条。
    pub fn from_parts(info: DocumentInfo, contexts: Vec<Context>, options: LoadOptions) -> Self {
        let mut index = Index::new();
        for (ci, context) in contexts.iter().enumerate() {
            let by_comment = index.entry(context.name.clone()).or_default();
            for (mi, message) in context.messages.iter().enumerate() {
                let by_source = by_comment
                    .entry(message.key_comment().to_string())
                    .or_default();
                match by_source.entry(message.source.clone()) {
                    Entry::Vacant(slot) => {
                        slot.insert((ci, mi));
                    }
                    Entry::Occupied(mut slot) => {
                        let (kept_ci, kept_mi) = *slot.get();
                        let kept = &contexts[kept_ci].messages[kept_mi];
                        // 不参与查询的条目不能遮住后面可用的译文
                        if !message_active(kept, options) && message_active(message, options) {
                            slot.insert((ci, mi));
                        } else {
                            warn!(
                                "Duplicate message in context '{}': '{}', keeping the first one",
                                context.name, message.source
                            );
                        }
                    }
                }
            }
        }

        let plural = PluralRule::for_language(info.language.as_deref().unwrap_or(""));
        Self {
            info,
            contexts,
            index,
            plural,
            options,
        }
    }

    /// 查询译文，找不到时返回原文
    pub fn lookup<'a>(&'a self, context: &str, source: &'a str) -> &'a str {
        self.lookup_disambiguated(context, source, "")
    }

    /// 带消歧注释的查询；注释不匹配时退回空注释再查一次
    pub fn lookup_disambiguated<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: &str,
    ) -> &'a str {
        self.find_active(context, source, comment)
            .and_then(|message| message.translation.first())
            .filter(|text| !text.is_empty())
            .unwrap_or(source)
    }

    /// 复数查询：按目录语言的规则选取形式，并把 `%n` 替换为 `n`
    pub fn lookup_plural(&self, context: &str, source: &str, comment: &str, n: i64) -> String {
        let text = match self.find_active(context, source, comment) {
            Some(message) => match &message.translation {
                Translation::Numerus(forms) => self
                    .plural
                    .select(forms, n.unsigned_abs())
                    .filter(|text| !text.is_empty())
                    .unwrap_or(source),
                Translation::Text(text) => text.as_str(),
            },
            None => source,
        };
        text.replace("%n", &n.to_string())
    }

    /// 原始消息（包括不参与查询的过时条目）
    pub fn get(&self, context: &str, source: &str, comment: &str) -> Option<&Message> {
        let &(ci, mi) = self.index.get(context)?.get(comment)?.get(source)?;
        Some(&self.contexts[ci].messages[mi])
    }

    fn find_active(&self, context: &str, source: &str, comment: &str) -> Option<&Message> {
        let exact = self
            .get(context, source, comment)
            .filter(|message| self.is_active(message));
        if exact.is_some() || comment.is_empty() {
            return exact;
        }
        self.get(context, source, "")
            .filter(|message| self.is_active(message))
    }

    /// 消息是否参与查询
    pub fn is_active(&self, message: &Message) -> bool {
        message_active(message, self.options)
    }

    pub fn info(&self) -> &DocumentInfo {
        &self.info
    }

    pub fn language(&self) -> Option<&str> {
        self.info.language.as_deref()
    }

    pub fn plural_rule(&self) -> PluralRule {
        self.plural
    }

    pub fn options(&self) -> LoadOptions {
        self.options
    }

    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    /// 按名称取第一个同名上下文
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|context| context.name == name)
    }

    /// 消息总数（包括重复与过时条目）
    pub fn len(&self) -> usize {
        self.contexts.iter().map(|context| context.messages.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 参与查询的消息数量
    pub fn translated_count(&self) -> usize {
        self.index
            .values()
            .flat_map(HashMap::values)
            .flat_map(HashMap::values)
            .filter(|&&(ci, mi)| self.is_active(&self.contexts[ci].messages[mi]))
            .count()
    }

    /// 序列化为 `.ts` 文本
    pub fn to_ts_string(&self) -> std::io::Result<String> {
        let mut buf = Vec::new();
        self.write_ts(&mut buf)?;
        String::from_utf8(buf).map_err(std::io::Error::other)
    }

    pub fn write_ts<W: std::io::Write>(&self, writer: W) -> std::io::Result<()> {
        ts::writer::write(writer, &self.info, &self.contexts)
    }
}

/// 过时、消失、空译文（复数按第一个形式判断）以及被排除的未完成条目都不参与查询
fn message_active(message: &Message, options: LoadOptions) -> bool {
    match message.kind {
        TranslationKind::Obsolete | TranslationKind::Vanished => return false,
        TranslationKind::Unfinished if !options.include_unfinished => return false,
        _ => {}
    }
    message
        .translation
        .first()
        .is_some_and(|text| !text.is_empty())
}
