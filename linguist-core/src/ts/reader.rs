use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::catalog::{Context, DocumentInfo, Location, Message, Translation, TranslationKind};
use crate::error::ParseError;

/// 解析 `.ts` 文档，返回根元素属性与全部上下文
pub fn parse(text: &str) -> Result<(DocumentInfo, Vec<Context>), ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut parser = Parser::new(text);
    parser.document()
}

struct Parser<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        let mut reader = Reader::from_str(text);
        // 文本节点保留首尾空白，结构元素之间的空白由解析器自行忽略
        reader.config_mut().trim_text(false);
        Self { reader }
    }

    fn position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    fn next(&mut self) -> Result<Event<'a>, ParseError> {
        self.reader.read_event().map_err(|source| ParseError::Xml {
            position: self.position(),
            source,
        })
    }

    fn unexpected(&self, detail: impl Into<String>) -> ParseError {
        ParseError::Unexpected {
            position: self.position(),
            detail: detail.into(),
        }
    }

    fn attr(&self, start: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, ParseError> {
        for attr in start.attributes() {
            let attr = attr.map_err(|err| ParseError::Xml {
                position: self.position(),
                source: err.into(),
            })?;
            if attr.key.as_ref() == name {
                let value = attr.unescape_value().map_err(|source| ParseError::Xml {
                    position: self.position(),
                    source,
                })?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    fn document(&mut self) -> Result<(DocumentInfo, Vec<Context>), ParseError> {
        let mut root = None;
        loop {
            match self.next()? {
                Event::Start(start) | Event::Empty(start) if root.is_some() => {
                    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    return Err(self.unexpected(format!("second root element <{name}>")));
                }
                Event::Start(start) if start.name().as_ref() == b"TS" => {
                    let info = self.document_info(&start)?;
                    let contexts = self.ts_body()?;
                    root = Some((info, contexts));
                }
                Event::Empty(start) if start.name().as_ref() == b"TS" => {
                    root = Some((self.document_info(&start)?, Vec::new()));
                }
                Event::Start(start) | Event::Empty(start) => {
                    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    return Err(self.unexpected(format!("unexpected root element <{name}>")));
                }
                Event::Text(text) => {
                    if !is_blank(&text) {
                        return Err(self.unexpected("text outside of the <TS> element"));
                    }
                }
                Event::CData(_) => return Err(self.unexpected("CDATA outside of the <TS> element")),
                Event::End(_) => return Err(self.unexpected("unmatched end tag")),
                Event::Eof => break,
                _ => {}
            }
        }
        root.ok_or(ParseError::MissingRoot)
    }

    fn document_info(&self, start: &BytesStart<'_>) -> Result<DocumentInfo, ParseError> {
        Ok(DocumentInfo {
            version: self.attr(start, b"version")?,
            language: self.attr(start, b"language")?,
            source_language: self.attr(start, b"sourcelanguage")?,
        })
    }

    fn ts_body(&mut self) -> Result<Vec<Context>, ParseError> {
        let mut contexts = Vec::new();
        loop {
            match self.next()? {
                Event::Start(start) => match start.name().as_ref() {
                    b"context" => contexts.push(self.context()?),
                    _ => self.skip(&start)?,
                },
                Event::End(_) => return Ok(contexts),
                Event::Eof => return Err(eof("TS")),
                _ => {}
            }
        }
    }

    fn context(&mut self) -> Result<Context, ParseError> {
        let mut name = None;
        let mut context = Context::default();
        loop {
            match self.next()? {
                Event::Start(start) => match start.name().as_ref() {
                    b"name" => name = Some(self.text("name")?),
                    b"comment" => context.comment = Some(self.text("comment")?),
                    b"message" => context.messages.push(self.message(&start)?),
                    _ => self.skip(&start)?,
                },
                Event::Empty(start) => match start.name().as_ref() {
                    b"name" => name = Some(String::new()),
                    b"comment" => context.comment = Some(String::new()),
                    b"message" => {
                        return Err(ParseError::MissingElement {
                            parent: "message",
                            child: "source",
                            position: self.position(),
                        });
                    }
                    _ => {}
                },
                Event::End(_) => break,
                Event::Eof => return Err(eof("context")),
                _ => {}
            }
        }
        context.name = name.ok_or_else(|| ParseError::MissingElement {
            parent: "context",
            child: "name",
            position: self.position(),
        })?;
        Ok(context)
    }

    fn message(&mut self, start: &BytesStart<'_>) -> Result<Message, ParseError> {
        let numerus = self.attr(start, b"numerus")?.as_deref() == Some("yes");
        let mut message = Message {
            id: self.attr(start, b"id")?,
            ..Message::default()
        };
        let mut source = None;
        let mut translation = None;

        loop {
            match self.next()? {
                Event::Start(start) => match start.name().as_ref() {
                    b"source" => source = Some(self.text("source")?),
                    b"oldsource" => message.old_source = Some(self.text("oldsource")?),
                    b"comment" => message.comment = Some(self.text("comment")?),
                    b"oldcomment" => message.old_comment = Some(self.text("oldcomment")?),
                    b"extracomment" => message.extra_comment = Some(self.text("extracomment")?),
                    b"translatorcomment" => {
                        message.translator_comment = Some(self.text("translatorcomment")?)
                    }
                    b"location" => {
                        message.locations.push(self.location(&start)?);
                        self.skip(&start)?;
                    }
                    b"translation" => {
                        message.kind = self.translation_kind(&start)?;
                        translation = Some(if numerus {
                            Translation::Numerus(self.numerus_forms()?)
                        } else {
                            Translation::Text(self.text("translation")?)
                        });
                    }
                    _ => self.skip(&start)?,
                },
                Event::Empty(start) => match start.name().as_ref() {
                    b"source" => source = Some(String::new()),
                    b"oldsource" => message.old_source = Some(String::new()),
                    b"comment" => message.comment = Some(String::new()),
                    b"oldcomment" => message.old_comment = Some(String::new()),
                    b"extracomment" => message.extra_comment = Some(String::new()),
                    b"translatorcomment" => message.translator_comment = Some(String::new()),
                    b"location" => message.locations.push(self.location(&start)?),
                    b"translation" => {
                        message.kind = self.translation_kind(&start)?;
                        translation = Some(if numerus {
                            Translation::Numerus(Vec::new())
                        } else {
                            Translation::Text(String::new())
                        });
                    }
                    _ => {}
                },
                Event::End(_) => break,
                Event::Eof => return Err(eof("message")),
                _ => {}
            }
        }

        message.source = source.ok_or_else(|| self.missing("source"))?;
        message.translation = translation.ok_or_else(|| self.missing("translation"))?;
        Ok(message)
    }

    fn missing(&self, child: &'static str) -> ParseError {
        ParseError::MissingElement {
            parent: "message",
            child,
            position: self.position(),
        }
    }

    fn location(&self, start: &BytesStart<'_>) -> Result<Location, ParseError> {
        Ok(Location {
            filename: self.attr(start, b"filename")?,
            line: self.attr(start, b"line")?,
        })
    }

    fn translation_kind(&self, start: &BytesStart<'_>) -> Result<TranslationKind, ParseError> {
        Ok(self
            .attr(start, b"type")?
            .as_deref()
            .and_then(TranslationKind::from_attr)
            .unwrap_or_default())
    }

    fn numerus_forms(&mut self) -> Result<Vec<String>, ParseError> {
        let mut forms = Vec::new();
        loop {
            match self.next()? {
                Event::Start(start) if start.name().as_ref() == b"numerusform" => {
                    forms.push(self.text("numerusform")?);
                }
                Event::Empty(start) if start.name().as_ref() == b"numerusform" => {
                    forms.push(String::new());
                }
                Event::Start(start) => self.skip(&start)?,
                Event::End(_) => return Ok(forms),
                Event::Eof => return Err(eof("translation")),
                _ => {}
            }
        }
    }

    /// 读取叶子元素的文本，支持 `<byte value="x1b"/>` 控制字符
    fn text(&mut self, element: &str) -> Result<String, ParseError> {
        let mut out = String::new();
        loop {
            match self.next()? {
                Event::Text(text) => {
                    let text = text.unescape().map_err(|source| ParseError::Xml {
                        position: self.position(),
                        source,
                    })?;
                    out.push_str(&text);
                }
                Event::CData(data) => {
                    out.push_str(std::str::from_utf8(&data)?);
                }
                Event::Empty(start) if start.name().as_ref() == b"byte" => {
                    let value = self.attr(&start, b"value")?.unwrap_or_default();
                    out.push(self.byte_value(&value)?);
                }
                Event::Start(start) | Event::Empty(start) => {
                    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    return Err(self.unexpected(format!("<{name}> inside <{element}>")));
                }
                Event::End(_) => return Ok(out),
                Event::Eof => return Err(eof(element)),
                _ => {}
            }
        }
    }

    fn byte_value(&self, value: &str) -> Result<char, ParseError> {
        let code = match value.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => value.parse::<u32>(),
        };
        code.ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.unexpected(format!("invalid <byte value=\"{value}\"/>")))
    }

    /// 跳过不关心的元素及其全部子树
    fn skip(&mut self, start: &BytesStart<'_>) -> Result<(), ParseError> {
        let name = start.name().as_ref().to_vec();
        let mut depth = 0usize;
        loop {
            match self.next()? {
                Event::Start(_) => depth += 1,
                Event::End(_) if depth == 0 => return Ok(()),
                Event::End(_) => depth -= 1,
                Event::Eof => return Err(eof(&String::from_utf8_lossy(&name))),
                _ => {}
            }
        }
    }
}

fn is_blank(text: &[u8]) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

fn eof(element: &str) -> ParseError {
    ParseError::UnexpectedEof {
        element: element.to_string(),
    }
}
