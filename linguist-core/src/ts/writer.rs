use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::catalog::{Context, DocumentInfo, Message, Translation};

const INDENT: &str = "    ";

/// 按 lupdate 的排版输出 `.ts` 文档
pub fn write<W: Write>(inner: W, info: &DocumentInfo, contexts: &[Context]) -> io::Result<()> {
    let mut out = TsWriter {
        writer: Writer::new(inner),
    };
    out.document(info, contexts)
}

struct TsWriter<W: Write> {
    writer: Writer<W>,
}

fn to_io<E: std::error::Error + Send + Sync + 'static>(err: E) -> io::Error {
    io::Error::other(err)
}

impl<W: Write> TsWriter<W> {
    fn event(&mut self, event: Event<'_>) -> io::Result<()> {
        self.writer.write_event(event).map_err(to_io)
    }

    // 缩进由写入器自行输出，避免空白混入叶子元素的文本
    fn newline(&mut self, level: usize) -> io::Result<()> {
        let ws = format!("\n{}", INDENT.repeat(level));
        self.event(Event::Text(BytesText::from_escaped(ws)))
    }

    fn document(&mut self, info: &DocumentInfo, contexts: &[Context]) -> io::Result<()> {
        self.event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.newline(0)?;
        self.event(Event::DocType(BytesText::from_escaped("TS")))?;
        self.newline(0)?;

        let mut root = BytesStart::new("TS");
        if let Some(version) = &info.version {
            root.push_attribute(("version", version.as_str()));
        }
        if let Some(language) = &info.language {
            root.push_attribute(("language", language.as_str()));
        }
        if let Some(source_language) = &info.source_language {
            root.push_attribute(("sourcelanguage", source_language.as_str()));
        }
        self.event(Event::Start(root))?;

        for context in contexts {
            self.newline(0)?;
            self.context(context)?;
        }

        self.newline(0)?;
        self.event(Event::End(BytesEnd::new("TS")))?;
        self.newline(0)
    }

    fn context(&mut self, context: &Context) -> io::Result<()> {
        self.event(Event::Start(BytesStart::new("context")))?;
        self.newline(1)?;
        self.leaf("name", &context.name, Vec::new())?;
        if let Some(comment) = &context.comment {
            self.newline(1)?;
            self.leaf("comment", comment, Vec::new())?;
        }
        for message in &context.messages {
            self.newline(1)?;
            self.message(message)?;
        }
        self.newline(0)?;
        self.event(Event::End(BytesEnd::new("context")))
    }

    fn message(&mut self, message: &Message) -> io::Result<()> {
        let mut start = BytesStart::new("message");
        if let Some(id) = &message.id {
            start.push_attribute(("id", id.as_str()));
        }
        if message.is_numerus() {
            start.push_attribute(("numerus", "yes"));
        }
        self.event(Event::Start(start))?;

        for location in &message.locations {
            self.newline(2)?;
            let mut element = BytesStart::new("location");
            if let Some(filename) = &location.filename {
                element.push_attribute(("filename", filename.as_str()));
            }
            if let Some(line) = &location.line {
                element.push_attribute(("line", line.as_str()));
            }
            self.event(Event::Empty(element))?;
        }

        let optional = [
            ("source", Some(&message.source)),
            ("oldsource", message.old_source.as_ref()),
            ("comment", message.comment.as_ref()),
            ("oldcomment", message.old_comment.as_ref()),
            ("extracomment", message.extra_comment.as_ref()),
            ("translatorcomment", message.translator_comment.as_ref()),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                self.newline(2)?;
                self.leaf(name, value, Vec::new())?;
            }
        }

        self.newline(2)?;
        let attrs: Vec<(&str, &str)> = message
            .kind
            .as_attr()
            .map(|kind| vec![("type", kind)])
            .unwrap_or_default();
        match &message.translation {
            Translation::Text(text) => self.leaf("translation", text, attrs)?,
            Translation::Numerus(forms) => {
                let mut start = BytesStart::new("translation");
                start.extend_attributes(attrs);
                self.event(Event::Start(start))?;
                for form in forms {
                    self.newline(3)?;
                    self.leaf("numerusform", form, Vec::new())?;
                }
                self.newline(2)?;
                self.event(Event::End(BytesEnd::new("translation")))?;
            }
        }

        self.newline(1)?;
        self.event(Event::End(BytesEnd::new("message")))
    }

    /// 写出叶子元素，不可表示的控制字符写为 `<byte value="x.."/>`
    fn leaf(&mut self, name: &str, text: &str, attrs: Vec<(&str, &str)>) -> io::Result<()> {
        let mut start = BytesStart::new(name);
        start.extend_attributes(attrs);
        if text.is_empty() {
            return self.event(Event::Empty(start));
        }
        self.event(Event::Start(start))?;

        let mut run = String::new();
        for ch in text.chars() {
            if is_xml_char(ch) {
                run.push(ch);
                continue;
            }
            if !run.is_empty() {
                self.event(Event::Text(BytesText::new(&run)))?;
                run.clear();
            }
            let value = format!("x{:x}", u32::from(ch));
            let mut byte = BytesStart::new("byte");
            byte.push_attribute(("value", value.as_str()));
            self.event(Event::Empty(byte))?;
        }
        if !run.is_empty() {
            self.event(Event::Text(BytesText::new(&run)))?;
        }

        self.event(Event::End(BytesEnd::new(name)))
    }
}

fn is_xml_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r') || u32::from(ch) >= 0x20
}
