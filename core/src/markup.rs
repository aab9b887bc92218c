use crate::{Alignment, Block, Cell, Inline, ListItem, StringInterner, Style};
use std::sync::Arc;
use uuid::Uuid;

/// Best-effort markup scanner. The source text is trusted verbatim: unknown
/// tags are skipped, unbalanced tags close at end of input, nothing is
/// repaired or rejected.

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open { name: String, raw: String },
    Close { name: String },
    Text(String),
}

fn tokenize(markup: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut chars = markup.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '<' {
            if !buf.is_empty() {
                out.push(Token::Text(std::mem::take(&mut buf)));
            }
            let mut tag = String::new();
            for c in chars.by_ref() {
                if c == '>' {
                    break;
                }
                tag.push(c);
            }
            let raw = tag.trim().to_string();
            if let Some(name) = raw.strip_prefix('/') {
                out.push(Token::Close { name: name.trim().to_lowercase() });
            } else {
                let name = raw
                    .trim_end_matches('/')
                    .split_whitespace()
                    .next()
                    .unwrap_or("")
                    .to_lowercase();
                out.push(Token::Open { name, raw });
            }
        } else {
            buf.push(ch);
        }
    }
    if !buf.is_empty() {
        out.push(Token::Text(buf));
    }
    out
}

/// Pulls `name="value"` (or single-quoted) out of a raw tag body.
/// ASCII case folding only: it keeps byte offsets valid on `raw`, which
/// may carry arbitrary multibyte text from a hand-edited Source buffer.
fn attr(raw: &str, name: &str) -> Option<String> {
    let lower = raw.to_ascii_lowercase();
    let key = format!("{}=", name);
    let idx = lower.find(&key)?;
    let tail = &raw[idx + key.len()..];
    let quote = tail.chars().next()?;
    if quote == '"' || quote == '\'' {
        let rest = &tail[1..];
        let end = rest.find(quote)?;
        Some(rest[..end].to_string())
    } else {
        Some(tail.split_whitespace().next().unwrap_or("").to_string())
    }
}

/// Digs a `key:value` pair out of an inline `style="..."` attribute.
fn style_prop(raw: &str, prop: &str) -> Option<String> {
    let style = attr(raw, "style")?;
    for part in style.split(';') {
        let mut kv = part.splitn(2, ':');
        let key = kv.next()?.trim().to_lowercase();
        if key == prop {
            return Some(kv.next()?.trim().to_string());
        }
    }
    None
}

pub fn parse(markup: &str) -> Vec<Block> {
    let mut interner = StringInterner::new();
    let tokens = tokenize(markup);
    let mut blocks = parse_blocks(&tokens, &mut 0, None, &mut interner);
    if blocks.is_empty() {
        let trimmed = markup.trim();
        if !trimmed.is_empty() {
            blocks.push(text_paragraph(trimmed, &mut interner));
        }
    }
    blocks
}

fn text_paragraph(text: &str, interner: &mut StringInterner) -> Block {
    Block::Paragraph {
        id: Uuid::new_v4(),
        align: Alignment::Left,
        content: vec![Inline::Text { value: interner.intern(&unescape(text)) }],
    }
}

fn parse_blocks(
    tokens: &[Token],
    pos: &mut usize,
    until: Option<&str>,
    interner: &mut StringInterner,
) -> Vec<Block> {
    let mut blocks = Vec::new();
    while *pos < tokens.len() {
        match &tokens[*pos] {
            Token::Close { name } => {
                if Some(name.as_str()) == until {
                    *pos += 1;
                    return blocks;
                }
                *pos += 1;
            }
            Token::Text(text) => {
                // Bare top-level text becomes its own paragraph.
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    blocks.push(text_paragraph(trimmed, interner));
                }
                *pos += 1;
            }
            Token::Open { name, raw } => {
                let raw = raw.clone();
                let name = name.clone();
                *pos += 1;
                match name.as_str() {
                    "p" => {
                        let align = attr(&raw, "align")
                            .and_then(|a| Alignment::parse(&a))
                            .unwrap_or_default();
                        let content = parse_inlines(tokens, pos, "p", interner);
                        blocks.push(Block::Paragraph { id: Uuid::new_v4(), align, content });
                    }
                    "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                        let level = name.as_bytes()[1] - b'0';
                        let content = parse_inlines(tokens, pos, &name, interner);
                        blocks.push(Block::Heading { id: Uuid::new_v4(), level, content });
                    }
                    "ul" | "ol" => {
                        let items = parse_list_items(tokens, pos, &name, interner);
                        blocks.push(Block::List {
                            id: Uuid::new_v4(),
                            ordered: name == "ol",
                            items,
                        });
                    }
                    "blockquote" => {
                        let content = parse_blocks(tokens, pos, Some("blockquote"), interner);
                        blocks.push(Block::Quote { id: Uuid::new_v4(), content });
                    }
                    "pre" => {
                        let mut code = String::new();
                        while *pos < tokens.len() {
                            match &tokens[*pos] {
                                Token::Close { name } if name == "pre" => {
                                    *pos += 1;
                                    break;
                                }
                                Token::Text(text) => {
                                    code.push_str(text);
                                    *pos += 1;
                                }
                                _ => *pos += 1,
                            }
                        }
                        blocks.push(Block::Code {
                            id: Uuid::new_v4(),
                            code: interner.intern(&unescape(&code)),
                        });
                    }
                    "table" => {
                        let rows = parse_table_rows(tokens, pos, interner);
                        blocks.push(Block::Table { id: Uuid::new_v4(), rows });
                    }
                    "img" => {
                        let src = attr(&raw, "src").unwrap_or_default();
                        let alt = attr(&raw, "alt");
                        blocks.push(Block::Image {
                            id: Uuid::new_v4(),
                            src: Arc::from(src),
                            alt: alt.map(Arc::from),
                        });
                    }
                    _ => {}
                }
            }
        }
    }
    blocks
}

/// Shared child scan: visits each opening tag until the matching close of
/// `until` is consumed, skipping everything else.
fn scan_children<T>(
    tokens: &[Token],
    pos: &mut usize,
    until: &str,
    mut visit: impl FnMut(&str, &mut usize) -> Option<T>,
) -> Vec<T> {
    let mut out = Vec::new();
    while *pos < tokens.len() {
        match &tokens[*pos] {
            Token::Close { name } if name == until => {
                *pos += 1;
                break;
            }
            Token::Open { name, .. } => {
                let name = name.clone();
                *pos += 1;
                if let Some(item) = visit(&name, pos) {
                    out.push(item);
                }
            }
            _ => *pos += 1,
        }
    }
    out
}

fn parse_list_items(
    tokens: &[Token],
    pos: &mut usize,
    list_tag: &str,
    interner: &mut StringInterner,
) -> Vec<ListItem> {
    scan_children(tokens, pos, list_tag, |name, pos| {
        (name == "li").then(|| ListItem {
            id: Uuid::new_v4(),
            content: parse_inlines(tokens, pos, "li", interner),
        })
    })
}

fn parse_table_rows(
    tokens: &[Token],
    pos: &mut usize,
    interner: &mut StringInterner,
) -> Vec<Vec<Cell>> {
    scan_children(tokens, pos, "table", |name, pos| {
        if name != "tr" {
            return None;
        }
        let row = scan_children(tokens, pos, "tr", |cell, pos| {
            matches!(cell, "td" | "th")
                .then(|| Cell { content: parse_inlines(tokens, pos, cell, interner) })
        });
        (!row.is_empty()).then_some(row)
    })
}

/// Flat inline scan with accumulated style flags, closing at `until`.
/// Nesting is flattened to one styled span per text run.
fn parse_inlines(
    tokens: &[Token],
    pos: &mut usize,
    until: &str,
    interner: &mut StringInterner,
) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut style = Style::default();
    while *pos < tokens.len() {
        match &tokens[*pos] {
            Token::Close { name } if name == until => {
                *pos += 1;
                break;
            }
            Token::Text(text) => {
                push_styled(&mut out, &normalize_text(&unescape(text)), &style, interner);
                *pos += 1;
            }
            Token::Open { name, raw } => {
                let raw = raw.clone();
                match name.as_str() {
                    "b" | "strong" => style.bold = true,
                    "i" | "em" => style.italic = true,
                    "u" => style.underline = true,
                    "s" | "strike" | "del" => style.strikethrough = true,
                    "span" => {
                        if let Some(color) = style_prop(&raw, "color") {
                            style.color = Some(Arc::from(color));
                        }
                        if let Some(size) = style_prop(&raw, "font-size") {
                            style.size = size.trim_end_matches("px").parse().ok();
                        }
                    }
                    "a" => {
                        *pos += 1;
                        let url = attr(&raw, "href").unwrap_or_default();
                        let mut text = String::new();
                        while *pos < tokens.len() {
                            match &tokens[*pos] {
                                Token::Close { name } if name == "a" => break,
                                Token::Text(t) => {
                                    text.push_str(t);
                                    *pos += 1;
                                }
                                _ => *pos += 1,
                            }
                        }
                        out.push(Inline::Link {
                            url: Arc::from(url),
                            text: vec![Inline::Text {
                                value: interner.intern(&normalize_text(&unescape(&text))),
                            }],
                        });
                    }
                    _ => {}
                }
                *pos += 1;
            }
            Token::Close { name } => {
                match name.as_str() {
                    "b" | "strong" => style.bold = false,
                    "i" | "em" => style.italic = false,
                    "u" => style.underline = false,
                    "s" | "strike" | "del" => style.strikethrough = false,
                    "span" => {
                        style.color = None;
                        style.size = None;
                    }
                    _ => {}
                }
                *pos += 1;
            }
        }
    }
    out
}

/// Line breaks inside markup are presentation, not content: re-indented
/// Source text must collapse back to the same inline runs. Single-line
/// text keeps its spaces untouched.
fn normalize_text(text: &str) -> String {
    if !text.contains('\n') {
        return text.to_string();
    }
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn push_styled(out: &mut Vec<Inline>, text: &str, style: &Style, interner: &mut StringInterner) {
    if text.is_empty() {
        return;
    }
    let value = interner.intern(text);
    if style.is_plain() {
        out.push(Inline::Text { value });
    } else {
        out.push(Inline::Styled {
            style: style.clone(),
            content: vec![Inline::Text { value }],
        });
    }
}

pub fn serialize(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        write_block(&mut out, block);
    }
    out
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Paragraph { align, content, .. } => {
            if *align == Alignment::Left {
                out.push_str("<p>");
            } else {
                out.push_str(&format!("<p align=\"{}\">", align.as_str()));
            }
            write_inlines(out, content);
            out.push_str("</p>");
        }
        Block::Heading { level, content, .. } => {
            out.push_str(&format!("<h{}>", level));
            write_inlines(out, content);
            out.push_str(&format!("</h{}>", level));
        }
        Block::List { ordered, items, .. } => {
            let tag = if *ordered { "ol" } else { "ul" };
            out.push_str(&format!("<{}>", tag));
            for item in items {
                out.push_str("<li>");
                write_inlines(out, &item.content);
                out.push_str("</li>");
            }
            out.push_str(&format!("</{}>", tag));
        }
        Block::Quote { content, .. } => {
            out.push_str("<blockquote>");
            for inner in content {
                write_block(out, inner);
            }
            out.push_str("</blockquote>");
        }
        Block::Code { code, .. } => {
            out.push_str("<pre>");
            out.push_str(&escape(code));
            out.push_str("</pre>");
        }
        Block::Table { rows, .. } => {
            out.push_str("<table border=\"1\" style=\"border-collapse:collapse\">");
            for row in rows {
                out.push_str("<tr>");
                for cell in row {
                    out.push_str("<td>");
                    write_inlines(out, &cell.content);
                    out.push_str("</td>");
                }
                out.push_str("</tr>");
            }
            out.push_str("</table>");
        }
        Block::Image { src, alt, .. } => {
            match alt {
                Some(alt) => out.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\"/>",
                    src,
                    escape(alt)
                )),
                None => out.push_str(&format!("<img src=\"{}\"/>", src)),
            }
        }
    }
}

fn write_inlines(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text { value } => out.push_str(&escape(value)),
            Inline::Symbol { glyph } => out.push_str(glyph),
            Inline::Link { url, text } => {
                out.push_str(&format!("<a href=\"{}\">", url));
                write_inlines(out, text);
                out.push_str("</a>");
            }
            Inline::Styled { style, content } => {
                let mut close = Vec::new();
                if style.color.is_some() || style.size.is_some() {
                    let mut css = String::new();
                    if let Some(color) = &style.color {
                        css.push_str(&format!("color:{};", color));
                    }
                    if let Some(size) = style.size {
                        css.push_str(&format!("font-size:{}px;", size));
                    }
                    out.push_str(&format!("<span style=\"{}\">", css.trim_end_matches(';')));
                    close.push("</span>");
                }
                if style.bold {
                    out.push_str("<b>");
                    close.push("</b>");
                }
                if style.italic {
                    out.push_str("<i>");
                    close.push("</i>");
                }
                if style.underline {
                    out.push_str("<u>");
                    close.push("</u>");
                }
                if style.strikethrough {
                    out.push_str("<s>");
                    close.push("</s>");
                }
                write_inlines(out, content);
                for tag in close.iter().rev() {
                    out.push_str(tag);
                }
            }
        }
    }
}

pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

const INDENT: &str = "  ";

/// Re-indents raw markup for the Source view: one logical line per tag
/// boundary, indent after every opening tag, de-indent before every closing
/// tag. Pure text transform, nothing is validated or repaired.
pub fn pretty_print(markup: &str) -> String {
    let mut out = String::new();
    let mut depth: usize = 0;
    for token in tokenize(markup) {
        match token {
            Token::Close { name } => {
                depth = depth.saturating_sub(1);
                push_line(&mut out, depth, &format!("</{}>", name));
            }
            Token::Open { raw, name } => {
                let void = raw.ends_with('/') || matches!(name.as_str(), "img" | "br" | "hr");
                push_line(&mut out, depth, &format!("<{}>", raw));
                if !void {
                    depth += 1;
                }
            }
            Token::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    push_line(&mut out, depth, trimmed);
                }
            }
        }
    }
    out
}

fn push_line(out: &mut String, depth: usize, line: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(line);
    out.push('\n');
}

/// Inverse of `pretty_print` up to whitespace: strips the line structure so
/// a printed document compares equal to its compact form.
pub fn collapse(text: &str) -> String {
    text.lines().map(str::trim).collect::<Vec<_>>().join("")
}
