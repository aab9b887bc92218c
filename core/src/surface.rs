use crate::{
    markup, table, Alignment, Block, EditCommand, Inline, ListItem, Position, Selection, Style,
};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EditError {
    /// The selection cannot support the requested wrap (e.g. a font-size
    /// change across a multi-block range). Swallowed at the session layer.
    #[error("selection cannot support this command")]
    SelectionIncompatible,
    #[error("block {0} no longer exists")]
    BlockNotFound(Uuid),
}

/// One live editable surface: a parsed block tree plus the caret within it.
/// Both the inline editor and the full-screen fork hold one of these.
#[derive(Debug, Clone)]
pub struct Surface {
    pub blocks: Vec<Block>,
    pub selection: Selection,
}

impl Surface {
    pub fn from_markup(raw: &str) -> Self {
        let mut blocks = markup::parse(raw);
        if blocks.is_empty() {
            blocks.push(Block::empty_paragraph());
        }
        let first = blocks[0].id();
        Self {
            blocks,
            selection: Selection::collapsed(Position { block_id: first, offset: 0 }),
        }
    }

    /// The canonical Document string for this surface's current content.
    pub fn serialize(&self) -> String {
        markup::serialize(&self.blocks)
    }

    /// Replaces the content verbatim, trusting the markup as-is, and resets
    /// the caret to the first block. Used by undo/redo reloads and the
    /// Source -> Visual transition.
    pub fn load(&mut self, raw: &str) {
        let mut blocks = markup::parse(raw);
        if blocks.is_empty() {
            blocks.push(Block::empty_paragraph());
        }
        let first = blocks[0].id();
        self.blocks = blocks;
        self.selection = Selection::collapsed(Position { block_id: first, offset: 0 });
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Applies `cmd` at the current selection. Mutates the tree in place and
    /// never touches the history log; snapshotting is the session's job.
    pub fn execute(&mut self, cmd: EditCommand) -> Result<(), EditError> {
        match cmd {
            EditCommand::Bold => self.toggle_flag(|s| &mut s.bold),
            EditCommand::Italic => self.toggle_flag(|s| &mut s.italic),
            EditCommand::Underline => self.toggle_flag(|s| &mut s.underline),
            EditCommand::Strikethrough => self.toggle_flag(|s| &mut s.strikethrough),
            EditCommand::SetColor(color) => {
                if self.selection.spans_blocks() {
                    return Err(EditError::SelectionIncompatible);
                }
                self.restyle(|s| s.color = Some(Arc::from(color.as_str())))
            }
            EditCommand::SetFontSize(size) => {
                if self.selection.spans_blocks() {
                    return Err(EditError::SelectionIncompatible);
                }
                self.restyle(|s| s.size = Some(size))
            }
            EditCommand::SetAlignment(align) => self.set_alignment(align),
            EditCommand::SetList { ordered } => self.set_list(ordered),
            EditCommand::ToggleQuote => self.toggle_quote(),
            EditCommand::ToggleCodeBlock => self.toggle_code_block(),
            EditCommand::InsertLink { url, text } => self.insert_link(url, text),
            EditCommand::InsertImage { src, alt } => {
                self.insert_block_after_focus(Block::Image {
                    id: Uuid::new_v4(),
                    src: Arc::from(src),
                    alt: alt.map(Arc::from),
                });
                Ok(())
            }
            EditCommand::InsertTable { rows, cols } => {
                self.insert_block_after_focus(table::build_grid(rows, cols));
                Ok(())
            }
            EditCommand::InsertSymbol(glyph) => self.insert_symbol(glyph),
            EditCommand::ClearFormatting => self.clear_formatting(),
        }
    }

    /// Effective character style at the selection focus. Falls back to plain
    /// when the focus block has no styled run there.
    pub fn style_at_focus(&self) -> Style {
        let Some(block) = self.focus_block() else {
            return Style::default();
        };
        let content = match block {
            Block::Paragraph { content, .. } | Block::Heading { content, .. } => content,
            Block::List { items, .. } => match items.last() {
                Some(item) => &item.content,
                None => return Style::default(),
            },
            _ => return Style::default(),
        };
        style_of_run_at(content, self.selection.focus.offset)
    }

    pub fn focus_block(&self) -> Option<&Block> {
        let id = self.selection.focus.block_id;
        self.blocks.iter().find(|b| b.id() == id)
    }

    fn focus_index(&self) -> Result<usize, EditError> {
        let id = self.selection.focus.block_id;
        self.blocks
            .iter()
            .position(|b| b.id() == id)
            .ok_or(EditError::BlockNotFound(id))
    }

    fn toggle_flag(&mut self, flag: fn(&mut Style) -> &mut bool) -> Result<(), EditError> {
        let mut probe = self.style_at_focus();
        let next = !*flag(&mut probe);
        self.restyle(move |s| *flag(s) = next)
    }

    /// Rewraps the focus block's inline content with `apply` folded into
    /// every run's style. Spans that come out plain are unwrapped.
    fn restyle(&mut self, apply: impl Fn(&mut Style)) -> Result<(), EditError> {
        let idx = self.focus_index()?;
        match &mut self.blocks[idx] {
            Block::Paragraph { content, .. } | Block::Heading { content, .. } => {
                restyle_inlines(content, &apply);
                Ok(())
            }
            Block::List { items, .. } => {
                for item in items.iter_mut() {
                    restyle_inlines(&mut item.content, &apply);
                }
                Ok(())
            }
            // Code, tables and images carry no character style.
            _ => Ok(()),
        }
    }

    fn set_alignment(&mut self, align: Alignment) -> Result<(), EditError> {
        let idx = self.focus_index()?;
        if let Block::Paragraph { align: current, .. } = &mut self.blocks[idx] {
            *current = align;
        }
        Ok(())
    }

    fn set_list(&mut self, ordered: bool) -> Result<(), EditError> {
        let idx = self.focus_index()?;
        let block = &mut self.blocks[idx];
        match block {
            Block::List { ordered: current, items, .. } => {
                if *current == ordered {
                    // Same list button again: back to a paragraph.
                    let content = items
                        .first()
                        .map(|item| item.content.clone())
                        .unwrap_or_default();
                    *block = Block::Paragraph {
                        id: block.id(),
                        align: Alignment::Left,
                        content,
                    };
                } else {
                    *current = ordered;
                }
            }
            Block::Paragraph { content, .. } | Block::Heading { content, .. } => {
                let item = ListItem { id: Uuid::new_v4(), content: content.clone() };
                *block = Block::List {
                    id: block.id(),
                    ordered,
                    items: vec![item],
                };
            }
            _ => {}
        }
        Ok(())
    }

    fn toggle_quote(&mut self) -> Result<(), EditError> {
        let idx = self.focus_index()?;
        if matches!(self.blocks[idx], Block::Quote { .. }) {
            // Unwrap: the quote's children take its place in order.
            if let Block::Quote { content, .. } = self.blocks.remove(idx) {
                if content.is_empty() {
                    self.blocks.insert(idx, Block::empty_paragraph());
                } else {
                    for (i, inner) in content.into_iter().enumerate() {
                        self.blocks.insert(idx + i, inner);
                    }
                }
            }
        } else {
            let inner = self.blocks[idx].clone();
            self.blocks[idx] = Block::Quote { id: Uuid::new_v4(), content: vec![inner] };
        }
        // The focused block was replaced either way; follow it.
        let id = self.blocks[idx].id();
        self.selection = Selection::collapsed(Position { block_id: id, offset: 0 });
        Ok(())
    }

    fn toggle_code_block(&mut self) -> Result<(), EditError> {
        let idx = self.focus_index()?;
        let block = &mut self.blocks[idx];
        match block {
            Block::Code { code, .. } => {
                let value = code.clone();
                *block = Block::Paragraph {
                    id: block.id(),
                    align: Alignment::Left,
                    content: vec![Inline::Text { value }],
                };
            }
            Block::Paragraph { content, .. } | Block::Heading { content, .. } => {
                let text = plain_text(content);
                *block = Block::Code { id: block.id(), code: Arc::from(text) };
            }
            _ => {}
        }
        Ok(())
    }

    fn insert_link(&mut self, url: String, text: String) -> Result<(), EditError> {
        let link = Inline::Link {
            url: Arc::from(url),
            text: vec![Inline::Text { value: Arc::from(text) }],
        };
        self.insert_inline_at_focus(link)
    }

    fn insert_symbol(&mut self, glyph: String) -> Result<(), EditError> {
        self.insert_inline_at_focus(Inline::Symbol { glyph: Arc::from(glyph) })
    }

    /// Appends an inline at the focus block, matching on block kind the way
    /// each kind can accept it. Blocks that cannot hold inline content get a
    /// fresh trailing paragraph instead.
    fn insert_inline_at_focus(&mut self, inline: Inline) -> Result<(), EditError> {
        let idx = self.focus_index()?;
        let inserted = match &mut self.blocks[idx] {
            Block::Paragraph { content, .. } | Block::Heading { content, .. } => {
                content.push(inline.clone());
                true
            }
            Block::List { items, .. } => match items.last_mut() {
                Some(item) => {
                    item.content.push(inline.clone());
                    true
                }
                None => false,
            },
            Block::Quote { content, .. } => match content.last_mut() {
                Some(Block::Paragraph { content: para, .. }) => {
                    para.push(inline.clone());
                    true
                }
                _ => false,
            },
            Block::Table { rows, .. } => match rows.last_mut().and_then(|r| r.last_mut()) {
                Some(cell) => {
                    cell.content.push(inline.clone());
                    true
                }
                None => false,
            },
            Block::Code { .. } | Block::Image { .. } => false,
        };
        if !inserted {
            self.blocks.push(Block::Paragraph {
                id: Uuid::new_v4(),
                align: Alignment::Left,
                content: vec![inline],
            });
        }
        Ok(())
    }

    fn insert_block_after_focus(&mut self, block: Block) {
        let at = match self.focus_index() {
            Ok(idx) => idx + 1,
            Err(_) => self.blocks.len(),
        };
        self.blocks.insert(at, block);
    }

    fn clear_formatting(&mut self) -> Result<(), EditError> {
        let idx = self.focus_index()?;
        let block = &mut self.blocks[idx];
        if let Block::Paragraph { content, .. } | Block::Heading { content, .. } = block {
            let text = plain_text(content);
            let content = if text.is_empty() {
                Vec::new()
            } else {
                vec![Inline::Text { value: Arc::from(text) }]
            };
            *block = Block::Paragraph { id: block.id(), align: Alignment::Left, content };
        }
        Ok(())
    }
}

fn restyle_inlines(content: &mut Vec<Inline>, apply: &impl Fn(&mut Style)) {
    for inline in content.iter_mut() {
        match inline {
            Inline::Text { value } => {
                let mut style = Style::default();
                apply(&mut style);
                if !style.is_plain() {
                    *inline = Inline::Styled {
                        style,
                        content: vec![Inline::Text { value: value.clone() }],
                    };
                }
            }
            Inline::Styled { style, content } => {
                apply(style);
                if style.is_plain() {
                    let mut inner = std::mem::take(content);
                    if inner.len() == 1 {
                        if let Some(only) = inner.pop() {
                            *inline = only;
                        }
                    } else {
                        *content = inner;
                    }
                }
            }
            Inline::Link { .. } | Inline::Symbol { .. } => {}
        }
    }
}

/// Style of the run containing `offset` within flat inline content.
fn style_of_run_at(content: &[Inline], offset: usize) -> Style {
    let mut consumed = 0usize;
    let mut last = Style::default();
    for inline in content {
        let (len, style) = match inline {
            Inline::Text { value } => (value.chars().count(), Style::default()),
            Inline::Styled { style, content } => {
                (plain_text(content).chars().count(), style.clone())
            }
            Inline::Link { text, .. } => (plain_text(text).chars().count(), Style::default()),
            Inline::Symbol { glyph } => (glyph.chars().count(), Style::default()),
        };
        consumed += len;
        last = style.clone();
        if offset < consumed {
            return style;
        }
    }
    // Caret past the end of the block rides on the final run's style.
    last
}

pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    collect_plain(inlines, &mut out);
    out
}

fn collect_plain(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text { value } => out.push_str(value),
            Inline::Styled { content, .. } => collect_plain(content, out),
            Inline::Link { text, .. } => collect_plain(text, out),
            Inline::Symbol { glyph } => out.push_str(glyph),
        }
    }
}
