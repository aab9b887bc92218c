use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub type SharedStr = Arc<str>;

/// Parsed form of one editable field's markup. The canonical value at the
/// subsystem boundary is the serialized string; this tree exists only while
/// a surface is live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        id: Uuid,
        align: Alignment,
        content: Vec<Inline>,
    },
    Heading {
        id: Uuid,
        level: u8,
        content: Vec<Inline>,
    },
    List {
        id: Uuid,
        ordered: bool,
        items: Vec<ListItem>,
    },
    Quote {
        id: Uuid,
        content: Vec<Block>,
    },
    Code {
        id: Uuid,
        code: SharedStr,
    },
    Table {
        id: Uuid,
        rows: Vec<Vec<Cell>>,
    },
    Image {
        id: Uuid,
        src: SharedStr,
        alt: Option<SharedStr>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListItem {
    pub id: Uuid,
    pub content: Vec<Inline>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub content: Vec<Inline>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text { value: SharedStr },
    Styled { style: Style, content: Vec<Inline> },
    Link { url: SharedStr, text: Vec<Inline> },
    Symbol { glyph: SharedStr },
}

/// Flat character-style record. `color` and `size` ride on a wrapping span;
/// the booleans map one-to-one onto toolbar toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub color: Option<SharedStr>,
    pub size: Option<u8>,
}

impl Style {
    pub fn is_plain(&self) -> bool {
        !self.bold
            && !self.italic
            && !self.underline
            && !self.strikethrough
            && self.color.is_none()
            && self.size.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" => Some(Alignment::Right),
            "justify" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

impl Block {
    pub fn id(&self) -> Uuid {
        match self {
            Block::Paragraph { id, .. }
            | Block::Heading { id, .. }
            | Block::List { id, .. }
            | Block::Quote { id, .. }
            | Block::Code { id, .. }
            | Block::Table { id, .. }
            | Block::Image { id, .. } => *id,
        }
    }

    pub fn empty_paragraph() -> Self {
        Block::Paragraph {
            id: Uuid::new_v4(),
            align: Alignment::Left,
            content: Vec::new(),
        }
    }
}
