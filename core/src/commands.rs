use crate::Alignment;

/// A discrete editing intent from the toolbar. Every variant applies at the
/// surface's current selection.
#[derive(Debug, Clone)]
pub enum EditCommand {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    SetColor(String),
    SetFontSize(u8),
    SetAlignment(Alignment),
    SetList { ordered: bool },
    ToggleQuote,
    ToggleCodeBlock,
    InsertLink { url: String, text: String },
    InsertImage { src: String, alt: Option<String> },
    InsertTable { rows: usize, cols: usize },
    InsertSymbol(String),
    ClearFormatting,
}
