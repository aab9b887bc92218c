use crate::{Alignment, Block, SharedStr, Surface};

/// Flat record of what the toolbar should highlight for the current
/// selection. Anything the surface cannot answer stays `false`/`None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolbarState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub align: Alignment,
    pub ordered_list: bool,
    pub unordered_list: bool,
    pub quote: bool,
    pub code_block: bool,
    pub color: Option<SharedStr>,
    pub size: Option<u8>,
}

/// Re-derives the toolbar state from the live surface. Pure read; runs after
/// every mutation, selection change, and snapshot reload.
pub fn toolbar_state(surface: &Surface) -> ToolbarState {
    let style = surface.style_at_focus();
    let mut state = ToolbarState {
        bold: style.bold,
        italic: style.italic,
        underline: style.underline,
        strikethrough: style.strikethrough,
        color: style.color,
        size: style.size,
        ..ToolbarState::default()
    };
    match surface.focus_block() {
        Some(Block::Paragraph { align, .. }) => state.align = *align,
        Some(Block::List { ordered, .. }) => {
            state.ordered_list = *ordered;
            state.unordered_list = !*ordered;
        }
        Some(Block::Quote { .. }) => state.quote = true,
        Some(Block::Code { .. }) => state.code_block = true,
        _ => {}
    }
    state
}
