use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub block_id: Uuid,
    pub offset: usize,
}

/// Ephemeral caret/range within one view. Never serialized; every command
/// and insertion takes the current value as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn collapsed(pos: Position) -> Self {
        Self { anchor: pos, focus: pos }
    }

    /// A range whose endpoints sit in different blocks. Character-style
    /// wraps (font size, color) refuse such selections.
    pub fn spans_blocks(&self) -> bool {
        self.anchor.block_id != self.focus.block_id
    }
}
