use crate::{Block, Cell, Inline};
use std::sync::Arc;
use uuid::Uuid;

/// Builds a uniform grid of empty cells. The serialized form carries the
/// fixed inline border style on the table tag.
pub fn build_grid(rows: usize, cols: usize) -> Block {
    let rows = rows.max(1);
    let cols = cols.max(1);
    let mut grid = Vec::with_capacity(rows);
    for _ in 0..rows {
        let mut row = Vec::with_capacity(cols);
        for _ in 0..cols {
            row.push(Cell { content: vec![Inline::Text { value: Arc::from("") }] });
        }
        grid.push(row);
    }
    Block::Table { id: Uuid::new_v4(), rows: grid }
}
