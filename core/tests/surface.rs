use rte_core::{
    table, toolbar_state, Alignment, Block, EditCommand, EditError, Position, Selection, Surface,
};
use uuid::Uuid;

fn select_block(surface: &mut Surface, index: usize) {
    let id = surface.blocks[index].id();
    surface.set_selection(Selection::collapsed(Position { block_id: id, offset: 0 }));
}

#[test]
fn bold_toggles_on_and_off() {
    let mut surface = Surface::from_markup("<p>hello</p>");
    surface.execute(EditCommand::Bold).unwrap();
    assert_eq!(surface.serialize(), "<p><b>hello</b></p>");
    assert!(toolbar_state(&surface).bold);

    surface.execute(EditCommand::Bold).unwrap();
    assert_eq!(surface.serialize(), "<p>hello</p>");
    assert!(!toolbar_state(&surface).bold);
}

#[test]
fn font_size_wraps_a_single_block_selection() {
    let mut surface = Surface::from_markup("<p>hello</p>");
    surface.execute(EditCommand::SetFontSize(24)).unwrap();
    assert_eq!(
        surface.serialize(),
        "<p><span style=\"font-size:24px\">hello</span></p>"
    );
    assert_eq!(toolbar_state(&surface).size, Some(24));
}

#[test]
fn font_size_refuses_a_multi_block_selection() {
    let mut surface = Surface::from_markup("<p>one</p><p>two</p>");
    let before = surface.serialize();
    let anchor = Position { block_id: surface.blocks[0].id(), offset: 0 };
    let focus = Position { block_id: surface.blocks[1].id(), offset: 0 };
    surface.set_selection(Selection { anchor, focus });

    let err = surface.execute(EditCommand::SetFontSize(24)).unwrap_err();
    assert!(matches!(err, EditError::SelectionIncompatible));
    // The surface is untouched by a refused command.
    assert_eq!(surface.serialize(), before);
}

#[test]
fn color_refuses_a_multi_block_selection() {
    let mut surface = Surface::from_markup("<p>one</p><p>two</p>");
    let anchor = Position { block_id: surface.blocks[0].id(), offset: 0 };
    let focus = Position { block_id: surface.blocks[1].id(), offset: 0 };
    surface.set_selection(Selection { anchor, focus });
    assert!(surface
        .execute(EditCommand::SetColor("#ff0000".into()))
        .is_err());
}

#[test]
fn missing_focus_block_is_reported() {
    let mut surface = Surface::from_markup("<p>hello</p>");
    let gone = Uuid::new_v4();
    surface.set_selection(Selection::collapsed(Position { block_id: gone, offset: 0 }));
    let err = surface.execute(EditCommand::Bold).unwrap_err();
    assert!(matches!(err, EditError::BlockNotFound(id) if id == gone));
}

#[test]
fn alignment_applies_to_paragraphs() {
    let mut surface = Surface::from_markup("<p>hello</p>");
    surface
        .execute(EditCommand::SetAlignment(Alignment::Center))
        .unwrap();
    assert_eq!(surface.serialize(), "<p align=\"center\">hello</p>");
    assert_eq!(toolbar_state(&surface).align, Alignment::Center);
}

#[test]
fn list_command_converts_and_reverts() {
    let mut surface = Surface::from_markup("<p>item</p>");
    surface.execute(EditCommand::SetList { ordered: true }).unwrap();
    assert_eq!(surface.serialize(), "<ol><li>item</li></ol>");
    assert!(toolbar_state(&surface).ordered_list);

    // Flipping the kind keeps the list.
    surface.execute(EditCommand::SetList { ordered: false }).unwrap();
    assert_eq!(surface.serialize(), "<ul><li>item</li></ul>");

    // Same button again reverts to a paragraph.
    surface.execute(EditCommand::SetList { ordered: false }).unwrap();
    assert_eq!(surface.serialize(), "<p>item</p>");
}

#[test]
fn quote_wraps_and_unwraps() {
    let mut surface = Surface::from_markup("<p>wise words</p>");
    surface.execute(EditCommand::ToggleQuote).unwrap();
    assert_eq!(
        surface.serialize(),
        "<blockquote><p>wise words</p></blockquote>"
    );

    select_block(&mut surface, 0);
    assert!(toolbar_state(&surface).quote);
    surface.execute(EditCommand::ToggleQuote).unwrap();
    assert_eq!(surface.serialize(), "<p>wise words</p>");
}

#[test]
fn code_block_flattens_styling() {
    let mut surface = Surface::from_markup("<p>let <b>x</b> = 1;</p>");
    surface.execute(EditCommand::ToggleCodeBlock).unwrap();
    assert_eq!(surface.serialize(), "<pre>let x = 1;</pre>");
    assert!(toolbar_state(&surface).code_block);

    surface.execute(EditCommand::ToggleCodeBlock).unwrap();
    assert_eq!(surface.serialize(), "<p>let x = 1;</p>");
}

#[test]
fn link_insertion_targets_the_focus_block() {
    let mut surface = Surface::from_markup("<p>see </p>");
    surface
        .execute(EditCommand::InsertLink {
            url: "https://example.com".into(),
            text: "here".into(),
        })
        .unwrap();
    assert_eq!(
        surface.serialize(),
        "<p>see <a href=\"https://example.com\">here</a></p>"
    );
}

#[test]
fn table_insertion_builds_a_uniform_grid() {
    let mut surface = Surface::from_markup("<p>before</p>");
    surface
        .execute(EditCommand::InsertTable { rows: 2, cols: 3 })
        .unwrap();
    match &surface.blocks[1] {
        Block::Table { rows, .. } => {
            assert_eq!(rows.len(), 2);
            assert!(rows.iter().all(|r| r.len() == 3));
        }
        other => panic!("expected table, got {:?}", other),
    }
    assert!(surface
        .serialize()
        .contains("<table border=\"1\" style=\"border-collapse:collapse\">"));
}

#[test]
fn symbol_insertion_lands_at_the_caret_block() {
    let mut surface = Surface::from_markup("<p>x = </p>");
    surface
        .execute(EditCommand::InsertSymbol("√".into()))
        .unwrap();
    assert_eq!(surface.serialize(), "<p>x = √</p>");
}

#[test]
fn clear_formatting_strips_character_styles() {
    let mut surface = Surface::from_markup(
        "<p align=\"right\"><span style=\"color:#00ff00\"><b>loud</b></span> text</p>",
    );
    surface.execute(EditCommand::ClearFormatting).unwrap();
    assert_eq!(surface.serialize(), "<p>loud text</p>");
}

#[test]
fn grid_builder_clamps_zero_dimensions() {
    match table::build_grid(0, 0) {
        Block::Table { rows, .. } => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].len(), 1);
        }
        other => panic!("expected table, got {:?}", other),
    }
}

#[test]
fn toolbar_state_defaults_when_unanswerable() {
    let surface = Surface::from_markup("<img src=\"x\"/>");
    let state = toolbar_state(&surface);
    assert!(!state.bold && !state.italic && !state.quote);
    assert_eq!(state.color, None);
}
