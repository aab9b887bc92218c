use rte_core::markup::{collapse, parse, pretty_print, serialize};
use rte_core::Block;

#[test]
fn parse_serialize_round_trip() {
    let raw = "<p>Hello <b>world</b></p><ul><li>one</li><li>two</li></ul>";
    let blocks = parse(raw);
    assert_eq!(serialize(&blocks), raw);
}

#[test]
fn alignment_survives_the_round_trip() {
    let raw = "<p align=\"center\">centered</p>";
    assert_eq!(serialize(&parse(raw)), raw);
}

#[test]
fn entities_are_unescaped_and_reescaped() {
    let raw = "<p>a &amp; b &lt;tag&gt;</p>";
    assert_eq!(serialize(&parse(raw)), raw);
}

#[test]
fn table_carries_the_fixed_border_style() {
    let raw = "<table border=\"1\" style=\"border-collapse:collapse\">\
               <tr><td>a</td><td>b</td></tr></table>";
    let blocks = parse(raw);
    match &blocks[0] {
        Block::Table { rows, .. } => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].len(), 2);
        }
        other => panic!("expected table, got {:?}", other),
    }
    assert!(serialize(&blocks).starts_with("<table border=\"1\""));
}

#[test]
fn image_round_trip() {
    let raw = "<img src=\"data:image/png;base64,AAAA\" alt=\"chart\"/>";
    let blocks = parse(raw);
    match &blocks[0] {
        Block::Image { src, alt, .. } => {
            assert_eq!(src.as_ref(), "data:image/png;base64,AAAA");
            assert_eq!(alt.as_deref(), Some("chart"));
        }
        other => panic!("expected image, got {:?}", other),
    }
    assert_eq!(serialize(&blocks), raw);
}

#[test]
fn pretty_print_indents_per_tag_boundary() {
    let printed = pretty_print("<blockquote><p>quoted</p></blockquote>");
    let lines: Vec<&str> = printed.lines().collect();
    assert_eq!(
        lines,
        vec![
            "<blockquote>",
            "  <p>",
            "    quoted",
            "  </p>",
            "</blockquote>",
        ]
    );
}

#[test]
fn pretty_print_collapses_back_to_the_original() {
    let raw = "<p>Hello</p><blockquote><p>quoted</p></blockquote><ol><li>x</li></ol>";
    assert_eq!(collapse(&pretty_print(raw)), raw);
}

#[test]
fn void_tags_do_not_indent() {
    let printed = pretty_print("<p>a</p><img src=\"x\"/><p>b</p>");
    let lines: Vec<&str> = printed.lines().collect();
    assert_eq!(lines[3], "<img src=\"x\"/>");
    assert_eq!(lines[4], "<p>");
}

#[test]
fn malformed_markup_is_trusted_not_rejected() {
    // Unclosed tag: the scanner closes it at end of input.
    let blocks = parse("<p>unclosed");
    assert_eq!(blocks.len(), 1);
    assert_eq!(serialize(&blocks), "<p>unclosed</p>");

    // No tags at all: the raw text becomes a paragraph.
    let blocks = parse("just text");
    assert_eq!(serialize(&blocks), "<p>just text</p>");
}

#[test]
fn unknown_tags_are_skipped() {
    let blocks = parse("<p><script>x</script>kept</p>");
    assert_eq!(serialize(&blocks), "<p>xkept</p>");
}

#[test]
fn attributes_survive_multibyte_tag_bodies() {
    // Hand-edited Source text can put arbitrary Unicode inside a tag; an
    // unrecognized attribute value degrades, it never panics.
    let blocks = parse("<p İİx=\"1\" align=\"éb\">hi</p>");
    assert_eq!(serialize(&blocks), "<p>hi</p>");

    let blocks = parse("<p ünit=\"x\" align=\"center\">hi</p>");
    assert_eq!(serialize(&blocks), "<p align=\"center\">hi</p>");
}

#[test]
fn styled_span_round_trip() {
    let raw = "<p><span style=\"color:#ff0000;font-size:18px\"><b>hot</b></span></p>";
    assert_eq!(serialize(&parse(raw)), raw);
}
