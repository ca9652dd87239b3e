//! Integration tests driving the crate the way a block parser would:
//! collect reference definitions first, then parse each block's inlines.

use inkline::ast::{NodeId, NodeKind, Tree};
use inkline::{ParseOptions, ReferenceMap, parse_inlines, parse_reference};

fn paragraph(tree: &mut Tree, content: &str) -> NodeId {
    let block = tree.alloc(NodeKind::Paragraph);
    tree[block].string_content = content.to_string();
    block
}

fn kinds(tree: &Tree, block: NodeId) -> Vec<NodeKind> {
    tree.children(block).map(|id| tree.kind(id)).collect()
}

#[test]
fn definitions_then_inlines() {
    // a paragraph that starts with two definitions and continues as text
    let source = "[a]: /one\n[b]: /two \"second\"\nthen [a] and [b][] here";
    let mut refmap = ReferenceMap::new();
    let mut rest = source;
    loop {
        let consumed = parse_reference(rest, &mut refmap);
        if consumed == 0 {
            break;
        }
        rest = &rest[consumed..];
    }
    assert_eq!(rest, "then [a] and [b][] here");
    assert_eq!(refmap.len(), 2);

    let mut tree = Tree::new();
    let block = paragraph(&mut tree, rest);
    parse_inlines(&mut tree, block, &refmap, &ParseOptions::default());

    let links: Vec<(String, String)> = tree
        .walker(block)
        .filter(|&(id, entering)| entering && tree.kind(id) == NodeKind::Link)
        .map(|(id, _)| (tree[id].destination.clone(), tree[id].title.clone()))
        .collect();
    assert_eq!(
        links,
        vec![
            ("/one".to_string(), String::new()),
            ("/two".to_string(), "second".to_string()),
        ]
    );
}

#[test]
fn plain_paragraph_is_one_text_node() {
    let mut tree = Tree::new();
    let block = paragraph(&mut tree, "nothing fancy here");
    parse_inlines(&mut tree, block, &ReferenceMap::new(), &ParseOptions::default());

    assert_eq!(kinds(&tree, block), vec![NodeKind::Text]);
    let child = tree.first_child(block).expect("one child");
    assert_eq!(tree[child].literal, "nothing fancy here");
}

#[test]
fn hard_break_shape() {
    let mut tree = Tree::new();
    let block = paragraph(&mut tree, "foo  \nbar");
    parse_inlines(&mut tree, block, &ReferenceMap::new(), &ParseOptions::default());

    assert_eq!(
        kinds(&tree, block),
        vec![NodeKind::Text, NodeKind::Linebreak, NodeKind::Text]
    );
}

#[test]
fn smart_punctuation_end_to_end() {
    let mut tree = Tree::new();
    let block = paragraph(&mut tree, "\"so it goes...\"");
    parse_inlines(
        &mut tree,
        block,
        &ReferenceMap::new(),
        &ParseOptions::new().smart(true),
    );

    let text: String = tree
        .walker(block)
        .filter(|&(id, entering)| entering && tree.kind(id) == NodeKind::Text)
        .map(|(id, _)| tree[id].literal.clone())
        .collect();
    assert_eq!(text, "\u{201C}so it goes\u{2026}\u{201D}");
}

#[test]
fn normalize_text_after_parsing() {
    let mut tree = Tree::new();
    let block = paragraph(&mut tree, "a\\*b\\*c");
    parse_inlines(&mut tree, block, &ReferenceMap::new(), &ParseOptions::default());
    // escapes produce separate text nodes
    assert!(tree.children(block).count() > 1);

    tree.normalize_text(block);
    assert_eq!(kinds(&tree, block), vec![NodeKind::Text]);
    let child = tree.first_child(block).expect("merged node");
    assert_eq!(tree[child].literal, "a*b*c");
}

#[test]
fn multiple_blocks_share_one_reference_map() {
    let mut refmap = ReferenceMap::new();
    parse_reference("[shared]: /dest\n", &mut refmap);

    let mut tree = Tree::new();
    let options = ParseOptions::default();
    for _ in 0..2 {
        let block = paragraph(&mut tree, "see [shared]");
        parse_inlines(&mut tree, block, &refmap, &options);
        let link = tree
            .children(block)
            .find(|&id| tree.kind(id) == NodeKind::Link)
            .expect("link resolved");
        assert_eq!(tree[link].destination, "/dest");
    }
}

#[test]
fn string_helpers_are_public() {
    assert_eq!(inkline::utils::normalize_label(" A  B "), "a b");
    assert_eq!(inkline::utils::unescape_string(r"\[x\]"), "[x]");
    assert_eq!(inkline::utils::normalize_uri("a b"), "a%20b");
    assert_eq!(inkline::utils::decode_entities("&lt;"), "<");
}
