//! Integration tests for the plain-markup parser.

use helpdoc::{parse_markup_to_document, Document, Node, NodeType};

fn texts(list: &Node) -> Vec<String> {
    list.content.iter().map(Node::text_content).collect()
}

#[test]
fn test_parse_is_idempotent() {
    let inputs = [
        "",
        "plain",
        "# Title\n## Sub\n* a\n* b\n1. one\n> quote\n\nend",
        "####### not a heading\n*not a bullet\n1.not ordered\n>no quote",
        "**bold** _it_ `code` [link](https://x.test) ~~gone~~",
        "\r\n\r\n\n",
        "héllo wörld 日本語\n* 項目",
    ];
    for input in inputs {
        let first = parse_markup_to_document(input);
        let second = parse_markup_to_document(input);
        assert_eq!(first, second, "input: {input:?}");
    }
}

#[test]
fn test_heading_levels() {
    let doc = parse_markup_to_document("# Title");
    assert_eq!(doc.block_count(), 1);
    let heading = doc.block(0).unwrap();
    assert_eq!(heading.node_type, NodeType::Heading);
    assert_eq!(heading.heading_level(), Some(1));
    assert_eq!(heading.text_content(), "Title");

    let doc = parse_markup_to_document("## Sub");
    assert_eq!(doc.block(0).unwrap().heading_level(), Some(2));
}

#[test]
fn test_bullet_lines_group_into_one_list() {
    let doc = parse_markup_to_document("* a\n* b\n* c");
    assert_eq!(doc.block_count(), 1);

    let list = doc.block(0).unwrap();
    assert_eq!(list.node_type, NodeType::BulletList);
    assert_eq!(list.content.len(), 3);
    for item in &list.content {
        assert_eq!(item.node_type, NodeType::ListItem);
        assert_eq!(item.content.len(), 1);
        assert_eq!(item.content[0].node_type, NodeType::Paragraph);
    }
    assert_eq!(texts(list), vec!["a", "b", "c"]);
}

#[test]
fn test_non_list_line_closes_list() {
    let doc = parse_markup_to_document("* a\nplain\n* b");
    assert_eq!(doc.block_count(), 3);

    let first = doc.block(0).unwrap();
    let last = doc.block(2).unwrap();
    assert_eq!(first.node_type, NodeType::BulletList);
    assert_eq!(doc.block(1).unwrap().node_type, NodeType::Paragraph);
    assert_eq!(last.node_type, NodeType::BulletList);
    assert_eq!(texts(first), vec!["a"]);
    assert_eq!(texts(last), vec!["b"]);
}

#[test]
fn test_ordered_lines_group() {
    let doc = parse_markup_to_document("1. first\n2. second");
    let list = doc.block(0).unwrap();
    assert_eq!(list.node_type, NodeType::OrderedList);
    assert_eq!(list.attr_u64("start"), Some(1));
    assert_eq!(texts(list), vec!["first", "second"]);
}

#[test]
fn test_malformed_lines_degrade_to_paragraphs() {
    let doc = parse_markup_to_document("#NoSpace\n-dash\n1)paren");
    assert_eq!(doc.block_count(), 3);
    assert!(doc
        .blocks()
        .iter()
        .all(|b| b.node_type == NodeType::Paragraph));
}

#[test]
fn test_parsed_documents_are_valid() {
    let doc = parse_markup_to_document("# T\n* a\n\n> q\n1. x\nplain [l](u) **b**");
    assert!(doc.validate().is_ok());
}

#[test]
fn test_json_round_trip_through_file() {
    let doc = parse_markup_to_document("## Setup\n* install\n* run");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("article.json");

    std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();
    let json = std::fs::read_to_string(&path).unwrap();
    let loaded = Document::from_json(&json).unwrap();

    assert_eq!(loaded, doc);
}
