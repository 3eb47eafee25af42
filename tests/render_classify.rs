use guidepress::markup::{visible_text, MarkupSpan};
use guidepress::render::{classify_line, render, Block, ListMarker, SECTION_LEVEL, TITLE_LEVEL};

#[test]
fn test_classify_lines_table_driven() {
    struct TestCase {
        name: &'static str,
        line: &'static str,
        expected: Option<Block>,
    }

    let test_cases = vec![
        TestCase {
            name: "markdown heading",
            line: "# Overview",
            expected: Some(Block::Heading {
                text: "Overview".into(),
                level: SECTION_LEVEL,
            }),
        },
        TestCase {
            name: "html heading with attributes",
            line: r#"<h2 class="text-3xl font-bold">Street Food</h2>"#,
            expected: Some(Block::Heading {
                text: "Street Food".into(),
                level: SECTION_LEVEL,
            }),
        },
        TestCase {
            name: "markdown bullet",
            line: "- Try the noodles",
            expected: Some(Block::Paragraph {
                spans: vec![MarkupSpan::plain("Try the noodles")],
                list: ListMarker::Bullet,
            }),
        },
        TestCase {
            name: "blank line",
            line: "   \t ",
            expected: None,
        },
        TestCase {
            name: "tags only",
            line: r#"<div class="prose">"#,
            expected: None,
        },
        TestCase {
            name: "plain paragraph",
            line: "  Open daily.  ",
            expected: Some(Block::Paragraph {
                spans: vec![MarkupSpan::plain("Open daily.")],
                list: ListMarker::None,
            }),
        },
    ];

    for tc in test_cases {
        assert_eq!(classify_line(tc.line), tc.expected, "{}", tc.name);
    }
}

#[test]
fn test_html_list_item_keeps_inline_formatting() {
    let block = classify_line("<li><strong>Ichiran</strong> - tonkotsu ramen</li>")
        .expect("list item should produce a block");
    match block {
        Block::Paragraph { spans, list } => {
            assert_eq!(list, ListMarker::Bullet);
            assert_eq!(visible_text(&spans), "Ichiran - tonkotsu ramen");
            assert!(spans[0].format.bold);
            assert!(!spans[1].format.bold);
        }
        other => panic!("expected a bullet paragraph, got {other:?}"),
    }
}

#[test]
fn test_paragraph_passes_original_line_to_span_parser() {
    let block = classify_line("<p>Cost: <b>1,200 yen</b></p>").expect("paragraph");
    match block {
        Block::Paragraph { spans, list } => {
            assert_eq!(list, ListMarker::None);
            assert_eq!(visible_text(&spans), "Cost: 1,200 yen");
            assert!(spans.iter().any(|s| s.text == "1,200 yen" && s.format.bold));
        }
        other => panic!("expected a paragraph, got {other:?}"),
    }
}

#[test]
fn test_render_prepends_title_and_skips_blank_lines() {
    let markup = "\n<h2>Food</h2>\n\n<p>Eat <i>well</i>.</p>\n   \n- Sushi\n- Tempura\n";
    let document = render("Tokyo Food", markup);

    assert_eq!(document.title(), Some("Tokyo Food"));
    assert!(document.blocks[0].is_title());
    assert_eq!(
        document.blocks[0],
        Block::Heading {
            text: "Tokyo Food".into(),
            level: TITLE_LEVEL
        }
    );

    let body = document.body();
    assert_eq!(body.len(), 4, "heading, paragraph and two bullets");
    assert!(matches!(&body[0], Block::Heading { text, .. } if text == "Food"));
    assert!(matches!(&body[1], Block::Paragraph { list: ListMarker::None, .. }));
    assert!(matches!(&body[2], Block::Paragraph { list: ListMarker::Bullet, .. }));
    assert!(matches!(&body[3], Block::Paragraph { list: ListMarker::Bullet, .. }));
}

#[test]
fn test_render_of_empty_markup_is_only_the_title() {
    let document = render("Empty", "");
    assert_eq!(document.blocks.len(), 1);
    assert!(document.body().is_empty());
}
