use std::fs::File;

use guidepress::config::{FailurePolicy, GuideConfig};
use guidepress::contract::MockContentGenerator;
use guidepress::demo::DemoGenerator;
use guidepress::guide::{archive_file_name, build_guide, build_single_node};
use guidepress::outline::OutlineNode;
use tempfile::tempdir;
use zip::ZipArchive;

#[tokio::test]
async fn test_build_guide_with_demo_generator_bundles_every_node() {
    let tmp = tempdir().unwrap();
    let config = GuideConfig::with_output_dir(tmp.path().join("outputs"));
    let outline = DemoGenerator::outline();

    let bundle = build_guide("Lisbon", &outline, &DemoGenerator::new(), &config)
        .await
        .expect("guide should build");

    assert_eq!(bundle.download_url, "/outputs/Lisbon_guide.zip");
    assert_eq!(bundle.node_downloads.len(), 10);
    assert!(bundle.failures.is_empty());
    assert_eq!(bundle.html_content.matches("<div id=\"node-").count(), 10);

    let archive_path = bundle.archive_path.expect("multi-node builds have an archive");
    assert_eq!(archive_path, tmp.path().join("outputs/Lisbon_guide.zip"));
    let archive = ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
    assert_eq!(archive.len(), 10);
    assert!(archive
        .file_names()
        .any(|n| n == "Lisbon_Food and Restaurants.docx"));

    let json = serde_json::to_value(&bundle.node_downloads).unwrap();
    assert_eq!(
        json["2-1"],
        serde_json::json!("/outputs/Lisbon_Local Dishes to Try.docx")
    );
}

#[tokio::test]
async fn test_build_guide_over_empty_outline_produces_empty_archive() {
    let tmp = tempdir().unwrap();
    let config = GuideConfig::with_output_dir(tmp.path());

    let bundle = build_guide("Nowhere", &[], &DemoGenerator::new(), &config)
        .await
        .unwrap();

    assert!(bundle.html_content.is_empty());
    assert!(bundle.node_downloads.is_empty());
    let archive_path = bundle.archive_path.unwrap();
    let archive = ZipArchive::new(File::open(archive_path).unwrap()).unwrap();
    assert_eq!(archive.len(), 0);
}

#[tokio::test]
async fn test_build_guide_failure_returns_error_without_archive() {
    let tmp = tempdir().unwrap();
    let config = GuideConfig::with_output_dir(tmp.path());
    let mut generator = MockContentGenerator::new();
    generator
        .expect_generate_article()
        .returning(|_, _| Err("quota exceeded".into()));

    let err = build_guide("Rome", &DemoGenerator::outline(), &generator, &config)
        .await
        .unwrap_err();
    assert_eq!(err.category(), "generation");
    assert!(!tmp.path().join(archive_file_name("Rome")).exists());
}

#[tokio::test]
async fn test_partial_build_lists_failures_and_archives_successes() {
    let tmp = tempdir().unwrap();
    let config = GuideConfig {
        failure_policy: FailurePolicy::Partial,
        ..GuideConfig::with_output_dir(tmp.path())
    };
    let mut generator = MockContentGenerator::new();
    generator.expect_generate_article().returning(|_, node| {
        if node.id == "3-2" {
            Err("content filter".into())
        } else {
            Ok("<p>ok</p>".to_string())
        }
    });

    let bundle = build_guide("Rome", &DemoGenerator::outline(), &generator, &config)
        .await
        .unwrap();

    assert_eq!(bundle.failures.len(), 1);
    assert_eq!(bundle.failures[0].node_id, "3-2");
    assert_eq!(bundle.node_downloads.len(), 9);
    let archive = ZipArchive::new(File::open(bundle.archive_path.unwrap()).unwrap()).unwrap();
    assert_eq!(archive.len(), 9);
}

#[tokio::test]
async fn test_single_node_skips_children_and_has_no_archive() {
    let tmp = tempdir().unwrap();
    let config = GuideConfig::with_output_dir(tmp.path());
    let node = OutlineNode::new("2", "Food", 1)
        .with_children(vec![OutlineNode::new("2-1", "Ramen", 2)]);

    let mut generator = MockContentGenerator::new();
    generator
        .expect_generate_article()
        .times(1)
        .returning(|location, node| Ok(format!("<p>{} / {}</p>", location, node.title)));

    let bundle = build_single_node("Tokyo", &node, &generator, &config)
        .await
        .unwrap();

    assert!(bundle.archive_path.is_none());
    assert_eq!(bundle.download_url, "/outputs/Tokyo_Food.docx");
    assert_eq!(bundle.node_downloads.len(), 1);
    assert_eq!(
        bundle.html_content,
        "<div id=\"node-2\" class=\"mb-8 scroll-mt-4\">\n<p>Tokyo / Food</p>\n</div>\n"
    );
    assert!(tmp.path().join("Tokyo_Food.docx").is_file());
}

#[test]
fn test_archive_file_name_is_sanitised() {
    assert_eq!(archive_file_name("Tokyo"), "Tokyo_guide.zip");
    assert_eq!(archive_file_name("São Paulo"), "So Paulo_guide.zip");
    assert_eq!(archive_file_name("東京"), "guide_guide.zip");
}

#[tokio::test]
async fn test_duplicate_node_ids_keep_the_later_document() {
    let tmp = tempdir().unwrap();
    let config = GuideConfig::with_output_dir(tmp.path());
    let outline = vec![OutlineNode::new("1", "Food", 1), OutlineNode::new("1", "Stay", 1)];

    let bundle = build_guide("Tokyo", &outline, &DemoGenerator::new(), &config)
        .await
        .expect("duplicate ids are accepted");

    assert_eq!(bundle.node_downloads.len(), 1);
    assert_eq!(
        bundle.node_downloads.get("1"),
        Some("/outputs/Tokyo_Stay.docx")
    );
    let json = serde_json::to_string(&bundle.node_downloads).unwrap();
    assert_eq!(json, r#"{"1":"/outputs/Tokyo_Stay.docx"}"#);

    // Both documents are still written and archived.
    let archive_path = bundle.archive_path.unwrap();
    let archive = ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
    assert_eq!(archive.len(), 2);
}
