use assert_cmd::Command;
use guidepress::demo::DemoGenerator;
use predicates::prelude::*;
use std::fs::{self, write};
use std::path::Path;
use tempfile::{tempdir, NamedTempFile};

/// Command for the binary with no API key in the environment, so the demo generator is used.
fn offline_command(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("guidepress").expect("Binary exists");
    cmd.current_dir(workdir)
        .env_remove("TEXT_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env("RUST_LOG", "info");
    cmd
}

/// Writes a config that points output_dir at `output_dir`.
fn create_config(output_dir: &Path) -> NamedTempFile {
    let config = NamedTempFile::new().expect("Creating temp config file failed");
    write(
        config.path(),
        format!("guide:\n  output_dir: {}\n", output_dir.display()),
    )
    .expect("Writing temp config failed");
    config
}

fn create_demo_outline() -> NamedTempFile {
    let outline = NamedTempFile::new().expect("Creating temp outline file failed");
    let json = serde_json::json!({ "outline": DemoGenerator::outline() });
    write(outline.path(), json.to_string()).expect("Writing temp outline failed");
    outline
}

#[test]
fn outline_command_prints_demo_outline_offline() {
    let workdir = tempdir().unwrap();

    offline_command(workdir.path())
        .args(["outline", "--location", "Tokyo", "--days", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Destination Overview and Highlights"))
        .stdout(predicate::str::contains("\"1-1\""));
}

#[test]
fn build_command_writes_documents_and_archive() {
    let workdir = tempdir().unwrap();
    let output_dir = workdir.path().join("outputs");
    let config = create_config(&output_dir);
    let outline = create_demo_outline();
    let html_path = workdir.path().join("guide.html");

    let assert = offline_command(workdir.path())
        .arg("build")
        .args(["--location", "Lisbon"])
        .arg("--outline")
        .arg(outline.path())
        .arg("--config")
        .arg(config.path())
        .arg("--html")
        .arg(&html_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"download_url\": \"/outputs/Lisbon_guide.zip\""));

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    assert_eq!(report["node_downloads"].as_object().unwrap().len(), 10);
    assert_eq!(report["failures"].as_array().unwrap().len(), 0);

    let archive = fs::File::open(output_dir.join("Lisbon_guide.zip")).expect("archive exists");
    let archive = zip::ZipArchive::new(archive).expect("valid zip");
    assert_eq!(archive.len(), 10);

    let html = fs::read_to_string(&html_path).expect("HTML fragment written");
    assert_eq!(html.matches("<div id=\"node-").count(), 10);
}

#[test]
fn build_command_fails_for_missing_outline() {
    let workdir = tempdir().unwrap();

    offline_command(workdir.path())
        .args(["build", "--location", "Lisbon", "--outline", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read outline file"));
}

#[test]
fn node_command_builds_one_section_without_archive() {
    let workdir = tempdir().unwrap();
    let output_dir = workdir.path().join("outputs");
    let config = create_config(&output_dir);
    let outline = create_demo_outline();

    offline_command(workdir.path())
        .arg("node")
        .args(["--location", "Lisbon", "--node-id", "2-1"])
        .arg("--outline")
        .arg(outline.path())
        .arg("--config")
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("/outputs/Lisbon_Local Dishes to Try.docx"))
        .stdout(predicate::str::contains("\"archive_path\": null"));

    assert!(output_dir.join("Lisbon_Local Dishes to Try.docx").is_file());
    assert!(!output_dir.join("Lisbon_guide.zip").exists());
}

#[test]
fn node_command_fails_for_unknown_node_id() {
    let workdir = tempdir().unwrap();
    let config = create_config(&workdir.path().join("outputs"));
    let outline = create_demo_outline();

    offline_command(workdir.path())
        .arg("node")
        .args(["--location", "Lisbon", "--node-id", "9-9"])
        .arg("--outline")
        .arg(outline.path())
        .arg("--config")
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No node with id"));
}

#[test]
fn build_command_rejects_unknown_failure_policy() {
    let workdir = tempdir().unwrap();
    let config = create_config(&workdir.path().join("outputs"));
    let outline = create_demo_outline();

    offline_command(workdir.path())
        .args(["build", "--location", "Lisbon", "--failure-policy", "partail"])
        .arg("--outline")
        .arg(outline.path())
        .arg("--config")
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'partail'"));

    assert!(!workdir.path().join("outputs").exists());
}

#[test]
fn build_command_accepts_partial_failure_policy() {
    let workdir = tempdir().unwrap();
    let output_dir = workdir.path().join("outputs");
    let config = create_config(&output_dir);
    let outline = create_demo_outline();

    offline_command(workdir.path())
        .args(["build", "--location", "Lisbon", "--failure-policy", "partial"])
        .arg("--outline")
        .arg(outline.path())
        .arg("--config")
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"failures\": []"));

    assert!(output_dir.join("Lisbon_guide.zip").is_file());
}

#[test]
fn failure_policy_values_map_onto_the_config_enum() {
    use clap::Parser;
    use guidepress::config::FailurePolicy;
    use guidepress_cli::cli::{Cli, Commands};

    let cli = Cli::try_parse_from([
        "guidepress",
        "build",
        "--location",
        "Lisbon",
        "--outline",
        "outline.json",
        "--failure-policy",
        "all_or_nothing",
    ])
    .expect("valid arguments");
    match cli.command {
        Commands::Build {
            failure_policy: Some(policy),
            ..
        } => assert_eq!(FailurePolicy::from(policy), FailurePolicy::AllOrNothing),
        _ => panic!("expected a build command with a failure policy"),
    }

    assert!(Cli::try_parse_from([
        "guidepress",
        "build",
        "--location",
        "Lisbon",
        "--outline",
        "outline.json",
        "--failure-policy",
        "sometimes",
    ])
    .is_err());
}

use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Collects emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{:?}", event));
    }
}

#[tokio::test]
async fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use guidepress_cli::cli::{run, Cli, Commands};

    // A missing outline file fails before any generator is contacted.
    let cli = Cli {
        command: Commands::Build {
            location: "Lisbon".to_string(),
            outline: std::path::PathBuf::from("dummy.json"),
            config: None,
            html: None,
            failure_policy: None,
        },
    };

    let result = run(cli).await;
    assert!(result.is_err());

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}
