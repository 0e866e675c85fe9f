//! End-to-end: load the sample project file and file descriptions from
//! `tests/fixtures/project` and compare against the golden config.

mod fixtures;

use asset_flow::{File, OutputConfig, ProjectConfig, ProjectError};
use fixtures::{load_json, project_dir};
use serde_json::Value;

fn load_project() -> ProjectConfig {
    ProjectConfig::from_file(&project_dir().join("asset-flow.toml")).expect("project file")
}

fn load_file(name: &str) -> File {
    File::from_json_file(&project_dir().join(name)).expect("file description")
}

#[test]
fn test_sample_project_matches_golden_config() {
    let writer = load_project().config_writer().unwrap();
    let files = vec![load_file("index.json"), load_file("about.json")];

    let mut config = OutputConfig::new();
    writer.process_all(&files, &mut config).unwrap();

    assert_eq!(Value::Object(config), load_json(&project_dir().join("expected.json")));
}

#[test]
fn test_file_without_dir_uses_parent_of_path() {
    let about = load_file("about.json");
    assert_eq!(about.dir, std::path::PathBuf::from("app"));
    assert_eq!(about.base_name(), "about.html");
}

#[test]
fn test_block_types_keep_declaration_order() {
    let flow = load_project().flow().unwrap();
    assert_eq!(flow.block_types().collect::<Vec<_>>(), vec!["js", "css"]);

    let names = |block_type: &str| -> Vec<String> {
        flow.steps_for(block_type)
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    };
    assert_eq!(names("js"), vec!["concat", "uglify"]);
    assert_eq!(names("css"), vec!["cssmin", "concat"]);
    assert!(names("html").is_empty());
}

#[test]
fn test_missing_project_file() {
    let err = ProjectConfig::from_file(&project_dir().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ProjectError::IoError(_)));
}

#[test]
fn test_unknown_step_rejected() {
    let project = ProjectConfig::parse(
        r#"
[paths]
input = "app"
dest = "dist"
staging = ".tmp"

[steps]
js = ["concat", "closure"]
"#,
    )
    .unwrap();
    let err = project.config_writer().unwrap_err();
    assert!(err.to_string().contains("closure"));
}
