use std::fs;
use std::path::Path;

use tempfile::TempDir;
use trellis::context::ToolContext;
use trellis::error::TrellisError;
use trellis::options::Options;
use trellis::variables::{resolve_for, variables_file};

const CONFIG_SPEC: &str = r#"{
    "useConfigIni": {
        "true": {"configLoader": "ini", "format": "ini"},
        "false": {"configLoader": "php"}
    }
}"#;

const SPEC: &str = r#"{
    "useConfigIni": {
        "true": {"configLoader": "ini", "format": "ini"},
        "false": {"configLoader": "php"}
    },
    "enableWebTools": {
        "true": {"tools": "enabled"},
        "false": {"tools": "disabled", "port": 8080, "debug": true}
    }
}"#;

fn setup(spec: Option<&str>) -> (TempDir, ToolContext) {
    let temp_dir = TempDir::new().unwrap();
    let templates = temp_dir.path().join("templates");
    let dir = templates.join("project/simple");
    fs::create_dir_all(&dir).unwrap();
    if let Some(spec) = spec {
        fs::write(dir.join("variables.json"), spec).unwrap();
    }
    let ctx = ToolContext::new(temp_dir.path(), templates);
    (temp_dir, ctx)
}

fn base(ctx: &ToolContext) -> trellis::options::OptionsBuilder {
    Options::builder(ctx).set("projectPath", "/srv/blog").unwrap().set("name", "blog").unwrap()
}

#[test]
fn test_variables_file_location() {
    let (_temp_dir, ctx) = setup(None);
    let options = base(&ctx).set("type", "micro").unwrap().build().unwrap();
    assert_eq!(
        variables_file(&options),
        Path::new(ctx.templates_path()).join("project/micro/variables.json")
    );
}

#[test]
fn test_single_option_selects_branch() {
    let (_temp_dir, ctx) = setup(Some(CONFIG_SPEC));
    let options = base(&ctx).set("useConfigIni", true).unwrap().build().unwrap();

    let variables = resolve_for(&options).unwrap();
    assert_eq!(variables.get("configLoader").map(String::as_str), Some("ini"));
    assert_eq!(variables.get("format").map(String::as_str), Some("ini"));
}

#[test]
fn test_defaulted_option_selects_false_branch() {
    let (_temp_dir, ctx) = setup(Some(CONFIG_SPEC));
    let options = base(&ctx).build().unwrap();

    let variables = resolve_for(&options).unwrap();
    assert_eq!(variables.len(), 1);
    assert_eq!(variables.get("configLoader").map(String::as_str), Some("php"));
}

#[test]
fn test_last_matching_option_wins() {
    let (_temp_dir, ctx) = setup(Some(SPEC));
    let options = base(&ctx).set("useConfigIni", true).unwrap().build().unwrap();

    let variables = resolve_for(&options).unwrap();
    // enableWebTools follows useConfigIni, so its set replaces the earlier one
    assert!(!variables.contains_key("configLoader"));
    assert_eq!(variables.get("tools").map(String::as_str), Some("disabled"));
    assert_eq!(variables.get("port").map(String::as_str), Some("8080"));
    assert_eq!(variables.get("debug").map(String::as_str), Some("1"));

    // Setting keys in another order does not move them
    let options = base(&ctx)
        .set("enableWebTools", true)
        .unwrap()
        .set("useConfigIni", false)
        .unwrap()
        .build()
        .unwrap();
    let variables = resolve_for(&options).unwrap();
    assert_eq!(variables.len(), 1);
    assert_eq!(variables.get("tools").map(String::as_str), Some("enabled"));
}

#[test]
fn test_missing_spec_resolves_to_nothing() {
    let (_temp_dir, ctx) = setup(None);
    let options = base(&ctx).set("useConfigIni", true).unwrap().build().unwrap();
    assert!(resolve_for(&options).unwrap().is_empty());
}

#[test]
fn test_unmatched_options_resolve_to_nothing() {
    let (_temp_dir, ctx) = setup(Some(r#"{"useLegacyRouter": {"true": {"router": "legacy"}}}"#));
    let options = base(&ctx).set("templateEngine", "volt").unwrap().build().unwrap();
    assert!(resolve_for(&options).unwrap().is_empty());
}

#[test]
fn test_malformed_spec() {
    let (_temp_dir, ctx) = setup(Some(r#"{"useConfigIni": ["not", "branches"]}"#));
    let options = base(&ctx).build().unwrap();
    assert!(matches!(resolve_for(&options), Err(TrellisError::TemplateError(_))));
}
