//! Integration tests for the CLI commands against a temporary content
//! directory.

use capsule::cli::{self, Cli};
use capsule::config::AppConfig;
use capsule_core::{Catalog, CapsuleError, CapsuleKind, DuplicatePolicy};
use clap::Parser;
use tempfile::TempDir;

// =============================================================================
// FIXTURE
// =============================================================================

fn write(dir: &TempDir, name: &str, json: &str) {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("mkdir");
    }
    std::fs::write(path, json).expect("write");
}

/// A consistent catalog: no dangling links, no unresolved references.
fn clean_content() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        &dir,
        "tours/lake-ritsa-winter.json",
        r#"{"type":"tour","slug":"lake-ritsa-winter","title":"Ritsa in winter",
            "priceFrom":3500,"priceCurrency":"RUB","difficulty":"easy",
            "content":{"surface":"Snow","body":"Ends at [[lake-ritsa]]."},
            "links":[{"rel":"contains","targetSlug":"lake-ritsa"},
                     {"rel":"recommends","target":"guide-packing","weight":0.9}]}"#,
    );
    write(
        &dir,
        "places/lake-ritsa.json",
        r#"{"type":"place","slug":"lake-ritsa","title":"Озеро Рица","altitude":950,
            "links":[{"rel":"part_of","target":"tour-lake-ritsa-winter"}]}"#,
    );
    write(
        &dir,
        "guides/packing.json",
        r#"{"type":"guide","slug":"packing","title":"What to pack","content":"Layers."}"#,
    );
    dir
}

fn catalog(dir: &TempDir) -> Catalog {
    Catalog::load_dir(dir.path(), DuplicatePolicy::Overwrite).expect("load")
}

fn output(run: impl FnOnce(&mut Vec<u8>) -> Result<(), CapsuleError>) -> (String, Result<(), CapsuleError>) {
    let mut buf = Vec::new();
    let result = run(&mut buf);
    (String::from_utf8(buf).expect("utf8"), result)
}

// =============================================================================
// LIST & ROUTES
// =============================================================================

#[test]
fn test_list_all_and_by_kind() {
    let dir = clean_content();
    let catalog = catalog(&dir);

    let (text, result) = output(|out| cli::cmd_list(&catalog, None, false, out));
    result.expect("list");
    assert!(text.starts_with("Capsules (3)"));
    assert!(text.contains("lake-ritsa-winter"));

    let (json, result) = output(|out| cli::cmd_list(&catalog, Some(CapsuleKind::Place), true, out));
    result.expect("list");
    let rows: serde_json::Value = serde_json::from_str(&json).expect("json");
    assert_eq!(rows.as_array().map(Vec::len), Some(1));
    assert_eq!(rows[0]["slug"], "lake-ritsa");
    assert_eq!(rows[0]["kind"], "place");
    assert_eq!(rows[0]["route"], "/places/lake-ritsa");
}

#[test]
fn test_routes_in_load_order() {
    let dir = clean_content();
    let catalog = catalog(&dir);

    let (text, result) = output(|out| cli::cmd_routes(&catalog, false, out));
    result.expect("routes");
    // Files are read in sorted path order: guides/, places/, tours/.
    assert_eq!(
        text.lines().collect::<Vec<_>>(),
        vec!["/guides/packing", "/places/lake-ritsa", "/tours/lake-ritsa-winter"]
    );
}

// =============================================================================
// SHOW / GRAPH / RENDER
// =============================================================================

#[test]
fn test_show_normalized_fields() {
    let dir = clean_content();
    let catalog = catalog(&dir);

    let (json, result) = output(|out| cli::cmd_show(&catalog, "lake-ritsa-winter", true, out));
    result.expect("show");
    let view: serde_json::Value = serde_json::from_str(&json).expect("json");
    assert_eq!(view["route"], "/tours/lake-ritsa-winter");
    assert_eq!(view["id"], "tour-lake-ritsa-winter");
    assert_eq!(view["price"].as_f64(), Some(3500.0));
    assert_eq!(view["price_currency"], "RUB");
    assert_eq!(view["difficulty"], "easy");
    assert_eq!(view["surface"], "Snow");
    assert!(view["altitude"].is_null());

    let (text, result) = output(|out| cli::cmd_show(&catalog, "lake-ritsa", false, out));
    result.expect("show");
    assert!(text.contains("Altitude:"));
    assert!(!text.contains("Price from:"));
}

#[test]
fn test_show_missing_slug_is_not_found() {
    let dir = clean_content();
    let catalog = catalog(&dir);

    let (_, result) = output(|out| cli::cmd_show(&catalog, "nowhere", false, out));
    assert!(matches!(result, Err(CapsuleError::NotFound(slug)) if slug == "nowhere"));
}

#[test]
fn test_graph_neighborhood() {
    let dir = clean_content();
    let catalog = catalog(&dir);

    let (json, result) = output(|out| cli::cmd_graph(&catalog, "lake-ritsa-winter", true, out));
    result.expect("graph");
    let graph: serde_json::Value = serde_json::from_str(&json).expect("json");
    assert_eq!(graph["children"], serde_json::json!(["lake-ritsa"]));
    assert_eq!(graph["recommendations"], serde_json::json!(["packing"]));
    assert!(graph["parent"].is_null());
    assert_eq!(
        graph["backlinks"],
        serde_json::json!([{ "source": "lake-ritsa", "rel": "part_of" }])
    );

    let (json, result) = output(|out| cli::cmd_graph(&catalog, "lake-ritsa", true, out));
    result.expect("graph");
    let graph: serde_json::Value = serde_json::from_str(&json).expect("json");
    assert_eq!(graph["parent"], "lake-ritsa-winter");
    assert_eq!(graph["contained_in"], serde_json::json!(["lake-ritsa-winter"]));
    assert_eq!(
        graph["backlinks"],
        serde_json::json!([{ "source": "lake-ritsa-winter", "rel": "contains" }])
    );

    let (text, result) = output(|out| cli::cmd_graph(&catalog, "packing", false, out));
    result.expect("graph");
    assert!(text.contains("Linked from:"));
    assert!(text.contains("lake-ritsa-winter (recommends)"));
}

#[test]
fn test_mistyped_link_does_not_drop_the_record() {
    let dir = clean_content();
    write(
        &dir,
        "tours/coast.json",
        r#"{"type":"tour","slug":"coast","priceFrom":4500.5,
            "links":[{"rel":"contains","target":42},
                     {"rel":"contains","targetSlug":"lake-ritsa"},
                     {"rel":"recommends","target":"guide-packing","weight":"high"}]}"#,
    );
    let catalog = catalog(&dir);

    let (json, result) = output(|out| cli::cmd_graph(&catalog, "coast", true, out));
    result.expect("graph");
    let graph: serde_json::Value = serde_json::from_str(&json).expect("json");
    assert_eq!(graph["children"], serde_json::json!(["lake-ritsa"]));
    assert_eq!(graph["recommendations"], serde_json::json!(["packing"]));

    let (json, result) = output(|out| cli::cmd_show(&catalog, "coast", true, out));
    result.expect("show");
    let view: serde_json::Value = serde_json::from_str(&json).expect("json");
    assert_eq!(view["price"].as_f64(), Some(4500.5));
}

#[test]
fn test_render_rewrites_deep_links() {
    let dir = clean_content();
    let catalog = catalog(&dir);

    let (text, result) = output(|out| cli::cmd_render(&catalog, "lake-ritsa-winter", false, out));
    result.expect("render");
    assert_eq!(text.trim_end(), "Ends at [Озеро Рица](/places/lake-ritsa).");
}

// =============================================================================
// CHECK
// =============================================================================

#[test]
fn test_check_clean_catalog_passes() {
    let dir = clean_content();
    let catalog = catalog(&dir);

    let (text, result) = output(|out| cli::cmd_check(&catalog, false, out));
    result.expect("clean catalog");
    assert!(text.contains("OK"));
}

#[test]
fn test_check_reports_issues_and_fails() {
    let dir = clean_content();
    write(
        &dir,
        "places/orphan.json",
        r#"{"type":"place","slug":"orphan","content":"See [[ghost]]",
            "links":[{"rel":"nearby","targetSlug":"nowhere"}]}"#,
    );
    let catalog = catalog(&dir);

    let (json, result) = output(|out| cli::cmd_check(&catalog, true, out));
    assert!(matches!(result, Err(CapsuleError::CheckFailed(2))));

    let report: serde_json::Value = serde_json::from_str(&json).expect("json");
    assert_eq!(report["ok"], false);
    assert_eq!(report["dangling_links"][0]["source"], "orphan");
    assert_eq!(report["dangling_links"][0]["target"], "nowhere");
    assert_eq!(report["unresolved_references"][0]["token"], "ghost");
}

// =============================================================================
// EXECUTE
// =============================================================================

#[test]
fn test_execute_defaults_to_check() {
    let dir = clean_content();
    let content = dir.path().to_string_lossy().into_owned();
    let cli = Cli::try_parse_from(["capsule", "-q", "-C", content.as_str()]).expect("parse");

    let (text, result) = output(|out| cli::execute(cli, &AppConfig::default(), out));
    result.expect("execute");
    assert!(text.starts_with("Capsule Catalog Check"));
}

#[test]
fn test_execute_strict_rejects_duplicates() {
    let dir = clean_content();
    write(&dir, "places/copy.json", r#"{"type":"place","slug":"lake-ritsa"}"#);
    let content = dir.path().to_string_lossy().into_owned();

    let cli = Cli::try_parse_from(["capsule", "--strict", "-C", content.as_str(), "routes"])
        .expect("parse");
    let (_, result) = output(|out| cli::execute(cli, &AppConfig::default(), out));
    assert!(matches!(result, Err(CapsuleError::DuplicateSlug(slug)) if slug == "lake-ritsa"));
}

#[test]
fn test_execute_missing_content_dir_is_io_error() {
    let cli = Cli::try_parse_from(["capsule", "-C", "/definitely/not/here", "routes"])
        .expect("parse");
    let (_, result) = output(|out| cli::execute(cli, &AppConfig::default(), out));
    assert!(matches!(result, Err(CapsuleError::IoError(_))));
}
