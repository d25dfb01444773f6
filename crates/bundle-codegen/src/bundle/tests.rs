use std::path::Path;

use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn public_ids(bundle: &Bundle) -> Vec<&str> {
    bundle
        .traverse_assets()
        .into_iter()
        .map(|asset| asset.public_id.as_str())
        .collect()
}

#[test]
fn test_traversal_starts_at_main_entry_and_visits_each_asset_once() {
    let bundle = Bundle::builder("main.js")
        .add_asset(Asset::new("lib", "L"))
        .add_asset(Asset::new("entry", "E"))
        .add_asset(Asset::new("util", "U"))
        .add_dependency("entry", "lib")
        .add_dependency("entry", "util")
        .add_dependency("lib", "util")
        .main_entry("entry")
        .build()
        .unwrap();

    let ids = public_ids(&bundle);
    assert_eq!(ids.len(), 3);
    assert_eq!(ids[0], "E");
    assert!(ids.contains(&"L"));
    assert!(ids.contains(&"U"));
}

#[test]
fn test_traversal_includes_disconnected_assets() {
    let bundle = Bundle::builder("shared.js")
        .add_asset(Asset::new("a", "A"))
        .add_asset(Asset::new("b", "B"))
        .add_asset(Asset::new("c", "C"))
        .add_dependency("a", "b")
        .build()
        .unwrap();

    let mut ids = public_ids(&bundle);
    ids.sort_unstable();
    assert_eq!(ids, vec!["A", "B", "C"]);
}

#[test]
fn test_traversal_terminates_on_cycles() {
    let bundle = Bundle::builder("cycle.js")
        .add_asset(Asset::new("a", "A"))
        .add_asset(Asset::new("b", "B"))
        .add_dependency("a", "b")
        .add_dependency("b", "a")
        .main_entry("b")
        .build()
        .unwrap();

    assert_eq!(public_ids(&bundle), vec!["B", "A"]);
}

#[test]
fn test_builder_rejects_duplicate_ids() {
    let err = Bundle::builder("dup.js")
        .add_asset(Asset::new("a", "A"))
        .add_asset(Asset::new("a", "B"))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        BundleError::DuplicateAsset {
            id: AssetId::new("a")
        }
    );

    let err = Bundle::builder("dup.js")
        .add_asset(Asset::new("a", "X"))
        .add_asset(Asset::new("b", "X"))
        .build()
        .unwrap_err();
    assert_eq!(err.to_string(), "public id 'X' is used by more than one asset");
}

#[test]
fn test_builder_rejects_unknown_dependency_and_entry() {
    let err = Bundle::builder("bad.js")
        .add_asset(Asset::new("a", "A"))
        .add_dependency("a", "missing")
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        BundleError::UnknownAsset {
            id: AssetId::new("missing")
        }
    );

    let err = Bundle::builder("bad.js")
        .add_asset(Asset::new("a", "A"))
        .main_entry("nope")
        .build()
        .unwrap_err();
    assert_eq!(err.to_string(), "asset 'nope' is not part of the bundle");
}

#[test]
fn test_browser_contexts() {
    let browser_like = [
        EnvironmentContext::Browser,
        EnvironmentContext::WebWorker,
        EnvironmentContext::ServiceWorker,
        EnvironmentContext::ElectronRenderer,
    ];
    for context in browser_like {
        let env = Environment {
            context,
            ..Environment::default()
        };
        assert!(env.is_browser(), "{context:?} should be a browser context");
    }

    for context in [EnvironmentContext::Node, EnvironmentContext::ElectronMain] {
        let env = Environment {
            context,
            ..Environment::default()
        };
        assert!(!env.is_browser(), "{context:?} should not be a browser context");
    }
}

#[test]
fn test_asset_interpreter_reads_meta() {
    let asset = Asset::new("cli", "C").with_meta("interpreter", json!("/usr/bin/env node"));
    assert_eq!(asset.interpreter(), Some(&json!("/usr/bin/env node")));
    assert_eq!(Asset::new("x", "X").interpreter(), None);
}

#[test]
fn test_relative_slash_path() {
    let root = Path::new("/project");
    assert_eq!(
        relative_slash_path(root, Path::new("/project/src/a.js")),
        Some("src/a.js".to_owned())
    );
    assert_eq!(relative_slash_path(root, Path::new("/elsewhere/a.js")), None);
}
