//! Ensures all workspace crates use `version.workspace = true` and that
//! the workspace version is consistent across all Cargo.toml files.

use std::path::Path;

fn workspace_root() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(Path::parent)
        .expect("workspace root")
}

fn read_toml(path: &Path) -> toml::Value {
    let content = std::fs::read_to_string(path).unwrap();
    content.parse().unwrap()
}

#[test]
fn all_crates_use_workspace_version() {
    for krate in ["crates/stablekey-core", "crates/stablekey-cli"] {
        let doc = read_toml(&workspace_root().join(krate).join("Cargo.toml"));
        let inherited = doc["package"]["version"]
            .as_table()
            .and_then(|t| t.get("workspace"))
            .and_then(|v| v.as_bool());
        assert_eq!(
            inherited,
            Some(true),
            "{} should use version.workspace = true",
            krate
        );
    }
}

#[test]
fn workspace_version_matches_cargo_pkg() {
    let doc = read_toml(&workspace_root().join("Cargo.toml"));
    let ws_version = doc["workspace"]["package"]["version"].as_str().unwrap();
    assert_eq!(ws_version, env!("CARGO_PKG_VERSION"));
    assert_eq!(ws_version, stablekey_core::VERSION);
}
