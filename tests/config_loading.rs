mod common;
use crate::common::{init_tracing, TestResult};

use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use stylepipe::config::{load_and_validate, load_from_path, resolve_config};
use stylepipe::errors::StylepipeError;
use stylepipe::types::ChangesWhileBuilding;

#[test]
fn full_config_is_loaded_and_anchored_at_its_directory() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let path = dir.path().join("Stylepipe.toml");
    fs::write(
        &path,
        r#"
[paths]
source_dir = "assets/sass"
source_glob = "**/*.scss"
dest_dir = "public/css"
bundle_name = "app.min.css"

[prefix]
targets = ["chrome 100", "firefox 100"]
grid = false

[watch]
debounce_ms = 0
changes_while_building = "discard"
use_hash = true
"#,
    )?;

    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.root(), dir.path());
    assert_eq!(cfg.source_dir(), dir.path().join("assets/sass"));
    assert_eq!(cfg.bundle_path(), dir.path().join("public/css/app.min.css"));
    assert_eq!(cfg.map_path(), dir.path().join("public/css/app.min.css.map"));
    assert_eq!(cfg.paths.source_glob, "**/*.scss");
    assert!(!cfg.prefix.grid);
    assert_eq!(cfg.browsers().chrome, Some(100 << 16));
    assert_eq!(cfg.browsers().ie, None);
    assert_eq!(cfg.watch.debounce_ms, 0);
    assert_eq!(cfg.watch.changes_while_building, ChangesWhileBuilding::Discard);
    assert!(cfg.watch.use_hash);
    Ok(())
}

#[test]
fn empty_file_yields_built_in_defaults() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let path = dir.path().join("Stylepipe.toml");
    fs::write(&path, "")?;

    let cfg = load_and_validate(&path)?;

    assert_eq!(
        cfg.paths.source_dir,
        PathBuf::from("mobile_api_extensions/static/mobile_api_extensions/sass")
    );
    assert_eq!(
        cfg.paths.dest_dir,
        PathBuf::from("mobile_api_extensions/static/mobile_api_extensions/css")
    );
    assert_eq!(cfg.paths.source_glob, "**/*");
    assert_eq!(cfg.paths.bundle_name, "bundle.min.css");
    assert!(cfg.prefix.grid);
    assert!(!cfg.prefix.cascade);
    assert_eq!(cfg.browsers().ie, Some(11 << 16));
    assert_eq!(cfg.watch.debounce_ms, 100);
    assert_eq!(cfg.watch.changes_while_building, ChangesWhileBuilding::Queue);
    assert!(!cfg.watch.use_hash);
    Ok(())
}

#[test]
fn raw_loading_does_not_validate() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Stylepipe.toml");
    fs::write(&path, "[paths]\nbundle_name = \"out/bundle.css\"\n")?;

    let raw = load_from_path(&path)?;
    assert_eq!(raw.paths.bundle_name, "out/bundle.css");

    let err = load_and_validate(&path).unwrap_err();
    assert!(matches!(err, StylepipeError::ConfigError(_)));
    Ok(())
}

#[test]
fn invalid_values_are_rejected() -> TestResult {
    init_tracing();
    let cases = [
        "[paths]\nsource_glob = \"[unclosed\"\n",
        "[paths]\nbundle_name = \"\"\n",
        "[prefix]\ntargets = [\"netscape 4\"]\n",
        "[prefix]\ntargets = [\"chrome latest\"]\n",
        "[prefix]\ncascade = true\n",
    ];

    for contents in cases {
        let dir = tempdir()?;
        let path = dir.path().join("Stylepipe.toml");
        fs::write(&path, contents)?;

        let err = load_and_validate(&path).unwrap_err();
        assert!(
            matches!(err, StylepipeError::ConfigError(_)),
            "expected config error for {contents:?}, got {err:?}"
        );
    }
    Ok(())
}

#[test]
fn malformed_toml_is_a_parse_error() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Stylepipe.toml");
    fs::write(&path, "[watch]\nchanges_while_building = \"sometimes\"\n")?;

    let err = load_and_validate(&path).unwrap_err();
    assert!(matches!(err, StylepipeError::TomlError(_)));
    Ok(())
}

#[test]
fn explicit_config_path_is_honoured() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[paths]\nbundle_name = \"custom.css\"\n")?;

    let cfg = resolve_config(path.to_str())?;
    assert_eq!(cfg.bundle_path().file_name().and_then(|n| n.to_str()), Some("custom.css"));
    Ok(())
}
