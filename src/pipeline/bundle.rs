// src/pipeline/bundle.rs

//! Minification, concatenation and source-map emission via `lightningcss`.
//!
//! Every compiled unit is parsed with its own source index, the rule lists
//! are merged into one stylesheet, and that stylesheet is minified and
//! printed once. Rule merging therefore works across files, and each printed
//! rule maps back to the unit it came from.

use lightningcss::rules::CssRuleList;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use parcel_sourcemap::SourceMap;
use serde_json::Value;

use crate::errors::{Result, StylepipeError};

/// Plain CSS ready to be bundled, named by its style-source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledUnit {
    pub source_name: String,
    pub css: String,
}

/// The two output artifacts, as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOutput {
    pub css: String,
    pub map: String,
}

/// Names written into the artifacts.
#[derive(Debug, Clone, Copy)]
pub struct BundleNames<'a> {
    pub bundle: &'a str,
    pub map: &'a str,
}

fn targets_for(browsers: Browsers) -> Targets {
    Targets {
        browsers: Some(browsers),
        ..Targets::default()
    }
}

/// Merge, prefix, minify and print `units`, producing the bundle and its map.
///
/// The map has one source per unit, named after its style-source
/// (`unit.source_name`), but its positions and `sourcesContent` refer to the
/// unit's compiled CSS (`unit.css`), not to the original Sass/SCSS text:
/// `grass` does not emit source maps to chain through. A mapping therefore
/// identifies the originating file and the rule within its compiled output.
pub fn bundle_units(units: &[CompiledUnit], names: BundleNames<'_>, browsers: Browsers) -> Result<BundleOutput> {
    let mut sources = Vec::with_capacity(units.len());
    let mut rules = Vec::new();

    for (index, unit) in units.iter().enumerate() {
        let options = ParserOptions {
            filename: unit.source_name.clone(),
            source_index: index as u32,
            ..ParserOptions::default()
        };
        let mut sheet = StyleSheet::parse(&unit.css, options).map_err(|e| {
            StylepipeError::BundleError(format!("{}: {e}", unit.source_name))
        })?;
        sources.push(unit.source_name.clone());
        rules.append(&mut sheet.rules.0);
    }

    let mut sheet = StyleSheet::new(
        sources,
        CssRuleList(rules),
        ParserOptions {
            filename: names.bundle.to_string(),
            ..ParserOptions::default()
        },
    );

    sheet
        .minify(MinifyOptions {
            targets: targets_for(browsers),
            ..MinifyOptions::default()
        })
        .map_err(|e| StylepipeError::BundleError(e.to_string()))?;

    let mut source_map = SourceMap::new("");
    for unit in units {
        let index = source_map.add_source(&unit.source_name);
        source_map
            .set_source_content(index as usize, &unit.css)
            .map_err(|e| StylepipeError::SourceMapError(format!("{e:?}")))?;
    }

    let printed = sheet
        .to_css(PrinterOptions {
            minify: true,
            source_map: Some(&mut source_map),
            targets: targets_for(browsers),
            ..PrinterOptions::default()
        })
        .map_err(|e| StylepipeError::BundleError(e.to_string()))?;

    let raw_map = source_map
        .to_json(None)
        .map_err(|e| StylepipeError::SourceMapError(format!("{e:?}")))?;

    Ok(BundleOutput {
        css: format!("{}\n/*# sourceMappingURL={} */\n", printed.code, names.map),
        map: finalize_map(&raw_map, names.bundle)?,
    })
}

/// Stamp the `file` field the way source-map consumers expect it.
fn finalize_map(raw: &str, bundle_name: &str) -> Result<String> {
    let mut value: Value = serde_json::from_str(raw)
        .map_err(|e| StylepipeError::SourceMapError(e.to_string()))?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("file".to_string(), Value::String(bundle_name.to_string()));
    }
    serde_json::to_string(&value).map_err(|e| StylepipeError::SourceMapError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: BundleNames<'static> = BundleNames {
        bundle: "bundle.min.css",
        map: "bundle.min.css.map",
    };

    fn unit(name: &str, css: &str) -> CompiledUnit {
        CompiledUnit {
            source_name: name.to_string(),
            css: css.to_string(),
        }
    }

    #[test]
    fn concatenates_and_minifies_in_order() {
        let units = [
            unit("a.scss", ".x {\n  color: red;\n}\n"),
            unit("b.scss", ".y {\n  margin: 0 auto;\n}\n"),
        ];
        let out = bundle_units(&units, NAMES, Browsers::default()).unwrap();

        let x = out.css.find(".x{color:red}").expect("rule from a.scss");
        let y = out.css.find(".y{margin:0 auto}").expect("rule from b.scss");
        assert!(x < y);
        assert!(out.css.ends_with("/*# sourceMappingURL=bundle.min.css.map */\n"));
    }

    #[test]
    fn map_lists_sources_with_content_and_file() {
        let units = [unit("a.scss", ".x {\n  color: red;\n}\n"), unit("nested/b.scss", ".y {\n  top: 0;\n}\n")];
        let out = bundle_units(&units, NAMES, Browsers::default()).unwrap();

        let map: Value = serde_json::from_str(&out.map).unwrap();
        assert_eq!(map["version"], 3);
        assert_eq!(map["file"], "bundle.min.css");
        assert_eq!(map["sources"][0], "a.scss");
        assert_eq!(map["sources"][1], "nested/b.scss");
        assert_eq!(map["sourcesContent"][0], ".x {\n  color: red;\n}\n");
        assert!(!map["mappings"].as_str().unwrap_or_default().is_empty());
    }

    #[test]
    fn empty_input_yields_empty_bundle() {
        let out = bundle_units(&[], NAMES, Browsers::default()).unwrap();
        assert_eq!(out.css, "\n/*# sourceMappingURL=bundle.min.css.map */\n");
        let map: Value = serde_json::from_str(&out.map).unwrap();
        assert_eq!(map["file"], "bundle.min.css");
    }

    #[test]
    fn ms_grid_declarations_survive_minification() {
        let units = [unit(
            "grid.scss",
            ".g {\n  -ms-grid-columns: 1fr 2fr;\n  grid-template-columns: 1fr 2fr;\n}\n",
        )];
        let browsers = Browsers {
            ie: Some(11 << 16),
            ..Browsers::default()
        };
        let out = bundle_units(&units, NAMES, browsers).unwrap();
        assert!(out.css.contains("-ms-grid-columns:1fr 2fr"));
        assert!(out.css.contains("grid-template-columns:1fr 2fr"));
    }
}
