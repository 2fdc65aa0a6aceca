// src/pipeline/prefix.rs

//! Vendor prefixing.
//!
//! Target-driven prefixes (`-webkit-`, `-moz-`, ...) are produced by the CSS
//! engine from the [`Browsers`] parsed here. The engine has no notion of the
//! old IE grid syntax, so [`add_grid_prefixes`] inserts it on the compiled
//! CSS text before bundling. Existing prefixed declarations are never
//! removed or rewritten.

use std::collections::HashSet;
use std::sync::LazyLock;

use lightningcss::targets::Browsers;
use regex::Regex;

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*([-A-Za-z_][-A-Za-z0-9_]*)\s*:\s*(.*?)\s*$").expect("valid regex")
});

static LINE_NAMES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("valid regex"));

static REPEAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"repeat\(\s*(\d+)\s*,\s*((?:[^()]|\([^()]*\))+?)\s*\)").expect("valid regex")
});

static IMPORTANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*!\s*important$").expect("valid regex"));

/// Parse `"<browser> <version>"` entries into engine targets.
///
/// Versions are `major[.minor[.patch]]`. When a browser is listed more than
/// once the oldest version wins.
pub fn parse_targets(entries: &[String]) -> Result<Browsers, String> {
    let mut browsers = Browsers::default();

    for entry in entries {
        let mut parts = entry.split_whitespace();
        let (Some(name), Some(version), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!(
                "invalid browser target '{entry}' (expected \"<browser> <version>\")"
            ));
        };

        let version = parse_version(version)
            .ok_or_else(|| format!("invalid version in browser target '{entry}'"))?;

        let slot = match name.to_ascii_lowercase().as_str() {
            "android" => &mut browsers.android,
            "chrome" => &mut browsers.chrome,
            "edge" => &mut browsers.edge,
            "firefox" | "ff" => &mut browsers.firefox,
            "ie" => &mut browsers.ie,
            "ios_saf" | "ios" => &mut browsers.ios_saf,
            "opera" => &mut browsers.opera,
            "safari" => &mut browsers.safari,
            "samsung" => &mut browsers.samsung,
            other => {
                return Err(format!("unknown browser '{other}' in target '{entry}'"));
            }
        };
        *slot = Some((*slot).map_or(version, |v| v.min(version)));
    }

    Ok(browsers)
}

/// Encode `major.minor.patch` the way the CSS engine expects
/// (`major << 16 | minor << 8 | patch`).
fn parse_version(s: &str) -> Option<u32> {
    let mut parts = s.split('.');
    let major: u32 = parts.next()?.parse().ok()?;
    let minor: u32 = parts.next().map(str::parse).transpose().ok()?.unwrap_or(0);
    let patch: u32 = parts.next().map(str::parse).transpose().ok()?.unwrap_or(0);
    if parts.next().is_some() || major > 0xffff || minor > 0xff || patch > 0xff {
        return None;
    }
    Some((major << 16) | (minor << 8) | patch)
}

/// Insert IE grid declarations ahead of their standard counterparts.
///
/// Handles `display: grid | inline-grid`, `grid-template-columns/rows`
/// (with `repeat(n, ...)` rewritten to the `(...)[n]` form) and
/// `grid-column/row` placement. Blocks that already carry a prefixed form
/// are left as they are, so running this twice is the same as running it
/// once.
pub fn add_grid_prefixes(css: &str) -> String {
    let blocks = leaf_blocks(css);
    if blocks.is_empty() {
        return css.to_string();
    }

    let mut out = String::with_capacity(css.len() + css.len() / 8);
    let mut last = 0;
    for (start, end) in blocks {
        out.push_str(&css[last..start]);
        out.push_str(&prefix_block(&css[start..end]));
        last = end;
    }
    out.push_str(&css[last..]);
    out
}

/// Byte ranges of blocks that contain no nested block, i.e. plain
/// declaration lists. Ranges exclude the braces.
fn leaf_blocks(css: &str) -> Vec<(usize, usize)> {
    let bytes = css.as_bytes();
    // (content start, has nested block)
    let mut stack: Vec<(usize, bool)> = Vec::new();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_comment(bytes, i);
                continue;
            }
            q @ (b'"' | b'\'') => {
                i = skip_string(bytes, i, q);
                continue;
            }
            b'{' => {
                if let Some(top) = stack.last_mut() {
                    top.1 = true;
                }
                stack.push((i + 1, false));
            }
            b'}' => {
                if let Some((start, has_child)) = stack.pop() {
                    if !has_child {
                        blocks.push((start, i));
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }

    blocks
}

fn skip_comment(bytes: &[u8], start: usize) -> usize {
    let mut j = start + 2;
    while j + 1 < bytes.len() {
        if bytes[j] == b'*' && bytes[j + 1] == b'/' {
            return j + 2;
        }
        j += 1;
    }
    bytes.len()
}

fn skip_string(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b if b == quote => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

/// Split a declaration list on `;` outside strings, comments and parens.
fn split_declarations(body: &str) -> Vec<&str> {
    let bytes = body.as_bytes();
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut last = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_comment(bytes, i);
                continue;
            }
            q @ (b'"' | b'\'') => {
                i = skip_string(bytes, i, q);
                continue;
            }
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b';' if depth == 0 => {
                pieces.push(&body[last..i]);
                last = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    pieces.push(&body[last..]);
    pieces
}

struct Declaration<'a> {
    name: String,
    value: &'a str,
}

fn parse_declaration(piece: &str) -> Option<Declaration<'_>> {
    if piece.contains("/*") {
        return None;
    }
    let caps = DECLARATION.captures(piece)?;
    let name = caps.get(1)?.as_str().to_ascii_lowercase();
    let value = caps.get(2)?.as_str();
    Some(Declaration { name, value })
}

/// Key used to detect prefixed declarations already present in a block.
/// `display` is keyed by value because both forms share the property name.
fn presence_key(name: &str, value: &str) -> String {
    if name == "display" {
        format!("display:{}", value.trim().to_ascii_lowercase())
    } else {
        name.to_string()
    }
}

fn prefix_block(body: &str) -> String {
    let pieces = split_declarations(body);
    let parsed: Vec<Option<Declaration<'_>>> = pieces.iter().map(|p| parse_declaration(p)).collect();

    let mut present: HashSet<String> = parsed
        .iter()
        .flatten()
        .map(|d| presence_key(&d.name, d.value))
        .collect();

    let mut out = String::with_capacity(body.len() + 32);
    for (idx, (piece, decl)) in pieces.iter().zip(parsed.iter()).enumerate() {
        if idx > 0 {
            out.push(';');
        }
        if let Some(decl) = decl {
            let lead = &piece[..piece.len() - piece.trim_start().len()];
            for (name, value) in ie_grid_equivalents(&decl.name, decl.value) {
                if present.insert(presence_key(name, &value)) {
                    out.push_str(lead);
                    out.push_str(name);
                    out.push_str(": ");
                    out.push_str(&value);
                    out.push(';');
                }
            }
        }
        out.push_str(piece);
    }
    out
}

/// IE equivalents for one standard declaration, in output order.
fn ie_grid_equivalents(name: &str, value: &str) -> Vec<(&'static str, String)> {
    let (value, important) = split_important(value);
    let with_flag = |v: String| if important { format!("{v} !important") } else { v };

    match name {
        "display" => match value.to_ascii_lowercase().as_str() {
            "grid" => vec![("display", with_flag("-ms-grid".to_string()))],
            "inline-grid" => vec![("display", with_flag("-ms-inline-grid".to_string()))],
            _ => Vec::new(),
        },
        "grid-template-columns" => ms_track_list(value)
            .map(|v| vec![("-ms-grid-columns", with_flag(v))])
            .unwrap_or_default(),
        "grid-template-rows" => ms_track_list(value)
            .map(|v| vec![("-ms-grid-rows", with_flag(v))])
            .unwrap_or_default(),
        "grid-column" => placement(value, "-ms-grid-column", "-ms-grid-column-span")
            .into_iter()
            .map(|(n, v)| (n, with_flag(v)))
            .collect(),
        "grid-row" => placement(value, "-ms-grid-row", "-ms-grid-row-span")
            .into_iter()
            .map(|(n, v)| (n, with_flag(v)))
            .collect(),
        "grid-column-start" => integer(value)
            .map(|n| vec![("-ms-grid-column", with_flag(n.to_string()))])
            .unwrap_or_default(),
        "grid-row-start" => integer(value)
            .map(|n| vec![("-ms-grid-row", with_flag(n.to_string()))])
            .unwrap_or_default(),
        "grid-column-end" => span(value)
            .map(|n| vec![("-ms-grid-column-span", with_flag(n.to_string()))])
            .unwrap_or_default(),
        "grid-row-end" => span(value)
            .map(|n| vec![("-ms-grid-row-span", with_flag(n.to_string()))])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn split_important(value: &str) -> (&str, bool) {
    match IMPORTANT.find(value) {
        Some(m) => (value[..m.start()].trim_end(), true),
        None => (value, false),
    }
}

/// Rewrite a standard track list into the IE form, or `None` when IE has no
/// equivalent (auto repetition, subgrid, `none`, ...).
fn ms_track_list(value: &str) -> Option<String> {
    let lower = value.to_ascii_lowercase();
    if lower.trim() == "none"
        || ["auto-fill", "auto-fit", "subgrid", "masonry", "var("]
            .iter()
            .any(|k| lower.contains(k))
    {
        return None;
    }

    let without_names = LINE_NAMES.replace_all(value, " ");
    let expanded = REPEAT.replace_all(&without_names, "($2)[$1]");
    let tracks = expanded.split_whitespace().collect::<Vec<_>>().join(" ");

    if tracks.is_empty() { None } else { Some(tracks) }
}

fn integer(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

fn span(value: &str) -> Option<u32> {
    let rest = value.trim().strip_prefix("span")?;
    let n: u32 = rest.trim().parse().ok()?;
    (n > 0).then_some(n)
}

/// `grid-column`/`grid-row` shorthand → start and span declarations.
fn placement(
    value: &str,
    start_name: &'static str,
    span_name: &'static str,
) -> Vec<(&'static str, String)> {
    let mut parts = value.split('/').map(str::trim);
    let first = parts.next().unwrap_or_default();
    let second = parts.next();
    if parts.next().is_some() {
        return Vec::new();
    }

    let mut out = Vec::new();
    match (integer(first), span(first)) {
        (Some(start), _) if start > 0 => {
            out.push((start_name, start.to_string()));
            match second {
                None => {}
                Some(end) => {
                    if let Some(n) = span(end) {
                        out.push((span_name, n.to_string()));
                    } else if let Some(end) = integer(end) {
                        if end > start {
                            out.push((span_name, (end - start).to_string()));
                        }
                    }
                }
            }
        }
        (None, Some(n)) if second.is_none() => out.push((span_name, n.to_string())),
        _ => {}
    }
    out
}
