use proptest::prelude::*;
use stylepipe::pipeline::prefix::add_grid_prefixes;

fn track() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u32..5).prop_map(|n| format!("{n}fr")),
        (10u32..400).prop_map(|n| format!("{n}px")),
        Just("auto".to_string()),
        (1u32..4, 1u32..3).prop_map(|(n, f)| format!("repeat({n}, {f}fr)")),
    ]
}

fn declaration() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("display: grid".to_string()),
        Just("display: inline-grid".to_string()),
        Just("display: block".to_string()),
        proptest::collection::vec(track(), 1..4)
            .prop_map(|t| format!("grid-template-columns: {}", t.join(" "))),
        proptest::collection::vec(track(), 1..4)
            .prop_map(|t| format!("grid-template-rows: {}", t.join(" "))),
        (1i32..6, 1u32..4).prop_map(|(s, n)| format!("grid-column: {s} / span {n}")),
        (1i32..6).prop_map(|s| format!("grid-row: {s}")),
        Just("-ms-grid-row: 3".to_string()),
        Just("color: red".to_string()),
    ]
}

fn stylesheet() -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::collection::vec(declaration(), 0..6), 1..4).prop_map(
        |blocks| {
            blocks
                .iter()
                .enumerate()
                .map(|(i, decls)| format!(".b{i} {{\n  {};\n}}\n", decls.join(";\n  ")))
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn prefixing_is_idempotent(css in stylesheet()) {
        let once = add_grid_prefixes(&css);
        prop_assert_eq!(add_grid_prefixes(&once), once);
    }

    #[test]
    fn prefixing_only_adds_declarations(css in stylesheet()) {
        let out = add_grid_prefixes(&css);
        for line in css.lines().map(str::trim).filter(|l| l.contains(':')) {
            let decl = line.trim_end_matches(';');
            prop_assert!(out.contains(decl), "lost declaration {:?}", decl);
        }
    }

    #[test]
    fn standard_grid_keeps_a_ms_column_form(cols in proptest::collection::vec(track(), 1..4)) {
        let css = format!(".g {{ display: grid; grid-template-columns: {}; }}", cols.join(" "));
        let out = add_grid_prefixes(&css);
        prop_assert!(out.contains("display: -ms-grid"));
        prop_assert!(out.contains("-ms-grid-columns:"));
    }
}
