// Tests for the ordinal color scale

use sitegraph_core::color::{CATEGORY_PALETTE, ColorScale};
use sitegraph_core::document::ColorTable;

fn table(domain: &[&str], range: &[&str]) -> ColorTable {
    ColorTable {
        domain: domain.iter().map(|s| s.to_string()).collect(),
        range: range.iter().map(|s| s.to_string()).collect(),
    }
}

// ============================================================================
// Domain/Range Mapping Tests
// ============================================================================

#[test]
fn test_known_keys_map_in_domain_order() {
    let mut scale = ColorScale::new(&table(&["Html", "Css"], &["#111111", "#222222"]));

    assert_eq!(scale.color_for("Html"), "#111111");
    assert_eq!(scale.color_for("Css"), "#222222");
}

#[test]
fn test_lookup_does_not_depend_on_call_order() {
    let mut scale = ColorScale::new(&table(&["Html", "Css"], &["#111111", "#222222"]));

    assert_eq!(scale.color_for("Css"), "#222222");
    assert_eq!(scale.color_for("Html"), "#111111");
}

// ============================================================================
// Implicit Domain Extension Tests
// ============================================================================

#[test]
fn test_unknown_key_extends_domain() {
    let mut scale = ColorScale::new(&table(&["Html"], &["#111111", "#222222", "#333333"]));

    assert_eq!(scale.color_for("Png"), "#222222");
    assert_eq!(scale.domain(), &["Html".to_string(), "Png".to_string()]);

    // Same key again gets the same color
    assert_eq!(scale.color_for("Png"), "#222222");
}

#[test]
fn test_range_cycles_when_exhausted() {
    let mut scale = ColorScale::new(&table(&[], &["#aa0000", "#00bb00"]));

    assert_eq!(scale.color_for("a"), "#aa0000");
    assert_eq!(scale.color_for("b"), "#00bb00");
    assert_eq!(scale.color_for("c"), "#aa0000");
    assert_eq!(scale.color_for("a"), "#aa0000");
}

#[test]
fn test_assignment_is_deterministic() {
    let keys = ["Html", "Css", "Png", "Html", "JavaScript", "Css"];

    let mut first = ColorScale::new(&table(&[], &["#1", "#2", "#3"]));
    let mut second = ColorScale::new(&table(&[], &["#1", "#2", "#3"]));

    let a: Vec<String> = keys.iter().map(|k| first.color_for(k)).collect();
    let b: Vec<String> = keys.iter().map(|k| second.color_for(k)).collect();
    assert_eq!(a, b);
}

// ============================================================================
// Fallback Palette Tests
// ============================================================================

#[test]
fn test_empty_table_falls_back_to_palette() {
    let mut scale = ColorScale::new(&ColorTable::default());

    assert_eq!(scale.color_for("Html"), CATEGORY_PALETTE[0]);
    assert_eq!(scale.color_for("Css"), CATEGORY_PALETTE[1]);
}

#[test]
fn test_empty_range_keeps_declared_domain() {
    let mut scale = ColorScale::new(&table(&["Css", "Html"], &[]));

    // Declared domain order still decides palette positions
    assert_eq!(scale.color_for("Html"), CATEGORY_PALETTE[1]);
    assert_eq!(scale.color_for("Css"), CATEGORY_PALETTE[0]);
}

#[test]
fn test_palette_has_ten_distinct_colors() {
    let mut seen = std::collections::HashSet::new();
    for color in CATEGORY_PALETTE {
        assert!(seen.insert(color));
    }
    assert_eq!(seen.len(), 10);
}
