//! Marketing group classification of WERS codes.
//!
//! A code is matched against [`MARKETING_GROUPS`] in two passes: first by
//! prefix, then by containment. Table order breaks ties in both passes.
//!
//! ```text
//! "YZU1234"  ──starts with "YZU"──▶  fp-vehicle.bodycode
//! "X-YCW-9"  ──contains "YCW"─────▶  fp-powertrain.rearaxleratio
//! "ZZZ999"   ──no match───────────▶  ""
//! ```

/// Known code prefixes and their marketing group, in match order.
pub const MARKETING_GROUPS: [(&str, &str); 15] = [
    ("#T#", "fp-overflow"),
    ("YZU", "fp-vehicle.bodycode"),
    ("YZA", "fp-vehicle.pepcode"),
    ("YCW", "fp-powertrain.rearaxleratio"),
    ("ITS", "fp-interior.material"),
    ("YCM", "fp-interior.material"),
    ("TR-", "fp-powertrain.transmission"),
    ("SW1", "fp-exterior.wheels"),
    ("ST1", "fp-exterior.tire"),
    ("SE#", "fp-vehicle.series"),
    ("PAA", "fp-exterior.paint"),
    ("Entity", "fp-entity"),
    ("EN-", "fp-powertrain.engine"),
    ("DR-", "fp-powertrain.wheeldrive"),
    ("000", "fp-interior.color"),
];

/// Marketing group for a WERS code, or `""` when nothing matches.
pub fn classify(code: &str) -> &'static str {
    if code.is_empty() {
        return "";
    }

    // The segment before '#' is split off but matching still runs on the
    // whole code, e.g. "SE#1" must reach the "SE#" entry.
    let _family = code.split('#').next().unwrap_or(code);

    MARKETING_GROUPS
        .iter()
        .find(|(prefix, _)| code.starts_with(prefix))
        .or_else(|| {
            MARKETING_GROUPS
                .iter()
                .find(|(prefix, _)| code.contains(prefix))
        })
        .map(|(_, group)| *group)
        .unwrap_or("")
}

/// Printable table of prefixes, one line per entry.
pub fn groups_description() -> String {
    let mut out = String::from("Marketing groups (first match wins; prefix pass, then contains pass):\n");
    for (i, (prefix, group)) in MARKETING_GROUPS.iter().enumerate() {
        out.push_str(&format!("  {:>2}. {:<8} → {}\n", i + 1, format!("\"{}\"", prefix), group));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with() {
        assert_eq!(classify("YZU1234"), "fp-vehicle.bodycode");
        assert_eq!(classify("TR-6F35"), "fp-powertrain.transmission");
        assert_eq!(classify("Entity_A"), "fp-entity");
        assert_eq!(classify("000123"), "fp-interior.color");
    }

    #[test]
    fn test_starts_with_beats_earlier_contains() {
        // "YZA" starts the code, "YZU" only appears later: prefix pass wins
        assert_eq!(classify("YZA-YZU"), "fp-vehicle.pepcode");
    }

    #[test]
    fn test_contains_fallback() {
        assert_eq!(classify("X-YCW-9"), "fp-powertrain.rearaxleratio");
        assert_eq!(classify("ABC-EN-1"), "fp-powertrain.engine");
    }

    #[test]
    fn test_contains_uses_table_order() {
        // Both "YCM" and "PAA" are contained; "YCM" is earlier in the table
        assert_eq!(classify("xPAAxYCM"), "fp-interior.material");
    }

    #[test]
    fn test_no_match() {
        assert_eq!(classify("ZZZ999"), "");
        assert_eq!(classify(""), "");
    }

    #[test]
    fn test_hash_codes_use_full_string() {
        assert_eq!(classify("#T#001"), "fp-overflow");
        assert_eq!(classify("SE#42"), "fp-vehicle.series");
        // "AB" before '#' matches nothing, but the full code contains "ST1"
        assert_eq!(classify("AB#ST1"), "fp-exterior.tire");
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(classify("yzu1234"), "");
    }

    #[test]
    fn test_groups_description_lists_all() {
        let text = groups_description();
        assert_eq!(text.lines().count(), MARKETING_GROUPS.len() + 1);
        assert!(text.contains("fp-powertrain.wheeldrive"));
    }
}
