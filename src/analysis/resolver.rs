use crate::knowledge_base::{normalize_name, IngredientRecord, KnowledgeBase};

use super::RiskLevel;

/// Match a raw ingredient string against the knowledge base.
///
/// Lookup runs in three passes over normalized text: exact canonical key,
/// alias equality, then substring containment in either direction (the last
/// one tolerates truncation and pluralization noise in scanned label text).
/// Within a pass the first matching record wins, in knowledge-base definition
/// order. That is a deliberate recall-over-precision policy for noisy input:
/// callers get the first plausible match, not the best one.
pub fn resolve<'a>(kb: &'a KnowledgeBase, raw_name: &str) -> Option<&'a IngredientRecord> {
    let normalized = normalize_name(raw_name);
    if normalized.is_empty() {
        // punctuation-only input would substring-match everything
        return None;
    }

    if let Some(record) = kb.get_exact(&normalized) {
        return Some(record);
    }

    for record in kb.records() {
        if record
            .aliases
            .iter()
            .any(|alias| normalize_name(alias) == normalized)
        {
            return Some(record);
        }
    }

    for record in kb.records() {
        let key = normalize_name(&record.name);
        if contains_either(&normalized, &key) {
            return Some(record);
        }
        if record.aliases.iter().any(|alias| {
            let alias = normalize_name(alias);
            !alias.is_empty() && contains_either(&normalized, &alias)
        }) {
            return Some(record);
        }
    }

    None
}

fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

const AVOID_HINTS: &[&str] = &["sugar", "syrup", "sweetener", "preservative", "hydrogenated"];

/// Provisional risk for an ingredient the knowledge base does not know,
/// guessed from keywords in the raw lowercased name. Anything without an
/// avoid-grade keyword lands on caution: unknown ingredients are never
/// presumed safe, including artificial color/flavor hints.
pub fn heuristic_risk(raw_name: &str) -> RiskLevel {
    let lowered = raw_name.to_lowercase();
    if AVOID_HINTS.iter().any(|hint| lowered.contains(hint)) {
        return RiskLevel::Avoid;
    }
    RiskLevel::Caution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge_base::KnowledgeBase;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::bundled().unwrap()
    }

    #[test]
    fn resolves_exact_canonical_name() {
        let kb = kb();
        let record = resolve(&kb, "Sugar").unwrap();
        assert_eq!(record.name, "Sugar");
    }

    #[test]
    fn resolves_via_alias() {
        let kb = kb();
        let record = resolve(&kb, "sucrose").unwrap();
        assert_eq!(record.name, "Sugar");
        let record = resolve(&kb, "E621").unwrap();
        assert_eq!(record.name, "MSG");
    }

    #[test]
    fn resolves_via_substring_both_directions() {
        let kb = kb();
        // input contains an alias
        let record = resolve(&kb, "organic cane sugar crystals").unwrap();
        assert_eq!(record.name, "Sugar");
        // key contains the (truncated) input
        let record = resolve(&kb, "turmer").unwrap();
        assert_eq!(record.name, "Turmeric");
    }

    #[test]
    fn first_plausible_match_wins_in_definition_order() {
        let kb = kb();
        // "oil" is a substring of several records; the first fat entry in
        // definition order is the one that must win.
        let record = resolve(&kb, "oil").unwrap();
        assert_eq!(record.name, "Palm Oil");
    }

    #[test]
    fn nonsense_and_punctuation_do_not_resolve() {
        let kb = kb();
        assert!(resolve(&kb, "xyzzyqplm").is_none());
        assert!(resolve(&kb, "!!??").is_none());
    }

    #[test]
    fn heuristic_flags_avoid_keywords() {
        assert_eq!(heuristic_risk("brown rice syrup solids"), RiskLevel::Avoid);
        assert_eq!(heuristic_risk("Potassium Sorbate Preservative"), RiskLevel::Avoid);
        assert_eq!(heuristic_risk("hydrogenated soybean blend"), RiskLevel::Avoid);
    }

    #[test]
    fn heuristic_defaults_to_caution() {
        assert_eq!(heuristic_risk("artificial strawberry flavor"), RiskLevel::Caution);
        assert_eq!(heuristic_risk("xyzzyqplm"), RiskLevel::Caution);
    }
}
