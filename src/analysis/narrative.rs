use crate::knowledge_base::{
    Condition, DietSuggestions, KnowledgeBase, TAG_CONTAINS_GLUTEN, TAG_HIGH_GLYCEMIC, TAG_SODIUM,
};

use super::{AnalyzedIngredient, RiskLevel};

/// Derive the summary sentence and the ordered concerns list.
pub fn narrate(
    ingredients: &[AnalyzedIngredient],
    health_score: u8,
    conditions: &[Condition],
) -> (String, Vec<String>) {
    let summary = if health_score >= 80 {
        "This food appears to be a good choice for your health profile."
    } else if health_score >= 60 {
        "This food is moderately suitable for you, but consume in moderation."
    } else if health_score >= 40 {
        "This food has some ingredients that may not be ideal for your conditions."
    } else {
        "This food contains several ingredients that may be harmful for your health conditions."
    };

    let mut concerns = Vec::new();

    let avoid_names = names_at(ingredients, RiskLevel::Avoid);
    if !avoid_names.is_empty() {
        concerns.push(format!("Ingredients to avoid: {}", avoid_names.join(", ")));
    }
    let caution_names = names_at(ingredients, RiskLevel::Caution);
    if !caution_names.is_empty() {
        concerns.push(format!("Ingredients to limit: {}", caution_names.join(", ")));
    }

    // Condition-specific flags, each checked independently.
    if conditions.contains(&Condition::Diabetes) && any_tagged(ingredients, TAG_HIGH_GLYCEMIC) {
        concerns.push("Contains high glycemic ingredients that may spike blood sugar".to_string());
    }
    if conditions.contains(&Condition::HighBp) && any_tagged(ingredients, TAG_SODIUM) {
        concerns.push("Contains sodium which may affect blood pressure".to_string());
    }
    if conditions.contains(&Condition::GlutenIntolerance)
        && any_tagged(ingredients, TAG_CONTAINS_GLUTEN)
    {
        concerns.push("Contains gluten - not safe for celiac/gluten sensitivity".to_string());
    }

    (summary.to_string(), concerns)
}

fn names_at(ingredients: &[AnalyzedIngredient], risk_level: RiskLevel) -> Vec<&str> {
    ingredients
        .iter()
        .filter(|ingredient| ingredient.risk_level == risk_level)
        .map(|ingredient| ingredient.display_name.as_str())
        .collect()
}

fn any_tagged(ingredients: &[AnalyzedIngredient], tag: &str) -> bool {
    ingredients
        .iter()
        .filter_map(|ingredient| ingredient.record.as_ref())
        .any(|record| record.has_tag(tag))
}

/// Union of the diet suggestion lists registered for the user's conditions,
/// deduplicated in first-seen order. Conditions without a registered set
/// contribute nothing.
pub fn diet_suggestions(kb: &KnowledgeBase, conditions: &[Condition]) -> DietSuggestions {
    let mut suggestions = DietSuggestions::default();
    for &condition in conditions {
        if let Some(diet) = kb.diet_for(condition) {
            for item in &diet.include {
                if !suggestions.include.contains(item) {
                    suggestions.include.push(item.clone());
                }
            }
            for item in &diet.avoid {
                if !suggestions.avoid.contains(item) {
                    suggestions.avoid.push(item.clone());
                }
            }
        }
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze_ingredients, resolver};
    use crate::knowledge_base::KnowledgeBase;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::bundled().unwrap()
    }

    fn analyzed(kb: &KnowledgeBase, names: &[&str], conditions: &[Condition]) -> Vec<AnalyzedIngredient> {
        let raw: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        analyze_ingredients(kb, &raw, conditions).ingredients
    }

    #[test]
    fn summary_follows_the_score_ladder() {
        let (high, _) = narrate(&[], 85, &[]);
        assert!(high.contains("good choice"));
        let (moderate, _) = narrate(&[], 65, &[]);
        assert!(moderate.contains("moderation"));
        let (low, _) = narrate(&[], 45, &[]);
        assert!(low.contains("not be ideal"));
        let (bad, _) = narrate(&[], 20, &[]);
        assert!(bad.contains("harmful"));
    }

    #[test]
    fn concerns_list_avoid_then_limit_then_flags() {
        let kb = kb();
        let conditions = [Condition::Diabetes];
        let ingredients = analyzed(&kb, &["sugar", "palm oil", "honey"], &conditions);
        let (_, concerns) = narrate(&ingredients, 40, &conditions);

        assert!(concerns[0].starts_with("Ingredients to avoid:"));
        assert!(concerns[0].contains("Sugar"));
        assert!(concerns[1].starts_with("Ingredients to limit:"));
        assert!(concerns[1].contains("Honey"));
        assert!(concerns[2].contains("blood sugar"));
    }

    #[test]
    fn gluten_flag_requires_both_condition_and_tag() {
        let kb = kb();
        let conditions = [Condition::GlutenIntolerance];
        let ingredients = analyzed(&kb, &["wheat"], &conditions);
        let (_, concerns) = narrate(&ingredients, 80, &conditions);
        assert!(concerns.iter().any(|c| c.contains("gluten")));

        let ingredients = analyzed(&kb, &["rice"], &conditions);
        let (_, concerns) = narrate(&ingredients, 80, &conditions);
        assert!(concerns.iter().all(|c| !c.contains("gluten")));
    }

    #[test]
    fn unresolved_ingredients_keep_their_input_name_in_concerns() {
        let kb = kb();
        assert!(resolver::resolve(&kb, "mystery extract").is_none());
        let ingredients = analyzed(&kb, &["mystery extract"], &[]);
        let (_, concerns) = narrate(&ingredients, 60, &[]);
        assert!(concerns.iter().any(|c| c.contains("mystery extract")));
    }

    #[test]
    fn diet_suggestions_union_is_deduplicated_in_order() {
        let kb = kb();
        let suggestions =
            diet_suggestions(&kb, &[Condition::Diabetes, Condition::Obesity]);
        // both conditions recommend whole grains; the entry appears once
        let whole_grain_hits = suggestions
            .include
            .iter()
            .filter(|item| item.as_str() == "Whole grains")
            .count();
        assert_eq!(whole_grain_hits, 1);
        // diabetes entries come first
        assert_eq!(suggestions.include[0], "Non-starchy vegetables");
        assert!(!suggestions.avoid.is_empty());
    }

    #[test]
    fn conditions_without_suggestions_contribute_nothing() {
        let kb = kb();
        let suggestions = diet_suggestions(&kb, &[]);
        assert!(suggestions.include.is_empty());
        assert!(suggestions.avoid.is_empty());
    }
}
