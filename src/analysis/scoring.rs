use super::{AnalyzedIngredient, RiskLevel};

/// Neutral score reported when there is nothing to grade.
pub const EMPTY_LIST_SCORE: u8 = 50;

fn is_bonus_tag(tag: &str) -> bool {
    tag.starts_with("good_for")
        || matches!(
            tag,
            "healthy_fat" | "fiber" | "antioxidant" | "whole_grain" | "anti_inflammatory"
        )
}

/// Aggregate per-ingredient classifications into a 0-100 score.
///
/// Avoid-classified ingredients are penalized twice, once through the ratio
/// term and once per occurrence: a single severe ingredient among many benign
/// ones must still pull the score down, and a list that is mostly questionable
/// must score poorly regardless of its length. Unresolved ingredients count
/// only toward the flat unknown penalty, never toward the risk ratios.
pub fn health_score(ingredients: &[AnalyzedIngredient]) -> u8 {
    if ingredients.is_empty() {
        return EMPTY_LIST_SCORE;
    }

    let total = ingredients.len();
    let mut avoid_count = 0usize;
    let mut caution_count = 0usize;
    let mut unknown_count = 0usize;
    for ingredient in ingredients {
        if !ingredient.resolved {
            unknown_count += 1;
            continue;
        }
        match ingredient.risk_level {
            RiskLevel::Avoid => avoid_count += 1,
            RiskLevel::Caution => caution_count += 1,
            RiskLevel::Safe => {}
        }
    }

    if unknown_count == total {
        return (50i64 - 5 * unknown_count as i64).clamp(0, 100) as u8;
    }

    let total = total as f64;
    let mut score = 100.0;
    score -= avoid_count as f64 / total * 60.0;
    score -= caution_count as f64 / total * 25.0;

    let mut bonus: f64 = 0.0;
    for ingredient in ingredients {
        if !ingredient.resolved || ingredient.risk_level != RiskLevel::Safe {
            continue;
        }
        if let Some(record) = &ingredient.record {
            if record.tags.iter().any(|tag| is_bonus_tag(tag)) {
                bonus += 3.0;
            }
        }
    }
    score += bonus.min(15.0);

    score -= unknown_count as f64 * 5.0;
    score -= avoid_count as f64 * 8.0;

    score.clamp(0.0, 100.0).round() as u8
}
