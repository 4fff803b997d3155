use crate::knowledge_base::{
    BaseRisk, Condition, KnowledgeBase, Severity, TAG_AVOID_ALL, TAG_HIGH_GLYCEMIC,
    TAG_SATURATED_FAT, TAG_SODIUM, TAG_TRANS_FAT,
};

use super::RiskLevel;

#[derive(Debug, Clone)]
pub struct Classification {
    pub risk_level: RiskLevel,
    /// Tags that drove the decision, deduplicated in first-seen order.
    pub matched_tags: Vec<String>,
}

/// Score an ingredient's tags against the user's condition set.
///
/// The scoring is monotonic: more matching conditions or tags can only move
/// the result toward `Avoid`, never back toward `Safe`.
pub fn classify(
    kb: &KnowledgeBase,
    tags: &[String],
    base_risk: BaseRisk,
    conditions: &[Condition],
) -> Classification {
    let mut avoid_score = 0u32;
    let mut caution_score = 0u32;
    let mut matched_tags: Vec<String> = Vec::new();

    let has_tag = |tag: &str| tags.iter().any(|t| t == tag);

    for &condition in conditions {
        for relevance in kb.relevant_tags(condition) {
            if !has_tag(&relevance.tag) {
                continue;
            }
            if !matched_tags.iter().any(|t| t == &relevance.tag) {
                matched_tags.push(relevance.tag.clone());
            }
            match relevance.severity {
                Severity::Avoid => avoid_score += 2,
                Severity::Limit => caution_score += 1,
                Severity::Watch => {}
            }
        }
    }

    // Cross-checks for pairings the generic condition profiles under-weight.
    let has_condition = |condition: Condition| conditions.contains(&condition);
    if has_tag(TAG_HIGH_GLYCEMIC)
        && (has_condition(Condition::Diabetes)
            || has_condition(Condition::Obesity)
            || has_condition(Condition::Pcos))
    {
        avoid_score += 1;
    }
    if has_tag(TAG_SATURATED_FAT)
        && (has_condition(Condition::Cholesterol) || has_condition(Condition::HeartDisease))
    {
        caution_score += 1;
    }
    if has_tag(TAG_SODIUM) && has_condition(Condition::HighBp) {
        caution_score += 1;
    }

    // Universal override, applied with or without user conditions.
    if has_tag(TAG_AVOID_ALL) || has_tag(TAG_TRANS_FAT) {
        avoid_score += 3;
        if !matched_tags.iter().any(|t| t == TAG_AVOID_ALL) {
            matched_tags.push(TAG_AVOID_ALL.to_string());
        }
    }

    if base_risk == BaseRisk::High {
        caution_score += 1;
    }

    // Decision ladder; avoid takes precedence. The `caution_score >= 2` arm
    // is subsumed by the `>= 1` arm next to it and is kept as calibrated.
    let risk_level = if avoid_score >= 2 {
        RiskLevel::Avoid
    } else if avoid_score >= 1 || caution_score >= 2 || caution_score >= 1 {
        RiskLevel::Caution
    } else {
        RiskLevel::Safe
    };

    Classification {
        risk_level,
        matched_tags,
    }
}
