pub mod classifier;
pub mod narrative;
pub mod resolver;
pub mod scoring;

pub use classifier::{classify, Classification};
pub use resolver::{heuristic_risk, resolve};
pub use scoring::health_score;

use serde::{Deserialize, Serialize};

use crate::knowledge_base::{Condition, DietSuggestions, IngredientRecord, KnowledgeBase};

/// Per-ingredient output classification. Ordering is severity ordering:
/// `Safe < Caution < Avoid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Caution,
    Avoid,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Caution => "caution",
            RiskLevel::Avoid => "avoid",
        }
    }
}

/// One analyzed input ingredient. Owned by the enclosing [`AnalysisResult`];
/// built fresh on every analysis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedIngredient {
    pub display_name: String,
    pub original_text: String,
    pub resolved: bool,
    pub record: Option<IngredientRecord>,
    pub risk_level: RiskLevel,
    pub matched_tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub ingredients: Vec<AnalyzedIngredient>,
    pub health_score: u8,
    pub summary: String,
    pub concerns: Vec<String>,
    pub suggestions: DietSuggestions,
}

/// Analyze an ingredient list against a user's condition set.
///
/// Every input string always yields an `AnalyzedIngredient`: names the
/// knowledge base cannot resolve degrade to the keyword heuristic instead of
/// failing the batch. Given the same knowledge base and inputs the result is
/// deterministic.
pub fn analyze_ingredients(
    kb: &KnowledgeBase,
    raw_ingredients: &[String],
    conditions: &[Condition],
) -> AnalysisResult {
    let ingredients: Vec<AnalyzedIngredient> = raw_ingredients
        .iter()
        .map(|raw| match resolver::resolve(kb, raw) {
            Some(record) => {
                let classification =
                    classifier::classify(kb, &record.tags, record.risk_level, conditions);
                AnalyzedIngredient {
                    display_name: record.name.clone(),
                    original_text: raw.clone(),
                    resolved: true,
                    record: Some(record.clone()),
                    risk_level: classification.risk_level,
                    matched_tags: classification.matched_tags,
                }
            }
            None => AnalyzedIngredient {
                display_name: raw.clone(),
                original_text: raw.clone(),
                resolved: false,
                record: None,
                risk_level: resolver::heuristic_risk(raw),
                matched_tags: Vec::new(),
            },
        })
        .collect();

    let health_score = scoring::health_score(&ingredients);
    let (summary, concerns) = narrative::narrate(&ingredients, health_score, conditions);
    let suggestions = narrative::diet_suggestions(kb, conditions);

    AnalysisResult {
        ingredients,
        health_score,
        summary,
        concerns,
        suggestions,
    }
}
