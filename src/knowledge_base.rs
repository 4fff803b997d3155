use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Tags the classifier and aggregator key on directly. Everything else in the
// controlled vocabulary only flows through the condition profiles.
pub const TAG_AVOID_ALL: &str = "avoid_all";
pub const TAG_TRANS_FAT: &str = "trans_fat";
pub const TAG_HIGH_GLYCEMIC: &str = "high_glycemic";
pub const TAG_SATURATED_FAT: &str = "saturated_fat";
pub const TAG_SODIUM: &str = "sodium";
pub const TAG_CONTAINS_GLUTEN: &str = "contains_gluten";

const BUNDLED_KB_JSON: &str = include_str!("../data/knowledge_base.json");

/// Coarse ingredient classification. Descriptive only: nothing in the scoring
/// pipeline branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sugar,
    Fat,
    Protein,
    Carb,
    Additive,
    Fiber,
    Mineral,
    Vitamin,
    Other,
}

/// Intrinsic risk of an ingredient, independent of any user condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseRisk {
    Low,
    Medium,
    High,
}

/// How strongly a tag counts against an ingredient for a given condition.
///
/// `Watch` entries are recorded as matches but carry no direct score weight;
/// any weight they do have comes from the classifier's cross-checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Avoid,
    Limit,
    Watch,
}

/// Supported chronic health conditions. Condition strings outside this set are
/// dropped at the parsing boundary and never reach the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    Diabetes,
    #[serde(rename = "highBP")]
    HighBp,
    Obesity,
    Pcos,
    Pcod,
    Thyroid,
    Cholesterol,
    HeartDisease,
    KidneyDisease,
    LiverDisease,
    GlutenIntolerance,
    LactoseIntolerance,
}

impl Condition {
    pub const ALL: &'static [Condition] = &[
        Condition::Diabetes,
        Condition::HighBp,
        Condition::Obesity,
        Condition::Pcos,
        Condition::Pcod,
        Condition::Thyroid,
        Condition::Cholesterol,
        Condition::HeartDisease,
        Condition::KidneyDisease,
        Condition::LiverDisease,
        Condition::GlutenIntolerance,
        Condition::LactoseIntolerance,
    ];

    /// Parse a user-supplied condition id. Returns `None` for anything outside
    /// the fixed vocabulary; callers decide whether to warn, never to fail.
    pub fn parse(raw: &str) -> Option<Condition> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "diabetes" => Some(Condition::Diabetes),
            "highbp" | "high_bp" => Some(Condition::HighBp),
            "obesity" => Some(Condition::Obesity),
            "pcos" => Some(Condition::Pcos),
            "pcod" => Some(Condition::Pcod),
            "thyroid" => Some(Condition::Thyroid),
            "cholesterol" => Some(Condition::Cholesterol),
            "heartdisease" | "heart_disease" => Some(Condition::HeartDisease),
            "kidneydisease" | "kidney_disease" => Some(Condition::KidneyDisease),
            "liverdisease" | "liver_disease" => Some(Condition::LiverDisease),
            "glutenintolerance" | "gluten_intolerance" => Some(Condition::GlutenIntolerance),
            "lactoseintolerance" | "lactose_intolerance" => Some(Condition::LactoseIntolerance),
            _ => None,
        }
    }

    /// Canonical id string, matching the knowledge-base file keys.
    pub fn id(&self) -> &'static str {
        match self {
            Condition::Diabetes => "diabetes",
            Condition::HighBp => "highBP",
            Condition::Obesity => "obesity",
            Condition::Pcos => "pcos",
            Condition::Pcod => "pcod",
            Condition::Thyroid => "thyroid",
            Condition::Cholesterol => "cholesterol",
            Condition::HeartDisease => "heartDisease",
            Condition::KidneyDisease => "kidneyDisease",
            Condition::LiverDisease => "liverDisease",
            Condition::GlutenIntolerance => "glutenIntolerance",
            Condition::LactoseIntolerance => "lactoseIntolerance",
        }
    }

    /// Human-readable display name for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Diabetes => "Diabetes",
            Condition::HighBp => "High Blood Pressure",
            Condition::Obesity => "Obesity",
            Condition::Pcos => "PCOS",
            Condition::Pcod => "PCOD",
            Condition::Thyroid => "Thyroid",
            Condition::Cholesterol => "Cholesterol",
            Condition::HeartDisease => "Heart Disease",
            Condition::KidneyDisease => "Kidney Disease",
            Condition::LiverDisease => "Liver Disease",
            Condition::GlutenIntolerance => "Gluten Intolerance",
            Condition::LactoseIntolerance => "Lactose Intolerance",
        }
    }
}

/// One tag considered relevant for a condition, with its explicit severity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRelevance {
    pub tag: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DietSuggestions {
    pub include: Vec<String>,
    pub avoid: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionProfile {
    pub relevant_tags: Vec<TagRelevance>,
    pub diet: DietSuggestions,
}

/// One curated knowledge-base entry for a canonical ingredient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientRecord {
    pub name: String,
    pub aliases: Vec<String>,
    pub tags: Vec<String>,
    pub category: Category,
    pub risk_level: BaseRisk,
    pub description: String,
}

impl IngredientRecord {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Deserialize)]
struct KnowledgeBaseFile {
    ingredients: Vec<IngredientRecord>,
    conditions: HashMap<Condition, ConditionProfile>,
    tag_descriptions: HashMap<String, String>,
}

/// Normalize an ingredient string for lookup: lowercase, strip everything
/// outside `[a-z0-9\s]`, collapse whitespace, trim.
pub fn normalize_name(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    for ch in raw.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch);
        } else if ch.is_whitespace() {
            cleaned.push(' ');
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The read-only ingredient knowledge base plus condition profiles.
///
/// Built once at startup and passed by reference into the analysis; record
/// iteration order is definition order, which the resolver relies on for its
/// first-plausible-match policy.
pub struct KnowledgeBase {
    records: Vec<IngredientRecord>,
    by_key: HashMap<String, usize>,
    conditions: HashMap<Condition, ConditionProfile>,
    tag_descriptions: HashMap<String, String>,
}

impl KnowledgeBase {
    /// Load the knowledge base bundled into the binary. A corrupt bundle is a
    /// build defect and fatal at startup, not a per-call concern.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_KB_JSON).context("bundled knowledge base failed to load")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: KnowledgeBaseFile =
            serde_json::from_str(json).context("knowledge base JSON is malformed")?;
        if file.ingredients.is_empty() {
            return Err(anyhow::anyhow!("knowledge base contains no ingredient records"));
        }

        let mut kb = KnowledgeBase {
            records: Vec::with_capacity(file.ingredients.len()),
            by_key: HashMap::new(),
            conditions: file.conditions,
            tag_descriptions: file.tag_descriptions,
        };
        for record in file.ingredients {
            let key = normalize_name(&record.name);
            if kb.by_key.contains_key(&key) {
                return Err(anyhow::anyhow!(
                    "duplicate canonical ingredient name '{}'",
                    record.name
                ));
            }
            let idx = kb.records.len();
            kb.by_key.insert(key, idx);
            kb.records.push(record);
        }
        Ok(kb)
    }

    /// Insert or replace a record, keyed by its normalized canonical name.
    /// Replacement keeps the original definition position so match order for
    /// everything else is unaffected.
    pub fn upsert_record(&mut self, record: IngredientRecord) {
        let key = normalize_name(&record.name);
        match self.by_key.get(&key).copied() {
            Some(idx) => self.records[idx] = record,
            None => {
                let idx = self.records.len();
                self.by_key.insert(key, idx);
                self.records.push(record);
            }
        }
    }

    /// Records in definition order.
    pub fn records(&self) -> &[IngredientRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exact lookup by normalized canonical key.
    pub fn get_exact(&self, normalized_key: &str) -> Option<&IngredientRecord> {
        self.by_key.get(normalized_key).map(|&idx| &self.records[idx])
    }

    /// Tags relevant to a condition. Unknown conditions yield an empty slice.
    pub fn relevant_tags(&self, condition: Condition) -> &[TagRelevance] {
        self.conditions
            .get(&condition)
            .map(|profile| profile.relevant_tags.as_slice())
            .unwrap_or(&[])
    }

    /// Diet suggestions registered for a condition, if any.
    pub fn diet_for(&self, condition: Condition) -> Option<&DietSuggestions> {
        self.conditions.get(&condition).map(|profile| &profile.diet)
    }

    pub fn tag_description(&self, tag: &str) -> Option<&str> {
        self.tag_descriptions.get(tag).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_knowledge_base_loads() {
        let kb = KnowledgeBase::bundled().expect("bundled KB must parse");
        assert!(kb.len() > 30);
        assert!(kb.get_exact("sugar").is_some());
        assert!(kb.get_exact("trans fat").is_some());
    }

    #[test]
    fn every_condition_has_a_profile() {
        let kb = KnowledgeBase::bundled().unwrap();
        for &condition in Condition::ALL {
            assert!(
                !kb.relevant_tags(condition).is_empty(),
                "no relevant tags for {}",
                condition.id()
            );
            assert!(
                kb.diet_for(condition).is_some(),
                "no diet suggestions for {}",
                condition.id()
            );
        }
    }

    #[test]
    fn condition_profile_tags_are_in_the_described_vocabulary() {
        // A typo'd tag in a profile would silently match nothing; catching it
        // here is the point of carrying explicit severities instead of
        // inferring them from tag-name prefixes.
        let kb = KnowledgeBase::bundled().unwrap();
        for &condition in Condition::ALL {
            for relevance in kb.relevant_tags(condition) {
                assert!(
                    kb.tag_description(&relevance.tag).is_some(),
                    "tag '{}' in {} profile has no description entry",
                    relevance.tag,
                    condition.id()
                );
            }
        }
    }

    #[test]
    fn normalize_name_strips_and_collapses() {
        assert_eq!(normalize_name("  Sugar!! "), "sugar");
        assert_eq!(normalize_name("High-Fructose   Corn Syrup"), "highfructose corn syrup");
        assert_eq!(normalize_name("E§321"), "e321");
        assert_eq!(normalize_name("***"), "");
    }

    #[test]
    fn condition_parse_round_trips_ids() {
        for &condition in Condition::ALL {
            assert_eq!(Condition::parse(condition.id()), Some(condition));
        }
        assert_eq!(Condition::parse("highbp"), Some(Condition::HighBp));
        assert_eq!(Condition::parse("gluten_intolerance"), Some(Condition::GlutenIntolerance));
        assert_eq!(Condition::parse("narcolepsy"), None);
    }

    #[test]
    fn upsert_replaces_in_place_and_appends_new() {
        let mut kb = KnowledgeBase::bundled().unwrap();
        let original_len = kb.len();
        let sugar_position = kb
            .records()
            .iter()
            .position(|r| r.name == "Sugar")
            .unwrap();

        kb.upsert_record(IngredientRecord {
            name: "Sugar".to_string(),
            aliases: vec!["jaggery".to_string()],
            tags: vec!["high_glycemic".to_string()],
            category: Category::Sugar,
            risk_level: BaseRisk::High,
            description: "replaced".to_string(),
        });
        assert_eq!(kb.len(), original_len);
        assert_eq!(kb.records()[sugar_position].description, "replaced");

        kb.upsert_record(IngredientRecord {
            name: "Chicory Root".to_string(),
            aliases: vec![],
            tags: vec!["fiber".to_string()],
            category: Category::Fiber,
            risk_level: BaseRisk::Low,
            description: "inulin-rich root".to_string(),
        });
        assert_eq!(kb.len(), original_len + 1);
        assert!(kb.get_exact("chicory root").is_some());
    }
}
