use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::path::Path;

use crate::knowledge_base::{BaseRisk, Category, IngredientRecord};

// Expected column headers for knowledge-base extension files.
const NAME_COL: &str = "Name";
const ALIASES_COL: &str = "Aliases";
const TAGS_COL: &str = "Tags";
const CATEGORY_COL: &str = "Category";
const RISK_COL: &str = "Risk Level";
const DESCRIPTION_COL: &str = "Description";

fn split_piped_list(s: &str) -> Vec<String> {
    s.split('|')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_category(s: &str) -> Option<Category> {
    match s.trim().to_ascii_lowercase().as_str() {
        "sugar" => Some(Category::Sugar),
        "fat" => Some(Category::Fat),
        "protein" => Some(Category::Protein),
        "carb" => Some(Category::Carb),
        "additive" => Some(Category::Additive),
        "fiber" => Some(Category::Fiber),
        "mineral" => Some(Category::Mineral),
        "vitamin" => Some(Category::Vitamin),
        "other" => Some(Category::Other),
        _ => None,
    }
}

fn parse_risk(s: &str) -> Option<BaseRisk> {
    match s.trim().to_ascii_lowercase().as_str() {
        "low" => Some(BaseRisk::Low),
        "medium" => Some(BaseRisk::Medium),
        "high" => Some(BaseRisk::High),
        _ => None,
    }
}

/// Load additional ingredient records from a CSV file, for merging into the
/// bundled knowledge base at startup. `Aliases` and `Tags` cells hold
/// `|`-separated lists. Rows with an empty name are skipped; an unknown
/// category or risk value is an error, not a silent default.
pub fn load_extension_records(csv_path: &Path) -> Result<Vec<IngredientRecord>> {
    if !csv_path.exists() {
        return Err(anyhow::anyhow!(
            "extension CSV file not found at: {:?}",
            csv_path
        ));
    }

    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open extension CSV file at {:?}", csv_path))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", name))
    };
    let name_idx = column(NAME_COL)?;
    let aliases_idx = column(ALIASES_COL)?;
    let tags_idx = column(TAGS_COL)?;
    let category_idx = column(CATEGORY_COL)?;
    let risk_idx = column(RISK_COL)?;
    let description_idx = column(DESCRIPTION_COL)?;

    let mut records = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let row =
            result.with_context(|| format!("Failed to read record at row index {}", row_index))?;

        let name = row.get(name_idx).unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }

        let category_cell = row.get(category_idx).unwrap_or("");
        let category = parse_category(category_cell).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown category '{}' for '{}' at row index {}",
                category_cell.trim(),
                name,
                row_index
            )
        })?;
        let risk_cell = row.get(risk_idx).unwrap_or("");
        let risk_level = parse_risk(risk_cell).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown risk level '{}' for '{}' at row index {}",
                risk_cell.trim(),
                name,
                row_index
            )
        })?;

        records.push(IngredientRecord {
            name: name.to_string(),
            aliases: split_piped_list(row.get(aliases_idx).unwrap_or("")),
            tags: split_piped_list(row.get(tags_idx).unwrap_or("")),
            category,
            risk_level,
            description: row.get(description_idx).unwrap_or("").trim().to_string(),
        });
    }

    if records.is_empty() {
        return Err(anyhow::anyhow!(
            "No ingredient records loaded from {:?}",
            csv_path
        ));
    }

    Ok(records)
}
