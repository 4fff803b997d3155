use anyhow::{Context, Result};
use tokio::fs;

use label_check::analysis::{analyze_ingredients, AnalysisResult, RiskLevel};
use label_check::cli::{parse_args, parse_conditions};
use label_check::data_loader::load_extension_records;
use label_check::history::HistoryStore;
use label_check::ingredient_parser::{extract_label_ingredients, parse_ingredient_list};
use label_check::knowledge_base::KnowledgeBase;
use label_check::product_lookup::{lookup_with_fallback, LookupResult, OffClient, SAMPLE_BARCODES};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok(); // Load .env for endpoint/user-agent overrides

    let args = parse_args();

    if args.sample_barcodes {
        println!("Barcodes known to resolve:");
        for sample in SAMPLE_BARCODES {
            println!("  {}  {} ({})", sample.barcode, sample.name, sample.region);
        }
        return Ok(());
    }

    if args.show_history {
        if let Some(path) = &args.history_file {
            let store = HistoryStore::new(path);
            let records = store.load()?;
            if records.is_empty() {
                println!("No saved scans in {:?}.", path);
            }
            for record in records {
                println!(
                    "#{} [{}] score {}/100 - {} ({} ingredients)",
                    record.id,
                    record.scanned_at.format("%Y-%m-%d %H:%M"),
                    record.health_score,
                    record.product_name.as_deref().unwrap_or("manual entry"),
                    record.ingredients.len()
                );
            }
        }
        return Ok(());
    }

    let mut kb = KnowledgeBase::bundled()?;
    if let Some(csv_path) = &args.extra_db {
        println!("Loading extra ingredient records from {:?}...", csv_path);
        let extra = load_extension_records(csv_path)
            .with_context(|| format!("Failed to load extra records from {:?}", csv_path))?;
        println!(" > {} extra records merged.", extra.len());
        for record in extra {
            kb.upsert_record(record);
        }
    }

    let mut product_name: Option<String> = None;
    let raw_ingredients: Vec<String> = if let Some(text) = &args.ingredients {
        parse_ingredient_list(text)
    } else if let Some(path) = &args.label_file {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read label file {:?}", path))?;
        println!("Extracting ingredients from label text...");
        extract_label_ingredients(&contents)
    } else if let Some(barcode) = &args.barcode {
        let client = OffClient::new();
        println!("Looking up barcode {}...", barcode);
        match lookup_with_fallback(&client, barcode).await {
            LookupResult::Found(product) => {
                println!(" > Found: {} ({})", product.name, product.brand);
                product_name = Some(product.name.clone());
                product.ingredients
            }
            LookupResult::NotFound { reason } => {
                println!(" > {}", reason);
                return Ok(());
            }
        }
    } else {
        anyhow::bail!("provide one of --ingredients, --label-file or --barcode");
    };

    if raw_ingredients.is_empty() {
        println!("No ingredients detected in the input.");
        return Ok(());
    }

    let conditions = parse_conditions(&args.conditions);
    let result = analyze_ingredients(&kb, &raw_ingredients, &conditions);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&kb, &result);
    }

    if let Some(path) = &args.history_file {
        let store = HistoryStore::new(path);
        let record = store.append(
            product_name,
            raw_ingredients,
            &conditions,
            result.health_score,
            &result.summary,
        )?;
        println!("\nSaved as scan #{}.", record.id);
    }

    Ok(())
}

fn print_report(kb: &KnowledgeBase, result: &AnalysisResult) {
    println!("\nHealth score: {}/100", result.health_score);
    println!("{}", result.summary);

    println!("\nIngredients:");
    for ingredient in &result.ingredients {
        let marker = match ingredient.risk_level {
            RiskLevel::Avoid => "avoid  ",
            RiskLevel::Caution => "caution",
            RiskLevel::Safe => "safe   ",
        };
        let note = if ingredient.resolved { "" } else { " (unrecognized)" };
        println!("  [{}] {}{}", marker, ingredient.display_name, note);
        for tag in &ingredient.matched_tags {
            if let Some(text) = kb.tag_description(tag) {
                println!("            - {}", text);
            }
        }
    }

    if !result.concerns.is_empty() {
        println!("\nConcerns:");
        for concern in &result.concerns {
            println!("  - {}", concern);
        }
    }
    if !result.suggestions.include.is_empty() {
        println!("\nFoods to include:");
        for item in &result.suggestions.include {
            println!("  + {}", item);
        }
    }
    if !result.suggestions.avoid.is_empty() {
        println!("\nFoods to avoid:");
        for item in &result.suggestions.avoid {
            println!("  - {}", item);
        }
    }
}
