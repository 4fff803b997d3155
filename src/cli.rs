use clap::Parser;
use std::path::PathBuf;

use crate::knowledge_base::Condition;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Ingredient list as free text, e.g. "sugar, palm oil; salt"
    #[arg(long, conflicts_with_all = ["label_file", "barcode"])]
    pub ingredients: Option<String>,

    /// Path to a text file with scanned label text (e.g. OCR output)
    #[arg(long, conflicts_with = "barcode")]
    pub label_file: Option<PathBuf>,

    /// Product barcode to look up (8-14 digits)
    #[arg(long)]
    pub barcode: Option<String>,

    /// Comma-separated health conditions, e.g. "diabetes,highBP"
    #[arg(long, value_delimiter = ',')]
    pub conditions: Vec<String>,

    /// CSV file with extra ingredient records to merge into the database
    #[arg(long)]
    pub extra_db: Option<PathBuf>,

    /// Emit the full analysis as JSON instead of a readable report
    #[arg(long)]
    pub json: bool,

    /// Append this scan to the given history file
    #[arg(long)]
    pub history_file: Option<PathBuf>,

    /// List saved scans from --history-file and exit
    #[arg(long, requires = "history_file")]
    pub show_history: bool,

    /// Print barcodes known to resolve and exit
    #[arg(long)]
    pub sample_barcodes: bool,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Map raw condition strings to the fixed vocabulary, warning about and
/// skipping anything unrecognized. Duplicates collapse to the first mention.
pub fn parse_conditions(raw: &[String]) -> Vec<Condition> {
    let mut conditions = Vec::new();
    for entry in raw {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }
        match Condition::parse(trimmed) {
            Some(condition) => {
                if !conditions.contains(&condition) {
                    conditions.push(condition);
                }
            }
            None => eprintln!("Ignoring unrecognized condition '{}'", trimmed),
        }
    }
    conditions
}
