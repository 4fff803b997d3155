use regex::Regex;
use std::sync::LazyLock;

/// Matches the ingredient declaration section of a food label, stopping at
/// the next panel heading.
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)(?:ingredients?|composed\s+of|made\s+(?:with|from))\s*:?\s*(.+?)(?:\b(?:nutrition|allergens?|contains|warning|storage|best\s+before|manufactured|packed|net\s+weight|directions)\b|$)",
    )
    .unwrap()
});

static BRACKETED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)|\[[^\]]*\]").unwrap());

static PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?\s*%").unwrap());

static MEASURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+(?:\.\d+)?\s*(?:mg|g|ml|l|kg|oz|iu|mcg)\b").unwrap()
});

static DELIMITER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;•·|/]+").unwrap());

static LEADING_CONNECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:and|or|of|with)\s+").unwrap());

static TRAILING_CONNECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(?:and|or)$").unwrap());

static E_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:e|ins)\s?\d{3,4}[a-z]?$").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const SKIP_WORDS: &[&str] = &[
    "and", "or", "the", "with", "from", "contains", "may contain", "traces", "less than", "for",
    "as", "of", "in", "a", "an", "to", "by", "including", "such", "like", "etc", "per", "serving",
    "daily", "value", "total", "information", "product", "made",
];

/// Split manually entered ingredient text on commas, semicolons and newlines.
///
/// Tokens are trimmed; empty tokens, tokens of 100+ characters, and tokens
/// with no alphanumeric content at all (stray punctuation) are dropped. No
/// other cleanup happens here: the resolver normalizes on its own.
pub fn parse_ingredient_list(text: &str) -> Vec<String> {
    text.split([',', ';', '\n'])
        .map(str::trim)
        .filter(|token| {
            let len = token.chars().count();
            len > 0 && len < 100 && token.chars().any(|c| c.is_ascii_alphanumeric())
        })
        .map(str::to_string)
        .collect()
}

/// Extract a cleaned ingredient list from raw OCR output of a food label.
pub fn extract_label_ingredients(text: &str) -> Vec<String> {
    let repaired = repair_ocr_artifacts(text);

    let section = SECTION_RE
        .captures(&repaired)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or(repaired);

    let cleaned = clean_label_text(&section);
    tidy_tokens(DELIMITER_RE.split(&cleaned), 80)
}

/// Clean a packaging `ingredients_text` blob (the free-text field product
/// databases carry) into a list. Same tidying pass as label extraction but
/// without section location or OCR repair.
pub fn parse_packaging_text(text: &str) -> Vec<String> {
    let cleaned = clean_label_text(&text.replace(['_', '*'], " "));
    tidy_tokens(cleaned.split([',', ';']), 60)
}

/// Capitalize the first letter and lowercase the rest, the display convention
/// for ingredient names throughout.
pub(crate) fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn clean_label_text(text: &str) -> String {
    let text = BRACKETED_RE.replace_all(text, " ");
    let text = PERCENT_RE.replace_all(&text, " ");
    let text = MEASURE_RE.replace_all(&text, " ");
    text.chars()
        .filter(|c| !matches!(c, '*' | '#' | '†' | '‡' | '§' | '¶'))
        .collect()
}

/// Fix character confusions common in OCR output. Only repairs with no
/// plausible legitimate reading are applied: `vv` never occurs in ingredient
/// text, and `|`/`1` between letters is always a misread `l`. Blanket
/// rewrites like `rn`->`m` or `0`->`o` are not: they corrupt real tokens
/// such as `corn` and E-numbers.
fn repair_ocr_artifacts(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(chars.len());
    for (i, &ch) in chars.iter().enumerate() {
        let prev_letter = i > 0 && chars[i - 1].is_ascii_alphabetic();
        let next_letter = i + 1 < chars.len() && chars[i + 1].is_ascii_alphabetic();
        if (ch == '|' || ch == '1') && prev_letter && next_letter {
            out.push('l');
        } else {
            out.push(ch);
        }
    }
    out.replace("vv", "w")
}

fn tidy_tokens<'a>(tokens: impl Iterator<Item = &'a str>, max_len: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in tokens {
        let token = WHITESPACE_RE.replace_all(token.trim(), " ");
        let token = LEADING_CONNECTIVE_RE.replace(&token, "");
        let token = TRAILING_CONNECTIVE_RE.replace(&token, "");
        let token = token.trim();

        let len = token.chars().count();
        if len < 2 || len > max_len {
            continue;
        }
        if SKIP_WORDS.contains(&token.to_lowercase().as_str()) {
            continue;
        }
        let letter_count = token.chars().filter(|c| c.is_ascii_alphabetic()).count();
        if letter_count < 2 && !E_NUMBER_RE.is_match(token) {
            continue;
        }

        let cleaned = capitalize(token);
        if !out.contains(&cleaned) {
            out.push(cleaned);
        }
    }
    out
}
