use serde::{Deserialize, Serialize};

use crate::ingredient_parser::{capitalize, parse_packaging_text};

/// Product data as consumed by the rest of the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInfo {
    pub name: String,
    pub brand: String,
    pub ingredients: Vec<String>,
    pub image_url: Option<String>,
    pub nutrition_grade: Option<String>,
    pub nova_group: Option<u8>,
}

/// Outcome of a barcode lookup. Failures carry a human-readable reason and
/// are ordinary results, never panics.
#[derive(Debug, Clone)]
pub enum LookupResult {
    Found(ProductInfo),
    NotFound { reason: String },
}

/// Wire format of the Open Food Facts v2 product endpoint, reduced to the
/// fields this application reads.
#[derive(Debug, Deserialize)]
pub struct ProductResponse {
    #[serde(default)]
    pub status: i32,
    pub product: Option<OffProduct>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OffProduct {
    pub product_name: Option<String>,
    pub product_name_en: Option<String>,
    pub brands: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<OffIngredient>,
    pub ingredients_text: Option<String>,
    pub ingredients_text_en: Option<String>,
    pub image_front_small_url: Option<String>,
    pub image_url: Option<String>,
    pub nutrition_grades: Option<String>,
    pub nova_group: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct OffIngredient {
    pub text: Option<String>,
}

impl OffProduct {
    /// Reduce the raw payload to a `ProductInfo`. The structured ingredient
    /// array is preferred; the free-text fields are a fallback for products
    /// that only carry an unparsed declaration.
    pub fn into_product_info(self) -> ProductInfo {
        let mut ingredients: Vec<String> = Vec::new();
        for entry in &self.ingredients {
            if let Some(text) = entry.text.as_deref() {
                if text.is_empty() {
                    continue;
                }
                let cleaned = capitalize(text.trim());
                if !ingredients.contains(&cleaned) {
                    ingredients.push(cleaned);
                }
            }
        }
        if ingredients.is_empty() {
            if let Some(text) = self.ingredients_text.as_deref() {
                ingredients = parse_packaging_text(text);
            }
        }
        if ingredients.is_empty() {
            if let Some(text) = self.ingredients_text_en.as_deref() {
                ingredients = parse_packaging_text(text);
            }
        }

        let name = self
            .product_name
            .or(self.product_name_en)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Unknown Product".to_string());
        let brand = self
            .brands
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| "Unknown Brand".to_string());

        ProductInfo {
            name,
            brand,
            ingredients,
            image_url: self.image_front_small_url.or(self.image_url),
            nutrition_grade: self.nutrition_grades.map(|g| g.to_uppercase()),
            nova_group: self.nova_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_ingredients_are_preferred() {
        let payload = r#"{
            "status": 1,
            "product": {
                "product_name": "Choco Biscuits",
                "brands": "Acme",
                "ingredients": [
                    {"text": "wheat flour"},
                    {"text": "sugar"},
                    {"text": "wheat flour"},
                    {"text": ""}
                ],
                "ingredients_text": "should not be used",
                "nutrition_grades": "d",
                "nova_group": 4
            }
        }"#;
        let response: ProductResponse = serde_json::from_str(payload).unwrap();
        let info = response.product.unwrap().into_product_info();
        assert_eq!(info.name, "Choco Biscuits");
        assert_eq!(info.brand, "Acme");
        assert_eq!(info.ingredients, vec!["Wheat flour", "Sugar"]);
        assert_eq!(info.nutrition_grade.as_deref(), Some("D"));
        assert_eq!(info.nova_group, Some(4));
    }

    #[test]
    fn free_text_fallback_is_parsed() {
        let payload = r#"{
            "status": 1,
            "product": {
                "product_name": "Plain Crackers",
                "ingredients_text": "wheat flour (fortified), palm oil, salt 1.2%"
            }
        }"#;
        let response: ProductResponse = serde_json::from_str(payload).unwrap();
        let info = response.product.unwrap().into_product_info();
        assert_eq!(info.ingredients, vec!["Wheat flour", "Palm oil", "Salt"]);
        assert_eq!(info.brand, "Unknown Brand");
    }

    #[test]
    fn missing_product_yields_status_only() {
        let payload = r#"{"status": 0, "status_verbose": "product not found"}"#;
        let response: ProductResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.status, 0);
        assert!(response.product.is_none());
    }
}
