pub mod connection;
pub mod endpoints;

pub use connection::{normalize_barcode, OffClient, ProductLookupError, DEFAULT_BASE_URL};
pub use endpoints::{LookupResult, ProductInfo};

/// A barcode known to resolve, for demos and manual testing.
#[derive(Debug, Clone, Copy)]
pub struct SampleBarcode {
    pub barcode: &'static str,
    pub name: &'static str,
    pub region: &'static str,
}

pub const SAMPLE_BARCODES: &[SampleBarcode] = &[
    SampleBarcode { barcode: "5449000000996", name: "Coca-Cola", region: "Global" },
    SampleBarcode { barcode: "7622210449283", name: "Oreo Cookies", region: "Global" },
    SampleBarcode { barcode: "3017620422003", name: "Nutella", region: "Global" },
    SampleBarcode { barcode: "8901058001686", name: "Maggi Noodles", region: "India" },
    SampleBarcode { barcode: "8901725133771", name: "Parle-G Biscuits", region: "India" },
    SampleBarcode { barcode: "8901063092037", name: "Good Day Cookies", region: "India" },
    SampleBarcode { barcode: "8902080701780", name: "Haldiram Bhujia", region: "India" },
    SampleBarcode { barcode: "5000159407236", name: "Cadbury Dairy Milk", region: "Global" },
    SampleBarcode { barcode: "4902430596497", name: "KitKat", region: "Global" },
    SampleBarcode { barcode: "8076809513753", name: "Barilla Pasta", region: "Global" },
];

struct FallbackProduct {
    barcode: &'static str,
    name: &'static str,
    brand: &'static str,
    ingredients: &'static [&'static str],
}

// Products common on Indian shelves but patchy in the public database.
const FALLBACK_PRODUCTS: &[FallbackProduct] = &[
    FallbackProduct {
        barcode: "8901058001686",
        name: "Maggi 2-Minute Noodles",
        brand: "Nestlé",
        ingredients: &[
            "Wheat flour", "Palm oil", "Salt", "Sugar", "Onion powder", "Garlic", "Turmeric",
            "Flavor enhancers (E627, E631)", "Hydrolyzed vegetable protein", "Maltodextrin",
        ],
    },
    FallbackProduct {
        barcode: "8901058853124",
        name: "Maggi Masala Noodles",
        brand: "Nestlé",
        ingredients: &[
            "Wheat flour", "Edible vegetable oil", "Salt", "Wheat gluten", "Acidifying agent",
            "Thickener", "Humectant", "Garlic powder", "Onion powder", "Spices",
            "Flavor enhancers",
        ],
    },
    FallbackProduct {
        barcode: "8901725133771",
        name: "Parle-G Glucose Biscuits",
        brand: "Parle",
        ingredients: &[
            "Wheat flour", "Sugar", "Edible vegetable oil", "Invert syrup", "Milk solids",
            "Leavening agents", "Salt", "Emulsifier",
        ],
    },
    FallbackProduct {
        barcode: "8901725110017",
        name: "Parle-G Original",
        brand: "Parle",
        ingredients: &[
            "Wheat flour", "Sugar", "Edible vegetable oil", "Glucose syrup", "Milk solids",
            "Raising agents", "Salt", "Emulsifiers",
        ],
    },
    FallbackProduct {
        barcode: "8901063092037",
        name: "Britannia Good Day Cookies",
        brand: "Britannia",
        ingredients: &[
            "Wheat flour", "Sugar", "Edible vegetable oil", "Butter", "Milk solids", "Cashews",
            "Invert syrup", "Salt", "Leavening agents",
        ],
    },
    FallbackProduct {
        barcode: "8902080701780",
        name: "Haldiram Aloo Bhujia",
        brand: "Haldiram",
        ingredients: &[
            "Potato flakes", "Gram flour", "Edible vegetable oil", "Salt", "Spices",
            "Black pepper", "Asafoetida", "Citric acid",
        ],
    },
    FallbackProduct {
        barcode: "8906002420476",
        name: "Amul Butter",
        brand: "Amul",
        ingredients: &["Pasteurized cream", "Salt", "Permitted natural color"],
    },
    FallbackProduct {
        barcode: "8906002420391",
        name: "Amul Milk",
        brand: "Amul",
        ingredients: &["Toned milk", "Milk fat", "Milk solids"],
    },
];

/// Built-in product data for a barcode, if we carry it.
pub fn fallback_product(barcode: &str) -> Option<ProductInfo> {
    let digits: String = barcode.chars().filter(|c| c.is_ascii_digit()).collect();
    FALLBACK_PRODUCTS
        .iter()
        .find(|product| product.barcode == digits)
        .map(|product| ProductInfo {
            name: product.name.to_string(),
            brand: product.brand.to_string(),
            ingredients: product.ingredients.iter().map(|i| i.to_string()).collect(),
            image_url: None,
            nutrition_grade: None,
            nova_group: None,
        })
}

/// Look a barcode up, consulting the built-in fallback table before the API.
/// Every failure collapses into `NotFound` with a displayable reason; this
/// function never panics and never returns an `Err`.
pub async fn lookup_with_fallback(client: &OffClient, barcode: &str) -> LookupResult {
    if let Some(product) = fallback_product(barcode) {
        return LookupResult::Found(product);
    }
    match client.fetch_product(barcode).await {
        Ok(product) => LookupResult::Found(product),
        Err(err) => LookupResult::NotFound {
            reason: err.user_message(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_table_hits_by_digits() {
        let product = fallback_product("8901058001686").unwrap();
        assert_eq!(product.brand, "Nestlé");
        assert!(product.ingredients.iter().any(|i| i == "Palm oil"));

        // separators are tolerated
        assert!(fallback_product("890-1058-001686").is_some());
        assert!(fallback_product("0000000000000").is_none());
    }

    #[test]
    fn sample_barcodes_are_well_formed() {
        for sample in SAMPLE_BARCODES {
            assert!(
                normalize_barcode(sample.barcode).is_ok(),
                "sample barcode {} is invalid",
                sample.barcode
            );
        }
    }
}
