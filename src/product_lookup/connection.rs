use dotenv::dotenv;
use reqwest::Client;
use std::env;
use std::error::Error;
use std::fmt;

use super::endpoints::{ProductInfo, ProductResponse};

pub const DEFAULT_BASE_URL: &str = "https://world.openfoodfacts.org";
const BASE_URL_ENV_VAR: &str = "OFF_BASE_URL";
const USER_AGENT_ENV_VAR: &str = "APP_USER_AGENT";

#[derive(Debug)]
pub enum ProductLookupError {
    InvalidBarcode(String),
    NetworkError(reqwest::Error),
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
    ProductNotFound(String),
    NoIngredientData(String),
}

impl fmt::Display for ProductLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductLookupError::InvalidBarcode(raw) => {
                write!(f, "Invalid barcode '{}': expected 8-14 digits", raw)
            }
            ProductLookupError::NetworkError(err) => write!(f, "Network error: {}", err),
            ProductLookupError::ApiError { status, error_body } => {
                write!(f, "API error {}: {}", status, error_body)
            }
            ProductLookupError::ProductNotFound(code) => {
                write!(f, "No product found for barcode {}", code)
            }
            ProductLookupError::NoIngredientData(code) => {
                write!(f, "Product {} has no ingredient data", code)
            }
        }
    }
}

impl Error for ProductLookupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProductLookupError::NetworkError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProductLookupError {
    fn from(err: reqwest::Error) -> Self {
        ProductLookupError::NetworkError(err)
    }
}

impl ProductLookupError {
    /// The message shown to an end user when a lookup fails. Wording mirrors
    /// what the front end displays for each failure class.
    pub fn user_message(&self) -> String {
        match self {
            ProductLookupError::InvalidBarcode(_) => {
                "Invalid barcode format. Please enter 8-14 digits.".to_string()
            }
            ProductLookupError::ProductNotFound(_) => {
                "Product not found. Try scanning a different product or enter ingredients manually."
                    .to_string()
            }
            ProductLookupError::NoIngredientData(_) => {
                "Product found but no ingredient data available. Please enter ingredients manually."
                    .to_string()
            }
            ProductLookupError::NetworkError(_) | ProductLookupError::ApiError { .. } => {
                "Unable to fetch product data. Please check your internet connection or try again."
                    .to_string()
            }
        }
    }
}

/// Strip non-digits and validate the 8-14 digit barcode length.
pub fn normalize_barcode(raw: &str) -> Result<String, ProductLookupError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 8 || digits.len() > 14 {
        return Err(ProductLookupError::InvalidBarcode(raw.to_string()));
    }
    Ok(digits)
}

/// Open Food Facts API client. Base URL and User-Agent are overridable via
/// the `OFF_BASE_URL` and `APP_USER_AGENT` environment variables.
pub struct OffClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl OffClient {
    pub fn new() -> Self {
        dotenv().ok();
        let base_url =
            env::var(BASE_URL_ENV_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let user_agent = env::var(USER_AGENT_ENV_VAR)
            .unwrap_or_else(|_| format!("label_check/{}", env!("CARGO_PKG_VERSION")));
        OffClient {
            client: Client::new(),
            base_url,
            user_agent,
        }
    }

    /// Fetch a product by barcode. Invalid barcodes fail before any network
    /// traffic happens.
    pub async fn fetch_product(&self, barcode: &str) -> Result<ProductInfo, ProductLookupError> {
        let code = normalize_barcode(barcode)?;
        let url = format!("{}/api/v2/product/{}.json", self.base_url, code);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(ProductLookupError::ApiError { status, error_body });
        }

        let payload = response.json::<ProductResponse>().await?;
        if payload.status != 1 {
            return Err(ProductLookupError::ProductNotFound(code));
        }
        let product = match payload.product {
            Some(product) => product,
            None => return Err(ProductLookupError::ProductNotFound(code)),
        };

        let info = product.into_product_info();
        if info.ingredients.is_empty() {
            return Err(ProductLookupError::NoIngredientData(code));
        }
        Ok(info)
    }
}

impl Default for OffClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barcode_normalization_strips_separators() {
        assert_eq!(normalize_barcode("890-1058 001686").unwrap(), "8901058001686");
        assert_eq!(normalize_barcode("49025817").unwrap(), "49025817");
    }

    #[test]
    fn barcode_validation_rejects_bad_lengths_and_non_digits() {
        assert!(matches!(
            normalize_barcode("1234567"),
            Err(ProductLookupError::InvalidBarcode(_))
        ));
        assert!(matches!(
            normalize_barcode("123456789012345"),
            Err(ProductLookupError::InvalidBarcode(_))
        ));
        assert!(matches!(
            normalize_barcode("not-a-barcode"),
            Err(ProductLookupError::InvalidBarcode(_))
        ));
    }
}
