//! Static product catalog backing the mock search endpoint.

use std::path::Path;

use tracing::info;

use dealbot_core::error::{DealbotError, Result};
use dealbot_core::types::Product;

/// Shorter query words (`a`, `i`) match almost anything.
const MIN_WORD_LENGTH: usize = 2;

fn strip_spaces(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// The products the server knows about, in serving order.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The two iPhone 13 listings served when no catalog file is configured.
    pub fn builtin() -> Self {
        Self::new(vec![
            Product {
                name: "iPhone 13 (128GB)".to_string(),
                amazon_price: "₹58,999".to_string(),
                flipkart_price: "₹59,999".to_string(),
                best_card: "HDFC Bank Credit Card".to_string(),
                category: Some("Smartphones".to_string()),
                amazon_link: Some("https://www.amazon.in/s?k=iphone+13".to_string()),
                flipkart_link: Some("https://www.flipkart.com/search?q=iphone+13".to_string()),
                image: None,
            },
            Product {
                name: "iPhone 13 (256GB)".to_string(),
                amazon_price: "₹68,999".to_string(),
                flipkart_price: "₹67,499".to_string(),
                best_card: "ICICI Bank Credit Card".to_string(),
                category: Some("Smartphones".to_string()),
                amazon_link: Some("https://www.amazon.in/s?k=iphone+13+256gb".to_string()),
                flipkart_link: Some(
                    "https://www.flipkart.com/search?q=iphone+13+256gb".to_string(),
                ),
                image: None,
            },
        ])
    }

    /// Load a catalog from a JSON file holding a product array.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DealbotError::Config(format!(
                "Failed to read catalog {}: {}",
                path.display(),
                e
            ))
        })?;
        let products: Vec<Product> = serde_json::from_str(&content)?;
        info!(path = %path.display(), count = products.len(), "Catalog loaded");
        Ok(Self::new(products))
    }

    /// The configured catalog file if there is one, else the built-in set.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::builtin()),
        }
    }

    /// Products matching any word of `query`, ignoring case.
    ///
    /// A product matches when a query word of two or more characters occurs
    /// in its name or category, or when the query with spaces removed occurs
    /// in the name with spaces removed (`iphone13`). A blank query matches
    /// everything.
    pub fn search(&self, query: &str) -> Vec<Product> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.products.clone();
        }

        let words: Vec<&str> = query
            .split_whitespace()
            .filter(|w| w.chars().count() >= MIN_WORD_LENGTH)
            .collect();
        let compact = strip_spaces(&query);

        self.products
            .iter()
            .filter(|p| {
                let name = p.name.to_lowercase();
                let category = p.category.as_deref().unwrap_or_default().to_lowercase();
                words
                    .iter()
                    .any(|w| name.contains(*w) || category.contains(*w))
                    || strip_spaces(&name).contains(&compact)
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_has_two_iphones() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.products().iter().all(|p| p.name.starts_with("iPhone 13")));
        assert!(catalog.products().iter().all(|p| p.has_amazon_price() && p.has_flipkart_price()));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.search("IPHONE 13").len(), 2);
        assert_eq!(catalog.search("256gb").len(), 1);
    }

    #[test]
    fn test_search_matches_category() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.search("smartphones").len(), 2);
    }

    #[test]
    fn test_blank_query_returns_everything() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.search("").len(), 2);
        assert_eq!(catalog.search("   ").len(), 2);
    }

    #[test]
    fn test_natural_phrasing_matches_per_word() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.search("Find best deal for iPhone 13").len(), 2);
        assert_eq!(catalog.search("best price iPhone 13").len(), 2);
    }

    #[test]
    fn test_query_without_spaces_matches_compact_name() {
        assert_eq!(Catalog::builtin().search("iphone13").len(), 2);
        assert_eq!(Catalog::builtin().search("IPHONE13(256GB)").len(), 1);
    }

    #[test]
    fn test_single_letter_words_are_ignored() {
        assert!(Catalog::builtin().search("a i x").is_empty());
    }

    #[test]
    fn test_no_match() {
        assert!(Catalog::builtin().search("pixel").is_empty());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name":"Galaxy S23","amazonPrice":"₹74,999","flipkartPrice":"","bestCard":"SBI"}}]"#
        )
        .unwrap();

        let catalog = Catalog::load(Some(file.path())).unwrap();
        assert_eq!(catalog.len(), 1);
        let hit = &catalog.search("galaxy")[0];
        assert_eq!(hit.amazon_price, "₹74,999");
        assert!(!hit.has_flipkart_price());
    }

    #[test]
    fn test_from_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, DealbotError::Config(_)));
    }

    #[test]
    fn test_from_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"results": []}}"#).unwrap();
        assert!(Catalog::from_file(file.path()).is_err());
    }
}
