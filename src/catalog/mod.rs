// Catalog module - the static product collection and queries over it
//
// The product list is data, not state: it is loaded once (bundled JSON or a
// configured file) and never mutated. Filtering and lookups borrow from it.
//
// Integration: ProductBrowser (browser.rs) holds the UI-local filter inputs for
// the products view; the detail view goes through Catalog::lookup.

mod browser;

pub use browser::ProductBrowser;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Category value meaning "do not narrow by category"
pub const ALL_CATEGORIES: &str = "Semua";

/// Shown instead of an empty product list
pub const EMPTY_RESULT: &str = "Produk tidak ditemukan. Coba kata kunci atau filter lain.";
/// Detail route without an id
pub const MISSING_ID: &str = "ID Produk tidak valid atau tidak ditemukan di URL.";
/// Detail route whose id is not in the collection
pub const UNKNOWN_PRODUCT: &str = "Produk tidak ditemukan.";

const BUNDLED_PRODUCTS: &str = include_str!("../../data/products.json");

/// A product as listed in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub description: String,
    /// Display string, already formatted ("Rp 1.850.000")
    pub price: String,
    pub image: String,
    pub category: String,
    /// Comma-separated feature list
    #[serde(default)]
    pub details: String,
}

impl Product {
    /// `details` split into bullet items
    pub fn detail_items(&self) -> Vec<&str> {
        self.details
            .split(", ")
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect()
    }

    /// Case-insensitive substring match on name or description
    ///
    /// `needle` must already be lowercase.
    fn mentions(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// The pair of inputs narrowing the product list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_term: String,
    pub selected_category: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            selected_category: ALL_CATEGORIES.to_string(),
        }
    }
}

impl FilterCriteria {
    pub fn new(search_term: impl Into<String>, selected_category: impl Into<String>) -> Self {
        Self {
            search_term: search_term.into(),
            selected_category: selected_category.into(),
        }
    }
}

/// Products satisfying both the category and the search predicate, in source order
pub fn filter<'a>(products: &'a [Product], criteria: &FilterCriteria) -> Vec<&'a Product> {
    let needle = criteria.search_term.to_lowercase();
    let any_category = criteria.selected_category == ALL_CATEGORIES;

    products
        .iter()
        .filter(|p| any_category || p.category == criteria.selected_category)
        .filter(|p| needle.is_empty() || p.mentions(&needle))
        .collect()
}

/// Result of resolving a detail route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductLookup<'a> {
    Found(&'a Product),
    /// The route carried no id at all
    MissingId,
    /// An id was given but nothing matches it (including non-numeric ids)
    NotFound { id: String },
}

/// Immutable product collection
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// The product list compiled into the binary
    pub fn bundled() -> Result<Self> {
        let products =
            serde_json::from_str(BUNDLED_PRODUCTS).context("Bundled product data is invalid")?;
        Ok(Self::from_products(products))
    }

    /// Load a JSON array of products from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        let products = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse catalog {}", path.display()))?;
        Ok(Self::from_products(products))
    }

    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Category choices: the "all" sentinel, then each category in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut categories = vec![ALL_CATEGORIES];
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Resolve the `:id` segment of a detail route
    pub fn lookup(&self, id: Option<&str>) -> ProductLookup<'_> {
        let Some(raw) = id.filter(|raw| !raw.is_empty()) else {
            return ProductLookup::MissingId;
        };

        raw.trim()
            .parse::<u64>()
            .ok()
            .and_then(|id| self.products.iter().find(|p| p.id == id))
            .map_or_else(
                || ProductLookup::NotFound {
                    id: raw.to_string(),
                },
                ProductLookup::Found,
            )
    }

    /// Placeholder cart action: no cart exists, the intent is only logged
    pub fn add_to_cart(&self, product: &Product) -> String {
        tracing::info!(
            product_id = product.id,
            "Produk \"{}\" ditambahkan ke keranjang.",
            product.name
        );
        format!("Menambahkan {} ke keranjang!", product.name)
    }
}
