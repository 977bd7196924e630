//! Read-only product catalog with the complement and mission tables that
//! drive nudge generation.
//!
//! The catalog is validated once when it is built and never mutated after.
//! Lookups that miss return `None` or an empty collection; a dangling
//! complement or mission reference is not an error.

mod seed;

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::mission::Mission;
use crate::domain::product::{Product, ProductId, Promotion};
use crate::errors::CatalogError;

pub type ComplementMap = BTreeMap<ProductId, Vec<ProductId>>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    products: Vec<Product>,
    complements: ComplementMap,
    missions: Vec<Mission>,
}

/// On-disk shape of a catalog dataset.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
    #[serde(default)]
    complements: ComplementMap,
    #[serde(default)]
    missions: Vec<Mission>,
}

impl Catalog {
    pub fn new(
        products: Vec<Product>,
        complements: ComplementMap,
        missions: Vec<Mission>,
    ) -> Result<Self, CatalogError> {
        validate_products(&products)?;
        validate_references(&complements, &missions)?;
        Ok(Self { products, complements, missions })
    }

    /// Built-in demo dataset.
    pub fn seeded() -> Self {
        Self {
            products: seed::products(),
            complements: seed::complements(),
            missions: seed::missions(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Self::new(file.products, file.complements, file.missions)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_json(&raw)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    /// Complement ids for a product, in the order they were listed.
    pub fn complements_of(&self, product_id: &ProductId) -> &[ProductId] {
        self.complements.get(product_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// First id in `ids` that resolves to a catalog product (list order).
    pub fn first_listed(&self, ids: &[ProductId]) -> Option<&Product> {
        ids.iter().find_map(|id| self.find(id))
    }

    /// First catalog product whose id appears in `ids` (catalog order).
    pub fn first_in_catalog(&self, ids: &[ProductId]) -> Option<&Product> {
        self.products.iter().find(|product| ids.contains(&product.id))
    }

    /// Other products in the same promotion group, in catalog order.
    pub fn promo_group_siblings<'a>(
        &'a self,
        group_id: &'a str,
        exclude: &'a ProductId,
    ) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .iter()
            .filter(move |product| {
                product.promo_group() == Some(group_id) && &product.id != exclude
            })
    }

    pub fn mission_triggered_by(&self, product_id: &ProductId) -> Option<&Mission> {
        self.missions.iter().find(|mission| mission.is_triggered_by(product_id))
    }

    /// Case-insensitive substring match over name, brand and category.
    pub fn search(&self, term: &str) -> Vec<&Product> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.products
            .iter()
            .filter(|product| {
                product.name.to_lowercase().contains(&needle)
                    || product.brand.to_lowercase().contains(&needle)
                    || product.category.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|product| product.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |product| product.category.eq_ignore_ascii_case(category))
    }
}

fn validate_products(products: &[Product]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();

    for product in products {
        if product.id.as_str().trim().is_empty() {
            return Err(CatalogError::InvalidReference(
                "product ids must not be empty".to_owned(),
            ));
        }
        if !seen.insert(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id.clone()));
        }
        if product.price <= Decimal::ZERO {
            return Err(invalid(product, "price must be positive"));
        }
        if let Some(loyalty_price) = product.loyalty_price {
            if loyalty_price < Decimal::ZERO || loyalty_price >= product.price {
                return Err(invalid(product, "loyalty_price must be below price"));
            }
        }
        if let Some(Promotion::MultiBuy { threshold: Some(0), .. }) = product.promotion {
            return Err(invalid(product, "multi-buy threshold must be at least 1"));
        }
    }

    Ok(())
}

fn validate_references(
    complements: &ComplementMap,
    missions: &[Mission],
) -> Result<(), CatalogError> {
    let blank = |id: &ProductId| id.as_str().trim().is_empty();

    for (source, targets) in complements {
        if blank(source) || targets.iter().any(blank) {
            return Err(CatalogError::InvalidReference(format!(
                "complement entry `{source}` contains an empty product id"
            )));
        }
    }

    for mission in missions {
        if mission.name.trim().is_empty() {
            return Err(CatalogError::InvalidReference("mission name must not be empty".to_owned()));
        }
        if mission.triggers.iter().chain(&mission.suggestions).any(blank) {
            return Err(CatalogError::InvalidReference(format!(
                "mission `{}` contains an empty product id",
                mission.name
            )));
        }
    }

    Ok(())
}

fn invalid(product: &Product, reason: &str) -> CatalogError {
    CatalogError::InvalidProduct { product_id: product.id.clone(), reason: reason.to_owned() }
}
