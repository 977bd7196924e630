use rust_decimal::Decimal;
use serde::Serialize;
use smartshop_core::config::LoadOptions;
use smartshop_core::Product;

use crate::commands::{load_context, CommandResult};

#[derive(Debug, Serialize)]
pub(crate) struct ProductRow {
    product_id: String,
    name: String,
    brand: String,
    category: String,
    price: Decimal,
    loyalty_price: Option<Decimal>,
    promotion: Option<String>,
    in_stock: bool,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id.to_string(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            price: product.price,
            loyalty_price: product.loyalty_price,
            promotion: product.promotion.as_ref().map(|promo| promo.value().to_owned()),
            in_stock: product.in_stock,
        }
    }
}

#[derive(Debug, Serialize)]
struct CategoryRow {
    name: String,
    product_count: usize,
}

#[derive(Debug, Serialize)]
struct CatalogOverview {
    product_count: usize,
    mission_count: usize,
    categories: Vec<CategoryRow>,
}

#[derive(Debug, Serialize)]
struct CategoryListing {
    category: String,
    products: Vec<ProductRow>,
}

pub fn run(options: &LoadOptions, category: Option<&str>) -> CommandResult {
    let (_, catalog) = match load_context(options) {
        Ok(context) => context,
        Err(error) => return CommandResult::from_error("catalog", &error),
    };

    match category {
        Some(category) => {
            let products = catalog.in_category(category).map(ProductRow::from).collect();
            CommandResult::report(
                "catalog",
                &CategoryListing { category: category.to_owned(), products },
            )
        }
        None => {
            let categories = catalog
                .categories()
                .into_iter()
                .map(|name| CategoryRow {
                    name: name.to_owned(),
                    product_count: catalog.in_category(name).count(),
                })
                .collect();
            CommandResult::report(
                "catalog",
                &CatalogOverview {
                    product_count: catalog.len(),
                    mission_count: catalog.missions().len(),
                    categories,
                },
            )
        }
    }
}
