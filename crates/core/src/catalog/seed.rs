use rust_decimal::Decimal;

use super::ComplementMap;
use crate::domain::mission::Mission;
use crate::domain::product::{Product, ProductId, Promotion, ValueBand};

#[derive(Debug, Clone, Copy)]
struct MultiBuySeed {
    value: &'static str,
    threshold: u32,
    group_id: &'static str,
}

#[derive(Debug, Clone, Copy)]
struct ProductSeed {
    id: &'static str,
    name: &'static str,
    brand: &'static str,
    category: &'static str,
    sub_category: &'static str,
    tags: &'static [&'static str],
    diet_tags: &'static [&'static str],
    price_pence: i64,
    multi_buy: Option<MultiBuySeed>,
    value_band: ValueBand,
}

const PRODUCT_SEEDS: &[ProductSeed] = &[
    ProductSeed {
        id: "prod_001",
        name: "Organic Bananas",
        brand: "Sainsburys",
        category: "Fresh Produce",
        sub_category: "Fruit",
        tags: &["organic", "fresh"],
        diet_tags: &["vegan", "gluten-free"],
        price_pence: 120,
        multi_buy: None,
        value_band: ValueBand::Mid,
    },
    ProductSeed {
        id: "prod_002",
        name: "British Apples",
        brand: "Sainsburys",
        category: "Fresh Produce",
        sub_category: "Fruit",
        tags: &["british", "fresh"],
        diet_tags: &["vegan", "gluten-free"],
        price_pence: 250,
        multi_buy: None,
        value_band: ValueBand::Mid,
    },
    ProductSeed {
        id: "prod_003",
        name: "Baby Spinach",
        brand: "Sainsburys",
        category: "Fresh Produce",
        sub_category: "Salad",
        tags: &["fresh", "leafy"],
        diet_tags: &["vegan", "gluten-free"],
        price_pence: 150,
        multi_buy: None,
        value_band: ValueBand::Mid,
    },
    ProductSeed {
        id: "prod_004",
        name: "Sourdough Bread",
        brand: "Sainsburys",
        category: "Bakery",
        sub_category: "Bread",
        tags: &["fresh", "artisan"],
        diet_tags: &[],
        price_pence: 220,
        multi_buy: None,
        value_band: ValueBand::Mid,
    },
    ProductSeed {
        id: "prod_005",
        name: "Croissants",
        brand: "Sainsburys",
        category: "Bakery",
        sub_category: "Pastries",
        tags: &["fresh", "buttery"],
        diet_tags: &[],
        price_pence: 280,
        multi_buy: Some(MultiBuySeed {
            value: "2 for £4",
            threshold: 2,
            group_id: "croissants_deal",
        }),
        value_band: ValueBand::Mid,
    },
    ProductSeed {
        id: "prod_006",
        name: "Whole Milk",
        brand: "Sainsburys",
        category: "Dairy",
        sub_category: "Milk",
        tags: &["fresh", "british"],
        diet_tags: &[],
        price_pence: 145,
        multi_buy: None,
        value_band: ValueBand::Value,
    },
    ProductSeed {
        id: "prod_007",
        name: "Mature Cheddar",
        brand: "Sainsburys",
        category: "Dairy",
        sub_category: "Cheese",
        tags: &["mature", "british"],
        diet_tags: &[],
        price_pence: 350,
        multi_buy: None,
        value_band: ValueBand::Mid,
    },
    ProductSeed {
        id: "prod_008",
        name: "Greek Yogurt",
        brand: "Sainsburys",
        category: "Dairy",
        sub_category: "Yogurt",
        tags: &["protein", "thick"],
        diet_tags: &[],
        price_pence: 200,
        multi_buy: None,
        value_band: ValueBand::Mid,
    },
    ProductSeed {
        id: "prod_009",
        name: "British Chicken Breast",
        brand: "Sainsburys",
        category: "Meat & Fish",
        sub_category: "Chicken",
        tags: &["british", "fresh", "lean"],
        diet_tags: &[],
        price_pence: 450,
        multi_buy: None,
        value_band: ValueBand::Mid,
    },
    ProductSeed {
        id: "prod_010",
        name: "Atlantic Salmon Fillet",
        brand: "Sainsburys",
        category: "Meat & Fish",
        sub_category: "Fish",
        tags: &["fresh", "omega-3"],
        diet_tags: &[],
        price_pence: 600,
        multi_buy: None,
        value_band: ValueBand::Premium,
    },
    ProductSeed {
        id: "prod_011",
        name: "Penne Pasta",
        brand: "Sainsburys",
        category: "Pantry Essentials",
        sub_category: "Pasta",
        tags: &["italian", "dried"],
        diet_tags: &[],
        price_pence: 100,
        multi_buy: Some(MultiBuySeed { value: "3 for £2", threshold: 3, group_id: "pasta_deal" }),
        value_band: ValueBand::Value,
    },
    ProductSeed {
        id: "prod_012",
        name: "Tomato Pasta Sauce",
        brand: "Dolmio",
        category: "Pantry Essentials",
        sub_category: "Sauces",
        tags: &["italian", "tomato"],
        diet_tags: &[],
        price_pence: 180,
        multi_buy: None,
        value_band: ValueBand::Mid,
    },
    ProductSeed {
        id: "prod_013",
        name: "Extra Virgin Olive Oil",
        brand: "Sainsburys",
        category: "Pantry Essentials",
        sub_category: "Oils",
        tags: &["cold-pressed", "mediterranean"],
        diet_tags: &["vegan"],
        price_pence: 420,
        multi_buy: None,
        value_band: ValueBand::Mid,
    },
    ProductSeed {
        id: "prod_014",
        name: "Basmati Rice",
        brand: "Sainsburys",
        category: "Pantry Essentials",
        sub_category: "Rice",
        tags: &["long-grain", "fragrant"],
        diet_tags: &["vegan", "gluten-free"],
        price_pence: 250,
        multi_buy: None,
        value_band: ValueBand::Mid,
    },
];

// Pasta -> sauce, chicken -> oil and spinach, bread -> cheese,
// yogurt -> apples, salmon -> rice.
const COMPLEMENT_SEEDS: &[(&str, &[&str])] = &[
    ("prod_011", &["prod_012"]),
    ("prod_009", &["prod_013", "prod_003"]),
    ("prod_004", &["prod_007"]),
    ("prod_008", &["prod_002"]),
    ("prod_010", &["prod_014"]),
];

#[derive(Debug, Clone, Copy)]
struct MissionSeed {
    name: &'static str,
    title: &'static str,
    triggers: &'static [&'static str],
    suggestions: &'static [&'static str],
}

const MISSION_SEEDS: &[MissionSeed] = &[
    MissionSeed {
        name: "Italian Night",
        title: "Complete your Italian feast",
        triggers: &["prod_011", "prod_012"],
        suggestions: &["prod_013", "prod_007"],
    },
    MissionSeed {
        name: "Healthy Breakfast",
        title: "Perfect healthy breakfast",
        triggers: &["prod_008", "prod_002"],
        suggestions: &["prod_001"],
    },
];

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

fn ids(values: &[&str]) -> Vec<ProductId> {
    values.iter().copied().map(ProductId::from).collect()
}

pub(super) fn products() -> Vec<Product> {
    PRODUCT_SEEDS
        .iter()
        .map(|seed| Product {
            id: ProductId::from(seed.id),
            name: seed.name.to_owned(),
            brand: seed.brand.to_owned(),
            category: seed.category.to_owned(),
            sub_category: seed.sub_category.to_owned(),
            tags: owned(seed.tags),
            diet_tags: owned(seed.diet_tags),
            price: Decimal::new(seed.price_pence, 2),
            loyalty_price: None,
            promotion: seed.multi_buy.map(|promo| Promotion::MultiBuy {
                value: promo.value.to_owned(),
                threshold: Some(promo.threshold),
                group_id: Some(promo.group_id.to_owned()),
            }),
            value_band: seed.value_band,
            in_stock: true,
            image_url: None,
        })
        .collect()
}

pub(super) fn complements() -> ComplementMap {
    COMPLEMENT_SEEDS
        .iter()
        .map(|(source, targets)| (ProductId::from(*source), ids(targets)))
        .collect()
}

pub(super) fn missions() -> Vec<Mission> {
    MISSION_SEEDS
        .iter()
        .map(|seed| Mission {
            name: seed.name.to_owned(),
            title: seed.title.to_owned(),
            triggers: ids(seed.triggers),
            suggestions: ids(seed.suggestions),
        })
        .collect()
}
