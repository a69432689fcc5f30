//! Cleaning rules for text pulled out of encyclopedia profile tables

use crate::models::{Category, Field};

/// Source labels mapped onto canonical fields. Two labels name the maker.
pub const FIELD_TABLE: &[(&str, Field)] = &[
    ("상품명", Field::Name),
    ("주종", Field::Category),
    ("도수", Field::Abv),
    ("용량", Field::Volume),
    ("가격", Field::Price),
    ("원재료", Field::Ingredients),
    ("제조사", Field::Manufacturer),
    ("양조장", Field::Manufacturer),
    ("대표자명", Field::Owner),
    ("주소", Field::Address),
    ("연락처", Field::Phone),
];

/// Labels present on the page but never stored (homepage, online store)
pub const WHITELIST: &[&str] = &["홈페이지", "온라인스토어"];

/// Raw subtype strings grouped by the class they collapse into
pub const CATEGORY_TABLE: &[(Category, &[&str])] = &[
    (
        Category::Takju,
        &["탁주", "생탁주", "살균탁주", "전통 수제 탁주", "생막걸리"],
    ),
    (Category::Yakju, &["청주", "살균약주", "약주(생약주)", "약주"]),
    (Category::Soju, &["증류주", "소주", "일반증류주", "증류식소주"]),
    (Category::FruitWine, &["과실주(포도)", "과실주"]),
    (Category::Liqueur, &["리큐르"]),
];

/// Drops newlines, then collapses every whitespace run to a single space.
pub fn normalize_string(text: &str) -> String {
    text.replace('\n', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical field for a source label, `None` when the label is unknown.
pub fn translate_label(label: &str) -> Option<Field> {
    FIELD_TABLE
        .iter()
        .find(|(source, _)| *source == label)
        .map(|(_, field)| *field)
}

pub fn is_whitelisted(label: &str) -> bool {
    WHITELIST.contains(&label)
}

/// Collapses a subtype string into its class; unknown strings become [`Category::Other`].
pub fn normalize_category(raw: &str) -> Category {
    CATEGORY_TABLE
        .iter()
        .find(|(_, members)| members.contains(&raw))
        .map_or(Category::Other, |(category, _)| *category)
}

/// Splits an ingredient cell on the `, ` separator used by the site.
pub fn split_ingredients(content: &str) -> Vec<String> {
    content.split(", ").map(str::to_string).collect()
}
