//! Turns extracted detail-page rows into a validated [`Liquor`] record

use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::{Address, Category, Field, Liquor};
use crate::normalize::{is_whitelisted, normalize_category, split_ingredients, translate_label};
use crate::scrapers::naver_terms::DetailPage;
use crate::traits::Geocoder;

/// Row-derived fields a complete entry carries (name through phone)
pub const EXPECTED_FIELDS: usize = 10;

/// Why a detail page did not yield a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("unmappable label \"{label}\"")]
    UnknownLabel { label: String },

    #[error("address \"{address}\" could not be geocoded: {reason}")]
    AddressNotFound { address: String, reason: String },

    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("field {field} missing")]
    MissingField { field: &'static str },
}

/// Result of parsing one detail page
#[derive(Debug, Clone, PartialEq)]
pub enum DetailOutcome {
    Accepted(Liquor),
    Rejected(Rejection),
}

impl From<Result<Liquor, Rejection>> for DetailOutcome {
    fn from(result: Result<Liquor, Rejection>) -> Self {
        match result {
            Ok(liquor) => Self::Accepted(liquor),
            Err(rejection) => Self::Rejected(rejection),
        }
    }
}

#[derive(Debug)]
enum Value {
    Text(String),
    List(Vec<String>),
    Category(Category),
    Address(Address),
}

/// Builds a record from a detail page.
///
/// Whitelisted labels are skipped. Any unknown label, failed geocode or a
/// field count other than `expected_fields` rejects the whole record.
/// Without a geocoder the address is kept as the raw profile text.
pub async fn assemble(
    page: DetailPage,
    geocoder: Option<&dyn Geocoder>,
    expected_fields: usize,
) -> DetailOutcome {
    build(page, geocoder, expected_fields).await.into()
}

async fn build(
    page: DetailPage,
    geocoder: Option<&dyn Geocoder>,
    expected_fields: usize,
) -> Result<Liquor, Rejection> {
    let mut fields = BTreeMap::new();

    for (label, content) in page.rows {
        if is_whitelisted(&label) {
            continue;
        }

        let field = translate_label(&label).ok_or_else(|| Rejection::UnknownLabel {
            label: label.clone(),
        })?;

        let value = match field {
            Field::Ingredients => Value::List(split_ingredients(&content)),
            Field::Category => Value::Category(normalize_category(&content)),
            Field::Address => Value::Address(resolve_address(content, geocoder).await?),
            _ => Value::Text(content),
        };

        fields.insert(field, value);
    }

    if fields.len() != expected_fields {
        return Err(Rejection::FieldCount {
            expected: expected_fields,
            found: fields.len(),
        });
    }

    Ok(Liquor {
        name: take_text(&mut fields, Field::Name)?,
        category: match fields.remove(&Field::Category) {
            Some(Value::Category(category)) => category,
            _ => return Err(missing(Field::Category)),
        },
        abv: take_text(&mut fields, Field::Abv)?,
        volume: take_text(&mut fields, Field::Volume)?,
        price: take_text(&mut fields, Field::Price)?,
        ingredients: match fields.remove(&Field::Ingredients) {
            Some(Value::List(items)) => items,
            _ => return Err(missing(Field::Ingredients)),
        },
        manufacturer: take_text(&mut fields, Field::Manufacturer)?,
        owner: take_text(&mut fields, Field::Owner)?,
        address: match fields.remove(&Field::Address) {
            Some(Value::Address(address)) => address,
            _ => return Err(missing(Field::Address)),
        },
        phone: take_text(&mut fields, Field::Phone)?,
        source: page.source,
        image: page.image,
    })
}

async fn resolve_address(
    address: String,
    geocoder: Option<&dyn Geocoder>,
) -> Result<Address, Rejection> {
    let Some(geocoder) = geocoder else {
        return Ok(Address::Raw(address));
    };

    match geocoder.geocode(&address).await {
        Ok(location) => Ok(Address::Geocoded(location)),
        Err(e) => Err(Rejection::AddressNotFound {
            address,
            reason: e.to_string(),
        }),
    }
}

/// Upgrades a legacy raw-string address on a loaded record.
///
/// Records that already carry a location are returned unchanged.
pub async fn regeocode(liquor: Liquor, geocoder: &dyn Geocoder) -> Result<Liquor, Rejection> {
    match liquor.address {
        Address::Geocoded(_) => Ok(liquor),
        Address::Raw(ref raw) => {
            let address = resolve_address(raw.clone(), Some(geocoder)).await?;
            Ok(Liquor { address, ..liquor })
        }
    }
}

fn take_text(fields: &mut BTreeMap<Field, Value>, field: Field) -> Result<String, Rejection> {
    match fields.remove(&field) {
        Some(Value::Text(text)) => Ok(text),
        _ => Err(missing(field)),
    }
}

const fn missing(field: Field) -> Rejection {
    Rejection::MissingField { field: field.key() }
}


#[cfg(test)]
mod tests {
    use super::test_support::TableGeocoder;
    use super::*;
    use crate::models::Location;
    use crate::scrapers::naver_terms::fixtures::full_rows;

    const ADDRESS: &str = "경기도 여주시 가남읍 금당리길 51";

    fn page(rows: &[(&str, &str)]) -> DetailPage {
        DetailPage {
            rows: rows
                .iter()
                .map(|(label, value)| ((*label).to_string(), (*value).to_string()))
                .collect(),
            source: "우리술 대백과".to_string(),
            image: String::new(),
        }
    }

    fn geocoder() -> TableGeocoder {
        TableGeocoder::with(ADDRESS, "경기", "여주시")
    }

    #[tokio::test]
    async fn accepts_ten_fields_and_skips_whitelist() {
        let geocoder = geocoder();
        let outcome = assemble(page(&full_rows()), Some(&geocoder), EXPECTED_FIELDS).await;

        let DetailOutcome::Accepted(liquor) = outcome else {
            panic!("expected acceptance, got {outcome:?}");
        };
        assert_eq!(liquor.name, "화요 25");
        assert_eq!(liquor.category, Category::Soju);
        assert_eq!(liquor.abv, "25%");
        assert_eq!(liquor.ingredients, vec!["쌀", "정제수"]);
        assert_eq!(liquor.manufacturer, "(주)화요");
        assert_eq!(
            liquor.address,
            Address::Geocoded(Location {
                lat: 37.25,
                lng: 127.5,
                province: "경기".to_string(),
                city: "여주시".to_string(),
            })
        );
        assert_eq!(liquor.source, "우리술 대백과");
        assert_eq!(liquor.image, "");
    }

    #[tokio::test]
    async fn keeps_raw_address_without_geocoder() {
        let outcome = assemble(page(&full_rows()), None, EXPECTED_FIELDS).await;

        let DetailOutcome::Accepted(liquor) = outcome else {
            panic!("expected acceptance, got {outcome:?}");
        };
        assert_eq!(liquor.address, Address::Raw(ADDRESS.to_string()));
    }

    #[tokio::test]
    async fn rejects_whole_record_on_unknown_label() {
        let mut rows = full_rows();
        rows.insert(3, ("수상내역", "2015 대한민국 우리술 품평회 대상"));

        let outcome = assemble(page(&rows), Some(&geocoder()), EXPECTED_FIELDS).await;

        assert_eq!(
            outcome,
            DetailOutcome::Rejected(Rejection::UnknownLabel {
                label: "수상내역".to_string()
            })
        );
    }

    #[tokio::test]
    async fn rejects_whole_record_when_geocoding_fails() {
        let outcome = assemble(
            page(&full_rows()),
            Some(&TableGeocoder::default()),
            EXPECTED_FIELDS,
        )
        .await;

        let DetailOutcome::Rejected(Rejection::AddressNotFound { address, .. }) = outcome else {
            panic!("expected address rejection, got {outcome:?}");
        };
        assert_eq!(address, ADDRESS);
    }

    #[tokio::test]
    async fn rejects_nine_fields() {
        let rows: Vec<_> = full_rows()
            .into_iter()
            .filter(|(label, _)| *label != "연락처")
            .collect();

        let outcome = assemble(page(&rows), Some(&geocoder()), EXPECTED_FIELDS).await;

        assert_eq!(
            outcome,
            DetailOutcome::Rejected(Rejection::FieldCount {
                expected: 10,
                found: 9
            })
        );
    }

    #[tokio::test]
    async fn rejects_more_fields_than_expected() {
        let outcome = assemble(page(&full_rows()), Some(&geocoder()), 9).await;

        assert_eq!(
            outcome,
            DetailOutcome::Rejected(Rejection::FieldCount {
                expected: 9,
                found: 10
            })
        );
    }

    #[tokio::test]
    async fn duplicate_manufacturer_labels_count_once() {
        let mut rows = full_rows();
        rows.push(("양조장", "화요 양조장"));

        let outcome = assemble(page(&rows), Some(&geocoder()), EXPECTED_FIELDS).await;

        let DetailOutcome::Accepted(liquor) = outcome else {
            panic!("expected acceptance, got {outcome:?}");
        };
        assert_eq!(liquor.manufacturer, "화요 양조장");
    }

    #[tokio::test]
    async fn unlisted_subtype_becomes_other() {
        let rows: Vec<_> = full_rows()
            .into_iter()
            .map(|(label, value)| {
                if label == "주종" {
                    (label, "전통소주명인")
                } else {
                    (label, value)
                }
            })
            .collect();

        let outcome = assemble(page(&rows), None, EXPECTED_FIELDS).await;

        let DetailOutcome::Accepted(liquor) = outcome else {
            panic!("expected acceptance, got {outcome:?}");
        };
        assert_eq!(liquor.category, Category::Other);
    }

    #[tokio::test]
    async fn regeocode_upgrades_raw_address() {
        let DetailOutcome::Accepted(legacy) =
            assemble(page(&full_rows()), None, EXPECTED_FIELDS).await
        else {
            panic!("fixture should be accepted");
        };

        let upgraded = regeocode(legacy.clone(), &geocoder()).await.unwrap();
        assert!(matches!(upgraded.address, Address::Geocoded(_)));
        assert_eq!(upgraded.name, legacy.name);

        let again = regeocode(upgraded.clone(), &TableGeocoder::default()).await.unwrap();
        assert_eq!(again, upgraded);
    }

    #[tokio::test]
    async fn regeocode_rejects_unknown_address() {
        let DetailOutcome::Accepted(legacy) =
            assemble(page(&full_rows()), None, EXPECTED_FIELDS).await
        else {
            panic!("fixture should be accepted");
        };

        let result = regeocode(legacy, &TableGeocoder::default()).await;
        assert!(matches!(result, Err(Rejection::AddressNotFound { .. })));
    }
}
