use std::str::FromStr;

use super::*;
use crate::csv::parse_csv;
use crate::image_url::{INVALID_URL_PLACEHOLDER, NO_IMAGE_PLACEHOLDER};

// -----------------------------------------------------------------------
// helpers
// -----------------------------------------------------------------------

fn make_row(fields: &[(&str, &str)]) -> RawRow {
    let mut base: Vec<(&str, &str)> = vec![
        ("ID DO PRODUTO", "1"),
        ("NOME DO PRODUTO", "PC 1 - I3 8100"),
        ("DESCRIÇÃO", "I3 8100 - 4GB DE MEMÓRIA RAM - SSD DE 120GB"),
        ("VALOR", "R$ 1.000,00"),
        ("FOTO", "https://imgur.com/p8jsjyx"),
        ("CATEGORIA", "pc montado"),
        ("ESTOQUE", "2"),
    ];
    for &(key, value) in fields {
        if let Some(slot) = base.iter_mut().find(|slot| slot.0 == key) {
            slot.1 = value;
        }
    }
    base.into_iter().collect()
}

fn normalize(row: &RawRow) -> Result<ProductRecord, RowRejection> {
    FieldNormalizer::default().normalize(row)
}

// -----------------------------------------------------------------------
// price
// -----------------------------------------------------------------------

#[test]
fn price_with_currency_and_thousands_parses() {
    let product = normalize(&make_row(&[("VALOR", "R$ 1.234,56")])).unwrap();
    assert_eq!(product.price, Decimal::from_str("1234.56").unwrap());
}

#[test]
fn zero_price_is_rejected() {
    let err = normalize(&make_row(&[("VALOR", "R$ 0,00")])).unwrap_err();
    assert!(matches!(err, RowRejection::InvalidPrice { .. }));
}

#[test]
fn negative_price_is_rejected() {
    let err = normalize(&make_row(&[("VALOR", "-10,00")])).unwrap_err();
    assert!(matches!(err, RowRejection::InvalidPrice { .. }));
}

#[test]
fn unparsable_price_is_rejected_with_raw_value() {
    let err = normalize(&make_row(&[("VALOR", "sob consulta")])).unwrap_err();
    assert_eq!(
        err,
        RowRejection::InvalidPrice {
            raw: "sob consulta".to_owned()
        }
    );
}

// -----------------------------------------------------------------------
// name
// -----------------------------------------------------------------------

#[test]
fn blank_name_is_rejected() {
    let err = normalize(&make_row(&[("NOME DO PRODUTO", "  ")])).unwrap_err();
    assert_eq!(err, RowRejection::MissingName);
}

#[test]
fn blank_name_is_rejected_even_with_valid_price() {
    let err = normalize(&make_row(&[("NOME DO PRODUTO", ""), ("VALOR", "R$ 50,00")])).unwrap_err();
    assert_eq!(err, RowRejection::MissingName);
}

#[test]
fn missing_name_column_is_rejected() {
    let row: RawRow = [("VALOR", "10")].into_iter().collect();
    assert_eq!(normalize(&row).unwrap_err(), RowRejection::MissingName);
}

// -----------------------------------------------------------------------
// stock
// -----------------------------------------------------------------------

#[test]
fn stock_zero_becomes_one() {
    let product = normalize(&make_row(&[("ESTOQUE", "0")])).unwrap();
    assert_eq!(product.stock, 1);
}

#[test]
fn stock_non_numeric_becomes_one() {
    let product = normalize(&make_row(&[("ESTOQUE", "abc")])).unwrap();
    assert_eq!(product.stock, 1);
}

#[test]
fn stock_numeric_is_kept() {
    let product = normalize(&make_row(&[("ESTOQUE", "5")])).unwrap();
    assert_eq!(product.stock, 5);
}

// -----------------------------------------------------------------------
// id, category, image, description
// -----------------------------------------------------------------------

#[test]
fn sheet_id_is_kept_verbatim() {
    let product = normalize(&make_row(&[("ID DO PRODUTO", "PC-017")])).unwrap();
    assert_eq!(product.id, ProductId::Text("PC-017".to_owned()));
}

#[test]
fn numeric_sheet_id_is_a_number() {
    let product = normalize(&make_row(&[("ID DO PRODUTO", "17")])).unwrap();
    assert_eq!(product.id, ProductId::Number(17));
}

#[test]
fn blank_id_gets_synthetic_value() {
    let a = normalize(&make_row(&[("ID DO PRODUTO", "")])).unwrap();
    let b = normalize(&make_row(&[("ID DO PRODUTO", "")])).unwrap();
    assert!(a.id.is_synthetic());
    assert_ne!(a.id, b.id, "synthetic ids must be unique");
}

#[test]
fn category_is_uppercased() {
    let product = normalize(&make_row(&[("CATEGORIA", "  monitores ")])).unwrap();
    assert_eq!(product.category, "MONITORES");
}

#[test]
fn blank_category_defaults() {
    let product = normalize(&make_row(&[("CATEGORIA", "")])).unwrap();
    assert_eq!(product.category, DEFAULT_CATEGORY);
}

#[test]
fn image_share_page_is_rewritten() {
    let product = normalize(&make_row(&[])).unwrap();
    assert_eq!(product.image_url, "https://i.imgur.com/p8jsjyx.jpg");
}

#[test]
fn image_blank_gets_placeholder() {
    let product = normalize(&make_row(&[("FOTO", "")])).unwrap();
    assert_eq!(product.image_url, NO_IMAGE_PLACEHOLDER);
}

#[test]
fn image_without_scheme_gets_invalid_placeholder() {
    let product = normalize(&make_row(&[("FOTO", "pc1.jpg")])).unwrap();
    assert_eq!(product.image_url, INVALID_URL_PLACEHOLDER);
}

#[test]
fn missing_optional_columns_are_defaulted() {
    let row: RawRow = [("NOME DO PRODUTO", "Mouse"), ("VALOR", "R$ 49,90")]
        .into_iter()
        .collect();
    let product = normalize(&row).unwrap();
    assert!(product.id.is_synthetic());
    assert_eq!(product.description, "");
    assert_eq!(product.image_url, NO_IMAGE_PLACEHOLDER);
    assert_eq!(product.category, DEFAULT_CATEGORY);
    assert_eq!(product.stock, 1);
}

#[test]
fn timestamps_are_set_at_normalization() {
    let before = Utc::now();
    let product = normalize(&make_row(&[])).unwrap();
    assert!(product.created_at >= before);
    assert_eq!(product.created_at, product.updated_at);
}

#[test]
fn custom_column_map_is_honored() {
    let columns = ColumnMap {
        name: "name".to_owned(),
        price: "price".to_owned(),
        ..ColumnMap::default()
    };
    let normalizer = FieldNormalizer::new(columns, &ImageHosts::default());
    let row: RawRow = [("name", "Keyboard"), ("price", "R$ 99,00")]
        .into_iter()
        .collect();
    let product = normalizer.normalize(&row).unwrap();
    assert_eq!(product.name, "Keyboard");
    assert_eq!(product.price, Decimal::from(99));
}

// -----------------------------------------------------------------------
// normalize_all
// -----------------------------------------------------------------------

#[test]
fn normalize_all_filters_and_keeps_order() {
    let text = "\
ID DO PRODUTO,NOME DO PRODUTO,DESCRIÇÃO,VALOR,FOTO,CATEGORIA,ESTOQUE
1,PC 1,desc,\"R$ 1.000,00\",,,1
2,,desc,\"R$ 900,00\",,,1
3,PC 3,desc,\"R$ 0,00\",,,1
4,PC 4,desc,\"R$ 1.100,00\",,,0
";
    let products = FieldNormalizer::default().normalize_all(&parse_csv(text));
    let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["PC 1", "PC 4"]);
    assert_eq!(products[1].stock, 1);
}

#[test]
fn normalize_all_of_nothing_is_empty() {
    assert!(FieldNormalizer::default().normalize_all(&[]).is_empty());
}
