use time::macros::datetime;

use super::*;
use crate::test_helpers::{MockApi, la_caleta, table};

fn restaurant(id: i64, name: &str, cuisine: Option<&str>, category: Option<&str>) -> Restaurant {
    Restaurant {
        id,
        name: name.into(),
        cuisine: cuisine.map(Into::into),
        category: category.map(Into::into),
        tables: Vec::new(),
        ..la_caleta()
    }
}

fn catalog() -> Vec<Restaurant> {
    vec![
        restaurant(1, "La Caleta", Some("Marinos y Pescados"), None),
        restaurant(2, "El Puerto", Some("Criolla"), Some("Marinos y Pescados")),
        restaurant(3, "Pizzería Ilo", Some("Italiana"), None),
        restaurant(4, "Sin Cocina", None, None),
    ]
}

fn ids(found: &[&Restaurant]) -> Vec<i64> {
    found.iter().map(|r| r.id).collect()
}

// =============================================================
// Filtering
// =============================================================

#[test]
fn all_category_with_empty_query_matches_everything() {
    let list = catalog();
    assert_eq!(ids(&filter_restaurants(&list, "", ALL_CATEGORIES)), vec![1, 2, 3, 4]);
}

#[test]
fn text_matches_name_or_cuisine_case_insensitively() {
    let list = catalog();
    assert_eq!(ids(&filter_restaurants(&list, "CALETA", ALL_CATEGORIES)), vec![1]);
    assert_eq!(ids(&filter_restaurants(&list, "italiana", ALL_CATEGORIES)), vec![3]);
    assert!(filter_restaurants(&list, "sushi", ALL_CATEGORIES).is_empty());
}

#[test]
fn category_matches_cuisine_or_category_exactly() {
    let list = catalog();
    assert_eq!(ids(&filter_restaurants(&list, "", "Marinos y Pescados")), vec![1, 2]);
    assert!(filter_restaurants(&list, "", "marinos y pescados").is_empty());
}

#[test]
fn text_and_category_combine() {
    let list = catalog();
    assert_eq!(ids(&filter_restaurants(&list, "puerto", "Marinos y Pescados")), vec![2]);
    assert!(filter_restaurants(&list, "pizz", "Marinos y Pescados").is_empty());
}

// =============================================================
// Express slots
// =============================================================

#[test]
fn now_rounds_to_half_past() {
    assert_eq!(
        express_slot(datetime!(2024-06-01 13:10), ExpressWindow::Now),
        ("2024-06-01".into(), "13:30".into())
    );
}

#[test]
fn now_rounds_to_next_hour_with_padding() {
    assert_eq!(
        express_slot(datetime!(2024-06-01 08:45), ExpressWindow::Now),
        ("2024-06-01".into(), "09:00".into())
    );
    assert_eq!(
        express_slot(datetime!(2024-06-01 09:30), ExpressWindow::Now),
        ("2024-06-01".into(), "10:00".into())
    );
}

#[test]
fn now_rolls_over_midnight() {
    assert_eq!(
        express_slot(datetime!(2024-06-30 23:40), ExpressWindow::Now),
        ("2024-07-01".into(), "00:00".into())
    );
}

#[test]
fn tonight_is_eight_pm_today() {
    assert_eq!(
        express_slot(datetime!(2024-06-01 23:40), ExpressWindow::Tonight),
        ("2024-06-01".into(), "20:00".into())
    );
}

// =============================================================
// Express search
// =============================================================

#[tokio::test]
async fn express_search_sends_computed_slot() {
    let hit = ExpressMatch {
        id: 1,
        name: "La Caleta".into(),
        cuisine: None,
        rating: Some(4.7),
        image: None,
        available_table: table(7, "A3", 4),
    };
    let api = MockApi::default().with_express(vec![hit.clone()]);

    let found = express_search(&api, ExpressWindow::Now, 2, datetime!(2024-06-01 19:05)).await.unwrap();

    assert_eq!(found, vec![hit]);
    assert_eq!(
        *api.express_queries.lock().unwrap(),
        vec![("2024-06-01".to_owned(), "19:30".to_owned(), 2)]
    );
}

#[tokio::test]
async fn express_search_rejects_zero_guests() {
    let api = MockApi::default();
    let err = express_search(&api, ExpressWindow::Tonight, 0, datetime!(2024-06-01 19:05)).await.unwrap_err();
    assert!(matches!(err, BookingError::Validation(_)));
    assert!(api.express_queries.lock().unwrap().is_empty());
}
