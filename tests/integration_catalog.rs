//! Catalog store integration tests
//!
//! Require a migrated Postgres database via DATABASE_URL; run with
//! `cargo test -- --ignored`.

use rust_decimal_macros::dec;
use std::str::FromStr;

use appshop::domain::{Amount, Locale, OperationContext, Product, ShopError};
use appshop::store::{
    CategoryStore, NewCategory, NewProduct, PageRequest, ProductStore, SoftDeleteStore, SortOrder,
    StoreError,
};
use appshop::AppError;

mod common;

fn ctx() -> OperationContext {
    OperationContext::new("admin").with_locale(Locale::Uz)
}

fn new_product(category_id: i64) -> NewProduct {
    NewProduct {
        name_uz: "Suv".to_string(),
        name_ru: String::new(),
        name_en: "Water".to_string(),
        count: 10,
        price: Amount::from_str("2.00").unwrap(),
        category_id,
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn category_order_is_assigned_as_max_plus_one() {
    let pool = common::setup_test_db().await;
    let store = CategoryStore::new(pool.clone());

    let first = store
        .create(
            NewCategory {
                name: "Drinks".to_string(),
                description: None,
                order: None,
            },
            &ctx(),
        )
        .await
        .unwrap();
    assert_eq!(first.order, 1);

    let second = store
        .create(
            NewCategory {
                name: "Bakery".to_string(),
                description: None,
                order: None,
            },
            &ctx(),
        )
        .await
        .unwrap();
    assert_eq!(second.order, 2);

    // An explicit order is kept verbatim; the next auto value continues
    // from the new maximum.
    let explicit = store
        .create(
            NewCategory {
                name: "Sweets".to_string(),
                description: Some("candy".to_string()),
                order: Some(10),
            },
            &ctx(),
        )
        .await
        .unwrap();
    assert_eq!(explicit.order, 10);

    let next = store
        .create(
            NewCategory {
                name: "Dairy".to_string(),
                description: None,
                order: None,
            },
            &ctx(),
        )
        .await
        .unwrap();
    assert_eq!(next.order, 11);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn categories_list_by_display_order() {
    let pool = common::setup_test_db().await;
    common::seed_category(&pool, "Second", 2).await;
    common::seed_category(&pool, "First", 1).await;

    let store = CategoryStore::new(pool.clone());
    let page = store.list(PageRequest::default()).await.unwrap();
    let names: Vec<&str> = page.content.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Second"]);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn missing_category_is_reported() {
    let pool = common::setup_test_db().await;
    let store = CategoryStore::new(pool.clone());

    let err = store.get_one(5555, &ctx()).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain {
            source: ShopError::CategoryNotFound(5555),
            ..
        }
    ));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn product_requires_existing_category() {
    let pool = common::setup_test_db().await;
    let store = ProductStore::new(pool.clone());

    let err = store.create(new_product(4444), &ctx()).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain {
            source: ShopError::CategoryNotFound(4444),
            ..
        }
    ));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn product_under_trashed_category_is_rejected() {
    let pool = common::setup_test_db().await;
    let category_id = common::seed_category(&pool, "Drinks", 1).await;
    sqlx::query("UPDATE categories SET deleted = TRUE WHERE id = $1")
        .bind(category_id)
        .execute(&pool)
        .await
        .unwrap();

    let store = ProductStore::new(pool.clone());
    let err = store
        .create(new_product(category_id), &ctx())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain {
            source: ShopError::CategoryNotFound(_),
            ..
        }
    ));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn trash_hides_product_everywhere_and_double_trash_fails() {
    let pool = common::setup_test_db().await;
    let category_id = common::seed_category(&pool, "Drinks", 1).await;
    let store = ProductStore::new(pool.clone());
    let product = store.create(new_product(category_id), &ctx()).await.unwrap();

    store.trash(product.id, &ctx()).await.unwrap();

    // get-one no longer sees it
    let err = store.get_one(product.id, &ctx()).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain {
            source: ShopError::ProductNotFound(_),
            ..
        }
    ));

    // listing no longer sees it
    let page = store.list(PageRequest::default()).await.unwrap();
    assert!(page.content.is_empty());
    assert_eq!(page.total_elements, 0);

    // a second trash of the same id is reported as not found
    let err = store.trash(product.id, &ctx()).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Domain {
            source: ShopError::ProductNotFound(_),
            ..
        }
    ));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn trash_list_failures_are_independent() {
    let pool = common::setup_test_db().await;
    let category_id = common::seed_category(&pool, "Drinks", 1).await;
    let first = common::seed_product(&pool, "Suv", 5, dec!(2.00), category_id).await;
    let second = common::seed_product(&pool, "Non", 5, dec!(1.50), category_id).await;

    let store: SoftDeleteStore<Product> = SoftDeleteStore::new(pool.clone());
    let results = store
        .trash_list(&[first, 9999, second], &OperationContext::new("admin"))
        .await;

    // the missing id fails, the surrounding ids are still trashed
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(StoreError::NotFound(9999))));
    assert!(results[2].is_ok());

    let remaining = store
        .list_all_not_deleted(SortOrder::IdAsc)
        .await
        .unwrap();
    assert!(remaining.is_empty());
    assert_eq!(store.count_not_deleted().await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn trash_stamps_modifier_attribution() {
    let pool = common::setup_test_db().await;
    let category_id = common::seed_category(&pool, "Drinks", 1).await;
    let product_id = common::seed_product(&pool, "Suv", 5, dec!(2.00), category_id).await;

    let store = ProductStore::new(pool.clone());
    let trashed = store
        .trash(product_id, &OperationContext::new("admin"))
        .await
        .unwrap();
    assert!(trashed.deleted);
    assert_eq!(trashed.last_modified_by.as_deref(), Some("admin"));
}
