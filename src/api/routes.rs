//! API Routes
//!
//! HTTP endpoint definitions mirroring the shop's REST surface:
//! catalog CRUD, payments, purchases/reports and registration.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Amount, Category, OperationContext, Product, ShopError};
use crate::error::{AppError, BaseMessage};
use crate::handlers::{
    PaymentCommand, PaymentHandler, PurchaseCommand, PurchaseHandler, PurchaseItemRequest,
    RegisterCommand, RegisterHandler,
};
use crate::messages;
use crate::store::{
    AdminTransactionRow, CategoryStore, NewCategory, NewProduct, Page, PageRequest, ProductStore,
    TransactionDetail, TransactionStore,
};

use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub order: i64,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            order: category.order,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub uz: String,
    #[serde(default)]
    pub ru: String,
    #[serde(default)]
    pub en: String,
    pub count: i64,
    /// Unit price as a string so decimal precision survives JSON.
    pub price: String,
    pub category_id: i64,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    /// Name resolved for the request locale.
    pub name: String,
    pub count: i64,
    pub price: Decimal,
    pub category_id: i64,
}

impl ProductResponse {
    fn from_product(product: Product, ctx: &OperationContext) -> Self {
        Self {
            id: product.id,
            name: product.name.localized(ctx.locale).to_string(),
            count: product.count,
            price: product.price,
            category_id: product.category_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentHistoryResponse {
    pub id: i64,
    pub amount: Decimal,
    pub entry_type: String,
    pub transaction_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequestItem {
    pub product_id: i64,
    pub count: i64,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub items: Vec<PurchaseRequestItem>,
}

#[derive(Debug, Serialize)]
pub struct UserTransactionResponse {
    pub id: i64,
    pub total_amount: Decimal,
    pub created_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub fullname: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub message: String,
    pub username: String,
    pub balance: Decimal,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Category CRUD
        .route("/category", get(all_categories).post(create_category))
        .route("/category/:id", get(get_category))
        // Product CRUD
        .route("/product", get(all_products).post(create_product))
        .route("/product/:id", get(get_product).delete(delete_product))
        // Payments
        .route("/payment/deposit/:user_id", post(deposit))
        .route("/payment/withdraw/:user_id", post(withdraw))
        .route("/payment/history/:user_id", get(payment_history))
        // Purchases and reports
        .route("/transaction/purchase/:user_id", post(purchase))
        .route("/transaction/my/:user_id", get(my_transactions))
        .route("/transaction/detail/:id", get(transaction_detail))
        .route("/transaction/admin/all", get(admin_all_transactions))
        // Registration
        .route("/auth/register", post(register))
}

// =========================================================================
// Category endpoints
// =========================================================================

async fn all_categories(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<CategoryResponse>>, AppError> {
    let store = CategoryStore::new(state.pool);
    let page = store.list(page).await?;
    Ok(Json(page.map(CategoryResponse::from)))
}

async fn create_category(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<CategoryRequest>,
) -> Result<Json<BaseMessage>, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "category name must not be blank".to_string(),
        ));
    }

    let store = CategoryStore::new(state.pool);
    store
        .create(
            NewCategory {
                name: request.name,
                description: request.description,
                order: request.order,
            },
            &context,
        )
        .await?;

    Ok(Json(BaseMessage::ok()))
}

async fn get_category(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<i64>,
) -> Result<Json<CategoryResponse>, AppError> {
    let store = CategoryStore::new(state.pool);
    let category = store.get_one(id, &context).await?;
    Ok(Json(category.into()))
}

// =========================================================================
// Product endpoints
// =========================================================================

async fn all_products(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<ProductResponse>>, AppError> {
    let store = ProductStore::new(state.pool);
    let page = store.list(page).await?;
    Ok(Json(
        page.map(|product| ProductResponse::from_product(product, &context)),
    ))
}

async fn get_product(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>, AppError> {
    let store = ProductStore::new(state.pool);
    let product = store.get_one(id, &context).await?;
    Ok(Json(ProductResponse::from_product(product, &context)))
}

async fn create_product(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<ProductRequest>,
) -> Result<Json<BaseMessage>, AppError> {
    let price: Amount = request
        .price
        .parse()
        .map_err(|e: crate::domain::AmountError| {
            AppError::domain(ShopError::invalid_amount(e.to_string()), context.locale)
        })?;

    let store = ProductStore::new(state.pool);
    store
        .create(
            NewProduct {
                name_uz: request.uz,
                name_ru: request.ru,
                name_en: request.en,
                count: request.count,
                price,
                category_id: request.category_id,
            },
            &context,
        )
        .await?;

    Ok(Json(BaseMessage::ok()))
}

async fn delete_product(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<i64>,
) -> Result<Json<BaseMessage>, AppError> {
    let store = ProductStore::new(state.pool);
    store.trash(id, &context).await?;
    Ok(Json(BaseMessage::ok()))
}

// =========================================================================
// Payment endpoints
// =========================================================================

async fn deposit(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(user_id): Path<i64>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<BaseMessage>, AppError> {
    let handler = PaymentHandler::new(state.pool, state.lock_timeout_ms);
    handler
        .deposit(user_id, PaymentCommand::new(request.amount), &context)
        .await?;
    Ok(Json(BaseMessage::ok()))
}

async fn withdraw(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(user_id): Path<i64>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<BaseMessage>, AppError> {
    let handler = PaymentHandler::new(state.pool, state.lock_timeout_ms);
    handler
        .withdraw(user_id, PaymentCommand::new(request.amount), &context)
        .await?;
    Ok(Json(BaseMessage::ok()))
}

async fn payment_history(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(user_id): Path<i64>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<PaymentHistoryResponse>>, AppError> {
    let handler = PaymentHandler::new(state.pool, state.lock_timeout_ms);
    let page = handler.history(user_id, page, &context).await?;
    Ok(Json(page.map(|entry| PaymentHistoryResponse {
        id: entry.id,
        amount: entry.amount,
        entry_type: entry.entry_type,
        transaction_date: entry.created_date,
    })))
}

// =========================================================================
// Purchase and report endpoints
// =========================================================================

async fn purchase(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(user_id): Path<i64>,
    Json(request): Json<PurchaseRequest>,
) -> Result<Json<BaseMessage>, AppError> {
    let handler = PurchaseHandler::new(state.pool, state.lock_timeout_ms);
    let command = PurchaseCommand::new(
        request
            .items
            .into_iter()
            .map(|item| PurchaseItemRequest {
                product_id: item.product_id,
                count: item.count,
            })
            .collect(),
    );
    handler.execute(user_id, command, &context).await?;
    Ok(Json(BaseMessage::ok()))
}

async fn my_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<UserTransactionResponse>>, AppError> {
    let store = TransactionStore::new(state.pool);
    let page = store.user_transactions(user_id, page).await?;
    Ok(Json(page.map(|t| UserTransactionResponse {
        id: t.id,
        total_amount: t.total_amount,
        created_date: t.created_date,
    })))
}

async fn transaction_detail(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<i64>,
) -> Result<Json<TransactionDetail>, AppError> {
    let store = TransactionStore::new(state.pool);
    let detail = store.details(id, context.locale).await?;
    Ok(Json(detail))
}

async fn admin_all_transactions(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<AdminTransactionRow>>, AppError> {
    let store = TransactionStore::new(state.pool);
    let page = store.all_transactions(page).await?;
    Ok(Json(page))
}

// =========================================================================
// Registration
// =========================================================================

async fn register(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let handler = RegisterHandler::new(state.pool);
    let result = handler
        .execute(
            RegisterCommand::new(request.fullname, request.username, request.password),
            &context,
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(RegisterResponse {
            id: result.id,
            message: messages::register_success(context.locale).to_string(),
            username: result.username,
            balance: result.balance,
        }),
    ))
}
