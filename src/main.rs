//! Installment Pricing - Virtual-POS commission and quote API

use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use installment_pricing::{compute_quotes, CommissionRate, QuoteBook};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)] pub struct AppState { pub db: sqlx::PgPool }

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let db = PgPoolOptions::new().max_connections(10).connect(&std::env::var("DATABASE_URL")?).await?;
    sqlx::migrate!("./migrations").run(&db).await?;
    let state = AppState { db };

    let app = Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "installment-pricing"})) }))
        .route("/api/v1/commission-rates", get(list_rates).post(create_rate))
        .route("/api/v1/commission-rates/:id", get(get_rate).put(update_rate).delete(delete_rate))
        .route("/api/v1/installments", get(quote_installments))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8084".to_string());
    tracing::info!("Installment pricing API listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}

// Configuration order doubles as display order: quote groups come out in the
// order the rows were created, so every fetch uses the same ordering.
async fn fetch_all_rates(db: &sqlx::PgPool) -> Result<Vec<CommissionRate>, sqlx::Error> {
    sqlx::query_as::<_, CommissionRate>("SELECT * FROM commission_rates ORDER BY created_at, id").fetch_all(db).await
}

async fn list_rates(State(s): State<AppState>) -> Result<Json<Vec<CommissionRate>>, (StatusCode, String)> {
    let rates = fetch_all_rates(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(rates))
}

async fn get_rate(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<CommissionRate>, (StatusCode, String)> {
    sqlx::query_as::<_, CommissionRate>("SELECT * FROM commission_rates WHERE id = $1").bind(id).fetch_optional(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?.map(Json).ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CommissionRateRequest {
    #[validate(length(min = 1, max = 100))]
    pub bank_name: String,
    pub card_type: Option<String>,
    #[validate(range(min = 1, max = 36))]
    pub installment_count: i32,
    pub commission_rate: String,
    pub min_amount: Option<String>,
}

async fn create_rate(State(s): State<AppState>, Json(r): Json<CommissionRateRequest>) -> Result<(StatusCode, Json<CommissionRate>), (StatusCode, String)> {
    r.validate().map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let rate = CommissionRate::new(r.bank_name, r.card_type.unwrap_or_else(|| "all".to_string()), r.installment_count, r.commission_rate, r.min_amount.unwrap_or_else(|| "0".to_string()))
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let rate = sqlx::query_as::<_, CommissionRate>("INSERT INTO commission_rates (id, bank_name, card_type, installment_count, commission_rate, min_amount, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *")
        .bind(rate.id).bind(&rate.bank_name).bind(&rate.card_type).bind(rate.installment_count).bind(&rate.commission_rate).bind(&rate.min_amount).bind(rate.created_at).bind(rate.updated_at)
        .fetch_one(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok((StatusCode::CREATED, Json(rate)))
}

async fn update_rate(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<CommissionRateRequest>) -> Result<Json<CommissionRate>, (StatusCode, String)> {
    r.validate().map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    let rate = sqlx::query_as::<_, CommissionRate>("UPDATE commission_rates SET bank_name = $2, card_type = $3, installment_count = $4, commission_rate = $5, min_amount = $6, updated_at = NOW() WHERE id = $1 RETURNING *")
        .bind(id).bind(&r.bank_name).bind(r.card_type.as_deref().unwrap_or("all")).bind(r.installment_count).bind(&r.commission_rate).bind(r.min_amount.as_deref().unwrap_or("0"))
        .fetch_optional(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?.ok_or((StatusCode::NOT_FOUND, "Not found".to_string()))?;
    Ok(Json(rate))
}

async fn delete_rate(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, (StatusCode, String)> {
    sqlx::query("DELETE FROM commission_rates WHERE id = $1").bind(id).execute(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)] pub struct QuoteParams { pub price: Option<String> }

async fn quote_installments(State(s): State<AppState>, Query(p): Query<QuoteParams>) -> Result<Json<QuoteBook>, (StatusCode, String)> {
    // A missing or garbled price is not a client error: the storefront shows
    // "no installment options" for an empty book.
    let price: Option<Decimal> = p.price.as_deref().and_then(|v| v.trim().parse().ok());
    let rates = fetch_all_rates(&s.db).await.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(compute_quotes(price, &rates)))
}
