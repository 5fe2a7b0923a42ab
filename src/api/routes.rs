//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::domain::{DomainError, OperationContext, OperationType, Statement, User};
use crate::error::AppError;
use crate::handlers::{
    AuthenticateUserCommand, AuthenticateUserHandler, CreateUserCommand, CreateUserHandler,
    ShowUserProfileHandler, StatementService,
};
use crate::ledger::StatementRepository;
use crate::users::UserRepository;

use super::middleware::{auth_middleware, logging_middleware, AuthenticatedUser};
use super::state::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: SessionUser,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Body of deposit and withdraw requests. `amount` accepts a JSON number or
/// a decimal string.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatementRequest {
    pub description: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct StatementResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Statement> for StatementResponse {
    fn from(statement: Statement) -> Self {
        Self {
            id: statement.id,
            user_id: statement.user_id,
            operation_type: statement.operation_type,
            amount: statement.amount.value(),
            description: statement.description,
            created_at: statement.created_at,
            updated_at: statement.updated_at,
        }
    }
}

/// Statement as listed in a balance response (owner omitted)
#[derive(Debug, Serialize)]
pub struct BalanceEntry {
    pub id: Uuid,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Statement> for BalanceEntry {
    fn from(statement: Statement) -> Self {
        Self {
            id: statement.id,
            amount: statement.amount.value(),
            description: statement.description,
            operation_type: statement.operation_type,
            created_at: statement.created_at,
            updated_at: statement.updated_at,
        }
    }
}

/// Balance listing. Amounts and the balance are rendered as JSON numbers
/// (`f64`), which stay exact to the cent up to about 1e14; larger balances
/// lose cents in the response but not in the ledger.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub statement: Vec<BalanceEntry>,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

// =========================================================================
// API Router
// =========================================================================

/// Build the full application router, including health check, `/api/v1`
/// prefix and middleware.
pub fn create_router<L, U>(state: AppState<L, U>) -> Router
where
    L: StatementRepository,
    U: UserRepository,
{
    // Note: layers run outermost-first in reverse order of addition
    let protected_routes = Router::new()
        .route("/profile", get(show_profile::<L, U>))
        .route("/statements/balance", get(get_balance::<L, U>))
        .route("/statements/deposit", post(create_deposit::<L, U>))
        .route("/statements/withdraw", post(create_withdraw::<L, U>))
        .route("/statements/:statement_id", get(get_statement::<L, U>))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/users", post(create_user::<L, U>))
        .route("/sessions", post(create_session::<L, U>));

    let api_routes = public_routes
        .merge(protected_routes)
        .layer(middleware::from_fn(logging_middleware));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// =========================================================================
// POST /users
// =========================================================================

async fn create_user<L, U>(
    State(state): State<AppState<L, U>>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<StatusCode, AppError>
where
    L: StatementRepository,
    U: UserRepository,
{
    let Json(request) = payload?;

    let handler = CreateUserHandler::new(state.users);

    handler
        .execute(CreateUserCommand::new(request.name, request.email, request.password))
        .await?;

    Ok(StatusCode::CREATED)
}

// =========================================================================
// POST /sessions
// =========================================================================

async fn create_session<L, U>(
    State(state): State<AppState<L, U>>,
    payload: Result<Json<SessionRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError>
where
    L: StatementRepository,
    U: UserRepository,
{
    let Json(request) = payload?;

    let handler = AuthenticateUserHandler::new(state.users, state.tokens);

    let result = handler
        .execute(AuthenticateUserCommand::new(request.email, request.password))
        .await?;

    Ok(Json(SessionResponse {
        user: SessionUser {
            id: result.user.id,
            name: result.user.name,
            email: result.user.email,
        },
        token: result.token,
    }))
}

// =========================================================================
// GET /profile
// =========================================================================

async fn show_profile<L, U>(
    State(state): State<AppState<L, U>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ProfileResponse>, AppError>
where
    L: StatementRepository,
    U: UserRepository,
{
    let profile = ShowUserProfileHandler::new(state.users)
        .execute(user.user_id)
        .await?;

    Ok(Json(profile.into()))
}

// =========================================================================
// POST /statements/deposit, POST /statements/withdraw
// =========================================================================

async fn create_deposit<L, U>(
    State(state): State<AppState<L, U>>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(mut context): Extension<OperationContext>,
    payload: Result<Json<StatementRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StatementResponse>), AppError>
where
    L: StatementRepository,
    U: UserRepository,
{
    let Json(request) = payload?;

    let service = StatementService::new(state.ledger, state.users);

    let statement = service
        .create_deposit(user.user_id, request.amount, &request.description)
        .await?;

    tracing::debug!(correlation_id = %context.ensure_correlation_id(), statement_id = %statement.id, "Deposit accepted");

    Ok((StatusCode::CREATED, Json(statement.into())))
}

async fn create_withdraw<L, U>(
    State(state): State<AppState<L, U>>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(mut context): Extension<OperationContext>,
    payload: Result<Json<StatementRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StatementResponse>), AppError>
where
    L: StatementRepository,
    U: UserRepository,
{
    let Json(request) = payload?;

    let service = StatementService::new(state.ledger, state.users);

    let statement = service
        .create_withdraw(user.user_id, request.amount, &request.description)
        .await?;

    tracing::debug!(correlation_id = %context.ensure_correlation_id(), statement_id = %statement.id, "Withdrawal accepted");

    Ok((StatusCode::CREATED, Json(statement.into())))
}

// =========================================================================
// GET /statements/balance
// =========================================================================

async fn get_balance<L, U>(
    State(state): State<AppState<L, U>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<BalanceResponse>, AppError>
where
    L: StatementRepository,
    U: UserRepository,
{
    let service = StatementService::new(state.ledger, state.users);

    let (balance, statements) = service.get_balance(user.user_id).await?;

    Ok(Json(BalanceResponse {
        statement: statements.into_iter().map(BalanceEntry::from).collect(),
        balance: balance.value(),
    }))
}

// =========================================================================
// GET /statements/:statement_id
// =========================================================================

async fn get_statement<L, U>(
    State(state): State<AppState<L, U>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(statement_id): Path<String>,
) -> Result<Json<StatementResponse>, AppError>
where
    L: StatementRepository,
    U: UserRepository,
{
    // A malformed id cannot name any statement
    let statement_id = Uuid::parse_str(&statement_id).map_err(|_| DomainError::StatementNotFound)?;

    let service = StatementService::new(state.ledger, state.users);
    let statement = service.get_statement(user.user_id, statement_id).await?;

    Ok(Json(statement.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amount, NewStatement};
    use rust_decimal_macros::dec;

    #[test]
    fn test_statement_request_accepts_number_and_string() {
        let from_number: StatementRequest =
            serde_json::from_str(r#"{"description": "deposit of 300", "amount": 123.45}"#).unwrap();
        let from_string: StatementRequest =
            serde_json::from_str(r#"{"description": "deposit of 300", "amount": "123.45"}"#).unwrap();

        assert_eq!(from_number.amount, dec!(123.45));
        assert_eq!(from_string.amount, dec!(123.45));
    }

    #[test]
    fn test_statement_response_shape() {
        let statement = NewStatement::withdraw(Uuid::new_v4(), Amount::new(dec!(420.10)).unwrap(), "rent")
            .into_statement(Uuid::new_v4(), Utc::now());

        let json = serde_json::to_value(StatementResponse::from(statement)).unwrap();

        assert_eq!(json["type"], "withdraw");
        assert_eq!(json["amount"], 420.1);
        assert!(json.get("user_id").is_some());
    }

    #[test]
    fn test_balance_response_exact_at_amount_limit() {
        let response = BalanceResponse {
            statement: vec![],
            balance: dec!(999999999999.99),
        };

        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["balance"].to_string(), "999999999999.99");
    }

    #[test]
    fn test_balance_response_renders_numbers() {
        let response = BalanceResponse {
            statement: vec![],
            balance: dec!(530.25),
        };

        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["balance"], 530.25);
        assert_eq!(json["statement"].as_array().unwrap().len(), 0);
    }
}
