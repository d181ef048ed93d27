use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::debug;

use crate::{
    application::usecases::proposals::ProposalUseCase,
    domain::{
        repositories::proposals::ProposalRepository,
        value_objects::proposals::UpsertProposalModel,
    },
    infrastructure::sqlite::{
        repositories::proposals::ProposalSqlite, sqlite_connection::SqlitePoolSquad,
    },
};

pub fn routes(db_pool: Arc<SqlitePoolSquad>) -> Router {
    let proposal_repository = ProposalSqlite::new(Arc::clone(&db_pool));
    let proposal_usecase = ProposalUseCase::new(Arc::new(proposal_repository));

    routes_with(Arc::new(proposal_usecase))
}

pub fn routes_with<T>(proposal_usecase: Arc<ProposalUseCase<T>>) -> Router
where
    T: ProposalRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list::<T>).post(create::<T>))
        .route("/new", get(draft::<T>))
        .route(
            "/:proposal_id",
            get(find_by_id::<T>).put(update::<T>).delete(delete::<T>),
        )
        .route("/:proposal_id/document", get(document::<T>))
        .with_state(proposal_usecase)
}

pub async fn list<T>(State(proposal_usecase): State<Arc<ProposalUseCase<T>>>) -> impl IntoResponse
where
    T: ProposalRepository + Send + Sync + 'static,
{
    match proposal_usecase.list().await {
        Ok(proposals) => (StatusCode::OK, Json(proposals)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn draft<T>(State(proposal_usecase): State<Arc<ProposalUseCase<T>>>) -> impl IntoResponse
where
    T: ProposalRepository + Send + Sync + 'static,
{
    (StatusCode::OK, Json(proposal_usecase.draft())).into_response()
}

pub async fn find_by_id<T>(
    State(proposal_usecase): State<Arc<ProposalUseCase<T>>>,
    Path(proposal_id): Path<i64>,
) -> impl IntoResponse
where
    T: ProposalRepository + Send + Sync + 'static,
{
    match proposal_usecase.find_by_id(proposal_id).await {
        Ok(proposal) => (StatusCode::OK, Json(proposal)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn create<T>(
    State(proposal_usecase): State<Arc<ProposalUseCase<T>>>,
    Json(upsert_proposal_model): Json<UpsertProposalModel>,
) -> impl IntoResponse
where
    T: ProposalRepository + Send + Sync + 'static,
{
    debug!(company = %upsert_proposal_model.company_name, "proposals: create request received");
    match proposal_usecase.create(upsert_proposal_model).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn update<T>(
    State(proposal_usecase): State<Arc<ProposalUseCase<T>>>,
    Path(proposal_id): Path<i64>,
    Json(upsert_proposal_model): Json<UpsertProposalModel>,
) -> impl IntoResponse
where
    T: ProposalRepository + Send + Sync + 'static,
{
    match proposal_usecase
        .update(proposal_id, upsert_proposal_model)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn delete<T>(
    State(proposal_usecase): State<Arc<ProposalUseCase<T>>>,
    Path(proposal_id): Path<i64>,
) -> impl IntoResponse
where
    T: ProposalRepository + Send + Sync + 'static,
{
    match proposal_usecase.delete(proposal_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_response(),
    }
}

pub async fn document<T>(
    State(proposal_usecase): State<Arc<ProposalUseCase<T>>>,
    Path(proposal_id): Path<i64>,
) -> impl IntoResponse
where
    T: ProposalRepository + Send + Sync + 'static,
{
    match proposal_usecase.document(proposal_id).await {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::proposals::{ProposalEntity, WriteProposalEntity},
        repositories::proposals::MockProposalRepository,
    };
    use anyhow::anyhow;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, Response, header::CONTENT_TYPE},
    };
    use chrono::NaiveDate;
    use mockall::predicate::eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn router(proposal_repo: MockProposalRepository) -> Router {
        routes_with(Arc::new(ProposalUseCase::new(Arc::new(proposal_repo))))
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn proposal_body(users_count: Value) -> Value {
        json!({
            "companyName": "Acme",
            "personName": "Jo",
            "planName": "Pro",
            "date": "01 January 2024",
            "usersCount": users_count,
        })
    }

    fn stored_proposal(id: i64) -> ProposalEntity {
        ProposalEntity {
            id,
            company_name: "Acme".to_string(),
            person_name: "Jo".to_string(),
            plan_name: "Pro".to_string(),
            date: "01 January 2024".to_string(),
            amount: "₹10,000".to_string(),
            users_count: Some(5),
            annual_price_per_user: Some("₹3,000".to_string()),
            annual_discount_percent: Some("33.33%".to_string()),
            discounted_annual_pricing: Some("₹2,000 x 5".to_string()),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn create_returns_created_id() {
        let mut proposal_repo = MockProposalRepository::new();
        proposal_repo
            .expect_create()
            .withf(|entity: &WriteProposalEntity| {
                entity.users_count == Some(5) && entity.amount == "₹10,000"
            })
            .times(1)
            .returning(|_| Box::pin(async { Ok(42) }));

        let response = router(proposal_repo)
            .oneshot(json_request(Method::POST, "/", proposal_body(json!("5"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await, json!({ "id": 42 }));
    }

    #[tokio::test]
    async fn find_returns_camel_case_record() {
        let mut proposal_repo = MockProposalRepository::new();
        proposal_repo
            .expect_find_by_id()
            .with(eq(7))
            .returning(|id| {
                let proposal = stored_proposal(id);
                Box::pin(async move { Ok(Some(proposal)) })
            });

        let response = router(proposal_repo)
            .oneshot(empty_request(Method::GET, "/7"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], 7);
        assert_eq!(body["companyName"], "Acme");
        assert_eq!(body["discountedAnnualPricing"], "₹2,000 x 5");
    }

    #[tokio::test]
    async fn update_returns_no_content() {
        let mut proposal_repo = MockProposalRepository::new();
        proposal_repo
            .expect_update()
            .withf(|proposal_id: &i64, entity: &WriteProposalEntity| {
                *proposal_id == 4 && entity.users_count == Some(3)
            })
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(true) }));

        let response = router(proposal_repo)
            .oneshot(json_request(Method::PUT, "/4", proposal_body(Value::Null)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn update_missing_returns_not_found_body() {
        let mut proposal_repo = MockProposalRepository::new();
        proposal_repo
            .expect_update()
            .returning(|_, _| Box::pin(async { Ok(false) }));

        let response = router(proposal_repo)
            .oneshot(json_request(Method::PUT, "/99", proposal_body(json!(1))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "code": 404, "message": "proposal 99 not found" })
        );
    }

    #[tokio::test]
    async fn find_missing_returns_not_found_body() {
        let mut proposal_repo = MockProposalRepository::new();
        proposal_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let response = router(proposal_repo)
            .oneshot(empty_request(Method::GET, "/12/document"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], 404);
    }

    #[tokio::test]
    async fn delete_missing_still_returns_no_content() {
        let mut proposal_repo = MockProposalRepository::new();
        proposal_repo
            .expect_delete()
            .with(eq(9_999))
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        let response = router(proposal_repo)
            .oneshot(empty_request(Method::DELETE, "/9999"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn new_route_serves_draft_instead_of_lookup() {
        let mut proposal_repo = MockProposalRepository::new();
        proposal_repo.expect_find_by_id().never();

        let response = router(proposal_repo)
            .oneshot(empty_request(Method::GET, "/new"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["planName"], "Pro");
        assert_eq!(body["usersCount"], 3);
        assert_eq!(body["amount"], "₹6,000");
    }

    #[tokio::test]
    async fn storage_failure_hides_detail() {
        let mut proposal_repo = MockProposalRepository::new();
        proposal_repo
            .expect_list()
            .returning(|| Box::pin(async { Err(anyhow!("disk I/O error at /srv/data.sqlite")) }));

        let response = router(proposal_repo)
            .oneshot(empty_request(Method::GET, "/"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({ "code": 500, "message": "Internal server error" })
        );
        assert!(!body.to_string().contains("disk I/O"));
    }
}
