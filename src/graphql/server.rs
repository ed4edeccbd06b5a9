use std::net::SocketAddr;

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use tower_http::trace::TraceLayer;

use super::context::RequestContext;
use super::schema::RosterSchema;
use crate::error::Result;

pub const GRAPHQL_PATH: &str = "/graphql";

/// Routes: GraphiQL on GET, GraphQL over HTTP on POST, at both `/` and `/graphql`.
pub fn router(schema: RosterSchema) -> Router {
    Router::new()
        .route("/", get(graphiql).post(graphql_handler))
        .route(GRAPHQL_PATH, get(graphiql).post(graphql_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(schema)
}

pub async fn run_server(schema: RosterSchema, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "GraphQL server listening");

    axum::serve(listener, router(schema))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("GraphQL server stopped");
    Ok(())
}

async fn graphql_handler(
    State(schema): State<RosterSchema>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let context = request_context(&headers);
    tracing::debug!(request_id = %context.request_id, "Executing GraphQL request");

    schema.execute(req.into_inner().data(context)).await.into()
}

/// Per-request context for an HTTP request; a non-UTF-8 User-Agent is dropped.
fn request_context(headers: &HeaderMap) -> RequestContext {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    RequestContext::http(user_agent)
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::{RequestOrigin, build_schema};
    use crate::model::CompanyFields;
    use crate::storage::{Database, IdGenerator};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    fn test_router() -> (Router, Database) {
        let db = Database::in_memory(IdGenerator::default());
        (router(build_schema(db.clone())), db)
    }

    fn post_graphql(uri: &str, query: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, "roster-tests/1.0")
            .body(Body::from(json!({ "query": query }).to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_post_runs_query_on_both_paths() {
        let (app, db) = test_router();
        db.companies
            .create(CompanyFields::new("Acme", "Go"))
            .await
            .unwrap();

        for uri in ["/", GRAPHQL_PATH] {
            let response = app
                .clone()
                .oneshot(post_graphql(uri, "{ companies { name slogan } }"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                body_json(response).await,
                json!({ "data": { "companies": [{ "name": "Acme", "slogan": "Go" }] } })
            );
        }
    }

    #[tokio::test]
    async fn test_post_mutation_is_visible_to_later_requests() {
        let (app, _db) = test_router();

        let response = app
            .clone()
            .oneshot(post_graphql(
                GRAPHQL_PATH,
                r#"mutation { createCompany(name: "Globex", slogan: "Up") { name } }"#,
            ))
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await,
            json!({ "data": { "createCompany": { "name": "Globex" } } })
        );

        let response = app
            .oneshot(post_graphql(GRAPHQL_PATH, "{ companies { name } }"))
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await,
            json!({ "data": { "companies": [{ "name": "Globex" }] } })
        );
    }

    #[tokio::test]
    async fn test_post_reports_error_codes() {
        let (app, _db) = test_router();

        let response = app
            .oneshot(post_graphql(GRAPHQL_PATH, r#"{ user(id: "missing") { _id } }"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["extensions"]["code"], "NOT_FOUND");
        assert_eq!(
            body["errors"][0]["message"],
            "Can't find the user with id (missing)"
        );
    }

    #[tokio::test]
    async fn test_users_over_http() {
        let (app, _db) = test_router();

        let response = app
            .oneshot(post_graphql(GRAPHQL_PATH, "{ users { _id } }"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await, json!({ "data": { "users": [] } }));
    }

    #[tokio::test]
    async fn test_get_serves_graphiql() {
        let (app, _db) = test_router();

        for uri in ["/", GRAPHQL_PATH] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let html = String::from_utf8(bytes.to_vec()).unwrap();
            assert!(html.contains("graphiql"), "not a GraphiQL page");
            assert!(html.contains(GRAPHQL_PATH));
        }
    }

    #[test]
    fn test_request_context_reads_user_agent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, "curl/8.0".parse().unwrap());

        let context = request_context(&headers);
        assert_eq!(context.origin, RequestOrigin::Http);
        assert_eq!(context.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(context.request_id.len(), 12);
    }

    #[test]
    fn test_request_context_without_user_agent() {
        let context = request_context(&HeaderMap::new());
        assert_eq!(context.origin, RequestOrigin::Http);
        assert_eq!(context.user_agent, None);
    }

    #[test]
    fn test_request_ids_differ_per_request() {
        let headers = HeaderMap::new();
        assert_ne!(
            request_context(&headers).request_id,
            request_context(&headers).request_id
        );
    }
}
