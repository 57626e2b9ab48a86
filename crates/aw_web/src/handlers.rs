use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::ServerState;
use aw_core::{
    ArticleChanges, ArticleId, ArticleResponse, ArticlesResponse, Credentials, LoginResponse,
    MessageResponse, NewArticle,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::info;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::unprocessable(rejection.body_text()))
}

pub async fn login(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let credentials = body(payload)?;
    let token = state.login(&credentials).await?;
    info!("🔑 {} logged in", credentials.username.trim());
    Ok(Json(LoginResponse {
        token,
        message: format!("Welcome back, {}!", credentials.username.trim()),
    }))
}

pub async fn list_articles(
    State(state): State<Arc<ServerState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> Json<ArticlesResponse> {
    Json(ArticlesResponse {
        articles: state.list().await,
        message: format!("Here are your articles, {}!", user),
    })
}

pub async fn create_article(
    State(state): State<Arc<ServerState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    payload: Result<Json<NewArticle>, JsonRejection>,
) -> Result<(StatusCode, Json<ArticleResponse>), ApiError> {
    let article = state.create(body(payload)?).await?;
    info!("🆕 {} created article {}", user, article.article_id);
    Ok((
        StatusCode::CREATED,
        Json(ArticleResponse {
            article,
            message: format!("Well done, {}. Great article!", user),
        }),
    ))
}

pub async fn update_article(
    State(state): State<Arc<ServerState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<ArticleId>,
    payload: Result<Json<ArticleChanges>, JsonRejection>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let article = state.update(id, &body(payload)?).await?;
    info!("📝 {} updated article {}", user, id);
    Ok(Json(ArticleResponse {
        article,
        message: format!("Nice update, {}!", user),
    }))
}

pub async fn delete_article(
    State(state): State<Arc<ServerState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<ArticleId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.delete(id).await?;
    info!("🗑️ {} deleted article {}", user, id);
    Ok(Json(MessageResponse::new(format!(
        "Article {} was deleted, {}!",
        id, user
    ))))
}

#[cfg(test)]
mod tests {
    use crate::{create_app, ServerConfig, ServerState};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", token);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn login(app: &Router) -> String {
        let (status, body) = call(
            app,
            json_request("POST", "/api/login", None, json!({ "username": "foo", "password": "12345678" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Welcome back, foo!");
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_articles_require_token() {
        let app = create_app(ServerState::new(ServerConfig::default()));

        let request = Request::builder().uri("/api/articles").body(Body::empty()).unwrap();
        let (status, body) = call(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Token required");

        let request = Request::builder()
            .uri("/api/articles")
            .header("authorization", "nope")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid token");
    }

    #[tokio::test]
    async fn test_crud_flow() {
        let app = create_app(ServerState::new(ServerConfig::default()));
        let token = login(&app).await;

        let request = Request::builder()
            .uri("/api/articles")
            .header("authorization", token.as_str())
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["articles"].as_array().unwrap().len(), 3);
        assert_eq!(body["message"], "Here are your articles, foo!");

        let (status, body) = call(
            &app,
            json_request(
                "POST",
                "/api/articles",
                Some(token.as_str()),
                json!({ "title": "Hooks", "text": "Reuse logic", "topic": "React" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["article"]["article_id"], 4);

        let (status, body) = call(
            &app,
            json_request("PUT", "/api/articles/4", Some(token.as_str()), json!({ "topic": "Node" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["article"]["topic"], "Node");
        assert_eq!(body["article"]["title"], "Hooks");

        let request = Request::builder()
            .method("DELETE")
            .uri("/api/articles/4")
            .header("authorization", token.as_str())
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Article 4 was deleted, foo!");
    }

    #[tokio::test]
    async fn test_malformed_body_is_unprocessable() {
        let app = create_app(ServerState::new(ServerConfig::empty()));
        let token = login(&app).await;
        let (status, body) = call(
            &app,
            json_request("POST", "/api/articles", Some(token.as_str()), json!({ "title": "only" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["message"].as_str().is_some());
    }
}
