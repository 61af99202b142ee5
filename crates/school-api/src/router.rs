use axum::{
    handler::Handler,
    http::{header, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, MethodRouter},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{self, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::auth::{require_scope, scopes::scope, JwtManager, ScopeGuard};
use crate::database::{Admin, Course, Instructor, Resource, Sponsor, Student, User};
use crate::handlers::{
    self, admins, auth, courses, health, instructors, resource, sponsors, students, users,
};
use crate::state::AppState;
use crate::utils::ApiError;

/// The five routes every resource gets, each behind `<verb>:<collection>`:
///
/// - `GET /<collection>` and `POST /<collection>`
/// - `GET /<collection>/{id}` and `DELETE /<collection>/{id}`
/// - `PATCH|POST /<collection>/{id}/edit`
fn resource_routes<R, C, CT, E, ET>(jwt: &Arc<JwtManager>, create: C, edit: E) -> Router<AppState>
where
    R: Resource,
    C: Handler<CT, AppState>,
    CT: 'static,
    E: Handler<ET, AppState>,
    ET: 'static,
{
    let guarded = |router: MethodRouter<AppState>, verb: &str| {
        router.route_layer(middleware::from_fn_with_state(
            ScopeGuard::new(jwt.clone(), scope(verb, R::COLLECTION)),
            require_scope,
        ))
    };

    Router::new()
        .route(
            &format!("/{}", R::COLLECTION),
            guarded(get(resource::list::<R>), "get").merge(guarded(post(create), "post")),
        )
        .route(
            &format!("/{}/{{id}}", R::COLLECTION),
            guarded(get(resource::show::<R>), "get")
                .merge(guarded(delete(resource::remove::<R>), "delete")),
        )
        .route(
            &format!("/{}/{{id}}/edit", R::COLLECTION),
            guarded(patch(edit.clone()).post(edit), "patch"),
        )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}

pub fn build_router(state: AppState) -> Router {
    let jwt = state.jwt.clone();

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/login", post(auth::login));

    Router::new()
        .merge(public_routes)
        .merge(resource_routes::<User, _, _, _, _>(
            &jwt,
            users::create_user,
            users::edit_user,
        ))
        .merge(resource_routes::<Student, _, _, _, _>(
            &jwt,
            students::create_student,
            students::edit_student,
        ))
        .merge(resource_routes::<Sponsor, _, _, _, _>(
            &jwt,
            sponsors::create_sponsor,
            sponsors::edit_sponsor,
        ))
        .merge(resource_routes::<Course, _, _, _, _>(
            &jwt,
            courses::create_course,
            courses::edit_course,
        ))
        .merge(resource_routes::<Instructor, _, _, _, _>(
            &jwt,
            instructors::create_instructor,
            instructors::edit_instructor,
        ))
        .merge(resource_routes::<Admin, _, _, _, _>(
            &jwt,
            admins::create_admin,
            admins::edit_admin,
        ))
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods([
                    Method::GET,
                    Method::PUT,
                    Method::PATCH,
                    Method::POST,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::config::Settings;
    use crate::database::DbPool;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    // Nothing below reaches the database: every request is settled by
    // routing, the scope guard or an extractor before a query runs.
    fn app() -> (Router, AppState) {
        let mut settings = Settings::defaults().unwrap();
        settings.auth.jwt_secret = "router-test-secret".into();
        let pool = DbPool::lazy(&settings.database).unwrap();
        let state = AppState::new(pool, settings);
        (build_router(state.clone()), state)
    }

    fn token(state: &AppState, role: Role) -> String {
        state
            .jwt
            .generate_token(1, role.as_str(), role.scopes())
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn json_request(method: &str, uri: &str, bearer: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = bearer {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, bearer: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = bearer {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (app, _) = app();
        let (status, body) = send(app, get_request("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn unknown_path_is_404_envelope() {
        let (app, _) = app();
        let (status, body) = send(app, get_request("/classrooms", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "resource not found");
    }

    #[tokio::test]
    async fn wrong_method_is_405_envelope() {
        let (app, _) = app();
        let request = Request::builder()
            .method("DELETE")
            .uri("/students")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], 405);
        assert_eq!(body["message"], "Method Not Allowed");
    }

    #[tokio::test]
    async fn missing_token_is_401() {
        let (app, _) = app();
        let (status, body) = send(app, get_request("/students", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn invalid_token_is_401() {
        let (app, _) = app();
        let (status, _) = send(app, get_request("/courses", Some("not-a-token"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_signed_with_placeholder_secret_is_401() {
        let (app, _) = app();
        let forged = JwtManager::new("change-me", 3600)
            .generate_token(1, Role::Admin.as_str(), Role::Admin.scopes())
            .unwrap();
        let (status, _) = send(app, get_request("/admins", Some(&forged))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_scope_is_403() {
        let (app, state) = app();
        let student = token(&state, Role::Student);
        let (status, body) = send(app, get_request("/students", Some(&student))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "forbidden");
    }

    #[tokio::test]
    async fn instructor_cannot_delete_courses() {
        let (app, state) = app();
        let instructor = token(&state, Role::Instructor);
        let request = Request::builder()
            .method("DELETE")
            .uri("/courses/1")
            .header("authorization", format!("Bearer {}", instructor))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unrecognized_payload_is_422() {
        let (app, state) = app();
        let admin = token(&state, Role::Admin);
        let (status, body) = send(
            app,
            json_request("POST", "/students", Some(&admin), r#"{"javaScript": "one"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], 422);
        assert_eq!(body["message"], "unprocessable");
    }

    #[tokio::test]
    async fn empty_payload_is_422() {
        let (app, state) = app();
        let admin = token(&state, Role::Admin);
        let (status, _) = send(app, json_request("POST", "/instructors", Some(&admin), "{}")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn edit_without_fields_is_422() {
        let (app, state) = app();
        let admin = token(&state, Role::Admin);
        let (status, body) =
            send(app, json_request("POST", "/courses/1/edit", Some(&admin), "{}")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "no fields to update");
    }

    #[tokio::test]
    async fn blank_search_is_422() {
        let (app, state) = app();
        let admin = token(&state, Role::Admin);
        let (status, _) = send(
            app,
            json_request("POST", "/courses", Some(&admin), r#"{"search": "   "}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn admins_are_not_searchable() {
        let (app, state) = app();
        let admin = token(&state, Role::Admin);
        let (status, _) = send(
            app,
            json_request("POST", "/admins", Some(&admin), r#"{"search": "x"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let (app, state) = app();
        let admin = token(&state, Role::Admin);
        let (status, body) =
            send(app, json_request("POST", "/courses", Some(&admin), "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "bad request");
    }

    #[tokio::test]
    async fn bad_page_is_400() {
        let (app, state) = app();
        let admin = token(&state, Role::Admin);

        let (status, _) = send(
            app.clone(),
            get_request("/students?page=abc", Some(&admin)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(app, get_request("/students?page=0", Some(&admin))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_numeric_id_is_404() {
        let (app, state) = app();
        let admin = token(&state, Role::Admin);
        let (status, _) = send(app, get_request("/students/abc", Some(&admin))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn login_without_password_is_422() {
        let (app, _) = app();
        let (status, _) = send(
            app,
            json_request("POST", "/login", None, r#"{"email": "a@b.c"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn login_without_identity_is_422() {
        let (app, _) = app();
        let (status, body) = send(
            app,
            json_request("POST", "/login", None, r#"{"password": "secret"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "email or username is required");
    }
}
