//! Shortener service routes

use axum::{
    Extension, Form, Json, Router,
    extract::{FromRequest, Host, Path, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_sessions::Session;
use tracing::{error, info};

use crate::{
    auth,
    error::{AppError, AppResult},
    flash::{self, Flash, FlashMessage},
    links,
    middleware::require_session,
    models::{LinkView, LoginCredentials, LoginForm, RegisterForm, SessionContext, ShortenForm},
    session,
    state::AppState,
};

/// Create the router for the shortener service
pub fn create_router(state: AppState) -> Router {
    let session_layer = session::layer(
        state.session_store.clone(),
        state.session_key.clone(),
        state.config.session_ttl_seconds,
    );

    let protected_routes = Router::new()
        .route("/", get(index))
        .route("/shorten", post(shorten))
        .route_layer(middleware::from_fn(require_session));

    Router::new()
        .route("/healthz", get(health_check))
        .route("/login", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/logout", get(logout))
        .route("/:short_code", get(redirect_to_url))
        .merge(protected_routes)
        .fallback(not_found)
        .layer(session_layer)
        .with_state(state)
}

/// Origin used to build short URLs for this request
fn base_url(state: &AppState, host: &str) -> String {
    state
        .config
        .base_url
        .clone()
        .unwrap_or_else(|| format!("http://{}", host))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().starts_with("application/json"))
}

fn json_failure(status: StatusCode, error: &str) -> Response {
    let body = Json(json!({
        "success": false,
        "error": error,
    }));
    (status, body).into_response()
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Unmatched routes
pub async fn not_found() -> AppError {
    AppError::NotFound
}

/// Login page
pub async fn login_page(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    let messages = flash::take(&session).await?;
    let page = state.renderer.login(&messages, None)?;

    Ok(page.into_response())
}

/// Login endpoint
///
/// JSON bodies get a structured answer; form posts either log in or, when
/// the `shorten` button was used, shorten a link anonymously.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Host(host): Host,
    req: Request,
) -> AppResult<Response> {
    if is_json(req.headers()) {
        return match Json::<LoginCredentials>::from_request(req, &state).await {
            Ok(Json(credentials)) => json_login(&state, &session, credentials).await,
            Err(rejection) => Ok(json_failure(
                StatusCode::BAD_REQUEST,
                &rejection.body_text(),
            )),
        };
    }

    let Form(form) = Form::<LoginForm>::from_request(req, &state)
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?;

    if form.wants_shorten() {
        let original_url = form.url_to_shorten.unwrap_or_default();
        let base = base_url(&state, &host);
        let shortened = links::shorten(&state.link_repository, &original_url, None, &base).await?;

        let messages = flash::take(&session).await?;
        let page = state
            .renderer
            .login(&messages, Some(&shortened.short_url))?;
        return Ok(page.into_response());
    }

    let credentials = form.credentials();
    match auth::login(
        &state.user_repository,
        &session,
        &credentials.username,
        &credentials.password,
    )
    .await
    {
        Ok(_) => {
            flash::set(&session, Flash::LoginSucceeded).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(AppError::InvalidCredentials) => {
            let page = state
                .renderer
                .login(&[FlashMessage::error("Invalid credentials")], None)?;
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
        Err(e) => Err(e),
    }
}

async fn json_login(
    state: &AppState,
    session: &Session,
    credentials: LoginCredentials,
) -> AppResult<Response> {
    match auth::login(
        &state.user_repository,
        session,
        &credentials.username,
        &credentials.password,
    )
    .await
    {
        Ok(user) => {
            let body = Json(json!({
                "success": true,
                "user_id": user.id,
                "username": user.username,
            }));
            Ok(body.into_response())
        }
        Err(AppError::InvalidCredentials) => Ok(json_failure(
            StatusCode::UNAUTHORIZED,
            "Invalid credentials",
        )),
        Err(e) => Err(e),
    }
}

/// The authenticated user's links
pub async fn index(
    State(state): State<AppState>,
    Extension(user): Extension<SessionContext>,
    session: Session,
    Host(host): Host,
) -> AppResult<Response> {
    let base = base_url(&state, &host);
    let views: Vec<LinkView> = state
        .link_repository
        .list_by_user(user.user_id)
        .await?
        .into_iter()
        .map(|link| LinkView {
            short_url: links::short_url(&base, &link.short_code),
            original_url: link.original_url,
        })
        .collect();

    let messages = flash::take(&session).await?;
    let page = state.renderer.index(&user.username, &messages, &views)?;

    Ok(page.into_response())
}

/// Shorten a link owned by the authenticated user
pub async fn shorten(
    State(state): State<AppState>,
    Extension(user): Extension<SessionContext>,
    Host(host): Host,
    Form(form): Form<ShortenForm>,
) -> AppResult<Response> {
    let shortened = links::shorten(
        &state.link_repository,
        &form.url,
        Some(user.user_id),
        &base_url(&state, &host),
    )
    .await?;

    let page = state
        .renderer
        .shortened(&shortened.link.original_url, &shortened.short_url)?;

    Ok(page.into_response())
}

/// Redirect a short code to its original URL
pub async fn redirect_to_url(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> AppResult<Response> {
    let original_url = links::resolve(&state.link_repository, &short_code).await?;

    // Stored URLs are arbitrary strings; some cannot be sent as a header
    let location = HeaderValue::from_str(&original_url).map_err(|e| {
        error!("Stored URL for {} is not a valid Location: {}", short_code, e);
        AppError::Internal(format!("Unusable redirect target for {}", short_code))
    })?;

    info!("Redirecting {}", short_code);
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Registration page
pub async fn register_page(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    let messages = flash::take(&session).await?;
    let page = state.renderer.register(&messages)?;

    Ok(page.into_response())
}

/// Registration endpoint
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    match auth::register(&state.user_repository, &form.username, &form.password).await {
        Ok(_) => {
            flash::set(&session, Flash::Registered).await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(AppError::DuplicateUsername(_)) => {
            let page = state
                .renderer
                .register(&[FlashMessage::error("Username already exists.")])?;
            Ok((StatusCode::CONFLICT, page).into_response())
        }
        Err(AppError::Validation(message)) => {
            let page = state.renderer.register(&[FlashMessage::error(message)])?;
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        Err(e) => Err(e),
    }
}

/// Logout endpoint
pub async fn logout(session: Session) -> AppResult<Response> {
    auth::logout(&session).await?;
    flash::set(&session, Flash::LoggedOut).await?;

    Ok(Redirect::to("/login").into_response())
}
