use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use log::{error, info};
use serde::Deserialize;
use tokio::net::TcpListener;

use crate::cache::IdCache;
use crate::config::Settings;
use crate::error::Error;
use crate::library;
use crate::steam_api::SteamClient;
use crate::view;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub cache: Arc<dyn IdCache>,
}

#[derive(Debug, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    steamname: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(show_index))
        .route("/user/create", get(back_to_index).post(create_user))
        .with_state(state)
}

pub async fn serve(state: AppState) -> Result<(), Error> {
    let listener = TcpListener::bind(state.settings.listen.as_str()).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn server_error(e: &Error) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
}

async fn show_index() -> Response {
    match view::render_index() {
        Ok(page) => Html(page).into_response(),
        Err(e) => server_error(&e),
    }
}

async fn back_to_index() -> Redirect {
    Redirect::to("/")
}

async fn create_user(State(state): State<AppState>, Form(form): Form<UserForm>) -> Response {
    let steam_name = form.steamname.trim().to_string();
    if steam_name.is_empty() {
        return Redirect::to("/").into_response();
    }
    info!("Library requested for {steam_name}");

    // reqwest's blocking client must stay off the async workers.
    let lookup = tokio::task::spawn_blocking(move || {
        let steam = SteamClient::new(&state.settings.api_key, &state.settings.api_base);
        let user = library::load_user(&steam, state.cache.as_ref(), &steam_name)?;
        view::render_user(&user)
    })
    .await;

    match lookup {
        Ok(Ok(page)) => Html(page).into_response(),
        Ok(Err(e)) => {
            error!("Library lookup failed: {e}");
            server_error(&e)
        }
        Err(e) => {
            error!("Library lookup panicked: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    use super::*;
    use crate::cache::{CacheKind, NoCache};

    fn state() -> AppState {
        AppState {
            settings: Arc::new(Settings {
                listen: "127.0.0.1:0".to_string(),
                api_key: "key".to_string(),
                // Nothing listens here, so any outbound call fails fast.
                api_base: "http://127.0.0.1:9".to_string(),
                cache_kind: CacheKind::None,
                cache_path: "unused".into(),
            }),
            cache: Arc::new(NoCache),
        }
    }

    fn post_form(body: &'static str) -> Request<Body> {
        Request::post("/user/create")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn index_renders_form() {
        let response = router(state())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains(r#"name="steamname""#));
    }

    #[tokio::test]
    async fn blank_name_redirects_home() {
        for body in ["steamname=", "steamname=+++", ""] {
            let response = router(state()).oneshot(post_form(body)).await.unwrap();

            assert_eq!(response.status(), StatusCode::SEE_OTHER, "body {body:?}");
            assert_eq!(response.headers()[header::LOCATION], "/");
        }
    }

    #[tokio::test]
    async fn unreachable_steam_is_server_error() {
        let response = router(state())
            .oneshot(post_form("steamname=gabelogannewell"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn get_on_create_redirects_home() {
        let response = router(state())
            .oneshot(Request::get("/user/create").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
}
