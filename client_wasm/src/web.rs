//! Browser implementations of the host traits

use game_core::{Navigator, ReportStatus, ResultSink, Route, SessionProvider, SinkError};
use proto::ResultRecord;
use serde::Deserialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response, Storage};

use crate::notice::Notices;

const USER_KEY: &str = "user";
const ACCESS_KEY: &str = "access";

fn storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok()?
}

fn stored(key: &str) -> Option<String> {
    storage()?.get_item(key).ok()?
}

#[derive(Deserialize)]
struct StoredUser {
    username: String,
}

/// Reads the signed-in user the login page left in local storage
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSession;

impl SessionProvider for LocalSession {
    fn current_user(&self) -> Option<String> {
        let json = stored(USER_KEY)?;
        match serde_json::from_str::<StoredUser>(&json) {
            Ok(user) => Some(user.username),
            Err(e) => {
                tracing::warn!(error = %e, "stored user is unreadable");
                None
            }
        }
    }
}

/// POSTs records to the history API with the stored bearer token.
/// Delivery happens in the background; a failed delivery is queued as a
/// notice for the page.
#[derive(Debug, Clone)]
pub struct FetchSink {
    base_url: String,
    notices: Notices,
}

impl FetchSink {
    pub fn new(base_url: impl Into<String>, notices: Notices) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            notices,
        }
    }

    fn url(&self, record: &ResultRecord) -> String {
        format!("{}{}", self.base_url, record.endpoint())
    }
}

impl ResultSink for FetchSink {
    fn submit(&mut self, record: &ResultRecord) -> Result<(), SinkError> {
        let body = record.to_json_body()?;
        let token = stored(ACCESS_KEY)
            .ok_or_else(|| SinkError::Transport("no access token stored".to_string()))?;
        let url = self.url(record);
        let notices = self.notices.clone();

        wasm_bindgen_futures::spawn_local(async move {
            match post_json(&url, &body, &token).await {
                Ok(()) => tracing::info!(%url, "result stored"),
                Err(e) => {
                    tracing::warn!(error = %e, %url, "result delivery failed");
                    notices.push(ReportStatus::Failed(e.to_string()));
                }
            }
        });
        Ok(())
    }
}

async fn post_json(url: &str, body: &str, token: &str) -> Result<(), SinkError> {
    let transport = |e: JsValue| SinkError::Transport(format!("{:?}", e));

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(body));
    let request = Request::new_with_str_and_init(url, &init).map_err(transport)?;
    let headers = request.headers();
    headers.set("Content-Type", "application/json").map_err(transport)?;
    headers
        .set("Authorization", &format!("Bearer {}", token))
        .map_err(transport)?;

    let window =
        web_sys::window().ok_or_else(|| SinkError::Transport("no window".to_string()))?;
    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(transport)?;
    let response: Response = response.dyn_into().map_err(transport)?;
    if response.ok() {
        Ok(())
    } else {
        Err(SinkError::Rejected {
            status: response.status(),
        })
    }
}

/// Navigates by rewriting the location hash
#[derive(Debug, Clone, Copy, Default)]
pub struct HashNavigator;

impl HashNavigator {
    pub fn hash(route: Route) -> &'static str {
        match route {
            Route::Setup => "#select_pong",
            Route::Home => "#/",
        }
    }
}

impl Navigator for HashNavigator {
    fn navigate(&mut self, route: Route) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().set_hash(Self::hash(route)) {
            tracing::warn!(error = ?e, ?route, "navigation failed");
        }
    }
}
