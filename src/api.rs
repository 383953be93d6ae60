use std::rc::Rc;

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use web_sys::{File, FormData};
use yew::prelude::*;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{
    one_or_many, DashboardStats, Item, MatchingStatus, ParsedReceipt, Purchase, PurchasePayload,
    ResyncStatus, Sale, SalePayload,
};

/// Thin wrapper over the backend REST API.
///
/// Cheap to clone. A new one is built whenever the session token changes. Authenticated calls
/// carry `Authorization: Bearer <token>`. A 401 on any of them fires `on_unauthorized` before
/// the error reaches the caller.
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: Rc<str>,
    token: Option<Rc<str>>,
    on_unauthorized: Callback<()>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthGrant {
    pub username: String,
    pub token: String,
}

#[derive(Deserialize)]
struct AuthResponse {
    #[serde(default)]
    condition: bool,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct CheckAuthResponse {
    #[serde(default)]
    condition: bool,
    #[serde(default)]
    username: Option<String>,
}

#[derive(Deserialize)]
struct PurchaseList {
    #[serde(default)]
    purchases: Vec<Purchase>,
}

#[derive(Deserialize)]
struct SaleList {
    #[serde(default)]
    sales: Vec<Sale>,
}

#[derive(Deserialize)]
struct ItemList {
    #[serde(default)]
    condition: Option<bool>,
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(default)]
    condition: bool,
    #[serde(default, deserialize_with = "one_or_many")]
    parsed: Vec<ParsedReceipt>,
}

#[derive(Deserialize)]
struct DashboardResponse {
    #[serde(default)]
    condition: bool,
    #[serde(default)]
    stats: Option<DashboardStats>,
}

#[derive(Deserialize)]
struct AskAiResponse {
    #[serde(default)]
    answer: Option<String>,
}

#[derive(Serialize)]
struct TokenBody<'a> {
    token: &'a str,
}

#[derive(Serialize)]
struct PromptBody<'a> {
    prompt: &'a str,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(&AppConfig::default(), None, Callback::noop())
    }
}

impl ApiClient {
    pub fn new(config: &AppConfig, token: Option<String>, on_unauthorized: Callback<()>) -> Self {
        Self {
            base_url: Rc::from(config.api_base_url.as_str()),
            token: token.map(Rc::from),
            on_unauthorized,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn dispatch(&self, request: Request, authenticated: bool) -> Result<Response, ApiError> {
        let method = request.method();
        let url = request.url();
        let response = request.send().await.map_err(|err| {
            log::warn!("{method:?} {url} failed: {err}");
            ApiError::from(err)
        })?;
        if let Err(err) = check_status(response.status(), authenticated) {
            log::warn!("{method:?} {url} -> {}", response.status());
            if err == ApiError::Unauthorized {
                self.on_unauthorized.emit(());
            }
            return Err(err);
        }
        Ok(response)
    }

    async fn read<T: DeserializeOwned>(
        &self,
        request: Request,
        authenticated: bool,
    ) -> Result<T, ApiError> {
        let response = self.dispatch(request, authenticated).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.authorize(Request::get(&self.url(path))).build()?;
        self.read(request, true).await
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.authorize(builder).json(body)?;
        self.read(request, true).await
    }

    // -- auth (unauthenticated) --

    pub async fn login(&self, body: &LoginRequest) -> Result<AuthGrant, ApiError> {
        let request = Request::post(&self.url("/auth/login")).json(body)?;
        let response: AuthResponse = self.read(request, false).await?;
        response.into_grant("Login failed.")
    }

    pub async fn register(&self, body: &RegisterRequest) -> Result<AuthGrant, ApiError> {
        let request = Request::post(&self.url("/auth/register")).json(body)?;
        let response: AuthResponse = self.read(request, false).await?;
        response.into_grant("Registration failed.")
    }

    /// `Ok(Some(username))` for a valid token, `Ok(None)` when the backend rejects it.
    pub async fn check_auth(&self, token: &str) -> Result<Option<String>, ApiError> {
        let request = Request::post(&self.url("/auth/check-auth")).json(&TokenBody { token })?;
        let response: CheckAuthResponse = self.read(request, false).await?;
        Ok(response
            .condition
            .then(|| response.username.unwrap_or_default()))
    }

    // -- purchases --

    pub async fn purchases(&self, page: u32, limit: u32) -> Result<Vec<Purchase>, ApiError> {
        let list: PurchaseList = self
            .get(&format!("/purchase/all?page={page}&limit={limit}"))
            .await?;
        Ok(list.purchases)
    }

    /// Returns the new purchase's id when the backend reports one.
    pub async fn create_purchase(
        &self,
        payload: &PurchasePayload,
    ) -> Result<Option<String>, ApiError> {
        let body: serde_json::Value = self
            .send_json(Request::post(&self.url("/purchase/manual")), payload)
            .await?;
        Ok(created_id(&body))
    }

    pub async fn update_purchase(&self, id: &str, payload: &PurchasePayload) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .send_json(Request::put(&self.url(&format!("/purchase/{id}"))), payload)
            .await?;
        Ok(())
    }

    pub async fn delete_purchase(&self, id: &str) -> Result<(), ApiError> {
        let request = self
            .authorize(Request::delete(&self.url(&format!("/purchase/{id}"))))
            .build()?;
        self.dispatch(request, true).await?;
        Ok(())
    }

    pub async fn upload_receipts(&self, files: &[File]) -> Result<Vec<ParsedReceipt>, ApiError> {
        let form = FormData::new().map_err(|_| ApiError::Network("FormData unavailable".into()))?;
        for file in files {
            form.append_with_blob_and_filename("file", file, &file.name())
                .map_err(|_| ApiError::Network(format!("could not attach {}", file.name())))?;
        }
        let request = self
            .authorize(Request::post(&self.url("/purchase/upload-receipt")))
            .body(form)?;
        let response: UploadResponse = self.read(request, true).await?;
        if !response.condition {
            return Err(ApiError::Rejected("Could not parse receipt".into()));
        }
        Ok(response.parsed)
    }

    pub async fn matching_status(&self, id: &str) -> Result<MatchingStatus, ApiError> {
        self.get(&format!("/purchase/matching-status/{id}")).await
    }

    // -- sales --

    pub async fn sales(&self, page: u32, limit: u32) -> Result<Vec<Sale>, ApiError> {
        let list: SaleList = self
            .get(&format!("/sale/all?page={page}&limit={limit}"))
            .await?;
        Ok(list.sales)
    }

    pub async fn create_sale(&self, payload: &SalePayload) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .send_json(Request::post(&self.url("/sale/manual")), payload)
            .await?;
        Ok(())
    }

    pub async fn update_sale(&self, id: &str, payload: &SalePayload) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .send_json(Request::put(&self.url(&format!("/sale/{id}"))), payload)
            .await?;
        Ok(())
    }

    pub async fn delete_sale(&self, id: &str) -> Result<(), ApiError> {
        let request = self
            .authorize(Request::delete(&self.url(&format!("/sale/{id}"))))
            .build()?;
        self.dispatch(request, true).await?;
        Ok(())
    }

    // -- items --

    pub async fn items(&self, page: u32, limit: u32) -> Result<Vec<Item>, ApiError> {
        let list: ItemList = self
            .get(&format!("/item/all?page={page}&limit={limit}"))
            .await?;
        if list.condition == Some(false) {
            return Err(ApiError::Rejected("Failed to load items".into()));
        }
        Ok(list.items)
    }

    pub async fn resync_items(&self) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .send_json(
                Request::post(&self.url("/item/resync-items")),
                &serde_json::json!({}),
            )
            .await?;
        Ok(())
    }

    pub async fn resync_status(&self) -> Result<ResyncStatus, ApiError> {
        self.get("/item/resync-status").await
    }

    // -- dashboard --

    pub async fn dashboard(&self, range: &str) -> Result<DashboardStats, ApiError> {
        let response: DashboardResponse = self.get(&format!("/dashboard?range={range}")).await?;
        match response.stats {
            Some(stats) if response.condition => Ok(stats),
            _ => Err(ApiError::Rejected("No statistics available".into())),
        }
    }

    pub async fn ask_ai(&self, prompt: &str) -> Result<String, ApiError> {
        let response: AskAiResponse = self
            .send_json(
                Request::post(&self.url("/dashboard/ask-ai")),
                &PromptBody { prompt },
            )
            .await?;
        Ok(response
            .answer
            .filter(|answer| !answer.trim().is_empty())
            .unwrap_or_else(|| "No answer returned.".to_string()))
    }
}

#[hook]
pub fn use_api() -> ApiClient {
    use_context::<ApiClient>().unwrap_or_default()
}

impl AuthResponse {
    fn into_grant(self, fallback: &str) -> Result<AuthGrant, ApiError> {
        match (self.condition, self.token) {
            (true, Some(token)) if !token.is_empty() => Ok(AuthGrant {
                username: self.username.unwrap_or_default(),
                token,
            }),
            _ => Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| fallback.to_string()),
            )),
        }
    }
}

/// Map a response status onto the error taxonomy. 401 only invalidates the session when the
/// call carried the session token.
pub fn check_status(status: u16, authenticated: bool) -> Result<(), ApiError> {
    match status {
        200..=299 => Ok(()),
        401 if authenticated => Err(ApiError::Unauthorized),
        status => Err(ApiError::Status { status }),
    }
}

/// Dig the new purchase id out of a create response. The backend has answered with the bare
/// document, `{ purchase: {...} }` and `{ purchaseId }` over time.
pub fn created_id(body: &serde_json::Value) -> Option<String> {
    let candidates = [
        body.pointer("/purchase/_id"),
        body.pointer("/purchase/id"),
        body.get("purchaseId"),
        body.get("_id"),
        body.get("id"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|value| value.as_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unauthorized_only_counts_for_authenticated_calls() {
        assert_eq!(check_status(204, true), Ok(()));
        assert_eq!(check_status(401, true), Err(ApiError::Unauthorized));
        assert_eq!(
            check_status(401, false),
            Err(ApiError::Status { status: 401 })
        );
        assert_eq!(
            check_status(503, true),
            Err(ApiError::Status { status: 503 })
        );
    }

    #[test]
    fn created_id_handles_known_shapes() {
        assert_eq!(
            created_id(&json!({ "condition": true, "purchase": { "_id": "p1" } })),
            Some("p1".to_string())
        );
        assert_eq!(created_id(&json!({ "_id": "p2" })), Some("p2".to_string()));
        assert_eq!(
            created_id(&json!({ "purchaseId": "p3" })),
            Some("p3".to_string())
        );
        assert_eq!(created_id(&json!({ "condition": true })), None);
    }

    #[test]
    fn auth_response_requires_condition_and_token() {
        let ok = AuthResponse {
            condition: true,
            token: Some("tok".into()),
            username: Some("wish".into()),
            message: None,
        };
        assert_eq!(
            ok.into_grant("x"),
            Ok(AuthGrant {
                username: "wish".into(),
                token: "tok".into()
            })
        );

        let rejected = AuthResponse {
            condition: false,
            token: None,
            username: None,
            message: Some("Wrong password".into()),
        };
        assert_eq!(
            rejected.into_grant("x"),
            Err(ApiError::Rejected("Wrong password".into()))
        );

        let missing_token = AuthResponse {
            condition: true,
            token: None,
            username: None,
            message: None,
        };
        assert_eq!(
            missing_token.into_grant("Login failed."),
            Err(ApiError::Rejected("Login failed.".into()))
        );
    }
}
