use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Review submission body, as sent by the site's review form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub name: String,
    pub dealership: u64,
    pub review: String,
    pub purchase: bool,
    pub purchase_date: String,
    pub car_make: String,
    pub car_model: String,
    pub car_year: u16,
}

/// Transport status plus decoded JSON body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// The `status` field carried inside the payload, if any.
    pub fn payload_status(&self) -> Option<u64> {
        self.body.get("status").and_then(Value::as_u64)
    }

    async fn from_response(resp: Response) -> Result<Self, reqwest::Error> {
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok(Self { status, body })
    }
}

/// Client that keeps the session cookie between calls.
pub struct DealershipClient {
    client: Client,
    base_url: String,
}

impl DealershipClient {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<ApiResponse, reqwest::Error> {
        let resp = self.client.get(self.url(path)).send().await?;
        ApiResponse::from_response(resp).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, reqwest::Error> {
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        ApiResponse::from_response(resp).await
    }

    /// Log in; on success the session cookie is stored for later calls.
    pub async fn login(&self, user_name: &str, password: &str) -> Result<ApiResponse, reqwest::Error> {
        self.post(
            "/djangoapp/login",
            &json!({ "userName": user_name, "password": password }),
        )
        .await
    }

    pub async fn logout(&self) -> Result<ApiResponse, reqwest::Error> {
        self.get("/djangoapp/logout").await
    }

    /// Register a new account and log it in.
    pub async fn register(
        &self,
        user_name: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<ApiResponse, reqwest::Error> {
        self.post(
            "/djangoapp/register",
            &json!({
                "userName": user_name,
                "password": password,
                "firstName": first_name,
                "lastName": last_name,
                "email": email,
            }),
        )
        .await
    }

    pub async fn cars(&self) -> Result<ApiResponse, reqwest::Error> {
        self.get("/djangoapp/get_cars").await
    }

    /// List dealers; `None` (or `"All"`) lists every state.
    pub async fn dealers(&self, state: Option<&str>) -> Result<ApiResponse, reqwest::Error> {
        match state {
            Some(state) => {
                let path = format!("/djangoapp/get_dealers/{}", urlencoding::encode(state));
                self.get(&path).await
            }
            None => self.get("/djangoapp/get_dealers").await,
        }
    }

    /// Dealer details. The id is passed through as given so callers can probe invalid ids.
    pub async fn dealer(&self, dealer_id: &str) -> Result<ApiResponse, reqwest::Error> {
        self.get(&format!("/djangoapp/dealer/{dealer_id}")).await
    }

    pub async fn reviews(&self, dealer_id: &str) -> Result<ApiResponse, reqwest::Error> {
        self.get(&format!("/djangoapp/reviews/dealer/{dealer_id}")).await
    }

    pub async fn add_review(&self, review: &ReviewRequest) -> Result<ApiResponse, reqwest::Error> {
        let body = serde_json::to_value(review).unwrap_or(Value::Null);
        self.post("/djangoapp/add_review", &body).await
    }

    /// Post an arbitrary body to the review endpoint.
    pub async fn add_review_raw(&self, body: &Value) -> Result<ApiResponse, reqwest::Error> {
        self.post("/djangoapp/add_review", body).await
    }

    pub async fn health(&self) -> Result<ApiResponse, reqwest::Error> {
        self.get("/health").await
    }

    /// Raw GET for paths the typed methods don't cover.
    pub async fn get_raw(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.client.get(self.url(path)).send().await
    }
}
