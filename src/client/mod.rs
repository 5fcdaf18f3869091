//! Client layer: owns credentials and the session token, runs the authenticated
//! request pipeline and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::{
    BulkMessageRequest, BulkMessageResponse, ClientId, ClientSecret, ErrorEnvelope,
    GroupMessageRequest, ValidationError,
};
use crate::transport::{
    AuthenticationJsonResponse, BalanceJsonResponse, BulkMessageJsonResponse,
    decode_error_envelope, describe_api_error, encode_basic_authorization,
    encode_bulk_messages_body, encode_group_messages_body,
};

const DEFAULT_ENDPOINT: &str = "https://rest.mymobileapi.com/v1/";

const AUTHENTICATION_PATH: &str = "Authentication";
const BALANCE_PATH: &str = "Balance";
const BULK_MESSAGES_PATH: &str = "BulkMessages";
const GROUP_MESSAGES_PATH: &str = "GroupMessages";

/// Environment variable read by [`Credentials::from_env`] for the client id.
pub const CLIENT_ID_ENV: &str = "MYMOBILEAPI_CLIENT_ID";
/// Environment variable read by [`Credentials::from_env`] for the client secret.
pub const CLIENT_SECRET_ENV: &str = "MYMOBILEAPI_CLIENT_SECRET";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<String>,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    headers: HeaderMap,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(request.method, request.url)
                .headers(request.headers);
            if let Some(body) = request.body {
                builder = builder.body(body);
            }
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response.headers().clone();
            let body = response.text().await?;
            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        })
    }
}

#[derive(Debug, Clone)]
/// API credentials (client id + client secret) issued by MyMobileAPI.
pub struct Credentials {
    client_id: ClientId,
    client_secret: ClientSecret,
}

impl Credentials {
    /// Validate both halves of the credential pair.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            client_id: ClientId::new(client_id)?,
            client_secret: ClientSecret::new(client_secret)?,
        })
    }

    /// Read credentials from [`CLIENT_ID_ENV`] and [`CLIENT_SECRET_ENV`].
    pub fn from_env() -> Result<Self, MyMobileApiError> {
        let client_id = std::env::var(CLIENT_ID_ENV)
            .map_err(|_| MyMobileApiError::MissingEnv(CLIENT_ID_ENV))?;
        let client_secret = std::env::var(CLIENT_SECRET_ENV)
            .map_err(|_| MyMobileApiError::MissingEnv(CLIENT_SECRET_ENV))?;
        Ok(Self::new(client_id, client_secret)?)
    }

    /// The validated client ID.
    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`MyMobileApiClient`].
pub enum MyMobileApiError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The request body could not be serialized; nothing was sent.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The API answered with a status outside `200..=299`.
    ///
    /// `message` is built from the error envelope: `"<status>: <message>"` when the
    /// envelope carries a message, otherwise the comma-joined `"name: description"`
    /// field errors, otherwise the bare status code.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        envelope: ErrorEnvelope,
    },

    /// A successful response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// The configured endpoint (or a path joined onto it) is not a valid URL.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A request path that would leave the configured endpoint (`..` segments, a full
    /// URL, ...). Nothing was sent.
    #[error("request path {0:?} is outside the API endpoint")]
    PathOutsideEndpoint(String),

    /// A required environment variable is missing or not valid unicode.
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl MyMobileApiError {
    /// HTTP status of an [`MyMobileApiError::Api`] failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
enum Session {
    #[default]
    Unauthenticated,
    Authenticated {
        bearer: String,
        expires_at: DateTime<Utc>,
    },
}

/// Which `Authorization` value the pipeline attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    /// Always the `BASIC` credential value (the `Authentication` endpoint).
    Credentials,
    /// The bearer token when a session exists, the credential value otherwise.
    Session,
}

/// Decoded success payload together with the response headers.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub headers: HeaderMap,
    pub data: T,
}

#[derive(Debug, Clone)]
/// Builder for [`MyMobileApiClient`].
///
/// Use this when you need to customize the endpoint, timeout, user-agent or debug logging.
pub struct MyMobileApiClientBuilder {
    credentials: Credentials,
    endpoint: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    debug: bool,
}

impl MyMobileApiClientBuilder {
    /// Create a builder with the default endpoint and no timeout/user-agent override.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: None,
            user_agent: None,
            debug: false,
        }
    }

    /// Override the API base URL (defaults to `https://rest.mymobileapi.com/v1/`).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Log full request and response dumps through `tracing` at `debug` level.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Build the client and authenticate it.
    ///
    /// Fails when the initial `Authentication` call fails; no client is returned in that case.
    pub async fn build(self) -> Result<MyMobileApiClient, MyMobileApiError> {
        self.build_unauthenticated()?.authenticated().await
    }

    /// Build the client without calling `Authentication`.
    ///
    /// Requests sent before [`MyMobileApiClient::authenticate`] carry the credential value.
    pub fn build_unauthenticated(self) -> Result<MyMobileApiClient, MyMobileApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| MyMobileApiError::Transport(Box::new(err)))?;

        Ok(MyMobileApiClient::with_transport(
            &self.credentials,
            parse_endpoint(&self.endpoint)?,
            self.debug,
            Arc::new(ReqwestTransport { client }),
        ))
    }
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
fn parse_endpoint(endpoint: &str) -> Result<Url, url::ParseError> {
    if endpoint.ends_with('/') {
        Url::parse(endpoint)
    } else {
        Url::parse(&format!("{endpoint}/"))
    }
}

#[derive(Clone)]
/// High-level MyMobileAPI client.
///
/// Clones share the HTTP connection pool and the session token. The token is never
/// refreshed automatically: check [`MyMobileApiClient::is_token_expired`] and call
/// [`MyMobileApiClient::authenticate`] again when needed.
pub struct MyMobileApiClient {
    basic_authorization: String,
    endpoint: Url,
    debug: bool,
    session: Arc<RwLock<Session>>,
    http: Arc<dyn HttpTransport>,
}

impl MyMobileApiClient {
    /// Create a client against the default endpoint and authenticate it.
    ///
    /// For more customization, use [`MyMobileApiClient::builder`].
    pub async fn new(credentials: Credentials, debug: bool) -> Result<Self, MyMobileApiError> {
        MyMobileApiClientBuilder::new(credentials)
            .debug(debug)
            .build()
            .await
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> MyMobileApiClientBuilder {
        MyMobileApiClientBuilder::new(credentials)
    }

    fn with_transport(
        credentials: &Credentials,
        endpoint: Url,
        debug: bool,
        http: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            basic_authorization: encode_basic_authorization(
                &credentials.client_id,
                &credentials.client_secret,
            ),
            endpoint,
            debug,
            session: Arc::new(RwLock::new(Session::Unauthenticated)),
            http,
        }
    }

    async fn authenticated(self) -> Result<Self, MyMobileApiError> {
        self.authenticate().await?;
        Ok(self)
    }

    /// Obtain a fresh bearer token from the `Authentication` endpoint.
    ///
    /// Always authenticates with the client credentials. The session is only replaced once
    /// the whole response has been decoded; on failure the previous token stays in place.
    pub async fn authenticate(&self) -> Result<(), MyMobileApiError> {
        let response = self
            .exchange(Method::GET, AUTHENTICATION_PATH, None, AuthMode::Credentials)
            .await?;
        let parsed: AuthenticationJsonResponse = decode_json(&response.body)?;

        let expires_at = TimeDelta::try_minutes(parsed.expires_in_minutes)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                MyMobileApiError::Parse(
                    format!("expiresInMinutes out of range: {}", parsed.expires_in_minutes).into(),
                )
            })?;

        tracing::debug!(
            schema = parsed.schema.as_deref().unwrap_or_default(),
            %expires_at,
            "authenticated with MyMobileAPI"
        );

        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Session::Authenticated {
            bearer: format!("Bearer {}", parsed.token),
            expires_at,
        };
        Ok(())
    }

    /// Whether a bearer token has been obtained.
    pub fn is_authenticated(&self) -> bool {
        self.token_expiry().is_some()
    }

    /// Expiry of the current bearer token, if any.
    pub fn token_expiry(&self) -> Option<DateTime<Utc>> {
        match &*self.session.read().unwrap_or_else(PoisonError::into_inner) {
            Session::Unauthenticated => None,
            Session::Authenticated { expires_at, .. } => Some(*expires_at),
        }
    }

    /// `true` when there is no token or the token's expiry has passed.
    pub fn is_token_expired(&self) -> bool {
        self.token_expiry().is_none_or(|expires_at| expires_at <= Utc::now())
    }

    /// Current account balance.
    ///
    /// Post-paid accounts always report `1000000`, since no credits are deducted.
    pub async fn get_balance(&self) -> Result<i64, MyMobileApiError> {
        let response = self
            .get::<(), BalanceJsonResponse>(BALANCE_PATH, None)
            .await?;
        Ok(response.data.balance)
    }

    /// Send a batch of messages (`POST BulkMessages`).
    pub async fn send_bulk_messages(
        &self,
        request: BulkMessageRequest,
    ) -> Result<BulkMessageResponse, MyMobileApiError> {
        let body = encode_bulk_messages_body(&request);
        let response = self
            .post::<_, BulkMessageJsonResponse>(BULK_MESSAGES_PATH, Some(&body))
            .await?;
        Ok(response.data.into())
    }

    /// Send one message to every contact in the given groups (`POST GroupMessages`).
    pub async fn send_group_messages(
        &self,
        request: GroupMessageRequest,
    ) -> Result<BulkMessageResponse, MyMobileApiError> {
        let body = encode_group_messages_body(&request);
        let response = self
            .post::<_, BulkMessageJsonResponse>(GROUP_MESSAGES_PATH, Some(&body))
            .await?;
        Ok(response.data.into())
    }

    pub async fn get<B, R>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<R>, MyMobileApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::GET, path, body).await
    }

    pub async fn post<B, R>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<R>, MyMobileApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::POST, path, body).await
    }

    pub async fn put<B, R>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<R>, MyMobileApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::PUT, path, body).await
    }

    pub async fn patch<B, R>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<R>, MyMobileApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::PATCH, path, body).await
    }

    pub async fn delete<B, R>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<R>, MyMobileApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::DELETE, path, body).await
    }

    /// Send an authenticated JSON request to `path` (relative to the endpoint) and decode
    /// a successful response into `R`.
    ///
    /// A missing body, or one that serializes to `null`, is not sent at all. An empty
    /// success body decodes as JSON `null`, so `R = ()` or `Option<_>` accept it.
    ///
    /// Errors:
    /// - [`MyMobileApiError::Encode`] when `body` cannot be serialized,
    /// - [`MyMobileApiError::Transport`] for network failures,
    /// - [`MyMobileApiError::Api`] for statuses outside `200..=299`,
    /// - [`MyMobileApiError::Parse`] when a success body does not match `R`.
    pub async fn request<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<R>, MyMobileApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = encode_body(body)?;
        let response = self.exchange(method, path, body, AuthMode::Session).await?;
        let data = decode_json(&response.body)?;
        Ok(ApiResponse {
            headers: response.headers,
            data,
        })
    }

    fn authorization(&self, mode: AuthMode) -> String {
        if mode == AuthMode::Session {
            let session = self.session.read().unwrap_or_else(PoisonError::into_inner);
            if let Session::Authenticated { bearer, .. } = &*session {
                return bearer.clone();
            }
        }
        self.basic_authorization.clone()
    }

    async fn exchange(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        mode: AuthMode,
    ) -> Result<HttpResponse, MyMobileApiError> {
        let url = endpoint_url(&self.endpoint, path)?;

        let mut headers = HeaderMap::new();
        let authorization = HeaderValue::from_str(&self.authorization(mode))
            .map_err(|err| MyMobileApiError::Transport(Box::new(err)))?;
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let request = HttpRequest {
            method,
            url,
            headers,
            body,
        };
        if self.debug {
            tracing::debug!("MyMobileAPI request:\n{}", dump_request(&request));
        }

        let response = self
            .http
            .send(request)
            .await
            .map_err(MyMobileApiError::Transport)?;

        if self.debug {
            tracing::debug!("MyMobileAPI response:\n{}", dump_response(&response));
        }

        if !(200..=299).contains(&response.status) {
            let envelope = decode_error_envelope(&response.body);
            let message = describe_api_error(response.status, &envelope);
            tracing::warn!(
                status = response.status,
                path,
                %message,
                "MyMobileAPI request failed"
            );
            return Err(MyMobileApiError::Api {
                status: response.status,
                message,
                envelope,
            });
        }

        Ok(response)
    }
}

/// `endpoint + path`, with leading slashes on `path` ignored. The result must stay under
/// the endpoint so credentials never leave the configured host.
fn endpoint_url(endpoint: &Url, path: &str) -> Result<Url, MyMobileApiError> {
    if path.contains("://") {
        return Err(MyMobileApiError::PathOutsideEndpoint(path.to_owned()));
    }
    let url = Url::parse(&format!(
        "{}{}",
        endpoint.as_str(),
        path.trim_start_matches('/')
    ))?;
    if url.origin() != endpoint.origin() || !url.path().starts_with(endpoint.path()) {
        return Err(MyMobileApiError::PathOutsideEndpoint(path.to_owned()));
    }
    Ok(url)
}

fn encode_body<B>(body: Option<&B>) -> Result<Option<String>, MyMobileApiError>
where
    B: Serialize + ?Sized,
{
    let Some(body) = body else {
        return Ok(None);
    };
    let json = serde_json::to_string(body).map_err(MyMobileApiError::Encode)?;
    if json == "null" {
        return Ok(None);
    }
    Ok(Some(json))
}

fn decode_json<R: DeserializeOwned>(body: &str) -> Result<R, MyMobileApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|err| MyMobileApiError::Parse(Box::new(err)))
}

fn dump_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if name == AUTHORIZATION {
                "<redacted>"
            } else {
                value.to_str().unwrap_or("<binary>")
            };
            format!("{name}: {value}\n")
        })
        .collect()
}

fn dump_request(request: &HttpRequest) -> String {
    format!(
        "{} {}\n{}\n{}",
        request.method,
        request.url,
        dump_headers(&request.headers),
        request.body.as_deref().unwrap_or_default()
    )
}

fn dump_response(response: &HttpResponse) -> String {
    format!(
        "{}\n{}\n{}",
        response.status,
        dump_headers(&response.headers),
        response.body
    )
}
