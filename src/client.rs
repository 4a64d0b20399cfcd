use ureq::http::{self, HeaderValue};
use ureq::tls::{TlsConfig, TlsProvider};

use crate::api::{ErrorBody, SyncRequest, SYNC_JOB_LISTINGS};
use crate::config::Credentials;
use log::{debug, info};
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};

/// Upper bound on the whole request, including connect and body transfer
const TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for Supabase RPC client operations
#[derive(Debug)]
pub enum ClientError {
    /// Error from the HTTP client (DNS, TLS, timeout, ...)
    HttpError(ureq::Error),
    /// Error serializing the request body
    ParseError(serde_json::Error),
    /// The service key can't be sent as a header value
    InvalidKey,
    /// The RPC answered with status >= 400
    UploadFailed { status: u16, body: ErrorBody },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::HttpError(e) => write!(f, "HTTP error: {}", e),
            ClientError::ParseError(e) => write!(f, "Parse error: {}", e),
            ClientError::InvalidKey => write!(
                f,
                "Service role key contains characters that are not allowed in \
                 an HTTP header"
            ),
            ClientError::UploadFailed { status, body } => write!(
                f,
                "Supabase {SYNC_JOB_LISTINGS} RPC failed with status {status}: \
                 {body}"
            ),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ClientError::HttpError(e) => Some(e),
            ClientError::ParseError(e) => Some(e),
            ClientError::InvalidKey | ClientError::UploadFailed { .. } => None,
        }
    }
}

impl From<ureq::Error> for ClientError {
    fn from(err: ureq::Error) -> Self {
        ClientError::HttpError(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::ParseError(err)
    }
}

/// Client for the Supabase PostgREST RPC endpoint
pub struct Client {
    /// HTTP agent for making requests
    agent: ureq::Agent,
    /// Full URL of the `sync_job_listings` RPC
    rpc_url: String,
    /// `apikey` header value
    api_key: HeaderValue,
    /// Authorization header value
    auth: HeaderValue,
}

impl Client {
    /// Create a new client that only talks HTTPS
    pub fn new(credentials: Credentials) -> Result<Self, ClientError> {
        Self::with_https_only(credentials, true)
    }

    /// Create a client that also accepts plain `http://` base URLs, for
    /// talking to a local mock server.
    #[cfg(test)]
    pub fn plaintext(credentials: Credentials) -> Result<Self, ClientError> {
        Self::with_https_only(credentials, false)
    }

    fn with_https_only(
        credentials: Credentials,
        https_only: bool,
    ) -> Result<Self, ClientError> {
        let Credentials {
            base_url,
            service_role_key,
        } = credentials;

        let mut api_key = HeaderValue::try_from(service_role_key.as_str())
            .map_err(|_| ClientError::InvalidKey)?;
        api_key.set_sensitive(true);
        let mut auth =
            HeaderValue::try_from(format!("Bearer {service_role_key}"))
                .map_err(|_| ClientError::InvalidKey)?;
        auth.set_sensitive(true);

        let config = ureq::config::Config::builder()
            .https_only(https_only)
            // Read the error body ourselves instead of getting a bare
            // StatusCode error back
            .http_status_as_error(false)
            .timeout_global(Some(TIMEOUT))
            .tls_config(
                TlsConfig::builder().provider(TlsProvider::NativeTls).build(),
            )
            .build();
        let agent = ureq::Agent::new_with_config(config);

        Ok(Self {
            agent,
            rpc_url: rpc_url(&base_url),
            api_key,
            auth,
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Replace the listings snapshot with the records in `request`.
    ///
    /// Makes exactly one attempt. Any status >= 400 is an error.
    pub fn sync_job_listings(
        &self,
        request: &SyncRequest,
    ) -> Result<(), ClientError> {
        // Compact body; ureq's `send_json` would pretty-print it
        let payload = serde_json::to_vec(request)?;

        // Start timing the request
        let start_time = Instant::now();

        debug!("POST {} with {} records", self.rpc_url, request.len());
        let response = self
            .agent
            .post(&self.rpc_url)
            .header("apikey", self.api_key.clone())
            .header(http::header::AUTHORIZATION, self.auth.clone())
            .header(http::header::CONTENT_TYPE, "application/json")
            .header(http::header::ACCEPT, "application/json")
            .send(&payload[..])?;

        let status = response.status();
        let mut body = response.into_body();
        let response_size = body.content_length().unwrap_or(0);

        let duration = start_time.elapsed();
        info!(
            "{SYNC_JOB_LISTINGS}: request completed in {duration:?} with \
             status {} and response size of {response_size} bytes",
            status.as_u16(),
        );

        if status.as_u16() >= 400 {
            // Proxies may answer in any charset; keep the status either way
            let bytes = body.read_to_vec()?;
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Err(ClientError::UploadFailed {
                status: status.as_u16(),
                body: ErrorBody::parse(text),
            });
        }

        Ok(())
    }
}

/// Build the RPC URL from the project base URL.
fn rpc_url(base_url: &str) -> String {
    format!(
        "{}/rest/v1/rpc/{SYNC_JOB_LISTINGS}",
        base_url.trim_end_matches('/')
    )
}

// --- Tests ---
