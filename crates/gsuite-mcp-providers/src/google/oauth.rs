//! OAuth 2.0 PKCE flow for Google APIs.
//!
//! Authorization Code flow with the PKCE extension (RFC 7636), using a
//! loopback redirect for desktop use:
//!
//! 1. Generate a random code verifier and its SHA-256 challenge
//! 2. Bind a local HTTP listener on a free port
//! 3. Open the browser at Google's consent page
//! 4. Receive the redirect with the authorization code
//! 5. Exchange code + verifier for access and refresh tokens
//!
//! The listener only accepts loopback connections, and the `state`
//! parameter is checked against CSRF.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng as _;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};

use crate::error::{ProviderError, ProviderResult};

use super::config::OAuthCredentials;
use super::tokens::TokenInfo;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Code verifier entropy in bytes (64 base64url characters once encoded).
const CODE_VERIFIER_BYTES: usize = 48;

/// How long to wait for the user to finish the consent screen.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// OAuth client for Google APIs.
///
/// Handles the PKCE authorization flow and token refresh.
#[derive(Debug)]
pub struct OAuthClient {
    credentials: OAuthCredentials,
    http_client: reqwest::Client,
}

impl OAuthClient {
    /// Creates a new OAuth client with the given credentials.
    pub fn new(credentials: OAuthCredentials, timeout: Duration) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            credentials,
            http_client,
        })
    }

    /// Runs the interactive PKCE flow and returns the obtained tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if no port in `port_range` is free, if the user
    /// denies consent or never completes it, or if the token exchange fails.
    pub async fn authorize(
        &self,
        scopes: &[String],
        port_range: (u16, u16),
    ) -> ProviderResult<TokenInfo> {
        let pkce = Pkce::new();

        let (listener, port) = Self::bind_loopback(port_range)?;
        let redirect_uri = format!("http://127.0.0.1:{}/callback", port);

        let auth_url = pkce.auth_url(&self.credentials.client_id, &redirect_uri, scopes);

        info!("starting OAuth flow, opening browser");
        debug!("authorization URL: {}", auth_url);

        if let Err(e) = open::that(&auth_url) {
            warn!("failed to open browser: {}", e);
            eprintln!("\nPlease open this URL in your browser:\n\n{}\n", auth_url);
        }

        let callback = Self::wait_for_callback(listener)?;
        if callback.state != pkce.state {
            return Err(ProviderError::authentication(
                "OAuth state mismatch - possible CSRF attack",
            ));
        }

        info!("received authorization code, exchanging for tokens");
        self.exchange_code(&callback.code, &pkce.verifier, &redirect_uri, scopes)
            .await
    }

    /// Refreshes an expired access token using the refresh token.
    ///
    /// Returns the new access token and its expiry in seconds.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> ProviderResult<(String, Option<i64>)> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let token = self.token_request(&params, "token refresh").await?;
        info!("refreshed access token");
        Ok((token.access_token, token.expires_in))
    }

    /// Exchanges an authorization code for tokens.
    async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
        redirect_uri: &str,
        scopes: &[String],
    ) -> ProviderResult<TokenInfo> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri),
        ];

        let token = self.token_request(&params, "token exchange").await?;
        info!("obtained tokens");
        Ok(TokenInfo::new(
            token.access_token,
            token.refresh_token,
            token.expires_in,
            scopes.to_vec(),
        ))
    }

    async fn token_request(
        &self,
        params: &[(&str, &str)],
        operation: &str,
    ) -> ProviderResult<TokenResponse> {
        let response = self
            .http_client
            .post(GOOGLE_TOKEN_URL)
            .form(params)
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("{} request failed: {}", operation, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::authentication(format!(
                "{} failed ({}): {}",
                operation, status, body
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| ProviderError::invalid_response(format!("invalid token response: {}", e)))
    }

    /// Tries to bind a TCP listener on an available port in the given range.
    fn bind_loopback(port_range: (u16, u16)) -> ProviderResult<(TcpListener, u16)> {
        for port in port_range.0..=port_range.1 {
            if let Ok(listener) = TcpListener::bind(("127.0.0.1", port)) {
                debug!("bound loopback server on port {}", port);
                return Ok((listener, port));
            }
        }
        Err(ProviderError::configuration(format!(
            "no available port in range {}-{}",
            port_range.0, port_range.1
        )))
    }

    /// Waits for the OAuth redirect and extracts code and state.
    fn wait_for_callback(listener: TcpListener) -> ProviderResult<Callback> {
        listener
            .set_nonblocking(false)
            .map_err(|e| ProviderError::internal(format!("failed to set blocking: {}", e)))?;

        let (tx, rx) = mpsc::channel();

        // Accept connections on a separate thread so we can time out here.
        let _handle = thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => {
                        if let Some(result) = Self::handle_connection(stream) {
                            let _ = tx.send(result);
                            return;
                        }
                    }
                    Err(e) => error!("failed to accept connection: {}", e),
                }
            }
        });

        match rx.recv_timeout(CALLBACK_TIMEOUT) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                Err(ProviderError::authentication("OAuth callback timeout"))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(ProviderError::internal("callback channel disconnected"))
            }
        }
    }

    /// Handles one HTTP request on the callback listener.
    ///
    /// Returns None for requests that are not the expected callback (the
    /// browser may probe for favicons and such).
    fn handle_connection(mut stream: TcpStream) -> Option<ProviderResult<Callback>> {
        let mut reader = BufReader::new(&stream);
        let mut request_line = String::new();
        if reader.read_line(&mut request_line).is_err() {
            return None;
        }

        // GET /callback?code=...&state=... HTTP/1.1
        let mut parts = request_line.split_whitespace();
        if parts.next() != Some("GET") {
            return None;
        }
        let path = parts.next()?;
        if !path.starts_with("/callback") {
            return None;
        }

        let query = path.split_once('?').map(|(_, q)| q).unwrap_or("");
        let mut code = None;
        let mut state = None;
        let mut denial = None;
        for param in query.split('&') {
            if let Some((key, value)) = param.split_once('=') {
                let value = urlencoding::decode(value).unwrap_or_default().into_owned();
                match key {
                    "code" => code = Some(value),
                    "state" => state = Some(value),
                    "error" => denial = Some(value),
                    _ => {}
                }
            }
        }

        let response = if denial.is_some() || code.is_none() {
            "HTTP/1.1 400 Bad Request\r\nContent-Type: text/html\r\n\r\n\
            <html><body><h1>Authorization failed</h1>\
            <p>You can close this window.</p></body></html>"
        } else {
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n\
            <html><body><h1>Authorization complete</h1>\
            <p>You can close this window and return to the terminal.</p></body></html>"
        };
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();

        if let Some(reason) = denial {
            return Some(Err(ProviderError::authentication(format!(
                "authorization denied: {}",
                reason
            ))));
        }
        match code {
            Some(code) => Some(Ok(Callback {
                code,
                state: state.unwrap_or_default(),
            })),
            None => Some(Err(ProviderError::authentication(
                "missing authorization code in callback",
            ))),
        }
    }
}

/// Parameters extracted from the OAuth redirect.
struct Callback {
    code: String,
    state: String,
}

/// PKCE verifier/challenge pair plus the CSRF state (RFC 7636).
#[derive(Debug)]
pub struct Pkce {
    /// The code verifier (high-entropy random string).
    pub verifier: String,
    /// The code challenge (SHA-256 of the verifier, base64url encoded).
    pub challenge: String,
    /// Random state for CSRF protection.
    pub state: String,
}

impl Pkce {
    /// Creates a new PKCE exchange with random verifier and state.
    pub fn new() -> Self {
        let verifier = random_urlsafe(CODE_VERIFIER_BYTES);
        let challenge = Self::compute_challenge(&verifier);
        let state = random_urlsafe(16);

        Self {
            verifier,
            challenge,
            state,
        }
    }

    /// Computes the SHA-256 challenge for a code verifier.
    fn compute_challenge(verifier: &str) -> String {
        URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
    }

    /// Builds the Google OAuth authorization URL.
    pub fn auth_url(&self, client_id: &str, redirect_uri: &str, scopes: &[String]) -> String {
        let scope = scopes.join(" ");

        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&\
            code_challenge={}&code_challenge_method=S256&state={}&\
            access_type=offline&prompt=consent",
            GOOGLE_AUTH_URL,
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&scope),
            urlencoding::encode(&self.challenge),
            urlencoding::encode(&self.state),
        )
    }
}

impl Default for Pkce {
    fn default() -> Self {
        Self::new()
    }
}

fn random_urlsafe(bytes: usize) -> String {
    let mut rng = rand::rng();
    let bytes: Vec<u8> = (0..bytes).map(|_| rng.random()).collect();
    URL_SAFE_NO_PAD.encode(&bytes)
}

/// Response from Google's token endpoint.
#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}
