//! Access token management.
//!
//! [`Authenticator`] ties together the token storage and the OAuth client:
//! it hands out a fresh access token for API calls, refreshing behind the
//! scenes when the stored one has expired.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};

use super::config::GoogleConfig;
use super::oauth::OAuthClient;
use super::tokens::TokenStorage;

/// Manages OAuth tokens for the configured Google account.
#[derive(Debug)]
pub struct Authenticator {
    config: GoogleConfig,
    storage: TokenStorage,
    oauth: OAuthClient,
}

impl Authenticator {
    /// Creates an authenticator, loading any previously stored tokens.
    pub fn new(config: GoogleConfig) -> ProviderResult<Self> {
        config.validate()?;
        let storage = TokenStorage::new(&config.token_path);
        storage.load()?;
        let oauth = OAuthClient::new(config.credentials.clone(), config.timeout)?;
        Ok(Self {
            config,
            storage,
            oauth,
        })
    }

    /// Returns true if stored tokens cover the configured scopes.
    pub fn is_authorized(&self) -> bool {
        !self.storage.needs_reauth(&self.config.scopes)
    }

    /// Runs the interactive browser flow and stores the resulting tokens.
    pub async fn authorize_interactive(&self) -> ProviderResult<()> {
        let tokens = self
            .oauth
            .authorize(&self.config.scopes, self.config.loopback_port_range)
            .await?;
        self.storage.set(tokens)?;
        info!("authorization complete, tokens stored");
        Ok(())
    }

    /// Returns a valid access token, refreshing it first if expired.
    ///
    /// # Errors
    ///
    /// Fails with an authentication error when no tokens are stored, when
    /// the granted scopes no longer cover the configured ones, or when the
    /// refresh is rejected.
    pub async fn access_token(&self) -> ProviderResult<String> {
        let tokens = self.storage.get().ok_or_else(|| {
            ProviderError::authentication("not authorized yet; run `gsuite-mcp auth` first")
        })?;

        if !tokens.has_scopes(&self.config.scopes) {
            return Err(ProviderError::authentication(
                "granted scopes are out of date; run `gsuite-mcp auth --force`",
            ));
        }

        if !tokens.is_expired() {
            return Ok(tokens.access_token);
        }

        let refresh_token = tokens.refresh_token.as_deref().ok_or_else(|| {
            ProviderError::authentication(
                "access token expired and no refresh token stored; run `gsuite-mcp auth --force`",
            )
        })?;

        debug!("access token expired, refreshing");
        let (access_token, expires_in) = self.oauth.refresh_token(refresh_token).await?;
        self.storage
            .update_access_token(access_token.clone(), expires_in)?;
        Ok(access_token)
    }

    /// Drops stored tokens from memory and disk.
    pub fn revoke_local(&self) -> ProviderResult<()> {
        self.storage.clear()
    }

    /// Returns the token storage path.
    pub fn token_path(&self) -> &Path {
        self.storage.path()
    }

    /// Returns the provider configuration.
    pub fn config(&self) -> &GoogleConfig {
        &self.config
    }
}
