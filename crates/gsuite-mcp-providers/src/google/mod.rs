//! Google Calendar and Gmail integration.
//!
//! Layering, bottom to top:
//! - [`config`]: OAuth credentials and provider settings
//! - [`tokens`]: file-backed token persistence
//! - [`oauth`]: the PKCE authorization flow and token refresh
//! - [`auth`]: glue that hands out fresh access tokens
//! - [`calendar`] / [`gmail`]: authenticated REST clients
//! - [`mime`]: outgoing mail construction

pub mod auth;
pub mod calendar;
pub mod config;
pub mod gmail;
pub mod mime;
pub mod oauth;
pub mod tokens;

pub use auth::Authenticator;
pub use calendar::{CalendarClient, CalendarEvent, EventDraft};
pub use config::{GoogleConfig, OAuthCredentials};
pub use gmail::{GmailClient, MailMessage, MessageSummary};
pub use mime::MailDraft;
pub use oauth::OAuthClient;
pub use tokens::{TokenInfo, TokenStorage};
