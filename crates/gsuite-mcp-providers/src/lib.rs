//! Google API access for gsuite-mcp.
//!
//! OAuth 2.0 PKCE credential acquisition, file-backed token storage, and
//! authenticated REST clients for the Calendar v3 and Gmail v1 APIs.

mod error;
pub mod google;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
