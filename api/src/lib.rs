//! Server functions shared by the Drawgrid platforms.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

/// Raw session inputs as the hosting request supplied them.
///
/// Nothing here is validated; the `ui` crate decides what a missing value means.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHeaders {
    /// Value of the `authorization` header, with or without a `Bearer ` prefix.
    pub authorization: Option<String>,
    pub city_id: Option<String>,
    pub category_id: Option<String>,
    /// Firestore documents endpoint, taken from the server environment.
    pub documents_url: Option<String>,
}

/// Header carrying the city identifier.
pub const CITY_HEADER: &str = "x-city-id";
/// Header carrying the category-set identifier.
pub const CATEGORY_HEADER: &str = "x-category-id";
/// Server-side environment variable naming the documents endpoint.
pub const DOCUMENTS_URL_ENV: &str = "DRAWGRID_DOCUMENTS_URL";

/// Echo the session headers of the current request back to the client.
///
/// The generated request type is named explicitly; the macro would otherwise derive
/// `SessionHeaders` from the fn name and clash with the payload struct.
#[server(ReadSessionHeaders)]
pub async fn session_headers() -> Result<SessionHeaders, ServerFnError> {
    let ctx = server_context();
    let parts = ctx.request_parts();
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    Ok(SessionHeaders {
        authorization: header("authorization"),
        city_id: header(CITY_HEADER),
        category_id: header(CATEGORY_HEADER),
        documents_url: std::env::var(DOCUMENTS_URL_ENV).ok(),
    })
}
