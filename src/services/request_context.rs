//! Device and location detection for submitted transactions.
//!
//! Clients may send `device_id` and `location` explicitly. Otherwise the
//! device falls back to the `User-Agent` header and the location to a
//! geolocation lookup of the client IP.

use std::net::IpAddr;

use axum::http::{HeaderMap, header};
use serde::Deserialize;

/// Value recorded when a device or location cannot be determined.
///
/// `Unknown` is on the default suspicious-location list, so unresolvable
/// locations are flagged.
pub const UNKNOWN: &str = "Unknown";

/// Device identifier for a transaction.
///
/// Precedence: explicit body value, `User-Agent` header, [`UNKNOWN`].
pub fn device_id(explicit: Option<String>, headers: &HeaderMap) -> String {
    non_blank(explicit)
        .or_else(|| {
            headers
                .get(header::USER_AGENT)
                .and_then(|h| h.to_str().ok())
                .map(|ua| ua.chars().take(100).collect())
        })
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Client IP as reported by a fronting proxy.
///
/// Uses the first entry of `X-Forwarded-For`, then `X-Real-IP`. Values that
/// do not parse as an IP address are ignored.
pub fn client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok());

    forwarded.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
struct GeoLookup {
    city: Option<String>,
}

/// Resolves the city a transaction originates from.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    /// e.g. `https://ipinfo.io/{ip}/json`; the response must carry a `city` field
    url_template: Option<String>,
    http: reqwest::Client,
}

impl LocationResolver {
    pub fn new(url_template: Option<String>, http: reqwest::Client) -> Self {
        Self { url_template, http }
    }

    /// Location for a transaction.
    ///
    /// Precedence: explicit body value, geolocation of the client IP, [`UNKNOWN`].
    /// Lookup failures are logged and never fail the request.
    pub async fn resolve(&self, explicit: Option<String>, headers: &HeaderMap) -> String {
        if let Some(location) = non_blank(explicit) {
            return location;
        }

        let (Some(template), Some(ip)) = (&self.url_template, client_ip(headers)) else {
            return UNKNOWN.to_string();
        };

        match self.lookup(template, ip).await {
            Ok(Some(city)) => city,
            Ok(None) => UNKNOWN.to_string(),
            Err(e) => {
                tracing::warn!(ip = %ip, error = %e, "Geolocation lookup failed");
                UNKNOWN.to_string()
            }
        }
    }

    async fn lookup(&self, template: &str, ip: IpAddr) -> Result<Option<String>, reqwest::Error> {
        let url = template.replace("{ip}", &ip.to_string());
        let lookup: GeoLookup = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(lookup
            .city
            .filter(|c| !c.trim().is_empty())
            .map(|c| c.chars().take(100).collect()))
    }
}
