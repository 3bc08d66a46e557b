//! One-shot device location lookup
//!
//! A terminal has no GPS, so position comes from a geo-IP lookup. The
//! caller runs this on a worker thread and consumes exactly one sample;
//! the request is never repeated once a coordinate is attached.

use crate::model::submission::Coordinate;
use serde::Deserialize;
use std::time::Duration;

const LOOKUP_URL: &str = "http://ip-api.com/json";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct LookupResponse {
    lat: f64,
    lon: f64,
}

/// Resolve the device's current position
pub fn current_location() -> Result<Coordinate, String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(LOOKUP_TIMEOUT)
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

    let response = client
        .get(LOOKUP_URL)
        .send()
        .map_err(|e| format!("Location lookup failed: {}", e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("Location service returned {}", status));
    }

    let body = response
        .text()
        .map_err(|e| format!("Location lookup failed: {}", e))?;

    parse_lookup(&body)
}

fn parse_lookup(body: &str) -> Result<Coordinate, String> {
    let parsed: LookupResponse = serde_json::from_str(body)
        .map_err(|e| format!("Invalid location response: {}", e))?;

    if !(-90.0..=90.0).contains(&parsed.lat) || !(-180.0..=180.0).contains(&parsed.lon) {
        return Err("Location lookup returned out-of-range coordinates".to_string());
    }

    Ok(Coordinate::new(parsed.lat, parsed.lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lookup_valid() {
        let body = r#"{"status":"success","lat":18.4655,"lon":-66.1057,"city":"San Juan"}"#;
        let coordinate = parse_lookup(body).unwrap();
        assert_eq!(coordinate, Coordinate::new(18.4655, -66.1057));
    }

    #[test]
    fn test_parse_lookup_rejects_garbage() {
        assert!(parse_lookup("not json").is_err());
        assert!(parse_lookup(r#"{"lat": 12.0}"#).is_err());
    }

    #[test]
    fn test_parse_lookup_rejects_out_of_range() {
        let body = r#"{"lat": 412.0, "lon": -66.0}"#;
        let err = parse_lookup(body).unwrap_err();
        assert!(err.contains("out-of-range"));
    }
}
