use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<i64>,
    #[serde(rename = "userId", default)]
    user_id: Option<String>,
}

// No signature check; we only care about the payload claims. This is an
// operational heuristic, not a trust boundary.
fn decode_claims(token: &str) -> Option<Claims> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return None;
    }

    let mut payload = segments[1].to_string();
    let remainder = payload.len() % 4;
    if remainder != 0 {
        payload.push_str(&"=".repeat(4 - remainder));
    }

    let decoded = URL_SAFE.decode(payload.as_bytes()).ok()?;
    serde_json::from_slice(&decoded).ok()
}

pub fn expiry(token: &str) -> Option<DateTime<Utc>> {
    let exp = decode_claims(token)?.exp?;
    DateTime::from_timestamp(exp, 0)
}

pub fn subject_id(token: &str) -> Option<String> {
    decode_claims(token)?.user_id
}

// Treat a token expiring within the next 5 minutes as already expired so it
// can't lapse mid-request.
pub fn is_expired(token: &str) -> bool {
    match expiry(token) {
        Some(expiry) => Utc::now() >= expiry - Duration::minutes(5),
        None => true,
    }
}

#[cfg(test)]
pub(crate) fn make_token(claims: serde_json::Value) -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("header.{}.signature", payload)
}
