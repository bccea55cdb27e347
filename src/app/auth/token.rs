//! Stateless signed bearer tokens.
//!
//! A token is `base64url(json payload) . hex(hmac-sha256(payload))`. The
//! signature covers the full serialized payload and must verify before any
//! field is read; a token that fails any step decodes to `None`, exactly as
//! if it were absent. Most requests legitimately carry no token, so absence
//! is never an error.

use axum::http::{header, HeaderMap, Uri};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Identity fields recovered from an external-provider login handshake.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExternalLogin {
    pub email: String,
    pub provider: String,
}

/// Self-contained session descriptor carried by a bearer token. Fully
/// reconstructible without a store lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenDescriptor {
    pub cookie_value: String,
    pub session_id: String,
    pub email: String,
    pub session_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<ExternalLogin>,
}

/// Serialize and sign a descriptor.
pub fn encode(descriptor: &TokenDescriptor, secret: &[u8]) -> String {
    let payload = serde_json::to_vec(descriptor).expect("descriptor serializes");
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(&payload);
    format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(&payload),
        hex::encode(mac.finalize().into_bytes())
    )
}

/// Verify and deserialize a raw token string. Malformed input or a bad
/// signature yields `None`; no field is touched before the signature checks
/// out.
pub fn decode(raw: &str, secret: &[u8]) -> Option<TokenDescriptor> {
    let (payload_b64, signature_hex) = raw.rsplit_once('.')?;
    let payload = URL_SAFE_NO_PAD.decode(payload_b64).ok()?;
    let expected = hex::decode(signature_hex).ok()?;

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(&payload);
    mac.verify_slice(&expected).ok()?;

    serde_json::from_slice(&payload).ok()
}

/// Pull the bearer token out of its transport locations: the Authorization
/// header first, then a `token` query parameter for clients that cannot set
/// headers.
pub fn extract(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value.to_str().ok()?;
        let token = value.strip_prefix("Bearer ").or_else(|| value.strip_prefix("bearer "))?;
        return Some(token.trim().to_string());
    }

    uri.query()?.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == "token" && !value.is_empty()).then(|| value.to_string())
    })
}

/// Extract and verify in one step: the decode contract of the codec.
pub fn decode_from_request(headers: &HeaderMap, uri: &Uri, secret: &[u8]) -> Option<TokenDescriptor> {
    let raw = extract(headers, uri)?;
    decode(&raw, secret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn descriptor() -> TokenDescriptor {
        TokenDescriptor {
            cookie_value: "abc.def".to_string(),
            session_id: "01ARZ3NDEKTSV4RRFFQ69G5FAV".to_string(),
            email: "who@example.com".to_string(),
            session_name: "session_id".to_string(),
            external: None,
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let token = encode(&descriptor(), b"secret");
        let decoded = decode(&token, b"secret").unwrap();
        assert_eq!(decoded, descriptor());
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = encode(&descriptor(), b"secret");
        assert_eq!(decode(&token, b"other-secret"), None);
    }

    #[test]
    fn tampered_payload_rejected() {
        let token = encode(&descriptor(), b"secret");
        let (payload, signature) = token.rsplit_once('.').unwrap();

        let mut altered = descriptor();
        altered.email = "attacker@example.com".to_string();
        let altered_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&altered).unwrap());
        assert_ne!(altered_payload, payload);

        let forged = format!("{}.{}", altered_payload, signature);
        assert_eq!(decode(&forged, b"secret"), None);
    }

    #[test]
    fn malformed_tokens_rejected() {
        assert_eq!(decode("", b"secret"), None);
        assert_eq!(decode("nodothere", b"secret"), None);
        assert_eq!(decode("notbase64!!.abcd", b"secret"), None);
    }

    #[test]
    fn external_login_survives_round_trip() {
        let mut d = descriptor();
        d.external = Some(ExternalLogin {
            email: "who@provider.example".to_string(),
            provider: "google".to_string(),
        });
        let token = encode(&d, b"secret");
        assert_eq!(decode(&token, b"secret").unwrap().external, d.external);
    }

    #[test]
    fn extract_prefers_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer header-token"),
        );
        let uri: Uri = "/anything?token=query-token".parse().unwrap();
        assert_eq!(extract(&headers, &uri).as_deref(), Some("header-token"));
    }

    #[test]
    fn extract_falls_back_to_query() {
        let headers = HeaderMap::new();
        let uri: Uri = "/anything?other=1&token=query-token".parse().unwrap();
        assert_eq!(extract(&headers, &uri).as_deref(), Some("query-token"));
    }

    #[test]
    fn extract_absent() {
        let headers = HeaderMap::new();
        let uri: Uri = "/anything".parse().unwrap();
        assert_eq!(extract(&headers, &uri), None);
    }
}
