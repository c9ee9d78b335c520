//! AK/SK request signing (SDK-HMAC-SHA256)
//!
//! Canonical request:
//!
//! ```text
//! METHOD \n URI \n Query \n Headers \n SignedHeaders \n hex(sha256(body))
//! ```
//!
//! The canonical URI always ends with `/`. The string to sign is
//! `SDK-HMAC-SHA256 \n X-Sdk-Date \n hex(sha256(canonical request))`.

use crate::error::{IamError, Result};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::{Digest, Sha256};

pub const ALGORITHM: &str = "SDK-HMAC-SHA256";
pub const DATE_HEADER: &str = "X-Sdk-Date";
const DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

type HmacSha256 = Hmac<Sha256>;

/// Headers to attach to a signed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub host: String,
    pub date: String,
    pub authorization: String,
}

/// Signs requests with an access key / secret key pair
pub struct Signer<'a> {
    access_key: &'a str,
    secret_key: &'a str,
}

impl<'a> Signer<'a> {
    pub fn new(access_key: &'a str, secret_key: &'a str) -> Self {
        Self {
            access_key,
            secret_key,
        }
    }

    pub fn sign(
        &self,
        method: &str,
        url: &Url,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<SignedHeaders> {
        let host = host_header(url);
        let date = now.format(DATE_FORMAT).to_string();
        let headers = [("host", host.as_str()), ("x-sdk-date", date.as_str())];
        let signed_headers = headers
            .iter()
            .map(|(k, _)| *k)
            .collect::<Vec<_>>()
            .join(";");

        let canonical = canonical_request(method, url, &headers, &signed_headers, body);
        let string_to_sign = format!(
            "{}\n{}\n{}",
            ALGORITHM,
            date,
            sha256_hex(canonical.as_bytes())
        );
        let signature = self.signature(&string_to_sign)?;

        Ok(SignedHeaders {
            host,
            date,
            authorization: format!(
                "{} Access={}, SignedHeaders={}, Signature={}",
                ALGORITHM, self.access_key, signed_headers, signature
            ),
        })
    }

    fn signature(&self, string_to_sign: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .map_err(|e| IamError::Signing(e.to_string()))?;
        mac.update(string_to_sign.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

/// `headers` must be lowercase and sorted by name
pub fn canonical_request(
    method: &str,
    url: &Url,
    headers: &[(&str, &str)],
    signed_headers: &str,
    body: &[u8],
) -> String {
    let canonical_headers: String = headers
        .iter()
        .map(|(k, v)| format!("{}:{}\n", k, v.trim()))
        .collect();

    format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        method.to_ascii_uppercase(),
        canonical_uri(url),
        canonical_query(url),
        canonical_headers,
        signed_headers,
        sha256_hex(body)
    )
}

/// Path with every segment escaped and a trailing `/`
pub fn canonical_uri(url: &Url) -> String {
    let mut uri: String = url
        .path()
        .split('/')
        .map(|segment| {
            let raw = urlencoding::decode_binary(segment.as_bytes());
            urlencoding::encode_binary(&raw).into_owned()
        })
        .collect::<Vec<_>>()
        .join("/");
    if !uri.ends_with('/') {
        uri.push('/');
    }
    uri
}

/// Query pairs escaped and sorted by key, then value
pub fn canonical_query(url: &Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            (
                urlencoding::encode(&k).into_owned(),
                urlencoding::encode(&v).into_owned(),
            )
        })
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_canonical_uri_appends_slash() {
        let url = Url::parse("https://iam.ru-moscow-1.hc.sbercloud.ru/v3/projects").unwrap();
        assert_eq!(canonical_uri(&url), "/v3/projects/");

        let url = Url::parse("https://iam.ru-moscow-1.hc.sbercloud.ru/v3/projects/").unwrap();
        assert_eq!(canonical_uri(&url), "/v3/projects/");
    }

    #[test]
    fn test_canonical_query_sorted_and_escaped() {
        let url =
            Url::parse("https://iam.example/v3/projects?name=ru-moscow-1_a b&domain_id=x").unwrap();
        assert_eq!(canonical_query(&url), "domain_id=x&name=ru-moscow-1_a%20b");
    }

    #[test]
    fn test_canonical_request_layout() {
        let url = Url::parse("https://iam.example/v3/projects?name=ru-moscow-1").unwrap();
        let headers = [("host", "iam.example"), ("x-sdk-date", "20261018T093000Z")];

        let canonical = canonical_request("get", &url, &headers, "host;x-sdk-date", b"");
        let lines: Vec<_> = canonical.split('\n').collect();
        assert_eq!(lines[0], "GET");
        assert_eq!(lines[1], "/v3/projects/");
        assert_eq!(lines[2], "name=ru-moscow-1");
        assert_eq!(lines[3], "host:iam.example");
        assert_eq!(lines[4], "x-sdk-date:20261018T093000Z");
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "host;x-sdk-date");
        // sha256 of the empty body
        assert_eq!(
            lines[7],
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sign_headers() {
        let url = Url::parse("http://127.0.0.1:8080/v3/projects?name=ru-moscow-1").unwrap();
        let signed = Signer::new("AK", "SK").sign("GET", &url, b"", fixed_now()).unwrap();

        assert_eq!(signed.host, "127.0.0.1:8080");
        assert_eq!(signed.date, "20261018T093000Z");
        assert!(signed.authorization.starts_with(
            "SDK-HMAC-SHA256 Access=AK, SignedHeaders=host;x-sdk-date, Signature="
        ));
        let signature = signed.authorization.rsplit('=').next().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_signature_depends_on_secret_and_request() {
        let url = Url::parse("https://iam.example/v3/projects?name=a").unwrap();
        let other_url = Url::parse("https://iam.example/v3/projects?name=b").unwrap();

        let base = Signer::new("AK", "SK").sign("GET", &url, b"", fixed_now()).unwrap();
        let again = Signer::new("AK", "SK").sign("GET", &url, b"", fixed_now()).unwrap();
        let other_secret = Signer::new("AK", "SK2")
            .sign("GET", &url, b"", fixed_now())
            .unwrap();
        let other_query = Signer::new("AK", "SK")
            .sign("GET", &other_url, b"", fixed_now())
            .unwrap();

        assert_eq!(base, again);
        assert_ne!(base.authorization, other_secret.authorization);
        assert_ne!(base.authorization, other_query.authorization);
    }

    #[test]
    fn test_canonical_uri_escapes_segments() {
        let url = Url::parse("https://iam.example/v3/a b/c~d").unwrap();
        assert_eq!(canonical_uri(&url), "/v3/a%20b/c~d/");

        // escapes that are not valid UTF-8 survive byte for byte
        let url = Url::parse("https://iam.example/v3%FF/projects").unwrap();
        assert_eq!(canonical_uri(&url), "/v3%FF/projects/");
    }
}
