//! OCI HTTP request signatures (draft-cavage, `rsa-sha256`).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use once_cell::sync::OnceCell;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha2::{Digest, Sha256};
use std::fmt;
use url::Url;

/// The RSA key is parsed on first use and then reused for every request.
#[derive(Clone)]
pub struct RequestSigner {
    key_id: String,
    private_key_pem: String,
    key: OnceCell<SigningKey<Sha256>>,
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("key_id", &redact_key_id(&self.key_id))
            .finish()
    }
}

fn redact_key_id(key_id: &str) -> String {
    if key_id.starts_with("ST$") {
        "ST$<session-token>".to_string()
    } else {
        key_id.to_string()
    }
}

/// Drops the `OCI_API_KEY` trailer the console appends and unescapes `\n`
/// sequences that survive being passed through an environment variable.
fn normalize_pem(raw: &str) -> String {
    let unescaped = raw.replace("\\n", "\n");
    let trimmed = unescaped.trim();
    match trimmed.rfind("-----END ") {
        Some(end) => match trimmed[end..].find("KEY-----") {
            Some(tail) => trimmed[..end + tail + "KEY-----".len()].to_string(),
            None => trimmed.to_string(),
        },
        None => trimmed.to_string(),
    }
}

pub fn parse_private_key(pem: &str) -> Result<RsaPrivateKey, String> {
    let pem = normalize_pem(pem);
    if pem.contains("ENCRYPTED") {
        return Err("encrypted private keys are not supported; provide an unencrypted PEM".to_string());
    }
    RsaPrivateKey::from_pkcs8_pem(&pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(&pem))
        .map_err(|err| format!("private key is not a valid RSA PEM: {}", err))
}

impl RequestSigner {
    pub fn api_key(tenancy: &str, user: &str, fingerprint: &str, private_key_pem: &str) -> Self {
        Self::with_key_id(format!("{}/{}/{}", tenancy, user, fingerprint), private_key_pem)
    }

    pub fn session_token(token: &str, private_key_pem: &str) -> Result<Self, String> {
        let token = token.trim();
        if token.is_empty() {
            return Err("session token file is empty".to_string());
        }
        Ok(Self::with_key_id(format!("ST${}", token), private_key_pem))
    }

    fn with_key_id(key_id: String, private_key_pem: &str) -> Self {
        Self {
            key_id,
            private_key_pem: private_key_pem.to_string(),
            key: OnceCell::new(),
        }
    }

    fn signing_key(&self) -> Result<&SigningKey<Sha256>, String> {
        self.key
            .get_or_try_init(|| parse_private_key(&self.private_key_pem).map(SigningKey::<Sha256>::new))
    }

    /// Parses the key now instead of on the first request.
    pub fn check_key(&self) -> Result<(), String> {
        self.signing_key().map(|_| ())
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Headers to attach to the request, `authorization` included.
    pub fn sign(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&[u8]>,
    ) -> Result<HeaderMap, String> {
        let host = url
            .host_str()
            .ok_or_else(|| format!("request url has no host: {}", url))?;
        let mut target = url.path().to_string();
        if let Some(query) = url.query() {
            target.push('?');
            target.push_str(query);
        }
        let date = chrono::Utc::now()
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string();

        let mut signed: Vec<(&str, String)> = vec![
            ("date", date),
            (
                "(request-target)",
                format!("{} {}", method.as_str().to_lowercase(), target),
            ),
            ("host", host.to_string()),
        ];
        let has_body = matches!(*method, Method::POST | Method::PUT | Method::PATCH);
        if has_body {
            let bytes = body.unwrap_or_default();
            let digest = BASE64.encode(Sha256::digest(bytes));
            signed.push(("content-length", bytes.len().to_string()));
            signed.push(("content-type", "application/json".to_string()));
            signed.push(("x-content-sha256", digest));
        }

        let signing_string = signed
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("\n");
        let signature = self
            .signing_key()?
            .try_sign(signing_string.as_bytes())
            .map_err(|err| format!("failed to sign request: {}", err))?;
        let header_list = signed
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(" ");
        let authorization = format!(
            "Signature version=\"1\",headers=\"{}\",keyId=\"{}\",algorithm=\"rsa-sha256\",signature=\"{}\"",
            header_list,
            self.key_id,
            BASE64.encode(signature.to_bytes())
        );

        let mut headers = HeaderMap::new();
        for (name, value) in signed.iter() {
            if *name == "(request-target)" || *name == "host" {
                continue;
            }
            let header_name = HeaderName::from_static(*name);
            let header_value = HeaderValue::from_str(value)
                .map_err(|err| format!("invalid {} header: {}", name, err))?;
            headers.insert(header_name, header_value);
        }
        headers.insert(
            reqwest::header::AUTHORIZATION,
            HeaderValue::from_str(&authorization)
                .map_err(|err| format!("invalid authorization header: {}", err))?,
        );
        Ok(headers)
    }
}
