use hmac::{Hmac, Mac};
use rocket::{
    data::{FromData, Outcome, ToByteUnit},
    http::HeaderMap,
    Data, Request,
};
use sha1::Sha1;
use sha2::Sha256;
use thiserror::Error;
use tracing::{trace, warn};

use crate::webhooks::github::{GitHubSecret, WebhookError};

const X_HUB_SIGNATURE: &str = "X-Hub-Signature";
const X_HUB_SIGNATURE_256: &str = "X-Hub-Signature-256";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Sha1,
    Sha256,
}

impl Algorithm {
    fn header(self) -> &'static str {
        match self {
            Self::Sha1 => X_HUB_SIGNATURE,
            Self::Sha256 => X_HUB_SIGNATURE_256,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1=",
            Self::Sha256 => "sha256=",
        }
    }
}

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("request needs exactly one signature header")]
    MissingHeader,
    #[error("{header} doesn't start with `{prefix}`")]
    WrongPrefix {
        header: &'static str,
        prefix: &'static str,
    },
    #[error("couldn't decode hex-encoded signature: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("webhook secret can't be used as a key")]
    InvalidKey,
    #[error("couldn't verify signature")]
    Mismatch,
}

/// A digest as sent by GitHub, not verified yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    algorithm: Algorithm,
    digest: Vec<u8>,
}

impl Signature {
    pub fn parse(algorithm: Algorithm, header: &str) -> Result<Self, SignatureError> {
        // GitHub puts a prefix in front of its hex digest
        let hex_digest =
            header
                .strip_prefix(algorithm.prefix())
                .ok_or(SignatureError::WrongPrefix {
                    header: algorithm.header(),
                    prefix: algorithm.prefix(),
                })?;

        Ok(Self {
            algorithm,
            digest: hex::decode(hex_digest)?,
        })
    }

    /// Picks the SHA-256 signature when GitHub sent both.
    pub fn from_headers(headers: &HeaderMap<'_>) -> Result<Self, SignatureError> {
        for algorithm in [Algorithm::Sha256, Algorithm::Sha1] {
            let values = headers.get(algorithm.header()).collect::<Vec<_>>();
            match values.as_slice() {
                [] => continue,
                [value] => return Self::parse(algorithm, value),
                _ => return Err(SignatureError::MissingHeader),
            }
        }
        trace!("couldn't locate {} header", X_HUB_SIGNATURE);
        Err(SignatureError::MissingHeader)
    }
}

/// Checks `payload` against `signature` in constant time.
pub fn verify(secret: &str, payload: &[u8], signature: &Signature) -> Result<(), SignatureError> {
    trace!("validating signature...");

    let (expected, valid) = match signature.algorithm {
        Algorithm::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(secret.as_bytes())
                .map_err(|_| SignatureError::InvalidKey)?;
            mac.update(payload);
            let expected = mac.clone().finalize().into_bytes().to_vec();
            (expected, mac.verify_slice(&signature.digest).is_ok())
        }
        Algorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
                .map_err(|_| SignatureError::InvalidKey)?;
            mac.update(payload);
            let expected = mac.clone().finalize().into_bytes().to_vec();
            (expected, mac.verify_slice(&signature.digest).is_ok())
        }
    };

    if !valid {
        warn!(
            "{}: want {}, got {}",
            signature.algorithm.header(),
            hex::encode(&signature.digest),
            hex::encode(expected)
        );
        return Err(SignatureError::Mismatch);
    }
    Ok(())
}

/// Raw body of a webhook delivery whose signature checked out. Nothing else is allowed to look
/// at the body before that.
pub struct SignedGitHubPayload(pub Vec<u8>);

fn reject<'r>(error: WebhookError) -> Outcome<'r, SignedGitHubPayload> {
    Outcome::Error((error.status(), error))
}

// Tracking issue for chaining Data guards to avoid reimplementing all this:
// https://github.com/SergioBenitez/Rocket/issues/775
#[rocket::async_trait]
impl<'r> FromData<'r> for SignedGitHubPayload {
    type Error = WebhookError;

    async fn from_data(request: &'r Request<'_>, data: Data<'r>) -> Outcome<'r, Self> {
        trace!("received payload on GitHub webhook endpoint: {:?}", request);

        if !request.content_type().is_some_and(|ct| ct.is_json()) {
            trace!(
                "content type `{:?}` wasn't json, stopping here...",
                request.content_type()
            );
            return reject(WebhookError::ContentType);
        }

        let signature = match Signature::from_headers(request.headers()) {
            Ok(signature) => signature,
            Err(e) => return reject(e.into()),
        };

        let Some(secret) = request.rocket().state::<GitHubSecret>() else {
            return reject(WebhookError::MissingSecret);
        };

        let size_limit = request.limits().get("json").unwrap_or_else(|| 1.mebibytes());
        let content = match data.open(size_limit).into_bytes().await {
            Ok(bytes) if bytes.is_complete() => bytes.into_inner(),
            Ok(_) => {
                trace!("payload was too big");
                return reject(WebhookError::TooLarge);
            }
            Err(e) => return reject(e.into()),
        };

        if let Err(e) = verify(&secret.0, &content, &signature) {
            trace!("signature validation failed, stopping here...");
            return reject(e.into());
        }

        trace!("validated GitHub payload");
        Outcome::Success(SignedGitHubPayload(content))
    }
}

/// Signs `payload` the way GitHub does, for building test deliveries.
#[cfg(test)]
pub(crate) fn sign(algorithm: Algorithm, secret: &str, payload: &[u8]) -> String {
    let digest = match algorithm {
        Algorithm::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(secret.as_bytes()).unwrap();
            mac.update(payload);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
            mac.update(payload);
            mac.finalize().into_bytes().to_vec()
        }
    };
    format!("{}{}", algorithm.prefix(), hex::encode(digest))
}
