//! RSASSA-PKCS1-v1_5 / SHA-256 webhook signature verification.

use base64::{Engine, engine::general_purpose::STANDARD};
use rsa::RsaPublicKey;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use sha2::Sha256;

use crate::envelope::WebhookEnvelope;
use crate::key_cache::PublicKeyMaterial;

/// Parse an RSA public key from SPKI (`BEGIN PUBLIC KEY`) or PKCS#1
/// (`BEGIN RSA PUBLIC KEY`) PEM.
pub fn parse_public_key(pem: &str) -> Option<RsaPublicKey> {
    let pem = pem.trim();
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .ok()
}

/// Verify `envelope` against `key`.
///
/// Returns `true` only on cryptographic success. A malformed key, an
/// undecodable signature, and a mismatch all yield `false`.
pub fn verify(envelope: &WebhookEnvelope, key: &PublicKeyMaterial) -> bool {
    let Some(public_key) = key.public_key() else {
        tracing::error!("Webhook signing key is not a valid RSA public key");
        return false;
    };

    let Ok(signature_bytes) = STANDARD.decode(envelope.signature_b64.trim()) else {
        return false;
    };
    let Ok(signature) = Signature::try_from(signature_bytes.as_slice()) else {
        return false;
    };

    VerifyingKey::<Sha256>::new(public_key.clone())
        .verify(&envelope.signed_payload(), &signature)
        .is_ok()
}
