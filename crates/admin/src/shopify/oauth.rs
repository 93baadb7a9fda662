//! OAuth callback signature verification.
//!
//! Shopify signs the install redirect with HMAC-SHA256 over the query
//! parameters (minus `hmac` and `signature`), sorted by key and joined as
//! `key=value` pairs with `&`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Parameters excluded from the signed message.
const UNSIGNED_PARAMS: &[&str] = &["hmac", "signature"];

/// Build the message Shopify signs from decoded query pairs.
fn signed_message<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut pairs: Vec<(&str, &str)> = pairs
        .into_iter()
        .filter(|(k, _)| !UNSIGNED_PARAMS.contains(k))
        .collect();
    pairs.sort_unstable();

    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Verify the `hmac` parameter of an OAuth callback.
///
/// Returns `false` if the parameter is missing, not hex, or does not match.
/// The comparison is constant-time.
#[must_use]
pub fn verify_callback_hmac<'a, I>(pairs: I, client_secret: &str) -> bool
where
    I: IntoIterator<Item = (&'a str, &'a str)> + Clone,
{
    let Some(provided) = pairs
        .clone()
        .into_iter()
        .find(|(k, _)| *k == "hmac")
        .map(|(_, v)| v)
    else {
        return false;
    };
    let Ok(provided) = hex::decode(provided) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(client_secret.as_bytes()) else {
        return false;
    };
    mac.update(signed_message(pairs).as_bytes());
    mac.verify_slice(&provided).is_ok()
}

/// Sign query pairs the way Shopify does. Used to build test callbacks.
#[must_use]
pub fn sign_callback<'a, I>(pairs: I, client_secret: &str) -> Option<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut mac = HmacSha256::new_from_slice(client_secret.as_bytes()).ok()?;
    mac.update(signed_message(pairs).as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "hush";

    #[test]
    fn test_signed_message_sorts_and_skips_hmac() {
        let message = signed_message([
            ("timestamp", "1337178173"),
            ("hmac", "ignored"),
            ("code", "0907a61c0c8d55e99db179b68161bc00"),
            ("shop", "some-shop.myshopify.com"),
        ]);
        assert_eq!(
            message,
            "code=0907a61c0c8d55e99db179b68161bc00&shop=some-shop.myshopify.com&timestamp=1337178173"
        );
    }

    #[test]
    fn test_verify_round_trip() {
        let base = [
            ("code", "abc"),
            ("shop", "pineapple.myshopify.com"),
            ("state", "s-1"),
            ("timestamp", "1700000000"),
        ];
        let hmac = sign_callback(base, SECRET).unwrap();

        let mut pairs: Vec<(&str, &str)> = base.to_vec();
        pairs.push(("hmac", &hmac));
        assert!(verify_callback_hmac(pairs.iter().copied(), SECRET));
        assert!(!verify_callback_hmac(pairs.iter().copied(), "other secret"));
    }

    #[test]
    fn test_verify_rejects_tampered_params() {
        let base = [("code", "abc"), ("shop", "pineapple.myshopify.com")];
        let hmac = sign_callback(base, SECRET).unwrap();

        let tampered = [
            ("code", "abc"),
            ("shop", "evil.myshopify.com"),
            ("hmac", hmac.as_str()),
        ];
        assert!(!verify_callback_hmac(tampered, SECRET));
    }

    #[test]
    fn test_verify_rejects_missing_or_malformed_hmac() {
        assert!(!verify_callback_hmac([("code", "abc")], SECRET));
        assert!(!verify_callback_hmac(
            [("code", "abc"), ("hmac", "not-hex")],
            SECRET
        ));
    }
}
