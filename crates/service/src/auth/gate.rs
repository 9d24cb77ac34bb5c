use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::{debug, instrument};

use super::domain::{AuthIdentity, ExpectedCredentials};
use super::errors::AuthRejection;

/// HTTP Basic gate checked before every store operation.
///
/// Fails closed: without configured credentials every request is rejected.
#[derive(Debug, Clone)]
pub struct CredentialGate {
    expected: Option<ExpectedCredentials>,
}

impl CredentialGate {
    pub fn new(expected: Option<ExpectedCredentials>) -> Self {
        Self { expected }
    }

    pub fn is_configured(&self) -> bool {
        self.expected.is_some()
    }

    /// Check a raw `Authorization` header value.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{CredentialGate, ExpectedCredentials, AuthRejection};
    /// let gate = CredentialGate::new(Some(ExpectedCredentials { username: "admin".into(), password: "password123".into() }));
    /// // base64("admin:password123")
    /// let ok = gate.authorize(Some("Basic YWRtaW46cGFzc3dvcmQxMjM=".as_bytes())).unwrap();
    /// assert_eq!(ok.username, "admin");
    /// // base64("admin:wrongpass")
    /// assert_eq!(gate.authorize(Some("Basic YWRtaW46d3JvbmdwYXNz".as_bytes())), Err(AuthRejection::InvalidCredential));
    /// ```
    #[instrument(level = "debug", skip_all)]
    pub fn authorize(&self, header: Option<&[u8]>) -> Result<AuthIdentity, AuthRejection> {
        let header = header.ok_or(AuthRejection::MissingCredential)?;
        let (username, password) = decode_basic(header)?;

        let expected = self.expected.as_ref().ok_or(AuthRejection::NotConfigured)?;

        // Non-short-circuiting `&`: both fields are always compared.
        let user_ok = constant_time_eq(username.as_bytes(), expected.username.as_bytes());
        let pass_ok = constant_time_eq(password.as_bytes(), expected.password.as_bytes());
        if !(user_ok & pass_ok) {
            return Err(AuthRejection::InvalidCredential);
        }

        debug!(%username, "basic credentials accepted");
        Ok(AuthIdentity { username })
    }
}

/// Split `Basic <base64(user:pass)>` into its two halves, on the first `:`.
fn decode_basic(header: &[u8]) -> Result<(String, String), AuthRejection> {
    let value = std::str::from_utf8(header).map_err(|_| AuthRejection::MalformedCredential)?;
    let (scheme, param) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthRejection::MalformedCredential)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthRejection::MalformedCredential);
    }

    let decoded = STANDARD
        .decode(param.trim())
        .map_err(|_| AuthRejection::MalformedCredential)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthRejection::MalformedCredential)?;

    let (username, password) = decoded.split_once(':').ok_or(AuthRejection::MalformedCredential)?;
    Ok((username.to_string(), password.to_string()))
}

/// Equality whose running time depends only on the input lengths.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let len = a.len().max(b.len());
    let mut diff = a.len() ^ b.len();
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= usize::from(x ^ y);
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> CredentialGate {
        CredentialGate::new(Some(ExpectedCredentials { username: "admin".into(), password: "password123".into() }))
    }

    fn basic(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn valid_pair_is_accepted() {
        let id = gate().authorize(Some(basic("admin:password123").as_bytes())).unwrap();
        assert_eq!(id, AuthIdentity { username: "admin".into() });
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let header = format!("bAsIc {}", STANDARD.encode("admin:password123"));
        assert!(gate().authorize(Some(header.as_bytes())).is_ok());
    }

    #[test]
    fn missing_header_is_rejected() {
        assert_eq!(gate().authorize(None), Err(AuthRejection::MissingCredential));
    }

    #[test]
    fn malformed_headers_are_rejected() {
        let g = gate();
        let bearer = format!("Bearer {}", STANDARD.encode("admin:password123"));
        let no_colon = basic("adminpassword123");
        for header in [
            "Basic",
            "Basic !!!not-base64!!!",
            bearer.as_str(),
            no_colon.as_str(),
            "",
        ] {
            assert_eq!(g.authorize(Some(header.as_bytes())), Err(AuthRejection::MalformedCredential), "{header:?}");
        }
        let not_utf8 = format!("Basic {}", STANDARD.encode([0xff, 0xfe, b':', b'x']));
        assert_eq!(g.authorize(Some(not_utf8.as_bytes())), Err(AuthRejection::MalformedCredential));
        assert_eq!(g.authorize(Some(&[0xff, 0x00][..])), Err(AuthRejection::MalformedCredential));
    }

    #[test]
    fn wrong_identity_or_secret_is_rejected() {
        let g = gate();
        for raw in ["admin:wrongpass", "root:password123", "admin:", ":password123", "admin:password1234"] {
            assert_eq!(g.authorize(Some(basic(raw).as_bytes())), Err(AuthRejection::InvalidCredential), "{raw}");
        }
    }

    #[test]
    fn password_may_contain_colons() {
        let g = CredentialGate::new(Some(ExpectedCredentials { username: "svc".into(), password: "a:b:c".into() }));
        assert!(g.authorize(Some(basic("svc:a:b:c").as_bytes())).is_ok());
    }

    #[test]
    fn unconfigured_gate_fails_closed() {
        let g = CredentialGate::new(None);
        assert!(!g.is_configured());
        assert_eq!(g.authorize(Some(basic("admin:password123").as_bytes())), Err(AuthRejection::NotConfigured));
        assert_eq!(g.authorize(None), Err(AuthRejection::MissingCredential));
    }

    #[test]
    fn constant_time_eq_matches_plain_equality() {
        assert!(constant_time_eq(b"secret", b"secret"));
        assert!(!constant_time_eq(b"secret", b"secreT"));
        assert!(!constant_time_eq(b"secret", b"secret!"));
        assert!(!constant_time_eq(b"", b"x"));
        assert!(constant_time_eq(b"", b""));
    }
}
