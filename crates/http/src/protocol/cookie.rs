//! Cookies rendered in the `Set-Cookie` wire form.

use std::fmt;

use http::HeaderValue;

use crate::protocol::ResponseError;

/// The `SameSite` attribute of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// A cookie to be sent with a response.
///
/// `Display` produces the `Set-Cookie` value:
/// `name=value; Path=/; Domain=example.com; Max-Age=60; Secure; HttpOnly; SameSite=Lax`,
/// with each attribute present only when it was set.
///
/// ```
/// use oneshot_http::protocol::Cookie;
///
/// let cookie = Cookie::new("session", "abc").path("/").http_only(true);
/// assert_eq!(cookie.to_string(), "session=abc; Path=/; HttpOnly");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
    path: Option<String>,
    domain: Option<String>,
    max_age: Option<u64>,
    secure: bool,
    http_only: bool,
    same_site: Option<SameSite>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
            max_age: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Lifetime in seconds; `0` asks the client to drop the cookie.
    pub fn max_age(mut self, seconds: u64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Renders the cookie as a header value, rejecting control characters.
    pub fn to_header_value(&self) -> Result<HeaderValue, ResponseError> {
        HeaderValue::try_from(self.to_string()).map_err(ResponseError::invalid_header)
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;

        if let Some(path) = &self.path {
            write!(f, "; Path={path}")?;
        }
        if let Some(domain) = &self.domain {
            write!(f, "; Domain={domain}")?;
        }
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={max_age}")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        if let Some(same_site) = self.same_site {
            write!(f, "; SameSite={}", same_site.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_cookie() {
        assert_eq!(Cookie::new("a", "1").to_string(), "a=1");
    }

    #[test]
    fn all_attributes() {
        let cookie = Cookie::new("session", "abc")
            .path("/")
            .domain("example.com")
            .max_age(60)
            .secure(true)
            .http_only(true)
            .same_site(SameSite::Lax);

        assert_eq!(
            cookie.to_string(),
            "session=abc; Path=/; Domain=example.com; Max-Age=60; Secure; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn header_value() {
        let value = Cookie::new("a", "1").max_age(0).to_header_value().unwrap();
        assert_eq!(value, "a=1; Max-Age=0");
    }

    #[test]
    fn rejects_line_breaks() {
        let result = Cookie::new("a", "1\r\nX-Injected: yes").to_header_value();
        assert!(matches!(result, Err(ResponseError::InvalidHeader { .. })));
    }
}
