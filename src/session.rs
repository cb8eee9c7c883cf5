//! Session-scoped state shared by the flows of one user visit.
//!
//! Holds the cookie jar (including the auth token cookie) and the display
//! name chosen during onboarding. Passed by reference to the flows that need
//! it; nothing here is global.

use std::collections::BTreeMap;

use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

/// Default name of the cookie carrying the auth token.
pub const DEFAULT_TOKEN_COOKIE: &str = "token";

/// Cookie values for one session.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: BTreeMap<String, SecretString>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `Cookie` header value (`a=b; c=d`). Pairs without `=` or
    /// with an empty name are ignored.
    pub fn parse(header: &str) -> Self {
        let mut jar = Self::new();
        for pair in header.split(';') {
            let mut parts = pair.splitn(2, '=');
            let name = parts.next().unwrap_or_default().trim();
            let Some(value) = parts.next() else { continue };
            if name.is_empty() {
                continue;
            }
            jar.set(name, value.trim().trim_matches('"'));
        }
        jar
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.cookies
            .insert(name.to_string(), SecretString::from(value.to_string()));
    }

    pub fn get(&self, name: &str) -> Option<&SecretString> {
        self.cookies.get(name)
    }

    /// Like [`CookieJar::get`], but empty values count as absent.
    pub fn non_empty(&self, name: &str) -> Option<&SecretString> {
        self.get(name).filter(|v| !v.expose_secret().is_empty())
    }

    pub fn remove(&mut self, name: &str) -> Option<SecretString> {
        self.cookies.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// One user's visit.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    display_name: Option<String>,
    pub cookies: CookieJar,
    token_cookie: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_COOKIE)
    }
}

impl Session {
    pub fn new(token_cookie: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: None,
            cookies: CookieJar::new(),
            token_cookie: token_cookie.into(),
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Store a display name. Blank names clear it.
    pub fn set_display_name(&mut self, name: &str) {
        let name = name.trim();
        self.display_name = (!name.is_empty()).then(|| name.to_string());
    }

    pub fn token_cookie(&self) -> &str {
        &self.token_cookie
    }

    /// The auth token, if the token cookie is set and non-empty.
    pub fn auth_token(&self) -> Option<&SecretString> {
        self.cookies.non_empty(&self.token_cookie)
    }

    pub fn set_auth_token(&mut self, token: &str) {
        let name = self.token_cookie.clone();
        self.cookies.set(&name, token);
    }

    pub fn is_signed_in(&self) -> bool {
        self.auth_token().is_some()
    }

    pub fn sign_out(&mut self) {
        let name = self.token_cookie.clone();
        self.cookies.remove(&name);
        tracing::debug!(session = %self.id, "signed out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cookie_header() {
        let jar = CookieJar::parse("token=abc123; theme=dark;broken; =x; quoted=\"v\"");
        assert_eq!(jar.get("token").unwrap().expose_secret(), "abc123");
        assert_eq!(jar.get("theme").unwrap().expose_secret(), "dark");
        assert_eq!(jar.get("quoted").unwrap().expose_secret(), "v");
        assert!(!jar.contains("broken"));
        assert_eq!(jar.len(), 3);
    }

    #[test]
    fn value_may_contain_equals() {
        let jar = CookieJar::parse("token=a=b==");
        assert_eq!(jar.get("token").unwrap().expose_secret(), "a=b==");
    }

    #[test]
    fn empty_token_is_not_signed_in() {
        let mut session = Session::default();
        assert!(!session.is_signed_in());
        session.set_auth_token("");
        assert!(!session.is_signed_in());
        session.set_auth_token("t0k");
        assert!(session.is_signed_in());
        session.sign_out();
        assert!(session.auth_token().is_none());
    }

    #[test]
    fn custom_token_cookie_name() {
        let mut session = Session::new("auth");
        session.cookies = CookieJar::parse("token=wrong; auth=right");
        assert_eq!(session.auth_token().unwrap().expose_secret(), "right");
    }

    #[test]
    fn display_name_trims_and_clears() {
        let mut session = Session::default();
        session.set_display_name("  Ada ");
        assert_eq!(session.display_name(), Some("Ada"));
        session.set_display_name("");
        assert_eq!(session.display_name(), None);
    }

    #[test]
    fn debug_does_not_leak_token() {
        let mut session = Session::default();
        session.set_auth_token("super-secret");
        assert!(!format!("{session:?}").contains("super-secret"));
    }
}
