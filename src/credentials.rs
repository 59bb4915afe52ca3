//! credential context
//!
//! the immutable endpoint, token, and project bundle shared by every
//! resource client of one session.

use crate::error::{Error, Result};
use std::fmt;
use url::Url;

/// credentials obtained from a successful login.
///
/// there are no setters: selecting a project yields a new value via
/// [`Credentials::with_project`], and a new token means logging in again.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    endpoint: Url,
    token: String,
    username: String,
    project_id: Option<String>,
}

impl Credentials {
    /// build credentials from an already issued token
    pub fn new(endpoint: Url, token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            endpoint,
            token: token.into(),
            username: username.into(),
            project_id: None,
        }
    }

    /// copy of these credentials scoped to `project_id`
    pub fn with_project(&self, project_id: impl Into<String>) -> Self {
        let project_id = project_id.into();
        Self {
            project_id: (!project_id.is_empty()).then_some(project_id),
            ..self.clone()
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// bearer token sent with every call
    pub fn token(&self) -> &str {
        &self.token
    }

    /// user that logged in
    pub fn username(&self) -> &str {
        &self.username
    }

    /// active project, if one is selected
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// active project or a validation error for project-scoped calls
    pub(crate) fn require_project(&self) -> Result<&str> {
        self.project_id()
            .ok_or_else(|| Error::validation("project ID not set in credentials"))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint.as_str())
            .field("username", &self.username)
            .field("project_id", &self.project_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new(
            Url::parse("http://localhost:8080").unwrap(),
            "jwt-token",
            "admin",
        )
    }

    #[test]
    fn test_with_project_returns_new_value() {
        let base = credentials();
        let scoped = base.with_project("p1");

        assert_eq!(base.project_id(), None);
        assert_eq!(scoped.project_id(), Some("p1"));
        assert_eq!(scoped.token(), "jwt-token");
        assert_eq!(scoped.endpoint(), base.endpoint());
    }

    #[test]
    fn test_require_project() {
        let err = credentials().require_project().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let scoped = credentials().with_project("p1");
        assert_eq!(scoped.require_project().unwrap(), "p1");

        // an empty id clears the selection rather than storing ""
        let cleared = scoped.with_project("");
        assert!(cleared.require_project().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", credentials());
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("jwt-token"));
    }
}
