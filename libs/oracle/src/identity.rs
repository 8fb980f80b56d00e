//! Process identity tokens.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::IdentityError;

/// One running instance of an application's process.
///
/// Rendered as `<app>-v<release>-<role>-<suffix>`, e.g. `myapp-v16-web-bujlq`.
/// Two identities are equal iff their token text is equal; the parsed parts
/// are derived from the token and never compared on their own.
#[derive(Debug, Clone)]
pub struct ProcessIdentity {
    token: String,
    app: String,
    release: u32,
    role: String,
    suffix: String,
}

impl ProcessIdentity {
    /// Build an identity from its parts.
    pub fn new(
        app: impl Into<String>,
        release: u32,
        role: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        let app = app.into();
        let role = role.into();
        let suffix = suffix.into();
        let token = format!("{app}-v{release}-{role}-{suffix}");

        if !is_role(&role) || !is_word(&suffix) {
            return Err(IdentityError::Malformed(token));
        }

        Ok(Self {
            token,
            app,
            release,
            role,
            suffix,
        })
    }

    /// Parse a token that is expected to belong to `app`.
    pub fn parse(app: &str, token: &str) -> Result<Self, IdentityError> {
        let rest = token
            .strip_prefix(app)
            .and_then(|rest| rest.strip_prefix("-v"))
            .ok_or_else(|| IdentityError::ForeignApp {
                app: app.to_string(),
                token: token.to_string(),
            })?;

        let malformed = || IdentityError::Malformed(token.to_string());

        let (release, rest) = rest.split_once('-').ok_or_else(malformed)?;
        if release.is_empty() || !release.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let release: u32 = release.parse().map_err(|_| malformed())?;

        let (role, suffix) = rest.rsplit_once('-').ok_or_else(malformed)?;

        Self::new(app, release, role, suffix).map_err(|_| malformed())
    }

    /// The full token text.
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Application name.
    pub fn app(&self) -> &str {
        &self.app
    }

    /// Release version the instance runs.
    pub fn release(&self) -> u32 {
        self.release
    }

    /// Process role (`web`, `cmd`, `worker`, ...).
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Per-instance suffix assigned by the scheduler.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn is_role(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('-')
        && !s.ends_with('-')
        && s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

impl PartialEq for ProcessIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl Eq for ProcessIdentity {}

impl Hash for ProcessIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token.hash(state);
    }
}

impl PartialOrd for ProcessIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProcessIdentity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.token.cmp(&other.token)
    }
}

impl fmt::Display for ProcessIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}
