/*
 * Responsibility
 * - Application level claim sets parsed from a verified token (AppClaims / RefreshClaims)
 * - Role: opaque identifier, compared by equality only
 */
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::token::RawClaims;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsError {
    #[error("could not parse claim '{0}'")]
    Missing(&'static str),
    #[error("invalid claim '{0}'")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn admin() -> Self {
        Self::new("admin")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Claims of an access token, as seen by handlers.
///
/// `Default` is the empty claim set handed out when nothing was authenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppClaims {
    pub id: i64,
    pub sub: String,
    pub roles: BTreeSet<Role>,
}

impl AppClaims {
    /// `id`, `sub` and `roles` must all be present; `roles` may be `null`.
    pub fn parse(claims: &RawClaims) -> Result<Self, ClaimsError> {
        let id = account_id(claims)?;

        let sub = claims
            .get("sub")
            .ok_or(ClaimsError::Missing("sub"))?
            .as_str()
            .ok_or(ClaimsError::Invalid("sub"))?
            .to_string();

        let roles = match claims.get("roles").ok_or(ClaimsError::Missing("roles"))? {
            Value::Null => BTreeSet::new(),
            Value::Array(items) => items
                .iter()
                .map(|v| v.as_str().map(Role::new).ok_or(ClaimsError::Invalid("roles")))
                .collect::<Result<_, _>>()?,
            _ => return Err(ClaimsError::Invalid("roles")),
        };

        Ok(Self { id, sub, roles })
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Claims of a refresh token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshClaims {
    pub id: i64,
    pub token: String,
}

impl RefreshClaims {
    pub fn parse(claims: &RawClaims) -> Result<Self, ClaimsError> {
        let id = account_id(claims)?;
        let token = claims
            .get("token")
            .ok_or(ClaimsError::Missing("token"))?
            .as_str()
            .filter(|t| !t.is_empty())
            .ok_or(ClaimsError::Invalid("token"))?
            .to_string();

        Ok(Self { id, token })
    }
}

fn account_id(claims: &RawClaims) -> Result<i64, ClaimsError> {
    let value = claims.get("id").ok_or(ClaimsError::Missing("id"))?;
    value
        .as_i64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        })
        .ok_or(ClaimsError::Invalid("id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: Value) -> RawClaims {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn roles_collapse_into_a_set() {
        let claims = AppClaims::parse(&raw(json!({
            "id": 7,
            "sub": "alice",
            "roles": ["editor", "admin", "editor"]
        })))
        .unwrap();

        let expected: BTreeSet<Role> = [Role::admin(), Role::new("editor")].into();
        assert_eq!(claims.roles, expected);
        assert_eq!(claims.id, 7);
        assert_eq!(claims.sub, "alice");
    }

    #[test]
    fn null_roles_is_empty_set() {
        let claims =
            AppClaims::parse(&raw(json!({"id": 1, "sub": "a", "roles": null}))).unwrap();
        assert!(claims.roles.is_empty());
    }

    #[test]
    fn float_id_is_accepted_when_integral() {
        let claims =
            AppClaims::parse(&raw(json!({"id": 42.0, "sub": "a", "roles": []}))).unwrap();
        assert_eq!(claims.id, 42);

        let err = AppClaims::parse(&raw(json!({"id": 4.5, "sub": "a", "roles": []})));
        assert_eq!(err, Err(ClaimsError::Invalid("id")));
    }

    #[test]
    fn missing_claims_are_reported_by_name() {
        assert_eq!(
            AppClaims::parse(&raw(json!({"sub": "a", "roles": []}))),
            Err(ClaimsError::Missing("id"))
        );
        assert_eq!(
            AppClaims::parse(&raw(json!({"id": 1, "roles": []}))),
            Err(ClaimsError::Missing("sub"))
        );
        assert_eq!(
            AppClaims::parse(&raw(json!({"id": 1, "sub": "a"}))),
            Err(ClaimsError::Missing("roles"))
        );
    }

    #[test]
    fn malformed_roles_are_rejected() {
        assert_eq!(
            AppClaims::parse(&raw(json!({"id": 1, "sub": "a", "roles": "admin"}))),
            Err(ClaimsError::Invalid("roles"))
        );
        assert_eq!(
            AppClaims::parse(&raw(json!({"id": 1, "sub": "a", "roles": ["admin", 3]}))),
            Err(ClaimsError::Invalid("roles"))
        );
    }

    #[test]
    fn has_role_is_plain_equality() {
        let claims = AppClaims {
            roles: [Role::admin()].into(),
            ..Default::default()
        };
        assert!(claims.has_role(&Role::admin()));
        assert!(!claims.has_role(&Role::new("Admin")));
        assert!(!AppClaims::default().has_role(&Role::admin()));
    }

    #[test]
    fn refresh_claims_require_a_token() {
        let claims = RefreshClaims::parse(&raw(json!({"id": 3, "token": "r-1"}))).unwrap();
        assert_eq!(claims, RefreshClaims { id: 3, token: "r-1".into() });

        assert_eq!(
            RefreshClaims::parse(&raw(json!({"id": 3, "token": ""}))),
            Err(ClaimsError::Invalid("token"))
        );
        assert_eq!(
            RefreshClaims::parse(&raw(json!({"id": 3}))),
            Err(ClaimsError::Missing("token"))
        );
    }
}
