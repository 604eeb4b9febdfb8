//! Route-level access control.
//!
//! Every API route is listed in [`ACCESS_POLICY`] with the access it requires.
//! [`enforce_access_policy`] runs as a route layer, so the matched path
//! template (`/api/rooms/{id}`) is known before the handler executes.
//! Routes missing from the table require authentication.

use axum::{
    extract::{MatchedPath, Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use dormex_core::AppError;
use dormex_models::UserRole;

use crate::middleware::auth::{authenticate, bearer_token};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Role(UserRole),
}

#[derive(Debug, Clone, Copy)]
pub struct AccessRule {
    pub method: &'static str,
    pub path: &'static str,
    pub access: Access,
}

const fn rule(method: &'static str, path: &'static str, access: Access) -> AccessRule {
    AccessRule {
        method,
        path,
        access,
    }
}

use Access::{Authenticated, Public};
const ADMIN: Access = Access::Role(UserRole::Admin);
const STUDENT: Access = Access::Role(UserRole::Student);

pub static ACCESS_POLICY: &[AccessRule] = &[
    // auth
    rule("POST", "/api/auth/login", Public),
    rule("POST", "/api/auth/refresh", Public),
    rule("GET", "/api/auth/oauth2/google", Public),
    rule("GET", "/api/auth/oauth2/callback/google", Public),
    rule("POST", "/api/auth/register", ADMIN),
    rule("POST", "/api/auth/register/admin", ADMIN),
    // users
    rule("GET", "/api/users/me", Authenticated),
    // students
    rule("POST", "/api/students", ADMIN),
    rule("GET", "/api/students", ADMIN),
    rule("GET", "/api/students/search", ADMIN),
    rule("GET", "/api/students/status/{status}", ADMIN),
    rule("GET", "/api/students/roll/{roll_number}", Authenticated),
    rule("GET", "/api/students/{id}", Authenticated),
    rule("PUT", "/api/students/{id}", ADMIN),
    rule("DELETE", "/api/students/{id}", ADMIN),
    rule("PATCH", "/api/students/{id}/status", ADMIN),
    rule("PATCH", "/api/students/{id}/room", ADMIN),
    rule("DELETE", "/api/students/{id}/room", ADMIN),
    // blocks
    rule("POST", "/api/blocks", ADMIN),
    rule("GET", "/api/blocks", Authenticated),
    rule("GET", "/api/blocks/active", Authenticated),
    rule("GET", "/api/blocks/{id}", Authenticated),
    rule("PUT", "/api/blocks/{id}", ADMIN),
    rule("DELETE", "/api/blocks/{id}", ADMIN),
    rule("PATCH", "/api/blocks/{id}/toggle-status", ADMIN),
    // rooms
    rule("POST", "/api/rooms", ADMIN),
    rule("GET", "/api/rooms", Authenticated),
    rule("GET", "/api/rooms/vacant", Authenticated),
    rule("GET", "/api/rooms/vacant/block/{block_id}", Authenticated),
    rule("GET", "/api/rooms/block/{block_id}", Authenticated),
    rule("GET", "/api/rooms/block/{block_id}/floor/{floor}", Authenticated),
    rule("GET", "/api/rooms/{id}", Authenticated),
    rule("PUT", "/api/rooms/{id}", ADMIN),
    rule("DELETE", "/api/rooms/{id}", ADMIN),
    rule("PATCH", "/api/rooms/{id}/status", ADMIN),
    rule("POST", "/api/rooms/{id}/occupancy/increment", ADMIN),
    rule("POST", "/api/rooms/{id}/occupancy/decrement", ADMIN),
    // complaints
    rule("POST", "/api/complaints", STUDENT),
    rule("GET", "/api/complaints/my", STUDENT),
    rule("GET", "/api/complaints", ADMIN),
    rule("GET", "/api/complaints/pending", ADMIN),
    rule("GET", "/api/complaints/student/{student_id}", ADMIN),
    rule("GET", "/api/complaints/status/{status}", ADMIN),
    rule("GET", "/api/complaints/category/{category}", ADMIN),
    rule("GET", "/api/complaints/{id}", Authenticated),
    rule("PUT", "/api/complaints/{id}", ADMIN),
    rule("DELETE", "/api/complaints/{id}", ADMIN),
    rule("PATCH", "/api/complaints/{id}/status", ADMIN),
    // menu
    rule("GET", "/api/menu/today", Authenticated),
    rule("GET", "/api/menu/weekly", Authenticated),
    rule("GET", "/api/menu/day/{day}", Authenticated),
    rule("GET", "/api/menu/day/{day}/meal/{meal}", Authenticated),
    rule("PUT", "/api/menu/day/{day}/meal/{meal}", ADMIN),
    rule("POST", "/api/menu", ADMIN),
    rule("GET", "/api/menu/{id}", ADMIN),
    rule("PUT", "/api/menu/{id}", ADMIN),
    rule("DELETE", "/api/menu/{id}", ADMIN),
    // dashboard
    rule("GET", "/api/dashboard/stats", ADMIN),
    rule("GET", "/api/dashboard/recent", ADMIN),
    rule("GET", "/api/dashboard/block-occupancy", ADMIN),
    rule("GET", "/api/dashboard/complaint-summary", ADMIN),
];

/// Looks up the rule for `method` on a matched path template.
pub fn required_access(method: &Method, path: &str) -> Access {
    ACCESS_POLICY
        .iter()
        .find(|rule| rule.method == method.as_str() && rule.path == path)
        .map(|rule| rule.access)
        .unwrap_or(Access::Authenticated)
}

/// Checks an authenticated caller's role against `access`.
pub fn ensure_role(access: Access, role: UserRole) -> Result<(), AppError> {
    match access {
        Access::Role(required) if required != role => Err(AppError::forbidden(format!(
            "Access denied. Required role: {}",
            required.as_str()
        ))),
        _ => Ok(()),
    }
}

pub async fn enforce_access_policy(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let access = required_access(req.method(), &path);
    if access == Access::Public {
        return Ok(next.run(req).await);
    }

    let token = bearer_token(req.headers())?.to_string();
    let auth_user = authenticate(&state, &token).await?;
    ensure_role(access, auth_user.role())?;

    req.extensions_mut().insert(auth_user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_policy_has_no_duplicate_routes() {
        let mut seen = HashSet::new();
        for rule in ACCESS_POLICY {
            assert!(
                seen.insert((rule.method, rule.path)),
                "duplicate rule for {} {}",
                rule.method,
                rule.path
            );
        }
    }

    #[test]
    fn test_auth_entry_points_are_public() {
        assert_eq!(required_access(&Method::POST, "/api/auth/login"), Access::Public);
        assert_eq!(required_access(&Method::POST, "/api/auth/refresh"), Access::Public);
        assert_eq!(
            required_access(&Method::GET, "/api/auth/oauth2/callback/google"),
            Access::Public
        );
    }

    #[test]
    fn test_method_is_part_of_the_match() {
        assert_eq!(required_access(&Method::GET, "/api/rooms/{id}"), Authenticated);
        assert_eq!(required_access(&Method::PUT, "/api/rooms/{id}"), ADMIN);
        assert_eq!(required_access(&Method::GET, "/api/menu/{id}"), ADMIN);
    }

    #[test]
    fn test_unlisted_routes_require_authentication() {
        assert_eq!(required_access(&Method::GET, "/api/unknown"), Authenticated);
    }

    #[test]
    fn test_ensure_role() {
        assert!(ensure_role(ADMIN, UserRole::Admin).is_ok());
        assert!(ensure_role(Authenticated, UserRole::Student).is_ok());

        let err = ensure_role(ADMIN, UserRole::Student).unwrap_err();
        assert_eq!(err.message(), "Access denied. Required role: ADMIN");
        assert!(ensure_role(STUDENT, UserRole::Admin).is_err());
    }
}
