use axum::http::{Method, StatusCode};
use dormex::middleware::role::{ACCESS_POLICY, Access, ensure_role, required_access};
use dormex_models::UserRole;

#[test]
fn test_every_api_rule_is_under_api_prefix() {
    assert!(ACCESS_POLICY.iter().all(|rule| rule.path.starts_with("/api/")));
}

#[test]
fn test_student_only_complaint_routes() {
    for (method, path) in [
        (Method::POST, "/api/complaints"),
        (Method::GET, "/api/complaints/my"),
    ] {
        let access = required_access(&method, path);
        assert!(ensure_role(access, UserRole::Student).is_ok());
        let err = ensure_role(access, UserRole::Admin).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }
}

#[test]
fn test_admin_only_mutations() {
    for (method, path) in [
        (Method::POST, "/api/blocks"),
        (Method::DELETE, "/api/rooms/{id}"),
        (Method::PATCH, "/api/students/{id}/room"),
        (Method::PUT, "/api/menu/day/{day}/meal/{meal}"),
        (Method::GET, "/api/dashboard/stats"),
    ] {
        assert!(
            matches!(required_access(&method, path), Access::Role(UserRole::Admin)),
            "{} {} should be admin only",
            method,
            path
        );
    }
}

#[test]
fn test_read_routes_open_to_any_signed_in_user() {
    for path in ["/api/menu/weekly", "/api/rooms/vacant", "/api/blocks/active", "/api/users/me"] {
        assert!(matches!(
            required_access(&Method::GET, path),
            Access::Authenticated
        ));
    }
}

#[test]
fn test_login_and_oauth_are_public() {
    assert!(matches!(
        required_access(&Method::POST, "/api/auth/login"),
        Access::Public
    ));
    assert!(matches!(
        required_access(&Method::GET, "/api/auth/oauth2/callback/google"),
        Access::Public
    ));
}
