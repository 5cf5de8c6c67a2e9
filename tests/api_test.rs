//! API-level tests for response types, error mapping and auth
//! primitives. These run without a database connection.

use axum::http::StatusCode;
use chrono::Utc;
use uuid::Uuid;

use schoolhouse::config::{PERM_MANAGE_FINANCE, PERM_VIEW_STUDENTS, ROLE_ADMIN};
use schoolhouse::domain::{Role, User};
use schoolhouse::errors::AppError;
use schoolhouse::services::Claims;

fn test_user(role_name: &str, permissions: Vec<String>) -> User {
    User {
        id: Uuid::new_v4(),
        email: "staff@school.test".to_string(),
        password_hash: "hashed".to_string(),
        name: "Test Staff".to_string(),
        role_id: Uuid::new_v4(),
        role_name: role_name.to_string(),
        permissions,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        deleted_at: None,
    }
}

// =============================================================================
// Error Type Tests
// =============================================================================

#[tokio::test]
async fn test_app_error_types() {
    let not_found = AppError::NotFound;
    let forbidden = AppError::Forbidden;
    let validation = AppError::validation("invalid field");
    let conflict = AppError::conflict("Student");

    assert!(matches!(not_found, AppError::NotFound));
    assert!(matches!(forbidden, AppError::Forbidden));
    assert!(matches!(validation, AppError::Validation(_)));
    assert!(matches!(conflict, AppError::Conflict(_)));
    assert_eq!(conflict.to_string(), "Student already exists");
}

#[tokio::test]
async fn test_app_error_status_codes() {
    use axum::response::IntoResponse;

    assert_eq!(
        AppError::NotFound.into_response().status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        AppError::Unauthorized.into_response().status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        AppError::Forbidden.into_response().status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        AppError::conflict("Student").into_response().status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        AppError::validation("bad input").into_response().status(),
        StatusCode::BAD_REQUEST
    );
}

// =============================================================================
// Permission Tests
// =============================================================================

#[tokio::test]
async fn test_role_grants_listed_permission() {
    let role = Role {
        id: Uuid::new_v4(),
        name: "bursar".to_string(),
        permissions: vec![PERM_MANAGE_FINANCE.to_string()],
    };

    assert!(role.grants(PERM_MANAGE_FINANCE));
    assert!(!role.grants(PERM_VIEW_STUDENTS));
}

#[tokio::test]
async fn test_admin_role_grants_everything() {
    let role = Role {
        id: Uuid::new_v4(),
        name: ROLE_ADMIN.to_string(),
        permissions: vec![],
    };

    assert!(role.grants(PERM_MANAGE_FINANCE));
    assert!(role.grants(PERM_VIEW_STUDENTS));
}

#[tokio::test]
async fn test_user_permission_checks() {
    let staff = test_user("registrar", vec![PERM_VIEW_STUDENTS.to_string()]);
    assert!(staff.has_permission(PERM_VIEW_STUDENTS));
    assert!(!staff.has_permission(PERM_MANAGE_FINANCE));
    assert!(!staff.is_admin());

    let admin = test_user(ROLE_ADMIN, vec![]);
    assert!(admin.has_permission(PERM_MANAGE_FINANCE));
    assert!(admin.is_admin());
}

// =============================================================================
// Response Type Tests
// =============================================================================

#[tokio::test]
async fn test_no_content_response() {
    use axum::response::IntoResponse;
    use schoolhouse::types::NoContent;

    let response = NoContent.into_response();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_message_response() {
    use schoolhouse::types::MessageResponse;

    let response = MessageResponse::new("Password changed");
    assert_eq!(response.message, "Password changed");
}

#[tokio::test]
async fn test_paginated_response_meta() {
    use schoolhouse::types::Paginated;

    let page = Paginated::new(vec![1, 2, 3], 1, 3, 7);
    assert_eq!(page.data.len(), 3);
    assert_eq!(page.meta.per_page, 3);
    assert_eq!(page.meta.total, 7);
    assert_eq!(page.meta.total_pages, 3);
}

// =============================================================================
// Password Hashing Tests
// =============================================================================

#[tokio::test]
async fn test_password_hashing() {
    use schoolhouse::domain::Password;

    let plain_password = "secure_password_123";
    let password = Password::new(plain_password).expect("Hashing should succeed");
    let hash = password.into_string();

    // Hash should be different from original
    assert_ne!(hash.as_str(), plain_password);

    // Hash should be verifiable
    let stored = Password::from_hash(hash);
    assert!(stored.verify(plain_password));

    // Wrong password should not verify
    assert!(!stored.verify("wrong_password"));
}

#[tokio::test]
async fn test_password_hash_uniqueness() {
    use schoolhouse::domain::Password;

    let plain_password = "same_password";
    let hash1 = Password::new(plain_password)
        .expect("Hashing should succeed")
        .into_string();
    let hash2 = Password::new(plain_password)
        .expect("Hashing should succeed")
        .into_string();

    // Same password should produce different hashes (due to salt)
    assert_ne!(hash1.as_str(), hash2.as_str());

    let stored1 = Password::from_hash(hash1);
    let stored2 = Password::from_hash(hash2);
    assert!(stored1.verify(plain_password));
    assert!(stored2.verify(plain_password));
}

// =============================================================================
// JWT Claims Tests
// =============================================================================

#[tokio::test]
async fn test_claims_structure() {
    let claims = Claims {
        sub: Uuid::new_v4(),
        email: "staff@school.test".to_string(),
        role: "registrar".to_string(),
        permissions: vec![PERM_VIEW_STUDENTS.to_string()],
        exp: Utc::now().timestamp() + 3600,
        iat: Utc::now().timestamp(),
    };

    assert!(!claims.email.is_empty());
    assert!(claims.exp > claims.iat);
    assert!(claims
        .permissions
        .iter()
        .any(|p| p == PERM_VIEW_STUDENTS));
}
