use crate::core::errors::TodoError;
use crate::core::models::user::Role;
use crate::core::services::user_service::ProfileImage;
use crate::infrastructure::object_store::in_memory::MEMORY_URL_PREFIX;
use crate::infrastructure::storage::Storage;
use crate::tests::{create_test_app, register_and_sign_in};

#[tokio::test]
async fn test_register_and_sign_in() {
    let app = create_test_app();
    let users = &app.state.users;

    let created = users
        .create("alice@example.com", "password123", "Alice", None)
        .await
        .unwrap();
    assert_eq!(created.email, "alice@example.com");
    assert_eq!(created.user_name, "Alice");

    let duplicate = users.create("alice@example.com", "password123", "Alice", None).await;
    assert!(matches!(duplicate, Err(TodoError::EmailAlreadyRegistered(_))));

    let login = users.authenticate("alice@example.com", "password123").await.unwrap();
    assert_eq!(login.email, "alice@example.com");
    assert_eq!(login.user_name, "Alice");
    assert_eq!(login.role, Role::Common);
    assert!(!login.token.is_empty());

    let wrong = users.authenticate("alice@example.com", "wrong-password").await;
    assert!(matches!(wrong, Err(TodoError::InvalidCredentials)));
}

#[tokio::test]
async fn test_duplicate_email_keeps_first_account() {
    let app = create_test_app();
    app.state
        .users
        .create("alice@example.com", "password123", "Alice", None)
        .await
        .unwrap();

    let result = app
        .state
        .users
        .create("alice@example.com", "otherpass99", "Mallory", None)
        .await;
    assert!(matches!(result, Err(TodoError::EmailAlreadyRegistered(ref email)) if email == "alice@example.com"));

    let stored = app.storage.get_user_by_email("alice@example.com").await.unwrap().unwrap();
    assert_eq!(stored.user_name, "Alice");
    // Only the first password works.
    assert!(app.state.users.authenticate("alice@example.com", "password123").await.is_ok());
    assert!(app.state.users.authenticate("alice@example.com", "otherpass99").await.is_err());
}

#[tokio::test]
async fn test_password_is_stored_hashed() {
    let app = create_test_app();
    app.state
        .users
        .create("alice@example.com", "password123", "Alice", None)
        .await
        .unwrap();

    let stored = app.storage.get_user_by_email("alice@example.com").await.unwrap().unwrap();
    assert_ne!(stored.password, "password123");
    assert!(stored.password.starts_with("$2"));
    assert_eq!(stored.role, Role::Common);
    assert!(stored.profile_img.is_none());
}

#[tokio::test]
async fn test_sign_in_unknown_email() {
    let app = create_test_app();
    let result = app.state.users.authenticate("nobody@example.com", "password123").await;
    assert!(matches!(result, Err(TodoError::InvalidCredentials)));
}

#[tokio::test]
async fn test_signup_validation() {
    let app = create_test_app();
    let users = &app.state.users;

    let missing_email = users.create("  ", "password123", "Alice", None).await;
    assert!(matches!(missing_email, Err(TodoError::MissingField(ref f)) if f == "email"));

    let bad_email = users.create("alice.example.com", "password123", "Alice", None).await;
    assert!(matches!(bad_email, Err(TodoError::InvalidEmail(_))));

    let missing_password = users.create("alice@example.com", "", "Alice", None).await;
    assert!(matches!(missing_password, Err(TodoError::MissingField(ref f)) if f == "password"));

    let short_password = users.create("alice@example.com", "short", "Alice", None).await;
    assert!(matches!(short_password, Err(TodoError::InvalidInput(ref f, _)) if f == "password"));

    let long_password = users
        .create("alice@example.com", "abcdefghijklmnopqrstu", "Alice", None)
        .await;
    assert!(matches!(long_password, Err(TodoError::InvalidInput(ref f, _)) if f == "password"));

    let long_name = users.create("alice@example.com", "password123", "Alexandria", None).await;
    assert!(matches!(long_name, Err(TodoError::InvalidInput(ref f, _)) if f == "userName"));

    // Nothing was written by the rejected attempts.
    assert!(!users.is_duplicate("alice@example.com").await.unwrap());
}

#[tokio::test]
async fn test_is_duplicate() {
    let app = create_test_app();
    let users = &app.state.users;

    assert!(!users.is_duplicate("alice@example.com").await.unwrap());
    users
        .create("alice@example.com", "password123", "Alice", None)
        .await
        .unwrap();
    assert!(users.is_duplicate("alice@example.com").await.unwrap());
    assert!(matches!(users.is_duplicate("").await, Err(TodoError::MissingField(_))));
}

#[tokio::test]
async fn test_signup_with_profile_image() {
    let app = create_test_app();
    let image = ProfileImage {
        file_name: "my cat.png".to_string(),
        content_type: Some("image/png".to_string()),
        data: vec![0x89, b'P', b'N', b'G'],
    };
    app.state
        .users
        .create("alice@example.com", "password123", "Alice", Some(image))
        .await
        .unwrap();

    let stored = app.storage.get_user_by_email("alice@example.com").await.unwrap().unwrap();
    let url = stored.profile_img.clone().unwrap();
    assert!(url.starts_with(MEMORY_URL_PREFIX));
    assert!(url.ends_with("_my_cat.png"));

    let key = url.trim_start_matches(MEMORY_URL_PREFIX);
    assert_eq!(app.object_store.get(key).await, Some(vec![0x89, b'P', b'N', b'G']));

    let path = app.state.users.find_profile_path(&stored.id).await.unwrap();
    assert_eq!(path, url);
}

#[tokio::test]
async fn test_find_profile_path_without_image() {
    let app = create_test_app();
    let (_, user_info) = register_and_sign_in(&app, "alice@example.com", "Alice").await;

    let result = app.state.users.find_profile_path(&user_info.user_id).await;
    assert!(matches!(result, Err(TodoError::ProfileImageNotFound(_))));

    let unknown = app.state.users.find_profile_path("missing").await;
    assert!(matches!(unknown, Err(TodoError::UserNotFound(_))));
}

#[tokio::test]
async fn test_promote_common_user() {
    let app = create_test_app();
    let (_, user_info) = register_and_sign_in(&app, "alice@example.com", "Alice").await;
    assert_eq!(user_info.role, Role::Common);

    let promoted = app.state.users.promote_to_premium(&user_info).await.unwrap();
    assert_eq!(promoted.role, Role::Premium);
    assert_eq!(promoted.email, "alice@example.com");

    let reissued = app.state.jwt_service.validate_token(&promoted.token).unwrap();
    assert_eq!(reissued.user_id, user_info.user_id);
    assert_eq!(reissued.role, Role::Premium);

    let stored = app.storage.get_user(&user_info.user_id).await.unwrap().unwrap();
    assert_eq!(stored.role, Role::Premium);
}

#[tokio::test]
async fn test_promote_rejects_non_common_roles() {
    let app = create_test_app();
    let (_, user_info) = register_and_sign_in(&app, "alice@example.com", "Alice").await;
    let promoted = app.state.users.promote_to_premium(&user_info).await.unwrap();

    // A token that already carries PREMIUM.
    let premium_info = app.state.jwt_service.validate_token(&promoted.token).unwrap();
    let again = app.state.users.promote_to_premium(&premium_info).await;
    assert!(matches!(again, Err(TodoError::RoleNotPromotable(Role::Premium))));

    // A stale COMMON token issued before the promotion.
    let stale = app.state.users.promote_to_premium(&user_info).await;
    assert!(matches!(stale, Err(TodoError::RoleNotPromotable(Role::Premium))));
}
