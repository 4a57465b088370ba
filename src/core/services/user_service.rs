use crate::auth::jwt::{JwtService, TokenUserInfo};
use crate::auth::password::PasswordHasher;
use crate::core::constants::{PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, USER_NAME_MAX_LENGTH, USER_NAME_MIN_LENGTH};
use crate::core::errors::TodoError;
use crate::core::models::user::{Role, User};
use crate::core::services::{validate_email, validate_string_input};
use crate::infrastructure::object_store::ObjectStore;
use crate::infrastructure::storage::Storage;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSignUpResponse {
    pub email: String,
    pub user_name: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub email: String,
    pub user_name: String,
    pub role: Role,
    pub token: String,
}

/// Raw upload attached to a signup request.
#[derive(Debug, Clone)]
pub struct ProfileImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

pub struct UserService {
    storage: Arc<dyn Storage>,
    object_store: Arc<dyn ObjectStore>,
    jwt_service: Arc<JwtService>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(
        storage: Arc<dyn Storage>,
        object_store: Arc<dyn ObjectStore>,
        jwt_service: Arc<JwtService>,
        hasher: PasswordHasher,
    ) -> Self {
        UserService {
            storage,
            object_store,
            jwt_service,
            hasher,
        }
    }

    pub async fn is_duplicate(&self, email: &str) -> Result<bool, TodoError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(TodoError::MissingField("email".to_string()));
        }
        let exists = self.storage.exists_by_email(email).await?;
        tracing::info!("Is email {} already registered? -> {}", email, exists);
        Ok(exists)
    }

    pub async fn create(
        &self,
        email: &str,
        password: &str,
        user_name: &str,
        profile_image: Option<ProfileImage>,
    ) -> Result<UserSignUpResponse, TodoError> {
        let email = email.trim();
        validate_email(email)?;
        if password.is_empty() {
            return Err(TodoError::MissingField("password".to_string()));
        }
        let password_length = password.chars().count();
        if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&password_length) {
            return Err(TodoError::invalid_input(
                "password",
                "Invalid password",
                format!(
                    "password must be between {} and {} characters",
                    PASSWORD_MIN_LENGTH, PASSWORD_MAX_LENGTH
                ),
            ));
        }
        validate_string_input("userName", user_name, USER_NAME_MIN_LENGTH, USER_NAME_MAX_LENGTH)?;

        // Checked up front so a duplicate never leaves an orphaned upload behind.
        if self.storage.exists_by_email(email).await? {
            tracing::warn!("Signup rejected, email {} already registered", email);
            return Err(TodoError::EmailAlreadyRegistered(email.to_string()));
        }

        let profile_img = match profile_image {
            Some(image) => Some(self.upload_profile_image(image).await?),
            None => None,
        };

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password: self.hasher.hash(password)?,
            user_name: user_name.trim().to_string(),
            join_date: Utc::now(),
            role: Role::default(),
            profile_img,
        };
        let saved = self.storage.create_user(user).await?;
        tracing::info!("Registered user {} ({})", saved.id, saved.email);

        Ok(UserSignUpResponse {
            email: saved.email,
            user_name: saved.user_name,
        })
    }

    async fn upload_profile_image(&self, image: ProfileImage) -> Result<String, TodoError> {
        let key = format!("{}_{}", Uuid::new_v4(), sanitize_file_name(&image.file_name));
        tracing::info!("Uploading profile image {} as {}", image.file_name, key);
        self.object_store
            .upload(image.data, &key, image.content_type.as_deref())
            .await
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<LoginResponse, TodoError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(TodoError::MissingField("email".to_string()));
        }
        if password.is_empty() {
            return Err(TodoError::MissingField("password".to_string()));
        }

        let user = match self.storage.get_user_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Sign in failed, unknown email {}", email);
                return Err(TodoError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, &user.password)? {
            tracing::warn!("Sign in failed, wrong password for {}", email);
            return Err(TodoError::InvalidCredentials);
        }

        tracing::info!("User {} signed in", user.id);
        self.login_response(user)
    }

    pub async fn promote_to_premium(&self, user_info: &TokenUserInfo) -> Result<LoginResponse, TodoError> {
        if user_info.role != Role::Common {
            return Err(TodoError::RoleNotPromotable(user_info.role));
        }

        // The token may predate an earlier promotion, so re-check the stored role.
        let user = self
            .storage
            .get_user(&user_info.user_id)
            .await?
            .ok_or_else(|| TodoError::UserNotFound(user_info.user_id.clone()))?;
        if user.role != Role::Common {
            return Err(TodoError::RoleNotPromotable(user.role));
        }

        let promoted = self.storage.update_user_role(&user.id, Role::Premium).await?;
        tracing::info!("Promoted user {} to {}", promoted.id, promoted.role);
        self.login_response(promoted)
    }

    pub async fn find_profile_path(&self, user_id: &str) -> Result<String, TodoError> {
        let user = self
            .storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| TodoError::UserNotFound(user_id.to_string()))?;
        user.profile_img
            .ok_or_else(|| TodoError::ProfileImageNotFound(user_id.to_string()))
    }

    fn login_response(&self, user: User) -> Result<LoginResponse, TodoError> {
        let token = self.jwt_service.issue_token(&user)?;
        Ok(LoginResponse {
            email: user.email,
            user_name: user.user_name,
            role: user.role,
            token,
        })
    }
}

/// Object keys end up in public URLs; keep them to a URL-safe alphabet.
fn sanitize_file_name(file_name: &str) -> String {
    let name = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.trim_matches(['.', '_']).is_empty() {
        "profile".to_string()
    } else {
        sanitized
    }
}
