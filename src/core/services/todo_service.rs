use crate::core::constants::{COMMON_TODO_LIMIT, TITLE_MAX_LENGTH};
use crate::core::errors::TodoError;
use crate::core::models::{todo::Todo, user::Role};
use crate::core::services::validate_string_input;
use crate::infrastructure::storage::Storage;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq)]
pub struct TodoDetailResponse {
    pub id: String,
    pub title: String,
    pub done: bool,
}

impl From<Todo> for TodoDetailResponse {
    fn from(todo: Todo) -> Self {
        TodoDetailResponse {
            id: todo.id,
            title: todo.title,
            done: todo.done,
        }
    }
}

/// Every todo operation answers with the caller's full, refreshed list.
#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq, Default)]
pub struct TodoListResponse {
    pub todos: Vec<TodoDetailResponse>,
}

pub struct TodoService {
    storage: Arc<dyn Storage>,
}

impl TodoService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        TodoService { storage }
    }

    pub async fn retrieve(&self, user_id: &str) -> Result<TodoListResponse, TodoError> {
        if self.storage.get_user(user_id).await?.is_none() {
            return Err(TodoError::UserNotFound(user_id.to_string()));
        }
        let todos = self.storage.find_todos_by_owner(user_id).await?;
        Ok(TodoListResponse {
            todos: todos.into_iter().map(TodoDetailResponse::from).collect(),
        })
    }

    pub async fn insert(&self, title: &str, user_id: &str) -> Result<TodoListResponse, TodoError> {
        validate_string_input("title", title, 1, TITLE_MAX_LENGTH)?;

        let user = self
            .storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| TodoError::UserNotFound(user_id.to_string()))?;

        let limit = (user.role == Role::Common).then_some(COMMON_TODO_LIMIT);
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            done: false,
            create_date: Utc::now(),
            user_id: user.id,
        };
        match self.storage.insert_todo(todo, limit).await? {
            Some(todo) => tracing::info!("Created todo {} for user {}", todo.id, user_id),
            None => {
                tracing::warn!("User {} reached the {} todo limit", user_id, COMMON_TODO_LIMIT);
                return Err(TodoError::TodoLimitExceeded(user.role, COMMON_TODO_LIMIT));
            }
        }

        self.retrieve(user_id).await
    }

    /// A missing id is not an error: it is logged and the unchanged list returned.
    pub async fn delete(&self, todo_id: &str, user_id: &str) -> Result<TodoListResponse, TodoError> {
        if todo_id.trim().is_empty() {
            return Err(TodoError::MissingField("id".to_string()));
        }

        if self.storage.delete_todo(todo_id, user_id).await? {
            tracing::info!("Deleted todo {} for user {}", todo_id, user_id);
        } else {
            self.log_missing_todo(todo_id, user_id, "deleted").await?;
        }

        self.retrieve(user_id).await
    }

    pub async fn modify(&self, todo_id: &str, done: bool, user_id: &str) -> Result<TodoListResponse, TodoError> {
        if todo_id.trim().is_empty() {
            return Err(TodoError::MissingField("id".to_string()));
        }

        match self.storage.update_todo_done(todo_id, user_id, done).await? {
            Some(todo) => tracing::info!("Todo {} marked done={}", todo.id, todo.done),
            None => self.log_missing_todo(todo_id, user_id, "modified").await?,
        }

        self.retrieve(user_id).await
    }

    // Tells apart an unknown id from a todo owned by someone else; both leave the list unchanged.
    async fn log_missing_todo(&self, todo_id: &str, user_id: &str, action: &str) -> Result<(), TodoError> {
        match self.storage.find_todo_by_id(todo_id).await? {
            Some(todo) => tracing::warn!(
                "Todo {} belongs to user {}, not {}; nothing {}",
                todo_id,
                todo.user_id,
                user_id,
                action
            ),
            None => tracing::warn!("Todo {} does not exist, nothing {}", todo_id, action),
        }
        Ok(())
    }
}
