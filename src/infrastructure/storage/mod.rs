use crate::core::errors::TodoError;
use crate::core::models::{
    todo::Todo,
    user::{Role, User},
};
use async_trait::async_trait;

/// Repository functions over users and todos.
///
/// Every method is its own transaction: implementations must make multi-step
/// work (check-then-insert, update-then-reload) atomic.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn exists_by_email(&self, email: &str) -> Result<bool, TodoError>;
    /// Fails with `EmailAlreadyRegistered` instead of writing a second row.
    async fn create_user(&self, user: User) -> Result<User, TodoError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, TodoError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, TodoError>;
    async fn update_user_role(&self, user_id: &str, role: Role) -> Result<User, TodoError>;

    async fn find_todos_by_owner(&self, user_id: &str) -> Result<Vec<Todo>, TodoError>;
    /// Inserts unless the owner already holds `limit` todos, in which case `None`.
    /// The count and the insert are one atomic step.
    async fn insert_todo(&self, todo: Todo, limit: Option<usize>) -> Result<Option<Todo>, TodoError>;
    async fn find_todo_by_id(&self, todo_id: &str) -> Result<Option<Todo>, TodoError>;
    /// `None` when no todo with this id belongs to `user_id`.
    async fn update_todo_done(&self, todo_id: &str, user_id: &str, done: bool) -> Result<Option<Todo>, TodoError>;
    /// `false` when no todo with this id belongs to `user_id`.
    async fn delete_todo(&self, todo_id: &str, user_id: &str) -> Result<bool, TodoError>;
}

pub mod in_memory;
pub mod sqlite;
