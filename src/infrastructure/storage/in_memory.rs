use crate::core::errors::TodoError;
use crate::core::models::{
    todo::Todo,
    user::{Role, User},
};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    users_by_email: HashMap<String, String>, // email -> user_id
    todos: Vec<Todo>,                        // insertion order is list order
}

/// Both tables sit behind one lock so each call sees a consistent snapshot.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn exists_by_email(&self, email: &str) -> Result<bool, TodoError> {
        let tables = self.tables.read().await;
        Ok(tables.users_by_email.contains_key(email))
    }

    async fn create_user(&self, user: User) -> Result<User, TodoError> {
        let mut tables = self.tables.write().await;
        if tables.users_by_email.contains_key(&user.email) {
            return Err(TodoError::EmailAlreadyRegistered(user.email));
        }
        tables.users_by_email.insert(user.email.clone(), user.id.clone());
        tables.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, TodoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, TodoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users_by_email
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn update_user_role(&self, user_id: &str, role: Role) -> Result<User, TodoError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(user_id)
            .ok_or_else(|| TodoError::UserNotFound(user_id.to_string()))?;
        user.role = role;
        Ok(user.clone())
    }

    async fn find_todos_by_owner(&self, user_id: &str) -> Result<Vec<Todo>, TodoError> {
        let tables = self.tables.read().await;
        Ok(tables.todos.iter().filter(|t| t.user_id == user_id).cloned().collect())
    }

    async fn insert_todo(&self, todo: Todo, limit: Option<usize>) -> Result<Option<Todo>, TodoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&todo.user_id) {
            return Err(TodoError::UserNotFound(todo.user_id));
        }
        if let Some(limit) = limit {
            let owned = tables.todos.iter().filter(|t| t.user_id == todo.user_id).count();
            if owned >= limit {
                return Ok(None);
            }
        }
        tables.todos.push(todo.clone());
        Ok(Some(todo))
    }

    async fn find_todo_by_id(&self, todo_id: &str) -> Result<Option<Todo>, TodoError> {
        let tables = self.tables.read().await;
        Ok(tables.todos.iter().find(|t| t.id == todo_id).cloned())
    }

    async fn update_todo_done(&self, todo_id: &str, user_id: &str, done: bool) -> Result<Option<Todo>, TodoError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .todos
            .iter_mut()
            .find(|t| t.id == todo_id && t.user_id == user_id)
            .map(|todo| {
                todo.done = done;
                todo.clone()
            }))
    }

    async fn delete_todo(&self, todo_id: &str, user_id: &str) -> Result<bool, TodoError> {
        let mut tables = self.tables.write().await;
        let before = tables.todos.len();
        tables.todos.retain(|t| !(t.id == todo_id && t.user_id == user_id));
        Ok(tables.todos.len() != before)
    }
}
