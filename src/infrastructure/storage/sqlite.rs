use crate::core::errors::TodoError;
use crate::core::models::{
    todo::Todo,
    user::{Role, User},
};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

const USER_COLUMNS: &str = "user_id, email, password, user_name, join_date, role, profile_img";
const TODO_COLUMNS: &str = "todo_id, title, done, create_date, user_id";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    user_id: String,
    email: String,
    password: String,
    user_name: String,
    join_date: DateTime<Utc>,
    role: String,
    profile_img: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = TodoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.user_id,
            email: row.email,
            password: row.password,
            user_name: row.user_name,
            join_date: row.join_date,
            role: Role::from_str(&row.role).map_err(TodoError::DatabaseError)?,
            profile_img: row.profile_img,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TodoRow {
    todo_id: String,
    title: String,
    done: bool,
    create_date: DateTime<Utc>,
    user_id: String,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: row.todo_id,
            title: row.title,
            done: row.done,
            create_date: row.create_date,
            user_id: row.user_id,
        }
    }
}

/// SQLite backend. Tables come from the embedded migrations in `migrations/`.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open (or create) the database and bring the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self, TodoError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `:memory:` is its own database, so pin exactly one.
        let pool_options = if database_url.contains(":memory:") || database_url.contains("mode=memory") {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options.connect_with(options).await?;
        let storage = SqliteStorage { pool };
        storage.run_migrations().await?;
        tracing::info!("SQLite storage ready at {}", database_url);
        Ok(storage)
    }

    pub async fn run_migrations(&self) -> Result<(), TodoError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn fetch_user(&self, column: &str, value: &str) -> Result<Option<User>, TodoError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {} FROM tbl_user WHERE {} = ?", USER_COLUMNS, column))
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn exists_by_email(&self, email: &str) -> Result<bool, TodoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tbl_user WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn create_user(&self, user: User) -> Result<User, TodoError> {
        let mut tx = self.pool.begin().await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tbl_user WHERE email = ?")
            .bind(&user.email)
            .fetch_one(&mut *tx)
            .await?;
        if count > 0 {
            return Err(TodoError::EmailAlreadyRegistered(user.email));
        }

        sqlx::query(&format!("INSERT INTO tbl_user ({}) VALUES (?, ?, ?, ?, ?, ?, ?)", USER_COLUMNS))
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.password)
            .bind(&user.user_name)
            .bind(user.join_date)
            .bind(user.role.as_str())
            .bind(&user.profile_img)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    TodoError::EmailAlreadyRegistered(user.email.clone())
                }
                other => other.into(),
            })?;

        tx.commit().await?;
        Ok(user)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, TodoError> {
        self.fetch_user("user_id", user_id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, TodoError> {
        self.fetch_user("email", email).await
    }

    async fn update_user_role(&self, user_id: &str, role: Role) -> Result<User, TodoError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE tbl_user SET role = ? WHERE user_id = ?")
            .bind(role.as_str())
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(TodoError::UserNotFound(user_id.to_string()));
        }

        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {} FROM tbl_user WHERE user_id = ?", USER_COLUMNS))
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        User::try_from(row)
    }

    async fn find_todos_by_owner(&self, user_id: &str) -> Result<Vec<Todo>, TodoError> {
        let rows = sqlx::query_as::<_, TodoRow>(&format!(
            "SELECT {} FROM tbl_todo WHERE user_id = ? ORDER BY rowid",
            TODO_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn insert_todo(&self, todo: Todo, limit: Option<usize>) -> Result<Option<Todo>, TodoError> {
        // A single INSERT ... SELECT so the count cannot go stale between check and write.
        let limit = limit.map_or(i64::MAX, |l| i64::try_from(l).unwrap_or(i64::MAX));
        let inserted = sqlx::query(&format!(
            "INSERT INTO tbl_todo ({}) SELECT ?, ?, ?, ?, ? \
             WHERE (SELECT COUNT(*) FROM tbl_todo WHERE user_id = ?) < ?",
            TODO_COLUMNS
        ))
        .bind(&todo.id)
        .bind(&todo.title)
        .bind(todo.done)
        .bind(todo.create_date)
        .bind(&todo.user_id)
        .bind(&todo.user_id)
        .bind(limit)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                TodoError::UserNotFound(todo.user_id.clone())
            }
            other => other.into(),
        })?;

        if inserted.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(todo))
    }

    async fn find_todo_by_id(&self, todo_id: &str) -> Result<Option<Todo>, TodoError> {
        let row = sqlx::query_as::<_, TodoRow>(&format!("SELECT {} FROM tbl_todo WHERE todo_id = ?", TODO_COLUMNS))
            .bind(todo_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Todo::from))
    }

    async fn update_todo_done(&self, todo_id: &str, user_id: &str, done: bool) -> Result<Option<Todo>, TodoError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE tbl_todo SET done = ? WHERE todo_id = ? AND user_id = ?")
            .bind(done)
            .bind(todo_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        let row = sqlx::query_as::<_, TodoRow>(&format!("SELECT {} FROM tbl_todo WHERE todo_id = ?", TODO_COLUMNS))
            .bind(todo_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(row.into()))
    }

    async fn delete_todo(&self, todo_id: &str, user_id: &str) -> Result<bool, TodoError> {
        let deleted = sqlx::query("DELETE FROM tbl_todo WHERE todo_id = ? AND user_id = ?")
            .bind(todo_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(deleted.rows_affected() > 0)
    }
}
