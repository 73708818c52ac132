//! User profile operations

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, info};

use super::{format_datetime, parse_datetime, Database, DbConn};
use crate::error::{Error, Result};
use crate::models::{ConversationState, User, UserUpdate};

const USER_COLUMNS: &str = "id, username, first_name, currency, daily_budget, weekly_budget, conversation_state, created_at";

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let state_str: String = row.get(6)?;
    let created_at_str: String = row.get(7)?;

    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        first_name: row.get(2)?,
        currency: row.get(3)?,
        daily_budget: row.get(4)?,
        weekly_budget: row.get(5)?,
        // A state we can't read is treated as a lost conversation
        conversation_state: state_str.parse().unwrap_or_default(),
        created_at: parse_datetime(&created_at_str),
    })
}

fn query_user(conn: &DbConn, user_id: i64) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
            params![user_id],
            row_to_user,
        )
        .optional()?;
    Ok(user)
}

/// Merge `update` into an existing row. Returns false if the row doesn't exist.
fn merge_user(conn: &DbConn, user_id: i64, update: &UserUpdate) -> Result<bool> {
    let changed = conn.execute(
        r#"
        UPDATE users SET
            first_name = COALESCE(?2, first_name),
            username = COALESCE(?3, username),
            currency = COALESCE(?4, currency),
            daily_budget = COALESCE(?5, daily_budget),
            weekly_budget = COALESCE(?6, weekly_budget),
            conversation_state = COALESCE(?7, conversation_state)
        WHERE id = ?1
        "#,
        params![
            user_id,
            update.first_name,
            update.username,
            update.currency.map(|c| c.code()),
            update.daily_budget,
            update.weekly_budget,
            update.conversation_state.map(|s| s.as_str()),
        ],
    )?;
    Ok(changed > 0)
}

fn insert_user(conn: &DbConn, user_id: i64, update: &UserUpdate) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO users (id, username, first_name, currency, daily_budget, weekly_budget, conversation_state, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            user_id,
            update.username,
            update.first_name.as_deref().unwrap_or(""),
            update.currency.map(|c| c.code()),
            update.daily_budget,
            update.weekly_budget,
            update
                .conversation_state
                .unwrap_or_default()
                .as_str(),
            format_datetime(&Utc::now()),
        ],
    )?;
    Ok(())
}

impl Database {
    /// Look up a user by id
    pub fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        query_user(&conn, user_id)
    }

    /// Create the user if absent, otherwise merge the supplied fields
    ///
    /// Fields left as `None` in `update` keep their stored values (or the
    /// column defaults for a new user). The whole read-modify-write is one
    /// transaction.
    pub fn upsert_user(&self, user_id: i64, update: &UserUpdate) -> Result<User> {
        self.with_transaction(|conn| {
            if !merge_user(conn, user_id, update)? {
                insert_user(conn, user_id, update)?;
                info!(user_id, "Created user");
            }
            query_user(conn, user_id)?.ok_or(Error::UserNotFound(user_id))
        })
    }

    /// Register a user on first contact
    ///
    /// Returns the stored user and whether it was created by this call.
    /// An existing user is returned unchanged.
    pub fn ensure_user(
        &self,
        user_id: i64,
        first_name: &str,
        username: Option<&str>,
    ) -> Result<(User, bool)> {
        self.with_transaction(|conn| {
            let created = conn.execute(
                r#"
                INSERT OR IGNORE INTO users (id, username, first_name, conversation_state, created_at)
                VALUES (?1, ?2, ?3, 'none', ?4)
                "#,
                params![user_id, username, first_name, format_datetime(&Utc::now())],
            )? > 0;

            if created {
                info!(user_id, "Registered new user");
            }

            let user = query_user(conn, user_id)?.ok_or(Error::UserNotFound(user_id))?;
            Ok((user, created))
        })
    }

    /// Merge fields into an existing user; fails with `UserNotFound` if absent
    pub fn update_user(&self, user_id: i64, update: &UserUpdate) -> Result<User> {
        self.with_transaction(|conn| {
            if !merge_user(conn, user_id, update)? {
                return Err(Error::UserNotFound(user_id));
            }
            query_user(conn, user_id)?.ok_or(Error::UserNotFound(user_id))
        })
    }

    /// Set the user's conversation state
    pub fn set_conversation_state(&self, user_id: i64, state: ConversationState) -> Result<()> {
        debug!(user_id, state = %state, "Setting conversation state");
        self.update_user(
            user_id,
            &UserUpdate {
                conversation_state: Some(state),
                ..Default::default()
            },
        )?;
        Ok(())
    }

    /// List all users, oldest first
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users ORDER BY created_at, id",
            USER_COLUMNS
        ))?;

        let users = stmt
            .query_map([], row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(users)
    }
}
