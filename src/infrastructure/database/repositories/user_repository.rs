use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, FromQueryResult, ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::domain::{
    DomainError, DomainResult, NewUser, Role, User, UserChanges, UserRepositoryInterface,
    UserSummary,
};
use crate::infrastructure::database::entities::{role, user, user_role};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
    /// SQLite has a single writer. A deferred transaction that reads before
    /// its first write gets `SQLITE_BUSY` instead of waiting, so write
    /// transactions on SQLite queue here.
    write_lock: Option<Mutex<()>>,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        let write_lock = matches!(db.get_database_backend(), DbBackend::Sqlite)
            .then(|| Mutex::new(()));
        Self { db, write_lock }
    }

    async fn write_guard(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn role_model_to_domain(model: role::Model) -> Role {
    Role {
        id: model.id,
        name: model.name,
    }
}

fn user_model_to_domain(model: user::Model, roles: Vec<role::Model>) -> User {
    User {
        login: model.login,
        name: model.name,
        roles: roles.into_iter().map(role_model_to_domain).collect(),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn db_err(e: DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[derive(Debug, FromQueryResult)]
struct UserSummaryRow {
    login: String,
    name: String,
}

// ── Query helpers (run on the pool or inside a transaction) ─────

async fn load_roles<C: ConnectionTrait>(
    conn: &C,
    model: &user::Model,
) -> Result<Vec<role::Model>, DbErr> {
    model
        .find_related(role::Entity)
        .order_by_asc(role::Column::Id)
        .all(conn)
        .await
}

async fn find_role_by_name<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<Option<role::Model>, DbErr> {
    role::Entity::find()
        .filter(role::Column::Name.eq(name))
        .one(conn)
        .await
}

/// Insert-or-fetch keyed by the unique role name. The insert goes first so
/// the transaction takes the write lock before reading; an existing or
/// concurrently inserted name is absorbed by `ON CONFLICT DO NOTHING`.
async fn find_or_create_role<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<role::Model, DbErr> {
    let inserted = role::Entity::insert(role::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(role::Column::Name)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await?;

    if inserted > 0 {
        debug!(role = %name, "Role created");
    }

    find_role_by_name(conn, name)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Role '{}' missing after upsert", name)))
}

/// Resolve role names to rows, ordered by role id.
async fn resolve_roles<C: ConnectionTrait>(
    conn: &C,
    names: &[String],
) -> Result<Vec<role::Model>, DbErr> {
    let mut roles = Vec::with_capacity(names.len());
    for name in names {
        let role = find_or_create_role(conn, name).await?;
        if !roles.iter().any(|r: &role::Model| r.id == role.id) {
            roles.push(role);
        }
    }
    roles.sort_by_key(|r| r.id);
    Ok(roles)
}

async fn attach_roles<C: ConnectionTrait>(
    conn: &C,
    login: &str,
    roles: &[role::Model],
) -> Result<(), DbErr> {
    if roles.is_empty() {
        return Ok(());
    }

    let links = roles.iter().map(|r| user_role::ActiveModel {
        user_login: Set(login.to_string()),
        role_id: Set(r.id),
    });

    user_role::Entity::insert_many(links)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

async fn detach_all_roles<C: ConnectionTrait>(conn: &C, login: &str) -> Result<(), DbErr> {
    user_role::Entity::delete_many()
        .filter(user_role::Column::UserLogin.eq(login))
        .exec(conn)
        .await?;
    Ok(())
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for SeaOrmUserRepository {
    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(login)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(model) = model else {
            return Ok(None);
        };

        let roles = load_roles(&self.db, &model).await.map_err(db_err)?;
        Ok(Some(user_model_to_domain(model, roles)))
    }

    async fn list_users(&self) -> DomainResult<Vec<UserSummary>> {
        let rows = user::Entity::find()
            .select_only()
            .column(user::Column::Login)
            .column(user::Column::Name)
            .order_by_asc(user::Column::Login)
            .into_model::<UserSummaryRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| UserSummary {
                login: row.login,
                name: row.name,
            })
            .collect())
    }

    async fn create_user(&self, new_user: NewUser) -> DomainResult<User> {
        let _write = self.write_guard().await;
        let txn = self.db.begin().await.map_err(db_err)?;

        let roles = resolve_roles(&txn, &new_user.roles)
            .await
            .map_err(db_err)?;

        let now = Utc::now();
        let login = new_user.login;
        let model = user::ActiveModel {
            login: Set(login.clone()),
            name: Set(new_user.name),
            password_hash: Set(new_user.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Conflict(format!("User with login '{}' already exists", login))
            } else {
                db_err(e)
            }
        })?;

        attach_roles(&txn, &model.login, &roles)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(user_model_to_domain(model, roles))
    }

    async fn update_user(&self, login: &str, changes: UserChanges) -> DomainResult<Option<User>> {
        let _write = self.write_guard().await;
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = user::Entity::find_by_id(login)
            .one(&txn)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&txn).await.map_err(db_err)?;

        if let Some(names) = changes.roles.as_deref() {
            let roles = resolve_roles(&txn, names).await.map_err(db_err)?;
            detach_all_roles(&txn, login).await.map_err(db_err)?;
            attach_roles(&txn, login, &roles).await.map_err(db_err)?;
        }

        let roles = load_roles(&txn, &updated).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(Some(user_model_to_domain(updated, roles)))
    }

    async fn delete_user(&self, login: &str) -> DomainResult<()> {
        let _write = self.write_guard().await;
        let txn = self.db.begin().await.map_err(db_err)?;

        // Same effect as the FK cascade where foreign keys are enforced.
        detach_all_roles(&txn, login).await.map_err(db_err)?;

        let result = user::Entity::delete_by_id(login)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::user_not_found(login));
        }

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }
}
