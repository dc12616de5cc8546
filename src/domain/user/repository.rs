use async_trait::async_trait;

use super::{NewUser, User, UserChanges, UserSummary};
use crate::support::DomainResult;

/// Persistence seam for users and their roles.
///
/// Role names passed in `NewUser` / `UserChanges` are resolved with
/// fetch-or-create semantics; implementations apply the role resolution and
/// the user write as one unit.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>>;

    async fn list_users(&self) -> DomainResult<Vec<UserSummary>>;

    /// Fails with `Conflict` when the login is taken.
    async fn create_user(&self, user: NewUser) -> DomainResult<User>;

    /// Returns `Ok(None)` when no user has this login.
    async fn update_user(&self, login: &str, changes: UserChanges) -> DomainResult<Option<User>>;

    /// Fails with `NotFound` when no user has this login.
    async fn delete_user(&self, login: &str) -> DomainResult<()>;
}
