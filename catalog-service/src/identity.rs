use std::sync::Arc;

use thiserror::Error;

use crate::models::Identity;
use crate::store::{StoreError, UserStore};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no identity for username")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read-only lookup of canonical identities by username.
#[derive(Clone)]
pub struct IdentityResolver {
    users: Arc<dyn UserStore>,
}

impl IdentityResolver {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn resolve(&self, username: &str) -> Result<Identity, ResolveError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or(ResolveError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewIdentity;
    use crate::store::MemoryStore;
    use common_auth::Role;

    #[tokio::test]
    async fn resolves_saved_identity() {
        let store = Arc::new(MemoryStore::new());
        store
            .save(NewIdentity {
                username: "alice".into(),
                password_hash: "hash".into(),
                role: Role::Admin,
            })
            .await
            .unwrap();

        let resolver = IdentityResolver::new(store);
        let identity = resolver.resolve("alice").await.unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert!(matches!(
            resolver.resolve("bob").await,
            Err(ResolveError::NotFound)
        ));
    }
}
