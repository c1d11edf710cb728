//! Ownership-based authorization
//!
//! Callers pass their [`Authentication`] into every service operation and
//! the service checks it against the entity it loaded. There is no
//! ambient or thread-local caller identity.

use crate::domain::account::User;
use crate::error::{Error, Result};
use uuid::Uuid;

/// An entity owned by exactly one user
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// The caller's identity, or the lack of one
#[derive(Debug, Clone, Default)]
pub struct Authentication {
    user: Option<User>,
}

impl Authentication {
    /// An authenticated caller
    pub fn user(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// An unauthenticated caller
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The authenticated user's id, if any
    pub fn user_id(&self) -> Option<Uuid> {
        self.user.as_ref().map(User::id)
    }

    /// The authenticated user, or `AccessDenied`
    pub fn require(&self) -> Result<&User> {
        self.user.as_ref().ok_or(Error::AccessDenied)
    }
}

/// Check that the caller may access the given entity.
///
/// An absent entity is always accessible; whether it exists is the
/// caller's concern, not an authorization question. A present entity is
/// accessible only to its owner.
pub fn authorize(auth: &Authentication, entity: Option<&impl Owned>) -> Result<()> {
    let Some(entity) = entity else {
        return Ok(());
    };
    let user = auth.require()?;
    if user.id() != entity.owner_id() {
        return Err(Error::AccessDenied);
    }
    Ok(())
}

/// Check that the caller is the given user.
pub fn authorize_user(auth: &Authentication, user: &User) -> Result<()> {
    let caller = auth.require()?;
    if caller.id() != user.id() {
        return Err(Error::AccessDenied);
    }
    Ok(())
}
