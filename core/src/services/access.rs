//! Role and account-state checks shared by every protected operation

use crate::domain::entities::user::{User, UserRole};
use crate::errors::{AuthError, DomainResult};

/// Fails unless `actual` is one of `allowed`
pub fn ensure_role(actual: UserRole, allowed: &[UserRole]) -> DomainResult<()> {
    if allowed.contains(&actual) {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermissions.into())
    }
}

/// Fails for blocked accounts
pub fn ensure_active(user: &User) -> DomainResult<()> {
    if user.is_blocked {
        Err(AuthError::UserBlocked.into())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;

    #[test]
    fn test_ensure_role() {
        assert!(ensure_role(UserRole::Admin, &[UserRole::Admin]).is_ok());
        assert!(ensure_role(UserRole::Instructor, &[UserRole::Instructor, UserRole::Admin]).is_ok());
        assert!(matches!(
            ensure_role(UserRole::Student, &[UserRole::Admin]),
            Err(DomainError::Auth(AuthError::InsufficientPermissions))
        ));
    }

    #[test]
    fn test_ensure_active() {
        let mut user = User::new("Ana", "ana@example.com", None, UserRole::Student);
        assert!(ensure_active(&user).is_ok());

        user.block();
        assert!(matches!(
            ensure_active(&user),
            Err(DomainError::Auth(AuthError::UserBlocked))
        ));
    }
}
