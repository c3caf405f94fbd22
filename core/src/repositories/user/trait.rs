//! User repository trait defining the interface for user data persistence.
//!
//! The trait is async-first and uses Result types for proper error handling.
//! Implementations must store emails exactly as given; callers normalize them
//! before every lookup.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::{User, UserRole};
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// This trait defines the contract for data access operations related to users.
/// Implementations handle the actual storage while keeping the abstraction
/// boundary between domain and infrastructure layers.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their normalized email address
    ///
    /// # Arguments
    /// * `email` - Normalized (trimmed, lowercase) email address
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user found with given email
    /// * `Err(DomainError)` - Storage error occurred
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    ///
    /// # Arguments
    /// * `id` - The UUID of the user
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user found with given ID
    /// * `Err(DomainError)` - Storage error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Create a new user in the repository
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError::Auth(AuthError::UserAlreadyExists))` - Email taken
    /// * `Err(DomainError)` - Creation failed
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user in the repository
    ///
    /// # Returns
    /// * `Ok(User)` - The updated user
    /// * `Err(DomainError::NotFound)` - No such user
    /// * `Err(DomainError::Auth(AuthError::UserAlreadyExists))` - New email taken
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// Delete a user from the repository
    ///
    /// # Returns
    /// * `Ok(true)` - User was deleted
    /// * `Ok(false)` - User not found
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Check if a user exists with the given normalized email
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;

    /// Count users, optionally filtered by role
    ///
    /// # Arguments
    /// * `role` - Optional filter by role (None counts all users)
    async fn count_by_role(&self, role: Option<UserRole>) -> Result<u64, DomainError>;
}
