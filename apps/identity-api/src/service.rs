//! # Identity Service
//!
//! Registration and login behind the HTTP boundary.
//!
//! ## Flows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Identity Flows                                    │
//! │                                                                         │
//! │  register(customerId, username, password)                               │
//! │    │                                                                    │
//! │    ├── validate inputs                                                  │
//! │    ├── username taken? ──────► DuplicateIdentity (before ANY write)     │
//! │    ├── customer id taken? ───► DuplicateIdentity (before ANY write)     │
//! │    ├── hash password (argon2)                                           │
//! │    └── insert account                                                   │
//! │                                                                         │
//! │  login(username, password)                                              │
//! │    │                                                                    │
//! │    ├── find account ─── none ──► AuthenticationFailed                   │
//! │    ├── verify hash ──── fail ──► AuthenticationFailed (same error)      │
//! │    └── TokenIssuer.issue(username, customerId)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use mercato_auth::{hash_password, verify_password, AuthError, TokenIssuer};
use mercato_core::validation::{validate_customer_id, validate_password, validate_username};
use mercato_core::{Account, CoreError};
use mercato_db::{AccountRepository, DbResult};

use crate::error::ApiError;

// =============================================================================
// Account Store Port
// =============================================================================

/// Persistence contract the identity service needs from account storage.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn username_exists(&self, username: &str) -> DbResult<bool>;
    async fn customer_id_exists(&self, customer_id: &str) -> DbResult<bool>;
    async fn insert(&self, account: &Account) -> DbResult<()>;
    async fn find_by_username(&self, username: &str) -> DbResult<Option<Account>>;
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn username_exists(&self, username: &str) -> DbResult<bool> {
        AccountRepository::username_exists(self, username).await
    }

    async fn customer_id_exists(&self, customer_id: &str) -> DbResult<bool> {
        AccountRepository::customer_id_exists(self, customer_id).await
    }

    async fn insert(&self, account: &Account) -> DbResult<()> {
        AccountRepository::insert(self, account).await
    }

    async fn find_by_username(&self, username: &str) -> DbResult<Option<Account>> {
        AccountRepository::find_by_username(self, username).await
    }
}

// =============================================================================
// Identity Service
// =============================================================================

/// Registration and login over an account store.
#[derive(Debug, Clone)]
pub struct IdentityService<S> {
    store: S,
    issuer: TokenIssuer,
}

impl<S: AccountStore> IdentityService<S> {
    /// Creates a new identity service.
    pub fn new(store: S, issuer: TokenIssuer) -> Self {
        IdentityService { store, issuer }
    }

    /// Registers a new account.
    ///
    /// Duplicate identity (username OR customer id) is detected by lookup
    /// before anything is written; the returned account carries no secrets
    /// when serialized.
    pub async fn register(
        &self,
        customer_id: &str,
        username: &str,
        password: &str,
    ) -> Result<Account, ApiError> {
        validate_customer_id(customer_id)?;
        validate_username(username)?;
        validate_password(password)?;

        if self.store.username_exists(username).await? {
            return Err(CoreError::duplicate_identity("username", username).into());
        }
        if self.store.customer_id_exists(customer_id).await? {
            return Err(CoreError::duplicate_identity("customerId", customer_id).into());
        }

        let account = Account {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            username: username.to_string(),
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };

        self.store.insert(&account).await?;

        info!(
            username = %account.username,
            customer_id = %account.customer_id,
            "Account registered"
        );

        Ok(account)
    }

    /// Verifies credentials and mints a bearer token.
    ///
    /// Unknown username and wrong password are indistinguishable to the
    /// caller: both are `AuthenticationFailed`.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let account = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AuthError::AuthenticationFailed)?;

        verify_password(password, &account.password_hash)?;

        let token = self.issuer.issue(&account.username, &account.customer_id)?;

        info!(
            username = %account.username,
            customer_id = %account.customer_id,
            "Token issued"
        );

        Ok(token)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use mercato_auth::ClaimsCodec;

    /// In-memory account store for service tests.
    struct MemoryAccountStore {
        accounts: Mutex<HashMap<String, Account>>,
    }

    impl MemoryAccountStore {
        fn new() -> Self {
            MemoryAccountStore {
                accounts: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl AccountStore for MemoryAccountStore {
        async fn username_exists(&self, username: &str) -> DbResult<bool> {
            Ok(self.accounts.lock().unwrap().contains_key(username))
        }

        async fn customer_id_exists(&self, customer_id: &str) -> DbResult<bool> {
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .values()
                .any(|a| a.customer_id == customer_id))
        }

        async fn insert(&self, account: &Account) -> DbResult<()> {
            self.accounts
                .lock()
                .unwrap()
                .insert(account.username.clone(), account.clone());
            Ok(())
        }

        async fn find_by_username(&self, username: &str) -> DbResult<Option<Account>> {
            Ok(self.accounts.lock().unwrap().get(username).cloned())
        }
    }

    fn service() -> IdentityService<MemoryAccountStore> {
        let issuer = TokenIssuer::new(ClaimsCodec::new("test-secret"), 3600);
        IdentityService::new(MemoryAccountStore::new(), issuer)
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = service();

        let account = service
            .register("cust-0001", "alice", "correct horse battery")
            .await
            .unwrap();
        assert_eq!(account.customer_id, "cust-0001");

        let token = service.login("alice", "correct horse battery").await.unwrap();
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let service = service();

        service
            .register("cust-0001", "alice", "correct horse battery")
            .await
            .unwrap();

        let err = service
            .register("cust-0002", "alice", "another password!")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Core(CoreError::DuplicateIdentity { .. })
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_customer_id() {
        let service = service();

        service
            .register("cust-0001", "alice", "correct horse battery")
            .await
            .unwrap();

        let err = service
            .register("cust-0001", "bob", "another password!")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Core(CoreError::DuplicateIdentity { .. })
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_weak_input() {
        let service = service();

        let err = service.register("cust-0001", "al", "pw").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_unknown_user_and_wrong_password_look_identical() {
        let service = service();
        service
            .register("cust-0001", "alice", "correct horse battery")
            .await
            .unwrap();

        let unknown = service.login("nobody", "whatever").await.unwrap_err();
        let wrong = service.login("alice", "wrong password").await.unwrap_err();

        // Same variant, same message: nothing leaks about which part failed
        assert!(matches!(
            unknown,
            ApiError::Auth(AuthError::AuthenticationFailed)
        ));
        assert!(matches!(
            wrong,
            ApiError::Auth(AuthError::AuthenticationFailed)
        ));
    }

    #[tokio::test]
    async fn test_issued_token_carries_customer_id() {
        use mercato_auth::TokenValidator;

        let service = service();
        service
            .register("cust-0001", "alice", "correct horse battery")
            .await
            .unwrap();

        let token = service.login("alice", "correct horse battery").await.unwrap();

        let validator = TokenValidator::new(ClaimsCodec::new("test-secret"));
        let customer = validator.validate(&token).unwrap();
        assert_eq!(customer.customer_id, "cust-0001");
    }
}
