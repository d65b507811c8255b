//! Local accounts and the stored session token.

use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    jwtoken::{decode_token, generate_token},
    models::lobby::{AuthSession, Registration, UserAccount},
    storage::{read_json, write_json, KeyValueStore},
};

pub const USERS_KEY: &str = "quiz-users";
pub const TOKEN_KEY: &str = "quiz-token";

pub struct Accounts<'a, S: ?Sized> {
    store: &'a S,
    signing_key: &'a str,
    token_ttl: Duration,
}

impl<'a, S: KeyValueStore + ?Sized> Accounts<'a, S> {
    pub fn new(store: &'a S, signing_key: &'a str, token_ttl: Duration) -> Self {
        Accounts {
            store,
            signing_key,
            token_ttl,
        }
    }

    pub fn users(&self) -> Result<Vec<UserAccount>, AppError> {
        Ok(read_json(self.store, USERS_KEY)?.unwrap_or_default())
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, AppError> {
        Ok(self.users()?.into_iter().find(|user| user.email == email))
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>, AppError> {
        Ok(self.users()?.into_iter().find(|user| user.id == id))
    }

    /// Creates an account and signs it in, unless the email is already registered.
    pub fn register(
        &self,
        email: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Registration, AppError> {
        let mut users = self.users()?;
        if users.iter().any(|user| user.email == email) {
            warn!("Registration rejected, email already in use: {}", email);
            return Ok(Registration::EmailTaken);
        }

        let user = UserAccount {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            created_at: now,
        };
        users.push(user.clone());
        write_json(self.store, USERS_KEY, &users)?;
        info!("Registered user {}", user.id);

        Ok(Registration::Created(self.sign_in(user, now)?))
    }

    pub fn login(&self, email: &str, now: DateTime<Utc>) -> Result<Option<AuthSession>, AppError> {
        match self.find_by_email(email)? {
            Some(user) => {
                info!("User {} signed in", user.id);
                Ok(Some(self.sign_in(user, now)?))
            }
            None => Ok(None),
        }
    }

    pub fn logout(&self) -> Result<(), AppError> {
        self.store.remove(TOKEN_KEY)?;
        Ok(())
    }

    /// Resumes the stored session if its token is readable, unexpired and names a user
    /// that still exists. Unreadable tokens are deleted.
    pub fn restore(&self, now: DateTime<Utc>) -> Result<Option<AuthSession>, AppError> {
        let Some(token) = self.store.get(TOKEN_KEY)? else {
            return Ok(None);
        };

        let claims = match decode_token(&token, self.signing_key) {
            Ok(claims) => claims,
            Err(error) => {
                warn!("Discarding unreadable session token: {}", error);
                self.store.remove(TOKEN_KEY)?;
                return Ok(None);
            }
        };

        if claims.is_expired(now) {
            info!("Session token for {} expired", claims.user_id);
            return Ok(None);
        }

        Ok(self
            .find_by_id(&claims.user_id)?
            .map(|user| AuthSession { user, token }))
    }

    fn sign_in(&self, user: UserAccount, now: DateTime<Utc>) -> Result<AuthSession, AppError> {
        let token = generate_token(&user, now, self.token_ttl, self.signing_key)?;
        self.store.set(TOKEN_KEY, &token)?;
        Ok(AuthSession { user, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const KEY: &str = "test-key";

    fn accounts(store: &MemoryStore) -> Accounts<'_, MemoryStore> {
        Accounts::new(store, KEY, Duration::hours(24))
    }

    #[test]
    fn register_then_login_by_email() {
        let store = MemoryStore::new();
        let accounts = accounts(&store);
        let now = Utc::now();

        let created = match accounts.register("ada@example.com", "Ada", now).unwrap() {
            Registration::Created(session) => session,
            Registration::EmailTaken => panic!("fresh email rejected"),
        };
        assert_eq!(created.user.name, "Ada");
        assert_eq!(store.get(TOKEN_KEY).unwrap(), Some(created.token.clone()));

        accounts.logout().unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);

        let session = accounts.login("ada@example.com", now).unwrap().unwrap();
        assert_eq!(session.user, created.user);
        assert!(accounts.login("nobody@example.com", now).unwrap().is_none());
    }

    #[test]
    fn restore_honours_expiry_and_existence() {
        let store = MemoryStore::new();
        let accounts = accounts(&store);
        let now = Utc::now();
        accounts.register("ada@example.com", "Ada", now).unwrap();

        let restored = accounts.restore(now + Duration::hours(1)).unwrap().unwrap();
        assert_eq!(restored.user.email, "ada@example.com");
        assert!(accounts.restore(now + Duration::hours(25)).unwrap().is_none());

        // the referenced user disappears
        store.set(USERS_KEY, "[]").unwrap();
        assert!(accounts.restore(now).unwrap().is_none());
    }

    #[test]
    fn corrupt_token_is_discarded() {
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, "definitely not a jwt").unwrap();

        assert!(accounts(&store).restore(Utc::now()).unwrap().is_none());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }
}
