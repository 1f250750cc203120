use dashmap::mapref::entry::Entry;
use time::OffsetDateTime;
use tracing::info;

use super::{newest_first, Store, StoreError};
use crate::model::{Id, User};
use crate::money::{Bbc, Coins};

impl Store {
    /// Register a new account with zero balances.
    pub fn create_user(&self, username: &str, password_hash: String) -> Result<User, StoreError> {
        match self.usernames.entry(username.to_owned()) {
            Entry::Occupied(_) => Err(StoreError::UsernameTaken),
            Entry::Vacant(slot) => {
                let user = User {
                    id: self.ids.users.next(),
                    username: username.to_owned(),
                    password_hash,
                    coin_balance: Coins::ZERO,
                    bbc_balance: Bbc::ZERO,
                    is_admin: false,
                    is_banned: false,
                    created_at: OffsetDateTime::now_utc(),
                };
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                info!(user_id = user.id, username, "user registered");
                Ok(user)
            }
        }
    }

    pub fn user(&self, id: Id) -> Result<User, StoreError> {
        self.users.get(&id).map(|u| u.clone()).ok_or(StoreError::UserNotFound)
    }

    pub fn user_by_username(&self, username: &str) -> Option<User> {
        let id = *self.usernames.get(username)?;
        self.users.get(&id).map(|u| u.clone())
    }

    pub fn set_banned(&self, id: Id, banned: bool) -> Result<User, StoreError> {
        let mut user = self.users.get_mut(&id).ok_or(StoreError::UserNotFound)?;
        if banned && user.is_admin {
            return Err(StoreError::AdminProtected);
        }
        user.is_banned = banned;
        info!(user_id = id, banned, "ban flag changed");
        Ok(user.clone())
    }

    pub fn non_admin_users(&self) -> Vec<User> {
        let rows = self
            .users
            .iter()
            .filter(|u| !u.is_admin)
            .map(|u| u.clone())
            .collect();
        newest_first(rows, |u: &User| (u.created_at, u.id))
    }
}
