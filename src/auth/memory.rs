use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    repo::{StoreError, UserStore},
    repo_types::{NewUser, UniqueField, UserCredentials},
};

/// In-process `UserStore` enforcing the same unique columns as the `user` table.
#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<Vec<NewUser>>,
}

impl MemoryUserStore {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn get(&self, username: &str) -> Option<NewUser> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.username == username)
            .cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: &NewUser) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|row| row.username == user.username) {
            return Err(StoreError::UniqueViolation(Some(UniqueField::Username)));
        }
        if rows.iter().any(|row| row.email == user.email) {
            return Err(StoreError::UniqueViolation(Some(UniqueField::Email)));
        }
        rows.push(user.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, StoreError> {
        Ok(self.get(username).map(|row| UserCredentials {
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
        }))
    }
}
