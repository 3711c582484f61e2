use std::sync::Arc;

use bson::Uuid;
use log::{debug, info};

use crate::error::{Result, ServiceError};
use crate::model::User;
use crate::store::{StoreError, UserStore};

/// Looks up, registers and updates users.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn get_user_by_id(&self, id: Uuid) -> Result<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::UserNotFound)
    }

    /// Returns `None` if no user is registered with `email`.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.find_by_email(email).await?)
    }

    /// Registers a user without an address.
    pub async fn create_user(&self, name: &str, email: &str) -> Result<User> {
        if self.users.find_by_email(email).await?.is_some() {
            debug!("Email `{}` is already registered.", email);
            return Err(ServiceError::EmailTaken);
        }
        let user = User::new(name, email);
        match self.users.create(&user).await {
            Ok(()) => {
                info!("Created user `{}` with email `{}`.", user._id, email);
                Ok(user)
            }
            Err(StoreError::WriteConflict { .. }) => Err(ServiceError::EmailTaken),
            Err(error) => Err(error.into()),
        }
    }

    /// Overwrites the address of `user`, persists it and returns the stored address.
    pub async fn set_address(&self, user: &mut User, address: String) -> Result<String> {
        let updated = User {
            address: Some(address.clone()),
            ..user.clone()
        };
        match self.users.save(&updated).await {
            Ok(()) => {
                info!("Updated address of user `{}`.", updated._id);
                *user = updated;
                Ok(address)
            }
            Err(StoreError::Missing { .. }) => Err(ServiceError::UserNotFound),
            Err(error) => Err(error.into()),
        }
    }
}
