use std::sync::Arc;

use crate::change::changed;
use crate::domain::{Post, User, UserFields};
use crate::error::DomainError;
use crate::outcome::{Outcome, Route};
use crate::ports::{PostRepository, UserRepository};

use super::{error_route, missing};

/// Create, update and delete users.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { users, posts }
    }

    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.find_all().await?)
    }

    pub async fn get(&self, id: i32) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// Posts written by the user, failing if the user does not exist.
    pub async fn posts(&self, id: i32) -> Result<Vec<Post>, DomainError> {
        self.get(id).await?;
        Ok(self.posts.find_by_user_id(id).await?)
    }

    pub async fn create(&self, fields: &UserFields) -> Outcome {
        match self.try_create(fields).await {
            Ok(user) => Outcome::ok(format!("User '{}' added.", user.full_name()), Route::Users),
            Err(err) => Outcome::failed(err, Route::Users),
        }
    }

    async fn try_create(&self, fields: &UserFields) -> Result<User, DomainError> {
        let new_user = fields.normalize()?;
        let user = self.users.insert(new_user).await?;
        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    pub async fn update(&self, id: i32, fields: &UserFields) -> Outcome {
        match self.try_update(id, fields).await {
            Ok(outcome) => outcome,
            Err(err) => {
                let route = error_route(&err, Route::Users, Route::User(id));
                Outcome::failed(err, route)
            }
        }
    }

    async fn try_update(&self, id: i32, fields: &UserFields) -> Result<Outcome, DomainError> {
        let current = self.get(id).await?;
        let next = fields.normalize()?;

        let before = [
            Some(current.first_name.as_str()),
            current.last_name.as_deref(),
            current.image_url.as_deref(),
        ];
        let after = [
            Some(next.first_name.as_str()),
            next.last_name.as_deref(),
            next.image_url.as_deref(),
        ];

        if !changed(&before, &after) {
            tracing::debug!(user_id = id, "User update skipped, nothing changed");
            return Ok(Outcome::warning(
                format!("User '{}': no changes.", current.full_name()),
                Route::User(id),
            ));
        }

        let updated = self
            .users
            .update(User {
                id,
                first_name: next.first_name,
                last_name: next.last_name,
                image_url: next.image_url,
            })
            .await
            .map_err(missing("User", id))?;
        tracing::info!(user_id = id, "User updated");

        Ok(Outcome::ok(
            format!("User '{}' updated.", updated.full_name()),
            Route::User(id),
        ))
    }

    /// Delete a user. Users who still own posts are kept.
    pub async fn delete(&self, id: i32) -> Outcome {
        match self.try_delete(id).await {
            Ok(outcome) => outcome,
            Err(err) => {
                let route = error_route(&err, Route::Users, Route::User(id));
                Outcome::failed(err, route)
            }
        }
    }

    async fn try_delete(&self, id: i32) -> Result<Outcome, DomainError> {
        let user = self.get(id).await?;

        let owned = self.posts.find_by_user_id(id).await?.len();
        if owned > 0 {
            return Err(DomainError::Conflict(format!(
                "User '{}' still has {owned} post(s); delete them first",
                user.full_name()
            )));
        }

        self.users.delete(id).await.map_err(missing("User", id))?;
        tracing::info!(user_id = id, "User deleted");

        Ok(Outcome::ok(
            format!("User '{}' deleted.", user.full_name()),
            Route::Users,
        ))
    }
}
