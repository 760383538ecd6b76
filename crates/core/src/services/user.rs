//! User service: accounts and the directed friendship graph.

use chrono::{NaiveDate, Utc};
use filmrate_common::{AppError, AppResult, IdGenerator};
use filmrate_db::{
    entities::{
        event::{EventType, Operation},
        friendship, user,
    },
    repositories::{FriendshipRepository, UserRepository},
};
use sea_orm::{NotSet, Set};
use serde::Deserialize;
use validator::Validate;

use crate::services::event_ledger::{EventLedgerService, NewEvent, record};
use crate::services::validation;

/// User fields shared by create and update.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    /// Contact address; must be a valid e-mail.
    #[validate(email)]
    pub email: String,
    /// Login; non-blank without spaces.
    #[validate(custom(function = "validation::login"))]
    pub login: String,
    /// Falls back to the login when blank or absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Birthday; cannot be in the future.
    #[validate(custom(function = "validation::birthday"))]
    pub birthday: Option<NaiveDate>,
}

impl UserInput {
    fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.login.clone(),
        }
    }
}

/// Input for updating a user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    /// User to update.
    pub id: String,
    /// Replacement field values.
    #[serde(flatten)]
    #[validate(nested)]
    pub user: UserInput,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    friendship_repo: FriendshipRepository,
    events: EventLedgerService,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        friendship_repo: FriendshipRepository,
        events: EventLedgerService,
    ) -> Self {
        Self {
            user_repo,
            friendship_repo,
            events,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a user.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// List every user.
    pub async fn list(&self) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_all().await
    }

    /// Register a user.
    pub async fn create(&self, input: UserInput) -> AppResult<user::Model> {
        input.validate()?;

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "e-mail {} is already registered",
                input.email
            )));
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.display_name()),
            email: Set(input.email),
            login: Set(input.login),
            birthday: Set(input.birthday),
            created_at: Set(Utc::now().into()),
        };
        let created = self.user_repo.create(model).await?;

        tracing::info!(user_id = %created.id, login = %created.login, "User created");
        Ok(created)
    }

    /// Update a user's profile.
    pub async fn update(&self, input: UpdateUserInput) -> AppResult<user::Model> {
        input.validate()?;
        let UpdateUserInput { id, user: input } = input;

        self.user_repo.get_by_id(&id).await?;
        if let Some(other) = self.user_repo.find_by_email(&input.email).await? {
            if other.id != id {
                return Err(AppError::Conflict(format!(
                    "e-mail {} is already registered",
                    input.email
                )));
            }
        }

        let model = user::ActiveModel {
            id: Set(id),
            name: Set(input.display_name()),
            email: Set(input.email),
            login: Set(input.login),
            birthday: Set(input.birthday),
            created_at: NotSet,
        };
        let updated = self.user_repo.update(model).await?;

        tracing::info!(user_id = %updated.id, "User updated");
        Ok(updated)
    }

    /// Delete a user and everything they own.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.user_repo.delete(id).await? {
            return Err(AppError::UserNotFound(id.to_string()));
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Add `friend_id` to `user_id`'s friends. The edge is one-directional;
    /// adding an existing friend changes nothing.
    pub async fn add_friend(&self, user_id: &str, friend_id: &str) -> AppResult<()> {
        if user_id == friend_id {
            return Err(AppError::Validation(
                "a user cannot befriend themselves".to_string(),
            ));
        }
        self.user_repo.get_by_id(user_id).await?;
        self.user_repo.get_by_id(friend_id).await?;

        let model = friendship::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            friend_id: Set(friend_id.to_string()),
            created_at: Set(Utc::now().into()),
        };
        if !self.friendship_repo.create(model).await? {
            return Ok(());
        }

        tracing::info!(user_id = %user_id, friend_id = %friend_id, "Friend added");
        record(
            &self.events,
            NewEvent::new(user_id, EventType::Friend, Operation::Add, friend_id),
        )
        .await;
        Ok(())
    }

    /// Remove `friend_id` from `user_id`'s friends.
    pub async fn remove_friend(&self, user_id: &str, friend_id: &str) -> AppResult<()> {
        self.user_repo.get_by_id(user_id).await?;
        self.user_repo.get_by_id(friend_id).await?;

        if !self.friendship_repo.delete_edge(user_id, friend_id).await? {
            return Err(AppError::NotFound(format!(
                "Friendship {user_id} -> {friend_id}"
            )));
        }

        tracing::info!(user_id = %user_id, friend_id = %friend_id, "Friend removed");
        record(
            &self.events,
            NewEvent::new(user_id, EventType::Friend, Operation::Remove, friend_id),
        )
        .await;
        Ok(())
    }

    /// Users `user_id` has added as friends, ordered by id.
    pub async fn friends(&self, user_id: &str) -> AppResult<Vec<user::Model>> {
        self.user_repo.get_by_id(user_id).await?;
        let ids = self.friendship_repo.friend_ids(user_id).await?;
        self.user_repo.find_by_ids(&ids).await
    }
}
