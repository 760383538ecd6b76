//! Reference data: genres, MPA ratings and directors.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use filmrate_common::{AppError, AppResult};
use filmrate_db::{
    entities::{director, genre, mpa},
    repositories::{DirectorRepository, GenreRepository, MpaRepository},
};
use sea_orm::{NotSet, Set};
use serde::Deserialize;
use validator::Validate;

use crate::services::validation;

/// Kinds of reference data a film points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Film genres.
    Genre,
    /// MPA age ratings.
    Mpa,
    /// Film directors.
    Director,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Genre => "Genre",
            Self::Mpa => "Mpa",
            Self::Director => "Director",
        })
    }
}

/// Narrow read view of reference data used by the film catalog.
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    /// Whether a reference entry exists.
    async fn exists_by_id(&self, kind: ReferenceKind, id: i32) -> AppResult<bool>;

    /// Display name of a reference entry.
    async fn name_by_id(&self, kind: ReferenceKind, id: i32) -> AppResult<Option<String>>;

    /// Display names of several entries of one kind; unknown ids are absent.
    async fn names_by_ids(
        &self,
        kind: ReferenceKind,
        ids: &[i32],
    ) -> AppResult<HashMap<i32, String>>;
}

/// Type alias for a shared reference lookup.
pub type ReferenceLookupService = Arc<dyn ReferenceLookup>;

/// Input for creating a director.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDirectorInput {
    /// Director name; must not be blank.
    #[validate(custom(function = "validation::not_blank"))]
    pub name: String,
}

/// Input for updating a director.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDirectorInput {
    /// Director to update.
    pub id: i32,
    /// New name; must not be blank.
    #[validate(custom(function = "validation::not_blank"))]
    pub name: String,
}

/// Service for reference data.
#[derive(Clone)]
pub struct ReferenceService {
    mpa_repo: MpaRepository,
    genre_repo: GenreRepository,
    director_repo: DirectorRepository,
}

impl ReferenceService {
    /// Create a new reference service.
    #[must_use]
    pub const fn new(
        mpa_repo: MpaRepository,
        genre_repo: GenreRepository,
        director_repo: DirectorRepository,
    ) -> Self {
        Self {
            mpa_repo,
            genre_repo,
            director_repo,
        }
    }

    /// List all genres.
    pub async fn genres(&self) -> AppResult<Vec<genre::Model>> {
        self.genre_repo.find_all().await
    }

    /// Get a genre.
    pub async fn genre(&self, id: i32) -> AppResult<genre::Model> {
        self.genre_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {id}", ReferenceKind::Genre)))
    }

    /// List all MPA ratings.
    pub async fn mpa_ratings(&self) -> AppResult<Vec<mpa::Model>> {
        self.mpa_repo.find_all().await
    }

    /// Get an MPA rating.
    pub async fn mpa(&self, id: i32) -> AppResult<mpa::Model> {
        self.mpa_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {id}", ReferenceKind::Mpa)))
    }

    /// List all directors.
    pub async fn directors(&self) -> AppResult<Vec<director::Model>> {
        self.director_repo.find_all().await
    }

    /// Get a director.
    pub async fn director(&self, id: i32) -> AppResult<director::Model> {
        self.director_repo.get_by_id(id).await
    }

    /// Create a director.
    pub async fn create_director(&self, input: CreateDirectorInput) -> AppResult<director::Model> {
        input.validate()?;

        let model = director::ActiveModel {
            id: NotSet,
            name: Set(input.name.trim().to_string()),
        };
        let created = self.director_repo.create(model).await?;

        tracing::info!(director_id = created.id, "Director created");
        Ok(created)
    }

    /// Rename a director.
    pub async fn update_director(&self, input: UpdateDirectorInput) -> AppResult<director::Model> {
        input.validate()?;
        self.director_repo.get_by_id(input.id).await?;

        let model = director::ActiveModel {
            id: Set(input.id),
            name: Set(input.name.trim().to_string()),
        };
        self.director_repo.update(model).await
    }

    /// Delete a director; their film credits go with them.
    pub async fn delete_director(&self, id: i32) -> AppResult<()> {
        if !self.director_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("{} {id}", ReferenceKind::Director)));
        }
        tracing::info!(director_id = id, "Director deleted");
        Ok(())
    }
}

#[async_trait]
impl ReferenceLookup for ReferenceService {
    async fn exists_by_id(&self, kind: ReferenceKind, id: i32) -> AppResult<bool> {
        Ok(self.name_by_id(kind, id).await?.is_some())
    }

    async fn name_by_id(&self, kind: ReferenceKind, id: i32) -> AppResult<Option<String>> {
        let name = match kind {
            ReferenceKind::Genre => self.genre_repo.find_by_id(id).await?.map(|g| g.name),
            ReferenceKind::Mpa => self.mpa_repo.find_by_id(id).await?.map(|m| m.name),
            ReferenceKind::Director => self.director_repo.find_by_id(id).await?.map(|d| d.name),
        };
        Ok(name)
    }

    async fn names_by_ids(
        &self,
        kind: ReferenceKind,
        ids: &[i32],
    ) -> AppResult<HashMap<i32, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let names = match kind {
            ReferenceKind::Genre => self
                .genre_repo
                .find_by_ids(ids)
                .await?
                .into_iter()
                .map(|g| (g.id, g.name))
                .collect(),
            ReferenceKind::Mpa => self
                .mpa_repo
                .find_all()
                .await?
                .into_iter()
                .filter(|m| ids.contains(&m.id))
                .map(|m| (m.id, m.name))
                .collect(),
            ReferenceKind::Director => self
                .director_repo
                .find_by_ids(ids)
                .await?
                .into_iter()
                .map(|d| (d.id, d.name))
                .collect(),
        };
        Ok(names)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

    fn service(db: Arc<DatabaseConnection>) -> ReferenceService {
        ReferenceService::new(
            MpaRepository::new(Arc::clone(&db)),
            GenreRepository::new(Arc::clone(&db)),
            DirectorRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_unknown_genre_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<genre::Model>::new()])
                .into_connection(),
        );

        let result = service(db).genre(99).await;

        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Genre 99"));
    }

    #[tokio::test]
    async fn test_lookup_names_mpa() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    mpa::Model { id: 1, name: "G".to_string() },
                    mpa::Model { id: 3, name: "PG-13".to_string() },
                    mpa::Model { id: 4, name: "R".to_string() },
                ]])
                .into_connection(),
        );

        let names = service(db)
            .names_by_ids(ReferenceKind::Mpa, &[3, 4])
            .await
            .unwrap();

        assert_eq!(names.len(), 2);
        assert_eq!(names[&3], "PG-13");
    }

    #[tokio::test]
    async fn test_exists_by_id() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[director::Model { id: 5, name: "Mann".to_string() }]])
                .append_query_results([Vec::<director::Model>::new()])
                .into_connection(),
        );
        let service = service(db);

        assert!(service.exists_by_id(ReferenceKind::Director, 5).await.unwrap());
        assert!(!service.exists_by_id(ReferenceKind::Director, 6).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_director_rejects_blank_name() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service(db)
            .create_director(CreateDirectorInput {
                name: "  ".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
