//! Film catalog service.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use filmrate_common::{AppError, AppResult, IdGenerator};
use filmrate_db::{
    entities::film,
    repositories::{FilmDirectorRepository, FilmGenreRepository, FilmOrder, FilmRepository},
};
use sea_orm::{DatabaseConnection, NotSet, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::reference::{ReferenceKind, ReferenceLookupService};
use crate::services::validation;

/// A reference to a reference-table entry by id (`{"id": 1}`).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IdRef {
    /// Id of the referenced entry.
    pub id: i32,
}

/// Film fields shared by create and update.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FilmInput {
    /// Title; must not be blank.
    #[validate(custom(function = "validation::not_blank"))]
    pub name: String,
    /// At most 200 characters.
    #[serde(default)]
    #[validate(length(max = 200))]
    pub description: String,
    /// Not earlier than 1895-12-28.
    #[validate(custom(function = "validation::release_date"))]
    pub release_date: NaiveDate,
    /// Length in minutes; positive.
    #[validate(range(min = 1))]
    pub duration: i32,
    /// MPA rating.
    pub mpa: IdRef,
    /// Genres; repeated ids collapse to one.
    #[serde(default)]
    pub genres: Vec<IdRef>,
    /// Directors; repeated ids collapse to one.
    #[serde(default)]
    pub directors: Vec<IdRef>,
}

/// Input for updating a film.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFilmInput {
    /// Film to update.
    pub id: String,
    /// Replacement field values.
    #[serde(flatten)]
    #[validate(nested)]
    pub film: FilmInput,
}

/// Sort strategies for a director's films.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectorFilmsSort {
    /// Release date, oldest first.
    Year,
    /// Score, best first.
    Likes,
}

impl FromStr for DirectorFilmsSort {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year" => Ok(Self::Year),
            "likes" => Ok(Self::Likes),
            other => Err(AppError::Validation(format!(
                "sortBy must be 'year' or 'likes', got '{other}'"
            ))),
        }
    }
}

impl From<DirectorFilmsSort> for FilmOrder {
    fn from(sort: DirectorFilmsSort) -> Self {
        match sort {
            DirectorFilmsSort::Year => Self::ReleaseDateAsc,
            DirectorFilmsSort::Likes => Self::ScoreDesc,
        }
    }
}

/// `{id, name}` pair of a reference entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedRef {
    /// Entry id.
    pub id: i32,
    /// Display name.
    pub name: String,
}

/// A film with its reference data resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmDetails {
    /// Film id.
    pub id: String,
    /// Title.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Release date.
    pub release_date: NaiveDate,
    /// Length in minutes.
    pub duration: i32,
    /// MPA rating.
    pub mpa: NamedRef,
    /// Genres in the order they were linked.
    pub genres: Vec<NamedRef>,
    /// Directors in the order they were linked.
    pub directors: Vec<NamedRef>,
    /// Popularity score maintained by the rating aggregator.
    pub score: f64,
}

/// Drop repeated ids, keeping first-seen order.
fn unique_ids(refs: &[IdRef]) -> Vec<i32> {
    unique(refs.iter().map(|r| r.id))
}

/// Film catalog service.
#[derive(Clone)]
pub struct FilmService {
    db: Arc<DatabaseConnection>,
    film_repo: FilmRepository,
    film_genre_repo: FilmGenreRepository,
    film_director_repo: FilmDirectorRepository,
    reference: ReferenceLookupService,
    id_gen: IdGenerator,
}

impl FilmService {
    /// Create a new film service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        film_repo: FilmRepository,
        film_genre_repo: FilmGenreRepository,
        film_director_repo: FilmDirectorRepository,
        reference: ReferenceLookupService,
    ) -> Self {
        Self {
            db,
            film_repo,
            film_genre_repo,
            film_director_repo,
            reference,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a film.
    pub async fn get(&self, id: &str) -> AppResult<FilmDetails> {
        let film = self.film_repo.get_by_id(id).await?;
        let mut details = self.details(vec![film]).await?;
        details
            .pop()
            .ok_or_else(|| AppError::FilmNotFound(id.to_string()))
    }

    /// List every film.
    pub async fn list(&self) -> AppResult<Vec<FilmDetails>> {
        let films = self.film_repo.find_all().await?;
        self.details(films).await
    }

    /// Add a film to the catalog.
    pub async fn create(&self, input: FilmInput) -> AppResult<FilmDetails> {
        input.validate()?;
        let genre_ids = unique_ids(&input.genres);
        let director_ids = unique_ids(&input.directors);
        self.check_references(input.mpa.id, &genre_ids, &director_ids)
            .await?;

        if self
            .film_repo
            .find_by_name_and_release_date(&input.name, input.release_date)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "film '{}' released {} already exists",
                input.name, input.release_date
            )));
        }

        let id = self.id_gen.generate();
        let model = film::ActiveModel {
            id: Set(id.clone()),
            name: Set(input.name),
            description: Set(input.description),
            release_date: Set(input.release_date),
            duration: Set(input.duration),
            mpa_id: Set(input.mpa.id),
            score: Set(0.0),
            created_at: Set(Utc::now().into()),
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let created = self.film_repo.create(&txn, model).await?;
        self.replace_links(&txn, &id, &genre_ids, &director_ids)
            .await?;
        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(film_id = %id, name = %created.name, "Film created");

        self.one(created).await
    }

    /// Update a film's catalog fields and links. The score is left untouched.
    pub async fn update(&self, input: UpdateFilmInput) -> AppResult<FilmDetails> {
        input.validate()?;
        let UpdateFilmInput { id, film: input } = input;

        self.film_repo.get_by_id(&id).await?;
        let genre_ids = unique_ids(&input.genres);
        let director_ids = unique_ids(&input.directors);
        self.check_references(input.mpa.id, &genre_ids, &director_ids)
            .await?;

        if let Some(other) = self
            .film_repo
            .find_by_name_and_release_date(&input.name, input.release_date)
            .await?
        {
            if other.id != id {
                return Err(AppError::Conflict(format!(
                    "film '{}' released {} already exists",
                    input.name, input.release_date
                )));
            }
        }

        let model = film::ActiveModel {
            id: Set(id.clone()),
            name: Set(input.name),
            description: Set(input.description),
            release_date: Set(input.release_date),
            duration: Set(input.duration),
            mpa_id: Set(input.mpa.id),
            score: NotSet,
            created_at: NotSet,
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let updated = self.film_repo.update(&txn, model).await?;
        self.replace_links(&txn, &id, &genre_ids, &director_ids)
            .await?;
        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(film_id = %id, "Film updated");

        self.one(updated).await
    }

    /// Remove a film together with its ratings, reviews and links.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.film_repo.delete(id).await? {
            return Err(AppError::FilmNotFound(id.to_string()));
        }
        tracing::info!(film_id = %id, "Film deleted");
        Ok(())
    }

    /// Films of a director in the requested order.
    pub async fn director_films(
        &self,
        director_id: i32,
        sort: DirectorFilmsSort,
    ) -> AppResult<Vec<FilmDetails>> {
        if !self
            .reference
            .exists_by_id(ReferenceKind::Director, director_id)
            .await?
        {
            return Err(AppError::NotFound(format!(
                "{} {director_id}",
                ReferenceKind::Director
            )));
        }

        let films = self
            .film_repo
            .find_by_director(director_id, sort.into())
            .await?;
        self.details(films).await
    }

    /// Resolve MPA, genres and directors for a batch of films, keeping their order.
    pub async fn details(&self, films: Vec<film::Model>) -> AppResult<Vec<FilmDetails>> {
        if films.is_empty() {
            return Ok(Vec::new());
        }

        let film_ids: Vec<String> = films.iter().map(|f| f.id.clone()).collect();
        let genre_links = self.film_genre_repo.find_by_films(&film_ids).await?;
        let director_links = self.film_director_repo.find_by_films(&film_ids).await?;

        let mpa_ids: Vec<i32> = unique(films.iter().map(|f| f.mpa_id));
        let genre_ids: Vec<i32> = unique(genre_links.iter().map(|l| l.genre_id));
        let director_ids: Vec<i32> = unique(director_links.iter().map(|l| l.director_id));

        let mpa_names = self
            .reference
            .names_by_ids(ReferenceKind::Mpa, &mpa_ids)
            .await?;
        let genre_names = self
            .reference
            .names_by_ids(ReferenceKind::Genre, &genre_ids)
            .await?;
        let director_names = self
            .reference
            .names_by_ids(ReferenceKind::Director, &director_ids)
            .await?;

        let named = |names: &HashMap<i32, String>, id: i32| NamedRef {
            id,
            name: names.get(&id).cloned().unwrap_or_default(),
        };

        let mut genres_by_film: HashMap<&str, Vec<NamedRef>> = HashMap::new();
        for link in &genre_links {
            genres_by_film
                .entry(link.film_id.as_str())
                .or_default()
                .push(named(&genre_names, link.genre_id));
        }
        let mut directors_by_film: HashMap<&str, Vec<NamedRef>> = HashMap::new();
        for link in &director_links {
            directors_by_film
                .entry(link.film_id.as_str())
                .or_default()
                .push(named(&director_names, link.director_id));
        }

        let details = films
            .into_iter()
            .map(|f| {
                let genres = genres_by_film.remove(f.id.as_str()).unwrap_or_default();
                let directors = directors_by_film.remove(f.id.as_str()).unwrap_or_default();
                FilmDetails {
                    mpa: named(&mpa_names, f.mpa_id),
                    genres,
                    directors,
                    id: f.id,
                    name: f.name,
                    description: f.description,
                    release_date: f.release_date,
                    duration: f.duration,
                    score: f.score,
                }
            })
            .collect();
        Ok(details)
    }

    async fn one(&self, film: film::Model) -> AppResult<FilmDetails> {
        let id = film.id.clone();
        self.details(vec![film])
            .await?
            .pop()
            .ok_or(AppError::FilmNotFound(id))
    }

    async fn check_references(
        &self,
        mpa_id: i32,
        genre_ids: &[i32],
        director_ids: &[i32],
    ) -> AppResult<()> {
        let wanted = std::iter::once((ReferenceKind::Mpa, mpa_id))
            .chain(genre_ids.iter().map(|&id| (ReferenceKind::Genre, id)))
            .chain(director_ids.iter().map(|&id| (ReferenceKind::Director, id)));

        for (kind, id) in wanted {
            if !self.reference.exists_by_id(kind, id).await? {
                return Err(AppError::NotFound(format!("{kind} {id}")));
            }
        }
        Ok(())
    }

    async fn replace_links<C: sea_orm::ConnectionTrait>(
        &self,
        conn: &C,
        film_id: &str,
        genre_ids: &[i32],
        director_ids: &[i32],
    ) -> AppResult<()> {
        let genre_links = genre_ids
            .iter()
            .map(|&genre_id| (self.id_gen.generate(), genre_id))
            .collect();
        self.film_genre_repo
            .replace_for_film(conn, film_id, genre_links)
            .await?;

        let director_links = director_ids
            .iter()
            .map(|&director_id| (self.id_gen.generate(), director_id))
            .collect();
        self.film_director_repo
            .replace_for_film(conn, film_id, director_links)
            .await
    }
}

fn unique(ids: impl Iterator<Item = i32>) -> Vec<i32> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}
