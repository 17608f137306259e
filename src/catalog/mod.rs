// ABOUTME: In-process similarity index over the exercise catalog
// ABOUTME: Embeds exercise documents once and ranks free-text queries by cosine similarity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Exercise Catalog
//!
//! [`ExerciseIndex`] holds one embedded document per exercise and answers
//! nearest-neighbour queries by brute-force cosine similarity. The catalog is
//! a few thousand entries at most, so a linear scan behind a read lock is
//! fast enough and keeps the index rebuildable from the database at startup.
//!
//! - [`builtin`]: the fixed catalog seeded before any Hevy sync
//! - [`history`]: semantic search over a user's past workouts

pub mod builtin;
pub mod history;

pub use builtin::{builtin_exercises, ensure_catalog};
pub use history::{search_workout_history, workout_document, ScoredWorkout};

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::constants::goals::{ALL_GROUPS, ENDURANCE_GROUPS, FLEXIBILITY_GROUPS, STRENGTH_GROUPS};
use crate::constants::muscles::GENERAL_CATEGORIES;
use crate::embeddings::{cosine_similarity, EmbeddingProvider};
use crate::errors::AppResult;
use crate::models::Exercise;

/// Neighbours returned by the muscle-group and equipment lookups
pub const DEFAULT_LOOKUP_K: usize = 10;

const PRIMARY_MARKER: &str = "Primary muscles:";

/// Restrictions applied before ranking
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Only exercises using this equipment (`bodyweight` matches exercises needing none)
    pub equipment: Option<String>,
    /// User whose custom exercises are visible; other users' custom exercises are hidden
    pub owner: Option<Uuid>,
}

impl SearchFilter {
    /// Filter visible to one user
    #[must_use]
    pub const fn for_owner(owner: Uuid) -> Self {
        Self {
            equipment: None,
            owner: Some(owner),
        }
    }

    /// Restrict to an equipment type
    #[must_use]
    pub fn with_equipment(mut self, equipment: impl Into<String>) -> Self {
        self.equipment = Some(equipment.into());
        self
    }

    /// Whether `exercise` passes this filter
    #[must_use]
    pub fn matches(&self, exercise: &Exercise) -> bool {
        if let Some(owner) = exercise.owner_user_id {
            if self.owner != Some(owner) {
                return false;
            }
        }
        self.equipment
            .as_deref()
            .is_none_or(|equipment| exercise.uses_equipment(equipment))
    }
}

/// A search hit
#[derive(Debug, Clone, Serialize)]
pub struct ScoredExercise {
    /// The matched exercise
    pub exercise: Exercise,
    /// Cosine similarity to the query
    pub score: f32,
}

struct IndexedExercise {
    exercise: Exercise,
    vector: Vec<f32>,
}

/// Rewrite a free-text query into the shape of the indexed documents
///
/// A bare category such as `legs` targets primary muscles only; anything else
/// matches either primary or secondary muscles. Queries already phrased in
/// document form are kept as they are.
#[must_use]
pub fn standardize_query(query: &str) -> String {
    let query = query.trim();
    if query.contains(PRIMARY_MARKER) {
        return query.to_owned();
    }
    if GENERAL_CATEGORIES.contains(&query.to_lowercase().as_str()) {
        format!("{PRIMARY_MARKER} {query}")
    } else {
        format!("{PRIMARY_MARKER} {query} OR Secondary muscles: {query}")
    }
}

/// Muscle groups searched for a fitness goal
#[must_use]
pub fn goal_muscle_groups(goal: &str) -> &'static [&'static str] {
    match goal.trim().to_lowercase().as_str() {
        "strength" | "muscle_gain" => STRENGTH_GROUPS,
        "endurance" => ENDURANCE_GROUPS,
        "flexibility" => FLEXIBILITY_GROUPS,
        _ => ALL_GROUPS,
    }
}

/// Embedded exercise catalog
pub struct ExerciseIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    entries: RwLock<Vec<IndexedExercise>>,
}

impl ExerciseIndex {
    /// Embed `exercises` and build the index
    ///
    /// Exercises with no title or no primary muscles are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedding provider fails
    pub async fn build(
        exercises: Vec<Exercise>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> AppResult<Self> {
        let entries = Self::embed_exercises(embedder.as_ref(), exercises).await?;
        info!(
            exercises = entries.len(),
            provider = embedder.name(),
            "Exercise index built"
        );
        Ok(Self {
            embedder,
            entries: RwLock::new(entries),
        })
    }

    async fn embed_exercises(
        embedder: &dyn EmbeddingProvider,
        exercises: Vec<Exercise>,
    ) -> AppResult<Vec<IndexedExercise>> {
        let indexable: Vec<Exercise> = exercises
            .into_iter()
            .filter(|e| !e.title.trim().is_empty() && !e.primary_muscles.is_empty())
            .collect();
        let documents: Vec<String> = indexable.iter().map(Exercise::search_document).collect();
        let vectors = embedder.embed_batch(&documents).await?;

        Ok(indexable
            .into_iter()
            .zip(vectors)
            .map(|(exercise, vector)| IndexedExercise { exercise, vector })
            .collect())
    }

    /// Embed and insert exercises, replacing entries with the same id
    ///
    /// Returns the number of exercises indexed.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedding provider fails
    pub async fn add_exercises(&self, exercises: Vec<Exercise>) -> AppResult<usize> {
        let fresh = Self::embed_exercises(self.embedder.as_ref(), exercises).await?;
        let added = fresh.len();
        let ids: HashSet<String> = fresh.iter().map(|e| e.exercise.id.clone()).collect();

        let mut entries = self.entries.write().await;
        entries.retain(|entry| !ids.contains(&entry.exercise.id));
        entries.extend(fresh);
        debug!(added, total = entries.len(), "Exercise index updated");
        Ok(added)
    }

    /// Drop entries by id, returning how many were removed
    pub async fn remove_exercises(&self, ids: &HashSet<String>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|entry| !ids.contains(&entry.exercise.id));
        let removed = before - entries.len();
        debug!(removed, total = entries.len(), "Exercise index pruned");
        removed
    }

    /// Rank exercises against a free-text query
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be embedded
    pub async fn search(
        &self,
        query: &str,
        filter: &SearchFilter,
        k: usize,
    ) -> AppResult<Vec<ScoredExercise>> {
        if k == 0 || query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let standardized = standardize_query(query);
        let query_vector = self.embedder.embed(&standardized).await?;

        let entries = self.entries.read().await;
        let mut scored: Vec<ScoredExercise> = entries
            .iter()
            .filter(|entry| filter.matches(&entry.exercise))
            .map(|entry| ScoredExercise {
                exercise: entry.exercise.clone(),
                score: cosine_similarity(&query_vector, &entry.vector),
            })
            .collect();
        drop(entries);

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.exercise.title.cmp(&b.exercise.title))
        });
        scored.truncate(k);

        debug!(query = %standardized, hits = scored.len(), "Exercise search");
        Ok(scored)
    }

    /// Exercises targeting a muscle group
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be embedded
    pub async fn by_muscle_group(
        &self,
        muscle_group: &str,
        filter: &SearchFilter,
        k: usize,
    ) -> AppResult<Vec<ScoredExercise>> {
        self.search(&format!("exercises targeting {muscle_group}"), filter, k)
            .await
    }

    /// Exercises using a piece of equipment
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be embedded
    pub async fn by_equipment(
        &self,
        equipment: &str,
        filter: &SearchFilter,
        k: usize,
    ) -> AppResult<Vec<ScoredExercise>> {
        let filter = filter.clone().with_equipment(equipment);
        self.search(&format!("exercises using {equipment}"), &filter, k)
            .await
    }

    /// Exercises suited to a fitness goal, unique by title
    ///
    /// # Errors
    ///
    /// Returns an error if a query cannot be embedded
    pub async fn by_goal(
        &self,
        goal: &str,
        limit: usize,
        filter: &SearchFilter,
    ) -> AppResult<Vec<ScoredExercise>> {
        let mut seen = HashSet::new();
        let mut results = Vec::new();
        for group in goal_muscle_groups(goal) {
            for hit in self.by_muscle_group(group, filter, limit).await? {
                if seen.insert(hit.exercise.title.clone()) {
                    results.push(hit);
                }
            }
        }
        results.truncate(limit);
        Ok(results)
    }

    /// Exercise by template id
    pub async fn get(&self, id: &str) -> Option<Exercise> {
        self.entries
            .read()
            .await
            .iter()
            .find(|entry| entry.exercise.id == id)
            .map(|entry| entry.exercise.clone())
    }

    /// Exercise by exact title, ignoring case
    pub async fn by_title(&self, title: &str) -> Option<Exercise> {
        let wanted = title.trim().to_lowercase();
        self.entries
            .read()
            .await
            .iter()
            .find(|entry| entry.exercise.title.to_lowercase() == wanted)
            .map(|entry| entry.exercise.clone())
    }

    /// All template ids and a lookup from id to title
    pub async fn ids_and_names(&self) -> (HashSet<String>, HashMap<String, String>) {
        let entries = self.entries.read().await;
        let ids = entries.iter().map(|e| e.exercise.id.clone()).collect();
        let names = entries
            .iter()
            .map(|e| (e.exercise.id.clone(), e.exercise.title.clone()))
            .collect();
        (ids, names)
    }

    /// Number of indexed exercises
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing is indexed
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
