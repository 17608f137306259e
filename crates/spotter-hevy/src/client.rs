// ABOUTME: Hevy REST API client for workouts, routines, folders, and exercise templates
// ABOUTME: Maps Hevy HTTP failures onto AppError codes and handles pagination
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use spotter_core::errors::{AppError, AppResult, ErrorCode};
use spotter_core::models::{Routine, Workout};
use tracing::{debug, info, instrument, warn};

use crate::http_client::shared_client;
use crate::models::{
    CreatedRoutineFolderResponse, CreatedRoutineResponse, CreatedWorkoutResponse,
    HevyExerciseTemplate, HevyExerciseTemplatesPage, HevyRoutine, HevyRoutineFolder,
    HevyRoutineFoldersPage, HevyRoutinesPage, HevyWorkout, HevyWorkoutCount,
    HevyWorkoutEventsPage, HevyWorkoutsPage, RoutineFolderBody, RoutineFolderPayload,
    RoutinePayload, WorkoutPayload,
};

/// Public Hevy API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.hevyapp.com/v1";

const SERVICE_NAME: &str = "Hevy";
const API_KEY_HEADER: &str = "api-key";
const WORKOUTS_PAGE_SIZE: u32 = 10;
const TEMPLATES_PAGE_SIZE: u32 = 100;
const MAX_TEMPLATE_PAGES: u32 = 10;
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

/// Client for one Hevy account
#[derive(Clone)]
pub struct HevyClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for HevyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HevyClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl HevyClient {
    /// Create a client for the given API key
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` if the key is blank
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> AppResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AppError::invalid_input("Hevy API key not configured"));
        }
        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client: shared_client().clone(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.api_url(path))
            .header(API_KEY_HEADER, &self.api_key)
    }

    /// Map a non-success Hevy response onto an `AppError`
    fn parse_error_response(status: StatusCode, body: &str) -> AppError {
        let preview: String = body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
        match status.as_u16() {
            401 | 403 => AppError::external_auth_failed(
                SERVICE_NAME,
                format!("API key rejected ({status}): {preview}"),
            ),
            404 => AppError::not_found("Hevy resource").with_details(serde_json::json!({
                "status": status.as_u16(),
                "body": preview,
            })),
            429 => AppError::external_rate_limited(
                SERVICE_NAME,
                "Hevy rate limit reached, try again shortly",
            ),
            500..=599 => AppError::external_unavailable(
                SERVICE_NAME,
                format!("Hevy returned {status}: {preview}"),
            ),
            _ => AppError::external_service(
                SERVICE_NAME,
                format!("Unexpected response ({status}): {preview}"),
            ),
        }
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
        expected: Option<StatusCode>,
    ) -> AppResult<T> {
        let status = response.status();
        let body = response.text().await?;

        let accepted = expected.map_or_else(|| status.is_success(), |code| status == code);
        if !accepted {
            return Err(Self::parse_error_response(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            AppError::external_service(SERVICE_NAME, format!("Malformed response: {e}"))
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        debug!(path, "Hevy GET");
        let response = self.request(Method::GET, path).query(query).send().await?;
        Self::read_json(response, None).await
    }

    async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        expected: Option<StatusCode>,
    ) -> AppResult<T> {
        debug!(path, %method, "Hevy write");
        let response = self.request(method, path).json(body).send().await?;
        Self::read_json(response, expected).await
    }

    // ================================================================================
    // Workouts
    // ================================================================================

    /// Fetch one page of workouts, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if Hevy rejects the request or is unreachable
    pub async fn list_workouts(&self, page: u32, page_size: u32) -> AppResult<HevyWorkoutsPage> {
        self.get_json(
            "workouts",
            &[
                ("page", page.to_string()),
                ("pageSize", page_size.to_string()),
            ],
        )
        .await
    }

    /// All workouts that started at or after `start`
    ///
    /// Stops paging once a whole page predates `start`.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails
    #[instrument(skip(self))]
    pub async fn workouts_since(&self, start: DateTime<Utc>) -> AppResult<Vec<HevyWorkout>> {
        let mut collected = Vec::new();
        let mut page = 1;

        loop {
            let result = self.list_workouts(page, WORKOUTS_PAGE_SIZE).await?;
            if result.workouts.is_empty() {
                break;
            }

            let before = collected.len();
            collected.extend(
                result
                    .workouts
                    .into_iter()
                    .filter(|workout| workout.start_time >= start),
            );

            if collected.len() == before || page >= result.page_count {
                break;
            }
            page += 1;
        }

        info!(count = collected.len(), %start, "Fetched Hevy workouts");
        Ok(collected)
    }

    /// Total number of workouts in the account
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn workout_count(&self) -> AppResult<u64> {
        let count: HevyWorkoutCount = self.get_json("workouts/count", &[]).await?;
        Ok(count.workout_count)
    }

    /// Workout updates and deletions since a point in time
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn workout_events(
        &self,
        since: DateTime<Utc>,
        page: u32,
    ) -> AppResult<HevyWorkoutEventsPage> {
        self.get_json(
            "workouts/events",
            &[
                ("since", since.to_rfc3339()),
                ("page", page.to_string()),
                ("pageSize", WORKOUTS_PAGE_SIZE.to_string()),
            ],
        )
        .await
    }

    /// Fetch a single workout
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` if the workout does not exist
    pub async fn get_workout(&self, workout_id: &str) -> AppResult<HevyWorkout> {
        self.get_json(&format!("workouts/{workout_id}"), &[]).await
    }

    /// Log a workout in Hevy and return its id
    ///
    /// # Errors
    ///
    /// Returns an error if Hevy rejects the workout or the response has no id
    #[instrument(skip(self, workout), fields(title = %workout.title))]
    pub async fn create_workout(&self, workout: &Workout) -> AppResult<String> {
        let payload = WorkoutPayload::from(workout);
        let response: CreatedWorkoutResponse = self
            .send_json(Method::POST, "workouts", &payload, None)
            .await?;

        response
            .workout
            .into_iter()
            .next()
            .map(|created| created.id)
            .ok_or_else(|| {
                AppError::external_service(SERVICE_NAME, "Workout id missing from response")
            })
    }

    /// Replace an existing Hevy workout
    ///
    /// # Errors
    ///
    /// Returns an error if Hevy rejects the update
    pub async fn update_workout(&self, workout_id: &str, workout: &Workout) -> AppResult<()> {
        let payload = WorkoutPayload::from(workout);
        let _: serde_json::Value = self
            .send_json(
                Method::PUT,
                &format!("workouts/{workout_id}"),
                &payload,
                None,
            )
            .await?;
        Ok(())
    }

    // ================================================================================
    // Routines
    // ================================================================================

    /// Fetch the first page of routines
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn list_routines(&self) -> AppResult<Vec<HevyRoutine>> {
        let page: HevyRoutinesPage = self.get_json("routines", &[]).await?;
        Ok(page.routines)
    }

    /// Create a routine and return its Hevy id
    ///
    /// Every exercise template id is checked against Hevy first.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for an unknown or empty template id, or an
    /// external-service error if Hevy does not answer `201 Created`
    #[instrument(skip(self, routine), fields(title = %routine.title))]
    pub async fn create_routine(&self, routine: &Routine) -> AppResult<String> {
        for exercise in &routine.exercises {
            let template_id = exercise.exercise_template_id.trim();
            if template_id.is_empty() {
                return Err(AppError::invalid_input(
                    "Routine exercise is missing its exercise template id",
                ));
            }
            match self.get_exercise_template(template_id).await {
                Ok(_) => debug!(template_id, "Validated exercise template"),
                Err(e) if e.code == ErrorCode::ResourceNotFound => {
                    return Err(AppError::invalid_input(format!(
                        "Invalid exercise template id: {template_id}"
                    )));
                }
                Err(e) => return Err(e),
            }
        }

        let payload = RoutinePayload::from(routine);
        let response: CreatedRoutineResponse = self
            .send_json(Method::POST, "routines", &payload, Some(StatusCode::CREATED))
            .await?;

        let routine_id = response
            .routine
            .into_iter()
            .next()
            .map(|created| created.id)
            .ok_or_else(|| {
                AppError::external_service(SERVICE_NAME, "Routine id missing from response")
            })?;

        info!(routine_id = %routine_id, "Created Hevy routine");
        Ok(routine_id)
    }

    /// Replace an existing routine
    ///
    /// # Errors
    ///
    /// Returns an error if Hevy rejects the update
    pub async fn update_routine(&self, routine_id: &str, routine: &Routine) -> AppResult<()> {
        let mut payload = RoutinePayload::from(routine);
        payload.routine.folder_id = None;
        let _: serde_json::Value = self
            .send_json(
                Method::PUT,
                &format!("routines/{routine_id}"),
                &payload,
                None,
            )
            .await?;
        Ok(())
    }

    // ================================================================================
    // Exercise templates
    // ================================================================================

    /// Fetch one page of exercise templates
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn exercise_templates(
        &self,
        page: u32,
        page_size: u32,
    ) -> AppResult<HevyExerciseTemplatesPage> {
        self.get_json(
            "exercise_templates",
            &[
                ("page", page.to_string()),
                ("pageSize", page_size.to_string()),
            ],
        )
        .await
    }

    /// Every exercise template, up to ten pages of one hundred
    ///
    /// # Errors
    ///
    /// Returns an error for failures other than running past the last page
    #[instrument(skip(self))]
    pub async fn all_exercise_templates(&self) -> AppResult<Vec<HevyExerciseTemplate>> {
        let mut templates = Vec::new();

        for page in 1..=MAX_TEMPLATE_PAGES {
            match self.exercise_templates(page, TEMPLATES_PAGE_SIZE).await {
                Ok(result) => {
                    if result.exercise_templates.is_empty() {
                        break;
                    }
                    templates.extend(result.exercise_templates);
                    if result.page_count != 0 && page >= result.page_count {
                        break;
                    }
                }
                Err(e) if e.code == ErrorCode::ResourceNotFound => {
                    debug!(page, "Exercise template page not found, stopping");
                    break;
                }
                Err(e) => {
                    warn!(page, error = %e, "Failed to fetch exercise templates");
                    return Err(e);
                }
            }
        }

        info!(count = templates.len(), "Fetched Hevy exercise templates");
        Ok(templates)
    }

    /// Fetch a single exercise template
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for an unknown id
    pub async fn get_exercise_template(&self, template_id: &str) -> AppResult<HevyExerciseTemplate> {
        self.get_json(&format!("exercise_templates/{template_id}"), &[])
            .await
    }

    // ================================================================================
    // Routine folders
    // ================================================================================

    /// Fetch the first page of routine folders
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn list_routine_folders(&self) -> AppResult<Vec<HevyRoutineFolder>> {
        let page: HevyRoutineFoldersPage = self.get_json("routine_folders", &[]).await?;
        Ok(page.routine_folders)
    }

    /// Create a routine folder and return its id
    ///
    /// # Errors
    ///
    /// Returns an error if Hevy does not answer `201 Created`
    #[instrument(skip(self))]
    pub async fn create_routine_folder(&self, title: &str) -> AppResult<i64> {
        let payload = RoutineFolderPayload {
            routine_folder: RoutineFolderBody {
                title: title.to_owned(),
            },
        };
        let response: CreatedRoutineFolderResponse = self
            .send_json(
                Method::POST,
                "routine_folders",
                &payload,
                Some(StatusCode::CREATED),
            )
            .await?;

        info!(folder_id = response.routine_folder.id, "Created Hevy routine folder");
        Ok(response.routine_folder.id)
    }

    /// Fetch a single routine folder
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for an unknown id
    pub async fn get_routine_folder(&self, folder_id: i64) -> AppResult<HevyRoutineFolder> {
        self.get_json(&format!("routine_folders/{folder_id}"), &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_rejected() {
        assert!(HevyClient::new("  ", DEFAULT_BASE_URL).is_err());
    }

    #[test]
    fn test_api_url_joins_cleanly() {
        let client = HevyClient::new("key", "http://localhost:9000/v1/").unwrap();
        assert_eq!(client.api_url("/workouts"), "http://localhost:9000/v1/workouts");
    }

    #[test]
    fn test_error_mapping() {
        let auth = HevyClient::parse_error_response(StatusCode::UNAUTHORIZED, "nope");
        assert_eq!(auth.code, ErrorCode::ExternalAuthFailed);

        let missing = HevyClient::parse_error_response(StatusCode::NOT_FOUND, "");
        assert_eq!(missing.code, ErrorCode::ResourceNotFound);

        let limited = HevyClient::parse_error_response(StatusCode::TOO_MANY_REQUESTS, "");
        assert_eq!(limited.code, ErrorCode::ExternalRateLimited);

        let down = HevyClient::parse_error_response(StatusCode::BAD_GATEWAY, "");
        assert_eq!(down.code, ErrorCode::ExternalServiceUnavailable);

        let other = HevyClient::parse_error_response(StatusCode::BAD_REQUEST, &"x".repeat(500));
        assert_eq!(other.code, ErrorCode::ExternalServiceError);
        assert!(other.message.len() < 300);
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = HevyClient::new("secret-key", DEFAULT_BASE_URL).unwrap();
        assert!(!format!("{client:?}").contains("secret-key"));
    }
}
