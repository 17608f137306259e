// ABOUTME: In-process mock Hevy and OpenAI servers for integration tests
// ABOUTME: Axum routers bound to 127.0.0.1:0 that record what the client sent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Key the mock Hevy server accepts
pub const MOCK_HEVY_KEY: &str = "test-hevy-key";

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/v1")
}

fn paginate(items: &[Value], query: &HashMap<String, String>) -> (u32, u32, Vec<Value>) {
    let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let size: usize = query
        .get("pageSize")
        .and_then(|p| p.parse().ok())
        .unwrap_or(10)
        .max(1);
    let page_count = items.len().div_ceil(size).max(1);
    let slice = items
        .iter()
        .skip((page.max(1) - 1) * size)
        .take(size)
        .cloned()
        .collect();
    (page as u32, page_count as u32, slice)
}

// ============================================================================
// Hevy
// ============================================================================

/// Data served and recorded by the mock Hevy API
#[derive(Debug, Default)]
pub struct MockHevyState {
    /// Workouts, newest first
    pub workouts: Vec<Value>,
    /// Exercise templates
    pub templates: Vec<Value>,
    /// Folders created through the API
    pub created_folders: Vec<(i64, String)>,
    /// Routine payloads received
    pub created_routines: Vec<Value>,
    /// Routine titles to answer with 400
    pub reject_titles: Vec<String>,
}

/// A running mock Hevy API
pub struct MockHevy {
    /// Base URL including `/v1`
    pub base_url: String,
    /// Shared state for assertions
    pub state: Arc<Mutex<MockHevyState>>,
}

impl MockHevy {
    /// Start a mock Hevy API serving `state`
    pub async fn start(state: MockHevyState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let router = Router::new()
            .route("/v1/workouts", get(hevy_workouts))
            .route("/v1/exercise_templates", get(hevy_templates))
            .route("/v1/exercise_templates/:id", get(hevy_template))
            .route("/v1/routine_folders", post(hevy_create_folder))
            .route("/v1/routines", post(hevy_create_routine))
            .with_state(Arc::clone(&state));
        Self {
            base_url: spawn(router).await,
            state,
        }
    }
}

fn unauthorized(headers: &HeaderMap) -> Option<Response> {
    let ok = headers
        .get("api-key")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|k| k == MOCK_HEVY_KEY);
    (!ok).then(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid api key"})),
        )
            .into_response()
    })
}

async fn hevy_workouts(
    State(state): State<Arc<Mutex<MockHevyState>>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    let guard = state.lock().unwrap();
    let (page, page_count, workouts) = paginate(&guard.workouts, &query);
    Json(json!({"page": page, "page_count": page_count, "workouts": workouts})).into_response()
}

async fn hevy_templates(
    State(state): State<Arc<Mutex<MockHevyState>>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    let guard = state.lock().unwrap();
    let (page, page_count, templates) = paginate(&guard.templates, &query);
    Json(json!({"page": page, "page_count": page_count, "exercise_templates": templates}))
        .into_response()
}

async fn hevy_template(
    State(state): State<Arc<Mutex<MockHevyState>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    let guard = state.lock().unwrap();
    guard
        .templates
        .iter()
        .find(|t| t["id"] == id.as_str())
        .map_or_else(
            || (StatusCode::NOT_FOUND, Json(json!({"error": "Not found"}))).into_response(),
            |t| Json(t.clone()).into_response(),
        )
}

async fn hevy_create_folder(
    State(state): State<Arc<Mutex<MockHevyState>>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    let mut guard = state.lock().unwrap();
    let id = 1000 + guard.created_folders.len() as i64;
    let title = body["routine_folder"]["title"].as_str().unwrap_or_default().to_owned();
    guard.created_folders.push((id, title.clone()));
    (
        StatusCode::CREATED,
        Json(json!({"routine_folder": {"id": id, "index": 0, "title": title}})),
    )
        .into_response()
}

async fn hevy_create_routine(
    State(state): State<Arc<Mutex<MockHevyState>>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(denied) = unauthorized(&headers) {
        return denied;
    }
    let mut guard = state.lock().unwrap();
    let title = body["routine"]["title"].as_str().unwrap_or_default().to_owned();
    if guard.reject_titles.contains(&title) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid routine"})),
        )
            .into_response();
    }
    let id = format!("routine-{}", guard.created_routines.len() + 1);
    guard.created_routines.push(body);
    (
        StatusCode::CREATED,
        Json(json!({"routine": [{"id": id, "title": title}]})),
    )
        .into_response()
}

/// A Hevy exercise template as JSON
pub fn hevy_template_json(id: &str, title: &str, primary: &str, equipment: &str, custom: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "type": "weight_reps",
        "primary_muscle_group": primary,
        "secondary_muscle_groups": [],
        "equipment": equipment,
        "is_custom": custom,
    })
}

/// A Hevy workout as JSON, one hour long, with a single bench press exercise
pub fn hevy_workout_json(id: &str, title: &str, start: DateTime<Utc>) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "start_time": start.to_rfc3339(),
        "end_time": (start + Duration::hours(1)).to_rfc3339(),
        "exercises": [{
            "index": 0,
            "title": "Bench Press (Barbell)",
            "notes": null,
            "exercise_template_id": "79D0BB3A",
            "superset_id": null,
            "sets": [
                {"index": 0, "type": "warmup", "weight_kg": 40.0, "reps": 10},
                {"index": 1, "type": "normal", "weight_kg": 80.0, "reps": 5, "rpe": 8.0}
            ]
        }]
    })
}

// ============================================================================
// OpenAI
// ============================================================================

/// Data served and recorded by the mock chat completions API
#[derive(Debug, Default)]
pub struct MockOpenAiState {
    /// Assistant message returned for every request
    pub reply: String,
    /// Answer with 500 instead
    pub fail: bool,
    /// Request bodies received
    pub requests: Vec<Value>,
    /// Statuses answered to upcoming embeddings requests before succeeding
    pub embedding_statuses: VecDeque<u16>,
    /// Leave the last item out of every embeddings response
    pub drop_last_embedding: bool,
    /// Inputs per embeddings request, in arrival order
    pub embedding_batches: Vec<usize>,
    /// Embeddings requests received, including rejected ones
    pub embedding_calls: usize,
}

/// A running mock OpenAI API
pub struct MockOpenAi {
    /// Base URL including `/v1`
    pub base_url: String,
    /// Shared state for assertions
    pub state: Arc<Mutex<MockOpenAiState>>,
}

impl MockOpenAi {
    /// Start a mock API answering every completion with `reply`
    pub async fn start(reply: impl Into<String>) -> Self {
        let state = Arc::new(Mutex::new(MockOpenAiState {
            reply: reply.into(),
            ..MockOpenAiState::default()
        }));
        let router = Router::new()
            .route("/v1/chat/completions", post(openai_complete))
            .route("/v1/embeddings", post(openai_embeddings))
            .route("/v1/models", get(openai_models))
            .with_state(Arc::clone(&state));
        Self {
            base_url: spawn(router).await,
            state,
        }
    }

    /// Number of completion requests received
    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }
}

async fn openai_complete(
    State(state): State<Arc<Mutex<MockOpenAiState>>>,
    Json(body): Json<Value>,
) -> Response {
    let mut guard = state.lock().unwrap();
    guard.requests.push(body);
    if guard.fail {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"message": "upstream exploded", "type": "server_error"}})),
        )
            .into_response();
    }
    Json(json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-test",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": guard.reply},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 100, "completion_tokens": 50, "total_tokens": 150}
    }))
    .into_response()
}

/// Answers with one vector per input, `[position in batch, input length]`,
/// listed in reverse order so clients have to sort by `index`
async fn openai_embeddings(
    State(state): State<Arc<Mutex<MockOpenAiState>>>,
    Json(body): Json<Value>,
) -> Response {
    let mut guard = state.lock().unwrap();
    guard.embedding_calls += 1;
    if let Some(status) = guard.embedding_statuses.pop_front() {
        let status = StatusCode::from_u16(status).unwrap();
        return (
            status,
            Json(json!({"error": {"message": format!("scripted {status}"), "type": "test"}})),
        )
            .into_response();
    }

    let inputs: Vec<String> = body["input"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default();
    guard.embedding_batches.push(inputs.len());

    let mut data: Vec<Value> = inputs
        .iter()
        .enumerate()
        .map(|(index, text)| {
            json!({
                "object": "embedding",
                "index": index,
                "embedding": [index as f32, text.len() as f32],
            })
        })
        .rev()
        .collect();
    if guard.drop_last_embedding {
        data.pop();
    }
    Json(json!({"object": "list", "data": data, "model": body["model"]})).into_response()
}

async fn openai_models(State(state): State<Arc<Mutex<MockOpenAiState>>>) -> Response {
    if state.lock().unwrap().fail {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    Json(json!({"object": "list", "data": [{"id": "gpt-test", "object": "model"}]})).into_response()
}

/// A well-formed routine reply using built-in catalog ids
pub fn routine_reply(title: &str) -> String {
    json!({
        "routine_description": "Compound lifts first, then accessories.",
        "hevy_api": {
            "routine": {
                "title": title,
                "folder_id": null,
                "notes": "Keep two reps in reserve.",
                "exercises": [
                    {
                        "exercise_template_id": "79D0BB3A",
                        "superset_id": null,
                        "rest_seconds": 120,
                        "notes": "Pause on the chest",
                        "sets": [
                            {"type": "warmup", "weight_kg": 40, "reps": 10},
                            {"type": "normal", "weight_kg": 70, "reps": 8},
                            {"type": "normal", "weight_kg": 70, "reps": 8}
                        ]
                    },
                    {
                        "exercise_template_id": "D04AC939",
                        "superset_id": null,
                        "rest_seconds": 150,
                        "notes": null,
                        "sets": [
                            {"type": "normal", "weight_kg": 90, "reps": 5},
                            {"type": "normal", "weight_kg": 90, "reps": 5}
                        ]
                    },
                    {
                        "exercise_template_id": "NOTREAL1",
                        "sets": [{"type": "normal", "reps": 10}]
                    }
                ]
            }
        }
    })
    .to_string()
}
