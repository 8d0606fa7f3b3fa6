//! AI Capability Handlers
//!
//! 四个能力端点共用同一个派发器，响应中的 source 标明结果来源

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{DispatchBatchCommand, DispatchCommand};
use crate::domain::learning::{CapabilityRequest, InferenceResult};
use crate::infrastructure::http::dto::{
    AnalyzeLearningStyleRequest, ApiResponse, BatchEntryDto, BatchRequest, BatchResponse,
    GenerateContentRequest, GenerateQuizRequest, RecommendationsRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

type InferenceResponse = Result<Json<ApiResponse<InferenceResult>>, ApiError>;

async fn run(state: &AppState, request: CapabilityRequest) -> InferenceResponse {
    let result = state
        .dispatch_handler
        .handle(DispatchCommand::new(request))
        .await?;
    Ok(Json(ApiResponse::success(result)))
}

pub async fn analyze_learning_style(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeLearningStyleRequest>,
) -> InferenceResponse {
    run(&state, req.into_request()).await
}

pub async fn generate_content(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateContentRequest>,
) -> InferenceResponse {
    run(&state, req.into_request()?).await
}

pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecommendationsRequest>,
) -> InferenceResponse {
    run(&state, req.into_request()?).await
}

pub async fn generate_quiz(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateQuizRequest>,
) -> InferenceResponse {
    run(&state, req.into_request()?).await
}

/// 派发单个带 capability 标签的请求
pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CapabilityRequest>,
) -> InferenceResponse {
    run(&state, req).await
}

/// 批量派发，结果与请求一一对应
///
/// 无法解析的条目直接占位为错误，其余条目照常派发
pub async fn dispatch_batch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<ApiResponse<BatchResponse>>, ApiError> {
    let mut requests = Vec::new();
    let rejected: Vec<Option<ApiError>> = req
        .into_requests()
        .into_iter()
        .map(|entry| match entry {
            Ok(request) => {
                requests.push(request);
                None
            }
            Err(e) => Some(e),
        })
        .collect();

    let mut dispatched = state
        .dispatch_handler
        .handle_batch(DispatchBatchCommand { requests })
        .await
        .into_iter();

    let results = rejected
        .into_iter()
        .map(|entry| match entry {
            Some(e) => BatchEntryDto::Error(e.into_batch_error()),
            None => match dispatched.next() {
                Some(Ok(result)) => BatchEntryDto::Ok(result),
                Some(Err(e)) => BatchEntryDto::Error(ApiError::from(e).into_batch_error()),
                None => BatchEntryDto::Error(
                    ApiError::Internal("batch result missing".to_string()).into_batch_error(),
                ),
            },
        })
        .collect();

    Ok(Json(ApiResponse::success(BatchResponse { results })))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{router, send};
    use crate::application::ExternalInferencePort;
    use crate::infrastructure::adapters::FakeLlmClient;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_style_analysis_falls_back_without_external() {
        let (status, body) = send(
            router(None),
            "POST",
            "/api/ai/analyze-learning-style",
            Some(json!({ "user_responses": ["I love diagrams and charts"] })),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["source"], "fallback");
        assert_eq!(body["data"]["payload"]["primary_style"], "visual");
    }

    #[tokio::test]
    async fn test_content_uses_external_when_available() {
        let external: Arc<dyn ExternalInferencePort> = Arc::new(FakeLlmClient::with_defaults());
        let (_, body) = send(
            router(Some(external)),
            "POST",
            "/api/ai/generate-content",
            Some(json!({
                "topic": "Iterators",
                "learning_style": "kinesthetic",
                "difficulty_level": "beginner"
            })),
        )
        .await;

        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["source"], "external");
        assert_eq!(body["data"]["payload"]["capability"], "content_generation");
    }

    #[tokio::test]
    async fn test_quiz_without_external_is_unavailable() {
        let (status, body) = send(
            router(None),
            "POST",
            "/api/ai/generate-quiz",
            Some(json!({
                "topic": "Iterators",
                "difficulty_level": "beginner",
                "learning_style": "visual",
                "num_questions": 3
            })),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["errno"], 503);
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_quiz_count_out_of_range_is_bad_request() {
        let (_, body) = send(
            router(None),
            "POST",
            "/api/ai/generate-quiz",
            Some(json!({
                "topic": "Iterators",
                "difficulty_level": "beginner",
                "learning_style": "visual",
                "num_questions": 11
            })),
        )
        .await;

        assert_eq!(body["errno"], 400);
    }

    #[tokio::test]
    async fn test_recommendations_accept_performance_data() {
        let (_, body) = send(
            router(None),
            "POST",
            "/api/ai/recommendations",
            Some(json!({
                "user_id": "learner-1",
                "current_topic": "Traits",
                "performance_data": { "accuracy": 0.9, "time_spent": 600, "engagement": 0.8 }
            })),
        )
        .await;

        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["source"], "fallback");
        assert_eq!(body["data"]["confidence"], 0.9);
        assert_eq!(body["data"]["payload"]["entries"][0]["difficulty"], "advanced");
    }

    #[tokio::test]
    async fn test_dispatch_tagged_request() {
        let (_, body) = send(
            router(None),
            "POST",
            "/api/ai/dispatch",
            Some(json!({ "capability": "style_analysis", "responses": [] })),
        )
        .await;

        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["payload"]["primary_style"], "visual");
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_isolates_failures() {
        let (_, body) = send(
            router(None),
            "POST",
            "/api/ai/batch",
            Some(json!({
                "requests": [
                    { "capability": "style_analysis", "responses": ["podcasts and lectures"] },
                    { "capability": "quiz_generation", "topic": "Loops", "difficulty": "beginner", "learning_style": "visual" },
                    { "capability": "content_generation", "topic": "", "learning_style": "visual", "difficulty": "beginner" }
                ]
            })),
        )
        .await;

        let results = body["data"]["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["ok"]["payload"]["primary_style"], "auditory");
        assert_eq!(results[1]["error"]["errno"], 503);
        assert_eq!(results[2]["error"]["errno"], 400);
    }

    #[tokio::test]
    async fn test_batch_undecodable_entry_keeps_siblings() {
        let (status, body) = send(
            router(None),
            "POST",
            "/api/ai/batch",
            Some(json!({
                "requests": [
                    { "capability": "style_analysis", "responses": ["I love diagrams and charts"] },
                    { "capability": "quiz_generation", "topic": "Loops", "difficulty": "beginner", "learning_style": "visual", "question_count": -1 },
                    { "capability": "recommendation", "user_id": "u-9", "performance": { "accuracy": 0.9 } },
                    { "capability": "telepathy" },
                    { "capability": "content_generation", "topic": "Traits", "learning_style": "mystery", "difficulty": "beginner" }
                ]
            })),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["errno"], 0);
        let results = body["data"]["results"].as_array().unwrap();
        assert_eq!(results.len(), 5);
        assert_eq!(results[0]["ok"]["payload"]["primary_style"], "visual");
        assert_eq!(results[1]["error"]["errno"], 400);
        assert!(results[1]["error"]["error"]
            .as_str()
            .unwrap()
            .contains("index 1"));
        assert_eq!(results[2]["ok"]["source"], "fallback");
        assert_eq!(results[3]["error"]["errno"], 400);
        assert_eq!(results[4]["error"]["errno"], 400);
    }
}
