//! Dispatch Command Handlers - 混合推理派发
//!
//! 每个请求的状态机（不持久化）:
//! 1. 校验请求，失败直接返回 ValidationError
//! 2. 外部路径可用时尝试一次外部推理（有超时，超时视为暂时性错误）
//! 3. 外部失败或不可用时，有本地降级则走降级，否则 CapabilityUnavailable

use futures_util::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::application::commands::dispatch_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{ExternalError, ExternalInferencePort, StatusCachePort};
use crate::domain::fallback::FallbackEngine;
use crate::domain::learning::{CapabilityRequest, InferenceResult, Source};

/// Dispatch Handler - 混合派发器
pub struct DispatchHandler {
    external: Option<Arc<dyn ExternalInferencePort>>,
    fallback: Arc<FallbackEngine>,
    status: Arc<dyn StatusCachePort>,
    external_timeout: Duration,
}

impl DispatchHandler {
    pub fn new(
        external: Option<Arc<dyn ExternalInferencePort>>,
        fallback: Arc<FallbackEngine>,
        status: Arc<dyn StatusCachePort>,
        external_timeout: Duration,
    ) -> Self {
        Self {
            external,
            fallback,
            status,
            external_timeout,
        }
    }

    pub async fn handle(&self, cmd: DispatchCommand) -> Result<InferenceResult, ApplicationError> {
        self.dispatch(&cmd.request).await
    }

    /// 批量派发
    ///
    /// 各请求并发执行，单个失败不影响其他请求
    pub async fn handle_batch(
        &self,
        cmd: DispatchBatchCommand,
    ) -> Vec<Result<InferenceResult, ApplicationError>> {
        tracing::debug!(count = cmd.requests.len(), "Dispatching batch");
        join_all(cmd.requests.iter().map(|request| self.dispatch(request))).await
    }

    async fn dispatch(&self, request: &CapabilityRequest) -> Result<InferenceResult, ApplicationError> {
        request.validate()?;

        let capability = request.capability();
        let request_id = Uuid::new_v4();
        let started = Instant::now();

        let reason = match self.usable_external() {
            Some(external) => match self.try_external(external.as_ref(), request).await {
                Ok(result) => {
                    tracing::info!(
                        request_id = %request_id,
                        capability = %capability,
                        source = %Source::External,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Capability dispatched"
                    );
                    return Ok(result.with_request_id(request_id));
                }
                Err(e) => {
                    tracing::warn!(
                        request_id = %request_id,
                        capability = %capability,
                        kind = e.kind(),
                        error = %e,
                        "External inference failed"
                    );
                    "external inference failed"
                }
            },
            None => "external inference is not available",
        };

        if !capability.supports_fallback() {
            tracing::warn!(
                request_id = %request_id,
                capability = %capability,
                reason = reason,
                "Capability unavailable"
            );
            return Err(ApplicationError::unavailable(capability, reason));
        }

        let (payload, confidence) = self.fallback.run(request)?;

        tracing::info!(
            request_id = %request_id,
            capability = %capability,
            source = %Source::Fallback,
            reason = reason,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Capability dispatched"
        );

        Ok(InferenceResult::fallback(payload, confidence).with_request_id(request_id))
    }

    /// 外部路径是否可用，以进程级 ServiceStatus 为准
    fn usable_external(&self) -> Option<&Arc<dyn ExternalInferencePort>> {
        let external = self.external.as_ref()?;
        self.status.snapshot().external_available.then_some(external)
    }

    /// 恰好一次外部尝试
    async fn try_external(
        &self,
        external: &dyn ExternalInferencePort,
        request: &CapabilityRequest,
    ) -> Result<InferenceResult, ExternalError> {
        let result = tokio::time::timeout(self.external_timeout, external.infer(request))
            .await
            .map_err(|_| {
                ExternalError::Transient(format!(
                    "no response within {}ms",
                    self.external_timeout.as_millis()
                ))
            })??;

        if result.source != Source::External || result.capability() != request.capability() {
            return Err(ExternalError::MalformedResponse(format!(
                "expected external {} result, got {} {}",
                request.capability(),
                result.source,
                result.capability()
            )));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{ExternalSettings, ProbeRecord, ServiceStatus};
    use crate::domain::learning::{
        Capability, CapabilityPayload, Difficulty, LearningStyle, Performance, Quiz,
        StyleProfile,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 固定配置的状态缓存
    struct StubStatus {
        settings: ExternalSettings,
        probe: Mutex<Option<ProbeRecord>>,
    }

    impl StubStatus {
        fn new(credential_present: bool, force_fallback_only: bool) -> Arc<Self> {
            Arc::new(Self {
                settings: ExternalSettings {
                    credential_present,
                    force_fallback_only,
                    model_name: "stub-model".into(),
                },
                probe: Mutex::new(None),
            })
        }
    }

    impl StatusCachePort for StubStatus {
        fn snapshot(&self) -> ServiceStatus {
            let probe = self.probe.lock().unwrap();
            ServiceStatus::compute(&self.settings, probe.as_ref())
        }

        fn record_probe(&self, reachable: bool) {
            *self.probe.lock().unwrap() = Some(ProbeRecord {
                reachable,
                checked_at: Utc::now(),
            });
        }
    }

    enum Behavior {
        Succeed,
        Fail(ExternalError),
        Hang,
        WrongCapability,
    }

    /// 按脚本返回的外部推理
    struct ScriptedExternal {
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl ScriptedExternal {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn external_payload(request: &CapabilityRequest) -> CapabilityPayload {
        match request {
            CapabilityRequest::QuizGeneration {
                topic,
                difficulty,
                learning_style,
                ..
            } => CapabilityPayload::QuizGeneration(Quiz {
                topic: topic.clone(),
                difficulty: *difficulty,
                learning_style: *learning_style,
                questions: vec![],
            }),
            _ => CapabilityPayload::StyleAnalysis(StyleProfile {
                primary_style: LearningStyle::ReadingWriting,
                secondary_style: None,
                scores: Default::default(),
                adaptations: vec![],
                considerations: vec![],
            }),
        }
    }

    #[async_trait]
    impl ExternalInferencePort for ScriptedExternal {
        async fn infer(
            &self,
            request: &CapabilityRequest,
        ) -> Result<InferenceResult, ExternalError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Succeed => Ok(InferenceResult::external(
                    external_payload(request),
                    Some(0.9),
                )),
                Behavior::Fail(e) => Err(e.clone()),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    unreachable!()
                }
                Behavior::WrongCapability => Ok(InferenceResult::external(
                    CapabilityPayload::StyleAnalysis(StyleProfile {
                        primary_style: LearningStyle::Visual,
                        secondary_style: None,
                        scores: Default::default(),
                        adaptations: vec![],
                        considerations: vec![],
                    }),
                    Some(0.9),
                )),
            }
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn handler(
        external: Option<Arc<ScriptedExternal>>,
        status: Arc<StubStatus>,
    ) -> DispatchHandler {
        DispatchHandler::new(
            external.map(|e| e as Arc<dyn ExternalInferencePort>),
            Arc::new(FallbackEngine::new().unwrap()),
            status,
            Duration::from_millis(50),
        )
    }

    fn style_request() -> CapabilityRequest {
        CapabilityRequest::StyleAnalysis {
            responses: vec![
                "I prefer visual diagrams".into(),
                "I like hands-on practice".into(),
            ],
        }
    }

    fn quiz_request(count: u32) -> CapabilityRequest {
        CapabilityRequest::QuizGeneration {
            topic: "Pattern matching".into(),
            difficulty: Difficulty::Intermediate,
            learning_style: LearningStyle::Visual,
            question_count: count,
        }
    }

    fn recommendation_request(accuracy: f64) -> CapabilityRequest {
        CapabilityRequest::Recommendation {
            user_id: "u-1".into(),
            current_topic: Some("Enums".into()),
            performance: Performance::new(accuracy),
            learning_style: None,
            current_difficulty: None,
        }
    }

    #[tokio::test]
    async fn test_external_success_is_tagged_external() {
        let external = ScriptedExternal::new(Behavior::Succeed);
        let h = handler(Some(external.clone()), StubStatus::new(true, false));

        let result = h.handle(DispatchCommand::new(style_request())).await.unwrap();
        assert_eq!(result.source, Source::External);
        assert_eq!(external.calls(), 1);
    }

    #[tokio::test]
    async fn test_each_external_error_falls_back_after_one_attempt() {
        for error in [
            ExternalError::Authentication("bad key".into()),
            ExternalError::Transient("reset".into()),
            ExternalError::MalformedResponse("prose".into()),
        ] {
            let external = ScriptedExternal::new(Behavior::Fail(error));
            let h = handler(Some(external.clone()), StubStatus::new(true, false));

            let result = h.handle(DispatchCommand::new(style_request())).await.unwrap();
            assert_eq!(result.source, Source::Fallback);
            assert_eq!(external.calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_timeout_treated_as_transient() {
        let external = ScriptedExternal::new(Behavior::Hang);
        let h = handler(Some(external.clone()), StubStatus::new(true, false));

        let result = h
            .handle(DispatchCommand::new(recommendation_request(0.6)))
            .await
            .unwrap();
        assert_eq!(result.source, Source::Fallback);
        assert_eq!(external.calls(), 1);
    }

    #[tokio::test]
    async fn test_mismatched_capability_rejected() {
        let external = ScriptedExternal::new(Behavior::WrongCapability);
        let h = handler(Some(external), StubStatus::new(true, false));

        let err = h
            .handle(DispatchCommand::new(quiz_request(3)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::CapabilityUnavailable {
                capability: Capability::QuizGeneration,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_force_fallback_skips_external() {
        let external = ScriptedExternal::new(Behavior::Succeed);
        let h = handler(Some(external.clone()), StubStatus::new(true, true));

        let result = h.handle(DispatchCommand::new(style_request())).await.unwrap();
        assert_eq!(result.source, Source::Fallback);
        assert_eq!(external.calls(), 0);
    }

    #[tokio::test]
    async fn test_quiz_unavailable_when_forced_to_fallback() {
        let external = ScriptedExternal::new(Behavior::Succeed);
        let h = handler(Some(external), StubStatus::new(true, true));

        let err = h
            .handle(DispatchCommand::new(quiz_request(5)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::CapabilityUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_quiz_unavailable_after_external_failure() {
        let external = ScriptedExternal::new(Behavior::Fail(ExternalError::Transient(
            "503".into(),
        )));
        let h = handler(Some(external), StubStatus::new(true, false));

        let err = h
            .handle(DispatchCommand::new(quiz_request(5)))
            .await
            .unwrap_err();
        // 内部错误类别不外泄
        assert!(!err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_failed_probe_disables_external() {
        let external = ScriptedExternal::new(Behavior::Succeed);
        let status = StubStatus::new(true, false);
        status.record_probe(false);
        let h = handler(Some(external.clone()), status);

        let result = h.handle(DispatchCommand::new(style_request())).await.unwrap();
        assert_eq!(result.source, Source::Fallback);
        assert_eq!(external.calls(), 0);
    }

    #[tokio::test]
    async fn test_validation_happens_before_dispatch() {
        let external = ScriptedExternal::new(Behavior::Succeed);
        let h = handler(Some(external.clone()), StubStatus::new(true, false));

        for count in [0, 11] {
            let err = h
                .handle(DispatchCommand::new(quiz_request(count)))
                .await
                .unwrap_err();
            assert!(matches!(err, ApplicationError::ValidationError(_)));
        }
        assert_eq!(external.calls(), 0);

        for count in [1, 10] {
            assert!(h.handle(DispatchCommand::new(quiz_request(count))).await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_isolates_failures() {
        let h = handler(None, StubStatus::new(false, false));
        let cmd = DispatchBatchCommand {
            requests: vec![
                recommendation_request(0.95),
                quiz_request(3),
                style_request(),
                quiz_request(0),
                recommendation_request(0.2),
            ],
        };

        let results = h.handle_batch(cmd).await;
        assert_eq!(results.len(), 5);
        assert_eq!(
            results[0].as_ref().unwrap().capability(),
            Capability::Recommendation
        );
        assert!(matches!(
            results[1],
            Err(ApplicationError::CapabilityUnavailable { .. })
        ));
        assert_eq!(
            results[2].as_ref().unwrap().capability(),
            Capability::StyleAnalysis
        );
        assert!(matches!(results[3], Err(ApplicationError::ValidationError(_))));
        assert_eq!(results[4].as_ref().unwrap().source, Source::Fallback);
    }

    #[tokio::test]
    async fn test_end_to_end_style_scenario_on_fallback() {
        let h = handler(None, StubStatus::new(false, false));
        let result = h.handle(DispatchCommand::new(style_request())).await.unwrap();

        assert_eq!(result.source, Source::Fallback);
        assert!(result.confidence.unwrap() > 0.0);
        match result.payload {
            CapabilityPayload::StyleAnalysis(profile) => assert!(matches!(
                profile.primary_style,
                LearningStyle::Visual | LearningStyle::Kinesthetic
            )),
            other => panic!("unexpected payload: {:?}", other),
        }
    }
}
