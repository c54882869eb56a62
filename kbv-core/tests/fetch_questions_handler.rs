//! End-to-end decision scenarios against the recording doubles

use std::sync::Arc;

use kbv_core::audit::AuditEventType;
use kbv_core::{
    CompletionStatus, FetchQuestionsHandler, FetchQuestionsResponse, FetchQuestionsState,
    HandlerConfig, MemoryAuditService, MemoryQuestionStore, MockQuestionRetrieval,
    PolicyQuestionFilter, Question, QuestionsResult, RecordingMetricsProbe, RetrievalError,
    SavedQuestionsItem, SavedQuestionsStore,
};
use serde_json::{Value, json};

const SESSION_ID: &str = "sessionId";

fn session_event() -> Value {
    json!({
        "sessionId": SESSION_ID,
        "sessionItem": {
            "Item": {
                "expiryDate": { "N": "1234" },
                "clientIpAddress": { "S": "127.0.0.1" },
                "redirectUri": { "S": "http://localhost:8085/callback" },
                "clientSessionId": { "S": "2d35a412-125e-423e-835e-ca66111a38a1" },
                "createdDate": { "N": "1722954983024" },
                "clientId": { "S": "unit-test-clientid" },
                "subject": { "S": "urn:fdc:gov.uk:2022:6dab2b2d-5fcb-43a3-b682-9484db4a2ca5" },
                "persistentSessionId": { "S": "6c33f1e4-70a9-41f6-a335-7bb036edd3ca" },
                "attemptCount": { "N": "0" },
                "sessionId": { "S": "665ed4d5-7576-4c4b-84ff-99af3a57ea64" },
                "state": { "S": "7f42f0cc-1681-4455-872f-dd228103a12e" }
            }
        },
        "parameters": {
            "url": { "value": "TEST_URL" },
            "userAgent": { "value": "TEST_USER_AGENT" }
        },
        "bearerToken": { "expiry": 1722962183024_i64, "value": "TEST_TOKEN_VALUE" },
        "personIdentityItem": { "nino": "TEST_NINO" }
    })
}

fn two_questions() -> Vec<Question> {
    vec![
        Question::new("rti-p60-payment-for-year", None, None),
        Question::new("sa-payment-details", Some("2021/2022"), Some("2020/2021")),
    ]
}

struct Harness {
    retrieval: Arc<MockQuestionRetrieval>,
    store: Arc<MemoryQuestionStore>,
    audit: Arc<MemoryAuditService>,
    metrics: Arc<RecordingMetricsProbe>,
    handler: FetchQuestionsHandler,
}

impl Harness {
    fn new() -> Self {
        Self::with_parts(
            Arc::new(MockQuestionRetrieval::new()),
            Arc::new(MemoryQuestionStore::new()),
            Arc::new(MemoryAuditService::new()),
        )
    }

    fn with_parts(
        retrieval: Arc<MockQuestionRetrieval>,
        store: Arc<MemoryQuestionStore>,
        audit: Arc<MemoryAuditService>,
    ) -> Self {
        let metrics = Arc::new(RecordingMetricsProbe::new());
        let handler = FetchQuestionsHandler::new(
            retrieval.clone(),
            Arc::new(PolicyQuestionFilter::dedup_only()),
            store.clone(),
            audit.clone(),
            metrics.clone(),
        );
        Self {
            retrieval,
            store,
            audit,
            metrics,
            handler,
        }
    }

    async fn run(&self) -> FetchQuestionsResponse {
        self.handler.handle(&session_event()).await
    }
}

fn state(state: FetchQuestionsState) -> FetchQuestionsResponse {
    state.into()
}

#[tokio::test]
async fn no_questions_is_insufficient_and_audited() {
    let harness = Harness::new();
    harness
        .retrieval
        .queue_result(QuestionsResult::new("test-correlation-id", Vec::new()));

    let response = harness.run().await;

    assert_eq!(response, state(FetchQuestionsState::InsufficientQuestions));

    let audits = harness.audit.calls();
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].kind, AuditEventType::ThinFileEncountered);
    assert_eq!(
        audits[0].extensions.hmrc_ivq_response.outcome,
        "InsufficientQuestions"
    );
    assert_eq!(audits[0].session_item.client_ip_address, "127.0.0.1");

    let saves = harness.store.save_calls();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].session_id, SESSION_ID);
    assert_eq!(saves[0].session_ttl, 1234);
    assert_eq!(saves[0].correlation_id, "test-correlation-id");
    assert!(saves[0].questions.is_empty());

    assert_eq!(harness.metrics.statuses(), vec![CompletionStatus::Ok]);
}

#[tokio::test]
async fn one_question_is_insufficient_and_saved() {
    let harness = Harness::new();
    harness.retrieval.queue_result(QuestionsResult::new(
        "corr",
        vec![Question::new("rti-p60-payment-for-year", None, None)],
    ));

    let response = harness.run().await;

    assert_eq!(response, state(FetchQuestionsState::InsufficientQuestions));
    assert_eq!(harness.audit.call_count(), 1);
    assert_eq!(harness.store.save_calls()[0].questions.len(), 1);
}

#[tokio::test]
async fn two_questions_are_sufficient_without_audit() {
    let harness = Harness::new();
    harness
        .retrieval
        .queue_result(QuestionsResult::new("test-correlation-id", two_questions()));

    let response = harness.run().await;

    assert_eq!(response, state(FetchQuestionsState::SufficientQuestions));
    assert_eq!(harness.audit.call_count(), 0);

    let saves = harness.store.save_calls();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].questions, two_questions());

    let saved = harness.store.get(SESSION_ID).await.unwrap();
    assert_eq!(saved.expiry_date, 1234);
    assert_eq!(saved.questions[0].question_key, "rti-p60-payment-for-year");
    assert_eq!(saved.questions[0].order, 1);
    assert_eq!(saved.questions[1].order, 2);

    let calls = harness.retrieval.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].questions_url, "TEST_URL");
    assert_eq!(calls[0].nino, "TEST_NINO");

    assert_eq!(harness.metrics.statuses(), vec![CompletionStatus::Ok]);
}

#[tokio::test]
async fn duplicates_do_not_count_towards_the_threshold() {
    let harness = Harness::new();
    harness.retrieval.queue_result(QuestionsResult::new(
        "corr",
        vec![
            Question::new("rti-p60-payment-for-year", None, None),
            Question::new("rti-p60-payment-for-year", None, None),
        ],
    ));

    let response = harness.run().await;

    assert_eq!(response, state(FetchQuestionsState::InsufficientQuestions));
    assert_eq!(harness.store.save_calls()[0].questions.len(), 1);
}

#[tokio::test]
async fn saved_questions_resume_without_retrieval() {
    let harness = Harness::new();
    let saved = vec![
        Question::new("rti-p60-payment-for-year", None, None),
        Question::new("sa-payment-details", Some("2021/2022"), Some("2020/2021")),
        Question::new("rti-p60-statutory-adoption-pay", None, None),
    ];
    harness
        .store
        .insert(SavedQuestionsItem::new(SESSION_ID, 1234, "corr", &saved))
        .await;

    let response = harness.run().await;

    assert_eq!(
        response,
        state(FetchQuestionsState::ContinueSufficientQuestionAlreadyRetrieved)
    );
    assert_eq!(harness.retrieval.call_count(), 0);
    assert!(harness.store.save_calls().is_empty());
    assert_eq!(harness.audit.call_count(), 0);
    assert_eq!(harness.metrics.statuses(), vec![CompletionStatus::Ok]);
}

#[tokio::test]
async fn saved_empty_state_is_insufficient_without_audit() {
    let harness = Harness::new();
    harness
        .store
        .insert(SavedQuestionsItem::new(SESSION_ID, 1234, "corr", &[]))
        .await;

    let response = harness.run().await;

    assert_eq!(response, state(FetchQuestionsState::InsufficientQuestions));
    assert_eq!(harness.retrieval.call_count(), 0);
    assert!(harness.store.save_calls().is_empty());
    assert_eq!(harness.audit.call_count(), 0);
}

#[tokio::test]
async fn second_invocation_resumes_from_first() {
    let harness = Harness::new();
    harness
        .retrieval
        .queue_result(QuestionsResult::new("corr", two_questions()));

    let first = harness.run().await;
    let second = harness.run().await;

    assert_eq!(first, state(FetchQuestionsState::SufficientQuestions));
    assert_eq!(
        second,
        state(FetchQuestionsState::ContinueSufficientQuestionAlreadyRetrieved)
    );
    assert_eq!(harness.retrieval.call_count(), 1);
    assert_eq!(harness.store.save_calls().len(), 1);
    assert_eq!(
        harness.metrics.statuses(),
        vec![CompletionStatus::Ok, CompletionStatus::Ok]
    );
}

#[tokio::test]
async fn thin_file_retry_is_insufficient_without_second_audit() {
    let harness = Harness::new();
    harness
        .retrieval
        .queue_result(QuestionsResult::new("corr", Vec::new()));

    let first = harness.run().await;
    assert_eq!(first, state(FetchQuestionsState::InsufficientQuestions));
    assert_eq!(harness.audit.call_count(), 1);

    let second = harness.run().await;
    assert_eq!(second, state(FetchQuestionsState::InsufficientQuestions));

    assert_eq!(harness.audit.call_count(), 1);
    assert_eq!(harness.retrieval.call_count(), 1);
    assert_eq!(harness.store.save_calls().len(), 1);
    assert_eq!(
        harness.metrics.statuses(),
        vec![CompletionStatus::Ok, CompletionStatus::Ok]
    );
}

#[tokio::test]
async fn short_thin_file_resumes_from_saved_questions() {
    let harness = Harness::new();
    harness.retrieval.queue_result(QuestionsResult::new(
        "corr",
        vec![Question::new("rti-p60-payment-for-year", None, None)],
    ));

    let first = harness.run().await;
    let second = harness.run().await;

    assert_eq!(first, state(FetchQuestionsState::InsufficientQuestions));
    assert_eq!(
        second,
        state(FetchQuestionsState::ContinueSufficientQuestionAlreadyRetrieved)
    );
    assert_eq!(harness.audit.call_count(), 1);
    assert_eq!(harness.retrieval.call_count(), 1);
}

#[tokio::test]
async fn missing_bearer_token_is_reported() {
    let harness = Harness::new();
    let mut event = session_event();
    event["bearerToken"] = json!({ "expiry": 1722962183024_i64, "value": null });

    let response = harness.handler.handle(&event).await;

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({ "error": "FetchQuestionsHandler : bearerToken was not provided" })
    );
    assert!(harness.store.lookups().is_empty());
    assert_eq!(harness.retrieval.call_count(), 0);
    assert_eq!(harness.metrics.statuses(), vec![CompletionStatus::Error]);
}

#[tokio::test]
async fn only_first_violation_is_reported() {
    let harness = Harness::new();
    let mut event = session_event();
    let object = event.as_object_mut().unwrap();
    object.remove("parameters");
    object.remove("bearerToken");

    let response = harness.handler.handle(&event).await;

    assert_eq!(
        response.error(),
        Some("FetchQuestionsHandler : event parameters not found")
    );
}

#[tokio::test]
async fn null_event_is_empty() {
    let harness = Harness::new();
    let response = harness.handler.handle(&Value::Null).await;

    assert_eq!(
        response.error(),
        Some("FetchQuestionsHandler : input event is empty")
    );
    assert_eq!(harness.metrics.statuses(), vec![CompletionStatus::Error]);
}

#[tokio::test]
async fn retrieval_failure_passes_message_through() {
    let harness = Harness::new();
    harness
        .retrieval
        .queue_error(RetrievalError::Provider("An error occured".into()));

    let response = harness.run().await;

    assert_eq!(
        response.error(),
        Some("FetchQuestionsHandler : An error occured")
    );
    assert!(harness.store.save_calls().is_empty());
    assert_eq!(harness.audit.call_count(), 0);
    assert_eq!(harness.metrics.statuses(), vec![CompletionStatus::Error]);
}

#[tokio::test]
async fn save_failure_is_reported_after_the_attempt() {
    let harness = Harness::new();
    harness
        .retrieval
        .queue_result(QuestionsResult::new("test-correlation-id", two_questions()));
    harness.store.fail_saves_with("An error occured");

    let response = harness.run().await;

    assert_eq!(
        response.error(),
        Some("FetchQuestionsHandler : An error occured")
    );

    let saves = harness.store.save_calls();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].session_id, SESSION_ID);
    assert_eq!(saves[0].session_ttl, 1234);
    assert_eq!(saves[0].correlation_id, "test-correlation-id");
    assert_eq!(saves[0].questions, two_questions());
    assert_eq!(harness.metrics.statuses(), vec![CompletionStatus::Error]);
}

#[tokio::test]
async fn insufficient_save_failure_skips_audit() {
    let harness = Harness::new();
    harness
        .retrieval
        .queue_result(QuestionsResult::new("corr", Vec::new()));
    harness.store.fail_saves_with("table unavailable");

    let response = harness.run().await;

    assert!(response.is_error());
    assert_eq!(harness.audit.call_count(), 0);
}

#[tokio::test]
async fn lookup_failure_is_reported() {
    let harness = Harness::new();
    harness.store.fail_reads_with("read timeout");

    let response = harness.run().await;

    assert_eq!(response.error(), Some("FetchQuestionsHandler : read timeout"));
    assert_eq!(harness.retrieval.call_count(), 0);
}

#[tokio::test]
async fn audit_failure_does_not_fail_invocation() {
    let harness = Harness::with_parts(
        Arc::new(MockQuestionRetrieval::returning(QuestionsResult::new(
            "corr",
            Vec::new(),
        ))),
        Arc::new(MemoryQuestionStore::new()),
        Arc::new(MemoryAuditService::failing("queue unavailable")),
    );

    let response = harness.run().await;

    assert_eq!(response, state(FetchQuestionsState::InsufficientQuestions));
    assert_eq!(harness.audit.call_count(), 1);
    assert_eq!(harness.metrics.statuses(), vec![CompletionStatus::Ok]);
}

/// Store that hides a concurrent writer's record from the first lookup
struct RacingStore {
    inner: MemoryQuestionStore,
    winner: Vec<Question>,
}

#[async_trait::async_trait]
impl SavedQuestionsStore for RacingStore {
    async fn get_existing_saved_item(
        &self,
        session_id: &str,
    ) -> Result<Option<kbv_core::SavedQuestionsState>, kbv_core::StoreError> {
        self.inner.get_existing_saved_item(session_id).await
    }

    async fn save_questions(
        &self,
        session_id: &str,
        session_ttl: i64,
        correlation_id: &str,
        questions: &[Question],
    ) -> Result<kbv_core::SaveOutcome, kbv_core::StoreError> {
        // The concurrent request lands between our lookup and our save
        self.inner
            .save_questions(session_id, session_ttl, "winner-correlation-id", &self.winner)
            .await?;
        self.inner
            .save_questions(session_id, session_ttl, correlation_id, questions)
            .await
    }
}

#[tokio::test]
async fn losing_the_save_race_resumes_from_winner() {
    let store = Arc::new(RacingStore {
        inner: MemoryQuestionStore::new(),
        winner: two_questions(),
    });
    let retrieval = Arc::new(MockQuestionRetrieval::returning(QuestionsResult::new(
        "loser",
        Vec::new(),
    )));
    let audit = Arc::new(MemoryAuditService::new());
    let metrics = Arc::new(RecordingMetricsProbe::new());
    let handler = FetchQuestionsHandler::new(
        retrieval,
        Arc::new(PolicyQuestionFilter::dedup_only()),
        store.clone(),
        audit.clone(),
        metrics.clone(),
    );

    let response = handler.handle(&session_event()).await;

    assert_eq!(
        response,
        state(FetchQuestionsState::ContinueSufficientQuestionAlreadyRetrieved)
    );
    assert_eq!(audit.call_count(), 0);
    assert_eq!(
        store.inner.get(SESSION_ID).await.unwrap().correlation_id,
        "winner-correlation-id"
    );
    assert_eq!(metrics.statuses(), vec![CompletionStatus::Ok]);
}

#[tokio::test]
async fn threshold_and_exclusions_are_configurable() {
    let retrieval = Arc::new(MockQuestionRetrieval::returning(QuestionsResult::new(
        "corr",
        vec![
            Question::new("rti-p60-payment-for-year", None, None),
            Question::new("rti-p60-statutory-adoption-pay", None, None),
            Question::new("sa-payment-details", Some("2021/2022"), Some("2020/2021")),
        ],
    )));
    let store = Arc::new(MemoryQuestionStore::new());
    let handler = FetchQuestionsHandler::new(
        retrieval,
        Arc::new(PolicyQuestionFilter::new(["rti-p60-statutory-adoption-pay"])),
        store.clone(),
        Arc::new(MemoryAuditService::new()),
        Arc::new(RecordingMetricsProbe::new()),
    )
    .with_config(HandlerConfig {
        minimum_questions: 3,
    });

    let response = handler.handle(&session_event()).await;

    assert_eq!(response, state(FetchQuestionsState::InsufficientQuestions));
    let saved = store.get(SESSION_ID).await.unwrap();
    let keys: Vec<&str> = saved.questions.iter().map(|q| q.question_key.as_str()).collect();
    assert_eq!(keys, vec!["rti-p60-payment-for-year", "sa-payment-details"]);
}
