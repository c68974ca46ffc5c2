use async_trait::async_trait;
use mindmap_application::{ChatSession, ChatUseCase, FAILED_REPLY_NOTICE};
use mindmap_core::archive::{ArchivedRecord, ConversationArchive};
use mindmap_core::conversation::{ConversationTurn, MessageRole};
use mindmap_core::credential::Credential;
use mindmap_core::error::{MindmapError, Result};
use mindmap_core::outline::{OutlineExtractor, OutlineSource};
use mindmap_core::upstream::{CompletionGateway, CredentialValidator};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

const OUTLINE_REPLY: &str = "# 对话分析\n## 背景\n### 起因\n## 结论\n### 建议一\n### 建议二\n\n以上。";

struct FakeValidator {
    accept: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl CredentialValidator for FakeValidator {
    async fn validate(&self, credential: &Credential) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.accept && !credential.is_empty()
    }
}

struct FakeGateway {
    reply: Result<String>,
    messages: Mutex<Vec<String>>,
}

#[async_trait]
impl CompletionGateway for FakeGateway {
    async fn complete(&self, message: &str, _credential: &Credential) -> Result<String> {
        self.messages.lock().await.push(message.to_string());
        self.reply.clone()
    }
}

struct RecordingArchive {
    fail: bool,
    writes: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ConversationArchive for RecordingArchive {
    async fn archive(&self, conversation: &str, outline: &str) -> Result<ArchivedRecord> {
        if self.fail {
            return Err(MindmapError::storage("disk full"));
        }
        let mut writes = self.writes.lock().await;
        writes.push((conversation.to_string(), outline.to_string()));
        let id = writes.len() as i64;
        Ok(ArchivedRecord {
            timestamp_id: id,
            conversation_path: PathBuf::from(format!("conversations/{id}.txt")),
            outline_path: PathBuf::from(format!("mindmaps/{id}.md")),
        })
    }
}

struct Harness {
    validator: Arc<FakeValidator>,
    gateway: Arc<FakeGateway>,
    archive: Arc<RecordingArchive>,
}

impl Harness {
    fn new(accept: bool, reply: Result<String>, archive_fails: bool) -> Self {
        Self {
            validator: Arc::new(FakeValidator {
                accept,
                calls: AtomicUsize::new(0),
            }),
            gateway: Arc::new(FakeGateway {
                reply,
                messages: Mutex::new(Vec::new()),
            }),
            archive: Arc::new(RecordingArchive {
                fail: archive_fails,
                writes: Mutex::new(Vec::new()),
            }),
        }
    }

    fn usecase(&self) -> ChatUseCase {
        ChatUseCase::new(
            self.validator.clone(),
            self.gateway.clone(),
            self.archive.clone(),
        )
    }
}

fn key() -> Credential {
    Credential::new("sk-test")
}

#[tokio::test]
async fn test_chat_returns_reply_and_archives_exchange() {
    let harness = Harness::new(true, Ok(OUTLINE_REPLY.to_string()), false);

    let reply = harness.usecase().chat("分析一下", &key()).await.unwrap();

    assert_eq!(reply.response, OUTLINE_REPLY);
    assert_eq!(reply.outline.source(), OutlineSource::Derived);
    assert_eq!(
        reply.outline.as_str(),
        "# 对话分析\n## 背景\n### 起因\n## 结论\n### 建议一\n### 建议二"
    );
    assert_eq!(reply.archived.as_ref().unwrap().timestamp_id, 1);

    let writes = harness.archive.writes.lock().await;
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, format!("分析一下\n{OUTLINE_REPLY}"));
    assert_eq!(writes[0].1, reply.outline.as_str());
}

#[tokio::test]
async fn test_invalid_credential_stops_before_completion() {
    let harness = Harness::new(false, Ok(OUTLINE_REPLY.to_string()), false);

    let err = harness.usecase().chat("hi", &key()).await.unwrap_err();

    assert_eq!(err, MindmapError::InvalidCredential);
    assert!(harness.gateway.messages.lock().await.is_empty());
    assert!(harness.archive.writes.lock().await.is_empty());
}

#[tokio::test]
async fn test_upstream_error_is_propagated_without_archiving() {
    let harness = Harness::new(true, Err(MindmapError::upstream_status(503, "busy")), false);

    let err = harness.usecase().chat("hi", &key()).await.unwrap_err();

    assert!(err.is_upstream());
    assert!(harness.archive.writes.lock().await.is_empty());
}

#[tokio::test]
async fn test_archive_failure_does_not_block_reply() {
    let harness = Harness::new(true, Ok(OUTLINE_REPLY.to_string()), true);

    let reply = harness.usecase().chat("hi", &key()).await.unwrap();

    assert_eq!(reply.response, OUTLINE_REPLY);
    assert!(reply.archived.is_none());
}

#[tokio::test]
async fn test_empty_message_is_rejected_up_front() {
    let harness = Harness::new(true, Ok(OUTLINE_REPLY.to_string()), false);

    let err = harness.usecase().chat("   ", &key()).await.unwrap_err();

    assert!(matches!(err, MindmapError::InvalidInput(_)));
    assert_eq!(harness.validator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_reply_without_canonical_heading_falls_back_to_raw() {
    let raw = "## 只有二级标题\n- 要点";
    let harness = Harness::new(true, Ok(raw.to_string()), false);

    let reply = harness.usecase().chat("hi", &key()).await.unwrap();

    assert_eq!(reply.outline.source(), OutlineSource::RawFallback);
    assert_eq!(reply.outline.as_str(), raw);
    assert_eq!(harness.archive.writes.lock().await[0].1, raw);
}

#[tokio::test]
async fn test_custom_extractor_is_used() {
    let harness = Harness::new(true, Ok("# Summary\na\nb\nc\nd\ne".to_string()), false);
    let usecase = harness
        .usecase()
        .with_extractor(OutlineExtractor::new("# Summary", 5));

    let reply = usecase.chat("hi", &key()).await.unwrap();

    assert!(reply.outline.is_derived());
}

#[tokio::test]
async fn test_session_rejects_invalid_credential_at_start() {
    let harness = Harness::new(false, Ok(OUTLINE_REPLY.to_string()), false);

    let result = ChatSession::start(Arc::new(harness.usecase()), key()).await;

    assert!(matches!(result, Err(MindmapError::InvalidCredential)));
}

#[tokio::test]
async fn test_session_records_turns() {
    let harness = Harness::new(true, Ok(OUTLINE_REPLY.to_string()), false);
    let mut session = ChatSession::start(Arc::new(harness.usecase()), key())
        .await
        .unwrap();

    session.send("第一个问题").await.unwrap();

    assert_eq!(
        session.turns(),
        &[
            ConversationTurn::user("第一个问题"),
            ConversationTurn::assistant(OUTLINE_REPLY),
        ]
    );
    assert!(session.latest_outline().unwrap().is_derived());
}

#[tokio::test]
async fn test_session_failure_records_notice() {
    let harness = Harness::new(true, Err(MindmapError::malformed("no choices")), false);
    let mut session = ChatSession::start(Arc::new(harness.usecase()), key())
        .await
        .unwrap();

    let err = session.send("hi").await.unwrap_err();

    assert!(err.is_upstream());
    assert_eq!(session.turns().len(), 2);
    assert_eq!(session.turns()[1].role, MessageRole::Assistant);
    assert_eq!(session.turns()[1].content, FAILED_REPLY_NOTICE);
    assert!(session.latest_outline().is_none());
}
