//! One request/response exchange with the reply collaborator.

use std::sync::Arc;

use lutong_core::config::LutongConfig;
use lutong_core::error::{LutongError, Result};
use lutong_core::generation::{FALLBACK_REPLY, ReplyGenerator};
use lutong_core::session::{ChatMessage, ChatSession};
use lutong_core::user::UserProfile;
use tokio::sync::Mutex;

use crate::session::SessionManager;

/// Message count at which the "generate recipe" affordance is always offered.
pub const READY_MESSAGE_THRESHOLD: usize = 4;

/// Result of [`ConversationTurnController::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Input was empty after trimming; nothing happened.
    Skipped,
    /// Another turn is still in flight; nothing happened.
    Busy,
    Completed {
        /// The assistant message appended for this turn.
        reply: ChatMessage,
        /// Whether the recipe affordance is now shown.
        ready: bool,
        /// True when `reply` is the fallback text.
        reply_failed: bool,
    },
}

#[derive(Default)]
struct Transcript {
    /// Session the messages belong to; `None` on the welcome screen.
    session_id: Option<String>,
    messages: Vec<ChatMessage>,
    ready: bool,
}

/// Drives chat turns for the current session.
///
/// Guarantees that every accepted user message is followed by exactly one
/// assistant message, and that turns never overlap. Switching sessions waits
/// for the turn in flight, so a turn always commits to the session it started on.
pub struct ConversationTurnController {
    sessions: Arc<SessionManager>,
    replies: Arc<dyn ReplyGenerator>,
    context_window: usize,
    max_input_chars: usize,
    transcript: Mutex<Transcript>,
    in_flight: Mutex<()>,
}

impl ConversationTurnController {
    pub fn new(
        sessions: Arc<SessionManager>,
        replies: Arc<dyn ReplyGenerator>,
        config: &LutongConfig,
    ) -> Self {
        Self {
            sessions,
            replies,
            context_window: config.context_window,
            max_input_chars: config.max_input_chars,
            transcript: Mutex::new(Transcript::default()),
            in_flight: Mutex::new(()),
        }
    }

    /// Loads the transcript for the manager's current session, or the welcome
    /// message when there is none.
    pub async fn open(&self, profile: &UserProfile) -> Vec<ChatMessage> {
        let _turn = self.in_flight.lock().await;
        match self.sessions.current().await {
            Some(session) => self.show_session(session).await,
            None => self.show_welcome(profile).await,
        }
    }

    /// Switches to a persisted session.
    pub async fn select_session(&self, session_id: &str) -> Result<Vec<ChatMessage>> {
        let _turn = self.in_flight.lock().await;
        let session = self.sessions.select(session_id).await?;
        Ok(self.show_session(session).await)
    }

    /// Leaves the current session and shows the welcome message.
    pub async fn start_new_chat(&self, profile: &UserProfile) -> Result<Vec<ChatMessage>> {
        let _turn = self.in_flight.lock().await;
        self.sessions.start_new().await?;
        Ok(self.show_welcome(profile).await)
    }

    async fn show_session(&self, session: ChatSession) -> Vec<ChatMessage> {
        let mut transcript = self.transcript.lock().await;
        transcript.ready = session.messages.len() >= READY_MESSAGE_THRESHOLD;
        transcript.session_id = Some(session.id);
        transcript.messages = session.messages;
        transcript.messages.clone()
    }

    async fn show_welcome(&self, profile: &UserProfile) -> Vec<ChatMessage> {
        let mut transcript = self.transcript.lock().await;
        transcript.ready = false;
        transcript.session_id = None;
        transcript.messages = vec![ChatMessage::welcome(&profile.name)];
        transcript.messages.clone()
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.transcript.lock().await.messages.clone()
    }

    pub async fn is_ready(&self) -> bool {
        self.transcript.lock().await.ready
    }

    /// Runs one turn.
    ///
    /// Reply failures are absorbed into a fallback assistant message. Storage
    /// failures are returned and leave the transcript unchanged.
    pub async fn submit(&self, input: &str, profile: &UserProfile) -> Result<TurnOutcome> {
        let text = input.trim();
        if text.is_empty() {
            return Ok(TurnOutcome::Skipped);
        }
        if text.chars().count() > self.max_input_chars {
            return Err(LutongError::invalid_input(format!(
                "message exceeds {} characters",
                self.max_input_chars
            )));
        }

        let Ok(_turn) = self.in_flight.try_lock() else {
            tracing::debug!("[TurnController] Submission ignored: turn in flight");
            return Ok(TurnOutcome::Busy);
        };

        let (base, prior) = {
            let transcript = self.transcript.lock().await;
            (transcript.session_id.clone(), transcript.messages.clone())
        };
        let user_message = ChatMessage::user(text);

        let start = prior.len().saturating_sub(self.context_window);
        let mut context = prior[start..].to_vec();
        context.push(user_message.clone());

        let (reply, signal, reply_failed) =
            match self.replies.generate_reply(&context, profile).await {
                Ok(generated) => (
                    ChatMessage::assistant(generated.text),
                    generated.ready_signal_present,
                    false,
                ),
                Err(e) => {
                    tracing::warn!("[TurnController] Reply generation failed: {}", e);
                    (ChatMessage::assistant_error(FALLBACK_REPLY), false, true)
                }
            };

        let mut messages = prior;
        messages.push(user_message);
        messages.push(reply.clone());

        let session = self
            .sessions
            .commit_turn(base.as_deref(), messages.clone())
            .await?;

        let mut transcript = self.transcript.lock().await;
        transcript.session_id = Some(session.id);
        transcript.ready =
            transcript.ready || signal || messages.len() >= READY_MESSAGE_THRESHOLD;
        transcript.messages = messages;

        Ok(TurnOutcome::Completed {
            reply,
            ready: transcript.ready,
            reply_failed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryStore, ScriptedReplies};
    use lutong_core::session::{MessageRole, SessionRepository};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    struct Fixture {
        controller: ConversationTurnController,
        store: Arc<MemoryStore>,
        replies: Arc<ScriptedReplies>,
        sessions: Arc<SessionManager>,
        profile: UserProfile,
    }

    async fn fixture(script: Vec<Result<String>>) -> Fixture {
        let store = Arc::new(MemoryStore::default());
        let replies = Arc::new(ScriptedReplies::new(script));
        let sessions = Arc::new(SessionManager::new(store.clone()));
        let controller =
            ConversationTurnController::new(sessions.clone(), replies.clone(), &LutongConfig::default());
        let profile = UserProfile::new("Maria");
        controller.open(&profile).await;
        Fixture {
            controller,
            store,
            replies,
            sessions,
            profile,
        }
    }

    fn assert_paired(messages: &[ChatMessage]) {
        for (i, message) in messages.iter().enumerate() {
            if message.is_user() {
                let next = messages.get(i + 1).expect("user message without reply");
                assert_eq!(next.role, MessageRole::Assistant);
            }
        }
        assert_eq!(messages.last().map(|m| m.role), Some(MessageRole::Assistant));
    }

    #[tokio::test]
    async fn test_turns_pair_even_when_reply_fails() {
        let f = fixture(vec![
            Ok("What ingredients do you have?".to_string()),
            Err(LutongError::generation_failed("timeout")),
            Ok("Adobo it is!".to_string()),
        ])
        .await;

        for input in ["I have chicken", "and garlic", "adobo please"] {
            f.controller.submit(input, &f.profile).await.unwrap();
            assert_paired(&f.controller.messages().await);
        }

        let session = f.sessions.current().await.unwrap();
        assert_eq!(session.messages.len(), 7);
        assert_eq!(session.messages[4].content, FALLBACK_REPLY);
        assert!(session.messages[4].id.starts_with("error-"));
        assert_paired(&f.store.get_session(&session.id).await.unwrap().unwrap().messages);
    }

    #[tokio::test]
    async fn test_failure_outcome_is_flagged_not_returned() {
        let f = fixture(vec![Err(LutongError::generation_failed("boom"))]).await;
        let outcome = f.controller.submit("hello", &f.profile).await.unwrap();
        match outcome {
            TurnOutcome::Completed {
                reply, reply_failed, ..
            } => {
                assert!(reply_failed);
                assert_eq!(reply.content, FALLBACK_REPLY);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sentinel_is_stripped_and_ready_is_sticky() {
        let f = fixture(vec![
            Ok("Sounds like sinigang! [GENERATE_RECIPE_READY]".to_string()),
            Ok("Anything else?".to_string()),
        ])
        .await;

        let first = f.controller.submit("sour soup", &f.profile).await.unwrap();
        let TurnOutcome::Completed { reply, ready, .. } = first else {
            panic!("expected completed turn");
        };
        assert_eq!(reply.content, "Sounds like sinigang!");
        assert!(ready);

        f.controller.submit("thanks", &f.profile).await.unwrap();
        assert!(f.controller.is_ready().await);
    }

    #[tokio::test]
    async fn test_ready_forced_at_four_messages() {
        let f = fixture(vec![]).await;

        // welcome + user + assistant = 3
        let first = f.controller.submit("hi", &f.profile).await.unwrap();
        assert!(matches!(first, TurnOutcome::Completed { ready: false, .. }));

        let second = f.controller.submit("pork please", &f.profile).await.unwrap();
        assert!(matches!(second, TurnOutcome::Completed { ready: true, .. }));
    }

    #[tokio::test]
    async fn test_empty_and_oversized_input() {
        let f = fixture(vec![]).await;

        assert_eq!(
            f.controller.submit("   \n ", &f.profile).await.unwrap(),
            TurnOutcome::Skipped
        );

        let long = "a".repeat(1001);
        let err = f.controller.submit(&long, &f.profile).await.unwrap_err();
        assert!(matches!(err, LutongError::InvalidInput(_)));

        assert_eq!(f.controller.messages().await.len(), 1);
        assert_eq!(f.store.session_count(), 0);
    }

    #[tokio::test]
    async fn test_context_window_limits_history() {
        let f = fixture(vec![]).await;
        for i in 0..6 {
            f.controller
                .submit(&format!("message {}", i), &f.profile)
                .await
                .unwrap();
        }

        let contexts = f.replies.contexts.lock().unwrap().clone();
        let last = contexts.last().unwrap();
        assert_eq!(last.len(), 11);
        assert_eq!(last.last().unwrap().content, "message 5");
        assert!(contexts[0].len() == 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_double_submit_is_busy() {
        struct SlowReplies;

        #[async_trait::async_trait]
        impl ReplyGenerator for SlowReplies {
            async fn generate_reply(
                &self,
                _context: &[ChatMessage],
                _profile: &UserProfile,
            ) -> Result<lutong_core::generation::GeneratedReply> {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok(lutong_core::generation::GeneratedReply::from_raw("ok"))
            }
        }

        let store = Arc::new(MemoryStore::default());
        let sessions = Arc::new(SessionManager::new(store.clone()));
        let controller =
            ConversationTurnController::new(sessions, Arc::new(SlowReplies), &LutongConfig::default());
        let profile = UserProfile::new("Maria");
        controller.open(&profile).await;

        let (a, b) = tokio::join!(controller.submit("first", &profile), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            controller.submit("second", &profile).await
        });

        assert!(matches!(a.unwrap(), TurnOutcome::Completed { .. }));
        assert_eq!(b.unwrap(), TurnOutcome::Busy);
        assert_eq!(controller.messages().await.len(), 3);
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces_and_keeps_transcript() {
        let f = fixture(vec![]).await;
        f.store.fail_session_writes.store(true, Ordering::SeqCst);

        let err = f.controller.submit("hello", &f.profile).await.unwrap_err();
        assert!(err.is_storage());
        assert_eq!(f.controller.messages().await.len(), 1);
    }

    #[tokio::test]
    async fn test_new_chat_resets_to_welcome() {
        let f = fixture(vec![]).await;
        f.controller.submit("adobo", &f.profile).await.unwrap();
        f.controller.submit("more", &f.profile).await.unwrap();
        assert!(f.controller.is_ready().await);

        let messages = f.controller.start_new_chat(&f.profile).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].content.starts_with("Hi Maria!"));
        assert!(!f.controller.is_ready().await);
        assert!(f.sessions.current().await.is_none());
    }

    #[tokio::test]
    async fn test_select_session_sets_ready_from_length() {
        let f = fixture(vec![]).await;
        let short = ChatSession::create(vec![ChatMessage::user("a"), ChatMessage::assistant("b")]);
        f.store.insert_session(short.clone());

        f.controller.select_session(&short.id).await.unwrap();
        assert!(!f.controller.is_ready().await);
        assert_eq!(f.controller.messages().await, short.messages);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_switching_sessions_mid_turn_keeps_both_conversations() {
        struct SlowReplies;

        #[async_trait::async_trait]
        impl ReplyGenerator for SlowReplies {
            async fn generate_reply(
                &self,
                _context: &[ChatMessage],
                _profile: &UserProfile,
            ) -> Result<lutong_core::generation::GeneratedReply> {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(lutong_core::generation::GeneratedReply::from_raw("ok"))
            }
        }

        let store = Arc::new(MemoryStore::default());
        let sinigang = ChatSession::create(vec![
            ChatMessage::welcome("Maria"),
            ChatMessage::user("sinigang please"),
            ChatMessage::assistant("sure"),
        ]);
        store.insert_session(sinigang.clone());

        let sessions = Arc::new(SessionManager::new(store.clone()));
        let controller =
            ConversationTurnController::new(sessions.clone(), Arc::new(SlowReplies), &LutongConfig::default());
        let profile = UserProfile::new("Maria");
        controller.open(&profile).await;

        let (turn, selected) = tokio::join!(controller.submit("adobo with chicken", &profile), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            controller.select_session(&sinigang.id).await
        });
        assert!(matches!(turn.unwrap(), TurnOutcome::Completed { .. }));
        assert_eq!(selected.unwrap(), sinigang.messages);

        let stored = store.get_session(&sinigang.id).await.unwrap().unwrap();
        assert_eq!(stored, sinigang);
        assert_eq!(sessions.current().await.map(|s| s.id), Some(sinigang.id.clone()));
        assert_eq!(controller.messages().await, sinigang.messages);

        let all = store.get_sessions().await.unwrap();
        assert_eq!(all.len(), 2);
        let adobo = all.iter().find(|s| s.id != sinigang.id).unwrap();
        assert_eq!(adobo.title, "Adobo Recipe");
        assert_eq!(adobo.messages[1].content, "adobo with chicken");
    }
}
