//! In-memory repositories and scripted collaborators for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lutong_core::error::{LutongError, Result};
use lutong_core::generation::{
    Acquisition, Completion, GeneratedReply, GenerationLedger, ImageGenerator, RecipeGenerator,
    RegenerationState, ReplyGenerator,
};
use lutong_core::recipe::{Recipe, RecipeDraft, RecipeRepository, Servings};
use lutong_core::session::{ChatMessage, ChatSession, MessageLogRepository, SessionRepository};
use lutong_core::user::{ProfileRepository, UserProfile};

#[derive(Default)]
pub struct MemoryStore {
    profile: Mutex<Option<UserProfile>>,
    sessions: Mutex<HashMap<String, ChatSession>>,
    active: Mutex<Option<String>>,
    recipes: Mutex<HashMap<String, Recipe>>,
    messages: Mutex<Vec<ChatMessage>>,
    ledger: Mutex<HashMap<String, RegenerationState>>,
    session_writes: AtomicUsize,
    pub fail_session_writes: AtomicBool,
    pub fail_active_writes: AtomicBool,
    pub fail_ledger_completes: AtomicBool,
}

impl MemoryStore {
    pub fn insert_session(&self, session: ChatSession) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.clone(), session);
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn session_writes(&self) -> usize {
        self.session_writes.load(Ordering::SeqCst)
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.lock().unwrap().len()
    }

    pub fn insert_recipe(&self, recipe: Recipe) {
        self.recipes
            .lock()
            .unwrap()
            .insert(recipe.id.clone(), recipe);
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn get_profile(&self) -> Result<Option<UserProfile>> {
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn put_profile(&self, profile: &UserProfile) -> Result<()> {
        *self.profile.lock().unwrap() = Some(profile.clone());
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn put_session(&self, session: &ChatSession) -> Result<()> {
        if self.fail_session_writes.load(Ordering::SeqCst) {
            return Err(LutongError::storage("disk full"));
        }
        self.session_writes.fetch_add(1, Ordering::SeqCst);
        self.insert_session(session.clone());
        Ok(())
    }

    async fn get_sessions(&self) -> Result<Vec<ChatSession>> {
        let mut sessions: Vec<ChatSession> =
            self.sessions.lock().unwrap().values().cloned().collect();
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(sessions)
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<ChatSession>> {
        Ok(self.sessions.lock().unwrap().get(session_id).cloned())
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.sessions.lock().unwrap().remove(session_id);
        Ok(())
    }

    async fn get_active_session_id(&self) -> Result<Option<String>> {
        Ok(self.active.lock().unwrap().clone())
    }

    async fn set_active_session_id(&self, session_id: &str) -> Result<()> {
        if self.fail_active_writes.load(Ordering::SeqCst) {
            return Err(LutongError::storage("active pointer unwritable"));
        }
        *self.active.lock().unwrap() = Some(session_id.to_string());
        Ok(())
    }

    async fn clear_active_session_id(&self) -> Result<()> {
        *self.active.lock().unwrap() = None;
        Ok(())
    }
}

#[async_trait]
impl RecipeRepository for MemoryStore {
    async fn put_recipe(&self, recipe: &Recipe) -> Result<()> {
        self.insert_recipe(recipe.clone());
        Ok(())
    }

    async fn get_recipes(&self) -> Result<Vec<Recipe>> {
        let mut recipes: Vec<Recipe> = self.recipes.lock().unwrap().values().cloned().collect();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }

    async fn get_recipe(&self, id: &str) -> Result<Option<Recipe>> {
        Ok(self.recipes.lock().unwrap().get(id).cloned())
    }

    async fn delete_recipe(&self, id: &str) -> Result<()> {
        self.recipes.lock().unwrap().remove(id);
        Ok(())
    }
}

#[async_trait]
impl MessageLogRepository for MemoryStore {
    async fn append_message(&self, message: &ChatMessage) -> Result<()> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn get_all_messages(&self) -> Result<Vec<ChatMessage>> {
        Ok(self.messages.lock().unwrap().clone())
    }

    async fn clear_messages(&self) -> Result<()> {
        self.messages.lock().unwrap().clear();
        Ok(())
    }
}

#[async_trait]
impl GenerationLedger for MemoryStore {
    async fn acquire(&self, scope: &str, attempt: u32, stale_after: Duration) -> Result<Acquisition> {
        let mut ledger = self.ledger.lock().unwrap();
        let state = ledger
            .entry(scope.to_string())
            .or_insert_with(|| RegenerationState::empty(scope));
        Ok(state.acquire(attempt, chrono::Utc::now(), stale_after))
    }

    async fn complete(
        &self,
        scope: &str,
        token: &str,
        attempt: u32,
        recipe_id: &str,
    ) -> Result<Completion> {
        if self.fail_ledger_completes.load(Ordering::SeqCst) {
            return Err(LutongError::storage("ledger unwritable"));
        }
        let mut ledger = self.ledger.lock().unwrap();
        let state = ledger
            .entry(scope.to_string())
            .or_insert_with(|| RegenerationState::empty(scope));
        if state.finish(token, attempt, recipe_id) {
            Ok(Completion::Recorded(state.clone()))
        } else {
            Ok(Completion::Superseded(state.clone()))
        }
    }

    async fn release(&self, scope: &str, token: &str) -> Result<()> {
        if let Some(state) = self.ledger.lock().unwrap().get_mut(scope) {
            state.abandon(token);
        }
        Ok(())
    }

    async fn state(&self, scope: &str) -> Result<RegenerationState> {
        Ok(self
            .ledger
            .lock()
            .unwrap()
            .get(scope)
            .cloned()
            .unwrap_or_else(|| RegenerationState::empty(scope)))
    }
}

/// Replies served in order; `Err` entries simulate collaborator failures.
#[derive(Default)]
pub struct ScriptedReplies {
    script: Mutex<VecDeque<Result<String>>>,
    pub contexts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedReplies {
    pub fn new(script: Vec<Result<String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            contexts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ReplyGenerator for ScriptedReplies {
    async fn generate_reply(
        &self,
        context: &[ChatMessage],
        _profile: &UserProfile,
    ) -> Result<GeneratedReply> {
        self.contexts.lock().unwrap().push(context.to_vec());
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Tell me more!".to_string()));
        next.map(|raw| GeneratedReply::from_raw(&raw))
    }
}

/// Recipe collaborator that counts calls and can be slowed down or failed.
#[derive(Default)]
pub struct MockRecipeGenerator {
    pub calls: AtomicUsize,
    pub delay: Option<Duration>,
    pub fail: AtomicBool,
    pub conversations: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockRecipeGenerator {
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }
}

#[async_trait]
impl RecipeGenerator for MockRecipeGenerator {
    async fn generate_recipe_draft(
        &self,
        conversation: &[ChatMessage],
        _profile: &UserProfile,
        attempt: u32,
    ) -> Result<RecipeDraft> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.conversations
            .lock()
            .unwrap()
            .push(conversation.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(LutongError::generation_failed("model unavailable"));
        }
        Ok(RecipeDraft {
            name: format!("Chicken Adobo #{}", attempt),
            description: "Savory soy-vinegar stew".to_string(),
            cooking_time: "45 minutes".to_string(),
            difficulty: "Easy".to_string(),
            servings: Servings::Count(4),
            ingredients: vec!["chicken".to_string(), "soy sauce".to_string()],
            instructions: vec!["Marinate".to_string(), "Simmer".to_string()],
            tips: Some(vec!["Use native vinegar".to_string()]),
            category: Some("Main Dish".to_string()),
        })
    }
}

pub struct MockImageGenerator {
    pub fail: bool,
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate_image(&self, dish_name: &str, _description: &str) -> Result<String> {
        if self.fail {
            Err(LutongError::generation_failed("image quota exceeded"))
        } else {
            Ok(format!("https://images.example/{}", dish_name.replace(' ', "-")))
        }
    }
}
