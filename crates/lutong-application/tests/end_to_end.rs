//! Full flow against the real file-backed store.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lutong_application::{GenerationOutcome, LutongServices, TurnOutcome};
use lutong_core::config::LutongConfig;
use lutong_core::error::{LutongError, Result};
use lutong_core::generation::{
    GeneratedReply, ImageGenerator, MAX_REGENERATIONS, RecipeGenerator, ReplyGenerator,
};
use lutong_core::recipe::{RecipeDraft, RecipeRepository};
use lutong_core::session::{ChatMessage, SessionRepository};
use lutong_core::user::UserProfile;
use tempfile::TempDir;

struct EchoReplies;

#[async_trait]
impl ReplyGenerator for EchoReplies {
    async fn generate_reply(
        &self,
        context: &[ChatMessage],
        _profile: &UserProfile,
    ) -> Result<GeneratedReply> {
        let last = context.last().map(|m| m.content.clone()).unwrap_or_default();
        if last.contains("fail") {
            return Err(LutongError::generation_failed("upstream 503"));
        }
        Ok(GeneratedReply::from_raw(&format!(
            "You said: {} [GENERATE_RECIPE_READY]",
            last
        )))
    }
}

#[derive(Default)]
struct JsonRecipes {
    calls: AtomicUsize,
}

#[async_trait]
impl RecipeGenerator for JsonRecipes {
    async fn generate_recipe_draft(
        &self,
        _conversation: &[ChatMessage],
        _profile: &UserProfile,
        attempt: u32,
    ) -> Result<RecipeDraft> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;
        RecipeDraft::from_model_output(&format!(
            r#"```json
{{"recipe": {{"name": "Adobo v{attempt}", "description": "Soy-vinegar chicken",
  "cookingTime": "45 minutes", "difficulty": "Easy", "servings": 4,
  "ingredients": ["chicken", "vinegar"], "instructions": ["Marinate", "Simmer"],
  "tips": ["Rest overnight"], "category": "Main Dish"}},
 "regenerationCount": {attempt}}}
```"#
        ))
    }
}

struct BrokenImages;

#[async_trait]
impl ImageGenerator for BrokenImages {
    async fn generate_image(&self, _dish_name: &str, _description: &str) -> Result<String> {
        Err(LutongError::generation_failed("no image model"))
    }
}

fn config_for(dir: &TempDir) -> LutongConfig {
    LutongConfig {
        data_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    }
}

#[tokio::test]
async fn conversation_generation_and_reload() {
    let temp_dir = TempDir::new().unwrap();
    let services = LutongServices::open(config_for(&temp_dir)).await.unwrap();

    let profile = services.profiles.register("Maria").await.unwrap();
    let chat = services.conversation(Arc::new(EchoReplies));
    chat.open(&profile).await;

    let outcome = chat.submit("I want to cook adobo with chicken", &profile).await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Completed { ready: true, .. }));
    let outcome = chat.submit("please fail now", &profile).await.unwrap();
    assert!(matches!(
        outcome,
        TurnOutcome::Completed {
            reply_failed: true,
            ..
        }
    ));

    let session = services.sessions.current().await.unwrap();
    assert_eq!(session.title, "Adobo Recipe");
    assert_eq!(session.messages.len(), 5);

    let recipes = Arc::new(JsonRecipes::default());
    let generation = services.recipe_generation(recipes.clone(), Arc::new(BrokenImages));

    let (a, b) = futures::join!(
        generation.generate(Some(&session), &profile, 0),
        generation.generate(Some(&session), &profile, 0)
    );
    let generated: Vec<_> = [a.unwrap(), b.unwrap()]
        .into_iter()
        .filter_map(|o| match o {
            GenerationOutcome::Generated(recipe) => Some(recipe),
            _ => None,
        })
        .collect();
    assert_eq!(generated.len(), 1);
    let first = &generated[0];
    assert_eq!(first.servings, "4 servings");
    assert!(first.image_url.as_deref().unwrap().starts_with("/placeholder.svg?"));

    for attempt in 1..=MAX_REGENERATIONS {
        let outcome = generation.generate(Some(&session), &profile, attempt).await.unwrap();
        assert!(matches!(outcome, GenerationOutcome::Generated(_)));
    }
    let err = generation
        .generate(Some(&session), &profile, MAX_REGENERATIONS + 1)
        .await
        .unwrap_err();
    assert!(err.is_regeneration_limit());
    assert_eq!(recipes.calls.load(Ordering::SeqCst), 3);
    assert_eq!(services.recipes.list(None).await.unwrap().len(), 3);

    // Reload: the active session and the generation marker survive
    drop(generation);
    drop(chat);
    drop(services);

    let reopened = LutongServices::open(config_for(&temp_dir)).await.unwrap();
    let restored = reopened.sessions.current().await.unwrap();
    assert_eq!(restored.id, session.id);

    let generation = reopened.recipe_generation(recipes.clone(), Arc::new(BrokenImages));
    let again = generation.generate(Some(&restored), &profile, 0).await.unwrap();
    assert!(matches!(again, GenerationOutcome::AlreadyGenerated { count: 2, .. }));
    assert_eq!(
        generation.remaining_regenerations(Some(&restored.id)).await.unwrap(),
        0
    );
    let current = generation.current_recipe(Some(&restored.id)).await.unwrap().unwrap();
    assert_eq!(current.title, "Adobo v2");

    // Round-trip of optional fields through the file store
    let stored = reopened.store.get_recipe(&current.id).await.unwrap().unwrap();
    assert_eq!(stored, current);
    assert_eq!(stored.tips, Some(vec!["Rest overnight".to_string()]));
}

#[tokio::test]
async fn new_chat_flushes_and_deleting_recipe_keeps_session() {
    let temp_dir = TempDir::new().unwrap();
    let services = LutongServices::open(config_for(&temp_dir)).await.unwrap();
    let profile = services.profiles.current_or("Friend").await.unwrap();

    let chat = services.conversation(Arc::new(EchoReplies));
    let welcome = chat.open(&profile).await;
    assert_eq!(welcome.len(), 1);

    // Only the welcome message: nothing is persisted
    chat.start_new_chat(&profile).await.unwrap();
    assert!(services.store.get_sessions().await.unwrap().is_empty());

    chat.submit("lumpia for a party", &profile).await.unwrap();
    let session = services.sessions.current().await.unwrap();
    chat.start_new_chat(&profile).await.unwrap();

    let sessions = services.sessions.list_sessions().await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].title, "Lumpia Recipe");
    assert_eq!(services.store.get_active_session_id().await.unwrap(), None);

    let generation = services.recipe_generation(
        Arc::new(JsonRecipes::default()),
        Arc::new(BrokenImages),
    );
    let GenerationOutcome::Generated(recipe) =
        generation.generate(Some(&session), &profile, 0).await.unwrap()
    else {
        panic!("expected a recipe");
    };

    let remaining = services.recipes.remove(&recipe.id).await.unwrap();
    assert!(remaining.is_empty());
    assert!(services.store.get_session(&session.id).await.unwrap().is_some());

    services.sessions.delete(&session.id).await.unwrap();
    assert!(services.sessions.list_sessions().await.unwrap().is_empty());
}
