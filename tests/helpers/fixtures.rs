// ABOUTME: Shared fixtures: canned generation output, test configuration, and router construction
// ABOUTME: Keeps outbound timeouts short so timeout paths finish quickly

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use mealprep_server::config::ServerConfig;
use mealprep_server::llm::LlmProvider;
use mealprep_server::mail::Mailer;
use mealprep_server::recipes::RecipeCatalog;
use mealprep_server::resources::ServerResources;
use mealprep_server::routes;

/// A well-formed generation response for a rice and tuna lunch
pub const TUNA_RICE_RECIPE: &str = "\
Title: Tuna Rice Power Bowl
Ingredients:
- 150 g cooked rice
- 1 can tuna in water
- 1 cup spinach
- 1 tbsp soy sauce
Steps:
1. Warm the rice.
2. Flake the tuna over the rice.
3. Wilt the spinach and add soy sauce.
Nutrition: Calories 480 kcal, Protein 42 g, Carbs 55 g, Fat 8 g
Estimated cost: $3.75 per serving
Prep time: 15 minutes
Shopping list:
- spinach
- soy sauce
";

/// Output with a title and ingredients but no steps, nutrition, cost or time
pub const PARTIAL_RECIPE: &str = "\
Title: Simple Egg Fried Rice
Ingredients:
- 2 eggs
- 1 cup cooked rice
- 1 tbsp soy sauce
";

/// What a model says when it declines
pub const REFUSAL: &str = "I'm sorry, but I can't help with that request.";

/// Configuration with bounds small enough for timeout tests
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.generation.api_key = Some("sk-test".to_owned());
    config.generation.timeout = Duration::from_millis(200);
    config.mail.timeout = Duration::from_millis(200);
    config.catalog_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/recipes.json");
    config
}

/// The seed catalog shipped in `data/recipes.json`
pub fn seed_catalog() -> RecipeCatalog {
    RecipeCatalog::load(&test_config().catalog_path).expect("seed catalog loads")
}

/// Shared state around the given collaborators
pub fn resources(provider: Arc<dyn LlmProvider>, mailer: Arc<dyn Mailer>) -> Arc<ServerResources> {
    Arc::new(ServerResources::new(
        Arc::new(test_config()),
        provider,
        mailer,
        seed_catalog(),
    ))
}

/// Full application router, middleware included
pub fn app(provider: Arc<dyn LlmProvider>, mailer: Arc<dyn Mailer>) -> Router {
    routes::router(resources(provider, mailer))
}
