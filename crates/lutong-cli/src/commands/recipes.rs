use anyhow::{Result, bail};
use lutong_application::LutongServices;
use lutong_core::recipe::{CookingChecklist, Recipe};

pub async fn list(services: &LutongServices, query: Option<&str>) -> Result<()> {
    let recipes = services.recipes.list(query).await?;
    if recipes.is_empty() {
        println!("No recipes found");
        return Ok(());
    }

    for recipe in recipes {
        println!(
            "{}  {:<32}  {:<6}  {}  {}",
            recipe.id, recipe.title, recipe.difficulty, recipe.cooking_time, recipe.created_at
        );
    }
    Ok(())
}

pub async fn show(services: &LutongServices, id: &str) -> Result<()> {
    let Some(recipe) = services.recipes.get(id).await? else {
        bail!("recipe '{}' not found", id);
    };
    print_recipe(&recipe);
    Ok(())
}

pub async fn delete(services: &LutongServices, id: &str) -> Result<()> {
    let remaining = services.recipes.remove(id).await?;
    println!("Deleted recipe {} ({} remaining)", id, remaining.len());
    Ok(())
}

fn print_recipe(recipe: &Recipe) {
    let checklist = CookingChecklist::for_recipe(recipe);

    println!("{}", recipe.title);
    if let Some(category) = &recipe.category {
        println!("{}", category);
    }
    println!("{}", recipe.description);
    println!(
        "{} | {} | {}",
        recipe.cooking_time, recipe.servings, recipe.difficulty
    );
    if let Some(url) = &recipe.image_url {
        println!("image: {}", url);
    }

    println!("\nIngredients:");
    for (i, ingredient) in recipe.ingredients.iter().enumerate() {
        let mark = if checklist.is_ingredient_checked(i) { "x" } else { " " };
        println!("  [{}] {}", mark, ingredient);
    }

    println!("\nInstructions:");
    for (i, step) in recipe.instructions.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }

    if let Some(tips) = &recipe.tips {
        println!("\nTips:");
        for tip in tips {
            println!("  - {}", tip);
        }
    }

    println!("\nProgress: {}%", checklist.completion_percentage());
}
