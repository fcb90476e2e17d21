use std::collections::BTreeSet;

use super::model::Recipe;

/// Cooking progress over one recipe's ingredients and steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookingChecklist {
    ingredient_count: usize,
    step_count: usize,
    checked_ingredients: BTreeSet<usize>,
    checked_steps: BTreeSet<usize>,
}

impl CookingChecklist {
    pub fn for_recipe(recipe: &Recipe) -> Self {
        Self {
            ingredient_count: recipe.ingredients.len(),
            step_count: recipe.instructions.len(),
            ..Default::default()
        }
    }

    /// Out-of-range indices are ignored.
    pub fn toggle_ingredient(&mut self, index: usize) {
        if index < self.ingredient_count {
            toggle(&mut self.checked_ingredients, index);
        }
    }

    /// Out-of-range indices are ignored.
    pub fn toggle_step(&mut self, index: usize) {
        if index < self.step_count {
            toggle(&mut self.checked_steps, index);
        }
    }

    pub fn is_ingredient_checked(&self, index: usize) -> bool {
        self.checked_ingredients.contains(&index)
    }

    pub fn is_step_checked(&self, index: usize) -> bool {
        self.checked_steps.contains(&index)
    }

    /// Percentage of checked steps, rounded. 0 when the recipe has no steps.
    pub fn completion_percentage(&self) -> u8 {
        if self.step_count == 0 {
            return 0;
        }
        let ratio = self.checked_steps.len() as f64 / self.step_count as f64;
        (ratio * 100.0).round() as u8
    }

    pub fn is_complete(&self) -> bool {
        self.step_count > 0 && self.checked_steps.len() == self.step_count
    }
}

fn toggle(set: &mut BTreeSet<usize>, index: usize) {
    if !set.remove(&index) {
        set.insert(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Difficulty;

    fn recipe(steps: usize) -> Recipe {
        Recipe {
            id: "recipe-1".into(),
            title: "Adobo".into(),
            description: String::new(),
            ingredients: vec!["chicken".into(), "vinegar".into()],
            instructions: (0..steps).map(|i| format!("step {}", i)).collect(),
            cooking_time: String::new(),
            servings: String::new(),
            difficulty: Difficulty::Easy,
            image_url: None,
            created_at: String::new(),
            tips: None,
            category: None,
        }
    }

    #[test]
    fn test_completion_rounds() {
        let mut checklist = CookingChecklist::for_recipe(&recipe(3));
        checklist.toggle_step(0);
        assert_eq!(checklist.completion_percentage(), 33);
        checklist.toggle_step(1);
        assert_eq!(checklist.completion_percentage(), 67);
        checklist.toggle_step(2);
        assert!(checklist.is_complete());
        assert_eq!(checklist.completion_percentage(), 100);
    }

    #[test]
    fn test_toggle_twice_unchecks_and_out_of_range_ignored() {
        let mut checklist = CookingChecklist::for_recipe(&recipe(2));
        checklist.toggle_ingredient(1);
        assert!(checklist.is_ingredient_checked(1));
        checklist.toggle_ingredient(1);
        assert!(!checklist.is_ingredient_checked(1));

        checklist.toggle_ingredient(9);
        checklist.toggle_step(9);
        assert!(!checklist.is_ingredient_checked(9));
        assert_eq!(checklist.completion_percentage(), 0);
    }

    #[test]
    fn test_no_instructions() {
        let checklist = CookingChecklist::for_recipe(&recipe(0));
        assert_eq!(checklist.completion_percentage(), 0);
        assert!(!checklist.is_complete());
    }
}
