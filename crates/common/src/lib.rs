//! Identifier types shared by every layer of the recipe book service.

mod types;

pub use types::{GroceryItemId, GroceryListId, IngredientId, InstructionId, MealPlanId, RecipeId};
