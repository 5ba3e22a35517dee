//! Domain layer for the recipe book.
//!
//! This crate provides:
//! - Entities as they are stored and returned (`Recipe`, `GroceryList`, `MealPlan`, ...)
//! - Drafts as they arrive from clients, with `validate()` producing normalized input
//! - Query filters for listing recipes and meal plans

pub mod error;
pub mod grocery;
pub mod meal_plan;
pub mod recipe;

pub use error::ValidationError;
pub use grocery::{
    GroceryItem, GroceryItemChanges, GroceryItemDraft, GroceryItemPatch, GroceryList,
    GroceryListDraft, NewGroceryItem, NewGroceryList,
};
pub use meal_plan::{MealPlan, MealPlanDraft, MealPlanQuery, MealType};
pub use recipe::{
    Ingredient, IngredientDraft, Instruction, NewIngredient, NewInstruction, NewRecipe, Recipe,
    RecipeDraft, RecipeQuery,
};
