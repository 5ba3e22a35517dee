//! Domain error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Reasons a draft submitted by a client is rejected.
///
/// Messages are shown to end users as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Recipe title is required")]
    TitleRequired,

    #[error("At least one ingredient is required")]
    NoIngredients,

    /// Ingredient at `index` has a blank name or unit, or a non-positive amount.
    #[error("Please complete all ingredient fields")]
    IncompleteIngredient { index: usize },

    #[error("At least one instruction is required")]
    NoInstructions,

    /// Instruction `step` (1-based) is blank.
    #[error("Please complete all instruction fields")]
    IncompleteInstruction { step: usize },

    #[error("Servings must be at least 1")]
    InvalidServings,

    #[error("Grocery list name is required")]
    ListNameRequired,

    #[error("Please complete all grocery item fields")]
    IncompleteGroceryItem,

    #[error("No fields to update")]
    EmptyPatch,

    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    #[error("Unknown meal type: {0} (expected breakfast, lunch, dinner or snack)")]
    UnknownMealType(String),
}
