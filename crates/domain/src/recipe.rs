//! Recipes with their ingredients and ordered instructions.

use chrono::{DateTime, Utc};
use common::{IngredientId, InstructionId, RecipeId};
use serde::{Deserialize, Serialize};

use crate::ValidationError;
use crate::grocery::NewGroceryItem;

/// A stored recipe together with its ingredients and instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub description: Option<String>,
    /// Preparation time in minutes.
    pub prep_time: Option<u32>,
    /// Cooking time in minutes.
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    pub tags: Vec<String>,
    /// Ingredients in the order they were submitted.
    pub ingredients: Vec<Ingredient>,
    /// Instructions ordered by step number.
    pub instructions: Vec<Instruction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Builds one grocery item per ingredient, traced back to this recipe.
    ///
    /// When both `servings` and the recipe's own servings are known and
    /// differ, amounts are scaled by `servings / recipe servings` and rounded
    /// to three decimals. Otherwise amounts are copied unchanged.
    pub fn grocery_items(&self, servings: Option<u32>) -> Vec<NewGroceryItem> {
        let factor = match (servings, self.servings) {
            (Some(wanted), Some(base)) if wanted > 0 && base > 0 && wanted != base => {
                Some(f64::from(wanted) / f64::from(base))
            }
            _ => None,
        };

        self.ingredients
            .iter()
            .map(|ingredient| NewGroceryItem {
                name: ingredient.name.clone(),
                amount: match factor {
                    Some(factor) => scale_amount(ingredient.amount, factor),
                    None => ingredient.amount,
                },
                unit: ingredient.unit.clone(),
                recipe_id: Some(self.id),
            })
            .collect()
    }
}

/// Scales a positive amount, keeping the result positive and finite.
///
/// Rounding that would reach zero keeps the unrounded value, and a product
/// too large for `f64` saturates at `f64::MAX`.
fn scale_amount(amount: f64, factor: f64) -> f64 {
    let scaled = amount * factor;
    if !scaled.is_finite() {
        return f64::MAX;
    }
    let rounded = (scaled * 1000.0).round() / 1000.0;
    if rounded > 0.0 && rounded.is_finite() {
        rounded
    } else {
        scaled.max(f64::MIN_POSITIVE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: IngredientId,
    pub recipe_id: RecipeId,
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    pub id: InstructionId,
    pub recipe_id: RecipeId,
    /// 1-based position within the recipe.
    pub step_number: u32,
    pub text: String,
}

/// Recipe as submitted by a client, before validation.
///
/// Missing fields deserialize to empty values so that validation, not the
/// JSON extractor, reports what is wrong.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeDraft {
    pub title: String,
    pub description: Option<String>,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    pub tags: Vec<String>,
    pub ingredients: Vec<IngredientDraft>,
    /// Instruction texts in step order.
    pub instructions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IngredientDraft {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

impl IngredientDraft {
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount,
            unit: unit.into(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && self.amount.is_finite()
            && self.amount > 0.0
            && !self.unit.trim().is_empty()
    }
}

impl RecipeDraft {
    /// Checks the draft and returns its normalized form.
    ///
    /// Checks run in a fixed order and the first failure is returned.
    pub fn validate(self) -> Result<NewRecipe, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::TitleRequired);
        }

        if self.ingredients.is_empty() {
            return Err(ValidationError::NoIngredients);
        }
        if let Some(index) = self.ingredients.iter().position(|i| !i.is_complete()) {
            return Err(ValidationError::IncompleteIngredient { index });
        }

        if self.instructions.is_empty() {
            return Err(ValidationError::NoInstructions);
        }
        if let Some(index) = self.instructions.iter().position(|t| t.trim().is_empty()) {
            return Err(ValidationError::IncompleteInstruction { step: index + 1 });
        }

        if self.servings == Some(0) {
            return Err(ValidationError::InvalidServings);
        }

        let ingredients = self
            .ingredients
            .iter()
            .map(|i| NewIngredient {
                name: i.name.trim().to_string(),
                amount: i.amount,
                unit: i.unit.trim().to_string(),
            })
            .collect();

        let instructions = self
            .instructions
            .iter()
            .zip(1u32..)
            .map(|(text, step_number)| NewInstruction {
                step_number,
                text: text.trim().to_string(),
            })
            .collect();

        Ok(NewRecipe {
            title: title.to_string(),
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            servings: self.servings,
            tags: normalize_tags(&self.tags),
            ingredients,
            instructions,
        })
    }
}

/// Trims tags, drops blanks and keeps the first occurrence of duplicates.
fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// A validated recipe ready to be written. Produced by [`RecipeDraft::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub title: String,
    pub description: Option<String>,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    pub tags: Vec<String>,
    pub ingredients: Vec<NewIngredient>,
    pub instructions: Vec<NewInstruction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewIngredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInstruction {
    pub step_number: u32,
    pub text: String,
}

/// Filters for listing recipes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecipeQuery {
    /// Case-insensitive (Unicode) substring matched against title and description.
    pub search: Option<String>,
    /// Exact tag the recipe must carry.
    pub tag: Option<String>,
}

impl RecipeQuery {
    /// Trims both filters and drops the ones left blank.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            search: clean(self.search),
            tag: clean(self.tag),
        }
    }

    /// Returns true if the search filter is unset or found in the title or
    /// description, ignoring case.
    pub fn matches_text(&self, title: &str, description: Option<&str>) -> bool {
        let Some(search) = &self.search else {
            return true;
        };
        let needle = search.to_lowercase();
        title.to_lowercase().contains(&needle)
            || description.is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}
