//! Meal plans: a recipe assigned to a date and a meal slot.

use std::str::FromStr;

use chrono::NaiveDate;
use common::{MealPlanId, RecipeId};
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Meal slot within a day.
///
/// Variants are declared in the order they occur during the day, so the
/// derived `Ord` sorts breakfast first and snack last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    /// Returns the lowercase name stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealType::ALL
            .into_iter()
            .find(|meal| meal.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownMealType(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: MealPlanId,
    pub date: NaiveDate,
    pub recipe_id: RecipeId,
    pub meal_type: MealType,
}

/// Meal plan as submitted by a client.
///
/// Date and meal type are typed, so a draft that deserialized is
/// structurally valid; the store checks that the recipe exists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanDraft {
    pub date: NaiveDate,
    pub recipe_id: RecipeId,
    pub meal_type: MealType,
}

/// Filters for listing meal plans. Both date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MealPlanQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub meal_type: Option<MealType>,
}

impl MealPlanQuery {
    /// Plans for a single day.
    pub fn on(date: NaiveDate) -> Self {
        Self {
            from: Some(date),
            to: Some(date),
            meal_type: None,
        }
    }

    pub fn validate(self) -> Result<Self, ValidationError> {
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return Err(ValidationError::InvalidDateRange { from, to });
        }
        Ok(self)
    }
}
