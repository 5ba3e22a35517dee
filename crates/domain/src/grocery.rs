//! Grocery lists and their items.

use chrono::{DateTime, Utc};
use common::{GroceryItemId, GroceryListId, RecipeId};
use serde::{Deserialize, Serialize};

use crate::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryList {
    pub id: GroceryListId,
    pub name: String,
    /// Items in the order they were added.
    pub items: Vec<GroceryItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    pub id: GroceryItemId,
    pub grocery_list_id: GroceryListId,
    pub name: String,
    pub amount: f64,
    pub unit: String,
    pub checked: bool,
    /// Recipe the item was generated from. Cleared when that recipe is deleted.
    pub recipe_id: Option<RecipeId>,
}

impl GroceryItem {
    /// Applies validated changes in place.
    pub fn apply(&mut self, changes: GroceryItemChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(amount) = changes.amount {
            self.amount = amount;
        }
        if let Some(unit) = changes.unit {
            self.unit = unit;
        }
        if let Some(checked) = changes.checked {
            self.checked = checked;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GroceryListDraft {
    pub name: String,
}

impl GroceryListDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(self) -> Result<NewGroceryList, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::ListNameRequired);
        }
        Ok(NewGroceryList {
            name: name.to_string(),
        })
    }
}

/// A validated grocery list name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroceryList {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroceryItemDraft {
    pub name: String,
    pub amount: f64,
    pub unit: String,
    pub recipe_id: Option<RecipeId>,
}

impl GroceryItemDraft {
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount,
            unit: unit.into(),
            recipe_id: None,
        }
    }

    pub fn validate(self) -> Result<NewGroceryItem, ValidationError> {
        let name = self.name.trim();
        let unit = self.unit.trim();
        if name.is_empty() || unit.is_empty() || !valid_amount(self.amount) {
            return Err(ValidationError::IncompleteGroceryItem);
        }
        Ok(NewGroceryItem {
            name: name.to_string(),
            amount: self.amount,
            unit: unit.to_string(),
            recipe_id: self.recipe_id,
        })
    }
}

fn valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount > 0.0
}

/// A validated grocery item ready to be written. New items start unchecked.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGroceryItem {
    pub name: String,
    pub amount: f64,
    pub unit: String,
    pub recipe_id: Option<RecipeId>,
}

/// Partial update of a grocery item. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GroceryItemPatch {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub checked: Option<bool>,
}

impl GroceryItemPatch {
    pub fn validate(self) -> Result<GroceryItemChanges, ValidationError> {
        if self.name.is_none()
            && self.amount.is_none()
            && self.unit.is_none()
            && self.checked.is_none()
        {
            return Err(ValidationError::EmptyPatch);
        }

        let name = trimmed_non_blank(self.name)?;
        let unit = trimmed_non_blank(self.unit)?;
        if let Some(amount) = self.amount
            && !valid_amount(amount)
        {
            return Err(ValidationError::IncompleteGroceryItem);
        }

        Ok(GroceryItemChanges {
            name,
            amount: self.amount,
            unit,
            checked: self.checked,
        })
    }
}

fn trimmed_non_blank(value: Option<String>) -> Result<Option<String>, ValidationError> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Err(ValidationError::IncompleteGroceryItem),
        Some(v) => Ok(Some(v.trim().to_string())),
    }
}

/// Validated, non-empty set of changes for a grocery item.
#[derive(Debug, Clone, PartialEq)]
pub struct GroceryItemChanges {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub checked: Option<bool>,
}
