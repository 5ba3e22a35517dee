//! Integration tests for the SQLite store.
//!
//! Every test runs against its own database, in memory unless it
//! exercises files or concurrent connections.

use chrono::NaiveDate;
use common::{GroceryItemId, GroceryListId, MealPlanId, RecipeId};
use domain::{
    GroceryItemDraft, GroceryItemPatch, GroceryListDraft, IngredientDraft, MealPlanDraft,
    MealPlanQuery, MealType, NewRecipe, RecipeDraft, RecipeQuery,
};
use store::{SqliteStore, StoreError};

async fn store() -> SqliteStore {
    SqliteStore::in_memory().await.unwrap()
}

fn recipe(title: &str, tags: &[&str]) -> NewRecipe {
    RecipeDraft {
        title: title.to_string(),
        description: Some(format!("How to make {title}")),
        prep_time: Some(10),
        cook_time: Some(20),
        servings: Some(2),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ingredients: vec![
            IngredientDraft::new("flour", 200.0, "g"),
            IngredientDraft::new("milk", 0.5, "l"),
        ],
        instructions: vec!["Mix".to_string(), "Bake".to_string()],
    }
    .validate()
    .unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn count(store: &SqliteStore, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(store.pool())
        .await
        .unwrap()
}

mod recipes {
    use super::*;

    #[tokio::test]
    async fn create_and_get_recipe() {
        let store = store().await;

        let created = store
            .create_recipe(&recipe("Bread", &["baking"]))
            .await
            .unwrap();
        assert_eq!(created.title, "Bread");
        assert_eq!(created.tags, vec!["baking"]);
        assert_eq!(created.ingredients.len(), 2);
        assert_eq!(created.ingredients[0].name, "flour");
        assert_eq!(created.ingredients[1].name, "milk");
        assert_eq!(created.instructions[0].step_number, 1);
        assert_eq!(created.instructions[1].text, "Bake");
        assert_eq!(created.created_at, created.updated_at);

        let fetched = store.get_recipe(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_missing_recipe_returns_none() {
        let store = store().await;
        assert!(store.get_recipe(RecipeId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = store().await;
        let first = store.create_recipe(&recipe("First", &[])).await.unwrap();
        let second = store.create_recipe(&recipe("Second", &[])).await.unwrap();

        let all = store.list_recipes(RecipeQuery::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn search_matches_title_and_description_ignoring_case() {
        let store = store().await;
        store.create_recipe(&recipe("Tomato Soup", &[])).await.unwrap();
        store.create_recipe(&recipe("Pancakes", &[])).await.unwrap();

        let query = RecipeQuery {
            search: Some("tomato".to_string()),
            tag: None,
        };
        let found = store.list_recipes(query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Tomato Soup");

        let query = RecipeQuery {
            search: Some("how to make".to_string()),
            tag: None,
        };
        assert_eq!(store.list_recipes(query).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let store = store().await;
        store.create_recipe(&recipe("Pancakes", &[])).await.unwrap();

        let query = RecipeQuery {
            search: Some("%".to_string()),
            tag: None,
        };
        assert!(store.list_recipes(query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn tag_filter_is_exact() {
        let store = store().await;
        store
            .create_recipe(&recipe("Salad", &["vegan", "quick"]))
            .await
            .unwrap();
        store.create_recipe(&recipe("Steak", &["meat"])).await.unwrap();

        let query = RecipeQuery {
            search: None,
            tag: Some("vegan".to_string()),
        };
        let found = store.list_recipes(query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Salad");

        let query = RecipeQuery {
            search: None,
            tag: Some("vega".to_string()),
        };
        assert!(store.list_recipes(query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_fields_and_children() {
        let store = store().await;
        let created = store.create_recipe(&recipe("Bread", &[])).await.unwrap();

        let mut replacement = recipe("Sourdough", &["baking"]);
        replacement.ingredients.truncate(1);
        replacement.instructions = vec![domain::NewInstruction {
            step_number: 1,
            text: "Wait a day".to_string(),
        }];

        let updated = store
            .update_recipe(created.id, &replacement)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Sourdough");
        assert_eq!(updated.ingredients.len(), 1);
        assert_eq!(updated.instructions.len(), 1);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        assert_eq!(count(&store, "ingredients").await, 1);
        assert_eq!(count(&store, "instructions").await, 1);
    }

    #[tokio::test]
    async fn update_missing_recipe_returns_none() {
        let store = store().await;
        let result = store
            .update_recipe(RecipeId::new(), &recipe("Ghost", &[]))
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(count(&store, "ingredients").await, 0);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let store = store().await;
        let created = store.create_recipe(&recipe("Bread", &[])).await.unwrap();

        assert!(store.delete_recipe(created.id).await.unwrap());
        assert!(!store.delete_recipe(created.id).await.unwrap());
        assert!(store.get_recipe(created.id).await.unwrap().is_none());
    }
}

mod cascades {
    use super::*;

    #[tokio::test]
    async fn deleting_recipe_removes_children_and_meal_plans() {
        let store = store().await;
        let created = store.create_recipe(&recipe("Bread", &[])).await.unwrap();
        store
            .create_meal_plan(&MealPlanDraft {
                date: date(2026, 10, 14),
                recipe_id: created.id,
                meal_type: MealType::Dinner,
            })
            .await
            .unwrap();

        store.delete_recipe(created.id).await.unwrap();

        assert_eq!(count(&store, "ingredients").await, 0);
        assert_eq!(count(&store, "instructions").await, 0);
        assert_eq!(count(&store, "meal_plans").await, 0);
    }

    #[tokio::test]
    async fn deleting_recipe_keeps_grocery_items_without_reference() {
        let store = store().await;
        let created = store.create_recipe(&recipe("Bread", &[])).await.unwrap();
        let list = store
            .create_grocery_list(&GroceryListDraft::new("Weekly").validate().unwrap())
            .await
            .unwrap();
        store
            .add_recipe_to_grocery_list(list.id, created.id, None)
            .await
            .unwrap();

        store.delete_recipe(created.id).await.unwrap();

        let list = store.get_grocery_list(list.id).await.unwrap().unwrap();
        assert_eq!(list.items.len(), 2);
        assert!(list.items.iter().all(|item| item.recipe_id.is_none()));
    }

    #[tokio::test]
    async fn deleting_grocery_list_removes_items() {
        let store = store().await;
        let list = store
            .create_grocery_list(&GroceryListDraft::new("Party").validate().unwrap())
            .await
            .unwrap();
        store
            .add_grocery_item(
                list.id,
                &GroceryItemDraft::new("chips", 3.0, "bags").validate().unwrap(),
            )
            .await
            .unwrap();

        assert!(store.delete_grocery_list(list.id).await.unwrap());
        assert_eq!(count(&store, "grocery_items").await, 0);
    }
}

mod grocery {
    use super::*;

    async fn list(store: &SqliteStore, name: &str) -> GroceryListId {
        store
            .create_grocery_list(&GroceryListDraft::new(name).validate().unwrap())
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn create_list_starts_empty() {
        let store = store().await;
        let created = store
            .create_grocery_list(&GroceryListDraft::new("Weekly").validate().unwrap())
            .await
            .unwrap();
        assert_eq!(created.name, "Weekly");
        assert!(created.items.is_empty());
    }

    #[tokio::test]
    async fn lists_are_newest_first() {
        let store = store().await;
        let older = list(&store, "Older").await;
        let newer = list(&store, "Newer").await;

        let lists = store.list_grocery_lists().await.unwrap();
        let ids: Vec<_> = lists.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![newer, older]);
    }

    #[tokio::test]
    async fn rename_list() {
        let store = store().await;
        let id = list(&store, "Weekly").await;

        let renamed = store
            .rename_grocery_list(id, &GroceryListDraft::new("Monthly").validate().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "Monthly");

        let missing = store
            .rename_grocery_list(
                GroceryListId::new(),
                &GroceryListDraft::new("Nope").validate().unwrap(),
            )
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn add_item_keeps_insertion_order_and_bumps_list() {
        let store = store().await;
        let id = list(&store, "Weekly").await;
        let before = store.get_grocery_list(id).await.unwrap().unwrap();

        for name in ["apples", "bread", "cheese"] {
            let item = store
                .add_grocery_item(id, &GroceryItemDraft::new(name, 1.0, "pcs").validate().unwrap())
                .await
                .unwrap()
                .unwrap();
            assert!(!item.checked);
            assert_eq!(item.grocery_list_id, id);
        }

        let after = store.get_grocery_list(id).await.unwrap().unwrap();
        let names: Vec<_> = after.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["apples", "bread", "cheese"]);
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(after.items.iter().filter(|i| !i.checked).count(), 3);
    }

    #[tokio::test]
    async fn add_item_to_missing_list_returns_none() {
        let store = store().await;
        let result = store
            .add_grocery_item(
                GroceryListId::new(),
                &GroceryItemDraft::new("apples", 1.0, "kg").validate().unwrap(),
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn add_item_with_unknown_recipe_is_rejected() {
        let store = store().await;
        let id = list(&store, "Weekly").await;

        let item = GroceryItemDraft {
            recipe_id: Some(RecipeId::new()),
            ..GroceryItemDraft::new("apples", 1.0, "kg")
        }
        .validate()
        .unwrap();

        let err = store.add_grocery_item(id, &item).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::MissingReference {
                entity: "recipe",
                ..
            }
        ));
        assert_eq!(count(&store, "grocery_items").await, 0);
    }

    #[tokio::test]
    async fn update_item_checks_it_off() {
        let store = store().await;
        let id = list(&store, "Weekly").await;
        let item = store
            .add_grocery_item(id, &GroceryItemDraft::new("milk", 1.0, "l").validate().unwrap())
            .await
            .unwrap()
            .unwrap();

        let changes = GroceryItemPatch {
            checked: Some(true),
            ..Default::default()
        }
        .validate()
        .unwrap();
        let updated = store
            .update_grocery_item(id, item.id, changes)
            .await
            .unwrap()
            .unwrap();
        assert!(updated.checked);
        assert_eq!(updated.name, "milk");

        let stored = store.get_grocery_list(id).await.unwrap().unwrap();
        assert!(stored.items[0].checked);
        assert!(stored.items.iter().all(|i| i.checked));
    }

    #[tokio::test]
    async fn update_item_on_wrong_list_returns_none() {
        let store = store().await;
        let weekly = list(&store, "Weekly").await;
        let party = list(&store, "Party").await;
        let item = store
            .add_grocery_item(weekly, &GroceryItemDraft::new("milk", 1.0, "l").validate().unwrap())
            .await
            .unwrap()
            .unwrap();

        let changes = GroceryItemPatch {
            checked: Some(true),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert!(store
            .update_grocery_item(party, item.id, changes)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn remove_item() {
        let store = store().await;
        let id = list(&store, "Weekly").await;
        let item = store
            .add_grocery_item(id, &GroceryItemDraft::new("milk", 1.0, "l").validate().unwrap())
            .await
            .unwrap()
            .unwrap();

        assert!(store.remove_grocery_item(id, item.id).await.unwrap());
        assert!(!store.remove_grocery_item(id, item.id).await.unwrap());
        assert!(!store
            .remove_grocery_item(id, GroceryItemId::new())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn add_recipe_scales_ingredients() {
        let store = store().await;
        let bread = store.create_recipe(&recipe("Bread", &[])).await.unwrap();
        let id = list(&store, "Weekly").await;

        let updated = store
            .add_recipe_to_grocery_list(id, bread.id, Some(4))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.items.len(), 2);
        assert_eq!(updated.items[0].name, "flour");
        assert_eq!(updated.items[0].amount, 400.0);
        assert_eq!(updated.items[1].amount, 1.0);
        assert!(updated.items.iter().all(|i| i.recipe_id == Some(bread.id)));
    }

    #[tokio::test]
    async fn add_recipe_without_scaling_copies_amounts_exactly() {
        let store = store().await;
        let saffron = RecipeDraft {
            title: "Saffron rice".to_string(),
            servings: Some(2),
            ingredients: vec![
                IngredientDraft::new("saffron", 0.0004, "g"),
                IngredientDraft::new("rice", 1e308, "g"),
                IngredientDraft::new("salt", 0.1 + 0.2, "tsp"),
            ],
            instructions: vec!["Cook".to_string()],
            ..Default::default()
        }
        .validate()
        .unwrap();
        let saffron = store.create_recipe(&saffron).await.unwrap();
        let id = list(&store, "Pantry").await;

        for servings in [None, Some(2)] {
            store
                .add_recipe_to_grocery_list(id, saffron.id, servings)
                .await
                .unwrap()
                .unwrap();
        }

        let stored = store.get_grocery_list(id).await.unwrap().unwrap();
        let amounts: Vec<f64> = stored.items.iter().map(|i| i.amount).collect();
        let expected = [0.0004, 1e308, 0.1 + 0.2];
        assert_eq!(amounts, [expected, expected].concat());
    }

    #[tokio::test]
    async fn add_unknown_recipe_is_rejected() {
        let store = store().await;
        let id = list(&store, "Weekly").await;

        let err = store
            .add_recipe_to_grocery_list(id, RecipeId::new(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingReference { .. }));
    }

    #[tokio::test]
    async fn add_recipe_to_missing_list_returns_none() {
        let store = store().await;
        let bread = store.create_recipe(&recipe("Bread", &[])).await.unwrap();
        let result = store
            .add_recipe_to_grocery_list(GroceryListId::new(), bread.id, None)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn clear_checked_removes_only_checked_items() {
        let store = store().await;
        let id = list(&store, "Weekly").await;
        let mut ids = Vec::new();
        for name in ["apples", "bread", "cheese"] {
            let item = store
                .add_grocery_item(id, &GroceryItemDraft::new(name, 1.0, "pcs").validate().unwrap())
                .await
                .unwrap()
                .unwrap();
            ids.push(item.id);
        }
        for item_id in &ids[..2] {
            let changes = GroceryItemPatch {
                checked: Some(true),
                ..Default::default()
            }
            .validate()
            .unwrap();
            store.update_grocery_item(id, *item_id, changes).await.unwrap();
        }

        assert_eq!(store.clear_checked_items(id).await.unwrap(), Some(2));
        let remaining = store.get_grocery_list(id).await.unwrap().unwrap();
        assert_eq!(remaining.items.len(), 1);
        assert_eq!(remaining.items[0].name, "cheese");

        assert_eq!(
            store.clear_checked_items(GroceryListId::new()).await.unwrap(),
            None
        );
    }
}

mod meal_plans {
    use super::*;

    fn plan(recipe_id: RecipeId, day: u32, meal_type: MealType) -> MealPlanDraft {
        MealPlanDraft {
            date: date(2026, 10, day),
            recipe_id,
            meal_type,
        }
    }

    #[tokio::test]
    async fn create_and_get() {
        let store = store().await;
        let bread = store.create_recipe(&recipe("Bread", &[])).await.unwrap();

        let created = store
            .create_meal_plan(&plan(bread.id, 14, MealType::Breakfast))
            .await
            .unwrap();
        let fetched = store.get_meal_plan(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.date, date(2026, 10, 14));
    }

    #[tokio::test]
    async fn create_with_unknown_recipe_is_rejected() {
        let store = store().await;
        let err = store
            .create_meal_plan(&plan(RecipeId::new(), 14, MealType::Lunch))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingReference { .. }));
    }

    #[tokio::test]
    async fn list_orders_by_date_then_meal() {
        let store = store().await;
        let bread = store.create_recipe(&recipe("Bread", &[])).await.unwrap();

        store
            .create_meal_plan(&plan(bread.id, 15, MealType::Breakfast))
            .await
            .unwrap();
        store
            .create_meal_plan(&plan(bread.id, 14, MealType::Snack))
            .await
            .unwrap();
        store
            .create_meal_plan(&plan(bread.id, 14, MealType::Lunch))
            .await
            .unwrap();

        let plans = store
            .list_meal_plans(&MealPlanQuery::default())
            .await
            .unwrap();
        let slots: Vec<_> = plans.iter().map(|p| (p.date, p.meal_type)).collect();
        assert_eq!(
            slots,
            vec![
                (date(2026, 10, 14), MealType::Lunch),
                (date(2026, 10, 14), MealType::Snack),
                (date(2026, 10, 15), MealType::Breakfast),
            ]
        );
    }

    #[tokio::test]
    async fn list_filters_by_inclusive_range_and_meal_type() {
        let store = store().await;
        let bread = store.create_recipe(&recipe("Bread", &[])).await.unwrap();
        for day in 12..=16 {
            store
                .create_meal_plan(&plan(bread.id, day, MealType::Dinner))
                .await
                .unwrap();
        }
        store
            .create_meal_plan(&plan(bread.id, 14, MealType::Lunch))
            .await
            .unwrap();

        let query = MealPlanQuery {
            from: Some(date(2026, 10, 13)),
            to: Some(date(2026, 10, 15)),
            meal_type: None,
        };
        assert_eq!(store.list_meal_plans(&query).await.unwrap().len(), 4);

        let query = MealPlanQuery {
            meal_type: Some(MealType::Dinner),
            ..MealPlanQuery::on(date(2026, 10, 14))
        };
        let plans = store.list_meal_plans(&query).await.unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].meal_type, MealType::Dinner);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let store = store().await;
        let bread = store.create_recipe(&recipe("Bread", &[])).await.unwrap();
        let soup = store.create_recipe(&recipe("Soup", &[])).await.unwrap();
        let created = store
            .create_meal_plan(&plan(bread.id, 14, MealType::Lunch))
            .await
            .unwrap();

        let updated = store
            .update_meal_plan(created.id, &plan(soup.id, 15, MealType::Dinner))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.recipe_id, soup.id);
        assert_eq!(
            store.get_meal_plan(created.id).await.unwrap().unwrap(),
            updated
        );

        assert!(store
            .update_meal_plan(MealPlanId::new(), &plan(soup.id, 15, MealType::Dinner))
            .await
            .unwrap()
            .is_none());

        assert!(store.delete_meal_plan(created.id).await.unwrap());
        assert!(!store.delete_meal_plan(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn update_to_unknown_recipe_is_rejected() {
        let store = store().await;
        let bread = store.create_recipe(&recipe("Bread", &[])).await.unwrap();
        let created = store
            .create_meal_plan(&plan(bread.id, 14, MealType::Lunch))
            .await
            .unwrap();

        let err = store
            .update_meal_plan(created.id, &plan(RecipeId::new(), 14, MealType::Lunch))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingReference { .. }));
    }
}

mod inspection {
    use super::*;

    #[tokio::test]
    async fn report_lists_tables_with_counts_and_samples() {
        let store = store().await;
        for i in 0..7 {
            store
                .create_recipe(&recipe(&format!("Recipe {i}"), &[]))
                .await
                .unwrap();
        }

        let report = store.inspect().await.unwrap();

        let recipes = report.table("recipes").unwrap();
        assert_eq!(recipes.row_count, 7);
        assert_eq!(recipes.sample_rows.len(), store::SAMPLE_ROWS as usize);
        assert!(recipes.sample_rows[0]["title"].is_string());
        assert!(
            recipes
                .schema_sql
                .as_deref()
                .unwrap()
                .contains("CREATE TABLE")
        );

        let ingredients = report.table("ingredients").unwrap();
        assert_eq!(ingredients.row_count, 14);

        let meal_plans = report.table("meal_plans").unwrap();
        assert_eq!(meal_plans.row_count, 0);
        assert!(meal_plans.sample_rows.is_empty());
    }

    #[tokio::test]
    async fn report_handles_blob_columns() {
        let store = store().await;
        let report = store.inspect().await.unwrap();

        // The migrations table stores checksums as BLOBs.
        let migrations = report.table("_sqlx_migrations").unwrap();
        assert_eq!(migrations.row_count, 1);
        assert!(migrations.sample_rows[0]["checksum"].is_string());
    }
}

mod files {
    use super::*;

    #[tokio::test]
    async fn open_creates_directory_and_reopens_existing_data() {
        let dir = std::env::temp_dir().join(format!("recipe-book-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("recipes.db");

        let store = SqliteStore::open(&path).await.unwrap();
        let created = store.create_recipe(&recipe("Bread", &[])).await.unwrap();
        store.close().await;
        assert!(path.exists());

        let reopened = SqliteStore::open(&path).await.unwrap();
        assert!(reopened.get_recipe(created.id).await.unwrap().is_some());
        reopened.close().await;

        let read_only = SqliteStore::open_existing(&path).await.unwrap();
        let report = read_only.inspect().await.unwrap();
        assert_eq!(report.table("recipes").unwrap().row_count, 1);
        read_only.close().await;

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_wait_for_the_lock() {
        let dir = std::env::temp_dir().join(format!("recipe-book-{}", uuid::Uuid::new_v4()));
        let store = SqliteStore::open(dir.join("recipes.db")).await.unwrap();

        let bread = store.create_recipe(&recipe("Bread", &[])).await.unwrap();
        let list_id = store
            .create_grocery_list(&GroceryListDraft::new("Weekly").validate().unwrap())
            .await
            .unwrap()
            .id;
        let item_id = store
            .add_grocery_item(
                list_id,
                &GroceryItemDraft::new("eggs", 6.0, "pcs").validate().unwrap(),
            )
            .await
            .unwrap()
            .unwrap()
            .id;
        let plan = store
            .create_meal_plan(&MealPlanDraft {
                date: date(2024, 3, 1),
                recipe_id: bread.id,
                meal_type: MealType::Dinner,
            })
            .await
            .unwrap();

        let mut tasks = Vec::new();
        for i in 0..200u32 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                match i % 4 {
                    0 | 1 => {
                        let changes = GroceryItemPatch {
                            checked: Some(i % 8 == 0),
                            ..Default::default()
                        }
                        .validate()
                        .unwrap();
                        store
                            .update_grocery_item(list_id, item_id, changes)
                            .await
                            .map(|_| ())
                    }
                    2 => store
                        .update_meal_plan(
                            plan.id,
                            &MealPlanDraft {
                                date: date(2024, 3, 1 + i % 28),
                                recipe_id: bread.id,
                                meal_type: MealType::Lunch,
                            },
                        )
                        .await
                        .map(|_| ()),
                    _ => store
                        .create_meal_plan(&MealPlanDraft {
                            date: date(2024, 4, 1 + i % 28),
                            recipe_id: bread.id,
                            meal_type: MealType::Snack,
                        })
                        .await
                        .map(|_| ()),
                }
            }));
        }

        let mut failures = Vec::new();
        for task in tasks {
            if let Err(err) = task.await.unwrap() {
                failures.push(err.to_string());
            }
        }
        assert!(
            failures.is_empty(),
            "{} writes failed: {:?}",
            failures.len(),
            failures.first()
        );

        let weekly = store.get_grocery_list(list_id).await.unwrap().unwrap();
        assert_eq!(weekly.items.len(), 1);
        assert_eq!(weekly.items[0].id, item_id);
        assert_eq!(count(&store, "meal_plans").await, 51);

        store.close().await;
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
