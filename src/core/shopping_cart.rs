//! Shopping cart business logic - Cart membership and the consolidated shopping list.
//!
//! The shopping list sums the amounts of every ingredient used by the recipes in
//! a user's cart, grouped by ingredient name and measurement unit.

use crate::{
    core::{permissions::Requester, recipe::get_recipe},
    entities::{
        RecipeIngredient, ShoppingCart, ingredient, recipe, recipe_ingredient, shopping_cart,
    },
    errors::{Error, Result, map_unique_violation},
};
use sea_orm::{
    FromQueryResult, JoinType, QueryOrder, QuerySelect, Set,
    prelude::*,
    sea_query::{Expr, Query},
};
use tracing::{debug, info, instrument};

/// First line of every exported shopping list.
pub const SHOPPING_LIST_HEADER: &str = "Shopping list:";
/// Attachment name of the exported shopping list.
pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";
/// Content type of the exported shopping list.
pub const SHOPPING_LIST_CONTENT_TYPE: &str = "text/plain";

const ALREADY_IN_CART: &str = "recipe is already in shopping cart";
const NOT_IN_CART: &str = "recipe is not in shopping cart";

/// One consolidated line of the shopping list.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct ShoppingListLine {
    /// Ingredient name
    pub name: String,
    /// Unit the amounts are expressed in
    pub measurement_unit: String,
    /// Sum over every recipe in the cart
    pub total_amount: i64,
}

/// Downloadable shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListFile {
    /// Attachment name
    pub filename: &'static str,
    /// MIME type of `body`
    pub content_type: &'static str,
    /// Rendered document
    pub body: String,
}

/// Adds a recipe to the requester's shopping cart and returns the recipe.
#[instrument(skip(db))]
pub async fn add_to_cart(
    db: &DatabaseConnection,
    requester: &Requester,
    recipe_id: i64,
) -> Result<recipe::Model> {
    let user_id = requester.require_user()?;
    let recipe = get_recipe(db, recipe_id).await?;

    if ShoppingCart::find_by_id((user_id, recipe_id))
        .one(db)
        .await?
        .is_some()
    {
        return Err(Error::conflict("recipe", ALREADY_IN_CART));
    }

    ShoppingCart::insert(shopping_cart::ActiveModel {
        user_id: Set(user_id),
        recipe_id: Set(recipe_id),
    })
    .exec_without_returning(db)
    .await
    .map_err(|e| map_unique_violation(e, "recipe", ALREADY_IN_CART))?;

    info!(user_id, recipe_id, "Recipe added to shopping cart");
    Ok(recipe)
}

/// Removes a recipe from the requester's shopping cart.
#[instrument(skip(db))]
pub async fn remove_from_cart(
    db: &DatabaseConnection,
    requester: &Requester,
    recipe_id: i64,
) -> Result<()> {
    let user_id = requester.require_user()?;
    get_recipe(db, recipe_id).await?;

    let result = ShoppingCart::delete_by_id((user_id, recipe_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::NotRelated {
            field: "recipe",
            message: NOT_IN_CART.to_string(),
        });
    }

    info!(user_id, recipe_id, "Recipe removed from shopping cart");
    Ok(())
}

/// Whether the recipe is in the requester's cart; always false when anonymous.
pub async fn is_in_shopping_cart(
    db: &DatabaseConnection,
    requester: &Requester,
    recipe_id: i64,
) -> Result<bool> {
    let Some(user_id) = requester.user_id() else {
        return Ok(false);
    };
    Ok(ShoppingCart::find_by_id((user_id, recipe_id))
        .one(db)
        .await?
        .is_some())
}

/// Sums ingredient amounts over every recipe in the user's cart.
///
/// Groups by (name, unit) and orders alphabetically by name ignoring case, then
/// by unit. An empty cart yields an empty list.
#[instrument(skip(db))]
pub async fn aggregate_shopping_list(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<ShoppingListLine>> {
    let cart_recipes = Query::select()
        .column(shopping_cart::Column::RecipeId)
        .from(ShoppingCart)
        .and_where(Expr::col(shopping_cart::Column::UserId).eq(user_id))
        .to_owned();

    let lines = RecipeIngredient::find()
        .select_only()
        .column_as(ingredient::Column::Name, "name")
        .column_as(ingredient::Column::MeasurementUnit, "measurement_unit")
        .column_as(
            Expr::col((RecipeIngredient, recipe_ingredient::Column::Amount)).sum(),
            "total_amount",
        )
        .join(
            JoinType::InnerJoin,
            recipe_ingredient::Relation::Ingredient.def(),
        )
        .filter(recipe_ingredient::Column::RecipeId.in_subquery(cart_recipes))
        .group_by(ingredient::Column::SearchName)
        .group_by(ingredient::Column::Name)
        .group_by(ingredient::Column::MeasurementUnit)
        .order_by_asc(ingredient::Column::SearchName)
        .order_by_asc(ingredient::Column::Name)
        .order_by_asc(ingredient::Column::MeasurementUnit)
        .into_model::<ShoppingListLine>()
        .all(db)
        .await?;

    debug!(user_id, lines = lines.len(), "Shopping list aggregated");
    Ok(lines)
}

/// Renders the plain-text document: the header, then one line per ingredient.
#[must_use]
pub fn render_shopping_list(lines: &[ShoppingListLine]) -> String {
    std::iter::once(SHOPPING_LIST_HEADER.to_string())
        .chain(lines.iter().map(|line| {
            format!(
                "{} ({}) - {}",
                line.name, line.measurement_unit, line.total_amount
            )
        }))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the downloadable shopping list for the requester.
pub async fn export_shopping_list(
    db: &DatabaseConnection,
    requester: &Requester,
) -> Result<ShoppingListFile> {
    let user_id = requester.require_user()?;
    let lines = aggregate_shopping_list(db, user_id).await?;
    Ok(ShoppingListFile {
        filename: SHOPPING_LIST_FILENAME,
        content_type: SHOPPING_LIST_CONTENT_TYPE,
        body: render_shopping_list(&lines),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::recipe::{IngredientAmount, create_recipe, delete_recipe},
        test_utils::*,
    };
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_shopping_list_sums_across_recipes() -> Result<()> {
        let db = setup_test_db().await?;
        let cook = create_test_user(&db, "cook").await?;
        let flour = create_test_ingredient(&db, "flour", "g").await?;
        let sugar = create_test_ingredient(&db, "sugar", "g").await?;
        let requester = Requester::user(cook.id);

        let bread = create_recipe(
            &db,
            &requester,
            recipe_input(
                "Bread",
                vec![],
                vec![IngredientAmount {
                    ingredient_id: flour.id,
                    amount: 200,
                }],
            ),
        )
        .await?;
        let cake = create_recipe(
            &db,
            &requester,
            recipe_input(
                "Cake",
                vec![],
                vec![
                    IngredientAmount {
                        ingredient_id: flour.id,
                        amount: 300,
                    },
                    IngredientAmount {
                        ingredient_id: sugar.id,
                        amount: 50,
                    },
                ],
            ),
        )
        .await?;

        add_to_cart(&db, &requester, bread.id).await?;
        add_to_cart(&db, &requester, cake.id).await?;

        let lines = aggregate_shopping_list(&db, cook.id).await?;
        assert_eq!(
            lines,
            vec![
                ShoppingListLine {
                    name: "flour".to_string(),
                    measurement_unit: "g".to_string(),
                    total_amount: 500,
                },
                ShoppingListLine {
                    name: "sugar".to_string(),
                    measurement_unit: "g".to_string(),
                    total_amount: 50,
                },
            ]
        );

        let file = export_shopping_list(&db, &requester).await?;
        assert_eq!(file.filename, "shopping_list.txt");
        assert_eq!(file.content_type, "text/plain");
        assert_eq!(file.body, "Shopping list:\nflour (g) - 500\nsugar (g) - 50");

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_cart_renders_only_header() -> Result<()> {
        let db = setup_test_db().await?;
        let cook = create_test_user(&db, "cook").await?;
        let author = create_test_user(&db, "author").await?;
        // Someone else's cart must not leak in
        let recipe = create_test_recipe(&db, author.id, "Stew").await?;
        add_to_cart(&db, &Requester::user(author.id), recipe.id).await?;

        let file = export_shopping_list(&db, &Requester::user(cook.id)).await?;
        assert_eq!(file.body, SHOPPING_LIST_HEADER);
        Ok(())
    }

    #[tokio::test]
    async fn test_same_name_different_unit_stays_separate() -> Result<()> {
        let db = setup_test_db().await?;
        let cook = create_test_user(&db, "cook").await?;
        let milk_ml = create_test_ingredient(&db, "milk", "ml").await?;
        let milk_cup = create_test_ingredient(&db, "milk", "cup").await?;
        let requester = Requester::user(cook.id);

        let latte = create_recipe(
            &db,
            &requester,
            recipe_input(
                "Latte",
                vec![],
                vec![
                    IngredientAmount {
                        ingredient_id: milk_ml.id,
                        amount: 150,
                    },
                    IngredientAmount {
                        ingredient_id: milk_cup.id,
                        amount: 1,
                    },
                ],
            ),
        )
        .await?;
        add_to_cart(&db, &requester, latte.id).await?;

        let rendered = render_shopping_list(&aggregate_shopping_list(&db, cook.id).await?);
        assert_eq!(rendered, "Shopping list:\nmilk (cup) - 1\nmilk (ml) - 150");
        Ok(())
    }

    #[tokio::test]
    async fn test_shopping_list_order_ignores_case() -> Result<()> {
        let db = setup_test_db().await?;
        let cook = create_test_user(&db, "cook").await?;
        let apples = create_test_ingredient(&db, "apples", "g").await?;
        let bananas = create_test_ingredient(&db, "Bananas", "g").await?;
        let cherries = create_test_ingredient(&db, "Вишня", "g").await?;
        let apricots = create_test_ingredient(&db, "абрикос", "g").await?;
        let requester = Requester::user(cook.id);

        let salad = create_recipe(
            &db,
            &requester,
            recipe_input(
                "Fruit salad",
                vec![],
                vec![
                    IngredientAmount {
                        ingredient_id: cherries.id,
                        amount: 4,
                    },
                    IngredientAmount {
                        ingredient_id: bananas.id,
                        amount: 2,
                    },
                    IngredientAmount {
                        ingredient_id: apricots.id,
                        amount: 3,
                    },
                    IngredientAmount {
                        ingredient_id: apples.id,
                        amount: 1,
                    },
                ],
            ),
        )
        .await?;
        add_to_cart(&db, &requester, salad.id).await?;

        let file = export_shopping_list(&db, &requester).await?;
        assert_eq!(
            file.body,
            "Shopping list:\napples (g) - 1\nBananas (g) - 2\nабрикос (g) - 3\nВишня (g) - 4"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_cart_toggle_semantics() -> Result<()> {
        let db = setup_test_db().await?;
        let cook = create_test_user(&db, "cook").await?;
        let recipe = create_test_recipe(&db, cook.id, "Stew").await?;
        let requester = Requester::user(cook.id);

        assert!(!is_in_shopping_cart(&db, &requester, recipe.id).await?);
        add_to_cart(&db, &requester, recipe.id).await?;
        assert!(is_in_shopping_cart(&db, &requester, recipe.id).await?);

        let result = add_to_cart(&db, &requester, recipe.id).await;
        assert!(matches!(
            result,
            Err(Error::Conflict { field: "recipe", .. })
        ));
        assert_eq!(ShoppingCart::find().count(&db).await?, 1);

        remove_from_cart(&db, &requester, recipe.id).await?;
        let result = remove_from_cart(&db, &requester, recipe.id).await;
        assert!(matches!(result, Err(Error::NotRelated { .. })));

        let result = export_shopping_list(&db, &Requester::Anonymous).await;
        assert!(matches!(result, Err(Error::Permission { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_recipe_empties_cart() -> Result<()> {
        let db = setup_test_db().await?;
        let cook = create_test_user(&db, "cook").await?;
        let recipe = create_test_recipe(&db, cook.id, "Stew").await?;
        let requester = Requester::user(cook.id);

        add_to_cart(&db, &requester, recipe.id).await?;
        delete_recipe(&db, &requester, recipe.id).await?;

        assert_eq!(ShoppingCart::find().count(&db).await?, 0);
        assert!(aggregate_shopping_list(&db, cook.id).await?.is_empty());
        Ok(())
    }
}
