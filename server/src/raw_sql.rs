//! Raw SQL fragments that can't be expressed in Diesel's type-safe DSL.
//!
//! # Safety
//!
//! All SQL in this module has been reviewed for SQL injection safety:
//! - User input is ALWAYS passed via `.bind()` parameters
//! - No string concatenation or interpolation with user data
//!
//! When adding new SQL here:
//! 1. Document why Diesel DSL can't be used
//! 2. Ensure all user input uses `.bind()`

use diesel::dsl::sql;
use diesel::expression::SqlLiteral;
use diesel::sql_types::Integer;

/// Sort key ranking `community_recipes.difficulty`:
/// Beginner 0, Intermediate 1, Hard 2, anything else 3.
///
/// Must agree with `potluck_core::Difficulty::rank`.
///
/// # Safety
/// Static SQL string with no user input.
///
/// # Why raw SQL?
/// Diesel has no CASE expression builder for ORDER BY.
pub fn difficulty_rank() -> SqlLiteral<Integer> {
    sql::<Integer>(
        "CASE community_recipes.difficulty \
         WHEN 'Beginner' THEN 0 \
         WHEN 'Intermediate' THEN 1 \
         WHEN 'Hard' THEN 2 \
         ELSE 3 END",
    )
}

/// Case-insensitive match on either username or email, for login.
///
/// # Safety
/// The login value is passed via `.bind()`, not interpolated.
///
/// # Why raw SQL?
/// The unique indexes are on `LOWER(...)`; matching them needs the same
/// expression, and Diesel has no `lower()` on arbitrary expressions.
#[macro_export]
macro_rules! username_or_email_is {
    ($login:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>("(LOWER(users.username) = LOWER(")
            .bind::<diesel::sql_types::Text, _>($login)
            .sql(") OR LOWER(users.email) = LOWER(")
            .bind::<diesel::sql_types::Text, _>($login)
            .sql("))")
    };
}

/// Remove a shop id from every shopping list item of one user.
///
/// Bind `$1` = shop id, `$2` = user id.
///
/// # Safety
/// Both values MUST be passed via `.bind()`.
///
/// # Why raw SQL?
/// `array_remove` and `= ANY(...)` on a uuid[] column aren't in Diesel's DSL.
pub const REMOVE_SHOP_FROM_LIST_ITEMS: &str = "UPDATE shopping_list_items \
    SET shop_ids = array_remove(shop_ids, $1), updated_at = NOW() \
    WHERE user_id = $2 AND $1 = ANY(shop_ids)";

/// Remove a shop id from every favorite item of one user.
///
/// Bind `$1` = shop id, `$2` = user id.
///
/// # Safety
/// Both values MUST be passed via `.bind()`.
pub const REMOVE_SHOP_FROM_FAVORITES: &str = "UPDATE favorite_items \
    SET shop_ids = array_remove(shop_ids, $1) \
    WHERE user_id = $2 AND $1 = ANY(shop_ids)";

#[cfg(test)]
mod tests {
    use super::*;
    use potluck_core::Difficulty;

    #[test]
    fn test_rank_case_matches_core_order() {
        let sql = diesel::debug_query::<diesel::pg::Pg, _>(&difficulty_rank()).to_string();
        for difficulty in Difficulty::KNOWN {
            let arm = format!("WHEN '{}' THEN {}", difficulty.as_str(), difficulty.rank());
            assert!(sql.contains(&arm), "{} missing from {}", arm, sql);
        }
        assert!(sql.contains(&format!("ELSE {}", Difficulty::Unknown.rank())));
    }
}
