//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. Credentials are managed outside this service.
    users (id) {
        id -> Int8,
        email -> Varchar,
        username -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
    }
}

diesel::table! {
    /// Recipe tags; `name`, `color` and `slug` are each unique.
    tags (id) {
        id -> Int8,
        name -> Varchar,
        color -> Varchar,
        slug -> Varchar,
    }
}

diesel::table! {
    ingredients (id) {
        id -> Int8,
        name -> Varchar,
        measurement_unit -> Varchar,
    }
}

diesel::table! {
    recipes (id) {
        id -> Int8,
        author_id -> Int8,
        name -> Varchar,
        image -> Text,
        text -> Text,
        /// Minutes; `CHECK (cooking_time >= 1)`.
        cooking_time -> Int4,
        pub_date -> Timestamptz,
    }
}

diesel::table! {
    recipe_tags (id) {
        id -> Int8,
        recipe_id -> Int8,
        tag_id -> Int8,
    }
}

diesel::table! {
    recipe_ingredients (id) {
        id -> Int8,
        recipe_id -> Int8,
        ingredient_id -> Int8,
        /// `CHECK (amount >= 1)`.
        amount -> Int4,
    }
}

diesel::table! {
    /// Unique `(user_id, recipe_id)` pairs.
    favorites (id) {
        id -> Int8,
        user_id -> Int8,
        recipe_id -> Int8,
    }
}

diesel::table! {
    /// Unique `(user_id, recipe_id)` pairs.
    shopping_carts (id) {
        id -> Int8,
        user_id -> Int8,
        recipe_id -> Int8,
    }
}

diesel::table! {
    /// Unique `(user_id, author_id)` pairs with `user_id <> author_id`.
    subscriptions (id) {
        id -> Int8,
        user_id -> Int8,
        author_id -> Int8,
    }
}

diesel::joinable!(recipes -> users (author_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));
diesel::joinable!(favorites -> recipes (recipe_id));
diesel::joinable!(shopping_carts -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    tags,
    ingredients,
    recipes,
    recipe_tags,
    recipe_ingredients,
    favorites,
    shopping_carts,
    subscriptions,
);
