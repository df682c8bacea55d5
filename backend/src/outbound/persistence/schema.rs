//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// Fan accounts. `points` mirrors the sum of `point_history` deltas.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        address -> Nullable<Text>,
        national_id -> Nullable<Varchar>,
        interests -> Nullable<Text>,
        activities -> Nullable<Text>,
        events -> Nullable<Text>,
        purchases -> Nullable<Text>,
        twitter_id -> Nullable<Text>,
        instagram_id -> Nullable<Text>,
        facebook_id -> Nullable<Text>,
        twitch_id -> Nullable<Text>,
        discord_id -> Nullable<Text>,
        lol_profile -> Nullable<Text>,
        rainbow_six_profile -> Nullable<Text>,
        steam_profile -> Nullable<Text>,
        valorant_profile -> Nullable<Text>,
        gamersclub_profile -> Nullable<Text>,
        cs2_profile -> Nullable<Text>,
        has_accepted_terms -> Bool,
        points -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only ledger; `(user_id, action)` is unique where `kind = 'award'`.
    point_history (id) {
        id -> Uuid,
        seq -> Int8,
        user_id -> Uuid,
        points -> Int8,
        action -> Varchar,
        kind -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Identity document metadata; `(user_id, kind)` is unique.
    documents (id) {
        id -> Uuid,
        user_id -> Uuid,
        kind -> Varchar,
        file_name -> Text,
        size_bytes -> Int8,
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(point_history -> users (user_id));
diesel::joinable!(documents -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, point_history, documents);
