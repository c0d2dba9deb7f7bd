//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Unique login and profile name.
        username -> Varchar,
        /// PHC-formatted Argon2 hash.
        password_hash -> Text,
        date_joined -> Timestamptz,
    }
}

diesel::table! {
    /// Communities a post may be filed under.
    groups (id) {
        id -> Int8,
        title -> Varchar,
        /// Unique URL segment.
        slug -> Varchar,
        description -> Text,
    }
}

diesel::table! {
    posts (id) {
        id -> Int8,
        text -> Text,
        pub_date -> Timestamptz,
        author_id -> Uuid,
        /// Set to NULL when the group is deleted.
        group_id -> Nullable<Int8>,
        /// Path relative to the media root.
        image -> Nullable<Varchar>,
    }
}

diesel::table! {
    comments (id) {
        id -> Int8,
        post_id -> Int8,
        author_id -> Uuid,
        text -> Text,
        created -> Timestamptz,
    }
}

diesel::table! {
    /// Follow edges; `(user_id, author_id)` is unique.
    follows (id) {
        id -> Int8,
        user_id -> Uuid,
        author_id -> Uuid,
    }
}

diesel::joinable!(posts -> users (author_id));
diesel::joinable!(posts -> groups (group_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(comments -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, groups, posts, comments, follows);
