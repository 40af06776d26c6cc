//! Diesel table definitions. Keep in step with `backend/migrations`.

diesel::table! {
    /// Registered identities. `email` carries a unique constraint.
    users (id) {
        id -> Int8,
        email -> Varchar,
        hashed_password -> Varchar,
        is_active -> Bool,
        is_admin -> Bool,
    }
}

diesel::table! {
    /// Todo items; `owner_id` references `users.id`.
    todos (id) {
        id -> Int8,
        title -> Varchar,
        description -> Nullable<Text>,
        is_done -> Bool,
        owner_id -> Int8,
    }
}

diesel::joinable!(todos -> users (owner_id));
diesel::allow_tables_to_appear_in_same_query!(todos, users);
