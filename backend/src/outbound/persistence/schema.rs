//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; regenerate with
//! `diesel print-schema` after changing them.

diesel::table! {
    /// Registered accounts, unique by email.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        password_hash -> Text,
        email_verified_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Planned trips; `creator_id` is the implicitly privileged owner.
    trips (id) {
        id -> Uuid,
        creator_id -> Uuid,
        name -> Varchar,
        description -> Text,
        start_date -> Date,
        end_date -> Date,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Membership rows; the creator has none.
    trip_members (id) {
        id -> Uuid,
        trip_id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Invitations; `receiver_id` stays NULL until the email matches a user.
    trip_invites (id) {
        id -> Uuid,
        trip_id -> Uuid,
        sender_id -> Uuid,
        receiver_id -> Nullable<Uuid>,
        receiver_email -> Varchar,
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Single-use email verification tokens.
    verification_tokens (token) {
        token -> Varchar,
        identifier -> Varchar,
        expires_at -> Timestamptz,
    }
}

diesel::joinable!(trip_members -> trips (trip_id));
diesel::joinable!(trip_invites -> trips (trip_id));

diesel::allow_tables_to_appear_in_same_query!(
    trip_invites,
    trip_members,
    trips,
    users,
    verification_tokens,
);
