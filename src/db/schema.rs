table! {
    users (id) {
        id -> Int8,
        username -> Varchar,
        email -> Varchar,
        password_digest -> Varchar,
    }
}

table! {
    events (id) {
        id -> Int8,
        title -> Varchar,
        description -> Nullable<Text>,
        date -> Timestamp,
        location -> Varchar,
        owner_id -> Int8,
    }
}

table! {
    guests (id) {
        id -> Int8,
        event_id -> Int8,
        name -> Varchar,
        email -> Varchar,
        invited_by_user_id -> Int8,
        responded -> Bool,
    }
}

table! {
    rsvps (id) {
        id -> Int8,
        event_id -> Int8,
        user_id -> Int8,
        status -> Varchar,
    }
}

joinable!(events -> users (owner_id));
joinable!(guests -> events (event_id));
joinable!(rsvps -> events (event_id));

allow_tables_to_appear_in_same_query!(users, events, guests, rsvps,);
