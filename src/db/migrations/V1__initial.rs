use barrel::backend::Pg;
use barrel::{types, Migration};

pub fn migration() -> String {
    let mut m = Migration::new();

    m.create_table("users", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));
        table.add_column("username", types::varchar(64).unique(true).nullable(false));
        table.add_column("email", types::varchar(320).unique(true).nullable(false));
        table.add_column("password_digest", types::varchar(128).nullable(false));
    });

    m.create_table("events", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));
        table.add_column("title", types::varchar(128).nullable(false));
        table.add_column("description", types::text().nullable(true));
        table.add_column("date", types::custom("TIMESTAMP").nullable(false));
        table.add_column("location", types::varchar(256).nullable(false));
        table.add_column("owner_id", types::custom("BIGINT REFERENCES users(id)"));
    });

    m.create_table("guests", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));
        table.add_column(
            "event_id",
            types::custom("BIGINT REFERENCES events(id) ON DELETE CASCADE"),
        );
        table.add_column("name", types::varchar(128).nullable(false));
        table.add_column("email", types::varchar(320).nullable(false));
        table.add_column(
            "invited_by_user_id",
            types::custom("BIGINT REFERENCES users(id)"),
        );
        table.add_column("responded", types::boolean().nullable(false));
    });

    // no uniqueness constraint on (event_id, user_id), duplicate prevention
    // happens at the application level
    m.create_table("rsvps", |table| {
        table.add_column("id", types::custom("BIGSERIAL").primary(true));
        table.add_column(
            "event_id",
            types::custom("BIGINT REFERENCES events(id) ON DELETE CASCADE"),
        );
        table.add_column("user_id", types::custom("BIGINT REFERENCES users(id)"));
        table.add_column("status", types::varchar(16).nullable(false));
    });

    m.make::<Pg>()
}
