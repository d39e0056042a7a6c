//! Contains the RSVP specific database structs and queries
use super::Result;
use crate::db::schema::rsvps;
use crate::db::DbInterface;
use crate::diesel::ExpressionMethods;
use crate::diesel::QueryDsl;
use diesel::result::Error;
use diesel::{Identifiable, Queryable};
use diesel::{QueryResult, RunQueryDsl};

/// Diesel RSVP struct
///
/// Is used as a result in various queries. Represents an RSVP row
#[derive(Debug, Clone, Queryable, Identifiable)]
pub struct Rsvp {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub status: String,
}

/// Diesel insertable RSVP struct
///
/// Represents fields that have to be provided on RSVP insertion.
#[derive(Debug, Insertable)]
#[table_name = "rsvps"]
pub struct NewRsvp {
    pub event_id: i64,
    pub user_id: i64,
    pub status: String,
}

impl DbInterface {
    pub fn get_rsvp_by_event_and_user(&self, event_id: i64, user_id: i64) -> Result<Option<Rsvp>> {
        let con = self.get_con()?;

        let result: QueryResult<Rsvp> = rsvps::table
            .filter(rsvps::columns::event_id.eq(event_id))
            .filter(rsvps::columns::user_id.eq(user_id))
            .first(&con);

        match result {
            Ok(rsvp) => Ok(Some(rsvp)),
            Err(Error::NotFound) => Ok(None),
            Err(e) => {
                log::error!("Query error getting RSVP by event and user, {}", e);
                Err(e.into())
            }
        }
    }

    /// Creates or updates the RSVP for (event, user), keeping a single row
    /// holding the latest status.
    ///
    /// There is no uniqueness constraint on (event_id, user_id); two
    /// concurrent submissions can race at the lookup and both insert.
    pub fn upsert_rsvp(&self, event_id: i64, user_id: i64, status: String) -> Result<Rsvp> {
        let con = self.get_con()?;

        let existing: QueryResult<Rsvp> = rsvps::table
            .filter(rsvps::columns::event_id.eq(event_id))
            .filter(rsvps::columns::user_id.eq(user_id))
            .first(&con);

        let rsvp_result = match existing {
            Ok(rsvp) => diesel::update(rsvps::table.filter(rsvps::columns::id.eq(rsvp.id)))
                .set(rsvps::columns::status.eq(status))
                .get_result(&con),
            Err(Error::NotFound) => diesel::insert_into(rsvps::table)
                .values(NewRsvp {
                    event_id,
                    user_id,
                    status,
                })
                .get_result(&con),
            Err(e) => Err(e),
        };

        match rsvp_result {
            Ok(rsvp) => Ok(rsvp),
            Err(e) => {
                log::error!("Query error upserting RSVP, {}", e);
                Err(e.into())
            }
        }
    }
}
