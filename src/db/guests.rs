//! Contains the guest specific database structs and queries
use super::Result;
use crate::db::schema::guests;
use crate::db::DbInterface;
use crate::diesel::ExpressionMethods;
use crate::diesel::QueryDsl;
use diesel::result::Error;
use diesel::{Identifiable, Queryable};
use diesel::{QueryResult, RunQueryDsl};

/// Diesel guest struct
///
/// Is used as a result in various queries. Represents a guest row
#[derive(Debug, Clone, Queryable, Identifiable)]
pub struct Guest {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub email: String,
    pub invited_by_user_id: i64,
    pub responded: bool,
}

/// Diesel insertable guest struct
///
/// Represents fields that have to be provided on guest insertion.
#[derive(Debug, Insertable)]
#[table_name = "guests"]
pub struct NewGuest {
    pub event_id: i64,
    pub name: String,
    pub email: String,
    pub invited_by_user_id: i64,
    pub responded: bool,
}

impl DbInterface {
    pub fn create_guest(&self, new_guest: NewGuest) -> Result<Guest> {
        let con = self.get_con()?;

        let guest_result = diesel::insert_into(guests::table)
            .values(new_guest)
            .get_result(&con);

        match guest_result {
            Ok(guest) => Ok(guest),
            Err(e) => {
                log::error!("Query error creating new guest, {}", e);
                Err(e.into())
            }
        }
    }

    pub fn get_guests_for_event(&self, event_id: i64) -> Result<Vec<Guest>> {
        let con = self.get_con()?;

        let guests_result: QueryResult<Vec<Guest>> = guests::table
            .filter(guests::columns::event_id.eq(event_id))
            .order(guests::columns::id)
            .get_results(&con);

        match guests_result {
            Ok(guests) => Ok(guests),
            Err(e) => {
                log::error!("Query error getting guests for event, {}", e);
                Err(e.into())
            }
        }
    }

    /// Returns the guest with the given email for the event, if any.
    ///
    /// Is used both for the idempotent batch invite and for the RSVP
    /// permission check.
    pub fn get_guest_by_event_and_email(
        &self,
        event_id: i64,
        email: &str,
    ) -> Result<Option<Guest>> {
        let con = self.get_con()?;

        let result: QueryResult<Guest> = guests::table
            .filter(guests::columns::event_id.eq(event_id))
            .filter(guests::columns::email.eq(email))
            .first(&con);

        match result {
            Ok(guest) => Ok(Some(guest)),
            Err(Error::NotFound) => Ok(None),
            Err(e) => {
                log::error!("Query error getting guest by event and email, {}", e);
                Err(e.into())
            }
        }
    }
}
