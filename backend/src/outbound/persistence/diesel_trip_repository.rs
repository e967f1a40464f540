//! PostgreSQL-backed `TripRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TripPersistenceError, TripRepository};
use crate::domain::{MemberId, Trip, TripId, TripMember, UserId};

use super::models::{NewTripMemberRow, NewTripRow, TripMemberRow, TripRow};
use super::pool::{DbPool, PoolError};
use super::schema::{trip_members, trips};

/// Diesel-backed implementation of the `TripRepository` port.
#[derive(Clone)]
pub struct DieselTripRepository {
    pool: DbPool,
}

impl DieselTripRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TripPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            TripPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> TripPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            TripPersistenceError::connection(info.message().to_owned())
        }
        other => TripPersistenceError::query(other.to_string()),
    }
}

fn row_to_trip(row: TripRow) -> Trip {
    Trip {
        id: TripId::from_uuid(row.id),
        creator_id: UserId::from_uuid(row.creator_id),
        name: row.name,
        description: row.description,
        start_date: row.start_date,
        end_date: row.end_date,
        created_at: row.created_at,
    }
}

fn row_to_member(row: TripMemberRow) -> TripMember {
    TripMember {
        id: MemberId::from_uuid(row.id),
        trip_id: TripId::from_uuid(row.trip_id),
        user_id: UserId::from_uuid(row.user_id),
        created_at: row.created_at,
    }
}

#[async_trait]
impl TripRepository for DieselTripRepository {
    async fn create(&self, trip: &Trip) -> Result<(), TripPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewTripRow {
            id: *trip.id.as_uuid(),
            creator_id: *trip.creator_id.as_uuid(),
            name: &trip.name,
            description: &trip.description,
            start_date: trip.start_date,
            end_date: trip.end_date,
            created_at: trip.created_at,
        };
        diesel::insert_into(trips::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, TripPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TripRow> = trips::table
            .filter(trips::id.eq(id.as_uuid()))
            .select(TripRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_trip))
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Trip>, TripPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let member_trip_ids = trip_members::table
            .filter(trip_members::user_id.eq(user.as_uuid()))
            .select(trip_members::trip_id);
        let rows: Vec<TripRow> = trips::table
            .filter(
                trips::creator_id
                    .eq(user.as_uuid())
                    .or(trips::id.eq_any(member_trip_ids)),
            )
            .order(trips::created_at.desc())
            .select(TripRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_trip).collect())
    }

    async fn add_member(&self, member: &TripMember) -> Result<(), TripPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewTripMemberRow {
            id: *member.id.as_uuid(),
            trip_id: *member.trip_id.as_uuid(),
            user_id: *member.user_id.as_uuid(),
            created_at: member.created_at,
        };
        diesel::insert_into(trip_members::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_member(
        &self,
        trip: &TripId,
        member: &MemberId,
    ) -> Result<Option<TripMember>, TripPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TripMemberRow> = trip_members::table
            .filter(trip_members::trip_id.eq(trip.as_uuid()))
            .filter(trip_members::id.eq(member.as_uuid()))
            .select(TripMemberRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_member))
    }

    async fn find_member_by_user(
        &self,
        trip: &TripId,
        user: &UserId,
    ) -> Result<Option<TripMember>, TripPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TripMemberRow> = trip_members::table
            .filter(trip_members::trip_id.eq(trip.as_uuid()))
            .filter(trip_members::user_id.eq(user.as_uuid()))
            .select(TripMemberRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_member))
    }

    async fn list_members(&self, trip: &TripId) -> Result<Vec<TripMember>, TripPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TripMemberRow> = trip_members::table
            .filter(trip_members::trip_id.eq(trip.as_uuid()))
            .select(TripMemberRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_member).collect())
    }

    async fn remove_member(&self, member: &MemberId) -> Result<bool, TripPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Zero deleted rows is the idempotent no-op the workflow expects for
        // racing removals.
        let deleted =
            diesel::delete(trip_members::table.filter(trip_members::id.eq(member.as_uuid())))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
