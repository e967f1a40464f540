//! PostgreSQL-backed `InviteRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{InvitePersistenceError, InviteRepository};
use crate::domain::{EmailAddress, InviteId, InviteStatus, TripId, TripInvite, UserId};

use super::models::{NewTripInviteRow, TripInviteRow};
use super::pool::{DbPool, PoolError};
use super::schema::trip_invites;

/// Diesel-backed implementation of the `InviteRepository` port.
#[derive(Clone)]
pub struct DieselInviteRepository {
    pool: DbPool,
}

impl DieselInviteRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> InvitePersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            InvitePersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> InvitePersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            InvitePersistenceError::connection(info.message().to_owned())
        }
        other => InvitePersistenceError::query(other.to_string()),
    }
}

fn row_to_invite(row: TripInviteRow) -> Result<TripInvite, InvitePersistenceError> {
    let status = InviteStatus::parse(&row.status).ok_or_else(|| {
        InvitePersistenceError::query(format!("unrecognised invite status: {}", row.status))
    })?;
    let receiver_email = EmailAddress::new(row.receiver_email)
        .map_err(|err| InvitePersistenceError::query(format!("corrupt receiver email: {err}")))?;
    Ok(TripInvite {
        id: InviteId::from_uuid(row.id),
        trip_id: TripId::from_uuid(row.trip_id),
        sender_id: UserId::from_uuid(row.sender_id),
        receiver_id: row.receiver_id.map(UserId::from_uuid),
        receiver_email,
        status,
        created_at: row.created_at,
    })
}

#[async_trait]
impl InviteRepository for DieselInviteRepository {
    async fn create(&self, invite: &TripInvite) -> Result<(), InvitePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewTripInviteRow {
            id: *invite.id.as_uuid(),
            trip_id: *invite.trip_id.as_uuid(),
            sender_id: *invite.sender_id.as_uuid(),
            receiver_id: invite.receiver_id.map(|id| *id.as_uuid()),
            receiver_email: invite.receiver_email.as_ref(),
            status: invite.status.as_str(),
            created_at: invite.created_at,
        };
        diesel::insert_into(trip_invites::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &InviteId,
    ) -> Result<Option<TripInvite>, InvitePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TripInviteRow> = trip_invites::table
            .filter(trip_invites::id.eq(id.as_uuid()))
            .select(TripInviteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_invite).transpose()
    }

    async fn list_pending_for_receiver(
        &self,
        user: &UserId,
        email: &EmailAddress,
    ) -> Result<Vec<TripInvite>, InvitePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TripInviteRow> = trip_invites::table
            .filter(trip_invites::status.eq(InviteStatus::Pending.as_str()))
            .filter(
                trip_invites::receiver_id
                    .eq(user.as_uuid())
                    .or(trip_invites::receiver_email.eq(email.as_ref())),
            )
            .order(trip_invites::created_at.desc())
            .select(TripInviteRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_invite).collect()
    }

    async fn list_pending_for_trip(
        &self,
        trip: &TripId,
    ) -> Result<Vec<TripInvite>, InvitePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TripInviteRow> = trip_invites::table
            .filter(trip_invites::trip_id.eq(trip.as_uuid()))
            .filter(trip_invites::status.eq(InviteStatus::Pending.as_str()))
            .select(TripInviteRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_invite).collect()
    }

    async fn set_status(
        &self,
        id: &InviteId,
        status: InviteStatus,
    ) -> Result<bool, InvitePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(trip_invites::table.filter(trip_invites::id.eq(id.as_uuid())))
            .set(trip_invites::status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &InviteId) -> Result<bool, InvitePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Zero deleted rows is the idempotent no-op the workflow expects when
        // a concurrent deletion won the race.
        let deleted =
            diesel::delete(trip_invites::table.filter(trip_invites::id.eq(id.as_uuid())))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(status: &str, email: &str) -> TripInviteRow {
        TripInviteRow {
            id: Uuid::new_v4(),
            trip_id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            receiver_id: None,
            receiver_email: email.to_owned(),
            status: status.to_owned(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("PENDING", InviteStatus::Pending)]
    #[case("ACCEPTED", InviteStatus::Accepted)]
    #[case("DECLINED", InviteStatus::Declined)]
    fn rows_parse_known_statuses(#[case] raw: &str, #[case] expected: InviteStatus) {
        let invite = row_to_invite(row(raw, "grace@example.com")).expect("parse row");
        assert_eq!(invite.status, expected);
    }

    #[rstest]
    fn unknown_status_is_a_query_error() {
        let err = row_to_invite(row("CANCELLED", "grace@example.com")).expect_err("bad status");
        assert!(err.to_string().contains("unrecognised invite status"));
    }

    #[rstest]
    fn corrupt_email_is_a_query_error() {
        let err = row_to_invite(row("PENDING", "not-an-email")).expect_err("bad email");
        assert!(err.to_string().contains("corrupt receiver email"));
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(err, InvitePersistenceError::Connection { .. }));
    }
}
