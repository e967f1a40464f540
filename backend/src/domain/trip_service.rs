//! Trip creation and access-masked reads.

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::TripRepository;
use crate::domain::{Error, Trip, TripId, UserId};

/// Maximum allowed length for a trip name.
pub const TRIP_NAME_MAX: usize = 128;

/// Message used whenever a trip is absent or access to it is masked.
pub(crate) const TRIP_NOT_FOUND: &str = "trip not found";

/// Trip creation request body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    #[schema(example = "Lakes long weekend")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Creates trips and answers membership-aware reads.
pub struct TripService {
    trips: Arc<dyn TripRepository>,
    clock: Arc<dyn Clock>,
}

impl TripService {
    /// Create a new service over the given ports.
    pub fn new(trips: Arc<dyn TripRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { trips, clock }
    }

    /// Create a trip owned by `creator`.
    pub async fn create(
        &self,
        creator: &UserId,
        request: CreateTripRequest,
    ) -> Result<Trip, Error> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(Error::invalid_request("trip name must not be empty")
                .with_details(json!({ "field": "name" })));
        }
        if name.chars().count() > TRIP_NAME_MAX {
            return Err(Error::invalid_request(format!(
                "trip name must be at most {TRIP_NAME_MAX} characters"
            ))
            .with_details(json!({ "field": "name" })));
        }
        if request.end_date < request.start_date {
            return Err(
                Error::invalid_request("end date must not be before start date")
                    .with_details(json!({ "field": "endDate" })),
            );
        }

        let trip = Trip {
            id: TripId::random(),
            creator_id: *creator,
            name: name.to_owned(),
            description: request.description.unwrap_or_default(),
            start_date: request.start_date,
            end_date: request.end_date,
            created_at: self.clock.utc(),
        };
        self.trips.create(&trip).await?;
        Ok(trip)
    }

    /// Trips the identity created or belongs to, newest first.
    pub async fn list(&self, identity: &UserId) -> Result<Vec<Trip>, Error> {
        Ok(self.trips.list_for_user(identity).await?)
    }

    /// Fetch one trip, masking non-membership as absence.
    pub async fn get(&self, identity: &UserId, trip_id: &TripId) -> Result<Trip, Error> {
        let Some(trip) = self.trips.find_by_id(trip_id).await? else {
            return Err(Error::not_found(TRIP_NOT_FOUND));
        };
        if trip.is_creator(identity)
            || self
                .trips
                .find_member_by_user(trip_id, identity)
                .await?
                .is_some()
        {
            Ok(trip)
        } else {
            Err(Error::not_found(TRIP_NOT_FOUND))
        }
    }
}
