use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AcResult;
use crate::storage::{FREQUENT_DESTINATIONS_KEY, LocalStore};

/// Two saves closer than this (in degrees, on both axes) are the same place.
pub const PROXIMITY_TOLERANCE: f64 = 0.001;
pub const MAX_FREQUENT_DESTINATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequentDestination {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub visit_count: u32,
    pub last_visited: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitedPlace {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

/// Visit history kept under `frequent_destinations` in the local store.
pub struct FrequentDestinations<'a> {
    store: &'a LocalStore,
}

impl<'a> FrequentDestinations<'a> {
    pub fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// Unreadable history reads as empty here; saves refuse to overwrite it.
    fn load(&self) -> Vec<FrequentDestination> {
        self.store
            .get_json(FREQUENT_DESTINATIONS_KEY)
            .unwrap_or_default()
    }

    /// Records a visit. A save near an existing entry of the same user bumps its
    /// count; anything else starts a new entry. Returns the stored entry.
    pub fn save(&self, user_id: i64, place: &VisitedPlace) -> AcResult<FrequentDestination> {
        self.save_at(user_id, place, Utc::now())
    }

    pub fn save_at(
        &self,
        user_id: i64,
        place: &VisitedPlace,
        now: DateTime<Utc>,
    ) -> AcResult<FrequentDestination> {
        let saved = self.store.update_json(
            FREQUENT_DESTINATIONS_KEY,
            |destinations: &mut Vec<FrequentDestination>| {
                record_visit(destinations, user_id, place, now)
            },
        )?;
        log::debug!("Saved destination {:?} for user {user_id}", saved.name);
        Ok(saved)
    }

    /// The user's most visited places, at most five.
    pub fn top(&self, user_id: i64) -> Vec<FrequentDestination> {
        let mut destinations = self
            .load()
            .into_iter()
            .filter(|d| d.user_id == user_id)
            .collect::<Vec<_>>();
        destinations.sort_by(|a, b| b.visit_count.cmp(&a.visit_count));
        destinations.truncate(MAX_FREQUENT_DESTINATIONS);
        destinations
    }
}

fn record_visit(
    destinations: &mut Vec<FrequentDestination>,
    user_id: i64,
    place: &VisitedPlace,
    now: DateTime<Utc>,
) -> FrequentDestination {
    let existing = destinations.iter_mut().find(|d| {
        d.user_id == user_id
            && (d.lat - place.lat).abs() < PROXIMITY_TOLERANCE
            && (d.lng - place.lng).abs() < PROXIMITY_TOLERANCE
    });

    if let Some(destination) = existing {
        destination.visit_count += 1;
        destination.last_visited = now;
        return destination.clone();
    }

    // Millisecond ids, bumped past the newest one when saves share a millisecond.
    let id = destinations
        .iter()
        .map(|d| d.id + 1)
        .fold(now.timestamp_millis(), i64::max);
    let destination = FrequentDestination {
        id,
        user_id,
        name: place.name.clone(),
        address: place.address.clone(),
        lat: place.lat,
        lng: place.lng,
        visit_count: 1,
        last_visited: now,
    };
    destinations.push(destination.clone());
    destination
}
