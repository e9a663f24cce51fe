//! Scripted `PlacesApi` for unit tests.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use shrinemap_places::{PlaceCandidate, PlaceDetails, PlacesApi, PlacesError};

type FindFn = fn(&str) -> Result<PlaceCandidate, PlacesError>;
type DetailsFn = fn(&str) -> Result<PlaceDetails, PlacesError>;

pub(crate) struct FakePlaces {
    find: FindFn,
    details: DetailsFn,
    delay: fn(&str) -> Duration,
    find_calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl FakePlaces {
    /// Resolves every query to `pid:{query}` and names the details after it.
    pub(crate) fn echo() -> Self {
        Self::new(
            |query| {
                Ok(PlaceCandidate {
                    place_id: format!("pid:{query}"),
                    name: None,
                })
            },
            |place_id| {
                Ok(PlaceDetails {
                    name: Some(place_id.trim_start_matches("pid:").to_owned()),
                    website_url: Some(format!("https://maps.example/{place_id}")),
                    ..PlaceDetails::default()
                })
            },
        )
    }

    pub(crate) fn new(find: FindFn, details: DetailsFn) -> Self {
        Self {
            find,
            details,
            delay: |_| Duration::ZERO,
            find_calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_delay(mut self, delay: fn(&str) -> Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl PlacesApi for FakePlaces {
    fn find_place(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<PlaceCandidate, PlacesError>> + Send {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_owned());
        let delay = (self.delay)(query);
        let result = (self.find)(query);
        async move {
            tokio::time::sleep(delay).await;
            result
        }
    }

    fn place_details(
        &self,
        place_id: &str,
    ) -> impl Future<Output = Result<PlaceDetails, PlacesError>> + Send {
        std::future::ready((self.details)(place_id))
    }
}
