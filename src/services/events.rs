use crate::constants::EVENT_DEFAULT_RATING;
use crate::models::{Candidate, Category, Coordinates};
use async_trait::async_trait;
use time::macros::date;
use time::Date;

/// A dated local event such as a festival.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: u32,
    pub name: String,
    pub description: String,
    /// Free-text venue, used as the address when none is given
    pub venue: String,
    pub address: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub start: Date,
    pub end: Date,
    pub image_url: Option<String>,
}

impl Event {
    /// Inclusive on both ends
    pub fn is_active_on(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Events without coordinates cannot be routed and yield `None`
    pub fn to_candidate(&self) -> Option<Candidate> {
        let coordinates = self.coordinates?;
        let address = self
            .address
            .clone()
            .unwrap_or_else(|| self.venue.clone());

        let mut candidate = Candidate::new(
            format!("festival-{}", self.id),
            self.name.clone(),
            Category::Festival,
            coordinates,
        )
        .with_rating(EVENT_DEFAULT_RATING)
        .with_address(address);
        candidate.image_url = self.image_url.clone();
        Some(candidate)
    }
}

/// Source of events happening on a given day.
#[async_trait]
pub trait EventProvider: Send + Sync {
    async fn events_on(&self, date: Date) -> Vec<Candidate>;
}

/// In-memory event calendar.
#[derive(Debug, Clone, Default)]
pub struct StaticEventCatalog {
    events: Vec<Event>,
}

impl StaticEventCatalog {
    pub fn new(events: Vec<Event>) -> Self {
        StaticEventCatalog { events }
    }

    /// The 2025 Anyang festival calendar
    pub fn anyang() -> Self {
        let festival = |id: u32,
                        name: &str,
                        description: &str,
                        venue: &str,
                        address: &str,
                        (lat, lng): (f64, f64),
                        start: Date,
                        end: Date| Event {
            id,
            name: name.to_string(),
            description: description.to_string(),
            venue: venue.to_string(),
            address: Some(address.to_string()),
            coordinates: Some(Coordinates { lat, lng }),
            start,
            end,
            image_url: None,
        };

        Self::new(vec![
            festival(
                1,
                "2025 안양충훈벚꽃축제",
                "충훈동 충훈2교 및 벚꽃길 일대에서 열리는 봄맞이 벚꽃축제",
                "충훈동 충훈2교 및 벚꽃길 일대",
                "안양시 만안구 충훈동",
                (37.3942, 126.9569),
                date!(2025 - 04 - 05),
                date!(2025 - 04 - 06),
            ),
            festival(
                2,
                "제34회 안양예술제",
                "평촌중앙공원에서 열리는 문화예술 축제",
                "평촌중앙공원",
                "안양시 동안구 평촌중앙공원",
                (37.3902, 126.9506),
                date!(2025 - 05 - 02),
                date!(2025 - 05 - 03),
            ),
            festival(
                3,
                "제22회 안양스마T움축제",
                "안양체육관에서 열리는 스마트 기술 축제",
                "안양체육관",
                "안양시 동안구 안양체육관",
                (37.3960, 126.9540),
                date!(2025 - 05 - 31),
                date!(2025 - 06 - 01),
            ),
            festival(
                4,
                "2025 안양춤축제",
                "평촌중앙공원과 삼덕공원에서 열리는 춤 축제",
                "평촌중앙공원, 삼덕공원",
                "안양시 동안구 평촌중앙공원",
                (37.3902, 126.9506),
                date!(2025 - 09 - 26),
                date!(2025 - 09 - 28),
            ),
            festival(
                5,
                "먹거리 한마당",
                "평촌중앙공원 다목적운동장에서 열리는 음식 축제",
                "평촌중앙공원 다목적운동장",
                "안양시 동안구 평촌중앙공원",
                (37.3902, 126.9506),
                date!(2025 - 09 - 26),
                date!(2025 - 09 - 28),
            ),
            festival(
                6,
                "안양1번가 넘버원 페스티벌",
                "안양1번가 일원에서 열리는 주민화합 축제",
                "안양1번가 일원",
                "안양시 만안구 안양1번가",
                (37.4016, 126.9228),
                date!(2025 - 10 - 17),
                date!(2025 - 10 - 18),
            ),
        ])
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

#[async_trait]
impl EventProvider for StaticEventCatalog {
    async fn events_on(&self, date: Date) -> Vec<Candidate> {
        let candidates: Vec<Candidate> = self
            .events
            .iter()
            .filter(|e| e.is_active_on(date))
            .filter_map(Event::to_candidate)
            .collect();

        tracing::debug!(
            date = %date,
            count = candidates.len(),
            "Found {} events active on {}",
            candidates.len(), date
        );
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_on_inclusive_range() {
        let catalog = StaticEventCatalog::anyang();

        let first_day = catalog.events_on(date!(2025 - 04 - 05)).await;
        let last_day = catalog.events_on(date!(2025 - 04 - 06)).await;
        let after = catalog.events_on(date!(2025 - 04 - 07)).await;

        assert_eq!(first_day.len(), 1);
        assert_eq!(last_day.len(), 1);
        assert!(after.is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_festivals() {
        let catalog = StaticEventCatalog::anyang();
        let events = catalog.events_on(date!(2025 - 09 - 27)).await;
        let ids: Vec<&str> = events.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["festival-4", "festival-5"]);
    }

    #[test]
    fn test_event_candidate_fields() {
        let catalog = StaticEventCatalog::anyang();
        let candidate = catalog.events()[0].to_candidate().unwrap();

        assert_eq!(candidate.id, "festival-1");
        assert_eq!(candidate.category, Category::Festival);
        assert_eq!(candidate.rating, Some(5.0));
        assert_eq!(candidate.address, "안양시 만안구 충훈동");
    }

    #[test]
    fn test_event_address_falls_back_to_venue() {
        let mut event = StaticEventCatalog::anyang().events()[1].clone();
        event.address = None;
        let candidate = event.to_candidate().unwrap();
        assert_eq!(candidate.address, "평촌중앙공원");
    }

    #[test]
    fn test_event_without_coordinates_is_dropped() {
        let mut event = StaticEventCatalog::anyang().events()[2].clone();
        event.coordinates = None;
        assert!(event.to_candidate().is_none());
    }
}
