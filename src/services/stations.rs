use crate::models::Coordinates;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Station {
    pub name: String,
    pub line: String,
    pub coordinates: Coordinates,
}

/// Resolves station names to coordinates for anchoring searches.
pub trait StationDirectory: Send + Sync {
    fn find_station(&self, name: &str) -> Option<Station>;
    fn stations(&self) -> Vec<Station>;

    fn resolve(&self, name: &str) -> Option<Coordinates> {
        self.find_station(name).map(|s| s.coordinates)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticStationDirectory {
    stations: Vec<Station>,
}

impl StaticStationDirectory {
    pub fn new(stations: Vec<Station>) -> Self {
        StaticStationDirectory { stations }
    }

    /// Subway stations in and around Anyang (lines 1 and 4)
    pub fn anyang() -> Self {
        let station = |name: &str, line: &str, lat: f64, lng: f64| Station {
            name: name.to_string(),
            line: line.to_string(),
            coordinates: Coordinates { lat, lng },
        };

        Self::new(vec![
            station("안양", "1호선", 37.4018, 126.9229),
            station("명학", "1호선", 37.3847, 126.9355),
            station("관악", "1호선", 37.4192, 126.9087),
            station("석수", "1호선", 37.4349, 126.9025),
            station("범계", "4호선", 37.3898, 126.9508),
            station("평촌", "4호선", 37.3943, 126.9638),
            station("인덕원", "4호선", 37.4015, 126.9766),
        ])
    }

    pub fn find(&self, name: &str) -> Option<&Station> {
        let wanted = normalize_station_name(name);
        self.stations
            .iter()
            .find(|s| normalize_station_name(&s.name) == wanted)
    }
}

/// "범계역" and " 범계 " both name the 범계 station
fn normalize_station_name(name: &str) -> &str {
    let trimmed = name.trim();
    trimmed.strip_suffix('역').unwrap_or(trimmed)
}

impl StationDirectory for StaticStationDirectory {
    fn find_station(&self, name: &str) -> Option<Station> {
        self.find(name).cloned()
    }

    fn stations(&self) -> Vec<Station> {
        self.stations.clone()
    }
}
