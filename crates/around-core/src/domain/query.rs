use super::{Distance, Location};

/// Geo-distance filter: every document whose location lies within `radius`
/// of `center`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoDistanceQuery {
    pub center: Location,
    pub radius: Distance,
    /// Maximum number of hits the engine returns.
    pub limit: usize,
}

impl GeoDistanceQuery {
    pub fn matches(&self, location: &Location) -> bool {
        self.center.distance_km(location) <= self.radius.km()
    }
}
