//! Domain entities - the core business objects.

mod location;
mod post;
mod query;

pub use location::{Distance, EARTH_RADIUS_KM, Location};
pub use post::{Attachment, Post, PostId, PostSubmission};
pub use query::GeoDistanceQuery;
