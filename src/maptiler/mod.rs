pub mod geocoding;
pub use geocoding::{Geocoder, MapTilerGeocoder};
