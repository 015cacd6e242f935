/// Prefix of every trip data provider endpoint.
pub const API_BASE: &str = "/api";

pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";
pub const MAX_ZOOM: f64 = 19.;

// Almaty
pub const DEFAULT_CENTER: (f64, f64) = (43.2389, 76.8897);
pub const DEFAULT_ZOOM: f64 = 11.;

pub const TOAST_MILLIS: u32 = 2200;
