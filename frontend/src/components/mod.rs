pub mod leaflet_surface;
pub mod map_component;
pub mod panel;
