use std::rc::Rc;

use trip_player_lib::Trip;

// To be stored in the root and propagated to panel and map
#[derive(Debug, Clone, PartialEq)]
pub struct TripData {
    pub trip_id: String,
    /// Bumped on every load, so loading the same trip again replays it.
    pub generation: u32,
    pub trip: Rc<Trip>,
}
