use crate::venue::Venue;

pub struct AppState {
    pub venues: Vec<Venue>,
}
