mod ids;
mod playlist;
mod track;
mod user;

pub use ids::{PlaylistId, TrackId};
pub use playlist::Playlist;
pub use track::Track;
pub use user::{SignupRequest, UserProfile};
