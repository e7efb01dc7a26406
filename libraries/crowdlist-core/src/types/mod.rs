mod external;
mod ids;
mod playlist;
mod track;
mod vote;

pub use external::ExternalOrder;
pub use ids::{DeviceId, ExternalPlaylistId, GuestId, PlaylistId, TrackId};
pub use playlist::{CreatePlaylist, Playlist};
pub use track::{NewTrack, Track};
pub use vote::{DesiredOrder, RankedTrack, Vote, VoteCounts};
