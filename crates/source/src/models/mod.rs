mod category;
mod credential;
mod region;
mod video;

pub use self::category::Category;
pub use self::credential::Credential;
pub use self::region::Region;
pub use self::video::{Fetched, ObservationState, Recorded, Video, VideoSnapshot};

fn sanitize(s: impl AsRef<str>) -> String {
    s.as_ref().trim().to_lowercase().replace(['-', '_', ' ', '&', '.'], "")
}
