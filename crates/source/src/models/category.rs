use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use super::sanitize;
use crate::error::{Error, ErrorKind};

/// Video categories, mirroring the platform's standard category IDs.
///
/// [`Category::Trending`] is the general chart (no category filter at all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Trending,
    FilmAnimation,
    AutosVehicles,
    Music,
    PetsAnimals,
    Sports,
    TravelEvents,
    Gaming,
    PeopleBlogs,
    Comedy,
    Entertainment,
    NewsPolitics,
    HowtoStyle,
    Education,
    ScienceTechnology,
}
impl Category {
    pub const ALL: [Category; 15] = [
        Category::Trending,
        Category::FilmAnimation,
        Category::AutosVehicles,
        Category::Music,
        Category::PetsAnimals,
        Category::Sports,
        Category::TravelEvents,
        Category::Gaming,
        Category::PeopleBlogs,
        Category::Comedy,
        Category::Entertainment,
        Category::NewsPolitics,
        Category::HowtoStyle,
        Category::Education,
        Category::ScienceTechnology,
    ];

    /// The platform's `videoCategoryId`, or `None` for the unfiltered chart.
    pub fn platform_id(&self) -> Option<&'static str> {
        Some(match self {
            Category::Trending => return None,
            Category::FilmAnimation => "1",
            Category::AutosVehicles => "2",
            Category::Music => "10",
            Category::PetsAnimals => "15",
            Category::Sports => "17",
            Category::TravelEvents => "19",
            Category::Gaming => "20",
            Category::PeopleBlogs => "22",
            Category::Comedy => "23",
            Category::Entertainment => "24",
            Category::NewsPolitics => "25",
            Category::HowtoStyle => "26",
            Category::Education => "27",
            Category::ScienceTechnology => "28",
        })
    }

    /// Stable lowercase key used for storage and URLs.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Trending => "trending",
            Category::FilmAnimation => "film-animation",
            Category::AutosVehicles => "autos-vehicles",
            Category::Music => "music",
            Category::PetsAnimals => "pets-animals",
            Category::Sports => "sports",
            Category::TravelEvents => "travel-events",
            Category::Gaming => "gaming",
            Category::PeopleBlogs => "people-blogs",
            Category::Comedy => "comedy",
            Category::Entertainment => "entertainment",
            Category::NewsPolitics => "news-politics",
            Category::HowtoStyle => "howto-style",
            Category::Education => "education",
            Category::ScienceTechnology => "science-technology",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Trending => "Trending",
            Category::FilmAnimation => "Film & Animation",
            Category::AutosVehicles => "Autos & Vehicles",
            Category::Music => "Music",
            Category::PetsAnimals => "Pets & Animals",
            Category::Sports => "Sports",
            Category::TravelEvents => "Travel & Events",
            Category::Gaming => "Gaming",
            Category::PeopleBlogs => "People & Blogs",
            Category::Comedy => "Comedy",
            Category::Entertainment => "Entertainment",
            Category::NewsPolitics => "News & Politics",
            Category::HowtoStyle => "Howto & Style",
            Category::Education => "Education",
            Category::ScienceTechnology => "Science & Technology",
        }
    }
}
impl TryFrom<String> for Category {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}
impl FromStr for Category {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the platform's numeric IDs as well as names and slugs.
        if let Some(category) = Self::ALL.into_iter().find(|c| c.platform_id() == Some(s.trim())) {
            return Ok(category);
        }
        Ok(match sanitize(s).as_str() {
            "trending" | "all" | "" => Self::Trending,
            "film" | "filmanimation" => Self::FilmAnimation,
            "autos" | "autosvehicles" => Self::AutosVehicles,
            "music" => Self::Music,
            "pets" | "animals" | "petsanimals" => Self::PetsAnimals,
            "sports" | "sport" => Self::Sports,
            "travel" | "travelevents" => Self::TravelEvents,
            "gaming" | "games" => Self::Gaming,
            "people" | "blogs" | "peopleblogs" => Self::PeopleBlogs,
            "comedy" => Self::Comedy,
            "entertainment" => Self::Entertainment,
            "news" | "politics" | "newspolitics" => Self::NewsPolitics,
            "howto" | "style" | "howtostyle" => Self::HowtoStyle,
            "education" => Self::Education,
            "science" | "tech" | "technology" | "sciencetechnology" => Self::ScienceTechnology,
            _ => exn::bail!(ErrorKind::invalid("category", s)),
        })
    }
}
impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}
