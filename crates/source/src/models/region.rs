use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use super::sanitize;
use crate::error::{Error, ErrorKind};

/// Regions the trending chart can be requested for.
///
/// The platform accepts any ISO 3166-1 alpha-2 code, but the dashboard only
/// offers a fixed set so that stored history stays comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    UnitedStates,
    India,
    UnitedKingdom,
    Canada,
    Australia,
    Germany,
    France,
    Japan,
    Brazil,
    SouthKorea,
}
impl Region {
    pub const ALL: [Region; 10] = [
        Region::UnitedStates,
        Region::India,
        Region::UnitedKingdom,
        Region::Canada,
        Region::Australia,
        Region::Germany,
        Region::France,
        Region::Japan,
        Region::Brazil,
        Region::SouthKorea,
    ];

    /// ISO 3166-1 alpha-2 code, as sent to the platform and stored in history.
    pub fn code(&self) -> &'static str {
        match self {
            Region::UnitedStates => "US",
            Region::India => "IN",
            Region::UnitedKingdom => "GB",
            Region::Canada => "CA",
            Region::Australia => "AU",
            Region::Germany => "DE",
            Region::France => "FR",
            Region::Japan => "JP",
            Region::Brazil => "BR",
            Region::SouthKorea => "KR",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::UnitedStates => "United States",
            Region::India => "India",
            Region::UnitedKingdom => "United Kingdom",
            Region::Canada => "Canada",
            Region::Australia => "Australia",
            Region::Germany => "Germany",
            Region::France => "France",
            Region::Japan => "Japan",
            Region::Brazil => "Brazil",
            Region::SouthKorea => "South Korea",
        }
    }
}
impl TryFrom<String> for Region {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().parse()
    }
}
impl FromStr for Region {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match sanitize(s).as_str() {
            "us" | "usa" | "unitedstates" | "unitedstatesofamerica" | "america" => Self::UnitedStates,
            "in" | "india" => Self::India,
            "gb" | "uk" | "unitedkingdom" | "greatbritain" | "britain" => Self::UnitedKingdom,
            "ca" | "canada" => Self::Canada,
            "au" | "australia" => Self::Australia,
            "de" | "germany" => Self::Germany,
            "fr" | "france" => Self::France,
            "jp" | "japan" => Self::Japan,
            "br" | "brazil" => Self::Brazil,
            "kr" | "korea" | "southkorea" => Self::SouthKorea,
            _ => exn::bail!(ErrorKind::invalid("region", s)),
        })
    }
}
impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("India", Region::India)]
    #[case("IN", Region::India)]
    #[case("USA", Region::UnitedStates)]
    #[case("us", Region::UnitedStates)]
    #[case(" United Kingdom ", Region::UnitedKingdom)]
    #[case("GB", Region::UnitedKingdom)]
    #[case("south-korea", Region::SouthKorea)]
    fn test_parse(#[case] input: &str, #[case] expected: Region) {
        assert_eq!(input.parse::<Region>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "Atlantis".parse::<Region>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidInput { field: "region", .. }));
    }

    #[test]
    fn test_codes_round_trip() {
        for region in Region::ALL {
            assert_eq!(region.code().parse::<Region>().unwrap(), region);
            assert_eq!(region.as_str().parse::<Region>().unwrap(), region);
        }
    }
}
