/// Season number with u16 bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeasonNumber(u16);

impl SeasonNumber {
    pub fn new(num: u16) -> Self {
        SeasonNumber(num)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for SeasonNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for SeasonNumber {
    fn from(num: u16) -> Self {
        SeasonNumber(num)
    }
}

/// Episode number within a season (or within the series for absolute orders)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpisodeNumber(u16);

impl EpisodeNumber {
    pub fn new(num: u16) -> Self {
        EpisodeNumber(num)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for EpisodeNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for EpisodeNumber {
    fn from(num: u16) -> Self {
        EpisodeNumber(num)
    }
}
