use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// One ballroom or Latin dance. The serialized name doubles as the cache
/// directory name and as the prefix of the `<STYLE>_URL` env override.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DanceStyle {
    SlowWaltz,
    Tango,
    VienneseWaltz,
    SlowFoxtrot,
    Quickstep,
    Samba,
    Chacha,
    Rumba,
    Paso,
    Jive,
}

impl DanceStyle {
    pub fn env_var(&self) -> String {
        format!("{}_URL", self.to_string().to_uppercase())
    }

    pub fn section(&self) -> Section {
        match self {
            DanceStyle::SlowWaltz
            | DanceStyle::Tango
            | DanceStyle::VienneseWaltz
            | DanceStyle::SlowFoxtrot
            | DanceStyle::Quickstep => Section::Standard,
            DanceStyle::Samba
            | DanceStyle::Chacha
            | DanceStyle::Rumba
            | DanceStyle::Paso
            | DanceStyle::Jive => Section::Latin,
        }
    }

    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Section {
    Standard,
    Latin,
}

impl Section {
    /// All five dances of the section in competition order.
    pub fn styles(&self) -> Vec<DanceStyle> {
        match self {
            Section::Standard => vec![
                DanceStyle::SlowWaltz,
                DanceStyle::Tango,
                DanceStyle::VienneseWaltz,
                DanceStyle::SlowFoxtrot,
                DanceStyle::Quickstep,
            ],
            Section::Latin => vec![
                DanceStyle::Samba,
                DanceStyle::Chacha,
                DanceStyle::Rumba,
                DanceStyle::Paso,
                DanceStyle::Jive,
            ],
        }
    }
}

/// Competition class. Lower classes dance a fixed subset of the section,
/// growing with each class: d ⊆ c ⊆ b, where b dances everything.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    D,
    C,
    B,
}

impl Level {
    /// The dances of a final for this class and section, in competition order.
    pub fn styles(&self, section: Section) -> Vec<DanceStyle> {
        match (self, section) {
            (Level::D, Section::Standard) => vec![
                DanceStyle::SlowWaltz,
                DanceStyle::Tango,
                DanceStyle::Quickstep,
            ],
            (Level::C, Section::Standard) => vec![
                DanceStyle::SlowWaltz,
                DanceStyle::Tango,
                DanceStyle::SlowFoxtrot,
                DanceStyle::Quickstep,
            ],
            (Level::D, Section::Latin) => {
                vec![DanceStyle::Chacha, DanceStyle::Rumba, DanceStyle::Jive]
            }
            (Level::C, Section::Latin) => vec![
                DanceStyle::Samba,
                DanceStyle::Chacha,
                DanceStyle::Rumba,
                DanceStyle::Jive,
            ],
            (Level::B, section) => section.styles(),
        }
    }
}
