use getset::{CopyGetters, Getters};
use serde::Serialize;
use serde_json::Value;
use typed_builder::TypedBuilder;

use crate::de::{DecodeError, FromJson};

use super::{LevelIndex, SongType};

#[derive(Clone, PartialEq, Debug, Getters, CopyGetters, Serialize)]
pub struct Song {
    #[getset(get_copy = "pub")]
    id: u32,
    #[getset(get = "pub")]
    title: String,
    #[getset(get = "pub")]
    artist: String,
    #[getset(get = "pub")]
    genre: String,
    #[getset(get_copy = "pub")]
    bpm: u32,
    #[getset(get = "pub")]
    map: Option<String>,
    #[getset(get_copy = "pub")]
    version: Option<u32>,
    #[getset(get = "pub")]
    rights: Option<String>,
    #[getset(get_copy = "pub")]
    disabled: bool,
    #[getset(get = "pub")]
    difficulties: SongDifficulties,
}
from_json!(Song {
    id: required("id"),
    title: required("title"),
    artist: required("artist"),
    genre: required("genre"),
    bpm: required("bpm"),
    map: optional("map"),
    version: optional("version"),
    rights: optional("rights"),
    disabled: or_default("disabled"),
    difficulties: required("difficulties"),
});

/// Charts of a song, grouped by type.
/// Usually only one of `standard` and `dx` is populated.
#[derive(Clone, Default, PartialEq, Debug, Getters, Serialize)]
#[getset(get = "pub")]
pub struct SongDifficulties {
    standard: Vec<SongDifficulty>,
    dx: Vec<SongDifficulty>,
    utage: Vec<SongDifficultyUtage>,
}
from_json!(SongDifficulties {
    standard: or_default("standard"),
    dx: or_default("dx"),
    utage: or_default("utage"),
});

#[derive(Clone, PartialEq, Debug, Getters, CopyGetters, Serialize)]
pub struct SongDifficulty {
    #[getset(get_copy = "pub")]
    #[serde(rename = "type")]
    song_type: SongType,
    #[getset(get_copy = "pub")]
    difficulty: LevelIndex,
    /// Displayed level such as `"13+"`
    #[getset(get = "pub")]
    level: String,
    #[getset(get_copy = "pub")]
    level_value: f64,
    #[getset(get = "pub")]
    note_designer: String,
    #[getset(get_copy = "pub")]
    version: u32,
    #[getset(get = "pub")]
    notes: Option<Notes>,
}
from_json!(SongDifficulty {
    song_type: required("type"),
    difficulty: required("difficulty"),
    level: required("level"),
    level_value: required("level_value"),
    note_designer: required("note_designer"),
    version: required("version"),
    notes: optional("notes"),
});

#[derive(Clone, PartialEq, Debug, Getters, CopyGetters, Serialize)]
pub struct SongDifficultyUtage {
    #[getset(get_copy = "pub")]
    #[serde(rename = "type")]
    song_type: SongType,
    #[getset(get_copy = "pub")]
    difficulty: LevelIndex,
    #[getset(get = "pub")]
    level: String,
    #[getset(get_copy = "pub")]
    level_value: f64,
    #[getset(get = "pub")]
    note_designer: String,
    #[getset(get_copy = "pub")]
    version: u32,
    /// Single-character label such as 光 or 協
    #[getset(get = "pub")]
    kanji: String,
    #[getset(get = "pub")]
    description: String,
    #[getset(get_copy = "pub")]
    is_buddy: bool,
    #[getset(get = "pub")]
    notes: Option<UtageNotes>,
}
from_json!(SongDifficultyUtage {
    song_type: required("type"),
    difficulty: required("difficulty"),
    level: required("level"),
    level_value: required("level_value"),
    note_designer: required("note_designer"),
    version: required("version"),
    kanji: required("kanji"),
    description: required("description"),
    is_buddy: or_default("is_buddy"),
    notes: optional("notes"),
});

/// Utage charts played by two players carry one note set per side.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(untagged)]
pub enum UtageNotes {
    Single(Notes),
    Buddy(BuddyNotes),
}

impl FromJson for UtageNotes {
    fn from_json(value: &Value) -> Result<Self, DecodeError> {
        if value.get("left").is_some() {
            BuddyNotes::from_json(value).map(Self::Buddy)
        } else {
            Notes::from_json(value).map(Self::Single)
        }
    }
}

#[derive(
    Clone, Copy, Default, PartialEq, Eq, Debug, TypedBuilder, CopyGetters, Serialize,
)]
#[builder(field_defaults(default))]
#[getset(get_copy = "pub")]
pub struct Notes {
    total: u32,
    tap: u32,
    hold: u32,
    slide: u32,
    touch: u32,
    #[serde(rename = "break")]
    break_: u32,
}
from_json!(Notes {
    total: required("total"),
    tap: required("tap"),
    hold: required("hold"),
    slide: required("slide"),
    touch: required("touch"),
    break_: required("break"),
});

#[derive(Clone, Copy, PartialEq, Eq, Debug, CopyGetters, Serialize)]
#[getset(get_copy = "pub")]
pub struct BuddyNotes {
    left: Notes,
    right: Notes,
}
from_json!(BuddyNotes {
    left: required("left"),
    right: required("right"),
});

#[derive(Clone, PartialEq, Eq, Debug, Getters, CopyGetters, Serialize)]
pub struct Genre {
    #[getset(get_copy = "pub")]
    id: u32,
    #[getset(get = "pub")]
    title: String,
    #[getset(get = "pub")]
    genre: String,
}
from_json!(Genre {
    id: required("id"),
    title: required("title"),
    genre: required("genre"),
});

#[derive(Clone, PartialEq, Eq, Debug, Getters, CopyGetters, Serialize)]
pub struct Version {
    #[getset(get_copy = "pub")]
    id: u32,
    #[getset(get = "pub")]
    title: String,
    #[getset(get_copy = "pub")]
    version: u32,
}
from_json!(Version {
    id: required("id"),
    title: required("title"),
    version: required("version"),
});

#[derive(Clone, PartialEq, Eq, Debug, Getters, CopyGetters, Serialize)]
pub struct Alias {
    #[getset(get_copy = "pub")]
    song_id: u32,
    #[getset(get = "pub")]
    aliases: Vec<String>,
}
from_json!(Alias {
    song_id: required("song_id"),
    aliases: or_default("aliases"),
});

#[derive(Clone, Default, PartialEq, Debug, Getters, Serialize)]
#[getset(get = "pub")]
pub struct SongList {
    songs: Vec<Song>,
    genres: Vec<Genre>,
    versions: Vec<Version>,
}
from_json!(SongList {
    songs: or_default("songs"),
    genres: or_default("genres"),
    versions: or_default("versions"),
});
