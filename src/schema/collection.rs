use getset::{CopyGetters, Getters};
use serde::Serialize;

use super::{FcType, FsType, LevelIndex, RateType, SongType};

/// An icon, name plate, frame or trophy.
#[derive(Clone, PartialEq, Eq, Debug, Getters, CopyGetters, Serialize)]
pub struct Collection {
    #[getset(get_copy = "pub")]
    id: u32,
    #[getset(get = "pub")]
    name: String,
    /// Only set for trophies
    #[getset(get = "pub")]
    color: Option<String>,
    #[getset(get = "pub")]
    description: Option<String>,
    #[getset(get = "pub")]
    genre: Option<String>,
    /// Present when the list was requested with `required=true`
    #[getset(get = "pub")]
    required: Vec<CollectionRequired>,
}
from_json!(Collection {
    id: required("id"),
    name: required("name"),
    color: optional("color"),
    description: optional("description"),
    genre: optional("genre"),
    required: or_default("required"),
});

/// One unlock condition of a collection.
#[derive(Clone, PartialEq, Eq, Debug, Getters, CopyGetters, Serialize)]
pub struct CollectionRequired {
    #[getset(get = "pub")]
    difficulties: Vec<LevelIndex>,
    #[getset(get_copy = "pub")]
    rate: Option<RateType>,
    #[getset(get_copy = "pub")]
    fc: Option<FcType>,
    #[getset(get_copy = "pub")]
    fs: Option<FsType>,
    #[getset(get_copy = "pub")]
    completed: Option<bool>,
    #[getset(get = "pub")]
    songs: Vec<CollectionRequiredSong>,
}
from_json!(CollectionRequired {
    difficulties: or_default("difficulties"),
    rate: optional("rate"),
    fc: optional("fc"),
    fs: optional("fs"),
    completed: optional("completed"),
    songs: or_default("songs"),
});

#[derive(Clone, PartialEq, Eq, Debug, Getters, CopyGetters, Serialize)]
pub struct CollectionRequiredSong {
    #[getset(get_copy = "pub")]
    id: u32,
    #[getset(get = "pub")]
    title: String,
    #[getset(get_copy = "pub")]
    #[serde(rename = "type")]
    song_type: SongType,
    #[getset(get_copy = "pub")]
    completed: Option<bool>,
    #[getset(get = "pub")]
    completed_difficulties: Vec<LevelIndex>,
}
from_json!(CollectionRequiredSong {
    id: required("id"),
    title: required("title"),
    song_type: required("type"),
    completed: optional("completed"),
    completed_difficulties: or_default("completed_difficulties"),
});

#[derive(Clone, PartialEq, Eq, Debug, Getters, CopyGetters, Serialize)]
pub struct CollectionGenre {
    #[getset(get_copy = "pub")]
    id: u32,
    #[getset(get = "pub")]
    title: String,
    #[getset(get = "pub")]
    genre: String,
}
from_json!(CollectionGenre {
    id: required("id"),
    title: required("title"),
    genre: required("genre"),
});
