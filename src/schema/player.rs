use getset::{CopyGetters, Getters};
use serde::Serialize;

use super::{collection::Collection, FcType, FsType, LevelIndex, RateType, SongType};

#[derive(Clone, PartialEq, Eq, Debug, Getters, CopyGetters, Serialize)]
pub struct Player {
    #[getset(get = "pub")]
    name: String,
    #[getset(get_copy = "pub")]
    rating: u32,
    #[getset(get_copy = "pub")]
    friend_code: u64,
    #[getset(get_copy = "pub")]
    course_rank: u32,
    #[getset(get_copy = "pub")]
    class_rank: u32,
    #[getset(get_copy = "pub")]
    star: u32,
    #[getset(get = "pub")]
    trophy: Option<Collection>,
    #[getset(get = "pub")]
    icon: Option<Collection>,
    #[getset(get = "pub")]
    name_plate: Option<Collection>,
    #[getset(get = "pub")]
    frame: Option<Collection>,
    #[getset(get = "pub")]
    upload_time: Option<String>,
}
from_json!(Player {
    name: required("name"),
    rating: required("rating"),
    friend_code: required("friend_code"),
    course_rank: required("course_rank"),
    class_rank: required("class_rank"),
    star: required("star"),
    trophy: optional("trophy"),
    icon: optional("icon"),
    name_plate: optional("name_plate"),
    frame: optional("frame"),
    upload_time: optional("upload_time"),
});

#[derive(Clone, PartialEq, Debug, Getters, CopyGetters, Serialize)]
pub struct Score {
    #[getset(get_copy = "pub")]
    id: u32,
    #[getset(get = "pub")]
    song_name: String,
    #[getset(get = "pub")]
    level: String,
    #[getset(get_copy = "pub")]
    level_index: LevelIndex,
    /// In percent, e.g. `100.5` for SSS+ cap
    #[getset(get_copy = "pub")]
    achievements: f64,
    #[getset(get_copy = "pub")]
    fc: Option<FcType>,
    #[getset(get_copy = "pub")]
    fs: Option<FsType>,
    #[getset(get_copy = "pub")]
    dx_score: u32,
    #[getset(get_copy = "pub")]
    dx_rating: f64,
    #[getset(get_copy = "pub")]
    rate: RateType,
    #[getset(get_copy = "pub")]
    #[serde(rename = "type")]
    song_type: SongType,
    #[getset(get = "pub")]
    play_time: Option<String>,
    #[getset(get = "pub")]
    upload_time: Option<String>,
}
from_json!(Score {
    id: required("id"),
    song_name: required("song_name"),
    level: required("level"),
    level_index: required("level_index"),
    achievements: required("achievements"),
    fc: optional("fc"),
    fs: optional("fs"),
    dx_score: required("dx_score"),
    dx_rating: required("dx_rating"),
    rate: required("rate"),
    song_type: required("type"),
    play_time: optional("play_time"),
    upload_time: optional("upload_time"),
});

#[derive(Clone, PartialEq, Eq, Debug, Getters, CopyGetters, Serialize)]
pub struct SimpleScore {
    #[getset(get_copy = "pub")]
    id: u32,
    #[getset(get = "pub")]
    song_name: String,
    #[getset(get = "pub")]
    level: String,
    #[getset(get_copy = "pub")]
    level_index: LevelIndex,
    #[getset(get_copy = "pub")]
    fc: Option<FcType>,
    #[getset(get_copy = "pub")]
    fs: Option<FsType>,
    #[getset(get_copy = "pub")]
    rate: RateType,
    #[getset(get_copy = "pub")]
    #[serde(rename = "type")]
    song_type: SongType,
}
from_json!(SimpleScore {
    id: required("id"),
    song_name: required("song_name"),
    level: required("level"),
    level_index: required("level_index"),
    fc: optional("fc"),
    fs: optional("fs"),
    rate: required("rate"),
    song_type: required("type"),
});

#[derive(Clone, PartialEq, Eq, Debug, Getters, CopyGetters, Serialize)]
pub struct RatingTrend {
    #[getset(get_copy = "pub")]
    total: u32,
    #[getset(get_copy = "pub")]
    standard: u32,
    #[getset(get_copy = "pub")]
    dx: u32,
    #[getset(get = "pub")]
    date: String,
}
from_json!(RatingTrend {
    total: required("total"),
    standard: required("standard"),
    dx: required("dx"),
    date: required("date"),
});

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        de::{decode, DecodeError},
        schema::{FsType, LevelIndex, RateType, SongType},
    };

    use super::{Player, RatingTrend, Score, SimpleScore};

    #[test]
    fn decode_player() {
        let player: Player = decode(&json!({
            "name": "ＭＡＩＭＡＩ",
            "rating": 15234,
            "friend_code": 101234567890u64,
            "course_rank": 11,
            "class_rank": 5,
            "star": 320,
            "trophy": { "id": 1, "name": "NEW COMER", "color": "Normal" },
            "icon": { "id": 101, "name": "でらっくま" },
            "name_plate": null,
            "upload_time": "2024-05-01T12:00:00Z",
        }))
        .unwrap();
        assert_eq!(player.rating(), 15234);
        assert_eq!(player.friend_code(), 101234567890);
        assert_eq!(
            player.trophy().as_ref().and_then(|x| x.color().as_deref()),
            Some("Normal")
        );
        assert_eq!(player.icon().as_ref().map(|x| x.id()), Some(101));
        assert_eq!(player.name_plate(), &None);
        assert_eq!(player.frame(), &None);
    }

    #[test]
    fn decode_scores() {
        let scores: Vec<Score> = decode(&json!([
            {
                "id": 8,
                "song_name": "True Love Song",
                "level": "10",
                "level_index": 3,
                "achievements": 100.5,
                "fc": "ap",
                "fs": "fsd",
                "dx_score": 1500,
                "dx_rating": 225.0,
                "rate": "sssp",
                "type": "standard",
            },
            {
                "id": 11422,
                "song_name": "Xaleid◆scopiX",
                "level": "14+",
                "level_index": 3,
                "achievements": 97.1234,
                "fc": null,
                "fs": null,
                "dx_score": 2000,
                "dx_rating": 293.4,
                "rate": "s",
                "type": "dx",
                "play_time": "2024-05-01T12:00:00Z",
            },
        ]))
        .unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].fs(), Some(FsType::Fsd));
        assert_eq!(scores[0].rate(), RateType::Sssp);
        assert_eq!(scores[1].fc(), None);
        assert_eq!(scores[1].song_type(), SongType::Dx);
        assert_eq!(scores[1].level_index(), LevelIndex::Master);
        assert_eq!(scores[1].play_time().as_deref(), Some("2024-05-01T12:00:00Z"));

        let res = decode::<Vec<Score>>(&json!([{ "id": 8, "song_name": "x" }]));
        assert!(matches!(
            res,
            Err(DecodeError::MissingField { record: "Score", .. })
        ));
    }

    #[test]
    fn decode_simple_score_and_trend() {
        let score: SimpleScore = decode(&json!({
            "id": 8,
            "song_name": "True Love Song",
            "level": "10",
            "level_index": 4,
            "rate": "aaa",
            "type": "standard",
        }))
        .unwrap();
        assert_eq!(score.level_index(), LevelIndex::ReMaster);
        assert_eq!(score.fs(), None);

        let trend: RatingTrend = decode(&json!({
            "total": 15000,
            "standard": 10000,
            "dx": 5000,
            "date": "2024-05-01",
        }))
        .unwrap();
        assert_eq!(trend.standard() + trend.dx(), trend.total());
    }
}
