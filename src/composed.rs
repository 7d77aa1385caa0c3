//! Fetch a song and run the achievement formulas on one of its charts.

use typed_builder::TypedBuilder;

use crate::{
    achievement::{
        achievement_loss, extract_notes, total_achievement_loss, AchievementLoss, Judgement,
        LossBreakdown, NoteKind, TotalLoss,
    },
    api::{LxnsClient, Transport, DEFAULT_GAME_VERSION},
    schema::{song::Notes, LevelIndex, SongType},
    Error,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug, TypedBuilder)]
pub struct ChartQuery {
    song_id: u32,
    difficulty: LevelIndex,
    #[builder(default)]
    song_type: Option<SongType>,
    #[builder(default = DEFAULT_GAME_VERSION)]
    version: u32,
}

pub fn song_notes<T: Transport>(client: &LxnsClient<T>, query: ChartQuery) -> Result<Notes, Error> {
    let song = client.song(query.song_id, query.version)?;
    Ok(*extract_notes(&song, query.difficulty, query.song_type)?)
}

pub fn song_achievement_loss<T: Transport>(
    client: &LxnsClient<T>,
    query: ChartQuery,
    kind: NoteKind,
    judgement: Judgement,
) -> Result<AchievementLoss, Error> {
    Ok(achievement_loss(&song_notes(client, query)?, kind, judgement)?)
}

pub fn song_total_achievement_loss<T: Transport>(
    client: &LxnsClient<T>,
    query: ChartQuery,
    breakdown: &LossBreakdown,
) -> Result<TotalLoss, Error> {
    Ok(total_achievement_loss(&song_notes(client, query)?, breakdown)?)
}
