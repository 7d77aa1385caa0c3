//! Achievement-rate loss of a chart under imperfect judgements.
//!
//! Losses are fractions of the full achievement rate, so a value of `0.01`
//! means one percent.  Every note contributes to the base score with a
//! weight (tap 1, hold 2, slide 3, touch 1, break 5), and break notes
//! additionally share one percent of bonus among themselves.

use std::{collections::BTreeMap, fmt, str::FromStr};

use anyhow::{bail, Context};
use arrayvec::ArrayVec;
use getset::CopyGetters;
use itertools::Itertools;
use serde::Serialize;
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::{
    de::{mismatch, parse_enum_str, DecodeError, FromJson},
    schema::{
        song::{Notes, Song, SongDifficulty},
        LevelIndex, SongType,
    },
};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum AchievementError {
    #[error("Both standard and deluxe charts exist, so the chart type must be specified")]
    AmbiguousChartSelection,
    #[error("Charts of type {0} are not supported")]
    UnsupportedVariant(SongType),
    #[error("The song has no {difficulty} chart")]
    ChartNotFound { difficulty: LevelIndex },
    #[error("Note counts are not available for this chart")]
    NotesUnavailable,
    /// Touch notes have no loss table, and break losses need at least one break note.
    #[error("Loss is not defined for {kind} notes judged {judgement} on this chart")]
    InvalidArgument { kind: NoteKind, judgement: Judgement },
    #[error("Too many {kind} notes judged {judgement}")]
    CountOverflow { kind: NoteKind, judgement: Judgement },
    #[error("The chart has no notes")]
    NoNotes,
}

#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    EnumString,
    Display,
    EnumIter,
    Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    Tap,
    Hold,
    Slide,
    Touch,
    Break,
}

#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    EnumString,
    Display,
    EnumIter,
    Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Judgement {
    CriticalPerfect,
    Perfect,
    Great,
    Good,
    Miss,
}

json_enum!(NoteKind, Judgement);

pub fn equivalent_note_count(notes: &Notes) -> u64 {
    let [tap, hold, slide, touch, break_] = [
        notes.tap(),
        notes.hold(),
        notes.slide(),
        notes.touch(),
        notes.break_(),
    ]
    .map(u64::from);
    tap + hold * 2 + slide * 3 + touch + break_ * 5
}

/// Picks the chart of `difficulty` from the standard or deluxe charts of `song`.
///
/// When the song has exactly one of the two (and no utage charts), that one is
/// used regardless of `song_type`.  Otherwise `song_type` decides.
pub fn select_chart(
    song: &Song,
    difficulty: LevelIndex,
    song_type: Option<SongType>,
) -> Result<Option<&SongDifficulty>, AchievementError> {
    let difficulties = song.difficulties();
    let (standard, dx) = (difficulties.standard(), difficulties.dx());
    let charts = match (standard.is_empty(), dx.is_empty(), difficulties.utage().is_empty()) {
        (true, _, true) => dx,
        (_, true, true) => standard,
        _ => match song_type {
            Some(SongType::Standard) => standard,
            Some(SongType::Dx) => dx,
            Some(SongType::Utage) => {
                return Err(AchievementError::UnsupportedVariant(SongType::Utage))
            }
            None => return Err(AchievementError::AmbiguousChartSelection),
        },
    };
    Ok(charts.iter().find(|chart| chart.difficulty() == difficulty))
}

pub fn extract_notes(
    song: &Song,
    difficulty: LevelIndex,
    song_type: Option<SongType>,
) -> Result<&Notes, AchievementError> {
    select_chart(song, difficulty, song_type)?
        .ok_or(AchievementError::ChartNotFound { difficulty })?
        .notes()
        .as_ref()
        .ok_or(AchievementError::NotesUnavailable)
}

/// Loss caused by one note, as one to three values from the smallest to the largest.
///
/// A single judgement may cover several possible losses: a perfect break loses
/// either a quarter or a half of its bonus, and a great break has three tiers.
#[derive(Clone, PartialEq, Debug)]
pub struct AchievementLoss(ArrayVec<f64, 3>);

impl AchievementLoss {
    fn of(values: &[f64]) -> Self {
        Self(values.iter().copied().collect())
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    // Never empty
    pub fn lower(&self) -> f64 {
        self.0[0]
    }

    pub fn upper(&self) -> f64 {
        self.0[self.0.len() - 1]
    }
}

impl fmt::Display for AchievementLoss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0.iter().map(|x| format!("{:.4}%", x * 100.)).join(" / ")
        )
    }
}

pub fn achievement_loss(
    notes: &Notes,
    kind: NoteKind,
    judgement: Judgement,
) -> Result<AchievementLoss, AchievementError> {
    use Judgement::*;
    use NoteKind::*;

    let equivalent = equivalent_note_count(notes);
    if equivalent == 0 {
        return Err(AchievementError::NoNotes);
    }
    let x = 1. / equivalent as f64;
    let loss = match (kind, judgement) {
        (Tap | Hold | Slide, CriticalPerfect | Perfect) => AchievementLoss::of(&[0.]),
        (Tap, Great) => AchievementLoss::of(&[0.2 * x]),
        (Tap, Good) => AchievementLoss::of(&[0.5 * x]),
        (Tap, Miss) => AchievementLoss::of(&[x]),
        (Hold, Great) => AchievementLoss::of(&[0.4 * x]),
        (Hold, Good) => AchievementLoss::of(&[x]),
        (Hold, Miss) => AchievementLoss::of(&[2. * x]),
        (Slide, Great) => AchievementLoss::of(&[0.6 * x]),
        (Slide, Good) => AchievementLoss::of(&[1.5 * x]),
        (Slide, Miss) => AchievementLoss::of(&[3. * x]),
        (Break, _) => {
            if notes.break_() == 0 {
                return Err(AchievementError::InvalidArgument { kind, judgement });
            }
            let y = 1. / notes.break_() as f64 * 0.01;
            match judgement {
                CriticalPerfect => AchievementLoss::of(&[0.]),
                Perfect => AchievementLoss::of(&[0.25 * y, 0.5 * y]),
                Great => AchievementLoss::of(&[x + 0.6 * y, 2. * x + 0.6 * y, 2.5 * x + 0.6 * y]),
                Good => AchievementLoss::of(&[3. * x + 0.7 * y]),
                Miss => AchievementLoss::of(&[5. * x + y]),
            }
        }
        (Touch, _) => return Err(AchievementError::InvalidArgument { kind, judgement }),
    };
    Ok(loss)
}

/// How many notes of each kind received each judgement.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct LossBreakdown(BTreeMap<NoteKind, BTreeMap<Judgement, u32>>);

impl LossBreakdown {
    pub fn add(
        &mut self,
        kind: NoteKind,
        judgement: Judgement,
        count: u32,
    ) -> Result<(), AchievementError> {
        let entry = self.0.entry(kind).or_default().entry(judgement).or_default();
        *entry = entry
            .checked_add(count)
            .ok_or(AchievementError::CountOverflow { kind, judgement })?;
        Ok(())
    }

    /// Merges repeated entries by summing their counts.
    pub fn from_entries<I: IntoIterator<Item = (NoteKind, Judgement, u32)>>(
        entries: I,
    ) -> Result<Self, AchievementError> {
        let mut ret = Self::default();
        for (kind, judgement, count) in entries {
            ret.add(kind, judgement, count)?;
        }
        Ok(ret)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NoteKind, Judgement, u32)> + '_ {
        self.0.iter().flat_map(|(&kind, judgements)| {
            judgements
                .iter()
                .map(move |(&judgement, &count)| (kind, judgement, count))
        })
    }
}

/// `{"tap": {"miss": 1}, "break": {"perfect": 2}}`
impl FromJson for LossBreakdown {
    fn from_json(value: &Value) -> Result<Self, DecodeError> {
        let Value::Object(kinds) = value else {
            return Err(mismatch("object", value));
        };
        let mut ret = Self::default();
        for (kind, judgements) in kinds {
            let kind = parse_enum_str("NoteKind", kind)?;
            let Value::Object(judgements) = judgements else {
                return Err(mismatch("object", judgements));
            };
            let counts = ret.0.entry(kind).or_default();
            for (judgement, count) in judgements {
                counts.insert(
                    parse_enum_str("Judgement", judgement)?,
                    u32::from_json(count)?,
                );
            }
        }
        Ok(ret)
    }
}

/// `tap.miss=1,break.perfect=2`
impl FromStr for LossBreakdown {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let mut ret = Self::default();
        for entry in s.split(',').map(str::trim).filter(|x| !x.is_empty()) {
            let Some((key, count)) = entry.split_once('=') else {
                bail!("Should be of the form `kind.judgement=count`, found {entry:?}");
            };
            let (kind, judgement) = key
                .split_once('.')
                .with_context(|| format!("Should contain a dot, found {key:?}"))?;
            ret.add(
                kind.trim()
                    .parse()
                    .with_context(|| format!("Invalid note kind: {kind:?}"))?,
                judgement
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid judgement: {judgement:?}"))?,
                count
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid count: {count:?}"))?,
            )?;
        }
        Ok(ret)
    }
}

#[derive(Clone, Copy, Default, PartialEq, Debug, CopyGetters, Serialize)]
#[getset(get_copy = "pub")]
pub struct TotalLoss {
    lower: f64,
    upper: f64,
}

impl fmt::Display for TotalLoss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.4}% ~ {:.4}%",
            self.lower * 100.,
            self.upper * 100.
        )
    }
}

pub fn total_achievement_loss(
    notes: &Notes,
    breakdown: &LossBreakdown,
) -> Result<TotalLoss, AchievementError> {
    breakdown
        .iter()
        .try_fold(TotalLoss::default(), |total, (kind, judgement, count)| {
            let loss = achievement_loss(notes, kind, judgement)?;
            Ok(TotalLoss {
                lower: total.lower + loss.lower() * count as f64,
                upper: total.upper + loss.upper() * count as f64,
            })
        })
}

pub fn achievement_loss_from_song(
    song: &Song,
    difficulty: LevelIndex,
    kind: NoteKind,
    judgement: Judgement,
    song_type: Option<SongType>,
) -> Result<AchievementLoss, AchievementError> {
    achievement_loss(extract_notes(song, difficulty, song_type)?, kind, judgement)
}

pub fn total_achievement_loss_from_song(
    song: &Song,
    difficulty: LevelIndex,
    breakdown: &LossBreakdown,
    song_type: Option<SongType>,
) -> Result<TotalLoss, AchievementError> {
    total_achievement_loss(extract_notes(song, difficulty, song_type)?, breakdown)
}
