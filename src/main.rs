use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use log::info;
use maimai_lxns::{
    achievement::{
        achievement_loss, equivalent_note_count, extract_notes, total_achievement_loss,
        Judgement, LossBreakdown, NoteKind,
    },
    api::{CollectionKind, HttpTransport, LxnsClient, UserToken, DEFAULT_BASE_URL},
    composed::{song_achievement_loss, song_notes, song_total_achievement_loss, ChartQuery},
    config::Config,
    de::decode_str,
    schema::{song::Notes, LevelIndex, SongType},
};
use serde::Serialize;
use url::Url;

#[derive(Parser)]
#[command(about = "Query the LXNS maimai API and compute achievement losses")]
struct Opts {
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the token in the config file
    #[arg(long)]
    token: Option<String>,
    /// Game version such as 24000
    #[arg(long)]
    version: Option<u32>,
    #[command(subcommand)]
    sub: Sub,
}

#[derive(Subcommand)]
enum Sub {
    Player,
    Scores,
    Songs {
        /// Include note counts of each chart
        #[arg(long)]
        notes: bool,
    },
    Song {
        id: u32,
    },
    Aliases,
    Icons(CollectionListArgs),
    Plates(CollectionListArgs),
    Frames(CollectionListArgs),
    Icon {
        id: u32,
    },
    Plate {
        id: u32,
    },
    Frame {
        id: u32,
    },
    CollectionGenres,
    CollectionGenre {
        id: u32,
    },
    /// Note counts of a chart
    Notes(ChartArgs),
    /// Loss caused by one note of the given kind and judgement
    Loss {
        #[command(flatten)]
        chart: ChartArgs,
        kind: NoteKind,
        judgement: Judgement,
    },
    /// Loss caused by several notes, e.g. `tap.great=3,break.perfect=1`
    TotalLoss {
        #[command(flatten)]
        chart: ChartArgs,
        breakdown: LossBreakdown,
    },
}

#[derive(Args)]
struct CollectionListArgs {
    /// Include unlock conditions
    #[arg(long)]
    required: bool,
}

#[derive(Args)]
struct ChartArgs {
    #[command(flatten)]
    source: SongSource,
    /// basic, advanced, expert, master or re_master
    difficulty: LevelIndex,
    /// Needed when the song has both standard and deluxe charts
    #[arg(long = "type")]
    song_type: Option<SongType>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SongSource {
    /// Fetch the song with this id
    #[arg(long)]
    song: Option<u32>,
    /// Read a song record saved as JSON
    #[arg(long)]
    song_file: Option<PathBuf>,
}

struct Session {
    client: LxnsClient,
    token: Option<UserToken>,
    version: u32,
}

/// Where the chart of a formula subcommand comes from.
enum ChartSource {
    Api(ChartQuery),
    File(Notes),
}

impl Session {
    fn token(&self) -> anyhow::Result<&UserToken> {
        self.token
            .as_ref()
            .context("A player token is required: pass --token or set `token` in the config file")
    }

    fn chart_source(&self, chart: &ChartArgs) -> anyhow::Result<ChartSource> {
        match (chart.source.song, &chart.source.song_file) {
            (Some(song_id), _) => Ok(ChartSource::Api(
                ChartQuery::builder()
                    .song_id(song_id)
                    .difficulty(chart.difficulty)
                    .song_type(chart.song_type)
                    .version(self.version)
                    .build(),
            )),
            (None, Some(path)) => {
                let song = decode_str(&fs_err::read_to_string(path)?)
                    .with_context(|| format!("While reading a song from {path:?}"))?;
                Ok(ChartSource::File(*extract_notes(
                    &song,
                    chart.difficulty,
                    chart.song_type,
                )?))
            }
            (None, None) => bail!("Either --song or --song-file must be given"),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let config = match &opts.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let base_url = match config.base_url() {
        Some(url) => url.clone(),
        None => Url::parse(DEFAULT_BASE_URL)?,
    };
    let session = Session {
        client: LxnsClient::with_transport(HttpTransport::new()?, base_url),
        token: opts.token.map(UserToken::from).or_else(|| config.token().clone()),
        version: opts.version.unwrap_or_else(|| config.game_version()),
    };
    let client = &session.client;
    let version = session.version;

    match opts.sub {
        Sub::Player => print_json(&client.player(session.token()?)?)?,
        Sub::Scores => {
            let scores = client.player_scores(session.token()?)?;
            info!("Fetched {} scores", scores.len());
            print_json(&scores)?
        }
        Sub::Songs { notes } => {
            let list = client.song_list(version, notes)?;
            info!(
                "Fetched {} songs, {} genres, {} versions",
                list.songs().len(),
                list.genres().len(),
                list.versions().len()
            );
            print_json(&list)?
        }
        Sub::Song { id } => print_json(&client.song(id, version)?)?,
        Sub::Aliases => print_json(&client.alias_list()?)?,
        Sub::Icons(args) => print_json(&client.icon_list(version, args.required)?)?,
        Sub::Plates(args) => print_json(&client.plate_list(version, args.required)?)?,
        Sub::Frames(args) => print_json(&client.frame_list(version, args.required)?)?,
        Sub::Icon { id } => print_json(&client.collection(CollectionKind::Icon, id, version)?)?,
        Sub::Plate { id } => print_json(&client.collection(CollectionKind::Plate, id, version)?)?,
        Sub::Frame { id } => print_json(&client.collection(CollectionKind::Frame, id, version)?)?,
        Sub::CollectionGenres => print_json(&client.collection_genre_list(version)?)?,
        Sub::CollectionGenre { id } => print_json(&client.collection_genre(id, version)?)?,
        Sub::Notes(chart) => {
            let notes = match session.chart_source(&chart)? {
                ChartSource::Api(query) => song_notes(client, query)?,
                ChartSource::File(notes) => notes,
            };
            info!("Equivalent note count: {}", equivalent_note_count(&notes));
            print_json(&notes)?
        }
        Sub::Loss {
            chart,
            kind,
            judgement,
        } => {
            let loss = match session.chart_source(&chart)? {
                ChartSource::Api(query) => song_achievement_loss(client, query, kind, judgement)?,
                ChartSource::File(notes) => achievement_loss(&notes, kind, judgement)?,
            };
            println!("{kind} {judgement}: {loss}");
        }
        Sub::TotalLoss { chart, breakdown } => {
            let total = match session.chart_source(&chart)? {
                ChartSource::Api(query) => song_total_achievement_loss(client, query, &breakdown)?,
                ChartSource::File(notes) => total_achievement_loss(&notes, &breakdown)?,
            };
            println!("{total}");
        }
    }

    Ok(())
}
