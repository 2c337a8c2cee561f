mod script;

use std::path::{Path, PathBuf};

use api::reducer::GenerationPhase;
use api::{ApiClient, ApiConfig, ApiError, BlueprintUpdate, GenerationState};
use clap::{Args, Parser, Subcommand};
use scene::overlay::{OverlayOptions, build_overlay, render_ascii};
use scene::render::build_room;
use scene::{Engine, PropPlacement, PropRegistry, RoomBlueprint, WorldPos, validate_blueprint};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
enum OfficeError {
    #[error("read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("blueprint: {0}")]
    Blueprint(#[from] scene::BlueprintError),
    #[error("backend: {0}")]
    Api(#[from] ApiError),
    #[error(transparent)]
    Script(#[from] script::ScriptError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("blueprint has {0} layout error(s)")]
    InvalidLayout(usize),
    #[error("--push needs a --blueprint-id source")]
    PushWithoutBackend,
    #[error("generation {0}")]
    Generation(String),
}

#[derive(Parser, Debug)]
#[command(name = "office", about = "Room layout engine and office backend client")]
struct Cli {
    #[arg(long, global = true, env = "OFFICE_API_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print positioned scene nodes for a room.
    Render {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        origin_x: f64,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        origin_z: f64,
    },
    /// Print the grid debug overlay.
    Overlay {
        #[command(flatten)]
        source: SourceArgs,
        /// Print an ASCII map instead of JSON markers.
        #[arg(long, default_value_t = false)]
        ascii: bool,
        #[arg(long, default_value_t = false)]
        coordinates: bool,
        #[arg(long, default_value_t = false)]
        prop_ids: bool,
    },
    /// Check a blueprint for layout errors.
    Validate {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Replay a scripted input session against a room.
    Move {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, help = "Script path, or - for stdin")]
        script: String,
        /// Save the committed layout back to the backend.
        #[arg(long, default_value_t = false)]
        push: bool,
        /// Write the final blueprint to this file.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List rooms.
    Rooms,
    /// List blueprints, optionally for one room.
    Blueprints {
        #[arg(long)]
        room_id: Option<String>,
    },
    /// List generated props saved on the backend.
    SavedProps,
    /// Stream a prop generation. Ctrl-C cancels.
    Generate {
        prompt: String,
        #[arg(long)]
        model: Option<String>,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Blueprint JSON file.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Blueprint stored on the backend.
    #[arg(long)]
    blueprint_id: Option<String>,
}

/// A loaded room plus the registry that can draw it.
struct Room {
    blueprint: RoomBlueprint,
    registry: PropRegistry,
}

#[tokio::main]
async fn main() -> Result<(), OfficeError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("ignoring .env: {e}");
        }
    }
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let base_url = cli.base_url;
    let api = || -> Result<ApiClient, OfficeError> {
        let mut config = ApiConfig::from_env()?;
        if let Some(url) = &base_url {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        Ok(ApiClient::new(config)?)
    };

    match cli.command {
        Command::Render { source, origin_x, origin_z } => {
            let room = load(&source, &api).await?;
            let origin = WorldPos::new(origin_x, 0.0, origin_z);
            print_json(&build_room(&room.blueprint, origin, &room.registry, None))
        }
        Command::Overlay { source, ascii, coordinates, prop_ids } => {
            let room = load(&source, &api).await?;
            if ascii {
                print!("{}", render_ascii(&room.blueprint));
                return Ok(());
            }
            let options = OverlayOptions { show_coordinates: coordinates, show_prop_ids: prop_ids };
            print_json(&build_overlay(&room.blueprint, options))
        }
        Command::Validate { source } => {
            let room = load(&source, &api).await?;
            run_validate(&room)
        }
        Command::Move { source, script, push, out } => {
            if push && source.blueprint_id.is_none() {
                return Err(OfficeError::PushWithoutBackend);
            }
            let room = load(&source, &api).await?;
            let text = read_input(&script)?;
            let committed = run_script(room, &text, out.as_deref())?;
            match (push, committed, source.blueprint_id) {
                (true, Some(blueprint), Some(id)) => {
                    let saved = api()?.save_blueprint(&id, &BlueprintUpdate::layout(blueprint)).await?;
                    tracing::info!(id = %saved.id, "layout pushed");
                }
                (true, None, _) => tracing::info!("nothing committed; skipping push"),
                _ => {}
            }
            Ok(())
        }
        Command::Rooms => print_json(&api()?.list_rooms().await?),
        Command::Blueprints { room_id } => print_json(&api()?.list_blueprints(room_id.as_deref()).await?),
        Command::SavedProps => print_json(&api()?.list_saved_props().await?),
        Command::Generate { prompt, model } => run_generate(&api()?, &prompt, model.as_deref()).await,
    }
}

async fn load(
    source: &SourceArgs,
    api: &impl Fn() -> Result<ApiClient, OfficeError>,
) -> Result<Room, OfficeError> {
    let mut registry = PropRegistry::with_builtins();
    if let Some(path) = &source.file {
        let text = read_input(&path.to_string_lossy())?;
        return Ok(Room { blueprint: RoomBlueprint::from_json(&text)?, registry });
    }

    let client = api()?;
    let id = source.blueprint_id.as_deref().unwrap_or_default();
    let record = client.get_blueprint(id).await?;
    for warning in &record.warnings {
        tracing::warn!(%id, %warning, "blueprint warning");
    }
    match client.list_saved_props().await {
        Ok(saved) => saved.iter().for_each(|p| registry.register_generated(p)),
        Err(e) => tracing::warn!(error = %e, "saved props unavailable; generated props will be skipped"),
    }
    Ok(Room { blueprint: record.blueprint, registry })
}

fn run_validate(room: &Room) -> Result<(), OfficeError> {
    let report = validate_blueprint(&room.blueprint, &room.registry);
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    for error in &report.errors {
        println!("error: {error}");
    }
    if !report.is_valid() {
        return Err(OfficeError::InvalidLayout(report.errors.len()));
    }
    println!("ok");
    Ok(())
}

/// Replay `script` and print each step's outcome. Returns the final
/// blueprint when at least one layout change was committed.
fn run_script(room: Room, script: &str, out: Option<&Path>) -> Result<Option<RoomBlueprint>, OfficeError> {
    let steps = script::parse(script)?;
    let mut commits = 0usize;
    let mut engine = Engine::new(room.blueprint, room.registry, |placements: &[PropPlacement]| {
        commits += 1;
        tracing::info!(count = placements.len(), "placements committed");
    });

    for outcome in script::replay(&mut engine, &steps) {
        println!("{}", serde_json::to_string(&outcome)?);
    }

    let blueprint = engine.core.blueprint.clone();
    drop(engine);
    if let Some(path) = out {
        std::fs::write(path, blueprint.to_json_pretty()?)
            .map_err(|source| OfficeError::Read { path: path.to_path_buf(), source })?;
    }
    Ok((commits > 0).then_some(blueprint))
}

async fn run_generate(client: &ApiClient, prompt: &str, model: Option<&str>) -> Result<(), OfficeError> {
    let mut stream = client.generate_prop_stream(prompt, model)?;
    let mut state = GenerationState::start(prompt);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            item = stream.recv() => {
                let Some(item) = item else {
                    state.close();
                    break;
                };
                match item {
                    Ok(event) => {
                        tracing::debug!(?event, "generation event");
                        state.apply(&event);
                        if !state.status.is_empty() {
                            tracing::info!(status = %state.status, "generation");
                        }
                    }
                    Err(e) => {
                        state.fail(&e);
                        break;
                    }
                }
            }
            _ = &mut ctrl_c => {
                stream.cancel();
                state.cancel();
                break;
            }
        }
    }

    for correction in &state.corrections {
        tracing::info!(%correction, "correction applied");
    }
    match (state.phase, state.result) {
        (GenerationPhase::Complete, Some(result)) => print_json(&result),
        (GenerationPhase::Cancelled, _) => Err(OfficeError::Generation("cancelled".into())),
        _ => Err(OfficeError::Generation(state.error.unwrap_or_else(|| "failed".into()))),
    }
}

fn read_input(path: &str) -> Result<String, OfficeError> {
    if path == "-" {
        return std::io::read_to_string(std::io::stdin())
            .map_err(|source| OfficeError::Read { path: PathBuf::from("-"), source });
    }
    std::fs::read_to_string(path).map_err(|source| OfficeError::Read { path: PathBuf::from(path), source })
}

fn print_json(value: &impl Serialize) -> Result<(), OfficeError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
