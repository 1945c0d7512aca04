//! Pokémon Finder - catalog search TUI

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{EffectContext, EffectStoreLike, EffectStoreWithMiddleware, Keybindings, TaskKey};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokefinder::action::Action;
use pokefinder::api;
use pokefinder::config::{Config, DEFAULT_API_BASE, DEFAULT_CATALOG_LIMIT, DEFAULT_SPRITE_BASE};
use pokefinder::effect::Effect;
use pokefinder::logging;
use pokefinder::reducer::reducer;
use pokefinder::state::{AppState, SPINNER_TICK_MS};
use pokefinder::ui::{build_bus, FinderContext, FinderUi};

/// Search the PokeAPI catalog and inspect entries
#[derive(Parser, Debug)]
#[command(name = "pokefinder")]
#[command(about = "Search the PokeAPI catalog from the terminal")]
struct Args {
    /// PokeAPI base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Number of catalog entries to request
    #[arg(long, default_value_t = DEFAULT_CATALOG_LIMIT, value_parser = clap::value_parser!(u32).range(1..))]
    limit: u32,

    /// Base URL for front-default artwork (`{base}/{id}.png`)
    #[arg(long, default_value = DEFAULT_SPRITE_BASE)]
    sprite_base: String,

    /// Log file (defaults to pokefinder.log in the temp dir)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        api_base,
        limit,
        sprite_base,
        log_file,
        debug: debug_args,
    } = Args::parse();

    let log_path = log_file.unwrap_or_else(logging::default_log_path);
    if let Err(e) = logging::init(&log_path) {
        eprintln!("Warning: logging disabled ({}): {e}", log_path.display());
    }

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let config = Config {
        api_base,
        catalog_limit: limit,
        sprite_base,
    };
    tracing::info!(?config, "starting");

    let state = debug
        .load_state_or_else_async(move || async move {
            let mut state = AppState::new(config);
            if let Ok(size) = crossterm::terminal::size() {
                state.terminal_size = size;
            }
            Ok::<AppState, io::Error>(state)
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    tracing::info!("exiting");
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(FinderUi::new()));
    let mut bus = build_bus(&ui);
    let keybindings: Keybindings<FinderContext> = Keybindings::new();

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(SPINNER_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadCatalog { url } => {
            ctx.tasks().spawn(TaskKey::new("catalog"), async move {
                match api::fetch_catalog(&url).await {
                    Ok(entries) => Action::CatalogDidLoad(entries),
                    Err(e) => {
                        tracing::error!(%url, error = %e, "catalog request failed");
                        Action::CatalogDidError(e.to_string())
                    }
                }
            });
        }
        Effect::LoadDetail { seq, url } => {
            ctx.tasks().spawn(TaskKey::new("detail"), async move {
                match api::fetch_pokemon_detail(&url).await {
                    Ok(detail) => Action::DetailDidLoad { seq, detail },
                    Err(e) => {
                        tracing::error!(%url, seq, error = %e, "detail request failed");
                        Action::DetailDidError {
                            seq,
                            error: e.to_string(),
                        }
                    }
                }
            });
        }
        Effect::LoadSprite { id, url } => {
            ctx.tasks().spawn(TaskKey::new("sprite"), async move {
                match api::fetch_sprite(&url).await {
                    Ok(sprite) => Action::SpriteDidLoad { id, sprite },
                    Err(e) => {
                        tracing::warn!(%url, id, error = %e, "sprite request failed");
                        Action::SpriteDidError {
                            id,
                            error: e.to_string(),
                        }
                    }
                }
            });
        }
        Effect::LoadCardSprite { id, url } => {
            let key = TaskKey::new(format!("card-sprite-{id}"));
            ctx.tasks().spawn(key, async move {
                match api::fetch_sprite(&url).await {
                    Ok(sprite) => Action::CardSpriteDidLoad { id, sprite },
                    Err(e) => Action::CardSpriteDidError {
                        id,
                        error: e.to_string(),
                    },
                }
            });
        }
        Effect::CancelDetail => {
            ctx.tasks().cancel(&TaskKey::new("detail"));
            ctx.tasks().cancel(&TaskKey::new("sprite"));
        }
    }
}
