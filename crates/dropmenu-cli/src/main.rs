//! dropmenu demo runner - replay the demo scenes headlessly.

#![allow(
    clippy::needless_pass_by_value,
    clippy::uninlined_format_args,
    clippy::too_many_lines,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::doc_markdown
)]

mod scenes;
mod script;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dropmenu::{
    ChainSnapshot, Container, DismissReason, Event, MenuError, MenuManager, MenuResponse,
    MenuStyle, MouseButton, Opened, Point, RecordingCanvas,
};
use scenes::{Preset, Scene, SharedLog};
use script::{parse_script, ScriptError, Step};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dropmenu-demo")]
#[command(about = "Replay cascading menu demo scenes without a window")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a scene's menu and feed it a script of inputs
    Run(RunArgs),

    /// List the available scenes
    List,

    /// Print a style preset, ready to edit and pass back with --style-file
    Style {
        /// Preset to print
        #[arg(value_enum, default_value = "simple")]
        preset: Preset,

        /// Output format
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: Format,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Scene to open
    #[arg(value_enum)]
    scene: Scene,

    /// Style preset in effect when the menu opens
    #[arg(short, long, value_enum, default_value = "simple")]
    style: Preset,

    /// YAML style file; overrides --style
    #[arg(long)]
    style_file: Option<PathBuf>,

    /// Inputs, e.g. "hover:Submenu;click:SubSubOpt 3;key:escape"
    #[arg(short = 'x', long, default_value = "")]
    script: String,

    /// Container width
    #[arg(long, default_value = "1280")]
    width: f32,

    /// Container height
    #[arg(long, default_value = "720")]
    height: f32,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid style file: {0}")]
    Style(#[from] serde_yaml_ng::Error),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bad script: {0}")]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Menu(#[from] MenuError),
    #[error("no open popup has a row labelled '{0}'")]
    MissingRow(String),
}

/// What a step did, in a printable form.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Outcome {
    Ignored,
    Consumed,
    Activated { label: String, path: Vec<usize> },
    Dismissed { reason: DismissReason },
    Waited { cascaded: bool },
}

impl From<MenuResponse> for Outcome {
    fn from(response: MenuResponse) -> Self {
        match response {
            MenuResponse::Ignored => Self::Ignored,
            MenuResponse::Consumed => Self::Consumed,
            MenuResponse::Activated(a) => Self::Activated {
                label: a.label,
                path: a.path.indices().to_vec(),
            },
            MenuResponse::Dismissed(reason) => Self::Dismissed { reason },
        }
    }
}

#[derive(Debug, Serialize)]
struct StepReport {
    step: String,
    outcome: Outcome,
}

#[derive(Debug, Serialize)]
struct RunReport {
    scene: String,
    style: String,
    opened: Opened,
    steps: Vec<StepReport>,
    log: Vec<String>,
    chain: ChainSnapshot,
    draw_commands: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => run(args),
        Commands::List => {
            list_scenes();
            Ok(())
        }
        Commands::Style { preset, format } => print_style(preset, format),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn list_scenes() {
    for scene in Scene::ALL {
        let name = scene
            .to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        println!("{:<10} {}", name, scene.caption());
    }
}

fn print_style(preset: Preset, format: Format) -> Result<(), CliError> {
    let style = preset.style();
    let text = match format {
        Format::Yaml => serde_yaml_ng::to_string(&style)?,
        Format::Json => serde_json::to_string_pretty(&style)?,
    };
    println!("{}", text);
    Ok(())
}

fn load_style(path: &Path) -> Result<MenuStyle, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let style = serde_yaml_ng::from_str(&content)?;
    info!(path = %path.display(), "loaded style file");
    Ok(style)
}

fn run(args: RunArgs) -> Result<(), CliError> {
    let steps = parse_script(&args.script)?;
    let log = SharedLog::default();
    let mut preset = args.style;
    let style = match &args.style_file {
        Some(path) => load_style(path)?,
        None => preset.style(),
    };

    let mut manager = MenuManager::with_style(style.into_handle());
    let container = Container::sized(args.width, args.height);
    let tree = scenes::build(args.scene, &log, preset)?;
    let opened = manager.create_dropdown_menu(&container, &tree, args.scene.anchor())?;

    let mut reports = Vec::with_capacity(steps.len());
    for step in &steps {
        let outcome = apply(&mut manager, step)?;
        debug!(%step, ?outcome, "step applied");
        // Callbacks only record the request; apply it once the manager is free
        let requested = log.borrow_mut().requested_style.take();
        if let Some(next) = requested {
            manager.set_current_style(next.style().into_handle());
            preset = next;
        }
        reports.push(StepReport {
            step: step.to_string(),
            outcome,
        });
    }

    let mut canvas = RecordingCanvas::new();
    manager.paint(&mut canvas);

    let report = RunReport {
        scene: args.scene.caption().to_string(),
        style: preset.caption().to_string(),
        opened,
        steps: reports,
        log: log.borrow().lines.clone(),
        chain: manager.chain_snapshot(),
        draw_commands: canvas.command_count(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn apply(manager: &mut MenuManager, step: &Step) -> Result<Outcome, CliError> {
    let outcome = match step {
        Step::Hover(label) => {
            let position = find_row(manager, label)?;
            manager.dispatch(&Event::MouseMove { position }).into()
        }
        Step::Click(label) => {
            let position = find_row(manager, label)?;
            manager.dispatch(&Event::MouseMove { position });
            let outcome = manager
                .dispatch(&Event::MouseDown {
                    position,
                    button: MouseButton::Left,
                })
                .into();
            manager.dispatch(&Event::MouseUp {
                position,
                button: MouseButton::Left,
            });
            outcome
        }
        Step::Key(key) => manager.dispatch(&Event::KeyDown { key: *key }).into(),
        Step::Scroll(notches) => manager.dispatch(&Event::Scroll { delta_y: *notches }).into(),
        Step::Wait(ms) => Outcome::Waited {
            cascaded: manager.update(Duration::from_millis(*ms)),
        },
        Step::Outside => {
            let position = outside_point(manager);
            manager
                .dispatch(&Event::MouseDown {
                    position,
                    button: MouseButton::Left,
                })
                .into()
        }
        Step::Resize(width, height) => manager
            .dispatch(&Event::Resize {
                width: *width,
                height: *height,
            })
            .into(),
    };
    Ok(outcome)
}

/// Center of the row labelled `label`, searching the deepest popup first
/// and scrolling the row into view when it is hidden.
fn find_row(manager: &mut MenuManager, label: &str) -> Result<Point, CliError> {
    let found = manager
        .popups()
        .iter()
        .rev()
        .find_map(|popup| popup.row_index(label).map(|row| (popup.depth(), row)));
    found
        .and_then(|(depth, row)| manager.reveal_row(depth, row))
        .ok_or_else(|| CliError::MissingRow(label.to_string()))
}

/// A container point not covered by any popup.
fn outside_point(manager: &MenuManager) -> Point {
    let b = manager.container().bounds;
    let corners = [
        Point::new(b.right() - 1.0, b.bottom() - 1.0),
        Point::new(b.right() - 1.0, b.y),
        Point::new(b.x, b.bottom() - 1.0),
        Point::new(b.x, b.y),
    ];
    corners
        .into_iter()
        .find(|p| {
            !manager
                .popups()
                .iter()
                .any(|popup| popup.bounds().contains_point(p))
        })
        .unwrap_or(Point::new(b.right() + 1.0, b.bottom() + 1.0))
}

fn print_report(report: &RunReport) {
    println!("{}", report.style);
    let o = &report.opened;
    println!(
        "Opened '{}' at ({:.0}, {:.0}) {:.0}x{:.0}{}{}",
        report.scene,
        o.bounds.x,
        o.bounds.y,
        o.bounds.width,
        o.bounds.height,
        if o.scrollable { " [scrollable]" } else { "" },
        if o.anchor_clamped { " [anchor clamped]" } else { "" },
    );

    for step in &report.steps {
        let outcome = match &step.outcome {
            Outcome::Ignored => "ignored".to_string(),
            Outcome::Consumed => "consumed".to_string(),
            Outcome::Activated { label, .. } => format!("activated '{}'", label),
            Outcome::Dismissed { reason } => format!("dismissed ({:?})", reason),
            Outcome::Waited { cascaded: true } => "waited, submenu opened".to_string(),
            Outcome::Waited { cascaded: false } => "waited".to_string(),
        };
        println!("> {} -> {}", step.step, outcome);
    }

    for line in &report.log {
        println!("log: {}", line);
    }

    let chain = &report.chain;
    if chain.popups.is_empty() {
        println!("Menu closed");
        return;
    }
    println!(
        "Open popups: {} ({} draw commands)",
        chain.popups.len(),
        report.draw_commands
    );
    for popup in &chain.popups {
        let b = popup.bounds;
        println!(
            "  [{}] layer {} at ({:.0}, {:.0}) {:.0}x{:.0}{}",
            popup.depth,
            popup.layer,
            b.x,
            b.y,
            b.width,
            b.height,
            if popup.scrollable {
                format!(" scroll {:.0}", popup.scroll_offset)
            } else {
                String::new()
            },
        );
        for (i, label) in popup.rows.iter().enumerate() {
            let mark = if popup.open_child == Some(i) {
                '+'
            } else if popup.highlighted == Some(i) {
                '*'
            } else {
                ' '
            };
            println!("      {} {}", mark, label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(scene: Scene) -> (MenuManager, SharedLog) {
        let log = SharedLog::default();
        let mut manager = MenuManager::new();
        let tree = scenes::build(scene, &log, Preset::Simple).unwrap();
        manager
            .create_dropdown_menu(&Container::sized(1280.0, 720.0), &tree, scene.anchor())
            .unwrap();
        (manager, log)
    }

    #[test]
    fn test_readme_script_runs_loop_callback() {
        let (mut manager, log) = open(Scene::Readme);
        for step in parse_script("hover:Submenu;click:SubSubOpt 7").unwrap() {
            apply(&mut manager, &step).unwrap();
        }
        assert!(!manager.is_open());
        assert_eq!(log.borrow().lines, vec!["7".to_string()]);
    }

    #[test]
    fn test_missing_row_is_an_error() {
        let (mut manager, _log) = open(Scene::Simple);
        let err = apply(&mut manager, &Step::Hover("Nope".to_string())).unwrap_err();
        assert!(matches!(err, CliError::MissingRow(_)));
    }

    #[test]
    fn test_click_reaches_row_below_the_fold() {
        let (mut manager, _log) = open(Scene::Tall);
        let outcome = apply(&mut manager, &Step::Click("Option 50".to_string())).unwrap();
        match outcome {
            Outcome::Activated { label, path } => {
                assert_eq!(label, "Option 50");
                assert_eq!(path, vec![50]);
            }
            other => panic!("expected activation, got {other:?}"),
        }
    }

    #[test]
    fn test_outside_point_dismisses() {
        let (mut manager, _log) = open(Scene::Tall);
        let outcome = apply(&mut manager, &Step::Outside).unwrap();
        assert!(matches!(
            outcome,
            Outcome::Dismissed {
                reason: DismissReason::OutsideClick
            }
        ));
    }

    #[test]
    fn test_style_pick_is_recorded() {
        let (mut manager, log) = open(Scene::Style);
        apply(&mut manager, &Step::Click("Skeuo".to_string())).unwrap();
        assert_eq!(log.borrow().requested_style, Some(Preset::Skeuo));
    }

    #[test]
    fn test_outcome_json_is_tagged() {
        let json = serde_json::to_string(&Outcome::Dismissed {
            reason: DismissReason::Cancelled,
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"dismissed","reason":"Cancelled"}"#);
    }
}
