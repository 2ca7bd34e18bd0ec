//! Flowboard CLI - edit workflow projects from the terminal.
//!
//! Projects are plain JSON files. Scripts and the REPL speak the same JSON
//! command/query language as the `api` crate.

mod logger;

use anyhow::{Context, Result};
use api::{process_message, Query};
use canvas::{keymap, svg, Canvas, CanvasConfig, CanvasEvent};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use node::Project;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use theme::{Theme, ThemeKind};
use ui::node_palette;

/// Flowboard - headless workflow canvas editor
#[derive(Parser)]
#[command(name = "flowboard")]
#[command(about = "Build agent workflows from the command line")]
struct Cli {
    /// Canvas config file (default: ~/.flowboard/config.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Color theme used when rendering
    #[arg(long, global = true, value_enum, default_value_t = ThemeArg::Light)]
    theme: ThemeArg,

    /// Log more (-v info, -vv debug, -vvv trace) and echo logs to stderr
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for ThemeKind {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => ThemeKind::Light,
            ThemeArg::Dark => ThemeKind::Dark,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty project
    New {
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a script of JSON commands/queries, one per line
    Run {
        script: PathBuf,

        /// Project to start from (default: a new empty project)
        #[arg(long)]
        project: Option<PathBuf>,

        /// Where to save the resulting project
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also render the result as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Edit a project interactively
    Repl {
        #[arg(long)]
        project: Option<PathBuf>,
    },

    /// Render a project as SVG
    Render {
        project: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the node palette
    Palette,

    /// List keyboard shortcuts
    Keys,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = logger::level_for_verbosity(cli.verbose);
    if let Err(e) = logger::FlowboardLogger::init(level, cli.verbose > 0) {
        eprintln!("warning: logging disabled: {e:#}");
    }

    let theme = Theme::from_kind(cli.theme.into());

    match cli.command {
        Commands::New {
            name,
            description,
            output,
        } => new_project(&name, &description, output.as_deref()),
        Commands::Run {
            script,
            project,
            output,
            svg,
        } => {
            let config = load_config(cli.config.as_deref())?;
            run_script(
                &script,
                project.as_deref(),
                config,
                &theme,
                output.as_deref(),
                svg.as_deref(),
            )
        }
        Commands::Repl { project } => {
            let config = load_config(cli.config.as_deref())?;
            repl(project.as_deref(), config, &theme)
        }
        Commands::Render { project, output } => {
            let config = load_config(cli.config.as_deref())?;
            render_project(&project, config, &theme, output.as_deref())
        }
        Commands::Palette => {
            print_palette();
            Ok(())
        }
        Commands::Keys => {
            print_keys();
            Ok(())
        }
    }
}

/// Explicit config file, else `~/.flowboard/config.json` if it exists, else
/// defaults.
fn load_config(explicit: Option<&Path>) -> Result<CanvasConfig> {
    if let Some(path) = explicit {
        return CanvasConfig::load(path);
    }
    let default_path = dirs::home_dir().map(|home| home.join(".flowboard").join("config.json"));
    match default_path {
        Some(path) if path.exists() => CanvasConfig::load(&path),
        _ => Ok(CanvasConfig::default()),
    }
}

fn open_canvas(project: Option<&Path>, config: CanvasConfig) -> Result<Canvas> {
    let project = match project {
        Some(path) => Project::load(path)?,
        None => Project::new("Untitled", ""),
    };
    log::info!(
        "Opened project {:?} with {} nodes and {} connections",
        project.name,
        project.nodes.len(),
        project.connections.len()
    );

    let mut canvas = Canvas::with_config(project, config);
    canvas.subscribe(|event, project| match event {
        CanvasEvent::ProjectUpdated => log::debug!(
            "Project updated at {} ({} nodes, {} connections)",
            project.updated_at,
            project.nodes.len(),
            project.connections.len()
        ),
        other => log::trace!("{:?}", other),
    });
    Ok(canvas)
}

fn write_output(output: Option<&Path>, contents: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", contents);
            Ok(())
        }
    }
}

fn new_project(name: &str, description: &str, output: Option<&Path>) -> Result<()> {
    let project = Project::new(name, description);
    match output {
        Some(path) => {
            project.save(path)?;
            println!("Created {}", path.display());
            Ok(())
        }
        None => write_output(None, &project.to_json()?),
    }
}

fn run_script(
    script: &Path,
    project: Option<&Path>,
    config: CanvasConfig,
    theme: &Theme,
    output: Option<&Path>,
    svg_output: Option<&Path>,
) -> Result<()> {
    let contents = std::fs::read_to_string(script)
        .with_context(|| format!("Failed to read script: {}", script.display()))?;
    let mut canvas = open_canvas(project, config)?;

    logger::log_section(&format!("script {}", script.display()));
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        println!("{}", process_message(&mut canvas, line));
    }

    if let Some(path) = svg_output {
        std::fs::write(path, svg::render(&canvas, theme)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let project = canvas.into_project();
    match output {
        Some(path) => project.save(path),
        None => Ok(()),
    }
}

fn render_project(
    project: &Path,
    config: CanvasConfig,
    theme: &Theme,
    output: Option<&Path>,
) -> Result<()> {
    let canvas = open_canvas(Some(project), config)?;
    write_output(output, &svg::render(&canvas, theme)?)
}

fn repl(project: Option<&Path>, config: CanvasConfig, theme: &Theme) -> Result<()> {
    let mut canvas = open_canvas(project, config)?;
    logger::log_section("repl");

    println!("Enter commands (JSON) or 'help' for usage. 'quit' to exit.\n");
    let stdin = std::io::stdin();

    loop {
        print!("flowboard> ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let response = match input {
            "help" | "?" => {
                print_help();
                continue;
            }
            "quit" | "exit" => break,
            "palette" => {
                print_palette();
                continue;
            }
            "svg" => {
                println!("{}", svg::render(&canvas, theme)?);
                continue;
            }
            "nodes" => query(&mut canvas, Query::GetNodes)?,
            "connections" => query(&mut canvas, Query::GetConnections)?,
            "selection" => query(&mut canvas, Query::GetState)?,
            _ => process_message(&mut canvas, input),
        };
        print_pretty(&response)?;
    }

    if let Some(path) = project {
        canvas.project().save(path)?;
        println!("Saved {}", path.display());
    }
    Ok(())
}

fn query(canvas: &mut Canvas, query: Query) -> Result<String> {
    Ok(process_message(canvas, &serde_json::to_string(&query)?))
}

fn print_pretty(response: &str) -> Result<()> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(response) {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", response.trim());
    }
    Ok(())
}

fn print_help() {
    println!("Flowboard Interactive Mode");
    println!("==========================");
    println!();
    println!("Built-in commands:");
    println!("  nodes        - List nodes");
    println!("  connections  - List connections");
    println!("  selection    - Show selection, connecting-mode and palette state");
    println!("  palette      - List the node palette");
    println!("  svg          - Render the canvas as SVG");
    println!("  help, ?      - Show this help");
    println!("  quit, exit   - Exit (saves when started with --project)");
    println!();
    println!("JSON Commands (examples):");
    println!("  {{\"type\": \"add_from_palette\", \"label\": \"Webhook\"}}");
    println!("  {{\"type\": \"connect\", \"source\": {{\"label\": \"Webhook\"}}, \"target\": {{\"index\": 1}}}}");
    println!("  {{\"type\": \"update_node\", \"node\": \"selection\", \"temperature\": 0.3}}");
    println!("  {{\"type\": \"key\", \"keys\": \"escape\"}}");
    println!();
    println!("JSON Queries:");
    println!("  {{\"type\": \"get_state\"}}");
    println!("  {{\"type\": \"get_nodes\"}}");
    println!("  {{\"type\": \"get_project\"}}");
}

fn print_palette() {
    for category in node_palette::categories() {
        println!("{}", category.title);
        for template in category.templates {
            println!(
                "  {:<18} {:<14} {}",
                template.label, template.icon, template.description
            );
        }
    }
}

fn print_keys() {
    for binding in keymap::canvas_bindings() {
        println!("  {:<10} {}", binding.label(), binding.description);
    }
}
