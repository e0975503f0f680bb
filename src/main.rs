use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use ricochet_solver::{Color, ColorSet, PuzzleFile, Report, Request, Solver, SolverConfig, Target};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Finds the shortest sequence of slides that brings a robot onto its target.
#[derive(Parser, Debug)]
#[command(name = "ricochet_solver", version, about)]
struct Args {
    /// Puzzle file (JSON)
    puzzle: PathBuf,

    /// Target as "COLOR row col"; overrides the target stored in the puzzle
    #[arg(short, long)]
    target: Option<String>,

    /// Only these robots may move (comma separated); runs a single search
    #[arg(short, long, value_delimiter = ',')]
    movable: Option<Vec<String>>,

    /// Depth limit of the single search
    #[arg(long)]
    max_depth: Option<u32>,

    /// Solver settings (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Depth limit per helper count, e.g. "32,16,10,7"
    #[arg(long)]
    schedule: Option<String>,

    /// Run explore trials on all cores
    #[arg(long)]
    parallel: bool,

    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Draw the board before and after the moves
    #[arg(long)]
    show_board: bool,
}

fn load_config(args: &Args) -> Result<SolverConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SolverConfig::default(),
    };
    if let Some(schedule) = &args.schedule {
        config.depth_schedule = SolverConfig::parse_schedule(schedule)?;
    }
    if args.parallel {
        config.parallel = true;
    }
    Ok(config)
}

fn build_request(args: &Args, stored: Option<Request>) -> Result<Request> {
    let mut request = match (&args.target, stored) {
        (Some(text), stored) => {
            let target: Target = text.parse()?;
            let mut request = stored.unwrap_or_else(|| Request::new(target));
            request.target = target;
            request
        }
        (None, Some(stored)) => stored,
        (None, None) => bail!("the puzzle has no target; pass --target \"COLOR row col\""),
    };

    if let Some(names) = &args.movable {
        let mut movable = ColorSet::EMPTY;
        for name in names {
            let color = Color::from_initial(name)
                .with_context(|| format!("unknown color {name:?}"))?;
            movable.insert(color);
        }
        request.movable = Some(movable);
    }
    if args.max_depth.is_some() {
        request.max_depth = args.max_depth;
    }
    Ok(request)
}

fn print_text(solver: &Solver, report: &Report, show_board: bool) {
    if show_board {
        println!("{}", solver.board().render(&report.start, Some(report.target)));
    }
    match &report.path {
        None => println!("No solution within budget"),
        Some(path) if path.is_empty() => {
            println!("{} robot is already on {}", report.color, report.target)
        }
        Some(path) => {
            for (i, mv) in path.moves().iter().enumerate() {
                println!("{:>2}. {mv}", i + 1);
            }
            if show_board {
                let states = path.replay(solver.table(), &report.start);
                if let Some(last) = states.last() {
                    println!("\n{}", solver.board().render(last, Some(report.target)));
                }
            }
        }
    }
    println!("{}", report.stats);
}

fn run(args: &Args) -> Result<bool> {
    let text = fs::read_to_string(&args.puzzle)
        .with_context(|| format!("reading puzzle {}", args.puzzle.display()))?;
    let puzzle = PuzzleFile::from_json(&text)
        .with_context(|| format!("parsing puzzle {}", args.puzzle.display()))?
        .into_puzzle()?;

    let request = build_request(args, puzzle.request)?;
    let solver = Solver::new(puzzle.board, load_config(args)?)?;
    let report = solver.solve(&puzzle.robots, &request)?;

    match args.format {
        OutputFormat::Text => print_text(&solver, &report, args.show_board),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(report.is_solved())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
