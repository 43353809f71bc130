use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use sleigh_packer::render;
use sleigh_packer::score::score;
use sleigh_packer::stack::write_submission;
use sleigh_packer::{
    Alignment, Bounds, Catalog, Direction, IdOrder, Orientation, PackConfig, Solver, Strategy,
    Validator,
};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "sleigh_packer",
    about = "Layered box packer for a fixed-floor container"
)]
struct Cli {
    /// Catalog CSV with PresentId,Dimension1,Dimension2,Dimension3 rows
    #[arg(long)]
    presents: PathBuf,

    /// Write the eight-vertex CSV here
    #[arg(long)]
    output: Option<PathBuf>,

    /// Container extent along x
    #[arg(long, default_value_t = 1000)]
    max_x: u32,

    /// Container extent along y
    #[arg(long, default_value_t = 1000)]
    max_y: u32,

    /// Placement strategy: maxrects or cursor
    #[arg(long, default_value = "maxrects", value_parser = parse_strategy)]
    strategy: Strategy,

    /// Stacking direction: bottom-up or top-down
    #[arg(long, default_value = "bottom-up", value_parser = parse_direction)]
    direction: Direction,

    /// Item alignment inside a closed layer: bottom or top
    #[arg(long, default_value = "bottom", value_parser = parse_alignment)]
    align: Alignment,

    /// Turn every item so its shortest side is vertical
    #[arg(long)]
    shortest_up: bool,

    /// Feed the catalog last record first
    #[arg(long)]
    reverse: bool,

    /// Write output rows in descending id order
    #[arg(long)]
    descending: bool,

    /// Show an ASCII layout of the first N layers
    #[arg(long, default_value_t = 0)]
    layout: usize,

    /// Skip validation of the finished stack
    #[arg(long)]
    no_check: bool,

    /// Log layer closures
    #[arg(short, long)]
    verbose: bool,
}

fn parse_strategy(s: &str) -> Result<Strategy, String> {
    match s {
        "maxrects" => Ok(Strategy::MaxRects),
        "cursor" => Ok(Strategy::Cursor),
        _ => Err(format!(
            "invalid strategy '{}', expected: maxrects or cursor",
            s
        )),
    }
}

fn parse_direction(s: &str) -> Result<Direction, String> {
    match s {
        "bottom-up" => Ok(Direction::BottomUp),
        "top-down" => Ok(Direction::TopDown),
        _ => Err(format!(
            "invalid direction '{}', expected: bottom-up or top-down",
            s
        )),
    }
}

fn parse_alignment(s: &str) -> Result<Alignment, String> {
    match s {
        "bottom" => Ok(Alignment::Bottom),
        "top" => Ok(Alignment::Top),
        _ => Err(format!("invalid alignment '{}', expected: bottom or top", s)),
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    if cli.max_x == 0 || cli.max_y == 0 {
        fail("container dimensions must be non-zero");
    }

    let catalog = Catalog::from_path(&cli.presents).unwrap_or_else(|e| fail(e));

    let config = PackConfig {
        bounds: Bounds::new(cli.max_x, cli.max_y),
        expected_count: Some(catalog.len()),
        strategy: cli.strategy,
        direction: cli.direction,
        alignment: cli.align,
        orientation: if cli.shortest_up {
            Orientation::ShortestUp
        } else {
            Orientation::AsGiven
        },
    };

    let solver = Solver::new(config);
    let packed = if cli.reverse {
        solver.solve(catalog.iter().rev())
    } else {
        solver.solve(catalog.iter())
    };
    let stack = packed.unwrap_or_else(|e| fail(e));

    for (i, layer) in stack.layers().iter().take(cli.layout).enumerate() {
        println!(
            "Layer {} (z {}..{}, {} items):",
            i + 1,
            layer.z,
            layer.max_z,
            layer.len()
        );
        print!("{}", render::render_layer(config.bounds, layer));
        println!();
    }

    if !cli.no_check {
        let expected = config.expected_count.unwrap_or(catalog.len());
        let report = Validator::new(&catalog, config.bounds, expected).validate(&stack);
        if !report.is_clean() {
            for finding in &report.findings {
                eprintln!("  {}", finding);
            }
            fail(format!(
                "stack failed validation with {} finding{}",
                report.findings.len(),
                if report.findings.len() == 1 { "" } else { "s" }
            ));
        }
    }

    if let Some(path) = &cli.output {
        let order = if cli.descending {
            IdOrder::Descending
        } else {
            IdOrder::Ascending
        };
        let file = File::create(path).unwrap_or_else(|e| fail(e));
        write_submission(&stack, order, BufWriter::new(file)).unwrap_or_else(|e| fail(e));
        tracing::info!(path = %path.display(), "Wrote placements");
    }

    let s = score(&stack);
    println!(
        "Summary: {} item{} in {} layer{}, height {}, score {}",
        stack.item_count(),
        if stack.item_count() == 1 { "" } else { "s" },
        stack.layers().len(),
        if stack.layers().len() == 1 { "" } else { "s" },
        s.max_z,
        s.total,
    );
}
