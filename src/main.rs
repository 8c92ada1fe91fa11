//! bkgen command-line front end
//!
//! Reads a word file, cleans it, builds a BK-tree and reports statistics.
//!
//! ```bash
//! bkgen --file words.txt --dist jaro --threads 8 --json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use bkgen::{BkTreeBuilder, BuildConfig, Metric, TreeNode, WordList};
use clap::Parser;
use tracing::{error, info};

/// Build a BK-tree from a word list
#[derive(Parser, Debug)]
#[command(name = "bkgen", version)]
#[command(about = "Build a BK-tree from a word list under a selectable edit distance")]
struct Args {
    /// Text file with whitespace-separated words
    #[arg(long, short = 'f')]
    file: PathBuf,

    /// Metric: levenshtein (lev), hamming (ham), jaccard (jac) or jaro-winkler (jar)
    #[arg(long, short = 'd', default_value = "levenshtein")]
    dist: String,

    /// Worker threads for large lists (defaults to available parallelism)
    #[arg(long, short = 't', env = "BKGEN_THREADS")]
    threads: Option<usize>,

    /// Lists at or below this size are built on a single thread
    #[arg(long, default_value_t = bkgen::config::DEFAULT_PARALLEL_THRESHOLD)]
    parallel_threshold: usize,

    /// Print build statistics as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Print the tree as an indented outline on stdout
    #[arg(long)]
    outline: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bkgen=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let metric: Metric = args.dist.parse()?;

    let text = std::fs::read_to_string(&args.file)
        .map_err(|e| format!("cannot read {}: {e}", args.file.display()))?;
    let words = WordList::parse(&text)?;
    info!(file = %args.file.display(), words = words.len(), %metric, "Loaded word list");

    let mut config = BuildConfig::default().with_parallel_threshold(args.parallel_threshold);
    if let Some(threads) = args.threads {
        config = config.with_parallelism(threads);
    }

    let output = BkTreeBuilder::new(metric)
        .config(config)
        .build(words.as_slice())?;

    if let Some((name, weight)) = output.root.find_weight_collision() {
        return Err(format!("node '{name}' has two children at weight {weight}").into());
    }

    info!(
        root = %output.root.name,
        node_count = output.node_count,
        max_depth = output.max_depth,
        "Tree is a valid BK-tree"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output.stats())?);
    }
    if args.outline {
        print!("{}", outline(&output.root));
    }
    Ok(())
}

/// One line per node, indented by depth, with the edge weight in brackets.
fn outline(root: &TreeNode) -> String {
    let mut out = String::new();
    for (node, depth) in root.iter() {
        for _ in 0..depth {
            out.push_str("  ");
        }
        if depth == 0 {
            out.push_str(&node.name);
        } else {
            out.push_str(&format!("[{}] {}", node.weight, node.name));
        }
        out.push('\n');
    }
    out
}
