use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde_json::json;

use louvain_community::community::read_partition_file;
use louvain_community::logger::init_logger;
use louvain_community::{generate_dendrogram, modularity, CommunityError, Settings, WeightedGraph};

/// Find the communities of a graph and print them with their modularity.
#[derive(Parser, Debug)]
#[command(name = "louvain", version)]
struct Args {
    /// Graph file, binary as generated by the convert utility unless --text.
    filename: Option<PathBuf>,

    /// Read the graph as a .graph text file.
    #[arg(long)]
    text: bool,

    /// Yaml settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from this partition, one `<vertex> <community>` pair per line.
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Print this dendrogram level instead of the last one.
    #[arg(long)]
    level: Option<usize>,

    /// Maximum number of passes per level.
    #[arg(long)]
    pass_max: Option<usize>,

    /// Print the dendrogram and the partition as json.
    #[arg(long)]
    json: bool,
}

fn print_usage() {
    eprintln!("Usage : louvain [OPTIONS] <FILENAME>");
    eprintln!("find the communities in graph filename and display the dendrogram");
    eprintln!("Parameters:");
    eprintln!("filename is a binary file as generated by the");
    eprintln!("convert utility distributed with the C implementation,");
    eprintln!("or a .graph text file with --text");
}

fn load_graph(path: &Path, text: bool) -> louvain_community::Result<WeightedGraph> {
    if text {
        WeightedGraph::from_graph_file(path)
    } else {
        WeightedGraph::from_binary_file(path)
    }
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::from_yaml_file(path)
            .with_context(|| format!("failed to read settings {}", path.display()))?,
        None => Settings::default(),
    };
    // Flags win over the file.
    if args.pass_max.is_some() {
        settings.louvain.pass_max = args.pass_max;
    }
    settings.json |= args.json;
    Ok(settings)
}

fn run(args: &Args, settings: &Settings, graph: &WeightedGraph) -> Result<()> {
    let seed = match &args.seed {
        Some(path) => Some(read_partition_file(path)
            .with_context(|| format!("failed to read seed partition {}", path.display()))?),
        None => None,
    };

    let dendrogram = generate_dendrogram(graph, seed.as_ref(), &settings.louvain)?;
    let level = args.level.unwrap_or(dendrogram.len().saturating_sub(1));
    let partition = dendrogram.partition_at_level(level)?;
    let score = match modularity(&partition, graph) {
        Ok(score) => Some(score),
        Err(CommunityError::UndefinedModularity) => None,
        Err(e) => return Err(e.into()),
    };
    info!("Level {} of {}: modularity {:?}", level, dendrogram.len(), score);

    if settings.json {
        let output = json!({
            "modularity": score,
            "level": level,
            "partition": partition,
            "dendrogram": dendrogram,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match score {
            Some(score) => println!("{}", score),
            None => println!("undefined"),
        }
        for (vertex, community) in &partition {
            println!("{} {}", vertex, community);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let Some(filename) = args.filename.as_deref() else {
        print_usage();
        return ExitCode::FAILURE;
    };

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_logger(settings.log_dir.as_deref().map(Path::new)) {
        eprintln!("Warning: {:#}", e);
    }

    let graph = match load_graph(filename, args.text) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", filename.display(), e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match run(&args, &settings, &graph) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
