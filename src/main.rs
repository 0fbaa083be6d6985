use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use follow_backbone::config::{AnalysisConfig, BackboneConfig, LoadOptions, DEFAULT_FOLLOWER_CAP};
use follow_backbone::{backbone, data, metrics, storage, viz};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "follow-backbone",
    about = "Structural analysis and backbone extraction for follow graphs"
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, global = true, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a structural report for a follow graph
    Analyze(AnalyzeArgs),

    /// Reduce a follow graph to a size-capped backbone
    Filter(FilterArgs),

    /// Convert a follow graph to Processing XML
    Xml(XmlArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Input follow graph JSON
    input: PathBuf,

    /// Minimum shared follow targets for co-follow pairs
    #[clap(long, default_value = "10")]
    min_shared: usize,

    /// Entries per report section
    #[clap(long, default_value = "50")]
    top: usize,

    /// Approximate betweenness sample size (0 disables)
    #[clap(long = "approx-betweenness-k", alias = "betweenness-k", default_value = "200")]
    betweenness_k: usize,

    /// Seed for betweenness pivot sampling
    #[clap(long, default_value = "1")]
    seed: u64,

    /// Per-target follower cap for co-follow pair generation
    #[clap(long, default_value_t = DEFAULT_FOLLOWER_CAP)]
    follower_cap: usize,

    /// Output report path
    #[clap(long, default_value = "analysis.json")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Input follow graph JSON
    input: PathBuf,

    /// Root account: always kept, anchors the ego network and linked_from
    #[clap(long)]
    root: Option<String>,

    /// Include edge targets that are not keys in the input
    #[clap(long)]
    keep_external_targets: bool,

    /// Keep top-N nodes by in-degree
    #[clap(long, default_value = "200")]
    top_in: usize,

    /// Keep top-N nodes by approximate betweenness
    #[clap(long, default_value = "120")]
    top_bridge: usize,

    /// Sample size for approximate betweenness (0 disables)
    #[clap(long, default_value = "250")]
    betweenness_k: usize,

    /// Seed for betweenness pivot sampling
    #[clap(long, default_value = "1")]
    seed: u64,

    /// Keep endpoints of the top mutual-follow pairs
    #[clap(long, default_value = "300")]
    keep_reciprocal_pairs: usize,

    /// Keep nodes within N undirected hops of the root (0 disables)
    #[clap(long, default_value = "0")]
    ego_hops: usize,

    /// Hard cap on kept nodes
    #[clap(long, default_value = "800")]
    max_nodes: usize,

    /// Hard cap on kept edges
    #[clap(long, default_value = "20000")]
    max_edges: usize,

    /// Output filtered adjacency JSON
    #[clap(long, default_value = "filtered_graph.json")]
    out_json: PathBuf,

    /// Optional Processing XML output
    #[clap(long)]
    out_xml: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct XmlArgs {
    /// Input follow graph JSON
    input: PathBuf,

    /// Output XML path
    output: PathBuf,

    /// Emit follow targets that are not keys in the input as nodes
    #[clap(long)]
    include_external_nodes: bool,

    /// Remove duplicate edges
    #[clap(long)]
    dedupe_edges: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        // If threads = 0, use all available cores
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    match args.command {
        Command::Analyze(cmd) => run_analyze(cmd),
        Command::Filter(cmd) => run_filter(cmd),
        Command::Xml(cmd) => run_xml(cmd),
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = AnalysisConfig {
        min_shared: args.min_shared,
        top: args.top,
        betweenness_k: args.betweenness_k,
        betweenness_seed: args.seed,
        follower_cap: args.follower_cap,
        ..AnalysisConfig::default()
    };
    config.validate()?;

    // Analysis only considers edges between known accounts
    let (_, graph) = data::load_graph(&args.input, &LoadOptions::default())
        .with_context(|| format!("loading {}", args.input.display()))?;

    let analysis = metrics::analyze(&graph, &config)?;
    let report = storage::build_report(&graph, &analysis, &config);
    storage::save_report(&report, &args.out)
        .with_context(|| format!("writing {}", args.out.display()))?;

    log::info!("Analysis complete. Report saved to {}", args.out.display());
    Ok(())
}

fn run_filter(args: FilterArgs) -> Result<()> {
    let config = BackboneConfig {
        root: args.root,
        top_in: args.top_in,
        top_bridge: args.top_bridge,
        betweenness_k: args.betweenness_k,
        betweenness_seed: args.seed,
        reciprocal_pairs: args.keep_reciprocal_pairs,
        ego_hops: args.ego_hops,
        max_nodes: args.max_nodes,
        max_edges: args.max_edges,
    };
    config.validate()?;

    let options = LoadOptions {
        keep_external_targets: args.keep_external_targets,
    };
    let (raw, graph) = data::load_graph(&args.input, &options)
        .with_context(|| format!("loading {}", args.input.display()))?;

    let selection = backbone::select_backbone(&graph, &config)?;

    let filtered = storage::filtered_adjacency(&graph, &raw, &selection, config.root.as_deref());
    storage::save_filtered_graph(&filtered, &args.out_json)
        .with_context(|| format!("writing {}", args.out_json.display()))?;

    if let Some(out_xml) = &args.out_xml {
        viz::write_backbone_xml(out_xml, &graph, &selection)
            .with_context(|| format!("writing {}", out_xml.display()))?;
    }

    log::info!("Filtering complete. Backbone saved to {}", args.out_json.display());
    Ok(())
}

fn run_xml(args: XmlArgs) -> Result<()> {
    let raw = data::input::read_raw_graph(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    viz::write_raw_graph_xml(&args.output, &raw, args.include_external_nodes, args.dedupe_edges)
        .with_context(|| format!("writing {}", args.output.display()))?;
    Ok(())
}
