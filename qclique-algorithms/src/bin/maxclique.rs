//! `maxclique` binary: evaluate, optimize or sweep the clique QAOA on a graph.
//!
//! # Usage
//!
//! ```bash
//! maxclique evaluate --gamma 3.1069 --beta 2.5083 --top 5
//! maxclique --nodes 5 --edges 0-1,1-2,2-0,3-4 optimize --starts 4
//! maxclique --config run.json sweep --angle beta --fixed 3.1 --exact
//! ```
//!
//! Without `--nodes`/`--edges` the 4-node demo graph is used. Results are
//! printed to stdout as JSON; logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use qclique_algorithms::{
    sweep, OptimizerConfig, ParameterOptimizer, RunConfig, SweepMode, DEFAULT_SWEEP_POINTS,
};
use qclique_core::{best_score, instances, Angle, Graph, QaoaRunner, QcliqueError, Result};
use serde_json::json;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "maxclique",
    version,
    about = "QAOA max-clique on a statevector simulator",
    long_about = None
)]
struct Args {
    /// Number of graph nodes. Requires `--edges`.
    #[arg(long, requires = "edges")]
    nodes: Option<usize>,

    /// Edge list such as `0-1,1-2,2-0`
    #[arg(long, requires = "nodes")]
    edges: Option<String>,

    /// Penalty per selected non-edge (default: edge count)
    #[arg(long)]
    penalty: Option<i64>,

    /// JSON run configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long)]
    shots: Option<usize>,

    #[arg(long)]
    depth: Option<usize>,

    #[arg(long)]
    ancillas: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    max_qubits: Option<usize>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample the circuit at one (γ, β) point
    Evaluate {
        #[arg(long, default_value_t = instances::REFERENCE_GAMMA)]
        gamma: f64,
        #[arg(long, default_value_t = instances::REFERENCE_BETA)]
        beta: f64,
        /// Also report the noise-free expectation
        #[arg(long)]
        exact: bool,
        /// Number of most frequent selections to report
        #[arg(long, default_value_t = 5)]
        top: usize,
        /// Include the dense histogram over all selections
        #[arg(long)]
        histogram: bool,
    },
    /// Gradient ascent over (γ, β)
    Optimize {
        #[arg(long)]
        epsilon: Option<f64>,
        #[arg(long)]
        eta: Option<f64>,
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long)]
        max_iter: Option<usize>,
        #[arg(long)]
        gamma0: Option<f64>,
        #[arg(long)]
        beta0: Option<f64>,
        /// Extra evenly spread start points; the best run is kept
        #[arg(long, default_value_t = 1)]
        starts: usize,
    },
    /// Expectation curve along one angle
    Sweep {
        #[arg(long, value_enum, default_value_t = SweptAngle::Gamma)]
        angle: SweptAngle,
        /// Value of the other angle
        #[arg(long)]
        fixed: Option<f64>,
        #[arg(long, default_value_t = DEFAULT_SWEEP_POINTS)]
        points: usize,
        /// Use statevector probabilities instead of shots
        #[arg(long)]
        exact: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SweptAngle {
    Gamma,
    Beta,
}

impl From<SweptAngle> for Angle {
    fn from(a: SweptAngle) -> Self {
        match a {
            SweptAngle::Gamma => Angle::Gamma,
            SweptAngle::Beta => Angle::Beta,
        }
    }
}

fn main() {
    let args = Args::parse();

    let log_level_filter = args
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(log_level_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match args.config.as_deref() {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            RunConfig::from_file(path)?
        }
        None => RunConfig::default(),
    };

    if let Some(shots) = args.shots {
        config.qaoa.shots = shots;
    }
    if let Some(depth) = args.depth {
        config.qaoa.depth = depth;
    }
    if let Some(n) = args.ancillas {
        config.qaoa.n_ancilla = n;
    }
    if let Some(seed) = args.seed {
        config.qaoa.seed = Some(seed);
    }
    if let Some(limit) = args.max_qubits {
        config.qaoa.max_qubits = limit;
    }

    let mut graph = match (args.nodes, args.edges.as_deref()) {
        (Some(n), Some(spec)) => Graph::from_edges(n, &parse_edges(spec)?)?,
        _ => instances::demo_graph(),
    };
    if let Some(penalty) = args.penalty {
        graph = graph.with_penalty(penalty);
    }

    info!(
        nodes = graph.n_nodes(),
        edges = graph.n_edges(),
        non_edges = graph.complement_edges().len(),
        penalty = graph.penalty(),
        "graph loaded"
    );

    match args.command {
        Command::Evaluate {
            gamma,
            beta,
            exact,
            top,
            histogram,
        } => {
            let mut runner = QaoaRunner::new(graph, config.qaoa)?;
            let eval = runner.evaluate(gamma, beta)?;

            let top: Vec<_> = eval
                .counts
                .most_frequent(top)
                .into_iter()
                .map(|(s, count)| {
                    json!({
                        "selection": s.to_string(),
                        "count": count,
                        "clique": s.is_clique(runner.graph()),
                    })
                })
                .collect();
            let best = eval
                .best_clique(runner.graph())
                .map(|(s, count)| json!({ "nodes": s.nodes(), "count": count }));
            let (optimum, optimum_score) = best_score(runner.graph());

            let mut out = json!({
                "gamma": gamma,
                "beta": beta,
                "shots": eval.counts.shots(),
                "expectation": eval.expectation,
                "top": top,
                "best_clique": best,
                "optimum": { "nodes": optimum.nodes(), "score": optimum_score },
            });
            if exact {
                out["exact_expectation"] = json!(runner.exact_expectation(gamma, beta)?);
            }
            if histogram {
                out["histogram"] = json!(eval.counts.histogram(runner.graph().n_nodes()));
            }
            print_json(&out)
        }

        Command::Optimize {
            epsilon,
            eta,
            threshold,
            max_iter,
            gamma0,
            beta0,
            starts,
        } => {
            let mut opt = config.optimizer.clone();
            apply_optimizer_overrides(&mut opt, epsilon, eta, threshold, max_iter, gamma0, beta0);
            let optimizer = ParameterOptimizer::new(opt)?;
            let mut runner = QaoaRunner::new(graph, config.qaoa)?;

            let result = if starts > 1 {
                let points = start_points(optimizer.config(), starts);
                optimizer.optimize_multistart(&mut runner, &points)?.0
            } else {
                optimizer.optimize_qaoa(&mut runner)?
            };

            if !result.converged {
                warn!(
                    best_gamma = result.best.gamma,
                    best_beta = result.best.beta,
                    "reporting best observed point"
                );
            }
            let expectation = runner.expectation(result.gamma, result.beta)?;
            print_json(&json!({
                "gamma": result.gamma,
                "beta": result.beta,
                "expectation": expectation,
                "converged": result.converged,
                "iterations": result.iterations,
                "evaluations": result.evaluations,
                "best": result.best,
            }))
        }

        Command::Sweep {
            angle,
            fixed,
            points,
            exact,
        } => {
            let angle = Angle::from(angle);
            let fixed = fixed.unwrap_or(match angle {
                Angle::Gamma => instances::REFERENCE_BETA,
                Angle::Beta => instances::REFERENCE_GAMMA,
            });
            let mode = if exact { SweepMode::Exact } else { SweepMode::Sampled };
            let mut runner = QaoaRunner::new(graph, config.qaoa)?;
            let result = sweep(&mut runner, angle, fixed, points, mode)?;

            if let Some(best) = result.argmax() {
                let (g, b) = result.angles_at(&best);
                info!(gamma = g, beta = b, expectation = best.expectation, "sweep maximum");
            }
            println!("{}", result.to_json()?);
            Ok(())
        }
    }
}

/// Parse `0-1,1-2` into node pairs
fn parse_edges(spec: &str) -> Result<Vec<(usize, usize)>> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|pair| -> Result<(usize, usize)> {
            let (a, b) = pair.split_once('-').ok_or_else(|| {
                QcliqueError::InvalidGraph(format!("edge '{}' is not of the form u-v", pair))
            })?;
            let parse = |s: &str| {
                s.trim().parse::<usize>().map_err(|_| {
                    QcliqueError::InvalidGraph(format!("edge '{}' has a non-numeric node", pair))
                })
            };
            Ok((parse(a)?, parse(b)?))
        })
        .collect()
}

fn apply_optimizer_overrides(
    config: &mut OptimizerConfig,
    epsilon: Option<f64>,
    eta: Option<f64>,
    threshold: Option<f64>,
    max_iter: Option<usize>,
    gamma0: Option<f64>,
    beta0: Option<f64>,
) {
    if let Some(v) = epsilon {
        config.epsilon = v;
    }
    if let Some(v) = eta {
        config.learning_rate = v;
    }
    if let Some(v) = threshold {
        config.threshold = v;
    }
    if let Some(v) = max_iter {
        config.max_iter = v;
    }
    if let Some(v) = gamma0 {
        config.initial_gamma = v;
    }
    if let Some(v) = beta0 {
        config.initial_beta = v;
    }
}

/// Configured start first, then points spread evenly over the (γ, β) torus
fn start_points(config: &OptimizerConfig, n: usize) -> Vec<(f64, f64)> {
    let mut points = vec![(config.initial_gamma, config.initial_beta)];
    for k in 1..n {
        let t = k as f64 / n as f64;
        points.push((
            (config.initial_gamma + t * qclique_algorithms::GAMMA_PERIOD)
                .rem_euclid(qclique_algorithms::GAMMA_PERIOD),
            (config.initial_beta + t * qclique_algorithms::BETA_PERIOD)
                .rem_euclid(qclique_algorithms::BETA_PERIOD),
        ));
    }
    points
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| QcliqueError::InvalidConfig(format!("output serialization failed: {}", e)))?;
    println!("{}", text);
    Ok(())
}
