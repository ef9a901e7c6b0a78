use std::{fs::File, io, path::PathBuf};

use anyhow::{bail, Context};
use log::{info, warn};
use ordered_float::NotNan;
use phvec::{
    diagram::{calculate_persistence_diagrams, PersistenceDiagram, Point},
    filtration::{CliqueOptions, Filtration},
    reduction::Algorithm,
    weights::{Normalization, VertexWeights},
};

// Reads weighted edge lists `u,v,weight` (no header) and reports the persistent homology of their clique filtrations.
//
//   phvec [OPTIONS] [FILES]
//
// Every file is one graph; without files a single graph is read from stdin.
// Only the diagram of the highest dimension is reported, after removing the diagonal and giving unpaired points
// the smallest absolute edge weight as death.
// By default its p-norm is printed as `INDEX\tNORM`, where INDEX is the position of the file on the command line.
//
//   --dual                  reduce the coboundary matrix instead
//   --twist | --parallel    choose the reduction algorithm
//   --diagrams              print the diagrams, one `BIRTH\tDEATH` per line, instead of norms
//   --max-dim <d>           largest simplex dimension of the clique filtration (default 1)
//   --power <p>             power of the norm (default 2)
//   --filtration <f>        `standard` (by weight) or `absolute` (by absolute weight)
//   --reverse               superlevel instead of sublevel filtration
//   --weights <w>           vertex weights: `global` (first edge overall) or `local` (first incident edge)
//   --normalize[=<n>]       without a value, scale the diagram to [0, 1]; otherwise normalize the edge weights
//                           with `abs`, `minmax` or `standardize`
//   --default               shorthand for `--filtration absolute --reverse --weights global --normalize=abs`
//
// Set RUST_LOG=debug to follow the reduction.

#[derive(Debug, Clone, Copy, PartialEq)]
enum Normalize {
    /// Scale the reported diagram to `[0, 1]` using the value range of the filtration.
    Diagram,
    /// Normalize the edge weights before building the filtration.
    Weights(Normalization),
}

struct Options {
    algorithm: Algorithm,
    dualize: bool,
    print_diagrams: bool,
    clique: CliqueOptions,
    normalize: Option<Normalize>,
    power: f64,
    files: Vec<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Standard,
            dualize: false,
            print_diagrams: false,
            clique: CliqueOptions::default(),
            normalize: None,
            power: 2.0,
            files: Vec::new(),
        }
    }
}

fn parse_normalization(name: &str) -> anyhow::Result<Normalization> {
    match name {
        "abs" => Ok(Normalization::Abs),
        "minmax" => Ok(Normalization::MinMax),
        "standardize" => Ok(Normalization::Standardize),
        other => bail!("Unknown normalization strategy '{other}'"),
    }
}

fn parse_options(mut args: impl Iterator<Item = String>) -> anyhow::Result<Options> {
    let mut options = Options::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dual" => options.dualize = true,
            "--twist" => options.algorithm = Algorithm::Twist,
            "--parallel" => options.algorithm = Algorithm::Parallel,
            "--diagrams" => options.print_diagrams = true,
            "--reverse" => options.clique.order.reverse = true,
            "--normalize" => options.normalize = Some(Normalize::Diagram),
            "--default" => {
                options.clique.order.absolute = true;
                options.clique.order.reverse = true;
                options.clique.vertex_weights = VertexWeights::Global;
                options.normalize = Some(Normalize::Weights(Normalization::Abs));
            }
            "--max-dim" => {
                let value = args.next().context("--max-dim expects a value")?;
                options.clique.max_dimension = value
                    .parse()
                    .with_context(|| format!("Invalid maximum dimension '{value}'"))?;
                if !(1..=2).contains(&options.clique.max_dimension) {
                    warn!(
                        "Maximum dimension {} is unusual, clique filtrations grow quickly",
                        options.clique.max_dimension
                    );
                }
            }
            "--power" => {
                let value = args.next().context("--power expects a value")?;
                options.power = value
                    .parse()
                    .with_context(|| format!("Invalid power '{value}'"))?;
                if options.power <= 0.0 {
                    bail!("The power of the norm must be positive");
                }
            }
            "--filtration" => {
                let value = args.next().context("--filtration expects a value")?;
                options.clique.order.absolute = match value.as_str() {
                    "standard" => false,
                    "absolute" => true,
                    other => {
                        warn!("Invalid filtration '{other}', falling back to the standard one");
                        false
                    }
                };
            }
            "--weights" => {
                let value = args.next().context("--weights expects a value")?;
                options.clique.vertex_weights = match value.as_str() {
                    "global" => VertexWeights::Global,
                    "local" => VertexWeights::Local,
                    other => {
                        warn!("Invalid weight strategy '{other}', falling back to the global one");
                        VertexWeights::Global
                    }
                };
            }
            other => {
                if let Some(name) = other.strip_prefix("--normalize=") {
                    options.normalize = Some(Normalize::Weights(parse_normalization(name)?));
                } else if other.starts_with("--") {
                    bail!("Unknown or incorrect command-line argument '{other}'");
                } else {
                    options.files.push(PathBuf::from(other));
                }
            }
        }
    }
    Ok(options)
}

fn read_edges(reader: impl io::Read) -> anyhow::Result<Vec<(usize, usize, NotNan<f64>)>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    rdr.records()
        .enumerate()
        .map(|(line, record)| -> anyhow::Result<(usize, usize, NotNan<f64>)> {
            let record = record.with_context(|| format!("Failed to read line {}", line + 1))?;
            if record.len() != 3 {
                bail!(
                    "Line {} has {} fields, expected 'u,v,weight'",
                    line + 1,
                    record.len()
                );
            }
            let u: usize = record[0]
                .parse()
                .with_context(|| format!("Invalid vertex on line {}", line + 1))?;
            let v: usize = record[1]
                .parse()
                .with_context(|| format!("Invalid vertex on line {}", line + 1))?;
            let weight: f64 = record[2]
                .parse()
                .with_context(|| format!("Invalid weight on line {}", line + 1))?;
            let weight = NotNan::new(weight)
                .with_context(|| format!("Weight on line {} is NaN", line + 1))?;
            Ok((u, v, weight))
        })
        .collect()
}

/// The diagram of the highest dimension of one graph, prepared for reporting.
fn analyse(
    mut edges: Vec<(usize, usize, NotNan<f64>)>,
    options: &Options,
) -> anyhow::Result<PersistenceDiagram> {
    if let Some(Normalize::Weights(normalization)) = options.normalize {
        normalization
            .apply_to_edges(&mut edges)
            .context("Failed to normalize the edge weights")?;
    }

    let filtration = Filtration::from_weighted_edges(edges, &options.clique)
        .context("Failed to build the clique filtration")?;
    info!("Filtration has {} simplices", filtration.len());

    let diagrams = calculate_persistence_diagrams::<u32>(
        &filtration,
        options.algorithm,
        options.dualize,
    )
    .context("Failed to calculate persistent homology")?;
    let mut diagram = diagrams
        .into_iter()
        .last()
        .context("No persistence diagram was calculated")?;

    diagram.remove_diagonal();
    if let Some(death) = filtration.minimum_absolute_edge_value() {
        diagram.close_unpaired(death);
    }
    if options.clique.order.absolute {
        diagram.map_points(|point| Point::new(point.birth.abs(), point.death.abs()));
    }
    if options.normalize == Some(Normalize::Diagram) {
        if let Some((min, max)) = filtration.value_range() {
            diagram.rescale(min.into_inner(), max.into_inner());
        }
    }
    Ok(diagram)
}

fn report(
    index: usize,
    edges: Vec<(usize, usize, NotNan<f64>)>,
    options: &Options,
) -> anyhow::Result<()> {
    info!("Read {} edges for input {index}", edges.len());
    let diagram = analyse(edges, options)?;
    if options.print_diagrams {
        println!("{diagram}");
    } else {
        println!("{index}\t{}", diagram.p_norm(options.power));
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = parse_options(std::env::args().skip(1))?;
    info!(
        "Algorithm: {:?}, dualized: {}, filtration: {:?}, vertex weights: {:?}, normalization: {:?}",
        options.algorithm,
        options.dualize,
        options.clique.order,
        options.clique.vertex_weights,
        options.normalize
    );

    if options.files.is_empty() {
        return report(0, read_edges(io::stdin().lock())?, &options);
    }

    for (index, path) in options.files.iter().enumerate() {
        info!("Processing {}", path.display());
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let edges =
            read_edges(file).with_context(|| format!("Failed to read {}", path.display()))?;
        report(index, edges, &options)?;
    }

    Ok(())
}
