//! Command-line interface for ooxml-schema

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use ooxml_schema::graph::{AttributeSpec, SchemaGraph, TagFilter};
#[cfg(feature = "cli")]
use ooxml_schema::grammar::{BuildOptions, SchemaBuilder};
#[cfg(feature = "cli")]
use ooxml_schema::limits::Limits;
#[cfg(feature = "cli")]
use ooxml_schema::loaders::Loader;
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "ooxml-schema")]
#[command(author, version, about = "Derive and query the OOXML element grammar", long_about = None)]
struct Cli {
    /// Log progress and schema warnings to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args, Debug)]
struct Source {
    /// Prebuilt grammar (.json), schema directory or .xsd file
    #[arg(short, long, value_name = "SOURCE")]
    schema: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the grammar from a schema directory or file
    Build {
        /// Schema directory or .xsd file
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not infer elements from complex type names
        #[arg(long)]
        no_synthetic: bool,

        /// Content model nesting bound
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,
    },

    /// List the allowed children of an element
    Children {
        /// Element name, e.g. w:p
        qname: String,
        #[command(flatten)]
        source: Source,
    },

    /// List the attributes of an element
    Attrs {
        /// Element name, e.g. w:p
        qname: String,
        #[command(flatten)]
        source: Source,
    },

    /// List known element names
    Tags {
        /// Only names with this prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Only elements that allow children
        #[arg(long)]
        has_children: bool,

        #[command(flatten)]
        source: Source,
    },

    /// Show the namespace table
    Namespaces {
        #[command(flatten)]
        source: Source,
    },

    /// Show coverage statistics
    Stats {
        #[command(flatten)]
        source: Source,
    },

    /// Classify an element as block or inline content
    Classify {
        /// Element name, e.g. w:tbl
        qname: String,
        #[command(flatten)]
        source: Source,
    },
}

#[cfg(feature = "cli")]
type CliResult = Result<(), Box<dyn std::error::Error>>;

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    // RUST_LOG overrides -v; library `log` records are bridged into tracing
    let default_level = if cli.verbose { "info" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build {
            source,
            output,
            no_synthetic,
            max_depth,
        } => cmd_build(source, output, no_synthetic, max_depth),
        Commands::Children { qname, source } => cmd_children(&qname, &source),
        Commands::Attrs { qname, source } => cmd_attrs(&qname, &source),
        Commands::Tags {
            prefix,
            has_children,
            source,
        } => cmd_tags(prefix, has_children, &source),
        Commands::Namespaces { source } => cmd_namespaces(&source),
        Commands::Stats { source } => cmd_stats(&source),
        Commands::Classify { qname, source } => cmd_classify(&qname, &source),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Load a prebuilt grammar or build one from schema files
#[cfg(feature = "cli")]
fn open_graph(path: &Path) -> Result<SchemaGraph, Box<dyn std::error::Error>> {
    if path.extension().is_some_and(|ext| ext == "json") {
        return Ok(SchemaGraph::load(path)?);
    }
    let documents = Loader::new().load(path)?;
    Ok(SchemaBuilder::default().build(&documents).graph)
}

#[cfg(feature = "cli")]
fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_build(
    source: PathBuf,
    output: Option<PathBuf>,
    no_synthetic: bool,
    max_depth: Option<usize>,
) -> CliResult {
    let mut options = BuildOptions::ooxml();
    if no_synthetic {
        options = options.with_synthetic(None);
    }
    if let Some(depth) = max_depth {
        options = options.with_limits(Limits::default().with_content_depth(depth));
    }

    let documents = Loader::new().load(&source)?;
    let built = SchemaBuilder::new(options).build(&documents);
    if !built.diagnostics.is_empty() {
        tracing::info!("{} schema warnings", built.diagnostics.len());
    }

    match output {
        Some(path) => {
            built.graph.save(&path)?;
            eprintln!(
                "Wrote {} elements to {}",
                built.graph.elements.len(),
                path.display()
            );
        }
        None => println!("{}", built.graph.to_json_pretty()?),
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_children(qname: &str, source: &Source) -> CliResult {
    let graph = open_graph(&source.schema)?;
    if !graph.has_element(qname) {
        return Err(format!("Unknown element '{}'", qname).into());
    }

    let children = graph.allowed_children(qname);
    if source.json {
        return print_json(&children);
    }
    for child in children {
        println!("{}", child);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_attrs(qname: &str, source: &Source) -> CliResult {
    let graph = open_graph(&source.schema)?;
    let attributes = graph
        .attributes(qname)
        .ok_or_else(|| format!("Unknown element '{}'", qname))?;

    if source.json {
        return print_json(attributes);
    }
    for (name, spec) in attributes {
        match spec {
            AttributeSpec::Wildcard { .. } => println!("{}  (any attribute)", name),
            AttributeSpec::Declared(decl) => {
                let mut line = format!("{}  {}  {}", name, decl.type_name, decl.use_mode);
                if let Some(default) = &decl.default {
                    line.push_str(&format!("  default={}", default));
                }
                if let Some(fixed) = &decl.fixed {
                    line.push_str(&format!("  fixed={}", fixed));
                }
                println!("{}", line);
            }
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_tags(prefix: Option<String>, has_children: bool, source: &Source) -> CliResult {
    let graph = open_graph(&source.schema)?;
    let mut filter = TagFilter::new();
    filter.prefix = prefix;
    if has_children {
        filter = filter.with_children(true);
    }

    let tags = graph.all_tags(&filter);
    if source.json {
        return print_json(&tags);
    }
    for tag in tags {
        println!("{}", tag);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_namespaces(source: &Source) -> CliResult {
    let graph = open_graph(&source.schema)?;
    if source.json {
        return print_json(&graph.namespaces);
    }
    for (uri, prefix) in graph.namespaces() {
        println!("{}  {}", prefix, uri);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_stats(source: &Source) -> CliResult {
    let graph = open_graph(&source.schema)?;
    let stats = graph.stats();
    if source.json {
        return print_json(&stats);
    }

    println!("ooxml-schema v{}", ooxml_schema::VERSION);
    println!();
    println!("Statistics:");
    println!("  Elements: {}", stats.total_elements);
    println!("  Elements with children: {}", stats.elements_with_children);
    println!("  Namespaces: {}", stats.namespace_count);
    println!();
    println!("By prefix:");
    for (prefix, count) in &stats.by_namespace {
        println!("  {}: {}", prefix, count);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_classify(qname: &str, source: &Source) -> CliResult {
    let graph = open_graph(&source.schema)?;
    let classification = graph.classify_block_or_inline(qname);
    if source.json {
        return print_json(&serde_json::json!({
            "element": qname,
            "classification": classification,
        }));
    }
    println!("{}", classification);
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
