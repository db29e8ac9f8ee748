use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{debug, info};
use std::{fs, path::Path};

use apidoc_rust::{
    AnnotationManifest, ContentLoader, Document, DocumentationConfig, Pipeline,
};
use apidoc_rust::generator::Generator;

/// Enriches generated OpenAPI documents with declarative documentation annotations
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the enrichment pipeline over a generated document
    Enrich {
        /// OpenAPI document (JSON or YAML) produced by the base generator
        #[arg(short, long)]
        input: String,

        /// Annotation manifest describing types and handlers
        #[arg(short, long)]
        annotations: String,

        /// Documentation configuration file
        #[arg(short, long)]
        config: Option<String>,

        /// Output directory for generated files
        #[arg(short, long, default_value = "./docs")]
        output: String,

        /// Output types to generate (json,yaml,ui)
        #[arg(long = "ot", default_value = "json,yaml,ui")]
        output_types: String,
    },

    /// Print the routes the documentation is served under
    Paths {
        /// Documentation configuration file
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env = Env::default().filter_or("RUST_LOG", if cli.verbose { "debug" } else { "info" });
    env_logger::init_from_env(env);

    debug!("Starting apidoc-rust...");

    match &cli.command {
        Commands::Enrich {
            input,
            annotations,
            config,
            output,
            output_types,
        } => {
            info!("Enriching OpenAPI document {}", input);

            let output_types: Vec<String> = output_types.split(',').map(|s| s.trim().to_string()).collect();
            let config = load_config(config.as_deref())?;

            let mut document = load_document(input)?;
            let manifest = AnnotationManifest::from_file(annotations)
                .context(format!("Failed to load annotation manifest: {}", annotations))?;
            let bound = manifest.bind(&mut document);
            debug!("Bound {} operations to their handlers", bound);

            let loader = ContentLoader::new(config.content_root()).with_cache();
            let pipeline = Pipeline::builder(config.clone())
                .with_default_filters()
                .loader(loader)
                .examples(manifest.examples())
                .build();
            debug!("Filters: {}", pipeline.filter_names().join(", "));

            let document = pipeline
                .generate(document, &manifest)
                .context("Failed to enrich OpenAPI document")?;

            let written = Generator::new(&document, &config).generate(output, &output_types)?;
            debug!("Wrote {} files", written.len());

            info!("OpenAPI documentation generated successfully");
        }
        Commands::Paths { config } => {
            let config = load_config(config.as_deref())?;
            println!("path:      {}", config.get_path());
            println!("full path: {}", config.get_full_path());
            println!("url:       {}", config.get_url());
            println!("full url:  {}", config.get_full_url());
        }
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> Result<DocumentationConfig> {
    let config = match path {
        Some(path) => DocumentationConfig::from_file(path)
            .context(format!("Failed to load configuration: {}", path))?,
        None => DocumentationConfig::default(),
    };
    config.validate().context("Invalid documentation configuration")?;
    Ok(config)
}

/// Reads a JSON or YAML document
fn load_document(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).context(format!("Failed to read document: {:?}", path))?;
    serde_yaml::from_str(&content).context(format!("Failed to parse document: {:?}", path))
}
