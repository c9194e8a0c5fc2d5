//! Attribute command line interface
//!
//! Inspect and edit the attributes of one dataset.
//!
//! # Usage
//!
//! ```bash
//! # List attributes of dataset 7
//! catalog-attrs 7 list
//!
//! # Create a nullable string column
//! catalog-attrs 7 create customer_name --type string --nullable --description "Legal name"
//!
//! # Change or clear its description
//! catalog-attrs 7 update customer_name --description "Registered legal name"
//! catalog-attrs 7 update customer_name
//!
//! catalog-attrs 7 delete customer_name
//! ```
//!
//! Connection settings come from `CATALOG_*` variables (or `.env`), or from
//! a YAML file passed with `--config`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_client::attribute::{self, Attribute};
use catalog_client::{AttributeType, Dataset, HttpSession, NewAttribute, SessionConfig};

#[derive(Parser)]
#[command(name = "catalog-attrs")]
#[command(version)]
#[command(about = "Inspect and edit the attributes of a catalog dataset")]
struct Cli {
    /// Dataset id
    dataset: String,

    #[command(subcommand)]
    command: Commands,

    /// YAML configuration file (defaults to CATALOG_* environment variables)
    #[arg(long, short, global = true, env = "CATALOG_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all attributes
    List,

    /// Show one attribute
    Get { name: String },

    /// Create an attribute
    Create {
        name: String,

        /// Column type (default: array of string)
        #[arg(long = "type", value_enum)]
        attr_type: Option<TypeArg>,

        #[arg(long)]
        nullable: bool,

        #[arg(long)]
        description: Option<String>,

        /// Skip the reserved-name check
        #[arg(long)]
        force: bool,
    },

    /// Set the description (omit --description to clear it)
    Update {
        name: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete an attribute
    Delete { name: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum TypeArg {
    Boolean,
    Double,
    Int,
    Long,
    String,
    StringArray,
    Geospatial,
}

impl From<TypeArg> for AttributeType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Boolean => AttributeType::Boolean,
            TypeArg::Double => AttributeType::Double,
            TypeArg::Int => AttributeType::Int,
            TypeArg::Long => AttributeType::Long,
            TypeArg::String => AttributeType::String,
            TypeArg::StringArray => AttributeType::default(),
            TypeArg::Geospatial => AttributeType::geospatial(),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => SessionConfig::from_file(path)?,
        None => SessionConfig::from_env()?,
    };
    tracing::debug!(?config, "Loaded configuration");

    let session = HttpSession::new(&config).context("Failed to create catalog session")?;
    let dataset = Dataset::at(
        config
            .instance
            .resource(&format!("datasets/{}", cli.dataset))?,
    );

    match cli.command {
        Commands::List => {
            let attrs = attribute::from_dataset_all(&session, &dataset)?;
            let rendered: Vec<_> = attrs.iter().map(render).collect();
            println!("{}", serde_json::to_string_pretty(&rendered)?);
        }
        Commands::Get { name } => {
            let attr = attribute::from_resource_id(&session, &dataset, &name)?;
            print(&attr)?;
        }
        Commands::Create {
            name,
            attr_type,
            nullable,
            description,
            force,
        } => {
            let mut new = NewAttribute::new(&name, nullable);
            if let Some(attr_type) = attr_type {
                new = new.with_type(attr_type.into());
            }
            if let Some(description) = &description {
                new = new.with_description(description);
            }
            let attr = if force {
                attribute::create_unchecked(&session, &dataset, &new)?
            } else {
                attribute::create(&session, &dataset, &new)?
            };
            print(&attr)?;
        }
        Commands::Update { name, description } => {
            let attr = attribute::from_resource_id(&session, &dataset, &name)?;
            let attr = attribute::update(&session, &attr, description.as_deref())?;
            print(&attr)?;
        }
        Commands::Delete { name } => {
            let attr = attribute::from_resource_id(&session, &dataset, &name)?;
            attribute::delete(&session, &attr)?;
            println!("deleted {}", attr.url());
        }
    }

    Ok(())
}

fn render(attr: &Attribute) -> serde_json::Value {
    json!({
        "url": attr.url().to_string(),
        "attribute": attribute::to_json(attr),
    })
}

fn print(attr: &Attribute) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&render(attr))?);
    Ok(())
}
