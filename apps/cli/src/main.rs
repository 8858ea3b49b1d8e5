// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Framewright CLI - materialize a project and print its parts list.
//!
//! ```text
//! framewright house.json
//! framewright house.json --storey "Ground floor" --format json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use framewright_construction::{generate_parts_list_with, ConstructionConfig, GeometryCache};
use framewright_model::BuildingModel;

mod project;
mod report;

use project::ProjectFile;
use report::Report;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "framewright", version, about = "Materialize a building and list its parts")]
struct Args {
    /// Project file (JSON)
    project: PathBuf,

    /// Only materialize the storey with this name
    #[arg(long)]
    storey: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    /// Exit with a failure status if the model has errors
    #[arg(long, env = "FRAMEWRIGHT_STRICT")]
    strict: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,framewright=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let config = ConstructionConfig::from_env();
    let (project, _) = ProjectFile::load(&args.project)?.into_project()?;

    tracing::info!(
        project = %args.project.display(),
        storeys = project.building.storey_count(),
        walls = project.building.wall_count(),
        "Loaded project"
    );

    let mut cache = GeometryCache::with_config(project, config.clone());
    let (target, result) = match &args.storey {
        Some(name) => {
            let building = &cache.source().building;
            let storey = building
                .storeys()
                .into_iter()
                .find(|&s| building.storey(s).is_some_and(|s| &s.name == name))
                .with_context(|| format!("No storey named '{}'", name))?;
            (format!("storey '{}'", name), cache.get_storey(storey))
        }
        None => ("building".to_string(), cache.get_building()),
    };

    let parts = generate_parts_list_with(&result.model, &cache.source().materials, &config);
    tracing::info!(
        entity = %target,
        errors = result.model.errors.len(),
        warnings = result.model.warnings.len(),
        pieces = parts.total_quantity(),
        "Materialized"
    );

    let report = Report::new(target, &result.model, result.is_outdated, &parts, cache.stats());
    match args.format {
        Format::Text => print!("{}", report.to_text()?),
        Format::Json => println!("{}", report.to_json()?),
    }

    if args.strict && result.model.has_errors() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
