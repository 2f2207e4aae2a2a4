use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use sgt_core::OperationAlgebra;
use sgt_hall::{HallAlgebra, ReferenceBasis};
use sgt_syminfo::parse_syminfo;
use sgt_table::{
    provenance, render_json, render_source, AssemblyOptions, OutputFormat, TableAssembler,
    TableConfig, TableDocument, TsvReference,
};
use tracing::info;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// YAML configuration; flags override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// syminfo.lib snapshot.
    #[arg(long)]
    pub syminfo: Option<PathBuf>,
    /// Tab-separated reference enumeration.
    #[arg(long)]
    pub reference: Option<PathBuf>,
    /// Skip the equivalence checks.
    #[arg(long)]
    pub no_verify: bool,
    /// Output flavour.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Source,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Source => OutputFormat::Source,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

pub fn run(args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let config = merged_config(args)?;
    let syminfo_path = required(config.syminfo.as_deref(), "syminfo")?;
    let reference_path = required(config.reference.as_deref(), "reference")?;

    let database = fs::read(syminfo_path)?;
    let reference = fs::read(reference_path)?;
    let records = parse_syminfo(std::str::from_utf8(&database)?)?;
    let enumeration = TsvReference::from_reader(reference.as_slice())?;
    let basis = ReferenceBasis::from_enumeration(&enumeration)?;
    let algebra = HallAlgebra;
    let verifier: Option<&dyn OperationAlgebra> = config.verify.then_some(&algebra as &dyn OperationAlgebra);

    let table = TableAssembler::new(
        &enumeration,
        &basis,
        verifier,
        AssemblyOptions::from(&config),
    )
    .assemble(&records)?;
    info!(
        rows = table.entries.len(),
        operators = table.basis_operators.len(),
        "table assembled"
    );

    let text = match config.format {
        OutputFormat::Source => render_source(&table),
        OutputFormat::Json => {
            let provenance = provenance(&database, Some(&reference), config.verify);
            render_json(&TableDocument::new(table, provenance))?
        }
    };
    std::io::stdout().lock().write_all(text.as_bytes())?;
    Ok(())
}

fn merged_config(args: &GenerateArgs) -> Result<TableConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => TableConfig::from_yaml_path(path)?,
        None => TableConfig::default(),
    };
    if let Some(path) = &args.syminfo {
        config.syminfo = Some(path.clone());
    }
    if let Some(path) = &args.reference {
        config.reference = Some(path.clone());
    }
    if args.no_verify {
        config.verify = false;
    }
    if let Some(format) = args.format {
        config.format = format.into();
    }
    Ok(config)
}

fn required<'a>(path: Option<&'a Path>, name: &str) -> Result<&'a Path, Box<dyn Error>> {
    path.ok_or_else(|| format!("no {name} path given (use --{name} or the config file)").into())
}
