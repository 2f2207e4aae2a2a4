use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use sgt_hall::HallAlgebra;
use sgt_syminfo::load_syminfo;
use sgt_table::EquivalenceVerifier;
use tracing::debug;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// syminfo.lib snapshot.
    #[arg(long)]
    pub syminfo: PathBuf,
}

pub fn run(args: &VerifyArgs) -> Result<(), Box<dyn Error>> {
    let records = load_syminfo(&args.syminfo)?;
    let verifier = EquivalenceVerifier::new(&HallAlgebra);
    for record in &records {
        verifier.verify(record, &record.hall_symbol)?;
        debug!(name = record.display_name(), "verified");
    }
    println!("{} records verified", records.len());
    Ok(())
}
