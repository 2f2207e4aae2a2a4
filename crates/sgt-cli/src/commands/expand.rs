use std::error::Error;

use clap::Args;
use sgt_core::{Op, OperationAlgebra};
use sgt_hall::HallAlgebra;

#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Hall symbol, e.g. "-P 2ybc".
    pub hall: String,
}

pub fn run(args: &ExpandArgs) -> Result<(), Box<dyn Error>> {
    let ops = HallAlgebra.expand(&args.hall)?;
    println!("# {} general, {} centering", ops.sym_ops.len(), ops.cen_ops.len());
    for op in &ops.sym_ops {
        println!("symop {}", op.triplet());
    }
    for tran in &ops.cen_ops {
        println!("cenop {}", Op::from_tran(*tran).triplet());
    }
    Ok(())
}
