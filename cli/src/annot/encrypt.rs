//! トークンの伏せ字化

use clap::Parser;

use crate::annot::{AnnotError, InputArgs, OutputArgs};

/// `annot encrypt` コマンドの引数
#[derive(Parser, Debug)]
pub struct Args {
    #[clap(flatten)]
    input: InputArgs,

    #[clap(flatten)]
    output: OutputArgs,
}

/// すべてのトークンを伏せ字に置き換えて書き出します。
pub fn run(args: Args) -> Result<(), AnnotError> {
    let mut records = args.input.read_records()?;
    for record in &mut records {
        record.encrypt();
    }
    args.output.write_records(&records)
}
