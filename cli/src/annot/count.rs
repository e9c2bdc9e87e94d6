//! レコード数の表示

use clap::Parser;

use crate::annot::{AnnotError, InputArgs};

/// `annot count` コマンドの引数
#[derive(Parser, Debug)]
pub struct Args {
    #[clap(flatten)]
    input: InputArgs,
}

/// 入力ファイルのレコード数を標準出力に表示します。
pub fn run(args: Args) -> Result<(), AnnotError> {
    let records = args.input.read_records()?;
    println!("{}", records.len());
    Ok(())
}
