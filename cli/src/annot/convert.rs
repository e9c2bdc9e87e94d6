//! フォーマットとスタイルの変換

use clap::Parser;

use crate::annot::{AnnotError, InputArgs, OutputArgs};

/// `annot convert` コマンドの引数
#[derive(Parser, Debug)]
pub struct Args {
    #[clap(flatten)]
    pub(crate) input: InputArgs,

    #[clap(flatten)]
    pub(crate) output: OutputArgs,

    /// Splits every token into single characters.
    #[clap(long)]
    pub(crate) dice: bool,
}

/// レコードを読み込み、別のフォーマットで書き出します。
pub fn run(args: Args) -> Result<(), AnnotError> {
    let mut records = args.input.read_records()?;
    if args.dice {
        records = records.iter().map(|r| r.dice()).collect();
    }
    args.output.write_records(&records)
}
