//! BCCWJ コーパスを扱うサブコマンド群

mod cache;
mod gen_source;

use std::io;
use std::path::PathBuf;

use clap::Parser;

use hikaku::errors::HikakuError;

/// `bccwj` コマンドの引数
#[derive(Parser, Debug)]
#[clap(name = "bccwj", about = "Preprocesses the BCCWJ corpus")]
pub struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Builds a compressed cache of the corpus texts.
    Cache(cache::Args),

    /// Extracts the real texts of the given IDs into a JSON object.
    GenSource(gen_source::Args),
}

/// `bccwj` コマンドの実行中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum BccwjError {
    /// キャッシュの既定の置き場所が決まらない
    #[error("Cannot determine the cache directory; specify the path explicitly")]
    NoCacheDir,

    /// 注釈ファイルのフォーマットが分からない
    #[error("Cannot infer the format of {}; specify it with --annot-format", .0.display())]
    UnknownFormat(PathBuf),

    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON の書き出しエラー
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 読み込みや解析のエラー
    #[error(transparent)]
    Hikaku(#[from] HikakuError),
}

/// `bccwj` コマンドを実行します。
pub fn run(args: Args) -> Result<(), BccwjError> {
    match args.command {
        Command::Cache(args) => cache::run(args),
        Command::GenSource(args) => gen_source::run(args),
    }
}
