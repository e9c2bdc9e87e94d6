//! hikaku コマンドラインツールのメインエントリーポイント
//!
//! BCCWJ コーパスの前処理 (`bccwj`) と、比較構文アノテーションファイルの
//! 変換・伏せ字化・復元 (`annot`) のサブコマンドを提供します。

mod annot;
mod bccwj;
mod utils;

use clap::Parser;
use thiserror::Error;

use hikaku::errors::HikakuError;

use crate::{annot::AnnotError, bccwj::BccwjError};

/// コマンドライン引数の構造体
#[derive(Parser, Debug)]
#[clap(name = "hikaku", version)]
struct Cli {
    /// Log level (e.g., warn, info, debug). RUST_LOG takes precedence.
    #[clap(short = 'l', long, global = true, default_value = "warn")]
    log_level: String,

    /// 実行するサブコマンド
    #[clap(subcommand)]
    command: Command,
}

/// 利用可能なサブコマンド
#[derive(Parser, Debug)]
enum Command {
    /// BCCWJ コーパスを扱います
    ///
    /// コーパスのキャッシュの作成や、アノテーションに対応する本文の抽出を行います。
    Bccwj(bccwj::Args),

    /// アノテーションファイルを扱います
    ///
    /// 形式の変換、伏せ字化、本文の復元を行います。
    Annot(annot::Args),
}

/// コマンドの実行中に発生する可能性のあるエラー
#[derive(Debug, Error)]
pub enum CliError {
    /// ロガー初期化のエラー
    #[error(transparent)]
    Hikaku(#[from] HikakuError),
    /// `bccwj` サブコマンドのエラー
    #[error(transparent)]
    Bccwj(#[from] BccwjError),
    /// `annot` サブコマンドのエラー
    #[error(transparent)]
    Annot(#[from] AnnotError),
}

/// メイン関数
///
/// コマンドライン引数をパースし、ロガーを初期化してから指定されたサブコマンドを実行します。
///
/// # エラー
///
/// 各サブコマンドの実行中にエラーが発生した場合、そのエラーが返されます。
fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let _logger = hikaku::logging::init_logging(&cli.log_level)?;

    match cli.command {
        Command::Bccwj(args) => Ok(bccwj::run(args)?),
        Command::Annot(args) => Ok(annot::run(args)?),
    }
}
