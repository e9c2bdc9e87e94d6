//! コーパスのキャッシュの作成

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use hikaku::corpus;

use crate::bccwj::BccwjError;
use crate::utils;

/// `bccwj cache` コマンドの引数
#[derive(Parser, Debug)]
pub struct Args {
    /// Corpus directory or zip archive.
    #[clap(value_name = "CORPUS")]
    corpus: PathBuf,

    /// Cache file to write. Defaults to bccwj.cache.zst in the user cache directory.
    #[clap(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Overwrites an existing cache without confirmation.
    #[clap(short = 'y', long)]
    yes: bool,
}

/// コーパスを読み込み、キャッシュファイルを書き出します。
///
/// 上書きの確認はコーパスを読み込む前に行います。
pub fn run(args: Args) -> Result<(), BccwjError> {
    let output = match args.output {
        Some(path) => path,
        None => corpus::default_cache_path().ok_or(BccwjError::NoCacheDir)?,
    };
    if !utils::confirm_overwrite(&output, args.yes)? {
        log::info!("Writing to {} aborted by the user", output.display());
        return Ok(());
    }

    let corpus = utils::load_corpus(&args.corpus)?;
    if let Some(dir) = output.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    corpus.write_cache(&output)?;
    eprintln!("Cached {} sentences to {}", corpus.len(), output.display());
    Ok(())
}
