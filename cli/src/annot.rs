//! アノテーションファイルを扱うサブコマンド群
//!
//! 入力の読み込みと出力の書き出しのオプションは各サブコマンドで共通です。

mod convert;
mod count;
mod decrypt;
mod encrypt;

use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;

use hikaku::errors::HikakuError;
use hikaku::format::{AnnotationFormat, AnnotationStyle, Codec, SegmentMode};
use hikaku::Record;

use crate::utils;

/// `annot` コマンドの引数
#[derive(Parser, Debug)]
#[clap(name = "annot", about = "Converts, encrypts, and decrypts annotation files")]
pub struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Prints the number of records in an annotation file.
    Count(count::Args),

    /// Converts an annotation file into another format or style.
    Convert(convert::Args),

    /// Replaces every token with fillers of the same length.
    Encrypt(encrypt::Args),

    /// Restores encrypted tokens from the real texts.
    Decrypt(decrypt::Args),
}

/// `annot` コマンドの実行中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum AnnotError {
    /// ファイルフォーマットが分からない
    #[error("Cannot infer the format of {}; specify it with --from", .0.display())]
    UnknownFormat(PathBuf),

    /// 実テキストの取得元が指定されていない
    #[error("Either --corpus or --source is required")]
    NoTextSource,

    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 読み書きのエラー
    #[error(transparent)]
    Hikaku(#[from] HikakuError),
}

/// 入力ファイルのオプション
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Annotation file to read. `-` stands for STDIN.
    #[clap(value_name = "INPUT")]
    input: PathBuf,

    /// Input format: yaml, jsonl, or txt. Inferred from the extension if omitted.
    #[clap(short = 'f', long = "from", value_name = "FORMAT")]
    from: Option<AnnotationFormat>,

    /// Input style: bracketed or separate.
    /// Defaults to bracketed for txt and separate otherwise.
    #[clap(long, value_name = "STYLE")]
    from_style: Option<AnnotationStyle>,

    /// How to split bracketed text into tokens: run or char.
    #[clap(long, default_value = "run")]
    segment: SegmentMode,
}

impl InputArgs {
    fn codec(&self) -> Result<Codec, AnnotError> {
        let format = self
            .from
            .or_else(|| format_from_extension(&self.input))
            .ok_or_else(|| AnnotError::UnknownFormat(self.input.clone()))?;
        let style = self.from_style.unwrap_or_else(|| default_style(format));
        Ok(Codec::new(format, style)?.with_segment(self.segment))
    }

    /// 入力ファイルのレコードをすべて読み込みます。
    pub fn read_records(&self) -> Result<Vec<Record>, AnnotError> {
        let codec = self.codec()?;
        let records = codec.read(utils::open_input(&self.input)?)?;
        log::info!(
            "Loaded {} records from {}",
            records.len(),
            utils::display_name(&self.input)
        );
        Ok(records)
    }
}

/// 出力ファイルのオプション
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Annotation file to write. `-` stands for STDOUT.
    #[clap(value_name = "OUTPUT")]
    output: PathBuf,

    /// Output format: yaml, jsonl, or txt.
    /// Inferred from the extension, falling back to jsonl.
    #[clap(short = 't', long = "to", value_name = "FORMAT")]
    to: Option<AnnotationFormat>,

    /// Output style: bracketed or separate.
    /// Defaults to bracketed for txt and separate otherwise.
    #[clap(long, value_name = "STYLE")]
    to_style: Option<AnnotationStyle>,

    /// Overwrites an existing file without confirmation.
    #[clap(short = 'y', long)]
    yes: bool,
}

impl OutputArgs {
    fn codec(&self) -> Result<Codec, AnnotError> {
        let format = self
            .to
            .or_else(|| format_from_extension(&self.output))
            .unwrap_or(AnnotationFormat::Jsonl);
        let style = self.to_style.unwrap_or_else(|| default_style(format));
        Ok(Codec::new(format, style)?)
    }

    /// レコードを書き出します。
    ///
    /// すべてのレコードを変換してから書き込むため、途中で失敗しても出力は作られません。
    pub fn write_records(&self, records: &[Record]) -> Result<(), AnnotError> {
        let codec = self.codec()?;
        let mut buf = vec![];
        codec.write(&mut buf, records)?;
        utils::write_output(&self.output, &buf, self.yes)?;
        Ok(())
    }
}

fn format_from_extension(path: &Path) -> Option<AnnotationFormat> {
    path.extension()?
        .to_str()
        .and_then(AnnotationFormat::from_extension)
}

fn default_style(format: AnnotationFormat) -> AnnotationStyle {
    match format {
        AnnotationFormat::Text => AnnotationStyle::Bracketed,
        AnnotationFormat::Yaml | AnnotationFormat::Jsonl => AnnotationStyle::Separate,
    }
}

/// `annot` コマンドを実行します。
pub fn run(args: Args) -> Result<(), AnnotError> {
    match args.command {
        Command::Count(args) => count::run(args),
        Command::Convert(args) => convert::run(args),
        Command::Encrypt(args) => encrypt::run(args),
        Command::Decrypt(args) => decrypt::run(args),
    }
}
