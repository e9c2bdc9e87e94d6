//! 伏せ字化されたトークンの復元

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use hikaku::cipher::{self, DecryptOutcome};
use hikaku::reincorp::{ContinuationTable, Reincorporator};
use hikaku::source::{JsonTextSource, TextSource};

use crate::annot::{AnnotError, InputArgs, OutputArgs};
use crate::utils;

/// `annot decrypt` コマンドの引数
#[derive(Parser, Debug)]
#[clap(group(ArgGroup::new("texts").required(true).args(["corpus", "source"])))]
pub struct Args {
    #[clap(flatten)]
    input: InputArgs,

    #[clap(flatten)]
    output: OutputArgs,

    /// Corpus directory, zip archive, or cache file to take the real texts from.
    #[clap(long, value_name = "PATH")]
    corpus: Option<PathBuf>,

    /// JSON file produced by `bccwj gen-source`.
    #[clap(long, value_name = "PATH")]
    source: Option<PathBuf>,

    /// Continuation table (TSV) used with --corpus. Defaults to the built-in BCCWJ table.
    #[clap(long, value_name = "PATH", requires = "corpus")]
    continuations: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct Summary {
    exact: usize,
    mismatched: usize,
    unparsable: usize,
    not_found: usize,
}

impl Summary {
    fn add(&mut self, outcome: &DecryptOutcome) {
        match outcome {
            DecryptOutcome::Decrypted(check) if check.is_exact() => self.exact += 1,
            DecryptOutcome::Decrypted(_) => self.mismatched += 1,
            DecryptOutcome::UnparsableId => self.unparsable += 1,
            DecryptOutcome::TextNotFound(_) => self.not_found += 1,
        }
    }
}

fn load_source(args: &Args) -> Result<Box<dyn TextSource>, AnnotError> {
    if let Some(path) = &args.source {
        let source = JsonTextSource::from_reader(BufReader::new(File::open(path)?))?;
        log::info!("Loaded {} texts from {}", source.len(), path.display());
        return Ok(Box::new(source));
    }

    let corpus = args.corpus.as_ref().ok_or(AnnotError::NoTextSource)?;
    let continuations = match &args.continuations {
        Some(path) => ContinuationTable::from_reader(File::open(path)?)?,
        None => ContinuationTable::bccwj()?,
    };
    let corpus = utils::load_corpus(corpus)?;
    Ok(Box::new(Reincorporator::new(corpus, continuations)))
}

/// 実テキストを使ってトークンを復元し、書き出します。
///
/// 復元できなかったレコードはそのまま書き出されます。
pub fn run(args: Args) -> Result<(), AnnotError> {
    let mut records = args.input.read_records()?;
    let source = load_source(&args)?;

    let mut summary = Summary::default();
    for record in &mut records {
        let outcome = cipher::decrypt_record(record, source.as_ref());
        summary.add(&outcome);
    }

    args.output.write_records(&records)?;
    eprintln!(
        "Decrypted: {}, with length mismatches: {}, unparsable IDs: {}, texts not found: {}",
        summary.exact, summary.mismatched, summary.unparsable, summary.not_found
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use hikaku::cipher::LengthCheck;
    use hikaku::{CorpusId, StartPos};

    #[test]
    fn test_requires_a_text_source() {
        assert!(Args::try_parse_from(["decrypt", "in.jsonl", "out.jsonl"]).is_err());
        assert!(Args::try_parse_from([
            "decrypt", "in.jsonl", "out.jsonl", "--source", "s.json", "--continuations", "c.tsv"
        ])
        .is_err());
        assert!(Args::try_parse_from([
            "decrypt", "in.jsonl", "out.jsonl", "--corpus", "bccwj.zip", "--continuations", "c.tsv"
        ])
        .is_ok());
    }

    #[test]
    fn test_summary() {
        let mut summary = Summary::default();
        summary.add(&DecryptOutcome::Decrypted(LengthCheck::Exact));
        summary.add(&DecryptOutcome::Decrypted(LengthCheck::RealTextShorter {
            required: 3,
            available: 2,
        }));
        summary.add(&DecryptOutcome::UnparsableId);
        summary.add(&DecryptOutcome::TextNotFound(CorpusId::new(
            "A",
            StartPos::Unknown,
        )));
        assert_eq!(1, summary.exact);
        assert_eq!(1, summary.mismatched);
        assert_eq!(1, summary.unparsable);
        assert_eq!(1, summary.not_found);
    }
}
