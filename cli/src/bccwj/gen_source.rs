//! 注釈に対応する本文の抽出

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;

use hikaku::corpus;
use hikaku::format::{self, AnnotationFormat};
use hikaku::reincorp::{ContinuationTable, Reincorporator};
use hikaku::CorpusId;

use crate::bccwj::BccwjError;
use crate::utils;

/// `bccwj gen-source` コマンドの引数
#[derive(Parser, Debug)]
pub struct Args {
    /// Corpus directory, zip archive, or cache file. Defaults to the cache built by `bccwj cache`.
    #[clap(value_name = "CORPUS")]
    corpus: Option<PathBuf>,

    /// Annotation file whose IDs are extracted. Can be repeated.
    #[clap(long, value_name = "PATH")]
    annot: Vec<PathBuf>,

    /// Format of every --annot file. Inferred from each extension if omitted.
    #[clap(long, value_name = "FORMAT")]
    annot_format: Option<AnnotationFormat>,

    /// IDs to extract, separated by whitespace or `;`. Can be repeated.
    #[clap(long, value_name = "IDS")]
    ids: Vec<String>,

    /// Continuation table (TSV). Defaults to the built-in BCCWJ table.
    #[clap(long, value_name = "PATH")]
    continuations: Option<PathBuf>,

    /// JSON file to write. `-` stands for STDOUT.
    #[clap(short = 'o', long, default_value = "-")]
    output: PathBuf,

    /// Overwrites an existing file without confirmation.
    #[clap(short = 'y', long)]
    yes: bool,
}

/// `--ids` の値を個々の ID に分割します。
///
/// ID はカンマを含むため、区切りには空白と `;` を使います。
fn split_ids(ids: &str) -> impl Iterator<Item = &str> {
    ids.split(|c: char| c.is_whitespace() || c == ';')
        .filter(|id| !id.is_empty())
}

fn collect_ids(args: &Args) -> Result<Vec<CorpusId>, BccwjError> {
    let mut raw_ids = vec![];
    for path in &args.annot {
        let format = args
            .annot_format
            .or_else(|| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(AnnotationFormat::from_extension)
            })
            .ok_or_else(|| BccwjError::UnknownFormat(path.clone()))?;
        let ids = format::read_ids(BufReader::new(File::open(path)?), format)?;
        log::info!("Read {} IDs from {}", ids.len(), path.display());
        raw_ids.extend(ids.iter().map(|id| id.as_str().to_string()));
    }
    for ids in &args.ids {
        raw_ids.extend(split_ids(ids).map(str::to_string));
    }

    let mut corpus_ids = vec![];
    for id in raw_ids {
        match CorpusId::parse(&id) {
            Some(corpus_id) => corpus_ids.push(corpus_id),
            None => log::warn!("Skipped an ID that does not point into the corpus: {id}"),
        }
    }
    Ok(corpus_ids)
}

/// 指定された ID の本文を `{"sampleID,startPos": text}` 形式の JSON で書き出します。
///
/// 本文が見つからない ID は警告を記録して読み飛ばします。
pub fn run(args: Args) -> Result<(), BccwjError> {
    let ids = collect_ids(&args)?;

    let continuations = match &args.continuations {
        Some(path) => ContinuationTable::from_reader(File::open(path)?)?,
        None => ContinuationTable::bccwj()?,
    };
    let corpus_path = match &args.corpus {
        Some(path) => path.clone(),
        None => corpus::default_cache_path().ok_or(BccwjError::NoCacheDir)?,
    };
    let reincorp = Reincorporator::new(utils::load_corpus(&corpus_path)?, continuations);

    let mut texts = BTreeMap::new();
    for id in &ids {
        if let Some(text) = reincorp.sentence(&id.sentence_index()) {
            texts.insert(id.to_string(), text.into_owned());
        }
    }
    log::info!("Found {} of {} sentences", texts.len(), ids.len());

    utils::write_output(&args.output, &render(&texts)?, args.yes)?;
    Ok(())
}

/// 1行のコンパクトな JSON オブジェクトにします。
fn render(texts: &BTreeMap<String, String>) -> Result<Vec<u8>, BccwjError> {
    let mut data = serde_json::to_vec(texts)?;
    data.push(b'\n');
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use hikaku::StartPos;
    use tempfile::tempdir;

    #[test]
    fn test_split_ids() {
        let ids: Vec<_> = split_ids("PN1c_00001,120; LBf9_00090,18640\n;;A,B").collect();
        assert_eq!(vec!["PN1c_00001,120", "LBf9_00090,18640", "A,B"], ids);
    }

    #[test]
    fn test_collect_ids() {
        let dir = tempdir().unwrap();
        let annot = dir.path().join("comp.jsonl");
        fs::write(
            &annot,
            "{\"ID\":\"PN1c_00001,120\",\"annot\":\"x\"}\n{\"ID\":\"example\",\"annot\":\"y\"}\n",
        )
        .unwrap();

        let args = Args::try_parse_from([
            "gen-source",
            "--annot",
            annot.to_str().unwrap(),
            "--annot-format",
            "jsonl",
            "--ids",
            "LBf9_00090,18640;OC01_00001,-1",
        ])
        .unwrap();
        let ids = collect_ids(&args).unwrap();
        assert_eq!(
            vec![
                CorpusId::new("PN1c_00001", StartPos::At(120)),
                CorpusId::new("LBf9_00090", StartPos::At(18640)),
                CorpusId::new("OC01_00001", StartPos::Unknown),
            ],
            ids
        );
    }

    #[test]
    fn test_render_is_compact() {
        let texts = BTreeMap::from([
            ("PN1c_00001,120".to_string(), "太郎は花子より背が高い".to_string()),
            ("LBf9_00090,18640".to_string(), "吾輩は猫である".to_string()),
        ]);
        assert_eq!(
            "{\"LBf9_00090,18640\":\"吾輩は猫である\",\"PN1c_00001,120\":\"太郎は花子より背が高い\"}\n",
            String::from_utf8(render(&texts).unwrap()).unwrap()
        );
    }

    #[test]
    fn test_unknown_annot_format() {
        let args = Args::try_parse_from(["gen-source", "--annot", "comp.dat"]).unwrap();
        assert!(matches!(
            collect_ids(&args),
            Err(BccwjError::UnknownFormat(_))
        ));
    }
}
