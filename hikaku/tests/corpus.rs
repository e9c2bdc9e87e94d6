//! コーパスの読み込みとキャッシュに関するテスト
//!
//! 一時ディレクトリに小さなコーパスを作成し、ディレクトリ、zipアーカイブ、
//! キャッシュファイルのそれぞれから同じ索引が得られることを検証します。

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tempfile::tempdir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use hikaku::corpus::loader::{self, CorpusLoader};
use hikaku::corpus::CACHE_MAGIC;
use hikaku::{CorpusText, SentenceIndex, StartPos};

const CORE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mergedSample sampleID="PN1c_00001">
  <sentence>
    <SUW start="120">太郎</SUW><SUW start="140">は</SUW>
    <SUW start="150">花子</SUW><SUW start="170">より</SUW>
    <SUW start="190">背</SUW><SUW start="200">が</SUW><SUW start="210">高い</SUW>
  </sentence>
</mergedSample>
"#;

const LB_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mergedSample sampleID="LBf9_00090">
  <sentence><SUW start="18640">吾輩</SUW><SUW start="18660">は</SUW></sentence>
  <sentence><SUW start="18760">猫</SUW><SUW start="18770">である</SUW></sentence>
  <sentence><SUW>名前</SUW></sentence>
</mergedSample>
"#;

const IGNORED_XML: &str = r#"<mergedSample sampleID="OW6X_00000">
  <sentence><SUW start="0">無視</SUW></sentence>
</mergedSample>
"#;

fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn create_corpus_dir(root: &Path) {
    write_file(&root.join("CORE_NT/core_M-XML/PN1c_00001.xml"), CORE_XML);
    write_file(&root.join("LB/LBf9/LBf9_00090.xml"), LB_XML);
    write_file(&root.join("OW/OW6X_00000.xml"), IGNORED_XML);
}

fn create_corpus_zip(path: &Path) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, content) in [
        ("BCCWJ/CORE_NT/core_M-XML/PN1c_00001.xml", CORE_XML),
        ("BCCWJ/LB/LBf9/LBf9_00090.xml", LB_XML),
        ("BCCWJ/OW/OW6X_00000.xml", IGNORED_XML),
    ] {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn assert_expected(corpus: &CorpusText) {
    assert_eq!(4, corpus.len());
    assert_eq!(
        Some("太郎は花子より背が高い"),
        corpus.get(&SentenceIndex::new("PN1c_00001", StartPos::At(120)))
    );
    assert_eq!(
        Some("吾輩は"),
        corpus.get(&SentenceIndex::new("LBf9_00090", StartPos::At(18640)))
    );
    assert_eq!(
        Some("猫である"),
        corpus.get(&SentenceIndex::new("LBf9_00090", StartPos::At(18760)))
    );
    assert_eq!(
        Some("名前"),
        corpus.get(&SentenceIndex::new("LBf9_00090", StartPos::Unknown))
    );
    assert_eq!(
        None,
        corpus.get(&SentenceIndex::new("OW6X_00000", StartPos::At(0)))
    );
}

#[test]
fn test_load_dir() {
    let dir = tempdir().unwrap();
    create_corpus_dir(dir.path());

    let files = loader::corpus_files(dir.path()).unwrap();
    assert_eq!(2, files.len());

    let corpus = CorpusLoader::new().load_dir(dir.path()).unwrap();
    assert_expected(&corpus);
}

#[test]
fn test_load_zip() {
    let dir = tempdir().unwrap();
    let zip_path = dir.path().join("bccwj.zip");
    create_corpus_zip(&zip_path);

    let corpus = loader::load_corpus(&zip_path).unwrap();
    assert_expected(&corpus);
}

#[test]
fn test_open_detects_input_kind() {
    let dir = tempdir().unwrap();
    let corpus_dir = dir.path().join("corpus");
    create_corpus_dir(&corpus_dir);
    let zip_path = dir.path().join("corpus.zip");
    create_corpus_zip(&zip_path);

    let from_dir = CorpusText::open(&corpus_dir).unwrap();
    let from_zip = CorpusText::open(&zip_path).unwrap();
    assert_eq!(from_dir, from_zip);

    let cache_path = dir.path().join("cache/bccwj.cache.zst");
    fs::create_dir_all(cache_path.parent().unwrap()).unwrap();
    from_dir.write_cache(&cache_path).unwrap();
    let from_cache = CorpusText::open(&cache_path).unwrap();
    assert_expected(&from_cache);
    assert_eq!(from_dir, from_cache);
}

#[test]
fn test_cache_is_zstd_compressed() {
    let dir = tempdir().unwrap();
    let corpus_dir = dir.path().join("corpus");
    create_corpus_dir(&corpus_dir);
    let corpus = CorpusText::open(&corpus_dir).unwrap();

    let cache_path = dir.path().join("bccwj.cache.zst");
    corpus.write_cache(&cache_path).unwrap();

    let raw = fs::read(&cache_path).unwrap();
    assert!(!raw.starts_with(CACHE_MAGIC));
    let decompressed = zstd::decode_all(raw.as_slice()).unwrap();
    assert!(decompressed.starts_with(CACHE_MAGIC));
}

#[test]
fn test_overwrite_cache() {
    let dir = tempdir().unwrap();
    let cache_path = dir.path().join("bccwj.cache.zst");

    let first: CorpusText = [(SentenceIndex::new("A", StartPos::At(0)), "一".to_string())]
        .into_iter()
        .collect();
    first.write_cache(&cache_path).unwrap();

    let second: CorpusText = [(SentenceIndex::new("B", StartPos::Unknown), "二".to_string())]
        .into_iter()
        .collect();
    second.write_cache(&cache_path).unwrap();

    assert_eq!(second, CorpusText::from_cache(&cache_path).unwrap());
}

#[test]
fn test_broken_xml_is_an_error() {
    let dir = tempdir().unwrap();
    write_file(
        &dir.path().join("LB/LBf9/broken.xml"),
        "<mergedSample sampleID=\"X\"><sentence></mergedSample>",
    );
    assert!(CorpusText::open(dir.path()).is_err());
}
