//! BCCWJ のXMLファイルからの文テキストの読み込み
//!
//! コーパスのルートディレクトリ、またはそれを含むzipアーカイブから
//! 次のファイルを読み込みます。
//!
//! - `CORE_NT/core_M-XML/*.xml`
//! - `LB/**/*.xml`
//!
//! 各 `mergedSample` の子孫の `sentence` ごとに、子孫の `SUW` のテキストを
//! 空白を除いて連結したものを文のテキストとし、最初の `SUW` の `start` 属性を
//! 文の開始位置とします。

use std::borrow::Cow;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Component, Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::corpus::CorpusText;
use crate::errors::Result;
use crate::id::{SentenceIndex, StartPos};

/// `sampleID` 属性がない `mergedSample` に使うサンプルID
pub const NO_SAMPLE_ID: &str = "<NO_SAMPLE_ID>";

/// コーパスを読み込みます。
///
/// `path` がディレクトリならXMLファイル群を、そうでなければzipアーカイブを読み込みます。
///
/// # エラー
///
/// ファイルの読み込みやXMLの解析に失敗した場合、エラーが返されます。
pub fn load_corpus<P>(path: P) -> Result<CorpusText>
where
    P: AsRef<Path>,
{
    CorpusLoader::new().load(path)
}

/// コーパスの読み込み器
#[derive(Clone, Debug, Default)]
pub struct CorpusLoader {
    progress: bool,
}

impl CorpusLoader {
    /// 新しい読み込み器を作成します。進捗表示は無効です。
    pub fn new() -> Self {
        Self::default()
    }

    /// 進捗バーを表示するかどうかを設定します。
    pub fn progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }

    /// ディレクトリまたはzipアーカイブからコーパスを読み込みます。
    pub fn load<P>(&self, path: P) -> Result<CorpusText>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if path.is_dir() {
            self.load_dir(path)
        } else {
            self.load_zip(path)
        }
    }

    /// コーパスのルートディレクトリから読み込みます。
    ///
    /// # 引数
    ///
    /// * `root` - `CORE_NT` や `LB` を含むディレクトリ
    pub fn load_dir<P>(&self, root: P) -> Result<CorpusText>
    where
        P: AsRef<Path>,
    {
        let root = root.as_ref();
        let files = corpus_files(root)?;
        log::info!("Found {} XML files in {}", files.len(), root.display());

        let pb = self.progress_bar(files.len());
        let mut corpus = CorpusText::new();
        for path in &files {
            pb.set_message(file_label(path));
            let rdr = BufReader::new(File::open(path)?);
            parse_xml(rdr, &mut corpus)
                .inspect_err(|e| log::error!("{}: {e}", path.display()))?;
            pb.inc(1);
        }
        pb.finish_and_clear();

        log::info!("Loaded {} sentences", corpus.len());
        Ok(corpus)
    }

    /// コーパスを含むzipアーカイブから読み込みます。
    ///
    /// アーカイブ内のパスの先頭に任意のディレクトリがあってもかまいません。
    pub fn load_zip<P>(&self, path: P) -> Result<CorpusText>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let mut archive = ZipArchive::new(BufReader::new(File::open(path)?))?;
        let mut names: Vec<String> = archive
            .file_names()
            .filter(|name| !name.ends_with('/') && is_archived_corpus_xml(name))
            .map(String::from)
            .collect();
        names.sort();
        log::info!("Found {} XML files in {}", names.len(), path.display());

        let pb = self.progress_bar(names.len());
        let mut corpus = CorpusText::new();
        for name in &names {
            pb.set_message(file_label(Path::new(name)));
            let file = archive.by_name(name)?;
            parse_xml(BufReader::new(file), &mut corpus)
                .inspect_err(|e| log::error!("{}:{name}: {e}", path.display()))?;
            pb.inc(1);
        }
        pb.finish_and_clear();

        log::info!("Loaded {} sentences", corpus.len());
        Ok(corpus)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn normal_components(path: &Path) -> Vec<&OsStr> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s),
            _ => None,
        })
        .collect()
}

fn is_xml(name: &OsStr) -> bool {
    Path::new(name).extension().is_some_and(|ext| ext == "xml")
}

fn matches_layout(components: &[&OsStr]) -> bool {
    match components {
        [core, xml_dir, file] if *core == "CORE_NT" && *xml_dir == "core_M-XML" => is_xml(file),
        [lb, .., file] if *lb == "LB" => is_xml(file),
        _ => false,
    }
}

/// コーパスのルートからの相対パスが読み込み対象のXMLファイルかどうか。
pub fn is_corpus_xml(rel: &Path) -> bool {
    matches_layout(&normal_components(rel))
}

fn is_archived_corpus_xml(name: &str) -> bool {
    let components = normal_components(Path::new(name));
    (0..components.len()).any(|i| matches_layout(&components[i..]))
}

#[derive(Default)]
struct SentenceBuf {
    in_sample: bool,
    start_pos: Option<StartPos>,
    text: String,
}

fn suw_start(e: &BytesStart) -> Result<StartPos> {
    let Some(attr) = e.try_get_attribute("start")? else {
        return Ok(StartPos::Unknown);
    };
    let value = attr.unescape_value()?;
    Ok(StartPos::parse(value.trim()).unwrap_or_else(|| {
        log::debug!("Unusable start attribute {value:?}");
        StartPos::Unknown
    }))
}

fn open_suw(e: &BytesStart, open: &mut [SentenceBuf]) -> Result<()> {
    if open.iter().any(|s| s.start_pos.is_none()) {
        let start = suw_start(e)?;
        for sentence in open.iter_mut().filter(|s| s.start_pos.is_none()) {
            sentence.start_pos = Some(start);
        }
    }
    Ok(())
}

fn push_text(text: &str, open: &mut [SentenceBuf]) {
    let text: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if text.is_empty() {
        return;
    }
    for sentence in open {
        sentence.text.push_str(&text);
    }
}

fn close_sentence(sentence: SentenceBuf, sample: Option<&str>, corpus: &mut CorpusText) -> bool {
    let (true, Some(sample)) = (sentence.in_sample, sample) else {
        return false;
    };
    let index = SentenceIndex::new(sample, sentence.start_pos.unwrap_or(StartPos::Unknown));
    if corpus.insert(index.clone(), sentence.text).is_some() {
        log::debug!("Duplicate sentence {index}; the last one is kept");
    }
    true
}

/// 1つのXML文書を読み込み、文を `corpus` に追加します。
///
/// # 戻り値
///
/// 追加した文の数
///
/// # エラー
///
/// XMLの構文が不正な場合、[`HikakuError::Xml`](crate::errors::HikakuError::Xml) が返されます。
pub fn parse_xml<R>(rdr: R, corpus: &mut CorpusText) -> Result<usize>
where
    R: BufRead,
{
    let mut reader = Reader::from_reader(rdr);
    let mut buf = vec![];

    let mut sample: Option<String> = None;
    let mut open: Vec<SentenceBuf> = vec![];
    let mut suw_depth = 0usize;
    let mut count = 0;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"mergedSample" => sample = Some(sample_id(&e)?),
                b"sentence" => open.push(SentenceBuf {
                    in_sample: sample.is_some(),
                    ..Default::default()
                }),
                b"SUW" => {
                    open_suw(&e, &mut open)?;
                    suw_depth += 1;
                }
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"sentence" => {
                    let sentence = SentenceBuf {
                        in_sample: sample.is_some(),
                        ..Default::default()
                    };
                    count += usize::from(close_sentence(sentence, sample.as_deref(), corpus));
                }
                b"SUW" => open_suw(&e, &mut open)?,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"mergedSample" => sample = None,
                b"sentence" => {
                    if let Some(sentence) = open.pop() {
                        count += usize::from(close_sentence(sentence, sample.as_deref(), corpus));
                    }
                }
                b"SUW" => suw_depth = suw_depth.saturating_sub(1),
                _ => {}
            },
            Event::Text(e) if suw_depth > 0 => push_text(&e.unescape()?, &mut open),
            Event::CData(e) if suw_depth > 0 => {
                let raw = e.into_inner();
                push_text(&String::from_utf8_lossy(&raw), &mut open);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(count)
}

fn sample_id(e: &BytesStart) -> Result<String> {
    let id = match e.try_get_attribute("sampleID")? {
        Some(attr) => attr.unescape_value()?,
        None => Cow::Borrowed(NO_SAMPLE_ID),
    };
    Ok(id.into_owned())
}

/// コーパスの読み込み対象になるファイルを列挙します。
pub fn corpus_files<P>(root: P) -> Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
{
    let root = root.as_ref();
    let mut files = vec![];
    for entry in WalkDir::new(root) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if entry.file_type().is_file() && is_corpus_xml(rel) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
