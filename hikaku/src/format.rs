//! アノテーションファイルの読み書き
//!
//! ファイルフォーマット ([`AnnotationFormat`]) とアノテーションの表し方
//! ([`AnnotationStyle`]) の組み合わせごとに、[`Record`] の列を読み書きします。
//!
//! | フォーマット | `separate` | `bracketed` |
//! |---|---|---|
//! | `yaml`  | ○ | ○ |
//! | `jsonl` | ○ | ○ |
//! | `txt`   | × | ○ |
//!
//! `separate` スタイルのレコードは `ID`, `tokens`, `comp`, `comments`, `ID_v1`、
//! `bracketed` スタイルのレコードは `ID`, `annot`, `comments`, `ID_v1` の各フィールドを持ちます。
//! `txt` フォーマットは1行1レコードの `ID<TAB>annot[<TAB>comment]*` です。

use std::fmt;
use std::io::{BufRead, Read, Write};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::bracket::{CharSegmenter, RunSegmenter};
use crate::errors::{HikakuError, Result};
use crate::id::RecordId;
use crate::record::Record;
use crate::span::Span;

/// ファイルフォーマット
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnnotationFormat {
    /// レコードのシーケンスからなるYAML文書
    Yaml,

    /// 1行1レコードのJSON
    Jsonl,

    /// 1行1レコードのタブ区切りテキスト
    Text,
}

impl AnnotationFormat {
    /// 拡張子からフォーマットを推定します。
    pub fn from_extension(ext: &str) -> Option<Self> {
        ext.parse().ok()
    }
}

impl FromStr for AnnotationFormat {
    type Err = &'static str;

    fn from_str(format: &str) -> Result<Self, Self::Err> {
        match format {
            "yaml" | "yml" => Ok(Self::Yaml),
            "jsonl" => Ok(Self::Jsonl),
            "txt" | "text" => Ok(Self::Text),
            _ => Err("Could not parse a format"),
        }
    }
}

impl fmt::Display for AnnotationFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Yaml => "yaml",
            Self::Jsonl => "jsonl",
            Self::Text => "txt",
        })
    }
}

/// アノテーションの表し方
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnnotationStyle {
    /// 括弧表記の文字列
    Bracketed,

    /// トークン列とスパン列
    Separate,
}

impl FromStr for AnnotationStyle {
    type Err = &'static str;

    fn from_str(style: &str) -> Result<Self, Self::Err> {
        match style {
            "bracketed" => Ok(Self::Bracketed),
            "separate" => Ok(Self::Separate),
            _ => Err("Could not parse a style"),
        }
    }
}

impl fmt::Display for AnnotationStyle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Bracketed => "bracketed",
            Self::Separate => "separate",
        })
    }
}

/// 括弧表記を読み込むときのトークン分割
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SegmentMode {
    /// 括弧で区切られた文字列を1トークンとする
    #[default]
    Run,

    /// 1文字を1トークンとする
    Char,
}

impl FromStr for SegmentMode {
    type Err = &'static str;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "run" => Ok(Self::Run),
            "char" => Ok(Self::Char),
            _ => Err("Could not parse a segment mode"),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct SeparateRepr {
    #[serde(rename = "ID")]
    id: RecordId,
    tokens: Vec<String>,
    comp: Vec<Span>,
    #[serde(default)]
    comments: Option<Vec<String>>,
    #[serde(rename = "ID_v1", default, skip_serializing_if = "Option::is_none")]
    legacy_id: Option<RecordId>,
}

#[derive(Serialize, Deserialize)]
struct BracketedRepr {
    #[serde(rename = "ID")]
    id: RecordId,
    annot: String,
    #[serde(default)]
    comments: Option<Vec<String>>,
    #[serde(rename = "ID_v1", default, skip_serializing_if = "Option::is_none")]
    legacy_id: Option<RecordId>,
}

#[derive(Deserialize)]
struct IdOnly {
    #[serde(rename = "ID")]
    id: RecordId,
}

/// フォーマットとスタイルを組み合わせた読み書き器
#[derive(Clone, Copy, Debug)]
pub struct Codec {
    format: AnnotationFormat,
    style: AnnotationStyle,
    segment: SegmentMode,
}

impl Codec {
    /// 新しい読み書き器を作成します。
    ///
    /// # エラー
    ///
    /// `txt` フォーマットと `separate` スタイルの組み合わせは
    /// [`HikakuError::UnsupportedCombination`] になります。
    pub fn new(format: AnnotationFormat, style: AnnotationStyle) -> Result<Self> {
        if (format, style) == (AnnotationFormat::Text, AnnotationStyle::Separate) {
            return Err(HikakuError::UnsupportedCombination { format, style });
        }
        Ok(Self {
            format,
            style,
            segment: SegmentMode::default(),
        })
    }

    /// 括弧表記のトークン分割を設定します。
    pub fn with_segment(mut self, segment: SegmentMode) -> Self {
        self.segment = segment;
        self
    }

    /// フォーマットを返します。
    pub fn format(&self) -> AnnotationFormat {
        self.format
    }

    /// スタイルを返します。
    pub fn style(&self) -> AnnotationStyle {
        self.style
    }

    /// レコード列を読み込みます。
    ///
    /// 不正なレコードが1つでもあると読み込みを中止します。
    ///
    /// # エラー
    ///
    /// 不正なレコードがある場合、その行番号またはレコード番号を含む
    /// [`HikakuError`] が返されます。
    pub fn read<R>(&self, rdr: R) -> Result<Vec<Record>>
    where
        R: BufRead,
    {
        match (self.format, self.style) {
            (AnnotationFormat::Yaml, AnnotationStyle::Separate) => {
                read_yaml(rdr, Self::from_separate)
            }
            (AnnotationFormat::Yaml, AnnotationStyle::Bracketed) => {
                read_yaml(rdr, |repr: BracketedRepr| self.from_bracketed(repr))
            }
            (AnnotationFormat::Jsonl, AnnotationStyle::Separate) => {
                read_jsonl(rdr, Self::from_separate)
            }
            (AnnotationFormat::Jsonl, AnnotationStyle::Bracketed) => {
                read_jsonl(rdr, |repr: BracketedRepr| self.from_bracketed(repr))
            }
            (AnnotationFormat::Text, AnnotationStyle::Bracketed) => self.read_text(rdr),
            (format @ AnnotationFormat::Text, style @ AnnotationStyle::Separate) => {
                Err(HikakuError::UnsupportedCombination { format, style })
            }
        }
    }

    /// レコード列を書き出します。
    ///
    /// # エラー
    ///
    /// 括弧表記にできないレコードがある場合や書き込みに失敗した場合、
    /// [`HikakuError`] が返されます。
    pub fn write<W>(&self, mut wtr: W, records: &[Record]) -> Result<()>
    where
        W: Write,
    {
        match (self.format, self.style) {
            (AnnotationFormat::Yaml, AnnotationStyle::Separate) => {
                let reprs: Vec<_> = records.iter().map(to_separate).collect();
                serde_yaml::to_writer(&mut wtr, &reprs)?;
            }
            (AnnotationFormat::Yaml, AnnotationStyle::Bracketed) => {
                let reprs = records
                    .iter()
                    .map(to_bracketed)
                    .collect::<Result<Vec<_>>>()?;
                serde_yaml::to_writer(&mut wtr, &reprs)?;
            }
            (AnnotationFormat::Jsonl, AnnotationStyle::Separate) => {
                for record in records {
                    serde_json::to_writer(&mut wtr, &to_separate(record))?;
                    wtr.write_all(b"\n")?;
                }
            }
            (AnnotationFormat::Jsonl, AnnotationStyle::Bracketed) => {
                let reprs = records
                    .iter()
                    .map(to_bracketed)
                    .collect::<Result<Vec<_>>>()?;
                for repr in &reprs {
                    serde_json::to_writer(&mut wtr, repr)?;
                    wtr.write_all(b"\n")?;
                }
            }
            (AnnotationFormat::Text, AnnotationStyle::Bracketed) => {
                let lines = records
                    .iter()
                    .map(to_text_line)
                    .collect::<Result<Vec<_>>>()?;
                for line in &lines {
                    writeln!(wtr, "{line}")?;
                }
            }
            (format @ AnnotationFormat::Text, style @ AnnotationStyle::Separate) => {
                return Err(HikakuError::UnsupportedCombination { format, style });
            }
        }
        wtr.flush()?;
        Ok(())
    }

    fn from_separate(repr: SeparateRepr) -> Result<Record> {
        Ok(Record::new(repr.id, repr.tokens, repr.comp)?
            .with_comments(repr.comments.unwrap_or_default())
            .with_legacy_id(repr.legacy_id))
    }

    fn from_bracketed(&self, repr: BracketedRepr) -> Result<Record> {
        Ok(self
            .parse_brackets(repr.id, &repr.annot)?
            .with_comments(repr.comments.unwrap_or_default())
            .with_legacy_id(repr.legacy_id))
    }

    fn parse_brackets(&self, id: RecordId, annot: &str) -> Result<Record> {
        match self.segment {
            SegmentMode::Run => Record::from_brackets(id, annot, &mut RunSegmenter),
            SegmentMode::Char => Record::from_brackets(id, annot, &mut CharSegmenter),
        }
    }

    fn read_text<R>(&self, rdr: R) -> Result<Vec<Record>>
    where
        R: BufRead,
    {
        let mut records = vec![];
        for (i, line) in rdr.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let mut spl = line.split('\t');
            let (Some(id), Some(annot)) = (spl.next(), spl.next()) else {
                return Err(HikakuError::invalid_format(
                    "txt",
                    format!("line {}: each line must be `ID<TAB>annotation`", i + 1),
                ));
            };
            let comments = spl.map(String::from).collect();
            let record = self
                .parse_brackets(RecordId::from(id), annot)
                .map_err(|e| at_position("txt", "line", i + 1, e))?;
            records.push(record.with_comments(comments));
        }
        Ok(records)
    }
}

fn at_position(format: &'static str, unit: &str, pos: usize, e: HikakuError) -> HikakuError {
    HikakuError::invalid_format(format, format!("{unit} {pos}: {e}"))
}

fn read_yaml<R, T, F>(mut rdr: R, mut convert: F) -> Result<Vec<Record>>
where
    R: BufRead,
    T: DeserializeOwned,
    F: FnMut(T) -> Result<Record>,
{
    let mut data = String::new();
    rdr.read_to_string(&mut data)?;
    if data.trim().is_empty() {
        return Ok(vec![]);
    }
    let reprs: Vec<T> = serde_yaml::from_str(&data)?;
    reprs
        .into_iter()
        .enumerate()
        .map(|(i, repr)| convert(repr).map_err(|e| at_position("yaml", "record", i + 1, e)))
        .collect()
}

fn read_jsonl<R, T, F>(rdr: R, mut convert: F) -> Result<Vec<Record>>
where
    R: BufRead,
    T: DeserializeOwned,
    F: FnMut(T) -> Result<Record>,
{
    let mut records = vec![];
    for (i, line) in rdr.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .map_err(HikakuError::from)
            .and_then(&mut convert)
            .map_err(|e| at_position("jsonl", "line", i + 1, e))?;
        records.push(record);
    }
    Ok(records)
}

fn to_separate(record: &Record) -> SeparateRepr {
    SeparateRepr {
        id: record.id().clone(),
        tokens: record.tokens().to_vec(),
        comp: record.spans().to_vec(),
        comments: Some(record.comments().to_vec()),
        legacy_id: record.legacy_id().cloned(),
    }
}

fn to_bracketed(record: &Record) -> Result<BracketedRepr> {
    let annot = record
        .to_brackets()
        .map_err(|e| HikakuError::invalid_argument("records", format!("{}: {e}", record.id())))?;
    Ok(BracketedRepr {
        id: record.id().clone(),
        annot: annot.into_string(),
        comments: Some(record.comments().to_vec()),
        legacy_id: record.legacy_id().cloned(),
    })
}

fn to_text_line(record: &Record) -> Result<String> {
    let annot = to_bracketed(record)?.annot;
    let fields = std::iter::once(record.id().as_str())
        .chain(std::iter::once(annot.as_str()))
        .chain(record.comments().iter().map(String::as_str));

    let mut line = String::new();
    for (i, field) in fields.enumerate() {
        if field.contains(['\t', '\n', '\r']) {
            return Err(HikakuError::invalid_argument(
                "records",
                format!("{}: a tab or a newline cannot be written in txt", record.id()),
            ));
        }
        if i != 0 {
            line.push('\t');
        }
        line.push_str(field);
    }
    if let Some(legacy_id) = record.legacy_id() {
        log::warn!("{}: ID_v1 {legacy_id} is dropped in txt", record.id());
    }
    Ok(line)
}

/// ファイルからレコードIDだけを読み込みます。
///
/// スタイルに関係なく `ID` フィールド (`txt` では最初の列) を取り出します。
///
/// # エラー
///
/// 入力の構文が不正な場合、[`HikakuError`] が返されます。
pub fn read_ids<R>(mut rdr: R, format: AnnotationFormat) -> Result<Vec<RecordId>>
where
    R: BufRead,
{
    match format {
        AnnotationFormat::Yaml => {
            let mut data = String::new();
            rdr.read_to_string(&mut data)?;
            if data.trim().is_empty() {
                return Ok(vec![]);
            }
            let ids: Vec<IdOnly> = serde_yaml::from_str(&data)?;
            Ok(ids.into_iter().map(|x| x.id).collect())
        }
        AnnotationFormat::Jsonl => {
            let mut ids = vec![];
            for (i, line) in rdr.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let x: IdOnly = serde_json::from_str(&line)
                    .map_err(|e| at_position("jsonl", "line", i + 1, e.into()))?;
                ids.push(x.id);
            }
            Ok(ids)
        }
        AnnotationFormat::Text => {
            let mut ids = vec![];
            for line in rdr.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let id = line.split('\t').next().unwrap_or_default();
                ids.push(RecordId::from(id));
            }
            Ok(ids)
        }
    }
}
