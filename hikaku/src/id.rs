//! レコードIDとコーパス上の文位置の定義
//!
//! アノテーションレコードのIDは基本的に不透明な文字列ですが、
//! `sampleID,startPos` という正準形をもつものは [`CorpusId`] として解析でき、
//! BCCWJ の文 ([`SentenceIndex`]) と対応付けられます。

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static RE_CORPUS_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<sample>[^,;\s]+),(?P<pos>-1|[0-9]+)$").unwrap()
});

/// アノテーションレコードの識別子
///
/// 任意の文字列を保持します。コーパス上の位置として解釈できるかどうかは
/// [`RecordId::corpus_id`] で確認します。
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// 新しい識別子を作成します。
    pub fn new<S>(id: S) -> Self
    where
        S: Into<String>,
    {
        Self(id.into())
    }

    /// 識別子の文字列を返します。
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 識別子を [`CorpusId`] として解析します。
    ///
    /// # 戻り値
    ///
    /// 正準形でない場合は `None`
    pub fn corpus_id(&self) -> Option<CorpusId> {
        CorpusId::parse(&self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&CorpusId> for RecordId {
    fn from(id: &CorpusId) -> Self {
        Self(id.to_string())
    }
}

/// サンプル内での文の開始位置
///
/// BCCWJ の XML で最初の短単位 (SUW) に `start` 属性がない文は
/// [`StartPos::Unknown`] になります。文字列表現は `-1` です。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StartPos {
    /// 既知の開始位置
    At(u64),

    /// 開始位置が不明
    Unknown,
}

impl StartPos {
    /// `UNKNOWN` の整数表現
    pub const UNKNOWN_VALUE: i64 = -1;

    /// 整数表現から変換します。
    ///
    /// `-1` は [`StartPos::Unknown`] に、非負の値は [`StartPos::At`] になります。
    /// それ以外の負の値は `None` です。
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            Self::UNKNOWN_VALUE => Some(Self::Unknown),
            v => u64::try_from(v).ok().map(Self::At),
        }
    }

    /// 整数表現を返します。
    ///
    /// # 戻り値
    ///
    /// 位置が `i64::MAX` を超える場合は `None`
    pub fn to_i64(self) -> Option<i64> {
        match self {
            Self::At(pos) => i64::try_from(pos).ok(),
            Self::Unknown => Some(Self::UNKNOWN_VALUE),
        }
    }

    /// `-1` または `i64` に収まる非負の整数を解析します。
    pub(crate) fn parse(s: &str) -> Option<Self> {
        s.parse::<i64>().ok().and_then(Self::from_i64)
    }
}

impl fmt::Display for StartPos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::At(pos) => write!(f, "{pos}"),
            Self::Unknown => write!(f, "{}", Self::UNKNOWN_VALUE),
        }
    }
}

/// コーパスに裏付けられたレコードID
///
/// 正準形は `sampleID,startPos` です。
///
/// # 例
///
/// ```
/// use hikaku::id::{CorpusId, StartPos};
///
/// let id = CorpusId::parse("LBf9_00090,18640").unwrap();
/// assert_eq!(id.sample_id(), "LBf9_00090");
/// assert_eq!(id.start_pos(), StartPos::At(18640));
/// assert_eq!(id.to_string(), "LBf9_00090,18640");
///
/// assert!(CorpusId::parse("not an id").is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CorpusId {
    sample_id: String,
    start_pos: StartPos,
}

impl CorpusId {
    /// 新しいIDを作成します。
    pub fn new<S>(sample_id: S, start_pos: StartPos) -> Self
    where
        S: Into<String>,
    {
        Self {
            sample_id: sample_id.into(),
            start_pos,
        }
    }

    /// 正準形の文字列を解析します。
    ///
    /// # 引数
    ///
    /// * `s` - 解析する文字列。前後の空白は取り除かれません。
    ///
    /// # 戻り値
    ///
    /// 正準形に一致しない場合は `None`。エラーにはなりません。
    pub fn parse(s: &str) -> Option<Self> {
        let caps = RE_CORPUS_ID.captures(s)?;
        let start_pos = StartPos::parse(&caps["pos"])?;
        Some(Self::new(&caps["sample"], start_pos))
    }

    /// サンプルIDを返します。
    pub fn sample_id(&self) -> &str {
        &self.sample_id
    }

    /// 文の開始位置を返します。
    pub fn start_pos(&self) -> StartPos {
        self.start_pos
    }

    /// 対応するコーパス上の文の位置を返します。
    pub fn sentence_index(&self) -> SentenceIndex {
        SentenceIndex::new(self.sample_id.clone(), self.start_pos)
    }
}

impl fmt::Display for CorpusId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.sample_id, self.start_pos)
    }
}

/// コーパス中の1文を指すキー
///
/// サンプルIDと開始位置の両方で比較・ハッシュされます。
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SentenceIndex {
    /// サンプルID (`mergedSample` の `sampleID` 属性)
    pub sample_id: String,

    /// 最初の短単位の開始位置
    pub start_pos: StartPos,
}

impl SentenceIndex {
    /// 新しいキーを作成します。
    pub fn new<S>(sample_id: S, start_pos: StartPos) -> Self
    where
        S: Into<String>,
    {
        Self {
            sample_id: sample_id.into(),
            start_pos,
        }
    }

    /// `sampleID,startPos` 形式の文字列を解析します。
    pub fn parse(s: &str) -> Option<Self> {
        CorpusId::parse(s).map(|id| id.sentence_index())
    }
}

impl fmt::Display for SentenceIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.sample_id, self.start_pos)
    }
}

impl From<&CorpusId> for SentenceIndex {
    fn from(id: &CorpusId) -> Self {
        id.sentence_index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical() {
        let id = CorpusId::parse("PN1c_00001,1234").unwrap();
        assert_eq!("PN1c_00001", id.sample_id());
        assert_eq!(StartPos::At(1234), id.start_pos());
    }

    #[test]
    fn test_parse_unknown_start() {
        let id = CorpusId::parse("OC01_00001,-1").unwrap();
        assert_eq!(StartPos::Unknown, id.start_pos());
        assert_eq!("OC01_00001,-1", id.to_string());
    }

    #[test]
    fn test_parse_no_match() {
        for s in [
            "",
            "PN1c_00001",
            ",1234",
            "PN1c_00001,",
            "PN1c_00001,-2",
            "PN1c_00001,12a",
            "PN1c_00001,1,2",
            " PN1c_00001,1234",
            "ABCT;PN1c_00001,1234",
            "PN1c_00001,99999999999999999999999",
        ] {
            assert!(CorpusId::parse(s).is_none(), "{s:?} must not parse");
        }
    }

    #[test]
    fn test_round_trip() {
        for id in [
            CorpusId::new("LBf9_00090", StartPos::At(18640)),
            CorpusId::new("LBn9_00128", StartPos::At(0)),
            CorpusId::new("OW6X_00000", StartPos::Unknown),
        ] {
            assert_eq!(Some(id.clone()), CorpusId::parse(&id.to_string()));
        }
    }

    #[test]
    fn test_start_pos_i64() {
        assert_eq!(Some(StartPos::Unknown), StartPos::from_i64(-1));
        assert_eq!(Some(StartPos::At(7)), StartPos::from_i64(7));
        assert_eq!(None, StartPos::from_i64(-5));
        assert_eq!(Some(-1), StartPos::Unknown.to_i64());
        assert_eq!(Some(42), StartPos::At(42).to_i64());
        assert_eq!(None, StartPos::At(u64::MAX).to_i64());

        assert_eq!(
            Some(CorpusId::new("A", StartPos::At(9223372036854775807))),
            CorpusId::parse("A,9223372036854775807")
        );
        assert_eq!(None, CorpusId::parse("A,9223372036854775808"));
    }

    #[test]
    fn test_record_id() {
        let rid = RecordId::from("LBf9_00090,18640");
        assert_eq!(
            Some(CorpusId::new("LBf9_00090", StartPos::At(18640))),
            rid.corpus_id()
        );
        assert_eq!(None, RecordId::from("example-1").corpus_id());
    }
}
