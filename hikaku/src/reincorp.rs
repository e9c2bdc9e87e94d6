//! 分割された文の再結合
//!
//! BCCWJ の XML では、1つの文が複数の `sentence` 要素に分かれていることがあります。
//! [`ContinuationTable`] は、そのような文の先頭の位置から続きの位置への対応を保持し、
//! [`Reincorporator`] はコーパスから文を取り出す際に続きのテキストを連結します。

use std::borrow::Cow;
use std::io::{BufRead, BufReader, Read};

use hashbrown::HashMap;

use crate::corpus::CorpusText;
use crate::errors::{HikakuError, Result};
use crate::id::{CorpusId, SentenceIndex};
use crate::source::TextSource;

const BCCWJ_CONTINUATIONS: &str = include_str!("../resources/continuations.tsv");

/// 文の続きの対応表
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContinuationTable {
    map: HashMap<SentenceIndex, Vec<SentenceIndex>>,
}

impl ContinuationTable {
    /// 空の対応表を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// BCCWJ 用の組み込みの対応表を返します。
    pub fn bccwj() -> Result<Self> {
        Self::from_reader(BCCWJ_CONTINUATIONS.as_bytes())
    }

    /// 対応表を読み込みます。
    ///
    /// 各行はタブ区切りの `sampleID,startPos` で、先頭が文の最初の位置、
    /// 残りが連結する続きの位置です。空行と `#` で始まる行は無視されます。
    ///
    /// # 引数
    ///
    /// * `rdr` - 対応表のリーダー
    ///
    /// # エラー
    ///
    /// 位置を解析できない行や続きのない行がある場合、[`HikakuError`] が返されます。
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let reader = BufReader::new(rdr);

        let mut table = Self::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut indices = vec![];
            for field in line.split('\t') {
                let index = SentenceIndex::parse(field.trim()).ok_or_else(|| {
                    HikakuError::invalid_format(
                        "continuations",
                        format!("line {}: invalid sentence position {field:?}", i + 1),
                    )
                })?;
                indices.push(index);
            }
            if indices.len() < 2 {
                return Err(HikakuError::invalid_format(
                    "continuations",
                    format!("line {}: a continuation is required", i + 1),
                ));
            }
            let primary = indices.remove(0);
            table.insert(primary, indices);
        }
        Ok(table)
    }

    /// 対応を追加します。既存の対応は置き換えられます。
    pub fn insert(&mut self, primary: SentenceIndex, continuations: Vec<SentenceIndex>) {
        self.map.insert(primary, continuations);
    }

    /// 続きの位置を返します。
    pub fn get(&self, primary: &SentenceIndex) -> &[SentenceIndex] {
        self.map.get(primary).map_or(&[], Vec::as_slice)
    }

    /// 対応の数を返します。
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// 空かどうか。
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// コーパスの文テキストを、続きを連結しながら取り出すテキストソース
pub struct Reincorporator {
    corpus: CorpusText,
    continuations: ContinuationTable,
}

impl Reincorporator {
    /// 新しいインスタンスを作成します。
    pub fn new(corpus: CorpusText, continuations: ContinuationTable) -> Self {
        Self {
            corpus,
            continuations,
        }
    }

    /// 内部のコーパスを返します。
    pub fn corpus(&self) -> &CorpusText {
        &self.corpus
    }

    /// 文のテキストを返します。
    ///
    /// 対応表に続きがあればそのテキストを順に連結します。
    /// 見つからない続きは警告を記録して読み飛ばします。
    ///
    /// # 戻り値
    ///
    /// 最初の位置の文が見つからない場合は `None`
    pub fn sentence(&self, index: &SentenceIndex) -> Option<Cow<'_, str>> {
        let Some(text) = self.corpus.get(index) else {
            log::warn!("Sentence not found: {index}");
            return None;
        };

        let continuations = self.continuations.get(index);
        if continuations.is_empty() {
            return Some(Cow::Borrowed(text));
        }

        let mut text = text.to_string();
        for next in continuations {
            match self.corpus.get(next) {
                Some(rest) => {
                    log::info!("Concatenated {next} to {index}");
                    text.push_str(rest);
                }
                None => log::warn!("Continuation {next} of {index} not found"),
            }
        }
        Some(Cow::Owned(text))
    }
}

impl TextSource for Reincorporator {
    fn real_text(&self, id: &CorpusId) -> Option<Cow<'_, str>> {
        self.sentence(&id.sentence_index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::id::StartPos;

    fn idx(s: &str) -> SentenceIndex {
        SentenceIndex::parse(s).unwrap()
    }

    #[test]
    fn test_bccwj_table() {
        let table = ContinuationTable::bccwj().unwrap();
        assert_eq!(2, table.len());
        assert_eq!(
            &[idx("LBf9_00090,18760")],
            table.get(&idx("LBf9_00090,18640"))
        );
        assert_eq!(
            &[idx("LBn9_00128,15580")],
            table.get(&idx("LBn9_00128,15510"))
        );
        assert!(table.get(&idx("LBn9_00128,15580")).is_empty());
    }

    #[test]
    fn test_from_reader_invalid() {
        assert!(ContinuationTable::from_reader("A,1\n".as_bytes()).is_err());
        assert!(ContinuationTable::from_reader("A,1\tB\n".as_bytes()).is_err());
    }

    #[test]
    fn test_concatenation() {
        let corpus: CorpusText = [(idx("X,0"), "foo"), (idx("Y,3"), "bar")]
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect();
        let mut table = ContinuationTable::new();
        table.insert(idx("X,0"), vec![idx("Y,3")]);

        let reinc = Reincorporator::new(corpus, table);
        assert_eq!(Some("foobar"), reinc.sentence(&idx("X,0")).as_deref());
        assert_eq!(Some("bar"), reinc.sentence(&idx("Y,3")).as_deref());
        assert_eq!(
            Some("foobar"),
            reinc
                .real_text(&CorpusId::new("X", StartPos::At(0)))
                .as_deref()
        );
    }

    #[test]
    fn test_missing_continuation() {
        let corpus: CorpusText = [(idx("X,0"), "foo".to_string())].into_iter().collect();
        let mut table = ContinuationTable::new();
        table.insert(idx("X,0"), vec![idx("Y,3")]);

        let reinc = Reincorporator::new(corpus, table);
        assert_eq!(Some("foo"), reinc.sentence(&idx("X,0")).as_deref());
        assert_eq!(None, reinc.sentence(&idx("Z,0")));
    }

    #[test]
    fn test_empty_text_is_found() {
        let corpus: CorpusText = [(idx("X,-1"), String::new())].into_iter().collect();
        let reinc = Reincorporator::new(corpus, ContinuationTable::new());
        assert_eq!(Some(""), reinc.sentence(&idx("X,-1")).as_deref());
    }
}
