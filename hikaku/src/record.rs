//! 比較構文アノテーションのレコード

use crate::bracket::{self, Bracketed, Segmenter};
use crate::cipher::{self, LengthCheck};
use crate::errors::{HikakuError, Result};
use crate::id::{CorpusId, RecordId};
use crate::span::Span;

/// 1文分のアノテーション
///
/// ID、トークン列、スパン列、コメント、および旧形式のIDからなります。
/// すべてのスパンはトークン列の範囲内にあることが保証されます。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    id: RecordId,
    tokens: Vec<String>,
    spans: Vec<Span>,
    comments: Vec<String>,
    legacy_id: Option<RecordId>,
}

impl Record {
    /// 新しいレコードを作成します。
    ///
    /// # 引数
    ///
    /// * `id` - レコードID
    /// * `tokens` - トークン列
    /// * `spans` - スパン列
    ///
    /// # エラー
    ///
    /// スパンがトークン列の範囲外、または空の場合、[`HikakuError`] が返されます。
    pub fn new<I>(id: I, tokens: Vec<String>, spans: Vec<Span>) -> Result<Self>
    where
        I: Into<RecordId>,
    {
        let id = id.into();
        if let Some(span) = spans.iter().find(|s| !s.is_valid_for(tokens.len())) {
            return Err(HikakuError::invalid_argument(
                "spans",
                format!(
                    "{id}: span {span} is out of range for {} token(s)",
                    tokens.len()
                ),
            ));
        }
        Ok(Self {
            id,
            tokens,
            spans,
            comments: vec![],
            legacy_id: None,
        })
    }

    /// 括弧表記からレコードを作成します。
    ///
    /// # 引数
    ///
    /// * `id` - レコードID
    /// * `text` - 括弧表記
    /// * `segmenter` - 括弧の間の文字列の分割方法
    ///
    /// # エラー
    ///
    /// 括弧表記が不正な場合、[`HikakuError::Bracket`] が返されます。
    pub fn from_brackets<I, G>(id: I, text: &str, segmenter: &mut G) -> Result<Self>
    where
        I: Into<RecordId>,
        G: Segmenter + ?Sized,
    {
        let decoded = bracket::decode(text, segmenter)?;
        Self::new(id, decoded.tokens, decoded.spans)
    }

    /// コメントを設定します。
    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    /// 旧形式のIDを設定します。
    pub fn with_legacy_id(mut self, legacy_id: Option<RecordId>) -> Self {
        self.legacy_id = legacy_id;
        self
    }

    /// レコードIDを返します。
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// 旧形式のIDを返します。
    pub fn legacy_id(&self) -> Option<&RecordId> {
        self.legacy_id.as_ref()
    }

    /// トークン列を返します。
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// スパン列を返します。
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// コメントを返します。
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// トークンを連結した表層文字列を返します。
    pub fn surface(&self) -> String {
        self.tokens.concat()
    }

    /// コーパス上の位置を表すIDを返します。
    ///
    /// IDが正準形でない場合は旧形式のIDを試します。
    pub fn corpus_id(&self) -> Option<CorpusId> {
        self.id
            .corpus_id()
            .or_else(|| self.legacy_id.as_ref().and_then(RecordId::corpus_id))
    }

    /// 括弧表記にエンコードします。
    ///
    /// # エラー
    ///
    /// スパンが部分的に交差している場合など、括弧表記に書けない場合に
    /// [`HikakuError::Bracket`] が返されます。
    pub fn to_brackets(&self) -> Result<Bracketed> {
        bracket::encode(&self.tokens, &self.spans)
    }

    /// トークンを伏せ字に置き換えます。
    ///
    /// 各トークンの文字数は保存されます。スパンとIDは変更されません。
    pub fn encrypt(&mut self) {
        cipher::encrypt_tokens(&mut self.tokens);
    }

    /// 実テキストからトークンを復元します。
    ///
    /// # 引数
    ///
    /// * `real_text` - このレコードに対応するコーパスの文
    ///
    /// # 戻り値
    ///
    /// トークン長の合計と実テキストの長さの比較結果
    pub fn decrypt_with(&mut self, real_text: &str) -> LengthCheck {
        let (tokens, check) = cipher::decrypt_tokens(&self.tokens, real_text);
        self.tokens = tokens;
        check
    }

    /// トークンを1文字ずつに分割したレコードを返します。
    ///
    /// スパンの位置は分割後のトークン位置に付け替えられます。
    /// 空のトークンは取り除かれ、それによって空になるスパンも取り除かれます。
    pub fn dice(&self) -> Self {
        // offsets[i] is the character offset at which token i starts.
        let mut offsets = Vec::with_capacity(self.tokens.len() + 1);
        let mut tokens = vec![];
        for token in &self.tokens {
            offsets.push(tokens.len());
            tokens.extend(token.chars().map(String::from));
        }
        offsets.push(tokens.len());

        let spans = self
            .spans
            .iter()
            .map(|s| Span::new(offsets[s.start], offsets[s.end], s.label.clone()))
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            id: self.id.clone(),
            tokens,
            spans,
            comments: self.comments.clone(),
            legacy_id: self.legacy_id.clone(),
        }
    }
}
