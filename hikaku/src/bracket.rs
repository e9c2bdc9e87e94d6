//! 括弧表記のエンコーダとデコーダ
//!
//! トークン列とラベル付きスパンの組を、1本の注釈付き文字列との間で相互に変換します。
//!
//! ```text
//! tokens: a  b  c  d
//! spans:  (0, 4, OUTER), (1, 3, INNER)
//! text:   [a[bc]_{INNER}d]_{OUTER}
//! ```
//!
//! トークンは区切り文字なしで連結されます。括弧のマーカーだけでは
//! 括弧の間の文字列をトークンに分割できないため、分割方法は [`Segmenter`] で与えます。
//! [`encode`] の結果である [`Bracketed`] はトークン境界を保持しているので、
//! [`Bracketed::decode`] は元のトークン列を正確に復元します。
//!
//! トークン中の `[`、`]`、`\` はバックスラッシュでエスケープされます。

pub mod segment;

use std::fmt;

use crate::errors::{BracketError, Result};
use crate::span::Span;

pub use crate::bracket::segment::{
    BoundarySegmenter, CharSegmenter, RunSegmenter, Segmenter, TokenEnd,
};

const OPEN: char = '[';
const CLOSE: char = ']';
const ESCAPE: char = '\\';
const LABEL_OPEN: &str = "_{";
const LABEL_CLOSE: char = '}';

/// エンコード済みの括弧表記
///
/// 注釈付き文字列に加えて、各トークンの終了位置を保持します。
/// 長さ0のトークンも括弧に対する位置ごと復元されます。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bracketed {
    text: String,
    boundaries: Vec<TokenEnd>,
}

impl Bracketed {
    /// 注釈付き文字列を返します。
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// 注釈付き文字列を取り出します。
    pub fn into_string(self) -> String {
        self.text
    }

    /// 各トークンの終了位置を返します。
    pub fn boundaries(&self) -> &[TokenEnd] {
        &self.boundaries
    }

    /// 保持しているトークン境界を使ってデコードします。
    ///
    /// # 戻り値
    ///
    /// [`encode`] に与えたトークン列と、開く順序に並んだスパン列
    pub fn decode(&self) -> Result<Decoded> {
        let mut segmenter = BoundarySegmenter::new(self.boundaries.clone());
        decode(&self.text, &mut segmenter)
    }
}

impl fmt::Display for Bracketed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// デコード結果
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// トークン列
    pub tokens: Vec<String>,

    /// スパン列 (括弧の開く順序)
    pub spans: Vec<Span>,
}

/// ラベルを括弧表記に書けるかどうかを判定します。
///
/// 空文字列、`}` や制御文字を含むラベルは書けません。
pub fn is_encodable_label(label: &str) -> bool {
    !label.is_empty() && !label.chars().any(|c| c == LABEL_CLOSE || c.is_control())
}

struct Encoder<'a, S> {
    tokens: &'a [S],
    out: String,
    boundaries: Vec<TokenEnd>,
    pos: usize,
    surface_len: usize,
    markers: usize,
}

impl<S> Encoder<'_, S>
where
    S: AsRef<str>,
{
    /// トークン位置 `to` までのトークンを出力します。
    fn advance(&mut self, to: usize) {
        while self.pos < to {
            for c in self.tokens[self.pos].as_ref().chars() {
                if matches!(c, OPEN | CLOSE | ESCAPE) {
                    self.out.push(ESCAPE);
                }
                self.out.push(c);
                self.surface_len += 1;
            }
            self.boundaries
                .push(TokenEnd::new(self.markers, self.surface_len));
            self.pos += 1;
        }
    }

    fn open(&mut self) {
        self.out.push(OPEN);
        self.markers += 1;
    }

    fn close(&mut self, label: &str) {
        self.markers += 1;
        self.out.push(CLOSE);
        self.out.push_str(LABEL_OPEN);
        self.out.push_str(label);
        self.out.push(LABEL_CLOSE);
    }
}

/// トークン列とスパン列を括弧表記にエンコードします。
///
/// スパンは開始位置の昇順、終了位置の降順に並べ替えられ、長いスパンほど外側に
/// なります。同一区間のスパンは先に宣言されたものが外側です。
///
/// # 引数
///
/// * `tokens` - トークン列
/// * `spans` - スパン列
///
/// # 戻り値
///
/// トークン境界付きの括弧表記
///
/// # エラー
///
/// 以下の場合に [`BracketError`] が返されます。
///
/// - スパンがトークン列の範囲外、または空の場合
/// - ラベルが括弧表記に書けない場合
/// - 2つのスパンが入れ子にならずに交差している場合
///
/// # 例
///
/// ```
/// use hikaku::bracket::encode;
/// use hikaku::span::Span;
///
/// let tokens = ["a", "b", "c", "d"];
/// let spans = [Span::new(0, 4, "OUTER"), Span::new(1, 3, "INNER")];
/// let bracketed = encode(&tokens, &spans).unwrap();
/// assert_eq!(bracketed.as_str(), "[a[bc]_{INNER}d]_{OUTER}");
/// ```
pub fn encode<S>(tokens: &[S], spans: &[Span]) -> Result<Bracketed>
where
    S: AsRef<str>,
{
    for span in spans {
        if !span.is_valid_for(tokens.len()) {
            return Err(BracketError::OutOfRange {
                span: span.to_string(),
                num_tokens: tokens.len(),
            }
            .into());
        }
        if !is_encodable_label(&span.label) {
            return Err(BracketError::InvalidLabel(span.label.clone()).into());
        }
    }

    let mut order: Vec<&Span> = spans.iter().collect();
    order.sort_by(|a, b| a.cmp_nesting(b));

    let mut enc = Encoder {
        tokens,
        out: String::new(),
        boundaries: Vec::with_capacity(tokens.len()),
        pos: 0,
        surface_len: 0,
        markers: 0,
    };
    let mut stack: Vec<&Span> = vec![];

    for span in order {
        while let Some(&top) = stack.last() {
            if top.end > span.start {
                break;
            }
            enc.advance(top.end);
            enc.close(&top.label);
            stack.pop();
        }
        if let Some(&top) = stack.last() {
            if span.end > top.end {
                return Err(BracketError::PartialOverlap {
                    first: top.to_string(),
                    second: span.to_string(),
                }
                .into());
            }
        }
        enc.advance(span.start);
        enc.open();
        stack.push(span);
    }
    while let Some(top) = stack.pop() {
        enc.advance(top.end);
        enc.close(&top.label);
    }
    enc.advance(tokens.len());

    Ok(Bracketed {
        text: enc.out,
        boundaries: enc.boundaries,
    })
}

/// `]` の直後から `_{label}` を読み取ります。
///
/// # 戻り値
///
/// ラベルと消費したバイト数。形式が不正な場合は `None`
fn read_label(rest: &str) -> Option<(&str, usize)> {
    let body = rest.strip_prefix(LABEL_OPEN)?;
    let end = body.find(LABEL_CLOSE)?;
    let label = &body[..end];
    if label.is_empty() {
        return None;
    }
    Some((label, LABEL_OPEN.len() + end + LABEL_CLOSE.len_utf8()))
}

/// 括弧表記をデコードします。
///
/// 括弧の間の文字列は `segmenter` によってトークンに分割されます。
/// トークンを1つも含まない括弧 (`[]_{X}`) は、長さ0のトークン1つを囲むスパンになります。
///
/// # 引数
///
/// * `text` - 括弧表記
/// * `segmenter` - 文字列をトークンに分割する方法
///
/// # 戻り値
///
/// トークン列と、括弧の開く順序に並んだスパン列
///
/// # エラー
///
/// 括弧の対応が取れない場合、`]` の後にラベルがない場合、
/// および末尾にエスケープ文字がある場合に [`BracketError`] が返されます。
pub fn decode<G>(text: &str, segmenter: &mut G) -> Result<Decoded>
where
    G: Segmenter + ?Sized,
{
    let mut tokens = vec![];
    let mut slots: Vec<Option<Span>> = vec![];
    // (slot, start token, byte offset of `[`)
    let mut stack: Vec<(usize, usize, usize)> = vec![];
    let mut run = String::new();

    let mut pos = 0;
    while let Some(c) = text[pos..].chars().next() {
        let offset = pos;
        pos += c.len_utf8();
        match c {
            ESCAPE => {
                let Some(escaped) = text[pos..].chars().next() else {
                    return Err(BracketError::DanglingEscape { offset }.into());
                };
                run.push(escaped);
                pos += escaped.len_utf8();
            }
            OPEN => {
                segmenter.segment(&run, &mut tokens);
                run.clear();
                stack.push((slots.len(), tokens.len(), offset));
                slots.push(None);
            }
            CLOSE => {
                segmenter.segment(&run, &mut tokens);
                run.clear();
                let (slot, start, _) = stack
                    .pop()
                    .ok_or(BracketError::UnmatchedClose { offset })?;
                let (label, consumed) =
                    read_label(&text[pos..]).ok_or(BracketError::MissingLabel { offset })?;
                pos += consumed;
                if start >= tokens.len() {
                    tokens.push(String::new());
                }
                slots[slot] = Some(Span::new(start, tokens.len(), label));
            }
            _ => run.push(c),
        }
    }
    segmenter.segment(&run, &mut tokens);

    if let Some(&(_, _, offset)) = stack.first() {
        return Err(BracketError::Unclosed {
            offset,
            count: stack.len(),
        }
        .into());
    }

    Ok(Decoded {
        tokens,
        spans: slots.into_iter().flatten().collect(),
    })
}
