//! トークンの伏せ字化と復元
//!
//! コーパスの本文は再配布できないため、アノテーションを配布する際には
//! 各トークンを同じ文字数の伏せ字 ([`FILLER`]) に置き換えます。
//! 受け取った側は手元のコーパスから実テキストを取り出し、
//! トークン長の累積に従って切り出すことで元のトークンを復元します。
//!
//! 長さはすべて文字 (Unicode scalar value) 単位です。

use std::fmt;

use crate::id::CorpusId;
use crate::record::Record;
use crate::source::TextSource;

/// 伏せ字に使う文字
///
/// コーパス本文には現れない記号です。
pub const FILLER: char = '⛔';

/// トークンを同じ文字数の伏せ字に置き換えます。
///
/// # 例
///
/// ```
/// use hikaku::cipher::encrypt_token;
///
/// assert_eq!(encrypt_token("花子"), "⛔⛔");
/// ```
pub fn encrypt_token(token: &str) -> String {
    std::iter::repeat(FILLER)
        .take(token.chars().count())
        .collect()
}

/// トークン列をその場で伏せ字に置き換えます。
pub fn encrypt_tokens(tokens: &mut [String]) {
    for token in tokens {
        *token = encrypt_token(token);
    }
}

/// トークン長の合計と実テキストの長さの比較結果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthCheck {
    /// 長さが一致した
    Exact,

    /// 実テキストの方が長く、末尾が使われなかった
    RealTextLonger {
        /// トークン長の合計
        consumed: usize,
        /// 実テキストの文字数
        available: usize,
    },

    /// 実テキストの方が短く、末尾のトークンが切り詰められた
    RealTextShorter {
        /// トークン長の合計
        required: usize,
        /// 実テキストの文字数
        available: usize,
    },
}

impl LengthCheck {
    /// 長さが一致したかどうか。
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact)
    }
}

/// 実テキストをトークン長の累積に従って切り出します。
///
/// トークン `i` は `real_text[cum(i) .. cum(i) + len(tokens[i])]` になります。
/// 実テキストが短い場合、末尾のトークンは切り詰められるか空になります。
///
/// # 引数
///
/// * `tokens` - 伏せ字化されたトークン列 (長さだけが使われます)
/// * `real_text` - 実テキスト
///
/// # 戻り値
///
/// 復元したトークン列と長さの比較結果
pub fn decrypt_tokens<S>(tokens: &[S], real_text: &str) -> (Vec<String>, LengthCheck)
where
    S: AsRef<str>,
{
    let chars: Vec<char> = real_text.chars().collect();
    let available = chars.len();

    let mut pos = 0;
    let mut decrypted = Vec::with_capacity(tokens.len());
    for token in tokens {
        let len = token.as_ref().chars().count();
        let start = pos.min(available);
        let end = (pos + len).min(available);
        decrypted.push(chars[start..end].iter().collect());
        pos += len;
    }

    let check = match pos.cmp(&available) {
        std::cmp::Ordering::Equal => LengthCheck::Exact,
        std::cmp::Ordering::Less => LengthCheck::RealTextLonger {
            consumed: pos,
            available,
        },
        std::cmp::Ordering::Greater => LengthCheck::RealTextShorter {
            required: pos,
            available,
        },
    };
    (decrypted, check)
}

/// レコード単位の復元結果
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecryptOutcome {
    /// 復元した
    Decrypted(LengthCheck),

    /// IDを解析できず、レコードはそのまま
    UnparsableId,

    /// 実テキストが見つからず、レコードはそのまま
    TextNotFound(CorpusId),
}

impl DecryptOutcome {
    /// 長さの食い違いなく復元できたかどうか。
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Decrypted(LengthCheck::Exact))
    }
}

impl fmt::Display for DecryptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Decrypted(LengthCheck::Exact) => write!(f, "decrypted"),
            Self::Decrypted(LengthCheck::RealTextLonger { consumed, available }) => write!(
                f,
                "decrypted; the real text ({available} chars) is longer than the annotation ({consumed} chars)"
            ),
            Self::Decrypted(LengthCheck::RealTextShorter { required, available }) => write!(
                f,
                "decrypted; the real text ({available} chars) is shorter than the annotation ({required} chars)"
            ),
            Self::UnparsableId => write!(f, "cannot parse the ID"),
            Self::TextNotFound(id) => write!(f, "cannot find the real text for {id}"),
        }
    }
}

/// テキストソースを使ってレコードのトークンを復元します。
///
/// IDが解析できない場合と実テキストが見つからない場合、レコードは変更されません。
/// 長さの食い違いは警告を記録するだけで、処理は続行されます。
///
/// # 引数
///
/// * `record` - 伏せ字化されたレコード
/// * `source` - 実テキストの取得元
///
/// # 戻り値
///
/// 復元結果
pub fn decrypt_record<T>(record: &mut Record, source: &T) -> DecryptOutcome
where
    T: TextSource + ?Sized,
{
    let Some(corpus_id) = record.corpus_id() else {
        log::warn!("Cannot parse the ID {}", record.id());
        return DecryptOutcome::UnparsableId;
    };
    let Some(real_text) = source.real_text(&corpus_id) else {
        log::warn!("Cannot find the real text for {}", record.id());
        return DecryptOutcome::TextNotFound(corpus_id);
    };

    let check = record.decrypt_with(&real_text);
    let outcome = DecryptOutcome::Decrypted(check);
    if !check.is_exact() {
        log::warn!("{}: {outcome}", record.id());
    }
    outcome
}
