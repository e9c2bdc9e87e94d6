//! 括弧の間の文字列をトークンに分割する方法
//!
//! 括弧表記はトークンの区切りを持たないため、括弧のマーカーで区切られた文字列 (run)
//! をどうトークンに分けるかは外部から与えます。

use std::mem;

/// 文字列をトークンに分割するトレイト
///
/// [`decode`](crate::bracket::decode) は括弧のマーカーに出会うたびに、直前までの
/// 文字列 (空の場合も含む) を渡してこのトレイトを呼び出します。
pub trait Segmenter {
    /// `run` を分割して `tokens` の末尾に追加します。
    ///
    /// # 引数
    ///
    /// * `run` - エスケープを解除した文字列
    /// * `tokens` - 追加先のトークン列
    fn segment(&mut self, run: &str, tokens: &mut Vec<String>);
}

/// 括弧で区切られた文字列をそのまま1トークンとする分割
#[derive(Clone, Copy, Debug, Default)]
pub struct RunSegmenter;

impl Segmenter for RunSegmenter {
    fn segment(&mut self, run: &str, tokens: &mut Vec<String>) {
        if !run.is_empty() {
            tokens.push(run.to_string());
        }
    }
}

/// 1文字を1トークンとする分割
#[derive(Clone, Copy, Debug, Default)]
pub struct CharSegmenter;

impl Segmenter for CharSegmenter {
    fn segment(&mut self, run: &str, tokens: &mut Vec<String>) {
        tokens.extend(run.chars().map(String::from));
    }
}

/// トークンの終了位置
///
/// 長さ0のトークンを括弧のどちら側に置くかを決めるため、表層文字列上の
/// オフセットに加えて、そのトークンが何番目の run で終わるかを持ちます。
/// run の番号はそれまでに現れた括弧のマーカー (`[` と `]_{label}`) の数です。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenEnd {
    /// run の番号
    pub run: usize,

    /// 括弧を除いた表層文字列上の文字オフセット (累積長)
    pub offset: usize,
}

impl TokenEnd {
    /// 新しい終了位置を作成します。
    pub const fn new(run: usize, offset: usize) -> Self {
        Self { run, offset }
    }
}

/// 既知のトークン境界に従う分割
///
/// 境界が文字列と食い違う場合、余った文字列は1つのトークンになります。
#[derive(Clone, Debug)]
pub struct BoundarySegmenter {
    boundaries: Vec<TokenEnd>,
    next: usize,
    run: usize,
    offset: usize,
}

impl BoundarySegmenter {
    /// 新しい分割器を作成します。
    ///
    /// # 引数
    ///
    /// * `boundaries` - 昇順に並んだトークンの終了位置
    pub fn new(boundaries: Vec<TokenEnd>) -> Self {
        Self {
            boundaries,
            next: 0,
            run: 0,
            offset: 0,
        }
    }

    /// 括弧を含まない文字列用に、トークン列から境界を計算して分割器を作成します。
    pub fn from_tokens<S>(tokens: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        let mut end = 0;
        let boundaries = tokens
            .iter()
            .map(|t| {
                end += t.as_ref().chars().count();
                TokenEnd::new(0, end)
            })
            .collect();
        Self::new(boundaries)
    }

    /// 現在位置で終わるトークンをすべて出力します。
    ///
    /// 最初のトークンは `piece` を受け取り、続くトークンは長さ0です。
    fn flush(&mut self, run: usize, piece: &mut String, tokens: &mut Vec<String>) {
        let here = TokenEnd::new(run, self.offset);
        while self.boundaries.get(self.next) == Some(&here) {
            tokens.push(mem::take(piece));
            self.next += 1;
        }
    }
}

impl Segmenter for BoundarySegmenter {
    fn segment(&mut self, run: &str, tokens: &mut Vec<String>) {
        let run_idx = self.run;
        self.run += 1;

        // Boundaries left over from earlier runs no longer match anything.
        while self
            .boundaries
            .get(self.next)
            .is_some_and(|b| b.run < run_idx)
        {
            self.next += 1;
        }

        let mut piece = String::new();
        self.flush(run_idx, &mut piece, tokens);
        for c in run.chars() {
            piece.push(c);
            self.offset += 1;
            self.flush(run_idx, &mut piece, tokens);
        }
        if !piece.is_empty() {
            tokens.push(piece);
        }
    }
}
