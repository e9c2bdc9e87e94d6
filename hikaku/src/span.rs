//! トークン列上のラベル付きスパン

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// トークン列上のラベル付き区間 `[start, end)`
///
/// ラベルは開いた語彙で、比較構文の構成素 (基準、対象など) を表します。
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// 開始トークン位置
    pub start: usize,

    /// 終了トークン位置 (この位置を含まない)
    pub end: usize,

    /// ラベル
    pub label: String,
}

impl Span {
    /// 新しいスパンを作成します。
    pub fn new<S>(start: usize, end: usize, label: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    /// スパンが覆うトークン数を返します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// スパンがトークンを1つも覆わないかどうか。
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// トークン位置の範囲を返します。
    #[inline(always)]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// `num_tokens` 個のトークン列に対して有効かどうか。
    pub fn is_valid_for(&self, num_tokens: usize) -> bool {
        self.start < self.end && self.end <= num_tokens
    }

    /// `other` を (境界の一致も含めて) 内側に含むかどうか。
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// 2つのスパンが入れ子にならずに交差しているかどうか。
    pub fn overlaps_partially(&self, other: &Self) -> bool {
        let intersects = self.start < other.end && other.start < self.end;
        intersects && !self.contains(other) && !other.contains(self)
    }

    /// 括弧の開く順序での比較。
    ///
    /// 開始位置の昇順、終了位置の降順 (長いスパンが外側) に並びます。
    /// 同一区間のスパンは `Equal` になるので、安定ソートで宣言順が保たれます。
    pub fn cmp_nesting(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| other.end.cmp(&self.end))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {:?})", self.start, self.end, self.label)
    }
}

/// スパン列を括弧の開く順序に安定ソートします。
pub fn sort_nesting(spans: &mut [Span]) {
    spans.sort_by(Span::cmp_nesting);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_overlap() {
        let a = Span::new(0, 3, "A");
        let b = Span::new(2, 5, "B");
        assert!(a.overlaps_partially(&b));
        assert!(b.overlaps_partially(&a));

        let outer = Span::new(0, 4, "OUTER");
        let inner = Span::new(1, 3, "INNER");
        assert!(!outer.overlaps_partially(&inner));
        assert!(outer.contains(&inner));

        let left = Span::new(0, 2, "L");
        let right = Span::new(2, 4, "R");
        assert!(!left.overlaps_partially(&right));
    }

    #[test]
    fn test_sort_nesting_is_stable() {
        let mut spans = vec![
            Span::new(1, 3, "INNER"),
            Span::new(0, 4, "SAME1"),
            Span::new(0, 4, "SAME2"),
            Span::new(0, 1, "HEAD"),
        ];
        sort_nesting(&mut spans);
        let labels: Vec<_> = spans.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(vec!["SAME1", "SAME2", "HEAD", "INNER"], labels);
    }

    #[test]
    fn test_validity() {
        assert!(Span::new(0, 1, "X").is_valid_for(1));
        assert!(!Span::new(0, 2, "X").is_valid_for(1));
        assert!(!Span::new(1, 1, "X").is_valid_for(3));
    }
}
