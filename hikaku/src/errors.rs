//! エラー型の定義
//!
//! このモジュールは、hikakuライブラリで使用されるすべてのエラー型を定義します。
//! ID の解析失敗はエラーではなく `None` で表現されるため、ここには含まれません。

use std::error::Error;
use std::fmt;

use crate::format::{AnnotationFormat, AnnotationStyle};

/// hikaku専用のResult型
///
/// エラー型としてデフォルトで[`HikakuError`]を使用します。
pub type Result<T, E = HikakuError> = std::result::Result<T, E>;

/// hikakuのエラー型
///
/// このライブラリで発生する可能性のあるすべてのエラーを表現します。
#[derive(Debug, thiserror::Error)]
pub enum HikakuError {
    /// 無効な引数エラー
    ///
    /// [`InvalidArgumentError`]のエラーバリアント。
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// 無効なフォーマットエラー
    ///
    /// [`InvalidFormatError`]のエラーバリアント。
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// 括弧表記の構文エラー
    #[error(transparent)]
    Bracket(#[from] BracketError),

    /// 存在しないフォーマットとスタイルの組み合わせ
    #[error("The {format} format does not have the {style} style")]
    UnsupportedCombination {
        /// ファイルフォーマット
        format: AnnotationFormat,
        /// アノテーションスタイル
        style: AnnotationStyle,
    },

    /// ディレクトリが指定されたエラー
    ///
    /// ファイルが期待される場所にディレクトリが指定された場合に発生します。
    #[error("The path '{0}' is a directory, but a file was expected.")]
    PathIsDirectory(std::path::PathBuf),

    /// I/Oエラー
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSONエラー
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAMLエラー
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// XMLエラー
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    /// zipアーカイブのエラー
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    /// ディレクトリ走査のエラー
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    /// rkyvシリアライゼーションエラー
    #[error(transparent)]
    Rkyv(#[from] rkyv::rancor::Error),

    /// 一時ファイルの永続化エラー
    #[error(transparent)]
    PathPersist(#[from] tempfile::PersistError),

    /// ロガー初期化のエラー
    #[error(transparent)]
    Logger(#[from] flexi_logger::FlexiLoggerError),
}

impl HikakuError {
    /// 無効な引数エラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 引数の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効なフォーマットエラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - フォーマット名
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }
}

/// 引数が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// 引数の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// 入力フォーマットが無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidFormatError {
    /// フォーマットの名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

/// 括弧表記のエンコード・デコードで発生するエラー
///
/// オフセットはすべて入力文字列中のバイト位置です。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BracketError {
    /// 対応する `[` のない `]_{...}`
    #[error("unmatched closing bracket at byte {offset}")]
    UnmatchedClose {
        /// `]` の位置
        offset: usize,
    },

    /// `]` の後に `_{label}` が続かない
    #[error("closing bracket at byte {offset} is not followed by `_{{label}}`")]
    MissingLabel {
        /// `]` の位置
        offset: usize,
    },

    /// 閉じられていない `[`
    #[error("{count} bracket(s) left open; the first one is at byte {offset}")]
    Unclosed {
        /// 最も外側の未閉鎖 `[` の位置
        offset: usize,
        /// 未閉鎖の括弧の数
        count: usize,
    },

    /// 文字列末尾のバックスラッシュ
    #[error("dangling escape at byte {offset}")]
    DanglingEscape {
        /// `\` の位置
        offset: usize,
    },

    /// 入れ子にならない部分的な重なり
    #[error("spans {first} and {second} overlap partially and cannot be bracketed")]
    PartialOverlap {
        /// 先に開くスパン
        first: String,
        /// 後から開くスパン
        second: String,
    },

    /// 括弧で表現できないラベル
    #[error("label {0:?} cannot be written in brackets")]
    InvalidLabel(String),

    /// トークン列の範囲外のスパン
    #[error("span {span} is out of range for {num_tokens} token(s)")]
    OutOfRange {
        /// 問題のスパン
        span: String,
        /// トークン数
        num_tokens: usize,
    },
}
