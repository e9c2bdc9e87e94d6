//! # hikaku
//!
//! hikakuは、日本語の比較構文アノテーションを扱うためのライブラリです。
//!
//! ## 概要
//!
//! アノテーションはトークン列とその上のラベル付きスパンからなるレコードとして表されます。
//! コーパス (BCCWJ) の本文は再配布できないため、アノテーションを配布する際には
//! トークンを伏せ字に置き換え、受け取った側が手元のコーパスから本文を復元します。
//!
//! ## 主な機能
//!
//! - **括弧表記**: `太郎は[花子より]_{prej}背が高い` のような表記とレコードの相互変換
//! - **伏せ字化と復元**: 文字数を保存したトークンの伏せ字化と、実テキストからの復元
//! - **コーパスの読み込み**: BCCWJ の XML (ディレクトリまたはzip) からの文テキストの索引化と、そのキャッシュ
//! - **ファイルフォーマット**: YAML、JSONL、タブ区切りテキストでのレコードの読み書き
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use hashbrown::HashMap;
//! use hikaku::bracket::RunSegmenter;
//! use hikaku::cipher::{self, DecryptOutcome, LengthCheck};
//! use hikaku::{CorpusId, Record};
//!
//! let mut record = Record::from_brackets(
//!     "PN1c_00001,120",
//!     "太郎は[花子より]_{prej}背が高い",
//!     &mut RunSegmenter,
//! )?;
//! assert_eq!(record.tokens(), &["太郎は", "花子より", "背が高い"]);
//!
//! record.encrypt();
//! assert_eq!(record.to_brackets()?.as_str(), "⛔⛔⛔[⛔⛔⛔⛔]_{prej}⛔⛔⛔⛔");
//!
//! let mut source = HashMap::new();
//! source.insert(
//!     CorpusId::parse("PN1c_00001,120").unwrap(),
//!     "太郎は花子より背が高い".to_string(),
//! );
//! let outcome = cipher::decrypt_record(&mut record, &source);
//! assert_eq!(outcome, DecryptOutcome::Decrypted(LengthCheck::Exact));
//! assert_eq!(record.surface(), "太郎は花子より背が高い");
//! # Ok(())
//! # }
//! ```

/// 括弧表記のエンコードとデコード
pub mod bracket;

/// 伏せ字化と復元
pub mod cipher;

/// コーパスの文テキストの索引とキャッシュ
pub mod corpus;

/// エラー型の定義
pub mod errors;

/// アノテーションファイルの読み書き
pub mod format;

/// レコードIDとコーパス上の位置
pub mod id;

/// ログ出力の初期化
pub mod logging;

/// レコードの定義
pub mod record;

/// 分割された文の再結合
pub mod reincorp;

/// 実テキストの取得元
pub mod source;

/// スパンの定義
pub mod span;

// Re-exports
pub use corpus::CorpusText;
pub use errors::{HikakuError, Result};
pub use id::{CorpusId, RecordId, SentenceIndex, StartPos};
pub use record::Record;
pub use reincorp::{ContinuationTable, Reincorporator};
pub use source::TextSource;
pub use span::Span;

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
