//! ログ出力の初期化
//!
//! ライブラリは `log` クレートのマクロで記録するだけで、出力先は決めません。
//! コマンドラインツールは起動時に [`init_logging`] を一度だけ呼び出します。

use std::io::Write;

use flexi_logger::{DeferredNow, Logger, LoggerHandle};
use log::Record;

use crate::errors::Result;

/// 標準エラー出力へのロガーを開始します。
///
/// 環境変数 `RUST_LOG` が設定されていればそちらが優先されます。
///
/// # 引数
///
/// * `level` - ログレベルの指定 (`warn`、`info`、`hikaku=debug` など)
///
/// # 戻り値
///
/// ロガーのハンドル。破棄するとログは出力されなくなります。
///
/// # エラー
///
/// 指定が不正な場合や、既にロガーが設定されている場合にエラーが返されます。
pub fn init_logging(level: &str) -> Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str(level)?
        .log_to_stderr()
        .format_for_stderr(stderr_format)
        .start()?;
    Ok(handle)
}

/// `[module LEVEL] message` 形式の出力
pub fn stderr_format(
    w: &mut dyn Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> std::io::Result<()> {
    write!(
        w,
        "[{} {}] {}",
        record.module_path().unwrap_or("<unnamed>"),
        record.level(),
        record.args()
    )
}
