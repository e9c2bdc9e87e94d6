//! 入出力の補助関数
//!
//! パス `-` は標準入力または標準出力を表します。

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use hikaku::corpus::loader::CorpusLoader;
use hikaku::errors::Result;
use hikaku::CorpusText;

/// 標準入出力を表すパス
pub const STDIO: &str = "-";

/// パスが標準入出力を表すかどうか。
pub fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO
}

/// ログ用のパスの表示名
pub fn display_name(path: &Path) -> String {
    if is_stdio(path) {
        "STDIN/STDOUT".to_string()
    } else {
        path.display().to_string()
    }
}

/// 入力を開きます。
pub fn open_input(path: &Path) -> io::Result<Box<dyn BufRead>> {
    if is_stdio(path) {
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

/// 既存のファイルを上書きしてよいか確認します。
///
/// # 引数
///
/// * `path` - 書き込み先
/// * `yes` - 確認せずに上書きする
///
/// # 戻り値
///
/// 書き込んでよい場合は `true`。標準入力が端末でない場合は確認できないため `false`
pub fn confirm_overwrite(path: &Path, yes: bool) -> io::Result<bool> {
    if yes || is_stdio(path) || !path.exists() {
        return Ok(true);
    }
    if !atty::is(atty::Stream::Stdin) {
        log::warn!(
            "{} already exists; pass --yes to overwrite it non-interactively",
            path.display()
        );
        return Ok(false);
    }

    eprint!("{} already exists. Overwrite? [y/N] ", path.display());
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// 書き出す内容を一度に出力します。
///
/// # 戻り値
///
/// 利用者が上書きを拒否した場合は `false`
pub fn write_output(path: &Path, data: &[u8], yes: bool) -> io::Result<bool> {
    if is_stdio(path) {
        let mut out = io::stdout().lock();
        out.write_all(data)?;
        out.flush()?;
        return Ok(true);
    }
    if !confirm_overwrite(path, yes)? {
        log::info!("Writing to {} aborted by the user", path.display());
        return Ok(false);
    }
    fs::write(path, data)?;
    log::info!("Written to {}", path.display());
    Ok(true)
}

/// コーパスのディレクトリ、zipアーカイブ、またはキャッシュを読み込みます。
///
/// 標準エラー出力が端末であれば進捗バーを表示します。
pub fn load_corpus(path: &Path) -> Result<CorpusText> {
    eprintln!("Loading the corpus from {}...", path.display());
    let loader = CorpusLoader::new().progress(atty::is(atty::Stream::Stderr));
    let corpus = CorpusText::open_with(path, &loader)?;
    eprintln!("Loaded {} sentences", corpus.len());
    Ok(corpus)
}
