//! コーパスの文テキストの索引
//!
//! このモジュールは、BCCWJ の文位置 ([`SentenceIndex`]) から文のテキストへの
//! 対応表 [`CorpusText`] と、その永続化キャッシュを提供します。
//!
//! # キャッシュの形式
//!
//! キャッシュファイルは Zstandard で圧縮されたストリームで、
//! [`CACHE_MAGIC`] に続いて rkyv でシリアライズされたエントリ列を含みます。
//! エントリはキーの順に並べて書き出されるため、同じ内容の索引からは
//! 同じバイト列が生成されます。

pub mod loader;

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use hashbrown::HashMap;
use rkyv::rancor::Error as RError;
use rkyv::util::AlignedVec;

use crate::errors::{HikakuError, Result};
use crate::id::{SentenceIndex, StartPos};

/// コーパスキャッシュを識別するマジックバイト。
pub const CACHE_MAGIC: &[u8] = b"HikakuCorpusCache 0.1\n";

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const ZSTD_LEVEL: i32 = 19;
const RKYV_ALIGNMENT: usize = 16;

/// グローバルキャッシュディレクトリのパス。
///
/// ユーザー固有のシステムキャッシュディレクトリ内の`hikaku`サブディレクトリを指します。
pub static GLOBAL_CACHE_DIR: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    let path = dirs::cache_dir()?.join("hikaku");
    fs::create_dir_all(&path).ok()?;

    Some(path)
});

/// 既定のキャッシュファイルのパスを返します。
pub fn default_cache_path() -> Option<PathBuf> {
    GLOBAL_CACHE_DIR
        .as_ref()
        .map(|dir| dir.join("bccwj.cache.zst"))
}

#[derive(rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
struct CacheEntry {
    sample_id: String,
    start_pos: i64,
    text: String,
}

/// 文位置から文テキストへの対応表
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CorpusText {
    sentences: HashMap<SentenceIndex, String>,
}

impl CorpusText {
    /// 空の対応表を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// 文の数を返します。
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// 空かどうか。
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// 文のテキストを返します。
    pub fn get(&self, index: &SentenceIndex) -> Option<&str> {
        self.sentences.get(index).map(String::as_str)
    }

    /// 文を追加します。
    ///
    /// 同じキーの文が既にある場合は上書きし、古いテキストを返します。
    pub fn insert(&mut self, index: SentenceIndex, text: String) -> Option<String> {
        self.sentences.insert(index, text)
    }

    /// すべての文を走査します。順序は不定です。
    pub fn iter(&self) -> impl Iterator<Item = (&SentenceIndex, &str)> {
        self.sentences.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// パスの種類に応じて対応表を読み込みます。
    ///
    /// - ディレクトリ: コーパスのXMLファイル群
    /// - zipファイル: コーパスのXMLファイルを含むアーカイブ
    /// - それ以外のファイル: [`CorpusText::write_cache`] で書き出したキャッシュ
    ///
    /// # エラー
    ///
    /// 読み込みや解析に失敗した場合、[`HikakuError`] が返されます。
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::open_with(path, &loader::CorpusLoader::new())
    }

    /// 読み込み器を指定して [`CorpusText::open`] と同様に読み込みます。
    pub fn open_with<P>(path: P, loader: &loader::CorpusLoader) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if path.is_dir() {
            return loader.load_dir(path);
        }

        let mut magic = [0; ZIP_MAGIC.len()];
        let is_zip = match File::open(path)?.read_exact(&mut magic) {
            Ok(()) => magic == ZIP_MAGIC,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => false,
            Err(e) => return Err(e.into()),
        };
        if is_zip {
            loader.load_zip(path)
        } else {
            Self::from_cache(path)
        }
    }

    /// 非圧縮のキャッシュ表現を書き出します。
    ///
    /// # 引数
    ///
    /// * `wtr` - 書き込み先
    ///
    /// # エラー
    ///
    /// シリアライズや書き込みに失敗した場合、エラーが返されます。
    pub fn write<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        let mut entries: Vec<_> = self.sentences.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        let entries = entries
            .into_iter()
            .map(|(index, text)| -> Result<CacheEntry> {
                let start_pos = index.start_pos.to_i64().ok_or_else(|| {
                    HikakuError::invalid_argument(
                        "corpus",
                        format!("the start position of {index} does not fit in the cache"),
                    )
                })?;
                Ok(CacheEntry {
                    sample_id: index.sample_id.clone(),
                    start_pos,
                    text: text.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let bytes = rkyv::to_bytes::<RError>(&entries)?;
        wtr.write_all(CACHE_MAGIC)?;
        wtr.write_all(&bytes)?;
        Ok(())
    }

    /// 非圧縮のキャッシュ表現を読み込みます。
    ///
    /// # エラー
    ///
    /// マジックバイトが一致しない場合やデータが壊れている場合、エラーが返されます。
    pub fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut data = vec![];
        rdr.read_to_end(&mut data)?;
        let Some(body) = data.strip_prefix(CACHE_MAGIC) else {
            return Err(HikakuError::invalid_format(
                "rdr",
                "The magic number of the corpus cache mismatches.",
            ));
        };

        let mut aligned = AlignedVec::<RKYV_ALIGNMENT>::with_capacity(body.len());
        aligned.extend_from_slice(body);
        let entries = rkyv::from_bytes::<Vec<CacheEntry>, RError>(&aligned)?;

        let mut sentences = HashMap::with_capacity(entries.len());
        for entry in entries {
            let start_pos = StartPos::from_i64(entry.start_pos).ok_or_else(|| {
                HikakuError::invalid_format(
                    "rdr",
                    format!("invalid start position {} in the cache", entry.start_pos),
                )
            })?;
            sentences.insert(SentenceIndex::new(entry.sample_id, start_pos), entry.text);
        }
        Ok(Self { sentences })
    }

    /// Zstandard で圧縮されたキャッシュファイルを読み込みます。
    pub fn from_cache<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if path.is_dir() {
            return Err(HikakuError::PathIsDirectory(path.to_path_buf()));
        }
        let decoder = zstd::Decoder::new(File::open(path)?)?;
        Self::read(decoder)
    }

    /// Zstandard で圧縮したキャッシュファイルを書き出します。
    ///
    /// 同じディレクトリの一時ファイルに書き込んでから置き換えるため、
    /// 書き込みに失敗しても既存のファイルは壊れません。
    pub fn write_cache<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut temp_file = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut encoder = zstd::Encoder::new(&mut temp_file, ZSTD_LEVEL)?;
            self.write(&mut encoder)?;
            encoder.finish()?;
        }
        temp_file.persist(path)?;
        Ok(())
    }
}

impl Extend<(SentenceIndex, String)> for CorpusText {
    fn extend<T: IntoIterator<Item = (SentenceIndex, String)>>(&mut self, iter: T) {
        self.sentences.extend(iter);
    }
}

impl FromIterator<(SentenceIndex, String)> for CorpusText {
    fn from_iter<T: IntoIterator<Item = (SentenceIndex, String)>>(iter: T) -> Self {
        Self {
            sentences: iter.into_iter().collect(),
        }
    }
}
