//! 実テキストの取得元

use std::borrow::Cow;
use std::io::Read;

use hashbrown::HashMap;

use crate::errors::Result;
use crate::id::CorpusId;

/// コーパスIDから実テキストを引くトレイト
pub trait TextSource {
    /// `id` に対応する実テキストを返します。
    ///
    /// # 戻り値
    ///
    /// 見つからない場合は `None`
    fn real_text(&self, id: &CorpusId) -> Option<Cow<'_, str>>;
}

impl TextSource for HashMap<CorpusId, String> {
    fn real_text(&self, id: &CorpusId) -> Option<Cow<'_, str>> {
        self.get(id).map(|text| Cow::Borrowed(text.as_str()))
    }
}

/// `{"sampleID,startPos": text}` 形式のJSONから読み込んだテキストソース
///
/// `bccwj gen-source` コマンドの出力を読み込みます。
#[derive(Clone, Debug, Default)]
pub struct JsonTextSource {
    texts: HashMap<String, String>,
}

impl JsonTextSource {
    /// JSONオブジェクトを読み込みます。
    ///
    /// # エラー
    ///
    /// 入力が文字列から文字列へのJSONオブジェクトでない場合、エラーが返されます。
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let texts = serde_json::from_reader(rdr)?;
        Ok(Self { texts })
    }

    /// 登録されている文の数を返します。
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// 空かどうか。
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

impl TextSource for JsonTextSource {
    fn real_text(&self, id: &CorpusId) -> Option<Cow<'_, str>> {
        self.texts
            .get(id.to_string().as_str())
            .map(|text| Cow::Borrowed(text.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::id::StartPos;

    #[test]
    fn test_json_text_source() {
        let json = r#"{"LBf9_00090,18640":"吾輩は猫である","OC01_00001,-1":"名前はまだ無い"}"#;
        let source = JsonTextSource::from_reader(json.as_bytes()).unwrap();
        assert_eq!(2, source.len());

        let id = CorpusId::new("LBf9_00090", StartPos::At(18640));
        assert_eq!(Some("吾輩は猫である"), source.real_text(&id).as_deref());

        let id = CorpusId::new("OC01_00001", StartPos::Unknown);
        assert_eq!(Some("名前はまだ無い"), source.real_text(&id).as_deref());

        let id = CorpusId::new("OC01_00001", StartPos::At(0));
        assert_eq!(None, source.real_text(&id));
    }
}
