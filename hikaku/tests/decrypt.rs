//! 伏せ字化したアノテーションの配布と復元の流れに関するテスト

use hashbrown::HashMap;

use hikaku::cipher::{self, DecryptOutcome, LengthCheck};
use hikaku::format::{AnnotationFormat, AnnotationStyle, Codec};
use hikaku::reincorp::{ContinuationTable, Reincorporator};
use hikaku::source::JsonTextSource;
use hikaku::{CorpusId, CorpusText, Record, RecordId, SentenceIndex, Span, StartPos};

const ANNOTATIONS: &str = r#"
{"ID":"PN1c_00001,120","annot":"太郎は[花子より]_{prej}背が[高い]_{deg}"}
{"ID":"LBf9_00090,18640","annot":"吾輩は[猫]_{prej}である"}
{"ID":"example-3","annot":"[花子]_{prej}","ID_v1":"PN1c_00001,999"}
{"ID":"broken,id,here","annot":"だれか"}
"#;

fn corpus() -> CorpusText {
    [
        ("PN1c_00001,120", "太郎は花子より背が高い"),
        ("LBf9_00090,18640", "吾輩は"),
        ("LBf9_00090,18760", "猫である"),
        ("PN1c_00001,999", "花子"),
    ]
    .into_iter()
    .map(|(k, v)| (SentenceIndex::parse(k).unwrap(), v.to_string()))
    .collect()
}

fn encrypted_records() -> Vec<Record> {
    let codec = Codec::new(AnnotationFormat::Jsonl, AnnotationStyle::Bracketed).unwrap();
    let mut records = codec.read(ANNOTATIONS.as_bytes()).unwrap();
    for record in &mut records {
        record.encrypt();
    }
    records
}

#[test]
fn test_distribute_and_restore() {
    let original = Codec::new(AnnotationFormat::Jsonl, AnnotationStyle::Bracketed)
        .unwrap()
        .read(ANNOTATIONS.as_bytes())
        .unwrap();

    // Distribute in the separate style.
    let codec = Codec::new(AnnotationFormat::Yaml, AnnotationStyle::Separate).unwrap();
    let mut buf = vec![];
    codec.write(&mut buf, &encrypted_records()).unwrap();
    let distributed = String::from_utf8(buf).unwrap();
    assert!(!distributed.contains("花子"));

    let mut records = codec.read(distributed.as_bytes()).unwrap();
    let source = Reincorporator::new(corpus(), ContinuationTable::bccwj().unwrap());
    let outcomes: Vec<_> = records
        .iter_mut()
        .map(|record| cipher::decrypt_record(record, &source))
        .collect();

    assert_eq!(
        vec![
            DecryptOutcome::Decrypted(LengthCheck::Exact),
            DecryptOutcome::Decrypted(LengthCheck::Exact),
            DecryptOutcome::Decrypted(LengthCheck::Exact),
            DecryptOutcome::UnparsableId,
        ],
        outcomes
    );
    assert_eq!(original[..3], records[..3]);
    assert_ne!(original[3], records[3]);
    assert_eq!("⛔⛔⛔", records[3].surface());
}

#[test]
fn test_missing_text_leaves_record_untouched() {
    let mut record = Record::new(
        "PN1c_00002,0",
        vec!["⛔⛔".to_string()],
        vec![Span::new(0, 1, "prej")],
    )
    .unwrap();
    let before = record.clone();

    let source = Reincorporator::new(corpus(), ContinuationTable::new());
    let outcome = cipher::decrypt_record(&mut record, &source);
    assert_eq!(
        DecryptOutcome::TextNotFound(CorpusId::new("PN1c_00002", StartPos::At(0))),
        outcome
    );
    assert_eq!(before, record);
}

#[test]
fn test_shorter_real_text_is_best_effort() {
    let mut source = HashMap::new();
    source.insert(
        CorpusId::new("PN1c_00001", StartPos::At(120)),
        "太郎は花子".to_string(),
    );

    let mut records = encrypted_records();
    let outcome = cipher::decrypt_record(&mut records[0], &source);
    assert_eq!(
        DecryptOutcome::Decrypted(LengthCheck::RealTextShorter {
            required: 11,
            available: 5
        }),
        outcome
    );
    assert_eq!(&["太郎は", "花子", "", ""], records[0].tokens());
    assert_eq!(2, records[0].spans().len());
}

#[test]
fn test_short_decrypted_record_reads_back_as_bracketed() {
    let mut source = HashMap::new();
    source.insert(
        CorpusId::new("PN1c_00001", StartPos::At(120)),
        "太郎は花子".to_string(),
    );
    let mut records = encrypted_records();
    cipher::decrypt_record(&mut records[0], &source);

    let codec = Codec::new(AnnotationFormat::Jsonl, AnnotationStyle::Bracketed).unwrap();
    let mut buf = vec![];
    codec.write(&mut buf, &records[..1]).unwrap();
    let written = String::from_utf8(buf).unwrap();
    assert!(written.contains("太郎は[花子]_{prej}[]_{deg}"), "{written}");

    let read = codec.read(written.as_bytes()).unwrap();
    assert_eq!(1, read.len());
    assert_eq!(&["太郎は", "花子", ""], read[0].tokens());
    assert_eq!(
        &[Span::new(1, 2, "prej"), Span::new(2, 3, "deg")],
        read[0].spans()
    );
    assert_eq!(records[0].surface(), read[0].surface());

    // Writing the record read back gives the same line.
    let mut again = vec![];
    codec.write(&mut again, &read).unwrap();
    assert_eq!(written, String::from_utf8(again).unwrap());
}

#[test]
fn test_json_source_from_gen_source_output() {
    let json = r#"{"PN1c_00001,120":"太郎は花子より背が高い","LBf9_00090,18640":"吾輩は猫である"}"#;
    let source = JsonTextSource::from_reader(json.as_bytes()).unwrap();

    let mut records = encrypted_records();
    for record in &mut records[..2] {
        assert!(cipher::decrypt_record(record, &source).is_clean());
    }
    assert_eq!(RecordId::from("LBf9_00090,18640"), *records[1].id());
    assert_eq!(&["吾輩は", "猫", "である"], records[1].tokens());
}
