use candle_core::{Device, Tensor};
use tempfile::TempDir;

use super::*;
use crate::embedding::SentenceEmbedder;

fn postings() -> Vec<Posting> {
    vec![
        Posting {
            title: "Backend Intern".to_string(),
            company: "Acme".to_string(),
            location: "Berlin".to_string(),
            description: "Build APIs in Rust".to_string(),
            requirements: "Rust, SQL".to_string(),
        },
        Posting {
            title: "Data Intern".to_string(),
            company: "Globex".to_string(),
            location: "Remote".to_string(),
            description: "Analyse product metrics".to_string(),
            requirements: "Python, statistics".to_string(),
        },
    ]
}

fn two_rows() -> PostingVectors {
    PostingVectors::from_rows(vec![
        PostingEmbedding::new(vec![1.0, 0.0], vec![0.0, 1.0], vec![0.5, 0.5]),
        PostingEmbedding::new(vec![0.2, 0.8], vec![0.3, 0.7], vec![0.9, 0.1]),
    ])
    .unwrap()
}

fn write_postings(dir: &TempDir, postings: &[Posting]) -> std::path::PathBuf {
    let path = dir.path().join("internships.json");
    std::fs::write(&path, serde_json::to_string(postings).unwrap()).unwrap();
    path
}

#[test]
fn posting_field_order() {
    let posting = &postings()[0];
    assert_eq!(
        posting.embedded_texts(),
        ["Backend Intern", "Build APIs in Rust", "Rust, SQL"]
    );
    assert_eq!(PostingField::Requirements.index(), 2);
    assert_eq!(PostingField::Title.to_string(), "title");
}

#[test]
fn posting_rejects_missing_field() {
    let json = r#"{"title": "t", "company": "c", "location": "l", "description": "d"}"#;
    assert!(serde_json::from_str::<Posting>(json).is_err());
}

#[test]
fn from_parts_accepts_aligned() {
    let catalog = Catalog::from_parts(postings(), two_rows()).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.dim(), 2);
    assert_eq!(catalog.postings()[1].company, "Globex");
    assert_eq!(
        catalog.vectors().rows().get(1).unwrap().field(PostingField::Requirements),
        &[0.9, 0.1]
    );
}

#[test]
fn from_parts_rejects_misaligned() {
    let mut short = postings();
    short.pop();
    let err = Catalog::from_parts(short, two_rows()).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Misaligned {
            postings: 1,
            vectors: 2
        }
    ));
}

#[test]
fn from_rows_rejects_ragged() {
    let err = PostingVectors::from_rows(vec![
        PostingEmbedding::new(vec![1.0, 0.0], vec![0.0, 1.0], vec![0.5, 0.5]),
        PostingEmbedding::new(vec![1.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.5, 0.5]),
    ])
    .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::Ragged {
            row: 1,
            expected: 2,
            actual: 3
        }
    ));
}

#[test]
fn npy_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vectors.npy");

    let vectors = two_rows();
    vectors.write_npy(&path).unwrap();
    let restored = PostingVectors::read_npy(&path).unwrap();

    assert_eq!(restored, vectors);
}

#[test]
fn npy_rejects_wrong_shape() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flat.npy");
    Tensor::from_vec(vec![0f32; 8], (2, 4), &Device::Cpu)
        .unwrap()
        .write_npy(&path)
        .unwrap();

    let err = PostingVectors::read_npy(&path).unwrap_err();
    assert!(matches!(err, CatalogError::BadShape { shape } if shape == vec![2, 4]));
}

#[test]
fn npy_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = PostingVectors::read_npy(&dir.path().join("absent.npy")).unwrap_err();
    assert!(matches!(err, CatalogError::Npy { .. }));
}

#[test]
fn load_postings_reports_io_and_parse_errors() {
    let dir = TempDir::new().unwrap();

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        Catalog::load_postings(&missing),
        Err(CatalogError::Io { .. })
    ));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "[{\"title\": 3}]").unwrap();
    assert!(matches!(
        Catalog::load_postings(&broken),
        Err(CatalogError::Parse { .. })
    ));
}

#[test]
fn load_checks_alignment() {
    let dir = TempDir::new().unwrap();
    let catalog_path = write_postings(&dir, &postings()[..1]);
    let vectors_path = dir.path().join("internships.npy");
    two_rows().write_npy(&vectors_path).unwrap();

    let err = Catalog::load(&catalog_path, &vectors_path).unwrap_err();
    assert!(matches!(err, CatalogError::Misaligned { .. }));
}

#[test]
fn vectorize_with_stub_embedder() {
    let embedder = SentenceEmbedder::stub().unwrap();
    let vectors = vectorize_postings(&postings(), &embedder).unwrap();

    assert_eq!(vectors.len(), 2);
    assert_eq!(vectors.dim(), embedder.embedding_dim());

    let title = embedder.embed("Data Intern").unwrap();
    assert_eq!(vectors.rows().get(1).unwrap().field(PostingField::Title), &title[..]);
}

#[test]
fn vectorize_empty_catalog() {
    let embedder = SentenceEmbedder::stub().unwrap();
    let vectors = vectorize_postings(&[], &embedder).unwrap();
    assert!(vectors.is_empty());
    assert_eq!(vectors.dim(), embedder.embedding_dim());
}

#[test]
fn vectorize_file_then_load() {
    let dir = TempDir::new().unwrap();
    let catalog_path = write_postings(&dir, &postings());
    let vectors_path = dir.path().join("internships.npy");
    let embedder = SentenceEmbedder::stub().unwrap();

    let written = vectorize_catalog_file(&catalog_path, &vectors_path, &embedder).unwrap();
    assert_eq!(written, 2);

    let catalog = Catalog::load(&catalog_path, &vectors_path).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.dim(), embedder.embedding_dim());
}
