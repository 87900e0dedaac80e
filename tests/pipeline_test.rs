//! Integration tests for collection processing.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use docrank::pipeline::{CollectionLayout, OUTPUT_FILE_NAME};
use docrank::{discover_collections, CollectionProcessor, Docrank, Error, PipelineOptions};

/// Writes `name` plus its layout dump into the documents folder.
fn write_document(docs: &Path, name: &str, sections: &[(&str, &str)]) {
    fs::write(docs.join(name), b"%PDF-1.7").unwrap();

    let pages: Vec<Value> = sections
        .iter()
        .enumerate()
        .map(|(i, (heading, body))| {
            let number = i as u32 + 1;
            let mut spans = vec![json!({
                "text": heading,
                "font_size": 22.0,
                "is_bold": true,
                "bbox": {"x0": 50.0, "y0": 60.0, "x1": 400.0, "y1": 82.0},
            })];
            for (j, line) in ["body line one", "body line two", "body line three"]
                .iter()
                .enumerate()
            {
                spans.push(json!({
                    "text": line,
                    "font_size": 10.0,
                    "bbox": {"x0": 50.0, "y0": 100.0 + j as f32 * 14.0, "x1": 400.0, "y1": 110.0},
                }));
            }
            json!({
                "number": number,
                "text": format!("{}\n{}", heading, body),
                "spans": spans,
            })
        })
        .collect();

    fs::write(
        docs.join(format!("{}.layout.json", name)),
        serde_json::to_string(&json!({ "pages": pages })).unwrap(),
    )
    .unwrap();
}

fn write_input(dir: &Path, persona: &str, task: &str) {
    let input = json!({
        "challenge_info": {"challenge_id": "round_1b_002", "test_case_name": "travel_planner"},
        "documents": [],
        "persona": {"role": persona},
        "job_to_be_done": {"task": task},
    });
    fs::write(dir.join("challenge1b_input.json"), input.to_string()).unwrap();
}

/// A two-document travel collection.
fn travel_collection(dir: &Path) {
    let docs = dir.join("PDFs");
    fs::create_dir_all(&docs).unwrap();
    write_input(dir, "Travel Planner", "Plan a trip of 4 days for a group of 10 college friends");

    write_document(
        &docs,
        "South of France - Cities.pdf",
        &[
            (
                "Nice Old Town",
                "the old town of nice is a maze of narrow lanes ideal for a group trip. visit \
                 the flower market at 8 in the morning and explore the castle hill for views.\n\n\
                 friends on a budget can share plates of socca, a local chickpea pancake.",
            ),
            (
                "Marseille Harbour",
                "marseille is the oldest city in france. the old port hosts a fish market \
                 every morning, and boat trips leave for the calanques at 10 and 14.",
            ),
        ],
    );
    write_document(
        &docs,
        "South of France - Things to Do.pdf",
        &[(
            "Coastal Adventures",
            "the coast offers beaches for every group: quiet coves, busy resort strips and \
             water sports. try kayaking near antibes or take a catamaran trip to the islands.",
        )],
    );
}

#[test]
fn test_process_collection_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    travel_collection(dir.path());

    let processor = CollectionProcessor::new(PipelineOptions::new()).unwrap();
    let (output, path) = processor
        .process_and_write(dir.path(), None, docrank::JsonFormat::Pretty)
        .unwrap();
    assert_eq!(path, dir.path().join(OUTPUT_FILE_NAME));

    assert_eq!(output.metadata.persona, "Travel Planner");
    assert_eq!(
        output.metadata.input_documents,
        vec!["South of France - Cities.pdf", "South of France - Things to Do.pdf"]
    );
    assert_eq!(output.extracted_sections.len(), 3);
    for (i, section) in output.extracted_sections.iter().enumerate() {
        assert_eq!(section.importance_rank, i as u32 + 1);
        assert!(output.metadata.input_documents.contains(&section.document));
    }

    // Both documents are represented before either repeats
    let first_two: Vec<&str> = output.extracted_sections[..2]
        .iter()
        .map(|s| s.document.as_str())
        .collect();
    assert_ne!(first_two[0], first_two[1]);

    let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    for key in ["metadata", "extracted_sections", "subsection_analysis"] {
        assert!(written.get(key).is_some(), "missing {}", key);
    }
    assert!(written.get("document_errors").is_none());
    assert!(written["metadata"]["processing_timestamp"].is_string());
    assert!(written["extracted_sections"][0]["section_title"].is_string());
}

#[test]
fn test_excerpts_cover_every_document() {
    let dir = tempfile::tempdir().unwrap();
    travel_collection(dir.path());

    let output = Docrank::new().sequential().process(dir.path()).unwrap();
    assert!(!output.subsection_analysis.is_empty());
    for document in &output.metadata.input_documents {
        assert!(
            output.subsection_analysis.iter().any(|s| &s.document == document),
            "no excerpt from {}",
            document
        );
    }
    for excerpt in &output.subsection_analysis {
        assert!(excerpt.refined_text.chars().count() <= 600);
        assert!(excerpt.page_number >= 1);
    }
}

#[test]
fn test_max_sections_limits_output() {
    let dir = tempfile::tempdir().unwrap();
    travel_collection(dir.path());

    let output = Docrank::new().with_max_sections(1).process(dir.path()).unwrap();
    assert_eq!(output.extracted_sections.len(), 1);
}

#[test]
fn test_missing_profile_is_collection_error() {
    let dir = tempfile::tempdir().unwrap();
    travel_collection(dir.path());
    write_input(dir.path(), "Travel Planner", "   ");

    let err = Docrank::new().process(dir.path()).unwrap_err();
    assert!(matches!(err, Error::MissingProfile));
}

#[test]
fn test_unreadable_document_does_not_abort_siblings() {
    let dir = tempfile::tempdir().unwrap();
    travel_collection(dir.path());
    // A document without layout data
    fs::write(dir.path().join("PDFs/Broken.pdf"), b"%PDF-1.7").unwrap();

    let output = Docrank::new().process(dir.path()).unwrap();
    assert_eq!(output.metadata.input_documents.len(), 2);
    assert_eq!(output.document_errors.len(), 1);
    assert_eq!(output.document_errors[0].document, "Broken.pdf");
    assert!(output
        .extracted_sections
        .iter()
        .all(|s| s.document != "Broken.pdf"));
}

#[test]
fn test_no_valid_documents_is_collection_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("PDFs")).unwrap();
    fs::write(dir.path().join("PDFs/a.pdf"), b"%PDF-1.7").unwrap();
    write_input(dir.path(), "Travel Planner", "Plan a trip");

    let err = Docrank::new().process(dir.path()).unwrap_err();
    assert!(matches!(err, Error::NoValidDocuments));
}

#[test]
fn test_invalid_collection_structure() {
    let dir = tempfile::tempdir().unwrap();
    write_input(dir.path(), "Travel Planner", "Plan a trip");

    let err = Docrank::new().process(dir.path()).unwrap_err();
    assert!(matches!(err, Error::InvalidCollection(_)));
}

#[test]
fn test_discover_and_process_batch() {
    let base = tempfile::tempdir().unwrap();
    let first = base.path().join("Collections/Collection 1");
    let second = base.path().join("Collections/Collection 2");
    travel_collection(&first);
    travel_collection(&second);
    write_input(&second, "", "");

    let collections = discover_collections(base.path()).unwrap();
    assert_eq!(collections, vec![first.clone(), second.clone()]);

    let processor = Docrank::new().build().unwrap();
    let results: Vec<_> = collections
        .iter()
        .map(|dir| processor.process_collection(dir))
        .collect();
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(Error::MissingProfile)));

    let layout = CollectionLayout::open(&first).unwrap();
    assert_eq!(layout.documents.len(), 2);
}
