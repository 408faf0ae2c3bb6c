//! Document segmentation: partition pages at separators and copy them into
//! new PDFs.
//!
//! Segmentation is split into two halves:
//!
//! * [`plan_segments`] — a pure function from the page count and the
//!   classification to an ordered list of page-number segments. All the
//!   edge-case behaviour (empty segments, the unconditional trailing
//!   emission) lives here, where it can be tested without touching a PDF.
//! * [`split_document`] — executes a plan against the source bytes with
//!   lopdf, producing one serialised PDF per segment.
//!
//! ## Why spawn_blocking?
//!
//! Parsing a PDF, cloning its object table per segment, and re-serialising
//! each output is CPU-bound work on potentially large buffers.
//! `tokio::task::spawn_blocking` keeps it off the async worker threads, the
//! same way rasterisation is handled in renderer-based pipelines.
//!
//! ## Copy strategy
//!
//! Each output starts as a clone of the parsed source; the pages *not* in
//! the segment are deleted, and the object table is pruned, renumbered, and
//! compressed before saving. Deleting from a clone preserves every resource
//! a kept page references (fonts, images, annotations) without tracking the
//! reference graph by hand.

use crate::config::TrailingPolicy;
use crate::error::SplitError;
use crate::output::DocumentInfo;
use crate::pipeline::classify::PageClassification;
use lopdf::Document;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Partition the physical page sequence `1..=page_count` into output
/// segments.
///
/// Walks pages in order: a separator page finalizes the current segment
/// (never copying the separator itself), a blank page is skipped entirely,
/// and any other page is appended to the current segment. After the walk
/// the current segment is emitted unconditionally, which guarantees at
/// least one output document and always emits the trailing segment after
/// the last separator, empty or not, subject to `trailing`.
///
/// Classification entries outside `1..=page_count` are ignored.
pub fn plan_segments(
    page_count: u32,
    classification: &PageClassification,
    trailing: TrailingPolicy,
) -> Vec<Vec<u32>> {
    let mut segments: Vec<Vec<u32>> = Vec::new();
    let mut current: Vec<u32> = Vec::new();

    for page in 1..=page_count {
        if classification.separator_pages.contains(&page) {
            segments.push(std::mem::take(&mut current));
        } else if !classification.blank_pages.contains(&page) {
            current.push(page);
        }
    }

    match trailing {
        TrailingPolicy::EmitEmpty => segments.push(current),
        TrailingPolicy::SuppressEmpty => {
            if !current.is_empty() || segments.is_empty() {
                segments.push(current);
            }
        }
    }

    segments
}

/// Execute a segmentation plan: copy each segment's pages into a fresh
/// document and serialise it.
///
/// Returns one byte buffer per segment, in plan order.
pub async fn split_document(
    bytes: Vec<u8>,
    plan: Vec<Vec<u32>>,
) -> Result<Vec<Vec<u8>>, SplitError> {
    tokio::task::spawn_blocking(move || split_blocking(&bytes, &plan))
        .await
        .map_err(|e| SplitError::Internal(format!("Segmentation task panicked: {e}")))?
}

/// Blocking implementation of [`split_document`].
fn split_blocking(bytes: &[u8], plan: &[Vec<u32>]) -> Result<Vec<Vec<u8>>, SplitError> {
    let source = Document::load_mem(bytes).map_err(|e| SplitError::CorruptPdf {
        detail: e.to_string(),
    })?;
    let page_count = source.get_pages().len() as u32;

    let mut outputs = Vec::with_capacity(plan.len());
    for (seq, segment) in plan.iter().enumerate() {
        let keep: BTreeSet<u32> = segment.iter().copied().collect();
        let delete: Vec<u32> = (1..=page_count).filter(|p| !keep.contains(p)).collect();

        let mut document = source.clone();
        if !delete.is_empty() {
            document.delete_pages(&delete);
        }
        document.prune_objects();
        document.renumber_objects();
        document.compress();

        let mut out = Vec::new();
        document
            .save_to(&mut out)
            .map_err(|e| SplitError::SegmentationFailed {
                segment: seq,
                detail: e.to_string(),
            })?;

        debug!(
            "Segment {}: {} page(s), {} bytes",
            seq,
            segment.len(),
            out.len()
        );
        outputs.push(out);
    }

    info!(
        "Assembled {} output document(s) from {} source page(s)",
        outputs.len(),
        page_count
    );
    Ok(outputs)
}

/// Parse the source PDF far enough to report its page count and version.
pub async fn inspect_bytes(bytes: Vec<u8>) -> Result<DocumentInfo, SplitError> {
    tokio::task::spawn_blocking(move || inspect_blocking(&bytes))
        .await
        .map_err(|e| SplitError::Internal(format!("Inspect task panicked: {e}")))?
}

/// Blocking implementation of [`inspect_bytes`].
fn inspect_blocking(bytes: &[u8]) -> Result<DocumentInfo, SplitError> {
    let document = Document::load_mem(bytes).map_err(|e| SplitError::CorruptPdf {
        detail: e.to_string(),
    })?;
    Ok(DocumentInfo {
        page_count: document.get_pages().len() as u32,
        pdf_version: document.version.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn classification(separators: &[u32], blanks: &[u32]) -> PageClassification {
        PageClassification {
            separator_pages: separators.iter().copied().collect(),
            blank_pages: blanks.iter().copied().collect(),
        }
    }

    // ── plan_segments ────────────────────────────────────────────────────

    #[test]
    fn no_separators_yields_single_segment() {
        let plan = plan_segments(4, &classification(&[], &[]), TrailingPolicy::EmitEmpty);
        assert_eq!(plan, vec![vec![1, 2, 3, 4]]);
    }

    #[test]
    fn separator_splits_and_is_never_copied() {
        // Scenario A: 5 pages, page 3 is a separator.
        let plan = plan_segments(5, &classification(&[3], &[]), TrailingPolicy::EmitEmpty);
        assert_eq!(plan, vec![vec![1, 2], vec![4, 5]]);
    }

    #[test]
    fn blank_pages_are_skipped() {
        // Scenario B: 4 pages, page 2 blank, no separators.
        let plan = plan_segments(4, &classification(&[], &[2]), TrailingPolicy::EmitEmpty);
        assert_eq!(plan, vec![vec![1, 3, 4]]);
    }

    #[test]
    fn trailing_separator_emits_empty_document() {
        // Scenario C: 3 pages, page 3 (last) is a separator.
        let plan = plan_segments(3, &classification(&[3], &[]), TrailingPolicy::EmitEmpty);
        assert_eq!(plan, vec![vec![1, 2], vec![]]);
    }

    #[test]
    fn trailing_separator_suppressed_on_request() {
        let plan = plan_segments(3, &classification(&[3], &[]), TrailingPolicy::SuppressEmpty);
        assert_eq!(plan, vec![vec![1, 2]]);
    }

    #[test]
    fn suppress_policy_still_guarantees_one_document() {
        // All pages blank: nothing accumulated, nothing emitted earlier.
        let plan = plan_segments(2, &classification(&[], &[1, 2]), TrailingPolicy::SuppressEmpty);
        assert_eq!(plan, vec![Vec::<u32>::new()]);
    }

    #[test]
    fn adjacent_separators_emit_empty_intermediate_under_both_policies() {
        for policy in [TrailingPolicy::EmitEmpty, TrailingPolicy::SuppressEmpty] {
            let plan = plan_segments(4, &classification(&[2, 3], &[]), policy);
            assert_eq!(plan[0], vec![1]);
            assert_eq!(plan[1], Vec::<u32>::new());
            assert_eq!(plan.last().unwrap(), &vec![4]);
        }
    }

    #[test]
    fn page_both_separator_and_blank_acts_as_separator() {
        let plan = plan_segments(3, &classification(&[2], &[2]), TrailingPolicy::EmitEmpty);
        assert_eq!(plan, vec![vec![1], vec![3]]);
    }

    #[test]
    fn out_of_range_classifications_are_ignored() {
        let plan = plan_segments(2, &classification(&[9], &[8]), TrailingPolicy::EmitEmpty);
        assert_eq!(plan, vec![vec![1, 2]]);
    }

    #[test]
    fn zero_page_document_still_emits_one_output() {
        let plan = plan_segments(0, &classification(&[], &[]), TrailingPolicy::EmitEmpty);
        assert_eq!(plan, vec![Vec::<u32>::new()]);
    }

    #[test]
    fn copied_page_total_matches_count_minus_separators_and_blanks() {
        // Property: pages copied = page_count - |sep| - |blank \ sep|.
        let cls = classification(&[2, 5], &[3, 5]);
        let plan = plan_segments(6, &cls, TrailingPolicy::EmitEmpty);
        let copied: usize = plan.iter().map(Vec::len).sum();
        let blank_only = cls.blank_pages.difference(&cls.separator_pages).count();
        assert_eq!(copied, 6 - cls.separator_pages.len() - blank_only);
    }

    #[test]
    fn order_is_preserved_within_segments() {
        let plan = plan_segments(9, &classification(&[4], &[2, 7]), TrailingPolicy::EmitEmpty);
        for segment in &plan {
            let mut sorted = segment.clone();
            sorted.sort_unstable();
            assert_eq!(segment, &sorted);
        }
        let all: Vec<u32> = plan.iter().flatten().copied().collect();
        assert_eq!(all, vec![1, 3, 5, 6, 8, 9]);
        let _ = BTreeSet::from_iter(all); // no duplicates across segments
    }

    // ── split_document against a real PDF ────────────────────────────────

    /// Build a minimal n-page PDF in memory.
    fn pdf_with_pages(n: usize) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(n);
        for i in 0..n {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(format!("Page {}", i + 1))]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => n as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn page_count_of(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).unwrap().get_pages().len()
    }

    #[tokio::test]
    async fn split_copies_planned_pages() {
        let source = pdf_with_pages(5);
        let plan = vec![vec![1, 2], vec![4, 5]];
        let outputs = split_document(source, plan).await.unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(page_count_of(&outputs[0]), 2);
        assert_eq!(page_count_of(&outputs[1]), 2);
    }

    #[tokio::test]
    async fn empty_segment_produces_zero_page_document() {
        let source = pdf_with_pages(3);
        let outputs = split_document(source, vec![vec![1, 2], vec![]]).await.unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(page_count_of(&outputs[0]), 2);
        assert_eq!(page_count_of(&outputs[1]), 0);
        // Still a loadable PDF.
        assert!(Document::load_mem(&outputs[1]).is_ok());
    }

    #[tokio::test]
    async fn corrupt_source_is_rejected() {
        let err = split_document(b"%PDF-1.5 garbage".to_vec(), vec![vec![1]])
            .await
            .unwrap_err();
        assert!(matches!(err, SplitError::CorruptPdf { .. }));
    }

    #[tokio::test]
    async fn inspect_reports_page_count_and_version() {
        let info = inspect_bytes(pdf_with_pages(4)).await.unwrap();
        assert_eq!(info.page_count, 4);
        assert_eq!(info.pdf_version, "1.5");
    }
}
