//! Page classification: which pages are separators, which are blank.
//!
//! Both classifications are pure functions over the recognition result.
//! They are deterministic, touch no I/O, and may overlap: nothing prevents
//! a page from satisfying both predicates, although a separator page has at
//! least one line by construction and so is never blank in practice.
//!
//! ## Matching semantics
//!
//! A page is a **separator** when at least one of its recognized lines
//! contains *every* configured token, case-insensitively, as a substring.
//! Substring containment is deliberate: OCR output of a separator stamp is
//! noisy, and "SeparatorInvoice" or "my-separator invoice!" should still
//! match. A page is **blank** when it has zero recognized lines; a page
//! whose only line is whitespace is *not* blank.

use crate::pipeline::recognize::PageRecognition;
use std::collections::BTreeSet;

/// The derived separator and blank page-number sets for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageClassification {
    /// 1-indexed pages that mark a document boundary.
    pub separator_pages: BTreeSet<u32>,

    /// 1-indexed pages with no recognized lines.
    pub blank_pages: BTreeSet<u32>,
}

/// Classify every page of a recognition result.
pub fn classify_pages(pages: &[PageRecognition], tokens: &[String]) -> PageClassification {
    PageClassification {
        separator_pages: find_separator_pages(pages, tokens),
        blank_pages: find_blank_pages(pages),
    }
}

/// Pages where at least one line contains all `tokens` case-insensitively.
pub fn find_separator_pages(pages: &[PageRecognition], tokens: &[String]) -> BTreeSet<u32> {
    let upper_tokens: Vec<String> = tokens.iter().map(|t| t.to_uppercase()).collect();
    pages
        .iter()
        .filter(|p| {
            p.lines.iter().any(|line| {
                let upper = line.text.to_uppercase();
                upper_tokens.iter().all(|token| upper.contains(token))
            })
        })
        .map(|p| p.page)
        .collect()
}

/// Pages whose `lines` sequence is empty. No other blankness heuristic.
pub fn find_blank_pages(pages: &[PageRecognition]) -> BTreeSet<u32> {
    pages
        .iter()
        .filter(|p| p.lines.is_empty())
        .map(|p| p.page)
        .collect()
}
