use tracing::trace;
use trellis_core::vault::{value_display, Document, MetadataIndex, MetadataRecord};

use super::settings::RelationSettings;

/// Transient result of resolving one relation: the matched document paired
/// with its metadata record. Recomputed on every resolution event, never
/// cached.
#[derive(Debug)]
pub struct ResolvedMatch<'a> {
    pub document: &'a Document,
    pub metadata: &'a MetadataRecord,
}

/// Pre-filters the document list to candidates for a resolution starting at
/// `start_path`.
///
/// A document is a candidate iff `start_path` truncated to the length of the
/// document's parent path equals that parent path. This is prefix matching
/// on the raw string, without a separator check; over-inclusion is harmless
/// because resolution compares parent paths exactly.
pub fn candidates<'a>(documents: &'a [Document], start_path: &str) -> Vec<&'a Document> {
    documents
        .iter()
        .filter(|doc| start_path.starts_with(doc.parent_path()))
        .collect()
}

/// Resolves a single relation from `start_path`, climbing toward the root.
///
/// Splits `start_path` into segments and, from the full path down to the
/// first segment, scans `candidates` in list order for a document whose
/// parent path equals the current sub-path and whose metadata carries
/// `frontmatter_key` with the string form `frontmatter_value`. The first
/// satisfying document wins: nearer ancestors take precedence, and within a
/// folder level the candidate-list order is the tie-break.
///
/// Returns `None` when no ancestor level yields a match. Documents without
/// metadata never match.
pub fn resolve_relation<'a>(
    relation: &RelationSettings,
    start_path: &str,
    candidates: &[&'a Document],
    index: &'a MetadataIndex,
) -> Option<ResolvedMatch<'a>> {
    let mut segments: Vec<&str> = start_path.split('/').collect();

    while !segments.is_empty() {
        let sub_path = segments.join("/");
        for doc in candidates {
            if doc.parent_path() != sub_path {
                continue;
            }
            let Some(metadata) = index.get(doc.path()) else {
                continue;
            };
            if let Some(value) = metadata.get(&relation.frontmatter_key) {
                if value_display(value) == relation.frontmatter_value {
                    trace!(
                        "Relation '{}={}' matched '{}' at level '{}'",
                        relation.frontmatter_key,
                        relation.frontmatter_value,
                        doc.path(),
                        sub_path
                    );
                    return Some(ResolvedMatch { document: doc, metadata });
                }
            }
        }
        segments.pop();
    }

    None
}

/// Resolves every relation independently, preserving definition order.
///
/// The result is parallel to `relations`: entry `i` is the match for
/// relation `i`, or `None`. Deterministic for a given document list and
/// index state.
pub fn resolve_all<'a>(
    relations: &[RelationSettings],
    start_path: &str,
    documents: &'a [Document],
    index: &'a MetadataIndex,
) -> Vec<Option<ResolvedMatch<'a>>> {
    let candidates = candidates(documents, start_path);
    relations
        .iter()
        .map(|relation| resolve_relation(relation, start_path, &candidates, index))
        .collect()
}
