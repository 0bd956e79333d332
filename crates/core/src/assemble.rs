use crate::levels::LevelAssignment;
use crate::types::{HeadingCandidate, OutlineDocument, OutlineEntry};

/// Build the final `{title, outline}` document.
///
/// The title joins every title-sized candidate found on a page up to
/// `title_max_page`, in scoring order; without one the title is `file_stem`.
/// Each candidate whose size has a level becomes an entry. Entries are
/// stably sorted by page, then level rank.
pub fn assemble_outline(
    candidates: &[HeadingCandidate],
    assignment: &LevelAssignment,
    file_stem: &str,
    title_max_page: usize,
) -> OutlineDocument {
    let title_parts: Vec<&str> = match assignment.title_size {
        Some(title_size) => candidates
            .iter()
            .filter(|c| c.size == title_size && c.page <= title_max_page)
            .map(|c| c.text.as_str())
            .collect(),
        None => Vec::new(),
    };

    let title = if title_parts.is_empty() {
        file_stem.to_string()
    } else {
        title_parts.join(" ")
    };

    let mut outline: Vec<OutlineEntry> = candidates
        .iter()
        .filter_map(|c| {
            assignment.levels.get(&c.size).map(|level| OutlineEntry {
                level: *level,
                text: c.text.clone(),
                page: c.page,
            })
        })
        .collect();

    outline.sort_by_key(|entry| (entry.page, entry.level.rank()));

    OutlineDocument { title, outline }
}
