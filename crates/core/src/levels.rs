use std::collections::BTreeSet;

use crate::types::{HeadingCandidate, HeadingLevel, LevelMap};

/// Font-size hierarchy derived from the candidate set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LevelAssignment {
    /// Largest candidate size, reserved for the title.
    pub title_size: Option<i64>,
    pub levels: LevelMap,
}

/// Map the distinct candidate sizes below the title size to H1, H2, H3.
///
/// Sizes are taken in descending order; sizes past the `max_levels`-th
/// distinct value get no level and their candidates are dropped from the
/// outline.
pub fn assign_levels(candidates: &[HeadingCandidate], max_levels: u8) -> LevelAssignment {
    let sizes: BTreeSet<i64> = candidates.iter().map(|c| c.size).collect();
    let mut descending = sizes.into_iter().rev();

    let Some(title_size) = descending.next() else {
        return LevelAssignment::default();
    };

    let levels = descending
        .zip(1..=max_levels.min(HeadingLevel::MAX))
        .filter_map(|(size, rank)| HeadingLevel::try_from(rank).ok().map(|level| (size, level)))
        .collect();

    LevelAssignment {
        title_size: Some(title_size),
        levels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(size: i64) -> HeadingCandidate {
        HeadingCandidate {
            text: format!("size {}", size),
            size,
            page: 0,
            score: 6.0,
        }
    }

    #[test]
    fn sizes_rank_below_title() {
        let candidates: Vec<_> = [24, 18, 14, 18, 24].into_iter().map(candidate).collect();
        let assignment = assign_levels(&candidates, 3);

        assert_eq!(assignment.title_size, Some(24));
        assert_eq!(assignment.levels.len(), 2);
        assert_eq!(assignment.levels[&18], HeadingLevel::H1);
        assert_eq!(assignment.levels[&14], HeadingLevel::H2);
    }

    #[test]
    fn at_most_three_levels() {
        let candidates: Vec<_> = [30, 26, 22, 18, 16, 14].into_iter().map(candidate).collect();
        let assignment = assign_levels(&candidates, 3);

        assert_eq!(assignment.title_size, Some(30));
        assert_eq!(assignment.levels.len(), 3);
        assert_eq!(assignment.levels[&26], HeadingLevel::H1);
        assert_eq!(assignment.levels[&22], HeadingLevel::H2);
        assert_eq!(assignment.levels[&18], HeadingLevel::H3);
        assert!(!assignment.levels.contains_key(&16));
        assert!(!assignment.levels.contains_key(&30));
    }

    #[test]
    fn max_levels_is_capped_at_three() {
        let candidates: Vec<_> = [30, 26, 22, 18, 16].into_iter().map(candidate).collect();
        assert_eq!(assign_levels(&candidates, 200).levels.len(), 3);
        assert_eq!(assign_levels(&candidates, 2).levels.len(), 2);
    }

    #[test]
    fn single_size_has_title_but_no_levels() {
        let candidates = vec![candidate(16), candidate(16)];
        let assignment = assign_levels(&candidates, 3);
        assert_eq!(assignment.title_size, Some(16));
        assert!(assignment.levels.is_empty());
    }

    #[test]
    fn no_candidates_no_assignment() {
        assert_eq!(assign_levels(&[], 3), LevelAssignment::default());
    }
}
