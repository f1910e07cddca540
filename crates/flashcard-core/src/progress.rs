//! Progress percentages for category summaries.

use crate::models::CategorySummary;

/// Share of `count` in `total` as a whole percentage, truncated.
/// An empty total yields 0.
pub fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100 * count / total) as u32
}

/// Fold every category into a single summary.
pub fn overall(summaries: &[CategorySummary]) -> CategorySummary {
    summaries.iter().fold(
        CategorySummary {
            category: "All categories".to_string(),
            ..Default::default()
        },
        |mut acc, s| {
            acc.total += s.total;
            acc.learning += s.learning;
            acc.reviewing += s.reviewing;
            acc.mastered += s.mastered;
            acc
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_empty_total() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 0), 0);
    }

    #[test]
    fn test_percentage_truncates() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 66);
        assert_eq!(percentage(5, 5), 100);
        assert_eq!(percentage(0, 7), 0);
    }

    #[test]
    fn test_overall() {
        let summaries = vec![
            CategorySummary {
                category: "A".into(),
                total: 4,
                learning: 1,
                reviewing: 1,
                mastered: 2,
            },
            CategorySummary {
                category: "B".into(),
                total: 6,
                learning: 6,
                reviewing: 0,
                mastered: 0,
            },
        ];
        let all = overall(&summaries);
        assert_eq!(all.total, 10);
        assert_eq!(all.learning, 7);
        assert_eq!(all.mastered, 2);
        assert_eq!(all.mastered_percentage(), 20);
        assert_eq!(overall(&[]).total, 0);
    }
}
