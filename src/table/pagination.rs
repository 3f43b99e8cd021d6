// ABOUTME: Pagination bar model: Prev, a window of page numbers with gaps, Next

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Prev { enabled: bool },
    Page { number: usize, current: bool },
    Gap,
    Next { enabled: bool },
}

impl PageButton {
    pub fn label(&self) -> String {
        match self {
            Self::Prev { .. } => "‹ Prev".to_string(),
            Self::Page { number, .. } => number.to_string(),
            Self::Gap => "…".to_string(),
            Self::Next { .. } => "Next ›".to_string(),
        }
    }
}

/// First page, last page and the neighbours of the current page, with a gap
/// marker wherever numbers are skipped.
pub fn pagination_bar(current: usize, total: usize) -> Vec<PageButton> {
    let total = total.max(1);
    let current = current.clamp(1, total);

    let mut pages: Vec<usize> = [1, total, current.saturating_sub(1), current, current + 1]
        .into_iter()
        .filter(|page| (1..=total).contains(page))
        .collect();
    pages.sort_unstable();
    pages.dedup();

    let mut buttons = vec![PageButton::Prev {
        enabled: current > 1,
    }];
    let mut last = 0;
    for page in pages {
        if last != 0 && page - last > 1 {
            buttons.push(PageButton::Gap);
        }
        buttons.push(PageButton::Page {
            number: page,
            current: page == current,
        });
        last = page;
    }
    buttons.push(PageButton::Next {
        enabled: current < total,
    });
    buttons
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numbers(buttons: &[PageButton]) -> Vec<String> {
        buttons.iter().map(PageButton::label).collect()
    }

    #[test]
    fn test_middle_page_has_gaps_on_both_sides() {
        assert_eq!(
            numbers(&pagination_bar(5, 10)),
            vec!["‹ Prev", "1", "…", "4", "5", "6", "…", "10", "Next ›"]
        );
    }

    #[test]
    fn test_single_page_disables_both_ends() {
        let bar = pagination_bar(1, 1);
        assert_eq!(
            bar,
            vec![
                PageButton::Prev { enabled: false },
                PageButton::Page {
                    number: 1,
                    current: true
                },
                PageButton::Next { enabled: false },
            ]
        );
    }

    #[test]
    fn test_first_page_of_three_has_no_gap() {
        assert_eq!(
            numbers(&pagination_bar(1, 3)),
            vec!["‹ Prev", "1", "2", "3", "Next ›"]
        );
    }
}
