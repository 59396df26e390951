//! Books / chapters / verses selector.

use crate::model::{Dataset, NavigationError};

/// Screen currently shown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    /// List of books.
    #[default]
    Books,
    /// Chapters of one book.
    Chapters {
        /// Book abbreviation.
        book: String,
    },
    /// Verses of one chapter.
    Verses {
        /// Book abbreviation.
        book: String,
        /// 0-based chapter index.
        chapter: usize,
    },
}

/// Three-state navigation over a loaded [`Dataset`].
///
/// Selections are validated against the dataset passed in; the coordinator itself
/// holds no data.
#[derive(Debug, Clone, Default)]
pub struct ViewCoordinator {
    view: View,
}

impl ViewCoordinator {
    /// Selector on the books screen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Screen currently shown.
    pub fn current(&self) -> &View {
        &self.view
    }

    /// Show the chapters of `book`.
    ///
    /// # Errors
    /// `UnknownBook` if the dataset has no such abbreviation.
    pub fn select_book(&mut self, dataset: &Dataset, book: &str) -> Result<(), NavigationError> {
        let found = dataset
            .book(book)
            .ok_or_else(|| NavigationError::UnknownBook(book.to_string()))?;
        self.view = View::Chapters {
            book: found.abbreviation().to_string(),
        };
        Ok(())
    }

    /// Show the verses of `chapter` (0-based) in the current book.
    ///
    /// # Errors
    /// `NoBookSelected` on the books screen, `ChapterOutOfRange` for a missing chapter.
    pub fn select_chapter(
        &mut self,
        dataset: &Dataset,
        chapter: usize,
    ) -> Result<(), NavigationError> {
        let book = match &self.view {
            View::Books => return Err(NavigationError::NoBookSelected),
            View::Chapters { book } | View::Verses { book, .. } => book.clone(),
        };
        let found = dataset
            .book(&book)
            .ok_or_else(|| NavigationError::UnknownBook(book.clone()))?;
        if found.chapter(chapter).is_none() {
            return Err(NavigationError::ChapterOutOfRange { book, chapter });
        }
        self.view = View::Verses { book, chapter };
        Ok(())
    }

    /// Go up one level. Returns `false` when already on the books screen.
    pub fn back(&mut self) -> bool {
        self.view = match std::mem::take(&mut self.view) {
            View::Books => return false,
            View::Chapters { .. } => View::Books,
            View::Verses { book, .. } => View::Chapters { book },
        };
        true
    }

    /// Return to the books screen (after switching datasets).
    pub fn reset(&mut self) {
        self.view = View::Books;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Book;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Book::new("gn", "Genesis", vec![vec!["a".into()], vec!["b".into()]]),
            Book::new("ex", "Exodus", vec![vec!["c".into()]]),
        ])
        .unwrap()
    }

    #[test]
    fn walks_down_and_back_up() {
        let data = dataset();
        let mut nav = ViewCoordinator::new();
        assert_eq!(nav.current(), &View::Books);

        nav.select_book(&data, "gn").unwrap();
        nav.select_chapter(&data, 1).unwrap();
        assert_eq!(
            nav.current(),
            &View::Verses {
                book: "gn".into(),
                chapter: 1
            }
        );

        assert!(nav.back());
        assert_eq!(nav.current(), &View::Chapters { book: "gn".into() });
        assert!(nav.back());
        assert!(!nav.back());
        assert_eq!(nav.current(), &View::Books);
    }

    #[test]
    fn unknown_book_is_rejected() {
        let mut nav = ViewCoordinator::new();
        assert_eq!(
            nav.select_book(&dataset(), "zz"),
            Err(NavigationError::UnknownBook("zz".into()))
        );
        assert_eq!(nav.current(), &View::Books);
    }

    #[test]
    fn chapter_out_of_range_keeps_current_view() {
        let data = dataset();
        let mut nav = ViewCoordinator::new();
        nav.select_book(&data, "ex").unwrap();

        assert_eq!(
            nav.select_chapter(&data, 1),
            Err(NavigationError::ChapterOutOfRange {
                book: "ex".into(),
                chapter: 1
            })
        );
        assert_eq!(nav.current(), &View::Chapters { book: "ex".into() });
    }

    #[test]
    fn chapter_needs_a_book() {
        let mut nav = ViewCoordinator::new();
        assert_eq!(
            nav.select_chapter(&dataset(), 0),
            Err(NavigationError::NoBookSelected)
        );
    }

    #[test]
    fn chapter_can_change_from_verses_view() {
        let data = dataset();
        let mut nav = ViewCoordinator::new();
        nav.select_book(&data, "gn").unwrap();
        nav.select_chapter(&data, 0).unwrap();
        nav.select_chapter(&data, 1).unwrap();

        nav.reset();
        assert_eq!(nav.current(), &View::Books);
    }
}
