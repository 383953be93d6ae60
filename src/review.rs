//! Walks the user through every draft produced by one receipt upload, one at a time.
//!
//! Each draft carries a disposition. A draft leaves `Editing` exactly once: either it was saved
//! through the embedded purchase dialog or it was skipped. Resolving the draft in the last
//! position ends the workflow. After that every operation is ignored, so the owner hears about
//! the end only once.

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    Editing,
    Saved,
    Canceled,
}

/// What the owner has to react to after an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Still running; the current draft may have changed.
    Continue,
    /// Ended on a save. Carries how many drafts ended up saved.
    Completed { saved: usize },
    /// Ended on a skip or cancel-all.
    Cancelled,
    /// Operation not applicable (draft already resolved or workflow already over).
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("review needs at least one draft")]
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReviewWorkflow<T> {
    drafts: Vec<T>,
    dispositions: Vec<Disposition>,
    current: usize,
    finished: bool,
}

impl<T> ReviewWorkflow<T> {
    pub fn new(drafts: Vec<T>) -> Result<Self, ReviewError> {
        if drafts.is_empty() {
            return Err(ReviewError::Empty);
        }
        let dispositions = vec![Disposition::Editing; drafts.len()];
        Ok(Self {
            drafts,
            dispositions,
            current: 0,
            finished: false,
        })
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_draft(&self) -> &T {
        &self.drafts[self.current]
    }

    pub fn current_disposition(&self) -> Disposition {
        self.dispositions[self.current]
    }

    pub fn dispositions(&self) -> &[Disposition] {
        &self.dispositions
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The embedded dialog is editable only while its draft is unresolved.
    pub fn is_editable(&self) -> bool {
        !self.finished && self.current_disposition() == Disposition::Editing
    }

    pub fn saved_count(&self) -> usize {
        self.count(Disposition::Saved)
    }

    pub fn count(&self, disposition: Disposition) -> usize {
        self.dispositions
            .iter()
            .filter(|d| **d == disposition)
            .count()
    }

    pub fn can_go_previous(&self) -> bool {
        !self.finished && self.current > 0
    }

    pub fn can_go_next(&self) -> bool {
        !self.finished && self.current + 1 < self.drafts.len()
    }

    /// Call once the embedded dialog has persisted the current draft.
    pub fn confirm_current(&mut self) -> ReviewOutcome {
        if !self.is_editable() {
            return ReviewOutcome::Ignored;
        }
        self.dispositions[self.current] = Disposition::Saved;
        self.advance_or_finish(ReviewOutcome::Completed {
            saved: self.saved_count(),
        })
    }

    pub fn skip_current(&mut self) -> ReviewOutcome {
        if !self.is_editable() {
            return ReviewOutcome::Ignored;
        }
        self.dispositions[self.current] = Disposition::Canceled;
        self.advance_or_finish(ReviewOutcome::Cancelled)
    }

    /// Marks every unresolved draft canceled and ends the workflow from any position.
    pub fn cancel_all(&mut self) -> ReviewOutcome {
        if self.finished {
            return ReviewOutcome::Ignored;
        }
        for disposition in self.dispositions.iter_mut() {
            if *disposition == Disposition::Editing {
                *disposition = Disposition::Canceled;
            }
        }
        self.finished = true;
        ReviewOutcome::Cancelled
    }

    pub fn previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.current += 1;
        true
    }

    fn advance_or_finish(&mut self, terminal: ReviewOutcome) -> ReviewOutcome {
        if self.current + 1 >= self.drafts.len() {
            self.finished = true;
            terminal
        } else {
            self.current += 1;
            ReviewOutcome::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workflow(n: usize) -> ReviewWorkflow<usize> {
        ReviewWorkflow::new((0..n).collect()).unwrap()
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert_eq!(
            ReviewWorkflow::<u8>::new(Vec::new()).unwrap_err(),
            ReviewError::Empty
        );
    }

    #[test]
    fn opens_on_first_draft_with_everything_editing() {
        let review = workflow(2);
        assert_eq!(review.current_index(), 0);
        assert_eq!(review.dispositions(), &[Disposition::Editing; 2]);
        assert!(review.is_editable());
        assert!(!review.can_go_previous());
        assert!(review.can_go_next());
    }

    #[test]
    fn confirming_two_uploads_reports_two_saved() {
        let mut review = workflow(2);
        assert_eq!(review.confirm_current(), ReviewOutcome::Continue);
        assert_eq!(review.current_index(), 1);
        assert_eq!(
            review.confirm_current(),
            ReviewOutcome::Completed { saved: 2 }
        );
        assert!(review.is_finished());
    }

    #[test]
    fn skipping_last_draft_reports_cancellation() {
        let mut review = workflow(2);
        review.confirm_current();
        assert_eq!(review.skip_current(), ReviewOutcome::Cancelled);
        assert_eq!(review.saved_count(), 1);
        assert_eq!(review.count(Disposition::Canceled), 1);
    }

    #[test]
    fn terminal_outcome_is_reported_exactly_once() {
        for n in 1..=5 {
            for pattern in 0u32..(1 << n) {
                let mut review = workflow(n);
                let mut terminals = 0;
                for step in 0..n {
                    let outcome = if pattern & (1 << step) == 0 {
                        review.confirm_current()
                    } else {
                        review.skip_current()
                    };
                    if matches!(
                        outcome,
                        ReviewOutcome::Completed { .. } | ReviewOutcome::Cancelled
                    ) {
                        terminals += 1;
                    }
                }
                assert_eq!(terminals, 1, "n={n} pattern={pattern:b}");
                assert_eq!(review.dispositions().len(), n);
                assert_eq!(review.count(Disposition::Editing), 0);
                assert_eq!(review.confirm_current(), ReviewOutcome::Ignored);
                assert_eq!(review.skip_current(), ReviewOutcome::Ignored);
                assert_eq!(review.cancel_all(), ReviewOutcome::Ignored);
            }
        }
    }

    #[test]
    fn cancel_all_only_touches_unresolved_drafts() {
        let mut review = workflow(4);
        review.confirm_current();
        review.skip_current();
        assert_eq!(review.current_index(), 2);
        assert_eq!(review.cancel_all(), ReviewOutcome::Cancelled);
        assert_eq!(
            review.dispositions(),
            &[
                Disposition::Saved,
                Disposition::Canceled,
                Disposition::Canceled,
                Disposition::Canceled
            ]
        );
        assert!(review.is_finished());
    }

    #[test]
    fn navigation_is_clamped_and_leaves_dispositions_alone() {
        let mut review = workflow(3);
        assert!(!review.previous());
        review.confirm_current();
        assert!(review.previous());
        assert_eq!(review.current_index(), 0);
        assert_eq!(review.current_disposition(), Disposition::Saved);
        assert!(!review.is_editable());

        assert!(review.next());
        assert!(review.next());
        assert!(!review.next());
        assert_eq!(review.current_index(), 2);
        assert_eq!(
            review.dispositions(),
            &[Disposition::Saved, Disposition::Editing, Disposition::Editing]
        );
    }

    #[test]
    fn resolved_draft_cannot_be_resubmitted() {
        let mut review = workflow(3);
        review.confirm_current();
        review.previous();
        assert_eq!(review.confirm_current(), ReviewOutcome::Ignored);
        assert_eq!(review.skip_current(), ReviewOutcome::Ignored);
        assert_eq!(review.current_index(), 0);
        assert_eq!(review.saved_count(), 1);
    }
}
