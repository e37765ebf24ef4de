//! Pull-based page sources.
//!
//! A reader hands decoded pages to the delete machinery one poll at a time.
//! `Pending` means "nothing yet, ask again"; only `Finished` ends the stream.

use std::collections::VecDeque;
use std::convert::Infallible;

use eqdel_core::prelude::RowBatch;

#[derive(Debug, Clone, PartialEq)]
pub enum PagePoll {
    /// A decoded page. May have zero rows.
    Ready(RowBatch),
    /// No page available yet; the source is not exhausted.
    Pending,
    /// The source is exhausted. Authoritative.
    Finished,
}

pub trait PageSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Pull the next step of the stream. Blocking is allowed.
    fn poll_page(&mut self) -> Result<PagePoll, Self::Error>;
}

impl<S: PageSource + ?Sized> PageSource for &mut S {
    type Error = S::Error;

    fn poll_page(&mut self) -> Result<PagePoll, Self::Error> {
        (**self).poll_page()
    }
}

impl<S: PageSource + ?Sized> PageSource for Box<S> {
    type Error = S::Error;

    fn poll_page(&mut self) -> Result<PagePoll, Self::Error> {
        (**self).poll_page()
    }
}

/// In-memory page source with scripted gaps.
///
/// Steps are replayed in insertion order; once they run out every poll
/// returns `Finished`.
#[derive(Debug, Clone, Default)]
pub struct MemoryPageSource {
    steps: VecDeque<Option<RowBatch>>,
}

impl MemoryPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_batches<I>(batches: I) -> Self
    where
        I: IntoIterator<Item = RowBatch>,
    {
        Self {
            steps: batches.into_iter().map(Some).collect(),
        }
    }

    pub fn push_page(&mut self, batch: RowBatch) -> &mut Self {
        self.steps.push_back(Some(batch));
        self
    }

    /// Queue one `Pending` answer.
    pub fn push_pending(&mut self) -> &mut Self {
        self.steps.push_back(None);
        self
    }

    /// Steps not yet polled.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl PageSource for MemoryPageSource {
    type Error = Infallible;

    fn poll_page(&mut self) -> Result<PagePoll, Self::Error> {
        Ok(match self.steps.pop_front() {
            Some(Some(batch)) => PagePoll::Ready(batch),
            Some(None) => PagePoll::Pending,
            None => PagePoll::Finished,
        })
    }
}
