// src/harvest/window.rs
//! Time-windowed pagination over a newest-first feed.
//!
//! Items newer than `before` are skipped (older, in-window items may follow);
//! the first item older than `after` ends the scan, because a strictly
//! descending feed cannot bring anything back into the window. If the remote
//! ever breaks that ordering, results are truncated early. That is an accepted
//! assumption of the feed contract, not something this module tries to repair.

use crate::harvest::types::{Item, ItemFeed};
use anyhow::Result;

/// Inclusive bounds in Unix seconds. `after > before` is valid and yields nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub after: Option<i64>,
    pub before: Option<i64>,
}

impl TimeWindow {
    pub fn new(after: Option<i64>, before: Option<i64>) -> Self {
        Self { after, before }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!((self.after, self.before), (Some(a), Some(b)) if a > b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorState {
    Scanning,
    /// The feed ran out.
    Exhausted,
    /// An item older than `after` was seen.
    WindowClosed,
    /// The item cap was reached.
    Capped,
}

impl PaginatorState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PaginatorState::Scanning)
    }
}

pub struct WindowedPaginator<'a> {
    feed: Box<dyn ItemFeed + Send + 'a>,
    window: TimeWindow,
    hard_limit: Option<usize>,
    emitted: usize,
    skipped_newer: usize,
    state: PaginatorState,
}

impl<'a> WindowedPaginator<'a> {
    /// `hard_limit` of `Some(0)` is treated as no cap.
    pub fn new(
        feed: Box<dyn ItemFeed + Send + 'a>,
        window: TimeWindow,
        hard_limit: Option<usize>,
    ) -> Self {
        Self {
            feed,
            window,
            hard_limit: hard_limit.filter(|&n| n > 0),
            emitted: 0,
            skipped_newer: 0,
            state: PaginatorState::Scanning,
        }
    }

    pub fn state(&self) -> PaginatorState {
        self.state
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn skipped_newer(&self) -> usize {
        self.skipped_newer
    }

    /// Next in-window item, or `None` once a terminal state is reached.
    /// A feed error is returned as-is and leaves the state unchanged.
    pub async fn next(&mut self) -> Result<Option<Item>> {
        while self.state == PaginatorState::Scanning {
            let Some(item) = self.feed.next_item().await? else {
                self.state = PaginatorState::Exhausted;
                break;
            };
            let t = item.created_utc;

            if self.window.before.is_some_and(|b| t > b) {
                self.skipped_newer += 1;
                continue;
            }
            if self.window.after.is_some_and(|a| t < a) {
                self.state = PaginatorState::WindowClosed;
                break;
            }

            self.emitted += 1;
            if self.hard_limit.is_some_and(|cap| self.emitted >= cap) {
                self.state = PaginatorState::Capped;
            }
            return Ok(Some(item));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::types::ItemClass;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingFeed {
        items: VecDeque<Item>,
        pulled: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl ItemFeed for CountingFeed {
        async fn next_item(&mut self) -> Result<Option<Item>> {
            let it = self.items.pop_front();
            if it.is_some() {
                self.pulled.fetch_add(1, Ordering::SeqCst);
            }
            Ok(it)
        }
    }

    fn feed(ts: &[i64]) -> (Box<dyn ItemFeed + Send>, Arc<AtomicUsize>) {
        let pulled = Arc::new(AtomicUsize::new(0));
        let items = ts
            .iter()
            .map(|&t| Item {
                class: ItemClass::Post,
                id: format!("t3_{t}"),
                category_label: "test".into(),
                created_utc: t,
                title: Some(String::new()),
                body: String::new(),
            })
            .collect();
        (
            Box::new(CountingFeed {
                items,
                pulled: pulled.clone(),
            }),
            pulled,
        )
    }

    async fn drain(p: &mut WindowedPaginator<'_>) -> Vec<i64> {
        let mut out = Vec::new();
        while let Some(it) = p.next().await.unwrap() {
            out.push(it.created_utc);
        }
        out
    }

    #[tokio::test]
    async fn window_skips_newer_and_stops_at_older() {
        let (f, pulled) = feed(&[100, 90, 80, 70, 60]);
        let mut p = WindowedPaginator::new(f, TimeWindow::new(Some(75), Some(95)), None);
        assert_eq!(drain(&mut p).await, vec![90, 80]);
        assert_eq!(p.state(), PaginatorState::WindowClosed);
        // 70 closed the window; 60 was never pulled
        assert_eq!(pulled.load(Ordering::SeqCst), 4);
        assert_eq!(p.skipped_newer(), 1);
    }

    #[tokio::test]
    async fn cap_applies_to_in_window_items() {
        let (f, pulled) = feed(&[100, 90, 80, 70, 60]);
        let mut p = WindowedPaginator::new(f, TimeWindow::new(Some(75), Some(95)), Some(1));
        assert_eq!(drain(&mut p).await, vec![90]);
        assert_eq!(p.state(), PaginatorState::Capped);
        assert_eq!(pulled.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn bounds_are_inclusive() {
        let (f, _) = feed(&[95, 75]);
        let mut p = WindowedPaginator::new(f, TimeWindow::new(Some(75), Some(95)), None);
        assert_eq!(drain(&mut p).await, vec![95, 75]);
        assert_eq!(p.state(), PaginatorState::Exhausted);
    }

    #[tokio::test]
    async fn open_window_and_zero_cap_take_everything() {
        let (f, _) = feed(&[5, 4, 3]);
        let mut p = WindowedPaginator::new(f, TimeWindow::default(), Some(0));
        assert_eq!(drain(&mut p).await, vec![5, 4, 3]);
    }

    #[tokio::test]
    async fn degenerate_window_yields_nothing() {
        let w = TimeWindow::new(Some(90), Some(80));
        assert!(w.is_degenerate());
        let (f, _) = feed(&[100, 85, 70]);
        let mut p = WindowedPaginator::new(f, w, None);
        assert!(drain(&mut p).await.is_empty());
        assert_eq!(p.state(), PaginatorState::WindowClosed);
    }

    #[tokio::test]
    async fn terminal_state_does_not_touch_the_feed_again() {
        let (f, pulled) = feed(&[10, 9, 8]);
        let mut p = WindowedPaginator::new(f, TimeWindow::default(), Some(1));
        assert!(p.next().await.unwrap().is_some());
        assert!(p.next().await.unwrap().is_none());
        assert!(p.next().await.unwrap().is_none());
        assert_eq!(pulled.load(Ordering::SeqCst), 1);
    }
}
