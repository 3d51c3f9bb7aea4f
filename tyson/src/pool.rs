// SPDX-License-Identifier: Apache-2.0

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

use log::trace;

use crate::{Cursor, CursorConfig};

/// A thread-safe pool of reusable in-memory cursors.
///
/// Cursors keep their window and scratch allocations between documents.
/// A [`PooledCursor`] goes back to the pool when dropped, after being reset.
///
/// ```
/// use tyson::CursorPool;
///
/// let pool = CursorPool::new(4);
/// {
///     let mut cursor = pool.borrow(b"[1, 2]");
///     assert!(cursor.read_array().unwrap());
/// }
/// assert_eq!(pool.idle_count(), 1);
/// ```
#[derive(Debug)]
pub struct CursorPool {
    idle: Mutex<Vec<Cursor>>,
    config: CursorConfig,
    max_idle: usize,
}

impl CursorPool {
    /// A pool keeping at most `max_idle` cursors around.
    pub fn new(max_idle: usize) -> Self {
        Self::with_config(max_idle, CursorConfig::default())
    }

    pub fn with_config(max_idle: usize, config: CursorConfig) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            config,
            max_idle,
        }
    }

    /// Take a cursor positioned at the start of `bytes`.
    pub fn borrow(&self, bytes: &[u8]) -> PooledCursor<'_> {
        let reused = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        let mut cursor = match reused {
            Some(cursor) => cursor,
            None => {
                trace!("pool empty, creating a cursor");
                Cursor::from_bytes_with_config(Vec::<u8>::new(), self.config)
            }
        };
        cursor.reset(bytes);
        PooledCursor { cursor, pool: self }
    }

    /// Number of cursors waiting to be reused.
    pub fn idle_count(&self) -> usize {
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn give_back(&self, mut cursor: Cursor) {
        cursor.reset(&[]);
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < self.max_idle {
            idle.push(cursor);
        }
    }
}

/// A cursor on loan from a [`CursorPool`].
#[derive(Debug)]
pub struct PooledCursor<'p> {
    cursor: Cursor,
    pool: &'p CursorPool,
}

impl Deref for PooledCursor<'_> {
    type Target = Cursor;

    fn deref(&self) -> &Cursor {
        &self.cursor
    }
}

impl DerefMut for PooledCursor<'_> {
    fn deref_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }
}

impl Drop for PooledCursor<'_> {
    fn drop(&mut self) {
        // An empty cursor holds no allocations
        let cursor = core::mem::take(&mut self.cursor);
        self.pool.give_back(cursor);
    }
}
