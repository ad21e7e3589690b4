//! Pooled Output Buffers
//!
//! Writers rent a `String` from a small thread-local pool and give it back
//! when dropped, so every exit path (including `?` returns and unwinding)
//! releases it. Growth is explicit: the buffer doubles whenever a write would
//! not fit, and formatting is retried after growing instead of failing.

use std::cell::RefCell;
use std::fmt;

use crate::delimited::StrFormatter;
use crate::error::{Error, Result};

/// Maximum number of idle buffers kept per thread
const MAX_POOLED: usize = 8;
/// Buffers that grew beyond this are freed instead of pooled
const MAX_RETAINED_CAPACITY: usize = 1 << 20;

thread_local! {
    static POOL: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Growable text buffer rented from the thread-local pool
#[derive(Debug)]
pub struct PooledBuffer {
    data: String,
}

impl PooledBuffer {
    /// Rent a buffer with at least `capacity` bytes of room
    pub fn rent(capacity: usize) -> Self {
        let pooled = POOL
            .try_with(|pool| {
                let mut pool = pool.borrow_mut();
                let idx = pool.iter().position(|b| b.capacity() >= capacity)?;
                Some(pool.swap_remove(idx))
            })
            .ok()
            .flatten();

        let data = match pooled {
            Some(mut data) => {
                data.clear();
                data
            }
            None => String::with_capacity(capacity.max(1)),
        };
        PooledBuffer { data }
    }

    /// Current capacity in bytes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Written content
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Number of bytes written
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if nothing was written yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Double the capacity
    fn grow(&mut self) {
        let additional = self.data.capacity().max(1);
        // reserve_exact works relative to len, not capacity
        self.data
            .reserve_exact(self.data.capacity() + additional - self.data.len());
    }

    /// Grow until `extra` more bytes fit
    #[inline]
    fn ensure(&mut self, extra: usize) {
        while self.data.len() + extra > self.data.capacity() {
            self.grow();
        }
    }

    /// Append raw text
    #[inline]
    pub fn put_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.ensure(s.len());
        self.data.push_str(s);
    }

    /// Append a single character
    #[inline]
    pub fn put_char(&mut self, c: char) {
        self.ensure(c.len_utf8());
        self.data.push(c);
    }

    /// Format `value` into the free tail, doubling and retrying on overflow
    pub fn put_formatted(
        &mut self,
        formatter: &dyn StrFormatter,
        value: &dyn fmt::Display,
    ) -> Result<()> {
        loop {
            let start = self.data.len();
            let mut tail = BoundedTail {
                buf: &mut self.data,
                overflowed: false,
            };
            let outcome = formatter.try_format(&mut tail, value);
            let overflowed = tail.overflowed;
            if outcome.is_ok() {
                return Ok(());
            }

            self.data.truncate(start);
            if !overflowed {
                return Err(Error::data_format("formatter returned an error"));
            }
            self.grow();
        }
    }

    /// Take the written content, leaving nothing to return to the pool
    pub fn into_string(mut self) -> String {
        std::mem::take(&mut self.data)
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        let data = std::mem::take(&mut self.data);
        if data.capacity() == 0 || data.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        // The pool may already be gone during thread teardown
        let _ = POOL.try_with(|pool| {
            let mut pool = pool.borrow_mut();
            if pool.len() < MAX_POOLED {
                pool.push(data);
            }
        });
    }
}

/// `fmt::Write` over the spare capacity of a buffer; refuses to reallocate
struct BoundedTail<'a> {
    buf: &'a mut String,
    overflowed: bool,
}

impl fmt::Write for BoundedTail<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.buf.len() + s.len() > self.buf.capacity() {
            self.overflowed = true;
            return Err(fmt::Error);
        }
        self.buf.push_str(s);
        Ok(())
    }
}
