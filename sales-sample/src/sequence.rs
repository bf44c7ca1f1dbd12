use std::ops::Range;

use crate::error::GenError;

/// Hands out management numbers for one source system.
///
/// Numbers start at 1 by default, only ever move forward and are never handed out twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceCounter {
    prefix: char,
    next: u64,
}

/// A contiguous run of sequence values reserved by [`SequenceCounter::take`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceBlock {
    prefix: char,
    range: Range<u64>,
}

impl SequenceCounter {
    #[must_use]
    pub fn new(prefix: char) -> Self {
        SequenceCounter { prefix, next: 1 }
    }

    /// # Errors
    /// Errors when `start` is 0
    pub fn starting_at(prefix: char, start: u64) -> Result<Self, GenError> {
        if start == 0 {
            return Err(GenError::InvalidSequenceStart);
        }
        Ok(SequenceCounter { prefix, next: start })
    }

    /// The value the next call to [`take`](Self::take) starts from.
    #[must_use]
    pub fn peek(&self) -> u64 {
        self.next
    }

    #[must_use]
    pub fn prefix(&self) -> char {
        self.prefix
    }

    /// Reserves the next `n` values and advances past them.
    ///
    /// # Errors
    /// Errors when the block would run past `u64::MAX`; the counter is left as it was
    pub fn take(&mut self, n: usize) -> Result<SequenceBlock, GenError> {
        let start = self.next;
        let end = u64::try_from(n)
            .ok()
            .and_then(|n| start.checked_add(n))
            .ok_or(GenError::SequenceOverflow { start, count: n })?;
        self.next = end;
        Ok(SequenceBlock {
            prefix: self.prefix,
            range: start..end,
        })
    }

    #[must_use]
    pub fn format(&self, value: u64) -> String {
        format_mgmt_no(self.prefix, value)
    }
}

impl SequenceBlock {
    #[must_use]
    pub fn first(&self) -> u64 {
        self.range.start
    }

    /// One past the last value in the block
    #[must_use]
    pub fn end(&self) -> u64 {
        self.range.end
    }

    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.range.end - self.range.start).unwrap_or(usize::MAX)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Formatted management numbers in ascending order.
    pub fn numbers(&self) -> impl Iterator<Item = String> + '_ {
        self.range.clone().map(|v| format_mgmt_no(self.prefix, v))
    }
}

/// `prefix` followed by `value` zero padded to five digits. Wider values are not truncated.
#[must_use]
pub fn format_mgmt_no(prefix: char, value: u64) -> String {
    format!("{prefix}{value:05}")
}
