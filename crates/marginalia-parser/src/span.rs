//! Byte-offset spans into diagram source text.

use std::ops::Range;

/// A half-open byte range `start..end` into the source of a single diagram block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a byte range.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Create a union of two spans (encompassing both)
    pub fn union(&self, other: Span) -> Span {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns the span moved `offset` bytes to the right.
    pub fn shift(&self, offset: usize) -> Span {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

/// A value paired with the span it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    value: T,
    span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn inner(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    /// Transform the value while keeping the span.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spanned<U> {
        Spanned {
            value: f(self.value),
            span: self.span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len_and_empty() {
        let span = Span::new(3..8);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::new(4..4).is_empty());
    }

    #[test]
    fn test_span_never_inverted() {
        let span = Span::new(9..2);
        assert_eq!(span.start(), 9);
        assert!(span.is_empty());
    }

    #[test]
    fn test_span_union_and_shift() {
        let union = Span::new(2..4).union(Span::new(10..12));
        assert_eq!(union, Span::new(2..12));
        assert_eq!(union.shift(5), Span::new(7..17));
    }

    #[test]
    fn test_spanned_map_keeps_span() {
        let spanned = Spanned::new("A", Span::new(0..1)).map(|s| s.to_lowercase());
        assert_eq!(spanned.inner(), "a");
        assert_eq!(spanned.span(), Span::new(0..1));
    }
}
