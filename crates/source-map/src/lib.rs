//! Source positions for vue2liquid.
//!
//! Template nodes carry byte spans relative to the template block. The
//! converter shifts them into file coordinates so that failures can be
//! reported as `line:column` against the original component file.

use std::ops::Range;

/// A half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// An empty span at `offset`.
    #[inline]
    pub const fn empty(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Move the span forward by `offset` bytes.
    ///
    /// Used to turn a template-relative span into a file-relative one.
    #[inline]
    pub const fn shift(self, offset: u32) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    /// Slice `source` with this span, clamped to the source length.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        let end = (self.end as usize).min(source.len());
        let start = (self.start as usize).min(end);
        source.get(start..end).unwrap_or_default()
    }

    #[inline]
    pub fn to_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start as u32, range.end as u32)
    }
}

/// A 1-based line and column, ready for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte offset → line/column lookup table for one file.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                text.match_indices('\n')
                    .map(|(i, _)| (i + 1) as u32),
            )
            .collect();
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Location of `offset`, 1-based. Columns count bytes.
    pub fn locate(&self, offset: u32) -> Location {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        Location {
            line: line as u32 + 1,
            column: offset - self.line_starts[line] + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_span_shift_and_slice() {
        let source = "<template><div/></template>";
        let span = Span::new(0, 6).shift(10);
        assert_eq!(span, Span::new(10, 16));
        assert_eq!(span.slice(source), "<div/>");
        assert_eq!(Span::new(20, 99).slice(source), "mplate>");
    }

    #[test]
    fn test_span_len() {
        assert_eq!(Span::new(10, 30).len(), 20);
        assert!(Span::empty(4).is_empty());
    }

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("hello\nworld\nfoo");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.locate(0), Location { line: 1, column: 1 });
        assert_eq!(index.locate(5), Location { line: 1, column: 6 });
        assert_eq!(index.locate(6), Location { line: 2, column: 1 });
        assert_eq!(index.locate(12).to_string(), "3:1");
    }
}
