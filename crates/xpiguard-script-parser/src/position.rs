use swc_core::common::BytePos;
use xpiguard_domain::script::Span;

/// Byte position of the first source byte. `BytePos(0)` is swc's dummy position.
pub(crate) const BASE: u32 = 1;

/// Maps swc byte positions to 1-based line and character columns.
pub(crate) struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        let mut chars = source.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            match c {
                '\r' => {
                    if chars.next_if(|&(_, next)| next == '\n').is_some() {
                        line_starts.push(i + 2);
                    } else {
                        line_starts.push(i + 1);
                    }
                }
                '\n' | '\u{2028}' | '\u{2029}' => line_starts.push(i + c.len_utf8()),
                _ => {}
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    pub(crate) fn position(&self, pos: BytePos) -> Span {
        let offset = (pos.0.saturating_sub(BASE) as usize).min(self.source.len());
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let start = self
            .line_starts
            .get(line.saturating_sub(1))
            .copied()
            .unwrap_or(0);
        let column = self
            .source
            .get(start..offset)
            .map_or(0, |prefix| prefix.chars().count());
        Span::new(line as u32, column as u32 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(index: &LineIndex<'_>, offset: u32) -> (u32, u32) {
        let span = index.position(BytePos(BASE + offset));
        (span.line, span.column)
    }

    #[test]
    fn every_line_terminator_starts_a_line() {
        let index = LineIndex::new("a\nb\r\nc\rd\u{2028}e");
        assert_eq!(at(&index, 0), (1, 1));
        assert_eq!(at(&index, 2), (2, 1));
        assert_eq!(at(&index, 5), (3, 1));
        assert_eq!(at(&index, 7), (4, 1));
        assert_eq!(at(&index, 11), (5, 1));
    }

    #[test]
    fn columns_count_characters() {
        let index = LineIndex::new("var é = mozIndexedDB;");
        // "é" is two bytes wide.
        assert_eq!(at(&index, 9), (1, 9));
    }

    #[test]
    fn out_of_range_positions_clamp() {
        let index = LineIndex::new("ab");
        assert_eq!(index.position(BytePos(0)), Span::new(1, 1));
        assert_eq!(at(&index, 99), (1, 3));
    }
}
