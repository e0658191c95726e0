//! Integer lists that spill onto continuation lines behind a `-1` marker.

use super::line::{LineReader, LineWriter};
use super::{Columns, FieldSpec};
use crate::domain::{DiagnosticContext, SammyErrorKind, SammyResult};

/// Layout of a list of fixed-width integers such as spin-group numbers.
///
/// The first line holds items from `first_start` up to `end`; each
/// continuation line holds items from `continuation_start` up to `end`. A
/// negative value in `marker` announces another continuation line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerListLayout {
    pub name: &'static str,
    pub item_width: usize,
    pub first_start: usize,
    pub continuation_start: usize,
    pub end: usize,
    pub marker: Columns,
}

impl IntegerListLayout {
    pub const fn capacity(&self, continuation: bool) -> usize {
        let start = if continuation {
            self.continuation_start
        } else {
            self.first_start
        };
        (self.end + 1 - start) / self.item_width
    }

    /// Largest value one item can hold.
    pub const fn max_item(&self) -> u32 {
        let mut limit: u32 = 9;
        let mut digits = 1;
        while digits < self.item_width {
            limit = limit * 10 + 9;
            digits += 1;
        }
        limit
    }

    fn item(&self, start: usize, index: usize) -> FieldSpec {
        let first = start + index * self.item_width;
        FieldSpec::integer(self.name, first, first + self.item_width - 1)
    }

    fn marker_spec(&self) -> FieldSpec {
        FieldSpec::integer("continuation marker", self.marker.first(), self.marker.last())
    }

    /// Write `items` starting on `first`, returning the finished lines.
    ///
    /// `continuation_context` supplies the context for each extra line given
    /// its 0-based index among the continuation lines.
    pub fn write(
        &self,
        first: LineWriter,
        items: &[u32],
        continuation_context: impl Fn(usize) -> DiagnosticContext,
    ) -> SammyResult<Vec<String>> {
        let mut lines = Vec::new();
        let mut writer = first;
        let mut start = self.first_start;
        let mut capacity = self.capacity(false);
        let mut remaining = items;

        loop {
            let (chunk, rest) = remaining.split_at(remaining.len().min(capacity));
            for (index, item) in chunk.iter().enumerate() {
                writer.integer(self.item(start, index), i64::from(*item))?;
            }
            remaining = rest;
            if remaining.is_empty() {
                lines.push(writer.finish());
                return Ok(lines);
            }

            writer.integer(self.marker_spec(), -1)?;
            lines.push(writer.finish());
            writer = LineWriter::new(continuation_context(lines.len() - 1));
            start = self.continuation_start;
            capacity = self.capacity(true);
        }
    }

    /// Read a list that begins on `first`, consuming continuation lines from
    /// `following`. Returns the items and the number of following lines used.
    pub fn read(
        &self,
        first: &LineReader<'_>,
        following: &[&str],
        continuation_context: impl Fn(usize, &str) -> DiagnosticContext,
    ) -> SammyResult<(Vec<u32>, usize)> {
        let mut items = Vec::new();
        let mut continues = self.read_line(first, self.first_start, &mut items)?;
        let mut consumed = 0;

        while continues {
            let Some(raw) = following.get(consumed) else {
                return Err(first.error(
                    SammyErrorKind::MalformedField,
                    format!("{} list announces a continuation line that is missing", self.name),
                ));
            };
            let reader = LineReader::new(raw, continuation_context(consumed, raw))?;
            consumed += 1;
            continues = self.read_line(&reader, self.continuation_start, &mut items)?;
        }

        Ok((items, consumed))
    }

    fn read_line(
        &self,
        reader: &LineReader<'_>,
        start: usize,
        items: &mut Vec<u32>,
    ) -> SammyResult<bool> {
        let capacity = (self.end + 1 - start) / self.item_width;
        for index in 0..capacity {
            let spec = self.item(start, index);
            if reader.is_blank(spec.columns) {
                break;
            }
            items.push(reader.unsigned(spec, 0)?);
        }
        Ok(reader.integer(self.marker_spec(), 0)? < 0)
    }
}

#[cfg(test)]
mod tests {
    use super::IntegerListLayout;
    use crate::domain::{DiagnosticContext, SammyErrorKind};
    use crate::field::{Columns, LineReader, LineWriter};

    const NARROW: IntegerListLayout = IntegerListLayout {
        name: "spin group",
        item_width: 2,
        first_start: 33,
        continuation_start: 1,
        end: 78,
        marker: Columns::new(79, 80),
    };

    fn context(_: usize) -> DiagnosticContext {
        DiagnosticContext::new()
    }

    #[test]
    fn capacity_and_item_limit_follow_widths() {
        assert_eq!(NARROW.capacity(false), 23);
        assert_eq!(NARROW.capacity(true), 39);
        assert_eq!(NARROW.max_item(), 99);
    }

    #[test]
    fn short_list_stays_on_first_line() {
        let lines = NARROW
            .write(LineWriter::new(DiagnosticContext::new()), &[1, 2, 12], context)
            .expect("list should render");
        assert_eq!(lines.len(), 1);
        assert_eq!(&lines[0][32..], " 1 212");
    }

    #[test]
    fn long_list_spills_with_marker_and_reads_back() {
        let items: Vec<u32> = (1..=30).collect();
        let lines = NARROW
            .write(LineWriter::new(DiagnosticContext::new()), &items, context)
            .expect("list should render");
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("-1"));
        assert!(!lines[1].ends_with("-1"));

        let first = LineReader::new(&lines[0], DiagnosticContext::new()).unwrap();
        let following: Vec<&str> = lines[1..].iter().map(String::as_str).collect();
        let (parsed, consumed) = NARROW
            .read(&first, &following, |_, _| DiagnosticContext::new())
            .expect("list should parse");
        assert_eq!(parsed, items);
        assert_eq!(consumed, 1);
    }

    #[test]
    fn missing_continuation_line_is_malformed() {
        let mut writer = LineWriter::new(DiagnosticContext::new());
        writer.put(Columns::new(33, 34), " 1");
        writer.put(Columns::new(79, 80), "-1");
        let line = writer.finish();
        let first = LineReader::new(&line, DiagnosticContext::new()).unwrap();

        let error = NARROW
            .read(&first, &[], |_, _| DiagnosticContext::new())
            .expect_err("continuation is missing");
        assert_eq!(error.kind(), SammyErrorKind::MalformedField);
    }
}
