//! Card set 1: resonance energies and partial widths. Header-less at the top of
//! a parameter file, or under `RESONANCE PARAMeters` in files written by SAMNDF.

use super::{CardModel, impl_instance_access, line_reader};
use crate::common::constants::{NARROW_GROUP_LIMIT, RESONANCE_VALUES_PER_LINE};
use crate::domain::{
    CardSet, DiagnosticContext, Param, ParseResult, RenderResult, SammyError, SammyErrorKind,
    SammyResult, VaryDomain,
};
use crate::field::{CardField, FieldSpec, LineReader, LineWriter, check_flag};

pub const RESONANCE_HEADER: &str = "RESONANCE PARAMeters";

/// Widths carried by the first line next to the energy.
const FIRST_LINE_WIDTHS: usize = RESONANCE_VALUES_PER_LINE - 1;

const VALUE_NAMES: [&str; RESONANCE_VALUES_PER_LINE] =
    ["EE", "GAMGAM", "GAMMA1", "GAMMA2", "GAMMA3"];
const VARY_NAMES: [&str; RESONANCE_VALUES_PER_LINE] =
    ["IFLAGE", "IFLAGG", "IFLAG1", "IFLAG2", "IFLAG3"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResonanceField {
    /// Value slot 0..5; slot 0 of the first line is the energy.
    Value(usize),
    Vary(usize),
    Group,
    Sentinel,
}

impl CardField for ResonanceField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Value(slot) => FieldSpec::real(VALUE_NAMES[slot], 1 + 11 * slot, 11 + 11 * slot),
            Self::Vary(slot) => FieldSpec::flag(
                VARY_NAMES[slot],
                56 + 2 * slot,
                57 + 2 * slot,
                VaryDomain::Basic,
            ),
            Self::Group => FieldSpec::integer("IGROUP", 66, 67),
            Self::Sentinel => FieldSpec::integer("X", 68, 80),
        }
    }
}

/// One resonance: energy, capture width, then one width per channel.
///
/// Entries with more than four widths continue onto extra lines, each holding
/// five widths and repeating the group number.
#[derive(Debug, Clone, PartialEq)]
pub struct ResonanceEntry {
    energy: Param,
    widths: Vec<Param>,
    group: u32,
}

impl ResonanceEntry {
    pub fn new(energy: Param, widths: Vec<Param>, group: u32) -> SammyResult<Self> {
        let mut entry = Self {
            energy: Param::default(),
            widths: Vec::with_capacity(widths.len()),
            group: 0,
        };
        entry.set_energy(energy)?;
        for width in widths {
            entry.push_width(width)?;
        }
        entry.set_group(group)?;
        Ok(entry)
    }

    pub const fn energy(&self) -> Param {
        self.energy
    }

    /// Capture width first, then channel widths.
    pub fn widths(&self) -> &[Param] {
        &self.widths
    }

    pub const fn group(&self) -> u32 {
        self.group
    }

    pub fn set_energy(&mut self, energy: Param) -> SammyResult<()> {
        check_vary(ResonanceField::Vary(0), energy)?;
        self.energy = energy;
        Ok(())
    }

    pub fn push_width(&mut self, width: Param) -> SammyResult<()> {
        check_vary(ResonanceField::Vary(1), width)?;
        self.widths.push(width);
        Ok(())
    }

    pub fn set_width(&mut self, index: usize, width: Param) -> SammyResult<()> {
        check_vary(ResonanceField::Vary(1), width)?;
        let count = self.widths.len();
        let slot = self.widths.get_mut(index).ok_or_else(|| {
            SammyError::validation(format!("width {index} does not exist (entry has {count})"))
        })?;
        *slot = width;
        Ok(())
    }

    pub fn set_group(&mut self, group: u32) -> SammyResult<()> {
        if group > NARROW_GROUP_LIMIT {
            return Err(SammyError::out_of_range(format!(
                "resonance group {group} does not fit in columns 66-67"
            )));
        }
        self.group = group;
        Ok(())
    }

    /// Number of card lines this entry occupies.
    pub fn line_count(&self) -> usize {
        let overflow = self.widths.len().saturating_sub(FIRST_LINE_WIDTHS);
        1 + overflow.div_ceil(RESONANCE_VALUES_PER_LINE)
    }

    fn render(&self, context: &DiagnosticContext, first_line: usize) -> RenderResult<Vec<String>> {
        let line_count = self.line_count();
        let mut lines = Vec::with_capacity(line_count);
        let mut widths = self.widths.iter();

        for line_index in 0..line_count {
            let mut writer = LineWriter::new(context.at_output_line(first_line + line_index));
            let mut slot = 0;
            if line_index == 0 {
                writer.param(ResonanceField::Value(0), ResonanceField::Vary(0), self.energy)?;
                slot = 1;
            }
            for (slot, width) in (slot..RESONANCE_VALUES_PER_LINE).zip(widths.by_ref()) {
                writer.param(ResonanceField::Value(slot), ResonanceField::Vary(slot), *width)?;
            }
            writer.integer(ResonanceField::Group, i64::from(self.group))?;
            if line_index + 1 < line_count {
                writer.integer(ResonanceField::Sentinel, -1)?;
            }
            lines.push(writer.finish());
        }

        Ok(lines)
    }

    /// Parse one entry at `lines[cursor]`; returns it and the lines consumed.
    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        let first = line_reader(lines, cursor, context)?;
        let energy = first.param(ResonanceField::Value(0), ResonanceField::Vary(0))?;
        let group = first.unsigned(ResonanceField::Group, 0)?;
        let mut slots: Vec<Option<Param>> = Vec::new();
        read_slots(&first, 1, &mut slots)?;
        let mut continues = first.integer(ResonanceField::Sentinel, 0)? < 0;
        let mut consumed = 1;

        while continues {
            let index = cursor + consumed;
            if index >= lines.len() {
                return Err(first.error(
                    SammyErrorKind::MalformedField,
                    "negative continuation sentinel but no continuation line follows",
                ));
            }
            let reader = line_reader(lines, index, context)?;
            let line_group = reader.unsigned(ResonanceField::Group, 0)?;
            if line_group != group {
                return Err(reader.error(
                    SammyErrorKind::InconsistentRepeatingGroup,
                    format!("continuation line has group {line_group}, entry started with group {group}"),
                ));
            }
            read_slots(&reader, 0, &mut slots)?;
            continues = reader.integer(ResonanceField::Sentinel, 0)? < 0;
            consumed += 1;
        }

        // Trailing blanks end the entry; blanks ahead of a filled slot are zero.
        while matches!(slots.last(), Some(None)) {
            slots.pop();
        }
        let widths = slots
            .into_iter()
            .map(|slot| slot.unwrap_or_default())
            .collect();

        let entry = Self::new(energy, widths, group)
            .map_err(|error| first.error(error.kind(), error.message().to_string()))?;
        Ok((entry, consumed))
    }
}

fn read_slots(
    reader: &LineReader<'_>,
    first_slot: usize,
    slots: &mut Vec<Option<Param>>,
) -> ParseResult<()> {
    for slot in first_slot..RESONANCE_VALUES_PER_LINE {
        let value = reader.optional_real(ResonanceField::Value(slot))?;
        let vary = reader.flag(ResonanceField::Vary(slot))?;
        slots.push(value.map(|value| Param::new(value, vary)));
    }
    Ok(())
}

fn check_vary(field: ResonanceField, param: Param) -> SammyResult<()> {
    check_flag(field, param.vary)
        .map(|_| ())
        .map_err(|error| SammyError::new(error.kind(), error.to_string()))
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResonanceCard {
    /// Written under `RESONANCE PARAMeters` instead of bare.
    pub headed: bool,
    pub entries: Vec<ResonanceEntry>,
}

impl ResonanceCard {
    pub fn new(entries: Vec<ResonanceEntry>) -> Self {
        Self {
            headed: false,
            entries,
        }
    }

    pub fn max_group(&self) -> u32 {
        self.entries.iter().map(ResonanceEntry::group).max().unwrap_or(0)
    }
}

impl CardModel for ResonanceCard {
    const CARD_SET: CardSet = CardSet::Resonances;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        let mut entries = Vec::new();
        let mut index = cursor;
        while index < lines.len() {
            let (entry, consumed) = ResonanceEntry::parse(lines, index, context)?;
            entries.push(entry);
            index += consumed;
        }
        Ok((Self::new(entries), index - cursor))
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        let mut lines = Vec::new();
        for entry in &self.entries {
            let rendered = entry.render(context, lines.len() + 1)?;
            lines.extend(rendered);
        }
        Ok(lines)
    }

    fn header(&self) -> Option<&'static str> {
        self.headed.then_some(RESONANCE_HEADER)
    }

    impl_instance_access!(Resonances);
}
