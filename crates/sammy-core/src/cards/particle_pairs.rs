//! Particle-pair definitions: input card 4, also found at the top of parameter
//! files produced by SAMNDF.

use super::radius::{keyword_integer, keyword_real};
use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::common::constants::LINE_WIDTH;
use crate::domain::{
    CardSet, DiagnosticContext, ParseResult, RenderResult, SammyError, SammyErrorKind,
    SammyResult,
};
use crate::field::{CardField, FieldSpec, LineReader, LineWriter, format_free_real};

pub const PARTICLE_PAIR_HEADER: &str = "PARTICLE PAIR DEFinitions";

/// Spin-group channels quote the pair name in eight columns.
pub(crate) const NAME_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParticlePairLayout {
    /// `Name=`, `Particle a=`, `Za=` ... lines, several per pair.
    #[default]
    Keyword,
    /// One fixed-column line per pair.
    Fixed,
}

impl ParticlePairLayout {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Fixed => "fixed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticlePairField {
    Name,
    ParticleA,
    ParticleB,
    ChargeA,
    ChargeB,
    Penetrability,
    Shift,
    SpinA,
    SpinB,
    MassA,
    MassB,
    QValue,
    EffectiveRadius,
    TrueRadius,
}

impl CardField for ParticlePairField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Name => FieldSpec::alpha("NAME", 1, 8),
            Self::ParticleA => FieldSpec::alpha("PA", 9, 10),
            Self::ParticleB => FieldSpec::alpha("PB", 11, 12),
            Self::ChargeA => FieldSpec::integer("ZA", 13, 15),
            Self::ChargeB => FieldSpec::integer("ZB", 16, 18),
            Self::Penetrability => FieldSpec::integer("PENT", 19, 19),
            Self::Shift => FieldSpec::integer("SHIFT", 20, 20),
            Self::SpinA => FieldSpec::real("SA", 21, 25),
            Self::SpinB => FieldSpec::real("SB", 26, 30),
            Self::MassA => FieldSpec::real("MA", 31, 40),
            Self::MassB => FieldSpec::real("MB", 41, 50),
            Self::QValue => FieldSpec::real("Q", 51, 60),
            Self::EffectiveRadius => FieldSpec::real("RE", 61, 70),
            Self::TrueRadius => FieldSpec::real("RT", 71, 80),
        }
    }
}

/// Keys of the keyword layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairKey {
    Name,
    ParticleA,
    ParticleB,
    ChargeA,
    ChargeB,
    Penetrability,
    Shift,
    SpinA,
    SpinB,
    MassA,
    MassB,
    QValue,
    Threshold,
}

impl PairKey {
    /// Case, blanks, `_` and `-` are ignored: `Charge_A`, `charge a` and `ZA`
    /// are one key.
    fn from_text(text: &str) -> Option<Self> {
        let words: Vec<String> = text
            .split(|cell: char| cell.is_whitespace() || matches!(cell, '_' | '-'))
            .filter(|word| !word.is_empty())
            .map(str::to_ascii_uppercase)
            .collect();
        let key = match words.join(" ").as_str() {
            "NAME" => Self::Name,
            "PARTICLE A" | "PA" => Self::ParticleA,
            "PARTICLE B" | "PB" => Self::ParticleB,
            "CHARGE A" | "ZA" => Self::ChargeA,
            "CHARGE B" | "ZB" => Self::ChargeB,
            "PENETRABILITY" | "PENETRABILITIES" | "PENT" => Self::Penetrability,
            "SHIFT" => Self::Shift,
            "SPIN A" | "SA" => Self::SpinA,
            "SPIN B" | "SB" => Self::SpinB,
            "MASS A" | "MA" => Self::MassA,
            "MASS B" | "MB" => Self::MassB,
            "Q" | "Q VALUE" | "QVALUE" | "Q VAL" | "QVAL" | "Q V" => Self::QValue,
            "THRESHOLD" => Self::Threshold,
            _ => return None,
        };
        Some(key)
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::ParticleA => "Particle a",
            Self::ParticleB => "Particle b",
            Self::ChargeA => "Za",
            Self::ChargeB => "Zb",
            Self::Penetrability => "Pent",
            Self::Shift => "Shift",
            Self::SpinA => "Sa",
            Self::SpinB => "Sb",
            Self::MassA => "Ma",
            Self::MassB => "Mb",
            Self::QValue => "Q",
            Self::Threshold => "Threshold",
        }
    }
}

/// Two interacting particles that open a reaction channel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticlePair {
    pub name: String,
    pub particle_a: String,
    pub particle_b: String,
    pub charge_a: u32,
    pub charge_b: u32,
    /// Compute penetrabilities for channels of this pair.
    pub penetrability: bool,
    /// Compute shift factors for channels of this pair.
    pub shift: bool,
    pub spin_a: f64,
    pub spin_b: f64,
    /// Atomic mass units.
    pub mass_a: f64,
    pub mass_b: f64,
    pub q_value: Option<f64>,
    /// Keyword layout only.
    pub threshold: Option<f64>,
    /// Fixed layout only.
    pub effective_radius: Option<f64>,
    /// Fixed layout only.
    pub true_radius: Option<f64>,
}

impl ParticlePair {
    pub fn new(
        name: impl Into<String>,
        particle_a: impl Into<String>,
        particle_b: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            particle_a: particle_a.into(),
            particle_b: particle_b.into(),
            ..Self::default()
        }
    }

    fn apply(&mut self, key: PairKey, value: &str, reader: &LineReader<'_>) -> SammyResult<()> {
        let label = key.label();
        match key {
            PairKey::Name => self.name = value.to_string(),
            PairKey::ParticleA => self.particle_a = value.to_string(),
            PairKey::ParticleB => self.particle_b = value.to_string(),
            PairKey::ChargeA => self.charge_a = keyword_charge(reader, label, value)?,
            PairKey::ChargeB => self.charge_b = keyword_charge(reader, label, value)?,
            PairKey::Penetrability => self.penetrability = keyword_switch(reader, label, value)?,
            PairKey::Shift => self.shift = keyword_switch(reader, label, value)?,
            PairKey::SpinA => self.spin_a = keyword_real(reader, label, value)?,
            PairKey::SpinB => self.spin_b = keyword_real(reader, label, value)?,
            PairKey::MassA => self.mass_a = keyword_real(reader, label, value)?,
            PairKey::MassB => self.mass_b = keyword_real(reader, label, value)?,
            PairKey::QValue => self.q_value = Some(keyword_real(reader, label, value)?),
            PairKey::Threshold => self.threshold = Some(keyword_real(reader, label, value)?),
        }
        Ok(())
    }

    fn parse_fixed(reader: &LineReader<'_>) -> SammyResult<Self> {
        use ParticlePairField as Field;
        Ok(Self {
            name: reader.keyword(Field::Name),
            particle_a: reader.keyword(Field::ParticleA),
            particle_b: reader.keyword(Field::ParticleB),
            charge_a: reader.unsigned(Field::ChargeA, 0)?,
            charge_b: reader.unsigned(Field::ChargeB, 0)?,
            penetrability: fixed_switch(reader, Field::Penetrability)?,
            shift: fixed_switch(reader, Field::Shift)?,
            spin_a: reader.real(Field::SpinA)?,
            spin_b: reader.real(Field::SpinB)?,
            mass_a: reader.real(Field::MassA)?,
            mass_b: reader.real(Field::MassB)?,
            q_value: reader.optional_real(Field::QValue)?,
            threshold: None,
            effective_radius: reader.optional_real(Field::EffectiveRadius)?,
            true_radius: reader.optional_real(Field::TrueRadius)?,
        })
    }

    fn render_fixed(&self, context: DiagnosticContext) -> RenderResult<String> {
        use ParticlePairField as Field;
        let mut writer = LineWriter::new(context);
        writer.alpha(Field::Name, &self.name);
        writer.alpha(Field::ParticleA, &self.particle_a);
        writer.alpha(Field::ParticleB, &self.particle_b);
        writer.integer(Field::ChargeA, i64::from(self.charge_a))?;
        writer.integer(Field::ChargeB, i64::from(self.charge_b))?;
        writer.integer(Field::Penetrability, i64::from(self.penetrability))?;
        writer.integer(Field::Shift, i64::from(self.shift))?;
        writer.real(Field::SpinA, self.spin_a)?;
        writer.real(Field::SpinB, self.spin_b)?;
        writer.real(Field::MassA, self.mass_a)?;
        writer.real(Field::MassB, self.mass_b)?;
        writer.optional_real(Field::QValue, self.q_value)?;
        writer.optional_real(Field::EffectiveRadius, self.effective_radius)?;
        writer.optional_real(Field::TrueRadius, self.true_radius)?;
        Ok(writer.finish())
    }

    fn render_keyword(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "Name={:<13}Particle a={:<13}Particle b={}",
                self.name, self.particle_a, self.particle_b
            ),
            format!(
                "     Za={:<4}      Zb={:<4}      Pent={}     Shift={}",
                self.charge_a,
                self.charge_b,
                u8::from(self.penetrability),
                u8::from(self.shift)
            ),
            format!(
                "     Sa={:<8}  Sb={}",
                format_free_real(self.spin_a),
                format_free_real(self.spin_b)
            ),
            format!(
                "     Ma={:<20}  Mb={}",
                format_free_real(self.mass_a),
                format_free_real(self.mass_b)
            ),
        ];
        let extras: Vec<String> = [("Q", self.q_value), ("Threshold", self.threshold)]
            .into_iter()
            .filter_map(|(key, value)| {
                value.map(|value| format!("{key}={}", format_free_real(value)))
            })
            .collect();
        if !extras.is_empty() {
            lines.push(format!("     {}", extras.join("     ")));
        }
        lines
    }
}

fn keyword_charge(reader: &LineReader<'_>, key: &str, text: &str) -> SammyResult<u32> {
    let charge = keyword_integer(reader, key, text)?;
    u32::try_from(charge).map_err(|_| {
        reader.error(
            SammyErrorKind::OutOfRange,
            format!("{key}= charge {charge} is negative"),
        )
    })
}

fn keyword_switch(reader: &LineReader<'_>, key: &str, text: &str) -> SammyResult<bool> {
    match text.to_ascii_uppercase().as_str() {
        "1" | "YES" | "Y" | "TRUE" => Ok(true),
        "0" | "NO" | "N" | "FALSE" => Ok(false),
        _ => Err(reader.error(
            SammyErrorKind::MalformedField,
            format!("{key}= expects 0, 1, YES or NO, found '{text}'"),
        )),
    }
}

fn fixed_switch(reader: &LineReader<'_>, field: ParticlePairField) -> SammyResult<bool> {
    match reader.integer(field, 0)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(reader.error(
            SammyErrorKind::MalformedField,
            format!("{} must be 0 or 1, found {other}", field.spec().name),
        )),
    }
}

/// Byte offset where the last blank-separated word of `text` starts.
fn word_start(text: &str) -> usize {
    text.char_indices()
        .rev()
        .find(|(_, cell)| cell.is_whitespace())
        .map_or(0, |(at, cell)| at + cell.len_utf8())
}

/// Split the text ahead of an `=` into the value of the previous key and the
/// key itself. Two-word keys (`Particle a`) win when the last word alone is
/// not a key.
fn split_key(region: &str) -> (&str, &str) {
    let trimmed = region.trim_end();
    let last = word_start(trimmed);
    let head = trimmed[..last].trim_end();
    if !head.is_empty() && PairKey::from_text(&trimmed[last..]).is_none() {
        let first = word_start(head);
        if PairKey::from_text(&trimmed[first..]).is_some() {
            return (&trimmed[..first], &trimmed[first..]);
        }
    }
    (&trimmed[..last], &trimmed[last..])
}

/// `(key, value)` pairs of one keyword line. A value runs up to the key of
/// the next pair, so names may contain blanks (`Name=Inc Chan`).
fn key_values(reader: &LineReader<'_>) -> SammyResult<Vec<(PairKey, String)>> {
    let mut pairs: Vec<(PairKey, String)> = Vec::new();
    let mut segments = reader.raw().split('=');
    let mut region = segments.next().unwrap_or_default();

    for segment in segments {
        let (value, key_text) = split_key(region);
        let key = PairKey::from_text(key_text).ok_or_else(|| {
            reader.error(
                SammyErrorKind::MalformedField,
                format!("unknown particle-pair key '{}'", key_text.trim()),
            )
        })?;
        match pairs.last_mut() {
            Some((_, previous)) => *previous = value.trim().to_string(),
            None if !value.trim().is_empty() => {
                return Err(reader.error(
                    SammyErrorKind::MalformedField,
                    format!("'{}' precedes the first particle-pair key", value.trim()),
                ));
            }
            None => {}
        }
        pairs.push((key, String::new()));
        region = segment;
    }

    match pairs.last_mut() {
        Some((_, last)) => *last = region.trim().to_string(),
        None => {
            return Err(reader.error(
                SammyErrorKind::MalformedField,
                "particle-pair line holds no Key= value pairs",
            ));
        }
    }
    Ok(pairs)
}

/// A pair being read, with the keys seen so far and the line of its `Name=`.
struct Draft {
    pair: ParticlePair,
    seen: Vec<PairKey>,
    context: DiagnosticContext,
}

fn parse_keyword(
    lines: &[&str],
    cursor: usize,
    context: &DiagnosticContext,
) -> ParseResult<Vec<ParticlePair>> {
    let mut drafts: Vec<Draft> = Vec::new();

    for index in cursor..lines.len() {
        let reader = line_reader(lines, index, context)?;
        for (key, value) in key_values(&reader)? {
            if value.is_empty() {
                return Err(reader.error(
                    SammyErrorKind::MalformedField,
                    format!("{}= has no value", key.label()),
                ));
            }
            if key == PairKey::Name {
                drafts.push(Draft {
                    pair: ParticlePair {
                        name: value,
                        ..ParticlePair::default()
                    },
                    seen: vec![key],
                    context: reader.context().clone(),
                });
                continue;
            }

            let Some(draft) = drafts.last_mut() else {
                return Err(reader.error(
                    SammyErrorKind::MalformedField,
                    "particle-pair data must start with Name=",
                ));
            };
            if draft.seen.contains(&key) {
                return Err(reader.error(
                    SammyErrorKind::MalformedField,
                    format!("{}= appears twice for pair {}", key.label(), draft.pair.name),
                ));
            }
            draft.seen.push(key);
            draft.pair.apply(key, &value, &reader)?;
        }
    }

    drafts
        .into_iter()
        .map(|draft| {
            let missing = [PairKey::ParticleA, PairKey::ParticleB]
                .into_iter()
                .find(|key| !draft.seen.contains(key));
            match missing {
                Some(key) => Err(draft.context.error(
                    SammyErrorKind::MalformedField,
                    format!("particle pair {} has no {}= value", draft.pair.name, key.label()),
                )),
                None => Ok(draft.pair),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticlePairCard {
    pub layout: ParticlePairLayout,
    pub pairs: Vec<ParticlePair>,
}

impl ParticlePairCard {
    pub fn new(layout: ParticlePairLayout, pairs: Vec<ParticlePair>) -> Self {
        Self { layout, pairs }
    }

    pub fn find(&self, name: &str) -> Option<&ParticlePair> {
        self.pairs.iter().find(|pair| pair.name == name)
    }

    pub fn parse_layout(
        layout: ParticlePairLayout,
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }

        let pairs = match layout {
            ParticlePairLayout::Keyword => parse_keyword(lines, cursor, context)?,
            ParticlePairLayout::Fixed => (cursor..lines.len())
                .map(|index| ParticlePair::parse_fixed(&line_reader(lines, index, context)?))
                .collect::<SammyResult<Vec<_>>>()?,
        };
        Ok((Self { layout, pairs }, lines.len() - cursor))
    }
}

impl CardModel for ParticlePairCard {
    const CARD_SET: CardSet = CardSet::ParticlePairs;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        let body = &lines[cursor.min(lines.len())..];
        let layout = crate::dispatch::sniff::particle_pair_layout(body);
        Self::parse_layout(layout, lines, cursor, context)
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        self.validate()?;
        let mut lines = Vec::new();
        for pair in &self.pairs {
            match self.layout {
                ParticlePairLayout::Fixed => {
                    let line_context = context.at_output_line(lines.len() + 1);
                    lines.push(pair.render_fixed(line_context)?);
                }
                ParticlePairLayout::Keyword => {
                    for line in pair.render_keyword() {
                        if line.chars().count() > LINE_WIDTH {
                            return Err(context.at_output_line(lines.len() + 1).error(
                                SammyErrorKind::OutOfRange,
                                format!(
                                    "particle pair {} needs more than {LINE_WIDTH} columns",
                                    pair.name
                                ),
                            ));
                        }
                        lines.push(line);
                    }
                }
            }
        }
        Ok(lines)
    }

    fn header(&self) -> Option<&'static str> {
        Some(PARTICLE_PAIR_HEADER)
    }

    fn validate(&self) -> SammyResult<()> {
        let particle_width = match self.layout {
            ParticlePairLayout::Keyword => NAME_WIDTH,
            ParticlePairLayout::Fixed => ParticlePairField::ParticleA.spec().width(),
        };

        for (index, pair) in self.pairs.iter().enumerate() {
            let name = pair.name.as_str();
            if name.trim().is_empty() || name.chars().count() > NAME_WIDTH || name.contains('=') {
                return Err(SammyError::validation(format!(
                    "particle-pair name '{name}' must be 1 to {NAME_WIDTH} characters without '='"
                )));
            }
            if self.pairs[..index].iter().any(|earlier| earlier.name == pair.name) {
                return Err(SammyError::validation(format!(
                    "particle pair {name} is defined twice"
                )));
            }
            for particle in [&pair.particle_a, &pair.particle_b] {
                if particle.trim().is_empty()
                    || particle.chars().count() > particle_width
                    || particle.contains('=')
                {
                    return Err(SammyError::validation(format!(
                        "particle '{particle}' of pair {name} must be 1 to {particle_width} \
                         characters without '=' in the {} layout",
                        self.layout.as_str()
                    )));
                }
            }

            let misplaced = match self.layout {
                ParticlePairLayout::Keyword => {
                    (pair.effective_radius.is_some() || pair.true_radius.is_some())
                        .then_some("channel radii")
                }
                ParticlePairLayout::Fixed => pair.threshold.is_some().then_some("a threshold"),
            };
            if let Some(what) = misplaced {
                return Err(SammyError::validation(format!(
                    "particle pair {name} carries {what}, which the {} layout cannot hold",
                    self.layout.as_str()
                )));
            }
        }
        Ok(())
    }

    impl_instance_access!(ParticlePairs);
}
