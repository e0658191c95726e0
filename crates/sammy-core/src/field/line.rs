//! Column-addressed access to a single card image.

use super::codec::{
    parse_alphanumeric, parse_flag, parse_integer, parse_real, render_alphanumeric, render_flag,
    render_integer, render_real,
};
use super::{CardField, Columns, FieldError};
use crate::common::constants::LINE_WIDTH;
use crate::domain::{
    DiagnosticContext, Param, SammyError, SammyErrorKind, SammyResult, VaryFlag,
};

/// Read-only view of one input line, padded with blanks to 80 columns.
#[derive(Debug, Clone)]
pub struct LineReader<'a> {
    raw: &'a str,
    cells: Vec<char>,
    context: DiagnosticContext,
}

impl<'a> LineReader<'a> {
    pub fn new(raw: &'a str, context: DiagnosticContext) -> SammyResult<Self> {
        let mut cells: Vec<char> = raw.chars().collect();
        if cells.len() > LINE_WIDTH {
            let error = FieldError::LineTooLong {
                length: cells.len(),
                limit: LINE_WIDTH,
            };
            return Err(context.error(error.kind(), error.to_string()));
        }
        cells.resize(LINE_WIDTH, ' ');
        Ok(Self {
            raw,
            cells,
            context,
        })
    }

    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn context(&self) -> &DiagnosticContext {
        &self.context
    }

    pub fn slice(&self, columns: Columns) -> String {
        self.cells[columns.first() - 1..columns.last()].iter().collect()
    }

    pub fn is_blank(&self, columns: Columns) -> bool {
        self.cells[columns.first() - 1..columns.last()]
            .iter()
            .all(|cell| cell.is_whitespace())
    }

    pub fn is_blank_from(&self, first: usize) -> bool {
        self.is_blank(Columns::new(first, LINE_WIDTH))
    }

    pub fn alpha(&self, field: impl CardField) -> String {
        parse_alphanumeric(&self.slice(field.spec().columns))
    }

    /// Alphanumeric field with leading spaces removed as well.
    pub fn keyword(&self, field: impl CardField) -> String {
        self.alpha(field).trim_start().to_string()
    }

    pub fn real(&self, field: impl CardField) -> SammyResult<f64> {
        let spec = field.spec();
        parse_real(spec, &self.slice(spec.columns)).map_err(|error| self.fail(error))
    }

    /// Blank means absent; anything else must be a valid real.
    pub fn optional_real(&self, field: impl CardField) -> SammyResult<Option<f64>> {
        let spec = field.spec();
        if self.is_blank(spec.columns) {
            return Ok(None);
        }
        self.real(field).map(Some)
    }

    pub fn integer(&self, field: impl CardField, default: i64) -> SammyResult<i64> {
        let spec = field.spec();
        parse_integer(spec, &self.slice(spec.columns), default).map_err(|error| self.fail(error))
    }

    pub fn unsigned(&self, field: impl CardField, default: u32) -> SammyResult<u32> {
        let spec = field.spec();
        let value = self.integer(field, i64::from(default))?;
        u32::try_from(value).map_err(|_| {
            self.context.error(
                SammyErrorKind::OutOfRange,
                format!("{} (columns {}): {value} must not be negative", spec.name, spec.columns),
            )
        })
    }

    pub fn flag(&self, field: impl CardField) -> SammyResult<VaryFlag> {
        let spec = field.spec();
        parse_flag(spec, &self.slice(spec.columns)).map_err(|error| self.fail(error))
    }

    pub fn param(&self, value: impl CardField, flag: impl CardField) -> SammyResult<Param> {
        Ok(Param::new(self.real(value)?, self.flag(flag)?))
    }

    pub fn error(&self, kind: SammyErrorKind, message: impl Into<String>) -> SammyError {
        self.context.error(kind, message)
    }

    fn fail(&self, error: FieldError) -> SammyError {
        self.context.error(error.kind(), error.to_string())
    }
}

/// Builder for one output line; fields land at their declared columns.
#[derive(Debug, Clone)]
pub struct LineWriter {
    cells: Vec<char>,
    context: DiagnosticContext,
}

impl LineWriter {
    pub fn new(context: DiagnosticContext) -> Self {
        Self {
            cells: vec![' '; LINE_WIDTH],
            context,
        }
    }

    pub fn put(&mut self, columns: Columns, text: &str) {
        for (cell, character) in self.cells[columns.first() - 1..columns.last()]
            .iter_mut()
            .zip(text.chars())
        {
            *cell = character;
        }
    }

    pub fn alpha(&mut self, field: impl CardField, text: &str) {
        let spec = field.spec();
        let rendered = render_alphanumeric(spec, text);
        self.put(spec.columns, &rendered);
    }

    pub fn real(&mut self, field: impl CardField, value: f64) -> SammyResult<()> {
        let spec = field.spec();
        let rendered = render_real(spec, value).map_err(|error| self.fail(error))?;
        self.put(spec.columns, &rendered);
        Ok(())
    }

    pub fn optional_real(&mut self, field: impl CardField, value: Option<f64>) -> SammyResult<()> {
        match value {
            Some(value) => self.real(field, value),
            None => Ok(()),
        }
    }

    pub fn integer(&mut self, field: impl CardField, value: i64) -> SammyResult<()> {
        let spec = field.spec();
        let rendered = render_integer(spec, value).map_err(|error| self.fail(error))?;
        self.put(spec.columns, &rendered);
        Ok(())
    }

    pub fn flag(&mut self, field: impl CardField, flag: VaryFlag) -> SammyResult<()> {
        let spec = field.spec();
        let rendered = render_flag(spec, flag).map_err(|error| self.fail(error))?;
        self.put(spec.columns, &rendered);
        Ok(())
    }

    pub fn param(
        &mut self,
        value: impl CardField,
        flag: impl CardField,
        param: Param,
    ) -> SammyResult<()> {
        self.real(value, param.value)?;
        self.flag(flag, param.vary)
    }

    pub fn finish(self) -> String {
        let line: String = self.cells.into_iter().collect();
        line.trim_end().to_string()
    }

    fn fail(&self, error: FieldError) -> SammyError {
        self.context.error(error.kind(), error.to_string())
    }
}
