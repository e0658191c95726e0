use super::CardSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SammyResult<T> = Result<T, SammyError>;
pub type ParseResult<T> = SammyResult<T>;
pub type RenderResult<T> = SammyResult<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SammyErrorKind {
    MalformedField,
    OutOfRange,
    UnrecognizedFormat,
    UnknownCardSet,
    DuplicateCardSet,
    InconsistentRepeatingGroup,
    ValidationError,
    TooLarge,
}

impl SammyErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedField => "MalformedField",
            Self::OutOfRange => "OutOfRange",
            Self::UnrecognizedFormat => "UnrecognizedFormat",
            Self::UnknownCardSet => "UnknownCardSet",
            Self::DuplicateCardSet => "DuplicateCardSet",
            Self::InconsistentRepeatingGroup => "InconsistentRepeatingGroup",
            Self::ValidationError => "ValidationError",
            Self::TooLarge => "TooLarge",
        }
    }

    /// Errors raised while reading text, as opposed to rules checked on assignment.
    pub const fn is_parse_error(self) -> bool {
        !matches!(self, Self::ValidationError)
    }
}

impl Display for SammyErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Where in a document an error was raised.
///
/// Parse and render routines receive a context for the card being processed and
/// narrow it to a line before reporting a failure, so every error carries the
/// card set, its in-card line number and the raw text that triggered it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticContext {
    card_set: Option<CardSet>,
    first_document_line: Option<usize>,
    card_line: Option<usize>,
    raw_line: Option<String>,
}

impl DiagnosticContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_card(card_set: CardSet) -> Self {
        Self {
            card_set: Some(card_set),
            ..Self::default()
        }
    }

    /// Context for a card whose first body line sits at `document_line` (1-based).
    pub fn for_card_at(card_set: CardSet, document_line: usize) -> Self {
        Self {
            card_set: Some(card_set),
            first_document_line: Some(document_line),
            ..Self::default()
        }
    }

    pub fn for_document_line(document_line: usize, raw_line: &str) -> Self {
        Self {
            first_document_line: Some(document_line),
            card_line: Some(1),
            raw_line: Some(raw_line.to_string()),
            ..Self::default()
        }
    }

    /// Narrow the context to the 1-based line `card_line` of the current card.
    pub fn at_line(&self, card_line: usize, raw_line: &str) -> Self {
        Self {
            card_set: self.card_set,
            first_document_line: self.first_document_line,
            card_line: Some(card_line),
            raw_line: Some(raw_line.to_string()),
        }
    }

    /// Same as [`Self::at_line`] but without raw text, used while rendering.
    pub fn at_output_line(&self, card_line: usize) -> Self {
        Self {
            card_set: self.card_set,
            first_document_line: self.first_document_line,
            card_line: Some(card_line),
            raw_line: None,
        }
    }

    pub const fn card_set(&self) -> Option<CardSet> {
        self.card_set
    }

    pub const fn card_line(&self) -> Option<usize> {
        self.card_line
    }

    pub fn document_line(&self) -> Option<usize> {
        match (self.first_document_line, self.card_line) {
            (Some(first), Some(line)) => Some(first + line - 1),
            (Some(first), None) => Some(first),
            _ => None,
        }
    }

    pub fn raw_line(&self) -> Option<&str> {
        self.raw_line.as_deref()
    }

    pub fn error(&self, kind: SammyErrorKind, message: impl Into<String>) -> SammyError {
        SammyError::new(kind, message).with_context(self.clone())
    }

    fn describe(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(card_set) = self.card_set {
            parts.push(format!("card {} ({})", card_set.number(), card_set.as_str()));
        }
        if let Some(line) = self.card_line {
            parts.push(format!("line {line}"));
        }
        if let Some(document_line) = self.document_line() {
            parts.push(format!("document line {document_line}"));
        }
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SammyError {
    kind: SammyErrorKind,
    message: String,
    context: DiagnosticContext,
}

impl SammyError {
    pub fn new(kind: SammyErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: DiagnosticContext::default(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(SammyErrorKind::ValidationError, message)
    }

    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(SammyErrorKind::OutOfRange, message)
    }

    pub fn with_context(mut self, context: DiagnosticContext) -> Self {
        self.context = context;
        self
    }

    pub const fn kind(&self) -> SammyErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn context(&self) -> &DiagnosticContext {
        &self.context
    }

    pub fn diagnostic_line(&self) -> String {
        let mut line = format!("ERROR: [{}]", self.kind);
        if let Some(location) = self.context.describe() {
            line.push(' ');
            line.push_str(&location);
            line.push(':');
        }
        line.push(' ');
        line.push_str(&self.message);
        if let Some(raw) = self.context.raw_line() {
            line.push_str(" | ");
            line.push_str(raw.trim_end());
        }
        line
    }
}

impl Display for SammyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.context.describe() {
            Some(location) => write!(f, "{} at {}: {}", self.kind, location, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl Error for SammyError {}
