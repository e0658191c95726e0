//! Input-file card 3: alphanumeric commands, one per line.

use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::commands::{CommandRegistry, CommandSpec};
use crate::common::constants::LINE_WIDTH;
use crate::domain::{CardSet, DiagnosticContext, ParseResult, RenderResult, SammyError, SammyResult};
use tracing::warn;

/// Command lines in file order.
///
/// Lines the registry does not know are kept verbatim so that newer
/// commands survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandCard {
    pub lines: Vec<String>,
}

impl CommandCard {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Registry entry for each line, in order.
    pub fn resolved(&self) -> Vec<Option<&'static CommandSpec>> {
        let registry = CommandRegistry::standard();
        self.lines.iter().map(|line| registry.lookup(line)).collect()
    }

    pub fn unrecognized(&self) -> Vec<&str> {
        let registry = CommandRegistry::standard();
        self.lines
            .iter()
            .map(String::as_str)
            .filter(|line| registry.lookup(line).is_none())
            .collect()
    }
}

impl CardModel for CommandCard {
    const CARD_SET: CardSet = CardSet::Commands;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }

        let registry = CommandRegistry::standard();
        let mut commands = Vec::with_capacity(lines.len() - cursor);
        for index in cursor..lines.len() {
            let reader = line_reader(lines, index, context)?;
            let line = reader.raw().trim_end().to_string();
            if registry.lookup(&line).is_none() {
                warn!(line = index + 1, command = %line, "unrecognized command kept verbatim");
            }
            commands.push(line);
        }
        Ok((Self { lines: commands }, lines.len() - cursor))
    }

    fn render(&self, _context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        self.validate()?;
        Ok(self
            .lines
            .iter()
            .map(|line| line.trim_end().to_string())
            .collect())
    }

    fn validate(&self) -> SammyResult<()> {
        if let Some(line) = self
            .lines
            .iter()
            .find(|line| line.trim().is_empty() || line.chars().count() > LINE_WIDTH)
        {
            return Err(SammyError::validation(format!(
                "command line '{line}' must be non-blank and at most {LINE_WIDTH} characters"
            )));
        }

        let registry = CommandRegistry::standard();
        let conflicts = registry.conflicts(self.lines.iter().map(String::as_str));
        if let Some(conflict) = conflicts.first() {
            return Err(SammyError::validation(format!(
                "conflicting commands: {conflict}"
            )));
        }
        Ok(())
    }

    impl_instance_access!(Commands);
}

#[cfg(test)]
mod tests {
    use super::CommandCard;
    use crate::cards::CardModel;
    use crate::commands::CommandCategory;
    use crate::domain::{CardSet, DiagnosticContext, SammyErrorKind};

    fn context() -> DiagnosticContext {
        DiagnosticContext::for_card(CardSet::Commands)
    }

    #[test]
    fn unknown_commands_survive_a_round_trip() {
        let lines = ["REICH-MOORE FORMALISM IS WANTED", "SOME FUTURE COMMAND", "NPV"];
        let (card, consumed) = CommandCard::parse(&lines, 0, &context()).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(card.unrecognized(), vec!["SOME FUTURE COMMAND"]);
        assert_eq!(
            card.resolved()[2].map(|command| command.category),
            Some(CommandCategory::Bayes)
        );

        let rendered = card.render(&context()).unwrap();
        assert_eq!(rendered, lines.map(String::from).to_vec());
    }

    #[test]
    fn conflicting_commands_fail_validation() {
        let card = CommandCard::new(["BROADENING IS WANTED", "BROADENING IS NOT WANTED"]);
        let error = card.render(&context()).expect_err("commands conflict");
        assert_eq!(error.kind(), SammyErrorKind::ValidationError);
        assert!(error.message().contains("BROADENING IS NOT WAnted"));
    }
}
