//! Catalogue of the alphanumeric command keywords accepted by the input file.

mod catalogue;

use crate::common::constants::COMMAND_SIGNIFICANT_LENGTH;
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandCategory {
    General,
    RMatrix,
    ParameterInput,
    DataFormat,
    Broadening,
    Doppler,
    Resolution,
    MultipleScattering,
    Bayes,
    Output,
    Endf,
    Plotting,
    Averaging,
    Constants,
    CrossSection,
    EnergyGrid,
    Special,
}

impl CommandCategory {
    pub const ALL: [Self; 17] = [
        Self::General,
        Self::RMatrix,
        Self::ParameterInput,
        Self::DataFormat,
        Self::Broadening,
        Self::Doppler,
        Self::Resolution,
        Self::MultipleScattering,
        Self::Bayes,
        Self::Output,
        Self::Endf,
        Self::Plotting,
        Self::Averaging,
        Self::Constants,
        Self::CrossSection,
        Self::EnergyGrid,
        Self::Special,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::RMatrix => "R-matrix approximation",
            Self::ParameterInput => "parameter input",
            Self::DataFormat => "data format",
            Self::Broadening => "broadening",
            Self::Doppler => "Doppler method",
            Self::Resolution => "resolution function",
            Self::MultipleScattering => "multiple scattering",
            Self::Bayes => "Bayes control",
            Self::Output => "output control",
            Self::Endf => "ENDF input/output",
            Self::Plotting => "plotting",
            Self::Averaging => "averaging",
            Self::Constants => "physical constants",
            Self::CrossSection => "cross-section detail",
            Self::EnergyGrid => "energy grid",
            Self::Special => "special options",
        }
    }
}

impl Display for CommandCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// One recognized command.
///
/// The fitting program only reads the first twenty characters of a command
/// line; `phrase` is the full wording with those characters upper-cased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    pub phrase: &'static str,
    pub aliases: &'static [&'static str],
    pub category: CommandCategory,
    /// Commands sharing an exclusive group may not be combined.
    pub exclusive: Option<&'static str>,
}

impl CommandSpec {
    fn matches(&self, key: &str) -> bool {
        significant(self.phrase) == key
            || self.aliases.iter().any(|alias| significant(alias) == key)
    }
}

/// Two recognized commands from the same exclusive group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandConflict {
    pub group: &'static str,
    pub first: &'static str,
    pub second: &'static str,
}

impl Display for CommandConflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' conflicts with '{}' ({} options)",
            self.second, self.first, self.group
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandRegistry {
    commands: &'static [CommandSpec],
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl CommandRegistry {
    pub const fn standard() -> Self {
        Self {
            commands: &catalogue::COMMANDS,
        }
    }

    pub fn commands(&self) -> &'static [CommandSpec] {
        self.commands
    }

    pub fn in_category(
        &self,
        category: CommandCategory,
    ) -> impl Iterator<Item = &'static CommandSpec> {
        self.commands
            .iter()
            .filter(move |command| command.category == category)
    }

    /// Resolve one command line, matching on its significant characters.
    ///
    /// A line spelling out a full phrase wins over a prefix match, which
    /// separates the few commands that only differ past column 20.
    pub fn lookup(&self, line: &str) -> Option<&'static CommandSpec> {
        let key = significant(line);
        if key.is_empty() {
            return None;
        }
        let full = line.trim();
        self.commands
            .iter()
            .find(|command| command.phrase.eq_ignore_ascii_case(full))
            .or_else(|| self.commands.iter().find(|command| command.matches(&key)))
    }

    /// Every pair of recognized commands that share an exclusive group.
    ///
    /// Repeating the same command is not a conflict.
    pub fn conflicts<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> Vec<CommandConflict> {
        let recognized: Vec<&'static CommandSpec> =
            lines.into_iter().filter_map(|line| self.lookup(line)).collect();

        let mut conflicts = Vec::new();
        for (index, first) in recognized.iter().enumerate() {
            let Some(group) = first.exclusive else {
                continue;
            };
            for second in &recognized[index + 1..] {
                if second.exclusive == Some(group) && second.phrase != first.phrase {
                    conflicts.push(CommandConflict {
                        group,
                        first: first.phrase,
                        second: second.phrase,
                    });
                }
            }
        }
        conflicts
    }
}

/// Upper-cased leading characters the fitting program compares.
fn significant(text: &str) -> String {
    text.trim()
        .chars()
        .take(COMMAND_SIGNIFICANT_LENGTH)
        .collect::<String>()
        .trim_end()
        .to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::{CommandCategory, CommandRegistry, significant};
    use std::collections::HashSet;

    #[test]
    fn lookup_compares_twenty_characters_case_insensitively() {
        let registry = CommandRegistry::standard();
        let command = registry
            .lookup("Reich-Moore formalism is wanted, please")
            .expect("first twenty characters match");
        assert_eq!(command.category, CommandCategory::RMatrix);
        assert_eq!(command.phrase, "REICH-MOORE FORMALISm is wanted");

        assert!(registry.lookup("REICH-MOORE").is_none());
        assert!(registry.lookup("   ").is_none());
    }

    #[test]
    fn aliases_resolve_to_their_command() {
        let registry = CommandRegistry::standard();
        let xct = registry.lookup("xct").expect("alias is known");
        assert_eq!(xct.phrase, "REICH-MOORE FORMALISm is wanted");
        let npv = registry.lookup("NPV").expect("alias is known");
        assert_eq!(npv.category, CommandCategory::Bayes);
    }

    #[test]
    fn significant_keys_are_unique_across_the_catalogue() {
        let registry = CommandRegistry::standard();
        let mut seen = HashSet::new();
        let mut shared = Vec::new();
        for command in registry.commands() {
            for key in std::iter::once(command.phrase).chain(command.aliases.iter().copied()) {
                if !seen.insert(significant(key)) {
                    shared.push(significant(key));
                }
            }
        }
        assert_eq!(shared, vec!["SPIN OF INCIDENT PAR".to_string()]);
    }

    #[test]
    fn full_phrases_separate_commands_sharing_a_prefix() {
        let registry = CommandRegistry::standard();
        let minus = registry
            .lookup("spin of incident particle is -")
            .expect("full phrase is known");
        assert_eq!(minus.phrase, "SPIN OF INCIDENT PARticle is -");
    }

    #[test]
    fn every_category_has_commands() {
        let registry = CommandRegistry::standard();
        for category in CommandCategory::ALL {
            assert!(
                registry.in_category(category).next().is_some(),
                "{category} has no commands"
            );
        }
    }

    #[test]
    fn exclusive_commands_conflict_but_repeats_do_not() {
        let registry = CommandRegistry::standard();
        let conflicts = registry.conflicts([
            "REICH-MOORE FORMALISM IS WANTED",
            "MLBW",
            "BROADENING IS WANTED",
            "BROADENING IS WANTED",
            "PRINT ALL INPUT PARAMETERS",
        ]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].group, "formalism");
        assert_eq!(conflicts[0].second, "MULTILEVEL BREITWIGner is wanted");
    }
}
