use regex::Regex;

/// `/<name>ism`, `/<name>ism record <text>`, `/<name>ism delete`.
///
/// The name is lazy so the first `ism` wins (`/bobism record I love prism`),
/// and anything after `ism` that is not a subcommand must start with
/// whitespace, which keeps `/bobismextra` from matching at all. A subcommand
/// is a whole word: `/bobism recording` is improper, not a record.
const QUOTE_COMMAND_PATTERN: &str = r"(?is)^\s*/(?P<name>.+?)ism(?:\s+(?P<subcommand>record|delete)(?:\s+(?P<argument>.+))?|(?P<improper>\s.*))?\s*$";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subcommand {
    Record,
    Delete,
}

/// Captures of one quote command. Whitespace-only captures are `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub subcommand: Option<Subcommand>,
    pub argument: Option<String>,
    pub improper: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuoteCommand {
    Malformed,
    Record { name: String, text: String },
    Delete { name: String },
    Retrieve { name: String },
}

impl ParsedCommand {
    pub fn classify(self) -> QuoteCommand {
        if self.improper.is_some() {
            return QuoteCommand::Malformed;
        }

        match (self.subcommand, self.argument) {
            (Some(Subcommand::Record), Some(text)) => QuoteCommand::Record { name: self.name, text },
            (Some(Subcommand::Delete), None) => QuoteCommand::Delete { name: self.name },
            (Some(_), _) => QuoteCommand::Malformed,
            (None, _) => QuoteCommand::Retrieve { name: self.name },
        }
    }
}

#[derive(Clone, Debug)]
pub struct QuoteGrammar {
    pattern: Regex,
}

impl QuoteGrammar {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self { pattern: Regex::new(QUOTE_COMMAND_PATTERN)? })
    }

    /// `None` when the text is not a quote command at all.
    pub fn parse(&self, text: &str) -> Option<ParsedCommand> {
        let captures = self.pattern.captures(text)?;
        let name = captures.name("name")?.as_str().trim();
        if name.is_empty() {
            return None;
        }

        let subcommand = captures.name("subcommand").map(|found| {
            if found.as_str().eq_ignore_ascii_case("record") {
                Subcommand::Record
            } else {
                Subcommand::Delete
            }
        });

        Some(ParsedCommand {
            name: name.to_owned(),
            subcommand,
            argument: non_blank(captures.name("argument").map(|found| found.as_str())),
            improper: non_blank(captures.name("improper").map(|found| found.as_str())),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|value| !value.is_empty()).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::{ParsedCommand, QuoteCommand, QuoteGrammar, Subcommand};

    fn grammar() -> QuoteGrammar {
        QuoteGrammar::new().expect("pattern compiles")
    }

    fn classify(text: &str) -> Option<QuoteCommand> {
        grammar().parse(text).map(ParsedCommand::classify)
    }

    #[test]
    fn bare_command_retrieves() {
        assert_eq!(classify("/aliceism"), Some(QuoteCommand::Retrieve { name: "alice".into() }));
        assert_eq!(
            classify("  /AliceISM  "),
            Some(QuoteCommand::Retrieve { name: "Alice".into() })
        );
    }

    #[test]
    fn record_captures_trimmed_text() {
        assert_eq!(
            classify("/aliceism record   hello world  "),
            Some(QuoteCommand::Record { name: "alice".into(), text: "hello world".into() })
        );
        assert_eq!(
            classify("/bobism RECORD I love prism"),
            Some(QuoteCommand::Record { name: "bob".into(), text: "I love prism".into() })
        );
    }

    #[test]
    fn record_keeps_multiline_text() {
        assert_eq!(
            classify("/bobism record first line\nsecond line"),
            Some(QuoteCommand::Record {
                name: "bob".into(),
                text: "first line\nsecond line".into()
            })
        );
    }

    #[test]
    fn name_may_contain_ism() {
        assert_eq!(classify("/prismism"), Some(QuoteCommand::Retrieve { name: "prism".into() }));
        assert_eq!(
            classify("/big tim ism"),
            Some(QuoteCommand::Retrieve { name: "big tim".into() })
        );
    }

    #[test]
    fn record_without_text_is_malformed() {
        assert_eq!(classify("/aliceism record"), Some(QuoteCommand::Malformed));
        assert_eq!(classify("/aliceism record    "), Some(QuoteCommand::Malformed));
    }

    #[test]
    fn unknown_trailing_words_are_malformed() {
        assert_eq!(classify("/aliceism extra garbage"), Some(QuoteCommand::Malformed));
        let parsed = grammar().parse("/aliceism extra garbage").expect("matches");
        assert_eq!(parsed.improper.as_deref(), Some("extra garbage"));
        assert_eq!(parsed.subcommand, None);
    }

    #[test]
    fn delete_takes_no_argument() {
        assert_eq!(classify("/aliceism delete"), Some(QuoteCommand::Delete { name: "alice".into() }));
        assert_eq!(
            classify("/aliceism Delete "),
            Some(QuoteCommand::Delete { name: "alice".into() })
        );
        assert_eq!(classify("/aliceism delete that one"), Some(QuoteCommand::Malformed));
        assert_eq!(
            grammar().parse("/aliceism delete").map(|parsed| parsed.subcommand),
            Some(Some(Subcommand::Delete))
        );
    }

    #[test]
    fn subcommand_keywords_must_stand_alone() {
        for text in ["/bobism recording is great", "/bobism records", "/bobism deleted"] {
            assert_eq!(classify(text), Some(QuoteCommand::Malformed), "`{text}`");
        }

        let parsed = grammar().parse("/bobism recording is great").expect("matches");
        assert_eq!(parsed.subcommand, None);
        assert_eq!(parsed.argument, None);
        assert_eq!(parsed.improper.as_deref(), Some("recording is great"));
    }

    #[test]
    fn record_text_may_start_on_the_next_line() {
        assert_eq!(
            classify("/bobism record\nship it"),
            Some(QuoteCommand::Record { name: "bob".into(), text: "ship it".into() })
        );
    }

    #[test]
    fn non_commands_are_declined() {
        for text in
            ["hello", "aliceism", "say /aliceism", "/ism", "/  ism", "/bobismextra", "/pika", ""]
        {
            assert_eq!(grammar().parse(text), None, "`{text}` should not parse");
        }
    }
}
