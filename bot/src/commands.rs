//! Command parsing for incoming Telegram messages.

/// A recognized slash command. Anything else is ignored rather than answered,
/// matching how group chats expect bots to behave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    /// Raw argument text; quote-aware splitting happens in the handler so a
    /// bad quote can be answered instead of swallowed.
    Track(String),
    Broadcast(String),
    Help,
}

impl Command {
    pub fn parse(text: &str) -> Option<Command> {
        let text = text.trim();
        let (head, rest) = match text.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (text, ""),
        };

        // "/track@seatwatch_bot" is how Telegram addresses bots in groups.
        let head = head.split('@').next().unwrap_or(head);

        match head {
            "/start" => Some(Command::Start),
            "/help" => Some(Command::Help),
            "/broadcast" => Some(Command::Broadcast(rest.to_string())),
            "/track" => Some(Command::Track(rest.to_string())),
            _ => None,
        }
    }
}

/// Shell-style argument splitting: double quotes group words, whitespace
/// separates. `None` on an unbalanced quote.
pub fn split_quoted(input: &str) -> Option<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                if in_quotes {
                    args.push(std::mem::take(&mut current));
                }
                in_quotes = !in_quotes;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if in_quotes {
        return None;
    }
    if !current.is_empty() {
        args.push(current);
    }

    Some(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_words_split_on_whitespace() {
        assert_eq!(
            split_quoted("dune pvr 2024-05-01"),
            Some(vec![
                "dune".to_string(),
                "pvr".to_string(),
                "2024-05-01".to_string()
            ])
        );
    }

    #[test]
    fn quotes_group_multi_word_names() {
        assert_eq!(
            split_quoted(r#""Dune Part Two" "PVR Grand Mall""#),
            Some(vec!["Dune Part Two".to_string(), "PVR Grand Mall".to_string()])
        );
    }

    #[test]
    fn empty_quoted_arguments_survive() {
        assert_eq!(split_quoted(r#""" pvr"#), Some(vec!["".to_string(), "pvr".to_string()]));
    }

    #[test]
    fn unbalanced_quote_is_rejected() {
        assert_eq!(split_quoted(r#""Dune Part Two pvr"#), None);
    }

    #[test]
    fn commands_parse_with_bot_suffix() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/start@seatwatch_bot"), Some(Command::Start));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
        assert_eq!(Command::parse("hello"), None);
    }

    #[test]
    fn track_keeps_its_raw_arguments() {
        assert_eq!(
            Command::parse(r#"/track "Dune Part Two" pvr"#),
            Some(Command::Track(r#""Dune Part Two" pvr"#.to_string()))
        );
    }

    #[test]
    fn broadcast_keeps_the_raw_text() {
        assert_eq!(
            Command::parse("/broadcast show tonight is back on"),
            Some(Command::Broadcast("show tonight is back on".to_string()))
        );
    }
}
