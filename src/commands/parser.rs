/// A raw chat line split into its command word and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: String,
    pub args: Vec<String>,
}

/// Split a prefixed message into a command and its arguments.
///
/// Returns `None` for anything that does not start with the prefix; the
/// content is compared verbatim, with no trimming beforehand. After the
/// prefix, leading spaces are dropped and the remainder splits on single
/// spaces, so doubled spaces yield empty argument tokens.
pub fn parse(content: &str, prefix: &str) -> Option<ParsedCommand> {
    let rest = content.strip_prefix(prefix)?;
    let rest = rest.trim_start_matches(' ');

    let mut tokens = rest.split(' ');
    let command = tokens.next().unwrap_or_default().to_string();
    let args = tokens.map(str::to_string).collect();

    Some(ParsedCommand { command, args })
}
