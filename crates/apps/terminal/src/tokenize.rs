//! Command-line tokenizing with quote grouping.

use thiserror::Error;

/// Tokenizer failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerminalError {
    /// A double quote was opened but never closed.
    #[error("unterminated quoted string")]
    UnterminatedQuote,
}

/// Splits `line` into argv tokens.
///
/// Whitespace separates tokens and a pair of quotes groups text into one token. A single quote
/// with no closing partner is an apostrophe and stays literal (`don't`); an unclosed double
/// quote is an error. Backslashes are ordinary characters.
pub fn tokenize(line: &str) -> Result<Vec<String>, TerminalError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote = None::<char>;

    for (index, ch) in line.char_indices() {
        match quote {
            Some(active) if ch == active => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || (ch == '\'' && line[index + 1..].contains('\'')) => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(TerminalError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
