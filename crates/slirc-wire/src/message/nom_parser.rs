//! Nom-based IRC line tokenizer.
//!
//! Splits a line into borrowed slices without allocating; [`RawMessage`]
//! copies them out afterwards.
//!
//! [`RawMessage`]: super::RawMessage

use nom::{
    bytes::complete::{take_until, take_while1},
    character::complete::{char, space0},
    combinator::opt,
    error::ErrorKind,
    sequence::preceded,
    IResult,
};
use smallvec::SmallVec;

use crate::error::MessageParseError;

/// Parse IRCv3 message tags (the part after `@` and before the first space).
fn parse_tags(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_until(" "))(input)
}

/// Parse message prefix (the part after `:` and before the first space).
fn parse_prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c| c != ' '))(input)
}

/// Parse the command name (1*letter or 3digit).
fn parse_command(input: &str) -> IResult<&str, &str> {
    let (rest, cmd) = take_while1(|c: char| c.is_ascii_alphanumeric())(input)?;

    let is_all_letters = cmd.chars().all(|c| c.is_ascii_alphabetic());
    let is_three_digits = cmd.len() == 3 && cmd.chars().all(|c| c.is_ascii_digit());

    if is_all_letters || is_three_digits {
        Ok((rest, cmd))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::AlphaNumeric,
        )))
    }
}

/// Split the remainder of a line after the command into middle parameters
/// and an optional trailing parameter.
///
/// Consecutive spaces between middle parameters collapse. The first token
/// starting with `:` begins the trailing parameter, which runs verbatim to
/// the end of the line (spaces included). A bare `:` yields an empty
/// trailing, which is distinct from having no trailing at all.
fn parse_params(input: &str) -> (&str, SmallVec<[&str; 15]>, Option<&str>) {
    let mut params: SmallVec<[&str; 15]> = SmallVec::new();
    let mut rest = input;

    while rest.starts_with(' ') {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        if let Some(trailing) = rest.strip_prefix(':') {
            return ("", params, Some(trailing));
        }

        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }

    (rest, params, None)
}

fn parse_line(input: &str) -> IResult<&str, ParsedLine<'_>> {
    let (input, tags) = opt(parse_tags)(input)?;
    let (input, _) = space0(input)?;

    let (input, prefix) = opt(parse_prefix)(input)?;
    let (input, _) = space0(input)?;

    let (input, command) = parse_command(input)?;
    let (rest, params, trailing) = parse_params(input);

    Ok((
        rest,
        ParsedLine {
            tags,
            prefix,
            command,
            params,
            trailing,
        },
    ))
}

/// A tokenized IRC line borrowing from its input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedLine<'a> {
    /// Raw tags string (without the leading `@`), if present.
    pub tags: Option<&'a str>,
    /// Raw prefix string (without the leading `:`), if present.
    pub prefix: Option<&'a str>,
    /// The command word or numeric.
    pub command: &'a str,
    /// Middle parameters.
    pub params: SmallVec<[&'a str; 15]>,
    /// Trailing parameter (colon stripped), if present.
    pub trailing: Option<&'a str>,
}

impl<'a> ParsedLine<'a> {
    /// Tokenize one line. A trailing CR/LF is tolerated and stripped.
    pub fn parse(input: &'a str) -> Result<Self, MessageParseError> {
        let line = input.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        match parse_line(line) {
            Ok(("", parsed)) => Ok(parsed),
            Ok((rest, _)) => Err(MessageParseError::TrailingGarbage {
                position: line.len() - rest.len(),
            }),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                if e.code == ErrorKind::AlphaNumeric || e.code == ErrorKind::TakeWhile1 {
                    Err(MessageParseError::InvalidCommand)
                } else {
                    Err(MessageParseError::ParseContext {
                        position: line.len() - e.input.len(),
                        context: format!("{:?}", e.code),
                    })
                }
            }
            Err(nom::Err::Incomplete(_)) => Err(MessageParseError::ParseContext {
                position: line.len(),
                context: "incomplete input".to_string(),
            }),
        }
    }
}
