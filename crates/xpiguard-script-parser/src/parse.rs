use crate::lower::Lowering;
use crate::position::{BASE, LineIndex};
use std::collections::BTreeMap;
use std::thread;
use swc_core::common::comments::SingleThreadedComments;
use swc_core::common::{BytePos, Spanned};
use swc_core::ecma::ast::EsVersion;
use swc_core::ecma::parser::error::Error as SwcError;
use swc_core::ecma::parser::lexer::Lexer;
use swc_core::ecma::parser::{Parser, StringInput, Syntax};
use swc_core::ecma::visit::VisitWith;
use xpiguard_domain::script::{Comment, ParseFailure, ParseOutcome};

/// Bracket depth accepted before swc sees the text.
const MAX_NESTING: usize = 512;

/// swc parses and lowers recursively; a dedicated thread keeps deep inputs off the
/// caller's stack.
const PARSER_STACK_BYTES: usize = 64 * 1024 * 1024;

/// Parse a whole script or module. Any syntax error fails the parse; no partial tree is
/// returned.
pub fn parse(source: &str) -> ParseOutcome {
    check_nesting(source)?;
    let end = u32::try_from(source.len())
        .ok()
        .and_then(|len| len.checked_add(BASE))
        .ok_or_else(|| ParseFailure::new("script too large", None, None))?;

    thread::scope(|scope| {
        let worker = thread::Builder::new()
            .name("xpiguard-parse".into())
            .stack_size(PARSER_STACK_BYTES)
            .spawn_scoped(scope, || parse_on_current_thread(source, end));
        match worker {
            Ok(handle) => handle
                .join()
                .unwrap_or_else(|_| Err(ParseFailure::new("parser aborted", None, None))),
            Err(err) => Err(ParseFailure::new(
                format!("could not start parser: {err}"),
                None,
                None,
            )),
        }
    })
}

fn parse_on_current_thread(source: &str, end: u32) -> ParseOutcome {
    let lines = LineIndex::new(source);
    let comments = SingleThreadedComments::default();
    let lexer = Lexer::new(
        Syntax::Es(Default::default()),
        EsVersion::EsNext,
        StringInput::new(source, BytePos(BASE), BytePos(end)),
        Some(&comments),
    );
    let mut parser = Parser::new_from(lexer);
    let parsed = parser.parse_program();
    let recovered = parser.take_errors();
    drop(parser);
    let program = match parsed {
        Ok(program) => program,
        Err(err) => return Err(failure(&lines, &err)),
    };
    if let Some(err) = recovered.first() {
        return Err(failure(&lines, err));
    }

    let mut lowering = Lowering::new(&lines);
    program.visit_with(&mut lowering);
    let (mut builder, root) = lowering.finish()?;

    // swc files each comment as leading or trailing; collect both in source order.
    let (leading, trailing) = comments.take_all();
    let mut ordered = BTreeMap::new();
    for map in [leading, trailing] {
        for comment in map.borrow().values().flatten() {
            ordered.entry(comment.span.lo).or_insert_with(|| Comment {
                text: comment.text.to_string(),
                start: lines.position(comment.span.lo),
                end_line: lines.position(comment.span.hi).line,
            });
        }
    }
    for comment in ordered.into_values() {
        builder.comment(comment);
    }
    Ok(builder.finish(root))
}

fn failure(lines: &LineIndex<'_>, err: &SwcError) -> ParseFailure {
    let at = lines.position(err.span().lo);
    ParseFailure::new(err.kind().msg(), Some(at.line), Some(at.column))
}

/// Reject pathological bracket nesting with a plain scan that skips strings and comments.
fn check_nesting(source: &str) -> Result<(), ParseFailure> {
    let mut depth = 0usize;
    let mut line = 1u32;
    let mut column = 0u32;
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        column += 1;
        match c {
            '\n' => {
                line += 1;
                column = 0;
            }
            '(' | '[' | '{' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(ParseFailure::new(
                        "nesting too deep",
                        Some(line),
                        Some(column),
                    ));
                }
            }
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '"' | '\'' | '`' => {
                while let Some(inner) = chars.next() {
                    match inner {
                        '\\' => {
                            chars.next();
                        }
                        '\n' => {
                            line += 1;
                            column = 0;
                            if c != '`' {
                                break;
                            }
                        }
                        _ if inner == c => break,
                        _ => column += 1,
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        line += 1;
                        column = 0;
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut star = false;
                for inner in chars.by_ref() {
                    match inner {
                        '/' if star => break,
                        '\n' => {
                            line += 1;
                            column = 0;
                        }
                        _ => {}
                    }
                    star = inner == '*';
                }
            }
            _ => {}
        }
    }
    Ok(())
}
