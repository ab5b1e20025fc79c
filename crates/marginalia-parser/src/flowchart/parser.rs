//! Statement parser for Mermaid flowcharts.
//!
//! A block is first split into statements (newlines and `;` outside labels,
//! `%%` comments removed). Each statement is then parsed on its own with
//! [`winnow`] combinators into a [`Statement`], carrying byte spans relative
//! to the whole block so diagnostics point into the original source.

use winnow::{
    Parser as _,
    ascii::{space0, space1},
    combinator::{alt, opt, preceded},
    error::{ContextError, ErrMode},
    token::take_while,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    flowchart::types::{ArrowHead, LineStyle, NodeShape},
    span::{Span, Spanned},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
}

type IResult<O> = Result<O, ErrMode<ContextError<Context>>>;

/// Opening and closing delimiters for each node shape, longest opener first.
const SHAPES: &[(&str, &str, NodeShape)] = &[
    ("([", "])", NodeShape::Stadium),
    ("[[", "]]", NodeShape::Subroutine),
    ("[(", ")]", NodeShape::Cylinder),
    ("((", "))", NodeShape::Circle),
    ("{{", "}}", NodeShape::Hexagon),
    ("[", "]", NodeShape::Rect),
    ("(", ")", NodeShape::Rounded),
    ("{", "}", NodeShape::Diamond),
    (">", "]", NodeShape::Flag),
];

/// One statement of source text with its byte offset in the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawStatement<'src> {
    pub(crate) text: &'src str,
    pub(crate) offset: usize,
}

impl RawStatement<'_> {
    pub(crate) fn span(&self) -> Span {
        Span::new(self.offset..self.offset + self.text.len())
    }
}

/// A node mention: `A`, `A[Label]`, `A:::class`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeRef {
    pub(crate) id: Spanned<String>,
    pub(crate) shape: Option<(NodeShape, String)>,
    pub(crate) class: Option<Spanned<String>>,
}

/// An edge operator with its optional label.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EdgeOp {
    pub(crate) line: LineStyle,
    pub(crate) tail: ArrowHead,
    pub(crate) head: ArrowHead,
    pub(crate) label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Link {
    pub(crate) op: Spanned<EdgeOp>,
    pub(crate) targets: Vec<NodeRef>,
}

/// A `key:value` pair from `style` or `classDef`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StyleProp {
    pub(crate) key: Spanned<String>,
    pub(crate) value: Spanned<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Statement {
    /// `A --> B & C -- text --> D`
    Chain { first: Vec<NodeRef>, links: Vec<Link> },
    SubgraphStart {
        id: Spanned<String>,
        title: String,
    },
    End(Span),
    ClassDef {
        names: Vec<Spanned<String>>,
        props: Vec<StyleProp>,
    },
    Class {
        nodes: Vec<Spanned<String>>,
        class: Spanned<String>,
    },
    Style {
        node: Spanned<String>,
        props: Vec<StyleProp>,
    },
    /// Accepted for compatibility but has no effect on the drawing.
    Ignored { keyword: &'static str, span: Span },
}

/// Splits a block into trimmed, non-empty statements.
///
/// # Errors
///
/// Returns `E001` when a quoted string is not closed before the end of its line.
pub(crate) fn split_statements(source: &str) -> Result<Vec<RawStatement<'_>>, Diagnostic> {
    let mut statements = Vec::new();
    let mut start = 0;
    let mut quote_start: Option<usize> = None;
    let mut depth = 0usize;
    let mut chars = source.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if let Some(open) = quote_start {
            match c {
                '"' => quote_start = None,
                '\n' => return Err(unterminated_string(open, index)),
                _ => {}
            }
            continue;
        }

        match c {
            '"' => quote_start = Some(index),
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => depth = depth.saturating_sub(1),
            '%' if source[index..].starts_with("%%") => {
                push_statement(source, start, index, &mut statements);
                // Skip to the end of the line; the newline itself starts the next statement
                while chars.next_if(|&(_, c)| c != '\n').is_some() {}
                start = chars.peek().map_or(source.len(), |&(i, _)| i);
            }
            '\n' => {
                push_statement(source, start, index, &mut statements);
                start = index + 1;
                depth = 0;
            }
            ';' if depth == 0 => {
                push_statement(source, start, index, &mut statements);
                start = index + 1;
            }
            _ => {}
        }
    }

    if let Some(open) = quote_start {
        return Err(unterminated_string(open, source.len()));
    }
    push_statement(source, start, source.len(), &mut statements);

    Ok(statements)
}

fn push_statement<'src>(
    source: &'src str,
    from: usize,
    to: usize,
    out: &mut Vec<RawStatement<'src>>,
) {
    let raw = &source[from..to];
    let text = raw.trim();
    if !text.is_empty() {
        let leading = raw.len() - raw.trim_start().len();
        out.push(RawStatement {
            text,
            offset: from + leading,
        });
    }
}

fn unterminated_string(open: usize, end: usize) -> Diagnostic {
    Diagnostic::error("unterminated string")
        .with_code(ErrorCode::E001)
        .with_label(Span::new(open..end), "string starts here")
        .with_help("close the label with `\"` on the same line")
}

/// Skip spaces and tabs
fn ws0(input: &mut &str) -> IResult<()> {
    space0.void().parse_next(input)
}

/// Require at least one space or tab
fn ws1(input: &mut &str) -> IResult<()> {
    space1.void().parse_next(input)
}

/// Parse a node or class identifier
fn identifier<'src>(input: &mut &'src str) -> IResult<&'src str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_')
        .context(Context::Label("identifier"))
        .parse_next(input)
}

/// Parse a keyword made of ASCII letters
fn keyword<'src>(input: &mut &'src str) -> IResult<&'src str> {
    take_while(1.., |c: char| c.is_ascii_alphabetic())
        .context(Context::Label("keyword"))
        .parse_next(input)
}

/// Parse the line part of an edge, returning its style and length
fn line_body(input: &mut &str) -> IResult<(LineStyle, usize)> {
    alt((
        ('-', take_while(1.., '.'), '-').map(|(_, dots, _): (char, &str, char)| {
            (LineStyle::Dotted, dots.len() + 2)
        }),
        take_while(2.., '=').map(|s: &str| (LineStyle::Thick, s.len())),
        take_while(2.., '-').map(|s: &str| (LineStyle::Solid, s.len())),
    ))
    .context(Context::Label("edge"))
    .parse_next(input)
}

/// Parse the `graph TD` header, returning the direction keyword if present
fn header<'src>(input: &mut &'src str) -> IResult<Option<&'src str>> {
    (alt(("flowchart", "graph")), opt(preceded(space1, keyword)), space0)
        .map(|(_, direction, _)| direction)
        .context(Context::Label("diagram header"))
        .parse_next(input)
}

/// Closing part of `-- text -->`
fn solid_close(input: &mut &str) -> IResult<()> {
    take_while(2.., '-').void().parse_next(input)
}

/// Closing part of `== text ==>`
fn thick_close(input: &mut &str) -> IResult<()> {
    take_while(2.., '=').void().parse_next(input)
}

/// Closing part of `-. text .->`
fn dotted_close(input: &mut &str) -> IResult<()> {
    (take_while(1.., '.'), '-').void().parse_next(input)
}

/// Parses the header statement.
///
/// Returns the direction keyword (if any) and its span.
pub(crate) fn parse_header<'src>(
    raw: &RawStatement<'src>,
) -> Result<Option<Spanned<&'src str>>, Diagnostic> {
    let mut input = raw.text;
    let parser = StatementParser::new(raw);

    let direction = match header.parse_next(&mut input) {
        Ok(direction) => direction,
        Err(_) => {
            let kind = raw.text.split_whitespace().next().unwrap_or(raw.text);
            return Err(Diagnostic::error(format!("unsupported diagram type `{kind}`"))
                .with_code(ErrorCode::E102)
                .with_label(Span::new(raw.offset..raw.offset + kind.len()), "diagram type")
                .with_help("only `graph` and `flowchart` diagrams are supported"));
        }
    };

    if !input.is_empty() {
        return Err(parser.unexpected(input, "end of header"));
    }

    Ok(direction.map(|keyword| {
        let start = raw.offset + keyword.as_ptr() as usize - raw.text.as_ptr() as usize;
        Spanned::new(keyword, Span::new(start..start + keyword.len()))
    }))
}

/// Parses one statement after the header.
pub(crate) fn parse_statement(raw: &RawStatement<'_>) -> Result<Statement, Diagnostic> {
    StatementParser::new(raw).statement()
}

/// Parses a single statement, converting positions in the statement text into
/// block-relative spans.
struct StatementParser<'src> {
    text: &'src str,
    offset: usize,
}

impl<'src> StatementParser<'src> {
    fn new(raw: &RawStatement<'src>) -> Self {
        Self {
            text: raw.text,
            offset: raw.offset,
        }
    }

    /// Block-relative offset of the remaining input.
    fn pos(&self, rest: &str) -> usize {
        self.offset + self.text.len() - rest.len()
    }

    fn span_from(&self, start: usize, rest: &str) -> Span {
        Span::new(start..self.pos(rest))
    }

    fn statement(&self) -> Result<Statement, Diagnostic> {
        let mut input = self.text;
        let word_end = self
            .text
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or(self.text.len());
        let word = &self.text[..word_end];
        let has_args = self.text[word_end..].starts_with(char::is_whitespace);

        match word {
            "end" if word_end == self.text.len() => Ok(Statement::End(self.span_from(
                self.offset,
                &self.text[word_end..],
            ))),
            "subgraph" if has_args || word_end == self.text.len() => {
                input = &input[word_end..];
                self.subgraph(&mut input)
            }
            "classDef" if has_args => {
                input = &input[word_end..];
                self.class_def(&mut input)
            }
            "class" if has_args => {
                input = &input[word_end..];
                self.class(&mut input)
            }
            "style" if has_args => {
                input = &input[word_end..];
                self.style(&mut input)
            }
            "linkStyle" | "click" | "direction" if has_args => {
                let keyword = match word {
                    "linkStyle" => "linkStyle",
                    "click" => "click",
                    _ => "direction",
                };
                Ok(Statement::Ignored {
                    keyword,
                    span: Span::new(self.offset..self.offset + self.text.len()),
                })
            }
            _ => self.chain(&mut input),
        }
    }

    /// `subgraph id`, `subgraph id [Title]`, `subgraph "Title"` or `subgraph Free text`
    fn subgraph(&self, input: &mut &'src str) -> Result<Statement, Diagnostic> {
        let _ = ws0(input);
        let start = self.pos(input);

        if input.is_empty() {
            return Err(Diagnostic::error("subgraph is missing a name")
                .with_code(ErrorCode::E101)
                .with_label(
                    Span::new(self.offset..self.offset + self.text.len()),
                    "subgraph declared here",
                )
                .with_help("name the subgraph, e.g. `subgraph backend [Backend]`"));
        }

        if let Some(quoted) = input.strip_prefix('"') {
            let Some(end) = quoted.find('"') else {
                return Err(unterminated_string(start, self.pos("")));
            };
            let title = quoted[..end].to_string();
            *input = &quoted[end + 1..];
            let span = self.span_from(start, input);
            self.expect_end(input)?;
            return Ok(Statement::SubgraphStart {
                id: Spanned::new(title.clone(), span),
                title,
            });
        }

        let checkpoint = *input;
        if let Ok(id) = identifier.parse_next(input) {
            let id_span = self.span_from(start, input);
            let _ = ws0(input);
            if input.is_empty() {
                return Ok(Statement::SubgraphStart {
                    id: Spanned::new(id.to_string(), id_span),
                    title: id.to_string(),
                });
            }
            if input.starts_with('[') {
                let (_, title) = self.delimited_label(input, "[", "]")?;
                self.expect_end(input)?;
                return Ok(Statement::SubgraphStart {
                    id: Spanned::new(id.to_string(), id_span),
                    title,
                });
            }
        }

        // Free text doubles as id and title
        *input = checkpoint;
        let text = input.trim().to_string();
        let span = self.span_from(start, "");
        *input = "";
        Ok(Statement::SubgraphStart {
            id: Spanned::new(text.clone(), span),
            title: text,
        })
    }

    /// `classDef name[,name] prop:value[,prop:value]`
    fn class_def(&self, input: &mut &'src str) -> Result<Statement, Diagnostic> {
        let _ = ws0(input);
        let names = self.identifier_list(input, "a class name")?;
        self.require_space(input, "style properties")?;
        let props = self.style_props(input);
        Ok(Statement::ClassDef { names, props })
    }

    /// `class A,B name`
    fn class(&self, input: &mut &'src str) -> Result<Statement, Diagnostic> {
        let _ = ws0(input);
        let nodes = self.identifier_list(input, "a node id")?;
        self.require_space(input, "a class name")?;
        let class = self.spanned_identifier(input, "a class name")?;
        self.expect_end(input)?;
        Ok(Statement::Class { nodes, class })
    }

    /// `style A prop:value[,prop:value]`
    fn style(&self, input: &mut &'src str) -> Result<Statement, Diagnostic> {
        let _ = ws0(input);
        let node = self.spanned_identifier(input, "a node id")?;
        self.require_space(input, "style properties")?;
        let props = self.style_props(input);
        Ok(Statement::Style { node, props })
    }

    /// Comma-separated `key:value` pairs; values are validated later.
    fn style_props(&self, input: &mut &'src str) -> Vec<StyleProp> {
        let mut props = Vec::new();
        let mut cursor = self.pos(input);
        for part in input.split(',') {
            let part_start = cursor + (part.len() - part.trim_start().len());
            cursor += part.len() + 1;
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (key, value) = part.split_once(':').unwrap_or((part, ""));
            let key_span = Span::new(part_start..part_start + key.len());
            let value_start = (part_start + key.len() + 1).min(part_start + part.len());
            let value_span = Span::new(value_start..part_start + part.len());
            props.push(StyleProp {
                key: Spanned::new(key.trim().to_string(), key_span),
                value: Spanned::new(value.trim().to_string(), value_span),
            });
        }
        *input = "";
        props
    }

    /// `A --> B & C --> D`
    fn chain(&self, input: &mut &'src str) -> Result<Statement, Diagnostic> {
        let first = self.group(input)?;
        let mut links = Vec::new();

        loop {
            let _ = ws0(input);
            if input.is_empty() {
                break;
            }

            let op_start = self.pos(input);
            let Some(op) = self.edge(input)? else {
                return Err(self.unexpected(input, "an edge such as `-->`"));
            };
            let op_span = self.span_from(op_start, input);

            let _ = ws0(input);
            if input.is_empty() {
                return Err(Diagnostic::error("edge is missing its target node")
                    .with_code(ErrorCode::E101)
                    .with_label(op_span, "edge starts here")
                    .with_help("complete the edge, e.g. `A --> B`"));
            }

            let targets = self.group(input)?;
            links.push(Link {
                op: Spanned::new(op, op_span),
                targets,
            });
        }

        Ok(Statement::Chain { first, links })
    }

    /// One or more node mentions joined by `&`.
    fn group(&self, input: &mut &'src str) -> Result<Vec<NodeRef>, Diagnostic> {
        let mut nodes = vec![self.node_ref(input)?];
        loop {
            let checkpoint = *input;
            let _ = ws0(input);
            let Some(rest) = input.strip_prefix('&') else {
                *input = checkpoint;
                break;
            };
            *input = rest;
            let _ = ws0(input);
            nodes.push(self.node_ref(input)?);
        }
        Ok(nodes)
    }

    fn node_ref(&self, input: &mut &'src str) -> Result<NodeRef, Diagnostic> {
        let id = self.spanned_identifier(input, "a node id")?;
        let shape = self.shape(input)?;
        let class = match input.strip_prefix(":::") {
            Some(rest) => {
                *input = rest;
                Some(self.spanned_identifier(input, "a class name")?)
            }
            None => None,
        };
        Ok(NodeRef { id, shape, class })
    }

    /// Optional shape directly after a node id.
    fn shape(&self, input: &mut &'src str) -> Result<Option<(NodeShape, String)>, Diagnostic> {
        for &(open, close, shape) in SHAPES {
            if input.starts_with(open) {
                let (_, label) = self.delimited_label(input, open, close)?;
                return Ok(Some((shape, label)));
            }
        }
        Ok(None)
    }

    /// Parses `open label close`, where the label may be quoted.
    fn delimited_label(
        &self,
        input: &mut &'src str,
        open: &str,
        close: &str,
    ) -> Result<(Span, String), Diagnostic> {
        let start = self.pos(input);
        let unterminated = |at: &str| {
            Diagnostic::error(format!("unterminated label, expected `{close}`"))
                .with_code(ErrorCode::E001)
                .with_label(Span::new(start..self.pos(at)), "label starts here")
        };

        let rest = &input[open.len()..];
        let trimmed = rest.trim_start();
        let (label, after) = match trimmed.strip_prefix('"') {
            Some(quoted) => {
                let end = quoted.find('"').ok_or_else(|| unterminated(""))?;
                (&quoted[..end], quoted[end + 1..].trim_start())
            }
            None => {
                let end = rest.find(close).ok_or_else(|| unterminated(""))?;
                (rest[..end].trim(), &rest[end..])
            }
        };

        let Some(after_close) = after.strip_prefix(close) else {
            return Err(unterminated(after));
        };
        *input = after_close;

        let label = label
            .replace("<br/>", "\n")
            .replace("<br />", "\n")
            .replace("<br>", "\n");
        Ok((self.span_from(start, input), label))
    }

    /// Parses an edge operator and optional `|label|`.
    ///
    /// Returns `Ok(None)` without consuming input when no edge starts here.
    fn edge(&self, input: &mut &'src str) -> Result<Option<EdgeOp>, Diagnostic> {
        let checkpoint = *input;
        let start = self.pos(input);

        let tail = match input.strip_prefix('<') {
            Some(rest) => {
                *input = rest;
                ArrowHead::Arrow
            }
            None => ArrowHead::None,
        };

        if let Some(op) = self.inline_label_edge(input, tail, start)? {
            return Ok(Some(op));
        }

        let Ok((line, length)) = line_body(input) else {
            *input = checkpoint;
            return Ok(None);
        };
        let head = self.arrow_head(input);

        let is_open_link = match line {
            LineStyle::Dotted => true,
            LineStyle::Solid | LineStyle::Thick => length >= 3,
        };
        if head == ArrowHead::None && !is_open_link {
            return Err(if input.trim().is_empty() {
                Diagnostic::error("edge is missing its target node")
                    .with_code(ErrorCode::E101)
                    .with_label(self.span_from(start, input), "incomplete edge")
                    .with_help("complete the edge, e.g. `A --> B`")
            } else {
                self.unexpected(input, "`>` or another line character")
            });
        }
        if tail != ArrowHead::None && head == ArrowHead::None {
            return Err(Diagnostic::error("bidirectional edge needs a head on both ends")
                .with_code(ErrorCode::E100)
                .with_label(self.span_from(start, input), "edge")
                .with_help("use `<-->` or drop the `<`"));
        }

        let label = self.pipe_label(input)?;
        Ok(Some(EdgeOp {
            line,
            tail,
            head,
            label,
        }))
    }

    /// `-- text -->`, `-. text .->` and `== text ==>`
    fn inline_label_edge(
        &self,
        input: &mut &'src str,
        tail: ArrowHead,
        start: usize,
    ) -> Result<Option<EdgeOp>, Diagnostic> {
        const OPENERS: &[(&str, &str, LineStyle)] = &[
            ("--", "--", LineStyle::Solid),
            ("-.", ".-", LineStyle::Dotted),
            ("==", "==", LineStyle::Thick),
        ];

        for &(opener, closer, line) in OPENERS {
            let Some(rest) = input.strip_prefix(opener) else {
                continue;
            };
            if !rest.starts_with(char::is_whitespace) {
                continue;
            }

            let Some(end) = rest.find(closer) else {
                return Err(Diagnostic::error("edge label is never closed")
                    .with_code(ErrorCode::E101)
                    .with_label(self.span_from(start, rest), "labelled edge starts here")
                    .with_help(format!("close the label, e.g. `{opener} text {closer}>`")));
            };
            let label = rest[..end].trim().to_string();
            let mut closing = &rest[end..];

            let parsed = match line {
                LineStyle::Solid => solid_close(&mut closing),
                LineStyle::Thick => thick_close(&mut closing),
                LineStyle::Dotted => dotted_close(&mut closing),
            };
            if parsed.is_err() {
                return Err(self.unexpected(closing, "the end of the edge"));
            }

            let head = self.arrow_head(&mut closing);
            *input = closing;
            return Ok(Some(EdgeOp {
                line,
                tail,
                head,
                label: (!label.is_empty()).then_some(label),
            }));
        }

        Ok(None)
    }

    /// `>`, `o` or `x` directly after the line.
    ///
    /// A head always binds to the line, so `A--oB` is a circle edge to `B`
    /// and a target starting with `o` or `x` needs a space: `A --- oven`.
    fn arrow_head(&self, input: &mut &'src str) -> ArrowHead {
        let head = match input.chars().next() {
            Some('>') => ArrowHead::Arrow,
            Some('o') => ArrowHead::Circle,
            Some('x') => ArrowHead::Cross,
            _ => return ArrowHead::None,
        };
        *input = &input[1..];
        head
    }

    /// Optional `|label|` after an edge operator.
    fn pipe_label(&self, input: &mut &'src str) -> Result<Option<String>, Diagnostic> {
        let checkpoint = *input;
        let _ = ws0(input);
        let Some(rest) = input.strip_prefix('|') else {
            *input = checkpoint;
            return Ok(None);
        };
        let start = self.pos(input);
        let Some(end) = rest.find('|') else {
            return Err(Diagnostic::error("unterminated edge label, expected `|`")
                .with_code(ErrorCode::E001)
                .with_label(Span::new(start..self.pos("")), "label starts here"));
        };
        let label = rest[..end].trim().trim_matches('"').to_string();
        *input = &rest[end + 1..];
        Ok((!label.is_empty()).then_some(label))
    }

    fn spanned_identifier(
        &self,
        input: &mut &'src str,
        expected: &str,
    ) -> Result<Spanned<String>, Diagnostic> {
        let start = self.pos(input);
        let id = identifier
            .parse_next(input)
            .map_err(|_| self.unexpected(input, expected))?;
        Ok(Spanned::new(id.to_string(), self.span_from(start, input)))
    }

    fn identifier_list(
        &self,
        input: &mut &'src str,
        expected: &str,
    ) -> Result<Vec<Spanned<String>>, Diagnostic> {
        let mut ids = vec![self.spanned_identifier(input, expected)?];
        while let Some(rest) = input.strip_prefix(',') {
            *input = rest.trim_start();
            ids.push(self.spanned_identifier(input, expected)?);
        }
        Ok(ids)
    }

    fn require_space(&self, input: &mut &'src str, expected: &str) -> Result<(), Diagnostic> {
        ws1(input).map_err(|_| self.unexpected(input, expected))?;
        if input.is_empty() {
            return Err(self.unexpected(input, expected));
        }
        Ok(())
    }

    fn expect_end(&self, input: &mut &'src str) -> Result<(), Diagnostic> {
        if input.trim().is_empty() {
            *input = "";
            Ok(())
        } else {
            Err(self.unexpected(input.trim_start(), "end of statement"))
        }
    }

    /// Diagnostic for input that does not match what was `expected`.
    fn unexpected(&self, rest: &str, expected: &str) -> Diagnostic {
        let start = self.pos(rest);
        let Some(c) = rest.chars().next() else {
            return Diagnostic::error(format!("unexpected end of statement, expected {expected}"))
                .with_code(ErrorCode::E101)
                .with_label(Span::new(self.offset..start), "statement ends here");
        };

        let span = Span::new(start..start + c.len_utf8());
        let is_grammar_char = c.is_alphanumeric() || "-=.<>[](){}|&:;\"_ \t".contains(c);
        if is_grammar_char {
            Diagnostic::error(format!("unexpected `{c}`, expected {expected}"))
                .with_code(ErrorCode::E100)
                .with_label(span, "unexpected here")
        } else {
            Diagnostic::error(format!("unexpected character `{c}`"))
                .with_code(ErrorCode::E002)
                .with_label(span, format!("expected {expected}"))
        }
    }
}
