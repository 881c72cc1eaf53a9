//! Parser for the selection language
//!
//! Consumes the chunk sequence produced by [`lexer::chunk`](crate::lexer::chunk)
//! left to right and builds the tree with an explicit stack of partially
//! built nodes ([`ContextStack`]).
//!
//! # Grammar notes
//!
//! - There is no precedence climbing. `and` following an `or` pulls the last
//!   rule into a nested `and` context (a *regroup*), and `or` following an
//!   `and` leaves that context again, so `a or b and c` reads as
//!   `a or (b and c)`.
//! - `not` without parentheses binds exactly one following unit: the
//!   negation context closes automatically when the chunk after that unit
//!   arrives.
//! - Anything that is not an operator, reserved word, `@index,list`,
//!   `#element`, `~altloc` or bare residue name is an address:
//!   `resi[-resi2][:chain][.atom][/model]`. Each separator contributes only
//!   the segment right after it, so `1/2/3` means residue 1 of model 2.

use crate::ast::{Leaf, Operator, ResNo, Rule, SelectionNode, SelectionTree};
use crate::error::{ParseError, ParseResult};
use crate::keywords;
use crate::lexer;

// ============================================================================
// Context Stack
// ============================================================================

/// Why a context was opened; decides how it is left again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameKind {
    /// The outermost node
    Root,
    /// Opened by `(`
    Group,
    /// Opened by `not`
    Negation,
    /// Opened by `and` under an `or`
    Regroup,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    node: SelectionNode,
}

/// Stack of in-progress nodes
///
/// The root is held outside the stack, so there is always a current node.
/// A closed frame is appended to its parent as the parent's last rule.
#[derive(Debug, Default)]
pub(crate) struct ContextStack {
    root: SelectionNode,
    frames: Vec<Frame>,
}

impl ContextStack {
    #[cfg(test)]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Node receiving rules
    pub(crate) fn current(&mut self) -> &mut SelectionNode {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.node,
            None => &mut self.root,
        }
    }

    pub(crate) fn current_kind(&self) -> FrameKind {
        self.frames.last().map_or(FrameKind::Root, |frame| frame.kind)
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn push_rule(&mut self, rule: Rule) {
        self.current().rules.push(rule);
    }

    /// Open a fresh context of the given kind
    pub(crate) fn open(&mut self, kind: FrameKind, node: SelectionNode) {
        self.frames.push(Frame { kind, node });
    }

    /// Close the current context and attach it to its parent
    pub(crate) fn close(&mut self) -> ParseResult<FrameKind> {
        let frame = self.frames.pop().ok_or(ParseError::UnmatchedClose)?;
        if frame.node.rules.is_empty() {
            return Err(ParseError::EmptyGroup);
        }
        self.push_rule(Rule::Node(frame.node));
        Ok(frame.kind)
    }

    /// `)`: close contexts up to and including the innermost group, then the
    /// negation wrapping that group if there is one
    pub(crate) fn close_group(&mut self) -> ParseResult<()> {
        while self.close()? != FrameKind::Group {}
        if self.current_kind() == FrameKind::Negation {
            self.close()?;
        }
        Ok(())
    }

    /// `and` while the current operator is `or`
    pub(crate) fn regroup_and(&mut self) {
        match self.current().rules.pop() {
            Some(last) => self.open(FrameKind::Regroup, SelectionNode::and(vec![last])),
            None => self.current().operator = Some(Operator::And),
        }
    }

    /// `or` while the current operator is `and`
    pub(crate) fn regroup_or(&mut self) -> ParseResult<()> {
        if self.current().rules.is_empty() {
            self.current().operator = Some(Operator::Or);
            return Ok(());
        }
        match self.current_kind() {
            // back to the enclosing `or`
            FrameKind::Regroup => {
                self.close()?;
            }
            FrameKind::Root => {
                let old = std::mem::take(&mut self.root);
                self.root = SelectionNode::or(vec![Rule::Node(old)]);
            }
            // regroup inside the group so `)` still finds it
            FrameKind::Group | FrameKind::Negation => {
                let current = self.current();
                let inner = SelectionNode::new(current.operator, std::mem::take(&mut current.rules));
                current.operator = Some(Operator::Or);
                current.rules.push(Rule::Node(inner));
            }
        }
        Ok(())
    }

    /// Close every remaining context and return the root
    ///
    /// A root without operator holding a single compound child collapses to
    /// that child.
    pub(crate) fn finish(mut self) -> ParseResult<SelectionNode> {
        while let Some(kind) = self.frames.last().map(|frame| frame.kind) {
            if kind == FrameKind::Group {
                return Err(ParseError::UnclosedGroup);
            }
            self.close()?;
        }

        let mut root = self.root;
        if root.rules.is_empty() {
            return Err(ParseError::NoRules);
        }
        if root.operator.is_none()
            && !root.negate
            && root.rules.len() == 1
            && matches!(root.rules[0], Rule::Node(_))
        {
            if let Some(Rule::Node(child)) = root.rules.pop() {
                return Ok(child);
            }
        }
        Ok(root)
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Progress of an unparenthesised `not`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum NotState {
    #[default]
    Inactive,
    /// Negation context opened, waiting for its unit
    Opened,
    /// Unit consumed; the next chunk closes the context
    Consumed,
}

#[derive(Debug, Default)]
struct Parser {
    stack: ContextStack,
    not: NotState,
}

impl Parser {
    fn chunk(&mut self, c: &str) -> ParseResult<()> {
        match c {
            "(" => {
                self.not = NotState::Inactive;
                self.stack.open(FrameKind::Group, SelectionNode::default());
                return Ok(());
            }
            ")" => {
                self.not = NotState::Inactive;
                return self.stack.close_group();
            }
            _ => {}
        }

        let is_not = c.eq_ignore_ascii_case("NOT");
        match self.not {
            NotState::Inactive => {}
            _ if is_not => self.not = NotState::Opened,
            NotState::Opened => self.not = NotState::Consumed,
            NotState::Consumed => {
                self.not = NotState::Inactive;
                self.stack.close()?;
            }
        }

        if c.eq_ignore_ascii_case("AND") {
            if self.stack.current().operator == Some(Operator::Or) {
                self.stack.regroup_and();
            } else {
                self.stack.current().operator = Some(Operator::And);
            }
            return Ok(());
        }
        if c.eq_ignore_ascii_case("OR") {
            if self.stack.current().operator == Some(Operator::And) {
                self.stack.regroup_or()?;
            } else {
                self.stack.current().operator = Some(Operator::Or);
            }
            return Ok(());
        }
        if is_not {
            self.not = NotState::Opened;
            self.stack.open(FrameKind::Negation, SelectionNode::default().negated());
            return Ok(());
        }

        let rule = parse_unit(c)?;
        self.stack.push_rule(rule);
        Ok(())
    }
}

/// Parse one non-operator chunk into a rule
fn parse_unit(c: &str) -> ParseResult<Rule> {
    if let Some(word) = keywords::lookup(c) {
        return Ok(word.expand());
    }
    if let Some(list) = c.strip_prefix('@') {
        return parse_atomindex(list).map(Rule::from);
    }
    if let Some(element) = c.strip_prefix('#') {
        return Ok(Leaf::element(element.to_uppercase()).into());
    }
    if let Some(altloc) = c.strip_prefix('~') {
        return Ok(Leaf::altloc(altloc).into());
    }
    if is_bare_resname(c) {
        return Ok(Leaf::resname(c.to_uppercase()).into());
    }
    parse_address(c)
}

/// One to four characters, not an address prefix, not starting with an integer
fn is_bare_resname(c: &str) -> bool {
    (1..=4).contains(&c.chars().count())
        && !c.starts_with([':', '.', '/'])
        && !has_integer_prefix(c)
}

/// Leading optional sign followed by a digit (`12`, `-3`, `1ABC`)
fn has_integer_prefix(c: &str) -> bool {
    let body = c.strip_prefix(['+', '-']).unwrap_or(c);
    body.starts_with(|ch: char| ch.is_ascii_digit())
}

/// Comma-separated global atom indices (`@0,5,12`)
fn parse_atomindex(list: &str) -> ParseResult<Leaf> {
    let indices = list
        .split(',')
        .map(|part| part.parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ParseError::InvalidAtomIndex(format!("@{list}")))?;
    Ok(Leaf::atomindex(indices))
}

/// Text before the first `sep` and the segment between the first and second
///
/// Anything after a second separator is ignored.
fn split_field(s: &str, sep: char) -> (&str, &str) {
    let mut parts = s.split(sep);
    let head = parts.next().unwrap_or(s);
    (head, parts.next().unwrap_or(""))
}

/// Parse the `resi[-resi2][:chain][.atom][/model]` shorthand
///
/// Each populated part becomes its own leaf (model, atom name, chain name,
/// residue number, in that order) so a test at any granularity only sees the
/// constraints it understands. Several leaves are joined under `and`.
pub(crate) fn parse_address(c: &str) -> ParseResult<Rule> {
    let mut rules: Vec<Rule> = Vec::with_capacity(4);

    let (rest, model) = split_field(c, '/');
    if !model.is_empty() {
        let index = model
            .parse::<usize>()
            .map_err(|_| ParseError::InvalidModel(model.to_owned()))?;
        rules.push(Leaf::model(index).into());
    }

    let (rest, atomname) = split_field(rest, '.');
    if !atomname.is_empty() {
        if atomname.chars().count() > 4 {
            return Err(ParseError::InvalidAtomName(atomname.to_owned()));
        }
        rules.push(Leaf::atomname(atomname.to_uppercase()).into());
    }

    let (resi, chainname) = split_field(rest, ':');
    if !chainname.is_empty() {
        rules.push(Leaf::chainname(chainname).into());
    }

    if !resi.is_empty() {
        rules.push(Leaf::resno(parse_resno(resi)?).into());
    }

    match rules.len() {
        0 => Err(ParseError::EmptyChunk(c.to_owned())),
        1 => Ok(rules.remove(0)),
        _ => Ok(SelectionNode::and(rules).into()),
    }
}

/// Residue number or inclusive range
///
/// A leading `-` negates the first number; `--` separates a range whose
/// upper bound is negative (`-10--5`).
pub(crate) fn parse_resno(s: &str) -> ParseResult<ResNo> {
    let (negative, body) = match s.strip_prefix('-') {
        Some(body) => (true, body),
        None => (false, s),
    };
    let number = |part: &str, negate: bool| -> ParseResult<i32> {
        let n: i32 = part
            .parse()
            .map_err(|_| ParseError::InvalidResno(s.to_owned()))?;
        Ok(if negate { -n } else { n })
    };

    if let Some((lo, hi)) = body.split_once("--") {
        return Ok(ResNo::Range(number(lo, negative)?, number(hi, true)?));
    }

    let parts: Vec<&str> = body.split('-').collect();
    match parts.as_slice() {
        [single] => Ok(ResNo::Single(number(single, negative)?)),
        [lo, hi] => Ok(ResNo::Range(number(lo, negative)?, number(hi, false)?)),
        _ => Err(ParseError::InvalidResnoRange(s.to_owned())),
    }
}

/// Parse a selection string into a tree
///
/// The empty string selects everything. Errors are returned, not stored;
/// convert with `SelectionTree::from` to get the terminal error state.
pub fn parse_selection(input: &str) -> ParseResult<SelectionTree> {
    if input.is_empty() {
        return Ok(SelectionTree::All);
    }

    let mut parser = Parser::default();
    for c in lexer::chunk(input) {
        parser.chunk(&c)?;
    }
    parser.stack.finish().map(SelectionTree::Node)
}
