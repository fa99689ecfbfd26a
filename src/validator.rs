use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    ast::{BackreferenceRef, EdgeKind, EscapeCharacterKind, FlagsValue, LookaroundKind, ModifierFlags},
    ecma_versions::EcmaVersion,
    reader::{CodePoint, Reader},
    regexp_syntax_error::{RegExpSyntaxError, RegExpSyntaxErrorKind as Kind},
    unicode::{
        is_id_continue, is_id_start, is_line_terminator,
        properties::{
            is_valid_lone_unicode_property, is_valid_lone_unicode_property_of_string,
            is_valid_unicode_property,
        },
    },
    wtf16::Wtf16,
    Result,
};

/// Refuse inputs larger than this many UTF-16 code units (spec.md §5).
pub const MAX_PATTERN_LENGTH: usize = 1024 * 1024;

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Options {
    pub strict: bool,
    pub ecma_version: EcmaVersion,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidatePatternFlags {
    pub unicode: bool,
    pub unicode_sets: bool,
}

/// The builder-event sink the Validator drives (spec.md §6.2). All methods
/// default to no-ops so a pure syntax-checker can use `NullHandler`, and an
/// AST assembler only overrides the events it cares about.
#[allow(unused_variables)]
pub trait EventHandler {
    fn on_pattern_enter(&mut self, start: usize) {}
    fn on_pattern_leave(&mut self, start: usize, end: usize) {}
    fn on_disjunction_enter(&mut self, start: usize) {}
    fn on_disjunction_leave(&mut self, start: usize, end: usize) {}
    fn on_alternative_enter(&mut self, start: usize, index: usize) {}
    fn on_alternative_leave(&mut self, start: usize, end: usize, index: usize) {}
    fn on_group_enter(&mut self, start: usize) {}
    fn on_group_leave(&mut self, start: usize, end: usize) {}
    fn on_modifiers_enter(&mut self, start: usize) {}
    fn on_modifiers_leave(&mut self, start: usize, end: usize) {}
    fn on_add_modifiers(&mut self, start: usize, end: usize, flags: ModifierFlags) {}
    fn on_remove_modifiers(&mut self, start: usize, end: usize, flags: ModifierFlags) {}
    fn on_capturing_group_enter(&mut self, start: usize, name: Option<&str>) {}
    fn on_capturing_group_leave(&mut self, start: usize, end: usize, name: Option<&str>) {}
    fn on_quantifier(&mut self, start: usize, end: usize, min: u32, max: u32, greedy: bool) {}
    fn on_lookaround_assertion_enter(&mut self, start: usize, kind: LookaroundKind, negate: bool) {}
    fn on_lookaround_assertion_leave(
        &mut self,
        start: usize,
        end: usize,
        kind: LookaroundKind,
        negate: bool,
    ) {
    }
    fn on_edge_assertion(&mut self, start: usize, end: usize, kind: EdgeKind) {}
    fn on_word_boundary_assertion(&mut self, start: usize, end: usize, negate: bool) {}
    fn on_any_character_set(&mut self, start: usize, end: usize) {}
    fn on_escape_character_set(
        &mut self,
        start: usize,
        end: usize,
        kind: EscapeCharacterKind,
        negate: bool,
    ) {
    }
    fn on_unicode_property_character_set(
        &mut self,
        start: usize,
        end: usize,
        key: &str,
        value: Option<&str>,
        negate: bool,
        strings: bool,
    ) {
    }
    fn on_character(&mut self, start: usize, end: usize, value: CodePoint) {}
    fn on_backreference(&mut self, start: usize, end: usize, ref_: &BackreferenceRef) {}
    fn on_character_class_enter(&mut self, start: usize, negate: bool, unicode_sets: bool) {}
    fn on_character_class_leave(&mut self, start: usize, end: usize, negate: bool) {}
    fn on_character_class_range(&mut self, start: usize, end: usize, min: CodePoint, max: CodePoint) {}
    fn on_class_intersection(&mut self, start: usize, end: usize) {}
    fn on_class_subtraction(&mut self, start: usize, end: usize) {}
    fn on_class_string_disjunction_enter(&mut self, start: usize) {}
    fn on_class_string_disjunction_leave(&mut self, start: usize, end: usize) {}
    fn on_string_alternative_enter(&mut self, start: usize, index: usize) {}
    fn on_string_alternative_leave(&mut self, start: usize, end: usize, index: usize) {}
}

/// An `EventHandler` that discards everything: the "no allocation" fast
/// syntax-check mode from the Design Notes' "dual validator/parser mode".
#[derive(Default)]
pub struct NullHandler;

impl EventHandler for NullHandler {}

// ---- ASCII code points used throughout the grammar ----
mod cc {
    use crate::reader::CodePoint;
    pub const BACKSLASH: CodePoint = 0x5c;
    pub const SLASH: CodePoint = 0x2f;
    pub const LPAREN: CodePoint = 0x28;
    pub const RPAREN: CodePoint = 0x29;
    pub const LBRACKET: CodePoint = 0x5b;
    pub const RBRACKET: CodePoint = 0x5d;
    pub const LBRACE: CodePoint = 0x7b;
    pub const RBRACE: CodePoint = 0x7d;
    pub const CARET: CodePoint = 0x5e;
    pub const DOLLAR: CodePoint = 0x24;
    pub const DOT: CodePoint = 0x2e;
    pub const STAR: CodePoint = 0x2a;
    pub const PLUS: CodePoint = 0x2b;
    pub const QUESTION: CodePoint = 0x3f;
    pub const PIPE: CodePoint = 0x7c;
    pub const COMMA: CodePoint = 0x2c;
    pub const HYPHEN: CodePoint = 0x2d;
    pub const COLON: CodePoint = 0x3a;
    pub const EQUALS: CodePoint = 0x3d;
    pub const BANG: CodePoint = 0x21;
    pub const LT: CodePoint = 0x3c;
    pub const GT: CodePoint = 0x3e;
    pub const AMP: CodePoint = 0x26;
    pub const B: CodePoint = 0x62;
    pub const B_CAP: CodePoint = 0x42;
    pub const D: CodePoint = 0x64;
    pub const D_CAP: CodePoint = 0x44;
    pub const S: CodePoint = 0x73;
    pub const S_CAP: CodePoint = 0x53;
    pub const W: CodePoint = 0x77;
    pub const W_CAP: CodePoint = 0x57;
    pub const P: CodePoint = 0x70;
    pub const P_CAP: CodePoint = 0x50;
    pub const K: CodePoint = 0x6b;
    pub const Q: CodePoint = 0x71;
    pub const U: CodePoint = 0x75;
    pub const X: CodePoint = 0x78;
    pub const C: CodePoint = 0x63;
    pub const F: CodePoint = 0x66;
    pub const N: CodePoint = 0x6e;
    pub const R: CodePoint = 0x72;
    pub const T: CodePoint = 0x74;
    pub const V: CodePoint = 0x76;
    pub const I: CodePoint = 0x69;
    pub const M: CodePoint = 0x6d;
    pub const S_LOWER: CodePoint = 0x73;
    pub const ZERO: CodePoint = 0x30;
}

fn is_syntax_character(cp: CodePoint) -> bool {
    matches!(
        cp,
        0x24 | 0x28 | 0x29 | 0x2a | 0x2b | 0x2e | 0x3f | 0x5b | 0x5c | 0x5d | 0x5e | 0x7b | 0x7c
            | 0x7d
    )
}

/// Annex B's `ExtendedPatternCharacter`: any SourceCharacter but
/// `^ $ \ . * + ? ( ) [ |`. Unlike the strict/`u`/`v` grammar, `]`, `{` and
/// `}` are ordinary literal characters here unless consumed by the class or
/// quantifier productions first.
fn is_annex_b_syntax_character(cp: CodePoint) -> bool {
    matches!(
        cp,
        0x24 | 0x28 | 0x29 | 0x2a | 0x2b | 0x2e | 0x3f | 0x5b | 0x5c | 0x5e | 0x7c
    )
}

fn is_class_set_syntax_character(cp: CodePoint) -> bool {
    matches!(cp, 0x28 | 0x29 | 0x2d | 0x2f | 0x5b | 0x5c | 0x5d | 0x7b | 0x7d | 0x7c)
}

fn is_class_set_reserved_double_punctuator(cp: CodePoint) -> bool {
    matches!(
        cp,
        0x21 | 0x23 | 0x24 | 0x25 | 0x26 | 0x2a | 0x2b | 0x2c | 0x2e | 0x3a | 0x3b | 0x3c | 0x3d
            | 0x3e | 0x3f | 0x40 | 0x5e | 0x60 | 0x7e
    )
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TermKind {
    Other,
    Lookahead,
}

/// The ES2025 branch-identity tree (spec.md §4.2.4). Lives only for the
/// duration of one parse.
struct BranchArena {
    parents: Vec<Option<usize>>,
}

impl BranchArena {
    fn new() -> Self {
        Self {
            parents: vec![None],
        }
    }

    fn push_child(&mut self, parent: usize) -> usize {
        self.parents.push(Some(parent));
        self.parents.len() - 1
    }

    fn parent_of(&self, node: usize) -> Option<usize> {
        self.parents[node]
    }

    fn separated(&self, a: usize, b: usize) -> bool {
        if a == b {
            return false;
        }
        if let (Some(pa), Some(pb)) = (self.parent_of(a), self.parent_of(b)) {
            if pa == pb {
                return true;
            }
        }
        let via_a = self.parent_of(a).is_some_and(|pa| self.separated(pa, b));
        let via_b = self.parent_of(b).is_some_and(|pb| self.separated(a, pb));
        via_a || via_b
    }
}

/// Recursive-descent parser/validator driver (spec.md §4.2). Construct with
/// [`RegExpValidator::new`] and call one of the three public entry points.
pub struct RegExpValidator {
    options: Options,
}

impl RegExpValidator {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn validate_literal(
        &self,
        source: &str,
        handler: &mut impl EventHandler,
    ) -> Result<FlagsValue> {
        self.log_rejection(source, self.validate_literal_impl(source, handler))
    }

    fn validate_literal_impl(
        &self,
        source: &str,
        handler: &mut impl EventHandler,
    ) -> Result<FlagsValue> {
        let wtf16: Wtf16 = source.into();
        if wtf16.len() < 2 || wtf16[0] != cc::SLASH as u16 {
            return Err(RegExpSyntaxError::new(
                0,
                Kind::InvalidGrammar,
                "a regex literal must be wrapped in '/'",
            ));
        }
        let body_end = find_last_slash(&wtf16).ok_or_else(|| {
            RegExpSyntaxError::new(
                0,
                Kind::InvalidGrammar,
                "a regex literal must be wrapped in '/'",
            )
        })?;
        let flags_str = wtf16.slice(body_end + 1, wtf16.len());
        let flags = self.validate_flags_units(flags_str, body_end + 1)?;
        let pattern_flags = ValidatePatternFlags {
            unicode: flags.unicode,
            unicode_sets: flags.unicode_sets,
        };
        self.validate_pattern_span(&wtf16, 1, body_end, pattern_flags, handler)?;
        Ok(flags)
    }

    pub fn validate_flags(&self, source: &str) -> Result<FlagsValue> {
        let wtf16: Wtf16 = source.into();
        self.log_rejection(source, self.validate_flags_units(&wtf16, 0))
    }

    pub fn validate_pattern(
        &self,
        source: &str,
        flags: ValidatePatternFlags,
        handler: &mut impl EventHandler,
    ) -> Result<()> {
        let wtf16: Wtf16 = source.into();
        let len = wtf16.len();
        self.log_rejection(source, self.validate_pattern_span(&wtf16, 0, len, flags, handler))
    }

    fn log_rejection<T>(&self, source: &str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            log::debug!("rejected {source:?}: {e}");
        }
        result
    }

    fn validate_flags_units(&self, units: &[u16], base_offset: usize) -> Result<FlagsValue> {
        let mut seen = HashSet::new();
        let mut flags = FlagsValue::default();
        for (i, &unit) in units.iter().enumerate() {
            let c = unit as u32;
            if !seen.insert(unit) {
                return Err(RegExpSyntaxError::new(
                    base_offset + i,
                    Kind::InvalidFlags,
                    "Duplicated flag",
                ));
            }
            match char::from_u32(c) {
                Some('g') => flags.global = true,
                Some('i') => flags.ignore_case = true,
                Some('m') => flags.multiline = true,
                Some('u') => flags.unicode = true,
                Some('y') => flags.sticky = true,
                Some('s') => flags.dot_all = true,
                Some('d') => flags.has_indices = true,
                Some('v') => flags.unicode_sets = true,
                _ => {
                    return Err(RegExpSyntaxError::new(
                        base_offset + i,
                        Kind::InvalidFlags,
                        "Invalid flag",
                    ))
                }
            }
        }
        if flags.unicode && flags.unicode_sets {
            return Err(RegExpSyntaxError::new(
                base_offset,
                Kind::InvalidFlags,
                "The 'u' and 'v' flags are mutually exclusive",
            ));
        }
        Ok(flags)
    }

    fn validate_pattern_span(
        &self,
        source: &Wtf16,
        start: usize,
        end: usize,
        pattern_flags: ValidatePatternFlags,
        handler: &mut impl EventHandler,
    ) -> Result<()> {
        if end - start > MAX_PATTERN_LENGTH {
            return Err(RegExpSyntaxError::new(
                start,
                Kind::PatternTooLarge,
                "pattern exceeds the maximum supported length",
            ));
        }
        if pattern_flags.unicode && pattern_flags.unicode_sets {
            return Err(RegExpSyntaxError::new(
                start,
                Kind::InvalidFlags,
                "The 'u' and 'v' flags are mutually exclusive",
            ));
        }

        let (num_capturing_parens, group_names) = pre_scan(
            source,
            start,
            end,
            pattern_flags.unicode || pattern_flags.unicode_sets,
        );

        let mut ctx = Ctx {
            reader: Reader::default(),
            source,
            strict: self.options.strict || pattern_flags.unicode_sets,
            ecma_version: self.options.ecma_version,
            unicode: pattern_flags.unicode,
            unicode_sets: pattern_flags.unicode_sets,
            handler,
            num_capturing_parens,
            group_names,
            seen_group_names: IndexMap::new(),
            branches: BranchArena::new(),
            branch_cursor: 0,
            branch_stack: Vec::new(),
        };
        ctx.reader
            .reset(source, start, end, ctx.unicode || ctx.unicode_sets);
        ctx.parse_pattern()
    }
}

/// Finds the index of the closing `/`, walking back past trailing flag
/// letters (`gimsuyvd`). Returns `None` if the literal has no such slash.
pub(crate) fn find_last_slash(units: &Wtf16) -> Option<usize> {
    let mut i = units.len();
    while i > 1 && matches!(units[i - 1] as u32, 0x61..=0x7a) {
        i -= 1;
    }
    if i == 0 || units[i - 1] != cc::SLASH as u16 {
        return None;
    }
    Some(i - 1)
}

/// Lightweight pre-scan (spec.md §4.2.3): counts capturing groups and
/// collects every capture name, permissively, so forward/ambiguous
/// backreferences can be validated during the real parse.
fn pre_scan(source: &Wtf16, start: usize, end: usize, unicode: bool) -> (usize, HashSet<String>) {
    let mut reader = Reader::default();
    reader.reset(source, start, end, unicode);
    let mut count = 0;
    let mut names = HashSet::new();
    let mut class_depth: i32 = 0;

    while let Some(cp) = reader.current() {
        if cp == cc::BACKSLASH {
            reader.advance();
            reader.advance();
            continue;
        }
        if cp == cc::LBRACKET {
            class_depth += 1;
            reader.advance();
            continue;
        }
        if cp == cc::RBRACKET {
            if class_depth > 0 {
                class_depth -= 1;
            }
            reader.advance();
            continue;
        }
        if class_depth == 0 && cp == cc::LPAREN {
            if reader.peek(1) == Some(cc::QUESTION) {
                let third = reader.peek(2);
                if third == Some(cc::LT)
                    && !matches!(reader.peek(3), Some(c) if c == cc::EQUALS || c == cc::BANG)
                {
                    reader.advance_n(3);
                    count += 1;
                    if let Some(name) = read_group_name_permissive(&mut reader) {
                        names.insert(name);
                    }
                    continue;
                }
                reader.advance();
                continue;
            }
            count += 1;
            reader.advance();
            continue;
        }
        reader.advance();
    }
    (count, names)
}

fn read_group_name_permissive(reader: &mut Reader) -> Option<String> {
    let mut s = String::new();
    loop {
        match reader.current() {
            Some(cc::GT) => {
                reader.advance();
                return Some(s);
            }
            None => return None,
            Some(cc::BACKSLASH) => {
                reader.advance();
                if reader.eat(cc::U) {
                    if let Some(cp) = reader.eat_reg_exp_unicode_escape_sequence(true) {
                        if let Some(c) = char::from_u32(cp) {
                            s.push(c);
                        }
                        continue;
                    }
                }
                return None;
            }
            Some(cp) => {
                if let Some(c) = char::from_u32(cp) {
                    s.push(c);
                }
                reader.advance();
            }
        }
    }
}

struct Ctx<'h, 's, H: EventHandler> {
    reader: Reader,
    source: &'s Wtf16,
    strict: bool,
    ecma_version: EcmaVersion,
    unicode: bool,
    unicode_sets: bool,
    handler: &'h mut H,
    num_capturing_parens: usize,
    group_names: HashSet<String>,
    /// name -> branch ids where it has been declared so far in this parse.
    seen_group_names: IndexMap<String, Vec<usize>>,
    branches: BranchArena,
    branch_cursor: usize,
    branch_stack: Vec<usize>,
}

impl<'h, 's, H: EventHandler> Ctx<'h, 's, H> {
    fn annex_b(&self) -> bool {
        !self.strict && !self.unicode && !self.unicode_sets
    }

    fn err(&self, offset: usize, kind: Kind, msg: impl Into<String>) -> RegExpSyntaxError {
        RegExpSyntaxError::new(offset, kind, msg.into())
    }

    fn feature_since(&self, offset: usize, version: EcmaVersion, feature: &str) -> Result<()> {
        log::trace!("entering edition-gated branch: {feature} (requires {version:?})");
        if self.ecma_version < version {
            return Err(self.err(
                offset,
                Kind::InvalidGrammar,
                format!("{feature} requires a later ECMAScript edition"),
            ));
        }
        Ok(())
    }

    // ---- Pattern / Disjunction / Alternative ----

    fn parse_pattern(&mut self) -> Result<()> {
        let start = self.reader.offset();
        self.handler.on_pattern_enter(start);
        self.consume_disjunction()?;
        if let Some(cp) = self.reader.current() {
            let kind = if cp == cc::RPAREN {
                Kind::UnterminatedGroup
            } else if cp == cc::RBRACKET && !self.unicode && !self.unicode_sets {
                Kind::InvalidCharacterClass
            } else {
                Kind::InvalidGrammar
            };
            return Err(self.err(self.reader.offset(), kind, "Unexpected character"));
        }
        let end = self.reader.offset();
        self.handler.on_pattern_leave(start, end);
        Ok(())
    }

    fn enter_disjunction(&mut self) -> usize {
        let parent_before = self.branch_cursor;
        self.branch_stack.push(parent_before);
        self.branch_cursor = self.branches.push_child(parent_before);
        parent_before
    }

    fn leave_disjunction(&mut self) {
        self.branch_cursor = self.branch_stack.pop().expect("unbalanced disjunction");
    }

    fn consume_disjunction(&mut self) -> Result<()> {
        let start = self.reader.offset();
        self.handler.on_disjunction_enter(start);
        let disjunction_parent = self.enter_disjunction();
        let mut index = 0;
        loop {
            if index > 0 {
                self.branch_cursor = self.branches.push_child(disjunction_parent);
            }
            self.consume_alternative(index)?;
            if !self.reader.eat(cc::PIPE) {
                break;
            }
            index += 1;
        }
        let end = self.reader.offset();
        self.leave_disjunction();
        self.handler.on_disjunction_leave(start, end);
        Ok(())
    }

    fn consume_alternative(&mut self, index: usize) -> Result<()> {
        let start = self.reader.offset();
        self.handler.on_alternative_enter(start, index);
        while self.consume_term()? {}
        let end = self.reader.offset();
        self.handler.on_alternative_leave(start, end, index);
        Ok(())
    }

    // ---- Term ----

    fn at_disjunction_end(&self) -> bool {
        matches!(self.reader.current(), None | Some(cc::PIPE) | Some(cc::RPAREN))
    }

    fn consume_term(&mut self) -> Result<bool> {
        if self.at_disjunction_end() {
            return Ok(false);
        }
        let start = self.reader.offset();

        if let Some(kind) = self.try_consume_assertion()? {
            if self.at_quantifier_start() {
                let quantifiable = kind == TermKind::Lookahead && self.annex_b();
                if !quantifiable {
                    return Err(self.err(start, Kind::InvalidQuantifier, "Nothing to repeat"));
                }
                self.consume_quantifier(start)?;
            }
            return Ok(true);
        }

        if self.try_consume_atom()? {
            if self.at_quantifier_start() {
                self.consume_quantifier(start)?;
            }
            return Ok(true);
        }

        Ok(false)
    }

    fn at_quantifier_start(&self) -> bool {
        match self.reader.current() {
            Some(cc::STAR) | Some(cc::PLUS) | Some(cc::QUESTION) => true,
            Some(cc::LBRACE) => self.looks_like_quantifier_braces(),
            _ => false,
        }
    }

    fn looks_like_quantifier_braces(&self) -> bool {
        let mut peek = 1;
        let mut saw_digit = false;
        loop {
            match self.reader.peek(peek) {
                Some(cp) if (0x30..=0x39).contains(&cp) => {
                    saw_digit = true;
                    peek += 1;
                }
                Some(cc::COMMA) if saw_digit || peek == 1 => {
                    peek += 1;
                    loop {
                        match self.reader.peek(peek) {
                            Some(cp) if (0x30..=0x39).contains(&cp) => peek += 1,
                            Some(cc::RBRACE) => return true,
                            _ => return !self.unicode && !self.unicode_sets && saw_digit,
                        }
                    }
                }
                Some(cc::RBRACE) => return saw_digit,
                _ => return false,
            }
        }
    }

    fn consume_quantifier(&mut self, elem_start: usize) -> Result<()> {
        let mut brace_start = elem_start;
        let (min, max) = if self.reader.eat(cc::STAR) {
            (0, u32::MAX)
        } else if self.reader.eat(cc::PLUS) {
            (1, u32::MAX)
        } else if self.reader.eat(cc::QUESTION) {
            (0, 1)
        } else {
            brace_start = self.reader.offset();
            self.reader.eat(cc::LBRACE);
            let min = self.reader.eat_decimal_digits().unwrap_or(0) as u32;
            let max = if self.reader.eat(cc::COMMA) {
                self.reader.eat_decimal_digits().map(|v| v as u32)
            } else {
                Some(min)
            };
            if !self.reader.eat(cc::RBRACE) {
                return Err(self.err(
                    self.reader.offset(),
                    Kind::InvalidQuantifier,
                    "Incomplete quantifier",
                ));
            }
            (min, max.unwrap_or(u32::MAX))
        };
        let greedy = !self.reader.eat(cc::QUESTION);
        if min > max {
            return Err(self.err(brace_start, Kind::InvalidQuantifier, "numbers out of order in quantifier"));
        }
        let end = self.reader.offset();
        self.handler.on_quantifier(elem_start, end, min, max, greedy);
        Ok(())
    }

    // ---- Assertion ----

    fn try_consume_assertion(&mut self) -> Result<Option<TermKind>> {
        let start = self.reader.offset();
        if self.reader.eat(cc::CARET) {
            self.handler.on_edge_assertion(start, self.reader.offset(), EdgeKind::Start);
            return Ok(Some(TermKind::Other));
        }
        if self.reader.eat(cc::DOLLAR) {
            self.handler.on_edge_assertion(start, self.reader.offset(), EdgeKind::End);
            return Ok(Some(TermKind::Other));
        }
        if self.reader.eat2(cc::BACKSLASH, cc::B_CAP) {
            self.handler
                .on_word_boundary_assertion(start, self.reader.offset(), true);
            return Ok(Some(TermKind::Other));
        }
        if self.reader.eat2(cc::BACKSLASH, cc::B) {
            self.handler
                .on_word_boundary_assertion(start, self.reader.offset(), false);
            return Ok(Some(TermKind::Other));
        }
        if self.reader.current() == Some(cc::LPAREN) && self.reader.peek(1) == Some(cc::QUESTION) {
            let (kind, negate, consumed) = match (self.reader.peek(2), self.reader.peek(3)) {
                (Some(cc::EQUALS), _) => (LookaroundKind::Lookahead, false, 3),
                (Some(cc::BANG), _) => (LookaroundKind::Lookahead, true, 3),
                (Some(cc::LT), Some(cc::EQUALS)) => (LookaroundKind::Lookbehind, false, 4),
                (Some(cc::LT), Some(cc::BANG)) => (LookaroundKind::Lookbehind, true, 4),
                _ => return Ok(None),
            };
            if kind == LookaroundKind::Lookbehind {
                self.feature_since(start, EcmaVersion::_2018, "lookbehind assertions")?;
            }
            self.reader.advance_n(consumed);
            self.handler.on_lookaround_assertion_enter(start, kind, negate);
            self.consume_disjunction()?;
            if !self.reader.eat(cc::RPAREN) {
                return Err(self.err(self.reader.offset(), Kind::UnterminatedGroup, "Unterminated group"));
            }
            let end = self.reader.offset();
            self.handler.on_lookaround_assertion_leave(start, end, kind, negate);
            return Ok(Some(if kind == LookaroundKind::Lookahead {
                TermKind::Lookahead
            } else {
                TermKind::Other
            }));
        }
        Ok(None)
    }

    // ---- Atom ----

    fn try_consume_atom(&mut self) -> Result<bool> {
        let start = self.reader.offset();

        if self.reader.eat(cc::DOT) {
            self.handler.on_any_character_set(start, self.reader.offset());
            return Ok(true);
        }

        if self.reader.current() == Some(cc::LBRACKET) {
            self.consume_character_class()?;
            return Ok(true);
        }

        if self.reader.current() == Some(cc::LPAREN) {
            self.consume_group()?;
            return Ok(true);
        }

        if self.reader.eat(cc::BACKSLASH) {
            if self.consume_atom_escape()? {
                return Ok(true);
            }
            return Err(self.err(start, Kind::InvalidEscape, "Invalid escape"));
        }

        // PatternCharacter: anything but a SyntaxCharacter (strict/u/v), or
        // an ExtendedPatternCharacter (Annex B sloppy mode, which also
        // accepts a lone `]`, `{` or `}` as a literal).
        if let Some(cp) = self.reader.current() {
            let is_reserved = if self.annex_b() {
                is_annex_b_syntax_character(cp)
            } else {
                is_syntax_character(cp)
            };
            if is_reserved || cp == cc::SLASH {
                return Ok(false);
            }
            self.reader.advance();
            self.handler.on_character(start, self.reader.offset(), cp);
            return Ok(true);
        }

        Ok(false)
    }

    fn consume_group(&mut self) -> Result<()> {
        let start = self.reader.offset();
        self.reader.advance(); // '('

        if self.reader.eat(cc::QUESTION) {
            if self.reader.eat(cc::COLON) {
                self.handler.on_group_enter(start);
                self.consume_disjunction()?;
                self.finish_group(start)?;
                self.handler.on_group_leave(start, self.reader.offset());
                return Ok(());
            }
            if self.reader.current() == Some(cc::LT) && self.reader.peek(1) != Some(cc::EQUALS)
                && self.reader.peek(1) != Some(cc::BANG)
            {
                self.reader.advance();
                let name = self.consume_group_name()?;
                self.open_capturing_group(start, Some(name))?;
                return Ok(());
            }
            // ES2025 inline modifiers: (?ims-ims:...) or (?ims:...) or (?-ims:...)
            if self.ecma_version >= EcmaVersion::_2025 && self.looks_like_modifiers() {
                let add = self.consume_modifier_flags();
                let remove = if self.reader.eat(cc::HYPHEN) {
                    Some(self.consume_modifier_flags())
                } else {
                    None
                };
                if !self.reader.eat(cc::COLON) {
                    return Err(self.err(self.reader.offset(), Kind::InvalidGrammar, "Expected ':'"));
                }
                let mod_end = self.reader.offset();
                self.handler.on_group_enter(start);
                self.handler.on_modifiers_enter(start);
                if let Some(add) = add {
                    self.handler.on_add_modifiers(start, mod_end, add);
                }
                if let Some(remove) = remove.flatten() {
                    self.handler.on_remove_modifiers(start, mod_end, remove);
                }
                self.handler.on_modifiers_leave(start, mod_end);
                self.consume_disjunction()?;
                self.finish_group(start)?;
                self.handler.on_group_leave(start, self.reader.offset());
                return Ok(());
            }
            return Err(self.err(start, Kind::InvalidGrammar, "Invalid group"));
        }

        self.open_capturing_group(start, None)
    }

    fn looks_like_modifiers(&self) -> bool {
        let mut peek = 0;
        loop {
            match self.reader.peek(peek) {
                Some(cc::I) | Some(cc::S_LOWER) | Some(cc::M) => peek += 1,
                Some(cc::HYPHEN) | Some(cc::COLON) => return true,
                _ => return false,
            }
        }
    }

    fn consume_modifier_flags(&mut self) -> Option<ModifierFlags> {
        let mut flags = ModifierFlags::default();
        let mut any = false;
        loop {
            if self.reader.eat(cc::I) {
                flags.ignore_case = true;
                any = true;
            } else if self.reader.eat(cc::S_LOWER) {
                flags.dot_all = true;
                any = true;
            } else if self.reader.eat(cc::M) {
                flags.multiline = true;
                any = true;
            } else {
                break;
            }
        }
        any.then_some(flags)
    }

    fn open_capturing_group(&mut self, start: usize, name: Option<String>) -> Result<()> {
        if let Some(name) = &name {
            let branch = self.branch_cursor;
            if let Some(existing) = self.seen_group_names.get(name) {
                let duplicate_ok = self.ecma_version >= EcmaVersion::_2025
                    && existing.iter().all(|&b| self.branches.separated(branch, b));
                if !duplicate_ok {
                    return Err(self.err(
                        start,
                        Kind::InvalidNamedCapture,
                        format!("Duplicate capture group name: {name}"),
                    ));
                }
            }
            self.seen_group_names
                .entry(name.clone())
                .or_default()
                .push(branch);
        }
        self.handler.on_capturing_group_enter(start, name.as_deref());
        self.consume_disjunction()?;
        self.finish_group(start)?;
        let end = self.reader.offset();
        self.handler.on_capturing_group_leave(start, end, name.as_deref());
        Ok(())
    }

    fn finish_group(&mut self, start: usize) -> Result<()> {
        if !self.reader.eat(cc::RPAREN) {
            return Err(self.err(self.reader.offset().max(start), Kind::UnterminatedGroup, "Unterminated group"));
        }
        Ok(())
    }

    fn consume_group_name(&mut self) -> Result<String> {
        let name = self.consume_identifier(true)?;
        if !self.reader.eat(cc::GT) {
            return Err(self.err(self.reader.offset(), Kind::InvalidGrammar, "Expected '>'"));
        }
        Ok(name)
    }

    fn consume_identifier(&mut self, require_id_start: bool) -> Result<String> {
        let mut s = String::new();
        let mut first = true;
        loop {
            let checkpoint = self.reader.offset();
            let (cp, is_escape) = match self.reader.current() {
                Some(cc::BACKSLASH) if self.reader.peek(1) == Some(cc::U) => {
                    self.reader.advance_n(2);
                    let v = self
                        .reader
                        .eat_reg_exp_unicode_escape_sequence(true)
                        .ok_or_else(|| self.err(self.reader.offset(), Kind::InvalidEscape, "Invalid unicode escape"))?;
                    (v, true)
                }
                Some(cp) => (cp, false),
                None => break,
            };
            let ok = if first {
                is_id_start(cp) || cp == 0x24 || cp == 0x5f
            } else {
                is_id_continue(cp) || cp == 0x24 || cp == 0x5f || cp == 0x200c || cp == 0x200d
            };
            if !ok {
                self.reader.rewind(checkpoint);
                break;
            }
            if !is_escape {
                self.reader.advance();
            }
            if let Some(c) = char::from_u32(cp) {
                s.push(c);
            }
            first = false;
        }
        if s.is_empty() && require_id_start {
            return Err(self.err(self.reader.offset(), Kind::InvalidGrammar, "Expected identifier"));
        }
        Ok(s)
    }

    // ---- AtomEscape ----

    fn consume_atom_escape(&mut self) -> Result<bool> {
        let start = self.reader.offset() - 1;

        if let Some((kind, negate)) = self.eat_class_escape_kind() {
            self.handler
                .on_escape_character_set(start, self.reader.offset(), kind, negate);
            return Ok(true);
        }

        if self.reader.current() == Some(cc::P) || self.reader.current() == Some(cc::P_CAP) {
            if self.try_consume_unicode_property_escape(start)? {
                return Ok(true);
            }
        }

        if self.reader.current() == Some(cc::K) {
            let checkpoint = self.reader.offset();
            self.reader.advance();
            if self.reader.eat(cc::LT) {
                let name = self.consume_group_name()?;
                if !self.group_names.contains(&name) {
                    return Err(self.err(start, Kind::InvalidBackreference, format!("Invalid named capture referenced: {name}")));
                }
                let end = self.reader.offset();
                self.handler
                    .on_backreference(start, end, &BackreferenceRef::Name(name));
                return Ok(true);
            }
            if self.annex_b() && self.group_names.is_empty() {
                self.handler.on_character(start, self.reader.offset(), cc::K);
                return Ok(true);
            }
            self.reader.rewind(checkpoint);
            return Err(self.err(start, Kind::InvalidEscape, "Invalid named backreference"));
        }

        let leading_zero_octal = self.reader.current() == Some(cc::ZERO)
            && matches!(self.reader.peek(1), Some(cp) if (0x30..=0x39).contains(&cp));
        if !leading_zero_octal {
            if let Some(n) = self.reader.eat_decimal_digits() {
            if n == 0 {
                self.handler.on_character(start, self.reader.offset(), 0);
                return Ok(true);
            }
            if (n as usize) <= self.num_capturing_parens {
                let end = self.reader.offset();
                self.handler
                    .on_backreference(start, end, &BackreferenceRef::Index(n as usize));
                return Ok(true);
            }
            if self.unicode || self.unicode_sets || self.strict {
                return Err(self.err(start, Kind::InvalidBackreference, "Invalid backreference"));
            }
            // Annex B: \8, \9, or out-of-range \N fall back to octal/identity.
            self.reader.rewind(start + 1);
            if let Some(octal) = self.reader.eat_octal_digits(3) {
                self.handler.on_character(start, self.reader.offset(), octal);
                return Ok(true);
            }
            let cp = self.reader.current().unwrap();
            self.reader.advance();
            self.handler.on_character(start, self.reader.offset(), cp);
            return Ok(true);
            }
        }

        self.consume_character_escape(start)
    }

    fn eat_class_escape_kind(&mut self) -> Option<(EscapeCharacterKind, bool)> {
        if self.reader.eat(cc::D) {
            Some((EscapeCharacterKind::Digit, false))
        } else if self.reader.eat(cc::D_CAP) {
            Some((EscapeCharacterKind::Digit, true))
        } else if self.reader.eat(cc::S) {
            Some((EscapeCharacterKind::Space, false))
        } else if self.reader.eat(cc::S_CAP) {
            Some((EscapeCharacterKind::Space, true))
        } else if self.reader.eat(cc::W) {
            Some((EscapeCharacterKind::Word, false))
        } else if self.reader.eat(cc::W_CAP) {
            Some((EscapeCharacterKind::Word, true))
        } else {
            None
        }
    }

    fn try_consume_unicode_property_escape(&mut self, start: usize) -> Result<bool> {
        let negate = self.reader.peek(0) == Some(cc::P_CAP);
        let checkpoint = self.reader.offset();
        self.reader.advance(); // p/P
        if !(self.unicode || self.unicode_sets) {
            self.reader.rewind(checkpoint);
            return Ok(false);
        }
        self.feature_since(start, EcmaVersion::_2018, "unicode property escapes")?;
        if !self.reader.eat(cc::LBRACE) {
            return Err(self.err(self.reader.offset(), Kind::InvalidUnicodeProperty, "Expected '{'"));
        }
        let key = self.consume_property_name()?;
        let value = if self.reader.eat(cc::EQUALS) {
            Some(self.consume_property_name()?)
        } else {
            None
        };
        if !self.reader.eat(cc::RBRACE) {
            return Err(self.err(self.reader.offset(), Kind::InvalidUnicodeProperty, "Expected '}'"));
        }
        let strings = value.is_none()
            && self.unicode_sets
            && is_valid_lone_unicode_property_of_string(self.ecma_version, &key);
        let valid = match &value {
            Some(v) => is_valid_unicode_property(self.ecma_version, &key, v),
            None => {
                strings
                    || is_valid_lone_unicode_property(self.ecma_version, &key)
            }
        };
        if !valid {
            return Err(self.err(start, Kind::InvalidUnicodeProperty, format!("Unknown unicode property: {key}")));
        }
        if strings && negate {
            return Err(self.err(start, Kind::InvalidUnicodeProperty, "Negating a property of strings is invalid"));
        }
        let end = self.reader.offset();
        self.handler
            .on_unicode_property_character_set(start, end, &key, value.as_deref(), negate, strings);
        Ok(true)
    }

    fn consume_property_name(&mut self) -> Result<String> {
        let mut s = String::new();
        while let Some(cp) = self.reader.current() {
            if (0x41..=0x5a).contains(&cp) || (0x61..=0x7a).contains(&cp) || (0x30..=0x39).contains(&cp) || cp == 0x5f {
                s.push(char::from_u32(cp).unwrap());
                self.reader.advance();
            } else {
                break;
            }
        }
        if s.is_empty() {
            return Err(self.err(self.reader.offset(), Kind::InvalidUnicodeProperty, "Expected a property name"));
        }
        Ok(s)
    }

    fn consume_character_escape(&mut self, start: usize) -> Result<bool> {
        if let Some(cp) = self.consume_control_escape() {
            self.handler.on_character(start, self.reader.offset(), cp);
            return Ok(true);
        }
        if self.reader.eat(cc::C) {
            if let Some(cp) = self.reader.current() {
                if (0x41..=0x5a).contains(&cp) || (0x61..=0x7a).contains(&cp) {
                    self.reader.advance();
                    self.handler
                        .on_character(start, self.reader.offset(), cp % 32);
                    return Ok(true);
                }
            }
            if self.annex_b() {
                self.handler.on_character(start, self.reader.offset(), cc::BACKSLASH);
                return Ok(true);
            }
            return Err(self.err(start, Kind::InvalidEscape, "Invalid control escape"));
        }
        if self.reader.eat(cc::ZERO) {
            if matches!(self.reader.current(), Some(cp) if (0x30..=0x39).contains(&cp)) {
                if self.unicode || self.unicode_sets || self.strict {
                    return Err(self.err(start, Kind::InvalidEscape, "Invalid octal escape"));
                }
                self.reader.rewind(start + 1);
                let octal = self.reader.eat_octal_digits(3).unwrap();
                self.handler.on_character(start, self.reader.offset(), octal);
                return Ok(true);
            }
            self.handler.on_character(start, self.reader.offset(), 0);
            return Ok(true);
        }
        if matches!(self.reader.current(), Some(cp) if (0x31..=0x37).contains(&cp)) && self.annex_b() {
            let octal = self.reader.eat_octal_digits(3).unwrap();
            self.handler.on_character(start, self.reader.offset(), octal);
            return Ok(true);
        }
        if self.reader.eat(cc::X) {
            if let Some(value) = self.reader.eat_hex_digits(2, false) {
                self.handler.on_character(start, self.reader.offset(), value);
                return Ok(true);
            }
            if self.annex_b() {
                self.handler.on_character(start, self.reader.offset(), cc::X);
                return Ok(true);
            }
            return Err(self.err(start, Kind::InvalidEscape, "Invalid hex escape"));
        }
        if self.reader.eat(cc::U) {
            if let Some(value) = self
                .reader
                .eat_reg_exp_unicode_escape_sequence(self.unicode || self.unicode_sets)
            {
                self.handler.on_character(start, self.reader.offset(), value);
                return Ok(true);
            }
            if self.annex_b() {
                self.handler.on_character(start, self.reader.offset(), cc::U);
                return Ok(true);
            }
            return Err(self.err(start, Kind::InvalidEscape, "Invalid unicode escape"));
        }
        self.consume_identity_escape(start)
    }

    fn consume_control_escape(&mut self) -> Option<CodePoint> {
        let value = match self.reader.current()? {
            cc::F => 0x0c,
            cc::N => 0x0a,
            cc::R => 0x0d,
            cc::T => 0x09,
            cc::V => 0x0b,
            _ => return None,
        };
        self.reader.advance();
        Some(value)
    }

    fn consume_identity_escape(&mut self, start: usize) -> Result<bool> {
        let cp = match self.reader.current() {
            Some(cp) => cp,
            None => return Err(self.err(start, Kind::UnterminatedEscape, "Unterminated escape")),
        };
        if self.unicode || self.unicode_sets {
            if is_syntax_character(cp) || cp == cc::SLASH {
                self.reader.advance();
                self.handler.on_character(start, self.reader.offset(), cp);
                return Ok(true);
            }
            return Err(self.err(start, Kind::InvalidEscape, "Invalid identity escape"));
        }
        if self.strict && (is_id_continue(cp) || cp == cc::AMP) {
            return Err(self.err(start, Kind::InvalidEscape, "Invalid identity escape"));
        }
        if is_line_terminator(cp) {
            self.reader.advance();
            if cp == 0x0d {
                self.reader.eat(0x0a);
            }
            self.handler.on_character(start, self.reader.offset(), cp);
            return Ok(true);
        }
        self.reader.advance();
        self.handler.on_character(start, self.reader.offset(), cp);
        Ok(true)
    }

    // ---- Character class ----

    fn consume_character_class(&mut self) -> Result<()> {
        let start = self.reader.offset();
        self.reader.advance(); // '['
        let negate = self.reader.eat(cc::CARET);
        self.handler
            .on_character_class_enter(start, negate, self.unicode_sets);

        let has_operator = if self.unicode_sets {
            self.consume_class_set_contents()?
        } else {
            self.consume_legacy_class_contents()?;
            false
        };

        if !self.reader.eat(cc::RBRACKET) {
            return Err(self.err(self.reader.offset(), Kind::UnterminatedClass, "Unterminated character class"));
        }
        let end = self.reader.offset();
        let _ = has_operator; // restructure is performed by the assembler
        self.handler.on_character_class_leave(start, end, negate);
        Ok(())
    }

    fn consume_legacy_class_contents(&mut self) -> Result<()> {
        loop {
            match self.reader.current() {
                None | Some(cc::RBRACKET) => return Ok(()),
                Some(cc::BACKSLASH) => {
                    let esc_start = self.reader.offset();
                    self.reader.advance();
                    if let Some((kind, negate)) = self.eat_class_escape_kind() {
                        self.handler.on_escape_character_set(esc_start, self.reader.offset(), kind, negate);
                        continue;
                    }
                    if matches!(self.reader.current(), Some(cc::P) | Some(cc::P_CAP)) {
                        if self.try_consume_unicode_property_escape(esc_start)? {
                            continue;
                        }
                    }
                    let cp = self.consume_class_escape_character(esc_start)?;
                    self.maybe_consume_range(esc_start, cp)?;
                }
                Some(cp) => {
                    let lit_start = self.reader.offset();
                    self.reader.advance();
                    self.handler.on_character(lit_start, self.reader.offset(), cp);
                    self.maybe_consume_range(lit_start, cp)?;
                }
            }
        }
    }

    fn consume_class_escape_character(&mut self, start: usize) -> Result<CodePoint> {
        if let Some(cp) = self.consume_control_escape() {
            self.handler.on_character(start, self.reader.offset(), cp);
            return Ok(cp);
        }
        if self.reader.eat(cc::B) {
            self.handler.on_character(start, self.reader.offset(), 0x08);
            return Ok(0x08);
        }
        if self.reader.eat(cc::C) {
            if let Some(cp) = self.reader.current() {
                if (0x41..=0x5a).contains(&cp) || (0x61..=0x7a).contains(&cp) {
                    self.reader.advance();
                    let v = cp % 32;
                    self.handler.on_character(start, self.reader.offset(), v);
                    return Ok(v);
                }
            }
            self.handler.on_character(start, self.reader.offset(), cc::BACKSLASH);
            return Ok(cc::BACKSLASH);
        }
        if matches!(self.reader.current(), Some(cp) if (0x30..=0x37).contains(&cp)) {
            if self.unicode || self.unicode_sets || self.strict {
                if self.reader.current() == Some(cc::ZERO) && !matches!(self.reader.peek(1), Some(cp) if (0x30..=0x39).contains(&cp)) {
                    self.reader.advance();
                    self.handler.on_character(start, self.reader.offset(), 0);
                    return Ok(0);
                }
                return Err(self.err(start, Kind::InvalidEscape, "Invalid octal escape"));
            }
            let octal = self.reader.eat_octal_digits(3).unwrap();
            self.handler.on_character(start, self.reader.offset(), octal);
            return Ok(octal);
        }
        if self.reader.eat(cc::X) {
            if let Some(value) = self.reader.eat_hex_digits(2, false) {
                self.handler.on_character(start, self.reader.offset(), value);
                return Ok(value);
            }
            if self.annex_b() {
                self.handler.on_character(start, self.reader.offset(), cc::X);
                return Ok(cc::X);
            }
            return Err(self.err(start, Kind::InvalidEscape, "Invalid hex escape"));
        }
        if self.reader.eat(cc::U) {
            if let Some(value) = self
                .reader
                .eat_reg_exp_unicode_escape_sequence(self.unicode || self.unicode_sets)
            {
                self.handler.on_character(start, self.reader.offset(), value);
                return Ok(value);
            }
            if self.annex_b() {
                self.handler.on_character(start, self.reader.offset(), cc::U);
                return Ok(cc::U);
            }
            return Err(self.err(start, Kind::InvalidEscape, "Invalid unicode escape"));
        }
        let cp = self
            .reader
            .current()
            .ok_or_else(|| self.err(start, Kind::UnterminatedEscape, "Unterminated escape"))?;
        if self.unicode || self.unicode_sets {
            if !(is_syntax_character(cp) || cp == cc::HYPHEN || cp == cc::SLASH) {
                return Err(self.err(start, Kind::InvalidEscape, "Invalid identity escape"));
            }
        } else if self.strict && is_id_continue(cp) {
            return Err(self.err(start, Kind::InvalidEscape, "Invalid identity escape"));
        }
        self.reader.advance();
        self.handler.on_character(start, self.reader.offset(), cp);
        Ok(cp)
    }

    fn maybe_consume_range(&mut self, min_start: usize, min: CodePoint) -> Result<()> {
        if self.reader.current() == Some(cc::HYPHEN)
            && !matches!(self.reader.peek(1), None | Some(cc::RBRACKET))
        {
            let hyphen_pos = self.reader.offset();
            self.reader.advance();
            let max_start = self.reader.offset();
            let max = if self.reader.eat(cc::BACKSLASH) {
                if let Some((kind, negate)) = self.eat_class_escape_kind() {
                    // `a-\d` is not a range: rewind and emit as separate elements.
                    self.reader.rewind(hyphen_pos);
                    let _ = (kind, negate);
                    return Ok(());
                }
                self.consume_class_escape_character(max_start)?
            } else if let Some(cp) = self.reader.current() {
                if cp == cc::RBRACKET {
                    self.reader.rewind(hyphen_pos);
                    return Ok(());
                }
                self.reader.advance();
                self.handler.on_character(max_start, self.reader.offset(), cp);
                cp
            } else {
                return Err(self.err(self.reader.offset(), Kind::UnterminatedClass, "Unterminated character class"));
            };
            if min > max {
                return Err(self.err(min_start, Kind::InvalidCharacterClass, "Range out of order in character class"));
            }
            self.handler
                .on_character_class_range(min_start, self.reader.offset(), min, max);
        }
        Ok(())
    }

    // ---- v-mode class set contents ----

    /// Returns whether an intersection/subtraction operator was used
    /// anywhere in this class body (mixing is rejected inline).
    fn consume_class_set_contents(&mut self) -> Result<bool> {
        if self.reader.current() == Some(cc::RBRACKET) {
            return Ok(false);
        }
        let first = self.consume_class_set_operand()?;
        if self.reader.peek(0) == Some(cc::AMP) && self.reader.peek(1) == Some(cc::AMP) {
            loop {
                let op_start = self.reader.offset();
                if !(self.reader.eat(cc::AMP) && self.reader.eat(cc::AMP)) {
                    break;
                }
                self.consume_class_set_operand()?;
                self.handler.on_class_intersection(op_start, self.reader.offset());
                if !(self.reader.peek(0) == Some(cc::AMP) && self.reader.peek(1) == Some(cc::AMP)) {
                    break;
                }
            }
            if self.reader.peek(0) == Some(cc::HYPHEN) && self.reader.peek(1) == Some(cc::HYPHEN) {
                return Err(self.err(
                    self.reader.offset(),
                    Kind::InvalidCharacterClass,
                    "Cannot mix intersection and subtraction in one character class",
                ));
            }
            return Ok(true);
        }
        if self.reader.peek(0) == Some(cc::HYPHEN) && self.reader.peek(1) == Some(cc::HYPHEN) {
            loop {
                let op_start = self.reader.offset();
                if !(self.reader.eat(cc::HYPHEN) && self.reader.eat(cc::HYPHEN)) {
                    break;
                }
                self.consume_class_set_operand()?;
                self.handler.on_class_subtraction(op_start, self.reader.offset());
                if !(self.reader.peek(0) == Some(cc::HYPHEN) && self.reader.peek(1) == Some(cc::HYPHEN)) {
                    break;
                }
            }
            if self.reader.peek(0) == Some(cc::AMP) && self.reader.peek(1) == Some(cc::AMP) {
                return Err(self.err(
                    self.reader.offset(),
                    Kind::InvalidCharacterClass,
                    "Cannot mix intersection and subtraction in one character class",
                ));
            }
            return Ok(true);
        }
        let _ = first;
        // Plain sequence of operands (no operator): keep consuming atoms.
        while self.reader.current() != Some(cc::RBRACKET) && self.reader.current().is_some() {
            if (self.reader.peek(0) == Some(cc::AMP) && self.reader.peek(1) == Some(cc::AMP))
                || (self.reader.peek(0) == Some(cc::HYPHEN) && self.reader.peek(1) == Some(cc::HYPHEN))
            {
                return Err(self.err(
                    self.reader.offset(),
                    Kind::InvalidCharacterClass,
                    "Cannot mix intersection and subtraction in one character class",
                ));
            }
            self.consume_class_set_operand()?;
        }
        Ok(false)
    }

    fn consume_class_set_operand(&mut self) -> Result<()> {
        let start = self.reader.offset();
        if self.reader.current() == Some(cc::LBRACKET) {
            self.consume_character_class()?;
            return Ok(());
        }
        if self.reader.eat2(cc::BACKSLASH, cc::Q) {
            self.feature_since(start, EcmaVersion::_2024, "\\q{...} string disjunctions")?;
            self.consume_class_string_disjunction(start)?;
            return Ok(());
        }
        if self.reader.eat(cc::BACKSLASH) {
            if let Some((kind, negate)) = self.eat_class_escape_kind() {
                self.handler.on_escape_character_set(start, self.reader.offset(), kind, negate);
                return Ok(());
            }
            if matches!(self.reader.current(), Some(cc::P) | Some(cc::P_CAP)) {
                if self.try_consume_unicode_property_escape(start)? {
                    return Ok(());
                }
            }
            let cp = self.consume_class_escape_character(start)?;
            self.maybe_consume_class_set_range(start, cp)?;
            return Ok(());
        }
        let cp = self
            .reader
            .current()
            .ok_or_else(|| self.err(start, Kind::UnterminatedClass, "Unterminated character class"))?;
        if is_class_set_syntax_character(cp) {
            return Err(self.err(start, Kind::InvalidCharacterClass, "Unescaped syntax character in class"));
        }
        if is_class_set_reserved_double_punctuator(cp) && self.reader.peek(1) == Some(cp) {
            return Err(self.err(start, Kind::InvalidCharacterClass, "Reserved double punctuator"));
        }
        self.reader.advance();
        self.handler.on_character(start, self.reader.offset(), cp);
        self.maybe_consume_class_set_range(start, cp)?;
        Ok(())
    }

    fn maybe_consume_class_set_range(&mut self, min_start: usize, min: CodePoint) -> Result<()> {
        if self.reader.current() != Some(cc::HYPHEN) {
            return Ok(());
        }
        if matches!(self.reader.peek(1), Some(cc::HYPHEN)) {
            return Ok(()); // `--` operator, not a range
        }
        self.reader.advance();
        let max_start = self.reader.offset();
        let max = if self.reader.eat(cc::BACKSLASH) {
            self.consume_class_escape_character(max_start)?
        } else {
            let cp = self
                .reader
                .current()
                .ok_or_else(|| self.err(self.reader.offset(), Kind::UnterminatedClass, "Unterminated character class"))?;
            self.reader.advance();
            self.handler.on_character(max_start, self.reader.offset(), cp);
            cp
        };
        if min > max {
            return Err(self.err(min_start, Kind::InvalidCharacterClass, "Range out of order in character class"));
        }
        self.handler
            .on_character_class_range(min_start, self.reader.offset(), min, max);
        Ok(())
    }

    fn consume_class_string_disjunction(&mut self, start: usize) -> Result<()> {
        self.handler.on_class_string_disjunction_enter(start);
        let mut index = 0;
        loop {
            let alt_start = self.reader.offset();
            self.handler.on_string_alternative_enter(alt_start, index);
            loop {
                match self.reader.current() {
                    Some(cc::PIPE) | Some(cc::RBRACE) | None => break,
                    Some(cc::BACKSLASH) => {
                        let esc_start = self.reader.offset();
                        self.reader.advance();
                        let cp = self.consume_class_escape_character(esc_start)?;
                        let _ = cp;
                    }
                    Some(cp) => {
                        let cstart = self.reader.offset();
                        self.reader.advance();
                        self.handler.on_character(cstart, self.reader.offset(), cp);
                    }
                }
            }
            let alt_end = self.reader.offset();
            self.handler.on_string_alternative_leave(alt_start, alt_end, index);
            if !self.reader.eat(cc::PIPE) {
                break;
            }
            index += 1;
        }
        if !self.reader.eat(cc::RBRACE) {
            return Err(self.err(self.reader.offset(), Kind::UnterminatedClass, "Unterminated \\q{...}"));
        }
        self.handler
            .on_class_string_disjunction_leave(start, self.reader.offset());
        Ok(())
    }
}
