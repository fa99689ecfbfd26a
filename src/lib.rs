#![allow(clippy::into_iter_on_ref)]

/// Derived from [regexpp](https://github.com/eslint-community/regexpp)
mod arena;
mod ast;
mod cache;
mod ecma_versions;
mod parser;
mod reader;
mod regexp_syntax_error;
mod unicode;
mod validator;
mod visitor;
mod wtf16;

pub use arena::Ast;
pub use ast::{
    BackreferenceRef, BackreferenceResolution, EdgeKind, EscapeCharacterKind, FlagsValue,
    LookaroundKind, ModifierFlags, Node, NodeId, NodeInterface,
};
pub use cache::{CacheKey, ParseCache};
pub use ecma_versions::EcmaVersion;
pub use parser::{Options, RegExpParser};
pub use reader::CodePoint;
pub use regexp_syntax_error::{RegExpSyntaxError, RegExpSyntaxErrorKind};
pub use validator::{EventHandler, NullHandler, RegExpValidator, ValidatePatternFlags};
pub use visitor::{Handlers, RegExpVisitor};
pub use wtf16::Wtf16;

pub extern crate id_arena;

pub type Result<T> = std::result::Result<T, RegExpSyntaxError>;

/// Parses `source` as a regex literal (`/pattern/flags`) and returns the
/// built `Ast` along with its root `RegExpLiteral` node.
pub fn parse_reg_exp_literal(source: &str, options: Options) -> Result<(Ast, NodeId)> {
    RegExpParser::new(options).parse_literal(source)
}

/// Parses `source` as a bare pattern body (no surrounding `/.../`).
pub fn parse_pattern(
    source: &str,
    options: Options,
    flags: ValidatePatternFlags,
) -> Result<(Ast, NodeId)> {
    RegExpParser::new(options).parse_pattern(source, flags)
}

/// Validates a flag string (e.g. `"gimsuy"`) without parsing any pattern.
pub fn parse_flags(source: &str, options: Options) -> Result<ast::FlagsValue> {
    RegExpParser::new(options).parse_flags(source)
}

pub fn visit_reg_exp_ast(ast: &Ast, root: NodeId, handlers: &impl Handlers) {
    RegExpVisitor::new(ast, handlers).visit(root);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(ecma_version: EcmaVersion) -> Options {
        Options {
            strict: false,
            ecma_version,
        }
    }

    #[test]
    fn parses_a_simple_alternation_literal() {
        let (ast, root) = parse_reg_exp_literal("/a(b|c)d/", Options::default()).unwrap();
        let pattern_id = match ast.node(root) {
            Node::RegExpLiteral(r) => r.pattern,
            _ => panic!("expected RegExpLiteral"),
        };
        let pattern = ast.node(pattern_id).as_pattern();
        assert_eq!(pattern.alternatives.len(), 1);
        assert_eq!(ast.node(root).raw(), "/a(b|c)d/");
    }

    #[test]
    fn duplicate_named_captures_require_branch_separation() {
        let pattern = "(?<n>x)|(?<n>y)";
        assert!(parse_pattern(pattern, options(EcmaVersion::_2024), ValidatePatternFlags::default())
            .is_err());
        assert!(parse_pattern(pattern, options(EcmaVersion::_2025), ValidatePatternFlags::default())
            .is_ok());
    }

    #[test]
    fn quantifier_bounds_out_of_order_is_rejected() {
        let err = parse_pattern(
            "a{3,2}",
            Options::default(),
            ValidatePatternFlags {
                unicode: true,
                unicode_sets: false,
            },
        )
        .unwrap_err();
        assert_eq!(err.kind, RegExpSyntaxErrorKind::InvalidQuantifier);
    }

    #[test]
    fn unicode_sets_class_subtraction_and_intersection_parse() {
        let (ast, pattern_id) = parse_pattern(
            "[a-z&&[^aeiou]]",
            Options::default(),
            ValidatePatternFlags {
                unicode: false,
                unicode_sets: true,
            },
        )
        .unwrap();
        let pattern = ast.node(pattern_id).as_pattern();
        let alt = ast.node(pattern.alternatives[0]);
        let elements = match alt {
            Node::Alternative(a) => &a.elements,
            _ => panic!("expected Alternative"),
        };
        assert_eq!(elements.len(), 1);
        match ast.node(elements[0]) {
            Node::ExpressionCharacterClass(_) => {}
            other => panic!("expected ExpressionCharacterClass, got {}", other.kind_name()),
        }
    }

    #[test]
    fn forward_backreference_resolves_after_its_group() {
        let (ast, pattern_id) = parse_pattern(
            r"\1(a)",
            Options::default(),
            ValidatePatternFlags::default(),
        )
        .unwrap();
        let pattern = ast.node(pattern_id).as_pattern();
        let alt = match ast.node(pattern.alternatives[0]) {
            Node::Alternative(a) => a,
            _ => panic!("expected Alternative"),
        };
        let backref = match ast.node(alt.elements[0]) {
            Node::Backreference(b) => b,
            _ => panic!("expected Backreference"),
        };
        assert!(backref.resolved.is_some());
        assert!(!backref.ambiguous());
    }

    #[test]
    fn mixing_intersection_and_subtraction_is_rejected() {
        let err = parse_pattern(
            "[a-z--[aeiou]&&[a-m]]",
            Options::default(),
            ValidatePatternFlags {
                unicode: false,
                unicode_sets: true,
            },
        )
        .unwrap_err();
        assert_eq!(err.kind, RegExpSyntaxErrorKind::InvalidCharacterClass);
    }

    #[test]
    fn pattern_exceeding_the_length_cap_is_rejected() {
        let huge = "a".repeat(crate::validator::MAX_PATTERN_LENGTH + 1);
        let err = parse_pattern(&huge, Options::default(), ValidatePatternFlags::default())
            .unwrap_err();
        assert_eq!(err.kind, RegExpSyntaxErrorKind::PatternTooLarge);
    }

    #[test]
    fn visiting_a_literal_reaches_every_character() {
        use std::cell::Cell;

        struct CountCharacters(Cell<usize>);
        impl Handlers for CountCharacters {
            fn on_character_enter(&self, _node: NodeId) {
                self.0.set(self.0.get() + 1);
            }
        }

        let (ast, root) = parse_reg_exp_literal("/abc/", Options::default()).unwrap();
        let counter = CountCharacters(Cell::new(0));
        visit_reg_exp_ast(&ast, root, &counter);
        assert_eq!(counter.0.get(), 3);
    }
}
