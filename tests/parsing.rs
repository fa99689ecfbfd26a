use ecma_regexp_ast::{
    parse_flags, parse_pattern, parse_reg_exp_literal, visit_reg_exp_ast, BackreferenceResolution,
    EcmaVersion, Handlers, Node, NodeId, Options, RegExpSyntaxErrorKind, ValidatePatternFlags,
};
use speculoos::prelude::*;

fn options(ecma_version: EcmaVersion) -> Options {
    Options {
        strict: false,
        ecma_version,
    }
}

fn sets_flags() -> ValidatePatternFlags {
    ValidatePatternFlags {
        unicode: false,
        unicode_sets: true,
    }
}

#[test]
fn a_capturing_alternation_has_two_alternatives_in_its_group() {
    let (ast, pattern_id) =
        parse_pattern("a(b|c)d", Options::default(), ValidatePatternFlags::default()).unwrap();
    let pattern = ast.node(pattern_id).as_pattern();
    let alt = match ast.node(pattern.alternatives[0]) {
        Node::Alternative(a) => a,
        other => panic!("expected Alternative, got {}", other.kind_name()),
    };
    assert_that!(&alt.elements.len()).is_equal_to(3);

    let group = match ast.node(alt.elements[1]) {
        Node::CapturingGroup(g) => g,
        other => panic!("expected CapturingGroup, got {}", other.kind_name()),
    };
    assert_that!(&group.alternatives.len()).is_equal_to(2);
}

#[test]
fn duplicate_named_captures_in_separate_branches_need_es2025() {
    let pattern = "(?<n>x)|(?<n>y)";

    let old = parse_pattern(pattern, options(EcmaVersion::_2024), ValidatePatternFlags::default());
    assert_that!(&old.is_err()).is_true();
    assert_that!(&old.unwrap_err().kind).is_equal_to(RegExpSyntaxErrorKind::InvalidNamedCapture);

    let new = parse_pattern(pattern, options(EcmaVersion::_2025), ValidatePatternFlags::default());
    assert_that!(&new.is_ok()).is_true();
}

#[test]
fn duplicate_named_captures_in_the_same_branch_are_always_rejected() {
    let pattern = "(?<n>x)(?<n>y)";
    let err =
        parse_pattern(pattern, options(EcmaVersion::_2025), ValidatePatternFlags::default())
            .unwrap_err();
    assert_that!(&err.kind).is_equal_to(RegExpSyntaxErrorKind::InvalidNamedCapture);
}

#[test]
fn a_quantifier_whose_bounds_are_out_of_order_is_rejected() {
    let err = parse_pattern("a{3,2}", Options::default(), sets_flags()).unwrap_err();
    assert_that!(&err.kind).is_equal_to(RegExpSyntaxErrorKind::InvalidQuantifier);
}

#[test]
fn set_notation_intersection_produces_an_expression_character_class() {
    let (ast, pattern_id) = parse_pattern("[a-z&&[^aeiou]]", Options::default(), sets_flags())
        .unwrap();
    let pattern = ast.node(pattern_id).as_pattern();
    let alt = match ast.node(pattern.alternatives[0]) {
        Node::Alternative(a) => a,
        other => panic!("expected Alternative, got {}", other.kind_name()),
    };
    assert_that!(&alt.elements.len()).is_equal_to(1);
    match ast.node(alt.elements[0]) {
        Node::ExpressionCharacterClass(n) => {
            match ast.node(n.expression) {
                Node::ClassIntersection(_) => {}
                other => panic!("expected ClassIntersection, got {}", other.kind_name()),
            }
        }
        other => panic!("expected ExpressionCharacterClass, got {}", other.kind_name()),
    }
}

#[test]
fn a_forward_backreference_resolves_once_its_group_is_seen() {
    let (ast, pattern_id) =
        parse_pattern(r"\1(a)", Options::default(), ValidatePatternFlags::default()).unwrap();
    let pattern = ast.node(pattern_id).as_pattern();
    let alt = match ast.node(pattern.alternatives[0]) {
        Node::Alternative(a) => a,
        other => panic!("expected Alternative, got {}", other.kind_name()),
    };
    let backref = match ast.node(alt.elements[0]) {
        Node::Backreference(b) => b,
        other => panic!("expected Backreference, got {}", other.kind_name()),
    };
    assert_that!(&backref.ambiguous()).is_false();
    assert_that!(&backref.resolved)
        .is_equal_to(&Some(BackreferenceResolution::One(alt.elements[1])));

    match ast.node(alt.elements[1]) {
        Node::CapturingGroup(_) => {}
        other => panic!("expected CapturingGroup, got {}", other.kind_name()),
    }
}

#[test]
fn mixing_intersection_and_subtraction_in_one_class_is_rejected() {
    let err = parse_pattern("[a-z--[aeiou]&&[a-m]]", Options::default(), sets_flags())
        .unwrap_err();
    assert_that!(&err.kind).is_equal_to(RegExpSyntaxErrorKind::InvalidCharacterClass);
}

#[test]
fn a_literal_carries_its_flags_separately_from_its_pattern() {
    let (ast, root) = parse_reg_exp_literal("/ab+c/gi", Options::default()).unwrap();
    let literal = match ast.node(root) {
        Node::RegExpLiteral(r) => r,
        other => panic!("expected RegExpLiteral, got {}", other.kind_name()),
    };
    let flags = match ast.node(literal.flags) {
        Node::Flags(f) => f,
        other => panic!("expected Flags, got {}", other.kind_name()),
    };
    assert_that!(&flags.value.global).is_true();
    assert_that!(&flags.value.ignore_case).is_true();
    assert_that!(&flags.value.multiline).is_false();
    assert_that!(&ast.node(root).raw()).is_equal_to(&"/ab+c/gi");
}

#[test]
fn parsing_flags_alone_rejects_a_duplicate_flag() {
    let err = parse_flags("gg", Options::default()).unwrap_err();
    assert_that!(&err.kind).is_equal_to(RegExpSyntaxErrorKind::InvalidFlags);
}

#[test]
fn the_u_and_v_flags_cannot_both_be_set() {
    let err = parse_flags("uv", Options::default()).unwrap_err();
    assert_that!(&err.kind).is_equal_to(RegExpSyntaxErrorKind::InvalidFlags);
}

fn capture_names(ast: &ecma_regexp_ast::Ast, pattern_id: NodeId) -> Vec<String> {
    let pattern = ast.node(pattern_id).as_pattern();
    let alt = match ast.node(pattern.alternatives[0]) {
        Node::Alternative(a) => a,
        _ => panic!("expected Alternative"),
    };
    alt.elements
        .iter()
        .filter_map(|&id| match ast.node(id) {
            Node::CapturingGroup(g) => g.name.clone(),
            _ => None,
        })
        .collect()
}

#[test]
fn parsing_is_deterministic_across_repeated_runs() {
    let source = "(?<year>\\d{4})-(?<month>\\d{2})-(?<day>\\d{2})";
    let (first_ast, first_pattern) =
        parse_pattern(source, Options::default(), ValidatePatternFlags::default()).unwrap();
    let (second_ast, second_pattern) =
        parse_pattern(source, Options::default(), ValidatePatternFlags::default()).unwrap();
    assert_that!(&capture_names(&first_ast, first_pattern))
        .is_equal_to(&capture_names(&second_ast, second_pattern));
}

#[test]
fn an_edition_that_accepts_a_pattern_keeps_accepting_it_in_later_editions() {
    let pattern = r"(?<n>a)\k<n>";
    for version in [
        EcmaVersion::_2018,
        EcmaVersion::_2021,
        EcmaVersion::_2024,
        EcmaVersion::_2025,
    ] {
        let result = parse_pattern(pattern, options(version), ValidatePatternFlags::default());
        assert_that!(&result.is_ok()).is_true();
    }
}

#[test]
fn visiting_reaches_every_character_class_range() {
    struct RangeCounter(std::cell::Cell<usize>);
    impl Handlers for RangeCounter {
        fn on_character_class_range_enter(&self, _node: NodeId) {
            self.0.set(self.0.get() + 1);
        }
    }

    let (ast, root) = parse_reg_exp_literal("/[a-zA-Z0-9]/", Options::default()).unwrap();
    let counter = RangeCounter(std::cell::Cell::new(0));
    visit_reg_exp_ast(&ast, root, &counter);
    assert_that!(&counter.0.get()).is_equal_to(3);
}

#[test]
fn a_plain_literal_character_class_keeps_every_member() {
    let (ast, pattern_id) =
        parse_pattern("[abc]", Options::default(), ValidatePatternFlags::default()).unwrap();
    let pattern = ast.node(pattern_id).as_pattern();
    let alt = match ast.node(pattern.alternatives[0]) {
        Node::Alternative(a) => a,
        other => panic!("expected Alternative, got {}", other.kind_name()),
    };
    let class = match ast.node(alt.elements[0]) {
        Node::CharacterClass(c) => c,
        other => panic!("expected CharacterClass, got {}", other.kind_name()),
    };
    assert_that!(&class.elements.len()).is_equal_to(3);
}

#[test]
fn a_legacy_class_range_does_not_underflow_the_element_stack() {
    let result = parse_pattern("[a-z]", Options::default(), ValidatePatternFlags::default());
    assert_that!(&result.is_ok()).is_true();
}

#[test]
fn annex_b_sloppy_mode_accepts_a_lone_closing_bracket_and_braces_as_literals() {
    for pattern in ["a]b", "a}b", "a{b"] {
        let result = parse_pattern(pattern, Options::default(), ValidatePatternFlags::default());
        assert_that!(&result.is_ok()).is_true();
    }
}

#[test]
fn strict_mode_still_rejects_a_lone_closing_bracket() {
    let strict_options = Options {
        strict: true,
        ecma_version: EcmaVersion::default(),
    };
    let err = parse_pattern("a]b", strict_options, ValidatePatternFlags::default()).unwrap_err();
    assert_that!(&err.kind).is_equal_to(RegExpSyntaxErrorKind::InvalidCharacterClass);
}

#[test]
fn an_out_of_order_quantifier_is_reported_at_its_opening_brace() {
    let err = parse_pattern("a{3,2}", Options::default(), sets_flags()).unwrap_err();
    assert_that!(&err.index).is_equal_to(1);
}
