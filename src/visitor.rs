use crate::{
    arena::Ast,
    ast::{Node, NodeId},
};

/// Depth-first walk over a parsed `Ast` (spec.md §4.4), driving a
/// caller-supplied [`Handlers`] with enter/leave pairs in source order.
/// Several node kinds that share a `kind_name()` (the three assertion
/// kinds, the three character-set kinds) share one pair of callbacks too.
pub struct RegExpVisitor<'a, H: Handlers> {
    ast: &'a Ast,
    handlers: &'a H,
}

impl<'a, H: Handlers> RegExpVisitor<'a, H> {
    pub fn new(ast: &'a Ast, handlers: &'a H) -> Self {
        Self { ast, handlers }
    }

    pub fn visit(&self, node: NodeId) {
        match self.ast.node(node) {
            Node::RegExpLiteral(n) => {
                self.handlers.on_reg_exp_literal_enter(node);
                self.visit(n.pattern);
                self.visit(n.flags);
                self.handlers.on_reg_exp_literal_leave(node);
            }
            Node::Flags(_) => {
                self.handlers.on_flags_enter(node);
                self.handlers.on_flags_leave(node);
            }
            Node::Pattern(n) => {
                self.handlers.on_pattern_enter(node);
                for &alt in &n.alternatives {
                    self.visit(alt);
                }
                self.handlers.on_pattern_leave(node);
            }
            Node::Alternative(n) => {
                self.handlers.on_alternative_enter(node);
                for &element in &n.elements {
                    self.visit(element);
                }
                self.handlers.on_alternative_leave(node);
            }
            Node::Group(n) => {
                self.handlers.on_group_enter(node);
                if let Some(modifiers) = n.modifiers {
                    self.visit(modifiers);
                }
                for &alt in &n.alternatives {
                    self.visit(alt);
                }
                self.handlers.on_group_leave(node);
            }
            Node::Modifiers(_) => {
                self.handlers.on_modifiers_enter(node);
                self.handlers.on_modifiers_leave(node);
            }
            Node::CapturingGroup(n) => {
                self.handlers.on_capturing_group_enter(node);
                for &alt in &n.alternatives {
                    self.visit(alt);
                }
                self.handlers.on_capturing_group_leave(node);
            }
            Node::Quantifier(n) => {
                self.handlers.on_quantifier_enter(node);
                self.visit(n.element);
                self.handlers.on_quantifier_leave(node);
            }
            Node::EdgeAssertion(_) | Node::WordBoundaryAssertion(_) => {
                self.handlers.on_assertion_enter(node);
                self.handlers.on_assertion_leave(node);
            }
            Node::LookaroundAssertion(n) => {
                self.handlers.on_assertion_enter(node);
                for &alt in &n.alternatives {
                    self.visit(alt);
                }
                self.handlers.on_assertion_leave(node);
            }
            Node::AnyCharacterSet(_)
            | Node::EscapeCharacterSet(_)
            | Node::UnicodePropertyCharacterSet(_) => {
                self.handlers.on_character_set_enter(node);
                self.handlers.on_character_set_leave(node);
            }
            Node::Character(_) => {
                self.handlers.on_character_enter(node);
                self.handlers.on_character_leave(node);
            }
            Node::CharacterClass(n) => {
                self.handlers.on_character_class_enter(node);
                for &element in &n.elements {
                    self.visit(element);
                }
                self.handlers.on_character_class_leave(node);
            }
            Node::CharacterClassRange(n) => {
                self.handlers.on_character_class_range_enter(node);
                self.visit(n.min);
                self.visit(n.max);
                self.handlers.on_character_class_range_leave(node);
            }
            Node::ExpressionCharacterClass(n) => {
                self.handlers.on_expression_character_class_enter(node);
                self.visit(n.expression);
                self.handlers.on_expression_character_class_leave(node);
            }
            Node::ClassIntersection(n) => {
                self.handlers.on_class_intersection_enter(node);
                self.visit(n.left);
                self.visit(n.right);
                self.handlers.on_class_intersection_leave(node);
            }
            Node::ClassSubtraction(n) => {
                self.handlers.on_class_subtraction_enter(node);
                self.visit(n.left);
                self.visit(n.right);
                self.handlers.on_class_subtraction_leave(node);
            }
            Node::ClassStringDisjunction(n) => {
                self.handlers.on_class_string_disjunction_enter(node);
                for &alt in &n.alternatives {
                    self.visit(alt);
                }
                self.handlers.on_class_string_disjunction_leave(node);
            }
            Node::StringAlternative(n) => {
                self.handlers.on_string_alternative_enter(node);
                for &element in &n.elements {
                    self.visit(element);
                }
                self.handlers.on_string_alternative_leave(node);
            }
            Node::Backreference(_) => {
                self.handlers.on_backreference_enter(node);
                self.handlers.on_backreference_leave(node);
            }
        }
    }
}

#[allow(unused_variables)]
pub trait Handlers {
    fn on_alternative_enter(&self, node: NodeId /*Alternative*/) {}
    fn on_alternative_leave(&self, node: NodeId /*Alternative*/) {}
    fn on_assertion_enter(&self, node: NodeId /*Assertion*/) {}
    fn on_assertion_leave(&self, node: NodeId /*Assertion*/) {}
    fn on_backreference_enter(&self, node: NodeId /*Backreference*/) {}
    fn on_backreference_leave(&self, node: NodeId /*Backreference*/) {}
    fn on_capturing_group_enter(&self, node: NodeId /*CapturingGroup*/) {}
    fn on_capturing_group_leave(&self, node: NodeId /*CapturingGroup*/) {}
    fn on_character_enter(&self, node: NodeId /*Character*/) {}
    fn on_character_leave(&self, node: NodeId /*Character*/) {}
    fn on_character_class_enter(&self, node: NodeId /*CharacterClass*/) {}
    fn on_character_class_leave(&self, node: NodeId /*CharacterClass*/) {}
    fn on_character_class_range_enter(&self, node: NodeId /*CharacterClassRange*/) {}
    fn on_character_class_range_leave(&self, node: NodeId /*CharacterClassRange*/) {}
    fn on_character_set_enter(&self, node: NodeId /*CharacterSet*/) {}
    fn on_character_set_leave(&self, node: NodeId /*CharacterSet*/) {}
    fn on_class_intersection_enter(&self, node: NodeId /*ClassIntersection*/) {}
    fn on_class_intersection_leave(&self, node: NodeId /*ClassIntersection*/) {}
    fn on_class_string_disjunction_enter(&self, node: NodeId /*ClassStringDisjunction*/) {}
    fn on_class_string_disjunction_leave(&self, node: NodeId /*ClassStringDisjunction*/) {}
    fn on_class_subtraction_enter(&self, node: NodeId /*ClassSubtraction*/) {}
    fn on_class_subtraction_leave(&self, node: NodeId /*ClassSubtraction*/) {}
    fn on_expression_character_class_enter(&self, node: NodeId /*ExpressionCharacterClass*/) {}
    fn on_expression_character_class_leave(&self, node: NodeId /*ExpressionCharacterClass*/) {}
    fn on_flags_enter(&self, node: NodeId /*Flags*/) {}
    fn on_flags_leave(&self, node: NodeId /*Flags*/) {}
    fn on_group_enter(&self, node: NodeId /*Group*/) {}
    fn on_group_leave(&self, node: NodeId /*Group*/) {}
    fn on_modifiers_enter(&self, node: NodeId /*Modifiers*/) {}
    fn on_modifiers_leave(&self, node: NodeId /*Modifiers*/) {}
    fn on_pattern_enter(&self, node: NodeId /*Pattern*/) {}
    fn on_pattern_leave(&self, node: NodeId /*Pattern*/) {}
    fn on_quantifier_enter(&self, node: NodeId /*Quantifier*/) {}
    fn on_quantifier_leave(&self, node: NodeId /*Quantifier*/) {}
    fn on_reg_exp_literal_enter(&self, node: NodeId /*RegExpLiteral*/) {}
    fn on_reg_exp_literal_leave(&self, node: NodeId /*RegExpLiteral*/) {}
    fn on_string_alternative_enter(&self, node: NodeId /*StringAlternative*/) {}
    fn on_string_alternative_leave(&self, node: NodeId /*StringAlternative*/) {}
}
