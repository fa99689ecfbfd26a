use std::collections::HashMap;

use crate::{
    arena::Ast,
    ast::{
        Alternative, AnyCharacterSet, Backreference, BackreferenceRef, BackreferenceResolution,
        CapturingGroup, Character, CharacterClass, CharacterClassRange, ClassIntersection,
        ClassStringDisjunction, ClassSubtraction, EdgeAssertion, EdgeKind, EscapeCharacterKind,
        EscapeCharacterSet, ExpressionCharacterClass, Flags, FlagsValue, Group, LookaroundAssertion,
        LookaroundKind, ModifierFlags, Modifiers, Node, NodeData, NodeId, NodeInterface, Pattern,
        Quantifier, RegExpLiteral, StringAlternative, UnicodePropertyCharacterSet,
        WordBoundaryAssertion,
    },
    reader::CodePoint,
    validator::{find_last_slash, EventHandler, RegExpValidator, ValidatePatternFlags},
    wtf16::{slice_to_string_lossy, Wtf16},
    Result,
};

pub use crate::validator::Options;

enum Frame {
    Pattern {
        start: usize,
        alternatives: Vec<NodeId>,
    },
    Group {
        start: usize,
        modifiers: Option<NodeId>,
        alternatives: Vec<NodeId>,
    },
    CapturingGroup {
        start: usize,
        name: Option<String>,
        index: usize,
        alternatives: Vec<NodeId>,
    },
    Lookaround {
        start: usize,
        kind: LookaroundKind,
        negate: bool,
        alternatives: Vec<NodeId>,
    },
    Alternative {
        start: usize,
        elements: Vec<NodeId>,
    },
    CharacterClass {
        start: usize,
        negate: bool,
        unicode_sets: bool,
        elements: Vec<NodeId>,
    },
    ClassStringDisjunction {
        start: usize,
        alternatives: Vec<NodeId>,
    },
    StringAlternative {
        start: usize,
        elements: Vec<NodeId>,
    },
    Modifiers {
        start: usize,
        add: Option<ModifierFlags>,
        remove: Option<ModifierFlags>,
    },
}

/// The `EventHandler` that turns the validator's builder events into an
/// owned `Ast` (spec.md §4.3). Lives only for the duration of one parse.
struct Assembler {
    ast: Ast,
    source: Wtf16,
    stack: Vec<Frame>,
    next_group_index: usize,
    groups_by_index: Vec<NodeId>,
    groups_by_name: HashMap<String, Vec<NodeId>>,
    backreferences: Vec<NodeId>,
    pattern: Option<NodeId>,
}

impl Assembler {
    fn new(source: Wtf16) -> Self {
        Self {
            ast: Ast::default(),
            source,
            stack: Vec::new(),
            next_group_index: 1,
            groups_by_index: Vec::new(),
            groups_by_name: HashMap::new(),
            backreferences: Vec::new(),
            pattern: None,
        }
    }

    fn raw(&self, start: usize, end: usize) -> String {
        slice_to_string_lossy(self.source.slice(start, end))
    }

    fn node_data(&self, start: usize, end: usize) -> NodeData {
        NodeData {
            parent: None,
            start,
            end,
            raw: self.raw(start, end),
        }
    }

    fn set_parent(&mut self, child: NodeId, parent: NodeId) {
        self.ast.node_mut(child).base_mut().parent = Some(parent);
    }

    fn set_parent_all(&mut self, children: &[NodeId], parent: NodeId) {
        for &child in children {
            self.set_parent(child, parent);
        }
    }

    /// Appends a freshly built term (atom/assertion/quantifier) into
    /// whichever context is currently open: an `Alternative`'s elements, a
    /// `CharacterClass`'s elements, or a `StringAlternative`'s elements.
    fn append_term(&mut self, id: NodeId) {
        match self.stack.last_mut() {
            Some(Frame::Alternative { elements, .. }) => elements.push(id),
            Some(Frame::CharacterClass { elements, .. }) => elements.push(id),
            Some(Frame::StringAlternative { elements, .. }) => elements.push(id),
            _ => panic!("append_term with no open term context"),
        }
    }

    fn pop_term(&mut self) -> NodeId {
        match self.stack.last_mut() {
            Some(Frame::Alternative { elements, .. }) => {
                elements.pop().expect("quantifier with no preceding term")
            }
            _ => panic!("quantifier events must occur inside an alternative"),
        }
    }

    fn pop_last_two_class_elements(&mut self) -> (NodeId, NodeId) {
        match self.stack.last_mut() {
            Some(Frame::CharacterClass { elements, .. }) => {
                let right = elements.pop().expect("class operator missing right operand");
                let left = elements.pop().expect("class operator missing left operand");
                (left, right)
            }
            _ => panic!("class operator events must occur inside a character class"),
        }
    }

    fn finish(&mut self) -> Result<NodeId> {
        self.resolve_backreferences();
        Ok(self.pattern.expect("on_pattern_leave was never called"))
    }

    fn resolve_backreferences(&mut self) {
        for &backref_id in &self.backreferences {
            let ref_ = self.ast.node(backref_id).as_backreference().ref_.clone();
            let targets: Vec<NodeId> = match &ref_ {
                BackreferenceRef::Index(n) => self
                    .groups_by_index
                    .get(n - 1)
                    .copied()
                    .into_iter()
                    .collect(),
                BackreferenceRef::Name(name) => {
                    self.groups_by_name.get(name).cloned().unwrap_or_default()
                }
            };
            let resolution = match targets.as_slice() {
                [] => None,
                [one] => Some(BackreferenceResolution::One(*one)),
                many => Some(BackreferenceResolution::Ambiguous(many.to_vec())),
            };
            self.ast.node_mut(backref_id).as_backreference_mut().resolved = resolution;
            for target in targets {
                self.ast
                    .node_mut(target)
                    .as_capturing_group_mut()
                    .references
                    .push(backref_id);
            }
        }
    }

    fn into_ast(self) -> Ast {
        self.ast
    }
}

impl EventHandler for Assembler {
    fn on_pattern_enter(&mut self, start: usize) {
        self.stack.push(Frame::Pattern {
            start,
            alternatives: Vec::new(),
        });
    }

    fn on_pattern_leave(&mut self, start: usize, end: usize) {
        let Frame::Pattern { alternatives, .. } = self.stack.pop().expect("pattern frame") else {
            unreachable!()
        };
        let id = self.ast.alloc(Node::Pattern(Pattern {
            base: self.node_data(start, end),
            alternatives: alternatives.clone(),
        }));
        self.set_parent_all(&alternatives, id);
        self.pattern = Some(id);
    }

    fn on_disjunction_enter(&mut self, _start: usize) {}
    fn on_disjunction_leave(&mut self, _start: usize, _end: usize) {}

    fn on_alternative_enter(&mut self, start: usize, _index: usize) {
        self.stack.push(Frame::Alternative {
            start,
            elements: Vec::new(),
        });
    }

    fn on_alternative_leave(&mut self, start: usize, end: usize, _index: usize) {
        let Frame::Alternative { elements, .. } = self.stack.pop().expect("alternative frame")
        else {
            unreachable!()
        };
        let id = self.ast.alloc(Node::Alternative(Alternative {
            base: self.node_data(start, end),
            elements: elements.clone(),
        }));
        self.set_parent_all(&elements, id);
        match self.stack.last_mut() {
            Some(
                Frame::Pattern { alternatives, .. }
                | Frame::Group { alternatives, .. }
                | Frame::CapturingGroup { alternatives, .. }
                | Frame::Lookaround { alternatives, .. },
            ) => alternatives.push(id),
            _ => panic!("alternative must close inside a disjunction owner"),
        }
    }

    fn on_group_enter(&mut self, start: usize) {
        self.stack.push(Frame::Group {
            start,
            modifiers: None,
            alternatives: Vec::new(),
        });
    }

    fn on_group_leave(&mut self, start: usize, end: usize) {
        let Frame::Group {
            modifiers,
            alternatives,
            ..
        } = self.stack.pop().expect("group frame")
        else {
            unreachable!()
        };
        let id = self.ast.alloc(Node::Group(Group {
            base: self.node_data(start, end),
            modifiers,
            alternatives: alternatives.clone(),
        }));
        self.set_parent_all(&alternatives, id);
        if let Some(modifiers_id) = modifiers {
            self.set_parent(modifiers_id, id);
        }
        self.append_term(id);
    }

    fn on_modifiers_enter(&mut self, start: usize) {
        self.stack.push(Frame::Modifiers {
            start,
            add: None,
            remove: None,
        });
    }

    fn on_modifiers_leave(&mut self, start: usize, end: usize) {
        let Frame::Modifiers { add, remove, .. } = self.stack.pop().expect("modifiers frame")
        else {
            unreachable!()
        };
        let id = self.ast.alloc(Node::Modifiers(Modifiers {
            base: self.node_data(start, end),
            add,
            remove,
        }));
        match self.stack.last_mut() {
            Some(Frame::Group { modifiers, .. }) => *modifiers = Some(id),
            _ => panic!("modifiers must close inside a group"),
        }
    }

    fn on_add_modifiers(&mut self, _start: usize, _end: usize, flags: ModifierFlags) {
        match self.stack.last_mut() {
            Some(Frame::Modifiers { add, .. }) => *add = Some(flags),
            _ => panic!("on_add_modifiers outside of modifiers"),
        }
    }

    fn on_remove_modifiers(&mut self, _start: usize, _end: usize, flags: ModifierFlags) {
        match self.stack.last_mut() {
            Some(Frame::Modifiers { remove, .. }) => *remove = Some(flags),
            _ => panic!("on_remove_modifiers outside of modifiers"),
        }
    }

    fn on_capturing_group_enter(&mut self, start: usize, name: Option<&str>) {
        let index = self.next_group_index;
        self.next_group_index += 1;
        self.stack.push(Frame::CapturingGroup {
            start,
            name: name.map(str::to_owned),
            index,
            alternatives: Vec::new(),
        });
    }

    fn on_capturing_group_leave(&mut self, start: usize, end: usize, _name: Option<&str>) {
        let Frame::CapturingGroup {
            name,
            alternatives,
            ..
        } = self.stack.pop().expect("capturing group frame")
        else {
            unreachable!()
        };
        let id = self.ast.alloc(Node::CapturingGroup(CapturingGroup {
            base: self.node_data(start, end),
            name: name.clone(),
            alternatives: alternatives.clone(),
            references: Vec::new(),
        }));
        self.set_parent_all(&alternatives, id);
        self.groups_by_index.push(id);
        if let Some(name) = name {
            self.groups_by_name.entry(name).or_default().push(id);
        }
        self.append_term(id);
    }

    fn on_quantifier(&mut self, start: usize, end: usize, min: u32, max: u32, greedy: bool) {
        let element = self.pop_term();
        let id = self.ast.alloc(Node::Quantifier(Quantifier {
            base: self.node_data(start, end),
            min,
            max,
            greedy,
            element,
        }));
        self.set_parent(element, id);
        self.append_term(id);
    }

    fn on_lookaround_assertion_enter(&mut self, start: usize, kind: LookaroundKind, negate: bool) {
        self.stack.push(Frame::Lookaround {
            start,
            kind,
            negate,
            alternatives: Vec::new(),
        });
    }

    fn on_lookaround_assertion_leave(
        &mut self,
        start: usize,
        end: usize,
        _kind: LookaroundKind,
        _negate: bool,
    ) {
        let Frame::Lookaround {
            kind,
            negate,
            alternatives,
            ..
        } = self.stack.pop().expect("lookaround frame")
        else {
            unreachable!()
        };
        let id = self.ast.alloc(Node::LookaroundAssertion(LookaroundAssertion {
            base: self.node_data(start, end),
            kind,
            negate,
            alternatives: alternatives.clone(),
        }));
        self.set_parent_all(&alternatives, id);
        self.append_term(id);
    }

    fn on_edge_assertion(&mut self, start: usize, end: usize, kind: EdgeKind) {
        let id = self.ast.alloc(Node::EdgeAssertion(EdgeAssertion {
            base: self.node_data(start, end),
            kind,
        }));
        self.append_term(id);
    }

    fn on_word_boundary_assertion(&mut self, start: usize, end: usize, negate: bool) {
        let id = self
            .ast
            .alloc(Node::WordBoundaryAssertion(WordBoundaryAssertion {
                base: self.node_data(start, end),
                negate,
            }));
        self.append_term(id);
    }

    fn on_any_character_set(&mut self, start: usize, end: usize) {
        let id = self.ast.alloc(Node::AnyCharacterSet(AnyCharacterSet {
            base: self.node_data(start, end),
        }));
        self.append_term(id);
    }

    fn on_escape_character_set(
        &mut self,
        start: usize,
        end: usize,
        kind: EscapeCharacterKind,
        negate: bool,
    ) {
        let id = self.ast.alloc(Node::EscapeCharacterSet(EscapeCharacterSet {
            base: self.node_data(start, end),
            kind,
            negate,
        }));
        self.append_term(id);
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
        let id = self
            .ast
            .alloc(Node::UnicodePropertyCharacterSet(UnicodePropertyCharacterSet {
                base: self.node_data(start, end),
                strings,
                key: key.to_owned(),
                value: value.map(str::to_owned),
                negate,
            }));
        self.append_term(id);
    }

    fn on_character(&mut self, start: usize, end: usize, value: CodePoint) {
        let id = self.ast.alloc(Node::Character(Character {
            base: self.node_data(start, end),
            value,
        }));
        self.append_term(id);
    }

    fn on_backreference(&mut self, start: usize, end: usize, ref_: &BackreferenceRef) {
        let id = self.ast.alloc(Node::Backreference(Backreference {
            base: self.node_data(start, end),
            ref_: ref_.clone(),
            resolved: None,
        }));
        self.backreferences.push(id);
        self.append_term(id);
    }

    fn on_character_class_enter(&mut self, start: usize, negate: bool, unicode_sets: bool) {
        self.stack.push(Frame::CharacterClass {
            start,
            negate,
            unicode_sets,
            elements: Vec::new(),
        });
    }

    fn on_character_class_leave(&mut self, start: usize, end: usize, negate: bool) {
        let Frame::CharacterClass {
            unicode_sets,
            elements,
            ..
        } = self.stack.pop().expect("character class frame")
        else {
            unreachable!()
        };

        let is_expression = unicode_sets
            && elements.len() == 1
            && matches!(
                self.ast.node(elements[0]),
                Node::ClassIntersection(_) | Node::ClassSubtraction(_)
            );

        let id = if is_expression {
            let expression = elements[0];
            let id = self
                .ast
                .alloc(Node::ExpressionCharacterClass(ExpressionCharacterClass {
                    base: self.node_data(start, end),
                    negate,
                    expression,
                }));
            self.set_parent(expression, id);
            id
        } else {
            let id = self.ast.alloc(Node::CharacterClass(CharacterClass {
                base: self.node_data(start, end),
                unicode_sets,
                negate,
                elements: elements.clone(),
            }));
            self.set_parent_all(&elements, id);
            id
        };
        self.append_term(id);
    }

    fn on_character_class_range(&mut self, start: usize, end: usize, _min: CodePoint, _max: CodePoint) {
        let (min, max) = self.pop_last_two_class_elements();
        let id = self.ast.alloc(Node::CharacterClassRange(CharacterClassRange {
            base: self.node_data(start, end),
            min,
            max,
        }));
        self.set_parent(min, id);
        self.set_parent(max, id);
        self.append_term(id);
    }

    fn on_class_intersection(&mut self, _start: usize, end: usize) {
        let (left, right) = self.pop_last_two_class_elements();
        let start = self.ast.node(left).start();
        let id = self.ast.alloc(Node::ClassIntersection(ClassIntersection {
            base: self.node_data(start, end),
            left,
            right,
        }));
        self.set_parent(left, id);
        self.set_parent(right, id);
        self.append_term(id);
    }

    fn on_class_subtraction(&mut self, _start: usize, end: usize) {
        let (left, right) = self.pop_last_two_class_elements();
        let start = self.ast.node(left).start();
        let id = self.ast.alloc(Node::ClassSubtraction(ClassSubtraction {
            base: self.node_data(start, end),
            left,
            right,
        }));
        self.set_parent(left, id);
        self.set_parent(right, id);
        self.append_term(id);
    }

    fn on_class_string_disjunction_enter(&mut self, start: usize) {
        self.stack.push(Frame::ClassStringDisjunction {
            start,
            alternatives: Vec::new(),
        });
    }

    fn on_class_string_disjunction_leave(&mut self, start: usize, end: usize) {
        let Frame::ClassStringDisjunction { alternatives, .. } =
            self.stack.pop().expect("class string disjunction frame")
        else {
            unreachable!()
        };
        let id = self
            .ast
            .alloc(Node::ClassStringDisjunction(ClassStringDisjunction {
                base: self.node_data(start, end),
                alternatives: alternatives.clone(),
            }));
        self.set_parent_all(&alternatives, id);
        self.append_term(id);
    }

    fn on_string_alternative_enter(&mut self, start: usize, _index: usize) {
        self.stack.push(Frame::StringAlternative {
            start,
            elements: Vec::new(),
        });
    }

    fn on_string_alternative_leave(&mut self, start: usize, end: usize, _index: usize) {
        let Frame::StringAlternative { elements, .. } =
            self.stack.pop().expect("string alternative frame")
        else {
            unreachable!()
        };
        let id = self.ast.alloc(Node::StringAlternative(StringAlternative {
            base: self.node_data(start, end),
            elements: elements.clone(),
        }));
        self.set_parent_all(&elements, id);
        match self.stack.last_mut() {
            Some(Frame::ClassStringDisjunction { alternatives, .. }) => alternatives.push(id),
            _ => panic!("string alternative must close inside a \\q{{...}} disjunction"),
        }
    }
}

/// Parses ECMAScript regular-expression source into an owned `Ast`
/// (spec.md §4.3, §6.1).
pub struct RegExpParser {
    options: Options,
}

impl RegExpParser {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn parse_flags(&self, source: &str) -> Result<FlagsValue> {
        RegExpValidator::new(self.options).validate_flags(source)
    }

    pub fn parse_pattern(
        &self,
        source: &str,
        flags: ValidatePatternFlags,
    ) -> Result<(Ast, NodeId)> {
        let mut assembler = Assembler::new(source.into());
        RegExpValidator::new(self.options).validate_pattern(source, flags, &mut assembler)?;
        let pattern_id = assembler.finish()?;
        Ok((assembler.into_ast(), pattern_id))
    }

    pub fn parse_literal(&self, source: &str) -> Result<(Ast, NodeId)> {
        let mut assembler = Assembler::new(source.into());
        let flags_value = RegExpValidator::new(self.options).validate_literal(source, &mut assembler)?;
        let pattern_id = assembler.finish()?;

        let full: Wtf16 = source.into();
        let flags_start = find_last_slash(&full).expect("already validated as a well-formed literal") + 1;
        let flags_id = assembler.ast.alloc(Node::Flags(Flags {
            base: assembler.node_data(flags_start, full.len()),
            value: flags_value,
        }));

        let literal_id = assembler.ast.alloc(Node::RegExpLiteral(RegExpLiteral {
            base: assembler.node_data(0, full.len()),
            pattern: pattern_id,
            flags: flags_id,
        }));
        assembler.set_parent(pattern_id, literal_id);
        assembler.set_parent(flags_id, literal_id);
        assembler.ast.set_root(literal_id);

        Ok((assembler.into_ast(), literal_id))
    }
}
