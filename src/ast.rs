use id_arena::Id;

use crate::reader::CodePoint;

pub type NodeId = Id<Node>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LookaroundKind {
    Lookahead,
    Lookbehind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    Start,
    End,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EscapeCharacterKind {
    Digit,
    Space,
    Word,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackreferenceRef {
    Index(usize),
    Name(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackreferenceResolution {
    One(NodeId),
    Ambiguous(Vec<NodeId>),
}

/// Fields common to every AST node (spec.md §3.1): a kind tag is implicit
/// in the enclosing `Node` variant, plus offsets, raw text and a parent
/// back-link (`None` only at the root).
#[derive(Clone, Debug, Default)]
pub struct NodeData {
    pub parent: Option<NodeId>,
    pub start: usize,
    pub end: usize,
    pub raw: String,
}

pub enum Node {
    RegExpLiteral(RegExpLiteral),
    Flags(Flags),
    Pattern(Pattern),
    Alternative(Alternative),
    Group(Group),
    Modifiers(Modifiers),
    CapturingGroup(CapturingGroup),
    Quantifier(Quantifier),
    EdgeAssertion(EdgeAssertion),
    WordBoundaryAssertion(WordBoundaryAssertion),
    LookaroundAssertion(LookaroundAssertion),
    AnyCharacterSet(AnyCharacterSet),
    EscapeCharacterSet(EscapeCharacterSet),
    UnicodePropertyCharacterSet(UnicodePropertyCharacterSet),
    Character(Character),
    CharacterClass(CharacterClass),
    CharacterClassRange(CharacterClassRange),
    ExpressionCharacterClass(ExpressionCharacterClass),
    ClassIntersection(ClassIntersection),
    ClassSubtraction(ClassSubtraction),
    ClassStringDisjunction(ClassStringDisjunction),
    StringAlternative(StringAlternative),
    Backreference(Backreference),
}

macro_rules! node_base_dispatch {
    ($self:expr, $node:ident => $body:expr) => {
        match $self {
            Node::RegExpLiteral($node) => $body,
            Node::Flags($node) => $body,
            Node::Pattern($node) => $body,
            Node::Alternative($node) => $body,
            Node::Group($node) => $body,
            Node::Modifiers($node) => $body,
            Node::CapturingGroup($node) => $body,
            Node::Quantifier($node) => $body,
            Node::EdgeAssertion($node) => $body,
            Node::WordBoundaryAssertion($node) => $body,
            Node::LookaroundAssertion($node) => $body,
            Node::AnyCharacterSet($node) => $body,
            Node::EscapeCharacterSet($node) => $body,
            Node::UnicodePropertyCharacterSet($node) => $body,
            Node::Character($node) => $body,
            Node::CharacterClass($node) => $body,
            Node::CharacterClassRange($node) => $body,
            Node::ExpressionCharacterClass($node) => $body,
            Node::ClassIntersection($node) => $body,
            Node::ClassSubtraction($node) => $body,
            Node::ClassStringDisjunction($node) => $body,
            Node::StringAlternative($node) => $body,
            Node::Backreference($node) => $body,
        }
    };
}

pub trait NodeInterface {
    fn base(&self) -> &NodeData;
    fn base_mut(&mut self) -> &mut NodeData;

    fn maybe_parent(&self) -> Option<NodeId> {
        self.base().parent
    }

    fn parent(&self) -> NodeId {
        self.base().parent.expect("node has no parent")
    }

    fn start(&self) -> usize {
        self.base().start
    }

    fn end(&self) -> usize {
        self.base().end
    }

    fn raw(&self) -> &str {
        &self.base().raw
    }
}

impl NodeInterface for Node {
    fn base(&self) -> &NodeData {
        node_base_dispatch!(self, n => &n.base)
    }

    fn base_mut(&mut self) -> &mut NodeData {
        node_base_dispatch!(self, n => &mut n.base)
    }
}

impl Node {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::RegExpLiteral(_) => "RegExpLiteral",
            Node::Flags(_) => "Flags",
            Node::Pattern(_) => "Pattern",
            Node::Alternative(_) => "Alternative",
            Node::Group(_) => "Group",
            Node::Modifiers(_) => "Modifiers",
            Node::CapturingGroup(_) => "CapturingGroup",
            Node::Quantifier(_) => "Quantifier",
            Node::EdgeAssertion(_) => "Assertion",
            Node::WordBoundaryAssertion(_) => "Assertion",
            Node::LookaroundAssertion(_) => "Assertion",
            Node::AnyCharacterSet(_) => "CharacterSet",
            Node::EscapeCharacterSet(_) => "CharacterSet",
            Node::UnicodePropertyCharacterSet(_) => "CharacterSet",
            Node::Character(_) => "Character",
            Node::CharacterClass(_) => "CharacterClass",
            Node::CharacterClassRange(_) => "CharacterClassRange",
            Node::ExpressionCharacterClass(_) => "ExpressionCharacterClass",
            Node::ClassIntersection(_) => "ClassIntersection",
            Node::ClassSubtraction(_) => "ClassSubtraction",
            Node::ClassStringDisjunction(_) => "ClassStringDisjunction",
            Node::StringAlternative(_) => "StringAlternative",
            Node::Backreference(_) => "Backreference",
        }
    }

    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            Node::EdgeAssertion(_) | Node::WordBoundaryAssertion(_) | Node::LookaroundAssertion(_)
        )
    }

    /// A lookahead assertion is quantifiable under Annex B; every other
    /// assertion, and every quantifier itself, is not (spec.md §3.2 inv. 7).
    pub fn is_quantifiable(&self) -> bool {
        match self {
            Node::Quantifier(_) => false,
            Node::LookaroundAssertion(l) => l.kind == LookaroundKind::Lookahead,
            Node::EdgeAssertion(_) | Node::WordBoundaryAssertion(_) => false,
            _ => true,
        }
    }

    pub fn as_pattern(&self) -> &Pattern {
        match self {
            Node::Pattern(p) => p,
            _ => panic!("not a Pattern"),
        }
    }

    pub fn as_pattern_mut(&mut self) -> &mut Pattern {
        match self {
            Node::Pattern(p) => p,
            _ => panic!("not a Pattern"),
        }
    }

    pub fn as_capturing_group(&self) -> &CapturingGroup {
        match self {
            Node::CapturingGroup(c) => c,
            _ => panic!("not a CapturingGroup"),
        }
    }

    pub fn as_capturing_group_mut(&mut self) -> &mut CapturingGroup {
        match self {
            Node::CapturingGroup(c) => c,
            _ => panic!("not a CapturingGroup"),
        }
    }

    pub fn as_backreference(&self) -> &Backreference {
        match self {
            Node::Backreference(b) => b,
            _ => panic!("not a Backreference"),
        }
    }

    pub fn as_backreference_mut(&mut self) -> &mut Backreference {
        match self {
            Node::Backreference(b) => b,
            _ => panic!("not a Backreference"),
        }
    }

    pub fn as_character_class_mut(&mut self) -> &mut CharacterClass {
        match self {
            Node::CharacterClass(c) => c,
            _ => panic!("not a CharacterClass"),
        }
    }
}

pub struct RegExpLiteral {
    pub base: NodeData,
    pub pattern: NodeId,
    pub flags: NodeId,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagsValue {
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub unicode: bool,
    pub sticky: bool,
    pub dot_all: bool,
    pub has_indices: bool,
    pub unicode_sets: bool,
}

pub struct Flags {
    pub base: NodeData,
    pub value: FlagsValue,
}

pub struct Pattern {
    pub base: NodeData,
    pub alternatives: Vec<NodeId>,
}

pub struct Alternative {
    pub base: NodeData,
    pub elements: Vec<NodeId>,
}

pub struct Group {
    pub base: NodeData,
    pub modifiers: Option<NodeId>,
    pub alternatives: Vec<NodeId>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ModifierFlags {
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
}

pub struct Modifiers {
    pub base: NodeData,
    pub add: Option<ModifierFlags>,
    pub remove: Option<ModifierFlags>,
}

pub struct CapturingGroup {
    pub base: NodeData,
    pub name: Option<String>,
    pub alternatives: Vec<NodeId>,
    pub references: Vec<NodeId>,
}

pub struct LookaroundAssertion {
    pub base: NodeData,
    pub kind: LookaroundKind,
    pub negate: bool,
    pub alternatives: Vec<NodeId>,
}

pub struct Quantifier {
    pub base: NodeData,
    pub min: u32,
    pub max: u32,
    pub greedy: bool,
    pub element: NodeId,
}

pub struct CharacterClass {
    pub base: NodeData,
    pub unicode_sets: bool,
    pub negate: bool,
    pub elements: Vec<NodeId>,
}

pub struct CharacterClassRange {
    pub base: NodeData,
    pub min: NodeId,
    pub max: NodeId,
}

pub struct EdgeAssertion {
    pub base: NodeData,
    pub kind: EdgeKind,
}

pub struct WordBoundaryAssertion {
    pub base: NodeData,
    pub negate: bool,
}

pub struct AnyCharacterSet {
    pub base: NodeData,
}

pub struct EscapeCharacterSet {
    pub base: NodeData,
    pub kind: EscapeCharacterKind,
    pub negate: bool,
}

pub struct UnicodePropertyCharacterSet {
    pub base: NodeData,
    pub strings: bool,
    pub key: String,
    pub value: Option<String>,
    pub negate: bool,
}

pub struct ExpressionCharacterClass {
    pub base: NodeData,
    pub negate: bool,
    pub expression: NodeId,
}

pub struct ClassIntersection {
    pub base: NodeData,
    pub left: NodeId,
    pub right: NodeId,
}

pub struct ClassSubtraction {
    pub base: NodeData,
    pub left: NodeId,
    pub right: NodeId,
}

pub struct ClassStringDisjunction {
    pub base: NodeData,
    pub alternatives: Vec<NodeId>,
}

pub struct StringAlternative {
    pub base: NodeData,
    pub elements: Vec<NodeId>,
}

pub struct Character {
    pub base: NodeData,
    pub value: CodePoint,
}

pub struct Backreference {
    pub base: NodeData,
    pub ref_: BackreferenceRef,
    pub resolved: Option<BackreferenceResolution>,
}

impl Backreference {
    pub fn ambiguous(&self) -> bool {
        matches!(self.resolved, Some(BackreferenceResolution::Ambiguous(_)))
    }
}

macro_rules! impl_base {
    ($t:ty) => {
        impl NodeInterface for $t {
            fn base(&self) -> &NodeData {
                &self.base
            }
            fn base_mut(&mut self) -> &mut NodeData {
                &mut self.base
            }
        }
    };
}

impl_base!(RegExpLiteral);
impl_base!(Flags);
impl_base!(Pattern);
impl_base!(Alternative);
impl_base!(Group);
impl_base!(Modifiers);
impl_base!(CapturingGroup);
impl_base!(Quantifier);
impl_base!(EdgeAssertion);
impl_base!(WordBoundaryAssertion);
impl_base!(LookaroundAssertion);
impl_base!(AnyCharacterSet);
impl_base!(EscapeCharacterSet);
impl_base!(UnicodePropertyCharacterSet);
impl_base!(Character);
impl_base!(CharacterClass);
impl_base!(CharacterClassRange);
impl_base!(ExpressionCharacterClass);
impl_base!(ClassIntersection);
impl_base!(ClassSubtraction);
impl_base!(ClassStringDisjunction);
impl_base!(StringAlternative);
impl_base!(Backreference);
