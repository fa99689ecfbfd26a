use id_arena::Arena;

use crate::ast::{Node, NodeId};

/// Owns every node produced by one parse. The assembler holds `&mut Ast`
/// exclusively while building (parsing is single-threaded and synchronous,
/// spec.md §5), so node mutation needs no interior-mutability wrapper;
/// dropping the root discards every descendant together (spec.md §3.3).
#[derive(Default)]
pub struct Ast {
    arena: Arena<Node>,
    root: Option<NodeId>,
}

impl Ast {
    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.arena.alloc(node)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.arena[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.arena[id]
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn root(&self) -> NodeId {
        self.root.expect("Ast has no root")
    }
}
