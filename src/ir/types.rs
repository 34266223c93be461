//! Handles and literal types shared by every IR node.
//!
//! All nodes live in arenas owned by a [`crate::ir::Function`]. They are
//! addressed by small `Copy` handles instead of references, which keeps the
//! cyclic use-def and predecessor/successor relations free of shared
//! ownership. Handles are never reused: once a node is erased its slot stays
//! empty, so a stale handle is reported as an error rather than silently
//! aliasing a newer node.

use std::fmt;

use strum::{EnumCount, EnumIter};

use crate::utils::graph::NodeId;

/// The literal type carried by every value.
///
/// Instructions that produce nothing (terminators, calls to procedures) are
/// typed [`LiteralType::Void`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumCount, strum::Display)]
pub enum LiteralType {
    /// No value
    #[default]
    Void,
    /// Signed 64-bit integer
    Int,
    /// Unsigned 64-bit integer
    UInt,
    /// Immutable string
    String,
}

/// Handle to any value of a function: a constant, a definition or an instruction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValueId(pub(crate) usize);

impl ValueId {
    /// Returns the arena index of this handle.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueId({})", self.0)
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Handle to an instruction.
///
/// Instructions are values, so every `InstrId` converts losslessly into the
/// [`ValueId`] of the same node. The reverse needs a kind check, see
/// [`crate::ir::Function::as_instr`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstrId(pub(crate) usize);

impl InstrId {
    /// Returns the arena index of this handle.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Returns the value handle of this instruction.
    #[must_use]
    #[inline]
    pub const fn value(self) -> ValueId {
        ValueId(self.0)
    }
}

impl fmt::Debug for InstrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstrId({})", self.0)
    }
}

impl fmt::Display for InstrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

impl From<InstrId> for ValueId {
    #[inline]
    fn from(instr: InstrId) -> Self {
        instr.value()
    }
}

/// Handle to a basic block.
///
/// Block handles double as graph node ids, so the function's control flow
/// graph can be handed directly to [`crate::utils::graph::algorithms`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub(crate) usize);

impl BlockId {
    /// Returns the arena index of this handle.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

impl From<BlockId> for NodeId {
    #[inline]
    fn from(block: BlockId) -> Self {
        NodeId::new(block.0)
    }
}

impl From<NodeId> for BlockId {
    #[inline]
    fn from(node: NodeId) -> Self {
        BlockId(node.index())
    }
}

/// Handle to a function within a [`crate::ir::Module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunctionId(pub(crate) usize);

impl FunctionId {
    /// Returns the index of the function within its module.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_literal_type_display() {
        let names: Vec<String> = LiteralType::iter().map(|t| t.to_string()).collect();
        assert_eq!(names, vec!["Void", "Int", "UInt", "String"]);
        assert_eq!(LiteralType::COUNT, 4);
        assert_eq!(LiteralType::default(), LiteralType::Void);
    }

    #[test]
    fn test_handle_format() {
        assert_eq!(format!("{}", ValueId(3)), "v3");
        assert_eq!(format!("{}", InstrId(3)), "%3");
        assert_eq!(format!("{}", BlockId(0)), "bb0");
        assert_eq!(format!("{:?}", BlockId(7)), "BlockId(7)");
        assert_eq!(format!("{}", FunctionId(2)), "fn2");
    }

    #[test]
    fn test_instr_to_value() {
        let instr = InstrId(9);
        let value: ValueId = instr.into();
        assert_eq!(value.index(), 9);
        assert_eq!(ValueId::from(instr), value);
    }

    #[test]
    fn test_block_node_conversion() {
        let node: NodeId = BlockId(4).into();
        assert_eq!(node.index(), 4);
        assert_eq!(BlockId::from(node), BlockId(4));
    }
}
