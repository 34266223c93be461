use thiserror::Error;

use crate::ir::{BlockId, InstrId, ValueId};

/// The generic Error type, which covers every caller contract violation the
/// graph operations can report.
///
/// Every fallible operation validates its handles and preconditions before it
/// touches the graph. When an operation returns one of these errors the graph
/// is exactly as it was before the call, so the caller may recover (typically
/// by aborting the enclosing compilation with a source-level diagnostic).
///
/// Internal invariant violations are not reported through this type. They are
/// found by the verifier and described by [`crate::ir::Violation`].
///
/// # Error Categories
///
/// ## Stale or mismatched handles
/// - [`Error::InvalidValue`] - The value was erased or never existed
/// - [`Error::InvalidInstr`] - The instruction was erased or never existed
/// - [`Error::InvalidBlock`] - The block was removed or never existed
/// - [`Error::NotAnInstruction`] - An instruction handle was expected
/// - [`Error::NotACallee`] - Operand 0 of a call-like instruction must be a definition
///
/// ## Operand editing
/// - [`Error::OperandOutOfRange`] - Operand index past the end of the operand list
/// - [`Error::MissingOperands`] - The instruction kind needs at least one operand
///
/// ## Block membership
/// - [`Error::DetachedInstr`] - The instruction does not belong to any block
/// - [`Error::AlreadyAttached`] - The instruction already belongs to a block
/// - [`Error::NotInBlock`] - The instruction belongs to a different block
/// - [`Error::SameInstr`] - An instruction cannot replace itself
///
/// ## Block structure
/// - [`Error::BlockTerminated`] - Appending after a terminator
/// - [`Error::TerminatorNotLast`] - A terminator would land before the end
/// - [`Error::BlockComplete`] - Merging into an already complete block
/// - [`Error::SelfMerge`] - Merging a block into itself
///
/// ## Lifetime
/// - [`Error::ValueInUse`] - Destroying a value that still has users
///
/// ## Dominance
/// - [`Error::NoEntryBlock`] - The function has no entry block
/// - [`Error::UnreachableBlock`] - Dominance is undefined for unreachable blocks
///
/// # Examples
///
/// ```rust
/// use ssagraph::{Error, ir::Function};
///
/// let mut func = Function::new("main");
/// let a = func.const_int(1);
/// let phi = func.create_phi(vec![a], "x").unwrap();
///
/// match func.set_operand(phi, 3, a) {
///     Err(Error::OperandOutOfRange { index, count }) => {
///         assert_eq!((index, count), (3, 1));
///     }
///     other => panic!("unexpected result: {other:?}"),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The value handle does not refer to a live value.
    ///
    /// The value was erased, or the handle belongs to another function.
    #[error("Value {0} does not exist")]
    InvalidValue(ValueId),

    /// The instruction handle does not refer to a live instruction.
    #[error("Instruction {0} does not exist")]
    InvalidInstr(InstrId),

    /// The block handle does not refer to a live block.
    #[error("Block {0} does not exist")]
    InvalidBlock(BlockId),

    /// The value exists but is not an instruction.
    #[error("Value {0} is not an instruction")]
    NotAnInstruction(ValueId),

    /// Operand 0 of a call-like instruction must be a matching callee definition.
    ///
    /// `Cpu` instructions take an instruction definition, `Call` instructions
    /// take a function definition.
    #[error("Value {0} is not a valid callee definition")]
    NotACallee(ValueId),

    /// An operand index was past the end of the operand list.
    ///
    /// # Fields
    ///
    /// * `index` - The requested operand index
    /// * `count` - The operand count at the time of the call
    #[error("Operand index {index} out of range (instruction has {count} operands)")]
    OperandOutOfRange {
        /// The requested operand index
        index: usize,
        /// The number of operands the instruction has
        count: usize,
    },

    /// The instruction kind requires at least one operand.
    #[error("Instruction requires at least one operand")]
    MissingOperands,

    /// The instruction does not belong to any block.
    ///
    /// Returned by [`crate::ir::Function::replace_instr`], which delegates
    /// to the owning block.
    #[error("Instruction {0} is not attached to a block")]
    DetachedInstr(InstrId),

    /// The instruction already belongs to a block.
    ///
    /// An instruction lives in at most one block at a time. Remove it from
    /// its current block before inserting it elsewhere.
    #[error("Instruction {instr} already belongs to block {block}")]
    AlreadyAttached {
        /// The instruction that was to be inserted
        instr: InstrId,
        /// The block that currently owns it
        block: BlockId,
    },

    /// The instruction is not part of the given block.
    #[error("Instruction {instr} is not part of block {block}")]
    NotInBlock {
        /// The instruction that was looked up
        instr: InstrId,
        /// The block it was expected in
        block: BlockId,
    },

    /// An instruction cannot be replaced by itself.
    #[error("Instruction {0} cannot replace itself")]
    SameInstr(InstrId),

    /// The block already ends in a terminator; nothing may follow it.
    #[error("Block {0} already ends in a terminator")]
    BlockTerminated(BlockId),

    /// The edit would place a terminator before the end of the block.
    #[error("Terminator {instr} would not be the last instruction of block {block}")]
    TerminatorNotLast {
        /// The terminator instruction
        instr: InstrId,
        /// The block being edited
        block: BlockId,
    },

    /// The block is already complete and cannot absorb a fall-through merge.
    #[error("Block {0} is already complete")]
    BlockComplete(BlockId),

    /// A block cannot be merged into itself.
    #[error("Block {0} cannot be merged into itself")]
    SelfMerge(BlockId),

    /// The value still has users and cannot be destroyed.
    ///
    /// # Fields
    ///
    /// * `value` - The value that was to be destroyed
    /// * `count` - Its remaining use count
    #[error("Value {value} is still used {count} time(s)")]
    ValueInUse {
        /// The value that was to be destroyed
        value: ValueId,
        /// The number of remaining uses
        count: usize,
    },

    /// The function has no entry block, so dominance is undefined.
    #[error("Function has no entry block")]
    NoEntryBlock,

    /// The block is not reachable from the entry block.
    #[error("Block {0} is not reachable from the entry block")]
    UnreachableBlock(BlockId),
}
