//! The function: owner of every value and block of one graph.
//!
//! A [`Function`] holds two arenas (values and blocks), the block layout, the
//! entry block and the verifier configuration. All IR operations are methods
//! on `Function` taking handles, so a single `&mut Function` is the only way
//! to mutate a graph. That makes concurrent mutation of one graph impossible
//! and lets separate functions be built and checked on different threads.
//!
//! The control flow graph of a function implements the traits of
//! [`crate::utils::graph`]. Node ids are block indices; removed blocks leave
//! holes that are never yielded.

use std::collections::HashMap;

use crate::{
    ir::{BasicBlock, BlockId, Constant, Instr, InstrId, Value, ValueId, ValueKind, VerifyConfig},
    utils::graph::{GraphBase, NodeId, Predecessors, RootedGraph, Successors},
    Error, Result,
};

/// An SSA value graph together with its control flow graph.
///
/// # Examples
///
/// ```rust
/// use ssagraph::ir::Function;
///
/// let mut func = Function::new("main");
/// let entry = func.create_block("entry");
/// let zero = func.const_int(0);
/// let ret = func.create_ret(Some(zero)).unwrap();
/// func.push_back(entry, ret).unwrap();
///
/// assert!(func.is_complete(entry).unwrap());
/// assert!(func.check_function().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Function {
    pub(crate) name: String,
    pub(crate) values: Vec<Option<Value>>,
    pub(crate) blocks: Vec<Option<BasicBlock>>,
    pub(crate) layout: Vec<BlockId>,
    pub(crate) entry: Option<BlockId>,
    pub(crate) constants: HashMap<Constant, ValueId>,
    pub(crate) config: VerifyConfig,
}

impl Function {
    /// Creates an empty function with the default verifier configuration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, VerifyConfig::default())
    }

    /// Creates an empty function verified according to `config`.
    #[must_use]
    pub fn with_config(name: impl Into<String>, config: VerifyConfig) -> Self {
        Function {
            name: name.into(),
            values: Vec::new(),
            blocks: Vec::new(),
            layout: Vec::new(),
            entry: None,
            constants: HashMap::new(),
            config,
        }
    }

    /// Returns the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the verifier configuration.
    #[must_use]
    pub const fn verify_config(&self) -> &VerifyConfig {
        &self.config
    }

    /// Replaces the verifier configuration.
    pub fn set_verify_config(&mut self, config: VerifyConfig) {
        self.config = config;
    }

    /// Returns the value behind `id`, or `None` if it was erased.
    #[must_use]
    pub fn value(&self, id: ValueId) -> Option<&Value> {
        self.values.get(id.0)?.as_ref()
    }

    /// Returns the instruction behind `id`, or `None` if it was erased.
    #[must_use]
    pub fn instr(&self, id: InstrId) -> Option<&Instr> {
        self.value(id.value())?.as_instr()
    }

    /// Returns the block behind `id`, or `None` if it was removed.
    #[must_use]
    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(id.0)?.as_ref()
    }

    /// Narrows a value handle to an instruction handle.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidValue`] if `value` is stale
    /// - [`Error::NotAnInstruction`] if it is a constant
    pub fn as_instr(&self, value: ValueId) -> Result<InstrId> {
        match self.value_ref(value)?.kind {
            ValueKind::Instr(_) => Ok(InstrId(value.0)),
            ValueKind::Constant(_) => Err(Error::NotAnInstruction(value)),
        }
    }

    /// Iterates over all live values in creation order.
    pub fn values(&self) -> impl Iterator<Item = (ValueId, &Value)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|value| (ValueId(index), value)))
    }

    /// Iterates over all live instructions in creation order, attached or not.
    pub fn instrs(&self) -> impl Iterator<Item = (InstrId, &Instr)> {
        self.values()
            .filter_map(|(id, value)| value.as_instr().map(|instr| (InstrId(id.0), instr)))
    }

    /// Iterates over all live blocks in creation order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &BasicBlock)> {
        self.blocks
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|block| (BlockId(index), block)))
    }

    /// Returns a view of the control flow graph rooted at the entry block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoEntryBlock`] if the function has no entry block.
    pub fn cfg(&self) -> Result<Cfg<'_>> {
        let entry = self.entry.ok_or(Error::NoEntryBlock)?;
        Ok(Cfg { func: self, entry })
    }

    pub(crate) fn alloc_value(&mut self, value: Value) -> ValueId {
        let id = ValueId(self.values.len());
        self.values.push(Some(value));
        id
    }

    pub(crate) fn value_ref(&self, id: ValueId) -> Result<&Value> {
        self.value(id).ok_or(Error::InvalidValue(id))
    }

    pub(crate) fn value_mut(&mut self, id: ValueId) -> Result<&mut Value> {
        self.values
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(Error::InvalidValue(id))
    }

    pub(crate) fn instr_ref(&self, id: InstrId) -> Result<&Instr> {
        self.instr(id).ok_or(Error::InvalidInstr(id))
    }

    pub(crate) fn instr_mut(&mut self, id: InstrId) -> Result<&mut Instr> {
        match self.values.get_mut(id.0).and_then(Option::as_mut) {
            Some(Value {
                kind: ValueKind::Instr(instr),
                ..
            }) => Ok(instr),
            _ => Err(Error::InvalidInstr(id)),
        }
    }

    pub(crate) fn block_ref(&self, id: BlockId) -> Result<&BasicBlock> {
        self.block(id).ok_or(Error::InvalidBlock(id))
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> Result<&mut BasicBlock> {
        self.blocks
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(Error::InvalidBlock(id))
    }

    fn block_edges(&self, node: NodeId, successors: bool) -> impl Iterator<Item = NodeId> + '_ {
        self.block(BlockId::from(node))
            .map(|block| {
                if successors {
                    block.successors()
                } else {
                    block.predecessors()
                }
            })
            .unwrap_or_default()
            .iter()
            .map(|&b| NodeId::from(b))
    }
}

impl GraphBase for Function {
    fn node_count(&self) -> usize {
        self.blocks.len()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        self.blocks().map(|(id, _)| NodeId::from(id))
    }
}

impl Successors for Function {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.block_edges(node, true)
    }
}

impl Predecessors for Function {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.block_edges(node, false)
    }
}

/// The control flow graph of a [`Function`], rooted at its entry block.
///
/// Obtained from [`Function::cfg`]; feeds the algorithms of
/// [`crate::utils::graph::algorithms`].
#[derive(Debug, Clone, Copy)]
pub struct Cfg<'f> {
    func: &'f Function,
    entry: BlockId,
}

impl Cfg<'_> {
    /// Returns the entry block.
    #[must_use]
    pub const fn entry_block(&self) -> BlockId {
        self.entry
    }
}

impl GraphBase for Cfg<'_> {
    fn node_count(&self) -> usize {
        self.func.node_count()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        self.func.node_ids()
    }
}

impl Successors for Cfg<'_> {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.func.successors(node)
    }
}

impl Predecessors for Cfg<'_> {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.func.predecessors(node)
    }
}

impl RootedGraph for Cfg<'_> {
    fn entry(&self) -> NodeId {
        self.entry.into()
    }
}
