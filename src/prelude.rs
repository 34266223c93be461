//! # ssagraph Prelude
//!
//! The types needed to build, edit and check a graph, in one glob import.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all ssagraph operations
pub use crate::Error;

/// The result type used throughout ssagraph
pub use crate::Result;

// ================================================================================================
// Graph Containers
// ================================================================================================

/// Owner of all values and blocks of one graph
pub use crate::ir::Function;

/// Collection of independent functions
pub use crate::ir::Module;

/// Instruction sequence and CFG node
pub use crate::ir::BasicBlock;

// ================================================================================================
// Handles
// ================================================================================================

/// Stable handles into a function's arenas
pub use crate::ir::{BlockId, FunctionId, InstrId, ValueId};

// ================================================================================================
// Values and Instructions
// ================================================================================================

/// Values, constants and callee definitions
pub use crate::ir::{
    Constant, FunctionDefinition, InstructionDefinition, LiteralType, Value, ValueKind,
};

/// Instructions and their kinds
pub use crate::ir::{Instr, InstrKind, InstrVisitor, TerminatorKind};

// ================================================================================================
// Verification and Analysis
// ================================================================================================

/// Verifier configuration and findings
pub use crate::ir::{Checks, VerifyConfig, Violation};

/// Dominator tree snapshot
pub use crate::utils::graph::algorithms::DominatorTree;

/// Graph traits implemented by functions
pub use crate::utils::graph::{GraphBase, NodeId, Predecessors, RootedGraph, Successors};
