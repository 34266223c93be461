//! The SSA value graph and control flow graph.
//!
//! # Architecture
//!
//! A [`Function`] owns two arenas: values (constants, definitions and
//! instructions) and basic blocks. Everything else refers to nodes by handle:
//!
//! - [`ValueId`] - any value
//! - [`InstrId`] - an instruction; converts into its [`ValueId`]
//! - [`BlockId`] - a basic block; converts into a graph node id
//!
//! Two relations are kept consistent by every mutating operation:
//!
//! - **Use-def**: an instruction's operand slots and the use lists of the
//!   values they reference describe the same edges, one use entry per slot
//! - **CFG**: successor and predecessor lists mirror each other
//!
//! Instructions belong to at most one block at a time, and at most one
//! instruction of a block (the last) is a terminator. Operations check their
//! preconditions before they mutate anything, so a rejected call leaves the
//! graph exactly as it was. [`Function::verify`] re-checks the invariants
//! after a pass and aborts if they do not hold.
//!
//! # Key Components
//!
//! - [`Value`], [`Constant`] - leaves of the use-def graph
//! - [`Instr`], [`InstrKind`] - instructions and their closed set of kinds
//! - [`BasicBlock`] - instruction sequences and CFG nodes
//! - [`InstrVisitor`] - per-kind dispatch
//! - [`VerifyConfig`], [`Violation`] - invariant checking
//! - [`Module`] - independent functions checked in parallel
//!
//! # Examples
//!
//! ```rust
//! use ssagraph::ir::Function;
//!
//! let mut func = Function::new("select");
//! let entry = func.create_block("entry");
//! let then = func.create_block("then");
//! let join = func.create_block("join");
//!
//! let cond = func.const_int(1);
//! let branch = func.create_cond_br(cond, then, join).unwrap();
//! func.push_back(entry, branch).unwrap();
//! func.link_successor(entry, then).unwrap();
//! func.link_successor(entry, join).unwrap();
//!
//! let br = func.create_br(join).unwrap();
//! func.push_back(then, br).unwrap();
//! func.link_successor(then, join).unwrap();
//!
//! let a = func.const_int(10);
//! let b = func.const_int(20);
//! let phi = func.create_phi(vec![a, b], "x").unwrap();
//! func.push_back(join, phi).unwrap();
//!
//! assert_eq!(func.immediate_dominator(join).unwrap(), Some(entry));
//! assert_eq!(func.use_count(a).unwrap(), 1);
//! func.verify_function();
//! ```

mod block;
mod dominance;
mod function;
mod instr;
mod module;
mod types;
mod value;
mod verify;
mod visitor;

pub use block::BasicBlock;
pub use function::{Cfg, Function};
pub use instr::{Instr, InstrKind, TerminatorKind};
pub use module::Module;
pub use types::{BlockId, FunctionId, InstrId, LiteralType, ValueId};
pub use value::{Constant, FunctionDefinition, InstructionDefinition, Value, ValueKind};
pub use verify::{Checks, VerifyConfig, Violation};
pub use visitor::InstrVisitor;
