//! Emission IR for generated hash and equality functions.
//!
//! A deliberately small structured statement tree: assignments, `if`,
//! counted `for`, labels, `goto`, and `return`. Expressions address memory
//! through *places* (`*p`, `p.f`, `p[i]`) that carry their static type, so
//! a back end (or the reference interpreter) knows how wide every load and
//! comparison is without a separate type table.
//!
//! Parameters come first in [`GeneratedFunction::locals`]. Hash functions
//! take `(p *T, h uintptr)` and return `h`; equality functions take
//! `(p, q *T)` and return through the named result `r`.

use bitflags::bitflags;
use typealg_ir::Name;
use typealg_types::Idx;

use crate::registry::RuntimeFn;
use crate::Purpose;

mod builder;

pub use builder::FunctionBuilder;

// ── ID newtypes ─────────────────────────────────────────────────────

/// Local variable (or parameter) of a generated function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct LocalId(u32);

impl LocalId {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Jump target within a generated function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct LabelId(u32);

impl LabelId {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ── Locals ──────────────────────────────────────────────────────────

/// Static type of a local.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum LocalTy {
    /// Pointer to a value of the given type.
    Ptr(Idx),
    /// Running hash state.
    Uintptr,
    /// Loop counter.
    Int,
    /// Equality result.
    Bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LocalDecl {
    pub name: &'static str,
    pub ty: LocalTy,
}

// ── Expressions ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    /// Equality of two scalars or two places of the same type. Plain-memory
    /// places compare bytewise, float and complex places numerically.
    Eq,
    Lt,
    Add,
    /// Short-circuit conjunction.
    AndAnd,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::Lt => "<",
            BinaryOp::Add => "+",
            BinaryOp::AndAnd => "&&",
        }
    }
}

/// Target of a call expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Callee {
    Runtime(RuntimeFn),
    /// A generated function, by symbol.
    Generated(Name),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Call {
    pub callee: Callee,
    pub args: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    Local(LocalId),
    /// Non-negative integer constant (indices, lengths, byte sizes).
    Const(u64),
    Bool(bool),
    /// Place `*ptr` of type `ty`.
    Deref { ptr: Box<Expr>, ty: Idx },
    /// Place `base.f`, where `base` is a place of struct type `owner` and
    /// `f` is its field number `index`.
    Field {
        base: Box<Expr>,
        owner: Idx,
        index: usize,
    },
    /// Place `base[index]` with element type `elem`. `bounded` marks an
    /// index already proven in range.
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
        elem: Idx,
        bounded: bool,
    },
    AddrOf(Box<Expr>),
    /// Length word of a string place.
    StrLen(Box<Expr>),
    /// Data pointer of a string place.
    StrPtr(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call(Call),
}

impl Expr {
    /// `*local`
    pub fn deref(local: LocalId, ty: Idx) -> Expr {
        Expr::Deref {
            ptr: Box::new(Expr::Local(local)),
            ty,
        }
    }

    pub fn field(base: Expr, owner: Idx, index: usize) -> Expr {
        Expr::Field {
            base: Box::new(base),
            owner,
            index,
        }
    }

    /// Bounds-check-free element access.
    pub fn index(base: Expr, index: Expr, elem: Idx) -> Expr {
        Expr::Index {
            base: Box::new(base),
            index: Box::new(index),
            elem,
            bounded: true,
        }
    }

    pub fn addr_of(place: Expr) -> Expr {
        Expr::AddrOf(Box::new(place))
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn eq(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Eq, lhs, rhs)
    }

    /// `lhs && rhs`, or just `rhs` when there is nothing to the left.
    pub fn and(lhs: Option<Expr>, rhs: Expr) -> Expr {
        match lhs {
            Some(lhs) => Expr::binary(BinaryOp::AndAnd, lhs, rhs),
            None => rhs,
        }
    }

    pub fn call(callee: Callee, args: Vec<Expr>) -> Expr {
        Expr::Call(Call { callee, args })
    }

    /// Whether this expression is itself a call (not whether it contains one).
    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self, Expr::Call(_))
    }

    /// Whether a call appears anywhere in this expression.
    pub fn contains_call(&self) -> bool {
        match self {
            Expr::Call(_) => true,
            Expr::Local(_) | Expr::Const(_) | Expr::Bool(_) => false,
            Expr::Deref { ptr: e, .. }
            | Expr::Field { base: e, .. }
            | Expr::AddrOf(e)
            | Expr::StrLen(e)
            | Expr::StrPtr(e) => e.contains_call(),
            Expr::Index { base, index, .. } => base.contains_call() || index.contains_call(),
            Expr::Binary { lhs, rhs, .. } => lhs.contains_call() || rhs.contains_call(),
        }
    }
}

// ── Statements ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Stmt {
    Assign {
        dst: LocalId,
        value: Expr,
    },
    If {
        cond: Expr,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },
    /// `for init; cond; post { body }`
    For {
        init: Option<Box<Stmt>>,
        cond: Expr,
        post: Option<Box<Stmt>>,
        body: Vec<Stmt>,
    },
    Label(LabelId),
    Goto(LabelId),
    /// `None` returns the named results.
    Return(Option<Expr>),
}

impl Stmt {
    pub fn assign(dst: LocalId, value: Expr) -> Stmt {
        Stmt::Assign { dst, value }
    }

    /// `if cond {} else { goto target }`
    pub fn guard(cond: Expr, target: LabelId) -> Stmt {
        Stmt::If {
            cond,
            then_body: Vec::new(),
            else_body: vec![Stmt::Goto(target)],
        }
    }

    pub fn contains_call(&self) -> bool {
        match self {
            Stmt::Assign { value, .. } => value.contains_call(),
            Stmt::If {
                cond,
                then_body,
                else_body,
            } => cond.contains_call() || any_call(then_body) || any_call(else_body),
            Stmt::For {
                init,
                cond,
                post,
                body,
            } => {
                init.as_deref().is_some_and(Stmt::contains_call)
                    || cond.contains_call()
                    || post.as_deref().is_some_and(Stmt::contains_call)
                    || any_call(body)
            }
            Stmt::Label(_) | Stmt::Goto(_) => false,
            Stmt::Return(value) => value.as_ref().is_some_and(Expr::contains_call),
        }
    }
}

/// Whether any statement in `body` contains a call.
pub fn any_call(body: &[Stmt]) -> bool {
    body.iter().any(Stmt::contains_call)
}

// ── Functions ───────────────────────────────────────────────────────

bitflags! {
    /// Attributes of a generated function.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct FuncFlags: u8 {
        /// Never inline into callers.
        const NOINLINE = 1 << 0;
        /// Identical copies from several units may be merged.
        const DUPOK = 1 << 1;
        /// Callers guarantee non-nil pointers; no nil checks are inserted.
        const NIL_CHECK_DISABLED = 1 << 2;
    }
}

/// A synthesized hash or equality function.
///
/// Built once per (type, purpose) and shared immutably afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFunction {
    pub name: Name,
    pub ty: Idx,
    pub purpose: Purpose,
    /// Parameters first, then other locals.
    pub locals: Vec<LocalDecl>,
    pub params: usize,
    /// Named result, if the function returns through one.
    pub result: Option<LocalId>,
    /// Label names, indexed by [`LabelId`].
    pub labels: Vec<&'static str>,
    pub body: Vec<Stmt>,
    pub flags: FuncFlags,
}

impl GeneratedFunction {
    pub fn local(&self, id: LocalId) -> &LocalDecl {
        &self.locals[id.index()]
    }

    pub fn param_ids(&self) -> impl Iterator<Item = LocalId> {
        (0..self.params).map(|i| LocalId::new(u32::try_from(i).unwrap_or(u32::MAX)))
    }

    pub fn label_name(&self, id: LabelId) -> &'static str {
        self.labels[id.index()]
    }

    pub fn contains_call(&self) -> bool {
        any_call(&self.body)
    }
}

#[cfg(test)]
mod tests;
