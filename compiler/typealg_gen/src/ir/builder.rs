//! Incremental construction of a [`GeneratedFunction`].

use typealg_ir::Name;
use typealg_types::Idx;

use super::{FuncFlags, GeneratedFunction, LabelId, LocalDecl, LocalId, LocalTy, Stmt};
use crate::Purpose;

/// Collects locals, labels, and top-level statements for one function.
///
/// Parameters must be declared before any other local.
pub struct FunctionBuilder {
    locals: Vec<LocalDecl>,
    params: usize,
    labels: Vec<&'static str>,
    body: Vec<Stmt>,
}

impl FunctionBuilder {
    pub fn new() -> Self {
        FunctionBuilder {
            locals: Vec::with_capacity(4),
            params: 0,
            labels: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn param(&mut self, name: &'static str, ty: LocalTy) -> LocalId {
        debug_assert_eq!(self.params, self.locals.len(), "parameter after local");
        self.params += 1;
        self.local(name, ty)
    }

    pub fn local(&mut self, name: &'static str, ty: LocalTy) -> LocalId {
        let id = LocalId::new(
            u32::try_from(self.locals.len())
                .unwrap_or_else(|_| panic!("too many locals in generated function")),
        );
        self.locals.push(LocalDecl { name, ty });
        id
    }

    pub fn label(&mut self, name: &'static str) -> LabelId {
        let id = LabelId::new(
            u32::try_from(self.labels.len())
                .unwrap_or_else(|_| panic!("too many labels in generated function")),
        );
        self.labels.push(name);
        id
    }

    pub fn push(&mut self, stmt: Stmt) {
        self.body.push(stmt);
    }

    /// The statements emitted so far.
    pub fn body(&self) -> &[Stmt] {
        &self.body
    }

    pub fn finish(
        self,
        name: Name,
        ty: Idx,
        purpose: Purpose,
        result: Option<LocalId>,
        flags: FuncFlags,
    ) -> GeneratedFunction {
        GeneratedFunction {
            name,
            ty,
            purpose,
            locals: self.locals,
            params: self.params,
            result,
            labels: self.labels,
            body: self.body,
            flags,
        }
    }
}

impl Default for FunctionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
