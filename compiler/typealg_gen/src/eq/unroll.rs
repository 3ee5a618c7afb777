//! Unrolled element-by-element array comparison.

use typealg_types::Idx;

use crate::ir::{BinaryOp, Expr, FunctionBuilder, LabelId, LocalId, LocalTy, Stmt};
use crate::AlgError;

/// Emits comparisons of `p[i]` and `q[i]` for every index of one array type.
pub(super) struct ArrayChecks<'b> {
    pub b: &'b mut FunctionBuilder,
    pub p: LocalId,
    pub q: LocalId,
    pub r: LocalId,
    pub neq: LabelId,
    pub ty: Idx,
    pub elem: Idx,
    pub len: u64,
    counter: Option<LocalId>,
}

impl<'b> ArrayChecks<'b> {
    #[expect(clippy::too_many_arguments, reason = "plain field initialization")]
    pub fn new(
        b: &'b mut FunctionBuilder,
        p: LocalId,
        q: LocalId,
        r: LocalId,
        neq: LabelId,
        ty: Idx,
        elem: Idx,
        len: u64,
    ) -> Self {
        ArrayChecks {
            b,
            p,
            q,
            r,
            neq,
            ty,
            elem,
            len,
            counter: None,
        }
    }

    /// Places `p[index]` and `q[index]`.
    pub fn elements(&self, index: &Expr) -> (Expr, Expr) {
        (
            Expr::index(Expr::deref(self.p, self.ty), index.clone(), self.elem),
            Expr::index(Expr::deref(self.q, self.ty), index.clone(), self.elem),
        )
    }

    fn check(
        &self,
        eq: &impl Fn(Expr, Expr) -> Result<Expr, AlgError>,
        index: &Expr,
    ) -> Result<Expr, AlgError> {
        let (pi, qi) = self.elements(index);
        eq(pi, qi)
    }

    fn counter(&mut self) -> LocalId {
        match self.counter {
            Some(i) => i,
            None => {
                let i = self.b.local("i", LocalTy::Int);
                self.counter = Some(i);
                i
            }
        }
    }

    /// Check `eq(p[i], q[i])` for every index, `unroll` checks per loop
    /// iteration.
    ///
    /// A loop covers the largest multiple of `unroll`; a loop that would
    /// run exactly once is emitted straight-line instead. Remaining indices
    /// get individual guarded checks. With `last`, the final check is
    /// assigned to `r` rather than guarded (or `r = true` when the loop
    /// already covered everything).
    pub fn check_all(
        &mut self,
        unroll: u64,
        last: bool,
        eq: impl Fn(Expr, Expr) -> Result<Expr, AlgError>,
    ) -> Result<(), AlgError> {
        debug_assert!(unroll > 0);
        let mut nelem = self.len;
        let iterations = nelem / unroll;
        let iterate_to = if iterations == 1 { 0 } else { iterations * unroll };

        if iterate_to > 0 {
            let i = self.counter();
            let mut body = Vec::with_capacity(2 * usize::try_from(unroll).unwrap_or(1));
            for _ in 0..unroll {
                body.push(Stmt::guard(self.check(&eq, &Expr::Local(i))?, self.neq));
                body.push(Stmt::assign(
                    i,
                    Expr::binary(BinaryOp::Add, Expr::Local(i), Expr::Const(1)),
                ));
            }
            self.b.push(Stmt::For {
                init: Some(Box::new(Stmt::assign(i, Expr::Const(0)))),
                cond: Expr::binary(BinaryOp::Lt, Expr::Local(i), Expr::Const(iterate_to)),
                post: None,
                body,
            });

            if nelem == iterate_to {
                if last {
                    self.b.push(Stmt::assign(self.r, Expr::Bool(true)));
                }
                return Ok(());
            }
        }

        if last {
            if nelem == 0 {
                self.b.push(Stmt::assign(self.r, Expr::Bool(true)));
                return Ok(());
            }
            nelem -= 1;
        }

        for j in iterate_to..nelem {
            let cond = self.check(&eq, &Expr::Const(j))?;
            self.b.push(Stmt::guard(cond, self.neq));
        }

        if last {
            let cond = self.check(&eq, &Expr::Const(nelem))?;
            self.b.push(Stmt::assign(self.r, cond));
        }
        Ok(())
    }
}
