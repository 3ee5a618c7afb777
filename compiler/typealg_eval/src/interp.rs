//! Statement-by-statement execution of generated functions.
//!
//! Locals are raw words: pointers are addresses, `bool` is `0` or `1`.
//! Labels only appear at the top level of a body, so a `goto` unwinds to
//! the top-level statement list and resumes after the label.

use typealg_gen::ir::{BinaryOp, Expr, GeneratedFunction, LabelId, Stmt};
use typealg_stack::ensure_sufficient_stack;
use typealg_types::{AlgKind, Idx};

use crate::errors::{EvalError, EvalResult};
use crate::Machine;

enum Flow {
    Next,
    Goto(LabelId),
    Return(u64),
}

impl Machine<'_> {
    pub(crate) fn run(&self, func: &GeneratedFunction, args: &[u64]) -> EvalResult<u64> {
        if args.len() != func.params {
            return Err(EvalError::Malformed(format!(
                "expected {} arguments, got {}",
                func.params,
                args.len()
            )));
        }
        let mut frame = vec![0u64; func.locals.len()];
        frame[..args.len()].copy_from_slice(args);

        ensure_sufficient_stack(|| {
            let mut pc = 0;
            while let Some(stmt) = func.body.get(pc) {
                match self.exec(func, &mut frame, stmt)? {
                    Flow::Next => pc += 1,
                    Flow::Goto(label) => pc = label_position(func, label)?,
                    Flow::Return(value) => return Ok(value),
                }
            }
            Err(EvalError::Malformed("control reached end of function".to_owned()))
        })
    }

    fn exec(&self, func: &GeneratedFunction, frame: &mut [u64], stmt: &Stmt) -> EvalResult<Flow> {
        match stmt {
            Stmt::Assign { dst, value } => {
                let value = self.eval(frame, value)?;
                *slot(frame, dst.index())? = value;
                Ok(Flow::Next)
            }
            Stmt::If {
                cond,
                then_body,
                else_body,
            } => {
                let body = if self.eval(frame, cond)? != 0 {
                    then_body
                } else {
                    else_body
                };
                self.exec_block(func, frame, body)
            }
            Stmt::For {
                init,
                cond,
                post,
                body,
            } => {
                if let Some(init) = init {
                    self.exec(func, frame, init)?;
                }
                while self.eval(frame, cond)? != 0 {
                    match self.exec_block(func, frame, body)? {
                        Flow::Next => {}
                        flow => return Ok(flow),
                    }
                    if let Some(post) = post {
                        self.exec(func, frame, post)?;
                    }
                }
                Ok(Flow::Next)
            }
            Stmt::Label(_) => Ok(Flow::Next),
            Stmt::Goto(label) => Ok(Flow::Goto(*label)),
            Stmt::Return(Some(value)) => Ok(Flow::Return(self.eval(frame, value)?)),
            Stmt::Return(None) => {
                let result = func
                    .result
                    .ok_or_else(|| EvalError::Malformed("bare return without result".to_owned()))?;
                Ok(Flow::Return(*slot(frame, result.index())?))
            }
        }
    }

    fn exec_block(
        &self,
        func: &GeneratedFunction,
        frame: &mut [u64],
        body: &[Stmt],
    ) -> EvalResult<Flow> {
        for stmt in body {
            match self.exec(func, frame, stmt)? {
                Flow::Next => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Next)
    }

    fn eval(&self, frame: &[u64], expr: &Expr) -> EvalResult<u64> {
        match expr {
            Expr::Local(id) => frame
                .get(id.index())
                .copied()
                .ok_or_else(|| EvalError::Malformed(format!("no local {}", id.raw()))),
            Expr::Const(n) => Ok(*n),
            Expr::Bool(b) => Ok(u64::from(*b)),
            Expr::Deref { .. } | Expr::Field { .. } | Expr::Index { .. } => {
                let (addr, ty) = self.place(frame, expr)?;
                let size = self.pool.size(ty);
                if size > 8 {
                    return Err(EvalError::Malformed(format!("{size}-byte place used as a word")));
                }
                self.mem.read_uint(addr, size)
            }
            Expr::AddrOf(place) => Ok(self.place(frame, place)?.0),
            Expr::StrLen(place) => {
                let (addr, _) = self.place(frame, place)?;
                Ok(self.string_header(addr)?.1)
            }
            Expr::StrPtr(place) => {
                let (addr, _) = self.place(frame, place)?;
                Ok(self.string_header(addr)?.0)
            }
            Expr::Binary { op, lhs, rhs } => match op {
                BinaryOp::AndAnd => {
                    let value = self.eval(frame, lhs)? != 0 && self.eval(frame, rhs)? != 0;
                    Ok(u64::from(value))
                }
                BinaryOp::Eq if is_place(lhs) && is_place(rhs) => {
                    let (p, pty) = self.place(frame, lhs)?;
                    let (q, qty) = self.place(frame, rhs)?;
                    if pty != qty {
                        return Err(EvalError::Malformed("== on places of different types".to_owned()));
                    }
                    self.places_equal(p, q, pty).map(u64::from)
                }
                BinaryOp::Eq => Ok(u64::from(self.eval(frame, lhs)? == self.eval(frame, rhs)?)),
                BinaryOp::Lt => Ok(u64::from(self.eval(frame, lhs)? < self.eval(frame, rhs)?)),
                BinaryOp::Add => Ok(self.eval(frame, lhs)?.wrapping_add(self.eval(frame, rhs)?)),
            },
            Expr::Call(call) => {
                let args = call
                    .args
                    .iter()
                    .map(|arg| self.eval(frame, arg))
                    .collect::<EvalResult<Vec<_>>>()?;
                self.call(call.callee, &args)
            }
        }
    }

    /// Address and static type of a place expression.
    fn place(&self, frame: &[u64], expr: &Expr) -> EvalResult<(u64, Idx)> {
        match expr {
            Expr::Deref { ptr, ty } => Ok((self.eval(frame, ptr)?, *ty)),
            Expr::Field { base, owner, index } => {
                let (addr, _) = self.place(frame, base)?;
                let field = self.pool.fields(*owner).get(*index).ok_or_else(|| {
                    EvalError::Malformed(format!("no field {index} in type#{}", owner.raw()))
                })?;
                Ok((addr + field.offset, field.ty))
            }
            Expr::Index {
                base,
                index,
                elem,
                bounded,
            } => {
                let (addr, base_ty) = self.place(frame, base)?;
                let i = self.eval(frame, index)?;
                if !bounded {
                    if let Some((_, len)) = self.pool.array_elem(base_ty) {
                        if i >= len {
                            return Err(EvalError::IndexOutOfRange { index: i, len });
                        }
                    }
                }
                Ok((addr + i * self.pool.size(*elem), *elem))
            }
            _ => Err(EvalError::Malformed("expression is not a place".to_owned())),
        }
    }

    /// Inline `==` on two places: bytes for plain memory, numeric for
    /// floats and complex numbers.
    fn places_equal(&self, p: u64, q: u64, ty: Idx) -> EvalResult<bool> {
        match self.pool.alg_type(ty) {
            AlgKind::Mem => self.memequal(p, q, self.pool.size(ty)),
            AlgKind::Float32 => self.f32_eq(p, q),
            AlgKind::Float64 => self.f64_eq(p, q),
            AlgKind::Complex64 => self.c64_eq(p, q),
            AlgKind::Complex128 => self.c128_eq(p, q),
            alg => Err(EvalError::Malformed(format!("inline == on {alg:?} place"))),
        }
    }
}

fn is_place(expr: &Expr) -> bool {
    matches!(expr, Expr::Deref { .. } | Expr::Field { .. } | Expr::Index { .. })
}

fn slot(frame: &mut [u64], index: usize) -> EvalResult<&mut u64> {
    frame
        .get_mut(index)
        .ok_or_else(|| EvalError::Malformed(format!("no local {index}")))
}

fn label_position(func: &GeneratedFunction, label: LabelId) -> EvalResult<usize> {
    func.body
        .iter()
        .position(|stmt| matches!(stmt, Stmt::Label(l) if *l == label))
        .ok_or_else(|| {
            EvalError::Malformed(format!("label {} is not at top level", func.label_name(label)))
        })
}
