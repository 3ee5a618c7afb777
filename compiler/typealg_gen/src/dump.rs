//! Textual rendering of generated functions.
//!
//! Go-like syntax, one statement per line:
//!
//! ```text
//! func .eq.[2]string(p *[2]string, q *[2]string) (r bool) {
//!     if len(p[0]) == len(q[0]) {} else { goto neq }
//!     ...
//! ret:
//!     return
//! neq:
//!     r = false
//!     goto ret
//! }
//! ```
//!
//! Places through a parameter pointer print without the explicit
//! dereference (`p.a`, `p[i]`), as Go spells them.

use typealg_ir::StringLookup;
use typealg_types::Pool;

use crate::ir::{BinaryOp, Callee, Expr, GeneratedFunction, LocalId, LocalTy, Stmt};
use crate::Purpose;

const INDENT: &str = "    ";

/// Render `func` as source text.
pub fn function(func: &GeneratedFunction, pool: &Pool, names: &dyn StringLookup) -> String {
    let mut printer = Printer {
        func,
        pool,
        names,
        out: String::with_capacity(256),
        depth: 1,
    };
    printer.emit_function();
    printer.out
}

struct Printer<'a> {
    func: &'a GeneratedFunction,
    pool: &'a Pool,
    names: &'a dyn StringLookup,
    out: String,
    depth: usize,
}

impl Printer<'_> {
    fn emit_function(&mut self) {
        self.out.push_str("func ");
        self.out.push_str(self.names.lookup(self.func.name));
        self.out.push('(');
        for (n, id) in self.func.param_ids().enumerate() {
            if n > 0 {
                self.out.push_str(", ");
            }
            self.emit_decl(id);
        }
        self.out.push(')');
        match (self.func.result, self.func.purpose) {
            (Some(r), _) => {
                self.out.push_str(" (");
                self.emit_decl(r);
                self.out.push(')');
            }
            (None, Purpose::Hash) => self.out.push_str(" uintptr"),
            (None, Purpose::Equal) => self.out.push_str(" bool"),
        }
        self.out.push_str(" {\n");

        for (n, decl) in self.func.locals.iter().enumerate().skip(self.func.params) {
            if self.func.result.is_some_and(|r| r.index() == n) {
                continue;
            }
            self.out.push_str(INDENT);
            self.out.push_str("var ");
            self.out.push_str(decl.name);
            self.out.push(' ');
            self.emit_local_ty(decl.ty);
            self.out.push('\n');
        }

        for stmt in &self.func.body {
            self.emit_stmt(stmt);
        }
        self.out.push_str("}\n");
    }

    fn emit_decl(&mut self, id: LocalId) {
        let decl = self.func.local(id);
        self.out.push_str(decl.name);
        self.out.push(' ');
        self.emit_local_ty(decl.ty);
    }

    fn emit_local_ty(&mut self, ty: LocalTy) {
        match ty {
            LocalTy::Ptr(ty) => {
                self.out.push('*');
                self.pool.format_type_into(ty, self.names, &mut self.out);
            }
            LocalTy::Uintptr => self.out.push_str("uintptr"),
            LocalTy::Int => self.out.push_str("int"),
            LocalTy::Bool => self.out.push_str("bool"),
        }
    }

    fn line_start(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn emit_block(&mut self, body: &[Stmt]) {
        self.depth += 1;
        for stmt in body {
            self.emit_stmt(stmt);
        }
        self.depth -= 1;
    }

    fn emit_stmt(&mut self, stmt: &Stmt) {
        if let Stmt::Label(label) = stmt {
            // Labels hang one level out.
            for _ in 1..self.depth {
                self.out.push_str(INDENT);
            }
            self.out.push_str(self.func.label_name(*label));
            self.out.push_str(":\n");
            return;
        }

        self.line_start();
        match stmt {
            Stmt::If {
                cond,
                then_body,
                else_body,
            } => self.emit_if(cond, then_body, else_body),
            Stmt::For {
                init,
                cond,
                post,
                body,
            } => {
                self.out.push_str("for ");
                if let Some(init) = init {
                    self.emit_simple(init);
                }
                self.out.push_str("; ");
                self.emit_expr(cond);
                self.out.push_str("; ");
                if let Some(post) = post {
                    self.emit_simple(post);
                    self.out.push(' ');
                }
                self.out.push_str("{\n");
                self.emit_block(body);
                self.line_start();
                self.out.push_str("}\n");
            }
            _ => {
                self.emit_simple(stmt);
                self.out.push('\n');
            }
        }
    }

    /// `if c {} else { goto l }` stays on one line.
    fn emit_if(&mut self, cond: &Expr, then_body: &[Stmt], else_body: &[Stmt]) {
        self.out.push_str("if ");
        self.emit_expr(cond);
        if let ([], [Stmt::Goto(label)]) = (then_body, else_body) {
            self.out.push_str(" {} else { goto ");
            self.out.push_str(self.func.label_name(*label));
            self.out.push_str(" }\n");
            return;
        }

        self.out.push_str(" {\n");
        self.emit_block(then_body);
        self.line_start();
        if else_body.is_empty() {
            self.out.push_str("}\n");
            return;
        }
        self.out.push_str("} else {\n");
        self.emit_block(else_body);
        self.line_start();
        self.out.push_str("}\n");
    }

    /// Statements that fit on one line, without the trailing newline.
    fn emit_simple(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign { dst, value } => {
                self.out.push_str(self.func.local(*dst).name);
                self.out.push_str(" = ");
                self.emit_expr(value);
            }
            Stmt::Goto(label) => {
                self.out.push_str("goto ");
                self.out.push_str(self.func.label_name(*label));
            }
            Stmt::Return(None) => self.out.push_str("return"),
            Stmt::Return(Some(value)) => {
                self.out.push_str("return ");
                self.emit_expr(value);
            }
            Stmt::Label(label) => {
                self.out.push_str(self.func.label_name(*label));
                self.out.push(':');
            }
            Stmt::If { .. } | Stmt::For { .. } => self.out.push_str("..."),
        }
    }

    fn emit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Local(id) => self.out.push_str(self.func.local(*id).name),
            Expr::Const(n) => self.out.push_str(&n.to_string()),
            Expr::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Expr::Deref { ptr, .. } => {
                self.out.push('*');
                self.emit_expr(ptr);
            }
            Expr::Field { base, owner, index } => {
                self.emit_place_base(base);
                self.out.push('.');
                let name = self
                    .pool
                    .fields(*owner)
                    .get(*index)
                    .and_then(|f| f.name)
                    .map_or("_", |n| self.names.lookup(n));
                self.out.push_str(name);
            }
            Expr::Index { base, index, .. } => {
                self.emit_place_base(base);
                self.out.push('[');
                self.emit_expr(index);
                self.out.push(']');
            }
            Expr::AddrOf(place) => {
                self.out.push('&');
                self.emit_expr(place);
            }
            Expr::StrLen(s) => {
                self.out.push_str("len(");
                self.emit_expr(s);
                self.out.push(')');
            }
            Expr::StrPtr(s) => {
                self.emit_expr(s);
                self.out.push_str(".ptr");
            }
            Expr::Binary { op, lhs, rhs } => {
                self.emit_operand(lhs, *op);
                self.out.push(' ');
                self.out.push_str(op.as_str());
                self.out.push(' ');
                self.emit_operand(rhs, *op);
            }
            Expr::Call(call) => {
                match call.callee {
                    Callee::Runtime(func) => self.out.push_str(&func.to_string()),
                    Callee::Generated(name) => self.out.push_str(self.names.lookup(name)),
                }
                self.out.push('(');
                for (n, arg) in call.args.iter().enumerate() {
                    if n > 0 {
                        self.out.push_str(", ");
                    }
                    self.emit_expr(arg);
                }
                self.out.push(')');
            }
        }
    }

    /// A dereferenced pointer used as a selector or index base prints as
    /// the pointer itself.
    fn emit_place_base(&mut self, base: &Expr) {
        match base {
            Expr::Deref { ptr, .. } => self.emit_expr(ptr),
            _ => self.emit_expr(base),
        }
    }

    fn emit_operand(&mut self, operand: &Expr, parent: BinaryOp) {
        let wrap = matches!(operand, Expr::Binary { op, .. } if precedence(*op) < precedence(parent));
        if wrap {
            self.out.push('(');
        }
        self.emit_expr(operand);
        if wrap {
            self.out.push(')');
        }
    }
}

fn precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::AndAnd => 1,
        BinaryOp::Eq | BinaryOp::Lt => 3,
        BinaryOp::Add => 4,
    }
}
