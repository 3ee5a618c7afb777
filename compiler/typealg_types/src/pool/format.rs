//! Type formatting.
//!
//! The rendering doubles as the type component of generated symbol names
//! (`.hash.[4]string`), so it must be stable and distinct for distinct
//! types.

use typealg_ir::StringLookup;
use typealg_stack::ensure_sufficient_stack;

use crate::{Idx, Pool, TypeKind};

impl Pool {
    /// Render a type as source-like text.
    pub fn format_type(&self, idx: Idx, names: &dyn StringLookup) -> String {
        let mut buf = String::new();
        self.format_type_into(idx, names, &mut buf);
        buf
    }

    pub fn format_type_into(&self, idx: Idx, names: &dyn StringLookup, buf: &mut String) {
        if let Some(name) = idx.name() {
            buf.push_str(name);
            return;
        }

        ensure_sufficient_stack(|| match self.kind(idx) {
            TypeKind::Pointer(elem) => {
                buf.push('*');
                self.format_type_into(*elem, names, buf);
            }
            TypeKind::Chan(elem) => {
                buf.push_str("chan ");
                self.format_type_into(*elem, names, buf);
            }
            TypeKind::Slice(elem) => {
                buf.push_str("[]");
                self.format_type_into(*elem, names, buf);
            }
            TypeKind::Map { key, value } => {
                buf.push_str("map[");
                self.format_type_into(*key, names, buf);
                buf.push(']');
                self.format_type_into(*value, names, buf);
            }
            TypeKind::Func { params, results } => {
                buf.push_str("func(");
                self.format_list(params, names, buf);
                buf.push(')');
                match results.len() {
                    0 => {}
                    1 => {
                        buf.push(' ');
                        self.format_type_into(results[0], names, buf);
                    }
                    _ => {
                        buf.push_str(" (");
                        self.format_list(results, names, buf);
                        buf.push(')');
                    }
                }
            }
            TypeKind::Interface(name) => buf.push_str(names.lookup(*name)),
            TypeKind::Array { elem, len } => {
                buf.push('[');
                buf.push_str(&len.to_string());
                buf.push(']');
                self.format_type_into(*elem, names, buf);
            }
            TypeKind::Struct {
                name: Some(name), ..
            } => {
                buf.push_str(names.lookup(*name));
                if let Some(n) = self.vargen(idx) {
                    buf.push('·');
                    buf.push_str(&n.to_string());
                }
            }
            TypeKind::Struct { name: None, fields } => {
                if fields.is_empty() {
                    buf.push_str("struct {}");
                    return;
                }
                buf.push_str("struct { ");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        buf.push_str("; ");
                    }
                    match field.name {
                        Some(name) => buf.push_str(names.lookup(name)),
                        None => buf.push('_'),
                    }
                    buf.push(' ');
                    self.format_type_into(field.ty, names, buf);
                }
                buf.push_str(" }");
            }
            TypeKind::Opaque { size, align } => {
                buf.push_str("opaque[");
                buf.push_str(&size.to_string());
                buf.push_str(", align ");
                buf.push_str(&align.to_string());
                buf.push(']');
            }
            // Primitives returned above.
            _ => buf.push_str("<primitive>"),
        });
    }

    fn format_list(&self, list: &[Idx], names: &dyn StringLookup, buf: &mut String) {
        for (i, &ty) in list.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            self.format_type_into(ty, names, buf);
        }
    }
}
