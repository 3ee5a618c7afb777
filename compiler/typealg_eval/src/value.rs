//! Typed values and their memory images.

use typealg_types::{Idx, TypeKind};

use crate::errors::{EvalError, EvalResult};
use crate::Machine;

/// A value to lay out in memory as some type.
///
/// Structs take one entry per field, blank fields included. `Bytes` is
/// accepted for any type whose size matches.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    /// Any integer or pointer-shaped type, truncated to its size.
    Int(i64),
    Uint(u64),
    F32(f32),
    F64(f64),
    C64(f32, f32),
    C128(f64, f64),
    Str(String),
    /// Interface holding a dynamic type and value, or nil.
    Iface(Option<(Idx, Box<Value>)>),
    /// Array elements or struct fields, in order.
    List(Vec<Value>),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn iface(ty: Idx, value: Value) -> Value {
        Value::Iface(Some((ty, Box::new(value))))
    }

    pub fn nil() -> Value {
        Value::Iface(None)
    }

    pub fn str(s: &str) -> Value {
        Value::Str(s.to_owned())
    }
}

fn is_word_like(kind: &TypeKind) -> bool {
    matches!(
        kind,
        TypeKind::Bool
            | TypeKind::Int8
            | TypeKind::Int16
            | TypeKind::Int32
            | TypeKind::Int64
            | TypeKind::Uint8
            | TypeKind::Uint16
            | TypeKind::Uint32
            | TypeKind::Uint64
            | TypeKind::Uintptr
            | TypeKind::UnsafePointer
            | TypeKind::Pointer(_)
            | TypeKind::Chan(_)
    )
}

impl Machine<'_> {
    /// Allocate a `ty` and write `value` into it. Padding is zeroed.
    pub fn store(&mut self, ty: Idx, value: &Value) -> EvalResult<u64> {
        self.store_filled(ty, value, 0)
    }

    /// Like [`store`](Self::store), with padding and alignment gaps set to
    /// `fill`.
    pub fn store_filled(&mut self, ty: Idx, value: &Value, fill: u8) -> EvalResult<u64> {
        let addr = self.mem.alloc(self.pool.size(ty), self.pool.align(ty), fill);
        self.write_value(addr, ty, value, fill)?;
        Ok(addr)
    }

    fn write_value(&mut self, addr: u64, ty: Idx, value: &Value, fill: u8) -> EvalResult<()> {
        let pool = self.pool;
        let size = pool.size(ty);
        let ptr = self.ptr_size;

        match (pool.kind(ty), value) {
            (_, Value::Bytes(bytes)) if bytes.len() as u64 == size => self.mem.write(addr, bytes),
            (kind, Value::Bool(b)) if is_word_like(kind) => {
                self.mem.write_uint(addr, size, u64::from(*b))
            }
            (kind, Value::Int(n)) if is_word_like(kind) => {
                self.mem.write_uint(addr, size, u64::from_le_bytes(n.to_le_bytes()))
            }
            (kind, Value::Uint(n)) if is_word_like(kind) => self.mem.write_uint(addr, size, *n),
            (TypeKind::Float32, Value::F32(f)) => {
                self.mem.write_uint(addr, 4, u64::from(f.to_bits()))
            }
            (TypeKind::Float64, Value::F64(f)) => self.mem.write_uint(addr, 8, f.to_bits()),
            (TypeKind::Complex64, Value::C64(re, im)) => {
                self.mem.write_uint(addr, 4, u64::from(re.to_bits()))?;
                self.mem.write_uint(addr + 4, 4, u64::from(im.to_bits()))
            }
            (TypeKind::Complex128, Value::C128(re, im)) => {
                self.mem.write_uint(addr, 8, re.to_bits())?;
                self.mem.write_uint(addr + 8, 8, im.to_bits())
            }
            (TypeKind::String, Value::Str(s)) => {
                let len = s.len() as u64;
                let data = self.mem.alloc(len, 1, fill);
                self.mem.write(data, s.as_bytes())?;
                self.mem.write_uint(addr, ptr, data)?;
                self.mem.write_uint(addr + ptr, ptr, len)
            }
            (TypeKind::Any | TypeKind::Interface(_), Value::Iface(None)) => {
                self.mem.write_uint(addr, ptr, 0)?;
                self.mem.write_uint(addr + ptr, ptr, 0)
            }
            (TypeKind::Any | TypeKind::Interface(_), Value::Iface(Some((dyn_ty, inner)))) => {
                let data = self.store_filled(*dyn_ty, inner, fill)?;
                self.mem.write_uint(addr, ptr, Machine::type_word(*dyn_ty))?;
                self.mem.write_uint(addr + ptr, ptr, data)
            }
            (TypeKind::Array { elem, len }, Value::List(items)) if items.len() as u64 == *len => {
                let elem_size = pool.size(*elem);
                for (i, item) in (0u64..).zip(items) {
                    self.write_value(addr + i * elem_size, *elem, item, fill)?;
                }
                Ok(())
            }
            (TypeKind::Struct { fields, .. }, Value::List(items)) if items.len() == fields.len() => {
                for (field, item) in fields.iter().zip(items) {
                    self.write_value(addr + field.offset, field.ty, item, fill)?;
                }
                Ok(())
            }
            _ => Err(EvalError::ValueMismatch {
                ty: self.session.type_name(ty),
            }),
        }
    }
}

#[cfg(test)]
mod tests;
