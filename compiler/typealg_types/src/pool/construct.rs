//! Compound type constructors.

use typealg_ir::Name;

use super::align_up;
use crate::{Field, Idx, Pool, TypeKind};

impl Pool {
    // === Word-sized kinds ===

    /// `*elem`
    pub fn pointer(&mut self, elem: Idx) -> Idx {
        self.intern(TypeKind::Pointer(elem))
    }

    /// `chan elem`
    pub fn chan(&mut self, elem: Idx) -> Idx {
        self.intern(TypeKind::Chan(elem))
    }

    // === Kinds without equality ===

    /// `[]elem`
    pub fn slice(&mut self, elem: Idx) -> Idx {
        self.intern(TypeKind::Slice(elem))
    }

    /// `map[key]value`
    pub fn map(&mut self, key: Idx, value: Idx) -> Idx {
        self.intern(TypeKind::Map { key, value })
    }

    /// `func(params) (results)`
    pub fn func(&mut self, params: &[Idx], results: &[Idx]) -> Idx {
        self.intern(TypeKind::Func {
            params: params.into(),
            results: results.into(),
        })
    }

    /// A named non-empty interface.
    pub fn interface(&mut self, name: Name) -> Idx {
        self.intern(TypeKind::Interface(name))
    }

    // === Aggregates ===

    /// `[len]elem`
    pub fn array(&mut self, elem: Idx, len: u64) -> Idx {
        self.intern(TypeKind::Array { elem, len })
    }

    /// A literal struct laid out in declaration order, each field at the
    /// next offset that satisfies its alignment. `None` names a blank field.
    pub fn struct_type(&mut self, fields: &[(Option<Name>, Idx)]) -> Idx {
        let fields = self.layout_fields(fields);
        self.intern(TypeKind::Struct { name: None, fields })
    }

    /// A named struct. Distinct names give distinct types even when the
    /// fields agree.
    pub fn named_struct(&mut self, name: Name, fields: &[(Option<Name>, Idx)]) -> Idx {
        let fields = self.layout_fields(fields);
        self.intern(TypeKind::Struct {
            name: Some(name),
            fields,
        })
    }

    /// Plain memory of an explicit size and alignment.
    pub fn opaque(&mut self, size: u64, align: u64) -> Idx {
        debug_assert!(align == 0 || align.is_power_of_two());
        self.intern(TypeKind::Opaque {
            size,
            align: align.max(1),
        })
    }

    fn layout_fields(&self, fields: &[(Option<Name>, Idx)]) -> Box<[Field]> {
        let mut offset = 0;
        fields
            .iter()
            .map(|&(name, ty)| {
                let field_offset = align_up(offset, self.align(ty));
                offset = field_offset + self.size(ty);
                Field {
                    name,
                    ty,
                    offset: field_offset,
                }
            })
            .collect()
    }
}
