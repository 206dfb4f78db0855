//! Sum types, which are structs made up entirely of `union` tagged pointer
//! members, only one of which may be populated

use crate::{
    defaults::resolve_defaulted_type,
    error::ErrorKind,
    resolve::SchemaResolver,
    source::{SourceFile, UnionSpec},
    Result,
};
use std::collections::{BTreeMap, BTreeSet};

/// A field present in every member of a union, with the same type in each
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonMember {
    pub field: String,
    /// The post-defaulting type of the field
    pub ty: String,
}

/// Finds the fields shared by every variant of a union, sorted by name.
///
/// Each variant must be defined in `source` and have a schema that the
/// resolver can find.
pub fn common_members<S: AsRef<str>>(
    resolver: &SchemaResolver<'_>,
    source: &SourceFile,
    variants: &[S],
) -> Result<Vec<CommonMember>> {
    let mut per_variant = Vec::with_capacity(variants.len());

    for variant in variants {
        let variant = variant.as_ref();
        let schema = resolver.resolve(variant)?;
        let desc = source.find_struct(variant)?;

        if !desc.unions.is_empty() {
            return Err(ErrorKind::NestedUnion {
                type_name: variant.to_owned(),
            }
            .into());
        }

        let members = desc
            .fields
            .iter()
            .map(|field| {
                let dt = resolve_defaulted_type(&schema, &field.tag, &field.ty)?;
                Ok((field.name.clone(), dt.ty))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        per_variant.push(members);
    }

    let Some((first, rest)) = per_variant.split_first() else {
        return Ok(Vec::new());
    };

    let mut common = Vec::new();

    for (field, ty) in first {
        if !rest.iter().all(|members| members.contains_key(field)) {
            continue;
        }

        let types = per_variant
            .iter()
            .filter_map(|members| members.get(field).cloned())
            .collect::<BTreeSet<_>>();

        if types.len() != 1 {
            return Err(ErrorKind::CommonMemberMismatch {
                field: field.clone(),
                types,
                variants: variants.iter().map(|v| v.as_ref().to_owned()).collect(),
            }
            .into());
        }

        common.push(CommonMember {
            field: field.clone(),
            ty: ty.clone(),
        });
    }

    Ok(common)
}

/// The runtime behavior of a union: members are checked in declaration
/// order and the first populated one is the active member. Having no member
/// populated is fatal.
pub struct UnionDispatch<'d> {
    type_name: &'d str,
    members: &'d [UnionSpec],
}

impl<'d> UnionDispatch<'d> {
    /// The panic message of generated code when no member is populated
    pub const NO_MEMBER: &'static str = "no union member defined";

    #[inline]
    pub fn new(type_name: &'d str, members: &'d [UnionSpec]) -> Self {
        Self { type_name, members }
    }

    #[inline]
    pub fn type_name(&self) -> &'d str {
        self.type_name
    }

    /// The members in the order they are checked
    #[inline]
    pub fn members(&self) -> &'d [UnionSpec] {
        self.members
    }

    /// The type names of each member, with all pointers removed
    pub fn variant_types(&self) -> Vec<String> {
        self.members
            .iter()
            .map(|member| member.ty.pointee().to_string())
            .collect()
    }
}
