//! Starknet typed data, SNIP-12 revision 0.
//!
//! Types encode as `Name(field:type,...)` followed by their struct dependencies sorted by name.
//! Structs hash as `H([type_hash, ...encoded_fields])` and arrays (`T*`) as `H(encoded_items)`,
//! where `H` is Pedersen `compute_hash_on_elements` and `type_hash = starknet_keccak(encoding)`.
//! The signed value is `H(["StarkNet Message", H(domain), account, H(message)])`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use starknet_types_core::felt::Felt;

use crate::{
    errors::TypedDataError,
    utils::{
        crypto::{compute_hash_on_elements, selector_from_name, starknet_keccak},
        encoding::{parse_felt, short_string_to_felt},
    },
};

pub const DOMAIN_TYPE: &str = "StarkNetDomain";
pub const MESSAGE_PREFIX: &str = "StarkNet Message";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedDataField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl TypedDataField {
    pub fn new(name: &str, ty: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.to_string(),
        }
    }
}

pub type TypeDefinitions = BTreeMap<String, Vec<TypedDataField>>;

/// Build a type map from `(type, [(field, field_type)])` literals.
pub fn type_definitions(defs: &[(&str, &[(&str, &str)])]) -> TypeDefinitions {
    defs.iter()
        .map(|(name, fields)| {
            let fields = fields
                .iter()
                .map(|(f, t)| TypedDataField::new(f, t))
                .collect();
            (name.to_string(), fields)
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarknetTypedData {
    pub types: TypeDefinitions,
    pub primary_type: String,
    pub domain: Value,
    pub message: Value,
}

impl StarknetTypedData {
    fn fields(&self, ty: &str) -> Result<&[TypedDataField], TypedDataError> {
        self.types
            .get(ty)
            .map(Vec::as_slice)
            .ok_or_else(|| TypedDataError::UnknownType(ty.to_string()))
    }

    fn collect_dependencies(
        &self,
        ty: &str,
        found: &mut BTreeSet<String>,
    ) -> Result<(), TypedDataError> {
        for field in self.fields(ty)? {
            let base = field.ty.trim_end_matches('*');
            if self.types.contains_key(base) && found.insert(base.to_string()) {
                self.collect_dependencies(base, found)?;
            }
        }
        Ok(())
    }

    /// `Primary(a:felt,b:Dep)Dep(...)`, dependencies sorted by name.
    pub fn encode_type(&self, ty: &str) -> Result<String, TypedDataError> {
        let mut deps = BTreeSet::new();
        self.collect_dependencies(ty, &mut deps)?;
        deps.remove(ty);

        let mut out = String::new();
        for name in std::iter::once(ty).chain(deps.iter().map(String::as_str)) {
            let fields = self
                .fields(name)?
                .iter()
                .map(|f| format!("{}:{}", f.name, f.ty))
                .collect::<Vec<_>>()
                .join(",");
            out.push_str(&format!("{name}({fields})"));
        }
        Ok(out)
    }

    pub fn type_hash(&self, ty: &str) -> Result<Felt, TypedDataError> {
        Ok(starknet_keccak(self.encode_type(ty)?.as_bytes()))
    }

    fn encode_value(&self, ty: &str, value: &Value) -> Result<Felt, TypedDataError> {
        if let Some(item_ty) = ty.strip_suffix('*') {
            let items = value.as_array().ok_or_else(|| TypedDataError::InvalidValue {
                ty: ty.to_string(),
                reason: "expected an array".to_string(),
            })?;
            let encoded = items
                .iter()
                .map(|item| self.encode_value(item_ty, item))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(compute_hash_on_elements(&encoded));
        }
        if self.types.contains_key(ty) {
            return self.struct_hash(ty, value);
        }
        match ty {
            "felt" | "felt252" | "ContractAddress" | "ClassHash" | "u128" | "shortstring"
            | "string" => encode_scalar(ty, value),
            "bool" => match value {
                Value::Bool(b) => Ok(Felt::from(*b as u8)),
                other => encode_scalar(ty, other),
            },
            "selector" => match value.as_str() {
                Some(name) if !looks_numeric(name) => Ok(selector_from_name(name)),
                _ => encode_scalar(ty, value),
            },
            other => Err(TypedDataError::UnknownType(other.to_string())),
        }
    }

    /// `H([type_hash(ty), ...fields])`.
    pub fn struct_hash(&self, ty: &str, value: &Value) -> Result<Felt, TypedDataError> {
        let mut encoded = vec![self.type_hash(ty)?];
        for field in self.fields(ty)? {
            let field_value = value.get(&field.name).ok_or_else(|| TypedDataError::MissingField {
                ty: ty.to_string(),
                field: field.name.clone(),
            })?;
            encoded.push(self.encode_value(&field.ty, field_value)?);
        }
        Ok(compute_hash_on_elements(&encoded))
    }

    /// The value an account signs for this typed data.
    pub fn message_hash(&self, account: &Felt) -> Result<Felt, TypedDataError> {
        Ok(compute_hash_on_elements(&[
            short_string_to_felt(MESSAGE_PREFIX)?,
            self.struct_hash(DOMAIN_TYPE, &self.domain)?,
            *account,
            self.struct_hash(&self.primary_type, &self.message)?,
        ]))
    }
}

fn looks_numeric(s: &str) -> bool {
    s.starts_with("0x")
        || s.starts_with("0X")
        || (!s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
}

/// Numbers and numeric strings parse as integers; any other string is a Cairo short string.
fn encode_scalar(ty: &str, value: &Value) -> Result<Felt, TypedDataError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(Felt::from)
            .ok_or_else(|| TypedDataError::InvalidValue {
                ty: ty.to_string(),
                reason: format!("{n} is not an unsigned integer"),
            }),
        Value::String(s) if looks_numeric(s) => Ok(parse_felt(s)?),
        Value::String(s) => Ok(short_string_to_felt(s)?),
        other => Err(TypedDataError::InvalidValue {
            ty: ty.to_string(),
            reason: format!("unexpected value {other}"),
        }),
    }
}
