//! Canonical actor signatures.
use serde::Serialize;
use sha2::{Digest, Sha256};

/// What a signature is computed from. Field order is the canonical key
/// order; port lists are sorted before hashing so declaration order does
/// not leak into the digest.
#[derive(Serialize)]
pub struct SignatureDescriptor<'a> {
    pub actor_type: &'a str,
    pub inports: Vec<String>,
    pub is_primitive: bool,
    pub outports: Vec<String>,
}

/// SHA-256 hex digest of the canonical JSON form of `desc`. Callers treat
/// the result as an opaque string.
pub fn actor_signature(desc: &SignatureDescriptor) -> String {
    let mut inports = desc.inports.clone();
    let mut outports = desc.outports.clone();
    inports.sort();
    outports.sort();
    let canonical = SignatureDescriptor {
        actor_type: desc.actor_type,
        inports,
        is_primitive: desc.is_primitive,
        outports,
    };
    // Struct serialization is deterministic: fixed field order, compact
    // separators.
    let json = serde_json::to_string(&canonical)
        .unwrap_or_else(|_| unreachable!("descriptor serialization"));
    hex::encode(Sha256::digest(json.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(inports: &[&str]) -> SignatureDescriptor<'static> {
        SignatureDescriptor {
            actor_type: "std.Identity",
            inports: inports.iter().map(|s| s.to_string()).collect(),
            is_primitive: true,
            outports: vec!["token".to_string()],
        }
    }

    #[test]
    fn signature_is_deterministic() {
        assert_eq!(
            actor_signature(&descriptor(&["token"])),
            actor_signature(&descriptor(&["token"]))
        );
    }

    #[test]
    fn port_order_does_not_matter() {
        assert_eq!(
            actor_signature(&descriptor(&["a", "b"])),
            actor_signature(&descriptor(&["b", "a"]))
        );
    }

    #[test]
    fn type_name_does_matter() {
        let other = SignatureDescriptor {
            actor_type: "std.Constant",
            ..descriptor(&["token"])
        };
        assert_ne!(
            actor_signature(&other),
            actor_signature(&descriptor(&["token"]))
        );
    }
}
