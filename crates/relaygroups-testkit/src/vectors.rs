//! Golden test vectors for deterministic verification.
//!
//! Two sets:
//! - BIP-340 vectors, checking key derivation and Schnorr verification
//!   against the published reference values.
//! - Canonical event vectors, checking that event serialization and
//!   identity hashing produce the exact bytes other implementations hash.

use relaygroups_core::{
    canonical_event_bytes, derive_public_key, hex_to_bytes, sign, verify, CoreError, EventId,
    PublicKey, SecretKey, Tag,
};

/// A BIP-340 reference vector.
#[derive(Debug, Clone)]
pub struct SchnorrVector {
    pub index: usize,
    /// Secret key (hex), when the vector provides one.
    pub secret_key: Option<&'static str>,
    pub public_key: &'static str,
    pub message: &'static str,
    /// Auxiliary randomness the reference signature was made with.
    pub aux_rand: &'static str,
    pub signature: &'static str,
    pub verifies: bool,
}

impl SchnorrVector {
    /// Signing here is deterministic, which libsecp256k1 treats as an
    /// all-zero aux. Those vectors pin the exact signature bytes.
    pub fn signs_deterministically(&self) -> bool {
        self.secret_key.is_some() && self.aux_rand.bytes().all(|b| b == b'0')
    }
}

/// The BIP-340 vectors used here.
///
/// Vector 0 uses an all-zero aux and is compared byte for byte. Vector 1
/// uses a non-zero aux and checks derivation and verification only.
pub fn schnorr_vectors() -> Vec<SchnorrVector> {
    vec![
        SchnorrVector {
            index: 0,
            secret_key: Some("0000000000000000000000000000000000000000000000000000000000000003"),
            public_key: "F9308A019258C31049344F85F89D5229B531C845836F99B08601F113BCE036F9",
            message: "0000000000000000000000000000000000000000000000000000000000000000",
            aux_rand: "0000000000000000000000000000000000000000000000000000000000000000",
            signature: "E907831F80848D1069A5371B402410364BDF1C5F8307B0084C55F1CE2DCA821525F66A4A85EA8B71E482A74F382D2CE5EBEEE8FDB2172F477DF4900D310536C0",
            verifies: true,
        },
        SchnorrVector {
            index: 1,
            secret_key: Some("B7E151628AED2A6ABF7158809CF4F3C762E7160F38B4DA56A784D9045190CFEF"),
            public_key: "DFF1D77F2A671C5F36183726DB2341BE58FEAE1DA2DECED843240F7B502BA659",
            message: "243F6A8885A308D313198A2E03707344A4093822299F31D0082EFA98EC4E6C89",
            aux_rand: "0000000000000000000000000000000000000000000000000000000000000001",
            signature: "6896BD60EEAE296DB48A229FF71DFE071BDE413E6D43F917DC8DCF8C78DE33418906D11AC976ABCCB20B091292BFF4EA897EFCB639EA871CFA95F6DE339E4B0A",
            verifies: true,
        },
    ]
}

/// Check one vector: the derived public key (when a secret is given), the
/// exact signature (when the aux is zero) and the verification outcome.
pub fn check_schnorr_vector(vector: &SchnorrVector) -> Result<bool, CoreError> {
    let public_key = PublicKey::from_hex(&vector.public_key.to_lowercase())?;
    if let Some(secret) = vector.secret_key {
        let secret = SecretKey::from_hex(&secret.to_lowercase())?;
        if derive_public_key(&secret) != public_key {
            return Ok(false);
        }
        if vector.signs_deterministically() {
            let sig = sign(&secret, &hex_to_bytes(vector.message)?)?;
            if !sig.to_hex().eq_ignore_ascii_case(vector.signature) {
                return Ok(false);
            }
        }
    }
    let verified = verify(
        &hex_to_bytes(vector.signature)?,
        &hex_to_bytes(vector.message)?,
        public_key.as_bytes(),
    )?;
    Ok(verified == vector.verifies)
}

/// A canonical event vector.
#[derive(Debug, Clone)]
pub struct CanonicalVector {
    pub name: &'static str,
    pub pubkey: &'static str,
    pub created_at: u64,
    pub kind: u32,
    pub tags: Vec<Vec<&'static str>>,
    pub content: &'static str,
    /// Exact canonical serialization.
    pub expected_json: &'static str,
    /// SHA-256 of `expected_json` (hex).
    pub expected_id: &'static str,
}

impl CanonicalVector {
    pub fn tags(&self) -> Vec<Tag> {
        self.tags.iter().map(|t| Tag::new(t.iter().copied())).collect()
    }
}

/// x-coordinate of the generator: the public key of secret 1.
pub const GENERATOR_X: &str = "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

/// Get all canonical event vectors.
pub fn canonical_vectors() -> Vec<CanonicalVector> {
    vec![
        CanonicalVector {
            name: "chat_message",
            pubkey: GENERATOR_X,
            created_at: 1700000000,
            kind: 9,
            tags: vec![vec!["h", "rust"]],
            content: "hello",
            expected_json: r#"[0,"79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",1700000000,9,[["h","rust"]],"hello"]"#,
            expected_id: "b869a3c5d89e73f5fc6f6e22a47e1985263b62dffb47c630e7b3199f495ea928",
        },
        CanonicalVector {
            name: "empty_event",
            pubkey: GENERATOR_X,
            created_at: 0,
            kind: 1,
            tags: vec![],
            content: "",
            expected_json: r#"[0,"79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",0,1,[],""]"#,
            expected_id: "1d60156c7d5c3d752ed401ba085300ea90869712b4acc88edff9601de4c0b15c",
        },
        CanonicalVector {
            name: "reply_threading",
            pubkey: GENERATOR_X,
            created_at: 1700000123,
            kind: 9,
            tags: vec![
                vec!["h", "g1"],
                vec!["e", "e1", "", "root"],
                vec!["e", "e2", "", "reply"],
            ],
            content: "hi",
            expected_json: r#"[0,"79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",1700000123,9,[["h","g1"],["e","e1","","root"],["e","e2","","reply"]],"hi"]"#,
            expected_id: "00714c9d69110038be610cfdc25b7f2deb671f91afc0ac0f63ade5f2b14fadac",
        },
        CanonicalVector {
            name: "escaped_content",
            pubkey: GENERATOR_X,
            created_at: 1700000000,
            kind: 9,
            tags: vec![vec!["h", "g1"]],
            content: "line1\nline2\t\"quoted\" back\\slash \u{1} café 🔥",
            expected_json: r#"[0,"79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",1700000000,9,[["h","g1"]],"line1\nline2\t\"quoted\" back\\slash \u0001 café 🔥"]"#,
            expected_id: "f102f08c7ab9e6a85296dd0294270b98631253a855061eab693ff8a37bb5e821",
        },
        CanonicalVector {
            name: "metadata_flags",
            pubkey: GENERATOR_X,
            created_at: 1700000000,
            kind: 9002,
            tags: vec![vec!["h", "g1"], vec!["name", "Rust"], vec!["public"], vec!["closed"]],
            content: "",
            expected_json: r#"[0,"79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",1700000000,9002,[["h","g1"],["name","Rust"],["public"],["closed"]],""]"#,
            expected_id: "e07a0ce95d36bf0407208c408ce36e4c14f7f811bcbb8378b64411a664a9765d",
        },
    ]
}

/// Serialize and hash a vector's fields.
pub fn compute_canonical_vector(vector: &CanonicalVector) -> Result<(String, EventId), CoreError> {
    let pubkey = PublicKey::from_hex(vector.pubkey)?;
    let bytes = canonical_event_bytes(
        &pubkey,
        vector.created_at,
        vector.kind,
        &vector.tags(),
        vector.content,
    )?;
    let id = EventId(relaygroups_core::sha256(&bytes).0);
    let json = String::from_utf8(bytes).map_err(|e| CoreError::EncodingError(e.to_string()))?;
    Ok((json, id))
}

/// Check every canonical vector, reporting `(name, matches, computed id)`.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    canonical_vectors()
        .iter()
        .map(|v| match compute_canonical_vector(v) {
            Ok((json, id)) => {
                let hex = id.to_hex();
                let matches = json == v.expected_json && hex == v.expected_id;
                (v.name.to_string(), matches, hex)
            }
            Err(e) => (v.name.to_string(), false, e.to_string()),
        })
        .collect()
}
