//! Cryptographic primitives: BIP-340 Schnorr over secp256k1 and SHA-256.
//!
//! Public keys are x-only. Because the wire never carries the parity of Y,
//! every signing call first normalizes the secret so its point has even Y;
//! verification never normalizes.

use secp256k1::{schnorr, Keypair, Message, Parity, XOnlyPublicKey, SECP256K1};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::Zeroizing;

use crate::error::CoreError;
use crate::source::RandomSource;
use crate::types::hex_array;

/// Upper bound on rejected draws before key generation gives up.
///
/// A draw is rejected with probability below 2^-127, so reaching this
/// means the source is broken.
const MAX_KEYGEN_DRAWS: usize = 256;

/// The secp256k1 group order n, big-endian.
const CURVE_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// A 32-byte SHA-256 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Hash(pub [u8; 32]);

impl Sha256Hash {
    /// Compute the SHA-256 hash of data.
    pub fn hash(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA256({}...)", &self.to_hex()[..8])
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Sha256Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A 32-byte x-only public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PublicKey(#[serde(with = "hex_array")] pub [u8; 32]);

impl PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Accept 32 x-only bytes, or 33 bytes with a 0x02/0x03 parity prefix.
    ///
    /// The prefix is dropped; only the x-coordinate takes part in BIP-340.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        match bytes.len() {
            32 => {
                let mut arr = [0u8; 32];
                arr.copy_from_slice(bytes);
                Ok(Self(arr))
            }
            33 if bytes[0] == 0x02 || bytes[0] == 0x03 => {
                let mut arr = [0u8; 32];
                arr.copy_from_slice(&bytes[1..]);
                Ok(Self(arr))
            }
            33 => Err(CoreError::InvalidEncoding(format!(
                "unknown public key prefix 0x{:02x}",
                bytes[0]
            ))),
            n => Err(CoreError::length("public key", "32 or 33", n)),
        }
    }

    /// Get raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex (64 or 66 characters).
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        Self::from_slice(&hex_to_bytes(s)?)
    }

    /// Verify a signature over a 32-byte hash.
    ///
    /// Returns `false` for a signature that does not verify, including
    /// the case where these bytes are not the x-coordinate of a curve point.
    pub fn verify(&self, message_hash: &[u8; 32], signature: &Signature) -> bool {
        let Ok(xonly) = XOnlyPublicKey::from_slice(&self.0) else {
            return false;
        };
        let Ok(sig) = schnorr::Signature::from_slice(&signature.0) else {
            return false;
        };
        let msg = Message::from_digest(*message_hash);
        SECP256K1.verify_schnorr(&sig, &msg, &xonly).is_ok()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}...)", &self.to_hex()[..8])
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for PublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A 64-byte BIP-340 Schnorr signature (r || s).
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(#[serde(with = "hex_array")] pub [u8; 64]);

impl Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 128-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        hex_to_array::<64>(s, "signature").map(Self)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sig({}...)", &self.to_hex()[..8])
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 64]> for Signature {
    fn from(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }
}

/// A secret scalar d with 0 < d < n.
///
/// The scalar lives in a buffer that is zeroed on drop. The public key and
/// its Y parity are computed once at import. There is no `Debug` output of
/// the key material.
#[derive(Clone)]
pub struct SecretKey {
    scalar: Zeroizing<[u8; 32]>,
    public_key: PublicKey,
    odd_y: bool,
}

impl SecretKey {
    /// Import raw bytes, rejecting 0 and anything at or above the curve order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.len() != 32 {
            return Err(CoreError::length("secret key", "32", bytes.len()));
        }
        let mut keypair =
            Keypair::from_seckey_slice(SECP256K1, bytes).map_err(|_| CoreError::InvalidKey)?;
        let (xonly, parity) = keypair.x_only_public_key();
        keypair.non_secure_erase();

        let mut scalar = Zeroizing::new([0u8; 32]);
        scalar.copy_from_slice(bytes);
        Ok(Self {
            scalar,
            public_key: PublicKey(xonly.serialize()),
            odd_y: parity == Parity::Odd,
        })
    }

    /// Import from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = Zeroizing::new(hex_to_bytes(s)?);
        Self::from_bytes(&bytes)
    }

    /// Copy the raw bytes into a buffer that is zeroed when dropped.
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        self.scalar.clone()
    }

    /// Convert to hex string. The caller owns the returned secret.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.scalar[..])
    }

    /// Build the signing key pair. Callers erase it as soon as they are done.
    fn keypair(&self) -> Result<Keypair, CoreError> {
        Keypair::from_seckey_slice(SECP256K1, &self.scalar[..]).map_err(|_| CoreError::InvalidKey)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<hidden>)")
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        // constant time over the full width
        let (a, b) = (&self.scalar, &other.scalar);
        a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

impl Eq for SecretKey {}

/// A key pair: secret scalar plus its x-only public key.
#[derive(Clone)]
pub struct Keys {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl Keys {
    /// Generate a new key pair from the given random source.
    pub fn generate(rng: &dyn RandomSource) -> Result<Self, CoreError> {
        Ok(Self::from_secret(generate_private_key(rng)?))
    }

    /// Build from an existing secret key.
    pub fn from_secret(secret_key: SecretKey) -> Self {
        let public_key = derive_public_key(&secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Import from a hex-encoded secret key.
    pub fn from_hex(secret_hex: &str) -> Result<Self, CoreError> {
        Ok(Self::from_secret(SecretKey::from_hex(secret_hex)?))
    }

    /// Get the x-only public key.
    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// Get the secret key.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Sign a 32-byte hash.
    pub fn sign(&self, message_hash: &[u8; 32]) -> Result<Signature, CoreError> {
        sign_hash(&self.secret_key, message_hash)
    }
}

impl fmt::Debug for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keys({:?})", self.public_key)
    }
}

/// Draw 32-byte candidates until one is a valid scalar in (0, n).
pub fn generate_private_key(rng: &dyn RandomSource) -> Result<SecretKey, CoreError> {
    let mut candidate = Zeroizing::new([0u8; 32]);
    for _ in 0..MAX_KEYGEN_DRAWS {
        rng.fill_bytes(&mut candidate[..])?;
        match SecretKey::from_bytes(&candidate[..]) {
            Ok(secret) => return Ok(secret),
            Err(CoreError::InvalidKey) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(CoreError::RandomSource(format!(
        "no valid scalar after {MAX_KEYGEN_DRAWS} draws"
    )))
}

/// Compute the x-coordinate of d·G.
pub fn derive_public_key(secret: &SecretKey) -> PublicKey {
    secret.public_key
}

/// Replace d with n - d when d·G has odd Y.
pub fn normalize_for_signing(secret: &SecretKey) -> SecretKey {
    if !secret.odd_y {
        return secret.clone();
    }
    SecretKey {
        scalar: negate_scalar(&secret.scalar),
        public_key: secret.public_key,
        odd_y: false,
    }
}

/// Sign a message hash, which must be exactly 32 bytes.
pub fn sign(secret: &SecretKey, message_hash: &[u8]) -> Result<Signature, CoreError> {
    let hash: &[u8; 32] = message_hash
        .try_into()
        .map_err(|_| CoreError::length("message hash", "32", message_hash.len()))?;
    sign_hash(secret, hash)
}

/// Verify a signature given as raw buffers.
///
/// Shape violations are errors; a well-formed signature that does not
/// verify yields `Ok(false)`.
pub fn verify(signature: &[u8], message_hash: &[u8], pubkey: &[u8]) -> Result<bool, CoreError> {
    let signature: [u8; 64] = signature
        .try_into()
        .map_err(|_| CoreError::length("signature", "64", signature.len()))?;
    let hash: [u8; 32] = message_hash
        .try_into()
        .map_err(|_| CoreError::length("message hash", "32", message_hash.len()))?;
    let pubkey = PublicKey::from_slice(pubkey)?;
    Ok(pubkey.verify(&hash, &Signature(signature)))
}

/// SHA-256 of arbitrary bytes.
pub fn sha256(bytes: &[u8]) -> Sha256Hash {
    Sha256Hash::hash(bytes)
}

/// Lowercase hex encoding.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex; odd length or a non-hex character is `InvalidEncoding`.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, CoreError> {
    Ok(hex::decode(s)?)
}

/// Decode hex into a fixed-size array.
pub(crate) fn hex_to_array<const N: usize>(
    s: &str,
    what: &'static str,
) -> Result<[u8; N], CoreError> {
    let bytes = hex_to_bytes(s)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| CoreError::InvalidInputLength {
        what,
        expected: "fixed width",
        got: len,
    })
}

/// n - d over big-endian bytes. Only called with 0 < d < n, so no wrap.
fn negate_scalar(d: &[u8; 32]) -> Zeroizing<[u8; 32]> {
    let mut out = Zeroizing::new([0u8; 32]);
    let mut borrow = 0u8;
    for i in (0..32).rev() {
        let (diff, b1) = CURVE_ORDER[i].overflowing_sub(d[i]);
        let (diff, b2) = diff.overflowing_sub(borrow);
        out[i] = diff;
        borrow = u8::from(b1 || b2);
    }
    out
}

fn sign_hash(secret: &SecretKey, message_hash: &[u8; 32]) -> Result<Signature, CoreError> {
    let normalized = normalize_for_signing(secret);
    let mut keypair = normalized.keypair()?;
    let msg = Message::from_digest(*message_hash);
    let sig = SECP256K1.sign_schnorr_no_aux_rand(&msg, &keypair);
    keypair.non_secure_erase();
    Ok(Signature(sig.serialize()))
}
