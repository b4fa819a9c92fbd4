//! Key transforms and fingerprints
//!
//! A key transform maps a logical key to the physical key used against a
//! backing store. Transforms are pure: the same logical key yields the same
//! physical key on every call and in every process, which is what lets
//! independent instances share one remote store.

use std::fmt;
use std::fmt::Write as _;

use sha1::{Digest, Sha1};

/// Separator between a namespace and the rest of the key
pub const NAMESPACE_SEPARATOR: char = ':';

/// Pure mapping from a logical key to a physical key
pub trait KeyTransform<K: ?Sized>: Send + Sync {
    /// Derive the physical key for `key`
    fn derive(&self, key: &K) -> String;
}

/// Leaves the key as is
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<K: fmt::Display + ?Sized> KeyTransform<K> for Identity {
    fn derive(&self, key: &K) -> String {
        key.to_string()
    }
}

/// Places the key in a namespace: `name:key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    name: String,
}

impl Prefix {
    /// Create a prefix transform for the given namespace
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Namespace name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<K: fmt::Display + ?Sized> KeyTransform<K> for Prefix {
    fn derive(&self, key: &K) -> String {
        format!("{}{}{}", self.name, NAMESPACE_SEPARATOR, key)
    }
}

/// Replaces the key with its fingerprint
#[derive(Debug, Clone, Copy, Default)]
pub struct Hashed<F = ObjectHash> {
    fingerprint: F,
}

impl<F: Fingerprint> Hashed<F> {
    /// Hash keys with the given fingerprint function
    pub fn new(fingerprint: F) -> Self {
        Self { fingerprint }
    }
}

impl<K, F> KeyTransform<K> for Hashed<F>
where
    K: KeyMaterial + ?Sized,
    F: Fingerprint,
{
    fn derive(&self, key: &K) -> String {
        let mut material = String::new();
        key.encode(&mut material);
        self.fingerprint.fingerprint(material.as_bytes())
    }
}

/// `outer(inner(key))`
#[derive(Debug, Clone, Copy, Default)]
pub struct Compose<F, G> {
    outer: F,
    inner: G,
}

impl<F, G> Compose<F, G> {
    /// Compose two transforms, `inner` runs first
    pub fn new(outer: F, inner: G) -> Self {
        Self { outer, inner }
    }
}

impl<K, F, G> KeyTransform<K> for Compose<F, G>
where
    K: ?Sized,
    F: KeyTransform<str>,
    G: KeyTransform<K>,
{
    fn derive(&self, key: &K) -> String {
        self.outer.derive(self.inner.derive(key).as_str())
    }
}

/// Transform backed by a closure
#[derive(Clone)]
pub struct FnTransform<F>(pub F);

impl<K, F> KeyTransform<K> for FnTransform<F>
where
    K: ?Sized,
    F: Fn(&K) -> String + Send + Sync,
{
    fn derive(&self, key: &K) -> String {
        (self.0)(key)
    }
}

/// Namespace over hashed keys: `name:fingerprint(key)`
pub type Namespace<F = ObjectHash> = Compose<Prefix, Hashed<F>>;

/// Identity transform
pub fn identity() -> Identity {
    Identity
}

/// `name:key`
pub fn prefix(name: impl Into<String>) -> Prefix {
    Prefix::new(name)
}

/// `fingerprint(key)` with the default [`ObjectHash`]
pub fn hash() -> Hashed {
    Hashed::default()
}

/// `f(g(key))`
pub fn compose<F, G>(f: F, g: G) -> Compose<F, G> {
    Compose::new(f, g)
}

/// `name:fingerprint(key)` with the default [`ObjectHash`]
pub fn namespace(name: impl Into<String>) -> Namespace {
    compose(prefix(name), hash())
}

/// Deterministic digest over encoded key material
///
/// The digest must not depend on the process (no random seeds), otherwise
/// two instances sharing a remote store would never see each other's entries.
pub trait Fingerprint: Send + Sync {
    /// Digest the encoded key material into a fixed-format string
    fn fingerprint(&self, material: &[u8]) -> String;
}

/// Lowercase hex SHA-1 over type-tagged key material
///
/// Strings are encoded as `string:<len>:<value>` where `<len>` counts UTF-16
/// code units, numbers as `number:<n>` and booleans as `bool:<b>`. This
/// matches the `object-hash` encoding, so keys derived here line up with the
/// ones written by existing deployments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectHash;

impl Fingerprint for ObjectHash {
    fn fingerprint(&self, material: &[u8]) -> String {
        hex::encode(Sha1::digest(material))
    }
}

/// Fingerprint `key` with [`ObjectHash`]
pub fn fingerprint<K: KeyMaterial + ?Sized>(key: &K) -> String {
    hash().derive(key)
}

/// Key material that can be fingerprinted
pub trait KeyMaterial {
    /// Append the type-tagged encoding of `self` to `out`
    fn encode(&self, out: &mut String);
}

impl KeyMaterial for str {
    fn encode(&self, out: &mut String) {
        let _ = write!(out, "string:{}:{}", self.encode_utf16().count(), self);
    }
}

impl KeyMaterial for String {
    fn encode(&self, out: &mut String) {
        self.as_str().encode(out);
    }
}

impl<T: KeyMaterial + ?Sized> KeyMaterial for &T {
    fn encode(&self, out: &mut String) {
        (**self).encode(out);
    }
}

impl KeyMaterial for bool {
    fn encode(&self, out: &mut String) {
        let _ = write!(out, "bool:{}", self);
    }
}

macro_rules! number_material {
    ($($ty:ty),*) => {
        $(
            impl KeyMaterial for $ty {
                fn encode(&self, out: &mut String) {
                    let _ = write!(out, "number:{}", self);
                }
            }
        )*
    };
}

number_material!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

#[cfg(test)]
mod tests {
    use super::*;

    const TIM: &str = "0545e9b8dfadca14cf06d163e2d2514c161d5d17";

    struct Fixed;

    impl Fingerprint for Fixed {
        fn fingerprint(&self, _material: &[u8]) -> String {
            "fixed".to_string()
        }
    }

    #[test]
    fn test_identity() {
        assert_eq!(identity().derive("tim"), "tim");
        assert_eq!(KeyTransform::<u64>::derive(&identity(), &42), "42");
    }

    #[test]
    fn test_prefix() {
        assert_eq!(prefix("myapp").derive("tim"), "myapp:tim");
        assert_eq!(prefix("myapp").name(), "myapp");
    }

    #[test]
    fn test_object_hash_known_digest() {
        assert_eq!(fingerprint("tim"), TIM);
        assert_eq!(fingerprint(&"tim".to_string()), TIM);
    }

    #[test]
    fn test_object_hash_is_stable() {
        let first = fingerprint("some key");
        let second = hash().derive("some key");
        assert_eq!(first, second);
        assert_eq!(first.len(), 40);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_material_encoding() {
        let mut out = String::new();
        "tim".encode(&mut out);
        assert_eq!(out, "string:3:tim");

        // length counts UTF-16 code units, not bytes
        let mut out = String::new();
        "é😀".encode(&mut out);
        assert_eq!(out, "string:3:é😀");

        let mut out = String::new();
        42u32.encode(&mut out);
        assert_eq!(out, "number:42");

        let mut out = String::new();
        true.encode(&mut out);
        assert_eq!(out, "bool:true");
    }

    #[test]
    fn test_number_and_string_differ() {
        assert_ne!(fingerprint(&7u64), fingerprint("7"));
    }

    #[test]
    fn test_namespace() {
        assert_eq!(namespace("myapp").derive("tim"), format!("myapp:{}", TIM));
    }

    #[test]
    fn test_compose_order() {
        let transform = compose(prefix("outer"), prefix("inner"));
        assert_eq!(transform.derive("k"), "outer:inner:k");

        let custom = compose(prefix("myapp"), Hashed::new(Fixed));
        assert_eq!(custom.derive("tim"), "myapp:fixed");
    }

    #[test]
    fn test_fn_transform() {
        let upper = FnTransform(|key: &str| key.to_uppercase());
        assert_eq!(upper.derive("tim"), "TIM");
    }
}
