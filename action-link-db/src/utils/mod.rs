use heapless::String as HeaplessString;
use serde::Serialize;
use std::hash::Hasher;
use twox_hash::XxHash64;

/// Hashes serializable data into an i64 using CBOR serialization and XxHash64.
///
/// This provides a stable hash across different runs and systems by:
/// - Serializing the data to CBOR format (deterministic binary representation)
/// - Using XxHash64 with a fixed seed (0) for consistent hashing
pub fn hash_as_i64<T: Serialize>(data: &T) -> Result<i64, String> {
    let mut hasher = XxHash64::with_seed(0);
    let mut cbor = Vec::new();
    ciborium::ser::into_writer(data, &mut cbor)
        .map_err(|e| format!("Failed to serialize data for hashing: {e}"))?;
    hasher.write(&cbor);
    Ok(hasher.finish() as i64)
}

/// One-way digest of a raw action token, used as its only lookup key.
///
/// BLAKE3, lower-case hex, always 64 characters.
pub fn hash_token(raw_token: &str) -> HeaplessString<64> {
    let digest = blake3::hash(raw_token.as_bytes());
    let mut out = HeaplessString::new();
    // 64 hex chars always fit
    let _ = out.push_str(digest.to_hex().as_str());
    out
}

/// Copies as many leading characters of `value` as fit into a `HeaplessString<N>`.
pub fn truncate_to_heapless<const N: usize>(value: &str) -> HeaplessString<N> {
    let mut out = HeaplessString::new();
    for c in value.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Serializes JSON with object keys sorted at every level.
///
/// JSONB does not preserve key order, so anything hashed before storage must be
/// hashed in a form that survives the round trip.
pub fn canonical_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|key| {
                    format!(
                        "{}:{}",
                        serde_json::Value::String(key.clone()),
                        canonical_json(&map[key])
                    )
                })
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        serde_json::Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        scalar => scalar.to_string(),
    }
}
