use crate::{MalformedSnapshot, StateMachine};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::collections::BTreeMap;
use std::convert::TryFrom;

const OP_PUT: u8 = 0;
const OP_GET: u8 = 1;

/// Encode a put op:
///
/// ```text
/// | 1 byte | 8 bytes LE | key len bytes | rest  |
/// | OP_PUT | key len    | key           | value |
/// ```
pub fn encode_put(key: &[u8], value: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(1 + 8 + key.len() + value.len());
    buf.put_u8(OP_PUT);
    buf.put_u64_le(key.len() as u64);
    buf.put_slice(key);
    buf.put_slice(value);

    buf.freeze()
}

/// Encode a get op: `OP_GET` followed by the key.
pub fn encode_get(key: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(1 + key.len());
    buf.put_u8(OP_GET);
    buf.put_slice(key);

    buf.freeze()
}

#[derive(Debug, PartialEq)]
enum KvOp<'a> {
    Put { key: &'a [u8], value: &'a [u8] },
    Get { key: &'a [u8] },
}

fn decode_op(op: &[u8]) -> Option<KvOp<'_>> {
    let (op_type, rest) = op.split_first()?;
    match *op_type {
        OP_PUT => {
            if rest.len() < 8 {
                return None;
            }
            let (mut len_bytes, rest) = rest.split_at(8);
            let key_len = usize::try_from(len_bytes.get_u64_le()).ok()?;
            if key_len > rest.len() {
                return None;
            }
            let (key, value) = rest.split_at(key_len);
            Some(KvOp::Put { key, value })
        }
        OP_GET => Some(KvOp::Get { key: rest }),
        _ => None,
    }
}

/// KvStateMachine is a replicated map from byte-string keys to byte-string values.
///
/// Malformed ops are ignored and produce an empty result; since every replica ignores them the
/// same way, they're still deterministic.
#[derive(Debug, Default)]
pub struct KvStateMachine {
    kvs: BTreeMap<Bytes, Bytes>,
}

impl KvStateMachine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateMachine for KvStateMachine {
    fn apply(&mut self, op: &[u8]) -> Bytes {
        match decode_op(op) {
            Some(KvOp::Put { key, value }) => {
                self.kvs
                    .insert(Bytes::copy_from_slice(key), Bytes::copy_from_slice(value));
                Bytes::new()
            }
            Some(KvOp::Get { key }) => self.kvs.get(key).cloned().unwrap_or_default(),
            None => Bytes::new(),
        }
    }

    // | count (u64 LE) | { key len (u64 LE) | key | value len (u64 LE) | value }* |
    fn snapshot(&self) -> Bytes {
        let size: usize = self.kvs.iter().map(|(k, v)| 16 + k.len() + v.len()).sum();
        let mut buf = BytesMut::with_capacity(8 + size);
        buf.put_u64_le(self.kvs.len() as u64);
        for (key, value) in self.kvs.iter() {
            buf.put_u64_le(key.len() as u64);
            buf.put_slice(key);
            buf.put_u64_le(value.len() as u64);
            buf.put_slice(value);
        }

        buf.freeze()
    }

    fn restore(&mut self, snapshot: &[u8]) -> Result<(), MalformedSnapshot> {
        let mut buf = Bytes::copy_from_slice(snapshot);
        let count = read_u64(&mut buf)?;

        let mut kvs = BTreeMap::new();
        for _ in 0..count {
            let key = read_len_prefixed(&mut buf)?;
            let value = read_len_prefixed(&mut buf)?;
            kvs.insert(key, value);
        }
        if buf.has_remaining() {
            return Err(MalformedSnapshot(format!("{} trailing bytes", buf.remaining())));
        }

        self.kvs = kvs;
        Ok(())
    }
}

fn read_u64(buf: &mut Bytes) -> Result<u64, MalformedSnapshot> {
    if buf.remaining() < 8 {
        return Err(MalformedSnapshot("truncated length".into()));
    }
    Ok(buf.get_u64_le())
}

fn read_len_prefixed(buf: &mut Bytes) -> Result<Bytes, MalformedSnapshot> {
    let len = read_u64(buf)?;
    match usize::try_from(len) {
        Ok(len) if len <= buf.remaining() => Ok(buf.split_to(len)),
        _ => Err(MalformedSnapshot(format!("entry of {} bytes overruns snapshot", len))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get() {
        let mut sm = KvStateMachine::new();

        assert_eq!(sm.apply(&encode_get(b"k")), Bytes::new());
        assert_eq!(sm.apply(&encode_put(b"k", b"v")), Bytes::new());
        assert_eq!(sm.apply(&encode_get(b"k")), Bytes::from_static(b"v"));
    }

    #[test]
    fn op_decoding() {
        assert_eq!(
            decode_op(&encode_put(b"key", b"")),
            Some(KvOp::Put { key: b"key", value: b"" })
        );
        assert_eq!(decode_op(&encode_get(b"")), Some(KvOp::Get { key: b"" }));
        assert_eq!(decode_op(&[]), None);
        assert_eq!(decode_op(&[7, 1, 2]), None);
        assert_eq!(decode_op(&[OP_PUT, 1, 0]), None);
        // Key length past the end of the op.
        assert_eq!(decode_op(&[OP_PUT, 9, 0, 0, 0, 0, 0, 0, 0, b'k']), None);
    }

    #[test]
    fn malformed_ops_do_nothing() {
        let mut sm = KvStateMachine::new();
        sm.apply(&encode_put(b"k", b"v"));
        let before = sm.snapshot();

        assert_eq!(sm.apply(&[42]), Bytes::new());
        assert_eq!(sm.snapshot(), before);
    }

    #[test]
    fn snapshot_restores_into_another_instance() {
        let mut sm = KvStateMachine::new();
        sm.apply(&encode_put(b"a", b"1"));
        sm.apply(&encode_put(b"b", b""));
        sm.apply(&encode_put(b"", b"empty key"));

        let mut other = KvStateMachine::new();
        other.apply(&encode_put(b"stale", b"x"));
        other.restore(&sm.snapshot()).unwrap();

        assert_eq!(other.apply(&encode_get(b"a")), Bytes::from_static(b"1"));
        assert_eq!(other.apply(&encode_get(b"")), Bytes::from_static(b"empty key"));
        assert_eq!(other.apply(&encode_get(b"stale")), Bytes::new());
        assert_eq!(other.snapshot(), sm.snapshot());
    }

    #[test]
    fn bad_snapshot_leaves_state_alone() {
        let mut sm = KvStateMachine::new();
        sm.apply(&encode_put(b"k", b"v"));

        let mut truncated = sm.snapshot().to_vec();
        truncated.pop();
        assert!(sm.restore(&truncated).is_err());

        let mut trailing = sm.snapshot().to_vec();
        trailing.push(0);
        assert!(sm.restore(&trailing).is_err());

        assert_eq!(sm.apply(&encode_get(b"k")), Bytes::from_static(b"v"));
    }
}
