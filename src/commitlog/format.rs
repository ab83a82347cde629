//! On-disk layout of a replica's durable log.
//!
//! ```text
//! +-----------+----------------+-------+-----------+---------+---------+-...-+------+
//! | snap len  | snapshot bytes | epoch | nextIndex | op len  | op      | ... | seal |
//! | u64 LE    | snap len bytes | u64 LE| u64 LE    | u64 LE  | op len  |     | 1 B  |
//! +-----------+----------------+-------+-----------+---------+---------+-...-+------+
//! ```
//!
//! * The header (snapshot, epoch, nextIndex) is written by a full rewrite of the file.
//! * Each op record is appended atomically after the header.
//! * The optional trailing byte marks the log sealed. It is never followed by anything.

use crate::commitlog::Index;
use crate::replica::Epoch;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::convert::TryFrom;
use std::io;

const U64_LEN: usize = 8;
pub(crate) const SEAL_MARKER: u8 = 0;

#[derive(Debug, thiserror::Error)]
pub enum LogRecoveryError {
    #[error("Failed to read log: {0}")]
    Io(#[from] io::Error),
    #[error("Log is truncated while reading {what}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        what: &'static str,
        needed: u64,
        remaining: usize,
    },
    #[error("Log snapshot could not be restored: {0}")]
    BadSnapshot(#[from] crate::MalformedSnapshot),
}

pub(crate) fn encode_header(snapshot: &[u8], epoch: Epoch, next_index: Index, sealed: bool) -> Bytes {
    let mut buf = BytesMut::with_capacity(U64_LEN + snapshot.len() + U64_LEN + U64_LEN + 1);
    buf.put_u64_le(snapshot.len() as u64);
    buf.put_slice(snapshot);
    buf.put_u64_le(epoch.as_u64());
    buf.put_u64_le(next_index.as_u64());
    if sealed {
        buf.put_u8(SEAL_MARKER);
    }

    buf.freeze()
}

pub(crate) fn encode_op(op: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(U64_LEN + op.len());
    buf.put_u64_le(op.len() as u64);
    buf.put_slice(op);

    buf.freeze()
}

/// Everything a log file holds, decoded. Ops are in file (and therefore apply) order.
#[derive(Debug)]
pub(crate) struct DecodedLog {
    pub(crate) snapshot: Bytes,
    pub(crate) epoch: Epoch,
    pub(crate) next_index: Index,
    pub(crate) ops: Vec<Bytes>,
    pub(crate) sealed: bool,
}

pub(crate) fn decode(contents: Bytes) -> Result<DecodedLog, LogRecoveryError> {
    let mut buf = contents;

    let snapshot_len = read_u64(&mut buf, "snapshot length")?;
    let snapshot = read_bytes(&mut buf, snapshot_len, "snapshot")?;
    let epoch = Epoch::new(read_u64(&mut buf, "epoch")?);
    let next_index = Index::new(read_u64(&mut buf, "next index")?);

    let mut ops = Vec::new();
    let sealed = loop {
        match read_tail(&mut buf)? {
            Tail::End => break false,
            Tail::Sealed => break true,
            Tail::Op(op) => ops.push(op),
        }
    };

    Ok(DecodedLog {
        snapshot,
        epoch,
        next_index,
        ops,
        sealed,
    })
}

enum Tail {
    End,
    Sealed,
    Op(Bytes),
}

// After the header, the number of remaining bytes alone decides what comes next: nothing left is
// an unsealed end, exactly one byte is the seal marker, anything more must be an op record.
fn read_tail(buf: &mut Bytes) -> Result<Tail, LogRecoveryError> {
    match buf.remaining() {
        0 => Ok(Tail::End),
        1 => {
            buf.advance(1);
            Ok(Tail::Sealed)
        }
        _ => {
            let op_len = read_u64(buf, "op length")?;
            let op = read_bytes(buf, op_len, "op")?;
            Ok(Tail::Op(op))
        }
    }
}

fn read_u64(buf: &mut Bytes, what: &'static str) -> Result<u64, LogRecoveryError> {
    if buf.remaining() < U64_LEN {
        return Err(LogRecoveryError::Truncated {
            what,
            needed: U64_LEN as u64,
            remaining: buf.remaining(),
        });
    }

    Ok(buf.get_u64_le())
}

fn read_bytes(buf: &mut Bytes, len: u64, what: &'static str) -> Result<Bytes, LogRecoveryError> {
    let truncated = LogRecoveryError::Truncated {
        what,
        needed: len,
        remaining: buf.remaining(),
    };
    match usize::try_from(len) {
        Ok(len) if len <= buf.remaining() => Ok(buf.split_to(len)),
        _ => Err(truncated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(snapshot: &[u8], epoch: u64, next_index: u64) -> BytesMut {
        BytesMut::from(&encode_header(snapshot, Epoch::new(epoch), Index::new(next_index), false)[..])
    }

    #[test]
    fn header_only_is_unsealed_with_no_ops() {
        let decoded = decode(header(b"snap", 3, 7).freeze()).unwrap();

        assert_eq!(decoded.snapshot, Bytes::from_static(b"snap"));
        assert_eq!(decoded.epoch, Epoch::new(3));
        assert_eq!(decoded.next_index, Index::new(7));
        assert!(decoded.ops.is_empty());
        assert!(!decoded.sealed);
    }

    #[test]
    fn exactly_one_trailing_byte_is_the_seal() {
        let mut file = header(b"", 1, 0);
        file.put_slice(&encode_op(b"op-a"));
        file.put_u8(SEAL_MARKER);

        let decoded = decode(file.freeze()).unwrap();
        assert_eq!(decoded.ops, vec![Bytes::from_static(b"op-a")]);
        assert!(decoded.sealed);
    }

    #[test]
    fn seal_byte_value_does_not_matter() {
        let mut file = header(b"", 1, 0);
        file.put_u8(0xff);

        assert!(decode(file.freeze()).unwrap().sealed);
    }

    #[test]
    fn empty_op_record_is_an_op_not_a_seal() {
        // A zero-length op is 8 bytes of length prefix, so it can never be confused with the seal.
        let mut file = header(b"", 1, 0);
        file.put_slice(&encode_op(b""));
        file.put_slice(&encode_op(b"x"));

        let decoded = decode(file.freeze()).unwrap();
        assert_eq!(decoded.ops, vec![Bytes::new(), Bytes::from_static(b"x")]);
        assert!(!decoded.sealed);
    }

    #[test]
    fn two_trailing_bytes_are_a_truncated_op_record() {
        let mut file = header(b"", 1, 0);
        file.put_u8(SEAL_MARKER);
        file.put_u8(SEAL_MARKER);

        match decode(file.freeze()) {
            Err(LogRecoveryError::Truncated { what, .. }) => assert_eq!(what, "op length"),
            other => panic!("Expected truncated op length, got {:?}", other),
        }
    }

    #[test]
    fn op_longer_than_file_is_rejected() {
        let mut file = header(b"", 1, 0);
        file.put_u64_le(100);
        file.put_slice(b"short");

        match decode(file.freeze()) {
            Err(LogRecoveryError::Truncated { what, needed, .. }) => {
                assert_eq!(what, "op");
                assert_eq!(needed, 100);
            }
            other => panic!("Expected truncated op, got {:?}", other),
        }
    }

    #[test]
    fn truncated_header_is_rejected() {
        let file = header(b"snapshot", 1, 0).split_to(12);

        assert!(matches!(decode(file.freeze()), Err(LogRecoveryError::Truncated { .. })));
    }

    #[test]
    fn encoding_is_little_endian() {
        let encoded = encode_op(&[0xaa]);
        assert_eq!(&encoded[..], &[1, 0, 0, 0, 0, 0, 0, 0, 0xaa]);
    }
}
