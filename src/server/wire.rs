//! Conversions between the replica API and its protobuf representation, shared by the servers and
//! the gRPC clerks.
use crate::grpc::{proto_empty_result, ProtoEmpty, ProtoEmptyResult, ProtoErrorKind, ProtoReplicaError};
use crate::replica::ReplicaError;
use std::net::SocketAddr;
use tonic::Status;

pub(crate) fn error_to_proto(e: ReplicaError) -> ProtoReplicaError {
    let kind = match e {
        ReplicaError::Stale => ProtoErrorKind::Stale,
        ReplicaError::NotPrimary => ProtoErrorKind::NotPrimary,
        ReplicaError::OutOfOrder => ProtoErrorKind::OutOfOrder,
        ReplicaError::Timeout => ProtoErrorKind::Timeout,
        ReplicaError::Disconnected => ProtoErrorKind::Disconnected,
        ReplicaError::MalformedSnapshot => ProtoErrorKind::MalformedSnapshot,
    };

    ProtoReplicaError { kind: kind as i32 }
}

pub(crate) fn error_from_proto(e: ProtoReplicaError) -> ReplicaError {
    match ProtoErrorKind::from_i32(e.kind) {
        Some(ProtoErrorKind::Stale) => ReplicaError::Stale,
        Some(ProtoErrorKind::NotPrimary) => ReplicaError::NotPrimary,
        Some(ProtoErrorKind::OutOfOrder) => ReplicaError::OutOfOrder,
        Some(ProtoErrorKind::Timeout) => ReplicaError::Timeout,
        Some(ProtoErrorKind::MalformedSnapshot) => ReplicaError::MalformedSnapshot,
        // An error kind we don't understand tells us nothing about the peer's state.
        Some(ProtoErrorKind::Disconnected) | Some(ProtoErrorKind::Unknown) | None => ReplicaError::Disconnected,
    }
}

pub(crate) fn empty_result_to_proto(result: Result<(), ReplicaError>) -> ProtoEmptyResult {
    let result = match result {
        Ok(()) => proto_empty_result::Result::Ok(ProtoEmpty {}),
        Err(e) => proto_empty_result::Result::Err(error_to_proto(e)),
    };

    ProtoEmptyResult { result: Some(result) }
}

pub(crate) fn empty_result_from_proto(reply: ProtoEmptyResult) -> Result<(), ReplicaError> {
    match reply.result {
        Some(proto_empty_result::Result::Ok(_)) => Ok(()),
        Some(proto_empty_result::Result::Err(e)) => Err(error_from_proto(e)),
        None => Err(ReplicaError::Disconnected),
    }
}

pub(crate) fn addrs_to_proto(addrs: &[SocketAddr]) -> Vec<String> {
    addrs.iter().map(SocketAddr::to_string).collect()
}

pub(crate) fn addrs_from_proto(addrs: &[String]) -> Result<Vec<SocketAddr>, Status> {
    addrs
        .iter()
        .map(|addr| {
            addr.parse()
                .map_err(|_| Status::invalid_argument(format!("Invalid replica address '{}'", addr)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_kind_survives_the_wire() {
        for e in [
            ReplicaError::Stale,
            ReplicaError::NotPrimary,
            ReplicaError::OutOfOrder,
            ReplicaError::Timeout,
            ReplicaError::Disconnected,
            ReplicaError::MalformedSnapshot,
        ] {
            assert_eq!(error_from_proto(error_to_proto(e)), e);
        }
    }

    #[test]
    fn unknown_error_kind_is_disconnected() {
        assert_eq!(error_from_proto(ProtoReplicaError { kind: 0 }), ReplicaError::Disconnected);
        assert_eq!(error_from_proto(ProtoReplicaError { kind: 99 }), ReplicaError::Disconnected);
    }

    #[test]
    fn missing_result_is_disconnected() {
        assert_eq!(
            empty_result_from_proto(ProtoEmptyResult { result: None }),
            Err(ReplicaError::Disconnected)
        );
    }

    #[test]
    fn bad_address_is_invalid_argument() {
        let status = addrs_from_proto(&["127.0.0.1:1".to_string(), "nope".to_string()]).unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);

        let addrs = addrs_from_proto(&["127.0.0.1:1".to_string()]).unwrap();
        assert_eq!(addrs_to_proto(&addrs), vec!["127.0.0.1:1".to_string()]);
    }
}
