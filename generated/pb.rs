#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoReplicaError {
    #[prost(enumeration = "ProtoErrorKind", tag = "1")]
    pub kind: i32,
}
// ---- ReplicaService ----

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoApplyReq {
    #[prost(bytes = "vec", tag = "1")]
    pub op: ::prost::alloc::vec::Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoApplySuccess {
    #[prost(bytes = "vec", tag = "1")]
    pub result: ::prost::alloc::vec::Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoApplyResult {
    #[prost(oneof = "proto_apply_result::Result", tags = "1, 2")]
    pub result: ::core::option::Option<proto_apply_result::Result>,
}
/// Nested message and enum types in `ProtoApplyResult`.
pub mod proto_apply_result {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "1")]
        Ok(super::ProtoApplySuccess),
        #[prost(message, tag = "2")]
        Err(super::ProtoReplicaError),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoApplyAsBackupReq {
    #[prost(uint64, tag = "1")]
    pub epoch: u64,
    #[prost(uint64, tag = "2")]
    pub index: u64,
    #[prost(bytes = "vec", tag = "3")]
    pub op: ::prost::alloc::vec::Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoBecomePrimaryReq {
    #[prost(uint64, tag = "1")]
    pub epoch: u64,
    #[prost(string, repeated, tag = "2")]
    pub replicas: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoGetStateReq {
    #[prost(uint64, tag = "1")]
    pub epoch: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoGetStateSuccess {
    #[prost(bytes = "vec", tag = "1")]
    pub state: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub next_index: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoGetStateResult {
    #[prost(oneof = "proto_get_state_result::Result", tags = "1, 2")]
    pub result: ::core::option::Option<proto_get_state_result::Result>,
}
/// Nested message and enum types in `ProtoGetStateResult`.
pub mod proto_get_state_result {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "1")]
        Ok(super::ProtoGetStateSuccess),
        #[prost(message, tag = "2")]
        Err(super::ProtoReplicaError),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoSetStateReq {
    #[prost(uint64, tag = "1")]
    pub epoch: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub state: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint64, tag = "3")]
    pub next_index: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoEmpty {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoEmptyResult {
    #[prost(oneof = "proto_empty_result::Result", tags = "1, 2")]
    pub result: ::core::option::Option<proto_empty_result::Result>,
}
/// Nested message and enum types in `ProtoEmptyResult`.
pub mod proto_empty_result {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "1")]
        Ok(super::ProtoEmpty),
        #[prost(message, tag = "2")]
        Err(super::ProtoReplicaError),
    }
}
// ---- ConfigService ----

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoAllocateEpochReq {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoAllocateEpochResult {
    #[prost(uint64, tag = "1")]
    pub epoch: u64,
    #[prost(string, repeated, tag = "2")]
    pub members: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoWriteConfigReq {
    #[prost(uint64, tag = "1")]
    pub epoch: u64,
    #[prost(string, repeated, tag = "2")]
    pub members: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoGetConfigReq {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoGetConfigResult {
    #[prost(string, repeated, tag = "1")]
    pub members: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoGetLeaseReq {
    #[prost(uint64, tag = "1")]
    pub epoch: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoGetLeaseResult {
    #[prost(bool, tag = "1")]
    pub granted: bool,
    /// Milliseconds since the unix epoch. 0 when not granted.
    #[prost(uint64, tag = "2")]
    pub expires_at_unix_millis: u64,
}
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ProtoErrorKind {
    Unknown = 0,
    Stale = 1,
    NotPrimary = 2,
    OutOfOrder = 3,
    Timeout = 4,
    Disconnected = 5,
    MalformedSnapshot = 6,
}
#[doc = r" Generated client implementations."]
pub mod replica_service_client {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = " Replica-to-replica and client-to-primary RPCs."]
    pub struct ReplicaServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl ReplicaServiceClient<tonic::transport::Channel> {
        #[doc = r" Attempt to create a new client by connecting to a given endpoint."]
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: std::convert::TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> ReplicaServiceClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::ResponseBody: Body + HttpBody + Send + 'static,
        T::Error: Into<StdError>,
        <T::ResponseBody as HttpBody>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = tonic::client::Grpc::with_interceptor(inner, interceptor);
            Self { inner }
        }
        pub async fn apply(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoApplyReq>,
        ) -> Result<tonic::Response<super::ProtoApplyResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/pb.ReplicaService/Apply");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn apply_as_backup(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoApplyAsBackupReq>,
        ) -> Result<tonic::Response<super::ProtoEmptyResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/pb.ReplicaService/ApplyAsBackup");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn become_primary(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoBecomePrimaryReq>,
        ) -> Result<tonic::Response<super::ProtoEmptyResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/pb.ReplicaService/BecomePrimary");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn get_state(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoGetStateReq>,
        ) -> Result<tonic::Response<super::ProtoGetStateResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/pb.ReplicaService/GetState");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn set_state(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoSetStateReq>,
        ) -> Result<tonic::Response<super::ProtoEmptyResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/pb.ReplicaService/SetState");
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
    impl<T: Clone> Clone for ReplicaServiceClient<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }
    impl<T> std::fmt::Debug for ReplicaServiceClient<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "ReplicaServiceClient {{ ... }}")
        }
    }
}
#[doc = r" Generated client implementations."]
pub mod config_service_client {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = " The configuration authority. Replicas never call it; only the admin coordinator and clerks do."]
    pub struct ConfigServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl ConfigServiceClient<tonic::transport::Channel> {
        #[doc = r" Attempt to create a new client by connecting to a given endpoint."]
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: std::convert::TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> ConfigServiceClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::ResponseBody: Body + HttpBody + Send + 'static,
        T::Error: Into<StdError>,
        <T::ResponseBody as HttpBody>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = tonic::client::Grpc::with_interceptor(inner, interceptor);
            Self { inner }
        }
        pub async fn allocate_epoch_and_config(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoAllocateEpochReq>,
        ) -> Result<tonic::Response<super::ProtoAllocateEpochResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path =
                http::uri::PathAndQuery::from_static("/pb.ConfigService/AllocateEpochAndConfig");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn write_config(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoWriteConfigReq>,
        ) -> Result<tonic::Response<super::ProtoEmptyResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/pb.ConfigService/WriteConfig");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn get_config(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoGetConfigReq>,
        ) -> Result<tonic::Response<super::ProtoGetConfigResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/pb.ConfigService/GetConfig");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn get_lease(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoGetLeaseReq>,
        ) -> Result<tonic::Response<super::ProtoGetLeaseResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/pb.ConfigService/GetLease");
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
    impl<T: Clone> Clone for ConfigServiceClient<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }
    impl<T> std::fmt::Debug for ConfigServiceClient<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "ConfigServiceClient {{ ... }}")
        }
    }
}
#[doc = r" Generated server implementations."]
pub mod replica_service_server {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = "Generated trait containing gRPC methods that should be implemented for use with ReplicaServiceServer."]
    #[async_trait]
    pub trait ReplicaService: Send + Sync + 'static {
        async fn apply(
            &self,
            request: tonic::Request<super::ProtoApplyReq>,
        ) -> Result<tonic::Response<super::ProtoApplyResult>, tonic::Status>;
        async fn apply_as_backup(
            &self,
            request: tonic::Request<super::ProtoApplyAsBackupReq>,
        ) -> Result<tonic::Response<super::ProtoEmptyResult>, tonic::Status>;
        async fn become_primary(
            &self,
            request: tonic::Request<super::ProtoBecomePrimaryReq>,
        ) -> Result<tonic::Response<super::ProtoEmptyResult>, tonic::Status>;
        async fn get_state(
            &self,
            request: tonic::Request<super::ProtoGetStateReq>,
        ) -> Result<tonic::Response<super::ProtoGetStateResult>, tonic::Status>;
        async fn set_state(
            &self,
            request: tonic::Request<super::ProtoSetStateReq>,
        ) -> Result<tonic::Response<super::ProtoEmptyResult>, tonic::Status>;
    }
    #[doc = " Replica-to-replica and client-to-primary RPCs."]
    #[derive(Debug)]
    pub struct ReplicaServiceServer<T: ReplicaService> {
        inner: _Inner<T>,
    }
    struct _Inner<T>(Arc<T>, Option<tonic::Interceptor>);
    impl<T: ReplicaService> ReplicaServiceServer<T> {
        pub fn new(inner: T) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, None);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, Some(interceptor.into()));
            Self { inner }
        }
    }
    impl<T, B> Service<http::Request<B>> for ReplicaServiceServer<T>
    where
        T: ReplicaService,
        B: HttpBody + Send + Sync + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = Never;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/pb.ReplicaService/Apply" => {
                    #[allow(non_camel_case_types)]
                    struct ApplySvc<T: ReplicaService>(pub Arc<T>);
                    impl<T: ReplicaService> tonic::server::UnaryService<super::ProtoApplyReq> for ApplySvc<T> {
                        type Response = super::ProtoApplyResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoApplyReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).apply(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = ApplySvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/pb.ReplicaService/ApplyAsBackup" => {
                    #[allow(non_camel_case_types)]
                    struct ApplyAsBackupSvc<T: ReplicaService>(pub Arc<T>);
                    impl<T: ReplicaService>
                        tonic::server::UnaryService<super::ProtoApplyAsBackupReq>
                        for ApplyAsBackupSvc<T>
                    {
                        type Response = super::ProtoEmptyResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoApplyAsBackupReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).apply_as_backup(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = ApplyAsBackupSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/pb.ReplicaService/BecomePrimary" => {
                    #[allow(non_camel_case_types)]
                    struct BecomePrimarySvc<T: ReplicaService>(pub Arc<T>);
                    impl<T: ReplicaService>
                        tonic::server::UnaryService<super::ProtoBecomePrimaryReq>
                        for BecomePrimarySvc<T>
                    {
                        type Response = super::ProtoEmptyResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoBecomePrimaryReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).become_primary(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = BecomePrimarySvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/pb.ReplicaService/GetState" => {
                    #[allow(non_camel_case_types)]
                    struct GetStateSvc<T: ReplicaService>(pub Arc<T>);
                    impl<T: ReplicaService> tonic::server::UnaryService<super::ProtoGetStateReq> for GetStateSvc<T> {
                        type Response = super::ProtoGetStateResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoGetStateReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).get_state(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = GetStateSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/pb.ReplicaService/SetState" => {
                    #[allow(non_camel_case_types)]
                    struct SetStateSvc<T: ReplicaService>(pub Arc<T>);
                    impl<T: ReplicaService> tonic::server::UnaryService<super::ProtoSetStateReq> for SetStateSvc<T> {
                        type Response = super::ProtoEmptyResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoSetStateReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).set_state(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = SetStateSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::BoxBody::empty())
                        .unwrap())
                }),
            }
        }
    }
    impl<T: ReplicaService> Clone for ReplicaServiceServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self { inner }
        }
    }
    impl<T: ReplicaService> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(self.0.clone(), self.1.clone())
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: ReplicaService> tonic::transport::NamedService for ReplicaServiceServer<T> {
        const NAME: &'static str = "pb.ReplicaService";
    }
}
#[doc = r" Generated server implementations."]
pub mod config_service_server {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = "Generated trait containing gRPC methods that should be implemented for use with ConfigServiceServer."]
    #[async_trait]
    pub trait ConfigService: Send + Sync + 'static {
        async fn allocate_epoch_and_config(
            &self,
            request: tonic::Request<super::ProtoAllocateEpochReq>,
        ) -> Result<tonic::Response<super::ProtoAllocateEpochResult>, tonic::Status>;
        async fn write_config(
            &self,
            request: tonic::Request<super::ProtoWriteConfigReq>,
        ) -> Result<tonic::Response<super::ProtoEmptyResult>, tonic::Status>;
        async fn get_config(
            &self,
            request: tonic::Request<super::ProtoGetConfigReq>,
        ) -> Result<tonic::Response<super::ProtoGetConfigResult>, tonic::Status>;
        async fn get_lease(
            &self,
            request: tonic::Request<super::ProtoGetLeaseReq>,
        ) -> Result<tonic::Response<super::ProtoGetLeaseResult>, tonic::Status>;
    }
    #[doc = " The configuration authority. Replicas never call it; only the admin coordinator and clerks do."]
    #[derive(Debug)]
    pub struct ConfigServiceServer<T: ConfigService> {
        inner: _Inner<T>,
    }
    struct _Inner<T>(Arc<T>, Option<tonic::Interceptor>);
    impl<T: ConfigService> ConfigServiceServer<T> {
        pub fn new(inner: T) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, None);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, Some(interceptor.into()));
            Self { inner }
        }
    }
    impl<T, B> Service<http::Request<B>> for ConfigServiceServer<T>
    where
        T: ConfigService,
        B: HttpBody + Send + Sync + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = Never;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/pb.ConfigService/AllocateEpochAndConfig" => {
                    #[allow(non_camel_case_types)]
                    struct AllocateEpochAndConfigSvc<T: ConfigService>(pub Arc<T>);
                    impl<T: ConfigService> tonic::server::UnaryService<super::ProtoAllocateEpochReq>
                        for AllocateEpochAndConfigSvc<T>
                    {
                        type Response = super::ProtoAllocateEpochResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoAllocateEpochReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut =
                                async move { (*inner).allocate_epoch_and_config(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = AllocateEpochAndConfigSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/pb.ConfigService/WriteConfig" => {
                    #[allow(non_camel_case_types)]
                    struct WriteConfigSvc<T: ConfigService>(pub Arc<T>);
                    impl<T: ConfigService> tonic::server::UnaryService<super::ProtoWriteConfigReq>
                        for WriteConfigSvc<T>
                    {
                        type Response = super::ProtoEmptyResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoWriteConfigReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).write_config(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = WriteConfigSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/pb.ConfigService/GetConfig" => {
                    #[allow(non_camel_case_types)]
                    struct GetConfigSvc<T: ConfigService>(pub Arc<T>);
                    impl<T: ConfigService> tonic::server::UnaryService<super::ProtoGetConfigReq> for GetConfigSvc<T> {
                        type Response = super::ProtoGetConfigResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoGetConfigReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).get_config(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = GetConfigSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/pb.ConfigService/GetLease" => {
                    #[allow(non_camel_case_types)]
                    struct GetLeaseSvc<T: ConfigService>(pub Arc<T>);
                    impl<T: ConfigService> tonic::server::UnaryService<super::ProtoGetLeaseReq> for GetLeaseSvc<T> {
                        type Response = super::ProtoGetLeaseResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoGetLeaseReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).get_lease(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = GetLeaseSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::BoxBody::empty())
                        .unwrap())
                }),
            }
        }
    }
    impl<T: ConfigService> Clone for ConfigServiceServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self { inner }
        }
    }
    impl<T: ConfigService> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(self.0.clone(), self.1.clone())
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: ConfigService> tonic::transport::NamedService for ConfigServiceServer<T> {
        const NAME: &'static str = "pb.ConfigService";
    }
}
