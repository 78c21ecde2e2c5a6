pub mod error;
pub use error::*;

/// Protobuf messages and gRPC bindings generated from
/// `proto/consignment.proto`.
///
/// - [`ShippingService`](shipping_service_server::ShippingService) - server
///   trait with `submit_consignment` and `list_consignments`.
/// - [`ShippingServiceClient`](shipping_service_client::ShippingServiceClient)
///   - generated client.
/// - [`Consignment`], [`Container`], [`ListRequest`], [`Response`] - messages.
pub mod proto {
    tonic::include_proto!("consignment");

    /// Encoded file descriptor set for the reflection service.
    pub const FILE_DESCRIPTOR_SET: &[u8] =
        tonic::include_file_descriptor_set!("consignment_descriptor");
}
