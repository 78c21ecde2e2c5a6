//! gRPC service implementation for consignment tracking.
//!
//! This module defines [`ConsignmentService`], the implementation of the
//! [`ShippingService`] gRPC service defined in the protobuf schema. Both
//! endpoints are unary and pass straight through to a [`ConsignmentStore`].
//!
//! ## Responsibilities
//!
//! - Append submitted consignments and echo them back with `created` set.
//! - Return the full submission history on `ListConsignments`.
//! - Surface store failures as gRPC statuses rather than in the envelope.

use crate::server::telemetry::{
    increment_list_requests, increment_request_errors, increment_submissions,
    record_consignments_listed,
};
use consignment_core::{
    proto::{
        Consignment, ListRequest, Response as Envelope, shipping_service_server::ShippingService,
    },
    store::{ConsignmentStore, MemoryStore},
};
use std::sync::Arc;
use tonic::{Request, Response, Status};

/// gRPC front end over a [`ConsignmentStore`].
///
/// The store is built once at startup and shared by every request through an
/// [`Arc`]. Fields of incoming consignments are not validated.
pub struct ConsignmentService<S = MemoryStore> {
    store: Arc<S>,
}

// Manual impl so cloning does not require `S: Clone`.
impl<S> Clone for ConsignmentService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ConsignmentStore> ConsignmentService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The store backing this service.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

#[tonic::async_trait]
impl<S: ConsignmentStore> ShippingService for ConsignmentService<S> {
    /// Appends the consignment and echoes the stored value.
    ///
    /// A store failure fails the call with the error's status; no envelope is
    /// returned in that case.
    #[tracing::instrument(skip_all, fields(id = %req.get_ref().id))]
    async fn submit_consignment(
        &self,
        req: Request<Consignment>,
    ) -> Result<Response<Envelope>, Status> {
        let consignment = self.store.append(req.into_inner()).map_err(|e| {
            increment_request_errors();
            tracing::warn!("Failed to store consignment: {}", e);
            Status::from(e)
        })?;

        increment_submissions();
        tracing::debug!("Stored consignment");

        Ok(Response::new(Envelope {
            created: true,
            consignment: Some(consignment),
            ..Default::default()
        }))
    }

    /// Returns every stored consignment. `created` and `consignment` stay at
    /// their defaults.
    #[tracing::instrument(skip_all)]
    async fn list_consignments(
        &self,
        _req: Request<ListRequest>,
    ) -> Result<Response<Envelope>, Status> {
        let consignments = self.store.list_all();

        increment_list_requests();
        record_consignments_listed(consignments.len() as f64);
        tracing::debug!(count = consignments.len(), "Listed consignments");

        Ok(Response::new(Envelope {
            consignments,
            ..Default::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consignment_core::{Error, Result};
    use tonic::Code;

    fn service() -> ConsignmentService {
        ConsignmentService::new(Arc::new(MemoryStore::new()))
    }

    fn consignment(id: &str, cargo: &str, weight: i32, destination: &str) -> Consignment {
        Consignment {
            id: id.to_string(),
            description: cargo.to_string(),
            weight,
            destination: destination.to_string(),
            ..Default::default()
        }
    }

    async fn submit<S: ConsignmentStore>(
        service: &ConsignmentService<S>,
        consignment: Consignment,
    ) -> std::result::Result<Envelope, Status> {
        service
            .submit_consignment(Request::new(consignment))
            .await
            .map(Response::into_inner)
    }

    async fn list<S: ConsignmentStore>(service: &ConsignmentService<S>) -> Envelope {
        service
            .list_consignments(Request::new(ListRequest {}))
            .await
            .unwrap()
            .into_inner()
    }

    #[tokio::test]
    async fn submit_echoes_consignment_and_sets_created() {
        let service = service();
        let steel = consignment("A", "steel", 500, "Rotterdam");

        let resp = submit(&service, steel.clone()).await.unwrap();

        assert!(resp.created);
        assert_eq!(resp.consignment, Some(steel));
        assert!(resp.consignments.is_empty());
    }

    #[tokio::test]
    async fn list_before_any_submission_is_empty() {
        let resp = list(&service()).await;

        assert!(!resp.created);
        assert!(resp.consignment.is_none());
        assert!(resp.consignments.is_empty());
    }

    #[tokio::test]
    async fn steel_then_grain_are_listed_in_order() {
        let service = service();
        let a = consignment("A", "steel", 500, "Rotterdam");
        let b = consignment("B", "grain", 1000, "Lagos");

        assert!(submit(&service, a.clone()).await.unwrap().created);
        assert!(submit(&service, b.clone()).await.unwrap().created);

        let resp = list(&service).await;
        assert!(!resp.created);
        assert!(resp.consignment.is_none());
        assert_eq!(resp.consignments, vec![a, b]);
    }

    #[tokio::test]
    async fn resubmitting_the_same_value_stores_it_twice() {
        let service = service();
        let a = consignment("A", "steel", 500, "Rotterdam");

        submit(&service, a.clone()).await.unwrap();
        submit(&service, a.clone()).await.unwrap();

        assert_eq!(list(&service).await.consignments, vec![a.clone(), a]);
    }

    // Missing fields are stored as-is; nothing is validated.
    #[tokio::test]
    async fn empty_consignment_is_accepted() {
        let service = service();

        let resp = submit(&service, Consignment::default()).await.unwrap();

        assert!(resp.created);
        assert_eq!(resp.consignment, Some(Consignment::default()));
        assert_eq!(service.store().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_submissions_are_all_stored() {
        const K: usize = 64;
        let service = service();

        let handles: Vec<_> = (0..K)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    submit(&service, consignment(&format!("C{i}"), "cargo", i as i32, "port")).await
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().unwrap().created);
        }

        let mut weights: Vec<_> = list(&service)
            .await
            .consignments
            .into_iter()
            .map(|c| c.weight)
            .collect();
        assert_eq!(weights.len(), K);
        weights.sort_unstable();
        assert_eq!(weights, (0..K as i32).collect::<Vec<_>>());
    }

    struct FailingStore;

    impl ConsignmentStore for FailingStore {
        fn append(&self, _consignment: Consignment) -> Result<Consignment> {
            Err(Error::Storage {
                context: "capacity reached".to_string(),
            })
        }

        fn list_all(&self) -> Vec<Consignment> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn store_failure_becomes_internal_status() {
        let service = ConsignmentService::new(Arc::new(FailingStore));

        let status = submit(&service, consignment("A", "steel", 500, "Rotterdam"))
            .await
            .unwrap_err();

        assert_eq!(status.code(), Code::Internal);
        assert!(status.message().contains("capacity reached"));
        assert!(list(&service).await.consignments.is_empty());
    }
}
