//! Client Request Tests
//!
//! ## Test Scopes
//! - **RequestTask**: decode, prepare, encode as separate steps.
//! - **ClientEndpoint**: whole frames in, whole frames out, errors included.

#[cfg(test)]
mod tests {
    use crate::cache::expiry::ExpiryPolicy;
    use crate::client::codec::{self, ClientRequest, ClientResponse};
    use crate::client::task::{ClientEndpoint, RequestTask};
    use crate::cluster::address::Address;
    use crate::cluster::partitioner::PartitionTable;
    use crate::config::NodeConfig;
    use crate::error::{ErrorKind, GridError};
    use crate::events::{BroadcastSink, CompletionOutcome, LoggingSink};
    use crate::node::Node;
    use crate::node::transport::InProcessNetwork;
    use crate::operation::catalog::OperationCatalog;
    use crate::operation::types::*;
    use crate::scheduled::handle::ScheduledTaskHandle;
    use crate::serialization::{Data, Serializer};
    use std::sync::Arc;
    use std::time::Duration;

    fn local() -> Address {
        "127.0.0.1:5701".parse().unwrap()
    }

    fn node_with_sink(sink: Arc<BroadcastSink>) -> Node {
        Node::start(&NodeConfig::standalone(local()), InProcessNetwork::new(), sink)
    }

    fn node() -> Node {
        Node::start(
            &NodeConfig::standalone(local()),
            InProcessNetwork::new(),
            Arc::new(LoggingSink),
        )
    }

    fn frame(correlation_id: u64, object_name: &str, verb: Verb<Data>) -> Vec<u8> {
        codec::encode_request(&ClientRequest {
            correlation_id,
            object_name: object_name.to_string(),
            verb,
        })
        .unwrap()
    }

    fn result_of(response: &ClientResponse) -> OperationResult {
        let value = response.value.as_ref().expect("response carries a value");
        Serializer.to_object("value", value).unwrap()
    }

    async fn call(endpoint: &ClientEndpoint, bytes: &[u8]) -> ClientResponse {
        codec::decode_response(&endpoint.handle(bytes).await).unwrap()
    }

    fn get_and_replace(key: &str, value: &str, expiry: Option<Data>) -> Verb<Data> {
        Verb::Cache {
            verb: CacheVerb::GetAndReplace {
                key: Data::from(key),
                value: Data::from(value),
                expiry,
            },
            completion_id: Some(99),
        }
    }

    // ============================================================
    // REQUEST TASK
    // ============================================================

    #[test]
    fn test_decode_exposes_object_name() {
        let bytes = frame(5, "books", get_and_replace("k", "v", None));

        let task = RequestTask::decode(&bytes).unwrap();

        assert_eq!(task.correlation_id(), 5);
        assert_eq!(task.distributed_object_name(), "books");
    }

    #[test]
    fn test_decode_rejects_truncated_frame() {
        let bytes = frame(5, "books", get_and_replace("k", "v", None));

        let err = RequestTask::decode(&bytes[..bytes.len() - 3]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.field(), Some("request"));
    }

    #[test]
    fn test_prepare_resolves_expiry_and_routes() {
        let partitions = PartitionTable::standalone(local(), 271);
        let catalog = OperationCatalog::standard(partitions.clone());
        let serializer = Serializer;
        let policy = ExpiryPolicy::modified(Duration::from_secs(30));
        let bytes = frame(
            1,
            "books",
            get_and_replace("k", "v", Some(serializer.to_data(&policy).unwrap())),
        );

        let op = RequestTask::decode(&bytes)
            .unwrap()
            .prepare(&catalog, &serializer)
            .unwrap();

        assert_eq!(op.target, Target::Partition(partitions.partition_for(b"k")));
        assert_eq!(op.completion_id(), Some(99));
        assert_eq!(
            op.verb,
            Verb::Cache {
                verb: CacheVerb::GetAndReplace {
                    key: Data::from("k"),
                    value: Data::from("v"),
                    expiry: Some(policy),
                },
                completion_id: Some(99),
            }
        );
    }

    #[test]
    fn test_handle_verb_reports_handle_scheduler_as_object_name() {
        let handle = ScheduledTaskHandle::of_partition(3, "secret", "t").unwrap();
        let bytes = frame(
            4,
            "public",
            Verb::ScheduledExecutor(ScheduledVerb::Cancel { handle }),
        );

        let task = RequestTask::decode(&bytes).unwrap();

        assert_eq!(task.distributed_object_name(), "secret");
    }

    #[test]
    fn test_prepare_rejects_handle_of_another_scheduler() {
        let catalog = OperationCatalog::standard(PartitionTable::standalone(local(), 271));
        let handle = ScheduledTaskHandle::of_partition(3, "secret", "t").unwrap();
        let bytes = frame(
            4,
            "public",
            Verb::ScheduledExecutor(ScheduledVerb::Cancel { handle }),
        );

        let err = RequestTask::decode(&bytes)
            .unwrap()
            .prepare(&catalog, &Serializer)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.field(), Some("object_name"));
    }

    #[test]
    fn test_prepare_accepts_handle_of_named_scheduler() {
        let catalog = OperationCatalog::standard(PartitionTable::standalone(local(), 271));
        let handle = ScheduledTaskHandle::of_partition(3, "secret", "t").unwrap();
        let bytes = frame(
            4,
            "secret",
            Verb::ScheduledExecutor(ScheduledVerb::GetState { handle }),
        );

        let op = RequestTask::decode(&bytes)
            .unwrap()
            .prepare(&catalog, &Serializer)
            .unwrap();

        assert_eq!(op.object_name, "secret");
        assert_eq!(op.target, Target::Partition(3));
    }

    #[test]
    fn test_encode_carries_error_kind_and_field() {
        let err = GridError::invalid_argument("permits", "must not be negative");

        let bytes = RequestTask::encode(8, Err(err), &Serializer);
        let response = codec::decode_response(&bytes).unwrap();

        assert_eq!(response.correlation_id, 8);
        assert_eq!(response.value, None);
        let info = response.error.unwrap();
        assert_eq!(info.kind, ErrorKind::InvalidArgument);
        assert_eq!(info.field.as_deref(), Some("permits"));
    }

    // ============================================================
    // CLIENT ENDPOINT
    // ============================================================

    #[tokio::test]
    async fn test_get_and_replace_round_trip() {
        let node = node();
        let put = Verb::Cache {
            verb: CacheVerb::Put {
                key: Data::from("k"),
                value: Data::from("v1"),
                expiry: None,
                get_previous: false,
            },
            completion_id: None,
        };

        let response = call(&node.client, &frame(1, "books", put)).await;
        assert_eq!(result_of(&response), OperationResult::Value(None));

        let response = call(&node.client, &frame(2, "books", get_and_replace("k", "v2", None))).await;
        assert_eq!(response.correlation_id, 2);
        assert_eq!(
            result_of(&response),
            OperationResult::Value(Some(Data::from("v1")))
        );
    }

    #[tokio::test]
    async fn test_completion_event_published_for_client_call() {
        let sink = Arc::new(BroadcastSink::new(8));
        let mut events = sink.subscribe();
        let node = node_with_sink(sink);

        call(&node.client, &frame(1, "books", get_and_replace("k", "v", None))).await;

        let event = events.recv().await.unwrap();
        assert_eq!(event.completion_id, 99);
        assert_eq!(event.cache_name, "books");
        assert_eq!(event.outcome, CompletionOutcome::Unchanged);
    }

    #[tokio::test]
    async fn test_garbage_frame_is_answered_not_dropped() {
        let node = node();
        let mut bytes = 77u64.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0xff; 5]);

        let response = call(&node.client, &bytes).await;

        assert_eq!(response.correlation_id, 77);
        assert_eq!(response.value, None);
        assert_eq!(response.error.unwrap().kind, ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_bad_expiry_fails_before_touching_cache() {
        let node = node();
        let bytes = frame(3, "books", get_and_replace("k", "v", Some(Data(vec![9, 9]))));

        let response = call(&node.client, &bytes).await;

        let info = response.error.unwrap();
        assert_eq!(info.kind, ErrorKind::Decode);
        assert_eq!(info.field.as_deref(), Some("expiry_policy"));
        let partition = node.partitions.partition_for(b"k");
        assert_eq!(node.containers.cache_size(partition, "books"), 0);
    }

    #[tokio::test]
    async fn test_handle_verb_with_scheduler_handle() {
        let node = node();
        let submit = Verb::ScheduledExecutor(ScheduledVerb::SubmitToPartition {
            task_name: Some("t".to_string()),
            definition: Data::from("job"),
            initial_delay_ms: 5,
        });

        let response = call(&node.client, &frame(1, "sched", submit)).await;
        let OperationResult::Handle(handle) = result_of(&response) else {
            panic!("expected a handle");
        };

        let cancel = Verb::ScheduledExecutor(ScheduledVerb::Cancel { handle });
        let response = call(&node.client, &frame(2, "sched", cancel)).await;
        assert_eq!(result_of(&response), OperationResult::Bool(true));
    }
}
