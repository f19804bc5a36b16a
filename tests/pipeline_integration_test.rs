//! End-to-end pipeline tests against the in-process backends

use reportflow::adapters::bi::{BiOperation, MemoryBiService};
use reportflow::adapters::notification::MemoryPublisher;
use reportflow::adapters::storage::MemoryStore;
use reportflow::core::notify::{NotificationDispatcher, NotificationSettings};
use reportflow::core::pipeline::Pipeline;
use reportflow::core::provision::{DashboardProvisioner, ProvisionLocks, ProvisioningSettings};
use reportflow::core::routing::DestinationRouter;
use reportflow::domain::ids::{AccountId, LocationId, ObjectKey, Region};
use reportflow::domain::{
    AnalysisId, DashboardId, DatasetId, DatasetState, ErrorKind, PrincipalArn,
    ProvisioningContext, StoredObjectRef, TopicArn,
};
use serde_json::{json, Value};
use std::sync::Arc;

const SAMPLE: &str = r#"[{"date":"2024-01-01","product":"Widget","sales":9.99}]"#;

struct Harness {
    store: Arc<MemoryStore>,
    bi: Arc<MemoryBiService>,
    publisher: Arc<MemoryPublisher>,
    pipeline: Pipeline,
}

struct HarnessOptions {
    store: MemoryStore,
    bi: MemoryBiService,
    publisher: MemoryPublisher,
    provision_passthrough: bool,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            store: MemoryStore::new(),
            bi: MemoryBiService::new(),
            publisher: MemoryPublisher::new(),
            provision_passthrough: true,
        }
    }
}

fn context() -> ProvisioningContext {
    ProvisioningContext::new(
        AccountId::new("123456789012").unwrap(),
        Region::new("us-east-1").unwrap(),
    )
}

fn provisioning_settings() -> ProvisioningSettings {
    ProvisioningSettings {
        dataset_id: DatasetId::new("report-dataset").unwrap(),
        dataset_name: "ReportDataset".to_string(),
        analysis_id: AnalysisId::new("report-analysis").unwrap(),
        analysis_name: "ReportAnalysis".to_string(),
        dashboard_id: DashboardId::new("report-dashboard").unwrap(),
        dashboard_name: "ReportDashboard".to_string(),
        placeholder: "ReportDataset".to_string(),
        viewer_principal: PrincipalArn::new(
            "arn:aws:quicksight:us-east-1:123456789012:user/default/viewer",
        )
        .unwrap(),
        dashboard_actions: vec![
            "quicksight:DescribeDashboard".to_string(),
            "quicksight:QueryDashboard".to_string(),
        ],
        analysis_actions: Vec::new(),
    }
}

fn harness(options: HarnessOptions) -> Harness {
    let store = Arc::new(options.store);
    let bi = Arc::new(options.bi);
    let publisher = Arc::new(options.publisher);

    let router = DestinationRouter::new(
        LocationId::new("destinationbucket").unwrap(),
        LocationId::new("finalbucket").unwrap(),
        "folder",
        options.provision_passthrough,
    );
    let provisioner = DashboardProvisioner::new(
        bi.clone(),
        context(),
        provisioning_settings(),
        Arc::new(ProvisionLocks::new()),
    );
    let dispatcher = NotificationDispatcher::new(
        publisher.clone(),
        NotificationSettings {
            topic: TopicArn::new("arn:aws:sns:us-east-1:123456789012:report_topic").unwrap(),
            subject: "Report Notification".to_string(),
            success_message: "A report has been generated in the final bucket!".to_string(),
            failure_message: "Report generation failed.".to_string(),
        },
    );

    Harness {
        pipeline: Pipeline::new(store.clone(), router, provisioner, dispatcher),
        store,
        bi,
        publisher,
    }
}

fn event(bucket: &str, key: &str) -> Value {
    json!({
        "Records": [{
            "eventName": "ObjectCreated:Put",
            "s3": {
                "bucket": { "name": bucket },
                "object": { "key": key }
            }
        }]
    })
}

fn stored(location: &str, key: &str) -> StoredObjectRef {
    StoredObjectRef::new(LocationId::new(location).unwrap(), ObjectKey::new(key).unwrap())
}

#[tokio::test]
async fn test_json_export_is_converted_and_provisioned() {
    let h = harness(HarnessOptions::default());
    h.store.insert("incoming", "sales.json", SAMPLE);

    let outcome = h.pipeline.run(&event("incoming", "sales.json")).await;

    assert!(outcome.is_success(), "{}", outcome.detail);
    let response = outcome.response();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, "Success");

    let csv = h.store.get("destinationbucket", "sales.csv").unwrap();
    assert_eq!(
        String::from_utf8(csv).unwrap(),
        "date,product,sales\n2024-01-01,Widget,9.99\n"
    );

    assert_eq!(h.bi.dataset_state("report-dataset"), DatasetState::Created);
    assert_eq!(
        h.bi.dataset_source("report-dataset"),
        Some(stored("destinationbucket", "sales.csv"))
    );
    assert!(h.bi.has_analysis("report-analysis"));
    assert!(h.bi.has_dashboard("report-dashboard"));
    assert_eq!(
        outcome.dashboard.as_ref().map(|d| d.dashboard_id.as_str()),
        Some("report-dashboard")
    );

    let messages = h.publisher.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0]
        .message
        .starts_with("A report has been generated in the final bucket!"));
    assert_eq!(messages[0].subject.as_deref(), Some("Report Notification"));
}

#[tokio::test]
async fn test_empty_event_fails_without_reading() {
    let h = harness(HarnessOptions::default());

    let outcome = h.pipeline.run(&json!({})).await;

    let response = outcome.response();
    assert_eq!(response.status_code, 500);
    assert_eq!(response.body, "Error");
    assert_eq!(outcome.error_kind, Some(ErrorKind::MalformedEvent));
    assert_eq!(h.store.read_count(), 0);
    assert_eq!(h.store.write_count(), 0);
    assert!(h.bi.calls().is_empty());

    // A failed run still notifies, with the failure kind
    let messages = h.publisher.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].message.starts_with("Report generation failed."));
    assert!(messages[0].message.contains("MalformedEventError"));
}

#[tokio::test]
async fn test_unsupported_suffix_is_malformed() {
    let h = harness(HarnessOptions::default());
    h.store.insert("incoming", "notes.txt", "hello");

    let outcome = h.pipeline.run(&event("incoming", "notes.txt")).await;

    assert_eq!(outcome.response().status_code, 500);
    assert_eq!(outcome.error_kind, Some(ErrorKind::MalformedEvent));
    assert_eq!(h.store.read_count(), 0);
}

#[tokio::test]
async fn test_missing_source_object() {
    let h = harness(HarnessOptions::default());

    let outcome = h.pipeline.run(&event("incoming", "absent.json")).await;

    assert_eq!(outcome.error_kind, Some(ErrorKind::NotFound));
    assert_eq!(h.store.write_count(), 0);
    assert!(h.bi.calls().is_empty());
}

#[tokio::test]
async fn test_rerun_updates_dataset_to_second_artifact() {
    let h = harness(HarnessOptions::default());
    h.store.insert("incoming", "sales.json", SAMPLE);

    let first = h.pipeline.run(&event("incoming", "sales.json")).await;
    assert!(first.is_success());

    h.store.insert(
        "incoming",
        "sales.json",
        r#"[{"date":"2024-01-02","product":"Gadget","sales":"12.50"}]"#,
    );
    let second = h.pipeline.run(&event("incoming", "sales.json")).await;
    assert!(second.is_success());

    assert_eq!(first.destination, second.destination);
    assert_eq!(h.store.keys("destinationbucket"), vec!["sales.csv".to_string()]);
    assert_eq!(
        String::from_utf8(h.store.get("destinationbucket", "sales.csv").unwrap()).unwrap(),
        "date,product,sales\n2024-01-02,Gadget,12.50\n"
    );
    assert_eq!(h.bi.dataset_state("report-dataset"), DatasetState::Updated);
    assert_eq!(
        h.bi.dataset_source("report-dataset"),
        second.destination.clone()
    );
}

#[tokio::test]
async fn test_schema_error_leaves_no_artifact() {
    let h = harness(HarnessOptions::default());
    h.store.insert(
        "incoming",
        "sales.json",
        r#"[{"date":"2024-01-01","product":"Widget","sales":1},{"date":"2024-01-02","product":"Gadget"}]"#,
    );

    let outcome = h.pipeline.run(&event("incoming", "sales.json")).await;

    assert_eq!(outcome.error_kind, Some(ErrorKind::Schema));
    assert!(outcome.detail.contains("record 1"));
    assert_eq!(h.store.write_count(), 0);
    assert!(h.store.get("destinationbucket", "sales.csv").is_none());
    assert!(h.bi.calls().is_empty());
}

#[tokio::test]
async fn test_decode_error_for_non_array() {
    let h = harness(HarnessOptions::default());
    h.store.insert("incoming", "sales.json", r#"{"date":"2024-01-01"}"#);

    let outcome = h.pipeline.run(&event("incoming", "sales.json")).await;

    assert_eq!(outcome.error_kind, Some(ErrorKind::Decode));
    assert_eq!(h.store.write_count(), 0);
}

#[tokio::test]
async fn test_notify_failure_keeps_success() {
    let h = harness(HarnessOptions {
        publisher: MemoryPublisher::failing(),
        ..HarnessOptions::default()
    });
    h.store.insert("incoming", "sales.json", SAMPLE);

    let outcome = h.pipeline.run(&event("incoming", "sales.json")).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.response().status_code, 200);
}

#[tokio::test]
async fn test_csv_passthrough_bytes_unchanged() {
    let h = harness(HarnessOptions::default());
    let original = b"date,product,sales\r\n2024-01-01,\"Widget, large\",9.990\r\n".to_vec();
    h.store.insert("incoming", "uploads/report.csv", original.clone());

    let outcome = h.pipeline.run(&event("incoming", "uploads/report.csv")).await;

    assert!(outcome.is_success(), "{}", outcome.detail);
    assert_eq!(h.store.get("finalbucket", "folder/report.csv"), Some(original));
    assert_eq!(
        h.bi.dataset_source("report-dataset"),
        Some(stored("finalbucket", "folder/report.csv"))
    );
}

#[tokio::test]
async fn test_csv_passthrough_without_provisioning() {
    let h = harness(HarnessOptions {
        provision_passthrough: false,
        ..HarnessOptions::default()
    });
    h.store.insert("incoming", "report.csv", "date,product,sales\n");

    let outcome = h.pipeline.run(&event("incoming", "report.csv")).await;

    assert_eq!(outcome.response().status_code, 200);
    assert!(h.store.get("finalbucket", "folder/report.csv").is_some());
    assert!(h.bi.calls().is_empty());
    assert!(outcome.dashboard.is_none());
    assert_eq!(h.publisher.messages().len(), 1);
}

#[tokio::test]
async fn test_denied_destination_is_access_error() {
    let store = MemoryStore::new();
    store.deny("destinationbucket");
    let h = harness(HarnessOptions {
        store,
        ..HarnessOptions::default()
    });
    h.store.insert("incoming", "sales.json", SAMPLE);

    let outcome = h.pipeline.run(&event("incoming", "sales.json")).await;

    assert_eq!(outcome.response().status_code, 500);
    assert_eq!(outcome.error_kind, Some(ErrorKind::Access));
    assert!(h.bi.calls().is_empty());
}

#[tokio::test]
async fn test_provision_failure_reports_destination() {
    let bi = MemoryBiService::new();
    bi.fail_on(BiOperation::UpsertDashboard);
    let h = harness(HarnessOptions {
        bi,
        ..HarnessOptions::default()
    });
    h.store.insert("incoming", "sales.json", SAMPLE);

    let outcome = h.pipeline.run(&event("incoming", "sales.json")).await;

    assert_eq!(outcome.response().status_code, 500);
    assert_eq!(outcome.error_kind, Some(ErrorKind::Provision));
    // The artifact was written before provisioning failed
    assert_eq!(outcome.destination, Some(stored("destinationbucket", "sales.csv")));
    assert!(h.bi.has_analysis("report-analysis"));
    assert!(!h.bi.has_dashboard("report-dashboard"));

    let messages = h.publisher.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].message.contains("ProvisionError"));
}

#[tokio::test]
async fn test_concurrent_runs_on_distinct_keys() {
    let h = harness(HarnessOptions {
        store: MemoryStore::with_delay(5),
        ..HarnessOptions::default()
    });
    for i in 0..4 {
        h.store.insert(
            "incoming",
            &format!("day-{i}.json"),
            format!(r#"[{{"date":"2024-01-0{}","product":"Widget","sales":{i}}}]"#, i + 1),
        );
    }

    let events: Vec<Value> = (0..4)
        .map(|i| event("incoming", &format!("day-{i}.json")))
        .collect();
    let outcomes = futures::future::join_all(events.iter().map(|e| h.pipeline.run(e))).await;

    assert!(outcomes.iter().all(|o| o.is_success()));
    assert_eq!(h.store.keys("destinationbucket").len(), 4);
    assert_eq!(
        String::from_utf8(h.store.get("destinationbucket", "day-2.csv").unwrap()).unwrap(),
        "date,product,sales\n2024-01-03,Widget,2\n"
    );
    assert_eq!(h.publisher.messages().len(), 4);
}

#[tokio::test]
async fn test_concurrent_runs_serialize_provisioning() {
    let h = harness(HarnessOptions {
        bi: MemoryBiService::with_delay(5),
        ..HarnessOptions::default()
    });
    h.store.insert("incoming", "a.json", SAMPLE);
    h.store.insert("incoming", "b.json", SAMPLE);

    let a = event("incoming", "a.json");
    let b = event("incoming", "b.json");
    let (first, second) = tokio::join!(h.pipeline.run(&a), h.pipeline.run(&b));
    assert!(first.is_success());
    assert!(second.is_success());

    // Each run's provisioning calls form one uninterrupted block
    let ops: Vec<BiOperation> = h.bi.calls().into_iter().map(|(op, _)| op).collect();
    let block = [
        BiOperation::UpsertDataset,
        BiOperation::UpsertAnalysis,
        BiOperation::UpsertDashboard,
        BiOperation::GrantPermissions,
    ];
    assert_eq!(ops.len(), block.len() * 2);
    for chunk in ops.chunks(block.len()) {
        assert_eq!(chunk, block);
    }
    assert_eq!(h.bi.dataset_state("report-dataset"), DatasetState::Updated);
}
