use aps_client::config::ApsConfig;
use aps_client::contract::{
    ItemPlan, ListOptions, MockTransport, RawResult, StaticItems, BINARY_ATTACHMENT_NAME,
};
use aps_client::data_management::DataManagementOperation;
use aps_client::error::ApsError;
use aps_client::forge::ForgeOperation;
use aps_client::normalize::NormalizeOptions;
use aps_client::pipeline::execute;
use serde_json::json;

fn list_hubs() -> DataManagementOperation {
    DataManagementOperation::ListHubs {
        options: ListOptions::default(),
    }
}

fn invalid_hub_lookup() -> DataManagementOperation {
    // Empty required parameter: fails resolution before any network call.
    DataManagementOperation::GetHub {
        hub_id: String::new(),
    }
}

#[tokio::test]
async fn aborts_at_the_failing_item_when_continue_is_disabled() {
    let plans = vec![
        ItemPlan::new(list_hubs()),
        ItemPlan::new(list_hubs()),
        ItemPlan::new(invalid_hub_lookup()),
        ItemPlan::new(list_hubs()),
        ItemPlan::new(list_hubs()),
    ];
    let source = StaticItems::new(plans).with_continue_on_failure(false);

    let mut transport = MockTransport::new();
    // Items 0 and 1 reach the transport; the run halts at item 2 before any
    // further network activity.
    transport
        .expect_invoke()
        .times(2)
        .returning(|_| Ok(RawResult::Json(json!({ "data": [] }))));

    let err = execute(&ApsConfig::default(), &source, &transport)
        .await
        .expect_err("run should abort");
    assert_eq!(err.item_index, 2);
    assert!(matches!(err.source, ApsError::Configuration(_)));
}

#[tokio::test]
async fn continue_on_failure_converts_errors_into_output_items() {
    let plans = vec![
        ItemPlan::new(list_hubs()),
        ItemPlan::new(list_hubs()),
        ItemPlan::new(invalid_hub_lookup()),
        ItemPlan::new(list_hubs()),
        ItemPlan::new(list_hubs()),
    ];
    let source = StaticItems::new(plans).with_continue_on_failure(true);

    let mut transport = MockTransport::new();
    transport
        .expect_invoke()
        .times(4)
        .returning(|_| Ok(RawResult::Json(json!({ "data": [{ "id": "a" }] }))));

    let items = execute(&ApsConfig::default(), &source, &transport)
        .await
        .expect("run should complete");

    assert_eq!(items.len(), 5);
    let paired: Vec<usize> = items.iter().map(|item| item.paired_item_index).collect();
    assert_eq!(paired, vec![0, 1, 2, 3, 4]);

    let error_message = items[2].json["error"].as_str().expect("error message");
    assert!(error_message.contains("hubId"));
    for index in [0usize, 1, 3, 4] {
        assert_eq!(items[index].json, json!({ "data": [{ "id": "a" }] }));
    }
}

#[tokio::test]
async fn fan_out_keeps_every_record_paired_to_its_input() {
    let plan = ItemPlan::with_options(
        list_hubs(),
        NormalizeOptions {
            simplify: true,
            split_items: true,
        },
    );
    let source = StaticItems::new(vec![plan.clone(), plan]).with_continue_on_failure(false);

    let mut transport = MockTransport::new();
    transport
        .expect_invoke()
        .times(2)
        .returning(|_| {
            Ok(RawResult::Json(json!({
                "data": [
                    { "id": "h1", "attributes": { "name": "one" } },
                    { "id": "h2", "attributes": { "name": "two" } }
                ]
            })))
        });

    let items = execute(&ApsConfig::default(), &source, &transport)
        .await
        .unwrap();

    assert_eq!(items.len(), 4);
    let paired: Vec<usize> = items.iter().map(|item| item.paired_item_index).collect();
    assert_eq!(paired, vec![0, 0, 1, 1]);
    assert_eq!(items[0].json, json!({ "id": "h1", "name": "one" }));
}

#[tokio::test]
async fn transport_failures_respect_the_failure_policy() {
    let source =
        StaticItems::new(vec![ItemPlan::new(list_hubs())]).with_continue_on_failure(true);

    let mut transport = MockTransport::new();
    transport.expect_invoke().times(1).returning(|_| {
        Err(ApsError::Transport(
            "HTTP 503 from https://developer.api.autodesk.com/project/v1/hubs".into(),
        ))
    });

    let items = execute(&ApsConfig::default(), &source, &transport)
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].paired_item_index, 0);
    assert!(items[0].json["error"]
        .as_str()
        .unwrap()
        .contains("HTTP 503"));
}

#[tokio::test]
async fn resolved_request_reaches_the_transport_unchanged() {
    let source =
        StaticItems::new(vec![ItemPlan::new(list_hubs())]).with_continue_on_failure(false);

    let mut transport = MockTransport::new();
    transport
        .expect_invoke()
        .withf(|request| {
            request.url == "https://developer.api.autodesk.com/project/v1/hubs"
                && request.header("x-ads-region") == Some("US")
        })
        .times(1)
        .returning(|_| Ok(RawResult::Json(json!({ "data": [] }))));

    let items = execute(&ApsConfig::default(), &source, &transport)
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].json, json!({ "data": [] }));
}

#[tokio::test]
async fn binary_operation_produces_one_item_with_attachment() {
    let plan = ItemPlan::new(ForgeOperation::GetThumbnail {
        urn: "dXJuOmFkc2s=".into(),
        width: None,
    });
    let source = StaticItems::new(vec![plan]).with_continue_on_failure(false);

    let mut transport = MockTransport::new();
    transport
        .expect_invoke()
        .times(1)
        .returning(|_| Ok(RawResult::Binary(vec![1, 2, 3])));

    let items = execute(&ApsConfig::default(), &source, &transport)
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].paired_item_index, 0);
    assert!(items[0].json["thumbnail"].is_string());
    assert_eq!(items[0].json["contentType"], json!("image/png"));
    let attachment = items[0].binary.as_ref().expect("attachment present");
    assert_eq!(attachment.name, BINARY_ATTACHMENT_NAME);
    assert_eq!(attachment.data, vec![1, 2, 3]);
}
