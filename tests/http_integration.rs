// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP protocol using wiremock.

use std::time::Duration;

use dlpdu_lib::protocol::{HttpClient, PduConfig, Protocol};
use dlpdu_lib::types::{OutletAction, OutletNumber};
use dlpdu_lib::{Error, PduHub, ProtocolError, Subscribable};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{basic_auth, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NAMES_PATH: &str = "/restapi/relay/outlets/all;/name/";

fn config(server: &MockServer) -> PduConfig {
    PduConfig::new(server.address().to_string(), "admin", "1234")
}

fn client(server: &MockServer) -> HttpClient {
    config(server).into_client().unwrap()
}

fn outlet(n: u32) -> OutletNumber {
    OutletNumber::from_position(n - 1)
}

// ============================================================================
// HttpClient Tests
// ============================================================================

mod http_client {
    use super::*;

    #[tokio::test]
    async fn list_outlet_names() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(NAMES_PATH))
            .and(header("Accept", "application/json"))
            .and(basic_auth("admin", "1234"))
            .respond_with(
                ResponseTemplate::new(207).set_body_json(serde_json::json!(["Mount", "Camera"])),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let names = client(&mock_server)
            .outlet_names(&CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(names, vec!["Mount".to_string(), "Camera".to_string()]);
    }

    #[tokio::test]
    async fn list_outlet_names_requires_multi_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(NAMES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["Mount"])))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server)
            .outlet_names(&CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::UnexpectedStatus {
                status: 200,
                expected: 207,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn list_outlet_names_rejects_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(NAMES_PATH))
            .respond_with(ResponseTemplate::new(207).set_body_string("{\"outlets\": 8}"))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server)
            .outlet_names(&CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn unauthorized_is_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(NAMES_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server)
            .outlet_names(&CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            Error::Protocol(ProtocolError::UnexpectedStatus { status, body, .. }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "Unauthorized");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_state_addresses_zero_based_index() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/restapi/relay/outlets/0/state/"))
            .and(header("Accept", "application/json"))
            .and(basic_auth("admin", "1234"))
            .respond_with(ResponseTemplate::new(200).set_body_string("true"))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/restapi/relay/outlets/4/state/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("false"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client(&mock_server);
        let cancel = CancellationToken::new();

        assert!(client.outlet_state(outlet(1), &cancel).await.unwrap());
        assert!(!client.outlet_state(outlet(5), &cancel).await.unwrap());
    }

    #[tokio::test]
    async fn get_state_rejects_non_boolean_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/restapi/relay/outlets/0/state/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("\"on\""))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server)
            .outlet_state(outlet(1), &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[tokio::test]
    async fn set_state_sends_form_body_and_csrf_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/restapi/relay/outlets/4/state/"))
            .and(header("X-CSRF", "x"))
            .and(header("Content-Type", "application/x-www-form-urlencoded"))
            .and(basic_auth("admin", "1234"))
            .and(body_string("value=true"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/restapi/relay/outlets/4/state/"))
            .and(body_string("value=false"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client(&mock_server);
        let cancel = CancellationToken::new();

        client.set_outlet_state(outlet(5), true, &cancel).await.unwrap();
        client.set_outlet_state(outlet(5), false, &cancel).await.unwrap();
    }

    #[tokio::test]
    async fn set_state_requires_no_content() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/restapi/relay/outlets/0/state/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server)
            .set_outlet_state(outlet(1), true, &CancellationToken::new())
            .await;

        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::UnexpectedStatus {
                status: 200,
                expected: 204,
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn cycle_posts_to_cycle_path() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/restapi/relay/outlets/2/cycle/"))
            .and(header("X-CSRF", "x"))
            .and(basic_auth("admin", "1234"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        client(&mock_server)
            .trigger_action(outlet(3), OutletAction::Cycle, &CancellationToken::new())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn trigger_on_and_off_write_state() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/restapi/relay/outlets/1/state/"))
            .and(body_string("value=true"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/restapi/relay/outlets/1/state/"))
            .and(body_string("value=false"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client(&mock_server);
        let cancel = CancellationToken::new();

        client
            .trigger_action(outlet(2), OutletAction::On, &cancel)
            .await
            .unwrap();
        client
            .trigger_action(outlet(2), OutletAction::Off, &cancel)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn server_address_with_scheme() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/restapi/relay/outlets/0/state/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("true"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = PduConfig::new(format!("{}/", mock_server.uri()), "admin", "1234")
            .into_client()
            .unwrap();

        assert!(
            client
                .outlet_state(outlet(1), &CancellationToken::new())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn connection_refused_is_error() {
        let client = PduConfig::new("127.0.0.1:59999", "admin", "1234")
            .with_timeout(Duration::from_secs(2))
            .into_client()
            .unwrap();

        let result = client.outlet_names(&CancellationToken::new()).await;

        assert!(matches!(result, Err(Error::Protocol(ProtocolError::Http(_)))));
    }

    #[tokio::test]
    async fn cancelled_request_reports_cancellation() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/restapi/relay/outlets/0/state/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("true")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let client = client(&mock_server);
        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            canceller.cancel();
        });

        let err = client.outlet_state(outlet(1), &cancel).await.unwrap_err();
        assert!(err.is_cancelled());
    }
}

// ============================================================================
// PduHub Tests
// ============================================================================

mod hub {
    use super::*;

    #[tokio::test]
    async fn connect_numbers_outlets_in_device_order() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(NAMES_PATH))
            .respond_with(
                ResponseTemplate::new(207).set_body_json(serde_json::json!(["A", "B", "C"])),
            )
            .mount(&mock_server)
            .await;

        let hub = PduHub::http(config(&mock_server)).unwrap();
        assert!(hub.connect(&CancellationToken::new()).await);
        assert!(hub.is_connected());

        let outlets: Vec<_> = hub
            .outlets()
            .iter()
            .map(|o| (o.name().to_string(), o.number().value()))
            .collect();
        assert_eq!(
            outlets,
            vec![
                ("A".to_string(), 1),
                ("B".to_string(), 2),
                ("C".to_string(), 3)
            ]
        );
        assert_eq!(hub.outlet(2).unwrap().name(), "B");
    }

    #[tokio::test]
    async fn empty_discovery_is_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(NAMES_PATH))
            .respond_with(ResponseTemplate::new(207).set_body_string("[]"))
            .mount(&mock_server)
            .await;

        let hub = PduHub::http(config(&mock_server)).unwrap();
        assert!(hub.connect(&CancellationToken::new()).await);
        assert!(hub.is_connected());
        assert_eq!(hub.outlet_count(), 0);
    }

    #[tokio::test]
    async fn failed_discovery_leaves_clean_state() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(NAMES_PATH))
            .respond_with(ResponseTemplate::new(207).set_body_json(serde_json::json!(["A", "B"])))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path(NAMES_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let hub = PduHub::http(config(&mock_server)).unwrap();
        let cancel = CancellationToken::new();

        assert!(hub.connect(&cancel).await);
        assert_eq!(hub.outlet_count(), 2);

        assert!(!hub.connect(&cancel).await);
        assert!(!hub.is_connected());
        assert!(hub.outlets().is_empty());
    }

    #[tokio::test]
    async fn reconnect_replaces_outlets() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(NAMES_PATH))
            .respond_with(ResponseTemplate::new(207).set_body_json(serde_json::json!(["A", "B"])))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path(NAMES_PATH))
            .respond_with(ResponseTemplate::new(207).set_body_json(serde_json::json!(["Z"])))
            .mount(&mock_server)
            .await;

        let hub = PduHub::http(config(&mock_server)).unwrap();
        let cancel = CancellationToken::new();

        assert!(hub.connect(&cancel).await);
        assert!(hub.connect(&cancel).await);

        let outlets = hub.outlets();
        assert_eq!(outlets.len(), 1);
        assert_eq!(outlets[0].name(), "Z");
        assert_eq!(outlets[0].number().value(), 1);
    }

    #[tokio::test]
    async fn disconnect_clears_outlets() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(NAMES_PATH))
            .respond_with(ResponseTemplate::new(207).set_body_json(serde_json::json!(["A"])))
            .mount(&mock_server)
            .await;

        let hub = PduHub::http(config(&mock_server)).unwrap();
        assert!(hub.connect(&CancellationToken::new()).await);

        hub.disconnect();
        assert_eq!(hub.outlet_count(), 0);
        assert!(hub.outlet(1).is_none());
    }
}

// ============================================================================
// Outlet Tests
// ============================================================================

mod outlet {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn connected_hub(mock_server: &MockServer) -> PduHub<HttpClient> {
        Mock::given(method("GET"))
            .and(path(NAMES_PATH))
            .respond_with(
                ResponseTemplate::new(207).set_body_json(serde_json::json!(["Mount", "Camera"])),
            )
            .mount(mock_server)
            .await;

        let hub = PduHub::http(config(mock_server)).unwrap();
        assert!(hub.connect(&CancellationToken::new()).await);
        hub
    }

    #[tokio::test]
    async fn poll_updates_value_and_notifies() {
        let mock_server = MockServer::start().await;
        let hub = connected_hub(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/restapi/relay/outlets/1/state/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("true"))
            .mount(&mock_server)
            .await;

        let camera = hub.outlet(2).unwrap();
        let notified = Arc::new(AtomicUsize::new(0));
        let n = Arc::clone(&notified);
        camera.on_value_changed(move |_, _| {
            n.fetch_add(1, Ordering::SeqCst);
        });

        assert!(camera.poll(&CancellationToken::new()).await);
        assert!(camera.value().is_on());
        assert!(camera.last_polled().is_some());
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_poll_keeps_value() {
        let mock_server = MockServer::start().await;
        let hub = connected_hub(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/restapi/relay/outlets/0/state/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let mount = hub.outlet(1).unwrap();
        assert!(!mount.poll(&CancellationToken::new()).await);
        assert!(!mount.value().is_on());
        assert!(mount.last_polled().is_none());
    }

    #[tokio::test]
    async fn set_value_writes_target() {
        let mock_server = MockServer::start().await;
        let hub = connected_hub(&mock_server).await;

        Mock::given(method("PUT"))
            .and(path("/restapi/relay/outlets/0/state/"))
            .and(body_string("value=true"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mount = hub.outlet(1).unwrap();
        mount.set_target_value(5.0);
        assert!((mount.target_value().value() - 1.0).abs() < f64::EPSILON);
        assert!(mount.set_value(&CancellationToken::new()).await);
    }

    #[tokio::test]
    async fn failed_set_value_keeps_target() {
        let mock_server = MockServer::start().await;
        let hub = connected_hub(&mock_server).await;

        Mock::given(method("PUT"))
            .and(path("/restapi/relay/outlets/1/state/"))
            .and(body_string("value=false"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let camera = hub.outlet(2).unwrap();
        camera.set_target_value(0.4);
        assert!(!camera.set_value(&CancellationToken::new()).await);
        assert!((camera.target_value().value() - 0.4).abs() < f64::EPSILON);
    }
}
