// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP gateway client using wiremock.

use std::time::Duration;

use openmotics_lib::protocol::{GatewayApi, HttpClient};
use openmotics_lib::thing::{Channel, ThingCommand, ThingKind, ThingState};
use openmotics_lib::types::{DimmerLevel, OutputId, PowerState};
use openmotics_lib::{
    Credentials, Error, Gateway, GatewayConfig, GatewayEvent, GatewayStatus, ProtocolError,
};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn login_ok(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "success": true,
        "token": token
    }))
}

fn outputs(entries: &[(u32, u8, u8)]) -> ResponseTemplate {
    let status: Vec<_> = entries
        .iter()
        .map(|&(id, status, dimmer)| {
            serde_json::json!({"id": id, "status": status, "dimmer": dimmer, "ctimer": 0})
        })
        .collect();
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "success": true,
        "status": status
    }))
}

fn unauthorized() -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_string("invalid_token")
}

fn gateway(server: &MockServer) -> Gateway<HttpClient> {
    let client = HttpClient::new(server.uri()).unwrap();
    Gateway::new(client, Credentials::new("admin", "secret"))
}

// ============================================================================
// HttpClient Tests
// ============================================================================

mod http_client {
    use super::*;

    #[tokio::test]
    async fn login_sends_credentials_and_lease() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/login"))
            .and(query_param("username", "admin"))
            .and(query_param("password", "p&ss"))
            .and(query_param("extend", "true"))
            .and(query_param("timeout", "3600"))
            .respond_with(login_ok("T1"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        let response = client.login("admin", "p&ss", true, 3600).await.unwrap();

        assert!(response.success);
        assert_eq!(response.token.as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn requests_carry_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get_output_status"))
            .and(header("Authorization", "Bearer T1"))
            .respond_with(outputs(&[(5, 1, 0)]))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        client.bearer_token().set("T1");
        let records = client.get_output_status().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, OutputId::new(5));
        assert_eq!(records[0].status, 1);
    }

    #[tokio::test]
    async fn unauthorized_maps_to_api_error() {
        let server = MockServer::start().await;

        Mock::given(path("/get_output_status"))
            .respond_with(unauthorized())
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        let err = client.get_output_status().await.unwrap_err();

        assert!(err.is_auth_denied());
        assert!(matches!(
            err,
            ProtocolError::Api { code: 401, ref message } if message == "invalid_token"
        ));
    }

    #[tokio::test]
    async fn set_output_omits_unset_parameters() {
        let server = MockServer::start().await;

        Mock::given(path("/set_output"))
            .and(query_param("id", "4"))
            .and(query_param("is_on", "false"))
            .and(query_param_is_missing("dimmer"))
            .and(query_param_is_missing("timer"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        client
            .set_output(OutputId::new(4), PowerState::Off, None, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejected_command_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(path("/do_group_action"))
            .and(query_param("group_action_id", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "msg": "unknown group action"
            })))
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        let err = client.do_group_action(2).await.unwrap_err();

        assert!(matches!(err, ProtocolError::Rejected(ref msg) if msg == "unknown group action"));
    }

    #[tokio::test]
    async fn invalid_json_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(path("/get_output_status"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        let err = client.get_output_status().await.unwrap_err();

        assert!(matches!(err, ProtocolError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn connection_refused_is_transport_failure() {
        let client = HttpClient::new("http://127.0.0.1:1").unwrap();
        let err = client.get_output_status().await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(err.status_code(), None);
    }
}

// ============================================================================
// Gateway Tests
// ============================================================================

mod gateway {
    use super::*;

    #[tokio::test]
    async fn login_then_poll_publishes_output() {
        let server = MockServer::start().await;

        Mock::given(path("/login"))
            .respond_with(login_ok("T1"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(path("/get_output_status"))
            .and(header("Authorization", "Bearer T1"))
            .respond_with(outputs(&[(5, 1, 0)]))
            .mount(&server)
            .await;

        let addr = server.address();
        let config = GatewayConfig::new(addr.ip().to_string(), "admin", "secret")
            .with_plain_http()
            .with_port(addr.port());
        let gateway = Gateway::from_config(&config).unwrap();

        gateway.initialize().await.unwrap();
        gateway.refresh().await.unwrap();

        assert!(gateway.store().contains(OutputId::new(5)));
        assert_eq!(gateway.store().status_of(OutputId::new(5)), Some(1));
        gateway.dispose().await;
    }

    #[tokio::test]
    async fn unauthorized_poll_relogs_and_retries_once() {
        let server = MockServer::start().await;

        Mock::given(path("/login"))
            .respond_with(login_ok("T1"))
            .up_to_n_times(1)
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(path("/login"))
            .respond_with(login_ok("T2"))
            .with_priority(2)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(path("/get_output_status"))
            .and(header("Authorization", "Bearer T1"))
            .respond_with(unauthorized())
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(path("/get_output_status"))
            .and(header("Authorization", "Bearer T2"))
            .respond_with(outputs(&[(5, 1, 0)]))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway(&server);
        gateway.initialize().await.unwrap();
        let changes = gateway.refresh().await.unwrap();

        assert!(changes.contains(OutputId::new(5)));
        assert!(gateway.status().is_online());
        gateway.dispose().await;
    }

    #[tokio::test]
    async fn repeated_unauthorized_goes_offline_without_third_call() {
        let server = MockServer::start().await;

        Mock::given(path("/login"))
            .respond_with(login_ok("T1"))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(path("/get_output_status"))
            .respond_with(unauthorized())
            .expect(2)
            .mount(&server)
            .await;

        let gateway = gateway(&server);
        gateway.initialize().await.unwrap();
        let changes = gateway.refresh().await.unwrap();

        assert!(changes.is_empty());
        assert_eq!(
            gateway.status(),
            GatewayStatus::communication_error("Authentication failed after retry")
        );
        assert!(matches!(gateway.refresh().await, Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn rejected_login_fails_initialize() {
        let server = MockServer::start().await;

        Mock::given(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "msg": "invalid_credentials"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway(&server);
        let result = gateway.initialize().await;

        assert!(matches!(result, Err(Error::AuthenticationFailed)));
        assert!(gateway.status().is_offline());
    }

    #[tokio::test]
    async fn server_error_keeps_previous_state() {
        let server = MockServer::start().await;

        Mock::given(path("/login"))
            .respond_with(login_ok("T1"))
            .mount(&server)
            .await;
        Mock::given(path("/get_output_status"))
            .respond_with(outputs(&[(3, 1, 0)]))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(path("/get_output_status"))
            .respond_with(ResponseTemplate::new(500))
            .with_priority(2)
            .mount(&server)
            .await;

        let gateway = gateway(&server);
        gateway.initialize().await.unwrap();
        gateway.refresh().await.unwrap();
        let changes = gateway.refresh().await.unwrap();

        assert!(changes.is_empty());
        assert_eq!(gateway.store().status_of(OutputId::new(3)), Some(1));
        assert_eq!(gateway.store().failed_cycles(), 1);
        assert!(gateway.status().is_online());
        gateway.dispose().await;
    }

    #[tokio::test]
    async fn background_poll_reports_only_changed_output() {
        let server = MockServer::start().await;

        Mock::given(path("/login"))
            .respond_with(login_ok("T1"))
            .mount(&server)
            .await;
        Mock::given(path("/get_output_status"))
            .respond_with(outputs(&[(3, 0, 0), (4, 1, 0)]))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(path("/get_output_status"))
            .respond_with(outputs(&[(3, 1, 0), (4, 1, 0)]))
            .with_priority(2)
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        let gateway = Gateway::builder(client, Credentials::new("admin", "secret"))
            .with_poll_interval(Duration::from_millis(100))
            .build();
        let lamp = gateway.attach_thing(3, ThingKind::Output);
        let mut events = gateway.subscribe();
        gateway.initialize().await.unwrap();

        let mut change_sets = Vec::new();
        while change_sets.len() < 2 {
            let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
                .await
                .expect("poll cycle did not run")
                .unwrap();
            if let GatewayEvent::OutputsChanged(changes) = event {
                change_sets.push(changes.iter().map(|id| id.value()).collect::<Vec<_>>());
            }
        }

        assert_eq!(change_sets, vec![vec![3, 4], vec![3]]);
        assert_eq!(lamp.state().relay, Some(PowerState::On));
        gateway.dispose().await;
    }

    #[tokio::test]
    async fn dimming_updates_thing_optimistically() {
        let server = MockServer::start().await;

        Mock::given(path("/login"))
            .respond_with(login_ok("T1"))
            .mount(&server)
            .await;
        Mock::given(path("/set_output"))
            .and(header("Authorization", "Bearer T1"))
            .and(query_param("id", "7"))
            .and(query_param("is_on", "true"))
            .and(query_param("dimmer", "50"))
            .and(query_param_is_missing("timer"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway(&server);
        gateway.initialize().await.unwrap();
        let lamp = gateway.attach_thing(7, ThingKind::Dimmer);

        lamp.handle_command(
            Channel::Dimmer,
            ThingCommand::Percent(DimmerLevel::new(50).unwrap()),
        )
        .await
        .unwrap();

        assert_eq!(
            lamp.state(),
            ThingState {
                relay: Some(PowerState::On),
                dimmer: Some(DimmerLevel::new(50).unwrap()),
            }
        );
        gateway.dispose().await;
    }

    #[tokio::test]
    async fn rejected_command_is_returned() {
        let server = MockServer::start().await;

        Mock::given(path("/login"))
            .respond_with(login_ok("T1"))
            .mount(&server)
            .await;
        Mock::given(path("/set_output"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "msg": "invalid output id"
            })))
            .mount(&server)
            .await;

        let gateway = gateway(&server);
        gateway.initialize().await.unwrap();
        let relay = gateway.attach_thing(99, ThingKind::Output);

        let result = relay
            .handle_command(Channel::Relay, ThingCommand::OnOff(PowerState::On))
            .await;

        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::Rejected(_)))
        ));
        assert_eq!(relay.state(), ThingState::default());
        assert!(gateway.status().is_online());
        gateway.dispose().await;
    }
}
