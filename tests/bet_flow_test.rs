use euromil_bet::adapters::credibank::ISSUE_CREDENTIAL_METHOD;
use euromil_bet::adapters::euromil_register::VOTE_METHOD;
use euromil_bet::utils::error::ErrorSeverity;
use euromil_bet::{
    build_orchestrator, BetError, BetOutcome, BetRequest, FailureStage, ServiceChannels,
    TomlConfig,
};
use httpmock::prelude::*;
use serde_json::json;

fn config_for(server: &MockServer) -> TomlConfig {
    TomlConfig::from_toml_str(&format!(
        "[services]\ngrpc_server = \"{}\"\nrequest_timeout_secs = 5\n",
        server.address()
    ))
    .unwrap()
}

#[tokio::test]
async fn test_bet_is_paid_then_registered() {
    let server = MockServer::start();
    let issue_mock = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/{}", ISSUE_CREDENTIAL_METHOD))
            .json_body(json!({"citizen_card_number": "ACC1"}));
        then.status(200)
            .json_body(json!({"voting_credential": "CRED-XYZ"}));
    });
    let vote_mock = server.mock(|when, then| {
        when.method(POST)
            .path(format!("/{}", VOTE_METHOD))
            .json_body(json!({"voting_credential": "CRED-XYZ", "candidate_id": 1}));
        then.status(200).json_body(json!({
            "success": true,
            "message": "Candidato A registado"
        }));
    });

    let config = config_for(&server);
    let channels = ServiceChannels::open(&config).unwrap();
    let orchestrator = build_orchestrator(&config, &channels).unwrap();

    let outcome = orchestrator
        .place_bet(BetRequest::new("ACC1", vec![1, 2, 3, 4, 5], vec![6, 7]))
        .await;

    issue_mock.assert();
    vote_mock.assert();
    match outcome {
        BetOutcome::Success {
            selection,
            credential,
            detail,
        } => {
            assert_eq!(selection.canonical_key(), "1,2,3,4,5+6,7");
            assert_eq!(credential.as_str(), "CRED-XYZ");
            assert!(detail.contains("Registration number: A"));
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unsorted_selection_is_registered_sorted() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(format!("/{}", ISSUE_CREDENTIAL_METHOD));
        then.status(200)
            .json_body(json!({"voting_credential": "CRED-Q"}));
    });
    let vote_mock = server.mock(|when, then| {
        // key comes from the smallest number: 9 -> ((9 - 1) % 3) + 1 = 3 (typed-first 50 would give 2)
        when.method(POST)
            .path(format!("/{}", VOTE_METHOD))
            .json_body(json!({"voting_credential": "CRED-Q", "candidate_id": 3}));
        then.status(200)
            .json_body(json!({"success": true, "message": "Candidato C registado"}));
    });

    let config = config_for(&server);
    let channels = ServiceChannels::open(&config).unwrap();
    let orchestrator = build_orchestrator(&config, &channels).unwrap();

    let outcome = orchestrator
        .place_bet(BetRequest::new("ACC2", vec![50, 9, 49, 48, 47], vec![12, 11]))
        .await;

    vote_mock.assert();
    assert!(outcome.is_success());
    assert!(outcome.message().contains("Key: 9,47,48,49,50+11,12"));
    assert!(outcome.message().ends_with("Registration number: C"));
}

#[tokio::test]
async fn test_invalid_selection_never_reaches_the_services() {
    let server = MockServer::start();
    let issue_mock = server.mock(|when, then| {
        when.method(POST).path(format!("/{}", ISSUE_CREDENTIAL_METHOD));
        then.status(200)
            .json_body(json!({"voting_credential": "CRED-XYZ"}));
    });
    let vote_mock = server.mock(|when, then| {
        when.method(POST).path(format!("/{}", VOTE_METHOD));
        then.status(200).json_body(json!({"success": true, "message": ""}));
    });

    let config = config_for(&server);
    let channels = ServiceChannels::open(&config).unwrap();
    let orchestrator = build_orchestrator(&config, &channels).unwrap();

    let outcome = orchestrator
        .place_bet(BetRequest::new("ACC1", vec![1, 2, 3, 4], vec![6, 7]))
        .await;

    assert_eq!(outcome.stage(), Some(FailureStage::Validation));
    issue_mock.assert_hits(0);
    vote_mock.assert_hits(0);
}

#[tokio::test]
async fn test_denied_cheque_stops_before_registration() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(format!("/{}", ISSUE_CREDENTIAL_METHOD));
        then.status(200)
            .json_body(json!({"voting_credential": "", "message": "Conta sem saldo"}));
    });
    let vote_mock = server.mock(|when, then| {
        when.method(POST).path(format!("/{}", VOTE_METHOD));
        then.status(200).json_body(json!({"success": true, "message": ""}));
    });

    let config = config_for(&server);
    let channels = ServiceChannels::open(&config).unwrap();
    let orchestrator = build_orchestrator(&config, &channels).unwrap();

    let outcome = orchestrator
        .place_bet(BetRequest::new("ACC-EMPTY", vec![1, 2, 3, 4, 5], vec![6, 7]))
        .await;

    vote_mock.assert_hits(0);
    match outcome {
        BetOutcome::Failure {
            stage,
            error,
            credential,
        } => {
            assert_eq!(stage, FailureStage::CredentialIssuance);
            assert!(matches!(error, BetError::IssuanceDenied { .. }));
            assert!(credential.is_none());
        }
        other => panic!("expected issuance failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_refused_registration_keeps_the_spent_cheque() {
    let server = MockServer::start();
    let issue_mock = server.mock(|when, then| {
        when.method(POST).path(format!("/{}", ISSUE_CREDENTIAL_METHOD));
        then.status(200)
            .json_body(json!({"voting_credential": "CRED-SPENT"}));
    });
    let vote_mock = server.mock(|when, then| {
        when.method(POST).path(format!("/{}", VOTE_METHOD));
        then.status(200)
            .json_body(json!({"success": false, "message": "Credencial ja utilizada"}));
    });

    let config = config_for(&server);
    let channels = ServiceChannels::open(&config).unwrap();
    let orchestrator = build_orchestrator(&config, &channels).unwrap();

    let outcome = orchestrator
        .place_bet(BetRequest::new("ACC1", vec![1, 2, 3, 4, 5], vec![6, 7]))
        .await;

    // one attempt each, no retry and no refund
    issue_mock.assert_hits(1);
    vote_mock.assert_hits(1);
    assert_eq!(outcome.stage(), Some(FailureStage::Registration));
    assert_eq!(
        outcome.message(),
        "Failed to register bet: Credencial ja utilizada"
    );
    assert_eq!(
        outcome.credential().map(|c| c.as_str()),
        Some("CRED-SPENT")
    );
}

#[tokio::test]
async fn test_registration_outage_after_spend_is_critical() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(format!("/{}", ISSUE_CREDENTIAL_METHOD));
        then.status(200)
            .json_body(json!({"voting_credential": "CRED-LOST"}));
    });
    server.mock(|when, then| {
        when.method(POST).path(format!("/{}", VOTE_METHOD));
        then.status(502).body("bad gateway");
    });

    let config = config_for(&server);
    let channels = ServiceChannels::open(&config).unwrap();
    let orchestrator = build_orchestrator(&config, &channels).unwrap();

    match orchestrator
        .place_bet(BetRequest::new("ACC1", vec![1, 2, 3, 4, 5], vec![6, 7]))
        .await
    {
        BetOutcome::Failure {
            stage,
            error,
            credential,
        } => {
            assert_eq!(stage, FailureStage::Registration);
            assert!(matches!(error, BetError::RegistrationUnreachable { .. }));
            assert_eq!(error.severity(), ErrorSeverity::Critical);
            assert!(credential.is_some());
        }
        other => panic!("expected registration failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_closed_channels_fail_at_issuance() {
    let server = MockServer::start();
    let issue_mock = server.mock(|when, then| {
        when.method(POST).path(format!("/{}", ISSUE_CREDENTIAL_METHOD));
        then.status(200)
            .json_body(json!({"voting_credential": "CRED-XYZ"}));
    });

    let config = config_for(&server);
    let channels = ServiceChannels::open(&config).unwrap();
    let orchestrator = build_orchestrator(&config, &channels).unwrap();
    channels.close();

    let outcome = orchestrator
        .place_bet(BetRequest::new("ACC1", vec![1, 2, 3, 4, 5], vec![6, 7]))
        .await;

    issue_mock.assert_hits(0);
    assert_eq!(outcome.stage(), Some(FailureStage::CredentialIssuance));
    assert!(outcome.message().starts_with("Could not contact CrediBank"));
}
