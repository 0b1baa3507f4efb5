//! Black-box tests for the service layer over the in-memory store.
//!
//! These drive the same surface a transport would: login, authenticate,
//! then gated entity operations.

use chrono::{Duration, Utc};

use logipilot_auth::account::{AccountDraft, AccountPatch};
use logipilot_auth::{Account, Role, TokenService};
use logipilot_core::{AccountId, ClientId, Settings, ShipmentId};
use logipilot_infra::{
    AccountStore, AlertFilter, CascadeSummary, ClientFilter, InMemoryStore, Page, ShipmentFilter,
};
use logipilot_logistics::{
    AlertDraft, AlertPatch, AlertSeverity, ClientDraft, ClientPatch, ClientStatus, ShipmentDraft,
    ShipmentPatch, ShipmentStatus,
};
use logipilot_service::{ErrorKind, Services};

fn settings() -> Settings {
    Settings {
        secret_key: "test-secret".to_string(),
        ..Default::default()
    }
}

async fn setup() -> (Services<InMemoryStore>, Settings, Account) {
    let settings = settings();
    let services = Services::new(InMemoryStore::new(), &settings);
    let admin = services
        .seed_admin(&settings)
        .await
        .unwrap()
        .expect("fresh store must seed an admin");
    (services, settings, admin)
}

async fn create_account(
    services: &Services<InMemoryStore>,
    admin: &Account,
    email: &str,
    password: &str,
    role: Role,
) -> Account {
    services
        .create_account(
            admin,
            AccountDraft {
                email: email.to_string(),
                password: password.to_string(),
                role,
                active: true,
            },
        )
        .await
        .unwrap()
}

fn client_draft(email: &str) -> ClientDraft {
    ClientDraft {
        name: "Acme Freight".to_string(),
        email: email.to_string(),
        phone: Some("+31 10 555 0100".to_string()),
        status: ClientStatus::Active,
    }
}

fn shipment_draft(client_id: ClientId) -> ShipmentDraft {
    ShipmentDraft {
        client_id,
        origin: "Rotterdam".to_string(),
        destination: "Hamburg".to_string(),
        status: ShipmentStatus::Pending,
    }
}

fn alert_draft(shipment_id: ShipmentId) -> AlertDraft {
    AlertDraft {
        shipment_id,
        message: "Customs hold at border".to_string(),
        severity: AlertSeverity::High,
    }
}

#[tokio::test]
async fn bootstrap_seeds_the_admin_exactly_once() {
    let (services, settings, admin) = setup().await;

    assert_eq!(admin.email, "admin@logipilot.com");
    assert_eq!(admin.role, Role::Admin);
    assert!(admin.active);

    // Second run is a no-op.
    assert!(services.seed_admin(&settings).await.unwrap().is_none());
    let accounts = services.list_accounts(&admin, Page::default()).await.unwrap();
    assert_eq!(accounts.len(), 1);
}

#[tokio::test]
async fn admin_can_login_with_bootstrap_credentials() {
    let (services, _, admin) = setup().await;

    let session = services.login("admin@logipilot.com", "admin123").await.unwrap();
    assert_eq!(session.account.id, admin.id);
    assert!(!session.token.is_empty());
}

#[tokio::test]
async fn unknown_email_and_wrong_password_fail_identically() {
    let (services, _, _) = setup().await;

    let unknown = services
        .login("nobody@logipilot.com", "admin123")
        .await
        .unwrap_err();
    let wrong = services
        .login("admin@logipilot.com", "wrong-password")
        .await
        .unwrap_err();

    assert_eq!(unknown.kind(), ErrorKind::InvalidCredentials);
    assert_eq!(wrong.kind(), ErrorKind::InvalidCredentials);
    // Uniform presentation: a caller probing for accounts learns nothing
    // from the message either.
    assert_eq!(format!("{unknown}"), format!("{wrong}"));
}

#[tokio::test]
async fn login_email_is_case_insensitive() {
    let (services, _, _) = setup().await;

    let session = services.login("Admin@LogiPilot.COM", "admin123").await.unwrap();
    assert_eq!(session.account.email, "admin@logipilot.com");
}

#[tokio::test]
async fn issued_token_embeds_the_role_current_at_issuance() {
    let (services, settings, admin) = setup().await;
    create_account(&services, &admin, "a@x.com", "secret123", Role::Manager).await;

    let session = services.login("a@x.com", "secret123").await.unwrap();

    let tokens = TokenService::new(&settings);
    let claims = tokens.validate(&session.token, Utc::now()).unwrap();
    assert_eq!(claims.sub, session.account.id);
    assert_eq!(claims.role, Role::Manager);
}

#[tokio::test]
async fn role_change_wins_over_a_still_valid_token() {
    let (services, _, admin) = setup().await;
    let account = create_account(&services, &admin, "a@x.com", "secret123", Role::Manager).await;

    let session = services.login("a@x.com", "secret123").await.unwrap();

    // A manager may create clients.
    services
        .create_client(&session.account, client_draft("ops@acme.example"))
        .await
        .unwrap();

    // Five minutes later the directory says Driver; the unexpired token's
    // embedded Manager claim no longer matters.
    services
        .update_account(
            &admin,
            account.id,
            AccountPatch {
                role: Some(Role::Driver),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let resolved = services.authenticate(&session.token).await.unwrap();
    assert_eq!(resolved.role, Role::Driver);

    let err = services
        .create_client(&resolved, client_draft("second@acme.example"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn deactivation_invalidates_an_unexpired_token() {
    let (services, _, admin) = setup().await;
    let account = create_account(&services, &admin, "a@x.com", "secret123", Role::Manager).await;

    let session = services.login("a@x.com", "secret123").await.unwrap();
    assert!(services.authenticate(&session.token).await.is_ok());

    services
        .update_account(
            &admin,
            account.id,
            AccountPatch {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = services.authenticate(&session.token).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InactiveAccount);

    // And a fresh login is refused too.
    let err = services.login("a@x.com", "secret123").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InactiveAccount);
}

#[tokio::test]
async fn tampered_or_garbage_tokens_read_as_invalid_credentials() {
    let (services, _, _) = setup().await;

    let session = services.login("admin@logipilot.com", "admin123").await.unwrap();
    let mut tampered = session.token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let err = services.authenticate(&tampered).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCredentials);

    let err = services.authenticate("not-a-token").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCredentials);
}

#[tokio::test]
async fn forbidden_reports_the_actual_role_and_the_requirement() {
    let (services, _, admin) = setup().await;
    let driver = create_account(&services, &admin, "d@x.com", "secret123", Role::Driver).await;

    let err = services
        .create_client(&driver, client_draft("ops@acme.example"))
        .await
        .unwrap_err();

    match err {
        logipilot_service::ServiceError::Forbidden(f) => {
            assert_eq!(f.role, Role::Driver);
            assert_eq!(f.required, vec![Role::Admin, Role::Manager]);
        }
        other => panic!("expected Forbidden, got {other:?}"),
    }
}

#[tokio::test]
async fn every_role_can_read_but_only_privileged_roles_write() {
    let (services, _, admin) = setup().await;
    let client = services
        .create_client(&admin, client_draft("ops@acme.example"))
        .await
        .unwrap();

    for (email, role) in [
        ("m@x.com", Role::Manager),
        ("c@x.com", Role::Client),
        ("d@x.com", Role::Driver),
    ] {
        let account = create_account(&services, &admin, email, "secret123", role).await;

        // Reads are open to any active account.
        assert!(services.client_by_id(&account, client.id).await.is_ok());
        assert!(
            services
                .list_shipments(&account, ShipmentFilter::default(), Page::default())
                .await
                .is_ok()
        );

        // Deletes are admin-only, account administration likewise.
        let err = services.delete_client(&account, client.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = services
            .list_accounts(&account, Page::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }
}

#[tokio::test]
async fn account_emails_are_normalized_and_unique() {
    let (services, _, admin) = setup().await;
    let created =
        create_account(&services, &admin, "  Mixed@Case.COM ", "secret123", Role::Client).await;
    assert_eq!(created.email, "mixed@case.com");

    let err = services
        .create_account(
            &admin,
            AccountDraft {
                email: "mixed@case.com".to_string(),
                password: "secret123".to_string(),
                role: Role::Client,
                active: true,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateKey);

    // Updating a different account onto the taken email collides too.
    let other = create_account(&services, &admin, "other@case.com", "secret123", Role::Client).await;
    let err = services
        .update_account(
            &admin,
            other.id,
            AccountPatch {
                email: Some("mixed@case.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateKey);
}

#[tokio::test]
async fn password_change_takes_effect_on_next_login() {
    let (services, _, admin) = setup().await;
    let account = create_account(&services, &admin, "a@x.com", "secret123", Role::Client).await;

    services
        .update_account(
            &admin,
            account.id,
            AccountPatch {
                password: Some("rotated-secret".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(
        services.login("a@x.com", "secret123").await.unwrap_err().kind(),
        ErrorKind::InvalidCredentials
    );
    assert!(services.login("a@x.com", "rotated-secret").await.is_ok());
}

#[tokio::test]
async fn admins_cannot_delete_their_own_account() {
    let (services, _, admin) = setup().await;

    let err = services.delete_account(&admin, admin.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SelfDeleteForbidden);

    // The account is still present and unchanged.
    let still_there = services.account_by_id(&admin, admin.id).await.unwrap();
    assert_eq!(still_there, admin);

    // Deleting a different account works.
    let other = create_account(&services, &admin, "bye@x.com", "secret123", Role::Client).await;
    services.delete_account(&admin, other.id).await.unwrap();
    let err = services.account_by_id(&admin, other.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn shipment_creation_requires_an_existing_client() {
    let (services, _, admin) = setup().await;

    let err = services
        .create_shipment(&admin, shipment_draft(ClientId::new(404)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParentNotFound);
    // The failure names the missing parent; that much is safe to surface.
    assert_eq!(format!("{err}"), "client 404 not found");

    let listed = services
        .list_shipments(&admin, ShipmentFilter::default(), Page::default())
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn shipment_reassignment_to_a_missing_client_changes_nothing() {
    let (services, _, admin) = setup().await;
    let client = services
        .create_client(&admin, client_draft("ops@acme.example"))
        .await
        .unwrap();
    let shipment = services
        .create_shipment(&admin, shipment_draft(client.id))
        .await
        .unwrap();

    let err = services
        .update_shipment(
            &admin,
            shipment.id,
            ShipmentPatch {
                client_id: Some(ClientId::new(404)),
                status: Some(ShipmentStatus::Delivered),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParentNotFound);

    let unchanged = services.shipment_by_id(&admin, shipment.id).await.unwrap();
    assert_eq!(unchanged, shipment);

    // A valid reassignment goes through.
    let second = services
        .create_client(&admin, client_draft("second@acme.example"))
        .await
        .unwrap();
    let moved = services
        .update_shipment(
            &admin,
            shipment.id,
            ShipmentPatch {
                client_id: Some(second.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.client_id, second.id);
}

#[tokio::test]
async fn deleting_a_client_cascades_to_shipments_and_alerts() {
    let (services, _, admin) = setup().await;
    let client = services
        .create_client(&admin, client_draft("ops@acme.example"))
        .await
        .unwrap();
    let first = services
        .create_shipment(&admin, shipment_draft(client.id))
        .await
        .unwrap();
    services
        .create_shipment(&admin, shipment_draft(client.id))
        .await
        .unwrap();
    services.create_alert(&admin, alert_draft(first.id)).await.unwrap();

    let summary = services.delete_client(&admin, client.id).await.unwrap();
    assert_eq!(
        summary,
        CascadeSummary {
            shipments: 2,
            alerts: 1
        }
    );

    // No orphans remain observable.
    assert!(
        services
            .list_shipments(&admin, ShipmentFilter::default(), Page::default())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        services
            .list_alerts(&admin, AlertFilter::default(), Page::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn deleting_a_shipment_removes_only_its_alerts() {
    let (services, _, admin) = setup().await;
    let client = services
        .create_client(&admin, client_draft("ops@acme.example"))
        .await
        .unwrap();
    let doomed = services
        .create_shipment(&admin, shipment_draft(client.id))
        .await
        .unwrap();
    let kept = services
        .create_shipment(&admin, shipment_draft(client.id))
        .await
        .unwrap();
    services.create_alert(&admin, alert_draft(doomed.id)).await.unwrap();
    let surviving = services.create_alert(&admin, alert_draft(kept.id)).await.unwrap();

    let removed_alerts = services.delete_shipment(&admin, doomed.id).await.unwrap();
    assert_eq!(removed_alerts, 1);
    assert!(services.alert_by_id(&admin, surviving.id).await.is_ok());
}

#[tokio::test]
async fn deleting_missing_ids_is_not_found_not_a_silent_success() {
    let (services, _, admin) = setup().await;

    assert_eq!(
        services
            .delete_client(&admin, ClientId::new(404))
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        services
            .delete_shipment(&admin, ShipmentId::new(404))
            .await
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );

    // Deleting a shipment with zero alerts is a success with a zero count,
    // distinct from the missing-id case.
    let client = services
        .create_client(&admin, client_draft("ops@acme.example"))
        .await
        .unwrap();
    let shipment = services
        .create_shipment(&admin, shipment_draft(client.id))
        .await
        .unwrap();
    assert_eq!(services.delete_shipment(&admin, shipment.id).await.unwrap(), 0);
}

#[tokio::test]
async fn alert_shipment_reference_is_immutable_but_fields_update() {
    let (services, _, admin) = setup().await;
    let client = services
        .create_client(&admin, client_draft("ops@acme.example"))
        .await
        .unwrap();
    let shipment = services
        .create_shipment(&admin, shipment_draft(client.id))
        .await
        .unwrap();
    let other = services
        .create_shipment(&admin, shipment_draft(client.id))
        .await
        .unwrap();
    let alert = services.create_alert(&admin, alert_draft(shipment.id)).await.unwrap();

    // Reassignment is rejected regardless of how valid the rest looks.
    let err = services
        .update_alert(
            &admin,
            alert.id,
            AlertPatch {
                shipment_id: Some(other.id),
                message: Some("still a valid message".to_string()),
                severity: Some(AlertSeverity::Low),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invalid);

    let unchanged = services.alert_by_id(&admin, alert.id).await.unwrap();
    assert_eq!(unchanged.shipment_id, shipment.id);
    assert_eq!(unchanged.severity, AlertSeverity::High);

    // Message/severity alone go through.
    let updated = services
        .update_alert(
            &admin,
            alert.id,
            AlertPatch {
                shipment_id: None,
                message: Some("rerouted via Antwerp".to_string()),
                severity: Some(AlertSeverity::Low),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.shipment_id, shipment.id);
    assert_eq!(updated.message, "rerouted via Antwerp");
    assert_eq!(updated.severity, AlertSeverity::Low);
}

#[tokio::test]
async fn duplicate_client_emails_are_rejected() {
    let (services, _, admin) = setup().await;
    services
        .create_client(&admin, client_draft("ops@acme.example"))
        .await
        .unwrap();
    let second = services
        .create_client(&admin, client_draft("other@acme.example"))
        .await
        .unwrap();

    let err = services
        .create_client(&admin, client_draft("ops@acme.example"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateKey);

    let err = services
        .update_client(
            &admin,
            second.id,
            ClientPatch {
                email: Some("ops@acme.example".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateKey);
}

#[tokio::test]
async fn listing_supports_filters_and_paging() {
    let (services, _, admin) = setup().await;

    let prospect = services
        .create_client(
            &admin,
            ClientDraft {
                name: "Alpha Cargo".to_string(),
                email: "alpha@x.example".to_string(),
                phone: None,
                status: ClientStatus::Prospect,
            },
        )
        .await
        .unwrap();
    let active = services
        .create_client(
            &admin,
            ClientDraft {
                name: "Zebra Logistics".to_string(),
                email: "zebra@x.example".to_string(),
                phone: None,
                status: ClientStatus::Active,
            },
        )
        .await
        .unwrap();

    let only_active = services
        .list_clients(
            &admin,
            ClientFilter {
                status: Some(ClientStatus::Active),
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(only_active.len(), 1);
    assert_eq!(only_active[0].id, active.id);

    for target in [prospect.id, active.id] {
        services
            .create_shipment(&admin, shipment_draft(target))
            .await
            .unwrap();
    }
    let for_one_client = services
        .list_shipments(
            &admin,
            ShipmentFilter {
                client_id: Some(active.id),
                ..Default::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(for_one_client.len(), 1);

    let page = services
        .list_clients(&admin, ClientFilter::default(), Page { offset: 1, limit: 1 })
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].name, "Zebra Logistics");
}

#[tokio::test]
async fn validation_failures_do_not_reach_the_store() {
    let (services, _, admin) = setup().await;

    // Short password.
    let err = services
        .create_account(
            &admin,
            AccountDraft {
                email: "ok@x.com".to_string(),
                password: "short".to_string(),
                role: Role::Client,
                active: true,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invalid);
    assert!(
        services
            .store()
            .account_by_email("ok@x.com")
            .await
            .unwrap()
            .is_none()
    );

    // Alert message below the minimum length.
    let client = services
        .create_client(&admin, client_draft("ops@acme.example"))
        .await
        .unwrap();
    let shipment = services
        .create_shipment(&admin, shipment_draft(client.id))
        .await
        .unwrap();
    let err = services
        .create_alert(
            &admin,
            AlertDraft {
                shipment_id: shipment.id,
                message: "hm".to_string(),
                severity: AlertSeverity::Low,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invalid);
}

#[tokio::test]
async fn account_ids_are_surrogate_integers_starting_at_one() {
    let (services, _, admin) = setup().await;
    assert_eq!(admin.id, AccountId::new(1));

    let next = create_account(&services, &admin, "two@x.com", "secret123", Role::Client).await;
    assert_eq!(next.id, AccountId::new(2));
}

#[tokio::test]
async fn a_token_is_only_as_good_as_its_secret() {
    let (services, _, _) = setup().await;
    let session = services.login("admin@logipilot.com", "admin123").await.unwrap();

    // A service configured with a rotated secret rejects the old token.
    let rotated = Settings {
        secret_key: "rotated-secret".to_string(),
        ..Default::default()
    };
    let other = TokenService::new(&rotated);
    assert!(other.validate(&session.token, Utc::now()).is_err());

    // Sanity: the original secret still accepts it until expiry.
    let original = TokenService::new(&settings());
    let claims = original.validate(&session.token, Utc::now()).unwrap();
    assert!(claims.expires_at - claims.issued_at == Duration::minutes(30));
}
