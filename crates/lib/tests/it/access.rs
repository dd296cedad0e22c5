use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use warden::FixedClock;
use warden::auth::{AccessGate, AuthError, RequiredRoles, Role};

use crate::helpers::token_authority;

fn gate() -> (AccessGate, Arc<warden::auth::TokenAuthority>) {
    let authority = Arc::new(token_authority(Arc::new(FixedClock::default())));
    (AccessGate::new(authority.clone()), authority)
}

#[tokio::test]
async fn admin_requirement_rejects_user_and_accepts_admin() {
    let (gate, authority) = gate();
    let admin_gate = gate.requiring(RequiredRoles::admin());

    let user = format!("Bearer {}", authority.issue("u@x.com", Role::User).unwrap());
    assert_eq!(
        admin_gate.authorize(Some(&user)).await,
        Err(AuthError::InsufficientPermissions)
    );

    let admin = format!("Bearer {}", authority.issue("a@x.com", Role::Admin).unwrap());
    let claims = admin_gate.authorize(Some(&admin)).await.unwrap();
    assert_eq!(claims.subject, "a@x.com");
    assert_eq!(claims.role, Role::Admin);
}

#[tokio::test]
async fn any_requirement_admits_every_role() {
    let (gate, authority) = gate();
    for role in Role::ALL {
        let header = format!("Bearer {}", authority.issue("x@x.com", role).unwrap());
        assert_eq!(gate.authorize(Some(&header)).await.unwrap().role, role);
    }
}

#[tokio::test]
async fn header_shape_errors() {
    let (gate, authority) = gate();
    let token = authority.issue("a@x.com", Role::Admin).unwrap();

    assert_eq!(gate.authorize(None).await, Err(AuthError::MissingToken));
    assert!(matches!(
        gate.authorize(Some(&format!("Token {token}"))).await,
        Err(AuthError::MalformedHeader { .. })
    ));
    assert!(matches!(
        gate.authorize(Some("Bearer")).await,
        Err(AuthError::MalformedHeader { .. })
    ));
    assert!(matches!(
        gate.authorize(Some(&format!("Bearer {token} extra"))).await,
        Err(AuthError::MalformedHeader { .. })
    ));
    assert_eq!(
        gate.authorize(Some("Bearer not-a-token")).await,
        Err(AuthError::InvalidSignature)
    );
}

#[tokio::test]
async fn authorize_from_headers() {
    let (gate, authority) = gate();
    let token = authority.issue("a@x.com", Role::User).unwrap();

    let mut headers = HeaderMap::new();
    assert_eq!(
        gate.authorize_headers(&headers).await,
        Err(AuthError::MissingToken)
    );

    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    assert_eq!(
        gate.authorize_headers(&headers).await.unwrap().subject,
        "a@x.com"
    );
}

#[tokio::test]
async fn guarded_operation_only_runs_when_admitted() {
    let (gate, authority) = gate();
    let admin_gate = gate.requiring(RequiredRoles::admin());
    let user = format!("Bearer {}", authority.issue("u@x.com", Role::User).unwrap());

    let mut ran = false;
    let err = admin_gate
        .guard(Some(&user), |_| {
            ran = true;
            async { Ok(()) }
        })
        .await
        .unwrap_err();
    assert!(err.is_permission_denied());
    assert!(!ran);
}
