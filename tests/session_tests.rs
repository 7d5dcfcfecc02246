use resourceflow::{AccessError, Permission, Session, resolve_viewed_resource};

fn member() -> Session {
    Session::new("u1", Some("r1".to_string()), [Permission::ViewOwnResource])
}

fn admin() -> Session {
    Session::new(
        "admin",
        Some("r9".to_string()),
        [Permission::ViewOwnResource, Permission::ViewAllResources],
    )
}

#[test]
fn defaults_to_own_resource() {
    assert_eq!(resolve_viewed_resource(&member(), None).unwrap(), "r1");
    assert_eq!(resolve_viewed_resource(&member(), Some("r1")).unwrap(), "r1");
}

#[test]
fn member_cannot_switch_resource() {
    let err = resolve_viewed_resource(&member(), Some("r2")).unwrap_err();
    assert!(matches!(err, AccessError::Forbidden { .. }));
}

#[test]
fn admin_can_switch_resource() {
    assert_eq!(resolve_viewed_resource(&admin(), Some("r2")).unwrap(), "r2");
}

#[test]
fn session_without_resource() {
    let session = Session::new("svc", None, [Permission::ViewAllResources]);
    assert!(matches!(
        resolve_viewed_resource(&session, None),
        Err(AccessError::NoLinkedResource { .. })
    ));
    assert_eq!(resolve_viewed_resource(&session, Some("r5")).unwrap(), "r5");
}

#[test]
fn require_reports_missing_permission() {
    assert!(admin().require(Permission::ViewAllResources).is_ok());
    let err = member().require(Permission::ManageAllocations).unwrap_err();
    assert_eq!(
        err.to_string(),
        "user u1 lacks permission manage-allocations"
    );
}

#[test]
fn permissions_parse_from_kebab_or_snake_case() {
    assert_eq!(
        "view_all_resources".parse::<Permission>().unwrap(),
        Permission::ViewAllResources
    );
    assert!("superuser".parse::<Permission>().is_err());
}
