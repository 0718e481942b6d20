mod common;

use food_delivery_api::{
    dto::users::{BlockUserRequest, UserListQuery},
    error::AppError,
    services::admin_service,
};
use uuid::Uuid;

fn block_request(reason: &str) -> BlockUserRequest {
    BlockUserRequest {
        reason: Some(reason.to_string()),
    }
}

fn query(status: Option<&str>, page: i64, limit: i64) -> UserListQuery {
    UserListQuery {
        status: status.map(str::to_string),
        page: Some(page),
        limit: Some(limit),
    }
}

// Integration flow: stats on an empty table, pagination, block/unblock, toggle.
#[tokio::test]
async fn admin_user_management_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let Some(database_url) = common::database_url() else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run admin flow tests.");
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;

    let empty = admin_service::user_stats(&state).await?.data.unwrap();
    assert_eq!(
        (empty.total, empty.active, empty.blocked, empty.inactive, empty.new_today),
        (0, 0, 0, 0, 0)
    );

    let admin = common::create_user(&state, "Admin", "admin").await?;
    let alice = common::create_user(&state, "Alice", "user").await?;
    let bob = common::create_user(&state, "Bob", "user").await?;

    // Pagination
    let first = admin_service::list_users(&state, query(None, 1, 2)).await?;
    let meta = first.meta.unwrap();
    assert_eq!(meta.total, Some(3));
    assert_eq!(meta.count, Some(2));
    assert_eq!(meta.total_pages, Some(2));
    assert_eq!(meta.current_page, Some(1));

    let second = admin_service::list_users(&state, query(None, 2, 2)).await?;
    assert_eq!(second.data.unwrap().items.len(), 1);
    assert_eq!(second.meta.unwrap().current_page, Some(2));

    let far = admin_service::list_users(&state, query(None, i64::MAX, 100)).await?;
    assert!(far.data.unwrap().items.is_empty());
    assert_eq!(far.meta.unwrap().total, Some(3));

    // Block needs ten characters after trimming
    let err = admin_service::block_user(&state, &admin, alice.user_id, block_request(" 123456789 "))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let blocked = admin_service::block_user(&state, &admin, alice.user_id, block_request(" 1234567890 "))
        .await?
        .data
        .unwrap();
    assert!(blocked.is_blocked);
    assert_eq!(blocked.blocked_reason, "1234567890");

    let err = admin_service::block_user(
        &state,
        &admin,
        alice.user_id,
        block_request("a different reason"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "User is already blocked"));
    let still = admin_service::get_user(&state, alice.user_id).await?.data.unwrap();
    assert_eq!(still.blocked_reason, "1234567890");

    // Status filters
    let blocked_list = admin_service::list_users(&state, query(Some("blocked"), 1, 10)).await?;
    assert_eq!(blocked_list.meta.unwrap().total, Some(1));
    let active_list = admin_service::list_users(&state, query(Some("active"), 1, 10)).await?;
    assert_eq!(active_list.meta.unwrap().total, Some(2));
    let unknown = admin_service::list_users(&state, query(Some("everyone"), 1, 10)).await?;
    assert_eq!(unknown.meta.unwrap().total, Some(3));

    // Toggle twice restores the original state
    let off = admin_service::toggle_user_status(&state, &admin, bob.user_id).await?;
    assert_eq!(off.message, "User deactivated successfully");
    assert!(!off.data.unwrap().is_active);
    let inactive_list = admin_service::list_users(&state, query(Some("inactive"), 1, 10)).await?;
    assert_eq!(inactive_list.meta.unwrap().total, Some(1));
    let on = admin_service::toggle_user_status(&state, &admin, bob.user_id).await?;
    assert_eq!(on.message, "User activated successfully");
    assert!(on.data.unwrap().is_active);

    let stats = admin_service::user_stats(&state).await?.data.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.blocked, 1);
    assert_eq!(stats.active, 2);
    assert_eq!(stats.inactive, 0);
    assert_eq!(stats.new_today, 3);

    // Unblock
    let unblocked = admin_service::unblock_user(&state, &admin, alice.user_id)
        .await?
        .data
        .unwrap();
    assert!(!unblocked.is_blocked);
    assert!(unblocked.blocked_reason.is_empty());
    let err = admin_service::unblock_user(&state, &admin, alice.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "User is not blocked"));

    // Unknown ids
    let missing = Uuid::new_v4();
    assert!(matches!(
        admin_service::get_user(&state, missing).await.unwrap_err(),
        AppError::NotFound(_)
    ));
    assert!(matches!(
        admin_service::toggle_user_status(&state, &admin, missing).await.unwrap_err(),
        AppError::NotFound(_)
    ));

    Ok(())
}
