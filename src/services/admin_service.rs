use chrono::{DateTime, NaiveTime, Utc};
use sea_orm::sea_query::LockType;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::users::{BlockUserRequest, UserList, UserListQuery},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{UserProfile, UserStats, UserStatusFilter, validate_block_reason},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_users(
    state: &AppState,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let filter = query.status.as_deref().and_then(UserStatusFilter::parse);
    let finder = Users::find()
        .filter(status_condition(filter))
        .order_by_desc(UserCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items: Vec<UserProfile> = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(profile_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total, items.len() as i64);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn get_user(state: &AppState, id: Uuid) -> AppResult<ApiResponse<UserProfile>> {
    let user = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(ApiResponse::success("User found", profile_from_entity(user), None))
}

pub async fn block_user(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
    payload: BlockUserRequest,
) -> AppResult<ApiResponse<UserProfile>> {
    let reason = validate_block_reason(payload.reason.as_deref())?;

    let txn = state.orm.begin().await?;
    let user = lock_user(&txn, id).await?;
    if user.is_blocked {
        return Err(AppError::bad_request("User is already blocked"));
    }

    let mut active: UserActive = user.into();
    active.is_blocked = Set(true);
    active.blocked_reason = Set(reason.clone());
    active.updated_at = Set(Utc::now().into());
    let user = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(user_id = %user.id, admin_id = %admin.user_id, "user blocked");
    audit::record(
        state,
        Some(admin.user_id),
        "user_block",
        "users",
        serde_json::json!({ "user_id": user.id, "reason": reason }),
    )
    .await;

    Ok(ApiResponse::success(
        "User blocked successfully",
        profile_from_entity(user),
        None,
    ))
}

pub async fn unblock_user(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<UserProfile>> {
    let txn = state.orm.begin().await?;
    let user = lock_user(&txn, id).await?;
    if !user.is_blocked {
        return Err(AppError::bad_request("User is not blocked"));
    }

    let mut active: UserActive = user.into();
    active.is_blocked = Set(false);
    active.blocked_reason = Set(String::new());
    active.updated_at = Set(Utc::now().into());
    let user = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(user_id = %user.id, admin_id = %admin.user_id, "user unblocked");
    audit::record(
        state,
        Some(admin.user_id),
        "user_unblock",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "User unblocked successfully",
        profile_from_entity(user),
        None,
    ))
}

pub async fn toggle_user_status(
    state: &AppState,
    admin: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<UserProfile>> {
    let txn = state.orm.begin().await?;
    let user = lock_user(&txn, id).await?;

    let is_active = !user.is_active;
    let mut active: UserActive = user.into();
    active.is_active = Set(is_active);
    active.updated_at = Set(Utc::now().into());
    let user = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(user_id = %user.id, is_active, admin_id = %admin.user_id, "user status toggled");
    audit::record(
        state,
        Some(admin.user_id),
        "user_toggle_status",
        "users",
        serde_json::json!({ "user_id": user.id, "is_active": is_active }),
    )
    .await;

    let message = if is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };
    Ok(ApiResponse::success(message, profile_from_entity(user), None))
}

#[derive(Debug, sqlx::FromRow)]
struct UserStatsRow {
    total: i64,
    active: i64,
    blocked: i64,
    inactive: i64,
    new_today: i64,
}

pub async fn user_stats(state: &AppState) -> AppResult<ApiResponse<UserStats>> {
    // One statement so the five counts come from the same snapshot.
    let row = sqlx::query_as::<_, UserStatsRow>(
        r#"
        SELECT COUNT(*) AS total,
               COUNT(*) FILTER (WHERE is_active AND NOT is_blocked) AS active,
               COUNT(*) FILTER (WHERE is_blocked) AS blocked,
               COUNT(*) FILTER (WHERE NOT is_active) AS inactive,
               COUNT(*) FILTER (WHERE created_at >= $1) AS new_today
        FROM users
        "#,
    )
    .bind(start_of_today())
    .fetch_one(state.orm.get_postgres_connection_pool())
    .await?;

    let stats = UserStats {
        total: row.total,
        active: row.active,
        blocked: row.blocked,
        inactive: row.inactive,
        new_today: row.new_today,
    };
    Ok(ApiResponse::success("User statistics", stats, None))
}

/// Midnight UTC of the current day.
pub fn start_of_today() -> DateTime<Utc> {
    Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc()
}

fn status_condition(filter: Option<UserStatusFilter>) -> Condition {
    match filter {
        None => Condition::all(),
        Some(UserStatusFilter::Active) => Condition::all()
            .add(UserCol::IsActive.eq(true))
            .add(UserCol::IsBlocked.eq(false)),
        Some(UserStatusFilter::Blocked) => Condition::all().add(UserCol::IsBlocked.eq(true)),
        Some(UserStatusFilter::Inactive) => Condition::all().add(UserCol::IsActive.eq(false)),
    }
}

async fn lock_user(txn: &DatabaseTransaction, id: Uuid) -> AppResult<UserModel> {
    Users::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(user_not_found)
}

fn user_not_found() -> AppError {
    AppError::not_found("User not found")
}

pub fn profile_from_entity(model: UserModel) -> UserProfile {
    UserProfile {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        role: model.role,
        is_active: model.is_active,
        is_blocked: model.is_blocked,
        blocked_reason: model.blocked_reason,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;
    use sea_orm::{DbBackend, QueryTrait};

    use super::*;

    fn users_sql(filter: Option<UserStatusFilter>) -> String {
        Users::find()
            .filter(status_condition(filter))
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn status_conditions_follow_account_flags() {
        let active = users_sql(Some(UserStatusFilter::Active));
        assert!(active.contains(r#""is_active" = TRUE"#));
        assert!(active.contains(r#""is_blocked" = FALSE"#));

        let blocked = users_sql(Some(UserStatusFilter::Blocked));
        assert!(blocked.contains(r#""is_blocked" = TRUE"#));
        assert!(!blocked.contains(r#""is_active" ="#));

        let inactive = users_sql(Some(UserStatusFilter::Inactive));
        assert!(inactive.contains(r#""is_active" = FALSE"#));
        assert!(!inactive.contains(r#""is_blocked" ="#));

        assert!(!users_sql(None).contains("WHERE"));
    }

    #[test]
    fn start_of_today_is_midnight() {
        let midnight = start_of_today();
        assert_eq!(midnight.hour(), 0);
        assert_eq!(midnight.minute(), 0);
        assert_eq!(midnight.second(), 0);
        assert!(midnight <= Utc::now());
    }

    #[test]
    fn profile_drops_secrets() {
        let now = Utc::now().fixed_offset();
        let model = UserModel {
            id: Uuid::new_v4(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            phone: None,
            password_hash: "hash".into(),
            role: "user".into(),
            is_active: true,
            is_blocked: false,
            blocked_reason: String::new(),
            otp: Some("123456".into()),
            otp_expiry: Some(now),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(profile_from_entity(model)).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("passwordHash"));
        assert!(!object.contains_key("otp"));
        assert!(!object.contains_key("otpExpiry"));
        assert_eq!(object["isActive"], serde_json::json!(true));
    }
}
