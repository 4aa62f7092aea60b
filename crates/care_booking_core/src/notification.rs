//! crates/care_booking_core/src/notification.rs
//!
//! The notification inbox of the signed-in user.

use uuid::Uuid;

use crate::domain::{Notification, PaymentRecord, Role};
use crate::error::ServiceResult;
use crate::ports::DatabaseService;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq)]
pub struct Inbox {
    pub unread: usize,
    pub notifications: Vec<Notification>,
}

/// The session user's notifications, newest first.
pub async fn inbox(db: &dyn DatabaseService, session: &Session) -> ServiceResult<Inbox> {
    let notifications = db.list_notifications(session.user_id).await?;
    Ok(Inbox {
        unread: notifications.iter().filter(|n| !n.is_read).count(),
        notifications,
    })
}

pub async fn mark_read(
    db: &dyn DatabaseService,
    session: &Session,
    notification_id: Uuid,
) -> ServiceResult<()> {
    Ok(db
        .mark_notification_read(session.user_id, notification_id)
        .await?)
}

/// Returns how many notifications changed.
pub async fn mark_all_read(db: &dyn DatabaseService, session: &Session) -> ServiceResult<u64> {
    Ok(db.mark_all_notifications_read(session.user_id).await?)
}

/// The session patient's payment records, newest first.
pub async fn payment_history(
    db: &dyn DatabaseService,
    session: &Session,
) -> ServiceResult<Vec<PaymentRecord>> {
    session.require_role(Role::Patient)?;
    Ok(db.list_payment_records(session.user_id).await?)
}
