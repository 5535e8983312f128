//! Admin-to-user messaging and broadcast fan-out.
//!
//! Every send writes two documents atomically: the message of record in
//! `admin_messages` and a notification copy in the recipient's
//! `users/{id}/notifications` subcollection. Broadcasts fan out in fixed
//! batches and tolerate partial failure: a failed batch costs its recipients
//! but the remaining batches still go out.

use chrono::Utc;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use alifi_core::{MessageId, UserId};

use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::gateway::{DocumentGateway, WriteOp};
use crate::models::{AdminMessage, MessageDraft};

const MESSAGES: &str = "admin_messages";

/// Progress snapshot emitted after each broadcast batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastProgress {
    /// Whole-number percentage of batches attempted, reaching 100 on the
    /// last batch.
    pub percent: u8,
    pub sent: usize,
    pub failed: usize,
    pub total: usize,
}

/// Final tally of a broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Sends admin messages through the document gateway.
pub struct MessagingService<D> {
    gateway: D,
    batch_size: usize,
}

impl<D> MessagingService<D>
where
    D: DocumentGateway,
{
    pub fn new(gateway: D, config: &ConsoleConfig) -> Self {
        Self {
            gateway,
            batch_size: config.broadcast_batch_size,
        }
    }

    /// Send a message to one user. Both documents land or neither does.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Validation`] for a blank subject or body,
    /// [`ConsoleError::Provider`] if the batch fails.
    #[instrument(skip(self, draft), fields(user = %user_id))]
    pub async fn send_to_user(
        &self,
        user_id: UserId,
        draft: &MessageDraft,
    ) -> Result<MessageId, ConsoleError> {
        validate_draft(draft)?;
        let (id, ops) = message_ops(draft, user_id, false)?;
        self.gateway.batch_write(ops).await?;
        Ok(id)
    }

    /// Mark a message read on the admin side.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Provider`] if the write fails, including
    /// for an unknown message ID.
    pub async fn mark_read(&self, id: &MessageId) -> Result<(), ConsoleError> {
        self.gateway
            .update(
                MESSAGES,
                id.as_str(),
                json!({"isRead": true, "readAt": Utc::now()}),
            )
            .await?;
        Ok(())
    }

    /// Fan a draft out to every listed user in batches.
    ///
    /// `on_progress` fires after each batch with cumulative counts; its
    /// `percent` walks the attempted batch fraction and lands on 100. A
    /// failing batch drops only its own recipients.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Validation`] for a blank draft or an empty
    /// recipient list. Batch failures are not errors; they show up in the
    /// report's `failed` count.
    #[instrument(skip_all, fields(recipients = user_ids.len()))]
    pub async fn broadcast(
        &self,
        user_ids: &[UserId],
        draft: &MessageDraft,
        mut on_progress: impl FnMut(BroadcastProgress),
    ) -> Result<BroadcastReport, ConsoleError> {
        validate_draft(draft)?;
        if user_ids.is_empty() {
            return Err(ConsoleError::Validation(
                "broadcast needs at least one recipient".to_owned(),
            ));
        }

        let total = user_ids.len();
        let batch_count = total.div_ceil(self.batch_size);
        let mut sent = 0;
        let mut failed = 0;

        for (index, chunk) in user_ids.chunks(self.batch_size).enumerate() {
            let mut ops = Vec::with_capacity(chunk.len() * 2);
            for user_id in chunk {
                let (_, user_ops) = message_ops(draft, user_id.clone(), true)?;
                ops.extend(user_ops);
            }
            match self.gateway.batch_write(ops).await {
                Ok(()) => sent += chunk.len(),
                Err(err) => {
                    warn!(batch = index, error = %err, "broadcast batch failed");
                    failed += chunk.len();
                }
            }

            let percent = u8::try_from(((index + 1) * 100).div_ceil(batch_count))
                .unwrap_or(100);
            on_progress(BroadcastProgress {
                percent,
                sent,
                failed,
                total,
            });
        }

        info!(sent, failed, total, "broadcast finished");
        Ok(BroadcastReport {
            total,
            sent,
            failed,
        })
    }

    /// Broadcast to every non-deleted platform user.
    ///
    /// # Errors
    ///
    /// As [`broadcast`](Self::broadcast), plus [`ConsoleError::Provider`] if
    /// the user listing fails.
    pub async fn broadcast_to_all(
        &self,
        draft: &MessageDraft,
        on_progress: impl FnMut(BroadcastProgress),
    ) -> Result<BroadcastReport, ConsoleError> {
        let users = self
            .gateway
            .list("users", crate::gateway::ListQuery::all())
            .await?;
        let recipients: Vec<UserId> = users
            .into_iter()
            .filter(|u| {
                !u.data
                    .get("isDeleted")
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
            })
            .map(|u| UserId::new(u.id))
            .collect();
        self.broadcast(&recipients, draft, on_progress).await
    }
}

fn validate_draft(draft: &MessageDraft) -> Result<(), ConsoleError> {
    if draft.subject.trim().is_empty() {
        return Err(ConsoleError::Validation("subject is required".to_owned()));
    }
    if draft.content.trim().is_empty() {
        return Err(ConsoleError::Validation("message body is required".to_owned()));
    }
    Ok(())
}

/// Build the message-of-record and notification-copy writes for one
/// recipient. IDs are minted client side so the pair can share a batch.
fn message_ops(
    draft: &MessageDraft,
    user_id: UserId,
    broadcast: bool,
) -> Result<(MessageId, Vec<WriteOp>), ConsoleError> {
    let message_id = MessageId::new(Uuid::new_v4().to_string());
    let message: AdminMessage = draft.to_message(user_id.clone(), broadcast, Utc::now());

    let message_doc = serde_json::to_value(&message)
        .map_err(|e| ConsoleError::Validation(format!("unencodable message: {e}")))?;
    let mut notification_doc = message_doc.clone();
    if let Value::Object(map) = &mut notification_doc {
        map.insert("messageId".to_owned(), json!(message_id.as_str()));
        map.insert("notificationType".to_owned(), json!("admin_message"));
    }

    let ops = vec![
        WriteOp::Set {
            collection: MESSAGES.to_owned(),
            id: message_id.to_string(),
            data: message_doc,
            merge: false,
        },
        WriteOp::Set {
            collection: format!("users/{user_id}/notifications"),
            id: Uuid::new_v4().to_string(),
            data: notification_doc,
            merge: false,
        },
    ];
    Ok((message_id, ops))
}
