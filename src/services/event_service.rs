// src/services/event_service.rs

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::common::error::AppError;
use crate::common::validation::invalid_field;
use crate::db::prelude::*;
use crate::models::ids::{EventId, ItemKind, ModuleId, SequenceKind, UserId, UserKey};
use crate::models::operations::{Event, EventDetail, EventPayload};
use crate::services::access_service::require_access;
use crate::services::assignment_service::{replace_assignments, resolve_targets};
use crate::services::notification::{notify_assigned, Notifier};

// Calendário: eventos com participantes. O criador participa sempre.
#[derive(Clone)]
pub struct EventService<S> {
    store: S,
    notifier: Arc<dyn Notifier>,
}

impl<S: Store> EventService<S> {
    pub fn new(store: S, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn create_event(&self, actor: UserKey, payload: EventPayload) -> Result<EventDetail, AppError> {
        payload.validate()?;
        let now = Utc::now();
        if payload.starts_at < now {
            return Err(invalid_field("startsAt", "past_date", "O evento não pode começar no passado."));
        }
        check_period(payload.starts_at, payload.ends_at)?;

        let mut tx = self.store.begin().await?;
        require_access(&mut tx, actor, ModuleId::CALENDAR).await?;

        let mut participants = resolve_targets(&mut tx, actor.tenant, &payload.targets).await?;
        participants.insert(actor.user);

        let id = tx.next_local_id(actor.tenant, SequenceKind::Event).await?;
        let event = Event {
            tenant_id: actor.tenant,
            id: EventId(id),
            created_by: actor.user,
            name: payload.name,
            location: payload.location,
            starts_at: payload.starts_at,
            ends_at: payload.ends_at,
            created_at: now,
        };
        tx.insert_event(&event).await?;
        replace_assignments(&mut tx, event.key(), &participants).await?;

        tx.commit().await?;

        tracing::info!(event = %event.key(), participants = participants.len(), "📅 Evento criado");
        let invited: BTreeSet<UserId> = participants.iter().copied().filter(|u| *u != actor.user).collect();
        notify_assigned(self.notifier.as_ref(), event.key(), &invited).await;

        Ok(EventDetail { event, participants: participants.into_iter().collect() })
    }

    pub async fn update_event(
        &self,
        actor: UserKey,
        id: EventId,
        payload: EventPayload,
    ) -> Result<EventDetail, AppError> {
        payload.validate()?;
        check_period(payload.starts_at, payload.ends_at)?;

        let mut tx = self.store.begin().await?;
        require_access(&mut tx, actor, ModuleId::CALENDAR).await?;

        let mut event = find_event(&mut tx, actor, id).await?;
        if event.created_by != actor.user {
            return Err(AppError::Forbidden("Apenas o criador pode editar o evento.".into()));
        }

        let mut participants = resolve_targets(&mut tx, actor.tenant, &payload.targets).await?;
        participants.insert(event.created_by);
        let previous: BTreeSet<UserId> = tx.assignees(event.key()).await?.into_iter().collect();

        event.name = payload.name;
        event.location = payload.location;
        event.starts_at = payload.starts_at;
        event.ends_at = payload.ends_at;

        tx.update_event(&event).await?;
        replace_assignments(&mut tx, event.key(), &participants).await?;

        tx.commit().await?;

        let added: BTreeSet<UserId> = participants.difference(&previous).copied().collect();
        notify_assigned(self.notifier.as_ref(), event.key(), &added).await;

        Ok(EventDetail { event, participants: participants.into_iter().collect() })
    }

    pub async fn delete_event(&self, actor: UserKey, id: EventId) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;
        require_access(&mut tx, actor, ModuleId::CALENDAR).await?;

        let event = find_event(&mut tx, actor, id).await?;
        if event.created_by != actor.user {
            return Err(AppError::Forbidden("Apenas o criador pode apagar o evento.".into()));
        }

        tx.delete_assignments(event.key()).await?;
        tx.delete_event(actor.tenant, id).await?;

        tx.commit().await?;

        tracing::info!(event = %event.key(), "🗑️ Evento removido");
        Ok(())
    }

    pub async fn get_event(&self, actor: UserKey, id: EventId) -> Result<EventDetail, AppError> {
        let mut tx = self.store.begin().await?;
        require_access(&mut tx, actor, ModuleId::CALENDAR).await?;

        let event = find_event(&mut tx, actor, id).await?;
        let participants = tx.assignees(event.key()).await?;
        Ok(EventDetail { event, participants })
    }

    /// Agenda do usuário: eventos em que ele participa.
    pub async fn list_events(&self, actor: UserKey) -> Result<Vec<EventDetail>, AppError> {
        let mut tx = self.store.begin().await?;
        require_access(&mut tx, actor, ModuleId::CALENDAR).await?;

        let mut result = Vec::new();
        for id in tx.assigned_items(actor, ItemKind::Event).await? {
            if let Some(event) = tx.find_event(actor.tenant, EventId(id)).await? {
                let participants = tx.assignees(event.key()).await?;
                result.push(EventDetail { event, participants });
            }
        }
        result.sort_by_key(|d| d.event.starts_at);
        Ok(result)
    }
}

fn check_period(starts_at: DateTime<Utc>, ends_at: Option<DateTime<Utc>>) -> Result<(), AppError> {
    match ends_at {
        Some(end) if end < starts_at => Err(invalid_field(
            "endsAt",
            "before_start",
            "O fim do evento não pode ser anterior ao início.",
        )),
        _ => Ok(()),
    }
}

async fn find_event<T: StoreTx>(tx: &mut T, actor: UserKey, id: EventId) -> Result<Event, AppError> {
    tx.find_event(actor.tenant, id)
        .await?
        .ok_or_else(|| AppError::not_found("Evento", id))
}
