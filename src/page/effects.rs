use std::collections::VecDeque;

use crate::api::ApiError;
use crate::page::MainPage;
use crate::records::{Record, RecordFields, RecordId, RecordService, RecordSummary};

/// A request the page wants issued against the backend.
#[derive(Debug, Clone)]
pub enum Effect {
    FetchList { generation: u64 },
    FetchRecord { id: RecordId },
    /// `ticket` names the dialog that asked for the save.
    Create {
        ticket: u64,
        fields: RecordFields,
    },
    Update {
        ticket: u64,
        id: RecordId,
        fields: RecordFields,
    },
    Delete { id: RecordId },
}

/// The result of an [`Effect`], fed back through [`MainPage::apply`].
#[derive(Debug)]
pub enum Outcome {
    ListLoaded {
        generation: u64,
        result: Result<Vec<RecordSummary>, ApiError>,
    },
    RecordLoaded {
        id: RecordId,
        result: Result<Record, ApiError>,
    },
    Created {
        ticket: u64,
        result: Result<Record, ApiError>,
    },
    Updated {
        ticket: u64,
        id: RecordId,
        result: Result<Record, ApiError>,
    },
    Deleted {
        id: RecordId,
        result: Result<(), ApiError>,
    },
}

pub async fn run_effect(service: &RecordService, effect: Effect) -> Outcome {
    match effect {
        Effect::FetchList { generation } => Outcome::ListLoaded {
            generation,
            result: service.list().await,
        },
        Effect::FetchRecord { id } => {
            let result = service.get_by_id(&id).await;
            Outcome::RecordLoaded { id, result }
        }
        Effect::Create { ticket, fields } => Outcome::Created {
            ticket,
            result: service.create(&fields).await,
        },
        Effect::Update { ticket, id, fields } => {
            let result = service.update(&id, &fields).await;
            Outcome::Updated { ticket, id, result }
        }
        Effect::Delete { id } => {
            let result = service.delete(&id).await;
            Outcome::Deleted { id, result }
        }
    }
}

/// Runs effects one at a time, feeding each outcome back into the page, until
/// nothing is left to issue. Used by non-interactive callers and tests.
pub async fn settle(page: &mut MainPage, service: &RecordService, effects: Vec<Effect>) {
    let mut queue: VecDeque<Effect> = effects.into();
    while let Some(effect) = queue.pop_front() {
        let outcome = run_effect(service, effect).await;
        queue.extend(page.apply(outcome));
    }
}
